//! SVG path-data grammar.
//!
//! The parser accepts the `M/m L/l H/h V/v C/c S/s Z/z` command alphabet and
//! normalizes everything to absolute [`PathCommand`]s: horizontal/vertical
//! lines become plain lines, smooth curves get their reflected first control
//! point materialized, and a close that moved away from the subpath start is
//! preceded by an explicit line back to it. Coordinates come out exactly as
//! written; callers apply document scaling afterwards.

use crate::geom::{Point, point};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CurveTo(Point, Point, Point),
    Close,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum PathError {
    #[error("unsupported path command {command:?}")]
    UnknownCommand { command: char },

    #[error("path command {command:?} expects {expected} operands, found {found}")]
    MissingOperands {
        command: char,
        expected: usize,
        found: usize,
    },

    #[error("invalid number {text:?} in path data")]
    BadNumber { text: String },
}

struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    fn skip_separators(&mut self) {
        self.rest = self
            .rest
            .trim_start_matches(|c: char| c.is_whitespace() || c == ',');
    }

    /// Next command letter, if the scanner sits on one.
    fn next_letter(&mut self) -> Option<char> {
        self.skip_separators();
        let c = self.rest.chars().next()?;
        if c.is_ascii_alphabetic() {
            self.rest = &self.rest[1..];
            Some(c)
        } else {
            None
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_separators();
        self.rest.is_empty()
    }

    /// True when the next token is a number rather than a letter or the end.
    fn at_number(&mut self) -> bool {
        self.skip_separators();
        matches!(
            self.rest.chars().next(),
            Some('+' | '-' | '.' | '0'..='9')
        )
    }

    /// Consumes one decimal number. Numbers may run together with a following
    /// sign (`10-5`) or a bare fraction (`.5.5`), as real-world path data does.
    fn next_number(&mut self) -> Result<Option<f64>, PathError> {
        if !self.at_number() {
            return Ok(None);
        }
        let bytes = self.rest.as_bytes();
        let mut i = 0;
        if matches!(bytes.first(), Some(b'+' | b'-')) {
            i += 1;
        }
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if bytes.get(i) == Some(&b'.') {
            i += 1;
            while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
        }
        if matches!(bytes.get(i), Some(b'e' | b'E')) {
            let mut j = i + 1;
            if matches!(bytes.get(j), Some(b'+' | b'-')) {
                j += 1;
            }
            if bytes.get(j).is_some_and(u8::is_ascii_digit) {
                while bytes.get(j).is_some_and(u8::is_ascii_digit) {
                    j += 1;
                }
                i = j;
            }
        }
        let text = &self.rest[..i];
        let value = text.parse::<f64>().map_err(|_| PathError::BadNumber {
            text: text.to_string(),
        })?;
        self.rest = &self.rest[i..];
        Ok(Some(value))
    }
}

fn operand_count(command: char) -> Result<usize, PathError> {
    match command.to_ascii_lowercase() {
        'm' | 'l' => Ok(2),
        'h' | 'v' => Ok(1),
        'c' => Ok(6),
        's' => Ok(4),
        'z' => Ok(0),
        _ => Err(PathError::UnknownCommand { command }),
    }
}

/// Parses one path-data string into a command sequence.
pub fn parse_path(text: &str) -> Result<Vec<PathCommand>, PathError> {
    let mut commands = Vec::new();
    let mut scanner = Scanner::new(text);

    let mut current = point(0.0, 0.0);
    let mut subpath_start = point(0.0, 0.0);
    // Second control point of the previous curve, for S/s reflection.
    let mut last_control: Option<Point> = None;
    let mut letter: Option<char> = None;
    let mut first_group = true;

    while !scanner.at_end() {
        if let Some(c) = scanner.next_letter() {
            operand_count(c)?;
            letter = Some(c);
            first_group = true;
        } else if letter.is_none() || !scanner.at_number() {
            // Operand data before any command letter, or a stray token that
            // is neither a letter nor a number.
            let c = scanner.rest.chars().next().unwrap_or('?');
            return Err(PathError::UnknownCommand { command: c });
        }
        let c = letter.unwrap_or('?');
        let expected = operand_count(c)?;

        let mut operands = [0.0f64; 6];
        let mut found = 0;
        while found < expected {
            match scanner.next_number()? {
                Some(v) => {
                    operands[found] = v;
                    found += 1;
                }
                None => break,
            }
        }
        if found < expected {
            return Err(PathError::MissingOperands {
                command: c,
                expected,
                found,
            });
        }

        let relative = c.is_ascii_lowercase();
        let abs = |x: f64, y: f64, current: Point| {
            if relative {
                point(current.x + x, current.y + y)
            } else {
                point(x, y)
            }
        };

        match c.to_ascii_lowercase() {
            'm' => {
                let p = abs(operands[0], operands[1], current);
                if first_group {
                    commands.push(PathCommand::MoveTo(p));
                    subpath_start = p;
                } else {
                    // SVG: extra coordinate pairs after a moveto are lineto.
                    commands.push(PathCommand::LineTo(p));
                }
                current = p;
                last_control = None;
            }
            'l' => {
                let p = abs(operands[0], operands[1], current);
                commands.push(PathCommand::LineTo(p));
                current = p;
                last_control = None;
            }
            'h' => {
                let x = if relative {
                    current.x + operands[0]
                } else {
                    operands[0]
                };
                let p = point(x, current.y);
                commands.push(PathCommand::LineTo(p));
                current = p;
                last_control = None;
            }
            'v' => {
                let y = if relative {
                    current.y + operands[0]
                } else {
                    operands[0]
                };
                let p = point(current.x, y);
                commands.push(PathCommand::LineTo(p));
                current = p;
                last_control = None;
            }
            'c' => {
                let c1 = abs(operands[0], operands[1], current);
                let c2 = abs(operands[2], operands[3], current);
                let p = abs(operands[4], operands[5], current);
                commands.push(PathCommand::CurveTo(c1, c2, p));
                last_control = Some(c2);
                current = p;
            }
            's' => {
                // Reflect the previous curve's second control point through
                // the current point; without a preceding curve the control
                // collapses onto the current point.
                let c1 = match last_control {
                    Some(ctrl) => point(2.0 * current.x - ctrl.x, 2.0 * current.y - ctrl.y),
                    None => current,
                };
                let c2 = abs(operands[0], operands[1], current);
                let p = abs(operands[2], operands[3], current);
                commands.push(PathCommand::CurveTo(c1, c2, p));
                last_control = Some(c2);
                current = p;
            }
            'z' => {
                if current != subpath_start {
                    commands.push(PathCommand::LineTo(subpath_start));
                }
                commands.push(PathCommand::Close);
                current = subpath_start;
                last_control = None;
                // z takes no operands and never repeats implicitly.
                letter = None;
            }
            _ => unreachable!("validated by operand_count"),
        }
        first_group = false;
    }

    Ok(commands)
}

/// Re-emits a command sequence as absolute path data (`M/L/C/z`), the inverse
/// of [`parse_path`] for absolute-command input.
pub fn write_path(commands: &[PathCommand]) -> String {
    let mut out = String::new();
    for cmd in commands {
        match cmd {
            PathCommand::MoveTo(p) => {
                let _ = write!(out, "M {},{} ", p.x, p.y);
            }
            PathCommand::LineTo(p) => {
                let _ = write!(out, "L {},{} ", p.x, p.y);
            }
            PathCommand::CurveTo(c1, c2, p) => {
                let _ = write!(out, "C {},{} {},{} {},{} ", c1.x, c1.y, c2.x, c2.y, p.x, p.y);
            }
            PathCommand::Close => out.push_str("z "),
        }
    }
    out.trim_end().to_string()
}

/// True when the sequence ends a closed figure.
pub fn is_closed(commands: &[PathCommand]) -> bool {
    commands.iter().any(|c| matches!(c, PathCommand::Close))
}
