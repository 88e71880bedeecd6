//! Color and paint parsing.
//!
//! `parse_color` only commits to what it can recognize structurally
//! (`rgb(r,g,b)` and `none`); everything else is passed through verbatim as a
//! named paint for a downstream resolver, never an error.

use regex::Regex;
use std::sync::OnceLock;

/// A color with components normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Rgb {
    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }

    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    pub fn from_bytes(r: u8, g: u8, b: u8) -> Self {
        Self::new(f64::from(r) / 255.0, f64::from(g) / 255.0, f64::from(b) / 255.0)
    }

    /// `#RRGGBB` form used on the SVG output side.
    pub fn to_hex(&self) -> String {
        let byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}",
            byte(self.red),
            byte(self.green),
            byte(self.blue)
        )
    }
}

/// Stroke or fill paint. `None` means absence of paint and is distinct from
/// every concrete color; it must survive a round-trip as "no paint", not
/// black.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    None,
    Color(Rgb),
    Named(String),
}

impl Paint {
    /// Resolves to a concrete color where possible. Named paints fall back to
    /// hex and SVG color-keyword resolution; unresolvable names yield `None`
    /// so callers can skip the property write.
    pub fn resolve(&self) -> Option<Rgb> {
        match self {
            Paint::None => None,
            Paint::Color(c) => Some(*c),
            Paint::Named(name) => resolve_named(name),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Paint::None)
    }
}

fn rgb_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^rgb\s*\(\s*(\d+)\s*[, ]\s*(\d+)\s*[, ]\s*(\d+)\s*\)$").unwrap()
    })
}

/// Parses a paint value: `none`, `rgb(r,g,b)` with integer 0-255 components,
/// or a verbatim pass-through for the resolver. Never fails.
pub fn parse_color(text: &str) -> Paint {
    let s = text.trim();
    if s.eq_ignore_ascii_case("none") {
        return Paint::None;
    }
    if let Some(caps) = rgb_re().captures(s) {
        let component = |i: usize| {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .map(|v| f64::from(v.min(255)) / 255.0)
        };
        if let (Some(r), Some(g), Some(b)) = (component(1), component(2), component(3)) {
            return Paint::Color(Rgb::new(r, g, b));
        }
    }
    Paint::Named(s.to_string())
}

/// Resolves `#rgb`/`#rrggbb` hex and the common SVG color keywords. Stands in
/// for the host application's color parser; anything it does not know stays
/// unresolved.
pub fn resolve_named(name: &str) -> Option<Rgb> {
    let s = name.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let (r, g, b) = match s.to_ascii_lowercase().as_str() {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "brown" => (165, 42, 42),
        "pink" => (255, 192, 203),
        "gray" | "grey" => (128, 128, 128),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "darkgray" | "darkgrey" => (169, 169, 169),
        "silver" => (192, 192, 192),
        "maroon" => (128, 0, 0),
        "navy" => (0, 0, 128),
        "olive" => (128, 128, 0),
        "teal" => (0, 128, 128),
        _ => return None,
    };
    Some(Rgb::from_bytes(r, g, b))
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.is_ascii() {
        return None;
    }
    let digits = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let r = digits(&hex[0..1])?;
            let g = digits(&hex[1..2])?;
            let b = digits(&hex[2..3])?;
            // #abc expands to #aabbcc
            Some(Rgb::from_bytes(r * 17, g * 17, b * 17))
        }
        6 => Some(Rgb::from_bytes(
            digits(&hex[0..2])?,
            digits(&hex[2..4])?,
            digits(&hex[4..6])?,
        )),
        _ => None,
    }
}
