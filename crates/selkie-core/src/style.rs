//! Stroke/fill/dash/font style state.
//!
//! Every field is optional: an unset field was never written by the document
//! and must not be applied to a created object, while `Some(Paint::None)` is
//! an explicit "no paint". Group elements copy their style down to children
//! at creation time, which is the only cascading this model does.

use crate::color::Paint;
use crate::units::UnitContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    DashDot,
    DashDotDot,
    Dotted,
}

impl LineStyle {
    pub fn index(self) -> i32 {
        match self {
            LineStyle::Solid => 0,
            LineStyle::Dashed => 1,
            LineStyle::DashDot => 2,
            LineStyle::DashDotDot => 3,
            LineStyle::Dotted => 4,
        }
    }

    pub fn from_index(i: i32) -> Option<Self> {
        match i {
            0 => Some(LineStyle::Solid),
            1 => Some(LineStyle::Dashed),
            2 => Some(LineStyle::DashDot),
            3 => Some(LineStyle::DashDotDot),
            4 => Some(LineStyle::Dotted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
    Projecting,
}

impl LineCap {
    pub fn index(self) -> i32 {
        match self {
            LineCap::Butt => 0,
            LineCap::Round => 1,
            LineCap::Projecting => 2,
        }
    }

    pub fn from_index(i: i32) -> Option<Self> {
        match i {
            0 => Some(LineCap::Butt),
            1 => Some(LineCap::Round),
            2 => Some(LineCap::Projecting),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    pub fn index(self) -> i32 {
        match self {
            LineJoin::Miter => 0,
            LineJoin::Round => 1,
            LineJoin::Bevel => 2,
        }
    }

    pub fn from_index(i: i32) -> Option<Self> {
        match i {
            0 => Some(LineJoin::Miter),
            1 => Some(LineJoin::Round),
            2 => Some(LineJoin::Bevel),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub stroke: Option<Paint>,
    pub fill: Option<Paint>,
    pub stroke_width: Option<f64>,
    pub line_style: Option<(LineStyle, f64)>,
    pub cap: Option<LineCap>,
    pub join: Option<LineJoin>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub text_anchor: Option<String>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            // SVG's initial value: shapes have no stroke until one is set.
            stroke: Some(Paint::None),
            fill: None,
            stroke_width: None,
            line_style: None,
            cap: None,
            join: None,
            font_size: None,
            font_family: None,
            font_weight: None,
            font_style: None,
            text_anchor: None,
        }
    }
}

/// Maps a `stroke-dasharray` value onto the dash-style enum the diagram model
/// uses: 2 entries are dashed (or dotted below a visibility threshold), 4 are
/// dash-dot, 6 are dash-dot-dot. The first entry becomes the dash length.
pub fn parse_dash_array(text: &str, ctx: &UnitContext) -> Option<(LineStyle, f64)> {
    let entries: Vec<&str> = text.split(',').map(str::trim).collect();
    let Ok(dash_length) = crate::units::parse_length(entries[0], ctx) else {
        // Covers `stroke-dasharray="none"` from sloppy generators.
        return Some((LineStyle::Solid, 1.0));
    };
    match entries.len() {
        2 => {
            if dash_length > 0.1 {
                Some((LineStyle::Dashed, dash_length))
            } else {
                Some((LineStyle::Dotted, dash_length))
            }
        }
        4 => Some((LineStyle::DashDot, dash_length)),
        6 => Some((LineStyle::DashDotDot, dash_length)),
        _ => None,
    }
}

pub fn parse_line_cap(text: &str) -> Option<LineCap> {
    match text.trim() {
        "butt" => Some(LineCap::Butt),
        "round" => Some(LineCap::Round),
        "square" => Some(LineCap::Projecting),
        _ => None,
    }
}

pub fn parse_line_join(text: &str) -> Option<LineJoin> {
    match text.trim() {
        "miter" => Some(LineJoin::Miter),
        "round" => Some(LineJoin::Round),
        "bevel" => Some(LineJoin::Bevel),
        _ => None,
    }
}

/// Splits a `style="key:value;key2:value2"` declaration into trimmed pairs.
/// Entries without a colon are skipped.
pub fn split_style_declarations(decl: &str) -> impl Iterator<Item = (&str, &str)> {
    decl.split(';').filter_map(|entry| {
        let (key, value) = entry.split_once(':')?;
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() {
            return None;
        }
        Some((key, value))
    })
}
