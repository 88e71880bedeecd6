//! The renderer contract the diagram traversal drives.
//!
//! The caller guarantees the bracket: `begin_render` precedes all drawing
//! calls and `end_render` follows them, exactly once per export. State
//! setters are latest-wins; a renderer applies the most recently set line
//! width, dash style and font to the next primitive, never an aggregate.

use crate::error::Result;
use selkie_core::color::Rgb;
use selkie_core::geom::{Point, Rect};
use selkie_core::path::PathCommand;
use selkie_core::style::{LineCap, LineJoin, LineStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSlant {
    Normal,
    Italic,
    Oblique,
}

impl FontSlant {
    pub fn css_name(self) -> &'static str {
        match self {
            FontSlant::Normal => "normal",
            FontSlant::Italic => "italic",
            FontSlant::Oblique => "oblique",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub slant: FontSlant,
    /// CSS numeric weight, 100-900.
    pub weight: u16,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "sans".to_string(),
            slant: FontSlant::Normal,
            weight: 400,
        }
    }
}

impl Font {
    pub fn named(family: &str) -> Self {
        Self {
            family: family.to_string(),
            ..Self::default()
        }
    }
}

/// Horizontal text alignment, in the diagram model's enum order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn from_enum(value: i32) -> Self {
        match value {
            1 => Alignment::Center,
            2 => Alignment::Right,
            _ => Alignment::Left,
        }
    }
}

/// Only solid fills exist in the model today; the setter is part of the
/// contract regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillStyle {
    #[default]
    Solid,
}

/// Per-primitive rendering driven by the diagram traversal. Paint arguments
/// are `Option<Rgb>` with `None` meaning "no paint".
pub trait DiagramRenderer {
    fn begin_render(&mut self, extents: Rect) -> Result<()>;
    fn end_render(&mut self) -> Result<()>;

    /// Layer bracket around the layer's objects. Defaults to a no-op.
    fn begin_layer(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }
    fn end_layer(&mut self) -> Result<()> {
        Ok(())
    }

    /// Object bracket carrying through the object's metadata. Defaults to a
    /// no-op.
    fn begin_object(&mut self, _id: Option<&str>, _url: Option<&str>) -> Result<()> {
        Ok(())
    }
    fn end_object(&mut self, _id: Option<&str>, _url: Option<&str>) -> Result<()> {
        Ok(())
    }

    fn set_line_width(&mut self, width: f64);
    fn set_line_caps(&mut self, caps: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_line_style(&mut self, style: LineStyle, dash_length: f64);
    fn set_fill_style(&mut self, style: FillStyle);
    fn set_font(&mut self, font: Font, height: f64);

    fn draw_line(&mut self, start: Point, end: Point, color: Rgb) -> Result<()>;
    fn draw_polyline(&mut self, points: &[Point], color: Rgb) -> Result<()>;
    fn draw_polygon(
        &mut self,
        points: &[Point],
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    ) -> Result<()>;
    fn draw_rect(&mut self, rect: Rect, fill: Option<Rgb>, stroke: Option<Rgb>) -> Result<()>;
    fn draw_rounded_rect(
        &mut self,
        rect: Rect,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
        rounding: f64,
    ) -> Result<()>;
    fn draw_ellipse(
        &mut self,
        center: Point,
        width: f64,
        height: f64,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    ) -> Result<()>;
    /// Angles in degrees, counter-clockwise, y-up.
    fn draw_arc(
        &mut self,
        center: Point,
        width: f64,
        height: f64,
        angle1: f64,
        angle2: f64,
        color: Rgb,
    ) -> Result<()>;
    fn fill_arc(
        &mut self,
        center: Point,
        width: f64,
        height: f64,
        angle1: f64,
        angle2: f64,
        color: Rgb,
    ) -> Result<()>;
    /// Bezier ops (`MoveTo`/`LineTo`/`CurveTo`); any `Close` is ignored.
    fn draw_bezier(&mut self, ops: &[PathCommand], color: Rgb) -> Result<()>;
    fn draw_beziergon(
        &mut self,
        ops: &[PathCommand],
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    ) -> Result<()>;
    fn draw_string(
        &mut self,
        text: &str,
        pos: Point,
        alignment: Alignment,
        color: Rgb,
    ) -> Result<()>;
    fn draw_image(&mut self, point: Point, width: f64, height: f64, uri: &str) -> Result<()>;
}
