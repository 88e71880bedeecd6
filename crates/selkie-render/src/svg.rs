//! SVG serialization of the renderer contract.
//!
//! One element per primitive, written straight through an [`io::Write`]. The
//! compressed variant is the same renderer behind a gzip encoder; nothing
//! here knows or cares.

use crate::error::Result;
use crate::renderer::{Alignment, DiagramRenderer, FillStyle, Font};
use selkie_core::color::Rgb;
use selkie_core::geom::{Point, Rect};
use selkie_core::path::PathCommand;
use selkie_core::style::{LineCap, LineJoin, LineStyle};
use std::io::Write;

/// Writes one SVG document per `begin_render`/`end_render` bracket.
pub struct SvgRenderer<W: Write> {
    out: W,
    line_width: f64,
    caps: LineCap,
    join: LineJoin,
    line_style: LineStyle,
    dash_length: f64,
    font: Font,
    font_height: f64,
}

impl<W: Write> SvgRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            line_width: 0.1,
            caps: LineCap::Butt,
            join: LineJoin::Miter,
            line_style: LineStyle::Solid,
            dash_length: 1.0,
            font: Font::default(),
            font_height: 0.8,
        }
    }

    /// Hands the writer back, e.g. to finish a compression stream.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Serializes the dash/join/cap state as attribute fragments, each with a
    /// leading space. Dash gaps follow the Gdk renderer's interpretation:
    /// dots are a tenth of the dash length and the gaps divide evenly.
    fn stroke_style_attrs(&self) -> String {
        let dash = self.dash_length;
        let dot = dash * 0.1;
        let mut st = String::new();
        match self.line_style {
            LineStyle::Solid => {}
            LineStyle::Dashed => {
                st.push_str(&format!(" stroke-dasharray=\"{dash:.2},{dash:.2}\""));
            }
            LineStyle::DashDot => {
                let gap = (dash - dot) / 2.0;
                st.push_str(&format!(
                    " stroke-dasharray=\"{dash:.2},{gap:.2},{dot:.2},{gap:.2}\""
                ));
            }
            LineStyle::DashDotDot => {
                let gap = (dash - dot) / 3.0;
                st.push_str(&format!(
                    " stroke-dasharray=\"{dash:.2},{gap:.2},{dot:.2},{gap:.2},{dot:.2},{gap:.2}\""
                ));
            }
            LineStyle::Dotted => {
                st.push_str(&format!(" stroke-dasharray=\"{dot:.2},{dot:.2}\""));
            }
        }
        match self.join {
            LineJoin::Miter => {}
            LineJoin::Round => st.push_str(" stroke-linejoin=\"round\""),
            LineJoin::Bevel => st.push_str(" stroke-linejoin=\"bevel\""),
        }
        match self.caps {
            LineCap::Butt => {}
            LineCap::Round => st.push_str(" stroke-linecap=\"round\""),
            LineCap::Projecting => st.push_str(" stroke-linecap=\"square\""),
        }
        st
    }

    fn write_bezier_ops(&mut self, ops: &[PathCommand]) -> Result<()> {
        for op in ops {
            match op {
                PathCommand::MoveTo(p) => {
                    write!(self.out, "M {:.3},{:.3} ", p.x, p.y)?;
                }
                PathCommand::LineTo(p) => {
                    write!(self.out, "L {:.3},{:.3} ", p.x, p.y)?;
                }
                PathCommand::CurveTo(c1, c2, p) => {
                    write!(
                        self.out,
                        "C {:.3},{:.3} {:.3},{:.3} {:.3},{:.3} ",
                        c1.x, c1.y, c2.x, c2.y, p.x, p.y
                    )?;
                }
                // Closedness is conveyed by draw_beziergon.
                PathCommand::Close => {}
            }
        }
        Ok(())
    }

    fn write_arc(
        &mut self,
        center: Point,
        width: f64,
        height: f64,
        angle1: f64,
        angle2: f64,
        color: Rgb,
        filled: bool,
    ) -> Result<()> {
        let rx = width / 2.0;
        let ry = height / 2.0;
        let sx = center.x + rx * angle1.to_radians().cos();
        let sy = center.y - ry * angle1.to_radians().sin();
        let ex = center.x + rx * angle2.to_radians().cos();
        let ey = center.y - ry * angle2.to_radians().sin();
        let large_arc = i32::from((angle2 - angle1).abs() >= 180.0);
        // The y axis is flipped, so a decreasing angle sweeps positively.
        let sweep = i32::from(angle1 > angle2);
        if filled {
            write!(self.out, "<path stroke=\"none\" fill=\"{}\"", rgb(Some(color)))?;
        } else {
            write!(
                self.out,
                "<path stroke=\"{}\" fill=\"none\" stroke-width=\"{:.3}\"{}",
                rgb(Some(color)),
                self.line_width,
                self.stroke_style_attrs()
            )?;
        }
        writeln!(
            self.out,
            " d=\"M {sx:.3},{sy:.3} A {rx:.3},{ry:.3} 0 {large_arc},{sweep} {ex:.3},{ey:.3}\"/>"
        )?;
        Ok(())
    }
}

impl<W: Write> DiagramRenderer for SvgRenderer<W> {
    fn begin_render(&mut self, extents: Rect) -> Result<()> {
        let r = extents;
        writeln!(
            self.out,
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>"
        )?;
        writeln!(self.out, "<!-- Created by selkie-render -->")?;
        writeln!(
            self.out,
            "<svg width=\"{:.3}cm\" height=\"{:.3}cm\" viewBox=\"{:.3} {:.3} {:.3} {:.3}\"\n xmlns=\"http://www.w3.org/2000/svg\"\n xmlns:xlink=\"http://www.w3.org/1999/xlink\">",
            r.size.width,
            r.size.height,
            r.origin.x,
            r.origin.y,
            r.size.width,
            r.size.height
        )?;
        Ok(())
    }

    fn end_render(&mut self) -> Result<()> {
        writeln!(self.out, "</svg>")?;
        self.out.flush()?;
        Ok(())
    }

    fn begin_layer(&mut self, name: &str) -> Result<()> {
        writeln!(self.out, "<!-- Layer: {} -->", escape(name))?;
        writeln!(self.out, "<g id=\"{}\">", escape(name))?;
        Ok(())
    }

    fn end_layer(&mut self) -> Result<()> {
        writeln!(self.out, "</g>")?;
        Ok(())
    }

    fn begin_object(&mut self, id: Option<&str>, url: Option<&str>) -> Result<()> {
        if let Some(url) = url {
            writeln!(self.out, "<a xlink:href=\"{}\">", escape(url))?;
        }
        if let Some(id) = id {
            writeln!(self.out, "<g id=\"{}\">", escape(id))?;
        }
        Ok(())
    }

    fn end_object(&mut self, id: Option<&str>, url: Option<&str>) -> Result<()> {
        if id.is_some() {
            writeln!(self.out, "</g>")?;
        }
        if url.is_some() {
            writeln!(self.out, "</a>")?;
        }
        Ok(())
    }

    fn set_line_width(&mut self, width: f64) {
        // Zero line width would be invisible.
        self.line_width = if width < 0.001 { 0.001 } else { width };
    }

    fn set_line_caps(&mut self, caps: LineCap) {
        self.caps = caps;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.join = join;
    }

    fn set_line_style(&mut self, style: LineStyle, dash_length: f64) {
        self.line_style = style;
        self.dash_length = dash_length;
    }

    fn set_fill_style(&mut self, _style: FillStyle) {}

    fn set_font(&mut self, font: Font, height: f64) {
        self.font = font;
        self.font_height = height;
    }

    fn draw_line(&mut self, start: Point, end: Point, color: Rgb) -> Result<()> {
        writeln!(
            self.out,
            "<line x1=\"{:.3}\" y1=\"{:.3}\" x2=\"{:.3}\" y2=\"{:.3}\" stroke=\"{}\" stroke-width=\"{:.3}\"{}/>",
            start.x,
            start.y,
            end.x,
            end.y,
            rgb(Some(color)),
            self.line_width,
            self.stroke_style_attrs()
        )?;
        Ok(())
    }

    fn draw_polyline(&mut self, points: &[Point], color: Rgb) -> Result<()> {
        write!(
            self.out,
            "<polyline fill=\"none\" stroke=\"{}\" stroke-width=\"{:.3}\"{} points=\"",
            rgb(Some(color)),
            self.line_width,
            self.stroke_style_attrs()
        )?;
        for p in points {
            write!(self.out, "{:.3},{:.3} ", p.x, p.y)?;
        }
        writeln!(self.out, "\"/>")?;
        Ok(())
    }

    fn draw_polygon(
        &mut self,
        points: &[Point],
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    ) -> Result<()> {
        write!(
            self.out,
            "<polygon fill=\"{}\" stroke=\"{}\" stroke-width=\"{:.3}\"{} points=\"",
            rgb(fill),
            rgb(stroke),
            self.line_width,
            self.stroke_style_attrs()
        )?;
        for p in points {
            write!(self.out, "{:.3},{:.3} ", p.x, p.y)?;
        }
        writeln!(self.out, "\"/>")?;
        Ok(())
    }

    fn draw_rect(&mut self, rect: Rect, fill: Option<Rgb>, stroke: Option<Rgb>) -> Result<()> {
        writeln!(
            self.out,
            "<rect x=\"{:.3}\" y=\"{:.3}\" width=\"{:.3}\" height=\"{:.3}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{:.3}\"{}/>",
            rect.origin.x,
            rect.origin.y,
            rect.size.width,
            rect.size.height,
            rgb(fill),
            rgb(stroke),
            self.line_width,
            self.stroke_style_attrs()
        )?;
        Ok(())
    }

    fn draw_rounded_rect(
        &mut self,
        rect: Rect,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
        rounding: f64,
    ) -> Result<()> {
        writeln!(
            self.out,
            "<rect x=\"{:.3}\" y=\"{:.3}\" width=\"{:.3}\" height=\"{:.3}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{:.3}\"{} rx=\"{:.3}\"/>",
            rect.origin.x,
            rect.origin.y,
            rect.size.width,
            rect.size.height,
            rgb(fill),
            rgb(stroke),
            self.line_width,
            self.stroke_style_attrs(),
            rounding
        )?;
        Ok(())
    }

    fn draw_ellipse(
        &mut self,
        center: Point,
        width: f64,
        height: f64,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    ) -> Result<()> {
        writeln!(
            self.out,
            "<ellipse cx=\"{:.3}\" cy=\"{:.3}\" rx=\"{:.3}\" ry=\"{:.3}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{:.3}\"{}/>",
            center.x,
            center.y,
            width / 2.0,
            height / 2.0,
            rgb(fill),
            rgb(stroke),
            self.line_width,
            self.stroke_style_attrs()
        )?;
        Ok(())
    }

    fn draw_arc(
        &mut self,
        center: Point,
        width: f64,
        height: f64,
        angle1: f64,
        angle2: f64,
        color: Rgb,
    ) -> Result<()> {
        self.write_arc(center, width, height, angle1, angle2, color, false)
    }

    fn fill_arc(
        &mut self,
        center: Point,
        width: f64,
        height: f64,
        angle1: f64,
        angle2: f64,
        color: Rgb,
    ) -> Result<()> {
        self.write_arc(center, width, height, angle1, angle2, color, true)
    }

    fn draw_bezier(&mut self, ops: &[PathCommand], color: Rgb) -> Result<()> {
        write!(
            self.out,
            "<path stroke=\"{}\" fill=\"none\" stroke-width=\"{:.3}\"{} d=\"",
            rgb(Some(color)),
            self.line_width,
            self.stroke_style_attrs()
        )?;
        self.write_bezier_ops(ops)?;
        writeln!(self.out, "\"/>")?;
        Ok(())
    }

    fn draw_beziergon(
        &mut self,
        ops: &[PathCommand],
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    ) -> Result<()> {
        write!(
            self.out,
            "<path stroke=\"{}\" fill=\"{}\" stroke-width=\"{:.3}\"{} d=\"",
            rgb(stroke),
            rgb(fill),
            self.line_width,
            self.stroke_style_attrs()
        )?;
        self.write_bezier_ops(ops)?;
        writeln!(self.out, "z\"/>")?;
        Ok(())
    }

    fn draw_string(
        &mut self,
        text: &str,
        pos: Point,
        alignment: Alignment,
        color: Rgb,
    ) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let anchor = match alignment {
            Alignment::Left => "start",
            Alignment::Center => "middle",
            Alignment::Right => "end",
        };
        writeln!(
            self.out,
            "<text x=\"{:.3}\" y=\"{:.3}\" fill=\"{}\" text-anchor=\"{}\" font-size=\"{:.2}\" font-family=\"{}\" font-style=\"{}\" font-weight=\"{}\">",
            pos.x,
            pos.y,
            rgb(Some(color)),
            anchor,
            self.font_height,
            escape(&self.font.family),
            self.font.slant.css_name(),
            self.font.weight
        )?;
        writeln!(self.out, "{}", escape(text))?;
        writeln!(self.out, "</text>")?;
        Ok(())
    }

    fn draw_image(&mut self, point: Point, width: f64, height: f64, uri: &str) -> Result<()> {
        writeln!(
            self.out,
            "<image x=\"{:.3}\" y=\"{:.3}\" width=\"{:.3}\" height=\"{:.3}\" xlink:href=\"{}\"/>",
            point.x,
            point.y,
            width,
            height,
            escape(uri)
        )?;
        Ok(())
    }
}

/// A diagram color as an SVG paint; no paint serializes as `none`.
fn rgb(color: Option<Rgb>) -> String {
    match color {
        Some(c) => c.to_hex(),
        None => "none".to_string(),
    }
}

/// XML-escapes text content and attribute values. Ampersand goes first so
/// already-produced entities are not escaped twice.
fn escape(text: &str) -> String {
    let mut out = text.to_string();
    for (from, to) in [
        ("&", "&amp;"),
        ("<", "&lt;"),
        (">", "&gt;"),
        ("\"", "&quot;"),
        ("'", "&apos;"),
    ] {
        out = out.replace(from, to);
    }
    out
}
