//! The diagram traversal that drives a renderer.
//!
//! In the host application this walk belongs to the application core; here it
//! is the standalone equivalent, mapping each standard object type onto the
//! renderer contract: state setters first, then exactly one primitive call.
//! Object types the walker does not recognize are skipped with a debug event,
//! never an error.

use crate::error::Result;
use crate::renderer::{Alignment, DiagramRenderer, Font, FontSlant};
use crate::svg::SvgRenderer;
use crate::svgz;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use selkie_core::color::Rgb;
use selkie_core::geom::{Point, point, rect};
use selkie_core::model::{Diagram, Object, PropertyValue};
use selkie_core::style::{LineCap, LineJoin};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

/// Exports a diagram as a plain SVG file.
pub fn export_svg(diagram: &Diagram, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path)?;
    let mut renderer = SvgRenderer::new(BufWriter::new(file));
    render_diagram(diagram, &mut renderer)
}

/// Exports a diagram as a gzip-compressed SVG (`.svgz`) file.
pub fn export_svgz(diagram: &Diagram, path: impl AsRef<Path>) -> Result<()> {
    let mut renderer = svgz::create(path)?;
    render_diagram(diagram, &mut renderer)?;
    svgz::finish(renderer)
}

/// Renders a diagram into a string, for tests and embedding.
pub fn render_to_string(diagram: &Diagram) -> Result<String> {
    let mut renderer = SvgRenderer::new(Vec::new());
    render_diagram(diagram, &mut renderer)?;
    Ok(String::from_utf8(renderer.into_inner())?)
}

/// Walks layers and objects, driving the renderer through one complete
/// `begin_render`/`end_render` bracket.
pub fn render_diagram<R: DiagramRenderer>(diagram: &Diagram, renderer: &mut R) -> Result<()> {
    renderer.begin_render(diagram.extents())?;
    for layer in diagram.layers() {
        if !layer.visible {
            continue;
        }
        renderer.begin_layer(&layer.name)?;
        for object in layer.objects() {
            draw_object(object, renderer)?;
        }
        renderer.end_layer()?;
    }
    renderer.end_render()
}

fn draw_object<R: DiagramRenderer>(object: &Object, renderer: &mut R) -> Result<()> {
    let (id, url) = object_meta(object);
    renderer.begin_object(id.as_deref(), url.as_deref())?;
    apply_line_state(object, renderer);

    let pos = object.position;
    match object.type_name() {
        "Group" => {
            for child in &object.children {
                draw_object(child, renderer)?;
            }
        }
        "Standard - Box" => {
            let r = rect(pos.x, pos.y, elem_width(object), elem_height(object));
            let rounding = real(object, "corner_radius").unwrap_or(0.0);
            if rounding > 0.0 {
                renderer.draw_rounded_rect(r, fill_of(object), stroke_of(object), rounding)?;
            } else {
                renderer.draw_rect(r, fill_of(object), stroke_of(object))?;
            }
        }
        "Standard - Ellipse" => {
            let (w, h) = (elem_width(object), elem_height(object));
            let center = point(pos.x + w / 2.0, pos.y + h / 2.0);
            renderer.draw_ellipse(center, w, h, fill_of(object), stroke_of(object))?;
        }
        "Standard - Line" => {
            let end = object
                .get("end_point")
                .and_then(PropertyValue::as_point)
                .unwrap_or(pos);
            renderer.draw_line(pos, end, stroke_of(object).unwrap_or_else(Rgb::black))?;
        }
        "Standard - PolyLine" => {
            if let Some(PropertyValue::Points(pts)) = object.get("poly_points") {
                renderer.draw_polyline(pts, stroke_of(object).unwrap_or_else(Rgb::black))?;
            }
        }
        "Standard - Polygon" => {
            if let Some(PropertyValue::Points(pts)) = object.get("poly_points") {
                renderer.draw_polygon(pts, fill_of(object), stroke_of(object))?;
            }
        }
        "Standard - BezierLine" => {
            if let Some(PropertyValue::BezPoints(ops)) = object.get("bez_points") {
                renderer.draw_bezier(ops, stroke_of(object).unwrap_or_else(Rgb::black))?;
            }
        }
        "Standard - Beziergon" => {
            if let Some(PropertyValue::BezPoints(ops)) = object.get("bez_points") {
                renderer.draw_beziergon(ops, fill_of(object), stroke_of(object))?;
            }
        }
        "Standard - Arc" => {
            let (w, h) = (elem_width(object), elem_height(object));
            let center = point(pos.x + w / 2.0, pos.y + h / 2.0);
            let a1 = real(object, "arc_start_angle").unwrap_or(0.0);
            let a2 = real(object, "arc_end_angle").unwrap_or(360.0);
            if let Some(fill) = fill_of(object) {
                renderer.fill_arc(center, w, h, a1, a2, fill)?;
            }
            if let Some(stroke) = stroke_of(object) {
                renderer.draw_arc(center, w, h, a1, a2, stroke)?;
            }
        }
        "Standard - Text" => draw_text(object, pos, renderer)?,
        "Standard - Image" => {
            if let Some(uri) = image_uri(object) {
                renderer.draw_image(pos, elem_width(object), elem_height(object), &uri)?;
            }
        }
        other => {
            debug!(type_name = other, "skipping unrenderable object type");
        }
    }

    renderer.end_object(id.as_deref(), url.as_deref())
}

fn draw_text<R: DiagramRenderer>(object: &Object, pos: Point, renderer: &mut R) -> Result<()> {
    let text = object.get("text").and_then(PropertyValue::as_str).unwrap_or("");
    if text.is_empty() {
        return Ok(());
    }
    let height = real(object, "text_height").unwrap_or(0.8);
    let family = object
        .get("text_font")
        .and_then(PropertyValue::as_str)
        .unwrap_or("sans");
    renderer.set_font(
        Font {
            family: family.to_string(),
            slant: FontSlant::Normal,
            weight: 400,
        },
        height,
    );
    let alignment = Alignment::from_enum(
        object
            .get("text_alignment")
            .and_then(PropertyValue::as_enum)
            .unwrap_or(0),
    );
    let color = object
        .get("text_colour")
        .and_then(PropertyValue::as_colour)
        .unwrap_or_else(Rgb::black);
    // Multi-line text is one draw call per line, stepped by the line height.
    for (i, line) in text.lines().enumerate() {
        let at = point(pos.x, pos.y + i as f64 * height);
        renderer.draw_string(line, at, alignment, color)?;
    }
    Ok(())
}

fn apply_line_state<R: DiagramRenderer>(object: &Object, renderer: &mut R) {
    if let Some(width) = real(object, "line_width") {
        renderer.set_line_width(width);
    }
    if let Some(PropertyValue::LineStyle(style, dash_length)) = object.get("line_style") {
        renderer.set_line_style(*style, *dash_length);
    }
    if let Some(cap) = object
        .get("line_caps")
        .and_then(PropertyValue::as_enum)
        .and_then(LineCap::from_index)
    {
        renderer.set_line_caps(cap);
    }
    if let Some(join) = object
        .get("line_join")
        .and_then(PropertyValue::as_enum)
        .and_then(LineJoin::from_index)
    {
        renderer.set_line_join(join);
    }
}

fn real(object: &Object, name: &str) -> Option<f64> {
    object.get(name).and_then(PropertyValue::as_real)
}

fn elem_width(object: &Object) -> f64 {
    real(object, "elem_width").unwrap_or(0.0)
}

fn elem_height(object: &Object) -> f64 {
    real(object, "elem_height").unwrap_or(0.0)
}

fn stroke_of(object: &Object) -> Option<Rgb> {
    object.get("line_colour").and_then(PropertyValue::as_colour)
}

/// A fill exists only while the background is shown; `fill="none"` imports as
/// `show_background = false` and must export back to no paint.
fn fill_of(object: &Object) -> Option<Rgb> {
    if object
        .get("show_background")
        .and_then(PropertyValue::as_bool)
        != Some(true)
    {
        return None;
    }
    object.get("fill_colour").and_then(PropertyValue::as_colour)
}

fn object_meta(object: &Object) -> (Option<String>, Option<String>) {
    let Some(PropertyValue::Meta(meta)) = object.get("meta") else {
        return (None, None);
    };
    (meta.get("id").cloned(), meta.get("url").cloned())
}

/// A file reference exports as-is; inline pixels become a `data:` URI.
fn image_uri(object: &Object) -> Option<String> {
    if let Some(file) = object
        .get("image_file")
        .and_then(PropertyValue::as_str)
        .filter(|s| !s.is_empty())
    {
        return Some(file.to_string());
    }
    match object.get("image_data") {
        Some(PropertyValue::Binary(bytes)) if !bytes.is_empty() => Some(format!(
            "data:image/png;base64,{}",
            BASE64.encode(bytes)
        )),
        _ => None,
    }
}
