//! Shape tree -> diagram objects.
//!
//! `instantiate` returns `None` for nodes with no visual representation
//! (unknown elements, empty groups, text without content, images without
//! pixels); callers treat that as a skip, not an error. Style application
//! checks property existence on the target type before every write.

use crate::color::Paint;
use crate::model::{Object, PropertyValue, create_standard_object, group_objects};
use crate::path::{PathCommand, is_closed};
use crate::shape::{ImageSource, Shape, ShapeKind};
use crate::style::Style;
use indexmap::IndexMap;
use tracing::debug;

pub fn instantiate(shape: &Shape) -> Option<Object> {
    let mut object = match &shape.kind {
        ShapeKind::Rect {
            x,
            y,
            width,
            height,
            rx,
        } => {
            let mut o = create_standard_object("Standard - Box", *x, *y)?;
            o.set("elem_width", PropertyValue::Real(*width));
            o.set("elem_height", PropertyValue::Real(*height));
            if *rx > 0.0 {
                o.set("corner_radius", PropertyValue::Real(*rx));
            }
            o
        }
        ShapeKind::Ellipse { cx, cy, rx, ry } => {
            let mut o = create_standard_object("Standard - Ellipse", cx - rx, cy - ry)?;
            o.set("elem_width", PropertyValue::Real(2.0 * rx));
            o.set("elem_height", PropertyValue::Real(2.0 * ry));
            o
        }
        ShapeKind::Line { x1, y1, x2, y2 } => {
            let mut o = create_standard_object("Standard - Line", *x1, *y1)?;
            o.set(
                "end_point",
                PropertyValue::Point(crate::geom::point(*x2, *y2)),
            );
            o
        }
        ShapeKind::Polyline { points } => {
            let first = points.first()?;
            let mut o = create_standard_object("Standard - PolyLine", first.x, first.y)?;
            o.set("poly_points", PropertyValue::Points(points.clone()));
            o
        }
        ShapeKind::Polygon { points } => {
            let first = points.first()?;
            let mut o = create_standard_object("Standard - Polygon", first.x, first.y)?;
            o.set("poly_points", PropertyValue::Points(points.clone()));
            o
        }
        ShapeKind::Path { commands } => {
            let start = commands.iter().find_map(|c| match c {
                PathCommand::MoveTo(p) => Some(*p),
                _ => None,
            })?;
            let type_name = if is_closed(commands) {
                "Standard - Beziergon"
            } else {
                "Standard - BezierLine"
            };
            let mut o = create_standard_object(type_name, start.x, start.y)?;
            // The bezier property carries drawing ops only; closedness is in
            // the object type.
            let ops: Vec<PathCommand> = commands
                .iter()
                .filter(|c| !matches!(c, PathCommand::Close))
                .copied()
                .collect();
            o.set("bez_points", PropertyValue::BezPoints(ops));
            o
        }
        ShapeKind::Text { x, y, content } => {
            if content.trim().is_empty() {
                return None;
            }
            let mut o = create_standard_object("Standard - Text", *x, *y)?;
            o.set("text", PropertyValue::Str(content.clone()));
            apply_text_style(&mut o, &shape.style);
            o
        }
        ShapeKind::Image {
            x,
            y,
            width,
            height,
            source,
            keep_aspect,
        } => {
            let source = source.as_ref()?;
            let mut o = create_standard_object("Standard - Image", *x, *y)?;
            o.set("elem_width", PropertyValue::Real(*width));
            o.set("elem_height", PropertyValue::Real(*height));
            o.set("keep_aspect", PropertyValue::Bool(*keep_aspect));
            match source {
                ImageSource::Uri(uri) => {
                    let file = uri.strip_prefix("file://").unwrap_or(uri);
                    o.set("image_file", PropertyValue::Str(file.to_string()));
                }
                ImageSource::Data(bytes) => {
                    o.set("image_data", PropertyValue::Binary(bytes.as_ref().clone()));
                }
            }
            o
        }
        ShapeKind::Group { children } => {
            let members: Vec<Object> = children.iter().filter_map(instantiate).collect();
            if members.is_empty() {
                return None;
            }
            let mut group = group_objects(members);
            apply_meta(&mut group, &shape.meta);
            // The grouping primitive takes no offset; the translation is
            // applied to the finished group.
            if let Some(delta) = shape.translation {
                group.translate(delta);
            }
            return Some(group);
        }
        ShapeKind::Unknown { tag } => {
            debug!(%tag, "skipping unknown element at instantiation");
            return None;
        }
    };

    apply_line_style(&mut object, &shape.style);
    apply_fill_style(&mut object, &shape.style);
    apply_meta(&mut object, &shape.meta);
    if let Some(delta) = shape.translation {
        object.translate(delta);
    }
    Some(object)
}

fn apply_line_style(object: &mut Object, style: &Style) {
    if let Some(width) = style.stroke_width {
        if object.has_property("line_width") {
            object.set("line_width", PropertyValue::Real(width));
        }
    }
    if object.has_property("line_colour") {
        match &style.stroke {
            Some(Paint::None) => {
                // The model cannot express an unstroked outline; fall back to
                // painting the outline in the fill color at zero width.
                if let Some(fill) = style.fill.as_ref().filter(|f| !f.is_none()) {
                    if let Some(rgb) = fill.resolve() {
                        object.set("line_colour", PropertyValue::Colour(rgb));
                    }
                }
                object.set("line_width", PropertyValue::Real(0.0));
            }
            Some(paint) => {
                if let Some(rgb) = paint.resolve() {
                    object.set("line_colour", PropertyValue::Colour(rgb));
                }
            }
            None => {}
        }
    }
    if let Some((line_style, dash_length)) = style.line_style {
        if object.has_property("line_style") {
            object.set(
                "line_style",
                PropertyValue::LineStyle(line_style, dash_length),
            );
        }
    }
    if let Some(cap) = style.cap {
        if object.has_property("line_caps") {
            object.set("line_caps", PropertyValue::Enum(cap.index()));
        }
    }
    if let Some(join) = style.join {
        if object.has_property("line_join") {
            object.set("line_join", PropertyValue::Enum(join.index()));
        }
    }
}

fn apply_fill_style(object: &mut Object, style: &Style) {
    let Some(fill) = &style.fill else {
        return;
    };
    if fill.is_none() {
        if object.has_property("show_background") {
            object.set("show_background", PropertyValue::Bool(false));
        }
        return;
    }
    if object.has_property("show_background") {
        object.set("show_background", PropertyValue::Bool(true));
    }
    if let Some(rgb) = fill.resolve() {
        // Some object kinds carry no fill of their own but do paint text.
        let key = if object.has_property("fill_colour") {
            "fill_colour"
        } else if object.has_property("text_colour") {
            "text_colour"
        } else {
            return;
        };
        object.set(key, PropertyValue::Colour(rgb));
    }
}

fn apply_text_style(object: &mut Object, style: &Style) {
    if let Some(anchor) = &style.text_anchor {
        let alignment = match anchor.as_str() {
            "middle" => 1,
            "end" => 2,
            _ => 0,
        };
        object.set("text_alignment", PropertyValue::Enum(alignment));
    }
    if let Some(size) = style.font_size {
        object.set("text_height", PropertyValue::Real(size));
    }
    if let Some(family) = &style.font_family {
        object.set("text_font", PropertyValue::Str(family.clone()));
    }
}

fn apply_meta(object: &mut Object, meta: &IndexMap<String, String>) {
    if meta.is_empty() {
        return;
    }
    if object.has_property("meta") {
        object.set("meta", PropertyValue::Meta(meta.clone()));
    }
}
