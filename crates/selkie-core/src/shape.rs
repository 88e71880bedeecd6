//! The intermediate shape tree built by the importer.
//!
//! Shape nodes live only for the duration of one import call: the element
//! mapper builds them, the instantiator converts them into diagram objects,
//! and the tree is dropped. Geometry is always in internal centimeters; no
//! unit-suffixed text survives past parsing.

use crate::color::Paint;
use crate::geom::{Point, Vector};
use crate::path::PathCommand;
use crate::style::Style;
use indexmap::IndexMap;
use std::sync::Arc;

/// Where an `<image>` gets its pixels from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// A `file:///` (or other) URI reference.
    Uri(String),
    /// Decoded inline `data:` payload, shared between duplicate occurrences
    /// within one import call.
    Data(Arc<Vec<u8>>),
}

#[derive(Debug, Clone)]
pub enum ShapeKind {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rx: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Polyline {
        points: Vec<Point>,
    },
    Polygon {
        points: Vec<Point>,
    },
    Path {
        commands: Vec<PathCommand>,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        source: Option<ImageSource>,
        keep_aspect: bool,
    },
    Group {
        children: Vec<Shape>,
    },
    /// Unrecognized element; kept for diagnostics, never instantiated.
    Unknown {
        tag: String,
    },
}

/// One importable vector primitive with its resolved style, optional
/// translation and opaque metadata (id, url, unrecognized attributes).
#[derive(Debug, Clone)]
pub struct Shape {
    pub kind: ShapeKind,
    pub style: Style,
    pub translation: Option<Vector>,
    pub meta: IndexMap<String, String>,
}

impl Shape {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            style: Style::default(),
            translation: None,
            meta: IndexMap::new(),
        }
    }

    /// Like [`Shape::new`] but starting from an enclosing group's already-set
    /// style, the explicit copy-down step groups perform for their children.
    pub fn inheriting(kind: ShapeKind, parent: &Shape) -> Self {
        Self {
            kind,
            style: parent.style.clone(),
            translation: None,
            meta: IndexMap::new(),
        }
    }

    pub fn tag_name(&self) -> &str {
        match &self.kind {
            ShapeKind::Rect { .. } => "rect",
            ShapeKind::Ellipse { .. } => "ellipse",
            ShapeKind::Line { .. } => "line",
            ShapeKind::Polyline { .. } => "polyline",
            ShapeKind::Polygon { .. } => "polygon",
            ShapeKind::Path { .. } => "path",
            ShapeKind::Text { .. } => "text",
            ShapeKind::Image { .. } => "image",
            ShapeKind::Group { .. } => "g",
            ShapeKind::Unknown { tag } => tag,
        }
    }

    /// Debug dump of the subtree, one node per line.
    pub fn dump(&self, indent: usize, out: &mut String) {
        use std::fmt::Write as _;
        let _ = writeln!(
            out,
            "{:indent$}{} style={:?} translation={:?} meta={:?}",
            "",
            self.describe(),
            self.style,
            self.translation,
            self.meta,
            indent = indent * 2
        );
        if let ShapeKind::Group { children } = &self.kind {
            for child in children {
                child.dump(indent + 1, out);
            }
        }
    }

    fn describe(&self) -> String {
        match &self.kind {
            ShapeKind::Rect {
                x,
                y,
                width,
                height,
                rx,
            } => format!("rect x={x} y={y} w={width} h={height} rx={rx}"),
            ShapeKind::Ellipse { cx, cy, rx, ry } => {
                format!("ellipse cx={cx} cy={cy} rx={rx} ry={ry}")
            }
            ShapeKind::Line { x1, y1, x2, y2 } => format!("line ({x1},{y1})-({x2},{y2})"),
            ShapeKind::Polyline { points } => format!("polyline n={}", points.len()),
            ShapeKind::Polygon { points } => format!("polygon n={}", points.len()),
            ShapeKind::Path { commands } => format!("path n={}", commands.len()),
            ShapeKind::Text { x, y, content } => format!("text ({x},{y}) {content:?}"),
            ShapeKind::Image {
                x,
                y,
                width,
                height,
                source,
                ..
            } => format!(
                "image ({x},{y}) {width}x{height} source={}",
                match source {
                    Some(ImageSource::Uri(u)) => u.clone(),
                    Some(ImageSource::Data(d)) => format!("<{} bytes>", d.len()),
                    None => "none".to_string(),
                }
            ),
            ShapeKind::Group { children } => format!("g children={}", children.len()),
            ShapeKind::Unknown { tag } => format!("unknown <{tag}>"),
        }
    }
}
