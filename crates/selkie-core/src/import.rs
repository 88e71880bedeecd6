//! SVG import: XML events -> shape tree -> diagram objects.
//!
//! The tokenizer is `quick-xml`; everything element-shaped happens in
//! [`TreeBuilder`], a stack machine fed with start/characters/end callbacks.
//! Recoverable problems (a bad attribute value, an unsupported element) are
//! collected as [`ImportIssue`]s and surfaced as an `"Errors"` layer on the
//! resulting diagram; only an unreadable or ill-formed file aborts the call.

use crate::color::{Rgb, parse_color};
use crate::error::Result;
use crate::geom::{Point, point, vector};
use crate::instantiate::instantiate;
use crate::model::{Diagram, PropertyValue, create_standard_object};
use crate::path::parse_path;
use crate::shape::{ImageSource, Shape, ShapeKind};
use crate::style::{parse_dash_array, parse_line_cap, parse_line_join, split_style_declarations};
use crate::units::{Length, LengthUnit, UnitContext, parse_length};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use flate2::read::GzDecoder;
use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::io::Read as _;
use std::path::Path;
use std::str;
use std::sync::{Arc, OnceLock};
use tracing::debug;

const DATA_PNG_PREFIX: &str = "data:image/png;base64,";

/// One recovered import problem, reported on the diagnostics layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportIssue {
    pub element: String,
    /// Empty for element-level issues.
    pub attribute: String,
    pub value: String,
    pub message: String,
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attribute.is_empty() {
            write!(f, "<{}>: {}", self.element, self.message)
        } else {
            write!(
                f,
                "<{}> {}={:?}: {}",
                self.element, self.attribute, self.value, self.message
            )
        }
    }
}

enum Frame {
    /// The `<svg>` root; its attributes configure the unit context.
    Document,
    Shape(Shape),
    StyleSheet { cdata: String },
    Caption { tag: String, text: String },
    /// Passes character data through to the enclosing text.
    Tspan,
}

/// Stack machine mapping XML parse events onto a [`Shape`] tree.
pub struct TreeBuilder {
    ctx: UnitContext,
    stack: Vec<Frame>,
    shapes: Vec<Shape>,
    css: IndexMap<String, String>,
    issues: Vec<ImportIssue>,
    image_cache: HashMap<String, Arc<Vec<u8>>>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            ctx: UnitContext::new(),
            stack: Vec::new(),
            shapes: Vec::new(),
            css: IndexMap::new(),
            issues: Vec::new(),
            image_cache: HashMap::new(),
        }
    }

    pub fn context(&self) -> &UnitContext {
        &self.ctx
    }

    pub fn start_element(&mut self, raw_tag: &str, attrs: &IndexMap<String, String>) {
        let tag = local_tag(raw_tag);
        match tag.as_str() {
            "svg" => {
                self.configure_document(attrs);
                self.stack.push(Frame::Document);
            }
            "style" => {
                self.stack.push(Frame::StyleSheet {
                    cdata: String::new(),
                });
            }
            "desc" | "title" => {
                self.stack.push(Frame::Caption {
                    tag,
                    text: String::new(),
                });
            }
            "tspan" => {
                // The model has no rich text; a vertical shift becomes a new
                // line, a horizontal one a space.
                if attrs.contains_key("dy") {
                    self.characters("\n");
                } else if attrs.contains_key("dx") {
                    self.characters(" ");
                }
                self.stack.push(Frame::Tspan);
            }
            _ => {
                let kind = match tag.as_str() {
                    "g" => ShapeKind::Group {
                        children: Vec::new(),
                    },
                    "rect" => ShapeKind::Rect {
                        x: 0.0,
                        y: 0.0,
                        width: 1.0,
                        height: 1.0,
                        rx: 0.0,
                    },
                    "circle" | "ellipse" => ShapeKind::Ellipse {
                        cx: 0.0,
                        cy: 0.0,
                        rx: 1.0,
                        ry: 1.0,
                    },
                    "line" => ShapeKind::Line {
                        x1: 0.0,
                        y1: 0.0,
                        x2: 0.0,
                        y2: 0.0,
                    },
                    "polyline" => ShapeKind::Polyline { points: Vec::new() },
                    "polygon" => ShapeKind::Polygon { points: Vec::new() },
                    "path" => ShapeKind::Path {
                        commands: Vec::new(),
                    },
                    "text" => ShapeKind::Text {
                        x: 0.0,
                        y: 0.0,
                        content: String::new(),
                    },
                    "image" => ShapeKind::Image {
                        x: 0.0,
                        y: 0.0,
                        width: 1.0,
                        height: 1.0,
                        source: None,
                        keep_aspect: true,
                    },
                    other => {
                        self.issue(other, "", "", "unsupported element");
                        ShapeKind::Unknown {
                            tag: other.to_string(),
                        }
                    }
                };
                let mut shape = match self.enclosing_group() {
                    Some(parent) => Shape::inheriting(kind, parent),
                    None => Shape::new(kind),
                };
                for (name, value) in attrs {
                    self.apply_attribute(&mut shape, &tag, name, value);
                }
                self.stack.push(Frame::Shape(shape));
            }
        }
    }

    /// May be called multiple times per text node.
    pub fn characters(&mut self, text: &str) {
        for frame in self.stack.iter_mut().rev() {
            match frame {
                Frame::Shape(Shape {
                    kind: ShapeKind::Text { content, .. },
                    ..
                }) => {
                    content.push_str(text);
                    return;
                }
                Frame::StyleSheet { cdata } => {
                    cdata.push_str(text);
                    return;
                }
                Frame::Caption { text: sink, .. } => {
                    sink.push_str(text);
                    return;
                }
                Frame::Tspan => continue,
                _ => return,
            }
        }
    }

    pub fn end_element(&mut self, _raw_tag: &str) {
        match self.stack.pop() {
            Some(Frame::StyleSheet { cdata }) => self.parse_css(&cdata),
            Some(Frame::Caption { tag, text }) => {
                debug!(element = %tag, text = %text.trim(), "document caption");
            }
            Some(Frame::Shape(shape)) => self.attach(shape),
            Some(Frame::Document | Frame::Tspan) | None => {}
        }
    }

    pub fn finish(self) -> (Vec<Shape>, Vec<ImportIssue>) {
        (self.shapes, self.issues)
    }

    fn attach(&mut self, shape: Shape) {
        for frame in self.stack.iter_mut().rev() {
            if let Frame::Shape(Shape {
                kind: ShapeKind::Group { children },
                ..
            }) = frame
            {
                children.push(shape);
                return;
            }
        }
        self.shapes.push(shape);
    }

    fn enclosing_group(&self) -> Option<&Shape> {
        self.stack.iter().rev().find_map(|f| match f {
            Frame::Shape(s) if matches!(s.kind, ShapeKind::Group { .. }) => Some(s),
            _ => None,
        })
    }

    fn issue(&mut self, element: &str, attribute: &str, value: &str, message: impl ToString) {
        let issue = ImportIssue {
            element: element.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
            message: message.to_string(),
        };
        debug!(%issue, "recovered import problem");
        self.issues.push(issue);
    }

    /// Installs the document scale from the root element, in a fixed order so
    /// attribute order in the file cannot change the outcome.
    fn configure_document(&mut self, attrs: &IndexMap<String, String>) {
        // Absolute units resolve as usual; a raw number for the document size
        // gets a conservative provisional scale so oversized pixel documents
        // stay within a workable diagram size.
        let probe = UnitContext {
            user_scale: 0.05,
            ..self.ctx
        };
        let mut dimension = |name: &str| -> Option<f64> {
            let value = attrs.get(name)?;
            match parse_length(value, &probe) {
                Ok(v) => Some(v),
                Err(e) => {
                    self.issue("svg", name, value, e);
                    None
                }
            }
        };
        let width = dimension("width");
        let height = dimension("height");
        let view_box = attrs.get("viewBox").and_then(|value| {
            let parts: Vec<f64> = value
                .split([' ', ',', '\t', '\n'])
                .filter(|s| !s.is_empty())
                .filter_map(|s| s.parse().ok())
                .collect();
            match parts.as_slice() {
                [a, b, c, d] => Some([*a, *b, *c, *d]),
                _ => {
                    self.issue("svg", "viewBox", value, "expected four numbers");
                    None
                }
            }
        });
        self.ctx.set_document_extents(width, height, view_box);
        debug!(
            user_scale = self.ctx.user_scale,
            view_length = self.ctx.view_length,
            "document scale configured"
        );
    }

    /// Applies one attribute through the per-kind setter dispatch. Unknown
    /// names are retained as opaque metadata; malformed values are recorded
    /// and the field keeps its default.
    fn apply_attribute(&mut self, shape: &mut Shape, element: &str, name: &str, value: &str) {
        match name {
            // A style declaration is just a bundle of attributes.
            "style" => {
                let pairs: Vec<(String, String)> = split_style_declarations(value)
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                for (k, v) in pairs {
                    self.apply_attribute(shape, element, &k, &v);
                }
            }
            "class" => {
                if let Some(decls) = self.css.get(value.trim()).cloned() {
                    self.apply_attribute(shape, element, "style", &decls);
                }
                shape.meta.insert("class".into(), value.to_string());
            }
            "id" => {
                shape.meta.insert("id".into(), value.to_string());
            }
            "transform" => match parse_translate(value, &self.ctx) {
                Some((dx, dy)) => shape.translation = Some(vector(dx, dy)),
                None => {
                    shape.meta.insert("transform".into(), value.to_string());
                }
            },
            "stroke" => shape.style.stroke = Some(parse_color(value)),
            "fill" => shape.style.fill = Some(parse_color(value)),
            "stroke-width" => match parse_length(value, &self.ctx) {
                Ok(v) => shape.style.stroke_width = Some(v),
                Err(e) => self.issue(element, name, value, e),
            },
            "stroke-dasharray" => {
                shape.style.line_style = parse_dash_array(value, &self.ctx);
            }
            "stroke-linecap" => shape.style.cap = parse_line_cap(value),
            "stroke-linejoin" => shape.style.join = parse_line_join(value),
            "font-size" => match Length::parse(value) {
                Ok(len) => {
                    let size = len.resolve(&self.ctx);
                    // A relative font size must not feed back into the size
                    // it is relative to.
                    if !matches!(len.unit, LengthUnit::Em | LengthUnit::Ex) {
                        self.ctx.font_size = size;
                    }
                    shape.style.font_size = Some(size);
                }
                Err(e) => self.issue(element, name, value, e),
            },
            "font-family" => shape.style.font_family = Some(value.to_string()),
            "font-weight" => shape.style.font_weight = Some(value.to_string()),
            "font-style" => shape.style.font_style = Some(value.to_string()),
            "text-anchor" => shape.style.text_anchor = Some(value.to_string()),
            _ => self.apply_geometry_attribute(shape, element, name, value),
        }
    }

    fn apply_geometry_attribute(
        &mut self,
        shape: &mut Shape,
        element: &str,
        name: &str,
        value: &str,
    ) {
        let ctx = self.ctx;
        // Borrow dance: lengths that fail to parse leave the default in place
        // and only record an issue.
        macro_rules! set_len {
            ($target:expr) => {
                match parse_length(value, &ctx) {
                    Ok(v) => *$target = v,
                    Err(e) => self.issue(element, name, value, e),
                }
            };
        }
        match (&mut shape.kind, name) {
            (ShapeKind::Rect { x, .. }, "x") => set_len!(x),
            (ShapeKind::Rect { y, .. }, "y") => set_len!(y),
            (ShapeKind::Rect { width, .. }, "width") => set_len!(width),
            (ShapeKind::Rect { height, .. }, "height") => set_len!(height),
            (ShapeKind::Rect { rx, .. }, "rx") => set_len!(rx),
            (ShapeKind::Rect { rx, .. }, "ry") => {
                // ry only stands in when rx was not given.
                if *rx == 0.0 {
                    set_len!(rx)
                }
            }
            (ShapeKind::Ellipse { cx, .. }, "cx") => set_len!(cx),
            (ShapeKind::Ellipse { cy, .. }, "cy") => set_len!(cy),
            (ShapeKind::Ellipse { rx, .. }, "rx") => set_len!(rx),
            (ShapeKind::Ellipse { ry, .. }, "ry") => set_len!(ry),
            (ShapeKind::Ellipse { rx, ry, .. }, "r") => match parse_length(value, &ctx) {
                Ok(v) => {
                    *rx = v;
                    *ry = v;
                }
                Err(e) => self.issue(element, name, value, e),
            },
            (ShapeKind::Line { x1, .. }, "x1") => set_len!(x1),
            (ShapeKind::Line { y1, .. }, "y1") => set_len!(y1),
            (ShapeKind::Line { x2, .. }, "x2") => set_len!(x2),
            (ShapeKind::Line { y2, .. }, "y2") => set_len!(y2),
            (
                ShapeKind::Polyline { points } | ShapeKind::Polygon { points },
                "points",
            ) => *points = self.parse_points(value),
            (ShapeKind::Path { commands }, "d") => match parse_path(value) {
                Ok(parsed) => {
                    *commands = scale_commands(parsed, ctx.user_scale);
                }
                Err(e) => self.issue(element, name, value, e),
            },
            (ShapeKind::Text { x, .. }, "x") => set_len!(x),
            (ShapeKind::Text { y, .. }, "y") => set_len!(y),
            (ShapeKind::Image { x, .. }, "x") => set_len!(x),
            (ShapeKind::Image { y, .. }, "y") => set_len!(y),
            (ShapeKind::Image { width, .. }, "width") => set_len!(width),
            (ShapeKind::Image { height, .. }, "height") => set_len!(height),
            (ShapeKind::Image { source, .. }, "href" | "xlink:href") => {
                *source = self.parse_image_source(element, value);
            }
            (ShapeKind::Image { keep_aspect, .. }, "preserveAspectRatio") => {
                *keep_aspect = value.trim() != "none";
            }
            _ => {
                debug!(element, name, "attribute retained as metadata");
                shape.meta.insert(name.to_string(), value.to_string());
            }
        }
    }

    /// `x1,y1 x2,y2 ...`; malformed pairs are skipped.
    fn parse_points(&self, value: &str) -> Vec<Point> {
        let mut out = Vec::new();
        for token in value.split_whitespace() {
            let Some((sx, sy)) = token.split_once(',') else {
                continue;
            };
            let (Ok(x), Ok(y)) = (
                parse_length(sx, &self.ctx),
                parse_length(sy, &self.ctx),
            ) else {
                continue;
            };
            out.push(point(x, y));
        }
        out
    }

    fn parse_image_source(&mut self, element: &str, value: &str) -> Option<ImageSource> {
        if let Some(payload) = value.strip_prefix(DATA_PNG_PREFIX) {
            if let Some(cached) = self.image_cache.get(payload) {
                return Some(ImageSource::Data(Arc::clone(cached)));
            }
            let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
            return match BASE64.decode(compact) {
                Ok(bytes) => {
                    let data = Arc::new(bytes);
                    self.image_cache
                        .insert(payload.to_string(), Arc::clone(&data));
                    Some(ImageSource::Data(data))
                }
                Err(e) => {
                    self.issue(element, "xlink:href", "<data uri>", e);
                    None
                }
            };
        }
        if value.starts_with("file://") || !value.starts_with("data:") {
            return Some(ImageSource::Uri(value.to_string()));
        }
        debug!(element, "unsupported image data scheme");
        None
    }

    /// The beginnings of a stylesheet: only `.class { declarations }` blocks.
    fn parse_css(&mut self, cdata: &str) {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"\.([A-Za-z_][A-Za-z0-9_-]*)\s*\{([^}]*)\}").unwrap()
        });
        for caps in re.captures_iter(cdata) {
            let (name, decls) = (caps[1].to_string(), caps[2].trim().to_string());
            debug!(class = %name, %decls, "stylesheet class");
            self.css.insert(name, decls);
        }
    }
}

fn local_tag(raw: &str) -> String {
    let local = raw.rsplit(':').next().unwrap_or(raw);
    local.to_ascii_lowercase()
}

fn parse_translate(value: &str, ctx: &UnitContext) -> Option<(f64, f64)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE
        .get_or_init(|| Regex::new(r"^translate\s*\(\s*([^,\s]+)\s*[,\s]\s*([^)\s]+)\s*\)$").unwrap());
    let caps = re.captures(value.trim())?;
    let dx = parse_length(&caps[1], ctx).ok()?;
    let dy = parse_length(&caps[2], ctx).ok()?;
    Some((dx, dy))
}

fn scale_commands(
    commands: Vec<crate::path::PathCommand>,
    scale: f64,
) -> Vec<crate::path::PathCommand> {
    use crate::path::PathCommand;
    let s = |p: Point| point(p.x * scale, p.y * scale);
    commands
        .into_iter()
        .map(|cmd| match cmd {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(s(p)),
            PathCommand::LineTo(p) => PathCommand::LineTo(s(p)),
            PathCommand::CurveTo(c1, c2, p) => PathCommand::CurveTo(s(c1), s(c2), s(p)),
            PathCommand::Close => PathCommand::Close,
        })
        .collect()
}

/// Runs the XML tokenizer over a document and returns the raw shape tree plus
/// recovered issues. `import_svg_str` is the higher-level entry point; this
/// one exists for debugging dumps and tests.
pub fn parse_shapes(xml: &str) -> Result<(Vec<Shape>, Vec<ImportIssue>)> {
    let mut builder = TreeBuilder::new();
    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let tag = str::from_utf8(e.name().as_ref())?.to_string();
                let attrs = attrs_to_map(&e)?;
                builder.start_element(&tag, &attrs);
            }
            Event::Empty(e) => {
                let tag = str::from_utf8(e.name().as_ref())?.to_string();
                let attrs = attrs_to_map(&e)?;
                builder.start_element(&tag, &attrs);
                builder.end_element(&tag);
            }
            Event::Text(t) => {
                let text = t.decode()?;
                builder.characters(&unescape_entities(&text));
            }
            Event::CData(c) => {
                let text = c.decode()?;
                builder.characters(&text);
            }
            Event::End(e) => {
                let tag = str::from_utf8(e.name().as_ref())?.to_string();
                builder.end_element(&tag);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(builder.finish())
}

fn attrs_to_map(e: &BytesStart<'_>) -> Result<IndexMap<String, String>> {
    let mut out = IndexMap::new();
    for a in e.attributes() {
        let a = a?;
        let key = str::from_utf8(a.key.as_ref())?.to_string();
        let val = a.unescape_value()?.to_string();
        out.insert(key, val);
    }
    Ok(out)
}

/// Resolves the predefined XML entities and numeric character references in
/// text content. Unknown entities pass through untouched.
fn unescape_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    fn numeric(entity: &str) -> Option<char> {
        let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X"))
        {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            entity.strip_prefix('#')?.parse().ok()?
        };
        char::from_u32(code)
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let Some(end) = rest.find(';') else {
            break;
        };
        let entity = &rest[1..end];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => numeric(entity),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Imports a plain (or transparently gzip-compressed) SVG file.
pub fn import_svg(path: impl AsRef<Path>) -> Result<Diagram> {
    let bytes = std::fs::read(path)?;
    let xml = decode_input(&bytes)?;
    import_svg_str(&xml)
}

/// Imports a gzip-compressed SVG (`.svgz`) file.
pub fn import_svgz(path: impl AsRef<Path>) -> Result<Diagram> {
    import_svg(path)
}

/// Imports SVG text into a fresh diagram.
pub fn import_svg_str(xml: &str) -> Result<Diagram> {
    let (shapes, issues) = parse_shapes(xml)?;
    let mut diagram = Diagram::new();
    for shape in &shapes {
        if let Some(object) = instantiate(shape) {
            diagram.active_layer_mut().add_object(object);
        }
    }
    if !issues.is_empty() {
        attach_issue_layer(&mut diagram, &issues);
    }
    Ok(diagram)
}

fn decode_input(bytes: &[u8]) -> Result<String> {
    if bytes.starts_with(&[0x1f, 0x8b]) {
        let mut xml = String::new();
        GzDecoder::new(bytes).read_to_string(&mut xml)?;
        Ok(xml)
    } else {
        Ok(str::from_utf8(bytes)?.to_string())
    }
}

/// The partially-imported document stays usable; problems land on a separate
/// layer the user can delete or hide.
fn attach_issue_layer(diagram: &mut Diagram, issues: &[ImportIssue]) {
    use std::fmt::Write as _;
    let mut text =
        String::from("To hide the error messages delete or disable the 'Errors' layer\n");
    for issue in issues {
        let _ = writeln!(text, "{issue}");
    }
    let Some(mut object) = create_standard_object("Standard - Text", 0.0, 1.0) else {
        return;
    };
    object.set("text", PropertyValue::Str(text));
    object.set(
        "text_colour",
        PropertyValue::Colour(Rgb::new(1.0, 0.0, 0.0)),
    );
    diagram.add_layer("Errors").add_object(object);
}
