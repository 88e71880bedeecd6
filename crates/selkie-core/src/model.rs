//! The diagram object model the importer populates and the exporter walks.
//!
//! This is a property-bag model: objects are identified by a type name from a
//! small registry (`"Standard - Box"`, `"Standard - Line"`, ...) and carry
//! typed properties keyed by string. Attribute application always goes
//! through [`Object::has_property`] first; object kinds differ in which
//! properties they support and a write to a property the type never seeded is
//! rejected rather than invented.

use crate::color::Rgb;
use crate::geom::{Point, Rect, Vector, bounds_of, point, rect};
use crate::path::PathCommand;
use crate::style::LineStyle;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Str(String),
    Real(f64),
    Int(i32),
    Bool(bool),
    Colour(Rgb),
    Point(Point),
    Points(Vec<Point>),
    BezPoints(Vec<PathCommand>),
    Enum(i32),
    LineStyle(LineStyle, f64),
    Meta(IndexMap<String, String>),
    Binary(Vec<u8>),
}

impl PropertyValue {
    pub fn as_real(&self) -> Option<f64> {
        match self {
            PropertyValue::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_colour(&self) -> Option<Rgb> {
        match self {
            PropertyValue::Colour(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            PropertyValue::Point(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<i32> {
        match self {
            PropertyValue::Enum(v) => Some(*v),
            _ => None,
        }
    }
}

/// One diagram object: a registry type name, a position and its properties.
/// `"Group"` objects additionally own their members.
#[derive(Debug, Clone)]
pub struct Object {
    type_name: String,
    pub position: Point,
    pub properties: IndexMap<String, PropertyValue>,
    pub children: Vec<Object>,
}

impl Object {
    fn new(type_name: &str, x: f64, y: f64) -> Self {
        Self {
            type_name: type_name.to_string(),
            position: point(x, y),
            properties: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Writes a property the object already carries. Returns false (and
    /// leaves the object untouched) when the type does not support it.
    pub fn set(&mut self, name: &str, value: PropertyValue) -> bool {
        match self.properties.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Moves the object and everything position-bearing it carries.
    pub fn translate(&mut self, delta: Vector) {
        self.position += delta;
        for value in self.properties.values_mut() {
            match value {
                PropertyValue::Point(p) => *p += delta,
                PropertyValue::Points(pts) => {
                    for p in pts {
                        *p += delta;
                    }
                }
                PropertyValue::BezPoints(cmds) => {
                    for cmd in cmds {
                        match cmd {
                            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => *p += delta,
                            PathCommand::CurveTo(c1, c2, p) => {
                                *c1 += delta;
                                *c2 += delta;
                                *p += delta;
                            }
                            PathCommand::Close => {}
                        }
                    }
                }
                _ => {}
            }
        }
        for child in &mut self.children {
            child.translate(delta);
        }
    }

    /// Coarse axis-aligned bounds, good enough for diagram extents. Curve
    /// control points are treated as on-curve.
    pub fn bounding_box(&self) -> Rect {
        match self.type_name.as_str() {
            "Group" => {
                let mut boxes = self.children.iter().map(Object::bounding_box);
                let Some(first) = boxes.next() else {
                    return rect(self.position.x, self.position.y, 0.0, 0.0);
                };
                boxes.fold(first, |acc, b| acc.union(&b))
            }
            "Standard - Line" => {
                let end = self
                    .get("end_point")
                    .and_then(PropertyValue::as_point)
                    .unwrap_or(self.position);
                bounds_of(&[self.position, end])
            }
            "Standard - PolyLine" | "Standard - Polygon" => match self.get("poly_points") {
                Some(PropertyValue::Points(pts)) if !pts.is_empty() => bounds_of(pts),
                _ => rect(self.position.x, self.position.y, 0.0, 0.0),
            },
            "Standard - BezierLine" | "Standard - Beziergon" => match self.get("bez_points") {
                Some(PropertyValue::BezPoints(cmds)) => {
                    let mut pts = Vec::new();
                    for cmd in cmds {
                        match cmd {
                            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => pts.push(*p),
                            PathCommand::CurveTo(c1, c2, p) => pts.extend([*c1, *c2, *p]),
                            PathCommand::Close => {}
                        }
                    }
                    if pts.is_empty() {
                        rect(self.position.x, self.position.y, 0.0, 0.0)
                    } else {
                        bounds_of(&pts)
                    }
                }
                _ => rect(self.position.x, self.position.y, 0.0, 0.0),
            },
            "Standard - Text" => {
                let height = self
                    .get("text_height")
                    .and_then(PropertyValue::as_real)
                    .unwrap_or(0.8);
                let text = self.get("text").and_then(PropertyValue::as_str).unwrap_or("");
                let lines = text.lines().count().max(1) as f64;
                let width = text
                    .lines()
                    .map(str::len)
                    .max()
                    .unwrap_or(0) as f64
                    * height
                    * 0.5;
                rect(self.position.x, self.position.y - height, width, height * lines)
            }
            _ => {
                let w = self
                    .get("elem_width")
                    .and_then(PropertyValue::as_real)
                    .unwrap_or(0.0);
                let h = self
                    .get("elem_height")
                    .and_then(PropertyValue::as_real)
                    .unwrap_or(0.0);
                rect(self.position.x, self.position.y, w, h)
            }
        }
    }
}

/// Creates an object of the named registry type at `(x, y)`, seeded with the
/// type's default properties. Unknown type names yield `None`.
pub fn create_standard_object(type_name: &str, x: f64, y: f64) -> Option<Object> {
    let mut o = Object::new(type_name, x, y);
    let p = &mut o.properties;
    // Properties shared by every creatable type.
    p.insert("meta".into(), PropertyValue::Meta(IndexMap::new()));
    match type_name {
        "Standard - Box" => {
            p.insert("elem_width".into(), PropertyValue::Real(1.0));
            p.insert("elem_height".into(), PropertyValue::Real(1.0));
            p.insert("corner_radius".into(), PropertyValue::Real(0.0));
            seed_stroke(p);
            seed_fill(p);
        }
        "Standard - Ellipse" => {
            p.insert("elem_width".into(), PropertyValue::Real(2.0));
            p.insert("elem_height".into(), PropertyValue::Real(2.0));
            seed_stroke(p);
            seed_fill(p);
        }
        "Standard - Line" => {
            p.insert("end_point".into(), PropertyValue::Point(point(x, y)));
            seed_stroke(p);
        }
        "Standard - PolyLine" => {
            p.insert("poly_points".into(), PropertyValue::Points(Vec::new()));
            seed_stroke(p);
        }
        "Standard - Polygon" => {
            p.insert("poly_points".into(), PropertyValue::Points(Vec::new()));
            seed_stroke(p);
            seed_fill(p);
        }
        "Standard - BezierLine" => {
            p.insert("bez_points".into(), PropertyValue::BezPoints(Vec::new()));
            seed_stroke(p);
        }
        "Standard - Beziergon" => {
            p.insert("bez_points".into(), PropertyValue::BezPoints(Vec::new()));
            seed_stroke(p);
            seed_fill(p);
        }
        "Standard - Arc" => {
            p.insert("elem_width".into(), PropertyValue::Real(2.0));
            p.insert("elem_height".into(), PropertyValue::Real(2.0));
            p.insert("arc_start_angle".into(), PropertyValue::Real(0.0));
            p.insert("arc_end_angle".into(), PropertyValue::Real(360.0));
            seed_stroke(p);
            seed_fill(p);
        }
        "Standard - Text" => {
            p.insert("text".into(), PropertyValue::Str(String::new()));
            p.insert("text_height".into(), PropertyValue::Real(0.8));
            p.insert("text_colour".into(), PropertyValue::Colour(Rgb::black()));
            p.insert("text_alignment".into(), PropertyValue::Enum(0));
            p.insert("text_font".into(), PropertyValue::Str("sans".into()));
        }
        "Standard - Image" => {
            p.insert("elem_width".into(), PropertyValue::Real(1.0));
            p.insert("elem_height".into(), PropertyValue::Real(1.0));
            p.insert("image_file".into(), PropertyValue::Str(String::new()));
            p.insert("image_data".into(), PropertyValue::Binary(Vec::new()));
            p.insert("keep_aspect".into(), PropertyValue::Bool(true));
            seed_stroke(p);
        }
        _ => return None,
    }
    Some(o)
}

fn seed_stroke(p: &mut IndexMap<String, PropertyValue>) {
    p.insert("line_width".into(), PropertyValue::Real(0.1));
    p.insert("line_colour".into(), PropertyValue::Colour(Rgb::black()));
    p.insert(
        "line_style".into(),
        PropertyValue::LineStyle(LineStyle::Solid, 1.0),
    );
    p.insert("line_caps".into(), PropertyValue::Enum(0));
    p.insert("line_join".into(), PropertyValue::Enum(0));
}

fn seed_fill(p: &mut IndexMap<String, PropertyValue>) {
    p.insert("fill_colour".into(), PropertyValue::Colour(Rgb::white()));
    p.insert("show_background".into(), PropertyValue::Bool(true));
}

/// Groups already-created objects into one `"Group"` object that owns them.
/// The group's position is the top-left of the members' joint bounds.
pub fn group_objects(members: Vec<Object>) -> Object {
    let mut bounds = members.iter().map(Object::bounding_box);
    let origin = bounds
        .next()
        .map(|first| {
            let joint = bounds.fold(first, |acc, b| acc.union(&b));
            joint.origin
        })
        .unwrap_or_else(Point::zero);
    let mut group = Object::new("Group", origin.x, origin.y);
    group
        .properties
        .insert("meta".into(), PropertyValue::Meta(IndexMap::new()));
    group.children = members;
    group
}

/// An ordered list of objects. Layers render bottom-up in diagram order.
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub visible: bool,
    objects: Vec<Object>,
}

impl Layer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            visible: true,
            objects: Vec::new(),
        }
    }

    pub fn add_object(&mut self, object: Object) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }
}

/// The diagram container: an ordered list of layers with one active layer the
/// importer appends to.
#[derive(Debug, Clone)]
pub struct Diagram {
    layers: Vec<Layer>,
    active: usize,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagram {
    pub fn new() -> Self {
        Self {
            layers: vec![Layer::new("Background")],
            active: 0,
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn active_layer_mut(&mut self) -> &mut Layer {
        &mut self.layers[self.active]
    }

    /// Appends a new layer (e.g. the import diagnostics layer) and returns it.
    pub fn add_layer(&mut self, name: &str) -> &mut Layer {
        let idx = self.layers.len();
        self.layers.push(Layer::new(name));
        &mut self.layers[idx]
    }

    pub fn object_count(&self) -> usize {
        self.layers.iter().map(|l| l.objects.len()).sum()
    }

    /// Union of all object bounds; the exporter's viewBox.
    pub fn extents(&self) -> Rect {
        let mut boxes = self
            .layers
            .iter()
            .flat_map(|l| l.objects.iter())
            .map(Object::bounding_box);
        let Some(first) = boxes.next() else {
            return Rect::zero();
        };
        boxes.fold(first, |acc, b| acc.union(&b))
    }
}
