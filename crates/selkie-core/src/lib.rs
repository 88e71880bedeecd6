#![forbid(unsafe_code)]

//! SVG subset importer + diagram object model (headless).
//!
//! Design goals:
//! - bidirectional fidelity with the companion `selkie-render` exporter
//!   ("none" paints, dash styles and metadata survive a round-trip)
//! - recoverable parsing: a broken attribute or unknown element never aborts
//!   an import, it lands on a diagnostics layer instead
//! - no global parse state; every call gets its own unit context

pub mod color;
pub mod error;
pub mod geom;
pub mod import;
pub mod instantiate;
pub mod model;
pub mod path;
pub mod shape;
pub mod style;
pub mod units;

pub use color::{Paint, Rgb, parse_color};
pub use error::{Error, Result};
pub use import::{
    ImportIssue, TreeBuilder, import_svg, import_svg_str, import_svgz, parse_shapes,
};
pub use instantiate::instantiate;
pub use model::{Diagram, Layer, Object, PropertyValue, create_standard_object};
pub use path::{PathCommand, PathError, parse_path, write_path};
pub use shape::{Shape, ShapeKind};
pub use style::{LineCap, LineJoin, LineStyle, Style};
pub use units::{Length, LengthError, LengthUnit, UnitContext, parse_length};

#[cfg(test)]
mod tests;
