#![forbid(unsafe_code)]

//! SVG export for the selkie diagram model.
//!
//! The [`DiagramRenderer`] trait is the contract: a traversal brackets the
//! export with `begin_render`/`end_render` and issues one call per primitive,
//! with latest-wins state setters in between. [`SvgRenderer`] serializes that
//! stream as an SVG document, the compressed variant pipes the same bytes
//! through gzip, and [`export`] contains the walker that drives a renderer
//! from a [`selkie_core::Diagram`].

pub mod error;
pub mod export;
pub mod renderer;
pub mod svg;
pub mod svgz;

pub use error::{Error, Result};
pub use export::{export_svg, export_svgz, render_diagram, render_to_string};
pub use renderer::{Alignment, DiagramRenderer, FillStyle, Font, FontSlant};
pub use svg::SvgRenderer;
pub use svgz::SvgzRenderer;
