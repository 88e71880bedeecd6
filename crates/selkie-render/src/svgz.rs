//! Gzip-compressed SVG output.
//!
//! The compressed variant is the plain [`SvgRenderer`] writing through a gzip
//! encoder; no drawing logic lives here. The stream footer is written by
//! [`finish`], which must run after `end_render`.

use crate::error::Result;
use crate::svg::SvgRenderer;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::Path;

pub type SvgzRenderer = SvgRenderer<GzEncoder<BufWriter<File>>>;

/// Opens `path` for gzip-compressed SVG output.
pub fn create(path: impl AsRef<Path>) -> Result<SvgzRenderer> {
    let file = File::create(path)?;
    Ok(SvgRenderer::new(GzEncoder::new(
        BufWriter::new(file),
        Compression::default(),
    )))
}

/// Finishes the compression stream and the underlying file.
pub fn finish(renderer: SvgzRenderer) -> Result<()> {
    renderer.into_inner().finish()?.flush()?;
    Ok(())
}
