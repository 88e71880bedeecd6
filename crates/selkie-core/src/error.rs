use crate::path::PathError;
use crate::units::LengthError;

pub type Result<T> = std::result::Result<T, Error>;

/// Hard failures. Anything recoverable during an import (a bad attribute
/// value, an unsupported element) is collected as an [`crate::ImportIssue`]
/// instead and never surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("utf8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    #[error(transparent)]
    Length(#[from] LengthError),

    #[error(transparent)]
    Path(#[from] PathError),
}
