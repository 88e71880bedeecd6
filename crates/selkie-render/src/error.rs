pub type Result<T> = std::result::Result<T, Error>;

/// Export failures are hard failures: there is no partial-success notion for
/// a single output file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
