use std::io;
use std::path::Path;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GeodexError>;

/// Errors surfaced by construction, ingest and the cache codec.
///
/// Query operations never return errors: an unmatchable input yields the
/// empty [`crate::CityRecord`] instead.
#[derive(Debug, thiserror::Error)]
pub enum GeodexError {
    /// Filesystem failure, wrapped with a short description of what was
    /// being done at the time ("creating cache directory: ...").
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// A data-set download failed.
    #[error("fetching data set: {0}")]
    Http(#[from] reqwest::Error),

    /// The cities archive could not be opened or walked.
    #[error("reading cities archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A cache blob failed to deserialize.
    #[error("decoding cache blob: {0}")]
    Decode(#[from] bincode::Error),

    /// A cache blob exists but does not carry the expected header.
    #[error("corrupt cache blob: {0}")]
    Corrupt(String),

    /// Bad directories, permissions or options.
    #[error("configuration: {0}")]
    Config(String),

    /// A loaded instance failed the minimum-count or fixture checks.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl GeodexError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        GeodexError::Io {
            context: context.into(),
            source,
        }
    }

    /// Io error mentioning the path involved.
    pub(crate) fn io_at(action: &str, path: &Path, source: io::Error) -> Self {
        GeodexError::Io {
            context: format!("{action} {}", path.display()),
            source,
        }
    }
}
