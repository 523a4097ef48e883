//! Error types for the addrfmt-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the addrfmt library.
#[derive(Error, Debug)]
pub enum AddrError {
    /// The value handed to a constructor is neither free text nor a field object.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Locale data could not be loaded or understood.
    #[error("locale data error: {0}")]
    Data(#[from] DataError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while loading or compiling locale data.
///
/// None of these reach the caller of the parser or formatter: they are
/// logged and replaced by the next fallback level or the generic default.
#[derive(Error, Debug)]
pub enum DataError {
    /// A data file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data was read but does not have the expected shape.
    #[error("malformed {basename} data for {locale}: {reason}")]
    Malformed {
        basename: String,
        locale: String,
        reason: String,
    },

    /// A field rule carries a pattern that does not compile.
    #[error("invalid pattern for field {field}: {source}")]
    Pattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    /// A blocking lookup hit a key whose asynchronous load has not finished.
    #[error("{basename} data for {locale} is still loading")]
    Pending { basename: String, locale: String },
}

impl DataError {
    /// Build a [`DataError::Malformed`] from any displayable reason.
    pub fn malformed(basename: &str, locale: &str, reason: impl ToString) -> Self {
        Self::Malformed {
            basename: basename.to_string(),
            locale: locale.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error only means "not available yet".
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// Result type for the addrfmt library.
pub type Result<T> = std::result::Result<T, AddrError>;
