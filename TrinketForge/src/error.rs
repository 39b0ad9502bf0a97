//! Error types for `TrinketForge`

use std::path::PathBuf;

use thiserror::Error;

use crate::validate::Rejection;

/// The error type for `TrinketForge` operations.
///
/// Validation rejections are not errors: they live in [`Rejection`] and only
/// surface here once a bounded retry policy gives up.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error tied to a specific file.
    #[error("IO error on {path}: {source}")]
    FileIo {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    // ==================== Configuration / Reference Data ====================
    /// A reference-data file is missing or malformed. Fatal: no synthesis can
    /// proceed without the catalog.
    #[error("failed to load {path}: {message}")]
    ConfigLoad {
        /// The file that failed to load.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// TOML configuration parse error.
    #[error("config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    // ==================== Generation ====================
    /// The generation service could not be reached or answered with an error.
    #[error("generation request failed for {role}: {message}")]
    Generation {
        /// The generator role that issued the request.
        role: String,
        /// The transport or service error message.
        message: String,
    },

    /// A bounded retry loop ran out of attempts.
    #[error("no valid answer after {attempts} attempts (last rejection: {last_rejection})")]
    RetryExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The reason the final answer was rejected.
        last_rejection: Rejection,
    },

    // ==================== Assembly ====================
    /// A rarity tier has no price in the rarity table.
    #[error("rarity '{0}' has no price in the rarity table")]
    UnpricedRarity(String),

    /// The degrade policy is `abort` and the run produced degraded values.
    #[error("synthesis degraded ({count} issue(s)), first: {first}")]
    Degraded {
        /// Number of degradations collected.
        count: usize,
        /// Description of the first degradation.
        first: String,
    },

    // ==================== Parsing Errors ====================
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttrError(String),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttrError(err.to_string())
    }
}

impl Error {
    /// Wrap an IO error with the path it happened on.
    pub(crate) fn file_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileIo {
            path: path.into(),
            source,
        }
    }

    /// Build a [`Error::ConfigLoad`] for a reference-data file.
    pub(crate) fn config_load(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Error::ConfigLoad {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// A specialized Result type for `TrinketForge` operations.
pub type Result<T> = std::result::Result<T, Error>;
