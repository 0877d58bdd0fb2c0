//! Engine error types
//!
//! The phonemization pipeline itself never fails: every resolution step is
//! part of an ordered fallback chain that terminates in a defined output.
//! Errors exist only for engine construction (malformed dictionary
//! resources, unknown locale).

use thiserror::Error;

/// Errors raised while constructing an engine
#[derive(Error, Debug)]
pub enum CoreError {
    /// Dictionary resource failed to parse
    #[error("dictionary parse error: {0}")]
    Dictionary(#[from] serde_json::Error),

    /// Unknown locale code
    #[error("locale '{code}' not supported")]
    UnsupportedLocale {
        /// The locale code that is not supported
        code: String,
    },

    /// I/O error while reading a resource
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine construction
pub type Result<T> = std::result::Result<T, CoreError>;
