//! Error types exposed by the filter library.
//!
//! Filtering itself never fails: absent fields simply do not match. These
//! errors cover the edges around it, such as loading records, parsing the
//! navigation URL, and rendering tag markup.

use thiserror::Error;

/// Errors surfaced while loading inputs or rendering filter output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The navigation URL could not be parsed.
    #[error("navigation URL is invalid: {message}")]
    InvalidUrl {
        /// Parser detail for the rejected URL.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// A record collection did not have the expected JSON shape.
    #[error("record data is malformed: {message}")]
    RecordFormat {
        /// Description of the offending input.
        message: String,
    },

    /// Tag markup could not be rendered.
    #[error("template error: {message}")]
    Template {
        /// Details reported by the template engine.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

impl From<url::ParseError> for FilterError {
    fn from(error: url::ParseError) -> Self {
        Self::InvalidUrl {
            message: error.to_string(),
        }
    }
}

impl From<minijinja::Error> for FilterError {
    fn from(error: minijinja::Error) -> Self {
        Self::Template {
            message: error.to_string(),
        }
    }
}
