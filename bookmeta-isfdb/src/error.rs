/// Errors that abort an identification attempt or a cover download.
#[derive(Debug, thiserror::Error)]
pub enum IsfdbError {
    #[error("Insufficient metadata to construct a query")]
    InsufficientMetadata,

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("No matches found at {url}")]
    NotFound { url: String },

    #[error("Failed to parse ISFDB page: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IsfdbError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True when the underlying request gave up waiting for the server.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}

/// A single detail-page field that could not be extracted.
///
/// Field errors are logged and degrade only the field they describe; they
/// never abort a worker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{0} not found on page")]
    Missing(&'static str),

    #[error("invalid {field}: {value:?}")]
    Invalid { field: &'static str, value: String },
}

impl FieldError {
    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            value: value.into(),
        }
    }
}
