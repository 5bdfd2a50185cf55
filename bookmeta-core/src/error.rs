use thiserror::Error;

/// Errors from parsing catalog values into domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A date string did not have the `YYYY-MM-DD` shape or is out of range
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The catalog marks the date as unknown (`0000-00-00`, `unknown`, ...)
    #[error("Date is unknown")]
    UnknownDate,
}

impl CoreError {
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate(value.into())
    }
}
