//! Core error types for the NeoMarket console.
//!
//! This module defines transport-agnostic error types. The HTTP client crate
//! converts reqwest failures and non-2xx responses into these variants so the
//! lifecycle controller can treat every gateway the same way.

use std::collections::BTreeMap;
use std::fmt;

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the console.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Form has invalid fields: {0}")]
    Form(FormErrors),

    /// The backend answered with a non-2xx status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Empty response from {0}")]
    EmptyResponse(String),

    #[error("No active session, sign in first")]
    Unauthenticated,

    #[error("Invalid configuration value: {0}")]
    Config(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True when the backend reported the resource as unknown.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { status: 404, .. })
    }

    /// True for failures that happened before anything reached the network.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::Form(_) | Error::Unauthenticated
        )
    }
}

/// Validation errors for user input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Field '{field}' must be a number, got '{value}'")]
    InvalidNumber { field: String, value: String },

    #[error("Field '{field}' must be greater than zero")]
    NonPositiveAmount { field: String },

    #[error("Field '{field}' cannot be negative")]
    NegativeAmount { field: String },

    #[error("Field '{field}' is not a valid date: {reason}")]
    InvalidDate { field: String, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ValidationError {
    /// Name of the form field this error belongs to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::MissingField(field) => Some(field),
            ValidationError::InvalidNumber { field, .. }
            | ValidationError::NonPositiveAmount { field }
            | ValidationError::NegativeAmount { field }
            | ValidationError::InvalidDate { field, .. } => Some(field),
            ValidationError::InvalidInput(_) => None,
        }
    }

    pub(crate) fn invalid_date(field: &str, err: ChronoParseError) -> Self {
        ValidationError::InvalidDate {
            field: field.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Per-field validation messages collected from a whole form submission.
///
/// Keys are the wire names of the fields so the presentation layer can show
/// each message next to its input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    fields: BTreeMap<String, ValidationError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error. The first error reported for a field wins.
    pub fn push(&mut self, err: ValidationError) {
        let key = err.field().unwrap_or("_form").to_string();
        self.fields.entry(key).or_insert(err);
    }

    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.fields.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidationError)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Converts the collected errors into a `Result`, failing if any were recorded.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Form(self))
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.fields.values().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Export(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Export(err.to_string())
    }
}
