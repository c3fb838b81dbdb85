//! Error types surfaced by the leave-type client core.

use thiserror::Error;

/// A failed call against the leave-type API.
///
/// `message` is the human-readable text the server supplied, if any. Callers
/// that show the error to a user fall back to their own wording when it is
/// absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.describe())]
pub struct RequestError {
    pub status: Option<u16>,
    pub message: Option<String>,
}

impl RequestError {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: Some(message.into()),
        }
    }

    pub fn without_message() -> Self {
        Self {
            status: None,
            message: None,
        }
    }

    pub fn status(status: u16, message: Option<String>) -> Self {
        Self {
            status: Some(status),
            message,
        }
    }

    /// The server message, or `fallback` when there is none.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    fn describe(&self) -> String {
        match (self.status, self.message.as_deref()) {
            (Some(status), Some(message)) => format!("request failed ({status}): {message}"),
            (Some(status), None) => format!("request failed with status {status}"),
            (None, Some(message)) => format!("request failed: {message}"),
            (None, None) => "request failed".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
        }
    }
}

/// Local form validation failure. Never reaches the network and is rendered
/// next to the offending field rather than as a toast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: FormField,
    pub message: String,
}

impl ValidationError {
    pub fn name_required() -> Self {
        Self {
            field: FormField::Name,
            message: "Name is required".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("dialog is not open")]
    NotOpen,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Request(#[from] RequestError),
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
