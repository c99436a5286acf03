use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidCoordinate,
    InvalidAmount,
    InvalidRating,
    Unauthorized,
    ProviderNotEligible,
    InvalidState,
    NotFound,
    Validation,
    Internal,
}

impl ErrorKind {
    pub fn to_str(&self) -> &str {
        match self {
            ErrorKind::InvalidCoordinate => "InvalidCoordinate",
            ErrorKind::InvalidAmount => "InvalidAmount",
            ErrorKind::InvalidRating => "InvalidRating",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::ProviderNotEligible => "ProviderNotEligible",
            ErrorKind::InvalidState => "InvalidState",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Validation => "Validation",
            ErrorKind::Internal => "Internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Structured failure handed back to the request-handling layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ErrorResponse {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
