use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::Envelope;

pub const GENERIC_FAILURE: &str = "An error occurred. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    Internal,
}

impl ErrorCode {
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::NotFound,
            400 | 409 | 422 => ErrorCode::Validation,
            _ => ErrorCode::Internal,
        }
    }
}

/// Application-level rejection reported by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:?}: {}", .message.as_deref().unwrap_or("request rejected"))]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: Option<String>) -> Self {
        Self { code, message }
    }

    /// Builds the rejection from an envelope that did not report success.
    pub fn from_envelope<T>(code: ErrorCode, envelope: &Envelope<T>) -> Self {
        Self {
            code,
            message: envelope
                .message
                .as_ref()
                .filter(|m| !m.trim().is_empty())
                .cloned(),
        }
    }

    /// Envelope message when present, otherwise `fallback`.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}
