use std::path::PathBuf;

use shared::{
    domain::OrderId,
    error::{ApiError, ErrorCode, GENERIC_FAILURE},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session token is empty")]
    EmptyToken,
    #[error("token store failure at {}: {source}", .path.display())]
    Store {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid api base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("request rejected: {0}")]
    Rejected(#[from] ApiError),
    #[error("invalid request: {0}")]
    InvalidInput(String),
}

impl GatewayError {
    /// Message suitable for showing to the admin.
    ///
    /// Remote rejections surface the envelope message when present; transport
    /// and decoding failures collapse to the generic retry hint.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            GatewayError::Rejected(api) => api.message_or(fallback).to_string(),
            GatewayError::InvalidInput(reason) => reason.clone(),
            GatewayError::InvalidBaseUrl(_)
            | GatewayError::Transport(_)
            | GatewayError::Malformed(_) => GENERIC_FAILURE.to_string(),
        }
    }

    /// The API refused the bearer credential itself rather than the request.
    pub fn is_credential_rejected(&self) -> bool {
        matches!(
            self,
            GatewayError::Rejected(ApiError {
                code: ErrorCode::Unauthorized | ErrorCode::Forbidden,
                ..
            })
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("New password is required.")]
    Required,
    #[error("New password must be at least 8 characters.")]
    TooShort,
    #[error("New password must contain at least one uppercase letter.")]
    MissingUppercase,
    #[error("Passwords do not match.")]
    Mismatch,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please enter both username and password.")]
    MissingCredentials,
    #[error("Access denied. Only admins can log in.")]
    NotAdmin,
    #[error("User ID not found. Please log in again.")]
    MissingUserId,
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AuthError {
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AuthError::Gateway(err) => err.user_message(fallback),
            AuthError::Session(_) => GENERIC_FAILURE.to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("order {0} is not in the current list")]
    UnknownOrder(OrderId),
}
