// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication protocol errors.
//!
//! Domain failures (unknown identity, stale challenge, bad signature) are
//! expected outcomes and travel as typed results through the whole request
//! path; only the transport mapping here turns them into status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::ChallengeDbError;

/// Authentication protocol error type.
#[derive(Debug)]
pub enum AuthError {
    /// The submitted address is not a valid 20-byte hex address
    InvalidAddress,
    /// No identity / no outstanding challenge for the address
    IdentityNotFound,
    /// The challenge freshness window has elapsed
    ChallengeExpired,
    /// The recovered signer does not match the claimed address
    SignatureMismatch,
    /// The signature could not be parsed or recovery failed
    MalformedSignature(String),
    /// Persistence layer failure (transaction rolled back)
    Storage(ChallengeDbError),
    /// Nonce generation or token signing failure
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    ///
    /// A malformed signature reports the same code as a mismatched one so a
    /// probing client cannot learn which check failed.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidAddress => "invalid_address",
            AuthError::IdentityNotFound => "identity_not_found",
            AuthError::ChallengeExpired => "challenge_expired",
            AuthError::SignatureMismatch | AuthError::MalformedSignature(_) => "invalid_signature",
            AuthError::Storage(_) => "storage_error",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidAddress => StatusCode::BAD_REQUEST,
            AuthError::IdentityNotFound
            | AuthError::ChallengeExpired
            | AuthError::SignatureMismatch
            | AuthError::MalformedSignature(_) => StatusCode::UNAUTHORIZED,
            AuthError::Storage(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing message for this error.
    ///
    /// Server-side failures deliberately collapse to a generic message;
    /// the detail stays in the log.
    fn client_message(&self) -> &'static str {
        match self {
            AuthError::InvalidAddress => "Invalid wallet address",
            AuthError::IdentityNotFound => "User not found",
            AuthError::ChallengeExpired => {
                "The challenge must have been generated within the last 5 minutes"
            }
            AuthError::SignatureMismatch | AuthError::MalformedSignature(_) => "Invalid signature",
            AuthError::Storage(_) | AuthError::Internal(_) => "Internal server error",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidAddress => write!(f, "invalid wallet address"),
            AuthError::IdentityNotFound => write!(f, "no outstanding challenge for address"),
            AuthError::ChallengeExpired => write!(f, "challenge freshness window elapsed"),
            AuthError::SignatureMismatch => write!(f, "recovered signer does not match address"),
            AuthError::MalformedSignature(msg) => write!(f, "malformed signature: {msg}"),
            AuthError::Storage(err) => write!(f, "storage failure: {err}"),
            AuthError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<ChallengeDbError> for AuthError {
    fn from(err: ChallengeDbError) -> Self {
        AuthError::Storage(err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, error_code = self.error_code(), "auth request failed");
        } else {
            tracing::debug!(error = %self, error_code = self.error_code(), "auth request rejected");
        }

        let body = Json(AuthErrorBody {
            error: self.client_message().to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
