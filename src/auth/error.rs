// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Classified authentication failure.
///
/// Each variant corresponds to one check in the bearer-extraction /
/// verification / permission pipeline, so callers can tell exactly which
/// stage rejected the request.
#[derive(Debug)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Authorization header is not of the form `Bearer <token>`
    InvalidAuthHeader,
    /// Token is malformed (not a decodable JWT)
    MalformedToken,
    /// Token header declares an algorithm outside the allow-list
    DisallowedAlgorithm,
    /// Token header's key id does not match any key in the loaded set
    NoMatchingKey,
    /// Token signature is invalid
    InvalidSignature,
    /// Token has expired
    TokenExpired,
    /// Token is not yet valid
    TokenNotYetValid,
    /// Token issuer is invalid
    InvalidIssuer,
    /// Token audience is invalid
    InvalidAudience,
    /// Token carries no permissions claim at all (issuer misconfiguration)
    MissingPermissionsClaim,
    /// Permissions claim does not contain the required capability
    PermissionDenied,
    /// JWKS fetch failed
    JwksFetchError(String),
    /// Internal error
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    success: bool,
    error: u16,
    code: String,
    message: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::DisallowedAlgorithm => "disallowed_algorithm",
            AuthError::NoMatchingKey => "no_matching_key",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenNotYetValid => "token_not_yet_valid",
            AuthError::InvalidIssuer => "invalid_issuer",
            AuthError::InvalidAudience => "invalid_audience",
            AuthError::MissingPermissionsClaim => "missing_permissions_claim",
            AuthError::PermissionDenied => "permission_denied",
            AuthError::JwksFetchError(_) => "jwks_fetch_error",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    ///
    /// A missing permissions claim is a 400: the token was issued without
    /// the claim entirely, which points at misconfigured token issuance
    /// rather than an unauthorized caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::MalformedToken
            | AuthError::DisallowedAlgorithm
            | AuthError::NoMatchingKey
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::TokenNotYetValid
            | AuthError::InvalidIssuer
            | AuthError::InvalidAudience
            | AuthError::PermissionDenied => StatusCode::UNAUTHORIZED,
            AuthError::MissingPermissionsClaim => StatusCode::BAD_REQUEST,
            AuthError::JwksFetchError(_) | AuthError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::DisallowedAlgorithm => {
                write!(f, "Token is signed with a disallowed algorithm")
            }
            AuthError::NoMatchingKey => write!(f, "No matching key found in the key set"),
            AuthError::InvalidSignature => write!(f, "Token signature is invalid"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::TokenNotYetValid => write!(f, "Token is not yet valid"),
            AuthError::InvalidIssuer => write!(f, "Token issuer is invalid"),
            AuthError::InvalidAudience => write!(f, "Token audience is invalid"),
            AuthError::MissingPermissionsClaim => {
                write!(f, "Token does not include a permissions claim")
            }
            AuthError::PermissionDenied => {
                write!(f, "Permission not found in token")
            }
            AuthError::JwksFetchError(msg) => write!(f, "Failed to fetch key set: {msg}"),
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            success: false,
            error: status.as_u16(),
            code: self.error_code().to_string(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}
