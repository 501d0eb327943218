// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-route authentication guard.
//!
//! Routes that declare a required capability are wrapped with
//! [`require_permission`] via `axum::middleware::from_fn_with_state`. The
//! guard extracts the bearer token, verifies it, checks the capability, and
//! either places the decoded [`AuthClaims`] in the request extensions for
//! the handler or short-circuits with a classified error response. Auth
//! failures are never retried; the caller must resubmit with a corrected
//! token.
//!
//! The [`authorize`] step is a plain function over the header map, so the
//! whole pipeline is unit-testable without a router.

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::claims::AuthClaims;
use super::error::AuthError;
use super::permissions;
use crate::state::AppState;

/// Extract the bearer token from the `Authorization` header.
///
/// The header must consist of exactly two whitespace-separated parts with a
/// `Bearer` scheme (case-insensitive).
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let mut parts = header.split_whitespace();
    let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) => (scheme, token),
        _ => return Err(AuthError::InvalidAuthHeader),
    };

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok(token)
}

/// Run the full guard pipeline: extract, verify, check permission.
pub async fn authorize(
    state: &AppState,
    permission: &str,
    headers: &HeaderMap,
) -> Result<AuthClaims, AuthError> {
    let token = bearer_token(headers)?;
    let claims = state.auth.verify(token).await?;
    permissions::check(&claims, permission)?;
    Ok(claims)
}

/// Middleware body wrapping a single route with a required capability.
pub async fn require_permission(
    state: AppState,
    permission: &'static str,
    mut request: Request,
    next: Next,
) -> Response {
    match authorize(&state, permission, request.headers()).await {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(
                code = err.error_code(),
                required = permission,
                "request rejected by auth guard"
            );
            err.into_response()
        }
    }
}
