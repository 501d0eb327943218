// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for verified claims.
//!
//! Use the `Auth` extractor in handlers to receive the caller's claims:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(claims): Auth) -> impl IntoResponse {
//!     // claims is AuthClaims
//! }
//! ```
//!
//! On guarded routes the guard middleware has already verified the token and
//! checked the route capability; the extractor just picks the claims out of
//! the request extensions. On routes without a guard it verifies the bearer
//! token itself (no capability check).

use axum::{extract::FromRequestParts, http::request::Parts};

use super::claims::AuthClaims;
use super::error::AuthError;
use super::guard::bearer_token;
use crate::state::AppState;

/// Extractor for the authenticated caller's claims.
pub struct Auth(pub AuthClaims);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // First check if the guard middleware already set the claims
        if let Some(claims) = parts.extensions.get::<AuthClaims>().cloned() {
            return Ok(Auth(claims));
        }

        let token = bearer_token(&parts.headers)?;
        let claims = state.auth.verify(token).await?;

        Ok(Auth(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::Request;
    use jsonwebtoken::jwk::JwkSet;
    use jsonwebtoken::Algorithm;
    use tempfile::TempDir;

    use crate::auth::jwks::JwksManager;
    use crate::auth::verifier::TokenVerifier;
    use crate::store::DrinkStore;

    fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store =
            DrinkStore::open(&dir.path().join("drinks.redb")).expect("Failed to open store");
        let jwks: JwkSet = serde_json::from_value(serde_json::json!({
            "keys": [{"kty": "oct", "kid": "menu-key", "alg": "HS256", "k": "c2VjcmV0"}]
        }))
        .unwrap();
        let verifier = TokenVerifier::new(
            JwksManager::from_set(jwks),
            "https://coffee.example.com/",
            None,
            vec![Algorithm::HS256],
        );
        (AppState::new(store, verifier), dir)
    }

    #[tokio::test]
    async fn extractor_requires_auth_header() {
        let (state, _dir) = test_state();
        let mut parts = Request::builder()
            .uri("/drinks-detail")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn extractor_prefers_claims_from_guard() {
        let (state, _dir) = test_state();
        let mut parts = Request::builder()
            .uri("/drinks-detail")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let claims = AuthClaims {
            sub: "auth0|from-guard".to_string(),
            permissions: Some(vec!["get:drinks-detail".to_string()]),
            issuer: "https://coffee.example.com/".to_string(),
            audience: None,
            expires_at: 0,
        };
        parts.extensions.insert(claims);

        let Auth(extracted) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(extracted.sub, "auth0|from-guard");
    }
}
