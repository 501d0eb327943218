// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified JWT claims.

use serde::{Deserialize, Serialize};

/// Claims extracted from a verified bearer token.
///
/// Constructed fresh per request by the token verifier and discarded at the
/// end of the request; never persisted. The permission list mirrors the
/// `permissions` claim emitted by the token issuer: `None` means the claim
/// was absent from the token (distinct from an empty list).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Subject (opaque caller identifier).
    pub sub: String,

    /// Capability strings granted to the caller, if the claim was present.
    pub permissions: Option<Vec<String>>,

    /// Token issuer.
    pub issuer: String,

    /// Token audience as issued (a string or an array of strings).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<serde_json::Value>,

    /// Token expiration (Unix timestamp).
    pub expires_at: i64,
}

impl AuthClaims {
    /// Check whether the permissions claim contains the exact capability.
    ///
    /// Matching is case-sensitive with no wildcard or hierarchy semantics.
    /// Returns `false` when the claim is absent; use
    /// [`crate::auth::permissions::check`] to distinguish that case.
    pub fn has_permission(&self, required: &str) -> bool {
        self.permissions
            .as_deref()
            .is_some_and(|permissions| permissions.iter().any(|p| p == required))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn barista_claims() -> AuthClaims {
        AuthClaims {
            sub: "auth0|barista".to_string(),
            permissions: Some(vec![
                "get:drinks-detail".to_string(),
                "post:drinks".to_string(),
            ]),
            issuer: "https://coffee.example.com/".to_string(),
            audience: Some(serde_json::Value::String("drinks".to_string())),
            expires_at: 1_700_003_600,
        }
    }

    #[test]
    fn has_permission_matches_exact_strings() {
        let claims = barista_claims();
        assert!(claims.has_permission("post:drinks"));
        assert!(!claims.has_permission("delete:drinks"));
    }

    #[test]
    fn has_permission_is_case_sensitive() {
        let claims = barista_claims();
        assert!(!claims.has_permission("POST:drinks"));
        assert!(!claims.has_permission("post:Drinks"));
    }

    #[test]
    fn absent_claim_grants_nothing() {
        let mut claims = barista_claims();
        claims.permissions = None;
        assert!(!claims.has_permission("post:drinks"));
    }
}
