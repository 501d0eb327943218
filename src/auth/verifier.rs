// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token verification.
//!
//! Checks run in a fixed order, each with its own failure classification:
//!
//! 1. the token header decodes (`malformed_token`),
//! 2. the declared algorithm is in the allow-list (`disallowed_algorithm`),
//! 3. the header's key id resolves against the key set (`no_matching_key`),
//! 4. the signature verifies (`invalid_signature`),
//! 5. the claims pass issuer / audience / expiry validation
//!    (`invalid_issuer` / `invalid_audience` / `token_expired`).
//!
//! Verification has no side effects; the only I/O is the cached key-set
//! fetch inside [`JwksManager`].

use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;

use super::claims::AuthClaims;
use super::error::AuthError;
use super::jwks::JwksManager;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Raw JWT payload as issued.
#[derive(Debug, Deserialize)]
struct RawClaims {
    /// Subject (caller id)
    sub: String,
    /// Expiration timestamp
    #[serde(default)]
    exp: i64,
    /// Issuer
    #[serde(default)]
    iss: String,
    /// Audience (string or array; validated by the jsonwebtoken crate)
    #[serde(default)]
    aud: Option<serde_json::Value>,
    /// Capability strings granted by the issuer
    #[serde(default)]
    permissions: Option<Vec<String>>,
}

/// Token verifier over a configured key set, issuer, and audience.
///
/// Constructed once at startup and shared read-only across requests.
#[derive(Clone)]
pub struct TokenVerifier {
    keys: JwksManager,
    issuer: String,
    audience: Option<String>,
    algorithms: Vec<Algorithm>,
}

impl TokenVerifier {
    /// Create a verifier.
    ///
    /// `algorithms` is the signing-algorithm allow-list; a token whose
    /// header declares anything else is rejected before key lookup.
    pub fn new(
        keys: JwksManager,
        issuer: impl Into<String>,
        audience: Option<String>,
        algorithms: Vec<Algorithm>,
    ) -> Self {
        Self {
            keys,
            issuer: issuer.into(),
            audience,
            algorithms,
        }
    }

    /// The underlying key set manager (used by health checks).
    pub fn keys(&self) -> &JwksManager {
        &self.keys
    }

    /// Verify a raw bearer token and decode its claims.
    pub async fn verify(&self, token: &str) -> Result<AuthClaims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;

        if !self.algorithms.contains(&header.alg) {
            return Err(AuthError::DisallowedAlgorithm);
        }

        // A fixed issuer always sets kid; a token without one has no key to
        // match against.
        let kid = header.kid.as_deref().ok_or(AuthError::NoMatchingKey)?;
        let (decoding_key, _) = self.keys.decoding_key(kid).await?;

        let mut validation = Validation::new(header.alg);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.set_issuer(&[&self.issuer]);

        if let Some(ref audience) = self.audience {
            validation.set_audience(&[audience]);
        } else {
            validation.validate_aud = false;
        }

        let token_data =
            decode::<RawClaims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                jsonwebtoken::errors::ErrorKind::InvalidAudience => AuthError::InvalidAudience,
                jsonwebtoken::errors::ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
                jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => {
                    AuthError::DisallowedAlgorithm
                }
                jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(claim) => match claim.as_str()
                {
                    "iss" => AuthError::InvalidIssuer,
                    "aud" => AuthError::InvalidAudience,
                    _ => AuthError::MalformedToken,
                },
                _ => AuthError::MalformedToken,
            })?;

        let claims = token_data.claims;

        Ok(AuthClaims {
            sub: claims.sub,
            permissions: claims.permissions,
            issuer: claims.iss,
            audience: claims.aud,
            expires_at: claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use jsonwebtoken::jwk::JwkSet;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &[u8] = b"orders-up-test-secret";
    const KID: &str = "menu-key";
    const ISSUER: &str = "https://coffee.example.com/";
    const AUDIENCE: &str = "drinks";

    fn jwks() -> JwkSet {
        serde_json::from_value(serde_json::json!({
            "keys": [{
                "kty": "oct",
                "kid": KID,
                "alg": "HS256",
                "k": URL_SAFE_NO_PAD.encode(SECRET),
            }]
        }))
        .expect("valid JWK set")
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(
            JwksManager::from_set(jwks()),
            ISSUER,
            Some(AUDIENCE.to_string()),
            vec![Algorithm::HS256],
        )
    }

    fn now() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64
    }

    fn sign(claims: serde_json::Value) -> String {
        sign_with(claims, KID, SECRET)
    }

    fn sign_with(claims: serde_json::Value, kid: &str, secret: &[u8]) -> String {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(kid.to_string());
        encode(&header, &claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    fn valid_claims() -> serde_json::Value {
        serde_json::json!({
            "sub": "auth0|barista",
            "iss": ISSUER,
            "aud": AUDIENCE,
            "exp": now() + 3600,
            "permissions": ["get:drinks-detail", "post:drinks"],
        })
    }

    #[tokio::test]
    async fn valid_token_yields_claims() {
        let claims = verifier().verify(&sign(valid_claims())).await.unwrap();
        assert_eq!(claims.sub, "auth0|barista");
        assert_eq!(claims.issuer, ISSUER);
        assert!(claims.has_permission("post:drinks"));
        assert!(claims.expires_at > now());
    }

    #[tokio::test]
    async fn garbage_token_is_malformed() {
        let err = verifier().verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken));
    }

    #[tokio::test]
    async fn disallowed_algorithm_is_rejected_before_key_lookup() {
        // Verifier only allows RS256; the HS256 token never reaches the keys.
        let rs_only = TokenVerifier::new(
            JwksManager::from_set(jwks()),
            ISSUER,
            Some(AUDIENCE.to_string()),
            vec![Algorithm::RS256],
        );
        let err = rs_only.verify(&sign(valid_claims())).await.unwrap_err();
        assert!(matches!(err, AuthError::DisallowedAlgorithm));
    }

    #[tokio::test]
    async fn unknown_kid_is_no_matching_key() {
        let token = sign_with(valid_claims(), "retired-key", SECRET);
        let err = verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::NoMatchingKey));
    }

    #[tokio::test]
    async fn missing_kid_is_no_matching_key() {
        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, &valid_claims(), &EncodingKey::from_secret(SECRET)).unwrap();
        let err = verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::NoMatchingKey));
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid_signature() {
        let token = sign_with(valid_claims(), KID, b"some-other-secret");
        let err = verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let mut claims = valid_claims();
        claims["exp"] = serde_json::json!(now() - 3600);
        let err = verifier().verify(&sign(claims)).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn wrong_issuer_is_rejected() {
        let mut claims = valid_claims();
        claims["iss"] = serde_json::json!("https://intruder.example.com/");
        let err = verifier().verify(&sign(claims)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidIssuer));
    }

    #[tokio::test]
    async fn wrong_audience_is_rejected() {
        let mut claims = valid_claims();
        claims["aud"] = serde_json::json!("someone-else");
        let err = verifier().verify(&sign(claims)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidAudience));
    }

    #[tokio::test]
    async fn token_without_permissions_claim_decodes_with_none() {
        let mut claims = valid_claims();
        claims.as_object_mut().unwrap().remove("permissions");
        let decoded = verifier().verify(&sign(claims)).await.unwrap();
        assert!(decoded.permissions.is_none());
    }
}
