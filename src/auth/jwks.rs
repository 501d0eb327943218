// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) loading and caching.
//!
//! The key set comes from one of two sources:
//!
//! - a remote JWKS endpoint, fetched via HTTPS and cached with a TTL, or
//! - static configuration (a JWK set parsed from a local file), which is
//!   loaded once and never refreshed.
//!
//! Either way the loaded keys are read-only for the process lifetime; there
//! is no invalidation beyond the remote cache TTL.

use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, KeyAlgorithm};
use jsonwebtoken::{Algorithm, DecodingKey};
use tokio::sync::RwLock;

use super::error::AuthError;

/// Default JWKS cache TTL (5 minutes).
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// JWKS cache entry.
struct CacheEntry {
    jwks: JwkSet,
    fetched_at: Instant,
}

/// Where the key set comes from.
enum KeySource {
    /// Remote JWKS endpoint, fetched lazily and cached.
    Remote { url: String, client: reqwest::Client },
    /// Fixed key set from static configuration.
    Static(JwkSet),
}

/// Key set manager.
///
/// Resolves a token header's key id to a decoding key, fetching and caching
/// the key set as needed.
#[derive(Clone)]
pub struct JwksManager {
    source: Arc<KeySource>,
    /// Cache TTL (remote source only)
    cache_ttl: Duration,
    /// Cached JWKS
    cache: Arc<RwLock<Option<CacheEntry>>>,
}

impl JwksManager {
    /// Create a manager that fetches the key set from a JWKS endpoint.
    pub fn from_url(jwks_url: impl Into<String>) -> Self {
        Self {
            source: Arc::new(KeySource::Remote {
                url: jwks_url.into(),
                client: reqwest::Client::builder()
                    .timeout(Duration::from_secs(10))
                    .build()
                    .expect("Failed to create HTTP client"),
            }),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a manager over a fixed key set.
    pub fn from_set(jwks: JwkSet) -> Self {
        Self {
            source: Arc::new(KeySource::Static(jwks)),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Create with custom cache TTL.
    #[allow(dead_code)]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Get the key set (with caching for the remote source).
    async fn get_jwks(&self) -> Result<JwkSet, AuthError> {
        let (url, client) = match &*self.source {
            KeySource::Static(jwks) => return Ok(jwks.clone()),
            KeySource::Remote { url, client } => (url, client),
        };

        // Check cache first
        {
            let cache = self.cache.read().await;
            if let Some(entry) = &*cache {
                if entry.fetched_at.elapsed() < self.cache_ttl {
                    return Ok(entry.jwks.clone());
                }
            }
        }

        // Fetch fresh JWKS
        let jwks = fetch_jwks(client, url).await?;

        // Update cache
        {
            let mut cache = self.cache.write().await;
            *cache = Some(CacheEntry {
                jwks: jwks.clone(),
                fetched_at: Instant::now(),
            });
        }

        Ok(jwks)
    }

    /// Get a decoding key for the given key id.
    pub async fn decoding_key(&self, kid: &str) -> Result<(DecodingKey, Algorithm), AuthError> {
        let jwks = self.get_jwks().await?;

        let jwk = jwks
            .keys
            .iter()
            .find(|k| k.common.key_id.as_deref() == Some(kid))
            .ok_or(AuthError::NoMatchingKey)?;

        jwk_to_decoding_key(jwk)
    }

    /// Force refresh the key set (no-op for a static source).
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let (url, client) = match &*self.source {
            KeySource::Static(_) => return Ok(()),
            KeySource::Remote { url, client } => (url, client),
        };

        let jwks = fetch_jwks(client, url).await?;
        let mut cache = self.cache.write().await;
        *cache = Some(CacheEntry {
            jwks,
            fetched_at: Instant::now(),
        });
        Ok(())
    }

    /// Check if keys are currently available without a fetch.
    pub async fn is_cached(&self) -> bool {
        if matches!(&*self.source, KeySource::Static(_)) {
            return true;
        }
        let cache = self.cache.read().await;
        if let Some(entry) = &*cache {
            entry.fetched_at.elapsed() < self.cache_ttl
        } else {
            false
        }
    }
}

/// Fetch a key set from the endpoint.
async fn fetch_jwks(client: &reqwest::Client, url: &str) -> Result<JwkSet, AuthError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AuthError::JwksFetchError(e.to_string()))?;

    if !response.status().is_success() {
        return Err(AuthError::JwksFetchError(format!(
            "HTTP {} from JWKS endpoint",
            response.status()
        )));
    }

    let jwks: JwkSet = response
        .json()
        .await
        .map_err(|e| AuthError::JwksFetchError(e.to_string()))?;

    Ok(jwks)
}

/// Convert a JWK to a DecodingKey.
fn jwk_to_decoding_key(jwk: &Jwk) -> Result<(DecodingKey, Algorithm), AuthError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => {
            let key = DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
                .map_err(|e| AuthError::InternalError(format!("Failed to create RSA key: {e}")))?;

            let alg = jwk
                .common
                .key_algorithm
                .map(|a| match a {
                    KeyAlgorithm::RS256 => Algorithm::RS256,
                    KeyAlgorithm::RS384 => Algorithm::RS384,
                    KeyAlgorithm::RS512 => Algorithm::RS512,
                    _ => Algorithm::RS256, // Default for RSA
                })
                .unwrap_or(Algorithm::RS256);

            Ok((key, alg))
        }
        AlgorithmParameters::EllipticCurve(ec) => {
            let key = DecodingKey::from_ec_components(&ec.x, &ec.y)
                .map_err(|e| AuthError::InternalError(format!("Failed to create EC key: {e}")))?;

            let alg = jwk
                .common
                .key_algorithm
                .map(|a| match a {
                    KeyAlgorithm::ES256 => Algorithm::ES256,
                    KeyAlgorithm::ES384 => Algorithm::ES384,
                    _ => Algorithm::ES256, // Default for EC
                })
                .unwrap_or(Algorithm::ES256);

            Ok((key, alg))
        }
        AlgorithmParameters::OctetKey(oct) => {
            // JWK `k` is base64url without padding
            let secret = URL_SAFE_NO_PAD
                .decode(oct.value.as_bytes())
                .map_err(|e| AuthError::InternalError(format!("Invalid oct key material: {e}")))?;
            let key = DecodingKey::from_secret(&secret);

            let alg = jwk
                .common
                .key_algorithm
                .map(|a| match a {
                    KeyAlgorithm::HS256 => Algorithm::HS256,
                    KeyAlgorithm::HS384 => Algorithm::HS384,
                    KeyAlgorithm::HS512 => Algorithm::HS512,
                    _ => Algorithm::HS256, // Default for oct
                })
                .unwrap_or(Algorithm::HS256);

            Ok((key, alg))
        }
        _ => Err(AuthError::InternalError(
            "Unsupported key type in JWKS".to_string(),
        )),
    }
}
