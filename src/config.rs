// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and the startup settings
//! loader. Configuration is read from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Directory for the embedded drink store | `./data` |
//! | `DB_RESET` | Set to `1` to drop and recreate the store at startup | unset |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `AUTH_JWKS_URL` | JWKS endpoint for signing keys | one of URL/file required |
//! | `AUTH_JWKS_FILE` | Path to a static JWK set file | one of URL/file required |
//! | `AUTH_ISSUER` | Expected JWT issuer claim | Required |
//! | `AUTH_AUDIENCE` | Expected JWT audience claim | Optional |
//! | `AUTH_ALGORITHMS` | Comma-separated signing-algorithm allow-list | `RS256` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;

use jsonwebtoken::Algorithm;

/// Environment variable name for the drink store directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";
/// Environment variable requesting a drop/create reset at startup.
pub const DB_RESET_ENV: &str = "DB_RESET";
/// Environment variable name for the bind address.
pub const HOST_ENV: &str = "HOST";
/// Environment variable name for the bind port.
pub const PORT_ENV: &str = "PORT";
/// Environment variable name for the JWKS endpoint URL.
pub const JWKS_URL_ENV: &str = "AUTH_JWKS_URL";
/// Environment variable name for a static JWK set file path.
pub const JWKS_FILE_ENV: &str = "AUTH_JWKS_FILE";
/// Environment variable name for the expected token issuer.
pub const ISSUER_ENV: &str = "AUTH_ISSUER";
/// Environment variable name for the expected token audience.
pub const AUDIENCE_ENV: &str = "AUTH_AUDIENCE";
/// Environment variable name for the signing-algorithm allow-list.
pub const ALGORITHMS_ENV: &str = "AUTH_ALGORITHMS";
/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("either {JWKS_URL_ENV} or {JWKS_FILE_ENV} must be set")]
    MissingKeySource,

    #[error("invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

/// Where the signing key set is loaded from.
#[derive(Debug, Clone)]
pub enum KeySetSource {
    /// Remote JWKS endpoint.
    Url(String),
    /// Static JWK set file.
    File(PathBuf),
}

/// Startup settings, loaded once from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub reset_store: bool,
    pub key_source: KeySetSource,
    pub issuer: String,
    pub audience: Option<String>,
    pub algorithms: Vec<Algorithm>,
}

impl Settings {
    /// Load settings from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var(PORT_ENV) {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
                var: PORT_ENV,
                reason: format!("not a port number: {raw}"),
            })?,
            Err(_) => 8080,
        };

        let data_dir = env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let reset_store = env::var(DB_RESET_ENV).as_deref() == Ok("1");

        let key_source = match (env::var(JWKS_URL_ENV), env::var(JWKS_FILE_ENV)) {
            (Ok(url), _) => KeySetSource::Url(url),
            (_, Ok(path)) => KeySetSource::File(PathBuf::from(path)),
            _ => return Err(ConfigError::MissingKeySource),
        };

        let issuer = env::var(ISSUER_ENV).map_err(|_| ConfigError::MissingVar(ISSUER_ENV))?;
        let audience = env::var(AUDIENCE_ENV).ok();
        let algorithms = parse_algorithms(
            &env::var(ALGORITHMS_ENV).unwrap_or_else(|_| "RS256".to_string()),
        )?;

        Ok(Self {
            host,
            port,
            data_dir,
            reset_store,
            key_source,
            issuer,
            audience,
            algorithms,
        })
    }
}

/// Parse a comma-separated algorithm list (e.g. `"RS256,ES256"`).
fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let algorithms = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Algorithm>().map_err(|_| ConfigError::InvalidVar {
                var: ALGORITHMS_ENV,
                reason: format!("unknown algorithm: {s}"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if algorithms.is_empty() {
        return Err(ConfigError::InvalidVar {
            var: ALGORITHMS_ENV,
            reason: "allow-list is empty".to_string(),
        });
    }
    Ok(algorithms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_algorithms_accepts_csv() {
        let algorithms = parse_algorithms("RS256, ES256").unwrap();
        assert_eq!(algorithms, vec![Algorithm::RS256, Algorithm::ES256]);
    }

    #[test]
    fn parse_algorithms_rejects_unknown_names() {
        assert!(parse_algorithms("RS256,none").is_err());
    }

    #[test]
    fn parse_algorithms_rejects_empty_list() {
        assert!(parse_algorithms("").is_err());
        assert!(parse_algorithms(" , ").is_err());
    }
}
