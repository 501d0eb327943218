// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! This module provides JWT bearer authentication for the drinks menu API.
//!
//! ## Auth Flow
//!
//! 1. The ordering client authenticates the user with the identity provider
//! 2. The client sends `Authorization: Bearer <JWT>`
//! 3. This server:
//!    - Loads the provider's signing keys (JWKS endpoint or static set)
//!    - Verifies the token signature, expiry, issuer, audience
//!    - Checks the route's required capability against the `permissions` claim
//!
//! ## Security
//!
//! - Every failure mode carries its own classification, so a rejected caller
//!   can tell a malformed header from an expired token from a missing
//!   capability
//! - JWKS fetching is HTTPS-only and TTL-cached
//! - Clock skew tolerance is 60 seconds
//! - Auth failures short-circuit before any store access

pub mod claims;
pub mod error;
pub mod extractor;
pub mod guard;
pub mod jwks;
pub mod permissions;
pub mod verifier;

pub use claims::AuthClaims;
pub use error::AuthError;
pub use extractor::Auth;
pub use jwks::JwksManager;
pub use verifier::TokenVerifier;
