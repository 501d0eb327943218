// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Route capabilities and the permission membership check.

use super::claims::AuthClaims;
use super::error::AuthError;

/// Capability required to list drinks with full recipe detail.
pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
/// Capability required to create a drink.
pub const POST_DRINKS: &str = "post:drinks";
/// Capability required to update a drink.
pub const PATCH_DRINKS: &str = "patch:drinks";
/// Capability required to delete a drink.
pub const DELETE_DRINKS: &str = "delete:drinks";

/// Check that the claims grant the required capability.
///
/// A token with no permissions claim at all is classified separately from
/// one whose claim simply lacks the capability: the former means the issuer
/// is misconfigured, the latter that the caller is not authorized.
pub fn check(claims: &AuthClaims, required: &str) -> Result<(), AuthError> {
    match claims.permissions {
        None => Err(AuthError::MissingPermissionsClaim),
        Some(_) if claims.has_permission(required) => Ok(()),
        Some(_) => Err(AuthError::PermissionDenied),
    }
}
