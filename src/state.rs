// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Application state shared across handlers.
//!
//! The state is constructed explicitly in `main` and injected into handlers
//! through axum's `State` extractor; there are no ambient globals. Both
//! members are read-only after startup (the store serializes its own writes
//! internally).

use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::store::DrinkStore;

#[derive(Clone)]
pub struct AppState {
    /// Drink record store.
    pub store: Arc<DrinkStore>,
    /// Bearer token verifier.
    pub auth: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(store: DrinkStore, auth: TokenVerifier) -> Self {
        Self {
            store: Arc::new(store),
            auth: Arc::new(auth),
        }
    }
}
