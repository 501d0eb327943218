// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the drink catalog entities and the request bodies
//! used by the REST API. All types derive `Serialize`, `Deserialize`, and
//! `ToSchema` for automatic JSON handling and OpenAPI documentation.
//!
//! ## Views
//!
//! Drinks are rendered in two shapes: the public summary (`id` + `title`,
//! no recipe) and the full representation including the structured recipe.
//! The full view is only served to callers holding `get:drinks-detail`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Drink Id Type
// =============================================================================

/// Store-assigned drink identifier.
///
/// Ids are positive integers assigned sequentially by the record store.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct DrinkId(pub i64);

impl std::fmt::Display for DrinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for DrinkId {
    fn from(value: i64) -> Self {
        DrinkId(value)
    }
}

impl From<DrinkId> for i64 {
    fn from(value: DrinkId) -> Self {
        value.0
    }
}

// =============================================================================
// Drink Models
// =============================================================================

/// One ingredient of a drink recipe.
///
/// The recipe is rendered by the client as a stack of colored layers, so
/// every ingredient carries a display color alongside its name and the
/// number of parts it contributes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RecipeIngredient {
    /// Display color for the ingredient layer (e.g. `"#f5deb3"` or `"brown"`).
    pub color: String,
    /// Ingredient name.
    pub name: String,
    /// Relative parts of this ingredient in the drink.
    pub parts: u32,
}

/// A drink on the menu.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Drink {
    /// Unique identifier, assigned by the store.
    pub id: DrinkId,
    /// Drink title shown on the menu.
    pub title: String,
    /// Structured recipe (full view only).
    pub recipe: Vec<RecipeIngredient>,
}

/// Public summary view of a drink: no recipe detail.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DrinkSummary {
    /// Unique identifier.
    pub id: DrinkId,
    /// Drink title shown on the menu.
    pub title: String,
}

impl Drink {
    /// The public summary view of this drink.
    pub fn summary(&self) -> DrinkSummary {
        DrinkSummary {
            id: self.id,
            title: self.title.clone(),
        }
    }
}

// =============================================================================
// Request Bodies
// =============================================================================

/// Request to create a new drink.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateDrinkRequest {
    /// Title for the new drink.
    pub title: String,
    /// Full recipe for the new drink.
    pub recipe: Vec<RecipeIngredient>,
}

/// Request to update an existing drink.
///
/// Both fields are optional; omitted fields are left unchanged. A body
/// providing neither is rejected as unprocessable.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateDrinkRequest {
    /// New title, if changing.
    #[serde(default)]
    pub title: Option<String>,
    /// New recipe, if changing.
    #[serde(default)]
    pub recipe: Option<Vec<RecipeIngredient>>,
}
