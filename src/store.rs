// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded drink record store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `drinks`: drink id → serialized Drink (JSON bytes)
//! - `meta`: key → i64 (currently only the id counter)
//!
//! Ids are assigned from a monotonically increasing counter that survives
//! deletes, so a deleted id is never reused. Listing iterates the `drinks`
//! table in key order, which is id order.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::models::{Drink, DrinkId, RecipeIngredient};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: drink id → serialized Drink (JSON bytes).
const DRINKS: TableDefinition<i64, &[u8]> = TableDefinition::new("drinks");

/// Store metadata: key → i64.
const META: TableDefinition<&str, i64> = TableDefinition::new("meta");

/// Meta key holding the next id to assign.
const NEXT_ID_KEY: &str = "next_drink_id";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("drink {0} not found")]
    NotFound(DrinkId),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// DrinkStore
// =============================================================================

/// Embedded ACID store for the drink catalog.
pub struct DrinkStore {
    db: Database,
}

impl DrinkStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(DRINKS)?;
            let _ = write_txn.open_table(META)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Drop all records and restart id assignment from 1.
    pub fn reset(&self) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            write_txn.delete_table(DRINKS)?;
            write_txn.delete_table(META)?;
            let _ = write_txn.open_table(DRINKS)?;
            let _ = write_txn.open_table(META)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// List all drinks in id order.
    pub fn list(&self) -> StoreResult<Vec<Drink>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DRINKS)?;

        let mut drinks = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            drinks.push(serde_json::from_slice(value.value())?);
        }
        Ok(drinks)
    }

    /// Look up a single drink by id.
    pub fn get(&self, id: DrinkId) -> StoreResult<Option<Drink>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DRINKS)?;
        match table.get(id.0)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Number of drinks currently stored.
    pub fn count(&self) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DRINKS)?;
        let mut count = 0;
        for entry in table.iter()? {
            entry?;
            count += 1;
        }
        Ok(count)
    }

    /// Insert a new drink, assigning the next id.
    pub fn insert(&self, title: String, recipe: Vec<RecipeIngredient>) -> StoreResult<Drink> {
        let write_txn = self.db.begin_write()?;
        let drink = {
            let mut meta = write_txn.open_table(META)?;
            let next = meta.get(NEXT_ID_KEY)?.map(|v| v.value()).unwrap_or(1);
            meta.insert(NEXT_ID_KEY, next + 1)?;
            drop(meta);

            let drink = Drink {
                id: DrinkId(next),
                title,
                recipe,
            };
            let json = serde_json::to_vec(&drink)?;
            let mut table = write_txn.open_table(DRINKS)?;
            table.insert(next, json.as_slice())?;
            drink
        };
        write_txn.commit()?;
        Ok(drink)
    }

    /// Apply a partial update to the drink with the given id.
    ///
    /// Fields passed as `None` are left unchanged. Returns the updated drink,
    /// or `StoreError::NotFound` if no record has this id.
    pub fn update(
        &self,
        id: DrinkId,
        title: Option<String>,
        recipe: Option<Vec<RecipeIngredient>>,
    ) -> StoreResult<Drink> {
        let write_txn = self.db.begin_write()?;
        let drink = {
            let mut table = write_txn.open_table(DRINKS)?;
            let mut drink: Drink = match table.get(id.0)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(StoreError::NotFound(id)),
            };

            if let Some(title) = title {
                drink.title = title;
            }
            if let Some(recipe) = recipe {
                drink.recipe = recipe;
            }

            let json = serde_json::to_vec(&drink)?;
            table.insert(id.0, json.as_slice())?;
            drink
        };
        write_txn.commit()?;
        Ok(drink)
    }

    /// Delete the drink with the given id.
    ///
    /// Returns `StoreError::NotFound` if no record has this id, so a repeated
    /// delete of the same id fails rather than reporting success.
    pub fn delete(&self, id: DrinkId) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(DRINKS)?;
            let existed = table.remove(id.0)?.is_some();
            existed
        };
        write_txn.commit()?;

        if removed {
            Ok(())
        } else {
            Err(StoreError::NotFound(id))
        }
    }
}
