//! Shortcut registry: the live address → chord map.
//!
//! # Layers (for beginners)
//!
//! The registry holds two layers:
//!
//! 1. **Builtin** entries (see [`super::builtin`]), fixed at compile time.
//! 2. **Custom** entries, added and removed at runtime by the operator.
//!
//! A lookup checks the custom layer first, so a custom entry at
//! `/key/save` *shadows* the builtin one without deleting it.  Removing the
//! custom entry makes the builtin visible again.
//!
//! # Concurrency
//!
//! The listener thread resolves messages while configuration commands edit
//! shortcuts from the async runtime.  The custom layer is an immutable map
//! behind `RwLock<Arc<..>>`:
//!
//! - Readers take the read lock only long enough to clone the `Arc`, then
//!   work on a consistent point-in-time table.
//! - Writers serialize on a separate writer mutex, build the next table,
//!   persist it through the [`ShortcutStore`], and only then swap it in.
//!
//! A mutation that fails to persist therefore never becomes visible.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::keys::{KeyCombination, KeyParseError};

use super::builtin::builtin_entries;

// ── Entries and records ───────────────────────────────────────────────────────

/// Where a shortcut entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Builtin,
    Custom,
}

/// One address → chord binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutEntry {
    /// Message address; always begins with `/`.
    pub address: String,
    pub combination: KeyCombination,
    /// Free-form label shown to the operator.
    pub description: String,
    pub origin: Origin,
}

/// Persisted shape of a custom shortcut.
///
/// ```toml
/// [custom_shortcuts."/key/save"]
/// modifiers = ["command"]
/// key = "s"
/// description = "Save"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutRecord {
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub key: String,
    #[serde(default)]
    pub description: String,
}

impl ShortcutRecord {
    /// Canonical record for `combination` (modifier names in canonical order).
    pub fn from_combination(combination: &KeyCombination, description: impl Into<String>) -> Self {
        Self {
            modifiers: combination.modifiers.names(),
            key: combination.key.name(),
            description: description.into(),
        }
    }

    /// Parses the record back into a [`KeyCombination`].
    ///
    /// # Errors
    ///
    /// Returns the [`KeyParseError`] for the first unknown modifier or key.
    pub fn to_combination(&self) -> Result<KeyCombination, KeyParseError> {
        KeyCombination::from_parts(&self.modifiers, &self.key)
    }
}

/// Custom records keyed by address, in address order.
pub type ShortcutRecords = BTreeMap<String, ShortcutRecord>;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Errors raised by a [`ShortcutStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding error: {0}")]
    Encode(String),

    #[error("decoding error: {0}")]
    Decode(String),
}

/// Errors returned by registry mutations and constructors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The address does not begin with `/`.
    #[error("invalid address {0:?}: must start with '/'")]
    InvalidAddress(String),

    /// `remove_custom` found no custom entry at the address.
    #[error("no custom shortcut at {0:?}")]
    NotFound(String),

    /// A persisted record names an unknown modifier or key.
    #[error("invalid shortcut record at {address:?}: {source}")]
    InvalidRecord {
        address: String,
        #[source]
        source: KeyParseError,
    },

    /// The storage port failed; the registry is unchanged.
    #[error("failed to persist shortcuts: {0}")]
    Storage(#[from] StoreError),
}

// ── Storage port ──────────────────────────────────────────────────────────────

/// Persistence port for the custom layer.
///
/// Implemented by the TOML config file in the binary crate and by
/// [`MemoryStore`] for tests.
#[cfg_attr(test, mockall::automock)]
pub trait ShortcutStore: Send + Sync {
    /// Loads the persisted custom records.  A store with nothing saved yet
    /// returns an empty map.
    fn load(&self) -> Result<ShortcutRecords, StoreError>;

    /// Replaces the persisted custom records with `records`.
    fn save(&self, records: &ShortcutRecords) -> Result<(), StoreError>;
}

/// In-memory [`ShortcutStore`] that records every save.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<ShortcutRecords>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `records`, as if a previous run saved them.
    pub fn with_records(records: ShortcutRecords) -> Self {
        Self {
            records: Mutex::new(records),
            saves: Mutex::new(0),
        }
    }

    /// The most recently saved records.
    pub fn records(&self) -> ShortcutRecords {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ShortcutStore for MemoryStore {
    fn load(&self) -> Result<ShortcutRecords, StoreError> {
        Ok(self.records())
    }

    fn save(&self, records: &ShortcutRecords) -> Result<(), StoreError> {
        *self.records.lock().unwrap_or_else(PoisonError::into_inner) = records.clone();
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

type CustomTable = BTreeMap<String, ShortcutEntry>;

/// Concurrency-safe shortcut registry shared by the listener and the
/// configuration commands via `Arc<ShortcutRegistry>`.
pub struct ShortcutRegistry {
    builtins: Vec<ShortcutEntry>,
    custom: RwLock<Arc<CustomTable>>,
    writer: Mutex<()>,
    store: Arc<dyn ShortcutStore>,
}

impl ShortcutRegistry {
    /// Creates a registry with the builtin table plus the records currently
    /// held by `store`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Storage`] if the store cannot be read.
    /// - [`RegistryError::InvalidAddress`] / [`RegistryError::InvalidRecord`]
    ///   if a persisted record is malformed.
    pub fn new(store: Arc<dyn ShortcutStore>) -> Result<Self, RegistryError> {
        let records = store.load()?;
        Self::with_records(records, store)
    }

    /// Creates a registry from explicit records.  `store` receives later
    /// mutations; nothing is saved during construction.
    ///
    /// # Errors
    ///
    /// Same validation errors as [`ShortcutRegistry::new`].
    pub fn with_records(
        records: ShortcutRecords,
        store: Arc<dyn ShortcutStore>,
    ) -> Result<Self, RegistryError> {
        let mut custom = CustomTable::new();
        for (address, record) in records {
            validate_address(&address)?;
            let combination =
                record
                    .to_combination()
                    .map_err(|source| RegistryError::InvalidRecord {
                        address: address.clone(),
                        source,
                    })?;
            custom.insert(
                address.clone(),
                custom_entry(address, combination, record.description),
            );
        }

        Ok(Self {
            builtins: builtin_entries(),
            custom: RwLock::new(Arc::new(custom)),
            writer: Mutex::new(()),
            store,
        })
    }

    /// Returns the entry for `address`; a custom entry shadows a builtin one.
    pub fn lookup(&self, address: &str) -> Option<ShortcutEntry> {
        if let Some(entry) = self.current().get(address) {
            return Some(entry.clone());
        }
        self.builtins.iter().find(|e| e.address == address).cloned()
    }

    /// Returns `true` when `address` is a builtin currently overridden by a
    /// custom entry.
    pub fn is_shadowed(&self, address: &str) -> bool {
        self.builtins.iter().any(|e| e.address == address) && self.current().contains_key(address)
    }

    /// Inserts or replaces the custom entry at `address` and persists the
    /// custom layer.
    ///
    /// Upserting an identical entry is a no-op and does not touch storage.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidAddress`] if `address` does not start with `/`.
    /// - [`RegistryError::Storage`] if persisting fails; the registry keeps
    ///   its previous contents.
    pub fn upsert_custom(
        &self,
        address: &str,
        combination: KeyCombination,
        description: impl Into<String>,
    ) -> Result<(), RegistryError> {
        validate_address(address)?;
        let entry = custom_entry(address.to_string(), combination, description.into());

        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.current();
        if current.get(address) == Some(&entry) {
            return Ok(());
        }

        let chord = entry.combination;
        let mut next = (*current).clone();
        next.insert(address.to_string(), entry);
        self.commit(next)?;

        debug!(address, %chord, "custom shortcut stored");
        Ok(())
    }

    /// Removes the custom entry at `address` and persists the custom layer.
    ///
    /// A builtin at the same address becomes visible again.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotFound`] if there is no custom entry at `address`
    ///   (builtin-only addresses included).
    /// - [`RegistryError::Storage`] if persisting fails.
    pub fn remove_custom(&self, address: &str) -> Result<(), RegistryError> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.current();
        if !current.contains_key(address) {
            return Err(RegistryError::NotFound(address.to_string()));
        }

        let mut next = (*current).clone();
        next.remove(address);
        self.commit(next)?;

        debug!(address, "custom shortcut removed");
        Ok(())
    }

    /// Point-in-time view: every builtin entry in table order (shadowed ones
    /// included), then the custom entries sorted by address.
    pub fn snapshot(&self) -> Vec<ShortcutEntry> {
        let custom = self.current();
        self.builtins
            .iter()
            .cloned()
            .chain(custom.values().cloned())
            .collect()
    }

    /// The custom layer in its persisted shape.
    pub fn custom_records(&self) -> ShortcutRecords {
        to_records(&self.current())
    }

    /// Number of custom entries.
    pub fn custom_len(&self) -> usize {
        self.current().len()
    }

    fn current(&self) -> Arc<CustomTable> {
        Arc::clone(&self.custom.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Persists `next` then publishes it.  Caller holds the writer lock.
    fn commit(&self, next: CustomTable) -> Result<(), RegistryError> {
        self.store.save(&to_records(&next))?;
        *self.custom.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
        Ok(())
    }
}

impl std::fmt::Debug for ShortcutRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutRegistry")
            .field("builtins", &self.builtins.len())
            .field("custom", &self.current().len())
            .finish()
    }
}

fn validate_address(address: &str) -> Result<(), RegistryError> {
    if address.starts_with('/') {
        Ok(())
    } else {
        Err(RegistryError::InvalidAddress(address.to_string()))
    }
}

fn custom_entry(address: String, combination: KeyCombination, description: String) -> ShortcutEntry {
    ShortcutEntry {
        address,
        combination,
        description,
        origin: Origin::Custom,
    }
}

fn to_records(table: &CustomTable) -> ShortcutRecords {
    table
        .iter()
        .map(|(address, entry)| {
            (
                address.clone(),
                ShortcutRecord::from_combination(&entry.combination, entry.description.clone()),
            )
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
