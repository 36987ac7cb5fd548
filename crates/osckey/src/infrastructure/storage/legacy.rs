//! Import of the JSON config written by earlier OSC bridge releases.
//!
//! Those releases kept everything in `osc_keyboard_config.json`:
//!
//! ```json
//! {
//!   "osc_port": 5005,
//!   "osc_ip": "0.0.0.0",
//!   "custom_shortcuts": {
//!     "/key/save": { "modifiers": ["command"], "key": "s", "description": "Save" }
//!   }
//! }
//! ```
//!
//! The record shape is identical to ours, so each entry becomes a
//! [`ShortcutRecord`] directly.  An import is all-or-nothing: every record
//! is validated before the first one is written.

use std::path::{Path, PathBuf};

use osckey_core::{KeyCombination, KeyParseError, RegistryError, ShortcutRecords, ShortcutRegistry};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Error type for legacy imports.
#[derive(Debug, Error)]
pub enum LegacyImportError {
    #[error("failed to read legacy config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("legacy config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record's address does not begin with `/`.
    #[error("invalid address {0:?} in legacy config: must start with '/'")]
    InvalidAddress(String),

    /// A record names an unknown modifier or key.
    #[error("invalid shortcut {address:?} in legacy config: {source}")]
    InvalidRecord {
        address: String,
        #[source]
        source: KeyParseError,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// The legacy file's contents.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyConfig {
    #[serde(default = "default_osc_ip")]
    pub osc_ip: String,
    #[serde(default = "default_osc_port")]
    pub osc_port: u16,
    #[serde(default)]
    pub custom_shortcuts: ShortcutRecords,
}

fn default_osc_ip() -> String {
    "0.0.0.0".to_string()
}
fn default_osc_port() -> u16 {
    5005
}

/// What an import changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Addresses written, in address order.
    pub imported: Vec<String>,
    /// OSC settings found in the legacy file (reported, not applied).
    pub osc_ip: String,
    pub osc_port: u16,
}

/// Parses a legacy JSON document.
///
/// # Errors
///
/// Returns [`LegacyImportError::Parse`] for malformed JSON or a wrong shape.
pub fn parse_legacy_json(json: &str) -> Result<LegacyConfig, LegacyImportError> {
    Ok(serde_json::from_str(json)?)
}

/// Reads and parses a legacy config file.
///
/// # Errors
///
/// [`LegacyImportError::Io`] if the file cannot be read, otherwise as
/// [`parse_legacy_json`].
pub fn read_legacy_file(path: &Path) -> Result<LegacyConfig, LegacyImportError> {
    let json = std::fs::read_to_string(path).map_err(|source| LegacyImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_legacy_json(&json)
}

/// Upserts every legacy shortcut into `registry`.
///
/// Existing custom entries at the same addresses are replaced; other custom
/// entries are untouched.
///
/// # Errors
///
/// Validation errors are returned before anything is written.  A storage
/// failure part-way through leaves the earlier records imported.
pub fn import_into(
    registry: &ShortcutRegistry,
    legacy: &LegacyConfig,
) -> Result<ImportSummary, LegacyImportError> {
    let mut validated: Vec<(&str, KeyCombination, &str)> =
        Vec::with_capacity(legacy.custom_shortcuts.len());
    for (address, record) in &legacy.custom_shortcuts {
        if !address.starts_with('/') {
            return Err(LegacyImportError::InvalidAddress(address.clone()));
        }
        let combination = record
            .to_combination()
            .map_err(|source| LegacyImportError::InvalidRecord {
                address: address.clone(),
                source,
            })?;
        validated.push((address, combination, &record.description));
    }

    let mut imported = Vec::with_capacity(validated.len());
    for (address, combination, description) in validated {
        registry.upsert_custom(address, combination, description)?;
        imported.push(address.to_string());
    }

    info!(count = imported.len(), "imported legacy shortcuts");
    Ok(ImportSummary {
        imported,
        osc_ip: legacy.osc_ip.clone(),
        osc_port: legacy.osc_port,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use osckey_core::{MemoryStore, Origin};
    use std::sync::Arc;

    const LEGACY_JSON: &str = r#"{
        "osc_port": 5006,
        "osc_ip": "127.0.0.1",
        "custom_shortcuts": {
            "/key/save": { "modifiers": ["command"], "key": "s", "description": "Save" },
            "/key/redo": { "modifiers": ["command", "shift"], "key": "z", "description": "Redo" },
            "/key/wl": { "modifiers": ["ctrl", "alt"], "key": "left", "description": "Window left" }
        }
    }"#;

    fn make_registry() -> (ShortcutRegistry, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (ShortcutRegistry::new(store.clone()).unwrap(), store)
    }

    #[test]
    fn test_parse_legacy_json_reads_all_fields() {
        let legacy = parse_legacy_json(LEGACY_JSON).unwrap();

        assert_eq!(legacy.osc_ip, "127.0.0.1");
        assert_eq!(legacy.osc_port, 5006);
        assert_eq!(legacy.custom_shortcuts.len(), 3);
        assert_eq!(legacy.custom_shortcuts["/key/redo"].modifiers, vec!["command", "shift"]);
    }

    #[test]
    fn test_parse_legacy_json_defaults_missing_fields() {
        let legacy = parse_legacy_json("{}").unwrap();

        assert_eq!(legacy.osc_ip, "0.0.0.0");
        assert_eq!(legacy.osc_port, 5005);
        assert!(legacy.custom_shortcuts.is_empty());
    }

    #[test]
    fn test_parse_legacy_json_rejects_garbage() {
        assert!(matches!(
            parse_legacy_json("not json"),
            Err(LegacyImportError::Parse(_))
        ));
    }

    #[test]
    fn test_import_into_upserts_every_record_as_custom() {
        // Arrange
        let (registry, store) = make_registry();
        let legacy = parse_legacy_json(LEGACY_JSON).unwrap();

        // Act
        let summary = import_into(&registry, &legacy).unwrap();

        // Assert
        assert_eq!(summary.imported, vec!["/key/redo", "/key/save", "/key/wl"]);
        assert_eq!(summary.osc_port, 5006);
        assert_eq!(registry.custom_len(), 3);
        assert_eq!(registry.lookup("/key/save").unwrap().origin, Origin::Custom);
        assert_eq!(store.records().len(), 3);
    }

    #[test]
    fn test_import_into_rejects_invalid_record_without_writing() {
        // Arrange
        let (registry, store) = make_registry();
        let legacy = parse_legacy_json(
            r#"{ "custom_shortcuts": {
                "/key/a": { "modifiers": ["command"], "key": "a" },
                "/key/b": { "modifiers": ["hyper"], "key": "b" }
            } }"#,
        )
        .unwrap();

        // Act
        let result = import_into(&registry, &legacy);

        // Assert
        assert!(matches!(
            result,
            Err(LegacyImportError::InvalidRecord { ref address, .. }) if address == "/key/b"
        ));
        assert_eq!(registry.custom_len(), 0);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_import_into_rejects_relative_address() {
        let (registry, _) = make_registry();
        let legacy = parse_legacy_json(
            r#"{ "custom_shortcuts": { "key/a": { "modifiers": [], "key": "a" } } }"#,
        )
        .unwrap();

        assert!(matches!(
            import_into(&registry, &legacy),
            Err(LegacyImportError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_read_legacy_file_missing_is_io_error() {
        let path = std::env::temp_dir().join(format!("osckey-missing-{}.json", uuid::Uuid::new_v4()));

        assert!(matches!(
            read_legacy_file(&path),
            Err(LegacyImportError::Io { .. })
        ));
    }
}
