//! Key-combination model.
//!
//! A message names a chord as a list of words, e.g. `["command", "shift",
//! "z"]`.  This module turns those words into a [`KeyCombination`]: a
//! [`ModifierSet`] plus exactly one [`KeyToken`].
//!
//! Parsing is case-insensitive and alias-aware (`cmd`, `opt`, `alt`, `ctrl`),
//! and modifiers are stored as a set so two inputs naming the same chord in a
//! different order compare equal.

pub mod combination;
pub mod modifier;
pub mod token;

pub use combination::KeyCombination;
pub use modifier::{parse_modifier, Modifier, ModifierSet};
pub use token::{parse_key, KeyToken, SpecialKey};

use thiserror::Error;

/// Errors produced while turning words into a key combination.
///
/// Each variant carries the offending token verbatim so the operator can see
/// exactly what the controller sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    /// A token in modifier position is not a known modifier or alias.
    #[error("unknown modifier: {0:?}")]
    UnknownModifier(String),

    /// The final token is neither a printable ASCII character nor a special key.
    #[error("unknown key: {0:?}")]
    UnknownKey(String),

    /// No tokens were supplied.
    #[error("empty key combination")]
    EmptyCombination,
}

/// Flattens message arguments into one ordered token sequence.
///
/// Controllers send the same chord either as a single space-joined string
/// (`"command shift z"`) or as separate arguments (`"command"`, `"shift"`,
/// `"z"`).  Both shapes normalize to `["command", "shift", "z"]`.  Empty and
/// whitespace-only arguments disappear.
///
/// # Examples
///
/// ```rust
/// use osckey_core::normalize_args;
///
/// assert_eq!(normalize_args(&["command shift z"]), normalize_args(&["command", "shift", "z"]));
/// ```
pub fn normalize_args<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.as_ref().split_whitespace())
        .map(str::to_string)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
