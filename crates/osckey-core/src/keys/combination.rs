//! [`KeyCombination`]: a modifier set plus exactly one base key.

use std::fmt;

use super::{parse_key, parse_modifier, KeyParseError, KeyToken, Modifier, ModifierSet};

/// A normalized keyboard chord such as `command+shift+z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombination {
    pub modifiers: ModifierSet,
    pub key: KeyToken,
}

impl KeyCombination {
    pub fn new(modifiers: impl Into<ModifierSet>, key: KeyToken) -> Self {
        Self {
            modifiers: modifiers.into(),
            key,
        }
    }

    /// A chord with no modifiers.
    pub fn bare(key: KeyToken) -> Self {
        Self::new(ModifierSet::empty(), key)
    }

    /// Builds a combination from an ordered token sequence.
    ///
    /// The **last** token is the key; every preceding token must be a
    /// modifier.  Modifier order does not matter and duplicates are absorbed.
    ///
    /// # Errors
    ///
    /// - [`KeyParseError::EmptyCombination`] for an empty sequence.
    /// - [`KeyParseError::UnknownModifier`] / [`KeyParseError::UnknownKey`]
    ///   naming the first unrecognized token.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use osckey_core::KeyCombination;
    ///
    /// let a = KeyCombination::from_tokens(&["shift", "command", "z"]).unwrap();
    /// let b = KeyCombination::from_tokens(&["command", "shift", "z"]).unwrap();
    /// assert_eq!(a, b);
    /// assert_eq!(a.to_string(), "command+shift+z");
    /// ```
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, KeyParseError> {
        let (key, modifiers) = tokens.split_last().ok_or(KeyParseError::EmptyCombination)?;
        Self::from_parts(modifiers, key.as_ref())
    }

    /// Builds a combination from a separate modifier list and key, the shape
    /// used by persisted shortcut records.
    ///
    /// # Errors
    ///
    /// Same as [`KeyCombination::from_tokens`], minus `EmptyCombination`.
    pub fn from_parts<S: AsRef<str>>(modifiers: &[S], key: &str) -> Result<Self, KeyParseError> {
        let modifiers = modifiers
            .iter()
            .map(|m| parse_modifier(m.as_ref()))
            .collect::<Result<ModifierSet, _>>()?;
        let key = parse_key(key)?;
        Ok(Self { modifiers, key })
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(modifier)
    }
}

impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in self.modifiers.iter() {
            write!(f, "{modifier}+")?;
        }
        write!(f, "{}", self.key)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
