//! Modifier keys and the canonical modifier set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::KeyParseError;

/// One of the four modifier keys a chord can hold.
///
/// The declaration order is the canonical order: modifiers are pressed in
/// this order and released in reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Command,
    Option,
    Control,
    Shift,
}

impl Modifier {
    /// All modifiers in canonical order.
    pub const ALL: [Modifier; 4] = [
        Modifier::Command,
        Modifier::Option,
        Modifier::Control,
        Modifier::Shift,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Modifier::Command => "command",
            Modifier::Option => "option",
            Modifier::Control => "control",
            Modifier::Shift => "shift",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Modifier::Command => 1 << 0,
            Modifier::Option => 1 << 1,
            Modifier::Control => 1 << 2,
            Modifier::Shift => 1 << 3,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Modifier {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_modifier(s)
    }
}

/// Parses a modifier name or alias, ignoring case and surrounding whitespace.
///
/// | Input                      | Result              |
/// |----------------------------|---------------------|
/// | `command`, `cmd`           | [`Modifier::Command`] |
/// | `option`, `opt`, `alt`     | [`Modifier::Option`]  |
/// | `control`, `ctrl`          | [`Modifier::Control`] |
/// | `shift`                    | [`Modifier::Shift`]   |
///
/// # Errors
///
/// Returns [`KeyParseError::UnknownModifier`] naming `raw` for anything else.
pub fn parse_modifier(raw: &str) -> Result<Modifier, KeyParseError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "command" | "cmd" => Ok(Modifier::Command),
        "option" | "opt" | "alt" => Ok(Modifier::Option),
        "control" | "ctrl" => Ok(Modifier::Control),
        "shift" => Ok(Modifier::Shift),
        _ => Err(KeyParseError::UnknownModifier(raw.to_string())),
    }
}

/// A set of modifiers stored as a bit mask.
///
/// Inserting the same modifier twice is a no-op, and iteration always yields
/// canonical order regardless of insertion order, so `{shift, command}` and
/// `{command, shift}` are the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierSet(u8);

impl ModifierSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Adds `modifier` to the set.
    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    /// Removes `modifier` from the set.
    pub fn remove(&mut self, modifier: Modifier) {
        self.0 &= !modifier.bit();
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if every modifier in `self` is also in `other`.
    pub fn is_subset(&self, other: ModifierSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Iterates the modifiers in canonical order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Modifier> + '_ {
        Modifier::ALL.into_iter().filter(move |m| self.contains(*m))
    }

    /// Canonical names, e.g. `["command", "shift"]`.
    pub fn names(&self) -> Vec<String> {
        self.iter().map(|m| m.name().to_string()).collect()
    }
}

impl FromIterator<Modifier> for ModifierSet {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        let mut set = ModifierSet::empty();
        for modifier in iter {
            set.insert(modifier);
        }
        set
    }
}

impl<const N: usize> From<[Modifier; N]> for ModifierSet {
    fn from(modifiers: [Modifier; N]) -> Self {
        modifiers.into_iter().collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
