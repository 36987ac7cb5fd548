//! Message resolution: `(address, args)` → [`ResolvedAction`].
//!
//! Resolution is a pure function of the registry contents and the message.
//! It never touches the OS; the executor acts on the result.
//!
//! # Rules
//!
//! 1. An exact registry match wins (custom before builtin) and the
//!    arguments are ignored.
//! 2. Otherwise the generic address `/key` parses its arguments as a chord.
//! 3. Anything else is [`UnresolvedReason::UnknownAddress`].
//!
//! A resolved chord is then classified: arrow keys held with control and/or
//! option go through the scripted path so window managers see them.

use serde::Serialize;
use thiserror::Error;

use crate::keys::{KeyCombination, KeyParseError, Modifier, ModifierSet};

use super::registry::ShortcutRegistry;

/// The generic address whose arguments carry the chord.
pub const KEY_ADDRESS: &str = "/key";

/// How a chord is delivered to the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchKind {
    /// Synthetic key events.
    KeyPress,
    /// OS scripting layer (`osascript` / `xdotool`).
    Scripted,
}

/// Why a message produced no action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnresolvedReason {
    #[error("unknown address")]
    UnknownAddress,

    #[error(transparent)]
    Parse(#[from] KeyParseError),
}

/// Result of resolving one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAction {
    KeyPress { combination: KeyCombination },
    ScriptedAction { combination: KeyCombination },
    Unresolved { reason: UnresolvedReason },
}

impl ResolvedAction {
    /// Wraps `combination` in the variant chosen by [`classify`].
    pub fn dispatch(combination: KeyCombination) -> Self {
        match classify(&combination) {
            DispatchKind::KeyPress => ResolvedAction::KeyPress { combination },
            DispatchKind::Scripted => ResolvedAction::ScriptedAction { combination },
        }
    }

    /// The chord to execute, if any.
    pub fn combination(&self) -> Option<&KeyCombination> {
        match self {
            ResolvedAction::KeyPress { combination }
            | ResolvedAction::ScriptedAction { combination } => Some(combination),
            ResolvedAction::Unresolved { .. } => None,
        }
    }
}

/// Chooses the delivery path for `combination`.
///
/// Returns [`DispatchKind::Scripted`] iff the key is an arrow and the
/// modifiers are non-empty and drawn only from `{control, option}`.
/// `command+shift+left` (text selection) therefore stays a key press.
pub fn classify(combination: &KeyCombination) -> DispatchKind {
    let window_modifiers = ModifierSet::from([Modifier::Control, Modifier::Option]);
    if combination.key.is_arrow()
        && !combination.modifiers.is_empty()
        && combination.modifiers.is_subset(window_modifiers)
    {
        DispatchKind::Scripted
    } else {
        DispatchKind::KeyPress
    }
}

/// Resolves a message against the registry.
///
/// `args` must already be normalized into one token per word (see
/// [`crate::normalize_args`]).
pub fn resolve<S: AsRef<str>>(
    registry: &ShortcutRegistry,
    address: &str,
    args: &[S],
) -> ResolvedAction {
    if let Some(entry) = registry.lookup(address) {
        return ResolvedAction::dispatch(entry.combination);
    }

    if address == KEY_ADDRESS {
        return match KeyCombination::from_tokens(args) {
            Ok(combination) => ResolvedAction::dispatch(combination),
            Err(e) => ResolvedAction::Unresolved { reason: e.into() },
        };
    }

    ResolvedAction::Unresolved {
        reason: UnresolvedReason::UnknownAddress,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::MemoryStore;
    use std::sync::Arc;

    fn combo(tokens: &[&str]) -> KeyCombination {
        KeyCombination::from_tokens(tokens).unwrap()
    }

    fn registry() -> ShortcutRegistry {
        ShortcutRegistry::new(Arc::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn test_classify_control_option_arrow_is_scripted() {
        assert_eq!(classify(&combo(&["control", "option", "left"])), DispatchKind::Scripted);
        assert_eq!(classify(&combo(&["ctrl", "down"])), DispatchKind::Scripted);
        assert_eq!(classify(&combo(&["alt", "up"])), DispatchKind::Scripted);
    }

    #[test]
    fn test_classify_bare_arrow_is_key_press() {
        assert_eq!(classify(&combo(&["left"])), DispatchKind::KeyPress);
    }

    #[test]
    fn test_classify_arrow_with_command_or_shift_is_key_press() {
        assert_eq!(classify(&combo(&["command", "shift", "left"])), DispatchKind::KeyPress);
        assert_eq!(
            classify(&combo(&["control", "option", "shift", "right"])),
            DispatchKind::KeyPress
        );
    }

    #[test]
    fn test_classify_non_arrow_is_key_press() {
        assert_eq!(classify(&combo(&["control", "option", "enter"])), DispatchKind::KeyPress);
    }

    #[test]
    fn test_resolve_builtin_ignores_args() {
        let registry = registry();

        let action = resolve(&registry, "/key/save", &["whatever", "args"]);

        assert_eq!(
            action,
            ResolvedAction::KeyPress {
                combination: combo(&["command", "s"])
            }
        );
    }

    #[test]
    fn test_resolve_generic_key_parses_args() {
        let registry = registry();

        let action = resolve(&registry, "/key", &["command", "shift", "z"]);

        assert_eq!(
            action,
            ResolvedAction::KeyPress {
                combination: combo(&["command", "shift", "z"])
            }
        );
    }

    #[test]
    fn test_resolve_generic_key_window_chord_is_scripted() {
        let registry = registry();
        let action = resolve(&registry, "/key", &["control", "option", "left"]);
        assert!(matches!(action, ResolvedAction::ScriptedAction { .. }));
    }

    #[test]
    fn test_resolve_generic_key_without_args_is_empty_combination() {
        let registry = registry();

        let action = resolve::<&str>(&registry, "/key", &[]);

        assert_eq!(
            action,
            ResolvedAction::Unresolved {
                reason: UnresolvedReason::Parse(KeyParseError::EmptyCombination)
            }
        );
    }

    #[test]
    fn test_resolve_generic_key_bad_modifier_reports_parse_error() {
        let registry = registry();
        let action = resolve(&registry, "/key", &["hyper", "a"]);
        assert_eq!(
            action,
            ResolvedAction::Unresolved {
                reason: UnresolvedReason::Parse(KeyParseError::UnknownModifier("hyper".into()))
            }
        );
    }

    #[test]
    fn test_resolve_unregistered_key_subpath_is_unknown_address() {
        let registry = registry();
        let action = resolve::<&str>(&registry, "/key/unknown_xyz", &[]);
        assert_eq!(
            action,
            ResolvedAction::Unresolved {
                reason: UnresolvedReason::UnknownAddress
            }
        );
    }

    #[test]
    fn test_resolve_foreign_address_is_unknown_address() {
        let registry = registry();
        let action = resolve(&registry, "/mixer/fader1", &["0.5"]);
        assert_eq!(
            action,
            ResolvedAction::Unresolved {
                reason: UnresolvedReason::UnknownAddress
            }
        );
    }

    #[test]
    fn test_resolve_custom_entry_shadows_builtin() {
        let registry = registry();
        registry
            .upsert_custom("/key/save", combo(&["command", "option", "s"]), "")
            .unwrap();

        let action = resolve::<&str>(&registry, "/key/save", &[]);

        assert_eq!(action.combination(), Some(&combo(&["command", "option", "s"])));
    }

    #[test]
    fn test_resolve_custom_entry_at_generic_address_wins() {
        let registry = registry();
        registry.upsert_custom("/key", combo(&["f9"]), "").unwrap();

        let action = resolve(&registry, "/key", &["command", "s"]);

        assert_eq!(action.combination(), Some(&combo(&["f9"])));
    }
}
