//! Integration tests for message resolution.
//!
//! These tests drive the public API the way the listener does: raw argument
//! strings are normalized, resolved against a shared registry, and the
//! resulting action is checked.  Registry mutations go through the same
//! `Arc<ShortcutRegistry>` the resolver reads.

use std::sync::Arc;

use osckey_core::{
    normalize_args, parse_modifier, resolve, InboundMessage, KeyCombination, KeyParseError,
    MemoryStore, Modifier, ResolvedAction, ShortcutRegistry, UnresolvedReason,
};

fn combo(tokens: &[&str]) -> KeyCombination {
    KeyCombination::from_tokens(tokens).expect("test chord must parse")
}

fn shared_registry() -> (Arc<ShortcutRegistry>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let registry = ShortcutRegistry::new(store.clone()).expect("empty store must load");
    (Arc::new(registry), store)
}

/// Resolves a message as the listener would: normalize first, then resolve.
fn resolve_raw(registry: &ShortcutRegistry, address: &str, raw_args: &[&str]) -> ResolvedAction {
    let msg = InboundMessage::from_raw(address, raw_args);
    resolve(registry, &msg.address, &msg.args)
}

#[test]
fn test_cmd_and_command_parse_to_the_same_modifier() {
    assert_eq!(parse_modifier("cmd").unwrap(), Modifier::Command);
    assert_eq!(parse_modifier("command").unwrap(), Modifier::Command);
}

#[test]
fn test_modifier_order_does_not_change_the_chord() {
    assert_eq!(
        combo(&["shift", "command", "z"]),
        combo(&["command", "shift", "z"])
    );
}

#[test]
fn test_builtin_save_ignores_any_args() {
    let (registry, _) = shared_registry();

    for args in [&[][..], &["x"][..], &["command", "shift", "q"][..]] {
        assert_eq!(
            resolve_raw(&registry, "/key/save", args),
            ResolvedAction::KeyPress {
                combination: combo(&["command", "s"])
            }
        );
    }
}

#[test]
fn test_window_chord_is_scripted_and_bare_arrow_is_key_press() {
    let (registry, _) = shared_registry();

    assert_eq!(
        resolve_raw(&registry, "/key", &["control", "option", "left"]),
        ResolvedAction::ScriptedAction {
            combination: combo(&["control", "option", "left"])
        }
    );
    assert_eq!(
        resolve_raw(&registry, "/key", &["left"]),
        ResolvedAction::KeyPress {
            combination: combo(&["left"])
        }
    );
}

#[test]
fn test_selection_chord_stays_key_press() {
    let (registry, _) = shared_registry();

    let action = resolve_raw(&registry, "/key", &["command", "shift", "left"]);

    assert!(matches!(action, ResolvedAction::KeyPress { .. }));
}

#[test]
fn test_unknown_key_subpath_is_unknown_address() {
    let (registry, _) = shared_registry();

    let action = resolve_raw(&registry, "/key/unknown_xyz", &[]);

    assert_eq!(
        action,
        ResolvedAction::Unresolved {
            reason: UnresolvedReason::UnknownAddress
        }
    );
}

#[test]
fn test_joined_and_split_args_resolve_identically() {
    let (registry, _) = shared_registry();

    let joined = resolve_raw(&registry, "/key", &["command shift z"]);
    let split = resolve_raw(&registry, "/key", &["command", "shift", "z"]);

    assert_eq!(joined, split);
    assert_eq!(
        normalize_args(&["command shift z"]),
        normalize_args(&["command", "shift", "z"])
    );
}

#[test]
fn test_unknown_key_token_is_named_in_reason() {
    let (registry, _) = shared_registry();

    let action = resolve_raw(&registry, "/key", &["command", "banana"]);

    assert_eq!(
        action,
        ResolvedAction::Unresolved {
            reason: UnresolvedReason::Parse(KeyParseError::UnknownKey("banana".to_string()))
        }
    );
}

#[test]
fn test_custom_shortcut_is_visible_to_next_resolution() {
    // Arrange
    let (registry, _) = shared_registry();
    let config_side = Arc::clone(&registry);

    // Act
    config_side
        .upsert_custom("/key/launch", combo(&["command", "space"]), "Spotlight")
        .unwrap();

    // Assert
    assert_eq!(
        resolve_raw(&registry, "/key/launch", &[]),
        ResolvedAction::KeyPress {
            combination: combo(&["command", "space"])
        }
    );

    config_side.remove_custom("/key/launch").unwrap();
    assert!(matches!(
        resolve_raw(&registry, "/key/launch", &[]),
        ResolvedAction::Unresolved { .. }
    ));
}

#[test]
fn test_custom_records_survive_a_reload() {
    // Arrange
    let (registry, store) = shared_registry();
    registry
        .upsert_custom("/key/wl", combo(&["ctrl", "alt", "left"]), "Window left")
        .unwrap();
    registry
        .upsert_custom("/key/save", combo(&["command", "option", "s"]), "Save all")
        .unwrap();

    // Act: a second registry on the same store simulates a restart.
    let reloaded = ShortcutRegistry::new(store.clone()).unwrap();

    // Assert
    assert_eq!(reloaded.snapshot(), registry.snapshot());
    assert!(reloaded.is_shadowed("/key/save"));
    assert!(matches!(
        resolve_raw(&reloaded, "/key/wl", &[]),
        ResolvedAction::ScriptedAction { .. }
    ));
}

#[test]
fn test_remove_on_builtin_keeps_builtin_resolvable() {
    let (registry, _) = shared_registry();

    assert!(registry.remove_custom("/key/undo").is_err());

    assert_eq!(
        resolve_raw(&registry, "/key/undo", &[]),
        ResolvedAction::KeyPress {
            combination: combo(&["command", "z"])
        }
    );
}
