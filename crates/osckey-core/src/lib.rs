//! # osckey-core
//!
//! Shared library for OSCKey containing the key-combination model, the
//! shortcut registry, the message resolver, and the key code tables used by
//! the platform backends.
//!
//! It has zero dependencies on OS APIs, sockets, or the config file format.
//!
//! # Architecture overview (for beginners)
//!
//! OSCKey turns OSC messages sent by lighting consoles, DAWs, or touch
//! surfaces into keyboard shortcuts on the host machine.  A message such as
//! `/key "command shift z"` or `/key/save` arrives over UDP and ends up as a
//! synthetic key press.
//!
//! This crate is the pure part of that pipeline:
//!
//! - **`keys`** – Modifiers, key tokens, and [`KeyCombination`]: how the
//!   words in a message become a normalized chord.
//!
//! - **`domain`** – The [`ShortcutRegistry`] (builtin + custom shortcuts,
//!   safe to share between the listener and the configuration commands) and
//!   the resolver that maps `(address, args)` to a [`ResolvedAction`].
//!
//! - **`keymap`** – Translation tables from key tokens to macOS virtual key
//!   codes, X11 KeySyms, and the script text used by the window-manager
//!   compatibility path.

pub mod domain;
pub mod keymap;
pub mod keys;

pub use domain::message::InboundMessage;
pub use domain::registry::{
    MemoryStore, Origin, RegistryError, ShortcutEntry, ShortcutRecord, ShortcutRecords,
    ShortcutRegistry, ShortcutStore, StoreError,
};
pub use domain::resolver::{classify, resolve, DispatchKind, ResolvedAction, UnresolvedReason};
pub use keys::{
    normalize_args, parse_key, parse_modifier, KeyCombination, KeyParseError, KeyToken, Modifier,
    ModifierSet, SpecialKey,
};
