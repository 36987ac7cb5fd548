//! Key code translation tables for the platform backends.
//!
//! The canonical representation is [`KeyToken`] plus [`Modifier`].  Each
//! backend translates to its own code space at the emulation boundary:
//!
//! - macOS virtual key codes (`CGKeyCode`) for CoreGraphics event injection,
//! - X11 KeySyms for the XTest extension on Linux,
//! - script text (AppleScript / `xdotool` chords) for the scripted path.

pub mod linux_x11;
pub mod macos_vk;
pub mod script;

use crate::keys::{KeyCombination, KeyToken, Modifier};

/// Unified key mapper providing all translation directions.
pub struct KeyMapper;

impl KeyMapper {
    /// Translates a [`KeyToken`] to a macOS `CGKeyCode`.
    ///
    /// Returns `None` for printable characters that have no ANSI key of
    /// their own (shifted symbols such as `!` or `{`).  Callers type those
    /// as Unicode text instead.
    pub fn key_to_macos_vk(key: KeyToken) -> Option<u16> {
        macos_vk::key_to_vk(key)
    }

    /// Translates a [`Modifier`] to the macOS key code of its left-hand key.
    pub fn modifier_to_macos_vk(modifier: Modifier) -> u16 {
        macos_vk::modifier_to_vk(modifier)
    }

    /// Translates a [`KeyToken`] to an X11 KeySym value.
    pub fn key_to_x11_keysym(key: KeyToken) -> Option<u32> {
        linux_x11::key_to_keysym(key)
    }

    /// Translates a [`Modifier`] to the KeySym of its left-hand key.
    pub fn modifier_to_x11_keysym(modifier: Modifier) -> u32 {
        linux_x11::modifier_to_keysym(modifier)
    }

    /// Renders the AppleScript that presses `combination` via System Events.
    pub fn applescript_for(combination: &KeyCombination) -> String {
        script::applescript_for(combination)
    }

    /// Renders the `xdotool key` argument for `combination`, e.g. `ctrl+alt+Left`.
    pub fn xdotool_chord(combination: &KeyCombination) -> String {
        script::xdotool_chord(combination)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
