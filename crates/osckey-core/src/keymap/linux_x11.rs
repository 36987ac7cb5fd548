//! Key token to X11 KeySym translation table for the Linux backend.
//!
//! KeySym values are defined in `X11/keysymdef.h`.
//!
//! # What is an X11 KeySym? (for beginners)
//!
//! X11 identifies keys by **KeySym** (Key Symbol) rather than physical
//! position.  Printable Latin-1 characters use their ASCII value as KeySym
//! (`XK_a` is `0x61`, `XK_slash` is `0x2f`), while function and editing keys
//! live in the `0xFFxx` range (`XK_Return` is `0xFF0D`).
//!
//! The XTest backend converts a KeySym to a hardware keycode with
//! `XKeysymToKeycode` and then synthesises press/release events for it.

use crate::keys::{KeyToken, Modifier, SpecialKey};

/// Translates a [`KeyToken`] to an X11 KeySym.
///
/// Every token of the vocabulary has a KeySym, so this currently never
/// returns `None`; the `Option` keeps the signature aligned with the macOS
/// table.
pub fn key_to_keysym(key: KeyToken) -> Option<u32> {
    match key {
        KeyToken::Char(c) if c.is_ascii_graphic() => Some(c as u32),
        KeyToken::Char(_) => None,
        KeyToken::Special(special) => Some(special_to_keysym(special)),
    }
}

/// Translates a [`Modifier`] to the KeySym of its left-hand key.
pub fn modifier_to_keysym(modifier: Modifier) -> u32 {
    match modifier {
        Modifier::Command => 0xFFEB, // XK_Super_L
        Modifier::Option => 0xFFE9,  // XK_Alt_L
        Modifier::Control => 0xFFE3, // XK_Control_L
        Modifier::Shift => 0xFFE1,   // XK_Shift_L
    }
}

fn special_to_keysym(special: SpecialKey) -> u32 {
    match special {
        SpecialKey::Space => 0x0020,     // XK_space
        SpecialKey::Backspace => 0xFF08, // XK_BackSpace
        SpecialKey::Tab => 0xFF09,       // XK_Tab
        SpecialKey::Enter => 0xFF0D,     // XK_Return
        SpecialKey::Esc => 0xFF1B,       // XK_Escape
        SpecialKey::Home => 0xFF50,      // XK_Home
        SpecialKey::Left => 0xFF51,      // XK_Left
        SpecialKey::Up => 0xFF52,        // XK_Up
        SpecialKey::Right => 0xFF53,     // XK_Right
        SpecialKey::Down => 0xFF54,      // XK_Down
        SpecialKey::PageUp => 0xFF55,    // XK_Page_Up
        SpecialKey::PageDown => 0xFF56,  // XK_Page_Down
        SpecialKey::End => 0xFF57,       // XK_End
        SpecialKey::Delete => 0xFFFF,    // XK_Delete

        SpecialKey::F1 => 0xFFBE,
        SpecialKey::F2 => 0xFFBF,
        SpecialKey::F3 => 0xFFC0,
        SpecialKey::F4 => 0xFFC1,
        SpecialKey::F5 => 0xFFC2,
        SpecialKey::F6 => 0xFFC3,
        SpecialKey::F7 => 0xFFC4,
        SpecialKey::F8 => 0xFFC5,
        SpecialKey::F9 => 0xFFC6,
        SpecialKey::F10 => 0xFFC7,
        SpecialKey::F11 => 0xFFC8,
        SpecialKey::F12 => 0xFFC9,
    }
}
