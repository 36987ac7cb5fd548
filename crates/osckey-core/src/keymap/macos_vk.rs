//! Key token to macOS virtual key code (`CGKeyCode`) translation table.
//!
//! Values are the `kVK_*` constants from HIToolbox `Events.h`.  They identify
//! physical key positions on an ANSI keyboard, not characters, so only the
//! unshifted character of each key is listed here.

use crate::keys::{KeyToken, Modifier, SpecialKey};

/// Translates a [`KeyToken`] to a macOS `CGKeyCode`.
///
/// Returns `None` for printable characters that are only reachable with
/// Shift on an ANSI layout.
pub fn key_to_vk(key: KeyToken) -> Option<u16> {
    match key {
        KeyToken::Char(c) => char_to_vk(c),
        KeyToken::Special(special) => Some(special_to_vk(special)),
    }
}

/// Translates a [`Modifier`] to the key code of its left-hand key.
pub fn modifier_to_vk(modifier: Modifier) -> u16 {
    match modifier {
        Modifier::Command => 0x37, // kVK_Command
        Modifier::Shift => 0x38,   // kVK_Shift
        Modifier::Option => 0x3A,  // kVK_Option
        Modifier::Control => 0x3B, // kVK_Control
    }
}

fn special_to_vk(special: SpecialKey) -> u16 {
    match special {
        SpecialKey::Enter => 0x24,     // kVK_Return
        SpecialKey::Tab => 0x30,       // kVK_Tab
        SpecialKey::Space => 0x31,     // kVK_Space
        SpecialKey::Backspace => 0x33, // kVK_Delete
        SpecialKey::Esc => 0x35,       // kVK_Escape
        SpecialKey::Home => 0x73,      // kVK_Home
        SpecialKey::PageUp => 0x74,    // kVK_PageUp
        SpecialKey::Delete => 0x75,    // kVK_ForwardDelete
        SpecialKey::End => 0x77,       // kVK_End
        SpecialKey::PageDown => 0x79,  // kVK_PageDown

        SpecialKey::Left => 0x7B,  // kVK_LeftArrow
        SpecialKey::Right => 0x7C, // kVK_RightArrow
        SpecialKey::Down => 0x7D,  // kVK_DownArrow
        SpecialKey::Up => 0x7E,    // kVK_UpArrow

        SpecialKey::F1 => 0x7A,
        SpecialKey::F2 => 0x78,
        SpecialKey::F3 => 0x63,
        SpecialKey::F4 => 0x76,
        SpecialKey::F5 => 0x60,
        SpecialKey::F6 => 0x61,
        SpecialKey::F7 => 0x62,
        SpecialKey::F8 => 0x64,
        SpecialKey::F9 => 0x65,
        SpecialKey::F10 => 0x6D,
        SpecialKey::F11 => 0x67,
        SpecialKey::F12 => 0x6F,
    }
}

fn char_to_vk(c: char) -> Option<u16> {
    let code = match c {
        // Letters (ANSI key position codes, not ASCII)
        'a' => 0x00,
        'b' => 0x0B,
        'c' => 0x08,
        'd' => 0x02,
        'e' => 0x0E,
        'f' => 0x03,
        'g' => 0x05,
        'h' => 0x04,
        'i' => 0x22,
        'j' => 0x26,
        'k' => 0x28,
        'l' => 0x25,
        'm' => 0x2E,
        'n' => 0x2D,
        'o' => 0x1F,
        'p' => 0x23,
        'q' => 0x0C,
        'r' => 0x0F,
        's' => 0x01,
        't' => 0x11,
        'u' => 0x20,
        'v' => 0x09,
        'w' => 0x0D,
        'x' => 0x07,
        'y' => 0x10,
        'z' => 0x06,

        // Digits
        '0' => 0x1D,
        '1' => 0x12,
        '2' => 0x13,
        '3' => 0x14,
        '4' => 0x15,
        '5' => 0x17,
        '6' => 0x16,
        '7' => 0x1A,
        '8' => 0x1C,
        '9' => 0x19,

        // Punctuation
        '-' => 0x1B,  // kVK_ANSI_Minus
        '=' => 0x18,  // kVK_ANSI_Equal
        '[' => 0x21,  // kVK_ANSI_LeftBracket
        ']' => 0x1E,  // kVK_ANSI_RightBracket
        '\\' => 0x2A, // kVK_ANSI_Backslash
        ';' => 0x29,  // kVK_ANSI_Semicolon
        '\'' => 0x27, // kVK_ANSI_Quote
        '`' => 0x32,  // kVK_ANSI_Grave
        ',' => 0x2B,  // kVK_ANSI_Comma
        '.' => 0x2F,  // kVK_ANSI_Period
        '/' => 0x2C,  // kVK_ANSI_Slash

        _ => return None,
    };
    Some(code)
}
