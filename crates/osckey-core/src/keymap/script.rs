//! Script text for the scripted dispatch path.
//!
//! Window managers such as Magnet only react to arrow-key chords that arrive
//! through the OS scripting layer, so those chords are rendered as a command
//! line instead of raw key events:
//!
//! ```text
//! control+option+left  →  tell application "System Events" to key code 123 using {control down, option down}
//! control+option+left  →  xdotool key ctrl+alt+Left
//! ```

use crate::keys::{KeyCombination, KeyToken, Modifier, SpecialKey};

use super::macos_vk;

/// Modifier order used in rendered scripts, matching how the chords are
/// written in AppleScript and `xdotool` documentation.
const SCRIPT_ORDER: [Modifier; 4] = [
    Modifier::Control,
    Modifier::Option,
    Modifier::Shift,
    Modifier::Command,
];

fn script_modifiers(combination: &KeyCombination) -> impl Iterator<Item = Modifier> + '_ {
    SCRIPT_ORDER
        .into_iter()
        .filter(move |m| combination.modifiers.contains(*m))
}

/// Renders the AppleScript statement that presses `combination`.
///
/// Keys with a virtual key code use `key code N`; other printable characters
/// use `keystroke "c"`.
pub fn applescript_for(combination: &KeyCombination) -> String {
    let action = match macos_vk::key_to_vk(combination.key) {
        Some(code) => format!("key code {code}"),
        None => format!("keystroke \"{}\"", escape_applescript(&combination.key.name())),
    };

    let mut script = format!("tell application \"System Events\" to {action}");
    if !combination.modifiers.is_empty() {
        let using: Vec<&str> = script_modifiers(combination).map(applescript_modifier).collect();
        script.push_str(&format!(" using {{{}}}", using.join(", ")));
    }
    script
}

/// Renders the `xdotool key` chord argument, e.g. `ctrl+alt+Left`.
pub fn xdotool_chord(combination: &KeyCombination) -> String {
    let mut parts: Vec<String> = script_modifiers(combination)
        .map(|m| xdotool_modifier(m).to_string())
        .collect();
    parts.push(xdotool_key(combination.key));
    parts.join("+")
}

fn applescript_modifier(modifier: Modifier) -> &'static str {
    match modifier {
        Modifier::Command => "command down",
        Modifier::Option => "option down",
        Modifier::Control => "control down",
        Modifier::Shift => "shift down",
    }
}

fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn xdotool_modifier(modifier: Modifier) -> &'static str {
    match modifier {
        Modifier::Command => "super",
        Modifier::Option => "alt",
        Modifier::Control => "ctrl",
        Modifier::Shift => "shift",
    }
}

/// KeySym name understood by `xdotool`.
fn xdotool_key(key: KeyToken) -> String {
    match key {
        KeyToken::Char(c) if c.is_ascii_alphanumeric() => c.to_string(),
        KeyToken::Char(c) => punctuation_keysym_name(c)
            .map(str::to_string)
            .unwrap_or_else(|| c.to_string()),
        KeyToken::Special(special) => special_keysym_name(special).to_string(),
    }
}

fn special_keysym_name(special: SpecialKey) -> &'static str {
    match special {
        SpecialKey::Space => "space",
        SpecialKey::Enter => "Return",
        SpecialKey::Tab => "Tab",
        SpecialKey::Backspace => "BackSpace",
        SpecialKey::Delete => "Delete",
        SpecialKey::Esc => "Escape",
        SpecialKey::Up => "Up",
        SpecialKey::Down => "Down",
        SpecialKey::Left => "Left",
        SpecialKey::Right => "Right",
        SpecialKey::Home => "Home",
        SpecialKey::End => "End",
        SpecialKey::PageUp => "Prior",
        SpecialKey::PageDown => "Next",
        SpecialKey::F1 => "F1",
        SpecialKey::F2 => "F2",
        SpecialKey::F3 => "F3",
        SpecialKey::F4 => "F4",
        SpecialKey::F5 => "F5",
        SpecialKey::F6 => "F6",
        SpecialKey::F7 => "F7",
        SpecialKey::F8 => "F8",
        SpecialKey::F9 => "F9",
        SpecialKey::F10 => "F10",
        SpecialKey::F11 => "F11",
        SpecialKey::F12 => "F12",
    }
}

fn punctuation_keysym_name(c: char) -> Option<&'static str> {
    let name = match c {
        '!' => "exclam",
        '"' => "quotedbl",
        '#' => "numbersign",
        '$' => "dollar",
        '%' => "percent",
        '&' => "ampersand",
        '\'' => "apostrophe",
        '(' => "parenleft",
        ')' => "parenright",
        '*' => "asterisk",
        '+' => "plus",
        ',' => "comma",
        '-' => "minus",
        '.' => "period",
        '/' => "slash",
        ':' => "colon",
        ';' => "semicolon",
        '<' => "less",
        '=' => "equal",
        '>' => "greater",
        '?' => "question",
        '@' => "at",
        '[' => "bracketleft",
        '\\' => "backslash",
        ']' => "bracketright",
        '^' => "asciicircum",
        '_' => "underscore",
        '`' => "grave",
        '{' => "braceleft",
        '|' => "bar",
        '}' => "braceright",
        '~' => "asciitilde",
        _ => return None,
    };
    Some(name)
}
