//! Base key tokens: printable characters and the special-key vocabulary.

use std::fmt;
use std::str::FromStr;

use super::KeyParseError;

/// Named non-character keys a message may refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKey {
    Space,
    Enter,
    Tab,
    Backspace,
    Delete,
    Esc,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

impl SpecialKey {
    /// Every special key, in vocabulary order.
    pub const ALL: [SpecialKey; 26] = [
        SpecialKey::Space,
        SpecialKey::Enter,
        SpecialKey::Tab,
        SpecialKey::Backspace,
        SpecialKey::Delete,
        SpecialKey::Esc,
        SpecialKey::Up,
        SpecialKey::Down,
        SpecialKey::Left,
        SpecialKey::Right,
        SpecialKey::Home,
        SpecialKey::End,
        SpecialKey::PageUp,
        SpecialKey::PageDown,
        SpecialKey::F1,
        SpecialKey::F2,
        SpecialKey::F3,
        SpecialKey::F4,
        SpecialKey::F5,
        SpecialKey::F6,
        SpecialKey::F7,
        SpecialKey::F8,
        SpecialKey::F9,
        SpecialKey::F10,
        SpecialKey::F11,
        SpecialKey::F12,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            SpecialKey::Space => "space",
            SpecialKey::Enter => "enter",
            SpecialKey::Tab => "tab",
            SpecialKey::Backspace => "backspace",
            SpecialKey::Delete => "delete",
            SpecialKey::Esc => "esc",
            SpecialKey::Up => "up",
            SpecialKey::Down => "down",
            SpecialKey::Left => "left",
            SpecialKey::Right => "right",
            SpecialKey::Home => "home",
            SpecialKey::End => "end",
            SpecialKey::PageUp => "pageup",
            SpecialKey::PageDown => "pagedown",
            SpecialKey::F1 => "f1",
            SpecialKey::F2 => "f2",
            SpecialKey::F3 => "f3",
            SpecialKey::F4 => "f4",
            SpecialKey::F5 => "f5",
            SpecialKey::F6 => "f6",
            SpecialKey::F7 => "f7",
            SpecialKey::F8 => "f8",
            SpecialKey::F9 => "f9",
            SpecialKey::F10 => "f10",
            SpecialKey::F11 => "f11",
            SpecialKey::F12 => "f12",
        }
    }

    /// Looks up a lowercase name.  `return` and `escape` are accepted as
    /// aliases for `enter` and `esc`.
    pub fn from_name(name: &str) -> Option<SpecialKey> {
        match name {
            "return" => Some(SpecialKey::Enter),
            "escape" => Some(SpecialKey::Esc),
            _ => SpecialKey::ALL.into_iter().find(|k| k.name() == name),
        }
    }

    /// `true` for the four arrow keys.
    pub fn is_arrow(self) -> bool {
        matches!(
            self,
            SpecialKey::Up | SpecialKey::Down | SpecialKey::Left | SpecialKey::Right
        )
    }
}

/// The base key of a chord.
///
/// Letters are stored lowercase; the shifted form is expressed with the
/// `shift` modifier, never with an uppercase character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyToken {
    /// A single printable ASCII character (`'!'..='~'`).
    Char(char),
    /// A key from the special-key vocabulary.
    Special(SpecialKey),
}

impl KeyToken {
    /// Canonical name: the character itself or the special key's name.
    pub fn name(&self) -> String {
        match self {
            KeyToken::Char(c) => c.to_string(),
            KeyToken::Special(k) => k.name().to_string(),
        }
    }

    /// `true` for the four arrow keys.
    pub fn is_arrow(&self) -> bool {
        matches!(self, KeyToken::Special(k) if k.is_arrow())
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyToken::Char(c) => write!(f, "{c}"),
            KeyToken::Special(k) => f.write_str(k.name()),
        }
    }
}

impl FromStr for KeyToken {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key(s)
    }
}

/// Parses a base key token.
///
/// A single printable ASCII character is returned as [`KeyToken::Char`]
/// (letters lowercased); anything longer is looked up case-insensitively in
/// the special-key vocabulary.
///
/// # Errors
///
/// Returns [`KeyParseError::UnknownKey`] naming `raw` when neither rule
/// matches.
pub fn parse_key(raw: &str) -> Result<KeyToken, KeyParseError> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_graphic() {
            return Ok(KeyToken::Char(c.to_ascii_lowercase()));
        }
    }

    SpecialKey::from_name(&trimmed.to_ascii_lowercase())
        .map(KeyToken::Special)
        .ok_or_else(|| KeyParseError::UnknownKey(raw.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_single_letter_is_lowercased() {
        assert_eq!(parse_key("S").unwrap(), KeyToken::Char('s'));
        assert_eq!(parse_key("s").unwrap(), KeyToken::Char('s'));
    }

    #[test]
    fn test_parse_key_single_punctuation() {
        assert_eq!(parse_key("/").unwrap(), KeyToken::Char('/'));
        assert_eq!(parse_key("1").unwrap(), KeyToken::Char('1'));
    }

    #[test]
    fn test_parse_key_special_names_are_case_insensitive() {
        assert_eq!(parse_key("Left").unwrap(), KeyToken::Special(SpecialKey::Left));
        assert_eq!(parse_key("PAGEDOWN").unwrap(), KeyToken::Special(SpecialKey::PageDown));
        assert_eq!(parse_key("f12").unwrap(), KeyToken::Special(SpecialKey::F12));
    }

    #[test]
    fn test_parse_key_accepts_return_and_escape_aliases() {
        assert_eq!(parse_key("return").unwrap(), KeyToken::Special(SpecialKey::Enter));
        assert_eq!(parse_key("escape").unwrap(), KeyToken::Special(SpecialKey::Esc));
    }

    #[test]
    fn test_parse_key_every_vocabulary_name_round_trips() {
        for key in SpecialKey::ALL {
            assert_eq!(parse_key(key.name()).unwrap(), KeyToken::Special(key));
        }
    }

    #[test]
    fn test_parse_key_unknown_word_names_the_token() {
        let err = parse_key("f13").unwrap_err();
        assert_eq!(err, KeyParseError::UnknownKey("f13".to_string()));
    }

    #[test]
    fn test_parse_key_rejects_non_ascii_character() {
        assert!(matches!(parse_key("é"), Err(KeyParseError::UnknownKey(_))));
    }

    #[test]
    fn test_parse_key_rejects_blank() {
        assert!(matches!(parse_key(" "), Err(KeyParseError::UnknownKey(_))));
    }

    #[test]
    fn test_key_token_is_arrow() {
        assert!(KeyToken::Special(SpecialKey::Up).is_arrow());
        assert!(!KeyToken::Special(SpecialKey::Home).is_arrow());
        assert!(!KeyToken::Char('a').is_arrow());
    }

    #[test]
    fn test_key_token_display_uses_canonical_name() {
        assert_eq!(KeyToken::Special(SpecialKey::PageUp).to_string(), "pageup");
        assert_eq!(KeyToken::Char('z').to_string(), "z");
    }
}
