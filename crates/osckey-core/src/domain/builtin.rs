use crate::keys::{KeyCombination, KeyToken, Modifier, SpecialKey};

use super::registry::{Origin, ShortcutEntry};

const CMD: [Modifier; 1] = [Modifier::Command];
const CMD_SHIFT: [Modifier; 2] = [Modifier::Command, Modifier::Shift];
const WINDOW: [Modifier; 2] = [Modifier::Control, Modifier::Option];

/// Returns the builtin shortcut table in display order.
///
/// | Address              | Chord                  |
/// |----------------------|------------------------|
/// | `/key/save`          | command+s              |
/// | `/key/copy`          | command+c              |
/// | `/key/paste`         | command+v              |
/// | `/key/cut`           | command+x              |
/// | `/key/undo`          | command+z              |
/// | `/key/redo`          | command+shift+z        |
/// | `/key/selectall`     | command+a              |
/// | `/key/windowleft`    | control+option+left    |
/// | `/key/windowright`   | control+option+right   |
/// | `/key/windowup`      | control+option+up      |
/// | `/key/windowdown`    | control+option+down    |
/// | `/key/windowmax`     | control+option+enter   |
pub fn builtin_entries() -> Vec<ShortcutEntry> {
    vec![
        entry("/key/save", char_chord(CMD, 's'), "Save"),
        entry("/key/copy", char_chord(CMD, 'c'), "Copy"),
        entry("/key/paste", char_chord(CMD, 'v'), "Paste"),
        entry("/key/cut", char_chord(CMD, 'x'), "Cut"),
        entry("/key/undo", char_chord(CMD, 'z'), "Undo"),
        entry("/key/redo", char_chord(CMD_SHIFT, 'z'), "Redo"),
        entry("/key/selectall", char_chord(CMD, 'a'), "Select all"),
        entry("/key/windowleft", special_chord(WINDOW, SpecialKey::Left), "Window left half"),
        entry("/key/windowright", special_chord(WINDOW, SpecialKey::Right), "Window right half"),
        entry("/key/windowup", special_chord(WINDOW, SpecialKey::Up), "Window top half"),
        entry("/key/windowdown", special_chord(WINDOW, SpecialKey::Down), "Window bottom half"),
        entry("/key/windowmax", special_chord(WINDOW, SpecialKey::Enter), "Maximize window"),
    ]
}

fn char_chord<const N: usize>(modifiers: [Modifier; N], c: char) -> KeyCombination {
    KeyCombination::new(modifiers, KeyToken::Char(c))
}

fn special_chord<const N: usize>(modifiers: [Modifier; N], key: SpecialKey) -> KeyCombination {
    KeyCombination::new(modifiers, KeyToken::Special(key))
}

fn entry(address: &str, combination: KeyCombination, description: &str) -> ShortcutEntry {
    ShortcutEntry {
        address: address.to_string(),
        combination,
        description: description.to_string(),
        origin: Origin::Builtin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_addresses_are_unique() {
        let entries = builtin_entries();
        let addresses: HashSet<_> = entries.iter().map(|e| e.address.as_str()).collect();
        assert_eq!(addresses.len(), entries.len());
    }

    #[test]
    fn test_builtin_table_contents() {
        let entries = builtin_entries();
        let chord = |address: &str| {
            entries
                .iter()
                .find(|e| e.address == address)
                .map(|e| e.combination.to_string())
        };

        assert_eq!(chord("/key/save").as_deref(), Some("command+s"));
        assert_eq!(chord("/key/redo").as_deref(), Some("command+shift+z"));
        assert_eq!(chord("/key/windowleft").as_deref(), Some("option+control+left"));
        assert_eq!(chord("/key/windowmax").as_deref(), Some("option+control+enter"));
    }

    #[test]
    fn test_builtin_entries_are_marked_builtin() {
        assert!(builtin_entries().iter().all(|e| e.origin == Origin::Builtin));
    }
}
