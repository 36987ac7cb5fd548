//! macOS script runner: `osascript` driving System Events.

use osckey_core::keymap::KeyMapper;
use osckey_core::KeyCombination;

use super::run_tool;
use crate::application::execute_action::{ExecutionError, ScriptRunner};

/// Sends chords as AppleScript `key code ... using {...}` commands.
///
/// Requires the Accessibility grant for the app that launched osckey
/// (Terminal, iTerm, or the bundled app).  Denials surface as
/// [`ExecutionError::PermissionDenied`].
#[derive(Debug, Clone)]
pub struct OsascriptRunner {
    program: String,
}

impl OsascriptRunner {
    pub fn new() -> Self {
        Self::with_program("osascript")
    }

    /// Uses a different interpreter binary (tests point this at a stub).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The AppleScript source sent for `combination`.
    pub fn script_for(combination: &KeyCombination) -> String {
        KeyMapper::applescript_for(combination)
    }
}

impl Default for OsascriptRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptRunner for OsascriptRunner {
    fn run_chord(&self, combination: &KeyCombination) -> Result<(), ExecutionError> {
        let script = Self::script_for(combination);
        run_tool(&self.program, &["-e", &script])
    }
}
