//! Linux script runner: `xdotool key`.

use osckey_core::keymap::KeyMapper;
use osckey_core::KeyCombination;

use super::run_tool;
use crate::application::execute_action::{ExecutionError, ScriptRunner};

/// Sends chords with `xdotool key --clearmodifiers <chord>`.
#[derive(Debug, Clone)]
pub struct XdotoolRunner {
    program: String,
}

impl XdotoolRunner {
    pub fn new() -> Self {
        Self::with_program("xdotool")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments passed to xdotool for `combination`.
    pub fn args_for(combination: &KeyCombination) -> Vec<String> {
        vec![
            "key".to_string(),
            "--clearmodifiers".to_string(),
            KeyMapper::xdotool_chord(combination),
        ]
    }
}

impl Default for XdotoolRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptRunner for XdotoolRunner {
    fn run_chord(&self, combination: &KeyCombination) -> Result<(), ExecutionError> {
        let args = Self::args_for(combination);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_tool(&self.program, &args)
    }
}
