//! Mock script runner for unit testing.
//!
//! Records every chord it is asked to run instead of spawning `osascript`
//! or `xdotool`.  Set `should_fail` or `deny_permission` to exercise the
//! caller's error paths.

use std::sync::{Mutex, PoisonError};

use osckey_core::KeyCombination;

use crate::application::execute_action::{ExecutionError, ScriptRunner};

#[derive(Default)]
pub struct MockScriptRunner {
    /// Every chord passed to `run_chord`, including failed ones.
    pub chords: Mutex<Vec<KeyCombination>>,
    pub should_fail: bool,
    pub deny_permission: bool,
}

impl MockScriptRunner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScriptRunner for MockScriptRunner {
    fn run_chord(&self, combination: &KeyCombination) -> Result<(), ExecutionError> {
        self.chords
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*combination);
        if self.deny_permission {
            return Err(ExecutionError::PermissionDenied(
                "injected permission failure".to_string(),
            ));
        }
        if self.should_fail {
            return Err(ExecutionError::Other("injected failure".to_string()));
        }
        Ok(())
    }
}
