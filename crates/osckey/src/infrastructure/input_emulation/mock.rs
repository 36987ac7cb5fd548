//! Mock keyboard emulator for unit testing.
//!
//! # Why a mock emulator?
//!
//! The real emulators (`MacosKeyboardEmulator`, `XTestKeyboardEmulator`)
//! make OS API calls that:
//!
//! - Require a logged-in desktop session to run.
//! - Actually press keys on the test machine.
//! - Cannot be observed directly from Rust test code.
//!
//! The `MockKeyboardEmulator` replaces all OS calls with simple in-memory
//! recording.  Each successful event is pushed into a `Mutex<Vec<KeyEvent>>`
//! so that test assertions can inspect exactly what was emitted and in what
//! order.
//!
//! # Failure injection
//!
//! - `should_fail = true` makes every call return `ExecutionError::Other`.
//! - `deny_permission = true` makes every call return
//!   `ExecutionError::PermissionDenied`.
//! - `fail_on_press = Some(key)` fails only the press of that one key, which
//!   lets a test check that the executor still releases everything else.
//!
//! Failed calls are not recorded.

use std::sync::Mutex;

use osckey_core::ModifierSet;

use crate::application::execute_action::{EmulatedKey, ExecutionError, KeyboardEmulator};

/// One recorded key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: EmulatedKey,
    /// `true` for key-down, `false` for key-up.
    pub pressed: bool,
    pub held: ModifierSet,
}

/// A mock emulator that records all calls without performing OS API calls.
#[derive(Default)]
pub struct MockKeyboardEmulator {
    /// Every successful press and release, in call order.
    pub events: Mutex<Vec<KeyEvent>>,
    pub should_fail: bool,
    pub deny_permission: bool,
    pub fail_on_press: Option<EmulatedKey>,
}

impl MockKeyboardEmulator {
    /// Creates a new `MockKeyboardEmulator` with empty records and no failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// The keys that received a key-down, in order.
    pub fn pressed_keys(&self) -> Vec<EmulatedKey> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .filter(|e| e.pressed)
            .map(|e| e.key)
            .collect()
    }

    fn check(&self) -> Result<(), ExecutionError> {
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

    fn record(&self, key: EmulatedKey, pressed: bool, held: ModifierSet) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(KeyEvent { key, pressed, held });
    }
}

impl KeyboardEmulator for MockKeyboardEmulator {
    fn press_key(&self, key: EmulatedKey, held: ModifierSet) -> Result<(), ExecutionError> {
        self.check()?;
        if self.fail_on_press == Some(key) {
            return Err(ExecutionError::Other(format!("injected failure on {key:?}")));
        }
        self.record(key, true, held);
        Ok(())
    }

    fn release_key(&self, key: EmulatedKey, held: ModifierSet) -> Result<(), ExecutionError> {
        self.check()?;
        self.record(key, false, held);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
