//! ExecuteActionUseCase: turns a resolved chord into OS input.
//!
//! This use case sits at the application layer and delegates to two ports:
//!
//! - a [`KeyboardEmulator`] for synthetic key events (the normal path), and
//! - a [`ScriptRunner`] for window-management arrow chords that must go
//!   through the OS scripting layer.
//!
//! The platform-specific implementations are in the infrastructure layer.
//!
//! # Press/release discipline
//!
//! A chord is pressed as: modifiers down (canonical order), key down, key
//! up, modifiers up (reverse order).  Every release is attempted even when
//! an earlier step failed, so a failure never leaves a modifier held down
//! on the operator's machine.  The first error is the one reported.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use osckey_core::{KeyCombination, KeyToken, Modifier, ModifierSet, ResolvedAction};
use thiserror::Error;
use tracing::debug;

/// Pause between consecutive key events so the target app sees each one.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(10);

/// Error type for chord execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The OS refused synthetic input (e.g. the macOS Accessibility grant is
    /// missing).
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Any other backend failure.
    #[error("{0}")]
    Other(String),
}

/// One physical key a backend is asked to press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmulatedKey {
    Modifier(Modifier),
    Key(KeyToken),
}

/// Platform-agnostic synthetic keyboard.
///
/// `held` is the set of modifiers that are down once this event is applied:
/// a modifier's own press includes it, its release no longer does.
/// Backends that stamp modifier flags on each event (CoreGraphics) use it;
/// backends that track state in the server (XTest) ignore it.
pub trait KeyboardEmulator: Send + Sync {
    /// Emits a key-down event.
    fn press_key(&self, key: EmulatedKey, held: ModifierSet) -> Result<(), ExecutionError>;

    /// Emits a key-up event.
    fn release_key(&self, key: EmulatedKey, held: ModifierSet) -> Result<(), ExecutionError>;
}

/// Runs a whole chord through the OS scripting layer.
pub trait ScriptRunner: Send + Sync {
    fn run_chord(&self, combination: &KeyCombination) -> Result<(), ExecutionError>;
}

/// The Execute Action use case.
pub struct ActionExecutor {
    keyboard: Arc<dyn KeyboardEmulator>,
    scripts: Arc<dyn ScriptRunner>,
    settle_delay: Duration,
}

impl ActionExecutor {
    /// Creates an executor with the default settle delay.
    pub fn new(keyboard: Arc<dyn KeyboardEmulator>, scripts: Arc<dyn ScriptRunner>) -> Self {
        Self {
            keyboard,
            scripts,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Overrides the pause between key events; `Duration::ZERO` disables it.
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Executes `action` through the matching port.
    ///
    /// [`ResolvedAction::Unresolved`] is a no-op: nothing is sent to the OS.
    ///
    /// # Errors
    ///
    /// Returns the first [`ExecutionError`] raised by the backend.
    pub fn execute(&self, action: &ResolvedAction) -> Result<(), ExecutionError> {
        match action {
            ResolvedAction::KeyPress { combination } => self.press_chord(combination),
            ResolvedAction::ScriptedAction { combination } => self.run_script(combination),
            ResolvedAction::Unresolved { .. } => Ok(()),
        }
    }

    /// Presses and releases `combination` as synthetic key events.
    ///
    /// # Errors
    ///
    /// Returns the first failure; the remaining releases are still attempted.
    pub fn press_chord(&self, combination: &KeyCombination) -> Result<(), ExecutionError> {
        debug!(chord = %combination, "pressing chord");

        let mut first_error: Option<ExecutionError> = None;
        let mut attempted: Vec<Modifier> = Vec::with_capacity(combination.modifiers.len());
        let mut held = ModifierSet::empty();

        for modifier in combination.modifiers.iter() {
            // A modifier whose press failed is still released below.
            attempted.push(modifier);
            let mut next = held;
            next.insert(modifier);
            match self.keyboard.press_key(EmulatedKey::Modifier(modifier), next) {
                Ok(()) => {
                    held = next;
                    self.settle();
                }
                Err(e) => {
                    first_error = Some(e);
                    break;
                }
            }
        }

        if first_error.is_none() {
            let key = EmulatedKey::Key(combination.key);
            let down = self.keyboard.press_key(key, held);
            self.settle();
            let up = self.keyboard.release_key(key, held);
            first_error = down.err().or(up.err());
        }

        for modifier in attempted.into_iter().rev() {
            held.remove(modifier);
            if let Err(e) = self.keyboard.release_key(EmulatedKey::Modifier(modifier), held) {
                first_error.get_or_insert(e);
            }
            self.settle();
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Hands `combination` to the script runner in a single call.
    ///
    /// # Errors
    ///
    /// Returns whatever the runner reports.
    pub fn run_script(&self, combination: &KeyCombination) -> Result<(), ExecutionError> {
        debug!(chord = %combination, "running chord through scripting layer");
        self.scripts.run_chord(combination)
    }

    fn settle(&self) {
        if !self.settle_delay.is_zero() {
            thread::sleep(self.settle_delay);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::input_emulation::mock::{KeyEvent, MockKeyboardEmulator};
    use crate::infrastructure::script_runner::mock::MockScriptRunner;
    use osckey_core::{SpecialKey, UnresolvedReason};

    fn combo(tokens: &[&str]) -> KeyCombination {
        KeyCombination::from_tokens(tokens).unwrap()
    }

    fn make_executor(
        keyboard: MockKeyboardEmulator,
        scripts: MockScriptRunner,
    ) -> (ActionExecutor, Arc<MockKeyboardEmulator>, Arc<MockScriptRunner>) {
        let keyboard = Arc::new(keyboard);
        let scripts = Arc::new(scripts);
        let executor = ActionExecutor::new(
            Arc::clone(&keyboard) as Arc<dyn KeyboardEmulator>,
            Arc::clone(&scripts) as Arc<dyn ScriptRunner>,
        )
        .with_settle_delay(Duration::ZERO);
        (executor, keyboard, scripts)
    }

    fn keys_of(events: &[KeyEvent]) -> Vec<(EmulatedKey, bool)> {
        events.iter().map(|e| (e.key, e.pressed)).collect()
    }

    // ── Key presses ───────────────────────────────────────────────────────────

    #[test]
    fn test_press_chord_orders_modifiers_then_key_then_reverse_release() {
        // Arrange
        let (executor, keyboard, _) =
            make_executor(MockKeyboardEmulator::new(), MockScriptRunner::new());

        // Act
        executor.press_chord(&combo(&["shift", "command", "z"])).unwrap();

        // Assert
        let events = keyboard.events.lock().unwrap();
        assert_eq!(
            keys_of(&events),
            vec![
                (EmulatedKey::Modifier(Modifier::Command), true),
                (EmulatedKey::Modifier(Modifier::Shift), true),
                (EmulatedKey::Key(KeyToken::Char('z')), true),
                (EmulatedKey::Key(KeyToken::Char('z')), false),
                (EmulatedKey::Modifier(Modifier::Shift), false),
                (EmulatedKey::Modifier(Modifier::Command), false),
            ]
        );
    }

    #[test]
    fn test_press_chord_reports_held_modifiers_on_each_event() {
        // Arrange
        let (executor, keyboard, _) =
            make_executor(MockKeyboardEmulator::new(), MockScriptRunner::new());

        // Act
        executor.press_chord(&combo(&["command", "s"])).unwrap();

        // Assert
        let events = keyboard.events.lock().unwrap();
        let command_only = ModifierSet::from([Modifier::Command]);
        assert_eq!(events[0].held, command_only, "command down includes itself");
        assert_eq!(events[1].held, command_only, "key down under command");
        assert_eq!(events[2].held, command_only, "key up under command");
        assert!(events[3].held.is_empty(), "command up clears the flags");
    }

    #[test]
    fn test_bare_key_press_emits_exactly_down_and_up() {
        // Arrange
        let (executor, keyboard, scripts) =
            make_executor(MockKeyboardEmulator::new(), MockScriptRunner::new());
        let action = ResolvedAction::KeyPress {
            combination: KeyCombination::bare(KeyToken::Special(SpecialKey::F5)),
        };

        // Act
        executor.execute(&action).unwrap();

        // Assert
        let f5 = EmulatedKey::Key(KeyToken::Special(SpecialKey::F5));
        assert_eq!(
            keys_of(&keyboard.events.lock().unwrap()),
            vec![(f5, true), (f5, false)]
        );
        assert!(scripts.chords.lock().unwrap().is_empty());
    }

    #[test]
    fn test_key_down_failure_still_releases_everything() {
        // Arrange
        let keyboard = MockKeyboardEmulator {
            fail_on_press: Some(EmulatedKey::Key(KeyToken::Char('s'))),
            ..MockKeyboardEmulator::default()
        };
        let (executor, keyboard, _) = make_executor(keyboard, MockScriptRunner::new());

        // Act
        let result = executor.press_chord(&combo(&["command", "s"]));

        // Assert
        assert!(matches!(result, Err(ExecutionError::Other(_))));
        let events = keyboard.events.lock().unwrap();
        assert_eq!(
            keys_of(&events),
            vec![
                (EmulatedKey::Modifier(Modifier::Command), true),
                (EmulatedKey::Key(KeyToken::Char('s')), false),
                (EmulatedKey::Modifier(Modifier::Command), false),
            ]
        );
    }

    #[test]
    fn test_modifier_failure_skips_key_and_releases_attempted_modifiers() {
        // Arrange
        let keyboard = MockKeyboardEmulator {
            fail_on_press: Some(EmulatedKey::Modifier(Modifier::Shift)),
            ..MockKeyboardEmulator::default()
        };
        let (executor, keyboard, _) = make_executor(keyboard, MockScriptRunner::new());

        // Act
        let result = executor.press_chord(&combo(&["command", "shift", "z"]));

        // Assert
        assert!(result.is_err());
        let events = keyboard.events.lock().unwrap();
        assert_eq!(
            keys_of(&events),
            vec![
                (EmulatedKey::Modifier(Modifier::Command), true),
                (EmulatedKey::Modifier(Modifier::Shift), false),
                (EmulatedKey::Modifier(Modifier::Command), false),
            ]
        );
    }

    #[test]
    fn test_permission_denied_is_propagated_unchanged() {
        // Arrange
        let keyboard = MockKeyboardEmulator {
            deny_permission: true,
            ..MockKeyboardEmulator::default()
        };
        let (executor, _, _) = make_executor(keyboard, MockScriptRunner::new());

        // Act
        let result = executor.press_chord(&combo(&["command", "c"]));

        // Assert
        assert!(matches!(result, Err(ExecutionError::PermissionDenied(_))));
    }

    // ── Scripted actions ──────────────────────────────────────────────────────

    #[test]
    fn test_scripted_action_goes_to_script_runner_only() {
        // Arrange
        let (executor, keyboard, scripts) =
            make_executor(MockKeyboardEmulator::new(), MockScriptRunner::new());
        let chord = combo(&["control", "option", "left"]);

        // Act
        executor
            .execute(&ResolvedAction::ScriptedAction { combination: chord })
            .unwrap();

        // Assert
        assert_eq!(*scripts.chords.lock().unwrap(), vec![chord]);
        assert!(keyboard.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_script_failure_is_returned() {
        // Arrange
        let scripts = MockScriptRunner {
            should_fail: true,
            ..MockScriptRunner::default()
        };
        let (executor, _, _) = make_executor(MockKeyboardEmulator::new(), scripts);

        // Act
        let result = executor.run_script(&combo(&["control", "option", "up"]));

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_unresolved_action_touches_no_backend() {
        // Arrange
        let (executor, keyboard, scripts) =
            make_executor(MockKeyboardEmulator::new(), MockScriptRunner::new());

        // Act
        executor
            .execute(&ResolvedAction::Unresolved {
                reason: UnresolvedReason::UnknownAddress,
            })
            .unwrap();

        // Assert
        assert!(keyboard.events.lock().unwrap().is_empty());
        assert!(scripts.chords.lock().unwrap().is_empty());
    }
}
