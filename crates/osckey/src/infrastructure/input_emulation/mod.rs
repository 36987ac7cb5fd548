//! Platform-specific keyboard emulation implementations.
//!
//! The correct implementation is selected at compile time via
//! `#[cfg(target_os = ...)]`.  [`platform_emulator`] returns it behind the
//! [`KeyboardEmulator`] trait so the rest of the program never names a
//! platform type.
//!
//! [`DryRunEmulator`] logs the events it would have sent.  `main` uses it
//! for `--dry-run` and when no backend can be opened (e.g. a Linux session
//! without `$DISPLAY`).

use std::sync::Arc;

use osckey_core::ModifierSet;
use tracing::info;

use crate::application::execute_action::{EmulatedKey, ExecutionError, KeyboardEmulator};

pub mod mock;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "macos")]
pub mod macos;

/// Opens the keyboard backend for the current OS.
///
/// # Errors
///
/// Returns [`ExecutionError::Other`] if the backend cannot be opened.
#[cfg(target_os = "macos")]
pub fn platform_emulator() -> Result<Arc<dyn KeyboardEmulator>, ExecutionError> {
    Ok(Arc::new(macos::MacosKeyboardEmulator::new()))
}

/// Opens the keyboard backend for the current OS.
///
/// # Errors
///
/// Returns [`ExecutionError::Other`] if the X display cannot be opened.
#[cfg(target_os = "linux")]
pub fn platform_emulator() -> Result<Arc<dyn KeyboardEmulator>, ExecutionError> {
    Ok(Arc::new(linux::XTestKeyboardEmulator::open()?))
}

/// Opens the keyboard backend for the current OS.
///
/// # Errors
///
/// Always fails: this OS has no keyboard backend.
#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub fn platform_emulator() -> Result<Arc<dyn KeyboardEmulator>, ExecutionError> {
    Err(ExecutionError::Other(
        "no keyboard backend for this platform".to_string(),
    ))
}

/// Whether the OS currently allows this process to inject input.
///
/// Only macOS gates synthetic events behind a user grant (Accessibility);
/// elsewhere this is always `true`.
pub fn input_permission_granted() -> bool {
    #[cfg(target_os = "macos")]
    {
        macos::is_process_trusted()
    }
    #[cfg(not(target_os = "macos"))]
    {
        true
    }
}

/// A backend that only logs what it would press.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunEmulator;

impl KeyboardEmulator for DryRunEmulator {
    fn press_key(&self, key: EmulatedKey, held: ModifierSet) -> Result<(), ExecutionError> {
        info!(?key, held = ?held.names(), "dry run: key down");
        Ok(())
    }

    fn release_key(&self, key: EmulatedKey, held: ModifierSet) -> Result<(), ExecutionError> {
        info!(?key, held = ?held.names(), "dry run: key up");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osckey_core::{KeyToken, Modifier};

    #[test]
    fn test_dry_run_emulator_never_fails() {
        let emulator = DryRunEmulator;
        let key = EmulatedKey::Key(KeyToken::Char('a'));
        let held = ModifierSet::from([Modifier::Command]);

        assert!(emulator.press_key(key, held).is_ok());
        assert!(emulator.release_key(key, held).is_ok());
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_input_permission_is_implicit_off_macos() {
        assert!(input_permission_granted());
    }
}
