//! `ScriptRunner` implementations for window-management chords.
//!
//! Window managers such as Magnet and Rectangle (macOS) only react to
//! arrow chords that arrive through the OS scripting layer, so those chords
//! bypass the synthetic keyboard and are handed to an external tool:
//!
//! - **macOS**: `osascript -e 'tell application "System Events" to key code ...'`
//! - **Linux**: `xdotool key ctrl+alt+Left`
//!
//! Both runners shell out with [`std::process::Command`] and map a failed
//! exit status to an [`ExecutionError`], recognising the OS's "not
//! authorised" messages as [`ExecutionError::PermissionDenied`].

use std::io;
use std::process::Command;
use std::sync::Arc;

use osckey_core::KeyCombination;
use tracing::{debug, error, info};

use crate::application::execute_action::{ExecutionError, ScriptRunner};

pub mod mock;
pub mod osascript;
pub mod xdotool;

pub use osascript::OsascriptRunner;
pub use xdotool::XdotoolRunner;

/// The script runner for the current OS.
#[cfg(target_os = "macos")]
pub fn platform_script_runner() -> Arc<dyn ScriptRunner> {
    Arc::new(OsascriptRunner::new())
}

/// The script runner for the current OS.
#[cfg(target_os = "linux")]
pub fn platform_script_runner() -> Arc<dyn ScriptRunner> {
    Arc::new(XdotoolRunner::new())
}

/// The script runner for the current OS.
#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub fn platform_script_runner() -> Arc<dyn ScriptRunner> {
    Arc::new(UnsupportedScriptRunner)
}

/// Fails every chord; used where no scripting tool exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedScriptRunner;

impl ScriptRunner for UnsupportedScriptRunner {
    fn run_chord(&self, combination: &KeyCombination) -> Result<(), ExecutionError> {
        Err(ExecutionError::Other(format!(
            "no scripting layer on this platform for {combination}"
        )))
    }
}

/// Logs the script it would run instead of running it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunScriptRunner;

impl ScriptRunner for DryRunScriptRunner {
    fn run_chord(&self, combination: &KeyCombination) -> Result<(), ExecutionError> {
        info!(chord = %combination, "dry run: scripted chord");
        Ok(())
    }
}

/// Stderr fragments that mean the OS refused automation.
const PERMISSION_MARKERS: &[&str] = &[
    "not allowed",
    "not authorized",
    "(-1743)",
    "(1002)",
    "(-25211)",
];

/// Runs `program` with `args` and waits for it.
fn run_tool(program: &str, args: &[&str]) -> Result<(), ExecutionError> {
    debug!(program, args = ?args, "running script tool");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| spawn_error(program, e))?;

    if output.status.success() {
        debug!(program, "script tool succeeded");
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    error!(program, status = %output.status, stderr = %stderr.trim(), "script tool failed");
    Err(classify_failure(program, &stderr))
}

fn spawn_error(program: &str, e: io::Error) -> ExecutionError {
    if e.kind() == io::ErrorKind::NotFound {
        ExecutionError::Other(format!("{program} not found on PATH"))
    } else {
        ExecutionError::Other(format!("failed to run {program}: {e}"))
    }
}

/// Maps a failed run's stderr to an [`ExecutionError`].
fn classify_failure(program: &str, stderr: &str) -> ExecutionError {
    let lowered = stderr.to_ascii_lowercase();
    let message = format!("{program}: {}", stderr.trim());
    if PERMISSION_MARKERS.iter().any(|m| lowered.contains(m)) {
        ExecutionError::PermissionDenied(message)
    } else {
        ExecutionError::Other(message)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
