//! Infrastructure layer for osckey.
//!
//! Contains OS-facing adapters: keyboard injection APIs, script runners,
//! the UDP listener, the TOML config file, the in-memory log buffer, and the
//! configuration command bridge.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `osckey_core`, but MUST NOT be imported by the `application` or domain
//! layers (tests excepted).
//!
//! # Sub-modules
//!
//! - **`input_emulation`** – OS-specific implementations of `KeyboardEmulator`.
//!   The correct implementation is selected at compile time using
//!   `#[cfg(target_os)]`.  A `MockKeyboardEmulator` is also provided for tests.
//!
//! - **`script_runner`** – `ScriptRunner` implementations that shell out to
//!   `osascript` (macOS) or `xdotool` (Linux) for window-management chords.
//!
//! - **`network`** – The blocking OSC/UDP listener thread.
//!
//! - **`storage`** – `config.toml` load/save, the TOML-backed shortcut store,
//!   and the legacy JSON importer.
//!
//! - **`logging`** – `tracing` subscriber setup plus a ring buffer layer that
//!   keeps the most recent log lines for `get_logs`.
//!
//! - **`ui_bridge`** – Command handlers that expose configuration and logs to
//!   a front end (or the CLI).

pub mod input_emulation;
pub mod logging;
pub mod network;
pub mod script_runner;
pub mod storage;
pub mod ui_bridge;
