//! Storage infrastructure: configuration file persistence.
//!
//! - **`config`** – Reads and writes `config.toml` in the platform config
//!   directory, supplies defaults on first run, and implements the
//!   `ShortcutStore` port on top of the same file.
//! - **`legacy`** – Imports the JSON config written by earlier OSC bridge
//!   releases (`osc_keyboard_config.json`).

pub mod config;
pub mod legacy;
