//! osckey library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does osckey do? (for beginners)
//!
//! Lighting consoles, DAWs, and touch-control surfaces (TouchOSC, QLab,
//! Bitfocus Companion) can send **OSC** (Open Sound Control) messages over
//! UDP.  osckey listens for those messages and turns each one into a
//! keyboard shortcut on the machine it runs on:
//!
//! 1. The listener thread receives a UDP datagram and decodes it with `rosc`.
//! 2. Arguments are flattened into words (`"command shift z"` → three words).
//! 3. The resolver (in `osckey-core`) maps the address and words to a chord,
//!    consulting the shortcut registry first.
//! 4. The executor presses the chord through the platform keyboard backend
//!    (CoreGraphics on macOS, XTest on Linux), or through the OS scripting
//!    layer for window-management arrow chords.
//!
//! Configuration commands in `infrastructure::ui_bridge` edit the same
//! registry while the listener is running.

/// Application layer: use cases for executing and dispatching messages.
pub mod application;

/// Infrastructure layer: OS adapters, network, storage, logging, and commands.
pub mod infrastructure;
