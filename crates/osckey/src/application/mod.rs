//! Application layer use cases for osckey.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure business rules in `osckey-core`) and the infrastructure
//! (OS/network/storage).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a goal (e.g., "press the chord
//!   this message resolves to").
//! - **Depend on abstractions** (traits) rather than concrete implementations,
//!   so the keyboard backend can be swapped without changing this code.
//! - **Contain no OS calls, no network I/O, no file system access**.
//!
//! # Sub-modules
//!
//! - **`execute_action`** – Presses a resolved chord through a
//!   [`execute_action::KeyboardEmulator`] or runs it through a
//!   [`execute_action::ScriptRunner`], releasing every key it pressed.
//!
//! - **`dispatch_message`** – The per-message pipeline the listener calls:
//!   resolve, execute, log, and report the outcome.

pub mod dispatch_message;
pub mod execute_action;
