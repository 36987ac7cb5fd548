//! Domain entities for OSCKey.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain** (or "entities" layer).  Domain code:
//!
//! - Contains the core business rules of the application.
//! - Has **no** imports from OS APIs, network libraries, or file formats.
//! - Can be compiled and tested on any platform without any external setup.
//!
//! Here the rules are: which address maps to which chord, how a custom
//! shortcut shadows a builtin one, and which chords must travel through the
//! OS scripting layer instead of raw key events.  Persistence is reached only
//! through the [`registry::ShortcutStore`] port, which outer layers implement.

/// Builtin shortcut table.
pub mod builtin;

/// The `(address, args)` pair delivered by the listener.
pub mod message;

/// Live, concurrently shared address → shortcut map.
///
/// See [`registry::ShortcutRegistry`] for the main type.
pub mod registry;

/// Pure mapping from a message to a [`resolver::ResolvedAction`].
pub mod resolver;
