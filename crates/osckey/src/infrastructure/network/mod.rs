//! Network adapters.
//!
//! - **`osc_listener`** – Blocking UDP receive loop that decodes OSC packets
//!   and feeds each message to the dispatch pipeline.

pub mod osc_listener;
