//! macOS CoreGraphics keyboard emulation.
//!
//! # What is CoreGraphics event injection? (for beginners)
//!
//! macOS exposes the CoreGraphics framework for low-level graphics and input
//! operations.  Posting a `CGEvent` at the HID tap injects a synthesized
//! event into the hardware input stream, the same level as a physical
//! keyboard.  The focused application cannot tell the two apart.
//!
//! The sequence for one key transition is:
//!
//! 1. `CGEventSource::new(HIDSystemState)`: an event source that mimics
//!    hardware state.
//! 2. `CGEvent::new_keyboard_event(source, keycode, key_down)`: build the
//!    event.
//! 3. `set_flags(..)`: stamp the modifiers that are currently held.
//! 4. `post(CGEventTapLocation::HID)`: inject it.
//!
//! The `core-graphics` crate wraps each CoreFoundation object in a type that
//! releases it on drop, so no manual `CFRelease` is needed.
//!
//! # Key code translation
//!
//! macOS identifies keys by `CGKeyCode`, the position on an ANSI layout.
//! [`KeyMapper::key_to_macos_vk`] provides the code.  Printable characters
//! with no ANSI position (shifted symbols such as `!`) are sent with
//! keycode 0 and the character attached via `set_string`.
//!
//! # Accessibility permission
//!
//! Posting at the HID tap requires the **Accessibility** permission in
//! System Settings → Privacy & Security → Accessibility.  Without it the
//! post silently does nothing, so every event first checks
//! `AXIsProcessTrusted` and fails with `PermissionDenied` instead.

#![cfg(target_os = "macos")]

use core_graphics::event::{CGEvent, CGEventFlags, CGEventTapLocation, CGKeyCode};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use osckey_core::keymap::KeyMapper;
use osckey_core::{KeyToken, Modifier, ModifierSet};
use tracing::trace;

use crate::application::execute_action::{EmulatedKey, ExecutionError, KeyboardEmulator};

#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
    fn AXIsProcessTrusted() -> bool;
}

/// Whether this process holds the Accessibility grant.
pub fn is_process_trusted() -> bool {
    // SAFETY: AXIsProcessTrusted takes no arguments and only reads TCC state.
    unsafe { AXIsProcessTrusted() }
}

/// Keycode used for characters that are delivered through `set_string`.
const UNICODE_CARRIER_KEYCODE: CGKeyCode = 0;

/// macOS CoreGraphics keyboard emulator.
#[derive(Debug, Default)]
pub struct MacosKeyboardEmulator;

impl MacosKeyboardEmulator {
    pub fn new() -> Self {
        Self
    }

    fn post(&self, key: EmulatedKey, key_down: bool, held: ModifierSet) -> Result<(), ExecutionError> {
        if !is_process_trusted() {
            return Err(ExecutionError::PermissionDenied(
                "Accessibility access is not granted; enable osckey in System Settings → \
                 Privacy & Security → Accessibility"
                    .to_string(),
            ));
        }

        let source = CGEventSource::new(CGEventSourceStateID::HIDSystemState)
            .map_err(|_| ExecutionError::Other("failed to create CGEventSource".to_string()))?;

        let (keycode, text) = match key {
            EmulatedKey::Modifier(m) => (KeyMapper::modifier_to_macos_vk(m), None),
            EmulatedKey::Key(token) => match KeyMapper::key_to_macos_vk(token) {
                Some(code) => (code, None),
                None => match token {
                    KeyToken::Char(c) => (UNICODE_CARRIER_KEYCODE, Some(c.to_string())),
                    KeyToken::Special(_) => {
                        return Err(ExecutionError::Other(format!(
                            "no macOS key code for {token}"
                        )))
                    }
                },
            },
        };

        let event = CGEvent::new_keyboard_event(source, keycode, key_down)
            .map_err(|_| ExecutionError::Other("failed to create keyboard event".to_string()))?;
        event.set_flags(event_flags(held));
        if let Some(text) = text.as_deref() {
            event.set_string(text);
        }
        event.post(CGEventTapLocation::HID);

        trace!(?key, keycode, key_down, "posted CGEvent");
        Ok(())
    }
}

impl KeyboardEmulator for MacosKeyboardEmulator {
    fn press_key(&self, key: EmulatedKey, held: ModifierSet) -> Result<(), ExecutionError> {
        self.post(key, true, held)
    }

    fn release_key(&self, key: EmulatedKey, held: ModifierSet) -> Result<(), ExecutionError> {
        self.post(key, false, held)
    }
}

/// CoreGraphics flag bits for a set of held modifiers.
fn event_flags(held: ModifierSet) -> CGEventFlags {
    let mut flags = CGEventFlags::CGEventFlagNull;
    for modifier in held.iter() {
        flags |= match modifier {
            Modifier::Command => CGEventFlags::CGEventFlagCommand,
            Modifier::Option => CGEventFlags::CGEventFlagAlternate,
            Modifier::Control => CGEventFlags::CGEventFlagControl,
            Modifier::Shift => CGEventFlags::CGEventFlagShift,
        };
    }
    flags
}
