//! Linux X11 keyboard emulation via the XTest extension.
//!
//! # What is XTest? (for beginners)
//!
//! XTest is an X11 protocol extension that lets a process synthesize keyboard
//! and mouse events as if the user had physically pressed a key.  These
//! events are delivered to the focused window exactly like real input.
//!
//! The key function is `XTestFakeKeyEvent(display, keycode, is_press, time)`.
//!
//! # Key code translation
//!
//! X11 uses *KeySyms* (symbolic names like `XK_a` = 0x0061) rather than
//! physical key positions, but `XTestFakeKeyEvent` takes a server *keycode*.
//! The conversion is:
//! ```text
//! KeyToken → X11 KeySym (KeyMapper) → XKeysymToKeycode(display, keysym) → keycode
//! ```
//!
//! Shifted symbols (`!`, `@`, ...) share a keycode with their unshifted key,
//! so sending them bare types the unshifted character.  Chords that need the
//! shifted form should name `shift` explicitly.
//!
//! # Permissions
//!
//! XTest needs access to the X display, which is normally satisfied when the
//! process runs in the same user session.  If `DISPLAY` is not set or the X
//! server is unreachable, [`XTestKeyboardEmulator::open`] fails.

#![cfg(target_os = "linux")]

use std::os::raw::{c_int, c_uint, c_ulong};
use std::ptr;
use std::sync::{Mutex, PoisonError};

use osckey_core::keymap::KeyMapper;
use osckey_core::ModifierSet;
use tracing::{debug, trace};
use x11::{xlib, xtest};

use crate::application::execute_action::{EmulatedKey, ExecutionError, KeyboardEmulator};

/// `CurrentTime`: let the server stamp the event.
const CURRENT_TIME: c_ulong = 0;

/// Owned X display connection.
struct DisplayHandle(*mut xlib::Display);

// SAFETY: the pointer is only dereferenced by Xlib while the surrounding
// Mutex is held, so at most one thread uses the connection at a time.
unsafe impl Send for DisplayHandle {}

/// Linux X11/XTest keyboard emulator.
pub struct XTestKeyboardEmulator {
    display: Mutex<DisplayHandle>,
}

impl XTestKeyboardEmulator {
    /// Connects to the display named by `$DISPLAY` and checks for XTest.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::Other` if the display cannot be opened or the
    /// server lacks the XTest extension.
    pub fn open() -> Result<Self, ExecutionError> {
        // SAFETY: a null name selects $DISPLAY; the result is checked below.
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            return Err(ExecutionError::Other(
                "cannot open X display (is DISPLAY set?)".to_string(),
            ));
        }

        let (mut event_base, mut error_base, mut major, mut minor): (c_int, c_int, c_int, c_int) =
            (0, 0, 0, 0);
        // SAFETY: display is non-null; the out-params are valid locals.
        let has_xtest = unsafe {
            xtest::XTestQueryExtension(
                display,
                &mut event_base,
                &mut error_base,
                &mut major,
                &mut minor,
            )
        } != 0;
        if !has_xtest {
            // SAFETY: display was opened above and is not used afterwards.
            unsafe { xlib::XCloseDisplay(display) };
            return Err(ExecutionError::Other(
                "X server does not support the XTest extension".to_string(),
            ));
        }

        debug!(major, minor, "XTest extension available");
        Ok(Self {
            display: Mutex::new(DisplayHandle(display)),
        })
    }

    fn fake_key(&self, key: EmulatedKey, is_press: bool) -> Result<(), ExecutionError> {
        let keysym = match key {
            EmulatedKey::Modifier(m) => KeyMapper::modifier_to_x11_keysym(m),
            EmulatedKey::Key(token) => KeyMapper::key_to_x11_keysym(token)
                .ok_or_else(|| ExecutionError::Other(format!("no X11 keysym for {token}")))?,
        };

        let guard = self.display.lock().unwrap_or_else(PoisonError::into_inner);
        let display = guard.0;

        // SAFETY: display stays open for the emulator's lifetime and the
        // guard serializes access to it.
        let keycode = unsafe { xlib::XKeysymToKeycode(display, xlib::KeySym::from(keysym)) };
        if keycode == 0 {
            return Err(ExecutionError::Other(format!(
                "keysym 0x{keysym:04X} is not mapped on this keyboard"
            )));
        }

        let state = if is_press { xlib::True } else { xlib::False };
        // SAFETY: as above.
        let sent = unsafe {
            let sent = xtest::XTestFakeKeyEvent(display, c_uint::from(keycode), state, CURRENT_TIME);
            xlib::XFlush(display);
            sent
        };
        if sent == 0 {
            return Err(ExecutionError::Other(format!(
                "XTestFakeKeyEvent rejected keycode {keycode}"
            )));
        }

        trace!(?key, keysym, keycode, is_press, "sent XTest key event");
        Ok(())
    }
}

impl KeyboardEmulator for XTestKeyboardEmulator {
    fn press_key(&self, key: EmulatedKey, _held: ModifierSet) -> Result<(), ExecutionError> {
        self.fake_key(key, true)
    }

    fn release_key(&self, key: EmulatedKey, _held: ModifierSet) -> Result<(), ExecutionError> {
        self.fake_key(key, false)
    }
}

impl Drop for XTestKeyboardEmulator {
    fn drop(&mut self) {
        let guard = self.display.get_mut().unwrap_or_else(PoisonError::into_inner);
        if !guard.0.is_null() {
            // SAFETY: the pointer came from XOpenDisplay and is closed once.
            unsafe { xlib::XCloseDisplay(guard.0) };
            guard.0 = ptr::null_mut();
        }
    }
}
