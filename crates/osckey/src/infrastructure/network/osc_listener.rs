//! UDP listener for OSC control messages.
//!
//! osckey binds a UDP socket on the configured address (default
//! `0.0.0.0:5005`) and hands every decoded message to the
//! [`DispatchPipeline`].
//!
//! The listener runs on a dedicated OS thread so that synchronous socket
//! I/O and key injection (which sleeps between key events) never block the
//! Tokio runtime that serves configuration commands.
//!
//! # What is OSC? (for beginners)
//!
//! Open Sound Control is a small binary message format usually carried in
//! UDP datagrams.  Each message has:
//!
//! - an **address** such as `/key/save`, and
//! - a list of typed **arguments** (int, float, string, bool, ...).
//!
//! Several messages can be grouped into a **bundle**, which may nest other
//! bundles.  We flatten bundles and dispatch their messages in order,
//! ignoring the bundle's time tag.
//!
//! Arguments are turned into text before resolution: strings are kept
//! verbatim, numbers and booleans are rendered, and other types (blobs,
//! MIDI, colours, ...) are dropped.
//!
//! # Read timeout
//!
//! The socket has a 500 ms read timeout.  `recv_from` therefore returns at
//! least twice a second, at which point the loop checks the `running` flag
//! and exits cleanly once it has been cleared.

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::JoinHandle;
use std::time::Duration;

use osckey_core::InboundMessage;
use rosc::{OscMessage, OscPacket, OscType};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::application::dispatch_message::DispatchPipeline;

/// How long `recv_from` blocks before the running flag is re-checked.
pub const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Largest datagram we accept (the UDP payload limit).
const RECV_BUFFER_SIZE: usize = 65_536;

/// Error type for listener start-up.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The UDP socket could not be bound.
    #[error("failed to bind OSC socket on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// The socket was bound but could not be configured.
    #[error("failed to configure OSC socket: {0}")]
    Socket(#[source] io::Error),

    /// The listener thread could not be spawned.
    #[error("failed to spawn listener thread: {0}")]
    Spawn(#[source] io::Error),
}

/// Owner of a running listener thread.
///
/// Dropping the handle stops the listener, same as [`ListenerHandle::stop`].
#[derive(Debug)]
pub struct ListenerHandle {
    local_addr: SocketAddr,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl ListenerHandle {
    /// The address the socket is actually bound to (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Whether the receive loop is still running.
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Clears the running flag and waits for the thread to exit.
    ///
    /// Returns within roughly one [`READ_TIMEOUT`] plus the time needed to
    /// finish the message being processed.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("OSC listener thread panicked");
            }
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Binds `addr` and spawns the listener thread.
///
/// `running` is set to `true` before the thread starts; clearing it (or
/// calling [`ListenerHandle::stop`]) ends the loop.
///
/// # Errors
///
/// Returns [`ListenerError::BindFailed`] if the socket cannot be bound, for
/// example because another process already owns the port.
pub fn start_osc_listener(
    addr: SocketAddr,
    pipeline: Arc<DispatchPipeline>,
    running: Arc<AtomicBool>,
) -> Result<ListenerHandle, ListenerError> {
    let socket =
        UdpSocket::bind(addr).map_err(|source| ListenerError::BindFailed { addr, source })?;
    socket
        .set_read_timeout(Some(READ_TIMEOUT))
        .map_err(ListenerError::Socket)?;
    let local_addr = socket.local_addr().map_err(ListenerError::Socket)?;

    running.store(true, Ordering::Relaxed);
    let loop_running = Arc::clone(&running);
    let thread = std::thread::Builder::new()
        .name("osckey-listener".to_string())
        .spawn(move || listener_loop(socket, pipeline, loop_running))
        .map_err(|e| {
            running.store(false, Ordering::Relaxed);
            ListenerError::Spawn(e)
        })?;

    info!("OSC listener started on UDP {local_addr}");
    Ok(ListenerHandle {
        local_addr,
        running,
        thread: Some(thread),
    })
}

/// The main receive loop executed on the listener thread.
fn listener_loop(socket: UdpSocket, pipeline: Arc<DispatchPipeline>, running: Arc<AtomicBool>) {
    let mut buf = vec![0u8; RECV_BUFFER_SIZE];

    while running.load(Ordering::Relaxed) {
        let (len, src) = match socket.recv_from(&mut buf) {
            Ok(pair) => pair,
            Err(e) if is_timeout_error(&e) => continue,
            Err(e) => {
                error!("OSC recv error: {e}");
                continue;
            }
        };

        let packet = match rosc::decoder::decode_udp(&buf[..len]) {
            Ok((_, packet)) => packet,
            Err(e) => {
                debug!("failed to decode OSC datagram from {src}: {e:?}");
                continue;
            }
        };

        for message in packet_messages(packet) {
            pipeline.handle(&message);
        }
    }

    info!("OSC listener stopped");
}

/// Flattens a packet (and any nested bundles) into inbound messages.
pub fn packet_messages(packet: OscPacket) -> Vec<InboundMessage> {
    let mut out = Vec::new();
    collect_messages(packet, &mut out);
    out
}

fn collect_messages(packet: OscPacket, out: &mut Vec<InboundMessage>) {
    match packet {
        OscPacket::Message(msg) => out.push(to_inbound(msg)),
        OscPacket::Bundle(bundle) => {
            for inner in bundle.content {
                collect_messages(inner, out);
            }
        }
    }
}

fn to_inbound(msg: OscMessage) -> InboundMessage {
    let raw: Vec<String> = msg.args.iter().filter_map(arg_to_string).collect();
    InboundMessage::from_raw(msg.addr, &raw)
}

/// Text form of one OSC argument, or `None` for types we ignore.
pub fn arg_to_string(arg: &OscType) -> Option<String> {
    match arg {
        OscType::String(s) => Some(s.clone()),
        OscType::Int(i) => Some(i.to_string()),
        OscType::Long(l) => Some(l.to_string()),
        OscType::Float(f) => Some(f.to_string()),
        OscType::Double(d) => Some(d.to_string()),
        OscType::Bool(b) => Some(b.to_string()),
        OscType::Char(c) => Some(c.to_string()),
        _ => None,
    }
}

/// Returns `true` for OS timeout / would-block errors that should be retried.
fn is_timeout_error(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
