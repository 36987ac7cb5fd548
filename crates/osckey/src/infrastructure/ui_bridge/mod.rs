//! Command bridge: exposes configuration operations to a front end.
//!
//! Every command is a plain `async fn` that takes the shared [`AppState`] and
//! returns a [`CommandResult`].  The CLI in `main.rs` calls them directly; a
//! desktop or web front end would register the same functions as its command
//! handlers and serialise the results to JSON.
//!
//! # Data Transfer Objects (DTOs)
//!
//! Internal types such as `KeyCombination` and `ShortcutEntry` are shaped for
//! resolution, not for display.  DTOs (`ShortcutDto`, `ConfigDto`, ...) are
//! flat, serialisable structs holding exactly what a UI needs:
//!
//! - Only JSON-friendly fields (`String`, `u16`, `Vec<String>`, ...).
//! - `#[derive(Serialize)]` (plus `Deserialize` for request bodies).
//!
//! # `CommandResult<T>` wrapper
//!
//! All commands return `CommandResult<T>` rather than `Result<T, E>`, so every
//! response has the same shape:
//! `{ success: bool, data: T | null, error: string | null }`.
//!
//! # Concurrency
//!
//! Shortcut commands go straight to the [`ShortcutRegistry`], which is safe
//! to mutate while the listener thread resolves messages.  OSC settings and
//! the listener handle sit behind async Tokio mutexes so that two concurrent
//! `update_osc_config` calls cannot interleave a stop and a start.

use std::net::SocketAddr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use osckey_core::{
    classify, DispatchKind, KeyCombination, Origin, ShortcutEntry, ShortcutRecords,
    ShortcutRegistry,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::application::dispatch_message::DispatchPipeline;
use crate::infrastructure::logging::{LogBuffer, LogEntry};
use crate::infrastructure::network::osc_listener::{
    start_osc_listener, ListenerError, ListenerHandle,
};
use crate::infrastructure::storage::config::{ConfigFile, OscConfig};
use crate::infrastructure::storage::legacy::{import_into, parse_legacy_json, ImportSummary};

// ── Shared application state ──────────────────────────────────────────────────

/// Application state shared between command handlers.
///
/// Wrapped in `Arc<>` so every handler (and the Ctrl-C task in `main`) can
/// hold a reference.
pub struct AppState {
    /// The live shortcut table; also read by the listener through `pipeline`.
    pub registry: Arc<ShortcutRegistry>,
    /// The per-message pipeline the listener thread runs.
    pub pipeline: Arc<DispatchPipeline>,
    /// The config file shortcut and OSC edits are written to.
    pub config_file: Arc<ConfigFile>,
    /// OSC settings currently in effect.
    pub osc: Mutex<OscConfig>,
    /// The running listener, if any.
    pub listener: Mutex<Option<ListenerHandle>>,
    /// Recent log lines for `get_logs`.
    pub logs: Arc<LogBuffer>,
}

impl AppState {
    /// Builds state around an existing pipeline.  The listener is not
    /// started; call [`start_listener`].
    pub fn new(
        pipeline: Arc<DispatchPipeline>,
        config_file: Arc<ConfigFile>,
        osc: OscConfig,
        logs: Arc<LogBuffer>,
    ) -> Arc<Self> {
        Arc::new(Self {
            registry: Arc::clone(pipeline.registry()),
            pipeline,
            config_file,
            osc: Mutex::new(osc),
            listener: Mutex::new(None),
            logs,
        })
    }
}

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// One registry entry as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortcutDto {
    pub address: String,
    pub modifiers: Vec<String>,
    pub key: String,
    pub description: String,
    pub origin: Origin,
    /// Whether the chord is pressed as key events or run as a script.
    pub dispatch: DispatchKind,
    /// `true` for a builtin hidden by a custom entry at the same address.
    pub shadowed: bool,
}

impl ShortcutDto {
    fn from_entry(entry: &ShortcutEntry, shadowed: bool) -> Self {
        Self {
            address: entry.address.clone(),
            modifiers: entry.combination.modifiers.names(),
            key: entry.combination.key.name(),
            description: entry.description.clone(),
            origin: entry.origin,
            dispatch: classify(&entry.combination),
            shadowed,
        }
    }
}

/// Request body for [`add_shortcut`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddShortcutRequest {
    pub address: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub key: String,
    #[serde(default)]
    pub description: String,
}

/// OSC bind settings as sent to and from the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OscConfigDto {
    pub bind_address: String,
    pub port: u16,
}

impl From<&OscConfig> for OscConfigDto {
    fn from(c: &OscConfig) -> Self {
        Self {
            bind_address: c.bind_address.clone(),
            port: c.port,
        }
    }
}

/// Response of [`get_config`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigDto {
    pub osc: OscConfigDto,
    pub custom_shortcuts: ShortcutRecords,
}

/// Response of [`get_status`] and [`start_listener`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListenerStatusDto {
    pub running: bool,
    /// The bound socket address when running.
    pub local_addr: Option<String>,
    pub custom_shortcut_count: usize,
}

/// Unified response wrapper used by all commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// ── Listener lifecycle ────────────────────────────────────────────────────────

/// Starts the listener on the current OSC settings (restarting it if it is
/// already running).
pub async fn start_listener(state: Arc<AppState>) -> CommandResult<ListenerStatusDto> {
    let osc = state.osc.lock().await.clone();
    let addr = match osc.socket_addr() {
        Ok(a) => a,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    let mut slot = state.listener.lock().await;
    if let Some(old) = slot.take() {
        stop_handle(old).await;
    }
    match spawn_listener(&state, addr) {
        Ok(handle) => {
            *slot = Some(handle);
            drop(slot);
            get_status(state).await
        }
        Err(e) => {
            error!("failed to start OSC listener: {e}");
            CommandResult::err(e.to_string())
        }
    }
}

/// Stops the listener if it is running.
pub async fn stop_listener(state: Arc<AppState>) -> CommandResult<()> {
    if let Some(handle) = state.listener.lock().await.take() {
        stop_handle(handle).await;
    }
    CommandResult::ok(())
}

/// Reports whether the listener is running and where.
pub async fn get_status(state: Arc<AppState>) -> CommandResult<ListenerStatusDto> {
    let slot = state.listener.lock().await;
    let local_addr = slot
        .as_ref()
        .filter(|h| h.is_running())
        .map(|h| h.local_addr().to_string());
    CommandResult::ok(ListenerStatusDto {
        running: local_addr.is_some(),
        local_addr,
        custom_shortcut_count: state.registry.custom_len(),
    })
}

fn spawn_listener(state: &AppState, addr: SocketAddr) -> Result<ListenerHandle, ListenerError> {
    start_osc_listener(
        addr,
        Arc::clone(&state.pipeline),
        Arc::new(AtomicBool::new(false)),
    )
}

/// Joins the listener thread off the async runtime.
async fn stop_handle(handle: ListenerHandle) {
    if tokio::task::spawn_blocking(move || handle.stop()).await.is_err() {
        error!("listener shutdown task panicked");
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Returns the OSC settings in effect and the persisted custom shortcuts.
pub async fn get_config(state: Arc<AppState>) -> CommandResult<ConfigDto> {
    let osc = OscConfigDto::from(&*state.osc.lock().await);
    CommandResult::ok(ConfigDto {
        osc,
        custom_shortcuts: state.registry.custom_records(),
    })
}

/// Returns every registry entry: builtins first, then custom entries.
pub async fn get_shortcuts(state: Arc<AppState>) -> CommandResult<Vec<ShortcutDto>> {
    let dtos = state
        .registry
        .snapshot()
        .iter()
        .map(|entry| {
            let shadowed =
                entry.origin == Origin::Builtin && state.registry.is_shadowed(&entry.address);
            ShortcutDto::from_entry(entry, shadowed)
        })
        .collect();
    CommandResult::ok(dtos)
}

/// Adds or replaces a custom shortcut.
///
/// The chord is validated before anything is written; the new entry is
/// visible to the very next message the listener resolves.
pub async fn add_shortcut(
    state: Arc<AppState>,
    request: AddShortcutRequest,
) -> CommandResult<ShortcutDto> {
    let combination = match KeyCombination::from_parts(&request.modifiers, &request.key) {
        Ok(c) => c,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    if let Err(e) = state
        .registry
        .upsert_custom(&request.address, combination, request.description)
    {
        warn!(address = %request.address, "add_shortcut rejected: {e}");
        return CommandResult::err(e.to_string());
    }

    match state.registry.lookup(&request.address) {
        Some(entry) => {
            info!(address = %entry.address, chord = %entry.combination, "custom shortcut saved");
            CommandResult::ok(ShortcutDto::from_entry(&entry, false))
        }
        None => CommandResult::err(format!("shortcut {} vanished after save", request.address)),
    }
}

/// Removes a custom shortcut.  Builtins cannot be removed.
pub async fn delete_shortcut(state: Arc<AppState>, address: String) -> CommandResult<()> {
    match state.registry.remove_custom(&address) {
        Ok(()) => {
            info!(address = %address, "custom shortcut removed");
            CommandResult::ok(())
        }
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Validates, applies, and persists new OSC bind settings.
///
/// A running listener is moved to the new socket.  If the new socket cannot
/// be bound the listener is restarted on the previous one and nothing is
/// saved.
pub async fn update_osc_config(
    state: Arc<AppState>,
    osc: OscConfigDto,
) -> CommandResult<OscConfigDto> {
    let next = OscConfig {
        bind_address: osc.bind_address.trim().to_string(),
        port: osc.port,
    };
    let next_addr = match next.socket_addr() {
        Ok(a) => a,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    let mut current = state.osc.lock().await;
    let mut slot = state.listener.lock().await;

    if let Some(old) = slot.take() {
        let previous_addr = old.local_addr();
        stop_handle(old).await;
        match spawn_listener(&state, next_addr) {
            Ok(handle) => *slot = Some(handle),
            Err(e) => {
                error!("failed to move OSC listener to {next_addr}: {e}");
                match spawn_listener(&state, previous_addr) {
                    Ok(handle) => *slot = Some(handle),
                    Err(e) => error!("failed to restore OSC listener on {previous_addr}: {e}"),
                }
                return CommandResult::err(e.to_string());
            }
        }
    }

    if let Err(e) = state
        .config_file
        .update(|cfg| cfg.osc = next.clone())
    {
        *current = next;
        return CommandResult::err(format!(
            "settings applied for this session but not saved: {e}"
        ));
    }

    info!("OSC settings updated to {next_addr}");
    *current = next;
    CommandResult::ok(OscConfigDto::from(&*current))
}

/// Returns the buffered log lines, oldest first.
pub async fn get_logs(state: Arc<AppState>) -> CommandResult<Vec<LogEntry>> {
    CommandResult::ok(state.logs.entries())
}

/// Empties the log buffer.
pub async fn clear_logs(state: Arc<AppState>) -> CommandResult<()> {
    state.logs.clear();
    CommandResult::ok(())
}

/// Imports the shortcuts from a legacy JSON config document.
pub async fn import_legacy_json(state: Arc<AppState>, json: String) -> CommandResult<ImportSummary> {
    let legacy = match parse_legacy_json(&json) {
        Ok(l) => l,
        Err(e) => return CommandResult::err(e.to_string()),
    };
    match import_into(&state.registry, &legacy) {
        Ok(summary) => CommandResult::ok(summary),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
