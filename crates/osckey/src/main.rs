//! OSCKey: OSC-to-keyboard bridge, entry point.
//!
//! Listens for OSC messages over UDP and presses the keyboard shortcut each
//! one resolves to.  Subcommands edit the custom shortcut table without
//! starting the listener.
//!
//! # Usage
//!
//! ```text
//! osckey [OPTIONS] [COMMAND]
//!
//! Commands:
//!   run      Listen for OSC messages (default)
//!   list     Print every shortcut
//!   add      Add or replace a custom shortcut
//!   remove   Remove a custom shortcut
//!
//! Options:
//!   --config <PATH>          Config file [default: platform config dir]
//!   --osc-bind <IP>          Override the OSC bind address
//!   --osc-port <PORT>        Override the OSC port
//!   --import-legacy <PATH>   Import shortcuts from a legacy JSON config
//!   --dry-run                Log key events instead of sending them
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable          | Description                    |
//! |-------------------|--------------------------------|
//! | `OSCKEY_CONFIG`   | Config file path               |
//! | `OSCKEY_OSC_BIND` | OSC bind address               |
//! | `OSCKEY_OSC_PORT` | OSC port                       |
//! | `RUST_LOG`        | Log filter (overrides config)  |
//!
//! CLI args take precedence over environment variables, which take
//! precedence over the config file.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use osckey::application::dispatch_message::DispatchPipeline;
use osckey::application::execute_action::{ActionExecutor, KeyboardEmulator, ScriptRunner};
use osckey::infrastructure::input_emulation::{
    input_permission_granted, platform_emulator, DryRunEmulator,
};
use osckey::infrastructure::logging::{init_tracing, LogBuffer};
use osckey::infrastructure::script_runner::{platform_script_runner, DryRunScriptRunner};
use osckey::infrastructure::storage::config::{ConfigFile, OscConfig, TomlShortcutStore};
use osckey::infrastructure::storage::legacy::{import_into, read_legacy_file};
use osckey::infrastructure::ui_bridge::{self, AddShortcutRequest, AppState, CommandResult};
use osckey_core::{Origin, ShortcutRegistry};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// OSC-to-keyboard bridge.
#[derive(Debug, Parser)]
#[command(
    name = "osckey",
    about = "Turns incoming OSC messages into keyboard shortcuts",
    version
)]
struct Cli {
    /// Path of the TOML config file.
    #[arg(long, env = "OSCKEY_CONFIG")]
    config: Option<PathBuf>,

    /// IP address the OSC listener binds to (overrides the config file).
    #[arg(long, env = "OSCKEY_OSC_BIND")]
    osc_bind: Option<String>,

    /// UDP port the OSC listener binds to (overrides the config file).
    #[arg(long, env = "OSCKEY_OSC_PORT")]
    osc_port: Option<u16>,

    /// Import custom shortcuts from a legacy JSON config before starting.
    #[arg(long, value_name = "PATH")]
    import_legacy: Option<PathBuf>,

    /// Log key events instead of sending them to the OS.
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Command {
    /// Listen for OSC messages until Ctrl+C.
    Run,
    /// Print every shortcut, builtins first.
    List,
    /// Add or replace a custom shortcut, e.g. `add /key/launch command space`.
    Add {
        /// Message address, starting with `/`.
        address: String,
        /// Modifier words followed by the key.
        #[arg(required = true, num_args = 1..)]
        chord: Vec<String>,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Remove a custom shortcut.
    Remove { address: String },
}

impl Cli {
    /// Applies `--osc-bind` / `--osc-port` on top of the configured settings.
    fn osc_settings(&self, mut osc: OscConfig) -> OscConfig {
        if let Some(bind) = &self.osc_bind {
            osc.bind_address = bind.clone();
        }
        if let Some(port) = self.osc_port {
            osc.port = port;
        }
        osc
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_file = Arc::new(match &cli.config {
        Some(path) => ConfigFile::new(path.clone()),
        None => ConfigFile::at_default_location().context("cannot locate the config directory")?,
    });
    let config = config_file
        .load()
        .with_context(|| format!("failed to load {}", config_file.path().display()))?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    let logs = Arc::new(LogBuffer::default());
    init_tracing(&config.bridge.log_level, Arc::clone(&logs))
        .context("failed to initialise logging")?;

    // ── Shortcut registry ─────────────────────────────────────────────────────
    let store = Arc::new(TomlShortcutStore::new(Arc::clone(&config_file)));
    let registry = Arc::new(
        ShortcutRegistry::new(store)
            .with_context(|| format!("invalid custom shortcut in {}", config_file.path().display()))?,
    );

    if let Some(path) = &cli.import_legacy {
        let legacy = read_legacy_file(path)?;
        let summary = import_into(&registry, &legacy)
            .with_context(|| format!("failed to import {}", path.display()))?;
        info!(
            count = summary.imported.len(),
            "imported legacy shortcuts (legacy OSC setting {}:{} not applied)",
            summary.osc_ip,
            summary.osc_port
        );
    }

    let command = cli.command.clone().unwrap_or(Command::Run);
    let live = command == Command::Run && !cli.dry_run;

    // ── Backends ──────────────────────────────────────────────────────────────
    let (keyboard, scripts): (Arc<dyn KeyboardEmulator>, Arc<dyn ScriptRunner>) = if live {
        let keyboard = platform_emulator().unwrap_or_else(|e| {
            warn!("keyboard backend unavailable ({e}); key events will only be logged");
            Arc::new(DryRunEmulator) as Arc<dyn KeyboardEmulator>
        });
        (keyboard, platform_script_runner())
    } else {
        (
            Arc::new(DryRunEmulator) as Arc<dyn KeyboardEmulator>,
            Arc::new(DryRunScriptRunner) as Arc<dyn ScriptRunner>,
        )
    };
    if live && !input_permission_granted() {
        warn!(
            "Accessibility permission is not granted; grant it under System Settings \
             > Privacy & Security > Accessibility, then restart osckey"
        );
    }

    let executor = ActionExecutor::new(keyboard, scripts)
        .with_settle_delay(Duration::from_millis(config.bridge.settle_delay_ms));
    let pipeline = Arc::new(DispatchPipeline::new(registry, executor));
    let state = AppState::new(pipeline, config_file, cli.osc_settings(config.osc), logs);

    match command {
        Command::Run => run(state).await,
        Command::List => {
            list(state).await?;
            Ok(())
        }
        Command::Add {
            address,
            chord,
            description,
        } => {
            let Some((key, modifiers)) = chord.split_last() else {
                return Err(anyhow!("a chord needs at least a key"));
            };
            let request = AddShortcutRequest {
                address,
                modifiers: modifiers.to_vec(),
                key: key.clone(),
                description,
            };
            let dto = into_result(ui_bridge::add_shortcut(state, request).await)?;
            println!("saved {} → {}", dto.address, chord_label(&dto.modifiers, &dto.key));
            Ok(())
        }
        Command::Remove { address } => {
            into_result(ui_bridge::delete_shortcut(state, address.clone()).await)?;
            println!("removed {address}");
            Ok(())
        }
    }
}

/// Starts the listener and blocks until Ctrl+C.
async fn run(state: Arc<AppState>) -> anyhow::Result<()> {
    let status = into_result(ui_bridge::start_listener(Arc::clone(&state)).await)
        .context("failed to start the OSC listener")?;
    info!(
        "OSCKey listening on {} ({} custom shortcuts)",
        status.local_addr.as_deref().unwrap_or("?"),
        status.custom_shortcut_count
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;
    info!("received Ctrl+C, shutting down");

    into_result(ui_bridge::stop_listener(state).await)?;
    info!("OSCKey stopped");
    Ok(())
}

/// Prints the shortcut table.
async fn list(state: Arc<AppState>) -> anyhow::Result<()> {
    let shortcuts = into_result(ui_bridge::get_shortcuts(state).await)?;
    for s in shortcuts {
        let origin = match s.origin {
            Origin::Builtin if s.shadowed => "builtin (shadowed)",
            Origin::Builtin => "builtin",
            Origin::Custom => "custom",
        };
        println!(
            "{:<20} {:<26} {:<19} {}",
            s.address,
            chord_label(&s.modifiers, &s.key),
            origin,
            s.description
        );
    }
    Ok(())
}

fn chord_label(modifiers: &[String], key: &str) -> String {
    modifiers
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(key))
        .collect::<Vec<_>>()
        .join("+")
}

/// Converts a command response into an `anyhow` result for the CLI.
fn into_result<T: Serialize>(result: CommandResult<T>) -> anyhow::Result<T> {
    if result.success {
        if let Some(data) = result.data {
            return Ok(data);
        }
    }
    Err(anyhow!(result
        .error
        .unwrap_or_else(|| "command failed".to_string())))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
