//! TOML-based configuration persistence.
//!
//! Reads and writes [`AppConfig`] to the platform-appropriate config file:
//! - Linux:    `$XDG_CONFIG_HOME/osckey/config.toml` (or `~/.config/osckey/...`)
//! - macOS:    `~/Library/Application Support/OSCKey/config.toml`
//! - Windows:  `%APPDATA%\OSCKey\config.toml`
//!
//! # File layout (for beginners)
//!
//! A complete config file has three tables.  Every key is optional:
//!
//! ```toml
//! [osc]
//! bind_address = "0.0.0.0"
//! port = 5005
//!
//! [bridge]
//! log_level = "info"
//! settle_delay_ms = 10
//!
//! [custom_shortcuts."/key/launch"]
//! modifiers = ["command"]
//! key = "space"
//! description = "Spotlight"
//! ```
//!
//! # Missing keys
//!
//! Each field carries `#[serde(default = "...")]`, so a key left out of the
//! file takes its built-in value.  An empty or absent file therefore loads
//! as `AppConfig::default()`, which is what a first run sees.
//!
//! # One file, two writers
//!
//! Both the OSC settings and the custom shortcuts live in this file.
//! [`ConfigFile`] serializes every read-modify-write behind a mutex, and
//! [`TomlShortcutStore`] only replaces the `custom_shortcuts` table, so a
//! shortcut edit never clobbers the OSC settings or vice versa.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use osckey_core::{ShortcutRecords, ShortcutStore, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// `osc.bind_address` is not an IP address.
    #[error("invalid OSC bind address {0:?}")]
    InvalidBindAddress(String),

    /// `osc.port` is 0.
    #[error("OSC port must be between 1 and 65535")]
    InvalidPort,
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub osc: OscConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
    /// Custom shortcuts keyed by address.
    #[serde(default)]
    pub custom_shortcuts: ShortcutRecords,
}

/// Where the OSC listener binds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OscConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_osc_port")]
    pub port: u16,
}

impl OscConfig {
    /// Validates the settings and returns the socket address to bind.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidBindAddress`] if the address is not an IP, and
    /// [`ConfigError::InvalidPort`] for port 0.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .bind_address
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(self.bind_address.clone()))?;
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Bridge behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Pause between synthetic key events, in milliseconds.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

// ── Default value functions ───────────────────────────────────────────────────

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_osc_port() -> u16 {
    5005
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_settle_delay_ms() -> u64 {
    10
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_osc_port(),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

// ── File access ───────────────────────────────────────────────────────────────

/// Resolves the config directory for the current platform.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// A config file on disk with serialized read-modify-write access.
#[derive(Debug)]
pub struct ConfigFile {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// The file at [`config_file_path`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoPlatformConfigDir`] if no directory is known.
    pub fn at_default_location() -> Result<Self, ConfigError> {
        Ok(Self::new(config_file_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the config, returning `AppConfig::default()` if the file does not
    /// yet exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] for file-system errors other than "not found",
    /// and [`ConfigError::Parse`] if the TOML is malformed.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read_unlocked()
    }

    /// Persists `config`, creating the directory and file if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] for file-system failures or
    /// [`ConfigError::Serialize`] if serialization fails.
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.write_unlocked(config)
    }

    /// Loads, applies `edit`, and saves as one step.  Returns the saved config.
    ///
    /// # Errors
    ///
    /// Any load or save error; on error the file is left as it was.
    pub fn update<F>(&self, edit: F) -> Result<AppConfig, ConfigError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut config = self.read_unlocked()?;
        edit(&mut config);
        self.write_unlocked(&config)?;
        Ok(config)
    }

    fn read_unlocked(&self) -> Result<AppConfig, ConfigError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let cfg: AppConfig = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
            Err(e) => Err(ConfigError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn write_unlocked(&self, config: &AppConfig) -> Result<(), ConfigError> {
        // Ensure directory exists before writing.
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
        }

        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.path, content).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }
}

/// Resolves the platform config base directory including the `osckey`
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("OSCKey"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("osckey"))
    }

    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/OSCKey
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("OSCKey")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Shortcut store ────────────────────────────────────────────────────────────

/// [`ShortcutStore`] backed by the `custom_shortcuts` table of a config file.
#[derive(Debug, Clone)]
pub struct TomlShortcutStore {
    file: Arc<ConfigFile>,
}

impl TomlShortcutStore {
    pub fn new(file: Arc<ConfigFile>) -> Self {
        Self { file }
    }
}

impl ShortcutStore for TomlShortcutStore {
    fn load(&self) -> Result<ShortcutRecords, StoreError> {
        Ok(self.file.load().map_err(store_error)?.custom_shortcuts)
    }

    fn save(&self, records: &ShortcutRecords) -> Result<(), StoreError> {
        self.file
            .update(|config| config.custom_shortcuts = records.clone())
            .map(|_| ())
            .map_err(store_error)
    }
}

fn store_error(e: ConfigError) -> StoreError {
    match e {
        ConfigError::Io { source, .. } => StoreError::Io(source),
        ConfigError::Parse(e) => StoreError::Decode(e.to_string()),
        ConfigError::Serialize(e) => StoreError::Encode(e.to_string()),
        other => StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            other.to_string(),
        )),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
