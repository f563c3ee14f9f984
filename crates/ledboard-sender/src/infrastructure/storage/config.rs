//! TOML-based configuration for the sender.
//!
//! Reads `AppConfig` from `--config <path>` or the platform-appropriate file:
//! - Windows:  `%APPDATA%\LedBoard\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/ledboard/config.toml` or `~/.config/ledboard/config.toml`
//! - macOS:    `~/Library/Application Support/LedBoard/config.toml`
//!
//! Example:
//!
//! ```toml
//! [sender]
//! log_level = "info"
//! frame_interval_ms = 50
//!
//! [board]
//! width = 96
//! height = 48
//! color_depth = 127
//! num_panels = 9
//! panel_order = [[2, 0], [2, 1], [2, 2], [1, 2], [1, 1], [1, 0], [0, 0], [0, 1], [0, 2]]
//!
//! [network]
//! host = "ledboard"
//! port = 1337
//! pacing_ms = 20
//! send_policy = "abort"
//! ```
//!
//! Every section and field is optional; missing values take the defaults
//! shown above, and a missing file means all defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ledboard_core::protocol::{
    Destination, DEFAULT_HOST, DEFAULT_MAX_CHUNK_SIZE, DEFAULT_PACING, DEFAULT_PORT,
    MAX_CHUNK_SIZE,
};
use ledboard_core::{BoardConfig, LedBoard};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::infrastructure::network::{SendPolicy, TransportSettings};

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

    /// The values parse but cannot drive a board.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub sender: SenderConfig,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

/// Process-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SenderConfig {
    /// `tracing` level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Delay between two rendered frames.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

/// Controller address and datagram settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Payload bytes per datagram, marker excluded.
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,
    /// Pause between the datagrams of one frame.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
    #[serde(default)]
    pub send_policy: SendPolicy,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_frame_interval_ms() -> u64 {
    50
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_max_chunk_size() -> usize {
    DEFAULT_MAX_CHUNK_SIZE
}
fn default_pacing_ms() -> u64 {
    DEFAULT_PACING.as_millis() as u64
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_chunk_size: default_max_chunk_size(),
            pacing_ms: default_pacing_ms(),
            send_policy: SendPolicy::default(),
        }
    }
}

impl SenderConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl NetworkConfig {
    pub fn destination(&self) -> Destination {
        Destination::new(self.host.clone(), self.port)
    }

    pub fn transport_settings(&self) -> TransportSettings {
        TransportSettings {
            max_chunk_size: self.max_chunk_size,
            pacing_interval: Duration::from_millis(self.pacing_ms),
            send_policy: self.send_policy,
        }
    }
}

impl AppConfig {
    /// Checks the values that parse fine but cannot drive a board.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a chunk size of zero or one that
    /// does not fit a UDP datagram after the marker byte, a colour depth
    /// that does not fit the one-byte wire format, or a board geometry that
    /// [`LedBoard::from_config`] rejects.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.max_chunk_size == 0 {
            return Err(ConfigError::Invalid(
                "network.max_chunk_size must be at least 1".to_string(),
            ));
        }
        if self.network.max_chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::Invalid(format!(
                "network.max_chunk_size {} exceeds the UDP limit of {MAX_CHUNK_SIZE}",
                self.network.max_chunk_size
            )));
        }
        if self.board.color_depth > u8::MAX as u16 {
            return Err(ConfigError::Invalid(format!(
                "board.color_depth {} does not fit in one byte",
                self.board.color_depth
            )));
        }
        LedBoard::from_config(&self.board)
            .map(|_| ())
            .map_err(|e| ConfigError::Invalid(format!("board: {e}")))
    }

    /// Payload bytes of one frame for this board.
    pub fn frame_len(&self) -> usize {
        self.board.width as usize * self.board.height as usize * self.board.color_arity
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads and validates `AppConfig` from `path`, or from the platform file
/// when `path` is `None`.
///
/// A missing file yields `AppConfig::default()`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// [`ConfigError::Parse`] if the TOML is malformed and
/// [`ConfigError::Invalid`] if validation fails.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };

    let config = match std::fs::read_to_string(&path) {
        Ok(content) => {
            debug!("loading config from {}", path.display());
            toml::from_str(&content)?
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("no config at {}, using defaults", path.display());
            AppConfig::default()
        }
        Err(e) => return Err(ConfigError::Io { path, source: e }),
    };
    config.validate()?;
    Ok(config)
}

/// Persists `config` to `path`, or to the platform file when `path` is
/// `None`.  Creates the directory if needed and returns the written path.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &AppConfig, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Resolves the platform config directory including the application folder.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("LedBoard"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("ledboard"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("LedBoard")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
