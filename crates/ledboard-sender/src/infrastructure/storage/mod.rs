//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML configuration from `--config` or the
//! platform config directory, falls back to defaults when no file exists, and
//! writes the default file for `init-config`.

pub mod config;
