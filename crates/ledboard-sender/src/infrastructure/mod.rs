//! Infrastructure layer for the sender.
//!
//! Contains the OS-facing adapters: the UDP socket that carries frames to the
//! controller and the TOML configuration file.
//!
//! **Dependency rule**: this layer may depend on `ledboard_core`, but MUST NOT
//! import the `application` layer.

pub mod network;
pub mod storage;
