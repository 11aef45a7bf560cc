//! Application Configuration Module
//!
//! Provides rig configuration loaded from TOML files.
//!
//! ## Loading Order
//!
//! 1. `ETONGUE_CONFIG` environment variable (path to TOML file)
//! 2. `etongue.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The loaded [`AppConfig`] is owned by the [`Session`](crate::session::Session)
//! and passed down explicitly; there is no global config handle.

mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::*;
