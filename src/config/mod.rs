// src/config/mod.rs

//! Configuration loading and validation for snapctl.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate it once into a typed [`ConfigFile`] (`validate.rs`), so the
//!   rest of the crate never re-checks raw values.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_from_str};
pub use model::{
    AuthSection, BackupSection, BackupSettings, ConfigFile, ProtectSection, ProtectedResource,
    ProviderSection, RawConfigFile, RawProtectedResource,
};
