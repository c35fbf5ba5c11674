// src/config/mod.rs

//! Configuration loading and validation for confexec.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and nginx defaults (`model.rs`).
//! - Load a config file from disk and layer CLI flags on top (`loader.rs`).
//! - Validate whitelist, paths and launch command (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{apply_cli_overrides, load_and_validate, load_from_path, load_layered};
pub use model::{ConfigFile, LaunchSection, LaunchSpec, RawConfigFile, RenderSection};
pub use validate::validate_config;
