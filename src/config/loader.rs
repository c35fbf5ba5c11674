// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{ConfexecError, Result};

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        ConfexecError::ConfigError(format!("reading config file {}: {e}", path.display()))
    })?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the effective configuration for a run.
///
/// Layers, highest precedence first:
/// 1. CLI flags
/// 2. the TOML file named by `--config`, if any
/// 3. built-in nginx defaults
pub fn load_layered(args: &CliArgs) -> Result<ConfigFile> {
    let mut raw = match &args.config {
        Some(path) => {
            debug!(config = %path.display(), "loading config file");
            load_from_path(path)?
        }
        None => RawConfigFile::default(),
    };

    apply_cli_overrides(&mut raw, args);
    ConfigFile::try_from(raw)
}

/// Overlay CLI flags onto a raw config.
///
/// `--config-dir` re-derives the template and output paths unless those were
/// given explicitly on the command line.
pub fn apply_cli_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    if let Some(dir) = &args.config_dir {
        raw.render.config_dir = dir.clone();
        raw.render.template = None;
        raw.render.output = None;
    }
    if let Some(template) = &args.template {
        raw.render.template = Some(template.clone());
    }
    if let Some(output) = &args.output {
        raw.render.output = Some(output.clone());
    }
    if !args.vars.is_empty() {
        raw.render.variables = args.vars.clone();
    }
    if let Some(mode) = args.mode {
        raw.launch.mode = mode;
    }
    if let Some((program, rest)) = args.command.split_first() {
        raw.launch.program = program.clone();
        raw.launch.args = rest.to_vec();
    }
}
