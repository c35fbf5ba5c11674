#![allow(dead_code)]

use std::path::{Path, PathBuf};

use confexec::config::{ConfigFile, RawConfigFile};
use confexec::types::LaunchMode;

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the built-in nginx defaults; every `with_*` call overrides one
/// field of the raw config, and `build` runs the normal validation.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    /// Template and output both live in `dir`, using the nginx file names.
    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.render.config_dir = dir.as_ref().to_path_buf();
        self.config.render.template = None;
        self.config.render.output = None;
        self
    }

    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.render.template = Some(path.into());
        self
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.render.output = Some(path.into());
        self
    }

    /// Replace the whitelist.
    pub fn with_variables(mut self, names: &[&str]) -> Self {
        self.config.render.variables = names.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Replace the launch command.
    pub fn with_command(mut self, program: &str, args: &[&str]) -> Self {
        self.config.launch.program = program.to_string();
        self.config.launch.args = args.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_mode(mut self, mode: LaunchMode) -> Self {
        self.config.launch.mode = mode;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
