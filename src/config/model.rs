// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::template::Whitelist;
use crate::types::LaunchMode;

pub const DEFAULT_CONFIG_DIR: &str = "/etc/nginx";
pub const TEMPLATE_FILE_NAME: &str = "nginx.conf.template";
pub const OUTPUT_FILE_NAME: &str = "nginx.conf";

/// Backend addresses the gateway template expects.
pub const DEFAULT_VARIABLES: [&str; 3] =
    ["USUARIOS_HOSTPORT", "RESERVAS_HOSTPORT", "INVENTARIO_HOSTPORT"];

pub const DEFAULT_PROGRAM: &str = "nginx";

/// Keeps nginx in the foreground so it stays the container's main process.
pub const DEFAULT_ARGS: [&str; 2] = ["-g", "daemon off;"];

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [render]
/// config_dir = "/etc/nginx"
/// variables = ["USUARIOS_HOSTPORT", "RESERVAS_HOSTPORT", "INVENTARIO_HOSTPORT"]
///
/// [launch]
/// program = "nginx"
/// args = ["-g", "daemon off;"]
/// mode = "exec"
/// ```
///
/// All sections are optional and default to the nginx conventions above.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub render: RenderSection,

    #[serde(default)]
    pub launch: LaunchSection,
}

/// `[render]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderSection {
    /// Directory the template and output default into.
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Explicit template path; `None` means `<config_dir>/nginx.conf.template`.
    #[serde(default)]
    pub template: Option<PathBuf>,

    /// Explicit output path; `None` means `<config_dir>/nginx.conf`.
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Names eligible for substitution.
    #[serde(default = "default_variables")]
    pub variables: Vec<String>,
}

fn default_config_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_DIR)
}

fn default_variables() -> Vec<String> {
    DEFAULT_VARIABLES.iter().map(|s| s.to_string()).collect()
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            template: None,
            output: None,
            variables: default_variables(),
        }
    }
}

impl RenderSection {
    pub fn effective_template(&self) -> PathBuf {
        self.template
            .clone()
            .unwrap_or_else(|| self.config_dir.join(TEMPLATE_FILE_NAME))
    }

    pub fn effective_output(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.config_dir.join(OUTPUT_FILE_NAME))
    }
}

/// `[launch]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaunchSection {
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default = "default_args")]
    pub args: Vec<String>,

    #[serde(default)]
    pub mode: LaunchMode,
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

fn default_args() -> Vec<String> {
    DEFAULT_ARGS.iter().map(|s| s.to_string()).collect()
}

impl Default for LaunchSection {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            mode: LaunchMode::default(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>`, so holding one means the
/// whitelist is non-empty and well-formed and the program name is set.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub template: PathBuf,
    pub output: PathBuf,
    pub whitelist: Whitelist,
    pub launch: LaunchSpec,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        template: PathBuf,
        output: PathBuf,
        whitelist: Whitelist,
        launch: LaunchSpec,
    ) -> Self {
        Self {
            template,
            output,
            whitelist,
            launch,
        }
    }

    pub fn template(&self) -> &Path {
        &self.template
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

/// What to run once the configuration has been rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
    pub mode: LaunchMode,
}

impl LaunchSpec {
    /// Human-readable command line, for logs and dry runs.
    pub fn display_command(&self) -> String {
        let mut parts = vec![shell_quote(&self.program)];
        parts.extend(self.args.iter().map(|a| shell_quote(a)));
        parts.join(" ")
    }
}

fn shell_quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c));
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}
