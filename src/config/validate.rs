// src/config/validate.rs

use std::path::{Component, Path, PathBuf};

use crate::config::model::{ConfigFile, LaunchSpec, RawConfigFile};
use crate::errors::{ConfexecError, Result};
use crate::template::Whitelist;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::ConfexecError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;

        let whitelist = Whitelist::new(raw.render.variables.iter().cloned())?;
        let template = raw.render.effective_template();
        let output = raw.render.effective_output();
        let launch = LaunchSpec {
            program: raw.launch.program,
            args: raw.launch.args,
            mode: raw.launch.mode,
        };

        Ok(ConfigFile::new_unchecked(template, output, whitelist, launch))
    }
}

/// Check a raw config without consuming it.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_variables(cfg)?;
    validate_paths(cfg)?;
    validate_launch(cfg)?;
    Ok(())
}

fn validate_variables(cfg: &RawConfigFile) -> Result<()> {
    if cfg.render.variables.is_empty() {
        return Err(ConfexecError::ConfigError(
            "[render].variables must list at least one name".to_string(),
        ));
    }
    // Identifier syntax is enforced by `Whitelist::new`; run it here too so
    // `validate_config` alone reports the same errors.
    Whitelist::new(cfg.render.variables.iter().cloned())?;
    Ok(())
}

fn validate_paths(cfg: &RawConfigFile) -> Result<()> {
    let template = cfg.render.effective_template();
    let output = cfg.render.effective_output();

    if template.as_os_str().is_empty() || output.as_os_str().is_empty() {
        return Err(ConfexecError::ConfigError(
            "[render] template and output paths must not be empty".to_string(),
        ));
    }
    if same_file(&template, &output) {
        return Err(ConfexecError::ConfigError(format!(
            "[render] template and output are the same file ({}); rendering would destroy the template",
            template.display()
        )));
    }
    Ok(())
}

/// Whether two paths name the same file. Existing files are compared by their
/// canonical path (so symlinks count); otherwise `.` and `..` are resolved
/// lexically.
fn same_file(a: &Path, b: &Path) -> bool {
    if let (Ok(a), Ok(b)) = (a.canonicalize(), b.canonicalize()) {
        return a == b;
    }
    normalize_lexically(a) == normalize_lexically(b)
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`.
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

fn validate_launch(cfg: &RawConfigFile) -> Result<()> {
    if cfg.launch.program.trim().is_empty() {
        return Err(ConfexecError::ConfigError(
            "[launch].program must not be empty".to_string(),
        ));
    }
    Ok(())
}
