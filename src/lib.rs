// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod launch;
pub mod logging;
pub mod template;
pub mod types;

use std::io::Write;

use anyhow::Context;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::config::load_layered;
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::launch::{Launcher, RealLauncher, resolve_program};
use crate::template::{EnvSnapshot, render_file, render_to_string};

/// What the run should do after configuration is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Render the file, then launch the program.
    #[default]
    Full,
    /// Render the file and stop.
    RenderOnly,
    /// Render to the provided writer; touch nothing on disk, launch nothing.
    DryRun,
}

impl RunMode {
    pub fn from_args(args: &CliArgs) -> Self {
        if args.dry_run {
            RunMode::DryRun
        } else if args.render_only {
            RunMode::RenderOnly
        } else {
            RunMode::Full
        }
    }
}

/// High-level entry point used by `main.rs`.
///
/// Resolves configuration, snapshots the environment once, then renders and
/// launches with the production filesystem and launcher. Returns the exit
/// code to terminate with; with `exec` launch it only returns on failure.
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = load_layered(&args)?;
    let env = EnvSnapshot::capture(&cfg.whitelist);
    let mode = RunMode::from_args(&args);

    let mut stdout = std::io::stdout();
    run_with(&cfg, &env, mode, &RealFileSystem, &mut RealLauncher, &mut stdout).await
}

/// Render, then launch. Separated from [`run`] so tests can inject the
/// environment, filesystem, launcher and stdout.
///
/// Stages run strictly in order: a render failure returns before the
/// launcher is ever called.
pub async fn run_with(
    cfg: &ConfigFile,
    env: &EnvSnapshot,
    mode: RunMode,
    fs: &dyn FileSystem,
    launcher: &mut dyn Launcher,
    out: &mut dyn Write,
) -> Result<i32> {
    let missing = env.missing(&cfg.whitelist);
    for name in &missing {
        warn!(variable = %name, "whitelisted variable is unset; substituting empty string");
    }

    match mode {
        RunMode::DryRun => {
            let rendered = render_to_string(fs, cfg.template(), &cfg.whitelist, env)?;
            print_dry_run(cfg, &rendered, out)?;
            return Ok(0);
        }
        RunMode::RenderOnly | RunMode::Full => {
            render_file(fs, cfg.template(), cfg.output(), &cfg.whitelist, env)?;
        }
    }

    if mode == RunMode::RenderOnly {
        info!("render-only requested; not launching");
        return Ok(0);
    }

    info!(
        command = %cfg.launch.display_command(),
        mode = ?cfg.launch.mode,
        "launching"
    );
    launcher.launch(cfg.launch.clone()).await
}

/// Dry-run output: a commented header describing what would happen,
/// followed by the rendered text.
fn print_dry_run(cfg: &ConfigFile, rendered: &str, out: &mut dyn Write) -> Result<()> {
    let resolved = resolve_program(&cfg.launch.program, std::env::var_os("PATH").as_deref());
    let resolved = match resolved {
        Some(p) => p.display().to_string(),
        None => {
            warn!(program = %cfg.launch.program, "program not found on PATH");
            "not found".to_string()
        }
    };
    let vars: Vec<&str> = cfg.whitelist.iter().collect();

    let mut write = || -> std::io::Result<()> {
        writeln!(out, "# confexec dry-run")?;
        writeln!(out, "#   template  = {}", cfg.template().display())?;
        writeln!(out, "#   output    = {} (not written)", cfg.output().display())?;
        writeln!(out, "#   variables = {}", vars.join(", "))?;
        writeln!(out, "#   command   = {}", cfg.launch.display_command())?;
        writeln!(out, "#   program   = {resolved}")?;
        writeln!(out, "#   mode      = {:?}", cfg.launch.mode)?;
        out.write_all(rendered.as_bytes())?;
        out.flush()
    };
    write().context("writing dry-run output")?;

    Ok(())
}
