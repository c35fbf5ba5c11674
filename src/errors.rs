// src/errors.rs

//! Crate-wide error type and exit-status mapping.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfexecError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Template unreadable or output unwritable.
    #[error("Render IO error on {path:?}: {source}")]
    RenderIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The target program could not be started.
    #[error("Launch error for '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConfexecError {
    pub fn render_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfexecError::RenderIo {
            path: path.into(),
            source,
        }
    }

    pub fn launch(program: impl Into<String>, source: std::io::Error) -> Self {
        ConfexecError::Launch {
            program: program.into(),
            source,
        }
    }

    /// Process exit status to report for this error.
    ///
    /// Launch failures follow the shell convention: 127 when the program does
    /// not exist, 126 when it exists but cannot be run.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfexecError::ConfigError(_) | ConfexecError::TomlError(_) => 2,
            ConfexecError::RenderIo { .. } | ConfexecError::Other(_) => 1,
            ConfexecError::Launch { source, .. } => match source.kind() {
                std::io::ErrorKind::NotFound => 127,
                _ => 126,
            },
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ConfexecError>;
