use clap::ValueEnum;
use serde::Deserialize;

/// How the target program is handed control after rendering.
///
/// - `Exec`: replace the current process image. Nothing of `confexec` stays
///   alive; the server becomes the container's main process.
/// - `Supervise`: spawn the server as a child, forward termination signals to
///   it and exit with its status. Used where process replacement is not
///   available, or when explicitly requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    Exec,
    Supervise,
}

impl Default for LaunchMode {
    fn default() -> Self {
        if cfg!(unix) {
            LaunchMode::Exec
        } else {
            LaunchMode::Supervise
        }
    }
}
