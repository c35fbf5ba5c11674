// src/launch/backend.rs

//! Pluggable launcher abstraction.
//!
//! The top-level flow hands the rendered config over to a `Launcher` instead
//! of calling exec directly. Production uses [`RealLauncher`]; tests provide
//! a fake that records the spec and returns a canned exit code, since a real
//! exec would replace the test binary.

use std::future::Future;
use std::pin::Pin;

use crate::config::LaunchSpec;
use crate::errors::Result;
use crate::types::LaunchMode;

use super::supervise::supervise;

/// Trait abstracting how the target program is started.
pub trait Launcher: Send {
    /// Start `spec`.
    ///
    /// Returns the exit code the program should terminate with. An `exec`
    /// launch that succeeds never resolves, because the process has been
    /// replaced; it only resolves with a launch error.
    fn launch(
        &mut self,
        spec: LaunchSpec,
    ) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + '_>>;
}

/// Launcher used in production.
#[derive(Debug, Clone, Default)]
pub struct RealLauncher;

impl Launcher for RealLauncher {
    fn launch(
        &mut self,
        spec: LaunchSpec,
    ) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + '_>> {
        Box::pin(async move {
            match spec.mode {
                LaunchMode::Exec => exec_or_fallback(&spec).await,
                LaunchMode::Supervise => supervise(&spec).await,
            }
        })
    }
}

#[cfg(unix)]
async fn exec_or_fallback(spec: &LaunchSpec) -> Result<i32> {
    Err(super::exec::exec_replace(spec))
}

#[cfg(not(unix))]
async fn exec_or_fallback(spec: &LaunchSpec) -> Result<i32> {
    tracing::warn!("process replacement is not available on this platform; supervising instead");
    supervise(spec).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfexecError;

    #[tokio::test]
    async fn both_modes_report_missing_program_as_launch_error() {
        for mode in [LaunchMode::Exec, LaunchMode::Supervise] {
            let spec = LaunchSpec {
                program: "confexec-test-no-such-program".into(),
                args: vec!["-g".into(), "daemon off;".into()],
                mode,
            };
            let err = RealLauncher.launch(spec).await.unwrap_err();
            assert!(
                matches!(err, ConfexecError::Launch { ref program, .. } if program == "confexec-test-no-such-program"),
                "mode {mode:?}: {err:?}"
            );
        }
    }
}
