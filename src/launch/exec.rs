// src/launch/exec.rs

//! Process-image replacement.

use tracing::info;

use crate::config::LaunchSpec;
use crate::errors::ConfexecError;

/// Replace the current process with `spec.program spec.args…`.
///
/// PATH lookup follows `execvp`. The child keeps our pid, stdio and process
/// group, so the container runtime signals it directly. On success this never
/// returns; the only possible return value is the launch error.
pub fn exec_replace(spec: &LaunchSpec) -> ConfexecError {
    use std::os::unix::process::CommandExt;

    info!(
        command = %spec.display_command(),
        pid = std::process::id(),
        "replacing process image"
    );

    let err = std::process::Command::new(&spec.program)
        .args(&spec.args)
        .exec();

    ConfexecError::launch(&spec.program, err)
}
