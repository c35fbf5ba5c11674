// src/launch/supervise.rs

//! Spawn-and-wait launch with signal forwarding.
//!
//! Used where process replacement isn't available or when `mode = "supervise"`
//! is requested. Unlike exec, this leaves `confexec` alive as the parent; it
//! relays termination and nginx control signals to the child and exits with
//! the child's status.

use std::process::{ExitStatus, Stdio};

use anyhow::Context;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::config::LaunchSpec;
use crate::errors::{ConfexecError, Result};

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

/// Run `spec` as a child process and return the exit code it should map to.
pub async fn supervise(spec: &LaunchSpec) -> Result<i32> {
    // Handlers go in before the child exists, so a signal arriving while it
    // starts is queued for forwarding instead of killing us and orphaning it.
    let forwarder = SignalForwarder::install()?;
    supervise_with(spec, forwarder).await
}

/// Like [`supervise`], with signal handling already installed by the caller.
pub async fn supervise_with(spec: &LaunchSpec, mut forwarder: SignalForwarder) -> Result<i32> {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .map_err(|e| ConfexecError::launch(&spec.program, e))?;

    info!(
        command = %spec.display_command(),
        pid = child.id(),
        "supervising child process"
    );

    let status = forwarder.wait(&mut child).await?;
    let code = exit_code_of(status);

    info!(
        exit_code = code,
        success = status.success(),
        "child process exited"
    );
    Ok(code)
}

/// Map an exit status to a process exit code.
///
/// A child killed by signal `N` maps to `128 + N`, as a shell reports it.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return 128 + sig;
        }
    }

    1
}

/// Signals relayed to the child: termination plus nginx's control signals
/// (reload, graceful quit, log reopen, binary upgrade, worker shutdown).
#[cfg(unix)]
pub struct SignalForwarder {
    term: Signal,
    int: Signal,
    hup: Signal,
    quit: Signal,
    usr1: Signal,
    usr2: Signal,
    winch: Signal,
}

#[cfg(unix)]
impl SignalForwarder {
    /// Take over the relayed signals for this process.
    pub fn install() -> Result<Self> {
        let listen = |kind: SignalKind, name: &str| {
            signal(kind).with_context(|| format!("installing {name} handler"))
        };

        Ok(Self {
            term: listen(SignalKind::terminate(), "SIGTERM")?,
            int: listen(SignalKind::interrupt(), "SIGINT")?,
            hup: listen(SignalKind::hangup(), "SIGHUP")?,
            quit: listen(SignalKind::quit(), "SIGQUIT")?,
            usr1: listen(SignalKind::user_defined1(), "SIGUSR1")?,
            usr2: listen(SignalKind::user_defined2(), "SIGUSR2")?,
            winch: listen(SignalKind::window_change(), "SIGWINCH")?,
        })
    }

    /// Wait for `child` to exit, relaying every received signal to it.
    pub async fn wait(&mut self, child: &mut Child) -> Result<ExitStatus> {
        loop {
            let sig = tokio::select! {
                status = child.wait() => {
                    return status
                        .context("waiting for child process")
                        .map_err(ConfexecError::from);
                }
                Some(()) = self.term.recv() => libc::SIGTERM,
                Some(()) = self.int.recv() => libc::SIGINT,
                Some(()) = self.hup.recv() => libc::SIGHUP,
                Some(()) = self.quit.recv() => libc::SIGQUIT,
                Some(()) = self.usr1.recv() => libc::SIGUSR1,
                Some(()) = self.usr2.recv() => libc::SIGUSR2,
                Some(()) = self.winch.recv() => libc::SIGWINCH,
            };

            let Some(pid) = child.id() else {
                debug!(signal = sig, "child already reaped; not forwarding");
                continue;
            };
            debug!(signal = sig, pid, "forwarding signal to child");
            if let Err(e) = send_signal(pid, sig) {
                warn!(signal = sig, pid, error = %e, "failed to forward signal to child");
            }
        }
    }
}

/// Send `sig` to process `pid`.
#[cfg(unix)]
pub fn send_signal(pid: u32, sig: libc::c_int) -> std::io::Result<()> {
    let pid = libc::pid_t::try_from(pid)
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "pid out of range"))?;
    // SAFETY: kill(2) takes plain integers and touches no memory of ours.
    let rc = unsafe { libc::kill(pid, sig) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

/// Without unix signals only Ctrl-C is relayed, by killing the child.
#[cfg(not(unix))]
pub struct SignalForwarder;

#[cfg(not(unix))]
impl SignalForwarder {
    pub fn install() -> Result<Self> {
        Ok(Self)
    }

    pub async fn wait(&mut self, child: &mut Child) -> Result<ExitStatus> {
        loop {
            tokio::select! {
                status = child.wait() => {
                    return status
                        .context("waiting for child process")
                        .map_err(ConfexecError::from);
                }
                res = tokio::signal::ctrl_c() => {
                    if let Err(e) = res {
                        warn!(error = %e, "failed to listen for Ctrl+C");
                        return child
                            .wait()
                            .await
                            .context("waiting for child process")
                            .map_err(ConfexecError::from);
                    }
                    info!("Ctrl+C received; stopping child process");
                    if let Err(e) = child.start_kill() {
                        warn!(error = %e, "failed to stop child process");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use crate::types::LaunchMode;

    fn sh(script: &str) -> LaunchSpec {
        LaunchSpec {
            program: "sh".into(),
            args: vec!["-c".into(), script.into()],
            mode: LaunchMode::Supervise,
        }
    }

    #[tokio::test]
    async fn propagates_child_exit_code() {
        assert_eq!(supervise(&sh("exit 0")).await.unwrap(), 0);
        assert_eq!(supervise(&sh("exit 7")).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn signal_death_maps_to_128_plus_signal() {
        let code = supervise(&sh("kill -TERM $$")).await.unwrap();
        assert_eq!(code, 128 + libc::SIGTERM);
    }

    #[tokio::test]
    async fn missing_program_is_launch_error() {
        let spec = LaunchSpec {
            program: "confexec-test-no-such-program".into(),
            args: vec![],
            mode: LaunchMode::Supervise,
        };
        let err = supervise(&spec).await.unwrap_err();
        assert!(matches!(err, ConfexecError::Launch { .. }));
        assert_eq!(err.exit_code(), 127);
    }
}
