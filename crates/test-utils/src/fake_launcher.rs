use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use confexec::config::LaunchSpec;
use confexec::errors::{ConfexecError, Result};
use confexec::launch::Launcher;

/// What the fake should do when asked to launch.
#[derive(Debug, Clone, Copy)]
pub enum FakeOutcome {
    /// Pretend the program ran and exited with this code.
    Exit(i32),
    /// Pretend the program could not be started.
    Fail(io::ErrorKind),
}

/// A fake launcher that:
/// - records every spec it was asked to launch
/// - returns a canned outcome instead of touching the OS.
#[derive(Debug, Clone)]
pub struct FakeLauncher {
    outcome: FakeOutcome,
    launched: Arc<Mutex<Vec<LaunchSpec>>>,
}

impl FakeLauncher {
    pub fn exiting_with(code: i32) -> Self {
        Self::new(FakeOutcome::Exit(code))
    }

    pub fn failing_with(kind: io::ErrorKind) -> Self {
        Self::new(FakeOutcome::Fail(kind))
    }

    pub fn new(outcome: FakeOutcome) -> Self {
        Self {
            outcome,
            launched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Specs launched so far, in order.
    pub fn launched(&self) -> Vec<LaunchSpec> {
        self.launched.lock().unwrap().clone()
    }
}

impl Launcher for FakeLauncher {
    fn launch(
        &mut self,
        spec: LaunchSpec,
    ) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + '_>> {
        let launched = Arc::clone(&self.launched);
        let outcome = self.outcome;

        Box::pin(async move {
            let program = spec.program.clone();
            launched.lock().unwrap().push(spec);

            match outcome {
                FakeOutcome::Exit(code) => Ok(code),
                FakeOutcome::Fail(kind) => Err(ConfexecError::launch(program, io::Error::from(kind))),
            }
        })
    }
}
