// src/launch/mod.rs

//! Handing control to the server process.
//!
//! - [`exec`] replaces the process image (the normal container entrypoint
//!   path).
//! - [`supervise`] spawns, forwards signals and propagates the exit code.
//! - [`backend`] provides the `Launcher` trait and the production
//!   `RealLauncher`, which tests replace with a fake.
//! - [`resolve`] finds a program on `PATH` for dry-run reporting.

pub mod backend;
#[cfg(unix)]
pub mod exec;
pub mod resolve;
pub mod supervise;

pub use backend::{Launcher, RealLauncher};
pub use resolve::resolve_program;
pub use supervise::{SignalForwarder, exit_code_of, supervise, supervise_with};
#[cfg(unix)]
pub use supervise::send_signal;
