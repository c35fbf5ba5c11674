// crates/test-utils/src/lib.rs

//! Shared helpers for `confexec` tests: builders for config files on disk,
//! a recording launcher, and tracing/timeout glue.

pub mod builders;
pub mod fake_launcher;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

static TRACING: Once = Once::new();

/// Per-test log capture, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Upper bound for any single async test step that waits on a child process.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Await `f`, panicking if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(TEST_TIMEOUT, f)
        .await
        .unwrap_or_else(|_| panic!("test step exceeded {TEST_TIMEOUT:?}"))
}
