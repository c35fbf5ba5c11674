#![allow(dead_code)]

use std::path::PathBuf;

pub use confexec_test_utils::builders;
pub use confexec_test_utils::{init_tracing, with_timeout};

/// Path of a file under `demos/` in this crate.
pub fn demo(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(rel)
}
