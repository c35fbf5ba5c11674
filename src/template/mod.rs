// src/template/mod.rs

//! Whitelisted environment substitution into a text template.
//!
//! - [`whitelist`] holds the ordered set of names eligible for substitution.
//! - [`snapshot`] captures those names from the environment exactly once.
//! - [`render`] scans for `$NAME` / `${NAME}` and writes the result.

pub mod render;
pub mod snapshot;
pub mod whitelist;

pub use render::{passthrough_placeholders, render_file, render_str, render_to_string};
pub use snapshot::EnvSnapshot;
pub use whitelist::{Whitelist, is_identifier};
