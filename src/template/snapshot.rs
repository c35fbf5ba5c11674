// src/template/snapshot.rs

//! Read-once view of the process environment.
//!
//! The renderer never calls `std::env` itself; it only sees an
//! [`EnvSnapshot`], so the same snapshot always renders the same bytes.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::whitelist::Whitelist;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    values: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the whitelisted variables from the current process environment.
    pub fn capture(whitelist: &Whitelist) -> Self {
        let mut values = BTreeMap::new();

        for name in whitelist.iter() {
            let Some(raw) = std::env::var_os(name) else {
                continue;
            };
            let value = match raw.into_string() {
                Ok(v) => v,
                Err(raw) => {
                    warn!(
                        variable = %name,
                        "environment value is not valid UTF-8; substituting lossily"
                    );
                    raw.to_string_lossy().into_owned()
                }
            };
            values.insert(name.to_string(), value);
        }

        debug!(captured = values.len(), "environment snapshot taken");
        Self { values }
    }

    /// Build a snapshot from explicit pairs instead of the live environment.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value for `name`; unset resolves to the empty string.
    pub fn resolve(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Whitelisted names with no value in this snapshot, in whitelist order.
    pub fn missing<'a>(&self, whitelist: &'a Whitelist) -> Vec<&'a str> {
        whitelist.iter().filter(|n| !self.is_set(n)).collect()
    }
}
