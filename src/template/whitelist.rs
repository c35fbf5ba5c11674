// src/template/whitelist.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{ConfexecError, Result};

static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Returns true if `name` could appear as `$name` in a template.
pub fn is_identifier(name: &str) -> bool {
    IDENT_RE.is_match(name)
}

/// Ordered, duplicate-free set of variable names eligible for substitution.
///
/// Anything not listed here is left alone in the template, which keeps
/// unrelated environment values (and nginx's own `$host`-style variables)
/// out of the rendered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Whitelist {
    names: Vec<String>,
}

impl Whitelist {
    /// Build a whitelist from names, validating each one.
    ///
    /// Duplicates collapse onto their first occurrence.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !is_identifier(&name) {
                return Err(ConfexecError::ConfigError(format!(
                    "'{name}' is not a valid variable name (expected [A-Za-z_][A-Za-z0-9_]*)"
                )));
            }
            if !out.contains(&name) {
                out.push(name);
            }
        }

        if out.is_empty() {
            return Err(ConfexecError::ConfigError(
                "variable whitelist must contain at least one name".to_string(),
            ));
        }

        Ok(Self { names: out })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
