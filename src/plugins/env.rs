use crate::provider::{Provider, Variables};
use anyhow::{Context, Result};
use regex::Regex;
use std::env as stdenv;

/// Provider backed by a snapshot of the process environment.
///
/// The snapshot is taken when the provider is constructed, so variables set
/// later by the running process are not visible.
///
/// Arguments, when present, are a regular expression; only variables whose
/// names match it are returned. `env+^AWS_` yields every `AWS_*` variable.
#[derive(Debug, Clone)]
pub struct EnvProvider {
    vars: Variables,
}

impl EnvProvider {
    /// Capture the current process environment.
    ///
    /// Variables whose name or value is not valid unicode are skipped.
    pub fn new() -> Self {
        Self {
            vars: stdenv::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Build a provider over a fixed set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl Default for EnvProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for EnvProvider {
    fn help(&self) -> &str {
        "Variables of the current process environment. Optional argument: a regex the names must match."
    }

    fn provide(&self, args: &str) -> Result<Variables> {
        if args.is_empty() {
            return Ok(self.vars.clone());
        }
        let pattern = Regex::new(args).with_context(|| format!("env: invalid name pattern {args:?}"))?;
        Ok(self
            .vars
            .iter()
            .filter(|(name, _)| pattern.is_match(name))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
