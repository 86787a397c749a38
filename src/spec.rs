use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Separates the provider portion of a target from its variable filter.
pub const FILTER_SEPARATOR: &str = "://";

/// Separates requested variable names inside a filter.
pub const NAME_SEPARATOR: char = ',';

/// What a single target asks to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Every variable the provider returns.
    Full,
    /// Only the named variables.
    Filtered(BTreeSet<String>),
}

/// One parsed `show` target: `<provider>[+<args>][://<name>,<name>,...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Provider name plus arguments, still joined by `+`.
    pub provider_spec: String,
    pub mode: Mode,
}

impl Target {
    /// Parse one target token.
    ///
    /// The token is split at the *first* `://`. Provider arguments containing
    /// `://` therefore cannot be expressed; there is no escaping.
    pub fn parse(token: &str) -> Self {
        match token.split_once(FILTER_SEPARATOR) {
            None => Self {
                provider_spec: token.to_string(),
                mode: Mode::Full,
            },
            Some((provider_spec, filter)) => Self {
                provider_spec: provider_spec.to_string(),
                mode: Mode::Filtered(filter.split(NAME_SEPARATOR).map(str::to_string).collect()),
            },
        }
    }
}

/// All targets of one `show` invocation, grouped by provider spec.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ShowSpec {
    load_from: BTreeSet<String>,
    full: BTreeSet<String>,
    filtered: BTreeMap<String, BTreeSet<String>>,
}

impl ShowSpec {
    pub fn parse<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut spec = ShowSpec::default();
        for token in tokens {
            spec.add(Target::parse(token.as_ref()));
        }
        spec
    }

    /// Register a target. Repeated full targets collapse; repeated filtered
    /// targets for the same provider spec merge their names.
    pub fn add(&mut self, target: Target) {
        trace!(provider_spec = %target.provider_spec, mode = ?target.mode, "adding show target");
        self.load_from.insert(target.provider_spec.clone());
        match target.mode {
            Mode::Full => {
                self.full.insert(target.provider_spec);
            }
            Mode::Filtered(names) => {
                self.filtered
                    .entry(target.provider_spec)
                    .or_default()
                    .extend(names);
            }
        }
    }

    /// Provider specs that must be resolved, each exactly once.
    pub fn load_from(&self) -> &BTreeSet<String> {
        &self.load_from
    }

    /// Provider specs rendered in full.
    pub fn full(&self) -> &BTreeSet<String> {
        &self.full
    }

    /// Provider specs rendered through a name filter, with their requested names.
    pub fn filtered(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.filtered
    }

    pub fn is_empty(&self) -> bool {
        self.load_from.is_empty()
    }
}
