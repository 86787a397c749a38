use crate::error::{Error, Result};
use crate::spec::ShowSpec;
use std::collections::BTreeMap;
use tracing::debug;

/// Variables returned by a provider, keyed by name.
pub type Variables = BTreeMap<String, String>;

/// Separates the provider name from its arguments inside a provider spec.
pub const ARGS_SEPARATOR: char = '+';

/// A named source of environment variables.
///
/// Providers are looked up by name in a [`ProviderRegistry`] and receive the
/// rest of the provider spec as one opaque argument string.
pub trait Provider {
    /// Short, one-line description shown by `checkenv plugins`.
    fn help(&self) -> &str;

    /// Produce every variable this provider defines for `args`.
    fn provide(&self, args: &str) -> anyhow::Result<Variables>;
}

/// A provider spec split into registry key and argument string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInvocation<'a> {
    pub name: &'a str,
    /// Everything after the first `+`, verbatim. Empty when there is none.
    pub args: &'a str,
}

impl<'a> ProviderInvocation<'a> {
    pub fn parse(provider_spec: &'a str) -> Self {
        let (name, args) = provider_spec
            .split_once(ARGS_SEPARATOR)
            .unwrap_or((provider_spec, ""));
        Self { name, args }
    }
}

/// Registered providers, keyed by name.
///
/// [`Default`] registers the built-in plugins; [`ProviderRegistry::new`]
/// starts empty so tests can register doubles.
pub struct ProviderRegistry {
    providers: BTreeMap<String, Box<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: BTreeMap::new(),
        }
    }

    /// Register `provider` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, provider: Box<dyn Provider>) -> &mut Self {
        self.providers.insert(name.into(), provider);
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Provider> {
        self.providers.get(name).map(|p| p.as_ref())
    }

    /// Registered providers in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Provider)> {
        self.providers.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Invoke the provider addressed by `provider_spec`.
    pub fn resolve(&self, provider_spec: &str) -> Result<Variables> {
        let invocation = ProviderInvocation::parse(provider_spec);
        let provider = self
            .get(invocation.name)
            .ok_or_else(|| Error::UnregisteredProvider(invocation.name.to_string()))?;
        debug!(provider = invocation.name, args = invocation.args, "resolving provider");
        provider
            .provide(invocation.args)
            .map_err(|source| Error::Provider {
                spec: provider_spec.to_string(),
                source,
            })
    }
}

/// Variables of every resolved provider spec.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolvedVariables(BTreeMap<String, Variables>);

impl ResolvedVariables {
    pub fn get(&self, provider_spec: &str) -> Option<&Variables> {
        self.0.get(provider_spec)
    }

    pub fn insert(&mut self, provider_spec: impl Into<String>, vars: Variables) {
        self.0.insert(provider_spec.into(), vars);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Resolve every provider spec of `spec` exactly once, stopping at the first failure.
pub fn resolve_all(spec: &ShowSpec, registry: &ProviderRegistry) -> Result<ResolvedVariables> {
    let mut resolved = ResolvedVariables::default();
    for provider_spec in spec.load_from() {
        let vars = registry.resolve(provider_spec)?;
        debug!(provider_spec = %provider_spec, count = vars.len(), "provider resolved");
        resolved.insert(provider_spec.as_str(), vars);
    }
    Ok(resolved)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Returns fixed variables and records every argument string it receives.
    pub(crate) struct StubProvider {
        vars: Variables,
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl StubProvider {
        pub(crate) fn new(vars: &[(&str, &str)]) -> Self {
            Self {
                vars: vars
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                calls: Rc::new(RefCell::new(Vec::new())),
            }
        }

        pub(crate) fn with_calls(vars: &[(&str, &str)]) -> (Self, Rc<RefCell<Vec<String>>>) {
            let stub = Self::new(vars);
            let calls = stub.calls.clone();
            (stub, calls)
        }
    }

    impl Provider for StubProvider {
        fn help(&self) -> &str {
            "Fixed variables for tests"
        }

        fn provide(&self, args: &str) -> anyhow::Result<Variables> {
            self.calls.borrow_mut().push(args.to_string());
            Ok(self.vars.clone())
        }
    }

    pub(crate) struct FailingProvider;

    impl Provider for FailingProvider {
        fn help(&self) -> &str {
            "Always fails"
        }

        fn provide(&self, _args: &str) -> anyhow::Result<Variables> {
            Err(anyhow::anyhow!("backend unavailable"))
        }
    }

    #[test]
    fn test_invocation_keeps_separator_in_args() {
        let inv = ProviderInvocation::parse("name+arg1+arg2");
        assert_eq!(inv.name, "name");
        assert_eq!(inv.args, "arg1+arg2");

        let inv = ProviderInvocation::parse("env");
        assert_eq!(inv.name, "env");
        assert_eq!(inv.args, "");
    }

    #[test]
    fn test_resolve_passes_args_verbatim() {
        let (stub, calls) = StubProvider::with_calls(&[("A", "1")]);
        let mut registry = ProviderRegistry::new();
        registry.register("name", Box::new(stub));

        let vars = registry.resolve("name+arg1+arg2").unwrap();
        assert_eq!(vars.get("A"), Some(&"1".to_string()));
        assert_eq!(*calls.borrow(), vec!["arg1+arg2".to_string()]);
    }

    #[test]
    fn test_resolve_unregistered_provider() {
        let registry = ProviderRegistry::new();
        let err = registry.resolve("vault+secret/app").unwrap_err();
        assert!(matches!(err, Error::UnregisteredProvider(ref name) if name == "vault"));
        assert_eq!(err.to_string(), "unregistered provider: vault");
    }

    #[test]
    fn test_resolve_wraps_provider_failure() {
        let mut registry = ProviderRegistry::new();
        registry.register("broken", Box::new(FailingProvider));
        let err = registry.resolve("broken+x").unwrap_err();
        assert!(matches!(err, Error::Provider { ref spec, .. } if spec == "broken+x"));
    }

    #[test]
    fn test_resolve_all_calls_each_spec_once() {
        let (stub, calls) = StubProvider::with_calls(&[("HOME", "/root")]);
        let mut registry = ProviderRegistry::new();
        registry.register("env", Box::new(stub));

        let spec = ShowSpec::parse(["env", "env://HOME", "env://SHELL", "env+x"]);
        let resolved = resolve_all(&spec, &registry).unwrap();

        assert_eq!(resolved.len(), 2);
        assert!(resolved.get("env").is_some());
        assert!(resolved.get("env+x").is_some());
        let mut seen = calls.borrow().clone();
        seen.sort();
        assert_eq!(seen, vec!["".to_string(), "x".to_string()]);
    }

    #[test]
    fn test_resolve_all_fails_fast() {
        let mut registry = ProviderRegistry::new();
        registry.register("env", Box::new(StubProvider::new(&[("A", "1")])));

        let spec = ShowSpec::parse(["env", "missing"]);
        let err = resolve_all(&spec, &registry).unwrap_err();
        assert!(matches!(err, Error::UnregisteredProvider(_)));
    }

    #[test]
    fn test_registry_iterates_in_name_order() {
        let mut registry = ProviderRegistry::new();
        registry
            .register("zeta", Box::new(FailingProvider))
            .register("alpha", Box::new(StubProvider::new(&[])));
        let names: Vec<&str> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
