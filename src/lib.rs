//! Resolve environment variables from named providers and print them as
//! shell assignments.
//!
//! A `show` target has the form `<provider>[+<args>][://<name>,<name>,...]`:
//!
//! - `env` prints every variable the `env` provider returns,
//! - `file+.env://DB_HOST,DB_USER` prints only the two named variables read
//!   from `.env`, marking absent ones with `# UNDEFINED: <name>`.
//!
//! Targets are parsed into a [`ShowSpec`] ([`spec`]), every distinct provider
//! spec is resolved once through a [`ProviderRegistry`] ([`provider`]), and the
//! result is written by a [`Renderer`] ([`render`]). Providers implement the
//! [`Provider`] trait; the built-in ones live in [`plugins`].
//!
//! ```
//! use checkenv::{EnvProvider, ProviderRegistry, RenderOptions, show};
//!
//! let mut registry = ProviderRegistry::new();
//! registry.register("env", Box::new(EnvProvider::from_vars([("HOME", "/root")])));
//!
//! let mut out = Vec::new();
//! let options = RenderOptions { raw: true, ..Default::default() };
//! show(["env://HOME,USER"], options, &registry, &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "HOME=/root\n# UNDEFINED: USER\n");
//! ```

pub mod cli;
pub mod error;
pub mod plugins;
pub mod provider;
pub mod render;
mod show;
pub mod spec;

pub use error::{Error, ExitCode, Result};
pub use plugins::{EnvProvider, FileProvider};
pub use provider::{Provider, ProviderInvocation, ProviderRegistry, ResolvedVariables, Variables};
pub use render::{Output, RenderOptions, Renderer, add_value_quotes, remove_key_path};
pub use show::show;
pub use spec::{Mode, ShowSpec, Target};

/// Version printed by `checkenv version`.
pub const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));
