//! Providers shipped with `checkenv`.

mod env;
mod file;

pub use env::EnvProvider;
pub use file::FileProvider;

use crate::provider::ProviderRegistry;

impl Default for ProviderRegistry {
    /// Registry with the built-in providers:
    /// - `env`: the process environment
    /// - `file`: a dotenv file
    fn default() -> Self {
        let mut registry = ProviderRegistry::new();
        registry
            .register("env", Box::new(EnvProvider::new()))
            .register("file", Box::new(FileProvider));
        registry
    }
}
