use crate::error::Result;
use crate::provider::{ProviderRegistry, resolve_all};
use crate::render::{RenderOptions, Renderer};
use crate::spec::ShowSpec;
use std::io::Write;
use tracing::debug;

/// Parse `tokens`, resolve every provider they reference and render the result.
///
/// Nothing is written unless every provider resolves; the first failure is
/// returned and the variables resolved so far are dropped.
pub fn show<I, S>(
    tokens: I,
    options: RenderOptions,
    registry: &ProviderRegistry,
    out: &mut dyn Write,
) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let spec = ShowSpec::parse(tokens);
    debug!(
        providers = spec.load_from().len(),
        full = spec.full().len(),
        filtered = spec.filtered().len(),
        "parsed show targets"
    );
    let resolved = resolve_all(&spec, registry)?;
    Renderer::new(options).render(&spec, &resolved, out)
}
