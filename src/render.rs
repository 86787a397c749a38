use crate::error::{Error, Result};
use crate::provider::ResolvedVariables;
use crate::spec::ShowSpec;
use std::io::Write;

/// What each rendered variable line contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Output {
    /// `[export ]NAME=value`
    #[default]
    Assignment,
    /// `value`
    ValueOnly,
    /// `NAME`
    NameOnly,
}

/// Formatting switches of `checkenv show`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix assignments with `export `.
    pub export: bool,
    /// Wrap values in double quotes.
    pub quotes: bool,
    /// Keep only the part of a key after its last `/` (full listings only).
    pub remove_path: bool,
    /// Suppress `# Generated with ...` headers.
    pub raw: bool,
    pub output: Output,
}

impl RenderOptions {
    /// Build options from the raw `show` switches.
    ///
    /// Fails with [`Error::ConflictingFlags`] when both `name_only` and
    /// `value_only` are set.
    pub fn new(
        export: bool,
        quotes: bool,
        remove_path: bool,
        raw: bool,
        value_only: bool,
        name_only: bool,
    ) -> Result<Self> {
        let output = match (value_only, name_only) {
            (true, true) => return Err(Error::ConflictingFlags),
            (true, false) => Output::ValueOnly,
            (false, true) => Output::NameOnly,
            (false, false) => Output::Assignment,
        };
        Ok(Self {
            export,
            quotes,
            remove_path,
            raw,
            output,
        })
    }

    fn export_prefix(&self) -> &'static str {
        if self.export { "export " } else { "" }
    }
}

/// Wrap `val` in double quotes when `quote` is set.
pub fn add_value_quotes(val: &str, quote: bool) -> String {
    if quote {
        format!("\"{val}\"")
    } else {
        val.to_string()
    }
}

/// Cut `key` down to the text after its last `/` when `remove_path` is set.
pub fn remove_key_path(key: &str, remove_path: bool) -> &str {
    if remove_path {
        key.rsplit('/').next().unwrap_or(key)
    } else {
        key
    }
}

/// Writes resolved variables in shell-assignment form.
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render full listings first, then filtered listings.
    ///
    /// Every provider spec of `spec` must be present in `resolved`; a missing
    /// entry renders as an empty variable set.
    pub fn render(
        &self,
        spec: &ShowSpec,
        resolved: &ResolvedVariables,
        out: &mut dyn Write,
    ) -> Result<()> {
        for provider_spec in spec.full() {
            if !self.options.raw {
                writeln!(out, "# Generated with {provider_spec} - all variables:")?;
            }
            let Some(vars) = resolved.get(provider_spec) else {
                continue;
            };
            for (key, value) in vars {
                self.write_variable(out, remove_key_path(key, self.options.remove_path), value)?;
            }
        }

        for (provider_spec, names) in spec.filtered() {
            if !self.options.raw {
                writeln!(out, "# Generated with {provider_spec} - specific variables:")?;
            }
            let vars = resolved.get(provider_spec);
            for name in names {
                match vars.and_then(|vars| vars.get(name)) {
                    Some(value) => self.write_variable(out, name, value)?,
                    None => writeln!(out, "# UNDEFINED: {name}")?,
                }
            }
        }
        Ok(())
    }

    fn write_variable(&self, out: &mut dyn Write, key: &str, value: &str) -> Result<()> {
        let value = add_value_quotes(value, self.options.quotes);
        match self.options.output {
            Output::Assignment => writeln!(out, "{}{key}={value}", self.options.export_prefix())?,
            Output::ValueOnly => writeln!(out, "{value}")?,
            Output::NameOnly => writeln!(out, "{key}")?,
        }
        Ok(())
    }
}
