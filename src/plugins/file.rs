use crate::provider::{Provider, Variables};
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

/// Provider reading a dotenv-style file, `file+<path>`.
///
/// Accepted lines are `NAME=value` and `export NAME=value`. Blank lines and
/// lines starting with `#` are skipped. A value wrapped in matching single or
/// double quotes is unwrapped; no escape sequences are interpreted.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileProvider;

impl Provider for FileProvider {
    fn help(&self) -> &str {
        "Variables defined in a dotenv file. Argument: path to the file."
    }

    fn provide(&self, args: &str) -> Result<Variables> {
        if args.is_empty() {
            bail!("file: missing path, use file+<path>");
        }
        let path = Path::new(args);
        let contents =
            fs::read_to_string(path).with_context(|| format!("file: can't read {}", path.display()))?;
        parse_dotenv(&contents).with_context(|| format!("file: malformed {}", path.display()))
    }
}

fn parse_dotenv(contents: &str) -> Result<Variables> {
    let mut vars = Variables::new();
    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((name, value)) = line.split_once('=') else {
            bail!("line {}: expected NAME=value", idx + 1);
        };
        vars.insert(name.trim().to_string(), unquote(value.trim()).to_string());
    }
    Ok(vars)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
