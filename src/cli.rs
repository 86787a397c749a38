//! Command-line surface: `plugins`, `show` and `version`.
//!
//! Arguments are parsed with [`argh`]. Help output and argument errors exit
//! with code 2, like every other usage error.

use crate::error::{Error, ExitCode, Result};
use crate::provider::ProviderRegistry;
use crate::render::RenderOptions;
use crate::show::show;
use crate::VERSION;
use argh::{EarlyExit, FromArgs};
use std::io::Write;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `CHECKENV_LOG=debug`.
pub const LOG_ENV: &str = "CHECKENV_LOG";

const SUBCOMMANDS: &str = "plugins,show,version";

const SHOW_USAGE: &str = "[<provider_name>[+<provider_args>] ...] \
    [<provider_name>[+<provider_args>]://<var_name_1>,<var_name_2>,...,<var_name_n> ...]\n\
    Shows the environment variables defined by the given providers.";

#[derive(FromArgs, Debug, PartialEq)]
/// Show environment variables defined by pluggable providers.
pub struct Checkenv {
    #[argh(subcommand)]
    pub command: Option<Command>,
}

#[derive(FromArgs, Debug, PartialEq)]
#[argh(subcommand)]
pub enum Command {
    Plugins(Plugins),
    Show(Show),
    Version(Version),
}

#[derive(FromArgs, Debug, PartialEq)]
#[argh(subcommand, name = "plugins")]
/// List available plugins with a brief description of each one.
pub struct Plugins {}

#[derive(FromArgs, Debug, PartialEq)]
#[argh(subcommand, name = "show")]
/// Show the environment variables defined by the given providers.
pub struct Show {
    #[argh(switch)]
    /// prepend "export " before every variable definition.
    pub export: bool,

    #[argh(switch)]
    /// put values in double quotes.
    pub quotes: bool,

    #[argh(switch)]
    /// cut off the path and print only the key after the last '/'.
    pub remove_path: bool,

    #[argh(switch)]
    /// do not print comment headers.
    pub raw: bool,

    #[argh(switch)]
    /// print values only.
    pub value: bool,

    #[argh(switch)]
    /// print names only.
    pub name: bool,

    #[argh(positional)]
    /// targets of the form <provider>[+<args>][://<name>,<name>,...].
    pub targets: Vec<String>,
}

#[derive(FromArgs, Debug, PartialEq)]
#[argh(subcommand, name = "version")]
/// Show the version of checkenv.
pub struct Version {}

impl Checkenv {
    pub fn execute(self, program: &str, registry: &ProviderRegistry, out: &mut dyn Write) -> Result<()> {
        match self.command {
            None => Err(Error::usage(format!(
                "Please use one of the subcommands: {SUBCOMMANDS}"
            ))),
            Some(Command::Plugins(_)) => {
                writeln!(out, "Available plugins:")?;
                for (name, provider) in registry.iter() {
                    writeln!(out, "{name}\n\t{}", provider.help())?;
                }
                Ok(())
            }
            Some(Command::Show(cmd)) => cmd.execute(program, registry, out),
            Some(Command::Version(_)) => {
                writeln!(out, "{VERSION}")?;
                Ok(())
            }
        }
    }
}

impl Show {
    /// Validate the switches, then run the show pipeline.
    ///
    /// No provider is invoked when the switches are invalid.
    pub fn execute(self, program: &str, registry: &ProviderRegistry, out: &mut dyn Write) -> Result<()> {
        if self.targets.is_empty() {
            return Err(Error::usage(format!("Usage: {program} show {SHOW_USAGE}")));
        }
        let options = RenderOptions::new(
            self.export,
            self.quotes,
            self.remove_path,
            self.raw,
            self.value,
            self.name,
        )?;
        show(&self.targets, options, registry, out)
    }
}

/// Run `checkenv` with `args` (program name first) and return the exit code.
///
/// Rendered output goes to `stdout`; usage text and errors go to `stderr`.
pub fn run(
    args: &[&str],
    registry: &ProviderRegistry,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> ExitCode {
    let (program, rest) = match args.split_first() {
        Some((program, rest)) => (*program, rest),
        None => ("checkenv", &[][..]),
    };
    let cli = match Checkenv::from_args(&[program], rest) {
        Ok(cli) => cli,
        Err(EarlyExit { output, status }) => {
            debug!(help = status.is_ok(), "argument parsing exited early");
            let _ = writeln!(stderr, "{}", output.trim_end());
            return 2;
        }
    };
    match cli
        .execute(program, registry, stdout)
        .and_then(|()| stdout.flush().map_err(Error::from))
    {
        Ok(()) => 0,
        Err(err) => {
            let _ = writeln!(stderr, "{err}");
            err.exit_code()
        }
    }
}

/// Install the global `tracing` subscriber.
///
/// Logs go to stderr so stdout stays safe to `eval`. The filter comes from
/// [`LOG_ENV`] and defaults to `warn`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed (tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::tests::StubProvider;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn registry() -> (ProviderRegistry, Rc<RefCell<Vec<String>>>) {
        let (stub, calls) = StubProvider::with_calls(&[("HOME", "/root"), ("SHELL", "/bin/bash")]);
        let mut registry = ProviderRegistry::new();
        registry.register("env", Box::new(stub));
        (registry, calls)
    }

    fn run_capture(args: &[&str], registry: &ProviderRegistry) -> (ExitCode, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(args, registry, &mut out, &mut err);
        (code, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_parse_show_flags() {
        let cli = Checkenv::from_args(
            &["checkenv"],
            &["show", "--export", "--remove-path", "env", "file+.env://A,B"],
        )
        .unwrap();
        let Some(Command::Show(show)) = cli.command else {
            panic!("expected show subcommand");
        };
        assert!(show.export);
        assert!(show.remove_path);
        assert!(!show.quotes);
        assert_eq!(show.targets, vec!["env", "file+.env://A,B"]);
    }

    #[test]
    fn test_missing_subcommand() {
        let (registry, _) = registry();
        let (code, out, err) = run_capture(&["checkenv"], &registry);
        assert_eq!(code, 2);
        assert!(out.is_empty());
        assert_eq!(err, "Please use one of the subcommands: plugins,show,version\n");
    }

    #[test]
    fn test_unknown_subcommand_and_help() {
        let (registry, _) = registry();
        assert_eq!(run_capture(&["checkenv", "list"], &registry).0, 2);
        assert_eq!(run_capture(&["checkenv", "show", "--help"], &registry).0, 2);
    }

    #[test]
    fn test_show_without_targets() {
        let (registry, _) = registry();
        let (code, _, err) = run_capture(&["checkenv", "show", "--raw"], &registry);
        assert_eq!(code, 2);
        assert!(err.starts_with("Usage: checkenv show"));
    }

    #[test]
    fn test_name_and_value_rejected_before_resolution() {
        let (registry, calls) = registry();
        let (code, out, err) = run_capture(&["checkenv", "show", "--name", "--value", "env"], &registry);
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert!(err.contains("--name and --value"));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_show_end_to_end() {
        let (registry, calls) = registry();
        let (code, out, _) = run_capture(&["checkenv", "show", "--export", "env://HOME,MISSING"], &registry);
        assert_eq!(code, 0);
        assert_eq!(
            out,
            "# Generated with env - specific variables:\n\
             export HOME=/root\n\
             # UNDEFINED: MISSING\n"
        );
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_show_unregistered_provider() {
        let (registry, _) = registry();
        let (code, out, err) = run_capture(&["checkenv", "show", "env", "vault"], &registry);
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert_eq!(err, "unregistered provider: vault\n");
    }

    #[test]
    fn test_plugins_and_version() {
        let (registry, _) = registry();
        let (code, out, _) = run_capture(&["checkenv", "plugins"], &registry);
        assert_eq!(code, 0);
        assert_eq!(out, "Available plugins:\nenv\n\tFixed variables for tests\n");

        let (code, out, _) = run_capture(&["checkenv", "version"], &registry);
        assert_eq!(code, 0);
        assert_eq!(out, format!("{VERSION}\n"));
    }
}
