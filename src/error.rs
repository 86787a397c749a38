use std::io;

/// Process exit code, 0 on success.
pub type ExitCode = i32;

/// Errors that abort a `checkenv` invocation.
///
/// A requested variable that a provider does not define is *not* an error;
/// it is reported inline as a `# UNDEFINED: <name>` comment.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or incomplete command line.
    #[error("{0}")]
    Usage(String),

    /// `--name` and `--value` were both given.
    #[error("You can't use both --name and --value flags at the same time.")]
    ConflictingFlags,

    /// The provider name of a spec has no entry in the registry.
    #[error("unregistered provider: {0}")]
    UnregisteredProvider(String),

    /// A registered provider failed to produce its variables.
    #[error("provider {spec} failed: {source:#}")]
    Provider {
        spec: String,
        #[source]
        source: anyhow::Error,
    },

    /// Writing rendered output failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Exit code the binary terminates with for this error.
    ///
    /// Conflicting rendering flags exit with 1 rather than the usage code 2;
    /// scripts already depend on that.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Error::Usage(_) => 2,
            Error::ConflictingFlags => 1,
            Error::UnregisteredProvider(_) | Error::Provider { .. } | Error::Io(_) => 1,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
