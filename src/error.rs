//! Error types and exit codes for the wp-cli module.

use thiserror::Error;

/// Process exit codes reported back to the orchestration host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success (changed or unchanged)
    Success = 0,
    /// Module failure (wp-cli reported an error or produced unrecognized output)
    Failure = 1,
    /// Parameter validation error, rejected before any external invocation
    InvalidParams = 2,
    /// Network error (version manifest unreachable)
    NetworkError = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Module errors. Every failure is terminal for the current invocation;
/// nothing here is retried.
#[derive(Error, Debug)]
pub enum WpError {
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("unable to locate the wp-cli binary: {0}")]
    BinaryNotFound(#[source] which::Error),

    #[error("failed to execute {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// wp-cli ran but its exit code or output indicates failure.
    #[error("{msg}")]
    CommandFailed {
        msg: String,
        command: String,
        stdout: String,
        stderr: String,
    },

    /// Output matched no known success or failure substring.
    #[error("{msg}")]
    UnexpectedOutput {
        msg: String,
        stdout: String,
        stderr: String,
    },

    #[error("version lookup failed: HTTP {status}: {body}")]
    VersionLookup { status: u16, body: String },

    #[error("version lookup failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("no release labeled \"latest\" in the version manifest")]
    NoLatestVersion,
}

impl WpError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            WpError::InvalidParams(_) => ExitCode::InvalidParams,
            WpError::Network(_) | WpError::VersionLookup { .. } | WpError::NoLatestVersion => {
                ExitCode::NetworkError
            }
            _ => ExitCode::Failure,
        }
    }
}
