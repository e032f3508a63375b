//! The result map handed back to the orchestration host.

use crate::error::WpError;
use serde::Serialize;

/// The only value that crosses the module boundary back to the caller.
/// Serialized as JSON on stdout; optional fields are omitted when unset.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub changed: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub failed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,

    /// The attempted command, included on failure for diagnosis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_version: Option<String>,

    /// Generated admin password captured from `core install` output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Report {
    /// A `changed=true` result.
    pub fn changed() -> Self {
        Report {
            changed: true,
            ..Report::default()
        }
    }

    /// A `changed=false` result.
    pub fn unchanged() -> Self {
        Report::default()
    }

    pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = Some(stdout.into());
        self
    }

    /// Build the failure result map for an error, mirroring the fields the
    /// host expects for diagnosis (message, captured output, the command).
    pub fn from_error(err: &WpError) -> Self {
        let mut report = Report {
            failed: true,
            msg: Some(err.to_string()),
            ..Report::default()
        };
        match err {
            WpError::CommandFailed {
                command,
                stdout,
                stderr,
                ..
            } => {
                report.command = Some(command.clone());
                report.stdout = Some(stdout.clone());
                report.stderr = Some(stderr.clone());
            }
            WpError::UnexpectedOutput { stdout, stderr, .. } => {
                report.stdout = Some(stdout.clone());
                report.stderr = Some(stderr.clone());
            }
            WpError::Spawn { command, .. } => {
                report.command = Some(command.clone());
            }
            _ => {}
        }
        report
    }
}
