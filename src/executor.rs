//! External process execution with check-mode short-circuiting.

use crate::command::WpCommand;
use crate::error::WpError;
use tracing::{debug, info};

/// Captured outcome of one wp-cli invocation.
///
/// `rc` is `None` when the process was killed by a signal before it could
/// report an exit code.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub rc: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.rc == Some(0)
    }
}

/// Runs wp-cli commands, or simulates them in check mode.
#[derive(Debug, Clone, Copy)]
pub struct Executor {
    check_mode: bool,
}

impl Executor {
    pub fn new(check_mode: bool) -> Self {
        Executor { check_mode }
    }

    pub fn check_mode(&self) -> bool {
        self.check_mode
    }

    /// Run a mutating command. In check mode nothing is spawned and a
    /// synthetic zero-exit, empty-output result is returned.
    pub async fn run(&self, cmd: &WpCommand) -> Result<ExecOutput, WpError> {
        if self.check_mode {
            debug!("in check mode, would have run: {cmd}");
            return Ok(ExecOutput {
                rc: Some(0),
                stdout: String::new(),
                stderr: String::new(),
            });
        }
        self.spawn(cmd).await
    }

    /// Run a read-only probe (`core version`, `core is-installed`,
    /// `core verify-checksums`). Probes execute even in check mode so the
    /// reported `changed` value matches what a real run would report.
    pub async fn run_probe(&self, cmd: &WpCommand) -> Result<ExecOutput, WpError> {
        self.spawn(cmd).await
    }

    async fn spawn(&self, cmd: &WpCommand) -> Result<ExecOutput, WpError> {
        info!("executing: {cmd}");
        let output = tokio::process::Command::new(&cmd.program)
            .args(&cmd.args)
            .output()
            .await
            .map_err(|source| WpError::Spawn {
                command: cmd.to_string(),
                source,
            })?;

        let result = ExecOutput {
            rc: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(rc = ?result.rc, "command finished");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::WpCommandBuilder;

    #[tokio::test]
    async fn check_mode_returns_synthetic_output_without_spawning() {
        // A program that cannot exist; check mode must not try to spawn it.
        let cmd = WpCommandBuilder::new("/nonexistent/wp-binary", "/srv/wp")
            .build(&["core", "download"], &[]);
        let out = Executor::new(true).run(&cmd).await.unwrap();
        assert_eq!(out.rc, Some(0));
        assert!(out.stdout.is_empty());
        assert!(out.stderr.is_empty());
    }

    #[tokio::test]
    async fn spawn_failure_is_fatal() {
        let cmd = WpCommandBuilder::new("/nonexistent/wp-binary", "/srv/wp")
            .build(&["core", "version"], &[]);
        let err = Executor::new(false).run(&cmd).await.unwrap_err();
        assert!(matches!(err, WpError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_exit_code_and_output() {
        let cmd = WpCommand {
            program: "/bin/sh".into(),
            args: vec!["-c".into(), "echo out; echo err >&2; exit 3".into()],
        };
        let out = Executor::new(false).run(&cmd).await.unwrap();
        assert_eq!(out.rc, Some(3));
        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr.trim(), "err");
    }
}
