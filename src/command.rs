//! wp-cli invocation assembly.
//!
//! The builder is pure string assembly: it never touches the filesystem or
//! the environment. Privilege elevation is an explicit input, computed once
//! by the CLI layer, so the flag ordering stays deterministic and testable.

use std::fmt;
use std::path::{Path, PathBuf};

/// A fully-formed wp-cli invocation.
#[derive(Debug, Clone)]
pub struct WpCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl fmt::Display for WpCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Builds wp-cli command lines for one installation path.
///
/// Flag order matches what wp-cli has always been fed: `--allow-root`,
/// `--path`, `--version`, `--force`, `--network`, then the subcommand
/// tokens, then any action-specific options.
#[derive(Debug, Clone)]
pub struct WpCommandBuilder {
    program: PathBuf,
    path: String,
    allow_root: bool,
    version: Option<String>,
    force: bool,
    network: bool,
}

impl WpCommandBuilder {
    pub fn new(program: impl Into<PathBuf>, path: impl Into<String>) -> Self {
        WpCommandBuilder {
            program: program.into(),
            path: path.into(),
            allow_root: false,
            version: None,
            force: false,
            network: false,
        }
    }

    /// Run wp-cli with `--allow-root` (required when executing as uid 0).
    pub fn allow_root(mut self, allow_root: bool) -> Self {
        self.allow_root = allow_root;
        self
    }

    pub fn version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn network(mut self, network: bool) -> Self {
        self.network = network;
        self
    }

    /// Assemble the invocation for `subcommand` (e.g. `["core", "download"]`)
    /// plus any action-specific trailing options.
    pub fn build(&self, subcommand: &[&str], extra: &[String]) -> WpCommand {
        let mut args = Vec::new();
        if self.allow_root {
            args.push("--allow-root".to_string());
        }
        args.push(format!("--path={}", self.path));
        if let Some(version) = &self.version {
            args.push(format!("--version={version}"));
        }
        if self.force {
            args.push("--force".to_string());
        }
        if self.network {
            args.push("--network".to_string());
        }
        args.extend(subcommand.iter().map(|s| s.to_string()));
        args.extend_from_slice(extra);

        WpCommand {
            program: self.program.clone(),
            args,
        }
    }

    /// The installation path this builder targets.
    pub fn path(&self) -> &Path {
        Path::new(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_download_command() {
        let cmd = WpCommandBuilder::new("wp", "/srv/wp").build(&["core", "download"], &[]);
        assert_eq!(cmd.args, vec!["--path=/srv/wp", "core", "download"]);
        assert_eq!(cmd.to_string(), "wp --path=/srv/wp core download");
    }

    #[test]
    fn flag_order_is_stable() {
        let cmd = WpCommandBuilder::new("/usr/local/bin/wp", "/srv/wp")
            .allow_root(true)
            .version(Some("6.4.2".into()))
            .force(true)
            .network(true)
            .build(&["core", "update"], &["--minor".into()]);
        assert_eq!(
            cmd.args,
            vec![
                "--allow-root",
                "--path=/srv/wp",
                "--version=6.4.2",
                "--force",
                "--network",
                "core",
                "update",
                "--minor",
            ]
        );
    }

    #[test]
    fn allow_root_is_an_explicit_input() {
        let cmd = WpCommandBuilder::new("wp", "/srv/wp")
            .allow_root(false)
            .build(&["core", "version"], &[]);
        assert!(!cmd.args.iter().any(|a| a == "--allow-root"));
    }
}
