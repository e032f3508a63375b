//! CLI argument parsing using clap derive macros.
//!
//! Each subcommand corresponds to one automation module. Parameters can be
//! given as flags or, for orchestration hosts, as a JSON parameter map via
//! `--args-file`.

use crate::error::WpError;
use crate::params::{ConfigAction, ConfigParams, CoreAction, CoreParams};
use crate::versions::STABLE_CHECK_URL;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// wp-module - check-mode aware wp-cli wrapper for orchestration tools
#[derive(Parser, Debug)]
#[command(name = "wp-module")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Check mode: report what would change without invoking wp-cli
    #[arg(long, global = true)]
    pub check: bool,

    /// Path to the wp executable (default: resolved from PATH)
    #[arg(long, global = true, env = "WP_MODULE_BIN", value_name = "PATH")]
    pub wp_bin: Option<PathBuf>,

    /// Pass --allow-root to wp-cli (default: on when the effective uid is 0)
    #[arg(long, global = true)]
    pub allow_root: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// WordPress core management (download, update, install, verify)
    Core(CoreArgs),

    /// wp-config.php management (create)
    Config(ConfigArgs),
}

// ============================================================================
// Core module
// ============================================================================

#[derive(Args, Debug)]
pub struct CoreArgs {
    /// Read the parameter map from a JSON file instead of flags
    #[arg(long, value_name = "FILE")]
    pub args_file: Option<PathBuf>,

    /// Path to the WordPress installation to operate on
    #[arg(long, required_unless_present = "args_file")]
    pub path: Option<String>,

    /// Action to perform
    #[arg(long, value_enum, required_unless_present = "args_file")]
    pub action: Option<CoreAction>,

    /// WordPress version to download, or to compare against on update
    #[arg(long)]
    pub version: Option<String>,

    /// Pass --force to wp-cli
    #[arg(long)]
    pub force: bool,

    /// Pass --network to wp-cli (multisite)
    #[arg(long)]
    pub network: bool,

    /// Only perform minor updates (update action only)
    #[arg(long)]
    pub minor: bool,

    /// Site URL (install action)
    #[arg(long)]
    pub url: Option<String>,

    /// Site title (install action)
    #[arg(long)]
    pub title: Option<String>,

    /// Admin user name (install action)
    #[arg(long)]
    pub admin_user: Option<String>,

    /// Admin password (install action); generated by wp-cli when omitted
    #[arg(long)]
    pub admin_password: Option<String>,

    /// Admin email address (install action)
    #[arg(long)]
    pub admin_email: Option<String>,

    /// Skip the new-install notification email (install action)
    #[arg(long)]
    pub skip_email: bool,

    /// Version manifest endpoint queried by the update action
    #[arg(long, env = "WP_VERSION_CHECK_URL", default_value = STABLE_CHECK_URL)]
    pub version_api: String,
}

impl CoreArgs {
    pub fn into_params(self) -> Result<CoreParams, WpError> {
        if let Some(file) = &self.args_file {
            return read_args_file(file);
        }
        let (Some(path), Some(action)) = (self.path, self.action) else {
            // clap enforces this; kept for the args-file-less construction path.
            return Err(WpError::InvalidParams("path and action are required".into()));
        };
        Ok(CoreParams {
            path,
            action,
            version: self.version,
            force: self.force,
            network: self.network,
            minor: self.minor,
            url: self.url,
            title: self.title,
            admin_user: self.admin_user,
            admin_password: self.admin_password,
            admin_email: self.admin_email,
            skip_email: self.skip_email,
        })
    }
}

// ============================================================================
// Config module
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Read the parameter map from a JSON file instead of flags
    #[arg(long, value_name = "FILE")]
    pub args_file: Option<PathBuf>,

    /// Path to the WordPress installation to operate on
    #[arg(long, required_unless_present = "args_file")]
    pub path: Option<String>,

    /// Action to perform
    #[arg(long, value_enum, required_unless_present = "args_file")]
    pub action: Option<ConfigAction>,

    /// Database name
    #[arg(long)]
    pub dbname: Option<String>,

    /// Database user
    #[arg(long)]
    pub dbuser: Option<String>,

    /// Database password
    #[arg(long)]
    pub dbpass: Option<String>,

    /// Database host (default: localhost)
    #[arg(long)]
    pub dbhost: Option<String>,

    /// Database table prefix
    #[arg(long)]
    pub dbprefix: Option<String>,

    /// Database character set
    #[arg(long)]
    pub dbcharset: Option<String>,

    /// Database collation
    #[arg(long)]
    pub dbcollate: Option<String>,

    /// Site locale
    #[arg(long)]
    pub locale: Option<String>,
}

impl ConfigArgs {
    pub fn into_params(self) -> Result<ConfigParams, WpError> {
        if let Some(file) = &self.args_file {
            return read_args_file(file);
        }
        let (Some(path), Some(action)) = (self.path, self.action) else {
            return Err(WpError::InvalidParams("path and action are required".into()));
        };
        Ok(ConfigParams {
            path,
            action,
            dbname: self.dbname,
            dbuser: self.dbuser,
            dbpass: self.dbpass,
            dbhost: self.dbhost,
            dbprefix: self.dbprefix,
            dbcharset: self.dbcharset,
            dbcollate: self.dbcollate,
            locale: self.locale,
        })
    }
}

/// Parse a JSON parameter map from disk. Malformed or unknown keys are
/// parameter-validation errors, rejected before any external invocation.
fn read_args_file<T: serde::de::DeserializeOwned>(file: &Path) -> Result<T, WpError> {
    let content = std::fs::read_to_string(file).map_err(|e| {
        WpError::InvalidParams(format!(
            "could not read parameter map {}: {e}",
            file.display()
        ))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        WpError::InvalidParams(format!(
            "could not parse parameter map {}: {e}",
            file.display()
        ))
    })
}
