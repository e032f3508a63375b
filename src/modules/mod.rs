//! Per-action module implementations.
//!
//! Each module shares the same command-execution capability (build, run,
//! classify) through [`Context`] instead of inheriting from a common base.

pub mod config;
pub mod core;

use crate::error::WpError;
use crate::executor::Executor;
use std::path::PathBuf;

/// Per-invocation context: the resolved wp binary, the privilege decision,
/// the executor, and the version manifest endpoint.
pub struct Context {
    pub wp_bin: PathBuf,
    pub allow_root: bool,
    pub executor: Executor,
    pub version_api: String,
}

impl Context {
    /// Resolve the context from CLI-level inputs. The wp binary comes from
    /// the override or PATH resolution; failure to locate it is fatal.
    pub fn resolve(
        wp_bin: Option<PathBuf>,
        allow_root: bool,
        check_mode: bool,
        version_api: String,
    ) -> Result<Self, WpError> {
        let wp_bin = match wp_bin {
            Some(bin) => bin,
            None => which::which("wp").map_err(WpError::BinaryNotFound)?,
        };
        Ok(Context {
            wp_bin,
            allow_root: allow_root || effective_root(),
            executor: Executor::new(check_mode),
            version_api,
        })
    }
}

/// Whether the current process runs with an effective uid of 0. wp-cli
/// refuses to run as root without `--allow-root`.
#[cfg(unix)]
fn effective_root() -> bool {
    // SAFETY: geteuid never fails and has no side effects.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn effective_root() -> bool {
    false
}
