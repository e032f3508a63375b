//! WordPress version lookup.
//!
//! The public stable-check endpoint returns a JSON map of version string to
//! status label; the latest release is the unique key labeled `"latest"`.
//! Fetched fresh on every update invocation: no retry, no cache.

use crate::command::WpCommandBuilder;
use crate::error::WpError;
use crate::executor::Executor;
use std::collections::HashMap;
use tracing::info;

/// Default version manifest URL.
pub const STABLE_CHECK_URL: &str = "https://api.wordpress.org/core/stable-check/1.0/";

/// Fetch the version manifest and return the version labeled "latest".
pub async fn fetch_latest(url: &str) -> Result<String, WpError> {
    info!("fetching version manifest from {url}");

    let client = reqwest::Client::builder()
        .user_agent(concat!("wp-module/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        // Surface whatever the remote said alongside the status code.
        let body = response.text().await.unwrap_or_default();
        return Err(WpError::VersionLookup {
            status: status.as_u16(),
            body,
        });
    }

    let releases: HashMap<String, String> = response.json().await?;
    releases
        .into_iter()
        .find(|(_, label)| label == "latest")
        .map(|(version, _)| version)
        .ok_or(WpError::NoLatestVersion)
}

/// Query the installed WordPress version via `wp core version`.
pub async fn installed_version(
    builder: &WpCommandBuilder,
    executor: &Executor,
) -> Result<String, WpError> {
    let cmd = builder.build(&["core", "version"], &[]);
    let output = executor.run_probe(&cmd).await?;
    if !output.success() {
        return Err(WpError::CommandFailed {
            msg: format!("could not determine the installed WordPress version at {}", builder.path().display()),
            command: cmd.to_string(),
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }
    Ok(output.stdout.trim().to_string())
}
