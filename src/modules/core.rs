//! The `core` module: WordPress core download, update, install and
//! checksum verification.
//!
//! Success and failure are inferred by matching known substrings of
//! wp-cli's human-readable output. The substrings and their checking order
//! are the de facto contract with wp-cli; do not "fix" them.

use crate::command::{WpCommand, WpCommandBuilder};
use crate::error::WpError;
use crate::executor::ExecOutput;
use crate::modules::Context;
use crate::params::{CoreAction, CoreParams};
use crate::report::Report;
use crate::versions;
use regex::Regex;
use std::sync::OnceLock;

/// Run one core action. Expects already-validated parameters.
pub async fn run(ctx: &Context, params: &CoreParams) -> Result<Report, WpError> {
    let builder = WpCommandBuilder::new(&ctx.wp_bin, &params.path)
        .allow_root(ctx.allow_root)
        .version(params.version.clone())
        .force(params.force)
        .network(params.network);

    match params.action {
        CoreAction::Download => download(ctx, params, &builder).await,
        CoreAction::Update => update(ctx, params, &builder).await,
        CoreAction::Install => install(ctx, params, &builder).await,
        CoreAction::Verify => verify(ctx, params, &builder).await,
    }
}

/// A probe builder carries only the path and privilege flag: read-only
/// subcommands like `core version` take no version/force/network options.
fn probe_builder(ctx: &Context, params: &CoreParams) -> WpCommandBuilder {
    WpCommandBuilder::new(&ctx.wp_bin, &params.path).allow_root(ctx.allow_root)
}

async fn download(
    ctx: &Context,
    params: &CoreParams,
    builder: &WpCommandBuilder,
) -> Result<Report, WpError> {
    // wp-load.php marks an already-downloaded installation.
    if builder.path().join("wp-load.php").exists() {
        return Ok(Report::unchanged()
            .with_stdout(format!("WordPress already present in {}", params.path)));
    }
    if ctx.executor.check_mode() {
        return Ok(Report::changed());
    }

    let cmd = builder.build(&["core", "download"], &[]);
    let output = ctx.executor.run(&cmd).await?;
    let report = classify_download(&cmd, output)?;

    // A fresh download is always followed by a checksum verification.
    // Unlike the standalone verify action, any non-zero verify exit
    // (mismatch included) fails the whole download action.
    let vc_cmd = builder.build(&["core", "verify-checksums"], &[]);
    let verified = ctx.executor.run_probe(&vc_cmd).await?;
    if !verified.success() {
        return Err(WpError::CommandFailed {
            msg: format!(
                "checksum verification failed after downloading WordPress to {}",
                params.path
            ),
            command: vc_cmd.to_string(),
            stdout: verified.stdout,
            stderr: verified.stderr,
        });
    }
    Ok(report)
}

fn classify_download(cmd: &WpCommand, output: ExecOutput) -> Result<Report, WpError> {
    if !output.success() || output.stdout.contains("Error") {
        return Err(WpError::CommandFailed {
            msg: "WordPress download failed".into(),
            command: cmd.to_string(),
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }
    if output.stdout.contains("WordPress downloaded") {
        return Ok(Report::changed().with_stdout(output.stdout));
    }
    Err(WpError::UnexpectedOutput {
        msg: "unrecognized output from wp core download".into(),
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

async fn update(
    ctx: &Context,
    params: &CoreParams,
    builder: &WpCommandBuilder,
) -> Result<Report, WpError> {
    let current = versions::installed_version(&probe_builder(ctx, params), &ctx.executor).await?;
    let latest = versions::fetch_latest(&ctx.version_api).await?;

    // Already at the latest (or the explicitly requested) version: the
    // update command is never invoked.
    if current == latest || Some(current.as_str()) == params.version.as_deref() {
        let mut report = Report::unchanged().with_msg(format!(
            "WordPress at {} is already at version {current}",
            params.path
        ));
        report.latest = Some(latest);
        report.current_version = Some(current);
        return Ok(report);
    }

    if ctx.executor.check_mode() {
        let mut report = Report::changed();
        report.latest = Some(latest);
        report.current_version = Some(current);
        return Ok(report);
    }

    let extra: Vec<String> = if params.minor {
        vec!["--minor".to_string()]
    } else {
        Vec::new()
    };
    let cmd = builder.build(&["core", "update"], &extra);
    let output = ctx.executor.run(&cmd).await?;
    classify_update(&cmd, output, &latest, &current)
}

fn classify_update(
    cmd: &WpCommand,
    output: ExecOutput,
    latest: &str,
    current: &str,
) -> Result<Report, WpError> {
    if output.success() && output.stdout.contains("WordPress is up to date") {
        let mut report = Report::unchanged().with_stdout(output.stdout);
        report.latest = Some(latest.to_string());
        report.current_version = Some(current.to_string());
        return Ok(report);
    }
    if output.success() && output.stdout.contains("WordPress updated successfully") {
        return Ok(Report::changed().with_stdout(output.stdout));
    }
    Err(WpError::CommandFailed {
        msg: "WordPress update critically failed, is this path a WordPress install?".into(),
        command: cmd.to_string(),
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

async fn install(
    ctx: &Context,
    params: &CoreParams,
    builder: &WpCommandBuilder,
) -> Result<Report, WpError> {
    let probe = probe_builder(ctx, params).build(&["core", "is-installed"], &[]);
    let probed = ctx.executor.run_probe(&probe).await?;
    if probed.success() {
        return Ok(Report::unchanged()
            .with_msg(format!("WordPress is already installed at {}", params.path)));
    }
    if ctx.executor.check_mode() {
        return Ok(Report::changed());
    }

    let cmd = builder.build(&["core", "install"], &install_args(params));
    let output = ctx.executor.run(&cmd).await?;
    classify_install(&cmd, output, params)
}

fn install_args(params: &CoreParams) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(url) = &params.url {
        args.push(format!("--url={url}"));
    }
    if let Some(title) = &params.title {
        args.push(format!("--title={title}"));
    }
    if let Some(user) = &params.admin_user {
        args.push(format!("--admin_user={user}"));
    }
    if let Some(email) = &params.admin_email {
        args.push(format!("--admin_email={email}"));
    }
    if let Some(password) = &params.admin_password {
        args.push(format!("--admin_password={password}"));
    }
    if params.skip_email {
        args.push("--skip-email".to_string());
    }
    args
}

fn classify_install(
    cmd: &WpCommand,
    output: ExecOutput,
    params: &CoreParams,
) -> Result<Report, WpError> {
    if !output.success() || output.stdout.contains("Error") {
        return Err(WpError::CommandFailed {
            msg: "WordPress install failed".into(),
            command: cmd.to_string(),
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }
    if output.stdout.contains("WordPress installed successfully") {
        let mut report = Report::changed();
        // When no password was supplied and email notification was not
        // skipped, wp-cli prints the generated admin password.
        if params.admin_password.is_none() && !params.skip_email {
            report.admin_password = admin_password_re()
                .captures(&output.stdout)
                .map(|caps| caps[1].to_string());
        }
        report.stdout = Some(output.stdout);
        return Ok(report);
    }
    Err(WpError::UnexpectedOutput {
        msg: "unrecognized output from wp core install".into(),
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

fn admin_password_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Admin password: (\S+)").expect("static pattern is valid"))
}

async fn verify(
    ctx: &Context,
    params: &CoreParams,
    builder: &WpCommandBuilder,
) -> Result<Report, WpError> {
    // Read-only: runs even in check mode, and `changed` is always false.
    let cmd = builder.build(&["core", "verify-checksums"], &[]);
    let output = ctx.executor.run_probe(&cmd).await?;
    classify_verify(&cmd, output, &params.path)
}

fn classify_verify(cmd: &WpCommand, output: ExecOutput, path: &str) -> Result<Report, WpError> {
    // Checksum mismatch is reported, not fatal. This check must precede the
    // generic non-zero-exit handling.
    if !output.success() && output.stdout.contains("doesn't verify against checksums") {
        let mut report = Report::unchanged().with_msg(format!(
            "WordPress install at {path} doesn't verify against checksums"
        ));
        report.path = Some(path.to_string());
        return Ok(report);
    }
    if !output.success() {
        return Err(WpError::CommandFailed {
            msg: format!("error occurred verifying checksums in {path}"),
            command: cmd.to_string(),
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }
    if output
        .stdout
        .contains("WordPress installation verifies against checksums")
    {
        return Ok(Report::unchanged()
            .with_msg("Checksum verification successful")
            .with_stdout(output.stdout));
    }
    Err(WpError::UnexpectedOutput {
        msg: format!("critical error verifying WordPress checksums in {path}"),
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd() -> WpCommand {
        WpCommandBuilder::new("wp", "/srv/wp").build(&["core", "download"], &[])
    }

    fn output(rc: i32, stdout: &str) -> ExecOutput {
        ExecOutput {
            rc: Some(rc),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    fn install_params() -> CoreParams {
        CoreParams {
            path: "/srv/wp".into(),
            action: CoreAction::Install,
            version: None,
            force: false,
            network: false,
            minor: false,
            url: Some("https://example.com".into()),
            title: Some("Example".into()),
            admin_user: Some("admin".into()),
            admin_password: None,
            admin_email: Some("admin@example.com".into()),
            skip_email: false,
        }
    }

    #[test]
    fn download_success_substring() {
        let report =
            classify_download(&cmd(), output(0, "Success: WordPress downloaded.")).unwrap();
        assert!(report.changed);
    }

    #[test]
    fn download_error_substring_beats_zero_exit() {
        let err = classify_download(&cmd(), output(0, "Error: disk full")).unwrap_err();
        assert!(matches!(err, WpError::CommandFailed { .. }));
        assert!(err.to_string().contains("download failed"));
    }

    #[test]
    fn download_unrecognized_output_is_fatal() {
        let err = classify_download(&cmd(), output(0, "something else")).unwrap_err();
        assert!(matches!(err, WpError::UnexpectedOutput { .. }));
    }

    #[test]
    fn update_up_to_date_is_unchanged() {
        let report = classify_update(
            &cmd(),
            output(0, "Success: WordPress is up to date."),
            "6.5",
            "6.5",
        )
        .unwrap();
        assert!(!report.changed);
        assert_eq!(report.latest.as_deref(), Some("6.5"));
        assert_eq!(report.current_version.as_deref(), Some("6.5"));
    }

    #[test]
    fn update_success_is_changed() {
        let report = classify_update(
            &cmd(),
            output(0, "Success: WordPress updated successfully."),
            "6.5",
            "6.4",
        )
        .unwrap();
        assert!(report.changed);
    }

    #[test]
    fn update_other_output_is_fatal() {
        let err = classify_update(&cmd(), output(1, "Downloading update..."), "6.5", "6.4")
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("is this path a WordPress install?"));
    }

    #[test]
    fn verify_mismatch_is_reported_not_fatal() {
        // Mismatch substring takes precedence over the generic non-zero exit.
        let report = classify_verify(
            &cmd(),
            output(1, "Warning: file doesn't verify against checksums"),
            "/srv/wp",
        )
        .unwrap();
        assert!(!report.changed);
        assert_eq!(report.path.as_deref(), Some("/srv/wp"));
        assert!(report
            .msg
            .as_deref()
            .unwrap()
            .contains("doesn't verify against checksums"));
    }

    #[test]
    fn verify_other_nonzero_exit_is_fatal() {
        let err = classify_verify(&cmd(), output(1, "some noise"), "/srv/wp").unwrap_err();
        assert!(matches!(err, WpError::CommandFailed { .. }));
    }

    #[test]
    fn verify_success_substring() {
        let report = classify_verify(
            &cmd(),
            output(
                0,
                "Success: WordPress installation verifies against checksums.",
            ),
            "/srv/wp",
        )
        .unwrap();
        assert!(!report.changed);
        assert_eq!(report.msg.as_deref(), Some("Checksum verification successful"));
    }

    #[test]
    fn verify_zero_exit_without_substring_is_fatal() {
        let err = classify_verify(&cmd(), output(0, ""), "/srv/wp").unwrap_err();
        assert!(matches!(err, WpError::UnexpectedOutput { .. }));
    }

    #[test]
    fn install_captures_generated_password() {
        let report = classify_install(
            &cmd(),
            output(
                0,
                "Admin password: xK9!pQ2m\nSuccess: WordPress installed successfully.",
            ),
            &install_params(),
        )
        .unwrap();
        assert!(report.changed);
        assert_eq!(report.admin_password.as_deref(), Some("xK9!pQ2m"));
    }

    #[test]
    fn install_does_not_capture_supplied_password() {
        let mut params = install_params();
        params.admin_password = Some("hunter2".into());
        let report = classify_install(
            &cmd(),
            output(0, "Success: WordPress installed successfully."),
            &params,
        )
        .unwrap();
        assert!(report.admin_password.is_none());
    }

    #[test]
    fn install_skip_email_skips_password_capture() {
        let mut params = install_params();
        params.skip_email = true;
        let report = classify_install(
            &cmd(),
            output(
                0,
                "Admin password: xK9!pQ2m\nSuccess: WordPress installed successfully.",
            ),
            &params,
        )
        .unwrap();
        assert!(report.admin_password.is_none());
    }

    #[test]
    fn install_args_cover_required_and_optional_fields() {
        let mut params = install_params();
        params.skip_email = true;
        let args = install_args(&params);
        assert_eq!(
            args,
            vec![
                "--url=https://example.com",
                "--title=Example",
                "--admin_user=admin",
                "--admin_email=admin@example.com",
                "--skip-email",
            ]
        );
    }
}
