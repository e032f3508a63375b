//! The `config` module: wp-config.php creation.

use crate::command::WpCommandBuilder;
use crate::error::WpError;
use crate::modules::Context;
use crate::params::{ConfigAction, ConfigParams};
use crate::report::Report;

/// Run one config action. Expects already-validated parameters.
pub async fn run(ctx: &Context, params: &ConfigParams) -> Result<Report, WpError> {
    match params.action {
        ConfigAction::Create => create(ctx, params).await,
    }
}

async fn create(ctx: &Context, params: &ConfigParams) -> Result<Report, WpError> {
    let builder = WpCommandBuilder::new(&ctx.wp_bin, &params.path).allow_root(ctx.allow_root);
    let marker = builder.path().join("wp-config.php");

    if marker.exists() {
        return Ok(Report::unchanged().with_msg("wp-config.php already exists"));
    }
    if ctx.executor.check_mode() {
        return Ok(Report::changed());
    }

    let cmd = builder.build(&["config", "create"], &create_args(params));
    let output = ctx.executor.run(&cmd).await?;

    if !output.success() || output.stdout.contains("Error") {
        return Err(WpError::CommandFailed {
            msg: "wp-config.php file creation failed".into(),
            command: cmd.to_string(),
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }

    // A zero exit alone is not trusted: the marker must exist afterwards.
    if marker.exists() {
        Ok(Report::changed()
            .with_msg("wp-config.php created successfully")
            .with_stdout(output.stdout))
    } else {
        Err(WpError::UnexpectedOutput {
            msg: format!("wp-config.php was not created in {}", params.path),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

fn create_args(params: &ConfigParams) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(dbname) = &params.dbname {
        args.push(format!("--dbname={dbname}"));
    }
    if let Some(dbuser) = &params.dbuser {
        args.push(format!("--dbuser={dbuser}"));
    }
    if let Some(dbpass) = &params.dbpass {
        args.push(format!("--dbpass={dbpass}"));
    }
    args.push(format!(
        "--dbhost={}",
        params.dbhost.as_deref().unwrap_or("localhost")
    ));
    if let Some(dbprefix) = &params.dbprefix {
        args.push(format!("--dbprefix={dbprefix}"));
    }
    if let Some(dbcharset) = &params.dbcharset {
        args.push(format!("--dbcharset={dbcharset}"));
    }
    if let Some(dbcollate) = &params.dbcollate {
        args.push(format!("--dbcollate={dbcollate}"));
    }
    if let Some(locale) = &params.locale {
        args.push(format!("--locale={locale}"));
    }
    args
}
