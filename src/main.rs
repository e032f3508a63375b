mod cli;
mod command;
mod error;
mod executor;
mod modules;
mod params;
mod report;
mod versions;

use clap::Parser;
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Command};
use crate::error::{ExitCode, WpError};
use crate::modules::Context;
use crate::report::Report;

#[tokio::main]
async fn main() {
    // Initialize tracing. Logs go to stderr: stdout carries the result map.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let exit_code = run().await;
    std::process::exit(exit_code.into());
}

async fn run() -> ExitCode {
    let cli = Cli::parse();

    // Handle --no-color globally
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    match dispatch(cli).await {
        Ok(report) => {
            print_report(&report);
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("{} {e}", style("error:").red().bold());
            let code = e.exit_code();
            print_report(&Report::from_error(&e));
            code
        }
    }
}

async fn dispatch(cli: Cli) -> Result<Report, WpError> {
    match cli.command {
        Command::Core(args) => {
            let version_api = args.version_api.clone();
            let params = args.into_params()?;
            // Validation rejects bad parameter sets before anything external.
            params.validate()?;
            let ctx = Context::resolve(cli.wp_bin, cli.allow_root, cli.check, version_api)?;
            modules::core::run(&ctx, &params).await
        }
        Command::Config(args) => {
            let params = args.into_params()?;
            params.validate()?;
            let ctx = Context::resolve(
                cli.wp_bin,
                cli.allow_root,
                cli.check,
                versions::STABLE_CHECK_URL.to_string(),
            )?;
            modules::config::run(&ctx, &params).await
        }
    }
}

/// Emit the result map on stdout for the orchestration host.
fn print_report(report: &Report) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("{} could not serialize result: {e}", style("error:").red()),
    }
}
