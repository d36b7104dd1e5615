//! toolup CLI - thin front end over the core context
//!
//! Every subcommand builds one `CoreContext` and routes all output and
//! prompting through it.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use toolup_common::{Architecture, CoreContext, Version};
use tracing_subscriber::EnvFilter;

/// Exit status reported when the user declines a confirmation
const DECLINED: u8 = 1;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv, -vvvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the version and architecture of this build
    Version,
    /// Ask a yes/no question; exits 0 for yes and 1 for no
    Confirm(ConfirmArgs),
}

#[derive(Debug, Args)]
struct ConfirmArgs {
    /// Text shown before the question
    #[arg(short, long)]
    message: Option<String>,
    /// Treat an empty answer as "no"
    #[arg(long)]
    default_no: bool,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        1 => EnvFilter::new("warn"),
        2 => EnvFilter::new("info"),
        3 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Keep stdout for user-facing output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Commands, ctx: &CoreContext) -> Result<u8> {
    match command {
        Commands::Version => {
            let line = format!("toolup {} ({})", Version::CURRENT, Architecture::CURRENT);
            ctx.print(&line, None).await?;
            Ok(0)
        }
        Commands::Confirm(args) => {
            tracing::debug!(?args, "Running confirmation prompt");

            if let Some(message) = &args.message {
                ctx.print(message, None).await?;
            }

            if ctx.prompt_for_confirmation(!args.default_no).await? {
                Ok(0)
            } else {
                Ok(DECLINED)
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = CoreContext::new()?;
    let status = run(cli.command, &ctx).await?;
    Ok(ExitCode::from(status))
}
