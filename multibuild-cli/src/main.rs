//! multibuild: update and build many local repositories in one go.
//!
//! # Usage
//!
//! ```text
//! multibuild [-b] [-c] [-d <DIR>] [-s] [--branch <NAME>] [--reset]
//!            [--timeout <SECS>] [--abort-on-failure] [--dry-run] [--json]
//!            [--config <FILE>] [-v]
//! ```

mod prompter;
mod report;
mod run;
mod selection;

use std::process::ExitCode;

use clap::Parser;

use prompter::UserCancelled;
use run::RunArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "multibuild",
    version,
    about = "Update and build multiple local git repositories",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    args: RunArgs,

    /// Log command details (debug level).
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.args.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.downcast_ref::<UserCancelled>().is_some() => {
            tracing::info!("cancelled, nothing was run");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
