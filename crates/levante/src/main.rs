mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Shell completions don't need a project
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "levante", &mut std::io::stdout());
            Ok(())
        }

        // All other commands run against a project
        cmd => {
            let root = match cli.global.project {
                Some(ref dir) => levante_project::find_project_root(dir)?,
                None => {
                    let cwd = std::env::current_dir()?;
                    levante_project::find_project_root(&cwd)?
                }
            };
            let settings = levante_project::load_settings(&root)?;

            tracing::debug!(root = %root.display(), command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &root, settings, &cli.global).await
        }
    }
}
