mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "recordrelay",
    version,
    about = "Transform-route-deliver runner for structured business records"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a flow against one inbound document
    Run {
        /// Path to flow YAML file
        flow: PathBuf,
        /// Path to the inbound document (XML or JSON). Omit for
        /// connect-only probe flows.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Write the result summary document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a flow configuration without running it
    Check {
        /// Path to flow YAML file
        flow: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    match cli.command {
        Commands::Run { flow, input, output } => {
            commands::run::execute(&flow, input.as_deref(), output.as_deref())
        }
        Commands::Check { flow } => commands::check::execute(&flow),
    }
}
