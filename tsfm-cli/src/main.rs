use anyhow::Result;
use clap::{Parser, Subcommand};
use tsfm_cli::{exit_code, run_defaults, run_resolve, DefaultsArgs, ResolveArgs};
use tracing::info;

#[derive(Parser)]
#[command(name = "tsfm-cli")]
#[command(about = "Inspect how TimesFM models are resolved and loaded")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the source kind and load plan for a model
    Resolve(ResolveArgs),
    /// Print a default model reference
    Defaults(DefaultsArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure logging level based on debug flag
    let debug = match &cli.command {
        Commands::Resolve(args) => args.debug,
        Commands::Defaults(args) => args.debug,
    };
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Resolve(args) => {
            info!("Starting tsfm-cli resolve");
            info!("Model: {:?}", args.model);
            info!("Config: {:?}", args.config);
            info!("Prediction length: {}", args.prediction_length);
            run_resolve(args).map(|_| ())
        }
        Commands::Defaults(args) => run_defaults(args),
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            let code = exit_code(&e);
            match code {
                2 => eprintln!("Error: {}", e),
                3 => eprintln!("Model Error: {:#}", e),
                _ => eprintln!("Runtime Error: {}", e),
            }
            std::process::exit(code);
        }
    }
}
