//
//  bbdc-cli
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bbdc_cli::api::ApiError;
use bbdc_cli::cli::{Cli, Commands};
use bbdc_cli::exit_codes;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command
    let result = run(cli).await;

    // Handle result and exit
    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = match e.downcast_ref::<ApiError>() {
                Some(ApiError::Config(_)) => exit_codes::CONFIG,
                _ => exit_codes::ERROR,
            };
            std::process::exit(code);
        }
    }
}

/// Initialize logging based on environment
fn init_logging() {
    let filter = EnvFilter::try_from_env("BBDC_DEBUG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Pr(cmd) => cmd.run(&cli.global).await,
        Commands::Review(cmd) => cmd.run(&cli.global).await,
        Commands::Comment(cmd) => cmd.run(&cli.global).await,
        Commands::Blocker(cmd) => cmd.run(&cli.global).await,
        Commands::Participant(cmd) => cmd.run(&cli.global).await,
        Commands::AutoMerge(cmd) => cmd.run(&cli.global).await,
        Commands::Api(cmd) => cmd.run(&cli.global).await,
        Commands::Doctor(cmd) => cmd.run(&cli.global).await,
        Commands::Completion(cmd) => cmd.run(&cli.global).await,
        Commands::Version => {
            println!("bbdc version {}", bbdc_cli::VERSION);
            Ok(())
        }
    }
}
