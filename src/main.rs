// LegalScan - Personal Data Redaction for Legal Documents
// Copyright (c) 2025 LegalScan Contributors
// Licensed under the MIT License

use clap::Parser;
use legalscan::cli::{load_or_default, Cli, Commands};
use legalscan::config::LoggingConfig;
use legalscan::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // init needs neither configuration nor file logging
    if let Commands::Init(ref args) = cli.command {
        let log_level = cli.log_level.as_deref().unwrap_or("warn");
        if let Err(e) = init_logging(log_level, &LoggingConfig::default()) {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
        process::exit(exit_code(args.execute().await));
    }

    let config = match load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2); // Configuration error exit code
        }
    };

    let log_level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.application.log_level);
    let guard = match init_logging(log_level, &config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config,
        "LegalScan starting"
    );

    let result = match &cli.command {
        Commands::Anonymize(args) => args.execute(&config).await,
        Commands::ValidateRules(args) => args.execute(&config).await,
        Commands::Init(args) => args.execute().await,
    };

    let code = exit_code(result);
    // Flush file logs before exiting
    drop(guard);
    process::exit(code);
}

fn exit_code(result: anyhow::Result<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e:#}");
            5 // Fatal error exit code
        }
    }
}
