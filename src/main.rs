// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use jwks_issuer::commands::{self, Action};
use jwks_issuer::config::{self, Config};
use jwks_issuer::logging;
use jwks_issuer::token::SystemClock;
use tracing::{error, info, warn};

/// Generate a JWKS and/or a signed JWT.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// What to generate: 'all' (JWKS and JWT) or 'jwt_only' (only JWT)
    #[arg(long, value_enum, default_value = "all")]
    action: Action,

    /// `.env`-style configuration file; environment variables override it
    #[arg(long, env = "CONFIG_FILE", default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

fn init_logging(config: &Config) {
    if let Err(e) = logging::init_from_config(config) {
        eprintln!("logging not initialised, a subscriber is already installed: {e}");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&Config::from_pairs(std::env::vars()));
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config);
    if config.file().is_none() {
        warn!(
            path = %cli.config.display(),
            "Configuration file not found, using environment only"
        );
    }

    match commands::run(cli.action, &config, &SystemClock).await {
        Ok(outcome) => {
            if let Some(url) = outcome.publish.and_then(|r| r.public_url) {
                info!(url = %url, "Public JWKS URL");
            }
            println!("{}", outcome.token);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Run failed");
            ExitCode::FAILURE
        }
    }
}
