// ABOUTME: HTTP server binary for the nutriplan meal-plan API
// ABOUTME: Loads configuration from the environment, initializes logging and serves until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Nutriplan Server Binary
//!
//! Starts the meal-plan HTTP API. All settings come from the environment;
//! `--http-port` overrides `HTTP_PORT`.

use anyhow::Result;
use clap::Parser;
use nutriplan_server::{config::ServerConfig, logging, server};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "nutriplan-server")]
#[command(about = "Nutriplan - personalized meal plans for people with diabetes")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;
    config.validate()?;

    info!("Starting nutriplan server");
    info!("{}", config.summary());

    if let Err(e) = server::serve(config).await {
        error!("Server error: {e}");
        return Err(e);
    }
    Ok(())
}
