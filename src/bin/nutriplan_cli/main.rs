// ABOUTME: Nutriplan CLI - command-line tool for generating and inspecting meal plans
// ABOUTME: Generates plans offline, previews metrics, scores complexity, reads usage and charts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Generate a plan with local templates and save it
//! nutriplan-cli generate --name "Maria Silva" --sex F --age 45 --weight 80 --height 165 \
//!     --hba1c 9.5 --mode python_only --output plano.md
//!
//! # Reproducible meals
//! nutriplan-cli generate --name "Maria Silva" --sex F --age 45 --weight 80 --height 165 --seed 42
//!
//! # Carbohydrate-counting document with 1 unit per 15 g
//! nutriplan-cli generate --name "Maria Silva" --sex F --age 45 --weight 80 --height 165 \
//!     --carb-counting --insulin-ratio 1.0
//!
//! # Metrics and routing decision only
//! nutriplan-cli preview --sex F --age 45 --weight 80 --height 165 --waist 95
//! nutriplan-cli analyze --name "Maria Silva" --sex F --age 45 --weight 80 --height 165 --hba1c 9.5
//!
//! # Usage statistics
//! nutriplan-cli stats --month 3 --year 2025
//!
//! # Patient charts
//! nutriplan-cli patients search --name Maria
//! nutriplan-cli patients files 101
//! ```

mod commands;
mod helpers;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nutriplan_server::config::ServerConfig;
use nutriplan_server::logging::LoggingConfig;

use commands::PatientArgs;

#[derive(Parser)]
#[command(
    name = "nutriplan-cli",
    about = "Nutriplan meal plan CLI",
    long_about = "Command-line tool for generating diabetic meal plans, previewing calculations and inspecting usage."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Generate a complete meal plan
    Generate {
        #[command(flatten)]
        patient: PatientArgs,

        /// Generation mode: python_only, auto, api_minimal, api_full
        #[arg(long)]
        mode: Option<String>,

        /// Seed for reproducible food choices
        #[arg(long)]
        seed: Option<u64>,

        /// Write the document here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Render the carbohydrate-counting document instead
        #[arg(long)]
        carb_counting: bool,

        /// Insulin units per 15 g of carbohydrate (with --carb-counting)
        #[arg(long, requires = "carb_counting")]
        insulin_ratio: Option<f64>,

        /// Attach the document to this patient's chart
        #[arg(long)]
        upload_to: Option<u64>,
    },

    /// Show calculated metrics without generating a plan
    Preview {
        #[command(flatten)]
        patient: PatientArgs,
    },

    /// Score case complexity and show the recommended mode
    Analyze {
        #[command(flatten)]
        patient: PatientArgs,
    },

    /// Show usage statistics
    Stats {
        /// Month (1-12); needs --year
        #[arg(long, requires = "year")]
        month: Option<u32>,

        /// Year; needs --month
        #[arg(long, requires = "month")]
        year: Option<i32>,
    },

    /// Patient chart commands
    Patients {
        #[command(subcommand)]
        action: PatientsCommand,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum PatientsCommand {
    /// Search patients
    Search {
        /// Partial name
        #[arg(long)]
        name: Option<String>,

        /// CPF
        #[arg(long)]
        cpf: Option<String>,

        /// Chart number
        #[arg(long)]
        chart: Option<String>,

        /// Maximum results
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show one patient
    Get {
        /// Patient id
        id: u64,
    },

    /// List files in a patient's chart
    Files {
        /// Patient id
        id: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingConfig::for_cli(cli.verbose).init()?;
    let config = ServerConfig::from_env()?;

    match cli.command {
        Command::Generate {
            patient,
            mode,
            seed,
            output,
            carb_counting,
            insulin_ratio,
            upload_to,
        } => {
            let options = commands::generate::GenerateOptions {
                mode,
                seed,
                output,
                carb_counting,
                insulin_ratio,
                upload_to,
            };
            commands::generate::run(&config, patient, options).await?;
        }
        Command::Preview { patient } => commands::analysis::preview(patient)?,
        Command::Analyze { patient } => commands::analysis::analyze(&config, patient)?,
        Command::Stats { month, year } => commands::stats::show(&config, month, year).await?,
        Command::Patients { action } => match action {
            PatientsCommand::Search {
                name,
                cpf,
                chart,
                limit,
            } => commands::patients::search(&config, name, cpf, chart, limit).await?,
            PatientsCommand::Get { id } => commands::patients::get(&config, id).await?,
            PatientsCommand::Files { id } => commands::patients::files(&config, id).await?,
        },
    }

    Ok(())
}
