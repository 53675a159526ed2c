//! Repolens - AI-assisted repository review CLI
//!
//! ## Commands
//!
//! - `analyze`: review a GitHub repository and print the structured report
//! - `health`: probe the AI provider across the configured model list
//!
//! `analyze` always exits 0 with a well-formed report, even when the
//! analysis degrades; only startup problems (missing API key) fail the
//! process.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use repolens_core::{init_tracing, AnalysisRequest, AnalysisService, AppConfig};

#[derive(Parser)]
#[command(name = "repolens")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AI-assisted code review for GitHub repositories", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a GitHub repository and print the structured report
    Analyze {
        /// Repository URL, e.g. https://github.com/octocat/Hello-World
        url: String,

        /// One-line description of the project
        #[arg(long)]
        description: Option<String>,

        /// Project goal (repeatable)
        #[arg(long = "goal")]
        goals: Vec<String>,

        /// Review focus area (repeatable), e.g. security
        #[arg(long = "focus")]
        focus_areas: Vec<String>,

        /// Developer experience level, e.g. beginner
        #[arg(long)]
        experience: Option<String>,
    },

    /// Probe the AI provider and print per-service health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json_logs, level);

    let config = AppConfig::from_env();
    config
        .validate()
        .context("startup configuration is incomplete")?;
    let service = AnalysisService::from_config(config);

    match cli.command {
        Commands::Analyze {
            url,
            description,
            goals,
            focus_areas,
            experience,
        } => {
            let request = AnalysisRequest {
                repository_url: url,
                project_description: description,
                project_goals: goals,
                focus_areas,
                experience_level: experience,
            };
            let report = service.analyze(&request).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Commands::Health => {
            let report = service.health_check().await;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if report.is_healthy() {
                Ok(())
            } else {
                std::process::exit(1);
            }
        }
    }
}
