//! Scout CLI entry point.

use anyhow::Result;
use clap::Parser;
use scout::cli::{commands, Cli, Commands};
use scout::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_deref().map(Settings::expand_path);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    // stderr keeps stdout clean for MCP and piped output
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("scout={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Execute command
    match &cli.command {
        Commands::Search { query, num_results } => {
            commands::run_search(query, *num_results, settings).await?;
        }

        Commands::Pdf { path } => {
            commands::run_pdf(path).await?;
        }

        Commands::Scholar { action } => {
            commands::run_scholar(action, settings).await?;
        }

        Commands::Ask { question } => {
            commands::run_ask(question.as_deref(), settings)?;
        }

        Commands::Tools => {
            commands::run_tools(settings)?;
        }

        Commands::Call { tool, args } => {
            commands::run_call(tool, args.as_deref(), settings).await?;
        }

        Commands::Mcp => {
            commands::run_mcp(settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path)?;
        }
    }

    Ok(())
}
