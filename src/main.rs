use std::path::PathBuf;

use clap::{Parser, Subcommand};
use signups::{
    config::{AppConfig, create_app},
    export::teams_to_csv,
    notify,
    state::AppState,
    store,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "Doubles team registrations")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web server (the default).
    Serve,
    /// Write the registrations as CSV.
    Export {
        /// Write to this file instead of standard output.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Export { output } => export(config, output).await,
    }
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::connect(&config).await?;
    let _notifier = notify::spawn(state.tx.subscribe());

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!(address = %config.bind_address, "listening");
    axum::serve(listener, create_app(state)).await?;

    Ok(())
}

async fn export(
    config: AppConfig,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = store::connect(&config.store).await?;
    let teams = store.load_teams().await?;
    let csv = teams_to_csv(&teams)?;

    match output {
        Some(path) => {
            std::fs::write(&path, csv)?;
            tracing::info!(path = %path.display(), teams = teams.len(), "wrote CSV");
        }
        None => println!("{csv}"),
    }

    Ok(())
}
