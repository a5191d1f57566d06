use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "patina")]
#[command(about = "Patina CLI - proximity-weighted vibe aggregation", long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the vibe of a single piece of content
    Extract {
        /// Image URL, link, data URI or free text
        content: String,
    },
    /// Place items on a canvas and print the composite vibe
    Blend {
        /// Item as "x,y,content"; repeat for more items
        #[arg(long = "item", required = true)]
        items: Vec<String>,
        /// JSON object mapping content to a precomputed contribution;
        /// skips the remote extractor
        #[arg(long)]
        contributions: Option<PathBuf>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_service = commands::utils::config_service(cli.config)?;

    match cli.command {
        Commands::Extract { content } => commands::extract::run(&config_service, &content).await?,
        Commands::Blend {
            items,
            contributions,
        } => commands::blend::run(&config_service, &items, contributions.as_deref()).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config_service)?,
            ConfigAction::Init { force } => commands::config::init(&config_service, force)?,
        },
    }

    Ok(())
}
