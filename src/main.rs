use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use recipe_recommender::cli;
use recipe_recommender::config::Config;

/// recipe-recommender - cluster-based recipe recommendations
#[derive(Parser)]
#[command(name = "recipe-recommender")]
#[command(about = "Recipe recommendations, search and ingredient scaling", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Train the cluster model and write the artifact
    Train {
        /// Recipe catalog (overrides config file)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Artifact destination (overrides config file)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Number of clusters (overrides config file)
        #[arg(long)]
        clusters: Option<usize>,
    },
    /// Report inertia and silhouette for a range of cluster counts
    Evaluate {
        /// Recipe catalog (overrides config file)
        #[arg(long)]
        catalog: Option<PathBuf>,

        #[arg(long, default_value_t = 2)]
        min_k: usize,

        #[arg(long, default_value_t = 10)]
        max_k: usize,
    },
    /// Query the saved-recipes service
    Saved {
        #[command(subcommand)]
        command: SavedCommands,
    },
}

#[derive(Subcommand)]
enum SavedCommands {
    /// Print the ids of saved recipes
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    // Initialize observability (tracing + logging)
    recipe_recommender::observability::init_observability(
        "recipe-recommender",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => serve_command(config, host, port).await,
        Commands::Train {
            catalog,
            output,
            clusters,
        } => train_command(config, catalog, output, clusters),
        Commands::Evaluate {
            catalog,
            min_k,
            max_k,
        } => evaluate_command(config, catalog, min_k, max_k),
        Commands::Saved {
            command: SavedCommands::List,
        } => saved_list_command(config).await,
    }
}

#[tracing::instrument(skip(config))]
async fn serve_command(
    config: Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    cli::server::serve(config, host_override, port_override).await
}

#[tracing::instrument(skip(config))]
fn train_command(
    config: Config,
    catalog: Option<PathBuf>,
    output: Option<PathBuf>,
    clusters: Option<usize>,
) -> Result<()> {
    cli::model::train_model(&config, catalog, output, clusters)
}

#[tracing::instrument(skip(config))]
fn evaluate_command(
    config: Config,
    catalog: Option<PathBuf>,
    min_k: usize,
    max_k: usize,
) -> Result<()> {
    cli::model::evaluate_model(&config, catalog, min_k, max_k)
}

#[tracing::instrument(skip(config))]
async fn saved_list_command(config: Config) -> Result<()> {
    cli::saved::list(&config.saved).await
}
