use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{RestaurantId, Snapshot};
use model::{ModelBundle, Recommender, DEFAULT_TOP_K};
use pipeline::aggregate_interactions;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

/// PlateRecs - Restaurant Recommendation Engine
#[derive(Parser)]
#[command(name = "plate-recs")]
#[command(about = "Restaurant recommendation engine using collaborative filtering", long_about = None)]
struct Cli {
    /// Path to the exported database snapshot directory
    #[arg(short, long, default_value = "data/snapshot")]
    data_dir: PathBuf,

    /// Path to the persisted model bundle
    #[arg(short, long, default_value = "model/bundle.bin")]
    model_path: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the models from the latest snapshot and persist the bundle
    ///
    /// Hyperparameters (cosine metric, neighbor count) are fixed constants;
    /// re-running regenerates the bundle from whatever the snapshot holds.
    Train,

    /// Recommend restaurants for a user via similar users
    ///
    /// Reads one JSON object {"userId": "..."} from stdin and prints a JSON
    /// array of restaurant ids to stdout.
    Recommend {
        /// Number of recommendations to return
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },

    /// Rank the whole catalog for a user via point prediction
    ///
    /// Reads one JSON object {"userId": "..."} from stdin and prints a JSON
    /// array of {name, address, rating} objects to stdout.
    Rank {
        /// Number of ranked restaurants to return
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_n: usize,
    },

    /// Show snapshot collection counts
    Stats,
}

/// The single-field inference request read from stdin.
///
/// Deserialization fails if `userId` is absent, which rejects malformed
/// requests before any model work happens.
#[derive(Debug, Deserialize)]
struct RecommendRequest {
    #[serde(rename = "userId")]
    user_id: String,
}

fn main() -> Result<()> {
    // Initialize tracing. Logs go to stderr so the inference commands keep
    // stdout clean for their JSON output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Train => handle_train(&cli.data_dir, &cli.model_path)?,
        Commands::Recommend { top_k } => handle_recommend(&cli.model_path, top_k)?,
        Commands::Rank { top_n } => handle_rank(&cli.data_dir, &cli.model_path, top_n)?,
        Commands::Stats => handle_stats(&cli.data_dir)?,
    }

    Ok(())
}

/// Handle the 'train' command
fn handle_train(data_dir: &PathBuf, model_path: &PathBuf) -> Result<()> {
    let start = Instant::now();
    let snapshot =
        Snapshot::load_from_dir(data_dir).context("Failed to load database snapshot")?;
    println!("{} Loaded snapshot in {:?}", "✓".green(), start.elapsed());

    let aggregated = aggregate_interactions(&snapshot);
    println!(
        "{} Aggregated {} (user, restaurant) interactions",
        "✓".green(),
        aggregated.len()
    );

    let bundle = ModelBundle::fit(&aggregated)
        .context("Training failed; the snapshot may contain no interactions")?;
    println!(
        "{} Fitted models over {} users x {} restaurants",
        "✓".green(),
        bundle.matrix.rows(),
        bundle.matrix.cols()
    );

    if let Some(parent) = model_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    bundle
        .save(model_path)
        .context("Failed to persist model bundle")?;
    println!(
        "{} Saved bundle to {} in {:?} total",
        "✓".green(),
        model_path.display(),
        start.elapsed()
    );

    Ok(())
}

/// Handle the 'recommend' command (neighbor path)
fn handle_recommend(model_path: &PathBuf, top_k: usize) -> Result<()> {
    let request = read_request()?;

    let recommender = Recommender::load(model_path).context("Failed to load model bundle")?;
    let recommendations = recommender.recommend_similar(&request.user_id, top_k)?;

    println!("{}", serde_json::to_string(&recommendations)?);
    Ok(())
}

/// Handle the 'rank' command (point-prediction path)
fn handle_rank(data_dir: &PathBuf, model_path: &PathBuf, top_n: usize) -> Result<()> {
    let request = read_request()?;

    let recommender = Recommender::load(model_path).context("Failed to load model bundle")?;
    let snapshot =
        Snapshot::load_from_dir(data_dir).context("Failed to load database snapshot")?;

    // The original deployment scores the entire catalog as the candidate set
    let candidates: Vec<RestaurantId> = snapshot.catalog.ids().cloned().collect();
    let ranked =
        recommender.rank_candidates(&request.user_id, &candidates, &snapshot.catalog, top_n)?;

    println!("{}", serde_json::to_string(&ranked)?);
    Ok(())
}

/// Handle the 'stats' command
fn handle_stats(data_dir: &PathBuf) -> Result<()> {
    let snapshot =
        Snapshot::load_from_dir(data_dir).context("Failed to load database snapshot")?;
    let (orders, reviews, views, searches, restaurants) = snapshot.counts();

    println!("{}", "Snapshot:".bold().blue());
    println!("{}Orders: {}", "• ".green(), orders);
    println!("{}Reviews: {}", "• ".green(), reviews);
    println!("{}Views: {}", "• ".green(), views);
    println!("{}Searches: {}", "• ".green(), searches);
    println!("{}Restaurants: {}", "• ".green(), restaurants);

    let aggregated = aggregate_interactions(&snapshot);
    let users: std::collections::HashSet<_> = aggregated.iter().map(|i| &i.user_id).collect();
    println!(
        "{}Aggregated interactions: {} across {} users",
        "• ".cyan(),
        aggregated.len(),
        users.len()
    );

    Ok(())
}

/// Read and decode the inference request from stdin
fn read_request() -> Result<RecommendRequest> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read request from stdin")?;

    serde_json::from_str(&input)
        .context("Request must be a JSON object with a \"userId\" field")
}
