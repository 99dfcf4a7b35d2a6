use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::Catalog;
use server::{
    RecommendationClient, RecommendationOrchestrator, RecommendationServer, ServerConfig, UserData,
};
use sources::preferences::{preferred_categories, tally_categories};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// product-recs - category-based product recommendation service
#[derive(Parser)]
#[command(name = "product-recs")]
#[command(about = "Recommends popular products from each user's favourite categories", long_about = None)]
struct Cli {
    /// Directory holding the dataset files
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Ratings file name, relative to the data directory
    #[arg(long, default_value = data_loader::RATINGS_FILE)]
    ratings_file: PathBuf,

    /// Category file name, relative to the data directory
    #[arg(long, default_value = data_loader::CATEGORIES_FILE)]
    categories_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the dataset and serve queries over TCP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = server::config::DEFAULT_BIND_ADDR)]
        addr: SocketAddr,

        /// Number of recommendations per query
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u16).range(1..))]
        limit: u16,
    },

    /// Ask a running server about a user
    Query {
        /// User ID to query
        user_id: String,

        /// Server address
        #[arg(long, default_value = "127.0.0.1:9001")]
        addr: SocketAddr,
    },

    /// Compute recommendations in-process, without a server
    Recommend {
        /// User ID to get recommendations for
        user_id: String,

        /// Number of recommendations to return
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u16).range(1..))]
        limit: u16,
    },

    /// Show a user's purchases and category tallies
    User {
        /// User ID to display
        user_id: String,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "1000")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "16")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Dispatch to appropriate command handler
    match &cli.command {
        Commands::Serve { addr, limit } => handle_serve(load_catalog(&cli)?, *addr, *limit as usize).await?,
        Commands::Query { user_id, addr } => handle_query(*addr, user_id).await?,
        Commands::Recommend { user_id, limit } => handle_recommend(load_catalog(&cli)?, user_id, *limit as usize),
        Commands::User { user_id } => handle_user(load_catalog(&cli)?, user_id)?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(load_catalog(&cli)?, *requests, *concurrent).await?,
    }

    Ok(())
}

/// Load the dataset; any failure here ends the process
fn load_catalog(cli: &Cli) -> Result<Arc<Catalog>> {
    let ratings_path = cli.data_dir.join(&cli.ratings_file);
    let categories_path = cli.data_dir.join(&cli.categories_file);

    println!("Loading dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let catalog = Catalog::load_from_files(&ratings_path, &categories_path)
        .context("Failed to load dataset")?;
    let (users, products, purchases) = catalog.counts();
    println!(
        "{} Loaded {} users, {} categorized products, {} purchases in {:?}",
        "✓".green(),
        users,
        products,
        purchases,
        start.elapsed()
    );
    Ok(Arc::new(catalog))
}

/// Handle the 'serve' command
async fn handle_serve(catalog: Arc<Catalog>, addr: SocketAddr, limit: usize) -> Result<()> {
    let config = ServerConfig::new(addr).with_recommendation_limit(limit);
    let orchestrator = RecommendationOrchestrator::new(catalog, config.recommendation_limit);
    let server = RecommendationServer::bind(&config, orchestrator).await?;

    println!("{} Listening on {}", "✓".green(), server.local_addr()?);
    server
        .serve_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
}

/// Handle the 'query' command
async fn handle_query(addr: SocketAddr, user_id: &str) -> Result<()> {
    let data = RecommendationClient::new(addr)
        .fetch_user_data(user_id)
        .await
        .with_context(|| format!("Failed to query server at {}", addr))?;
    print_user_data(user_id, &data);
    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(catalog: Arc<Catalog>, user_id: &str, limit: usize) {
    let orchestrator = RecommendationOrchestrator::new(catalog, limit);
    let data = orchestrator.get_user_data(user_id);
    print_user_data(user_id, &data);
}

/// Handle the 'user' command
fn handle_user(catalog: Arc<Catalog>, user_id: &str) -> Result<()> {
    let Some(ratings) = catalog.get_user_ratings(user_id) else {
        bail!("User {} not found", user_id);
    };

    println!("{}", format!("User ID: {}", user_id).bold().blue());
    println!("{}Purchases: {}", "• ".cyan(), ratings.len());
    let avg_rating = if ratings.is_empty() {
        0.0
    } else {
        ratings.values().sum::<f64>() / ratings.len() as f64
    };
    println!("{}Average rating: {:.2}", "• ".cyan(), avg_rating);

    let tallies = tally_categories(ratings, catalog.category_mapping());
    let mut sorted: Vec<_> = tallies.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    println!("Purchases per category:");
    for (category, count) in sorted {
        println!("  - {}: {}", category, count);
    }
    let uncategorized = ratings.len() - tallies.values().sum::<usize>();
    if uncategorized > 0 {
        println!("  - {}: {}", data_loader::UNKNOWN_CATEGORY.dimmed(), uncategorized);
    }

    let preferred = preferred_categories(&tallies);
    if preferred.is_empty() {
        println!("Preferred categories: {}", "none".dimmed());
    } else {
        let names: Vec<&str> = preferred.iter().map(String::as_str).collect();
        println!("Preferred categories: {}", names.join(", ").green());
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(catalog: Arc<Catalog>, requests: usize, concurrent: usize) -> Result<()> {
    if requests == 0 || concurrent == 0 {
        bail!("requests and concurrent must both be at least 1");
    }
    let user_ids: Vec<String> = catalog.user_ids().map(str::to_string).collect();
    if user_ids.is_empty() {
        bail!("Dataset has no users to benchmark with");
    }

    let orchestrator = RecommendationOrchestrator::new(catalog, pipeline_limit());
    let permits = Arc::new(Semaphore::new(concurrent));

    // Use tokio::spawn to make concurrent requests, at most `concurrent` at a time
    let started = Instant::now();
    let mut handles = Vec::with_capacity(requests);
    for _ in 0..requests {
        let user_id = user_ids[rand::random::<u32>() as usize % user_ids.len()].clone();
        let orchestrator = orchestrator.clone();
        let permits = Arc::clone(&permits);
        handles.push(tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            tokio::task::spawn_blocking(move || orchestrator.get_user_data(&user_id)).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    // Wait for all tasks to complete and collect timings
    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for handle in handles {
        timings.push(handle.await??);
    }
    let wall_time = started.elapsed();

    let total_latency: Duration = timings.iter().sum();
    let avg_latency = total_latency / timings.len() as u32;
    timings.sort();
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f64 / wall_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn pipeline_limit() -> usize {
    ServerConfig::default().recommendation_limit
}

/// Print purchases and recommendations for a user
fn print_user_data(user_id: &str, data: &UserData) {
    println!("{}", format!("Products purchased by user {}:", user_id).bold().blue());
    if data.purchased_products.is_empty() {
        println!("\t{}", "No purchases found for this user.".dimmed());
    } else {
        for product in &data.purchased_products {
            println!(
                "\tProduct: {}, Rating: {:.2}, Category: {}",
                product.product_id, product.rating, product.category
            );
        }
    }

    println!();
    println!("{}", format!("Recommendations for user {}:", user_id).bold().blue());
    if data.recommendations.is_empty() {
        println!("\t{}", "Not enough data to make recommendations.".dimmed());
    } else {
        for (rank, rec) in data.recommendations.iter().enumerate() {
            println!(
                "\t{}. Product: {}, Category: {}",
                (rank + 1).to_string().green(),
                rec.product_id,
                rec.category
            );
        }
    }
}
