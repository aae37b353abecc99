//! Sumi-Index main entry point
//!
//! This is the command-line interface for the Sumi-Index search engine.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use sumi_index::config::{load_config_with_hash, Config};
use sumi_index::output::{
    load_statistics, print_crawl_report, print_search_results, print_statistics,
};
use sumi_index::storage::open_storage;
use sumi_index::{compute_ranks, search, Crawler, SumiError};
use tracing_subscriber::EnvFilter;

/// Sumi-Index: a small web indexing and ranking engine
///
/// Sumi-Index crawls pages breadth-first from configured seeds, indexes
/// their words and links, computes link-based importance scores, and answers
/// multi-word queries with ranked results.
#[derive(Parser, Debug)]
#[command(name = "sumi-index")]
#[command(version = "1.0.0")]
#[command(about = "A small web indexing and ranking engine", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Delete the existing index before crawling
    #[arg(long, conflicts_with_all = ["rank", "search", "stats", "dry_run"])]
    fresh: bool,

    /// Crawl the configured seeds, then recompute ranks (default)
    #[arg(long, conflicts_with_all = ["rank", "search", "stats", "dry_run"])]
    crawl: bool,

    /// Recompute rank scores from the stored link graph and exit
    #[arg(long, conflicts_with_all = ["search", "stats", "dry_run"])]
    rank: bool,

    /// Run a query against the index and print ranked results
    #[arg(long, value_name = "QUERY", conflicts_with_all = ["stats", "dry_run"])]
    search: Option<String>,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(query) = &cli.search {
        handle_search(&config, query)?;
    } else if cli.rank {
        handle_rank(&config)?;
    } else {
        if !cli.crawl {
            tracing::debug!("No mode given, defaulting to --crawl");
        }
        handle_crawl(&config, cli.fresh).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_index=info,warn"),
            1 => EnvFilter::new("sumi_index=debug,info"),
            2 => EnvFilter::new("sumi_index=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Index Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!("  Request timeout: {}ms", config.crawler.request_timeout_ms);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.user_agent_string());

    println!("\nIndex:");
    println!("  Database: {}", config.index.database_path);

    println!("\nRank:");
    println!(
        "  Damping: {}, base: {}, iterations: {}",
        config.rank.damping, config.rank.base, config.rank.iterations
    );

    println!("\nSearch:");
    println!("  Result limit: {}", config.search.result_limit);
    println!(
        "  PageRank normalization: {:?}",
        config.search.pagerank_normalization
    );
    for (signal, weight) in &config.search.weights {
        println!("  - {} x {}", signal, weight);
    }

    println!("\nSeeds ({}):", config.crawler.seeds.len());
    for seed in &config.crawler.seeds {
        println!("  * {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would crawl {} seed URLs to depth {}",
        config.crawler.seeds.len(),
        config.crawler.max_depth
    );
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<()> {
    println!("Database: {}\n", config.index.database_path);

    let storage = open_storage(Path::new(&config.index.database_path))
        .context("Failed to open index database")?;
    let stats = load_statistics(&storage).context("Failed to load statistics")?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --search mode: prints ranked hits for one query
fn handle_search(config: &Config, query: &str) -> Result<()> {
    let storage = open_storage(Path::new(&config.index.database_path))
        .context("Failed to open index database")?;
    let hits = search(&storage, query, &config.search.options())
        .with_context(|| format!("Search for {:?} failed", query))?;
    print_search_results(query, &hits);

    Ok(())
}

/// Handles the --rank mode: recomputes rank scores only
fn handle_rank(config: &Config) -> Result<()> {
    let mut storage = open_storage(Path::new(&config.index.database_path))
        .context("Failed to open index database")?;
    let scores = compute_ranks(&mut storage, &config.rank.params())
        .context("Rank computation failed")?;
    println!("✓ Ranked {} documents", scores.len());

    Ok(())
}

/// Handles the main crawl operation, followed by a rank recompute
async fn handle_crawl(config: &Config, fresh: bool) -> Result<()> {
    let database_path = Path::new(&config.index.database_path);
    if fresh {
        tracing::info!("Starting fresh crawl (deleting existing index)");
        remove_database(database_path)?;
    }

    tracing::info!("Total seed URLs: {}", config.crawler.seeds.len());

    let storage = open_storage(database_path).context("Failed to open index database")?;
    let storage = Arc::new(Mutex::new(storage));

    let mut crawler = Crawler::from_config(config, Arc::clone(&storage))
        .context("Failed to build crawler")?;
    let report = crawler
        .crawl(&config.crawler.seeds)
        .await
        .context("Crawl failed")?;
    print_crawl_report(&report);

    let mut storage = storage.lock().map_err(|_| SumiError::LockPoisoned)?;
    let scores = compute_ranks(&mut *storage, &config.rank.params())
        .context("Rank computation failed")?;
    tracing::info!("Ranked {} documents", scores.len());

    Ok(())
}

/// Deletes the database file and its WAL companions
fn remove_database(path: &Path) -> Result<()> {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.as_os_str().to_owned();
        file.push(suffix);
        let file = PathBuf::from(file);

        if file.exists() {
            std::fs::remove_file(&file)
                .with_context(|| format!("Failed to remove {}", file.display()))?;
        }
    }

    Ok(())
}
