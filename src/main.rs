//! Site-Mirror main entry point
//!
//! This is the command-line interface for the Site-Mirror offline copier.

use clap::Parser;
use site_mirror::config::{load_config, validate, Config};
use site_mirror::crawler::{project_root, Coordinator};
use site_mirror::output::{print_statistics, CrawlStatistics};
use site_mirror::{parse_base_url, DepthWindow};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Site-Mirror: save a website for offline browsing
///
/// Site-Mirror follows same-origin links breadth-first from a base URL,
/// saves pages inside the chosen depth window together with their images,
/// scripts and stylesheets, and rewrites references so the copy works from
/// the local filesystem.
#[derive(Parser, Debug)]
#[command(name = "site-mirror")]
#[command(version)]
#[command(about = "Save a website for offline browsing", long_about = None)]
struct Cli {
    /// Base URL (include http:// or https://)
    #[arg(value_name = "URL")]
    url: String,

    /// Crawl depth, e.g. 2 (pages at depth 0 to 2) or 1-2
    #[arg(short, long, value_name = "DEPTH")]
    depth: Option<DepthWindow>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory the project directory is created in
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate settings and show what would be mirrored without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let base_url = match parse_base_url(&cli.url) {
        Ok(url) => url,
        Err(e) => {
            println!("[!] Invalid URL format: {}", e);
            std::process::exit(1);
        }
    };

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &base_url)?;
    } else {
        handle_crawl(config, base_url).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_mirror=info,warn"),
            1 => EnvFilter::new("site_mirror=debug,info"),
            2 => EnvFilter::new("site_mirror=trace,debug"),
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

/// Loads the configuration file, if any, and applies command-line overrides
fn build_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(depth) = cli.depth {
        config.crawler.depth = depth;
    }
    if let Some(output_dir) = &cli.output_dir {
        config.crawler.output_dir = output_dir.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.fetcher.timeout_secs = timeout;
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: validates settings and shows what would be mirrored
fn handle_dry_run(config: &Config, base_url: &Url) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Site-Mirror Dry Run ===\n");

    println!("Target:");
    println!("  Base URL: {}", base_url);
    println!("  Project directory: {}", project_root(config, base_url)?.display());

    let window = config.crawler.depth;
    println!("\nCrawler Configuration:");
    println!("  Follow links to depth: {}", window.max);
    println!("  Save pages at depths: {} to {}", window.min, window.max);
    println!(
        "  Cross-origin assets: {}",
        if config.crawler.include_cross_origin_assets {
            "downloaded"
        } else {
            "skipped"
        }
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nFetcher:");
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  Connect timeout: {}s", config.fetcher.connect_timeout_secs);

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, base_url: Url) -> Result<(), Box<dyn std::error::Error>> {
    let mut coordinator = Coordinator::new(config, base_url)?;

    match coordinator.run().await {
        Ok(summary) => {
            print_statistics(&CrawlStatistics::from_summary(&summary));
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
