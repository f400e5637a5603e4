//! Pagewave main entry point
//!
//! This is the command-line interface for the Pagewave site-to-Markdown crawler.

use anyhow::{bail, Context};
use clap::Parser;
use pagewave::config::{compute_effective_hash, load_config, validate, Config};
use pagewave::crawler::{run_crawl, CrawlRequest};
use pagewave::output::{load_statistics, print_report, print_statistics};
use pagewave::storage::SqliteStorage;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Pagewave: crawl a site and keep its content as Markdown
///
/// Pagewave starts at a seed URL, converts the main content of every page
/// to Markdown, and follows same-domain links breadth-first up to a maximum
/// depth. Results are stored in SQLite and can be exported as JSON.
#[derive(Parser, Debug)]
#[command(name = "pagewave")]
#[command(version)]
#[command(about = "Crawl a website into Markdown", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from (prompted for when omitted)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum link depth to follow from the seed
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Only fetch the seed URL
    #[arg(long)]
    no_recursive: bool,

    /// Separate image references from page content
    #[arg(long)]
    include_images: bool,

    /// Render pages in a headless browser before extracting content
    #[arg(long)]
    render: bool,

    /// Write the crawled pages to a JSON file
    #[arg(long)]
    save_json: bool,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the effective configuration without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show stored scrapes from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

impl Cli {
    /// Applies command-line overrides on top of file values
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(depth) = self.max_depth {
            config.crawler.max_depth = depth;
        }
        if self.no_recursive {
            config.crawler.recursive = false;
        }
        if self.include_images {
            config.crawler.include_images = true;
        }
        if self.render {
            config.crawler.render = true;
        }
        if self.insecure {
            config.fetch.accept_invalid_certs = true;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };
    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid configuration after overrides")?;

    let config_hash = compute_effective_hash(&config);
    tracing::debug!("Effective configuration hash: {}", config_hash);

    if cli.dry_run {
        handle_dry_run(&config, cli.url.as_deref(), &config_hash);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        let url = match cli.url.clone() {
            Some(url) => url,
            None => prompt_for_url()?,
        };
        handle_crawl(config, config_hash, url, cli.save_json).await?;
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
            0 => EnvFilter::new("pagewave=info,warn"),
            1 => EnvFilter::new("pagewave=debug,info"),
            2 => EnvFilter::new("pagewave=trace,debug"),
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

/// Reads the seed URL from stdin
fn prompt_for_url() -> anyhow::Result<String> {
    print!("Enter the URL to scrape: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read URL from stdin")?;

    let url = line.trim().to_string();
    if url.is_empty() {
        bail!("No URL provided");
    }
    Ok(url)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config, url: Option<&str>, config_hash: &str) {
    println!("=== Pagewave Dry Run ===\n");

    println!("Seed: {}", url.unwrap_or("(prompted at crawl time)"));
    println!("Config hash: {}", config_hash);

    println!("\nCrawler:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Recursive: {}", config.crawler.recursive);
    println!("  Include images: {}", config.crawler.include_images);
    println!("  Render: {}", config.crawler.render);
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages_open
    );

    println!("\nFetch:");
    println!("  User agent: {}", config.fetch.user_agent);
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!(
        "  Attempts: {} ({}s apart)",
        config.fetch.max_attempts, config.fetch.retry_delay_secs
    );
    println!("  Accept invalid certs: {}", config.fetch.accept_invalid_certs);

    println!("\nRender:");
    println!(
        "  Chrome: {}",
        config
            .render
            .chrome_executable
            .as_deref()
            .unwrap_or("(auto-detect)")
    );
    println!(
        "  Window: {}x{}",
        config.render.window_width, config.render.window_height
    );
    println!(
        "  Wait / settle: {}s / {}s",
        config.render.wait_timeout_secs, config.render.settle_delay_secs
    );

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Export directory: {}", config.output.export_dir);

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows stored scrapes from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))
        .context("Failed to open database")?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    config_hash: String,
    url: String,
    save_json: bool,
) -> anyhow::Result<()> {
    let request = CrawlRequest {
        seed_url: url,
        max_depth: config.crawler.max_depth,
        recursive: config.crawler.recursive,
        include_images: config.crawler.include_images,
        render_mode: config.crawler.render,
    };

    match run_crawl(config, config_hash, request, save_json).await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e).context("Crawl failed")
        }
    }
}
