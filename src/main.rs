//! Site-Health main entry point
//!
//! This is the command-line interface for the Site-Health crawler and link checker.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use site_health::config::{load_config, Config, CrawlOverrides};
use site_health::output::{format_terminal_report, load_report, write_markdown_report};
use site_health::storage::{finish_crawl, open_storage, CrawlStatus, SqliteStorage, Storage};
use site_health::SiteCrawler;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Site-Health: crawl a website and check every link on it
///
/// Site-Health crawls same-origin pages breadth first, checks every link it
/// finds (pages, images, stylesheets, scripts and external links) and stores
/// the results in SQLite for later reporting.
#[derive(Parser, Debug)]
#[command(name = "site-health")]
#[command(version)]
#[command(about = "Crawl a website and report broken links", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site and check its links
    Crawl(CrawlArgs),

    /// List recent crawls
    List {
        /// Maximum number of crawls to show
        #[arg(long, default_value_t = 10)]
        limit: usize,

        #[command(flatten)]
        storage: StorageArgs,
    },

    /// Show the report for a stored crawl
    Report {
        /// Crawl ID
        id: i64,

        /// Write a markdown report to this file instead of printing
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        storage: StorageArgs,
    },
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// URL to start from (falls back to `start-url` in the config file)
    url: Option<String>,

    /// Maximum crawl depth
    #[arg(short, long)]
    depth: Option<u32>,

    /// Maximum number of simultaneous requests
    #[arg(long)]
    max_concurrent: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<f64>,

    /// Ignore robots.txt
    #[arg(long)]
    no_robots: bool,

    /// Fraction of crawled pages sampled for vitals measurement
    #[arg(long)]
    sample_rate: Option<f64>,

    /// Write a markdown report to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    #[command(flatten)]
    storage: StorageArgs,
}

impl CrawlArgs {
    fn overrides(&self) -> CrawlOverrides {
        CrawlOverrides {
            start_url: self.url.clone(),
            max_depth: self.depth,
            max_concurrent: self.max_concurrent,
            timeout_secs: self.timeout,
            respect_robots: self.no_robots.then_some(false),
            database_path: self.storage.db.clone(),
            summary_path: self.output.clone(),
            sample_rate: self.sample_rate,
        }
    }
}

#[derive(Args, Debug)]
struct StorageArgs {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Path to the SQLite database (overrides the config file)
    #[arg(long, value_name = "FILE")]
    db: Option<String>,
}

impl StorageArgs {
    /// Loads the config file if one was given, otherwise the defaults
    fn load(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path.display());
                load_config(path)
                    .with_context(|| format!("Failed to load configuration from {}", path.display()))
            }
            None => Ok(Config::default()),
        }
    }

    fn open(&self) -> anyhow::Result<SqliteStorage> {
        let config = self.load()?.merge(CrawlOverrides {
            database_path: self.db.clone(),
            ..Default::default()
        })?;
        open_database(&config.output.database_path)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Crawl(args) => handle_crawl(args).await,
        Command::List { limit, storage } => handle_list(&storage, limit),
        Command::Report {
            id,
            output,
            storage,
        } => handle_report(&storage, id, output.as_deref()),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_health=info,warn"),
            1 => EnvFilter::new("site_health=debug,info"),
            2 => EnvFilter::new("site_health=trace,debug"),
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

fn open_database(path: &str) -> anyhow::Result<SqliteStorage> {
    open_storage(Path::new(path)).with_context(|| format!("Failed to open database {}", path))
}

/// Handles the crawl subcommand
async fn handle_crawl(args: CrawlArgs) -> anyhow::Result<()> {
    let config = args.storage.load()?.merge(args.overrides())?;
    let options = config.crawl_options()?;
    let mut storage = open_database(&config.output.database_path)?;

    let mut crawler = SiteCrawler::new(options)?;
    let crawl_id = storage.create_crawl(crawler.start_url().as_str(), config.crawler.max_depth)?;

    tracing::info!(
        "Starting crawl {} of {} (depth {}, {} concurrent, robots {})",
        crawl_id,
        crawler.start_url(),
        config.crawler.max_depth,
        config.crawler.max_concurrent,
        if config.crawler.respect_robots { "respected" } else { "ignored" }
    );

    let cancel = crawler.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted; finishing the current layer");
            cancel.cancel();
        }
    });

    match crawler.crawl().await {
        Ok(results) => {
            finish_crawl(&mut storage, crawl_id, crawler.pages_crawled(), &results)
                .with_context(|| format!("Failed to store results of crawl {}", crawl_id))?;
            tracing::info!("Crawl {} completed", crawl_id);
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            storage.complete_crawl(crawl_id, 0, 0, CrawlStatus::Failed)?;
            return Err(e).context(format!("Crawl {} failed", crawl_id));
        }
    }

    let report = load_report(&storage, crawl_id)?;
    print!("{}", format_terminal_report(&report));

    if let Some(path) = &config.output.summary_path {
        write_markdown_report(&report, Path::new(path))?;
        println!("\n✓ Report written to: {}", path);
    }

    let mut sample: Vec<_> = crawler
        .vitals_sample(config.vitals.sample_rate)
        .into_iter()
        .collect();
    sample.sort();
    tracing::info!(
        "Selected {} of {} pages for vitals measurement",
        sample.len(),
        crawler.pages_crawled()
    );
    for url in &sample {
        tracing::debug!("Vitals sample: {}", url);
    }

    Ok(())
}

/// Handles the list subcommand
fn handle_list(storage_args: &StorageArgs, limit: usize) -> anyhow::Result<()> {
    let storage = storage_args.open()?;
    let crawls = storage.list_crawls(limit)?;

    if crawls.is_empty() {
        println!("No crawls found.");
        return Ok(());
    }

    println!(
        "{:>5}  {:<10} {:>6} {:>6} {:>7}  {:<20}  URL",
        "ID", "STATUS", "PAGES", "LINKS", "ERRORS", "STARTED"
    );
    for crawl in crawls {
        println!(
            "{:>5}  {:<10} {:>6} {:>6} {:>7}  {:<20}  {}",
            crawl.id,
            crawl.status,
            crawl.total_pages,
            crawl.total_links,
            crawl.errors,
            crawl.started_at.format("%Y-%m-%d %H:%M:%S"),
            crawl.start_url
        );
    }

    Ok(())
}

/// Handles the report subcommand
fn handle_report(
    storage_args: &StorageArgs,
    crawl_id: i64,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let storage = storage_args.open()?;
    let report = load_report(&storage, crawl_id)?;

    match output {
        Some(path) => {
            write_markdown_report(&report, path)?;
            println!("✓ Report written to: {}", path.display());
        }
        None => print!("{}", format_terminal_report(&report)),
    }

    Ok(())
}
