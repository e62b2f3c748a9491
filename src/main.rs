//! Site-Mirror main entry point
//!
//! This is the command-line interface for the Site-Mirror website mirroring
//! crawler and its HTML to markdown converter.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use site_mirror::config::{load_config_with_hash, validate, Config};
use site_mirror::convert::{convert_dir, Html2MdConverter, DEFAULT_SOURCE_EXTENSION};
use site_mirror::crawler::{crawl, CrawlOptions};
use site_mirror::output::{generate_markdown_summary, print_summary};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Site-Mirror: a concurrent website mirroring crawler
///
/// Site-Mirror downloads a page, every resource it references and every
/// same-origin page it links to, sorting resources into typed subfolders.
#[derive(Parser, Debug)]
#[command(name = "site-mirror")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent website mirroring crawler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mirror a website starting at URL
    Crawl(CrawlArgs),

    /// Convert a folder of HTML files to markdown
    Convert(ConvertArgs),
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Start URL
    #[arg(value_name = "URL")]
    url: String,

    /// Folder to write the mirror to
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of concurrent jobs
    #[arg(long)]
    workers: Option<usize>,

    /// Total attempts per resource
    #[arg(long)]
    max_retries: Option<u32>,

    /// Write a markdown summary to FILE
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Folder containing the HTML files
    #[arg(value_name = "SOURCE_DIR")]
    source: PathBuf,

    /// Folder to write markdown files to
    #[arg(value_name = "OUTPUT_DIR")]
    output: PathBuf,

    /// Extension of the files to convert
    #[arg(long, default_value = DEFAULT_SOURCE_EXTENSION)]
    ext: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Crawl(args) => handle_crawl(args, cli.quiet).await,
        Command::Convert(args) => handle_convert(args),
    }
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

/// Handles the crawl subcommand
async fn handle_crawl(args: CrawlArgs, quiet: bool) -> anyhow::Result<()> {
    let (mut config, config_hash) = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    // Command line flags override the file
    if let Some(output) = &args.output {
        config.output.base_folder = output.display().to_string();
    }
    if let Some(workers) = args.workers {
        config.crawler.workers = workers;
    }
    if let Some(max_retries) = args.max_retries {
        config.crawler.max_retries = max_retries;
    }
    if let Some(summary) = &args.summary {
        config.output.summary_path = Some(summary.display().to_string());
    }
    validate(&config).context("Invalid settings")?;

    let mut options = CrawlOptions::from_config(&config);
    options.config_hash = config_hash;

    let report = crawl(&args.url, options)
        .await
        .with_context(|| format!("Crawl of {} failed", args.url))?;

    if let Some(summary_path) = &config.output.summary_path {
        generate_markdown_summary(&report, Path::new(summary_path))
            .context("Failed to write summary")?;
        tracing::info!("Summary written to: {}", summary_path);
    }

    if !quiet {
        print_summary(&report);
    }

    Ok(())
}

/// Handles the convert subcommand
fn handle_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let summary = convert_dir(&args.source, &args.output, &args.ext, &Html2MdConverter)
        .with_context(|| format!("Failed to convert {}", args.source.display()))?;

    println!("=== Conversion Summary ===\n");
    println!("  Converted: {}", summary.converted.len());
    println!("  Failed: {}", summary.failures.len());
    for (path, reason) in &summary.failures {
        println!("  - {}: {}", path.display(), reason);
    }

    Ok(())
}
