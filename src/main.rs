//! Word-Ripple main entry point
//!
//! This is the command-line interface for the Word-Ripple crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use word_ripple::config::{load_config_with_hash, Config};
use word_ripple::crawler::{hardware_parallelism, CrawlRequest, CrawlScheduler, HttpPageParser};
use word_ripple::output::{print_summary, CrawlResultWriter};

/// Word-Ripple: a bounded, parallel word-frequency crawler
///
/// Word-Ripple crawls outward from the configured start pages, up to a
/// maximum link depth and a wall-clock timeout, and reports the most
/// popular words across every page it fetched.
#[derive(Parser, Debug)]
#[command(name = "word-ripple")]
#[command(version = "1.0.0")]
#[command(about = "A bounded, parallel word-frequency crawler", long_about = None)]
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

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let request = CrawlRequest::from_config(&config)?;

    if cli.dry_run {
        handle_dry_run(&config, &request);
        return Ok(());
    }

    handle_crawl(&config, &request, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("word_ripple=info,warn"),
            1 => EnvFilter::new("word_ripple=debug,info"),
            2 => EnvFilter::new("word_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, request: &CrawlRequest) {
    println!("=== Word-Ripple Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", request.max_depth);
    println!("  Timeout: {:?}", request.timeout);
    println!("  Popular word count: {}", request.popular_word_count);
    println!(
        "  Workers: {} (requested {}, hardware {})",
        request.parallelism.min(hardware_parallelism()),
        request.parallelism,
        hardware_parallelism()
    );

    println!("\nOutput:");
    match &config.output.result_path {
        Some(path) => println!("  Result file (append): {}", path),
        None => println!("  Result: stdout"),
    }

    println!("\nStart Pages ({}):", request.start_pages.len());
    for page in &request.start_pages {
        println!("  - {}", page);
    }

    println!("\nIgnored URL Patterns ({}):", config.ignored_urls.len());
    for pattern in &config.ignored_urls {
        println!("  - {}", pattern);
    }

    println!("\nIgnored Word Patterns ({}):", config.ignored_words.len());
    for pattern in &config.ignored_words {
        println!("  - {}", pattern);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, request: &CrawlRequest, quiet: bool) -> anyhow::Result<()> {
    let parser = HttpPageParser::from_config(config)?;
    let scheduler = CrawlScheduler::new(Arc::new(parser));

    let report = match scheduler.crawl_detailed(request).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let writer = CrawlResultWriter::new(&report.result);
    match &config.output.result_path {
        Some(path) => {
            writer
                .write_to_path(Path::new(path))
                .with_context(|| format!("Failed to write result to {}", path))?;
            tracing::info!("Result appended to {}", path);
        }
        None => writer.write(&mut std::io::stdout().lock())?,
    }

    if !quiet {
        print_summary(&report);
    }

    Ok(())
}
