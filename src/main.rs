//! Folio-Bad-Urls main entry point
//!
//! This is the command-line interface for the catalog link verifier.

use anyhow::Context;
use clap::Parser;
use folio_bad_urls::config::{load_config_with_hash, Config};
use folio_bad_urls::discovery::FolioStrategy;
use folio_bad_urls::output::{format_statistics, log_statistics, CsvReportWriter};
use folio_bad_urls::Verifier;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Folio-Bad-Urls: a polite catalog link verifier
///
/// Folio-Bad-Urls pulls electronic resource links out of a FOLIO catalog,
/// checks each one while respecting robots.txt and per-host crawl delays,
/// and writes one CSV report of bad links per batch.
#[derive(Parser, Debug)]
#[command(name = "folio-bad-urls")]
#[command(version = "1.0.0")]
#[command(about = "A polite catalog link verifier", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Upstream record offset to start at
    #[arg(short, long, value_name = "N", default_value_t = 0)]
    start_offset: usize,

    /// Stop before this upstream record offset
    #[arg(short, long, value_name = "N")]
    end_offset: Option<usize>,

    /// Reuse the cached instance-id list (srs-instance-ids strategy)
    #[arg(long)]
    reuse_instance_ids: bool,

    /// Validate config and show the effective settings without contacting anything
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    setup_logging(cli.verbose, cli.quiet, config.logging.log_file.as_deref())?;
    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    if cli.dry_run {
        handle_dry_run(&config, &cli);
        return Ok(());
    }

    handle_run(&config, &cli).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr unless a log file is configured.
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&str>) -> anyhow::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("folio_bad_urls=info,warn"),
            1 => EnvFilter::new("folio_bad_urls=debug,info"),
            2 => EnvFilter::new("folio_bad_urls=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config, cli: &Cli) {
    println!("=== Folio-Bad-Urls Dry Run ===\n");

    println!("FOLIO:");
    println!("  Okapi URL: {}", config.folio.okapi_url);
    println!("  Tenant: {}", config.folio.tenant_id);
    println!("  Username: {}", config.folio.username);
    println!("  Strategy: {:?}", config.folio.strategy);
    println!("  Query limit: {}", config.folio.query_limit);
    println!("  Batch limit: {}", config.folio.batch_limit);
    println!("  Instance ids cache: {}", config.folio.instance_ids_path);

    println!("\nWeb:");
    println!("  Default crawl delay: {}s", config.web.default_crawl_delay);
    println!("  Max crawl delay: {}s", config.web.max_crawl_delay);
    println!("  Request timeout: {}s", config.web.request_timeout);
    println!("  User agent: {}", config.user_agent.header_value());

    println!("\nScope:");
    println!("  Allow ({}): {:?}", config.scope.allow.len(), config.scope.allow);
    println!("  Block ({}): {:?}", config.scope.block.len(), config.scope.block);

    println!("\nURL checks:");
    println!(
        "  Proxy prefix: {}",
        config.url_parser.proxy_prefix.as_deref().unwrap_or("(none)")
    );
    println!(
        "  Report missing proxy prefix: {}",
        config.url_parser.report_no_proxy_prefix
    );
    println!(
        "  Report wrong proxy prefix: {}",
        config.url_parser.report_wrong_proxy_prefix
    );

    println!("\nOutput:");
    println!("  Report directory: {}", config.output.report_dir);
    if let Some(log_file) = &config.logging.log_file {
        println!("  Log file: {}", log_file);
    }

    println!("\nRange:");
    println!("  Start offset: {}", cli.start_offset);
    match cli.end_offset {
        Some(end) => println!("  End offset: {}", end),
        None => println!("  End offset: (all records)"),
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main verification run
async fn handle_run(config: &Config, cli: &Cli) -> anyhow::Result<()> {
    if let Some(end) = cli.end_offset.filter(|end| *end <= cli.start_offset) {
        tracing::warn!(
            "End offset {} is not after start offset {}, nothing to do",
            end,
            cli.start_offset
        );
    }

    let mut verifier = Verifier::new(config)?;
    let mut source =
        FolioStrategy::connect(&config.folio, config.web.timeout(), cli.reuse_instance_ids)
            .await
            .context("Failed to prepare FOLIO discovery")?;
    let mut sink = CsvReportWriter::new(&config.output.report_dir);

    let stats = match verifier
        .run(&mut source, &mut sink, cli.start_offset, cli.end_offset)
        .await
    {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            return Err(e.into());
        }
    };

    log_statistics(&stats);
    if !cli.quiet {
        print!("{}", format_statistics(&stats));
    }

    Ok(())
}
