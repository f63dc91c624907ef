//! Company-Harvest main entry point
//!
//! This is the command-line interface for the Company-Harvest scraper.

use anyhow::Context;
use clap::Parser;
use company_harvest::config::{load_config_with_hash, validate, Config, MIN_REQUEST_TIMEOUT_SECS};
use company_harvest::extract::CompanyPageParser;
use company_harvest::input::read_input_urls;
use company_harvest::output::{print_summary, JsonExporter, RecordSink};
use company_harvest::{Dispatcher, FetchClient, ProxyPool};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Company-Harvest: an adaptive, rate-limited company page scraper
///
/// Reads a list of company profile URLs, fetches each page with adaptive
/// throttling and retries, and writes the extracted records as JSON.
#[derive(Parser, Debug)]
#[command(name = "company-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Adaptive, rate-limited company page scraper", long_about = None)]
struct Cli {
    /// JSON file with {"urls": [...]} or a plain list of URLs
    #[arg(short, long, value_name = "FILE")]
    inputs: PathBuf,

    /// Output bundle path; records are also streamed to a sibling .jsonl file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Maximum concurrent requests (minimum 1)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds (minimum 5)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// File with one proxy URI per line
    #[arg(short, long, value_name = "FILE")]
    proxies: Option<PathBuf>,

    /// Override the User-Agent header
    #[arg(long)]
    user_agent: Option<String>,

    /// Attach the page <head> markup to each record
    #[arg(long)]
    include_raw: bool,

    /// Optional TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    // Input problems end the run before any network activity
    let urls = read_input_urls(&cli.inputs)
        .with_context(|| format!("Failed to read inputs from {}", cli.inputs.display()))?;
    tracing::info!("Loaded {} input URLs from {}", urls.len(), cli.inputs.display());

    let proxies = match &config.fetch.proxy_file {
        Some(path) => ProxyPool::load(path)
            .with_context(|| format!("Failed to read proxy file {}", path.display()))?,
        None => ProxyPool::empty(),
    };
    if !proxies.is_empty() {
        tracing::info!("Using {} proxies", proxies.len());
    }

    let client = Arc::new(FetchClient::from_config(&config, proxies)?);
    let parser = Arc::new(CompanyPageParser::new(config.output.include_raw));
    let dispatcher = Dispatcher::new(client, parser, config.fetch.dispatch_limit());

    let mut exporter = JsonExporter::create(&config.output.path).with_context(|| {
        format!("Failed to open output next to {}", config.output.path.display())
    })?;

    let batch = dispatcher.run(&urls, &mut exporter).await;
    exporter.finalize()?;

    print_summary(&batch, exporter.bundle_path());
    Ok(())
}

/// Defaults, then the optional config file, then CLI flags
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(concurrency) = cli.concurrency {
        config.fetch.max_concurrency = concurrency.max(1);
    }
    if let Some(timeout) = cli.timeout {
        config.fetch.request_timeout_secs = timeout.max(MIN_REQUEST_TIMEOUT_SECS);
    }
    if let Some(path) = &cli.proxies {
        config.fetch.proxy_file = Some(path.clone());
    }
    if let Some(user_agent) = &cli.user_agent {
        config.fetch.user_agent = user_agent.clone();
    }
    if let Some(output) = &cli.output {
        config.output.path = output.clone();
    }
    if cli.include_raw {
        config.output.include_raw = true;
    }

    validate(&config)?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` takes precedence over the flags when it is set.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("company_harvest=info,warn"),
                1 => EnvFilter::new("company_harvest=debug,info"),
                _ => EnvFilter::new("company_harvest=trace,debug"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_are_clamped() {
        let cli = Cli::parse_from([
            "company-harvest",
            "-i",
            "urls.json",
            "-c",
            "0",
            "-t",
            "1",
            "--include-raw",
        ]);
        let config = build_config(&cli).unwrap();

        assert_eq!(config.fetch.max_concurrency, 1);
        assert_eq!(config.fetch.request_timeout_secs, MIN_REQUEST_TIMEOUT_SECS);
        assert!(config.output.include_raw);
        assert_eq!(config.output.path, PathBuf::from("out.json"));
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "company-harvest",
            "--inputs",
            "urls.json",
            "--output",
            "runs/today.json",
            "--user-agent",
            "TestAgent/1.0",
            "--proxies",
            "proxies.txt",
        ]);
        let config = build_config(&cli).unwrap();

        assert_eq!(config.fetch.user_agent, "TestAgent/1.0");
        assert_eq!(config.output.path, PathBuf::from("runs/today.json"));
        assert_eq!(config.fetch.proxy_file, Some(PathBuf::from("proxies.txt")));
        assert_eq!(config.fetch.max_concurrency, 8);
    }
}
