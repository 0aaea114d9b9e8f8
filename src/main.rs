//! Schema-Harvest main entry point
//!
//! This is the command-line interface for the schema-driven extraction agent.

use anyhow::Context;
use clap::Parser;
use schema_harvest::config::{load_job_with_hash, ScrapeConfig};
use schema_harvest::output::{ResultFormatter, ScrapeResult};
use schema_harvest::schema::analyse_schema;
use schema_harvest::{Coordinator, HttpToolClient, ScrapeError};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Schema-Harvest: schema-driven adaptive web extraction
///
/// Schema-Harvest loads a job (start URL, nested JSON schema, interactions,
/// options), drives a browser automation driver to render the pages, infers
/// selectors for every schema field, and prints the extracted records with a
/// quality report as JSON.
#[derive(Parser, Debug)]
#[command(name = "schema-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Schema-driven adaptive web extraction", long_about = None)]
struct Cli {
    /// Path to the job file (JSON, or TOML with a .toml extension)
    #[arg(value_name = "JOB")]
    job: PathBuf,

    /// Base URL of the browser automation driver
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    driver_url: String,

    /// Per-call timeout for driver requests, in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the job and show the schema analysis without contacting the driver
    #[arg(long)]
    dry_run: bool,

    /// Print the result as single-line JSON
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate the job
    tracing::info!("Loading job from: {}", cli.job.display());
    let config = match load_job_with_hash(&cli.job) {
        Ok((config, hash)) => {
            tracing::info!("Job loaded successfully (hash: {})", hash);
            config
        }
        Err(e) => {
            tracing::error!("Failed to load job: {}", e);
            let result = ResultFormatter::format_error(&ScrapeError::from(e));
            print_result(&result, cli.compact)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
        return Ok(ExitCode::SUCCESS);
    }

    let result = handle_scrape(config, &cli).await;
    print_result(&result, cli.compact)?;

    if result.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the result JSON.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("schema_harvest=info,warn"),
            1 => EnvFilter::new("schema_harvest=debug,info"),
            2 => EnvFilter::new("schema_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the schema analysis and interactions
fn handle_dry_run(config: &ScrapeConfig) -> anyhow::Result<()> {
    let schema = analyse_schema(&config.schema).context("Schema analysis failed")?;

    println!("=== Schema-Harvest Dry Run ===\n");
    println!("Start URL: {}", config.url);

    println!(
        "\nCollection: {}",
        schema.collection_name.as_deref().unwrap_or("<none>")
    );
    println!("Fields ({}):", schema.fields.len());
    for field in &schema.fields {
        println!("  - {} ({})", field.path, field.declared_type);
    }

    println!("\nInteractions ({}):", config.interactions.len());
    for interaction in &config.interactions {
        println!("  - {}", describe_interaction(interaction));
    }

    println!("\nOptions:");
    println!("  Pagination: {}", config.options.pagination);
    println!("  Max pages: {}", config.options.max_pages);
    println!("  Retry failed calls: {}", config.options.retry_failed);
    if config.options.retry_failed {
        println!(
            "  Retries: {} (base delay {}ms, factor {})",
            config.retry.retries, config.retry.base_delay_ms, config.retry.backoff_factor
        );
    }

    println!("\n✓ Job is valid");
    Ok(())
}

fn describe_interaction(interaction: &schema_harvest::Interaction) -> String {
    use schema_harvest::Interaction;

    match interaction {
        Interaction::Click { selector } => format!("click {}", selector),
        Interaction::Wait { duration_ms } => format!("wait {}ms", duration_ms),
        Interaction::Scroll { direction } => format!("scroll {}", direction),
        Interaction::Extract { selector } => format!("extract {} (ignored)", selector),
        Interaction::Unknown { kind } => format!("{} (unknown, will be skipped)", kind),
    }
}

/// Handles the main scrape operation
async fn handle_scrape(config: ScrapeConfig, cli: &Cli) -> ScrapeResult {
    tracing::info!("Using driver at {}", cli.driver_url);

    let mut tools = HttpToolClient::new(&cli.driver_url, Duration::from_secs(cli.timeout_secs));
    let result = Coordinator::new(config).run(&mut tools).await;

    match &result {
        ScrapeResult::Success { records, .. } => {
            tracing::info!("Scrape completed with {} record(s)", records.len());
        }
        ScrapeResult::Error { error, .. } => {
            tracing::error!("Scrape failed: {}", error);
        }
    }

    result
}

fn print_result(result: &ScrapeResult, compact: bool) -> anyhow::Result<()> {
    let json = result
        .to_json(!compact)
        .context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}
