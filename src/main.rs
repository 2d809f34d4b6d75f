//! Zentinel WS-Addressing validator binary.
//!
//! Run with: `zentinel-wsa --config config.yaml --operation GetQuote --request req.xml --response resp.xml`

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use zentinel_wsa::config::FailAction;
use zentinel_wsa::{MessageExchange, ValidationReport, WsaConfig, WsaValidator};

/// WS-Addressing header validator for SOAP exchanges.
///
/// Validates the request and, when given, the response of one operation
/// invocation against the WS-Addressing rules configured for the operation.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Operation the exchange belongs to
    #[arg(short, long)]
    operation: String,

    /// Request message file
    #[arg(long)]
    request: PathBuf,

    /// Response message file
    #[arg(long)]
    response: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = args.log_level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Starting Zentinel WS-Addressing validator v{}", env!("CARGO_PKG_VERSION"));
    info!("Config file: {}", args.config.display());

    // Load configuration
    let config = if args.config.exists() {
        let content = tokio::fs::read_to_string(&args.config)
            .await
            .context("Failed to read config file")?;
        WsaConfig::from_yaml(&content).context("Failed to parse config file")?
    } else {
        info!("Config file not found, using defaults");
        WsaConfig::default()
    };

    info!(
        assert_action = config.assertions.assert_action,
        assert_to = config.assertions.assert_to,
        assert_relates_to = config.assertions.assert_relates_to,
        operations = config.operations.len(),
        "Configuration loaded"
    );

    let operation = config
        .operation(&args.operation)
        .with_context(|| format!("Operation '{}' not found in configuration", args.operation))?;

    let request = tokio::fs::read_to_string(&args.request)
        .await
        .with_context(|| format!("Failed to read request {}", args.request.display()))?;
    let response = match &args.response {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read response {}", path.display()))?,
        ),
        None => None,
    };

    let mut exchange = MessageExchange::new(operation, &request);
    if let Some(response) = response.as_deref() {
        exchange = exchange.with_response(response);
    }

    let validator = WsaValidator::new(config.assertions.clone());
    let mut failed = false;

    let report = validator
        .validate_request(&exchange)
        .context("Request could not be validated")?;
    failed |= print_report("request", &report);

    if exchange.has_response() {
        let report = validator
            .validate_response(&exchange)
            .context("Response could not be validated")?;
        failed |= print_report("response", &report);
    }

    if failed {
        match config.settings.fail_action {
            FailAction::Block => anyhow::bail!("WS-Addressing validation failed"),
            FailAction::Allow => warn!("WS-Addressing validation failed, fail_action is allow"),
        }
    }
    Ok(())
}

/// Print the outcome of one pass, returning whether it failed.
fn print_report(side: &str, report: &ValidationReport) -> bool {
    if report.is_success() {
        println!("{}: OK", side);
        return false;
    }
    println!("{}: FAILED: {}", side, report.message());
    for violation in report.violations() {
        println!("  [{}] {}", violation.code.as_str(), violation.message);
    }
    true
}
