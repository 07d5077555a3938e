//! sFlow Collector Daemon
//!
//! Main entry point for sflowd.

use clap::Parser;
use sflowd::{shutdown_on, Collector, DaemonStats, MetricSink, SflowdConfig, SflowdError, WriterSink};
use sflowd::{OutputFormat, DEFAULT_CONFIG_PATH};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "sflowd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Listen address, overrides the configuration file
    #[arg(long)]
    listen: Option<String>,

    /// Output format, overrides the configuration file
    #[arg(long, value_parser = parse_format)]
    format: Option<OutputFormat>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    match s {
        "json" => Ok(OutputFormat::Json),
        "line" => Ok(OutputFormat::Line),
        other => Err(format!("unknown output format '{}'", other)),
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    info!("sflowd: Starting sFlow collector");

    match run_daemon(args).await {
        Ok(()) => {
            info!("sflowd: Daemon exiting normally");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "sflowd: Daemon exiting with error");
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}

/// Initialize structured logging to stderr; stdout carries the metrics.
fn init_logging(level: &str) -> sflowd::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| SflowdError::Configuration(format!("Invalid log level: {}", e)))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| SflowdError::Configuration(format!("Failed to set logger: {}", e)))?;

    Ok(())
}

async fn run_daemon(args: Args) -> sflowd::Result<()> {
    let mut config = SflowdConfig::load_or_default(&args.config)?;
    if let Some(listen) = args.listen {
        config.listener.address = listen;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }

    let stats = DaemonStats::new()?;
    let sink: Arc<dyn MetricSink> = Arc::new(WriterSink::stdout(config.output.format));
    let collector = Collector::bind(config, stats.clone()).await?;

    collector
        .run(shutdown_on(tokio::signal::ctrl_c()), sink)
        .await?;

    eprint!("{}", stats.render());
    Ok(())
}
