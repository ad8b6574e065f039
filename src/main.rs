use std::io::stderr;
use std::process::exit;

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

use retail_etl::config::EtlConfig;
use retail_etl::engine::EtlPipeline;
use retail_etl::queue::QueueClient;
use retail_etl::store::{PgSalesStore, SalesStore, UpsertWriter};

const CONSUMER_TAG: &str = "retail-etl-consumer";

enum Mode {
    /// One-shot bulk load straight into the store.
    Run(String),
    /// Validate a file and publish it onto the queue.
    Publish(String),
    /// Consume queue messages until the connection closes.
    Consume
}

#[tokio::main]
async fn main() -> Result<()> {
    let (mode, log_level) = parse_args();

    setup_logging(log_level);

    let config = EtlConfig::from_env();

    // The exporter is best-effort: a pipeline run without a scrape endpoint
    // is still a valid run.
    if let Err(build_error) = retail_etl::metrics::install(config.metrics_addr) {
        error!("Metrics exporter unavailable: {build_error}");
    }

    let store = PgSalesStore::connect(
        &config.database_url,
        config.db_max_connections,
        config.db_connect_timeout_secs
    )
    .await?;
    store.ensure_schema().await?;

    let pipeline = EtlPipeline::new(UpsertWriter::new(store));

    let outcome = match mode {
        Mode::Run(path) => run_batch(&pipeline, &path).await,
        Mode::Publish(path) => publish(&pipeline, &config, &path).await,
        Mode::Consume => consume(&pipeline, &config).await
    };

    if let Err(terminal_error) = outcome {
        error!("ETL pipeline failed: {terminal_error}");
        exit(1);
    }

    Ok(())
}

async fn run_batch<S: SalesStore>(pipeline: &EtlPipeline<S>, path: &str) -> Result<()> {
    let result = pipeline.run_batch(path).await?;

    info!(
        "ETL pipeline completed successfully: {}/{} rows persisted in {:?}",
        result.written, result.rows_loaded, result.duration
    );

    Ok(())
}

async fn publish<S: SalesStore>(pipeline: &EtlPipeline<S>, config: &EtlConfig, path: &str) -> Result<()> {
    let queue = QueueClient::connect(&config.amqp_addr, &config.queue_name).await?;
    let message_id = pipeline.publish_file(path, &queue).await?;

    info!("Published batch as message [{}]", message_id.0);

    Ok(())
}

async fn consume<S: SalesStore>(pipeline: &EtlPipeline<S>, config: &EtlConfig) -> Result<()> {
    let queue = QueueClient::connect(&config.amqp_addr, &config.queue_name).await?;
    let deliveries = queue.consume(CONSUMER_TAG).await?;

    pipeline.consume(deliveries).await?;

    Ok(())
}

fn parse_args() -> (Mode, LevelFilter) {
    let args: Vec<String> = std::env::args().collect();

    let Some(mode_arg) = args.get(1) else {
        usage();
    };

    match mode_arg.as_str() {
        "run" | "publish" => {
            let Some(path) = args.get(2) else {
                usage();
            };
            let level = parse_log_level(args.get(3));
            let mode = if mode_arg == "run" {
                Mode::Run(path.clone())
            } else {
                Mode::Publish(path.clone())
            };
            (mode, level)
        }
        "consume" => (Mode::Consume, parse_log_level(args.get(2))),
        _ => usage()
    }
}

fn usage() -> ! {
    eprintln!("Usage: retail-etl <mode> [args]");
    eprintln!("  run [input].csv [log_level]      one-shot load, validate and write");
    eprintln!("  publish [input].csv [log_level]  validate and publish to the queue");
    eprintln!("  consume [log_level]              consume the queue until closed");
    eprintln!("Available log levels: error, warn, info, debug, trace (default: info)");
    exit(1);
}

fn parse_log_level(level: Option<&String>) -> LevelFilter {
    let Some(level) = level else {
        return LevelFilter::INFO;
    };

    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", level);
            LevelFilter::INFO
        }
    }
}

fn setup_logging(level: LevelFilter) {
    // stderr keeps log lines apart from anything the modes print on stdout
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry().with(terminal_log).init();
}
