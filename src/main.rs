use anyhow::Result;
use clap::Parser;
use sheepdog_exporter::{config::Config, server};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// Address to listen on for web interface and telemetry (overrides config)
    #[arg(long = "web.listen-address", env = "SHEEPDOG_EXPORTER_LISTEN_ADDRESS")]
    listen_address: Option<String>,

    /// Path under which to expose metrics (overrides config)
    #[arg(long = "web.telemetry-path", env = "SHEEPDOG_EXPORTER_METRICS_PATH")]
    metrics_path: Option<String>,

    /// Path to Sheepdog's pid file to export process information (overrides config)
    #[arg(long = "sheepdog.pid-file", env = "SHEEPDOG_PID_FILE")]
    pid_file: Option<PathBuf>,

    /// Name or path of the dog CLI (overrides config)
    #[arg(long = "dog.binary", env = "SHEEPDOG_DOG_BINARY")]
    dog_binary: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Sheepdog Prometheus Exporter v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;

    // Override with CLI arguments if provided
    if let Some(listen_address) = args.listen_address {
        config.server.listen_address = listen_address;
    }
    if let Some(metrics_path) = args.metrics_path {
        config.server.metrics_path = metrics_path;
    }
    if let Some(pid_file) = args.pid_file {
        config.sheepdog.pid_file = Some(pid_file);
    }
    if let Some(dog_binary) = args.dog_binary {
        config.sheepdog.dog_binary = dog_binary;
    }

    info!("Configuration loaded successfully");
    info!("dog binary: {}", config.sheepdog.dog_binary);
    if let Some(pid_file) = &config.sheepdog.pid_file {
        info!("Exporting process metrics from pid file {}", pid_file.display());
    }

    // Start the metrics server
    if let Err(e) = server::start(config).await {
        error!("Server error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
