use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zamzar_mock::{Config, MockApi, MockServer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "zamzar-mock", version, about)]
struct Args {
    /// Interface to listen on
    #[arg(long, env = "ZAMZAR_MOCK_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "ZAMZAR_MOCK_PORT")]
    port: Option<u16>,

    /// YAML configuration file
    #[arg(short, long, env = "ZAMZAR_MOCK_CONFIG")]
    config: Option<PathBuf>,

    /// Fixture directory
    #[arg(short, long, env = "ZAMZAR_MOCK_FIXTURES")]
    fixtures: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "text", env = "LOG_FORMAT")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    init_logging(args.log_format);

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(host) = args.host {
        config.listen.host = host;
    }
    if let Some(port) = args.port {
        config.listen.port = port;
    }
    if let Some(fixtures) = args.fixtures {
        config.fixtures_dir = fixtures;
    }
    config.validate()?;

    let addr: SocketAddr = config.listen.address().parse()?;
    info!(
        "Serving fixtures from {} with {} resources",
        config.fixtures_dir.display(),
        config.resources.len()
    );

    let api = Arc::new(MockApi::from_config(config));
    let server = MockServer::new(addr, api);

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }
    Ok(())
}

fn init_logging(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "zamzar_mock=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
