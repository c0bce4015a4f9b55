use std::{net::IpAddr, sync::Arc, time::Duration};

use clap::Parser;
use tracing::{info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};
use uptime_monitor::{
    MetricsStore, Prober, Scheduler, TargetRegistry,
    api::{ApiConfig, ApiState, spawn_api_server},
    config::DEFAULT_CONFIG_PATH,
};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file holding the target list
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    file: String,

    /// Address to bind the HTTP server to (default: $UPTIME_ADDR or 0.0.0.0)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to bind the HTTP server to (default: $UPTIME_PORT or 5000)
    #[arg(long)]
    port: Option<u16>,
}

fn init() {
    dotenv::dotenv().ok();

    let filter = filter::Targets::new().with_targets(vec![
        ("uptime_monitor", LevelFilter::DEBUG),
        ("monitor", LevelFilter::DEBUG),
        ("tower_http", LevelFilter::DEBUG),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let (registry, config) = TargetRegistry::from_file(&args.file);

    let metrics = Arc::new(MetricsStore::new()?);
    let prober = Prober::new(Duration::from_secs(config.timeout), metrics)?;

    Scheduler::new(
        registry.clone(),
        prober.clone(),
        Duration::from_secs(config.interval),
    )
    .spawn();

    let mut api_config = ApiConfig::default();
    if let Some(host) = args.host {
        api_config.bind_addr.set_ip(host);
    }
    if let Some(port) = args.port {
        api_config.bind_addr.set_port(port);
    }
    let addr = spawn_api_server(api_config, ApiState::new(registry, prober)).await?;
    info!("uptime monitor ready on {addr}");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");

    Ok(())
}
