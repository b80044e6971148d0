use anyhow::Context;
use embassy_futures::select::{Either, select};
use env_logger::Builder;
use log::{LevelFilter, info};
use std::io;

use sense_relay::config::{ServerConfig, config_path};
use sense_relay::hardware::{LogDisplay, SimulatedSensor, share};
use sense_relay::server;

fn main() -> anyhow::Result<()> {
    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("sense_relay"), LevelFilter::Debug)
        .parse_default_env()
        .init();

    info!("Starting up");

    let working_dir = std::env::current_dir().context("Failed to read working directory")?;
    let config = match config_path(std::env::args().nth(1), &working_dir) {
        Some(path) => {
            info!("Loading configuration file: {:?}", path);
            ServerConfig::load(&path)?
        }
        None => ServerConfig::default(),
    };

    let (host, port) = config
        .resolve_endpoint(&mut io::stdin().lock(), &mut io::stdout())
        .context("Failed to determine listening endpoint")?;

    let sensor = share(SimulatedSensor::new(&config.sensor));
    let display = share(LogDisplay::new());
    let interval = config.publish_interval();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("sense-relay-worker")
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async move {
        let listener = server::bind(&host, port).await?;

        match select(server::serve(listener, sensor, display, interval), tokio::signal::ctrl_c()).await {
            Either::First(never) => match never {},
            Either::Second(signal) => {
                signal.context("Failed to listen for Ctrl-C")?;
                info!("Interrupted, shutting down");
            }
        }
        Ok::<(), anyhow::Error>(())
    })
}
