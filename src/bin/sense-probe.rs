//! Console client for the relay server.
//!
//! Connects to a server, prints every telemetry record and warns when a reading
//! leaves its threshold range (at most once per metric per cooldown). Typing a
//! metric name (`temperature`, `humidity`, `pressure`, or `TEMP`/`HUM`/`PRES`)
//! sends that metric's status command for the latest reading to the display.
//!
//! Usage: `sense-probe <ws-url> [config.toml]`

use anyhow::{Context, bail};
use embassy_futures::select::{Either, select};
use env_logger::Builder;
use futures::{SinkExt, StreamExt};
use log::{LevelFilter, info, warn};
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use sense_relay::command::{AlertGate, Metric};
use sense_relay::config::ProbeConfig;
use sense_relay::telemetry::SensorSample;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    Builder::new().filter_level(LevelFilter::Info).parse_default_env().init();

    let mut args = std::env::args().skip(1);
    let Some(url) = args.next() else {
        bail!("usage: sense-probe <ws-url> [config.toml]");
    };
    let config = match args.next() {
        Some(path) => ProbeConfig::load(Path::new(&path))?,
        None => ProbeConfig::default(),
    };

    info!("Connecting to {}", url);
    let (websocket, _) = connect_async(url.as_str()).await.with_context(|| format!("Failed to connect to {}", url))?;
    info!("Connected");
    let (mut write, mut read) = websocket.split();

    let mut requests = BufReader::new(tokio::io::stdin()).lines();
    let mut requests_open = config.send_commands;
    if requests_open {
        info!("Type temperature, humidity or pressure to show its status on the display");
    }

    let mut alerts = AlertGate::default();
    let mut latest: Option<SensorSample> = None;

    loop {
        let request = async {
            if requests_open {
                requests.next_line().await
            } else {
                std::future::pending().await
            }
        };

        let event = select(read.next(), request).await;
        match event {
            Either::First(None) => break,
            Either::First(Some(message)) => {
                let text = match message.context("Receive failed")? {
                    Message::Text(text) => text,
                    Message::Close(_) => break,
                    _ => continue,
                };

                let sample = match SensorSample::from_record(&text) {
                    Ok(sample) => sample,
                    Err(e) => {
                        warn!("Error parsing sensor data {:?}: {}", text, e);
                        continue;
                    }
                };
                println!(
                    "temperature {:.2} C  humidity {:.2} %  pressure {:.2} hPa",
                    sample.temperature, sample.humidity, sample.pressure
                );
                for alert in alerts.check(&config.thresholds, &sample) {
                    warn!("{}", alert);
                }
                latest = Some(sample);
            }
            Either::Second(line) => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    requests_open = false;
                    continue;
                };
                let name = line.trim();
                if name.is_empty() {
                    continue;
                }
                let Some(metric) = Metric::from_name(name) else {
                    warn!("Unknown metric {:?}", name);
                    continue;
                };
                let Some(sample) = latest else {
                    warn!("No reading received yet");
                    continue;
                };

                let command = config.thresholds.command_for(metric, &sample);
                write.send(Message::Text(command.to_string())).await.context("Send failed")?;
                info!("Sent {}", command);
            }
        }
    }

    info!("Server connection closed");
    Ok(())
}
