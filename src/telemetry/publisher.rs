//! Telemetry publisher duty.
//!
//! Samples the sensor, sends one JSON record, sleeps one interval, repeats. A
//! single send attempt per tick; the first failure ends the duty.

use futures::{Sink, SinkExt};
use std::convert::Infallible;
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message;

use super::SensorSample;
use crate::connection::ConnectionError;
use crate::hardware::{EnvironmentSensor, SharedDevice};

/// Default pause between two published records.
pub const DEFAULT_PUBLISH_INTERVAL: Duration = Duration::from_secs(1);

/// Run the publisher until the connection fails.
///
/// # Parameters
///
/// * `sink` - Outbound half of the client connection
/// * `sensor` - Shared sensor handle
/// * `interval` - Pause after each send
///
/// # Returns
///
/// Never returns `Ok`; the error says why the duty stopped.
pub async fn run<W, S>(mut sink: W, sensor: SharedDevice<S>, interval: Duration) -> Result<Infallible, ConnectionError>
where
    W: Sink<Message> + Unpin,
    ConnectionError: From<W::Error>,
    S: EnvironmentSensor,
{
    log::debug!("Telemetry publisher started, interval {:?}", interval);

    loop {
        let sample = {
            let mut sensor = sensor.lock().await;
            SensorSample::capture(&mut *sensor)?
        };
        let record = sample.to_record().map_err(|e| ConnectionError::Serialize(e.to_string()))?;

        sink.send(Message::Text(record)).await?;

        tokio::time::sleep(interval).await;
    }
}
