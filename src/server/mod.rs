//! WebSocket server: accepts clients and runs one supervisor per connection.
//!
//! Every connection shares the same sensor and display handles. There is no
//! limit on concurrent clients; commands from several clients may interleave
//! on the display.

pub mod supervisor;

use anyhow::Context;
use std::convert::Infallible;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::hardware::{EnvironmentSensor, SharedDevice, TextDisplay};

pub use supervisor::{Duty, SessionEnd, handle};

/// Bind the listening socket. Failure here is fatal for the process.
pub async fn bind(host: &str, port: u16) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    log::info!("Server started on {}:{}", host, port);
    Ok(listener)
}

/// Accept clients forever.
///
/// Accept and handshake failures are logged and do not stop the server.
pub async fn serve<S, D>(listener: TcpListener, sensor: SharedDevice<S>, display: SharedDevice<D>, interval: Duration) -> Infallible
where
    S: EnvironmentSensor,
    D: TextDisplay,
{
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                log::warn!("Failed to accept connection: {}", e);
                continue;
            }
        };

        let sensor = sensor.clone();
        let display = display.clone();
        tokio::spawn(async move {
            match tokio_tungstenite::accept_async(stream).await {
                Ok(websocket) => {
                    handle(websocket, peer, sensor, display, interval).await;
                }
                Err(e) => log::warn!("WebSocket handshake with {} failed: {}", peer, e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::{BLUE, GREEN, LogDisplay, share};
    use crate::telemetry::SensorSample;
    use crate::testing::{DisplayEvent, FixedSensor, RecordingDisplay};
    use futures::{SinkExt, StreamExt};
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream;
    use tokio::time::{sleep, timeout};
    use tokio_tungstenite::connect_async;
    use tokio_tungstenite::tungstenite::Message;

    const LIMIT: Duration = Duration::from_secs(5);

    async fn start<D: TextDisplay>(display: SharedDevice<D>) -> std::net::SocketAddr {
        let listener = bind("127.0.0.1", 0).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let sensor = share(FixedSensor::new(21.404, 55.0, 1002.456));
        tokio::spawn(serve(listener, sensor, display, Duration::from_millis(50)));
        addr
    }

    async fn first_record(addr: std::net::SocketAddr) -> SensorSample {
        let (mut client, _) = connect_async(format!("ws://{}", addr)).await.unwrap();
        match timeout(LIMIT, client.next()).await.unwrap() {
            Some(Ok(Message::Text(text))) => SensorSample::from_record(&text).unwrap(),
            other => panic!("expected telemetry, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn client_receives_telemetry_and_drives_display() {
        let display = share(RecordingDisplay::new());
        let addr = start(display.clone()).await;

        let (mut client, _) = connect_async(format!("ws://{}", addr)).await.unwrap();
        let record = match timeout(LIMIT, client.next()).await.unwrap() {
            Some(Ok(Message::Text(text))) => text,
            other => panic!("expected telemetry, got {:?}", other),
        };
        assert_eq!(record, r#"{"temperature": 21.4, "humidity": 55.0, "pressure": 1002.46}"#);

        client.send(Message::Text("TEMP_IN_THRESHOLD:21.4".to_string())).await.unwrap();

        let expected = vec![DisplayEvent::show("21.4 C", GREEN, BLUE), DisplayEvent::Clear];
        timeout(LIMIT, async {
            while display.lock().await.events != expected {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn serves_several_clients() {
        let addr = start(share(LogDisplay::new())).await;
        let (a, b) = tokio::join!(first_record(addr), first_record(addr));
        assert_eq!(a, b);
        assert_eq!(a.pressure, 1002.46);
    }

    #[tokio::test]
    async fn failed_handshake_does_not_stop_the_server() {
        let addr = start(share(LogDisplay::new())).await;

        let mut raw = TcpStream::connect(addr).await.unwrap();
        raw.write_all(b"GET / HTTP/1.1\r\nHost: nowhere\r\n\r\n").await.unwrap();
        drop(raw);

        let sample = timeout(LIMIT, first_record(addr)).await.unwrap();
        assert_eq!(sample.temperature, 21.4);
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let taken = bind("127.0.0.1", 0).await.unwrap();
        let port = taken.local_addr().unwrap().port();
        let error = bind("127.0.0.1", port).await.unwrap_err();
        assert!(error.to_string().contains("Failed to bind"));
    }
}
