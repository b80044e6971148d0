//! Command listener duty.
//!
//! Waits for client messages and renders recognised status commands on the
//! shared display, clearing it right after. Bad messages are logged and skipped;
//! only connection failures end the duty.

use futures::{Stream, StreamExt};
use std::convert::Infallible;
use tokio_tungstenite::tungstenite::Message;

use super::{Command, DisplayStyle, parse_command};
use crate::connection::ConnectionError;
use crate::hardware::{HardwareError, SharedDevice, TextDisplay};

/// What happened to one inbound text message.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Rendered(Command),
    /// No prefix matched; nothing was rendered
    Unrecognized,
}

/// Parse one message and drive the display.
///
/// The display is cleared after the dispatch whether or not a command matched.
/// A display failure returns early, so the clear is skipped in that case.
pub async fn process_message<D: TextDisplay>(message: &str, display: &SharedDevice<D>) -> Result<Dispatch, HardwareError> {
    let outcome = match parse_command(message) {
        Some(command) => {
            let style = DisplayStyle::for_status(command.status);
            display
                .lock()
                .await
                .show_message(&command.display_text(), style.foreground, style.background)?;
            Dispatch::Rendered(command)
        }
        None => Dispatch::Unrecognized,
    };

    display.lock().await.clear()?;
    Ok(outcome)
}

/// Run the listener until the connection fails.
///
/// # Parameters
///
/// * `stream` - Inbound half of the client connection
/// * `display` - Shared display handle
///
/// # Returns
///
/// Never returns `Ok`; `ConnectionError::Closed` on a close frame or end of stream.
pub async fn run<R, E, D>(mut stream: R, display: SharedDevice<D>) -> Result<Infallible, ConnectionError>
where
    R: Stream<Item = Result<Message, E>> + Unpin,
    ConnectionError: From<E>,
    D: TextDisplay,
{
    log::debug!("Command listener started");

    loop {
        let message = match stream.next().await {
            Some(message) => message?,
            None => return Err(ConnectionError::Closed),
        };

        match message {
            Message::Text(text) => match process_message(&text, &display).await {
                Ok(Dispatch::Rendered(command)) => {
                    log::debug!("Rendered {:?}/{:?}: {}", command.metric, command.status, command.display_text())
                }
                Ok(Dispatch::Unrecognized) => log::warn!("Unknown message format: {:?}", text),
                Err(e) => log::warn!("Failed to process message {:?}: {}", text, e),
            },
            Message::Binary(data) => log::warn!("Unknown message format: binary frame of {} bytes", data.len()),
            Message::Close(frame) => {
                log::debug!("Close frame received: {:?}", frame);
                return Err(ConnectionError::Closed);
            }
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
        }
    }
}
