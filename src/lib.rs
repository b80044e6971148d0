//! Environmental sensor relay.
//!
//! Streams temperature, humidity and pressure readings to WebSocket clients once
//! per interval and renders the threshold status commands they send back on a
//! text display.
//!
//! ## Module Organization
//!
//! - `hardware`: sensor and display traits, simulated devices
//! - `telemetry`: sample capture, record format, publisher duty
//! - `command`: command grammar, display styles, listener duty, thresholds
//! - `server`: accept loop and per-connection supervisor
//! - `config`: TOML settings and the interactive endpoint prompt
//! - `connection`: connection failure taxonomy

pub mod command;
pub mod config;
pub mod connection;
pub mod hardware;
pub mod server;
pub mod telemetry;

#[cfg(test)]
mod testing;
