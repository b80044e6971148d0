//! Startup settings for the server and the probe client.
//!
//! Both read an optional TOML file with kebab-case keys. Every key has a default;
//! the server asks for host and port on stdin when the file leaves them out.

use serde::Deserialize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::command::Thresholds;
use crate::hardware::simulated::SimulatedSensorConfig;
use crate::telemetry::publisher::DEFAULT_PUBLISH_INTERVAL;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "sense-relay.toml";

#[derive(Debug)]
pub enum ConfigError {
    FileReadError(String),
    ParseError(String),
    ValidationError(String),
    PromptError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileReadError(msg) => write!(f, "Failed to read config file: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config file: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::PromptError(msg) => write!(f, "Failed to read input: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    /// Address to listen on; prompted when absent
    pub host: Option<String>,
    /// Port to listen on; prompted when absent
    pub port: Option<u16>,
    pub publish_interval_ms: u64,
    pub sensor: SimulatedSensorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            publish_interval_ms: DEFAULT_PUBLISH_INTERVAL.as_millis() as u64,
            sensor: SimulatedSensorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn load(config_path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(config_path).map_err(|e| ConfigError::FileReadError(format!("{}: {}", config_path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate().map_err(ConfigError::ValidationError)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.publish_interval_ms == 0 {
            return Err("publish-interval-ms must be greater than zero".to_string());
        }
        if self.port == Some(0) {
            return Err("port must be between 1 and 65535".to_string());
        }
        if let Some(host) = &self.host {
            if host.trim().is_empty() {
                return Err("host must not be empty".to_string());
            }
        }
        for (name, value) in [("noise-std-dev", self.sensor.noise_std_dev), ("drift-std-dev", self.sensor.drift_std_dev)] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("sensor {} must be a non-negative number, got {}", name, value));
            }
        }
        Ok(())
    }

    pub fn publish_interval(&self) -> Duration {
        Duration::from_millis(self.publish_interval_ms)
    }

    /// Host and port to bind, asking on `input` for whatever the file left out.
    pub fn resolve_endpoint<R: BufRead, W: Write>(&self, input: &mut R, output: &mut W) -> Result<(String, u16), ConfigError> {
        let host = match &self.host {
            Some(host) => host.clone(),
            None => prompt(input, output, "Enter the IP Address: ")?,
        };
        if host.is_empty() {
            return Err(ConfigError::ValidationError("host must not be empty".to_string()));
        }

        let port = match self.port {
            Some(port) => port,
            None => {
                let answer = prompt(input, output, "Enter the Port Number: ")?;
                parse_port(&answer)?
            }
        };

        Ok((host, port))
    }
}

/// Settings of the `sense-probe` client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ProbeConfig {
    /// Read metric names from stdin and send their status command on request
    pub send_commands: bool,
    pub thresholds: Thresholds,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            send_commands: true,
            thresholds: Thresholds::default(),
        }
    }
}

impl ProbeConfig {
    pub fn load(config_path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(config_path).map_err(|e| ConfigError::FileReadError(format!("{}: {}", config_path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.thresholds.validate().map_err(ConfigError::ValidationError)?;
        Ok(config)
    }
}

/// Pick the config file: explicit argument first, then the default file if it exists.
pub fn config_path(argument: Option<String>, working_dir: &Path) -> Option<PathBuf> {
    match argument {
        Some(path) => Some(PathBuf::from(path)),
        None => {
            let default = working_dir.join(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    }
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String, ConfigError> {
    write!(output, "{}", question).and_then(|_| output.flush()).map_err(|e| ConfigError::PromptError(e.to_string()))?;

    let mut answer = String::new();
    let read = input.read_line(&mut answer).map_err(|e| ConfigError::PromptError(e.to_string()))?;
    if read == 0 {
        return Err(ConfigError::PromptError("unexpected end of input".to_string()));
    }
    Ok(answer.trim().to_string())
}

fn parse_port(answer: &str) -> Result<u16, ConfigError> {
    match answer.parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(ConfigError::ValidationError(format!("invalid port number: {:?}", answer))),
    }
}
