//! # Configuration Management
//!
//! Centralized configuration for connections and logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()`
//!
//! Durations are written as milliseconds.

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::Level;

/// Largest single body read issued to a transport (64 KiB)
pub const RECEIVE_CHUNK_SIZE: usize = 64 * 1024;

/// Silence after which a peer is considered gone
pub const LIVENESS_TIMEOUT: Duration = Duration::from_millis(7000);

/// Storage reserved for a disconnect reason, including the terminator slot
/// older peers expect
pub const DISCONNECT_REASON_CAPACITY: usize = 256;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProtocolConfig {
    /// Per-connection settings
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ProtocolConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(timeout) = std::env::var("NETSTREAM_LIVENESS_TIMEOUT_MS") {
            let val = timeout.parse::<u64>().map_err(|e| {
                ProtocolError::ConfigError(format!("Invalid NETSTREAM_LIVENESS_TIMEOUT_MS: {e}"))
            })?;
            config.connection.liveness_timeout = Duration::from_millis(val);
        }

        if let Ok(chunk) = std::env::var("NETSTREAM_RECEIVE_CHUNK_SIZE") {
            let val = chunk.parse::<usize>().map_err(|e| {
                ProtocolError::ConfigError(format!("Invalid NETSTREAM_RECEIVE_CHUNK_SIZE: {e}"))
            })?;
            config.connection.receive_chunk_size = val;
        }

        if let Ok(enforce) = std::env::var("NETSTREAM_ENFORCE_LIVENESS") {
            let val = enforce.parse::<bool>().map_err(|e| {
                ProtocolError::ConfigError(format!("Invalid NETSTREAM_ENFORCE_LIVENESS: {e}"))
            })?;
            config.connection.enforce_liveness = val;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.connection.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Per-connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Silence after which `received_packet_recently` turns false
    #[serde(with = "duration_serde")]
    pub liveness_timeout: Duration,

    /// Whether the liveness timeout is checked at all.
    /// Off by default in debug builds so a paused debugger does not drop peers.
    pub enforce_liveness: bool,

    /// Upper bound for a single body receive. Connections clamp it to
    /// `1..=RECEIVE_CHUNK_SIZE`.
    pub receive_chunk_size: usize,

    /// Storage for the disconnect reason, terminator slot included
    pub disconnect_reason_capacity: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            liveness_timeout: LIVENESS_TIMEOUT,
            enforce_liveness: !cfg!(debug_assertions),
            receive_chunk_size: RECEIVE_CHUNK_SIZE,
            disconnect_reason_capacity: DISCONNECT_REASON_CAPACITY,
        }
    }
}

impl ConnectionConfig {
    /// Validate connection configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.liveness_timeout.as_millis() < 100 {
            errors.push("Liveness timeout too short (minimum: 100ms)".to_string());
        } else if self.liveness_timeout.as_secs() > 300 {
            errors.push("Liveness timeout too long (maximum: 300s)".to_string());
        }

        if self.receive_chunk_size == 0 {
            errors.push("Receive chunk size must be greater than 0".to_string());
        } else if self.receive_chunk_size > RECEIVE_CHUNK_SIZE {
            errors.push(format!(
                "Receive chunk size too large: {} bytes (maximum: {RECEIVE_CHUNK_SIZE})",
                self.receive_chunk_size
            ));
        }

        if self.disconnect_reason_capacity < 2 {
            errors.push("Disconnect reason capacity too small (minimum: 2)".to_string());
        } else if self.disconnect_reason_capacity > 4096 {
            errors.push(format!(
                "Disconnect reason capacity too large: {} (maximum: 4096)",
                self.disconnect_reason_capacity
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level for this crate's events
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,

    /// Whether to include thread ids in log lines
    pub thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            json_format: false,
            thread_ids: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.json_format && self.log_level == Level::TRACE {
            errors.push(
                "WARNING: JSON logging at trace level emits one line per packet".to_string(),
            );
        }

        errors
    }
}

/// Helper module for Duration serialization/deserialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = duration.as_millis() as u64;
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        level.as_str().to_lowercase().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
