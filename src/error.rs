//! # Error Module
//!
//! This module provides the error type shared by the serial reader, the chat
//! client, the metrics sampler and the prompt pipeline.
//! It uses the `thiserror` crate for ergonomic error handling.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for `serial_ollama` operations.
pub type Result<T> = std::result::Result<T, SerialOllamaError>;

/// Main error type for the `serial_ollama` application.
#[derive(Debug, Error)]
pub enum SerialOllamaError {
    /// Failed to open serial port.
    #[error("Failed to open serial port '{port_name}': {reason}")]
    PortOpen { port_name: String, reason: String },

    /// No complete line arrived within the bounded wait.
    #[error("Timed out after {waited:?} waiting for a line on '{port_name}'")]
    ConnectionTimeout { port_name: String, waited: Duration },

    /// Failed to read from serial port.
    #[error("Failed to read from serial port: {0}")]
    PortRead(String),

    /// The run was interrupted by the user.
    #[error("Interrupted by user")]
    Interrupted,

    /// Data encoding/decoding error.
    #[error("Data encoding error: {0}")]
    Encoding(String),

    /// The chat endpoint answered with an error.
    #[error("Chat request failed: {0}")]
    Llm(String),

    /// HTTP transport or response decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Host metrics could not be sampled.
    #[error("Metrics unavailable: {0}")]
    Metrics(String),

    /// File or console I/O error.
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SerialOllamaError {
    /// Creates a new port open error.
    #[must_use]
    pub fn port_open(port_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PortOpen {
            port_name: port_name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new connection timeout error.
    #[must_use]
    pub fn connection_timeout(port_name: impl Into<String>, waited: Duration) -> Self {
        Self::ConnectionTimeout {
            port_name: port_name.into(),
            waited,
        }
    }

    /// Creates a new port read error.
    #[must_use]
    pub fn port_read(msg: impl Into<String>) -> Self {
        Self::PortRead(msg.into())
    }

    /// Creates a new encoding error.
    #[must_use]
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Creates a new chat error.
    #[must_use]
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Creates a new metrics error.
    #[must_use]
    pub fn metrics(msg: impl Into<String>) -> Self {
        Self::Metrics(msg.into())
    }

    /// Creates a new configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether the serial reader absorbs this error and reports an absent reading.
    ///
    /// Decoding failures are not serial errors and fail the run instead.
    #[must_use]
    pub fn is_serial_failure(&self) -> bool {
        matches!(
            self,
            Self::PortOpen { .. } | Self::ConnectionTimeout { .. } | Self::PortRead(_)
        )
    }
}
