//! # Error Module
//!
//! This module provides the error type shared by the line configurator, the
//! transport primitives and the HX711 request protocol.
//! It uses the `thiserror` crate for ergonomic error handling.

use thiserror::Error;

/// Result type alias for `hx711_uart` operations.
pub type Result<T> = std::result::Result<T, Hx711Error>;

/// Main error type for the `hx711_uart` crate.
#[derive(Debug, Error)]
pub enum Hx711Error {
    /// Failed to open or configure the serial device.
    #[error("Failed to open serial port '{port_name}': {reason}")]
    PortOpen { port_name: String, reason: String },

    /// A transfer size or buffer bound was violated.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The line handle has already been closed.
    #[error("Serial line is closed")]
    HandleClosed,

    /// Gain is not one of 128, 64 or 32.
    #[error("Unsupported HX711 gain: {0} (expected 128, 64 or 32)")]
    InvalidGain(u32),

    /// The underlying read, write or drain failed.
    #[error("Serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A read returned no data.
    #[error("End of stream: serial read returned no data")]
    EndOfStream,

    /// The device reported moving more bytes than were asked for.
    #[error("Transfer overrun: requested {requested} bytes, device reported {reported}")]
    TransferOverrun { requested: usize, reported: usize },

    /// Discarding the pending input/output queues failed.
    #[error("Failed to flush serial queues: {0}")]
    Flush(String),

    /// Invalid line configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Hx711Error {
    /// Creates a new port open error.
    #[must_use]
    pub fn port_open(port_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PortOpen {
            port_name: port_name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new invalid argument error.
    #[must_use]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Creates a new flush error.
    #[must_use]
    pub fn flush(msg: impl Into<String>) -> Self {
        Self::Flush(msg.into())
    }

    /// Creates a new invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
