//! # HX711 UART
//!
//! Reads weight measurements from an HX711 load-cell amplifier over a UART
//! driven from a single-board computer.
//!
//! ## Features
//!
//! - **Line Configuration**: Opens the serial device in raw 8N1 mode at the
//!   HX711 bridge baud rate and discards stale input.
//! - **Blocking Transport**: Size-checked write and read primitives that
//!   complete short transfers and flush the line after every reply.
//! - **Request Protocol**: Gain-selected 4-byte request frames and 3-byte
//!   measurement replies.
//!
//! ## Architecture
//!
//! - [`serial`]: Line configuration, [`serial::LineHandle`] and transport
//! - [`hx711`]: Request frames and the measurement exchange
//! - [`app`]: One measurement run and its exit outcome
//! - [`config`]: Command-line configuration for the binary
//! - [`error`]: Custom error types for the crate
//!
//! ## Example
//!
//! ```no_run
//! use hx711_uart::prelude::*;
//!
//! let mut line = initialize(&LineSettings::hx711("/dev/serial0"))?;
//! request_measurement(&mut line, 128)?;
//! let reply = read_measurement(&mut line)?;
//! println!("{}", hex::encode(reply));
//! line.close()?;
//! # Ok::<(), hx711_uart::Hx711Error>(())
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod hx711;
pub mod serial;

pub use error::{Hx711Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::error::*;
    pub use crate::hx711::{Gain, RESPONSE_SIZE, read_measurement, request_measurement};
    pub use crate::serial::{LineHandle, LineSettings, SerialLine, initialize};
}
