//! # HX711 Module
//!
//! Request protocol for an HX711 behind a UART bridge. A measurement is two
//! independent steps on the same line: send the gain-selected request frame,
//! then read the fixed-size reply. The reply bytes are returned as-is.

pub mod gain;
pub mod request;

pub use gain::Gain;
pub use request::{
    REQUEST_SIZE, RESPONSE_SIZE, RequestFrame, read_measurement, request_measurement, send_request,
};
