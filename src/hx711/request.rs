use log::{debug, error};

use super::Gain;
use crate::error::Result;
use crate::serial::{LineHandle, SerialLine};

/// Length of the request frame on the wire.
pub const REQUEST_SIZE: usize = 4;

/// Length of the measurement reply on the wire.
pub const RESPONSE_SIZE: usize = 3;

const PREAMBLE: u8 = 0xFF;

/// `FF FF FF <gain byte>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestFrame([u8; REQUEST_SIZE]);

impl RequestFrame {
    #[must_use]
    pub fn new(gain: Gain) -> Self {
        RequestFrame([PREAMBLE, PREAMBLE, PREAMBLE, gain.command_byte()])
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; REQUEST_SIZE] {
        &self.0
    }
}

impl From<Gain> for RequestFrame {
    fn from(gain: Gain) -> Self {
        RequestFrame::new(gain)
    }
}

/// Validates a raw gain value and sends the measurement request.
///
/// Nothing is written when the gain is not 128, 64 or 32. The reply is not
/// read here; follow up with [`read_measurement`] or
/// [`LineHandle::receive`] on the same handle.
///
/// # Errors
///
/// Returns [`crate::Hx711Error::InvalidGain`] for an unsupported gain, or
/// whatever [`LineHandle::transmit`] reports.
pub fn request_measurement<L: SerialLine>(line: &mut LineHandle<L>, gain: u32) -> Result<()> {
    let gain = Gain::try_from(gain).inspect_err(|e| error!("[hx711] {e}"))?;
    send_request(line, gain)
}

/// Sends the request frame for `gain`.
///
/// # Errors
///
/// Returns whatever [`LineHandle::transmit`] reports.
pub fn send_request<L: SerialLine>(line: &mut LineHandle<L>, gain: Gain) -> Result<()> {
    let frame = RequestFrame::new(gain);
    debug!("[hx711] requesting measurement at gain {gain}");
    line.transmit(frame.as_bytes(), REQUEST_SIZE)
}

/// Reads the 3-byte reply to a previous request.
///
/// # Errors
///
/// Returns whatever [`LineHandle::receive`] reports.
pub fn read_measurement<L: SerialLine>(line: &mut LineHandle<L>) -> Result<[u8; RESPONSE_SIZE]> {
    let mut reply = [0u8; RESPONSE_SIZE];
    line.receive(&mut reply, RESPONSE_SIZE)?;
    Ok(reply)
}
