use log::{debug, error, info, warn};
use std::fmt;
use std::time::Duration;

use super::{ClearBuffer, DataBits, FlowControl, Parity, SerialLine, SerialPort, StopBits};
use crate::error::{Hx711Error, Result};

/// default UART device on the Raspberry Pi header
pub const DEFAULT_PORT_NAME: &str = "/dev/serial0";

/// bit timing the HX711 bridge expects (26.04 us per bit)
pub const HX711_BAUD_RATE: u32 = 38400;

/// line mode the HX711 bridge requires; not configurable
pub const HX711_DATA_BITS: DataBits = DataBits::Eight;
pub const HX711_PARITY: Parity = Parity::None;
pub const HX711_STOP_BITS: StopBits = StopBits::One;
pub const HX711_FLOW_CONTROL: FlowControl = FlowControl::None;

/// default blocking I/O timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// serial line settings
///
/// Only the device, baud rate and timeout vary; data bits, parity, stop bits
/// and flow control are fixed by [`initialize`].
#[derive(Clone, Debug, PartialEq)]
pub struct LineSettings {
    pub port_name: String,
    pub baud_rate: u32,
    pub timeout: Duration,
}

/// serial line settings implementation
impl LineSettings {
    /// HX711 line settings on the default device
    pub fn new() -> Self {
        Self::hx711(DEFAULT_PORT_NAME)
    }

    /// HX711 line settings on `port_name`
    pub fn hx711(port_name: impl Into<String>) -> Self {
        LineSettings {
            port_name: port_name.into(),
            baud_rate: HX711_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// set device path
    #[must_use]
    pub fn with_port_name(mut self, port_name: impl Into<String>) -> Self {
        self.port_name = port_name.into();
        self
    }

    /// set baud rate
    #[must_use]
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// set blocking I/O timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Checks that the settings can be applied to a device.
    ///
    /// # Errors
    ///
    /// Returns [`Hx711Error::InvalidConfig`] for an empty device path, a zero
    /// baud rate or a zero timeout.
    pub fn validate(&self) -> Result<()> {
        if self.port_name.trim().is_empty() {
            return Err(Hx711Error::invalid_config("port name is empty"));
        }
        if self.baud_rate == 0 {
            return Err(Hx711Error::invalid_config("baud rate must be non-zero"));
        }
        if self.timeout.is_zero() {
            return Err(Hx711Error::invalid_config("timeout must be non-zero"));
        }
        Ok(())
    }
}

impl Default for LineSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LineSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} baud, data bits {}, parity {}, stop bits {}, flow control {}",
            self.port_name,
            self.baud_rate,
            HX711_DATA_BITS,
            HX711_PARITY,
            HX711_STOP_BITS,
            HX711_FLOW_CONTROL
        )
    }
}

/// An open, configured serial line.
///
/// The line is released by [`LineHandle::close`] or, failing that, when the
/// handle is dropped. Once closed every transport call fails with
/// [`Hx711Error::HandleClosed`].
pub struct LineHandle<L: SerialLine> {
    port_name: String,
    line: Option<L>,
}

impl<L: SerialLine> LineHandle<L> {
    /// Takes ownership of an opened line and discards any input that arrived
    /// before configuration.
    ///
    /// If the discard fails the line is dropped here and never handed out.
    ///
    /// # Errors
    ///
    /// Returns [`Hx711Error::Flush`] if the input queue cannot be discarded.
    pub fn configure(mut line: L, port_name: impl Into<String>) -> Result<Self> {
        let port_name = port_name.into();
        if let Err(e) = line.discard(ClearBuffer::Input) {
            error!("[serial] {port_name}: failed to discard stale input: {e}");
            return Err(Hx711Error::flush(e.to_string()));
        }
        debug!("[serial] {port_name}: stale input discarded");
        Ok(LineHandle {
            port_name,
            line: Some(line),
        })
    }

    /// device path this handle was opened on
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// is the line still open
    pub fn is_open(&self) -> bool {
        self.line.is_some()
    }

    /// Device path and line, or [`Hx711Error::HandleClosed`].
    pub(crate) fn parts(&mut self) -> Result<(&str, &mut L)> {
        match self.line.as_mut() {
            Some(line) => Ok((self.port_name.as_str(), line)),
            None => Err(Hx711Error::HandleClosed),
        }
    }

    /// Drains pending output and releases the line.
    ///
    /// The line is released even when draining fails.
    ///
    /// # Errors
    ///
    /// Returns [`Hx711Error::HandleClosed`] if already closed, or
    /// [`Hx711Error::Io`] if the output could not be drained.
    pub fn close(&mut self) -> Result<()> {
        let mut line = self.line.take().ok_or(Hx711Error::HandleClosed)?;
        let drained = line.drain();
        drop(line);
        match drained {
            Ok(()) => {
                info!("[serial] closed {}", self.port_name);
                Ok(())
            }
            Err(e) => {
                warn!("[serial] {}: output not drained before close: {e}", self.port_name);
                Err(e.into())
            }
        }
    }
}

impl<L: SerialLine> Drop for LineHandle<L> {
    fn drop(&mut self) {
        if self.line.take().is_some() {
            debug!("[serial] released {} without explicit close", self.port_name);
        }
    }
}

impl<L: SerialLine> fmt::Debug for LineHandle<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineHandle")
            .field("port_name", &self.port_name)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Opens the serial device and applies the HX711 line mode.
///
/// The device is opened read-write without becoming the controlling
/// terminal, switched to raw mode with the receiver enabled and modem
/// control lines ignored, then stale input is discarded.
///
/// # Errors
///
/// Returns [`Hx711Error::InvalidConfig`] for bad settings,
/// [`Hx711Error::PortOpen`] if the device cannot be opened or configured, and
/// [`Hx711Error::Flush`] if stale input cannot be discarded.
pub fn initialize(settings: &LineSettings) -> Result<LineHandle<Box<dyn SerialPort>>> {
    settings.validate()?;

    let port = tokio_serial::new(settings.port_name.as_str(), settings.baud_rate)
        .data_bits(HX711_DATA_BITS)
        .parity(HX711_PARITY)
        .stop_bits(HX711_STOP_BITS)
        .flow_control(HX711_FLOW_CONTROL)
        .timeout(settings.timeout)
        .open()
        .map_err(|e| {
            error!("[serial] cannot open {}: {e}", settings.port_name);
            Hx711Error::port_open(settings.port_name.as_str(), e.to_string())
        })?;

    info!("[serial] opened {settings}");
    LineHandle::configure(port, settings.port_name.as_str())
}
