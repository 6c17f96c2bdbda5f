//! # Serial Module
//!
//! Line configuration and blocking transport primitives for the UART that
//! carries the HX711 exchange.
//!
//! - [`port`]: opens and configures the device, owns the [`LineHandle`]
//! - [`transport`]: `transmit` / `receive` on an open handle

pub mod port;
pub mod transport;

#[cfg(test)]
pub(crate) mod fake;

use std::io::{self, Read, Write};

pub use port::{LineHandle, LineSettings, initialize};
// Only the blocking serialport builder and trait re-exported by tokio-serial
// are used; no async stream is opened.
pub use tokio_serial::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
pub use transport::MAX_TRANSFER_SIZE;

/// Device-level operations the transport needs from an open serial line.
///
/// Every call blocks until the device completes or fails.
#[cfg_attr(test, mockall::automock)]
pub trait SerialLine {
    /// Single write attempt; returns the number of bytes the device accepted.
    fn write_bytes(&mut self, buffer: &[u8]) -> io::Result<usize>;

    /// Single read attempt; returns the number of bytes placed in `buffer`.
    fn read_bytes(&mut self, buffer: &mut [u8]) -> io::Result<usize>;

    /// Discard queued but unprocessed bytes.
    fn discard(&mut self, queue: ClearBuffer) -> io::Result<()>;

    /// Wait until all written output has been transmitted.
    fn drain(&mut self) -> io::Result<()>;
}

impl SerialLine for Box<dyn SerialPort> {
    fn write_bytes(&mut self, buffer: &[u8]) -> io::Result<usize> {
        self.write(buffer)
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        self.read(buffer)
    }

    fn discard(&mut self, queue: ClearBuffer) -> io::Result<()> {
        self.clear(queue).map_err(|e| io::Error::other(e.to_string()))
    }

    fn drain(&mut self) -> io::Result<()> {
        self.flush()
    }
}
