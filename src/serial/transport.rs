//! # Transport Module
//!
//! Blocking write and read primitives over an open [`LineHandle`].
//!
//! Both primitives check the transfer size and the handle before touching
//! the device. A short transfer is continued until `size` bytes have moved;
//! a call that stops making progress fails instead of returning early.

use log::{debug, error, warn};
use std::io;

use super::{ClearBuffer, LineHandle, SerialLine};
use crate::error::{Hx711Error, Result};

/// Largest single transfer the platform accepts (`SSIZE_MAX`).
pub const MAX_TRANSFER_SIZE: usize = isize::MAX as usize;

fn check_transfer_size(size: usize, capacity: usize) -> Result<()> {
    if size == 0 {
        return Err(Hx711Error::invalid_argument("transfer size must be non-zero"));
    }
    if size > MAX_TRANSFER_SIZE {
        return Err(Hx711Error::invalid_argument(format!(
            "transfer size {size} exceeds maximum {MAX_TRANSFER_SIZE}"
        )));
    }
    if size > capacity {
        return Err(Hx711Error::invalid_argument(format!(
            "transfer size {size} exceeds buffer capacity {capacity}"
        )));
    }
    Ok(())
}

impl<L: SerialLine> LineHandle<L> {
    /// Writes exactly `buffer[..size]` to the line.
    ///
    /// # Errors
    ///
    /// - [`Hx711Error::InvalidArgument`] if `size` is zero, above
    ///   [`MAX_TRANSFER_SIZE`] or larger than `buffer`
    /// - [`Hx711Error::HandleClosed`] if the line was closed
    /// - [`Hx711Error::Io`] if the device fails or accepts zero bytes
    /// - [`Hx711Error::TransferOverrun`] if the device reports writing more
    ///   than it was given
    pub fn transmit(&mut self, buffer: &[u8], size: usize) -> Result<()> {
        check_transfer_size(size, buffer.len())?;
        let (port_name, line) = self.parts()?;
        let frame = &buffer[..size];

        let mut written = 0;
        while written < size {
            let remaining = size - written;
            let count = match line.write_bytes(&frame[written..]) {
                Ok(count) => count,
                Err(e) => {
                    error!("[serial] {port_name}: write failed: {e}");
                    return Err(e.into());
                }
            };
            if count == 0 {
                error!("[serial] {port_name}: device accepted 0 of {remaining} bytes");
                return Err(io::Error::new(io::ErrorKind::WriteZero, "serial write accepted no bytes").into());
            }
            if count > remaining {
                error!("[serial] {port_name}: device reported {count} bytes written, only {remaining} requested");
                return Err(Hx711Error::TransferOverrun {
                    requested: remaining,
                    reported: count,
                });
            }
            if count < remaining {
                warn!("[serial] {port_name}: short write, {count} of {remaining} bytes");
            }
            written += count;
        }

        debug!("[serial] {port_name}: sent [{}]", hex::encode(frame));
        Ok(())
    }

    /// Reads exactly `size` bytes into `buffer[..size]`, then discards both
    /// the pending input and output queues.
    ///
    /// The buffer contents are only meaningful when this returns `Ok`.
    ///
    /// # Errors
    ///
    /// - [`Hx711Error::InvalidArgument`] if `size` is zero, above
    ///   [`MAX_TRANSFER_SIZE`] or larger than `buffer`
    /// - [`Hx711Error::HandleClosed`] if the line was closed
    /// - [`Hx711Error::Io`] if the device read fails or times out
    /// - [`Hx711Error::EndOfStream`] if a read returns no data
    /// - [`Hx711Error::TransferOverrun`] if the device reports more bytes
    ///   than requested
    /// - [`Hx711Error::Flush`] if the queues cannot be discarded afterwards
    pub fn receive(&mut self, buffer: &mut [u8], size: usize) -> Result<()> {
        check_transfer_size(size, buffer.len())?;
        let (port_name, line) = self.parts()?;
        let reply = &mut buffer[..size];

        let mut received = 0;
        while received < size {
            let remaining = size - received;
            let count = match line.read_bytes(&mut reply[received..]) {
                Ok(count) => count,
                Err(e) => {
                    error!("[serial] {port_name}: read failed: {e}");
                    return Err(e.into());
                }
            };
            if count == 0 {
                warn!("[serial] {port_name}: end of stream after {received} of {size} bytes");
                return Err(Hx711Error::EndOfStream);
            }
            if count > remaining {
                error!("[serial] {port_name}: device reported {count} bytes read, only {remaining} requested");
                return Err(Hx711Error::TransferOverrun {
                    requested: remaining,
                    reported: count,
                });
            }
            received += count;
        }

        if let Err(e) = line.discard(ClearBuffer::All) {
            error!("[serial] {port_name}: failed to flush queues after read: {e}");
            return Err(Hx711Error::flush(e.to_string()));
        }

        debug!("[serial] {port_name}: received [{}]", hex::encode(&*reply));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serial::MockSerialLine;
    use crate::serial::fake::FakeLine;

    fn open_mock(mut line: MockSerialLine) -> LineHandle<MockSerialLine> {
        line.expect_discard()
            .withf(|queue| matches!(queue, ClearBuffer::Input))
            .times(1)
            .returning(|_| Ok(()));
        LineHandle::configure(line, "mock").unwrap()
    }

    /// Mock that fails the test if any read, write or post-transfer flush happens.
    fn silent_mock() -> LineHandle<MockSerialLine> {
        let mut line = MockSerialLine::new();
        line.expect_write_bytes().never();
        line.expect_read_bytes().never();
        line.expect_drain().never();
        open_mock(line)
    }

    #[test]
    fn test_transmit_rejects_zero_size() {
        let mut handle = silent_mock();
        let result = handle.transmit(&[0xFF; 4], 0);
        assert!(matches!(result, Err(Hx711Error::InvalidArgument(_))));
    }

    #[test]
    fn test_transmit_rejects_size_above_maximum() {
        let mut handle = silent_mock();
        let result = handle.transmit(&[0xFF; 4], MAX_TRANSFER_SIZE + 1);
        assert!(matches!(result, Err(Hx711Error::InvalidArgument(_))));
    }

    #[test]
    fn test_transmit_rejects_size_above_buffer() {
        let mut handle = silent_mock();
        let result = handle.transmit(&[0xFF; 4], 5);
        assert!(matches!(result, Err(Hx711Error::InvalidArgument(_))));
    }

    #[test]
    fn test_receive_rejects_bad_sizes() {
        let mut handle = silent_mock();
        let mut buffer = [0u8; 3];
        assert!(matches!(handle.receive(&mut buffer, 0), Err(Hx711Error::InvalidArgument(_))));
        assert!(matches!(
            handle.receive(&mut buffer, usize::MAX),
            Err(Hx711Error::InvalidArgument(_))
        ));
        assert!(matches!(handle.receive(&mut buffer, 4), Err(Hx711Error::InvalidArgument(_))));
    }

    #[test]
    fn test_closed_handle_rejected_without_io() {
        let mut line = MockSerialLine::new();
        line.expect_write_bytes().never();
        line.expect_read_bytes().never();
        line.expect_drain().times(1).returning(|| Ok(()));
        let mut handle = open_mock(line);
        handle.close().unwrap();

        let mut buffer = [0u8; 3];
        assert!(matches!(handle.transmit(&[0xFF; 4], 4), Err(Hx711Error::HandleClosed)));
        assert!(matches!(handle.receive(&mut buffer, 3), Err(Hx711Error::HandleClosed)));
    }

    #[test]
    fn test_transmit_writes_exact_bytes() {
        let mut handle = LineHandle::configure(FakeLine::default(), "fake").unwrap();
        handle.transmit(&[1, 2, 3, 4, 5], 4).unwrap();

        let (_, line) = handle.parts().unwrap();
        assert_eq!(line.written(), vec![1, 2, 3, 4]);
        assert_eq!(line.writes.len(), 1);
    }

    #[test]
    fn test_transmit_completes_short_writes() {
        let line = FakeLine::chunked(1);
        let mut handle = LineHandle::configure(line, "fake").unwrap();
        handle.transmit(&[0xFF, 0xFF, 0xFF, 0x80], 4).unwrap();

        let (_, line) = handle.parts().unwrap();
        assert_eq!(line.written(), vec![0xFF, 0xFF, 0xFF, 0x80]);
        assert_eq!(line.writes.len(), 4);
    }

    #[test]
    fn test_transmit_zero_byte_write_is_error() {
        let mut line = MockSerialLine::new();
        line.expect_write_bytes().times(1).returning(|_| Ok(0));
        let mut handle = open_mock(line);

        let result = handle.transmit(&[0xFF; 4], 4);
        assert!(matches!(result, Err(Hx711Error::Io(ref e)) if e.kind() == io::ErrorKind::WriteZero));
    }

    #[test]
    fn test_transmit_overrun_is_error() {
        let mut line = MockSerialLine::new();
        line.expect_write_bytes().times(1).returning(|_| Ok(9));
        let mut handle = open_mock(line);

        let result = handle.transmit(&[0xFF; 4], 4);
        assert!(matches!(
            result,
            Err(Hx711Error::TransferOverrun {
                requested: 4,
                reported: 9
            })
        ));
    }

    #[test]
    fn test_transmit_io_failure() {
        let mut line = MockSerialLine::new();
        line.expect_write_bytes()
            .times(1)
            .returning(|_| Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged")));
        let mut handle = open_mock(line);

        assert!(matches!(handle.transmit(&[0xFF; 4], 4), Err(Hx711Error::Io(_))));
    }

    #[test]
    fn test_receive_end_of_stream() {
        let mut line = MockSerialLine::new();
        line.expect_read_bytes().times(1).returning(|_| Ok(0));
        let mut handle = open_mock(line);

        let mut buffer = [0u8; 3];
        assert!(matches!(handle.receive(&mut buffer, 3), Err(Hx711Error::EndOfStream)));
    }

    #[test]
    fn test_receive_io_failure_skips_flush() {
        let mut line = MockSerialLine::new();
        line.expect_read_bytes()
            .times(1)
            .returning(|_| Err(io::Error::new(io::ErrorKind::TimedOut, "no reply")));
        let mut handle = open_mock(line);

        let mut buffer = [0u8; 3];
        assert!(matches!(handle.receive(&mut buffer, 3), Err(Hx711Error::Io(_))));
    }

    #[test]
    fn test_receive_flushes_both_queues() {
        let mut line = FakeLine::default();
        let mut handle = {
            line.input.extend([0x01, 0x02]);
            LineHandle::configure(line, "fake").unwrap()
        };

        // arrives after configuration, plus trailing junk and unsent output
        {
            let (_, line) = handle.parts().unwrap();
            line.input.extend([0x12, 0x34, 0x56, 0x99]);
            line.output.extend([0xEE]);
        }

        let mut buffer = [0u8; 3];
        handle.receive(&mut buffer, 3).unwrap();
        assert_eq!(buffer, [0x12, 0x34, 0x56]);

        let (_, line) = handle.parts().unwrap();
        assert!(line.input.is_empty());
        assert!(line.output.is_empty());
    }

    #[test]
    fn test_receive_completes_short_reads() {
        let line = FakeLine::chunked(2);
        let mut handle = LineHandle::configure(line, "fake").unwrap();
        handle.parts().unwrap().1.input.extend([0x12, 0x34, 0x56]);

        let mut buffer = [0u8; 3];
        handle.receive(&mut buffer, 3).unwrap();
        assert_eq!(buffer, [0x12, 0x34, 0x56]);
    }

    #[test]
    fn test_receive_partial_then_end_of_stream() {
        let mut handle = LineHandle::configure(FakeLine::default(), "fake").unwrap();
        handle.parts().unwrap().1.input.extend([0x12]);

        let mut buffer = [0u8; 3];
        assert!(matches!(handle.receive(&mut buffer, 3), Err(Hx711Error::EndOfStream)));
    }

    #[test]
    fn test_receive_flush_failure_reports_error() {
        let mut handle = LineHandle::configure(FakeLine::default(), "fake").unwrap();
        {
            let (_, line) = handle.parts().unwrap();
            line.input.extend([0x12, 0x34, 0x56]);
            line.fail_discard = true;
        }

        let mut buffer = [0u8; 3];
        let result = handle.receive(&mut buffer, 3);
        assert!(matches!(result, Err(Hx711Error::Flush(_))));
        // data was copied before the flush failed
        assert_eq!(buffer, [0x12, 0x34, 0x56]);
    }

    #[test]
    fn test_failed_read_leaves_handle_closable() {
        let mut handle = LineHandle::configure(FakeLine::default(), "fake").unwrap();
        let mut buffer = [0u8; 3];
        assert!(handle.receive(&mut buffer, 3).is_err());
        assert!(handle.close().is_ok());
    }
}
