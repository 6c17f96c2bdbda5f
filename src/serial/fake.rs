//! In-memory serial line used by unit tests.

use std::collections::VecDeque;
use std::io;

use super::{ClearBuffer, SerialLine};

/// Models the kernel's pending input and output queues of a tty.
///
/// Bytes written stay in `output` until drained or discarded. Once a full
/// request has been written, `reply` is pushed into `input`.
#[derive(Debug, Default)]
pub(crate) struct FakeLine {
    pub input: VecDeque<u8>,
    pub output: VecDeque<u8>,
    pub writes: Vec<Vec<u8>>,
    pub reply: Vec<u8>,
    pub request_len: usize,
    /// Largest transfer a single read or write call performs (0 = unlimited).
    pub max_chunk: usize,
    pub fail_discard: bool,
    pub fail_drain: bool,
    pending_request: usize,
}

impl FakeLine {
    /// A line that answers every `request_len`-byte request with `reply`.
    pub fn echoing(request_len: usize, reply: &[u8]) -> Self {
        Self {
            reply: reply.to_vec(),
            request_len,
            ..Self::default()
        }
    }

    /// A line that moves at most `max_chunk` bytes per read or write call.
    pub fn chunked(max_chunk: usize) -> Self {
        Self {
            max_chunk,
            ..Self::default()
        }
    }

    /// A line whose output drain always fails.
    pub fn failing_drain() -> Self {
        Self {
            fail_drain: true,
            ..Self::default()
        }
    }

    pub fn written(&self) -> Vec<u8> {
        self.writes.concat()
    }

    fn chunk(&self, len: usize) -> usize {
        if self.max_chunk == 0 {
            len
        } else {
            len.min(self.max_chunk)
        }
    }
}

impl SerialLine for FakeLine {
    fn write_bytes(&mut self, buffer: &[u8]) -> io::Result<usize> {
        let count = self.chunk(buffer.len());
        self.writes.push(buffer[..count].to_vec());
        self.output.extend(&buffer[..count]);

        if self.request_len > 0 {
            self.pending_request += count;
            if self.pending_request >= self.request_len {
                self.pending_request = 0;
                self.input.extend(&self.reply);
            }
        }
        Ok(count)
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        let count = self.chunk(buffer.len()).min(self.input.len());
        for (slot, byte) in buffer[..count].iter_mut().zip(self.input.drain(..count)) {
            *slot = byte;
        }
        Ok(count)
    }

    fn discard(&mut self, queue: ClearBuffer) -> io::Result<()> {
        if self.fail_discard {
            return Err(io::Error::other("tcflush rejected"));
        }
        match queue {
            ClearBuffer::Input => self.input.clear(),
            ClearBuffer::Output => self.output.clear(),
            ClearBuffer::All => {
                self.input.clear();
                self.output.clear();
            }
        }
        Ok(())
    }

    fn drain(&mut self) -> io::Result<()> {
        if self.fail_drain {
            return Err(io::Error::other("tcdrain interrupted"));
        }
        self.output.clear();
        Ok(())
    }
}
