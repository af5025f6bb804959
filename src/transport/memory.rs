//! In-memory transport.

use std::collections::VecDeque;
use std::io::{Error, ErrorKind};

use crate::transport::Transport;

/// An in-memory transport.
///
/// Bytes pushed into it can be read by a codec, bytes written by a codec are recorded.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MemoryTransport {
    incoming: VecDeque<u8>,
    written: Vec<u8>,
}

impl MemoryTransport {
    /// Creates an empty transport.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            incoming: VecDeque::new(),
            written: Vec::new(),
        }
    }

    /// Queues a byte for reading.
    pub fn push(&mut self, byte: u8) {
        self.incoming.push_back(byte);
    }

    /// Returns the bytes that have been written so far.
    #[must_use]
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Takes the bytes that have been written so far.
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.written)
    }

    /// Moves all written bytes into the read queue.
    pub fn loop_back(&mut self) {
        self.incoming.extend(self.written.drain(..));
    }
}

impl Extend<u8> for MemoryTransport {
    fn extend<T: IntoIterator<Item = u8>>(&mut self, iter: T) {
        self.incoming.extend(iter);
    }
}

impl<'a> Extend<&'a u8> for MemoryTransport {
    fn extend<T: IntoIterator<Item = &'a u8>>(&mut self, iter: T) {
        self.incoming.extend(iter);
    }
}

impl FromIterator<u8> for MemoryTransport {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        Self {
            incoming: iter.into_iter().collect(),
            written: Vec::new(),
        }
    }
}

impl Transport for MemoryTransport {
    fn write_byte(&mut self, byte: u8) -> std::io::Result<()> {
        self.written.push(byte);
        Ok(())
    }

    fn available(&mut self) -> std::io::Result<usize> {
        Ok(self.incoming.len())
    }

    fn read_byte(&mut self) -> std::io::Result<u8> {
        self.incoming
            .pop_front()
            .ok_or_else(|| Error::new(ErrorKind::UnexpectedEof, "No byte available."))
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryTransport;
    use crate::transport::Transport;

    #[test]
    fn test_read() {
        let mut transport: MemoryTransport = [0x01, 0x02].into_iter().collect();
        assert_eq!(transport.available().ok(), Some(2));
        assert_eq!(transport.read_byte().ok(), Some(0x01));
        assert_eq!(transport.read_byte().ok(), Some(0x02));
        assert_eq!(transport.available().ok(), Some(0));
        assert!(transport.read_byte().is_err());
    }

    #[test]
    fn test_loop_back() {
        let mut transport = MemoryTransport::new();
        transport.write_byte(0xAB).expect("Write should succeed.");
        assert_eq!(transport.written(), &[0xAB]);
        transport.loop_back();
        assert!(transport.written().is_empty());
        assert_eq!(transport.read_byte().ok(), Some(0xAB));
    }
}
