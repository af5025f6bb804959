//! Wire frames.

use core::fmt::{Display, Formatter, LowerHex, UpperHex};
use std::io::{Error, ErrorKind};
use std::iter::{once, Chain, Copied, Once};
use std::slice::Iter;

use crate::protocol::{checksum, CHECKSUM_SIZE, HEADER_SIZE, MAX_FRAME_SIZE, PREAMBLE};
use crate::utils::HexSlice;

/// A stack-allocated buffer that can hold the bytes of the largest possible wire frame.
pub type RawFrame = heapless::Vec<u8, MAX_FRAME_SIZE>;

type Header = Chain<<[u8; 2] as IntoIterator>::IntoIter, Once<u8>>;

/// A frame carrying a borrowed payload.
///
/// On the wire a frame looks like this:
///
/// ```text
/// [0x06] [0x85] [LEN] [PAYLOAD...] [CHECKSUM]
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Frame<'a> {
    length: u8,
    payload: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Creates a frame for the given payload.
    ///
    /// Returns `None` if the payload is empty or longer than 255 bytes.
    #[must_use]
    pub fn new(payload: &'a [u8]) -> Option<Self> {
        let length = u8::try_from(payload.len()).ok().filter(|&len| len > 0)?;
        Some(Self { length, payload })
    }

    /// Creates a frame from a payload already known to be `length` bytes long.
    pub(crate) const fn with_length(length: u8, payload: &'a [u8]) -> Self {
        debug_assert!(payload.len() == length as usize);
        Self { length, payload }
    }

    /// Returns the length byte.
    #[must_use]
    pub const fn length(&self) -> u8 {
        self.length
    }

    /// Returns the payload.
    #[must_use]
    pub const fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Returns the checksum byte.
    #[must_use]
    pub fn checksum(&self) -> u8 {
        checksum(self.length, self.payload)
    }

    /// Returns the size of the frame on the wire.
    #[must_use]
    pub const fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len() + CHECKSUM_SIZE
    }

    /// Returns an iterator over the frame's wire bytes.
    pub fn bytes(&self) -> Chain<Chain<Header, Copied<Iter<'a, u8>>>, Once<u8>> {
        PREAMBLE
            .into_iter()
            .chain(once(self.length))
            .chain(self.payload.iter().copied())
            .chain(once(self.checksum()))
    }

    /// Writes the frame's wire bytes into the given buffer.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the buffer overflows.
    pub fn buffer(&self, buffer: &mut RawFrame) -> std::io::Result<()> {
        for byte in self.bytes() {
            buffer
                .push(byte)
                .map_err(|_| Error::new(ErrorKind::OutOfMemory, "Frame buffer overflow."))?;
        }

        Ok(())
    }
}

impl Display for Frame<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "FRAME({})", self.length)
    }
}

impl UpperHex for Frame<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frame {{ length: ")?;
        UpperHex::fmt(&self.length, f)?;
        write!(f, ", payload: ")?;
        UpperHex::fmt(&HexSlice::new(self.payload), f)?;
        write!(f, ", checksum: ")?;
        UpperHex::fmt(&self.checksum(), f)?;
        write!(f, " }}")
    }
}

impl LowerHex for Frame<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frame {{ length: ")?;
        LowerHex::fmt(&self.length, f)?;
        write!(f, ", payload: ")?;
        LowerHex::fmt(&HexSlice::new(self.payload), f)?;
        write!(f, ", checksum: ")?;
        LowerHex::fmt(&self.checksum(), f)?;
        write!(f, " }}")
    }
}
