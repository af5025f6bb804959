//! Byte-at-a-time receive state machine.

use core::fmt::{Display, Formatter};

use log::trace;

use crate::error::Error;
use crate::protocol::PREAMBLE;
use crate::utils::HexSlice;

/// The stage of the parser within the current frame.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Stage {
    /// Waiting for the first preamble byte.
    #[default]
    SeekPreamble1,
    /// Waiting for the second preamble byte.
    SeekPreamble2,
    /// Waiting for the length byte.
    ReadLength,
    /// Collecting payload bytes.
    ReadPayload,
    /// Waiting for the checksum byte.
    ReadChecksum,
}

/// The reason why a frame was discarded after its preamble was seen.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Rejection {
    /// The length byte did not match the configured payload size.
    LengthMismatch {
        /// The configured payload size.
        expected: u8,
        /// The received length byte.
        found: u8,
    },
    /// The checksum byte did not match the calculated checksum.
    ChecksumMismatch {
        /// The calculated checksum.
        expected: u8,
        /// The received checksum byte.
        found: u8,
    },
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LengthMismatch { expected, found } => {
                write!(f, "Length mismatch: expected {expected}, found {found}")
            }
            Self::ChecksumMismatch { expected, found } => {
                write!(
                    f,
                    "Checksum mismatch: expected {expected:#04X}, found {found:#04X}"
                )
            }
        }
    }
}

/// The outcome of feeding a single byte into the [`Parser`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Event {
    /// Noise outside of a frame has been dropped.
    ///
    /// Carries the amount of dropped bytes, which includes an abandoned first preamble byte.
    Discarded(usize),
    /// The byte advanced the current frame.
    Consumed,
    /// The byte completed a frame which failed validation.
    Rejected(Rejection),
    /// The byte completed a valid frame. Its payload is available via [`Parser::payload`].
    Complete,
}

/// Receive state machine for frames of a fixed payload size.
///
/// Any malformed frame resets the parser to [`Stage::SeekPreamble1`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Parser {
    stage: Stage,
    size: u8,
    buffer: Box<[u8]>,
    index: usize,
    checksum: u8,
}

impl Parser {
    /// Creates a parser for payloads of `size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPayloadSize`] if `size` is zero or greater than 255.
    pub fn new(size: usize) -> Result<Self, Error> {
        let length = u8::try_from(size)
            .ok()
            .filter(|&length| length > 0)
            .ok_or(Error::InvalidPayloadSize(size))?;

        Ok(Self {
            stage: Stage::default(),
            size: length,
            buffer: vec![0; size].into_boxed_slice(),
            index: 0,
            checksum: 0,
        })
    }

    /// Returns the configured payload size.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size as usize
    }

    /// Returns the expected length byte.
    #[must_use]
    pub(crate) const fn length(&self) -> u8 {
        self.size
    }

    /// Returns the current stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns the payload of the last completed frame.
    ///
    /// The content is only meaningful directly after [`Event::Complete`] was returned.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.buffer
    }

    /// Discards any partially received frame.
    pub fn reset(&mut self) {
        self.stage = Stage::SeekPreamble1;
    }

    /// Feeds a single byte into the state machine.
    pub fn feed(&mut self, byte: u8) -> Event {
        match self.stage {
            Stage::SeekPreamble1 => {
                if byte == PREAMBLE[0] {
                    self.stage = Stage::SeekPreamble2;
                    Event::Consumed
                } else {
                    Event::Discarded(1)
                }
            }
            Stage::SeekPreamble2 => {
                if byte == PREAMBLE[1] {
                    self.stage = Stage::ReadLength;
                    Event::Consumed
                } else {
                    trace!("Expected second preamble byte, got {byte:#04X}. Restarting search.");
                    self.reset();
                    Event::Discarded(PREAMBLE.len())
                }
            }
            Stage::ReadLength => {
                if byte == self.size {
                    self.index = 0;
                    self.checksum = byte;
                    self.stage = Stage::ReadPayload;
                    Event::Consumed
                } else {
                    self.reset();
                    Event::Rejected(Rejection::LengthMismatch {
                        expected: self.size,
                        found: byte,
                    })
                }
            }
            Stage::ReadPayload => {
                self.buffer[self.index] = byte;
                self.checksum = self.checksum.wrapping_add(byte);
                self.index += 1;

                if self.index >= self.buffer.len() {
                    self.stage = Stage::ReadChecksum;
                }

                Event::Consumed
            }
            Stage::ReadChecksum => {
                let expected = !self.checksum;
                self.reset();

                if byte == expected {
                    trace!("Frame payload: {:#04X}", HexSlice::new(&self.buffer));
                    Event::Complete
                } else {
                    Event::Rejected(Rejection::ChecksumMismatch {
                        expected,
                        found: byte,
                    })
                }
            }
        }
    }
}
