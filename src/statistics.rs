//! Counters of received and discarded input.

use core::fmt::{Display, Formatter};

use crate::parser::{Event, Rejection};
use crate::protocol::{CHECKSUM_SIZE, HEADER_SIZE};

/// Counts what a codec did with the bytes it has received.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Statistics {
    frames: u64,
    length_mismatches: u64,
    checksum_mismatches: u64,
    discarded_bytes: u64,
}

impl Statistics {
    /// Returns the amount of successfully received frames.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Returns the amount of frames discarded due to an unexpected length byte.
    #[must_use]
    pub const fn length_mismatches(&self) -> u64 {
        self.length_mismatches
    }

    /// Returns the amount of frames discarded due to an invalid checksum.
    #[must_use]
    pub const fn checksum_mismatches(&self) -> u64 {
        self.checksum_mismatches
    }

    /// Returns the amount of received bytes that did not belong to a delivered frame.
    ///
    /// This covers noise, broken preambles and every byte of rejected frames.
    #[must_use]
    pub const fn discarded_bytes(&self) -> u64 {
        self.discarded_bytes
    }

    pub(crate) fn record(&mut self, event: Event, payload_size: usize) {
        match event {
            Event::Consumed => (),
            Event::Discarded(bytes) => self.discard(bytes),
            Event::Rejected(Rejection::LengthMismatch { .. }) => {
                self.length_mismatches += 1;
                self.discard(HEADER_SIZE);
            }
            Event::Rejected(Rejection::ChecksumMismatch { .. }) => {
                self.checksum_mismatches += 1;
                self.discard(HEADER_SIZE + payload_size + CHECKSUM_SIZE);
            }
            Event::Complete => self.frames += 1,
        }
    }

    fn discard(&mut self, bytes: usize) {
        self.discarded_bytes += bytes as u64;
    }
}

impl Display for Statistics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "frames: {}, length mismatches: {}, checksum mismatches: {}, discarded bytes: {}",
            self.frames, self.length_mismatches, self.checksum_mismatches, self.discarded_bytes
        )
    }
}
