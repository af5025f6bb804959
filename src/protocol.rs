//! Wire-level constants and the frame checksum.

/// The two bytes marking the start of a frame.
pub const PREAMBLE: [u8; 2] = [0x06, 0x85];

/// The maximum payload size representable by the length byte.
pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize;

/// Preamble and length byte.
pub const HEADER_SIZE: usize = PREAMBLE.len() + 1;

/// Size of the trailing checksum byte.
pub const CHECKSUM_SIZE: usize = 1;

/// The size of the largest possible wire frame.
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD_SIZE + CHECKSUM_SIZE;

/// Calculates the checksum over the length byte and the payload.
///
/// The checksum is the bitwise inverse of the 8-bit wrapping sum of all bytes.
#[must_use]
pub fn checksum(length: u8, payload: &[u8]) -> u8 {
    !payload.iter().fold(length, |sum, byte| sum.wrapping_add(*byte))
}
