//! `EasyTransfer` serial link framing
//!
//! This library implements the `EasyTransfer` protocol, which exchanges fixed-size records
//! between two directly wired devices over a byte-oriented link such as a UART.
//!
//! Every record is sent as a frame:
//!
//! ```text
//! [0x06] [0x85] [LEN] [PAYLOAD...] [CHECKSUM]
//! ```
//!
//! where the checksum is the inverted 8-bit sum of the length byte and the payload.
//! There are no acknowledgements or retransmissions: corrupted frames are silently dropped.

pub use baud_rate::BaudRate;
pub use easy_transfer::{EasyTransfer, Reception};
pub use error::Error;
pub use frame::{Frame, RawFrame};
pub use parser::{Event, Parser, Rejection, Stage};
pub use protocol::{checksum, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, PREAMBLE};
pub use record::Record;
pub use serial_port::{open, SerialPortImpl};
pub use statistics::Statistics;
pub use transport::{MemoryTransport, Transport};
pub use utils::HexSlice;

mod baud_rate;
mod easy_transfer;
mod error;
mod frame;
mod parser;
mod protocol;
mod record;
mod serial_port;
mod statistics;
mod transport;
mod utils;
