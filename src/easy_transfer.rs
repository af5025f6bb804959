//! The frame codec.

use log::{debug, trace};

use crate::error::Error;
use crate::frame::{Frame, RawFrame};
use crate::parser::{Event, Parser, Rejection, Stage};
use crate::protocol::MAX_PAYLOAD_SIZE;
use crate::record::Record;
use crate::statistics::Statistics;
use crate::transport::Transport;
use crate::utils::HexSlice;

/// A stack-allocated buffer that can hold a payload of the maximum size.
type Payload = heapless::Vec<u8, MAX_PAYLOAD_SIZE>;

/// The outcome of a single [`EasyTransfer::receive_detailed`] call.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Reception {
    /// No complete frame is available yet.
    Pending,
    /// No valid frame was received, but at least one frame was discarded.
    ///
    /// Carries the reason of the last discarded frame.
    Rejected(Rejection),
    /// A valid frame was received and copied into the payload buffer.
    Complete,
}

impl Reception {
    /// Returns `true` if a frame was received.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Sends and receives fixed-size payloads over a [`Transport`].
///
/// Both peers must be configured with the same payload size.
///
/// # Usage
///
/// ```
/// use easytransfer::{EasyTransfer, MemoryTransport};
///
/// let mut sender = EasyTransfer::new(MemoryTransport::new(), 2).unwrap();
/// sender.send(&[0x12, 0x34]).unwrap();
///
/// let wire: MemoryTransport = sender.into_inner().take_written().into_iter().collect();
/// let mut receiver = EasyTransfer::new(wire, 2).unwrap();
/// let mut payload = [0; 2];
/// assert!(receiver.receive(&mut payload).unwrap());
/// assert_eq!(payload, [0x12, 0x34]);
/// ```
#[derive(Debug)]
pub struct EasyTransfer<T> {
    transport: T,
    parser: Parser,
    statistics: Statistics,
}

impl<T> EasyTransfer<T> {
    /// Creates a codec for payloads of `payload_size` bytes on the given transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPayloadSize`] if `payload_size` is zero or greater than 255.
    pub fn new(transport: T, payload_size: usize) -> Result<Self, Error> {
        Ok(Self {
            transport,
            parser: Parser::new(payload_size)?,
            statistics: Statistics::default(),
        })
    }

    /// Creates a codec sized for the record type `R`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPayloadSize`] if the record's size is zero or greater than 255.
    pub fn for_record<R>(transport: T) -> Result<Self, Error>
    where
        R: Record,
    {
        Self::new(transport, R::SIZE)
    }

    /// Returns the configured payload size.
    #[must_use]
    pub const fn payload_size(&self) -> usize {
        self.parser.size()
    }

    /// Returns the current stage of the receive state machine.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.parser.stage()
    }

    /// Discards a partially received frame and restarts the preamble search.
    pub fn reset(&mut self) {
        self.parser.reset();
    }

    /// Returns the receive statistics.
    #[must_use]
    pub const fn statistics(&self) -> Statistics {
        self.statistics
    }

    /// Resets the receive statistics.
    pub fn reset_statistics(&mut self) {
        self.statistics = Statistics::default();
    }

    /// Returns a reference to the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a mutable reference to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Returns the transport.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.transport
    }

    fn check_size(&self, found: usize) -> Result<(), Error> {
        if found == self.payload_size() {
            Ok(())
        } else {
            Err(Error::PayloadSizeMismatch {
                expected: self.payload_size(),
                found,
            })
        }
    }
}

impl<T> EasyTransfer<T>
where
    T: Transport,
{
    /// Sends `payload` as a single frame.
    ///
    /// Only writes to the transport. Call [`flush`](Self::flush) to wait for the bytes to leave.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadSizeMismatch`] if the payload does not have the configured size
    /// or [`Error::Io`] if the transport fails.
    pub fn send(&mut self, payload: &[u8]) -> Result<(), Error> {
        self.check_size(payload.len())?;
        let frame = Frame::with_length(self.parser.length(), payload);
        debug!("Sending frame: {frame}");
        trace!("{frame:#04X}");
        let mut buffer = RawFrame::new();
        frame.buffer(&mut buffer)?;
        trace!("Writing bytes: {:#04X}", HexSlice::new(&buffer));

        for byte in buffer {
            self.transport.write_byte(byte)?;
        }

        Ok(())
    }

    /// Flushes the transport.
    ///
    /// On a serial port this blocks until all written bytes have been transmitted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the transport fails.
    pub fn flush(&mut self) -> Result<(), Error> {
        self.transport.flush().map_err(Error::from)
    }

    /// Consumes the currently available bytes until a valid frame has been received.
    ///
    /// On success the frame's payload is copied into `payload` and `true` is returned.
    /// Bytes following a completed frame stay on the transport for the next call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadSizeMismatch`] if `payload` does not have the configured size
    /// or [`Error::Io`] if the transport fails.
    pub fn receive(&mut self, payload: &mut [u8]) -> Result<bool, Error> {
        self.receive_detailed(payload).map(Reception::is_complete)
    }

    /// Like [`receive`](Self::receive), but reports why no frame was received.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadSizeMismatch`] if `payload` does not have the configured size
    /// or [`Error::Io`] if the transport fails.
    pub fn receive_detailed(&mut self, payload: &mut [u8]) -> Result<Reception, Error> {
        self.check_size(payload.len())?;
        let mut rejection = None;

        loop {
            let available = self.transport.available()?;

            if available == 0 {
                return Ok(rejection.map_or(Reception::Pending, Reception::Rejected));
            }

            for _ in 0..available {
                let event = self.parser.feed(self.transport.read_byte()?);
                self.statistics.record(event, self.parser.size());

                match event {
                    Event::Complete => {
                        payload.copy_from_slice(self.parser.payload());
                        debug!("Received frame.");
                        return Ok(Reception::Complete);
                    }
                    Event::Rejected(reason) => {
                        debug!("Discarding frame: {reason}");
                        rejection = Some(reason);
                    }
                    Event::Consumed | Event::Discarded(_) => (),
                }
            }
        }
    }

    /// Sends a record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadSizeMismatch`] if the record size does not match the configured
    /// payload size or [`Error::Io`] if the transport fails.
    pub fn send_record<R>(&mut self, record: &R) -> Result<(), Error>
    where
        R: Record,
    {
        let mut buffer = self.record_buffer::<R>()?;
        record.to_bytes(&mut buffer);
        self.send(&buffer)
    }

    /// Receives a record.
    ///
    /// Returns `Ok(None)` if no valid frame is available yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadSizeMismatch`] if the record size does not match the configured
    /// payload size or [`Error::Io`] if the transport fails.
    pub fn receive_record<R>(&mut self) -> Result<Option<R>, Error>
    where
        R: Record,
    {
        let mut buffer = self.record_buffer::<R>()?;

        if self.receive(&mut buffer)? {
            Ok(Some(R::from_bytes(&buffer)))
        } else {
            Ok(None)
        }
    }

    fn record_buffer<R>(&self) -> Result<Payload, Error>
    where
        R: Record,
    {
        self.check_size(R::SIZE)?;
        let mut buffer = Payload::new();
        buffer
            .resize(R::SIZE, 0)
            .map_err(|()| Error::InvalidPayloadSize(R::SIZE))?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::{EasyTransfer, Reception};
    use crate::error::Error;
    use crate::parser::{Rejection, Stage};
    use crate::protocol::checksum;
    use crate::transport::{MemoryTransport, Transport};

    fn encode(payload: &[u8]) -> Vec<u8> {
        let mut codec = EasyTransfer::new(MemoryTransport::new(), payload.len())
            .expect("Payload size should be valid.");
        codec.send(payload).expect("Sending should succeed.");
        codec.into_inner().take_written()
    }

    fn receiver(size: usize, bytes: &[u8]) -> EasyTransfer<MemoryTransport> {
        EasyTransfer::new(bytes.iter().copied().collect(), size)
            .expect("Payload size should be valid.")
    }

    #[test]
    fn test_invalid_payload_size() {
        assert!(matches!(
            EasyTransfer::new(MemoryTransport::new(), 0),
            Err(Error::InvalidPayloadSize(0))
        ));
        assert!(matches!(
            EasyTransfer::new(MemoryTransport::new(), 256),
            Err(Error::InvalidPayloadSize(256))
        ));
    }

    #[test]
    fn test_send_wire_format() {
        assert_eq!(
            encode(&[0x01, 0x02, 0x03]),
            [0x06, 0x85, 0x03, 0x01, 0x02, 0x03, 0xF6]
        );
    }

    #[derive(Debug, Default)]
    struct Recorder {
        writes: usize,
        flushes: usize,
    }

    impl Transport for Recorder {
        fn write_byte(&mut self, _: u8) -> std::io::Result<()> {
            self.writes += 1;
            Ok(())
        }

        fn available(&mut self) -> std::io::Result<usize> {
            Ok(0)
        }

        fn read_byte(&mut self) -> std::io::Result<u8> {
            Err(std::io::ErrorKind::UnexpectedEof.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_send_does_not_flush() {
        let mut codec =
            EasyTransfer::new(Recorder::default(), 255).expect("Payload size should be valid.");
        codec.send(&[0x42; 255]).expect("Sending should succeed.");
        assert_eq!(codec.transport().writes, 259);
        assert_eq!(codec.transport().flushes, 0);
        codec.flush().expect("Flushing should succeed.");
        assert_eq!(codec.transport().flushes, 1);
    }

    #[test]
    fn test_broken_preamble_is_counted() {
        let mut codec = receiver(1, &[0x06, 0x00]);
        let mut payload = [0; 1];
        assert!(!codec.receive(&mut payload).expect("Receiving should succeed."));
        assert_eq!(codec.statistics().discarded_bytes(), 2);

        codec.transport_mut().extend([0x06, 0x85, 0x07]);
        assert!(!codec.receive(&mut payload).expect("Receiving should succeed."));
        assert_eq!(codec.statistics().discarded_bytes(), 5);
        assert_eq!(codec.statistics().length_mismatches(), 1);
    }

    #[test]
    fn test_send_size_mismatch() {
        let mut codec =
            EasyTransfer::new(MemoryTransport::new(), 4).expect("Payload size should be valid.");
        assert!(matches!(
            codec.send(&[0; 3]),
            Err(Error::PayloadSizeMismatch {
                expected: 4,
                found: 3
            })
        ));
        assert!(codec.transport().written().is_empty());
    }

    #[test]
    fn test_round_trip_all_sizes() {
        for size in 1..=255_usize {
            let original: Vec<u8> = (0..size).map(|index| (index * 7 + size) as u8).collect();
            let mut codec = receiver(size, &encode(&original));
            let mut payload = vec![0; size];
            assert!(codec.receive(&mut payload).expect("Receiving should succeed."));
            assert_eq!(payload, original);
        }
    }

    #[test]
    fn test_single_bit_flips_are_rejected() {
        let wire = encode(&[0x10, 0x20, 0x30, 0x40]);

        for index in 2..wire.len() - 1 {
            for bit in 0..8 {
                let mut corrupted = wire.clone();
                corrupted[index] ^= 1 << bit;
                let mut codec = receiver(4, &corrupted);
                let mut payload = [0; 4];
                assert!(!codec.receive(&mut payload).expect("Receiving should succeed."));
                assert_eq!(payload, [0; 4]);
            }
        }
    }

    #[test]
    fn test_resynchronization() {
        let mut stream = vec![0x00, 0x06, 0x13, 0x85, 0x85, 0x06, 0x01, 0xFF];
        stream.extend(encode(&[0xAA, 0xBB]));
        stream.extend([0x06, 0x00, 0x85, 0x06]);
        let mut codec = receiver(2, &stream);
        let mut payload = [0; 2];
        assert!(codec.receive(&mut payload).expect("Receiving should succeed."));
        assert_eq!(payload, [0xAA, 0xBB]);
        assert!(!codec.receive(&mut payload).expect("Receiving should succeed."));
        assert_eq!(codec.statistics().frames(), 1);
    }

    #[test]
    fn test_partial_delivery() {
        let wire = encode(&[0x01, 0x02, 0x03]);
        let mut codec =
            EasyTransfer::new(MemoryTransport::new(), 3).expect("Payload size should be valid.");
        let mut payload = [0; 3];

        for (index, byte) in wire.iter().enumerate() {
            codec.transport_mut().push(*byte);
            let received = codec.receive(&mut payload).expect("Receiving should succeed.");
            assert_eq!(received, index == wire.len() - 1);
        }

        assert_eq!(payload, [0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_length_mismatch_with_valid_checksum() {
        let payload = [0x01, 0x02];
        let mut wire = vec![0x06, 0x85, 0x02];
        wire.extend(payload);
        wire.push(checksum(0x02, &payload));
        let mut codec = receiver(3, &wire);
        let mut buffer = [0; 3];
        assert_eq!(
            codec
                .receive_detailed(&mut buffer)
                .expect("Receiving should succeed."),
            Reception::Rejected(Rejection::LengthMismatch {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(codec.statistics().length_mismatches(), 1);
    }

    #[test]
    fn test_no_double_delivery() {
        let mut wire = encode(&[0x01]);
        wire.extend(encode(&[0x02]));
        let mut codec = receiver(1, &wire);
        let mut payload = [0; 1];
        assert!(codec.receive(&mut payload).expect("Receiving should succeed."));
        assert_eq!(payload, [0x01]);
        assert_eq!(codec.transport_mut().available().ok(), Some(5));
        assert!(codec.receive(&mut payload).expect("Receiving should succeed."));
        assert_eq!(payload, [0x02]);
        assert!(!codec.receive(&mut payload).expect("Receiving should succeed."));
    }

    #[test]
    fn test_checksum_mismatch_reported() {
        let mut wire = encode(&[0x42]);
        *wire.last_mut().expect("Frame should not be empty.") ^= 0xFF;
        let mut codec = receiver(1, &wire);
        let mut payload = [0; 1];
        assert!(matches!(
            codec.receive_detailed(&mut payload),
            Ok(Reception::Rejected(Rejection::ChecksumMismatch { .. }))
        ));
        assert_eq!(codec.statistics().checksum_mismatches(), 1);
        codec.reset_statistics();
        assert_eq!(codec.statistics().checksum_mismatches(), 0);
    }

    #[test]
    fn test_pending_and_reset() {
        let wire = encode(&[0x01, 0x02]);
        let mut codec = receiver(2, &wire[..4]);
        let mut payload = [0; 2];
        assert_eq!(
            codec
                .receive_detailed(&mut payload)
                .expect("Receiving should succeed."),
            Reception::Pending
        );
        assert_eq!(codec.stage(), Stage::ReadPayload);
        codec.reset();
        assert_eq!(codec.stage(), Stage::SeekPreamble1);
    }

    #[test]
    fn test_receive_size_mismatch() {
        let mut codec = receiver(2, &encode(&[0x01, 0x02]));
        let mut payload = [0; 3];
        assert!(codec.receive(&mut payload).is_err());
        assert_eq!(codec.stage(), Stage::SeekPreamble1);
        assert_eq!(codec.transport_mut().available().ok(), Some(6));
    }

    #[test]
    fn test_records() {
        let mut sender = EasyTransfer::for_record::<u32>(MemoryTransport::new())
            .expect("Record size should be valid.");
        sender
            .send_record(&0xDEAD_BEEF_u32)
            .expect("Sending should succeed.");
        let mut transport = sender.into_inner();
        transport.loop_back();
        let mut receiver = EasyTransfer::for_record::<u32>(transport)
            .expect("Record size should be valid.");
        assert_eq!(
            receiver
                .receive_record::<u32>()
                .expect("Receiving should succeed."),
            Some(0xDEAD_BEEF)
        );
        assert_eq!(
            receiver
                .receive_record::<u32>()
                .expect("Receiving should succeed."),
            None
        );
        assert!(receiver.receive_record::<u16>().is_err());
    }
}
