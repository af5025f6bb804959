//! Fixed-size records exchanged as frame payloads.

/// A record with a fixed size in bytes, agreed upon by both peers.
///
/// Both peers are assumed to share the same byte order, so integers are
/// represented in native byte order.
pub trait Record: Sized {
    /// The size of the record's byte representation.
    const SIZE: usize;

    /// Writes the record into `buffer`, which is exactly [`Self::SIZE`] bytes long.
    fn to_bytes(&self, buffer: &mut [u8]);

    /// Reads a record from `bytes`, which are exactly [`Self::SIZE`] bytes long.
    fn from_bytes(bytes: &[u8]) -> Self;
}

impl<const N: usize> Record for [u8; N] {
    const SIZE: usize = N;

    fn to_bytes(&self, buffer: &mut [u8]) {
        buffer.copy_from_slice(self);
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        let mut record = [0; N];
        record.copy_from_slice(bytes);
        record
    }
}

macro_rules! impl_record_for_int {
    ($($int:ty),+ $(,)?) => {
        $(
            impl Record for $int {
                const SIZE: usize = core::mem::size_of::<Self>();

                fn to_bytes(&self, buffer: &mut [u8]) {
                    buffer.copy_from_slice(&self.to_ne_bytes());
                }

                fn from_bytes(bytes: &[u8]) -> Self {
                    let mut raw = [0; core::mem::size_of::<Self>()];
                    raw.copy_from_slice(bytes);
                    Self::from_ne_bytes(raw)
                }
            }
        )+
    };
}

impl_record_for_int!(u8, i8, u16, i16, u32, i32, u64, i64, u128, i128);
