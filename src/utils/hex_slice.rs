use std::fmt::{Formatter, LowerHex, Result, UpperHex};

/// Formats a byte slice as a list of hexadecimal numbers.
///
/// The formatter's flags, e.g. `{:#04X}`, are applied to every byte.
#[derive(Clone, Copy, Debug)]
pub struct HexSlice<'a>(&'a [u8]);

impl<'a> HexSlice<'a> {
    /// Wraps the given bytes.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }

    fn write_with(
        &self,
        f: &mut Formatter<'_>,
        fmt_byte: fn(&u8, &mut Formatter<'_>) -> Result,
    ) -> Result {
        f.write_str("[")?;
        let mut bytes = self.0.iter();

        if let Some(first) = bytes.next() {
            fmt_byte(first, f)?;

            for byte in bytes {
                f.write_str(", ")?;
                fmt_byte(byte, f)?;
            }
        }

        f.write_str("]")
    }
}

impl<'a> From<&'a [u8]> for HexSlice<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl UpperHex for HexSlice<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.write_with(f, UpperHex::fmt)
    }
}

impl LowerHex for HexSlice<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.write_with(f, LowerHex::fmt)
    }
}
