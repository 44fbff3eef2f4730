//! Digit ("limb") layout of the engine.

use crate::error::{Error, Result};

/// One unsigned machine word of a digit buffer, least significant first.
pub type Digit = u64;

/// Width of a [`Digit`] in bits.
pub const DIGIT_BITS: u32 = Digit::BITS;

/// Memory size of a [`Digit`].
pub const DIGIT_BYTES: usize = core::mem::size_of::<Digit>();

/// Maximum number of digits a single value may occupy.
///
/// Sizes are kept representable in 32 bits so a digit count can cross any
/// ABI unharmed.
pub const MAX_DIGITS: usize = u32::MAX as usize;

/// Maximum supported bit count of a value.
pub const MAX_BITS: u64 = MAX_DIGITS as u64 * DIGIT_BITS as u64;

/// Compile-time constants of the built library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutInfo {
    /// Bits per internal digit.
    pub bits_per_digit: u32,
    /// Bytes per internal digit.
    pub digit_size: usize,
    /// Maximum digit count of a value.
    pub max_digits: usize,
    /// Maximum bit count of a value.
    pub max_bits: u64,
}

/// Query the invariants of the built library.
pub const fn layout_info() -> LayoutInfo {
    LayoutInfo {
        bits_per_digit: DIGIT_BITS,
        digit_size: DIGIT_BYTES,
        max_digits: MAX_DIGITS,
        max_bits: MAX_BITS,
    }
}

/// Order of external digits within an export buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum DigitOrder {
    /// Least significant digit first.
    LeastFirst,
    /// Most significant digit first.
    MostFirst,
}

/// External digit-format descriptor used by the export/import codecs.
///
/// Describes the integer layout of a foreign library: how many value bits
/// each external digit carries, how wide its storage word is, in which order
/// digits follow each other and how the bytes of one word are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Significant bits per external digit, `1..=bits of the storage word`.
    pub bits_per_digit: u8,
    /// Bytes per external storage word, one of 1, 2, 4 or 8.
    pub digit_size: u8,
    /// Order of digits in the buffer.
    pub digits_order: DigitOrder,
    /// Byte order within one storage word.
    pub digit_endianness: crate::bytes::ByteOrder,
}

impl Layout {
    /// Validate the descriptor against the supported word sizes.
    pub fn check(&self) -> Result<()> {
        if !matches!(self.digit_size, 1 | 2 | 4 | 8) {
            return Err(Error::Value);
        }
        let word_bits = u32::from(self.digit_size) * 8;
        if self.bits_per_digit == 0 || u32::from(self.bits_per_digit) > word_bits {
            return Err(Error::Value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytes::ByteOrder;

    #[test]
    fn layout_info_reports_digit_width() {
        let info = layout_info();
        assert_eq!(info.bits_per_digit, 64);
        assert_eq!(info.digit_size, 8);
        assert_eq!(info.max_bits, info.max_digits as u64 * 64);
    }

    #[test]
    fn layout_check_rejects_odd_word_sizes() {
        let mut layout = Layout {
            bits_per_digit: 30,
            digit_size: 4,
            digits_order: DigitOrder::LeastFirst,
            digit_endianness: ByteOrder::Little,
        };
        assert!(layout.check().is_ok());
        layout.digit_size = 3;
        assert_eq!(layout.check(), Err(Error::Value));
        layout.digit_size = 4;
        layout.bits_per_digit = 33;
        assert_eq!(layout.check(), Err(Error::Value));
        layout.bits_per_digit = 0;
        assert_eq!(layout.check(), Err(Error::Value));
    }
}
