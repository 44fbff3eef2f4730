//! Byte-array and external-layout codecs.

use alloc::vec::Vec;

use crate::digit::{Digit, DigitOrder, Layout, DIGIT_BYTES};
use crate::error::{Error, Result};
use crate::mem;
use crate::zz::Zz;

/// Byte order of the serialized value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum ByteOrder {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
}

impl core::str::FromStr for ByteOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "big" => Ok(ByteOrder::Big),
            "little" => Ok(ByteOrder::Little),
            _ => Err(Error::Value),
        }
    }
}

/// Serialize into exactly `len` bytes. Signed mode is two's complement of
/// width `len`. A value that does not fit the requested width reports
/// [`Error::Buffer`], and a negative value never fits an unsigned width.
pub fn to_bytes(a: &Zz, len: usize, order: ByteOrder, signed: bool) -> Result<Vec<u8>> {
    if !fits(a, len, signed) {
        return Err(Error::Buffer);
    }
    let mut out = mem::bytes_with_capacity(len)?;
    out.resize(len, 0);
    for (i, byte) in out.iter_mut().enumerate() {
        let digit = a.digits().get(i / DIGIT_BYTES).copied().unwrap_or(0);
        *byte = (digit >> (8 * (i % DIGIT_BYTES))) as u8;
    }
    if a.is_negative() {
        twos_complement(&mut out);
    }
    if order == ByteOrder::Big {
        out.reverse();
    }
    Ok(out)
}

/// Deserialize from a byte array; the inverse of [`to_bytes`].
pub fn from_bytes(buf: &[u8], order: ByteOrder, signed: bool) -> Result<Zz> {
    let mut le = mem::bytes_with_capacity(buf.len())?;
    le.extend_from_slice(buf);
    if order == ByteOrder::Big {
        le.reverse();
    }
    let negative = signed && le.last().is_some_and(|top| top & 0x80 != 0);
    if negative {
        twos_complement(&mut le);
    }
    let mut digits = mem::digits_zeroed(le.len().div_ceil(DIGIT_BYTES))?;
    for (i, &byte) in le.iter().enumerate() {
        digits[i / DIGIT_BYTES] |= Digit::from(byte) << (8 * (i % DIGIT_BYTES));
    }
    Ok(Zz::from_raw(negative, digits))
}

fn fits(a: &Zz, len: usize, signed: bool) -> bool {
    let bits = a.bit_length();
    let width = len as u64 * 8;
    if a.is_negative() {
        // Signed width `w` reaches down to -2^(w-1), whose magnitude is the
        // lone value with a full `w`-bit magnitude.
        signed && (bits < width || (bits == width && crate::bits::lsbpos(a, 0) == width - 1))
    } else if signed {
        bits < width
    } else {
        bits <= width
    }
}

/// `buf = -buf` over the fixed width of `buf`.
fn twos_complement(buf: &mut [u8]) {
    let mut carry = true;
    for b in buf.iter_mut() {
        *b = !*b;
        if carry {
            let (sum, overflow) = b.overflowing_add(1);
            *b = sum;
            carry = overflow;
        }
    }
}

/// Write the magnitude of `a` into `buf` using a foreign digit layout.
///
/// `buf` must hold exactly the external digits the magnitude needs; an empty
/// buffer for a nonzero value is a domain error, the wrong size reports
/// [`Error::Buffer`].
pub fn export(a: &Zz, layout: &Layout, buf: &mut [u8]) -> Result<()> {
    layout.check()?;
    if buf.is_empty() {
        return Err(Error::Value);
    }
    let count = external_digits(a, layout);
    let word = usize::from(layout.digit_size);
    if buf.len() != count * word {
        return Err(Error::Buffer);
    }
    for i in 0..count {
        let v = bits_at(a.digits(), i as u64 * u64::from(layout.bits_per_digit), layout.bits_per_digit);
        let slot = match layout.digits_order {
            DigitOrder::LeastFirst => i,
            DigitOrder::MostFirst => count - 1 - i,
        };
        write_word(&mut buf[slot * word..(slot + 1) * word], v, layout.digit_endianness);
    }
    Ok(())
}

/// Read a magnitude written by [`export`]; `negative` restores the sign the
/// layout does not carry.
pub fn import(layout: &Layout, buf: &[u8], negative: bool) -> Result<Zz> {
    layout.check()?;
    let word = usize::from(layout.digit_size);
    if buf.is_empty() || buf.len() % word != 0 {
        return Err(Error::Value);
    }
    let count = buf.len() / word;
    let bits = u64::from(layout.bits_per_digit);
    let mut digits = mem::digits_zeroed(((count as u64 * bits).div_ceil(64)) as usize)?;
    for i in 0..count {
        let slot = match layout.digits_order {
            DigitOrder::LeastFirst => i,
            DigitOrder::MostFirst => count - 1 - i,
        };
        let v = read_word(&buf[slot * word..(slot + 1) * word], layout.digit_endianness);
        if layout.bits_per_digit < 64 && v >> layout.bits_per_digit != 0 {
            return Err(Error::Value);
        }
        or_bits_at(&mut digits, i as u64 * bits, v);
    }
    Ok(Zz::from_raw(negative, digits))
}

fn external_digits(a: &Zz, layout: &Layout) -> usize {
    (a.bit_length().div_ceil(u64::from(layout.bits_per_digit)) as usize).max(1)
}

/// Bits `[start, start + width)` of a magnitude.
fn bits_at(v: &[Digit], start: u64, width: u8) -> u64 {
    let idx = (start / u64::from(Digit::BITS)) as usize;
    let off = (start % u64::from(Digit::BITS)) as u32;
    let mut out = v.get(idx).copied().unwrap_or(0) >> off;
    if off + u32::from(width) > Digit::BITS {
        if let Some(hi) = v.get(idx + 1) {
            out |= hi << (Digit::BITS - off);
        }
    }
    if width < 64 {
        out &= (1 << width) - 1;
    }
    out
}

fn or_bits_at(v: &mut [Digit], start: u64, value: u64) {
    let idx = (start / u64::from(Digit::BITS)) as usize;
    let off = (start % u64::from(Digit::BITS)) as u32;
    v[idx] |= value << off;
    if off > 0 {
        if let Some(hi) = v.get_mut(idx + 1) {
            *hi |= value >> (Digit::BITS - off);
        }
    }
}

fn write_word(buf: &mut [u8], v: u64, endian: ByteOrder) {
    let bytes = v.to_le_bytes();
    match endian {
        ByteOrder::Little => buf.copy_from_slice(&bytes[..buf.len()]),
        ByteOrder::Big => {
            for (dst, src) in buf.iter_mut().rev().zip(bytes.iter()) {
                *dst = *src;
            }
        }
    }
}

fn read_word(buf: &[u8], endian: ByteOrder) -> u64 {
    let mut out = 0u64;
    match endian {
        ByteOrder::Little => {
            for (i, &b) in buf.iter().enumerate() {
                out |= u64::from(b) << (8 * i);
            }
        }
        ByteOrder::Big => {
            for &b in buf {
                out = out << 8 | u64::from(b);
            }
        }
    }
    out
}
