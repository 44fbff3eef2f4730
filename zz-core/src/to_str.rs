//! String encoding.
//!
//! Power-of-two bases are read straight off the bits. Other bases peel
//! digit-sized chunks by division for small values and, above a size
//! threshold, split the magnitude by squared powers of the base so the work
//! stays near linear.

use alloc::string::String;
use alloc::vec::Vec;

use crate::buffer;
use crate::digit::Digit;
use crate::div;
use crate::error::{Error, Result};
use crate::mem;
use crate::mul;
use crate::zz::Zz;

const DIGIT_CHARS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Magnitude size, in internal digits, above which encoding splits.
const SPLIT_THRESHOLD: usize = 32;

/// Encode `a` in `base` (`2..=36`), lowercase, with an optional radix
/// prefix for the bases that have one.
pub fn to_str(a: &Zz, base: u32, prefix: bool) -> Result<String> {
    if !(2..=36).contains(&base) {
        return Err(Error::Value);
    }
    let approx = approx_chars(a, base);
    let mut out = mem::string_with_capacity(approx + 3)?;
    if a.is_negative() {
        out.push('-');
    }
    if prefix {
        match base {
            2 => out.push_str("0b"),
            8 => out.push_str("0o"),
            16 => out.push_str("0x"),
            _ => {}
        }
    }
    if a.is_zero() {
        out.push('0');
        return Ok(out);
    }

    let mut values = mem::bytes_with_capacity(approx + 1)?;
    if base.is_power_of_two() {
        push_pow2(&mut values, a.digits(), base.ilog2());
    } else if a.size() <= SPLIT_THRESHOLD {
        push_basecase(&mut values, buffer::try_to_vec(a.digits())?, base, 0)?;
    } else {
        let powers = split_powers(a, base)?;
        push_split(
            &mut values,
            buffer::try_to_vec(a.digits())?,
            base,
            &powers,
            powers.len(),
            0,
        )?;
    }
    out.extend(values.iter().map(|&v| char::from(DIGIT_CHARS[v as usize])));
    Ok(out)
}

fn approx_chars(a: &Zz, base: u32) -> usize {
    // An over-estimate: bits divided by the floor log keeps every base
    // reservation large enough.
    (a.bit_length() / u64::from(base.ilog2()) + 2) as usize
}

/// Digits of a power-of-two base, written most significant first.
fn push_pow2(out: &mut Vec<u8>, mag: &[Digit], bits_per_char: u32) {
    let total = buffer::bit_length_mag(mag).div_ceil(u64::from(bits_per_char));
    for pos in (0..total).rev() {
        let start = pos * u64::from(bits_per_char);
        let idx = (start / u64::from(Digit::BITS)) as usize;
        let off = (start % u64::from(Digit::BITS)) as u32;
        let mut v = mag[idx] >> off;
        if off + bits_per_char > Digit::BITS {
            if let Some(hi) = mag.get(idx + 1) {
                v |= hi << (Digit::BITS - off);
            }
        }
        out.push((v & ((1 << bits_per_char) - 1)) as u8);
    }
}

/// Repeated division by the largest base power in a word; `width > 0`
/// left-pads with zeros to a fixed digit count.
fn push_basecase(out: &mut Vec<u8>, mut mag: Vec<Digit>, base: u32, width: u64) -> Result<()> {
    let (big_base, chunk_len) = chunk(base);
    let mut little = mem::bytes_with_capacity(mag.len() * (chunk_len as usize + 1) * 2)?;
    while !mag.is_empty() {
        let (quo, mut rem) = buffer::divrem_small(&mag, big_base)?;
        mag = quo;
        let take = if mag.is_empty() { u32::MAX } else { chunk_len };
        let mut produced = 0;
        while (rem > 0 || produced == 0) && produced < take {
            little.push((rem % u64::from(base)) as u8);
            rem /= u64::from(base);
            produced += 1;
        }
        if !mag.is_empty() {
            while produced < chunk_len {
                little.push(0);
                produced += 1;
            }
        }
    }
    for _ in little.len() as u64..width {
        out.push(0);
    }
    out.extend(little.iter().rev());
    Ok(())
}

/// Squared powers of `base` up to roughly half the encoded value, each with
/// the count of base digits it spans.
fn split_powers(a: &Zz, base: u32) -> Result<Vec<(Zz, u64)>> {
    let (big_base, chunk_len) = chunk(base);
    let mut powers = Vec::new();
    let mut value = Zz::from_u64(big_base)?;
    let mut span = u64::from(chunk_len);
    while value.size() * 2 <= a.size() {
        powers.try_reserve(1)?;
        powers.push((value.try_clone()?, span));
        value = mul::sqr(&value)?;
        span *= 2;
    }
    Ok(powers)
}

fn push_split(
    out: &mut Vec<u8>,
    mag: Vec<Digit>,
    base: u32,
    powers: &[(Zz, u64)],
    level: usize,
    width: u64,
) -> Result<()> {
    if level == 0 || mag.len() <= SPLIT_THRESHOLD {
        return push_basecase(out, mag, base, width);
    }
    let (power, span) = &powers[level - 1];
    if buffer::cmp_mag(&mag, power.digits()) == core::cmp::Ordering::Less {
        return push_split(out, mag, base, powers, level - 1, width);
    }
    let (hi, lo) = div::divrem_mag(&mag, power.digits())?;
    push_split(out, hi, base, powers, level - 1, width.saturating_sub(*span))?;
    push_split(out, lo, base, powers, level - 1, *span)
}

/// Largest power of `base` fitting one digit, with its exponent.
fn chunk(base: u32) -> (u64, u32) {
    let mut power = u64::from(base);
    let mut len = 1;
    while let Some(next) = power.checked_mul(u64::from(base)) {
        power = next;
        len += 1;
    }
    (power, len)
}
