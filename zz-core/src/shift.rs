//! Shifts by a bit count.

use crate::buffer;
use crate::digit::{Digit, DIGIT_BITS, MAX_BITS};
use crate::error::{Error, Result};
use crate::mem;
use crate::zz::Zz;

/// `a * 2^count`. A negative or unrepresentably large `count` is a domain
/// error.
pub fn mul_2exp(a: &Zz, count: i64) -> Result<Zz> {
    if count < 0 {
        return Err(Error::Value);
    }
    if a.is_zero() {
        return Ok(Zz::zero());
    }
    let count = count as u64;
    if a.bit_length().checked_add(count).map_or(true, |bits| bits > MAX_BITS) {
        return Err(Error::Value);
    }
    let whole = (count / u64::from(DIGIT_BITS)) as usize;
    let bits = (count % u64::from(DIGIT_BITS)) as u32;
    let mut out = mem::digits_zeroed(a.size() + whole + usize::from(bits > 0))?;
    if bits == 0 {
        out[whole..whole + a.size()].copy_from_slice(&a.digits);
    } else {
        let mut carry = 0;
        for (i, &d) in a.digits.iter().enumerate() {
            out[whole + i] = (d << bits) | carry;
            carry = d >> (DIGIT_BITS - bits);
        }
        out[whole + a.size()] = carry;
    }
    Ok(Zz::from_raw(a.negative, out))
}

/// `⌊a / 2^count⌋`: an arithmetic shift, so bits dropped from a negative
/// value round it toward negative infinity. A negative `count` is a domain
/// error.
pub fn quo_2exp(a: &Zz, count: i64) -> Result<Zz> {
    if count < 0 {
        return Err(Error::Value);
    }
    if a.is_zero() {
        return Ok(Zz::zero());
    }
    let whole = (count as u64 / u64::from(DIGIT_BITS)) as usize;
    let bits = (count as u64 % u64::from(DIGIT_BITS)) as u32;
    if whole >= a.size() {
        return if a.negative {
            Zz::from_i64(-1)
        } else {
            Ok(Zz::zero())
        };
    }

    let kept = &a.digits[whole..];
    let mut out = mem::digits_with_capacity(kept.len())?;
    if bits == 0 {
        out.extend_from_slice(kept);
    } else {
        for i in 0..kept.len() {
            let hi = kept.get(i + 1).map_or(0, |d| d << (DIGIT_BITS - bits));
            out.push((kept[i] >> bits) | hi);
        }
    }
    buffer::normalize(&mut out);

    if a.negative && dropped_nonzero(&a.digits, whole, bits) {
        buffer::add_small_assign(&mut out, 1)?;
    }
    Ok(Zz::from_raw(a.negative, out))
}

fn dropped_nonzero(digits: &[Digit], whole: usize, bits: u32) -> bool {
    digits[..whole].iter().any(|&d| d != 0)
        || (bits > 0 && digits[whole] << (DIGIT_BITS - bits) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zz(v: i64) -> Zz {
        Zz::from_i64(v).unwrap()
    }

    #[test]
    fn shifts_agree_with_host_semantics() {
        for a in [-340_282_366i64, -129, -3, -1, 0, 1, 3, 129, 1 << 62] {
            for k in [0i64, 1, 5, 63, 64, 65, 130] {
                let left = mul_2exp(&zz(a), k).unwrap();
                let right = quo_2exp(&left, k).unwrap();
                assert_eq!(right, zz(a), "({a} << {k}) >> {k}");
                if k < 63 {
                    if let Some(v) = a.checked_shl(k as u32).filter(|v| v >> k == a) {
                        assert_eq!(left, zz(v), "{a} << {k}");
                    }
                }
                assert_eq!(quo_2exp(&zz(a), k).unwrap(), zz(a >> k.min(63)), "{a} >> {k}");
            }
        }
    }

    #[test]
    fn negative_values_floor_toward_minus_infinity() {
        assert_eq!(quo_2exp(&zz(-1), 1).unwrap(), zz(-1));
        assert_eq!(quo_2exp(&zz(-5), 1).unwrap(), zz(-3));
        assert_eq!(quo_2exp(&zz(-4), 2).unwrap(), zz(-1));
        let wide = mul_2exp(&zz(-1), 128).unwrap();
        assert_eq!(quo_2exp(&wide, 200).unwrap(), zz(-1));
    }

    #[test]
    fn negative_counts_are_domain_errors() {
        assert_eq!(mul_2exp(&zz(1), -1), Err(Error::Value));
        assert_eq!(quo_2exp(&zz(1), -1), Err(Error::Value));
    }

    #[test]
    fn oversized_left_shift_is_a_domain_error() {
        assert_eq!(mul_2exp(&zz(1), i64::MAX), Err(Error::Value));
    }
}
