//! Coercions between the scalar and machine floats, and true division.
//!
//! Conversions to float are correctly rounded with ties to even, riding on
//! the kernels' nearest-rounding division; conversions from float truncate
//! toward zero the way the host's constructor does.

use crate::error::{Error, Result};
use crate::int::Int;

const MANT_BITS: u64 = 53;

impl Int {
    /// Truncate a finite float toward zero.
    pub fn try_from_f64(f: f64) -> Result<Int> {
        if !f.is_finite() {
            return Err(Error::Value("cannot convert a non-finite float"));
        }
        let t = f.trunc();
        if t == 0.0 {
            return Ok(Int::ZERO);
        }
        if t.abs() < 9_223_372_036_854_775_808.0 {
            // Integral and below 2^63: the machine cast is exact.
            return Ok(Int::from(t as i64));
        }
        let bits = t.to_bits();
        let exponent = ((bits >> 52) & 0x7ff) as i64 - 1075;
        let mantissa = (bits & ((1u64 << 52) - 1)) | (1u64 << 52);
        debug_assert!(exponent > 0, "integral doubles this large have no fraction");
        let magnitude = Int::from(mantissa).checked_shl(exponent)?;
        Ok(if t < 0.0 { -magnitude } else { magnitude })
    }

    /// The nearest float, ties to even; [`Error::Overflow`] past the float
    /// range.
    pub fn to_f64(&self) -> Result<f64> {
        let bits = self.bit_length();
        if bits <= MANT_BITS {
            let v = self.as_zz().digits().first().copied().unwrap_or(0) as f64;
            return Ok(if self.is_negative() { -v } else { v });
        }
        if bits > 1024 {
            return Err(Error::Overflow);
        }

        // Keep 54 bits: 53 of mantissa and one rounding bit, with everything
        // below folded into a sticky bit.
        let shift = bits - (MANT_BITS + 1);
        let top = self
            .abs()
            .checked_shr(shift as i64)?
            .as_zz()
            .to_u64()
            .expect("54 bits fit a digit");
        let sticky = self.lowest_set_bit().expect("nonzero") < shift;
        let (mant, exp) = round_to_mantissa(top, 1, sticky, shift as i64);
        finite(mant, exp, self.is_negative())
    }

    /// `self / rhs` as the nearest float; the host's true division.
    pub fn div_to_f64(&self, rhs: &Int) -> Result<f64> {
        if rhs.is_zero() {
            return Err(Error::ZeroDivision);
        }
        if self.is_zero() {
            return Ok(0.0);
        }
        let negative = self.is_negative() != rhs.is_negative();

        // Scale so the quotient carries 55 or 56 bits, then round with the
        // remainder as the sticky bit.
        let k = MANT_BITS as i64 + 2 + rhs.bit_length() as i64 - self.bit_length() as i64;
        let mut num = self.abs();
        let mut den = rhs.abs();
        if k >= 0 {
            num = num.checked_shl(k)?;
        } else {
            den = den.checked_shl(-k)?;
        }
        let (q, r) = num.checked_divmod(&den)?;
        let qv = q.as_zz().to_u64().ok_or(Error::Overflow)?;
        let drop = q.bit_length() - MANT_BITS;
        let (mant, exp) = round_to_mantissa(qv, drop, !r.is_zero(), -k);
        finite(mant, exp, negative)
    }
}

impl TryFrom<f64> for Int {
    type Error = Error;

    fn try_from(f: f64) -> Result<Self> {
        Int::try_from_f64(f)
    }
}

/// Shave `drop` low bits off `value · 2^exp`, rounding half to even, and
/// return the 53-bit mantissa with its binary exponent.
fn round_to_mantissa(value: u64, drop: u64, sticky: bool, exp: i64) -> (u64, i64) {
    debug_assert!(drop >= 1);
    let tail = value & ((1 << drop) - 1);
    let half = 1 << (drop - 1);
    let mut mant = value >> drop;
    if tail > half || (tail == half && (sticky || mant & 1 == 1)) {
        mant += 1;
    }
    let mut exp = exp + drop as i64;
    if mant == 1 << MANT_BITS {
        mant >>= 1;
        exp += 1;
    }
    (mant, exp)
}

fn finite(mant: u64, exp: i64, negative: bool) -> Result<f64> {
    if exp > 1024 {
        return Err(Error::Overflow);
    }
    if exp < -1100 {
        return Ok(if negative { -0.0 } else { 0.0 });
    }
    let v = mant as f64 * 2f64.powi(exp as i32);
    if v.is_infinite() {
        return Err(Error::Overflow);
    }
    Ok(if negative { -v } else { v })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_from_floats() {
        assert_eq!(Int::try_from_f64(0.0).unwrap(), Int::ZERO);
        assert_eq!(Int::try_from_f64(2.75).unwrap(), Int::from(2));
        assert_eq!(Int::try_from_f64(-2.75).unwrap(), Int::from(-2));
        assert_eq!(Int::try_from_f64(1e20).unwrap(), Int::from(100_000_000_000_000_000_000u128));
        assert!(Int::try_from_f64(f64::NAN).is_err());
        assert!(Int::try_from_f64(f64::INFINITY).is_err());
    }

    #[test]
    fn small_values_convert_exactly() {
        for v in [0i64, 1, -1, 42, -9_007_199_254_740_992, 9_007_199_254_740_992] {
            assert_eq!(Int::from(v).to_f64().unwrap(), v as f64, "{v}");
        }
    }

    #[test]
    fn wide_values_round_half_to_even() {
        // 2^53 is exact; 2^53 + 1 rounds down to it; 2^53 + 2 is exact.
        let base = Int::from(1) << 53;
        assert_eq!(base.to_f64().unwrap(), 9_007_199_254_740_992.0);
        assert_eq!((&base + 1).to_f64().unwrap(), 9_007_199_254_740_992.0);
        assert_eq!((&base + 2).to_f64().unwrap(), 9_007_199_254_740_994.0);
        assert_eq!((&base + 3).to_f64().unwrap(), 9_007_199_254_740_996.0);
        // Round trips stay exact on representable values.
        let v = Int::from(10_965_857_771_245_191i64);
        assert_eq!(Int::try_from_f64(v.to_f64().unwrap()).unwrap(), v);
    }

    #[test]
    fn overflow_past_the_float_range() {
        let huge = Int::from(10).checked_pow(&Int::from(1000)).unwrap();
        assert_eq!(huge.to_f64(), Err(Error::Overflow));
        let edge = Int::from(1) << 1023;
        assert!(edge.to_f64().is_ok());
        let over = Int::from(1) << 1024;
        assert_eq!(over.to_f64(), Err(Error::Overflow));
    }

    #[test]
    fn true_division() {
        let div = |a: i64, b: i64| Int::from(a).div_to_f64(&Int::from(b)).unwrap();
        assert_eq!(div(1, 2), 0.5);
        assert_eq!(div(-7, 2), -3.5);
        assert_eq!(div(7, -2), -3.5);
        assert_eq!(div(1, 3), 1.0 / 3.0);
        assert_eq!(div(2, 3), 2.0 / 3.0);
        assert_eq!(div(0, 5), 0.0);
        assert_eq!(
            Int::from(1).div_to_f64(&Int::ZERO),
            Err(Error::ZeroDivision)
        );
        // 10^1000 / 10^999 is exactly 10 even though neither side fits.
        let a = Int::from(10).checked_pow(&Int::from(1000)).unwrap();
        let b = Int::from(10).checked_pow(&Int::from(999)).unwrap();
        assert_eq!(a.div_to_f64(&b).unwrap(), 10.0);
        assert_eq!(b.div_to_f64(&a).unwrap(), 0.1);
        assert_eq!(Int::from(2).div_to_f64(&b).unwrap(), 0.0);
        assert_eq!(a.div_to_f64(&Int::from(2)), Err(Error::Overflow));
    }
}
