//! Signed addition and subtraction.

use core::cmp::Ordering;

use crate::buffer;
use crate::digit::Digit;
use crate::error::Result;
use crate::zz::Zz;

/// `a + b`.
pub fn add(a: &Zz, b: &Zz) -> Result<Zz> {
    combine(a.negative, &a.digits, b.negative, &b.digits)
}

/// `a - b`.
pub fn sub(a: &Zz, b: &Zz) -> Result<Zz> {
    combine(a.negative, &a.digits, !b.negative, &b.digits)
}

/// `-a`.
pub fn neg(a: &Zz) -> Result<Zz> {
    let mut out = a.try_clone()?;
    out.negative = !out.negative && !out.digits.is_empty();
    Ok(out)
}

/// `|a|`.
pub fn abs(a: &Zz) -> Result<Zz> {
    let mut out = a.try_clone()?;
    out.negative = false;
    Ok(out)
}

/// `a + v` for a small host integer.
pub fn add_i32(a: &Zz, v: i32) -> Result<Zz> {
    let mag = [u64::from(v.unsigned_abs())];
    let digits: &[Digit] = if v == 0 { &[] } else { &mag };
    combine(a.negative, &a.digits, v < 0, digits)
}

/// Sign-magnitude combination: when the signs agree the magnitudes add, and
/// when they differ the smaller magnitude is subtracted from the larger,
/// which donates its sign.
fn combine(a_neg: bool, a: &[Digit], b_neg: bool, b: &[Digit]) -> Result<Zz> {
    if a_neg == b_neg {
        return Ok(Zz::from_raw(a_neg, buffer::add_mag(a, b)?));
    }
    match buffer::cmp_mag(a, b) {
        Ordering::Equal => Ok(Zz::zero()),
        Ordering::Greater => Ok(Zz::from_raw(a_neg, buffer::sub_mag(a, b)?)),
        Ordering::Less => Ok(Zz::from_raw(b_neg, buffer::sub_mag(b, a)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zz(v: i64) -> Zz {
        Zz::from_i64(v).unwrap()
    }

    #[test]
    fn add_matches_host_arithmetic() {
        for a in [-3i64, -1, 0, 1, 2, 1 << 40, -(1 << 40)] {
            for b in [-7i64, -2, 0, 3, 1 << 33] {
                assert_eq!(add(&zz(a), &zz(b)).unwrap(), zz(a + b), "{a}+{b}");
                assert_eq!(sub(&zz(a), &zz(b)).unwrap(), zz(a - b), "{a}-{b}");
            }
        }
    }

    #[test]
    fn identities_hold() {
        let a = zz(-123_456_789);
        assert_eq!(add(&a, &Zz::zero()).unwrap(), a);
        assert_eq!(sub(&a, &a).unwrap(), Zz::zero());
        assert_eq!(neg(&neg(&a).unwrap()).unwrap(), a);
        assert_eq!(abs(&a).unwrap(), zz(123_456_789));
    }

    #[test]
    fn magnitude_carries_ripple() {
        let a = Zz::from_u64(u64::MAX).unwrap();
        let sum = add(&a, &zz(1)).unwrap();
        assert_eq!(sum.digits(), &[0, 1]);
        assert_eq!(sub(&sum, &zz(1)).unwrap(), a);
    }

    #[test]
    fn add_i32_covers_both_signs() {
        assert_eq!(add_i32(&zz(0), 2).unwrap(), zz(2));
        assert_eq!(add_i32(&zz(5), -7).unwrap(), zz(-2));
        assert_eq!(add_i32(&zz(-5), 5).unwrap(), Zz::zero());
        assert_eq!(add_i32(&zz(i64::MAX), i32::MAX).unwrap().to_i64(), None);
    }
}
