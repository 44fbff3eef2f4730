//! Bitwise operations over the host's two's-complement view.
//!
//! Operands are sign-magnitude, so a negative input is transformed to its
//! two's-complement digit stream first; the result sign comes from a truth
//! table over the input signs and decides whether the raw digits are
//! converted back.

use alloc::vec::Vec;

use crate::arith;
use crate::digit::Digit;
use crate::error::Result;
use crate::mem;
use crate::zz::Zz;

/// `a & b`.
pub fn and(a: &Zz, b: &Zz) -> Result<Zz> {
    bitop(a, b, |x, y| x & y, a.is_negative() && b.is_negative())
}

/// `a | b`.
pub fn or(a: &Zz, b: &Zz) -> Result<Zz> {
    bitop(a, b, |x, y| x | y, a.is_negative() || b.is_negative())
}

/// `a ^ b`.
pub fn xor(a: &Zz, b: &Zz) -> Result<Zz> {
    bitop(a, b, |x, y| x ^ y, a.is_negative() != b.is_negative())
}

/// `!a`, i.e. `-a - 1`.
pub fn not(a: &Zz) -> Result<Zz> {
    arith::neg(&arith::add_i32(a, 1)?)
}

/// Set bits in the magnitude.
pub fn bit_count(a: &Zz) -> u64 {
    a.digits().iter().map(|d| u64::from(d.count_ones())).sum()
}

/// Zero-based position of the lowest set bit, or `default` for zero.
pub fn lsbpos(a: &Zz, default: u64) -> u64 {
    for (i, &d) in a.digits().iter().enumerate() {
        if d != 0 {
            return i as u64 * u64::from(Digit::BITS) + u64::from(d.trailing_zeros());
        }
    }
    default
}

fn bitop(a: &Zz, b: &Zz, op: fn(Digit, Digit) -> Digit, negative: bool) -> Result<Zz> {
    // One digit beyond the wider operand keeps the infinitely-extended sign
    // bits representable.
    let n = a.size().max(b.size()) + 1;
    let av = to_twos(a, n)?;
    let bv = to_twos(b, n)?;
    let mut out = mem::digits_with_capacity(n)?;
    out.extend(av.iter().zip(&bv).map(|(&x, &y)| op(x, y)));
    if negative {
        negate_in_place(&mut out);
    }
    Ok(Zz::from_raw(negative, out))
}

/// The two's-complement digit stream of `x` over `n` digits.
fn to_twos(x: &Zz, n: usize) -> Result<Vec<Digit>> {
    debug_assert!(n > x.size());
    let mut v = mem::digits_zeroed(n)?;
    v[..x.size()].copy_from_slice(x.digits());
    if x.is_negative() {
        negate_in_place(&mut v);
    }
    Ok(v)
}

/// `v = !v + 1` over the fixed width of `v`.
fn negate_in_place(v: &mut [Digit]) {
    let mut carry = true;
    for d in v.iter_mut() {
        *d = !*d;
        if carry {
            let (sum, overflow) = d.overflowing_add(1);
            *d = sum;
            carry = overflow;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn zz(v: i64) -> Zz {
        Zz::from_i64(v).unwrap()
    }

    #[test]
    fn small_values_match_machine_bitwise_ops() {
        let interesting = [-(1i64 << 40), -129, -2, -1, 0, 1, 2, 127, 1 << 40];
        for a in interesting {
            assert_eq!(not(&zz(a)).unwrap(), zz(!a), "!{a}");
            for b in interesting {
                assert_eq!(and(&zz(a), &zz(b)).unwrap(), zz(a & b), "{a}&{b}");
                assert_eq!(or(&zz(a), &zz(b)).unwrap(), zz(a | b), "{a}|{b}");
                assert_eq!(xor(&zz(a), &zz(b)).unwrap(), zz(a ^ b), "{a}^{b}");
            }
        }
    }

    #[test]
    fn carry_identity_links_add_and_bitwise() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..32 {
            let __n = rng.gen_range(0..300);
            let a = Zz::random(&mut rng, __n).unwrap();
            let __n = rng.gen_range(0..300);
            let b = Zz::random(&mut rng, __n).unwrap();
            // a + b == (a ^ b) + 2 (a & b)
            let lhs = arith::add(&a, &b).unwrap();
            let carries = crate::shift::mul_2exp(&and(&a, &b).unwrap(), 1).unwrap();
            let rhs = arith::add(&xor(&a, &b).unwrap(), &carries).unwrap();
            assert_eq!(lhs, rhs);
        }
    }

    #[test]
    fn counting_queries() {
        assert_eq!(bit_count(&zz(0)), 0);
        assert_eq!(bit_count(&zz(-255)), 8);
        assert_eq!(zz(0).bit_length(), 0);
        assert_eq!(zz(255).bit_length(), 8);
        assert_eq!(lsbpos(&zz(0), 7), 7);
        assert_eq!(lsbpos(&zz(12), 0), 2);
        let wide = crate::shift::mul_2exp(&zz(1), 130).unwrap();
        assert_eq!(lsbpos(&wide, 0), 130);
        assert_eq!(wide.bit_length(), 131);
    }
}
