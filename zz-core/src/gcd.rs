//! Greatest common divisor kernels.
//!
//! Multi-digit operands go through Lehmer's reduction: the Euclid quotient
//! sequence is simulated on the leading digits with word-size cofactors and
//! the accumulated 2x2 matrix is applied to the full operands in one pass.
//! Operands that fit two digits finish in a binary gcd.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::arith;
use crate::buffer;
use crate::digit::{Digit, DIGIT_BITS};
use crate::div::{self, Round};
use crate::error::Result;
use crate::mul;
use crate::zz::Zz;

/// `gcd(a, b) >= 0`, with `gcd(0, 0) == 0` and `gcd(a, 0) == |a|`.
pub fn gcd(a: &Zz, b: &Zz) -> Result<Zz> {
    if a.is_zero() {
        return arith::abs(b);
    }
    if b.is_zero() {
        return arith::abs(a);
    }
    let x = buffer::try_to_vec(a.digits())?;
    let y = buffer::try_to_vec(b.digits())?;
    gcd_mag(x, y)
}

fn gcd_mag(mut x: Vec<Digit>, mut y: Vec<Digit>) -> Result<Zz> {
    loop {
        if buffer::cmp_mag(&x, &y) == Ordering::Less {
            core::mem::swap(&mut x, &mut y);
        }
        if y.is_empty() {
            return Ok(Zz::from_raw(false, x));
        }
        if x.len() <= 2 {
            let g = gcd_u128(to_u128(&x), to_u128(&y));
            return Zz::from_mag_u128(false, g);
        }
        if x.len() - y.len() > 1 {
            // Sizes far apart: a Lehmer pass would verify nothing, take a
            // full remainder step instead.
            let rem = div::divrem_mag(&x, &y)?.1;
            x = core::mem::replace(&mut y, rem);
            continue;
        }
        lehmer_step(&mut x, &mut y)?;
    }
}

fn lehmer_step(x: &mut Vec<Digit>, y: &mut Vec<Digit>) -> Result<()> {
    let k = buffer::bit_length_mag(x) - u64::from(DIGIT_BITS);
    let mut u = i128::from(top_bits(x, k));
    let mut v = i128::from(top_bits(y, k));

    // Simulated quotients are trusted only while both cofactor-adjusted
    // candidates agree (Collins' condition).
    let (mut a, mut b, mut c, mut d) = (1i128, 0i128, 0i128, 1i128);
    loop {
        if v + c <= 0 || v + d <= 0 {
            break;
        }
        let q = (u + a) / (v + c);
        if q != (u + b) / (v + d) {
            break;
        }
        let t = a - q * c;
        a = c;
        c = t;
        let t = b - q * d;
        b = d;
        d = t;
        let t = u - q * v;
        u = v;
        v = t;
    }

    if b == 0 {
        // Not even one verified quotient; fall back to a remainder step.
        let rem = div::divrem_mag(x, y)?.1;
        *x = core::mem::replace(y, rem);
        return Ok(());
    }
    let nx = linear_comb(a, x, b, y)?;
    let ny = linear_comb(c, x, d, y)?;
    *x = nx;
    *y = ny;
    Ok(())
}

/// `|p·x + q·y|`; the cofactor signs alternate, so this is always a plain
/// magnitude difference.
fn linear_comb(p: i128, x: &[Digit], q: i128, y: &[Digit]) -> Result<Vec<Digit>> {
    debug_assert!(p.unsigned_abs() <= u128::from(u64::MAX));
    debug_assert!(q.unsigned_abs() <= u128::from(u64::MAX));
    debug_assert!(p == 0 || q == 0 || (p < 0) != (q < 0));
    let t1 = buffer::mul_small_mag(x, p.unsigned_abs() as Digit)?;
    let t2 = buffer::mul_small_mag(y, q.unsigned_abs() as Digit)?;
    match buffer::cmp_mag(&t1, &t2) {
        Ordering::Less => buffer::sub_mag(&t2, &t1),
        _ => buffer::sub_mag(&t1, &t2),
    }
}

/// Bits `[k, k + DIGIT_BITS)` of a magnitude.
fn top_bits(v: &[Digit], k: u64) -> Digit {
    let idx = (k / u64::from(DIGIT_BITS)) as usize;
    let off = (k % u64::from(DIGIT_BITS)) as u32;
    let lo = v.get(idx).copied().unwrap_or(0);
    if off == 0 {
        lo
    } else {
        let hi = v.get(idx + 1).copied().unwrap_or(0);
        (lo >> off) | (hi << (DIGIT_BITS - off))
    }
}

fn to_u128(v: &[Digit]) -> u128 {
    match v {
        [] => 0,
        [lo] => u128::from(*lo),
        [lo, hi] => (u128::from(*hi) << DIGIT_BITS) | u128::from(*lo),
        _ => unreachable!("operand wider than two digits"),
    }
}

fn gcd_u128(mut a: u128, mut b: u128) -> u128 {
    if a == 0 {
        return b;
    }
    if b == 0 {
        return a;
    }
    let shift = (a | b).trailing_zeros();
    a >>= a.trailing_zeros();
    loop {
        b >>= b.trailing_zeros();
        if a > b {
            core::mem::swap(&mut a, &mut b);
        }
        b -= a;
        if b == 0 {
            return a << shift;
        }
    }
}

/// `(g, x, y)` with `a·x + b·y == g == gcd(a, b)` and the canonically
/// minimal cofactors the iterative construction yields.
pub fn gcdext(a: &Zz, b: &Zz) -> Result<(Zz, Zz, Zz)> {
    if a.is_zero() && b.is_zero() {
        return Ok((Zz::zero(), Zz::zero(), Zz::zero()));
    }
    if b.is_zero() {
        return Ok((arith::abs(a)?, Zz::from_i64(a.signum().into())?, Zz::zero()));
    }
    if a.is_zero() {
        return Ok((arith::abs(b)?, Zz::zero(), Zz::from_i64(b.signum().into())?));
    }

    let (mut old_r, mut r) = (arith::abs(a)?, arith::abs(b)?);
    let (mut old_s, mut s) = (Zz::from_i64(1)?, Zz::zero());
    let (mut old_t, mut t) = (Zz::zero(), Zz::from_i64(1)?);
    while !r.is_zero() {
        let (q, rem) = div::divrem(&old_r, &r, Round::Floor)?;
        old_r = core::mem::replace(&mut r, rem);
        let next = arith::sub(&old_s, &mul::mul(&q, &s)?)?;
        old_s = core::mem::replace(&mut s, next);
        let next = arith::sub(&old_t, &mul::mul(&q, &t)?)?;
        old_t = core::mem::replace(&mut t, next);
    }
    if a.is_negative() {
        old_s = arith::neg(&old_s)?;
    }
    if b.is_negative() {
        old_t = arith::neg(&old_t)?;
    }
    Ok((old_r, old_s, old_t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn zz(v: i64) -> Zz {
        Zz::from_i64(v).unwrap()
    }

    fn gcd_i64(mut a: i64, mut b: i64) -> i64 {
        while b != 0 {
            let t = a.rem_euclid(b.abs());
            a = b.abs();
            b = t;
        }
        a.abs()
    }

    #[test]
    fn agrees_with_euclid_on_machine_words() {
        let values = [0i64, 1, -1, 2, 6, -12, 18, 360, -1 << 40, 3 << 20, 982_451_653];
        for a in values {
            for b in values {
                assert_eq!(gcd(&zz(a), &zz(b)).unwrap(), zz(gcd_i64(a, b)), "gcd({a},{b})");
            }
        }
    }

    #[test]
    fn corner_cases() {
        assert_eq!(gcd(&Zz::zero(), &Zz::zero()).unwrap(), Zz::zero());
        assert_eq!(gcd(&zz(-6), &Zz::zero()).unwrap(), zz(6));
        assert_eq!(gcdext(&Zz::zero(), &Zz::zero()).unwrap(), (Zz::zero(), Zz::zero(), Zz::zero()));
        assert_eq!(gcdext(&zz(-6), &Zz::zero()).unwrap(), (zz(6), zz(-1), Zz::zero()));
        assert_eq!(gcdext(&zz(12), &zz(18)).unwrap(), (zz(6), zz(-1), zz(1)));
    }

    #[test]
    fn bezout_identity_on_random_wide_operands() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..24 {
            let __n = rng.gen_range(1..900);
            let a = Zz::random(&mut rng, __n).unwrap();
            let __n = rng.gen_range(1..900);
            let b = Zz::random(&mut rng, __n).unwrap();
            let (g, x, y) = gcdext(&a, &b).unwrap();
            let lhs = arith::add(&mul::mul(&a, &x).unwrap(), &mul::mul(&b, &y).unwrap()).unwrap();
            assert_eq!(lhs, g);
            // The Lehmer path must agree with the Euclid path.
            assert_eq!(gcd(&a, &b).unwrap(), g);
            if !g.is_zero() {
                assert!(div::divrem(&a, &g, Round::Floor).unwrap().1.is_zero());
                assert!(div::divrem(&b, &g, Round::Floor).unwrap().1.is_zero());
            }
        }
    }

    #[test]
    fn shared_power_of_two_factors_survive() {
        let mut rng = StdRng::seed_from_u64(31);
        let p = arith::abs(&Zz::random(&mut rng, 500).unwrap()).unwrap();
        let shifted_p = crate::shift::mul_2exp(&p, 40).unwrap();
        let shifted_q = crate::shift::mul_2exp(&p, 45).unwrap();
        let g = gcd(&shifted_p, &shifted_q).unwrap();
        assert!(div::divrem(&g, &shifted_p, Round::Floor).unwrap().1.is_zero());
    }
}
