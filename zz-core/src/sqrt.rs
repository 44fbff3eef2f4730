//! Integer square root with remainder.

use crate::arith;
use crate::div::{self, Round};
use crate::error::{Error, Result};
use crate::mul;
use crate::shift;
use crate::zz::Zz;

/// `(s, r)` with `s = ⌊√n⌋` and `r = n - s²`. Negative `n` is a domain
/// error.
pub fn sqrtrem(n: &Zz) -> Result<(Zz, Zz)> {
    if n.is_negative() {
        return Err(Error::Value);
    }
    if n.is_zero() {
        return Ok((Zz::zero(), Zz::zero()));
    }
    if let Some(mag) = n.mag_u128() {
        let s = isqrt_u128(mag);
        let r = mag - s * s;
        return Ok((
            Zz::from_mag_u128(false, s)?,
            Zz::from_mag_u128(false, r)?,
        ));
    }

    // Newton iteration `s <- (s + n/s) / 2` from an over-estimate taken off
    // the top two digits, so convergence needs only a handful of divisions.
    let bits = n.bit_length();
    let dropped = (bits - 126 + 1) & !1;
    let hi = shift::quo_2exp(n, dropped as i64)?;
    let head = hi.mag_u128().ok_or(Error::Value)?;
    let mut s = shift::mul_2exp(
        &Zz::from_mag_u128(false, isqrt_u128(head) + 1)?,
        (dropped / 2) as i64,
    )?;
    loop {
        let (q, _) = div::divrem(n, &s, Round::Floor)?;
        let next = shift::quo_2exp(&arith::add(&s, &q)?, 1)?;
        if next.cmp(&s) != core::cmp::Ordering::Less {
            break;
        }
        s = next;
    }

    // Enforce s² <= n < (s+1)².
    let mut r = arith::sub(n, &mul::sqr(&s)?)?;
    while r.is_negative() {
        s = arith::add_i32(&s, -1)?;
        r = arith::sub(n, &mul::sqr(&s)?)?;
    }
    loop {
        let next = arith::add_i32(&s, 1)?;
        let next_r = arith::sub(n, &mul::sqr(&next)?)?;
        if next_r.is_negative() {
            break;
        }
        s = next;
        r = next_r;
    }
    Ok((s, r))
}

fn isqrt_u128(m: u128) -> u128 {
    if m == 0 {
        return 0;
    }
    let bits = 128 - m.leading_zeros();
    let mut x = 1u128 << (bits / 2 + 1);
    loop {
        let y = (x + m / x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
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
    fn small_values() {
        for (n, s, r) in [(0, 0, 0), (1, 1, 0), (2, 1, 1), (3, 1, 2), (4, 2, 0), (10, 3, 1)] {
            let (got_s, got_r) = sqrtrem(&zz(n)).unwrap();
            assert_eq!((got_s, got_r), (zz(s), zz(r)), "sqrtrem({n})");
        }
        assert_eq!(sqrtrem(&zz(-1)), Err(Error::Value));
    }

    #[test]
    fn perfect_squares_have_zero_remainder() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..16 {
            let __n = rng.gen_range(1..400);
            let s = Zz::random(&mut rng, __n).unwrap();
            let s = arith::abs(&s).unwrap();
            let (got, r) = sqrtrem(&mul::sqr(&s).unwrap()).unwrap();
            assert_eq!(got, s);
            assert!(r.is_zero());
        }
    }

    #[test]
    fn floor_property_holds_on_random_wide_inputs() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..24 {
            let __n = rng.gen_range(120..900);
            let n = arith::abs(&Zz::random(&mut rng, __n).unwrap()).unwrap();
            let (s, r) = sqrtrem(&n).unwrap();
            assert!(!r.is_negative());
            // n == s² + r and r <= 2s.
            let back = arith::add(&mul::sqr(&s).unwrap(), &r).unwrap();
            assert_eq!(back, n);
            let bound = shift::mul_2exp(&s, 1).unwrap();
            assert!(r.cmp(&bound) != core::cmp::Ordering::Greater);
        }
    }
}
