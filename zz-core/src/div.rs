//! Division with remainder.
//!
//! Multi-digit division is Knuth's Algorithm D over a normalization shift;
//! a single-digit divisor takes the fast path in [`buffer::divrem_small`].

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::arith;
use crate::buffer;
use crate::digit::{Digit, DIGIT_BITS};
use crate::error::{Error, Result};
use crate::mem;
use crate::zz::Zz;

/// Rounding mode of [`divrem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[repr(i32)]
pub enum Round {
    /// Round the quotient toward negative infinity; the remainder takes the
    /// divisor's sign.
    Floor = 0,
    /// Round the quotient to the nearest integer, ties toward the even
    /// quotient.
    Nearest = 1,
}

impl TryFrom<i32> for Round {
    type Error = Error;

    fn try_from(v: i32) -> Result<Self> {
        match v {
            0 => Ok(Round::Floor),
            1 => Ok(Round::Nearest),
            _ => Err(Error::Value),
        }
    }
}

/// `(a / b, a % b)` under the requested rounding. `b == 0` is a domain error.
pub fn divrem(a: &Zz, b: &Zz, round: Round) -> Result<(Zz, Zz)> {
    if b.is_zero() {
        return Err(Error::Value);
    }
    let (q_mag, r_mag) = divrem_mag(&a.digits, &b.digits)?;
    let mut q = Zz::from_raw(a.negative != b.negative, q_mag);
    let mut r = Zz::from_raw(a.negative, r_mag);

    // Truncation leaves the remainder with the dividend's sign; floor wants
    // the divisor's.
    if !r.is_zero() && r.negative != b.negative {
        q = arith::add_i32(&q, -1)?;
        r = arith::add(&r, b)?;
    }

    if round == Round::Nearest {
        // After the floor step `a/b = q + r/b` with `r/b` in `[0, 1)`, so
        // nearest rounding can only move the quotient up.
        let twice = buffer::add_mag(&r.digits, &r.digits)?;
        let up = match buffer::cmp_mag(&twice, &b.digits) {
            Ordering::Greater => true,
            Ordering::Equal => q.digits.first().is_some_and(|d| d & 1 == 1),
            Ordering::Less => false,
        };
        if up {
            q = arith::add_i32(&q, 1)?;
            r = arith::sub(&r, b)?;
        }
    }
    Ok((q, r))
}

/// Floor remainder by a machine word, in `[0, d)`. `d == 0` is a domain
/// error.
pub fn rem_u64(a: &Zz, d: u64) -> Result<u64> {
    if d == 0 {
        return Err(Error::Value);
    }
    let r = buffer::rem_small(&a.digits, d);
    Ok(if a.negative && r != 0 { d - r } else { r })
}

/// Truncating magnitude division; both results are normalized.
pub(crate) fn divrem_mag(u: &[Digit], v: &[Digit]) -> Result<(Vec<Digit>, Vec<Digit>)> {
    debug_assert!(!v.is_empty());
    if buffer::cmp_mag(u, v) == Ordering::Less {
        return Ok((Vec::new(), buffer::try_to_vec(u)?));
    }
    if v.len() == 1 {
        let (q, r) = buffer::divrem_small(u, v[0])?;
        let mut rem = Vec::new();
        if r != 0 {
            rem = mem::digits_with_capacity(1)?;
            rem.push(r);
        }
        return Ok((q, rem));
    }
    knuth_d(u, v)
}

fn knuth_d(u: &[Digit], v: &[Digit]) -> Result<(Vec<Digit>, Vec<Digit>)> {
    let n = v.len();
    let m = u.len() - n;
    let shift = v[n - 1].leading_zeros();
    let vn = shl_bits(v, shift, 0)?;
    let mut un = shl_bits(u, shift, 1)?;
    let mut q = mem::digits_zeroed(m + 1)?;

    for j in (0..=m).rev() {
        // Estimate the quotient digit from the top two dividend digits and
        // the top divisor digit, then correct the rare over-estimate.
        let numerator =
            (u128::from(un[j + n]) << DIGIT_BITS) | u128::from(un[j + n - 1]);
        let divisor = u128::from(vn[n - 1]);
        let mut qhat = numerator / divisor;
        let mut rhat = numerator % divisor;
        while qhat > u128::from(Digit::MAX)
            || qhat * u128::from(vn[n - 2])
                > (rhat << DIGIT_BITS) | u128::from(un[j + n - 2])
        {
            qhat -= 1;
            rhat += divisor;
            if rhat > u128::from(Digit::MAX) {
                break;
            }
        }

        // Multiply and subtract.
        let mut mul_carry = 0u128;
        let mut borrow = 0;
        for i in 0..n {
            let p = qhat * u128::from(vn[i]) + mul_carry;
            mul_carry = p >> DIGIT_BITS;
            let (d, b1) = un[j + i].overflowing_sub(p as Digit);
            let (d, b2) = d.overflowing_sub(borrow);
            un[j + i] = d;
            borrow = Digit::from(b1) + Digit::from(b2);
        }
        let (d, b1) = un[j + n].overflowing_sub(mul_carry as Digit);
        let (d, b2) = d.overflowing_sub(borrow);
        un[j + n] = d;

        if b1 || b2 {
            // qhat was one too large: add the divisor back.
            qhat -= 1;
            let mut carry = false;
            for i in 0..n {
                let (s, c1) = un[j + i].overflowing_add(vn[i]);
                let (s, c2) = s.overflowing_add(Digit::from(carry));
                un[j + i] = s;
                carry = c1 | c2;
            }
            un[j + n] = un[j + n].wrapping_add(Digit::from(carry));
        }
        q[j] = qhat as Digit;
    }

    un.truncate(n);
    shr_bits_in_place(&mut un, shift);
    buffer::normalize(&mut q);
    buffer::normalize(&mut un);
    Ok((q, un))
}

/// `v << shift` for a sub-digit shift, with `extra` zeroed digits on top to
/// absorb the carry-out.
fn shl_bits(v: &[Digit], shift: u32, extra: usize) -> Result<Vec<Digit>> {
    let mut out = mem::digits_zeroed(v.len() + extra)?;
    if shift == 0 {
        out[..v.len()].copy_from_slice(v);
        return Ok(out);
    }
    let mut carry = 0;
    for (i, &d) in v.iter().enumerate() {
        out[i] = (d << shift) | carry;
        carry = d >> (DIGIT_BITS - shift);
    }
    if extra > 0 {
        out[v.len()] = carry;
    } else {
        debug_assert_eq!(carry, 0);
    }
    Ok(out)
}

fn shr_bits_in_place(v: &mut [Digit], shift: u32) {
    if shift == 0 {
        return;
    }
    let mut carry = 0;
    for d in v.iter_mut().rev() {
        let next = *d << (DIGIT_BITS - shift);
        *d = (*d >> shift) | carry;
        carry = next;
    }
}
