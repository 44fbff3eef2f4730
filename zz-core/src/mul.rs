//! Multiplication: schoolbook below [`KARATSUBA_THRESHOLD`], divide and
//! conquer above it, with a dedicated squaring base case.

use alloc::vec::Vec;

use crate::buffer;
use crate::digit::{Digit, DIGIT_BITS};
use crate::error::Result;
use crate::mem;
use crate::zz::Zz;

/// Operand size, in digits, above which multiplication recurses.
pub(crate) const KARATSUBA_THRESHOLD: usize = 40;

/// `a * b`.
pub fn mul(a: &Zz, b: &Zz) -> Result<Zz> {
    if a.is_zero() || b.is_zero() {
        return Ok(Zz::zero());
    }
    let mag = if core::ptr::eq(a, b) {
        sqr_mag(&a.digits)?
    } else {
        mul_mag(&a.digits, &b.digits)?
    };
    Ok(Zz::from_raw(a.negative != b.negative, mag))
}

/// `a * a`.
pub fn sqr(a: &Zz) -> Result<Zz> {
    if a.is_zero() {
        return Ok(Zz::zero());
    }
    Ok(Zz::from_raw(false, sqr_mag(&a.digits)?))
}

/// Magnitude product; result is normalized.
pub(crate) fn mul_mag(a: &[Digit], b: &[Digit]) -> Result<Vec<Digit>> {
    if a.len() == b.len() && a.as_ptr() == b.as_ptr() {
        return sqr_mag(a);
    }
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return Ok(Vec::new());
    }
    let mut out = if short.len() < KARATSUBA_THRESHOLD {
        basecase(long, short)?
    } else if long.len() >= 2 * short.len() {
        uneven(long, short)?
    } else {
        karatsuba(long, short)?
    };
    buffer::normalize(&mut out);
    Ok(out)
}

pub(crate) fn sqr_mag(a: &[Digit]) -> Result<Vec<Digit>> {
    let mut out = if a.len() < KARATSUBA_THRESHOLD {
        basecase_sqr(a)?
    } else {
        // The three-way recursion already reuses the squaring base case for
        // its sub-products via the pointer-equal split halves.
        karatsuba(a, a)?
    };
    buffer::normalize(&mut out);
    Ok(out)
}

fn basecase(a: &[Digit], b: &[Digit]) -> Result<Vec<Digit>> {
    let mut out = mem::digits_zeroed(a.len() + b.len())?;
    for (i, &ai) in a.iter().enumerate() {
        if ai == 0 {
            continue;
        }
        let mut carry = 0u128;
        for (j, &bj) in b.iter().enumerate() {
            let acc = u128::from(ai) * u128::from(bj) + u128::from(out[i + j]) + carry;
            out[i + j] = acc as Digit;
            carry = acc >> DIGIT_BITS;
        }
        ripple(&mut out[i + b.len()..], carry as Digit);
    }
    Ok(out)
}

fn basecase_sqr(a: &[Digit]) -> Result<Vec<Digit>> {
    let n = a.len();
    let mut out = mem::digits_zeroed(2 * n)?;
    // Cross products, each counted once.
    for i in 0..n {
        if a[i] == 0 {
            continue;
        }
        let mut carry = 0u128;
        for j in i + 1..n {
            let acc = u128::from(a[i]) * u128::from(a[j]) + u128::from(out[i + j]) + carry;
            out[i + j] = acc as Digit;
            carry = acc >> DIGIT_BITS;
        }
        ripple(&mut out[i + n..], carry as Digit);
    }
    // Double the cross products and fold in the diagonal squares.
    let mut top = 0;
    for digit in out.iter_mut() {
        let next = *digit >> (DIGIT_BITS - 1);
        *digit = (*digit << 1) | top;
        top = next;
    }
    debug_assert_eq!(top, 0);
    let mut carry = 0u128;
    for i in 0..n {
        let sq = u128::from(a[i]) * u128::from(a[i]);
        let lo = u128::from(out[2 * i]) + (sq & u128::from(Digit::MAX)) + carry;
        out[2 * i] = lo as Digit;
        let hi = u128::from(out[2 * i + 1]) + (sq >> DIGIT_BITS) + (lo >> DIGIT_BITS);
        out[2 * i + 1] = hi as Digit;
        carry = hi >> DIGIT_BITS;
    }
    debug_assert_eq!(carry, 0);
    Ok(out)
}

/// One operand at least twice the other: march fixed-size chunks of the long
/// operand through balanced sub-products.
fn uneven(long: &[Digit], short: &[Digit]) -> Result<Vec<Digit>> {
    let mut out = mem::digits_zeroed(long.len() + short.len())?;
    for (chunk, offset) in long.chunks(short.len()).zip((0..).step_by(short.len())) {
        let part = mul_mag(chunk, short)?;
        add_shifted(&mut out, &part, offset);
    }
    Ok(out)
}

/// Balanced three-multiplication recursion:
/// `a·b = z2·B^2m + (z1 - z0 - z2)·B^m + z0` with
/// `z0 = a0·b0`, `z2 = a1·b1`, `z1 = (a0+a1)·(b0+b1)`.
fn karatsuba(a: &[Digit], b: &[Digit]) -> Result<Vec<Digit>> {
    let m = a.len() / 2;
    debug_assert!(b.len() > m);
    let (a0, a1) = a.split_at(m);
    let (b0, b1) = b.split_at(m);

    let z0 = mul_mag(a0, b0)?;
    let z2 = mul_mag(a1, b1)?;
    let s1 = buffer::add_mag(a0, a1)?;
    let s2 = buffer::add_mag(b0, b1)?;
    let z1 = mul_mag(&s1, &s2)?;
    drop(s1);
    drop(s2);
    let z1 = buffer::sub_mag(&z1, &z0)?;
    let z1 = buffer::sub_mag(&z1, &z2)?;

    let mut out = mem::digits_zeroed(a.len() + b.len())?;
    add_shifted(&mut out, &z0, 0);
    add_shifted(&mut out, &z1, m);
    add_shifted(&mut out, &z2, 2 * m);
    Ok(out)
}

/// `out += v << (shift digits)`; the caller guarantees the sum fits.
fn add_shifted(out: &mut [Digit], v: &[Digit], shift: usize) {
    let mut carry = false;
    let mut k = shift;
    for &d in v {
        let (sum, c1) = out[k].overflowing_add(d);
        let (sum, c2) = sum.overflowing_add(Digit::from(carry));
        out[k] = sum;
        carry = c1 | c2;
        k += 1;
    }
    ripple(&mut out[k..], Digit::from(carry));
}

fn ripple(out: &mut [Digit], mut carry: Digit) {
    let mut k = 0;
    while carry != 0 {
        let (sum, overflow) = out[k].overflowing_add(carry);
        out[k] = sum;
        carry = Digit::from(overflow);
        k += 1;
    }
}
