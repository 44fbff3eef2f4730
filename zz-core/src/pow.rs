//! Exponentiation, plain and modular.

use crate::arith;
use crate::div::{self, Round};
use crate::error::{Error, Result};
use crate::gcd;
use crate::mul;
use crate::zz::Zz;

/// `a^e` for `e >= 0`.
///
/// An exponent beyond a machine word is accepted only for bases whose
/// magnitude is at most one; anything else could not be represented anyway
/// and is a domain error.
pub fn pow(a: &Zz, e: &Zz) -> Result<Zz> {
    if e.is_negative() {
        return Err(Error::Value);
    }
    match e.to_u64() {
        Some(e) => pow_u64(a, e),
        None if a.is_zero() => Ok(Zz::zero()),
        None if a.bit_length() == 1 => {
            // Base is 1 or -1; only the exponent's parity matters.
            let odd = e.digits()[0] & 1 == 1;
            Zz::from_i64(if a.is_negative() && odd { -1 } else { 1 })
        }
        None => Err(Error::Value),
    }
}

pub(crate) fn pow_u64(a: &Zz, e: u64) -> Result<Zz> {
    if e == 0 {
        return Zz::from_i64(1);
    }
    let mut acc = a.try_clone()?;
    for bit in (0..63 - e.leading_zeros()).rev() {
        acc = mul::sqr(&acc)?;
        if e >> bit & 1 == 1 {
            acc = mul::mul(&acc, a)?;
        }
    }
    Ok(acc)
}

/// `a^e mod m`, with the result in `[0, |m|)`. `m == 0` is a domain error,
/// and a negative exponent requires `a` to be invertible modulo `|m|`.
pub fn powm(a: &Zz, e: &Zz, m: &Zz) -> Result<Zz> {
    if m.is_zero() {
        return Err(Error::Value);
    }
    let m_abs = arith::abs(m)?;
    if m_abs.bit_length() == 1 {
        return Ok(Zz::zero());
    }
    let mut base = reduce(a, &m_abs)?;
    if e.is_negative() {
        base = invert(&base, &m_abs)?;
    }

    let mut acc = Zz::from_i64(1)?;
    for &digit in e.digits().iter().rev() {
        for bit in (0..u64::BITS as usize).rev() {
            acc = reduce(&mul::sqr(&acc)?, &m_abs)?;
            if digit >> bit & 1 == 1 {
                acc = reduce(&mul::mul(&acc, &base)?, &m_abs)?;
            }
        }
    }
    if e.is_zero() {
        acc = reduce(&acc, &m_abs)?;
    }
    Ok(acc)
}

/// `x mod m` for positive `m`, in `[0, m)`.
fn reduce(x: &Zz, m: &Zz) -> Result<Zz> {
    let (_, r) = div::divrem(x, m, Round::Floor)?;
    Ok(r)
}

/// Modular inverse; a domain error when `gcd(x, m) != 1`.
fn invert(x: &Zz, m: &Zz) -> Result<Zz> {
    let (g, inv, _) = gcd::gcdext(x, m)?;
    if g.bit_length() != 1 {
        return Err(Error::Value);
    }
    reduce(&inv, m)
}
