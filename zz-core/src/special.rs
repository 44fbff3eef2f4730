//! Factorials, fibonacci numbers and binomials.
//!
//! `factorial` uses prime swing: the factorization of `n!` is reconstructed
//! from Legendre's formula and multiplied back in a power-of-two product
//! tree, which keeps every sub-multiplication balanced. Small factorials are
//! served from a lock-protected memo that [`crate::mem::finish`] drains.

use alloc::vec::Vec;

use crate::arith;
use crate::buffer;
use crate::digit::Digit;
use crate::error::{Error, Result};
use crate::mem;
use crate::mul;
use crate::zz::Zz;

/// Largest argument served from the factorial memo.
const MEMO_LIMIT: u64 = 128;

static FACTORIAL_MEMO: spin::Mutex<Option<Vec<Zz>>> = spin::Mutex::new(None);

pub(crate) fn drain_memo() {
    *FACTORIAL_MEMO.lock() = None;
}

/// `n!` for `0 <= n <= i64::MAX`.
pub fn factorial(n: &Zz) -> Result<Zz> {
    let n = small_arg(n)?;
    if n < MEMO_LIMIT {
        return factorial_memo(n);
    }
    factorial_swing(n)
}

fn factorial_memo(n: u64) -> Result<Zz> {
    let mut guard = FACTORIAL_MEMO.lock();
    let table = match guard.as_mut() {
        Some(table) => table,
        None => {
            let mut table = Vec::new();
            table.try_reserve(MEMO_LIMIT as usize)?;
            table.push(Zz::from_i64(1)?);
            *guard = Some(table);
            guard.as_mut().expect("memo just installed")
        }
    };
    while table.len() <= n as usize {
        let next = mul_u64(&table[table.len() - 1], table.len() as u64)?;
        table.push(next);
    }
    table[n as usize].try_clone()
}

fn factorial_swing(n: u64) -> Result<Zz> {
    let primes = sieve(n)?;
    let mut pairs = Vec::new();
    pairs.try_reserve(primes.len())?;
    for p in primes {
        pairs.push((p, legendre(n, p)));
    }

    // powproduct: peel the odd-exponent primes per round, halve the
    // exponents, square on the way back up.
    let mut levels = Vec::new();
    while !pairs.is_empty() {
        let mut odd = Vec::new();
        odd.try_reserve(pairs.len())?;
        for &(p, e) in &pairs {
            if e & 1 == 1 {
                odd.push(p);
            }
        }
        levels.try_reserve(1)?;
        levels.push(product_of_words(&odd)?);
        pairs.retain_mut(|(_, e)| {
            *e /= 2;
            *e > 0
        });
    }

    let mut acc = Zz::from_i64(1)?;
    for level in levels.iter().rev() {
        acc = mul::sqr(&acc)?;
        acc = mul::mul(&acc, level)?;
    }
    Ok(acc)
}

/// `n!!`, the product of the positive integers of `n`'s parity up to `n`.
pub fn double_factorial(n: &Zz) -> Result<Zz> {
    let n = small_arg(n)?;
    if n < 2 {
        return Zz::from_i64(1);
    }
    let start = if n % 2 == 0 { 2 } else { 1 };
    let mut factors = Vec::new();
    factors.try_reserve((((n - start) / 2) + 1) as usize)?;
    for f in (start..=n).step_by(2) {
        factors.push(f);
    }
    product_of_words(&factors)
}

/// The `n`-th fibonacci number, by fast doubling.
pub fn fibonacci(n: &Zz) -> Result<Zz> {
    let n = small_arg(n)?;
    Ok(fib_pair(n)?.0)
}

/// `(F(k), F(k + 1))`.
fn fib_pair(k: u64) -> Result<(Zz, Zz)> {
    if k == 0 {
        return Ok((Zz::zero(), Zz::from_i64(1)?));
    }
    let (a, b) = fib_pair(k / 2)?;
    // F(2k) = F(k)·(2F(k+1) − F(k)); F(2k+1) = F(k)² + F(k+1)².
    let twice_b = crate::shift::mul_2exp(&b, 1)?;
    let c = mul::mul(&a, &arith::sub(&twice_b, &a)?)?;
    let d = arith::add(&mul::sqr(&a)?, &mul::sqr(&b)?)?;
    if k & 1 == 0 {
        Ok((c, d))
    } else {
        let sum = arith::add(&c, &d)?;
        Ok((d, sum))
    }
}

/// Binomial coefficient `C(n, k)`; 0 when `k > n`.
pub fn comb(n: &Zz, k: &Zz) -> Result<Zz> {
    let n = small_arg(n)?;
    let k = small_arg(k)?;
    if k > n {
        return Ok(Zz::zero());
    }
    let k = k.min(n - k);
    let mut acc = Zz::from_i64(1)?;
    for i in 1..=k {
        acc = mul_u64(&acc, n - k + i)?;
        let (q, r) = buffer::divrem_small(acc.digits(), i)?;
        debug_assert_eq!(r, 0);
        acc = Zz::from_raw(false, q);
    }
    Ok(acc)
}

/// Falling factorial `P(n, k) = n·(n−1)···(n−k+1)`; 0 when `k > n`.
pub fn perm(n: &Zz, k: &Zz) -> Result<Zz> {
    let n = small_arg(n)?;
    let k = small_arg(k)?;
    if k > n {
        return Ok(Zz::zero());
    }
    let mut factors = Vec::new();
    factors.try_reserve(k as usize)?;
    for f in (n - k + 1)..=n {
        factors.push(f);
    }
    if factors.is_empty() {
        return Zz::from_i64(1);
    }
    product_of_words(&factors)
}

/// A nonnegative argument that fits the host's long.
fn small_arg(n: &Zz) -> Result<u64> {
    if n.is_negative() {
        return Err(Error::Value);
    }
    n.to_i64().map(|v| v as u64).ok_or(Error::Value)
}

fn mul_u64(a: &Zz, f: u64) -> Result<Zz> {
    Ok(Zz::from_raw(
        a.is_negative(),
        buffer::mul_small_mag(a.digits(), f)?,
    ))
}

/// Balanced product of machine words: adjacent words are coalesced while
/// they fit, then the partial products are folded pairwise.
fn product_of_words(words: &[u64]) -> Result<Zz> {
    let mut factors = Vec::new();
    factors.try_reserve(words.len() + 1)?;
    let mut acc: u64 = 1;
    for &w in words {
        debug_assert!(w > 0);
        match acc.checked_mul(w) {
            Some(next) => acc = next,
            None => {
                factors.push(Zz::from_u64(acc)?);
                acc = w;
            }
        }
    }
    factors.push(Zz::from_u64(acc)?);
    while factors.len() > 1 {
        let mut next = Vec::new();
        next.try_reserve(factors.len().div_ceil(2))?;
        for pair in factors.chunks(2) {
            next.push(match pair {
                [a, b] => mul::mul(a, b)?,
                [a] => a.try_clone()?,
                _ => unreachable!("chunks of two"),
            });
        }
        factors = next;
    }
    Ok(factors.pop().expect("at least one factor"))
}

/// Primes up to `n`, from an odd-only sieve held in digit words.
fn sieve(n: u64) -> Result<Vec<u64>> {
    debug_assert!(n >= 2);
    let odd_count = (n as usize).div_ceil(2);
    let mut composite = mem::digits_zeroed(odd_count.div_ceil(Digit::BITS as usize))?;
    let is_set = |bits: &[Digit], i: usize| bits[i / 64] >> (i % 64) & 1 == 1;
    let mut p = 3u64;
    while p * p <= n {
        if !is_set(&composite, (p / 2) as usize) {
            let mut multiple = p * p;
            while multiple <= n {
                let i = (multiple / 2) as usize;
                composite[i / 64] |= 1 << (i % 64);
                multiple += 2 * p;
            }
        }
        p += 2;
    }
    let mut primes = Vec::new();
    primes.try_reserve(odd_count)?;
    primes.push(2);
    for i in 1..odd_count {
        if !is_set(&composite, i) {
            primes.push(2 * i as u64 + 1);
        }
    }
    Ok(primes)
}

/// Power of the prime `p` in the factorization of `n!`.
fn legendre(n: u64, p: u64) -> u64 {
    let mut q = n;
    let mut m = 0;
    while q >= p {
        q /= p;
        m += q;
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zz(v: i64) -> Zz {
        Zz::from_i64(v).unwrap()
    }

    #[test]
    fn small_factorials() {
        drain_memo();
        let mut expected = 1i64;
        for n in 1..=20 {
            expected *= n;
            assert_eq!(factorial(&zz(n)).unwrap(), zz(expected), "{n}!");
        }
        assert_eq!(factorial(&zz(13)).unwrap(), zz(6_227_020_800));
    }

    #[test]
    fn swing_path_agrees_with_the_memo_path() {
        // 130 and 131 run through the sieve; cross-check against the
        // iterative product.
        for n in [MEMO_LIMIT + 2, MEMO_LIMIT + 3] {
            let swung = factorial(&Zz::from_u64(n).unwrap()).unwrap();
            let mut plain = Zz::from_i64(1).unwrap();
            for f in 2..=n {
                plain = mul_u64(&plain, f).unwrap();
            }
            assert_eq!(swung, plain, "{n}!");
        }
    }

    #[test]
    fn preconditions_are_domain_errors() {
        assert_eq!(factorial(&zz(-1)), Err(Error::Value));
        let huge = crate::shift::mul_2exp(&zz(1), 1000).unwrap();
        assert_eq!(factorial(&huge), Err(Error::Value));
        assert_eq!(double_factorial(&zz(-3)), Err(Error::Value));
        assert_eq!(fibonacci(&zz(-1)), Err(Error::Value));
        assert_eq!(comb(&zz(-4), &zz(2)), Err(Error::Value));
        assert_eq!(perm(&zz(4), &zz(-2)), Err(Error::Value));
    }

    #[test]
    fn double_factorials_interleave() {
        assert_eq!(double_factorial(&zz(0)).unwrap(), zz(1));
        assert_eq!(double_factorial(&zz(1)).unwrap(), zz(1));
        assert_eq!(double_factorial(&zz(9)).unwrap(), zz(945));
        assert_eq!(double_factorial(&zz(10)).unwrap(), zz(3840));
    }

    #[test]
    fn fibonacci_matches_the_recurrence() {
        let mut a = Zz::zero();
        let mut b = zz(1);
        for n in 0..90 {
            assert_eq!(fibonacci(&zz(n)).unwrap(), a, "F({n})");
            let next = arith::add(&a, &b).unwrap();
            a = core::mem::replace(&mut b, next);
        }
    }

    #[test]
    fn binomials() {
        assert_eq!(comb(&zz(10), &zz(3)).unwrap(), zz(120));
        assert_eq!(comb(&zz(10), &zz(7)).unwrap(), zz(120));
        assert_eq!(comb(&zz(3), &zz(10)).unwrap(), Zz::zero());
        assert_eq!(comb(&zz(0), &zz(0)).unwrap(), zz(1));
        assert_eq!(perm(&zz(10), &zz(3)).unwrap(), zz(720));
        assert_eq!(perm(&zz(10), &zz(0)).unwrap(), zz(1));
        assert_eq!(perm(&zz(3), &zz(10)).unwrap(), Zz::zero());
        // Huge n with a constant k stays a short product.
        let n = zz(1_000_000_007);
        let c2 = comb(&n, &zz(2)).unwrap();
        assert_eq!(c2, mul_u64(&zz(500_000_003), 1_000_000_007).unwrap());
    }
}
