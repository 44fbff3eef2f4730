//! Hashing that agrees with the embedding host's integer hash.
//!
//! The host hashes integers by reduction modulo the Mersenne prime
//! `2^61 - 1`, keeps the sign, and nudges `-1` to `-2` (the host reserves
//! `-1` as an error marker). [`Int`]'s `Hash` feeds exactly that value, so
//! `hash(Int::from(n)) == hash(n)` for every host-representable `n`.

use std::hash::{Hash, Hasher};

use crate::int::Int;

/// Modulus of the host's integer hash.
pub const HASH_MODULUS: u64 = (1 << 61) - 1;

/// The host's hash of an arbitrary-precision integer.
pub fn host_hash(x: &Int) -> i64 {
    // 2^64 ≡ 2^3 (mod 2^61 - 1), so digits fold in from the top with one
    // wide reduction per digit.
    let mut acc: u64 = 0;
    for &digit in x.as_zz().digits().iter().rev() {
        acc = (((u128::from(acc) << 64) | u128::from(digit)) % u128::from(HASH_MODULUS)) as u64;
    }
    let mut h = acc as i64;
    if x.is_negative() {
        h = -h;
    }
    if h == -1 {
        h = -2;
    }
    h
}

/// The host's hash of a machine integer; the reference [`host_hash`] must
/// agree with.
pub fn host_hash_i64(v: i64) -> i64 {
    let mut h = (v.unsigned_abs() % HASH_MODULUS) as i64;
    if v < 0 {
        h = -h;
    }
    if h == -1 {
        h = -2;
    }
    h
}

impl Hash for Int {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i64(host_hash(self));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agrees_with_the_machine_integer_hash() {
        for v in [
            0i64,
            1,
            -1,
            -2,
            123,
            -123,
            i64::from(i32::MAX),
            i64::MAX,
            i64::MIN,
            (1 << 61) - 1,
            1 << 61,
            -(1 << 61),
        ] {
            assert_eq!(host_hash(&Int::from(v)), host_hash_i64(v), "{v}");
        }
    }

    #[test]
    fn known_reductions() {
        assert_eq!(host_hash(&Int::from(0)), 0);
        assert_eq!(host_hash(&Int::from(-1)), -2);
        assert_eq!(host_hash(&(Int::from(1) << 61)), 1);
        assert_eq!(host_hash(&(Int::from(1) << 122)), 1);
        let m = Int::from(HASH_MODULUS);
        assert_eq!(host_hash(&m), 0);
        assert_eq!(host_hash(&(&m + 5)), 5);
        assert_eq!(host_hash(&-(&m + 5)), -5);
    }
}
