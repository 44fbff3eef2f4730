//! The host-facing integer scalar.
//!
//! [`Int`] wraps the kernel value and forwards the host language's operator
//! surface onto it: arithmetic with floor division, two's-complement bitwise
//! operators, shifts, comparisons and radix formatting. Operators panic the
//! way the built-in machine integers do (division by zero, exhausted
//! memory); the `checked_*` methods surface the same conditions as values.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, Shr, Sub, SubAssign,
};
use std::str::FromStr;

use zz_core::{arith, bits, bytes, div, mul, parse, pow, shift, sqrt, to_str};
use zz_core::{ByteOrder, Round, Zz};

use crate::error::{map_core, Error, Result};

/// An arbitrary-precision signed integer with the host's operator surface.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Int(pub(crate) Zz);

impl Int {
    /// The zero value.
    pub const ZERO: Int = Int(Zz::zero());

    pub(crate) fn from_zz(z: Zz) -> Self {
        Int(z)
    }

    /// Borrow the kernel value.
    pub fn as_zz(&self) -> &Zz {
        &self.0
    }

    /// Decode a digit string in `base` (0 auto-detects a radix prefix).
    pub fn from_str_base(s: &str, base: u32) -> Result<Self> {
        parse::from_str(s, base)
            .map(Int)
            .map_err(|e| map_core(e, "invalid digit string"))
    }

    /// Encode in `base` (`2..=36`), optionally with a radix prefix.
    pub fn to_string_base(&self, base: u32, prefix: bool) -> Result<String> {
        to_str::to_str(&self.0, base, prefix).map_err(|e| map_core(e, "invalid base"))
    }

    /// Decode a byte array.
    pub fn from_bytes(buf: &[u8], order: ByteOrder, signed: bool) -> Result<Self> {
        bytes::from_bytes(buf, order, signed)
            .map(Int)
            .map_err(|e| map_core(e, "invalid byte array"))
    }

    /// Encode into exactly `len` bytes; [`Error::Overflow`] when the value
    /// does not fit.
    pub fn to_bytes(&self, len: usize, order: ByteOrder, signed: bool) -> Result<Vec<u8>> {
        bytes::to_bytes(&self.0, len, order, signed)
            .map_err(|e| map_core(e, "invalid byte length"))
    }

    /// Minimal big-endian bytes of the magnitude; empty for zero.
    pub fn magnitude_bytes(&self) -> Result<Vec<u8>> {
        let len = self.0.bit_length().div_ceil(8) as usize;
        let mag = arith::abs(&self.0).map_err(|e| map_core(e, "abs"))?;
        bytes::to_bytes(&mag, len, ByteOrder::Big, false).map_err(|e| map_core(e, "magnitude"))
    }

    /// Sign of the value: -1, 0 or +1.
    pub fn signum(&self) -> i32 {
        self.0.signum()
    }

    /// True when the value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// True when the value is strictly negative.
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Bits in the magnitude; 0 for zero.
    pub fn bit_length(&self) -> u64 {
        self.0.bit_length()
    }

    /// Set bits in the magnitude.
    pub fn bit_count(&self) -> u64 {
        bits::bit_count(&self.0)
    }

    /// Position of the lowest set bit; `None` for zero.
    pub fn lowest_set_bit(&self) -> Option<u64> {
        if self.is_zero() {
            None
        } else {
            Some(bits::lsbpos(&self.0, 0))
        }
    }

    /// `|self|`.
    pub fn abs(&self) -> Int {
        Int(arith::abs(&self.0).unwrap_or_else(|e| panic!("{e}")))
    }

    /// `self + rhs` without panicking.
    pub fn checked_add(&self, rhs: &Int) -> Result<Int> {
        arith::add(&self.0, &rhs.0).map(Int).map_err(|e| map_core(e, "add"))
    }

    /// `self - rhs` without panicking.
    pub fn checked_sub(&self, rhs: &Int) -> Result<Int> {
        arith::sub(&self.0, &rhs.0).map(Int).map_err(|e| map_core(e, "sub"))
    }

    /// `self * rhs` without panicking.
    pub fn checked_mul(&self, rhs: &Int) -> Result<Int> {
        mul::mul(&self.0, &rhs.0).map(Int).map_err(|e| map_core(e, "mul"))
    }

    /// Floor quotient and remainder in one division.
    pub fn checked_divmod(&self, rhs: &Int) -> Result<(Int, Int)> {
        if rhs.is_zero() {
            return Err(Error::ZeroDivision);
        }
        div::divrem(&self.0, &rhs.0, Round::Floor)
            .map(|(q, r)| (Int(q), Int(r)))
            .map_err(|e| map_core(e, "divmod"))
    }

    /// `⌊self / rhs⌋`, the host's `//`.
    pub fn checked_div_floor(&self, rhs: &Int) -> Result<Int> {
        Ok(self.checked_divmod(rhs)?.0)
    }

    /// `self mod rhs` with the divisor's sign, the host's `%`.
    pub fn checked_rem_floor(&self, rhs: &Int) -> Result<Int> {
        Ok(self.checked_divmod(rhs)?.1)
    }

    /// Quotient rounded to nearest, ties to the even quotient.
    pub fn div_round_nearest(&self, rhs: &Int) -> Result<Int> {
        if rhs.is_zero() {
            return Err(Error::ZeroDivision);
        }
        div::divrem(&self.0, &rhs.0, Round::Nearest)
            .map(|(q, _)| Int(q))
            .map_err(|e| map_core(e, "divide"))
    }

    /// `self ^ exp` for `exp >= 0`.
    pub fn checked_pow(&self, exp: &Int) -> Result<Int> {
        pow::pow(&self.0, &exp.0)
            .map(Int)
            .map_err(|e| map_core(e, "exponent out of range"))
    }

    /// `self ^ exp mod m`, with the host convention that a nonzero result
    /// takes the modulus sign.
    pub fn checked_powmod(&self, exp: &Int, m: &Int) -> Result<Int> {
        if m.is_zero() {
            return Err(Error::ZeroDivision);
        }
        let r = pow::powm(&self.0, &exp.0, &m.0)
            .map(Int)
            .map_err(|e| map_core(e, "base is not invertible for the given modulus"))?;
        if m.is_negative() && !r.is_zero() {
            return r.checked_add(m);
        }
        Ok(r)
    }

    /// `self << count` without panicking.
    pub fn checked_shl(&self, count: i64) -> Result<Int> {
        shift::mul_2exp(&self.0, count)
            .map(Int)
            .map_err(|e| map_core(e, "invalid shift count"))
    }

    /// `self >> count` (arithmetic) without panicking.
    pub fn checked_shr(&self, count: i64) -> Result<Int> {
        shift::quo_2exp(&self.0, count)
            .map(Int)
            .map_err(|e| map_core(e, "invalid shift count"))
    }

    /// `⌊√self⌋`.
    pub fn isqrt(&self) -> Result<Int> {
        Ok(self.sqrtrem()?.0)
    }

    /// `(s, r)` with `s = ⌊√self⌋` and `r = self - s²`.
    pub fn sqrtrem(&self) -> Result<(Int, Int)> {
        sqrt::sqrtrem(&self.0)
            .map(|(s, r)| (Int(s), Int(r)))
            .map_err(|e| map_core(e, "square root of a negative number"))
    }

    /// Round to the nearest multiple of `10^-ndigits`, ties to even; the
    /// host's two-argument `round`. Nonnegative `ndigits` is the identity.
    pub fn round(&self, ndigits: i32) -> Result<Int> {
        if ndigits >= 0 || self.is_zero() {
            return Ok(self.clone());
        }
        let scale = Int::from(10u8).checked_pow(&Int::from(ndigits.unsigned_abs()))?;
        let q = self.div_round_nearest(&scale)?;
        q.checked_mul(&scale)
    }

    /// The value as an `i64`, when it fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.0.to_i64()
    }
}

impl fmt::Debug for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Int({self})")
    }
}

macro_rules! radix_display {
    ($trait:ident, $base:expr, $prefix:expr) => {
        impl fmt::$trait for Int {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mag = arith::abs(&self.0)?;
                let s = to_str::to_str(&mag, $base, false)?;
                f.pad_integral(!self.is_negative(), $prefix, &s)
            }
        }
    };
}

radix_display!(Display, 10, "");
radix_display!(Binary, 2, "0b");
radix_display!(Octal, 8, "0o");

impl fmt::LowerHex for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mag = arith::abs(&self.0)?;
        let s = to_str::to_str(&mag, 16, false)?;
        f.pad_integral(!self.is_negative(), "0x", &s)
    }
}

impl fmt::UpperHex for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mag = arith::abs(&self.0)?;
        let s = to_str::to_str(&mag, 16, false)?.to_ascii_uppercase();
        f.pad_integral(!self.is_negative(), "0X", &s)
    }
}

impl FromStr for Int {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Int::from_str_base(s, 10)
    }
}

macro_rules! from_small {
    ($($t:ty),*) => {$(
        impl From<$t> for Int {
            fn from(v: $t) -> Self {
                Int(Zz::from_i64(i64::from(v)).unwrap_or_else(|e| panic!("{e}")))
            }
        }
    )*};
}

from_small!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Int {
    fn from(v: u64) -> Self {
        Int(Zz::from_u64(v).unwrap_or_else(|e| panic!("{e}")))
    }
}

impl From<usize> for Int {
    fn from(v: usize) -> Self {
        Int::from(v as u64)
    }
}

impl From<isize> for Int {
    fn from(v: isize) -> Self {
        Int::from(v as i64)
    }
}

impl From<i128> for Int {
    fn from(v: i128) -> Self {
        Int(Zz::from_i128(v).unwrap_or_else(|e| panic!("{e}")))
    }
}

impl From<u128> for Int {
    fn from(v: u128) -> Self {
        Int(Zz::from_u128(v).unwrap_or_else(|e| panic!("{e}")))
    }
}

impl TryFrom<&Int> for i64 {
    type Error = Error;

    fn try_from(v: &Int) -> Result<Self> {
        v.0.to_i64().ok_or(Error::Overflow)
    }
}

impl TryFrom<&Int> for u64 {
    type Error = Error;

    fn try_from(v: &Int) -> Result<Self> {
        v.0.to_u64().ok_or(Error::Overflow)
    }
}

impl TryFrom<&Int> for i128 {
    type Error = Error;

    fn try_from(v: &Int) -> Result<Self> {
        let mag = match v.0.digits() {
            [] => 0u128,
            [lo] => u128::from(*lo),
            [lo, hi] => (u128::from(*hi) << 64) | u128::from(*lo),
            _ => return Err(Error::Overflow),
        };
        if v.is_negative() {
            if mag > i128::MIN.unsigned_abs() {
                return Err(Error::Overflow);
            }
            Ok((mag as i128).wrapping_neg())
        } else {
            i128::try_from(mag).map_err(|_| Error::Overflow)
        }
    }
}

impl PartialEq<i32> for Int {
    fn eq(&self, other: &i32) -> bool {
        self.0.cmp_i32(*other) == Ordering::Equal
    }
}

impl PartialOrd<i32> for Int {
    fn partial_cmp(&self, other: &i32) -> Option<Ordering> {
        Some(self.0.cmp_i32(*other))
    }
}

macro_rules! binop {
    ($trait:ident, $method:ident, $checked:ident) => {
        impl $trait<&Int> for &Int {
            type Output = Int;

            fn $method(self, rhs: &Int) -> Int {
                self.$checked(rhs).unwrap_or_else(|e| panic!("{e}"))
            }
        }

        impl $trait<Int> for &Int {
            type Output = Int;

            fn $method(self, rhs: Int) -> Int {
                self.$method(&rhs)
            }
        }

        impl $trait<&Int> for Int {
            type Output = Int;

            fn $method(self, rhs: &Int) -> Int {
                (&self).$method(rhs)
            }
        }

        impl $trait<Int> for Int {
            type Output = Int;

            fn $method(self, rhs: Int) -> Int {
                (&self).$method(&rhs)
            }
        }

        impl $trait<i64> for &Int {
            type Output = Int;

            fn $method(self, rhs: i64) -> Int {
                self.$method(&Int::from(rhs))
            }
        }

        impl $trait<i64> for Int {
            type Output = Int;

            fn $method(self, rhs: i64) -> Int {
                (&self).$method(&Int::from(rhs))
            }
        }

        impl $trait<&Int> for i64 {
            type Output = Int;

            fn $method(self, rhs: &Int) -> Int {
                Int::from(self).$method(rhs)
            }
        }

        impl $trait<Int> for i64 {
            type Output = Int;

            fn $method(self, rhs: Int) -> Int {
                Int::from(self).$method(&rhs)
            }
        }
    };
}

binop!(Add, add, checked_add);
binop!(Sub, sub, checked_sub);
binop!(Mul, mul, checked_mul);
binop!(Div, div, checked_div_floor);
binop!(Rem, rem, checked_rem_floor);

macro_rules! bit_binop {
    ($trait:ident, $method:ident, $kernel:path) => {
        impl $trait<&Int> for &Int {
            type Output = Int;

            fn $method(self, rhs: &Int) -> Int {
                $kernel(&self.0, &rhs.0)
                    .map(Int)
                    .unwrap_or_else(|e| panic!("{e}"))
            }
        }

        impl $trait<Int> for &Int {
            type Output = Int;

            fn $method(self, rhs: Int) -> Int {
                self.$method(&rhs)
            }
        }

        impl $trait<&Int> for Int {
            type Output = Int;

            fn $method(self, rhs: &Int) -> Int {
                (&self).$method(rhs)
            }
        }

        impl $trait<Int> for Int {
            type Output = Int;

            fn $method(self, rhs: Int) -> Int {
                (&self).$method(&rhs)
            }
        }
    };
}

bit_binop!(BitAnd, bitand, bits::and);
bit_binop!(BitOr, bitor, bits::or);
bit_binop!(BitXor, bitxor, bits::xor);

macro_rules! assignop {
    ($trait:ident, $method:ident, $op:ident) => {
        impl $trait<&Int> for Int {
            fn $method(&mut self, rhs: &Int) {
                *self = (&*self).$op(rhs);
            }
        }

        impl $trait<Int> for Int {
            fn $method(&mut self, rhs: Int) {
                *self = (&*self).$op(&rhs);
            }
        }
    };
}

assignop!(AddAssign, add_assign, add);
assignop!(SubAssign, sub_assign, sub);
assignop!(MulAssign, mul_assign, mul);
assignop!(DivAssign, div_assign, div);
assignop!(RemAssign, rem_assign, rem);
assignop!(BitAndAssign, bitand_assign, bitand);
assignop!(BitOrAssign, bitor_assign, bitor);
assignop!(BitXorAssign, bitxor_assign, bitxor);

impl Neg for &Int {
    type Output = Int;

    fn neg(self) -> Int {
        Int(arith::neg(&self.0).unwrap_or_else(|e| panic!("{e}")))
    }
}

impl Neg for Int {
    type Output = Int;

    fn neg(self) -> Int {
        -&self
    }
}

impl Not for &Int {
    type Output = Int;

    fn not(self) -> Int {
        Int(bits::not(&self.0).unwrap_or_else(|e| panic!("{e}")))
    }
}

impl Not for Int {
    type Output = Int;

    fn not(self) -> Int {
        !&self
    }
}

impl Shl<u32> for &Int {
    type Output = Int;

    fn shl(self, count: u32) -> Int {
        self.checked_shl(i64::from(count)).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl Shl<u32> for Int {
    type Output = Int;

    fn shl(self, count: u32) -> Int {
        &self << count
    }
}

impl Shr<u32> for &Int {
    type Output = Int;

    fn shr(self, count: u32) -> Int {
        self.checked_shr(i64::from(count)).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl Shr<u32> for Int {
    type Output = Int;

    fn shr(self, count: u32) -> Int {
        &self >> count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_forward_to_the_kernels() {
        let a = Int::from(-7);
        let b = Int::from(3);
        assert_eq!(&a + &b, Int::from(-4));
        assert_eq!(&a - &b, Int::from(-10));
        assert_eq!(&a * &b, Int::from(-21));
        assert_eq!(&a / &b, Int::from(-3));
        assert_eq!(&a % &b, Int::from(2));
        assert_eq!(-&a, Int::from(7));
        assert_eq!(!&b, Int::from(-4));
        assert_eq!(&a & &b, Int::from(-7 & 3));
        assert_eq!(&a | &b, Int::from(-7 | 3));
        assert_eq!(&a ^ &b, Int::from(-7 ^ 3));
        assert_eq!(Int::from(5) << 3, Int::from(40));
        assert_eq!(Int::from(-5) >> 1, Int::from(-3));
        assert_eq!(7i64 + Int::from(1), Int::from(8));
        assert_eq!(Int::from(1) + 7i64, Int::from(8));
    }

    #[test]
    fn compound_assignment_matches_pure_forms() {
        let mut x = Int::from(10);
        x += Int::from(5);
        x -= Int::from(1);
        x *= Int::from(3);
        x /= Int::from(4);
        assert_eq!(x, Int::from(10));
        x %= Int::from(7);
        assert_eq!(x, Int::from(3));
        x &= Int::from(6);
        x |= Int::from(8);
        x ^= Int::from(1);
        assert_eq!(x, Int::from((3 & 6 | 8) ^ 1));
    }

    #[test]
    #[should_panic(expected = "division or modulo by zero")]
    fn division_by_zero_panics_like_machine_integers() {
        let _ = Int::from(1) / Int::ZERO;
    }

    #[test]
    fn host_division_semantics() {
        assert_eq!(Int::from(-7) / Int::from(2), Int::from(-4));
        assert_eq!(Int::from(-7) % Int::from(2), Int::from(1));
        assert_eq!(Int::from(7) / Int::from(-2), Int::from(-4));
        assert_eq!(Int::from(7) % Int::from(-2), Int::from(-1));
        let (q, r) = Int::from(-7).checked_divmod(&Int::from(2)).unwrap();
        assert_eq!((q, r), (Int::from(-4), Int::from(1)));
    }

    #[test]
    fn powmod_takes_the_modulus_sign() {
        let p = Int::from(3).checked_powmod(&Int::from(2), &Int::from(-7)).unwrap();
        assert_eq!(p, Int::from(-5));
        let p = Int::from(3).checked_powmod(&Int::from(2), &Int::from(7)).unwrap();
        assert_eq!(p, Int::from(2));
        assert_eq!(
            Int::from(2).checked_powmod(&Int::from(5), &Int::ZERO),
            Err(Error::ZeroDivision)
        );
    }

    #[test]
    fn round_is_nearest_even_in_tens() {
        assert_eq!(Int::from(-75).round(-1).unwrap(), Int::from(-80));
        assert_eq!(Int::from(75).round(-1).unwrap(), Int::from(80));
        assert_eq!(Int::from(65).round(-1).unwrap(), Int::from(60));
        assert_eq!(Int::from(123).round(0).unwrap(), Int::from(123));
        assert_eq!(Int::from(123).round(5).unwrap(), Int::from(123));
        assert_eq!(Int::from(1251).round(-2).unwrap(), Int::from(1300));
    }

    #[test]
    fn display_honours_formatter_flags() {
        let x = Int::from(-255);
        assert_eq!(format!("{x}"), "-255");
        assert_eq!(format!("{x:x}"), "-ff");
        assert_eq!(format!("{x:#x}"), "-0xff");
        assert_eq!(format!("{x:#X}"), "-0XFF");
        assert_eq!(format!("{:#b}", Int::from(5)), "0b101");
        assert_eq!(format!("{:08}", Int::from(-255)), "-0000255");
        assert_eq!(format!("{:>6}", Int::from(42)), "    42");
        assert_eq!(format!("{:?}", Int::from(9)), "Int(9)");
    }

    #[test]
    fn narrowing_conversions_check_the_range() {
        assert_eq!(i64::try_from(&Int::from(42)), Ok(42));
        assert_eq!(u64::try_from(&Int::from(-1)), Err(Error::Overflow));
        let big = Int::from(i128::MAX);
        assert_eq!(i128::try_from(&big), Ok(i128::MAX));
        assert_eq!(i64::try_from(&big), Err(Error::Overflow));
        assert_eq!(i128::try_from(&Int::from(i128::MIN)), Ok(i128::MIN));
        let too_big = Int::from(u128::MAX);
        assert_eq!(i128::try_from(&too_big), Err(Error::Overflow));
    }

    #[test]
    fn comparisons_with_machine_words() {
        assert!(Int::from(13) > 1);
        assert!(Int::from(13) < 100);
        assert_eq!(Int::from(-129), -129);
        assert!(Int::from(i128::MAX) > 0);
    }
}
