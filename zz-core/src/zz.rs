//! The arbitrary-precision signed integer value.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::buffer;
use crate::digit::Digit;
use crate::error::Result;
use crate::mem;

/// A signed integer of arbitrary magnitude.
///
/// The magnitude is a little-endian digit vector whose top digit is always
/// nonzero; zero is the empty vector with a positive sign. Values are
/// immutable once returned by a kernel, so sharing them across threads needs
/// no synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Zz {
    pub(crate) negative: bool,
    pub(crate) digits: Vec<Digit>,
}

impl Zz {
    /// The zero value. Allocation free.
    pub const fn zero() -> Self {
        Zz {
            negative: false,
            digits: Vec::new(),
        }
    }

    /// Build a value from a sign and a raw digit vector, restoring the
    /// canonical form.
    pub(crate) fn from_raw(negative: bool, mut digits: Vec<Digit>) -> Self {
        buffer::normalize(&mut digits);
        let negative = negative && !digits.is_empty();
        Zz { negative, digits }
    }

    /// Construct from a host machine integer.
    pub fn from_i64(v: i64) -> Result<Self> {
        let negative = v < 0;
        Self::from_mag_u64(negative, v.unsigned_abs())
    }

    /// Construct from an unsigned host machine integer.
    pub fn from_u64(v: u64) -> Result<Self> {
        Self::from_mag_u64(false, v)
    }

    /// Construct from a double-width host integer.
    pub fn from_i128(v: i128) -> Result<Self> {
        Self::from_mag_u128(v < 0, v.unsigned_abs())
    }

    /// Construct from an unsigned double-width host integer.
    pub fn from_u128(v: u128) -> Result<Self> {
        Self::from_mag_u128(false, v)
    }

    pub(crate) fn from_mag_u64(negative: bool, mag: u64) -> Result<Self> {
        if mag == 0 {
            return Ok(Zz::zero());
        }
        let mut digits = mem::digits_with_capacity(1)?;
        digits.push(mag);
        Ok(Zz { negative, digits })
    }

    pub(crate) fn from_mag_u128(negative: bool, mag: u128) -> Result<Self> {
        if mag <= u128::from(u64::MAX) {
            return Self::from_mag_u64(negative, mag as u64);
        }
        let mut digits = mem::digits_with_capacity(2)?;
        digits.push(mag as Digit);
        digits.push((mag >> 64) as Digit);
        Ok(Zz { negative, digits })
    }

    /// Fallible copy.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Zz {
            negative: self.negative,
            digits: buffer::try_to_vec(&self.digits)?,
        })
    }

    /// True when the value is zero.
    pub fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    /// True when the value is strictly negative.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Sign of the value: `-1`, `0` or `+1`.
    pub fn signum(&self) -> i32 {
        if self.digits.is_empty() {
            0
        } else if self.negative {
            -1
        } else {
            1
        }
    }

    /// Count of significant digits.
    pub fn size(&self) -> usize {
        self.digits.len()
    }

    /// Read-only view of the magnitude digits, least significant first.
    pub fn digits(&self) -> &[Digit] {
        &self.digits
    }

    /// Number of bits in the magnitude; 0 for zero.
    pub fn bit_length(&self) -> u64 {
        buffer::bit_length_mag(&self.digits)
    }

    /// The value as an `i64`, when it fits.
    pub fn to_i64(&self) -> Option<i64> {
        match self.digits.as_slice() {
            [] => Some(0),
            [d] if !self.negative && *d <= i64::MAX as u64 => Some(*d as i64),
            [d] if self.negative && *d <= 1 << 63 => Some((*d as i128).wrapping_neg() as i64),
            _ => None,
        }
    }

    /// The value as a `u64`, when it fits.
    pub fn to_u64(&self) -> Option<u64> {
        match self.digits.as_slice() {
            [] => Some(0),
            [d] if !self.negative => Some(*d),
            _ => None,
        }
    }

    /// The magnitude as a `u128`, when it fits.
    pub(crate) fn mag_u128(&self) -> Option<u128> {
        match self.digits.as_slice() {
            [] => Some(0),
            [lo] => Some(u128::from(*lo)),
            [lo, hi] => Some(u128::from(*hi) << 64 | u128::from(*lo)),
            _ => None,
        }
    }

    /// Compare against a small host integer without allocating.
    pub fn cmp_i32(&self, v: i32) -> Ordering {
        let v_negative = v < 0;
        match (self.signum(), v.signum()) {
            (a, b) if a != b => a.cmp(&b),
            (0, 0) => Ordering::Equal,
            _ => {
                let mag = u64::from(v.unsigned_abs());
                let this = match self.digits.as_slice() {
                    [d] => d.cmp(&mag),
                    _ => Ordering::Greater,
                };
                if v_negative {
                    this.reverse()
                } else {
                    this
                }
            }
        }
    }
}

impl Default for Zz {
    fn default() -> Self {
        Zz::zero()
    }
}

impl Ord for Zz {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => buffer::cmp_mag(&self.digits, &other.digits),
            (true, true) => buffer::cmp_mag(&other.digits, &self.digits),
        }
    }
}

impl PartialOrd for Zz {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(feature = "random")]
impl Zz {
    /// A uniformly random value of at most `bits` bits, either sign.
    pub fn random<R: rand::Rng + ?Sized>(rng: &mut R, bits: u64) -> Result<Self> {
        let whole = (bits / 64) as usize;
        let top = (bits % 64) as u32;
        let mut digits = mem::digits_zeroed(whole + usize::from(top > 0))?;
        rng.fill(digits.as_mut_slice());
        if top > 0 {
            let last = digits.last_mut().expect("top digit present");
            *last &= (1 << top) - 1;
        }
        Ok(Zz::from_raw(rng.gen(), digits))
    }
}
