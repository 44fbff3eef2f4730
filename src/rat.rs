//! A thin rational over [`Int`]: a reduced numerator/denominator pair.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::{Error, Result};
use crate::gcd;
use crate::int::Int;

/// A rational number in canonical form: the denominator is positive and
/// coprime with the numerator, and zero is `0/1`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Rat {
    num: Int,
    den: Int,
}

impl Rat {
    /// Build `num/den`, reducing to canonical form. A zero denominator is a
    /// zero-division error.
    pub fn new(num: Int, den: Int) -> Result<Self> {
        if den.is_zero() {
            return Err(Error::ZeroDivision);
        }
        let g = gcd(&num, &den)?;
        let mut num = num.checked_div_floor(&g)?;
        let mut den = den.checked_div_floor(&g)?;
        if den.is_negative() {
            num = -num;
            den = -den;
        }
        Ok(Rat { num, den })
    }

    /// The canonical numerator; carries the sign.
    pub fn numerator(&self) -> &Int {
        &self.num
    }

    /// The canonical denominator; always positive.
    pub fn denominator(&self) -> &Int {
        &self.den
    }

    /// True when the value is zero.
    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// `self + rhs` without panicking.
    pub fn checked_add(&self, rhs: &Rat) -> Result<Rat> {
        let cross = self.num.checked_mul(&rhs.den)?.checked_add(&rhs.num.checked_mul(&self.den)?)?;
        Rat::new(cross, self.den.checked_mul(&rhs.den)?)
    }

    /// `self - rhs` without panicking.
    pub fn checked_sub(&self, rhs: &Rat) -> Result<Rat> {
        self.checked_add(&-rhs)
    }

    /// `self * rhs` without panicking.
    pub fn checked_mul(&self, rhs: &Rat) -> Result<Rat> {
        Rat::new(
            self.num.checked_mul(&rhs.num)?,
            self.den.checked_mul(&rhs.den)?,
        )
    }

    /// `self / rhs` without panicking.
    pub fn checked_div(&self, rhs: &Rat) -> Result<Rat> {
        if rhs.is_zero() {
            return Err(Error::ZeroDivision);
        }
        Rat::new(
            self.num.checked_mul(&rhs.den)?,
            self.den.checked_mul(&rhs.num)?,
        )
    }

    /// The nearest float.
    pub fn to_f64(&self) -> Result<f64> {
        self.num.div_to_f64(&self.den)
    }
}

impl From<Int> for Rat {
    fn from(v: Int) -> Self {
        Rat {
            num: v,
            den: Int::from(1),
        }
    }
}

impl From<i64> for Rat {
    fn from(v: i64) -> Self {
        Rat::from(Int::from(v))
    }
}

impl fmt::Display for Rat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl fmt::Debug for Rat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rat({self})")
    }
}

impl PartialOrd for Rat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rat {
    fn cmp(&self, other: &Self) -> Ordering {
        // Denominators are positive, so cross multiplication preserves
        // the order.
        let lhs = &self.num * &other.den;
        let rhs = &other.num * &self.den;
        lhs.cmp(&rhs)
    }
}

macro_rules! rat_binop {
    ($trait:ident, $method:ident, $checked:ident) => {
        impl $trait<&Rat> for &Rat {
            type Output = Rat;

            fn $method(self, rhs: &Rat) -> Rat {
                self.$checked(rhs).unwrap_or_else(|e| panic!("{e}"))
            }
        }

        impl $trait<Rat> for Rat {
            type Output = Rat;

            fn $method(self, rhs: Rat) -> Rat {
                (&self).$method(&rhs)
            }
        }

        impl $trait<Rat> for &Rat {
            type Output = Rat;

            fn $method(self, rhs: Rat) -> Rat {
                self.$method(&rhs)
            }
        }

        impl $trait<&Rat> for Rat {
            type Output = Rat;

            fn $method(self, rhs: &Rat) -> Rat {
                (&self).$method(rhs)
            }
        }
    };
}

rat_binop!(Add, add, checked_add);
rat_binop!(Sub, sub, checked_sub);
rat_binop!(Mul, mul, checked_mul);
rat_binop!(Div, div, checked_div);

impl Neg for &Rat {
    type Output = Rat;

    fn neg(self) -> Rat {
        Rat {
            num: -&self.num,
            den: self.den.clone(),
        }
    }
}

impl Neg for Rat {
    type Output = Rat;

    fn neg(self) -> Rat {
        -&self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rat(n: i64, d: i64) -> Rat {
        Rat::new(Int::from(n), Int::from(d)).unwrap()
    }

    #[test]
    fn construction_reduces_to_canonical_form() {
        let r = rat(6, -8);
        assert_eq!(r.numerator(), &Int::from(-3));
        assert_eq!(r.denominator(), &Int::from(4));
        assert_eq!(rat(0, 5), rat(0, -17));
        assert_eq!(Rat::new(Int::from(1), Int::ZERO), Err(Error::ZeroDivision));
    }

    #[test]
    fn arithmetic_matches_fraction_semantics() {
        assert_eq!(rat(1, 2) + rat(1, 3), rat(5, 6));
        assert_eq!(rat(1, 2) - rat(1, 3), rat(1, 6));
        assert_eq!(rat(2, 3) * rat(3, 4), rat(1, 2));
        assert_eq!(rat(1, 2) / rat(3, 2), rat(1, 3));
        assert_eq!(rat(1, 2).checked_div(&rat(0, 1)), Err(Error::ZeroDivision));
        assert_eq!(-rat(3, 7), rat(-3, 7));
    }

    #[test]
    fn ordering_crosses_multiplies() {
        assert!(rat(1, 3) < rat(1, 2));
        assert!(rat(-1, 2) < rat(-1, 3));
        assert!(rat(7, 1) > rat(13, 2));
    }

    #[test]
    fn rendering() {
        assert_eq!(rat(3, 4).to_string(), "3/4");
        assert_eq!(rat(-3, 4).to_string(), "-3/4");
        assert_eq!(rat(8, 4).to_string(), "2");
        assert_eq!(format!("{:?}", rat(1, 2)), "Rat(1/2)");
        assert_eq!(rat(1, 2).to_f64().unwrap(), 0.5);
    }
}
