//! Digit-vector kernels for arbitrary-precision signed integers.
//!
//! Values are sign-magnitude [`Zz`] records over 64-bit digits. Every kernel
//! is a pure function of its operands, every allocation is fallible, and
//! every domain violation comes back as an [`Error`] instead of a panic, so
//! the crate can sit below a language runtime that must never abort.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

#[cfg_attr(test, macro_use)]
extern crate alloc;

pub mod arith;
pub mod bits;
pub mod bytes;
pub mod div;
pub mod gcd;
pub mod mem;
pub mod mul;
pub mod parse;
pub mod pow;
pub mod shift;
pub mod special;
pub mod sqrt;
pub mod to_str;

mod buffer;
mod digit;
mod error;
mod zz;

pub use bytes::ByteOrder;
pub use digit::{
    layout_info,
    Digit,
    DigitOrder,
    Layout,
    LayoutInfo,
    DIGIT_BITS,
    DIGIT_BYTES,
    MAX_BITS,
    MAX_DIGITS,
};
pub use div::Round;
pub use error::{Error, Result};
pub use mem::{finish, setup, Config};
pub use zz::Zz;
