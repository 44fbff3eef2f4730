//! Allocation discipline of the engine.
//!
//! Every digit buffer the kernels create is reserved through this module, so
//! allocation failure is always observable as [`Error::Memory`] and never an
//! abort. [`setup`] installs a process-wide allocation policy and [`finish`]
//! drains the internal caches, after which the library may be torn down or
//! reconfigured.

use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::digit::{Digit, MAX_DIGITS};
use crate::error::{Error, Result};

static DIGIT_CAP: AtomicUsize = AtomicUsize::new(MAX_DIGITS);

#[cfg(feature = "test-helpers")]
static FAIL_COUNTDOWN: core::sync::atomic::AtomicI64 =
    core::sync::atomic::AtomicI64::new(-1);

/// Process-wide allocation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Largest digit count a single value may be grown to.
    pub max_digits: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_digits: MAX_DIGITS,
        }
    }
}

/// Install the allocation policy. `None` restores the defaults.
pub fn setup(config: Option<Config>) -> Result<()> {
    let config = config.unwrap_or_default();
    if config.max_digits == 0 || config.max_digits > MAX_DIGITS {
        return Err(Error::Value);
    }
    DIGIT_CAP.store(config.max_digits, Ordering::SeqCst);
    Ok(())
}

/// Drop internal caches and restore the default policy.
pub fn finish() {
    DIGIT_CAP.store(MAX_DIGITS, Ordering::SeqCst);
    crate::special::drain_memo();
}

/// Arrange for every allocation after the next `n` to fail.
///
/// Fault injection used by the allocation-discipline tests; cleared by
/// [`allocations_succeed`].
#[cfg(feature = "test-helpers")]
pub fn fail_allocations_after(n: i64) {
    FAIL_COUNTDOWN.store(n, Ordering::SeqCst);
}

/// Clear the fault injected by [`fail_allocations_after`].
#[cfg(feature = "test-helpers")]
pub fn allocations_succeed() {
    FAIL_COUNTDOWN.store(-1, Ordering::SeqCst);
}

fn charge(digits: usize) -> Result<()> {
    if digits > DIGIT_CAP.load(Ordering::Relaxed) {
        return Err(Error::Memory);
    }
    #[cfg(feature = "test-helpers")]
    {
        // Negative countdown means no fault is armed; zero fails every
        // subsequent request until the fault is cleared.
        let left = FAIL_COUNTDOWN.load(Ordering::SeqCst);
        if left == 0 {
            return Err(Error::Memory);
        }
        if left > 0 {
            FAIL_COUNTDOWN.fetch_sub(1, Ordering::SeqCst);
        }
    }
    Ok(())
}

/// Allocate an empty digit vector able to hold `capacity` digits.
pub(crate) fn digits_with_capacity(capacity: usize) -> Result<Vec<Digit>> {
    charge(capacity)?;
    let mut v = Vec::new();
    v.try_reserve_exact(capacity)?;
    Ok(v)
}

/// Allocate a digit vector of `len` zero digits.
pub(crate) fn digits_zeroed(len: usize) -> Result<Vec<Digit>> {
    let mut v = digits_with_capacity(len)?;
    v.resize(len, 0);
    Ok(v)
}

/// Grow `v` so it can hold `extra` more digits.
pub(crate) fn grow_digits(v: &mut Vec<Digit>, extra: usize) -> Result<()> {
    let total = v.len().checked_add(extra).ok_or(Error::Memory)?;
    charge(total)?;
    v.try_reserve_exact(extra)?;
    Ok(())
}

/// Allocate an empty byte vector for the codecs.
pub(crate) fn bytes_with_capacity(capacity: usize) -> Result<Vec<u8>> {
    charge(capacity.div_ceil(crate::digit::DIGIT_BYTES))?;
    let mut v = Vec::new();
    v.try_reserve_exact(capacity)?;
    Ok(v)
}

/// Allocate an empty string buffer for the codecs.
pub(crate) fn string_with_capacity(capacity: usize) -> Result<alloc::string::String> {
    charge(capacity.div_ceil(crate::digit::DIGIT_BYTES))?;
    let mut s = alloc::string::String::new();
    s.try_reserve_exact(capacity)?;
    Ok(s)
}
