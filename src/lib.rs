//! Host-style arbitrary-precision integer scalars.
//!
//! [`Int`] wraps the `zz-core` kernels in the surface a dynamic-language
//! runtime gives its integers: operator forwarding with floor division,
//! two's-complement bitwise operators, a radix-aware format mini-language,
//! a hash that agrees with the host interpreter, exact float coercions and a
//! thin rational. The kernels themselves never panic; the operator surface
//! panics exactly where machine integers would, and every operation also
//! exists in a `checked_*` form returning [`Result`].
//!
//! ```
//! use zz::Int;
//!
//! let a: Int = "1284673497348563845623546741523784516734".parse().unwrap();
//! let b = Int::from(10).checked_pow(&Int::from(20)).unwrap();
//! assert_eq!((&a % &b).to_string(), "23546741523784516734");
//! ```

mod error;
mod fmt;
mod float;
mod hash;
mod int;
#[cfg(feature = "serde")]
mod pickle;
mod rat;

pub use error::{Error, Result};
pub use fmt::format_int;
pub use hash::{host_hash, host_hash_i64, HASH_MODULUS};
pub use int::Int;
pub use rat::Rat;
pub use zz_core::{layout_info, ByteOrder, Config, LayoutInfo, Round};

use error::map_core;

/// Install the kernel allocation policy; `None` restores the defaults.
pub fn setup(config: Option<Config>) -> Result<()> {
    tracing::debug!(?config, "installing kernel allocation policy");
    zz_core::setup(config).map_err(|e| map_core(e, "invalid allocation policy"))
}

/// Drain the kernel caches and restore the default policy.
pub fn finish() {
    tracing::debug!("draining kernel caches");
    zz_core::finish();
}

/// Version and layout diagnostics: digit bits, digit bytes, pointer bytes
/// and the crate version.
pub fn version_info() -> (u32, usize, usize, &'static str) {
    let layout = layout_info();
    (
        layout.bits_per_digit,
        layout.digit_size,
        std::mem::size_of::<usize>(),
        env!("CARGO_PKG_VERSION"),
    )
}

/// `gcd(a, b) >= 0`.
pub fn gcd(a: &Int, b: &Int) -> Result<Int> {
    zz_core::gcd::gcd(a.as_zz(), b.as_zz())
        .map(Int::from_zz)
        .map_err(|e| map_core(e, "gcd"))
}

/// `(g, x, y)` with `a·x + b·y == g == gcd(a, b)`.
pub fn gcdext(a: &Int, b: &Int) -> Result<(Int, Int, Int)> {
    zz_core::gcd::gcdext(a.as_zz(), b.as_zz())
        .map(|(g, x, y)| (Int::from_zz(g), Int::from_zz(x), Int::from_zz(y)))
        .map_err(|e| map_core(e, "gcdext"))
}

/// `⌊√n⌋`; negative `n` is a domain error.
pub fn isqrt(n: &Int) -> Result<Int> {
    n.isqrt()
}

/// `n!` for `0 <= n <= i64::MAX`.
pub fn factorial(n: &Int) -> Result<Int> {
    zz_core::special::factorial(n.as_zz())
        .map(Int::from_zz)
        .map_err(|e| map_core(e, "factorial() argument must be a nonnegative machine integer"))
}

/// `n!!`, the double factorial.
pub fn double_factorial(n: &Int) -> Result<Int> {
    zz_core::special::double_factorial(n.as_zz())
        .map(Int::from_zz)
        .map_err(|e| map_core(e, "double_factorial() argument must be a nonnegative machine integer"))
}

/// The `n`-th fibonacci number.
pub fn fibonacci(n: &Int) -> Result<Int> {
    zz_core::special::fibonacci(n.as_zz())
        .map(Int::from_zz)
        .map_err(|e| map_core(e, "fibonacci() argument must be a nonnegative machine integer"))
}

/// Binomial coefficient `C(n, k)`.
pub fn comb(n: &Int, k: &Int) -> Result<Int> {
    zz_core::special::comb(n.as_zz(), k.as_zz())
        .map(Int::from_zz)
        .map_err(|e| map_core(e, "comb() arguments must be nonnegative machine integers"))
}

/// Falling factorial `P(n, k)`.
pub fn perm(n: &Int, k: &Int) -> Result<Int> {
    zz_core::special::perm(n.as_zz(), k.as_zz())
        .map(Int::from_zz)
        .map_err(|e| map_core(e, "perm() arguments must be nonnegative machine integers"))
}
