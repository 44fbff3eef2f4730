//! Host-facing error kinds.
//!
//! The kernel codes are mapped to the host exception taxonomy by a fixed
//! table: memory stays memory, a too-small buffer is an overflow, and a
//! domain violation carries the operation's own wording. Division by zero is
//! distinguished before the kernels ever run.

use thiserror::Error;

/// Error surfaced to the embedding host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// An allocation failed inside the kernels.
    #[error("out of memory")]
    Memory,
    /// An argument violates the operation's domain.
    #[error("{0}")]
    Value(&'static str),
    /// Integer division or modulo by zero.
    #[error("integer division or modulo by zero")]
    ZeroDivision,
    /// The result or an argument does not fit the requested width.
    #[error("result out of range")]
    Overflow,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The fixed code-to-exception table.
pub(crate) fn map_core(e: zz_core::Error, what: &'static str) -> Error {
    match e {
        zz_core::Error::Memory => Error::Memory,
        zz_core::Error::Buffer => Error::Overflow,
        zz_core::Error::Value => Error::Value(what),
    }
}
