//! Error types for the cipher, authenticator and AEAD layers.
//!
//! Every variant here is a *usage* error: a wrong-sized key, an unsupported
//! nonce, a destination buffer of the wrong length, or a request that would
//! run the block counter past its domain. These are programmer mistakes and
//! surface synchronously at the call that triggered them.
//!
//! Authentication failure is deliberately **not** part of this enum. A
//! rejected `open` is reported as `Ok(None)` so callers handle it as an
//! opaque "reject" rather than branching on error detail.

use thiserror::Error;

/// Usage error raised by the primitives in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Key material does not have the required length.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Nonce length is not accepted by the selected construction.
    #[error("invalid nonce length: expected {expected} bytes, got {actual}")]
    InvalidNonceLength {
        expected: &'static str,
        actual: usize,
    },

    /// Destination buffer does not have exactly the required length.
    #[error("invalid output length: expected {expected} bytes, got {actual}")]
    InvalidOutputLength { expected: usize, actual: usize },

    /// The request would wrap the block counter of the chosen variant.
    #[error("block counter overflow")]
    CounterOverflow,
}

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
