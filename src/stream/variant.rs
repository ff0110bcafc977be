//! Cipher variant selection.
//!
//! The three ChaCha20 flavours differ only in how the last four state words
//! are split between block counter and nonce, and whether an HChaCha20
//! subkey is derived first. The variant is chosen once, by the type of
//! [`Nonce`] the caller constructs, and is never re-inspected per block.

use tracing::debug;
use zeroize::Zeroize;

use crate::error::{Error, Result};

/// Accepted nonce lengths, for error reporting.
const ACCEPTED_NONCE_LENGTHS: &str = "8, 12 or 24";

/// The closed set of ChaCha20 variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Original construction: 64-bit counter, 64-bit nonce.
    ChaCha20,
    /// RFC 8439 construction: 32-bit counter, 96-bit nonce.
    ChaCha20Ietf,
    /// Extended-nonce construction: HChaCha20 subkey, then [`Variant::ChaCha20`].
    XChaCha20,
}

impl Variant {
    /// Nonce length in bytes.
    pub const fn nonce_length(self) -> usize {
        match self {
            Variant::ChaCha20 => 8,
            Variant::ChaCha20Ietf => 12,
            Variant::XChaCha20 => 24,
        }
    }

    /// Largest block counter value a stream may use.
    pub const fn max_counter(self) -> u64 {
        match self {
            Variant::ChaCha20Ietf => u32::MAX as u64,
            Variant::ChaCha20 | Variant::XChaCha20 => u64::MAX,
        }
    }

    /// Human-readable algorithm name.
    pub const fn name(self) -> &'static str {
        match self {
            Variant::ChaCha20 => "ChaCha20",
            Variant::ChaCha20Ietf => "ChaCha20-IETF",
            Variant::XChaCha20 => "XChaCha20",
        }
    }

    /// Resolves a variant from a nonce length.
    pub fn from_nonce_length(len: usize) -> Result<Self> {
        match len {
            8 => Ok(Variant::ChaCha20),
            12 => Ok(Variant::ChaCha20Ietf),
            24 => Ok(Variant::XChaCha20),
            _ => {
                debug!(len, "unsupported ChaCha20 nonce length");
                Err(Error::InvalidNonceLength {
                    expected: ACCEPTED_NONCE_LENGTHS,
                    actual: len,
                })
            }
        }
    }
}

/// A nonce tagged with the variant it selects.
///
/// Nonces are not secret, but they are wiped together with the objects that
/// hold them.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
pub enum Nonce {
    /// 8-byte nonce for [`Variant::ChaCha20`].
    Short([u8; 8]),
    /// 12-byte nonce for [`Variant::ChaCha20Ietf`].
    Ietf([u8; 12]),
    /// 24-byte nonce for [`Variant::XChaCha20`].
    Extended([u8; 24]),
}

impl Nonce {
    /// Builds a nonce from raw bytes, inferring the variant from the length.
    ///
    /// Fails with [`Error::InvalidNonceLength`] unless `bytes` is 8, 12 or
    /// 24 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        match Variant::from_nonce_length(bytes.len())? {
            Variant::ChaCha20 => Ok(Nonce::Short(copy_array(bytes))),
            Variant::ChaCha20Ietf => Ok(Nonce::Ietf(copy_array(bytes))),
            Variant::XChaCha20 => Ok(Nonce::Extended(copy_array(bytes))),
        }
    }

    /// Variant selected by this nonce.
    pub fn variant(&self) -> Variant {
        match self {
            Nonce::Short(_) => Variant::ChaCha20,
            Nonce::Ietf(_) => Variant::ChaCha20Ietf,
            Nonce::Extended(_) => Variant::XChaCha20,
        }
    }

    /// Raw nonce bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Nonce::Short(n) => &n[..],
            Nonce::Ietf(n) => &n[..],
            Nonce::Extended(n) => &n[..],
        }
    }
}

impl From<[u8; 8]> for Nonce {
    fn from(value: [u8; 8]) -> Self {
        Nonce::Short(value)
    }
}

impl From<[u8; 12]> for Nonce {
    fn from(value: [u8; 12]) -> Self {
        Nonce::Ietf(value)
    }
}

impl From<[u8; 24]> for Nonce {
    fn from(value: [u8; 24]) -> Self {
        Nonce::Extended(value)
    }
}

impl TryFrom<&[u8]> for Nonce {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        Nonce::from_slice(value)
    }
}

/// Copies a slice whose length has already been checked into an array.
fn copy_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}
