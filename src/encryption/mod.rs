//! Authenticated encryption with associated data.
//!
//! This module defines the [`Aead`] contract shared by every AEAD in the
//! crate and provides the ChaCha20-Poly1305 family (RFC 8439) behind it:
//!
//! - [`ChaCha20Poly1305`]: 12-byte nonces, IETF ChaCha20
//! - [`XChaCha20Poly1305`]: 24-byte nonces, HChaCha20 subkey + ChaCha20
//!
//! # Outcomes
//!
//! - Usage errors (bad key/nonce/destination length, oversized input) are
//!   returned as `Err(`[`crate::Error`]`)`.
//! - A forged or corrupted message is returned as `Ok(None)` from the
//!   `open` family. No plaintext is released and the destination buffer is
//!   left untouched.
//!
//! Nonce reuse with the same key is catastrophic and is not detected.

mod chacha20poly1305;

pub use chacha20poly1305::{ChaCha20Poly1305, XChaCha20Poly1305};

use crate::error::Result;

/// Common interface of the AEAD constructions.
///
/// Sealed messages are laid out as `ciphertext || tag`, so a sealed
/// message is always `TAG_LENGTH` bytes longer than its plaintext.
///
/// `associated_data` of `None` and `Some(&[])` are equivalent.
pub trait Aead {
    /// Key length in bytes.
    const KEY_LENGTH: usize;

    /// Nonce length in bytes.
    const NONCE_LENGTH: usize;

    /// Tag length in bytes.
    const TAG_LENGTH: usize;

    /// Encrypts and authenticates `plaintext` into `dst`.
    ///
    /// `dst` must be exactly `plaintext.len() + TAG_LENGTH` bytes long.
    fn seal_to(
        &self,
        nonce: &[u8],
        plaintext: &[u8],
        associated_data: Option<&[u8]>,
        dst: &mut [u8],
    ) -> Result<()>;

    /// Verifies and decrypts `sealed` into `dst`.
    ///
    /// Returns `Ok(None)` if authentication fails or `sealed` is shorter
    /// than a tag. Otherwise `dst` must be exactly
    /// `sealed.len() - TAG_LENGTH` bytes long; it is written only after
    /// the tag has been verified.
    fn open_to<'d>(
        &self,
        nonce: &[u8],
        sealed: &[u8],
        associated_data: Option<&[u8]>,
        dst: &'d mut [u8],
    ) -> Result<Option<&'d [u8]>>;

    /// Wipes the key held by this object.
    fn clean(&mut self) -> &mut Self;

    /// Encrypts and authenticates `plaintext`, returning `ciphertext || tag`.
    fn seal(
        &self,
        nonce: &[u8],
        plaintext: &[u8],
        associated_data: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        let mut out = vec![0u8; plaintext.len() + Self::TAG_LENGTH];
        self.seal_to(nonce, plaintext, associated_data, &mut out)?;
        Ok(out)
    }

    /// Verifies and decrypts `ciphertext || tag`.
    ///
    /// Returns `Ok(None)` on authentication failure. Usage errors, such as
    /// a wrong nonce length, are reported even when `sealed` is shorter
    /// than a tag.
    fn open(
        &self,
        nonce: &[u8],
        sealed: &[u8],
        associated_data: Option<&[u8]>,
    ) -> Result<Option<Vec<u8>>> {
        let mut out = vec![0u8; sealed.len().saturating_sub(Self::TAG_LENGTH)];
        let authentic = self
            .open_to(nonce, sealed, associated_data, &mut out)?
            .is_some();

        Ok(authentic.then_some(out))
    }
}
