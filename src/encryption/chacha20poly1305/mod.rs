//! ChaCha20-Poly1305 and XChaCha20-Poly1305 keyed AEAD objects.
//!
//! Both types hold only their 32-byte key. Every call derives its own
//! Poly1305 one-time key from keystream block 0 and wipes it before
//! returning, so one object can seal any number of messages as long as
//! each uses a fresh nonce.

mod compose;

use std::fmt;

use tracing::{debug, trace};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::Aead;
use crate::error::{Error, Result};
use crate::mac::poly1305::{TAG_LENGTH, Tag};
use crate::stream::cipher::check_output_length;
use crate::stream::{KEY_LENGTH, Nonce, key_from_slice};

/// ChaCha20-Poly1305 with 96-bit nonces (RFC 8439).
///
/// At most `(2^32 - 1) * 64` bytes can be sealed under one nonce.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ChaCha20Poly1305 {
    key: [u8; KEY_LENGTH],
}

/// XChaCha20-Poly1305 with 192-bit nonces.
///
/// The nonce is long enough to be drawn at random for every message.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct XChaCha20Poly1305 {
    key: [u8; KEY_LENGTH],
}

impl ChaCha20Poly1305 {
    /// Creates an AEAD object bound to `key`.
    pub fn new(key: &[u8; KEY_LENGTH]) -> Self {
        Self { key: *key }
    }

    /// Creates an AEAD object from an unchecked key slice.
    pub fn new_from_slice(key: &[u8]) -> Result<Self> {
        let key = key_from_slice(key)?;
        Ok(Self::new(&key))
    }

    /// Encrypts `buffer` in place and returns the detached tag.
    pub fn seal_detached(
        &self,
        nonce: &[u8; 12],
        buffer: &mut [u8],
        associated_data: Option<&[u8]>,
    ) -> Result<Tag> {
        compose::seal_in_place(&self.key, &Nonce::Ietf(*nonce), ad(associated_data), buffer)
    }

    /// Verifies `tag` and decrypts `buffer` in place.
    ///
    /// Returns `Ok(None)` and leaves `buffer` untouched on authentication
    /// failure.
    pub fn open_detached<'b>(
        &self,
        nonce: &[u8; 12],
        buffer: &'b mut [u8],
        associated_data: Option<&[u8]>,
        tag: &Tag,
    ) -> Result<Option<&'b [u8]>> {
        open_in_place(&self.key, &Nonce::Ietf(*nonce), associated_data, buffer, tag)
    }
}

impl XChaCha20Poly1305 {
    /// Creates an AEAD object bound to `key`.
    pub fn new(key: &[u8; KEY_LENGTH]) -> Self {
        Self { key: *key }
    }

    /// Creates an AEAD object from an unchecked key slice.
    pub fn new_from_slice(key: &[u8]) -> Result<Self> {
        let key = key_from_slice(key)?;
        Ok(Self::new(&key))
    }

    /// Encrypts `buffer` in place and returns the detached tag.
    pub fn seal_detached(
        &self,
        nonce: &[u8; 24],
        buffer: &mut [u8],
        associated_data: Option<&[u8]>,
    ) -> Result<Tag> {
        compose::seal_in_place(&self.key, &Nonce::Extended(*nonce), ad(associated_data), buffer)
    }

    /// Verifies `tag` and decrypts `buffer` in place.
    ///
    /// Returns `Ok(None)` and leaves `buffer` untouched on authentication
    /// failure.
    pub fn open_detached<'b>(
        &self,
        nonce: &[u8; 24],
        buffer: &'b mut [u8],
        associated_data: Option<&[u8]>,
        tag: &Tag,
    ) -> Result<Option<&'b [u8]>> {
        open_in_place(&self.key, &Nonce::Extended(*nonce), associated_data, buffer, tag)
    }
}

impl Aead for ChaCha20Poly1305 {
    const KEY_LENGTH: usize = KEY_LENGTH;
    const NONCE_LENGTH: usize = 12;
    const TAG_LENGTH: usize = TAG_LENGTH;

    fn seal_to(
        &self,
        nonce: &[u8],
        plaintext: &[u8],
        associated_data: Option<&[u8]>,
        dst: &mut [u8],
    ) -> Result<()> {
        let nonce = Nonce::Ietf(nonce_array(nonce, "12")?);
        seal_to(&self.key, &nonce, plaintext, associated_data, dst)
    }

    fn open_to<'d>(
        &self,
        nonce: &[u8],
        sealed: &[u8],
        associated_data: Option<&[u8]>,
        dst: &'d mut [u8],
    ) -> Result<Option<&'d [u8]>> {
        let nonce = Nonce::Ietf(nonce_array(nonce, "12")?);
        open_to(&self.key, &nonce, sealed, associated_data, dst)
    }

    fn clean(&mut self) -> &mut Self {
        self.key.zeroize();
        self
    }
}

impl Aead for XChaCha20Poly1305 {
    const KEY_LENGTH: usize = KEY_LENGTH;
    const NONCE_LENGTH: usize = 24;
    const TAG_LENGTH: usize = TAG_LENGTH;

    fn seal_to(
        &self,
        nonce: &[u8],
        plaintext: &[u8],
        associated_data: Option<&[u8]>,
        dst: &mut [u8],
    ) -> Result<()> {
        let nonce = Nonce::Extended(nonce_array(nonce, "24")?);
        seal_to(&self.key, &nonce, plaintext, associated_data, dst)
    }

    fn open_to<'d>(
        &self,
        nonce: &[u8],
        sealed: &[u8],
        associated_data: Option<&[u8]>,
        dst: &'d mut [u8],
    ) -> Result<Option<&'d [u8]>> {
        let nonce = Nonce::Extended(nonce_array(nonce, "24")?);
        open_to(&self.key, &nonce, sealed, associated_data, dst)
    }

    fn clean(&mut self) -> &mut Self {
        self.key.zeroize();
        self
    }
}

impl fmt::Debug for ChaCha20Poly1305 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChaCha20Poly1305 { key: [REDACTED] }")
    }
}

impl fmt::Debug for XChaCha20Poly1305 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("XChaCha20Poly1305 { key: [REDACTED] }")
    }
}

#[inline(always)]
fn ad(associated_data: Option<&[u8]>) -> &[u8] {
    associated_data.unwrap_or(&[])
}

fn nonce_array<const N: usize>(nonce: &[u8], expected: &'static str) -> Result<[u8; N]> {
    nonce.try_into().map_err(|_| {
        debug!(expected, actual = nonce.len(), "invalid AEAD nonce length");
        Error::InvalidNonceLength {
            expected,
            actual: nonce.len(),
        }
    })
}

fn seal_to(
    key: &[u8; KEY_LENGTH],
    nonce: &Nonce,
    plaintext: &[u8],
    associated_data: Option<&[u8]>,
    dst: &mut [u8],
) -> Result<()> {
    check_output_length(plaintext.len() + TAG_LENGTH, dst.len())?;
    compose::check_message_length(nonce, plaintext.len())?;

    let (body, tag_out) = dst.split_at_mut(plaintext.len());
    body.copy_from_slice(plaintext);

    let tag = compose::seal_in_place(key, nonce, ad(associated_data), body)?;
    tag_out.copy_from_slice(&tag);
    Ok(())
}

fn open_to<'d>(
    key: &[u8; KEY_LENGTH],
    nonce: &Nonce,
    sealed: &[u8],
    associated_data: Option<&[u8]>,
    dst: &'d mut [u8],
) -> Result<Option<&'d [u8]>> {
    let Some(len) = sealed.len().checked_sub(TAG_LENGTH) else {
        trace!(len = sealed.len(), "sealed message shorter than tag");
        return Ok(None);
    };
    check_output_length(len, dst.len())?;

    let (ciphertext, tag) = sealed.split_at(len);
    let mut expected = [0u8; TAG_LENGTH];
    expected.copy_from_slice(tag);

    let Some(mut cipher) = compose::verify(key, nonce, ad(associated_data), ciphertext, &expected)?
    else {
        return Ok(None);
    };

    cipher.apply_keystream_to(ciphertext, dst)?;
    let plaintext: &'d [u8] = dst;
    Ok(Some(plaintext))
}

fn open_in_place<'b>(
    key: &[u8; KEY_LENGTH],
    nonce: &Nonce,
    associated_data: Option<&[u8]>,
    buffer: &'b mut [u8],
    tag: &Tag,
) -> Result<Option<&'b [u8]>> {
    let Some(mut cipher) = compose::verify(key, nonce, ad(associated_data), buffer, tag)? else {
        return Ok(None);
    };

    cipher.apply_keystream(buffer)?;
    let plaintext: &'b [u8] = buffer;
    Ok(Some(plaintext))
}
