//! Streaming and one-shot Poly1305 interfaces.
//!
//! [`Poly1305`] buffers input until a full 16-byte block is available and
//! feeds blocks to the limb accumulator. The final partial block, if any,
//! is terminated with a single `0x01` byte and absorbed without the
//! implicit high bit.
//!
//! Finalization consumes the object, so a keyed instance can produce at
//! most one tag.

use std::fmt;

use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::core::{Accumulator, BLOCK_LEN, HIBIT_FULL, HIBIT_NONE};
use crate::error::{Error, Result};
use crate::primitives::ct::ConstantTimeEq;
use crate::stream::cipher::check_output_length;

/// Poly1305 one-time key length in bytes.
pub const KEY_LENGTH: usize = 32;

/// Poly1305 tag length in bytes.
pub const TAG_LENGTH: usize = 16;

/// A Poly1305 authentication tag.
pub type Tag = [u8; TAG_LENGTH];

/// Streaming Poly1305 authenticator.
///
/// The key **must never** be used for more than one message. Deriving it
/// from a stream cipher keystream, as the AEAD construction does, is the
/// usual way to obtain a fresh key per message.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Poly1305 {
    acc: Accumulator,
    buffer: [u8; BLOCK_LEN],
    leftover: usize,
}

impl Poly1305 {
    /// Creates an authenticator from a 32-byte one-time key.
    pub fn new(key: &[u8; KEY_LENGTH]) -> Self {
        Self {
            acc: Accumulator::new(key),
            buffer: [0u8; BLOCK_LEN],
            leftover: 0,
        }
    }

    /// Creates an authenticator from an unchecked key slice.
    pub fn new_from_slice(key: &[u8]) -> Result<Self> {
        let key: &[u8; KEY_LENGTH] = key.try_into().map_err(|_| {
            debug!(len = key.len(), "invalid Poly1305 key length");
            Error::InvalidKeyLength {
                expected: KEY_LENGTH,
                actual: key.len(),
            }
        })?;

        Ok(Self::new(key))
    }

    /// Absorbs `data`; may be called any number of times.
    pub fn update(&mut self, mut data: &[u8]) -> &mut Self {
        if self.leftover > 0 {
            let want = (BLOCK_LEN - self.leftover).min(data.len());
            self.buffer[self.leftover..self.leftover + want].copy_from_slice(&data[..want]);
            self.leftover += want;
            data = &data[want..];

            if self.leftover < BLOCK_LEN {
                return self;
            }

            self.acc.absorb(&self.buffer, HIBIT_FULL);
            self.leftover = 0;
        }

        let mut blocks = data.chunks_exact(BLOCK_LEN);
        for block in &mut blocks {
            self.acc.absorb(block, HIBIT_FULL);
        }

        let rest = blocks.remainder();
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.leftover = rest.len();

        self
    }

    /// Absorbs zero bytes up to the next 16-byte boundary of the input
    /// seen so far.
    pub(crate) fn pad16(&mut self) -> &mut Self {
        if self.leftover > 0 {
            let zeros = [0u8; BLOCK_LEN];
            self.update(&zeros[..BLOCK_LEN - self.leftover]);
        }
        self
    }

    /// Produces the tag and wipes the authenticator.
    pub fn finalize(mut self) -> Tag {
        if self.leftover > 0 {
            let n = self.leftover;
            self.buffer[n] = 1;
            self.buffer[n + 1..].fill(0);
            self.acc.absorb(&self.buffer, HIBIT_NONE);
        }

        self.acc.finalize()
    }

    /// Writes the tag into `dst`, which must be exactly 16 bytes long.
    pub fn finalize_into(self, dst: &mut [u8]) -> Result<()> {
        check_output_length(TAG_LENGTH, dst.len())?;
        dst.copy_from_slice(&self.finalize());
        Ok(())
    }

    /// Compares the tag against `expected` in constant time.
    pub fn verify(self, expected: &Tag) -> bool {
        let mut tag = self.finalize();
        let ok = tag.ct_eq(expected);
        tag.zeroize();
        ok
    }

    /// Wipes all key and accumulator material.
    ///
    /// The object must not be used to produce a tag afterwards.
    pub fn clean(&mut self) -> &mut Self {
        self.zeroize();
        self
    }
}

impl fmt::Debug for Poly1305 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Poly1305 { .. }")
    }
}

/// Computes the Poly1305 tag of `message` under a one-time `key`.
pub fn one_time_auth(key: &[u8; KEY_LENGTH], message: &[u8]) -> Tag {
    let mut mac = Poly1305::new(key);
    mac.update(message);
    mac.finalize()
}

/// Checks `tag` against the Poly1305 tag of `message` in constant time.
pub fn verify(key: &[u8; KEY_LENGTH], message: &[u8], tag: &Tag) -> bool {
    let mut mac = Poly1305::new(key);
    mac.update(message);
    mac.verify(tag)
}
