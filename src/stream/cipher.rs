//! Keystream generation and XOR for all ChaCha20 variants
//!
//! [`ChaCha20`] is the keyed, seekable stream object; the free functions
//! [`stream_xor`], [`stream_xor_in_place`] and [`stream`] are one-shot
//! wrappers around it.
//!
//! Keystream is produced block by block: the counter field advances by one
//! after every 64-byte block, and a partially consumed block is kept so the
//! next call resumes exactly where the previous one stopped.
//!
//! Every operation checks up front that the request fits in the counter
//! domain of the variant, so a failing call leaves both the object and the
//! destination buffer unchanged.

use std::fmt;

use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::chacha20::{BLOCK_LEN, block_from_state, hchacha20, init_state};
use super::variant::{Nonce, Variant};
use crate::error::{Error, Result};
use crate::primitives::state::SavedState;
use crate::primitives::wipe::wipe_words;
use crate::primitives::word::load32_le;

/// Key length shared by every variant.
pub const KEY_LENGTH: usize = 32;

/// Seekable ChaCha20 / XChaCha20 keystream generator.
///
/// For [`Variant::XChaCha20`] the HChaCha20 subkey is derived once at
/// construction and stored in place of the caller's key.
///
/// The object holds secret material and is wiped on drop. It is not meant
/// to be shared between threads without external synchronization, since
/// every read mutates its counter and buffered block.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ChaCha20 {
    /// Key fed to the block function (the subkey for XChaCha20).
    key: [u8; 32],

    /// Nonce words in state order: two for the 8- and 24-byte variants,
    /// three for the 12-byte variant.
    nonce: [u32; 3],

    /// Variant selected by the caller's nonce.
    #[zeroize(skip)]
    variant: Variant,

    /// Counter of the next block to generate.
    ///
    /// Kept wider than any counter domain so "one past the last block" is
    /// representable.
    next_block: u128,

    /// Most recently generated keystream block.
    keystream: [u8; BLOCK_LEN],

    /// Bytes of `keystream` already consumed; `BLOCK_LEN` when empty.
    offset: usize,
}

impl ChaCha20 {
    /// Creates a keystream generator starting at block 0.
    pub fn new(key: &[u8; 32], nonce: &Nonce) -> Self {
        let variant = nonce.variant();
        let mut words = [0u32; 3];

        let key = match nonce {
            Nonce::Short(n) => {
                words[0] = load32_le(n, 0);
                words[1] = load32_le(n, 4);
                *key
            }
            Nonce::Ietf(n) => {
                words[0] = load32_le(n, 0);
                words[1] = load32_le(n, 4);
                words[2] = load32_le(n, 8);
                *key
            }
            Nonce::Extended(n) => {
                let mut prefix = [0u8; 16];
                prefix.copy_from_slice(&n[..16]);
                words[0] = load32_le(n, 16);
                words[1] = load32_le(n, 20);
                hchacha20(key, &prefix)
            }
        };

        Self {
            key,
            nonce: words,
            variant,
            next_block: 0,
            keystream: [0u8; BLOCK_LEN],
            offset: BLOCK_LEN,
        }
    }

    /// Creates a keystream generator starting at block `counter`.
    ///
    /// Fails with [`Error::CounterOverflow`] if `counter` is outside the
    /// counter domain of the variant.
    pub fn with_counter(key: &[u8; 32], nonce: &Nonce, counter: u64) -> Result<Self> {
        let mut cipher = Self::new(key, nonce);
        cipher.seek(counter)?;
        Ok(cipher)
    }

    /// Creates a keystream generator from unchecked byte slices.
    ///
    /// The variant is inferred from the nonce length once, here.
    pub fn new_from_slices(key: &[u8], nonce: &[u8]) -> Result<Self> {
        let key = key_from_slice(key)?;
        let nonce = Nonce::from_slice(nonce)?;
        Ok(Self::new(&key, &nonce))
    }

    /// Variant this generator was built for.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Repositions the stream at the start of block `counter`.
    ///
    /// Any buffered partial block is discarded.
    pub fn seek(&mut self, counter: u64) -> Result<()> {
        if counter > self.variant.max_counter() {
            debug!(
                variant = self.variant.name(),
                counter, "seek beyond counter domain"
            );
            return Err(Error::CounterOverflow);
        }

        self.next_block = counter as u128;
        self.keystream.zeroize();
        self.offset = BLOCK_LEN;
        Ok(())
    }

    /// Checks that `len` more keystream bytes can be produced without
    /// wrapping the counter.
    pub fn check_remaining(&self, len: usize) -> Result<()> {
        let buffered = BLOCK_LEN - self.offset;
        let fresh = len.saturating_sub(buffered);
        if fresh == 0 {
            return Ok(());
        }

        let blocks = fresh.div_ceil(BLOCK_LEN) as u128;
        let last = self.next_block + blocks - 1;
        if last > self.variant.max_counter() as u128 {
            debug!(
                variant = self.variant.name(),
                len, "keystream request exceeds counter domain"
            );
            return Err(Error::CounterOverflow);
        }

        Ok(())
    }

    /// XORs the keystream into `buf` in place, advancing the stream.
    pub fn apply_keystream(&mut self, buf: &mut [u8]) -> Result<()> {
        self.check_remaining(buf.len())?;

        let mut pos = 0;
        while pos < buf.len() {
            if self.offset == BLOCK_LEN {
                self.refill();
            }

            let take = (BLOCK_LEN - self.offset).min(buf.len() - pos);
            buf[pos..pos + take]
                .iter_mut()
                .zip(&self.keystream[self.offset..self.offset + take])
                .for_each(|(b, k)| *b ^= k);

            self.offset += take;
            pos += take;
        }

        Ok(())
    }

    /// XORs `src` with the keystream into `dst`, advancing the stream.
    ///
    /// `dst` must have exactly the length of `src`.
    pub fn apply_keystream_to(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        check_output_length(src.len(), dst.len())?;
        self.check_remaining(src.len())?;

        dst.copy_from_slice(src);
        self.apply_keystream(dst)
    }

    /// Overwrites `dst` with raw keystream, advancing the stream.
    pub fn fill_keystream(&mut self, dst: &mut [u8]) -> Result<()> {
        self.check_remaining(dst.len())?;

        dst.fill(0);
        self.apply_keystream(dst)
    }

    /// Wipes the key, nonce and buffered keystream.
    ///
    /// The object must not be used to produce keystream afterwards.
    pub fn clean(&mut self) -> &mut Self {
        self.zeroize();
        self.offset = BLOCK_LEN;
        self
    }

    /// Generates the block at `next_block` and advances the counter.
    fn refill(&mut self) {
        let mut state = init_state(&self.key, &self.tail(self.next_block as u64));
        block_from_state(&state, &mut self.keystream);
        wipe_words(&mut state);

        self.next_block += 1;
        self.offset = 0;
    }

    /// State words 12..16 for the given block counter.
    fn tail(&self, counter: u64) -> [u32; 4] {
        let n = &self.nonce;
        match self.variant {
            Variant::ChaCha20Ietf => [counter as u32, n[0], n[1], n[2]],
            Variant::ChaCha20 | Variant::XChaCha20 => {
                [counter as u32, (counter >> 32) as u32, n[0], n[1]]
            }
        }
    }
}

/// Snapshot of a [`ChaCha20`] stream position, including the buffered
/// partial block.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct StreamPosition {
    next_block: u128,
    keystream: [u8; BLOCK_LEN],
    offset: usize,
}

impl SavedState for ChaCha20 {
    type State = StreamPosition;

    fn save_state(&self) -> StreamPosition {
        StreamPosition {
            next_block: self.next_block,
            keystream: self.keystream,
            offset: self.offset,
        }
    }

    fn restore_state(&mut self, saved: &StreamPosition) -> &mut Self {
        self.next_block = saved.next_block;
        self.keystream = saved.keystream;
        self.offset = saved.offset;
        self
    }

    fn clean_saved_state(saved: &mut StreamPosition) {
        saved.zeroize();
        saved.offset = BLOCK_LEN;
    }
}

impl fmt::Debug for ChaCha20 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChaCha20")
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}

/// XORs `src` with the keystream for `(key, nonce)` starting at block
/// `counter`, writing the result to `dst`.
///
/// Encryption and decryption are the same operation. `dst` must be exactly
/// as long as `src`; aliasing is ruled out by the borrow checker, use
/// [`stream_xor_in_place`] to transform a buffer in place.
pub fn stream_xor(
    key: &[u8; 32],
    nonce: &Nonce,
    counter: u64,
    src: &[u8],
    dst: &mut [u8],
) -> Result<()> {
    ChaCha20::with_counter(key, nonce, counter)?.apply_keystream_to(src, dst)
}

/// XORs the keystream for `(key, nonce)` starting at block `counter` into
/// `buf` in place.
pub fn stream_xor_in_place(key: &[u8; 32], nonce: &Nonce, counter: u64, buf: &mut [u8]) -> Result<()> {
    ChaCha20::with_counter(key, nonce, counter)?.apply_keystream(buf)
}

/// Writes raw keystream for `(key, nonce)` starting at block `counter` into
/// `dst`.
pub fn stream(key: &[u8; 32], nonce: &Nonce, counter: u64, dst: &mut [u8]) -> Result<()> {
    ChaCha20::with_counter(key, nonce, counter)?.fill_keystream(dst)
}

/// Converts an unchecked key slice into a 32-byte key held in a wiping guard.
pub fn key_from_slice(key: &[u8]) -> Result<Zeroizing<[u8; 32]>> {
    if key.len() != KEY_LENGTH {
        debug!(len = key.len(), "invalid ChaCha20 key length");
        return Err(Error::InvalidKeyLength {
            expected: KEY_LENGTH,
            actual: key.len(),
        });
    }

    let mut out = Zeroizing::new([0u8; 32]);
    out.copy_from_slice(key);
    Ok(out)
}

pub(crate) fn check_output_length(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        debug!(expected, actual, "destination length mismatch");
        return Err(Error::InvalidOutputLength { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> [u8; 32] {
        core::array::from_fn(|i| i as u8)
    }

    #[test]
    fn resumes_mid_block() {
        let nonce = Nonce::Ietf([9u8; 12]);
        let mut whole = [0u8; 150];
        stream(&key(), &nonce, 0, &mut whole).unwrap();

        let mut cipher = ChaCha20::new(&key(), &nonce);
        let mut pieces = [0u8; 150];
        for chunk in pieces.chunks_mut(7) {
            cipher.fill_keystream(chunk).unwrap();
        }

        assert_eq!(whole, pieces);
    }

    #[test]
    fn seek_matches_counter_offset() {
        let nonce = Nonce::Short([3u8; 8]);
        let mut from_zero = [0u8; 192];
        stream(&key(), &nonce, 0, &mut from_zero).unwrap();

        let mut cipher = ChaCha20::new(&key(), &nonce);
        cipher.seek(2).unwrap();
        let mut third = [0u8; 64];
        cipher.fill_keystream(&mut third).unwrap();

        assert_eq!(&from_zero[128..], &third);
    }

    #[test]
    fn ietf_counter_cannot_wrap() {
        let nonce = Nonce::Ietf([0u8; 12]);
        let mut cipher = ChaCha20::with_counter(&key(), &nonce, u32::MAX as u64).unwrap();

        let mut last = [0u8; 64];
        cipher.fill_keystream(&mut last).unwrap();

        let mut one_more = [0xffu8; 1];
        assert_eq!(
            cipher.fill_keystream(&mut one_more),
            Err(Error::CounterOverflow)
        );
        assert_eq!(one_more, [0xff]);
    }

    #[test]
    fn seek_outside_domain_fails() {
        let nonce = Nonce::Ietf([0u8; 12]);
        let mut cipher = ChaCha20::new(&key(), &nonce);
        assert_eq!(
            cipher.seek(u32::MAX as u64 + 1),
            Err(Error::CounterOverflow)
        );
    }

    #[test]
    fn short_nonce_counter_carries_into_high_word() {
        let nonce = Nonce::Short([0u8; 8]);
        let cipher = ChaCha20::new(&key(), &nonce);
        assert_eq!(cipher.tail(1 << 32), [0, 1, 0, 0]);
    }

    #[test]
    fn mismatched_output_is_rejected() {
        let nonce = Nonce::Ietf([0u8; 12]);
        let mut dst = [0u8; 3];
        assert_eq!(
            stream_xor(&key(), &nonce, 0, &[1, 2], &mut dst),
            Err(Error::InvalidOutputLength {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn slice_constructor_validates_key() {
        assert_eq!(
            ChaCha20::new_from_slices(&[0u8; 31], &[0u8; 12]).unwrap_err(),
            Error::InvalidKeyLength {
                expected: 32,
                actual: 31
            }
        );
        assert!(ChaCha20::new_from_slices(&[0u8; 32], &[0u8; 10]).is_err());
    }

    #[test]
    fn restore_replays_keystream() {
        let mut cipher = ChaCha20::new(&key(), &Nonce::Extended([5u8; 24]));
        let mut skip = [0u8; 70];
        cipher.fill_keystream(&mut skip).unwrap();

        let mut saved = cipher.save_state();
        let mut first = [0u8; 100];
        cipher.fill_keystream(&mut first).unwrap();

        cipher.restore_state(&saved);
        let mut again = [0u8; 100];
        cipher.fill_keystream(&mut again).unwrap();
        assert_eq!(first, again);

        ChaCha20::clean_saved_state(&mut saved);
        assert_eq!(saved.next_block, 0);
        assert_eq!(saved.keystream, [0u8; BLOCK_LEN]);
    }

    #[test]
    fn clean_wipes_key() {
        let mut cipher = ChaCha20::new(&key(), &Nonce::Ietf([1u8; 12]));
        cipher.clean();
        assert_eq!(cipher.key, [0u8; 32]);
        assert_eq!(cipher.nonce, [0u32; 3]);
    }
}
