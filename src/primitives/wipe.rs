//! Zeroization of secret buffers.
//!
//! Thin wrappers around `zeroize`, whose writes are guaranteed not to be
//! elided by the optimizer. For values that must be wiped on every exit
//! path, hold them in a [`zeroize::Zeroizing`] guard instead of calling
//! these functions by hand.

use zeroize::Zeroize;

/// Overwrites every byte of `buf` with zero.
#[inline]
pub fn wipe(buf: &mut [u8]) {
    buf.zeroize();
}

/// Overwrites every word of `words` with zero.
#[inline]
pub fn wipe_words(words: &mut [u32]) {
    words.zeroize();
}
