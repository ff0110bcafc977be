//! 32-bit word arithmetic shared by the cipher and the authenticator.
//!
//! All operations wrap modulo 2³², matching two's-complement overflow.
//! They are branch-free and compile down to single instructions.

/// Addition modulo 2³².
#[inline(always)]
pub fn add32(a: u32, b: u32) -> u32 {
    a.wrapping_add(b)
}

/// Left rotation by `n` bits.
#[inline(always)]
pub fn rotl32(x: u32, n: u32) -> u32 {
    x.rotate_left(n)
}

/// Multiplication modulo 2³² (low 32 bits of the full product).
#[inline(always)]
pub fn mul32(a: u32, b: u32) -> u32 {
    a.wrapping_mul(b)
}

/// Reads a little-endian `u32` starting at `offset`.
///
/// # Panics
///
/// Panics if fewer than four bytes are available at `offset`. Callers in
/// this crate only pass fixed-size buffers.
#[inline(always)]
pub fn load32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Writes `value` as little-endian bytes starting at `offset`.
#[inline(always)]
pub fn store32_le(out: &mut [u8], offset: usize, value: u32) {
    out[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Fills `words` from consecutive little-endian groups of `bytes`.
///
/// `bytes` must hold at least `4 * words.len()` bytes.
#[inline(always)]
pub fn load_words_le(words: &mut [u32], bytes: &[u8]) {
    words
        .iter_mut()
        .zip(bytes.chunks_exact(4))
        .for_each(|(w, b)| *w = u32::from_le_bytes([b[0], b[1], b[2], b[3]]));
}

/// Serializes `words` into consecutive little-endian groups of `out`.
#[inline(always)]
pub fn store_words_le(out: &mut [u8], words: &[u32]) {
    out.chunks_exact_mut(4)
        .zip(words)
        .for_each(|(chunk, w)| chunk.copy_from_slice(&w.to_le_bytes()));
}
