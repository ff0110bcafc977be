//! ChaCha20 block function and HChaCha20 subkey derivation
//!
//! This module contains the permutation at the heart of every cipher
//! variant in the crate. It knows nothing about nonce sizes or counters
//! beyond the four "tail" words (state words 12..16) handed to it by the
//! variant layer.
//!
//! The state is a 4×4 matrix of 32-bit words:
//!
//! ```text
//! cccccccc  cccccccc  cccccccc  cccccccc
//! kkkkkkkk  kkkkkkkk  kkkkkkkk  kkkkkkkk
//! kkkkkkkk  kkkkkkkk  kkkkkkkk  kkkkkkkk
//! tttttttt  tttttttt  tttttttt  tttttttt
//! ```
//!
//! where `c` are the constants, `k` the key and `t` the counter/nonce tail.
//!
//! All functions are branch-free with respect to key, nonce and counter,
//! and wipe their working copies of the state before returning.

use crate::primitives::wipe::wipe_words;
use crate::primitives::word::{add32, load_words_le, rotl32, store_words_le};

/// Size of one keystream block in bytes.
pub const BLOCK_LEN: usize = 64;

/// ChaCha20 constant words, `"expand 32-byte k"` as little-endian `u32`s.
const SIGMA: [u32; 4] = [
    0x6170_7865, // "expa"
    0x3320_646e, // "nd 3"
    0x7962_2d32, // "2-by"
    0x6b20_6574, // "te k"
];

#[inline(always)]
fn quarter_round(state: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    state[a] = add32(state[a], state[b]);
    state[d] = rotl32(state[d] ^ state[a], 16);

    state[c] = add32(state[c], state[d]);
    state[b] = rotl32(state[b] ^ state[c], 12);

    state[a] = add32(state[a], state[b]);
    state[d] = rotl32(state[d] ^ state[a], 8);

    state[c] = add32(state[c], state[d]);
    state[b] = rotl32(state[b] ^ state[c], 7);
}

/// Applies the 20-round ChaCha permutation in place.
///
/// Ten double rounds, each one column round followed by one diagonal round.
/// No feed-forward is performed here; see [`block_from_state`].
pub(crate) fn permute(state: &mut [u32; 16]) {
    for _ in 0..10 {
        // Columns
        quarter_round(state, 0, 4, 8, 12);
        quarter_round(state, 1, 5, 9, 13);
        quarter_round(state, 2, 6, 10, 14);
        quarter_round(state, 3, 7, 11, 15);

        // Diagonals
        quarter_round(state, 0, 5, 10, 15);
        quarter_round(state, 1, 6, 11, 12);
        quarter_round(state, 2, 7, 8, 13);
        quarter_round(state, 3, 4, 9, 14);
    }
}

/// Builds the initial state from the key and the four tail words.
pub(crate) fn init_state(key: &[u8; 32], tail: &[u32; 4]) -> [u32; 16] {
    let mut state = [0u32; 16];

    state[0..4].copy_from_slice(&SIGMA);
    load_words_le(&mut state[4..12], key);
    state[12..16].copy_from_slice(tail);

    state
}

/// Runs the block function on a prepared state and serializes the result.
///
/// The permuted state is added word-wise to the input state before
/// serialization. `input` is left untouched.
pub(crate) fn block_from_state(input: &[u32; 16], out: &mut [u8; BLOCK_LEN]) {
    let mut x = *input;
    permute(&mut x);

    x.iter_mut()
        .zip(input)
        .for_each(|(w, i)| *w = add32(*w, *i));

    store_words_le(out, &x);
    wipe_words(&mut x);
}

/// Generates one 64-byte ChaCha20 keystream block (IETF layout).
///
/// # Parameters
/// - `key`: 256-bit secret key
/// - `counter`: 32-bit block counter
/// - `nonce`: 96-bit nonce
///
/// Reusing the same `(key, nonce, counter)` tuple for two different
/// messages is catastrophic and must be prevented by the caller.
pub fn block(key: &[u8; 32], counter: u32, nonce: &[u8; 12]) -> [u8; BLOCK_LEN] {
    let mut tail = [counter, 0, 0, 0];
    load_words_le(&mut tail[1..], nonce);

    let mut state = init_state(key, &tail);
    let mut out = [0u8; BLOCK_LEN];
    block_from_state(&state, &mut out);
    wipe_words(&mut state);

    out
}

/// HChaCha20 subkey derivation.
///
/// Seeds the state with `key` and the 16-byte `nonce`, runs the 20-round
/// permutation **without** the final add-back, and returns words 0..4 and
/// 12..16 as a 32-byte subkey.
///
/// This is the first half of XChaCha20: the subkey and the remaining eight
/// nonce bytes then drive the 8-byte-nonce ChaCha20 variant.
pub fn hchacha20(key: &[u8; 32], nonce: &[u8; 16]) -> [u8; 32] {
    let mut tail = [0u32; 4];
    load_words_le(&mut tail, nonce);

    let mut state = init_state(key, &tail);
    permute(&mut state);

    let mut subkey = [0u8; 32];
    store_words_le(&mut subkey[..16], &state[0..4]);
    store_words_le(&mut subkey[16..], &state[12..16]);
    wipe_words(&mut state);

    subkey
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_round_vector() {
        // RFC 8439 §2.1.1
        let mut state = [0u32; 16];
        state[0] = 0x1111_1111;
        state[1] = 0x0102_0304;
        state[2] = 0x9b8d_6f43;
        state[3] = 0x0123_4567;

        quarter_round(&mut state, 0, 1, 2, 3);

        assert_eq!(state[0], 0xea2a_92f4);
        assert_eq!(state[1], 0xcb1c_f8ce);
        assert_eq!(state[2], 0x4581_472e);
        assert_eq!(state[3], 0x5881_c4bb);
    }

    #[test]
    fn init_state_layout() {
        let key = [0u8; 32];
        let state = init_state(&key, &[1, 2, 3, 4]);

        assert_eq!(&state[0..4], &SIGMA);
        assert_eq!(&state[4..12], &[0u32; 8]);
        assert_eq!(&state[12..16], &[1, 2, 3, 4]);
    }

    #[test]
    fn block_counter_changes_output() {
        let key = [0x42u8; 32];
        let nonce = [0x24u8; 12];

        assert_ne!(block(&key, 0, &nonce), block(&key, 1, &nonce));
    }

    #[test]
    fn hchacha20_differs_from_block_prefix() {
        // Without the add-back the subkey must not equal the block output.
        let key = [7u8; 32];
        let nonce = [0u8; 16];
        let subkey = hchacha20(&key, &nonce);
        let ks = block(&key, 0, &[0u8; 12]);

        assert_ne!(&subkey[..16], &ks[..16]);
    }
}
