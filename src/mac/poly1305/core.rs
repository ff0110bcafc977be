//! Poly1305 field arithmetic over 2^130 - 5.
//!
//! The accumulator `h` and the clamped multiplier `r` are kept in five
//! 26-bit limbs, so every limb product fits in a `u64` with room for the
//! five-term sums of a schoolbook multiply. Reduction uses the identity
//! `2^130 ≡ 5 (mod p)`: carries out of the top limb re-enter limb 0
//! multiplied by five.
//!
//! Nothing in this type branches on key or message data. The final
//! conditional subtraction of `p` is a masked select.
//!
//! # Security
//!
//! - A fresh accumulator must be created for every message.
//! - [`Accumulator::finalize`] wipes the accumulator after producing the tag.

use zeroize::Zeroize;

use crate::primitives::ct::select_u32;
use crate::primitives::word::load32_le;

/// Poly1305 block size in bytes.
pub(crate) const BLOCK_LEN: usize = 16;

/// Implicit high bit (2^128) for full 16-byte blocks, in limb 4 units.
pub(crate) const HIBIT_FULL: u32 = 1 << 24;

/// No implicit high bit: the final partial block carries its own `0x01`.
pub(crate) const HIBIT_NONE: u32 = 0;

const MASK26: u32 = 0x03ff_ffff;

/// Poly1305 accumulator state for a single message.
#[derive(Clone, Zeroize)]
pub(crate) struct Accumulator {
    /// Clamped `r`, five 26-bit limbs.
    r: [u32; 5],

    /// Running value `h`, five limbs of roughly 26 bits.
    h: [u32; 5],

    /// `s`, the second key half, as four little-endian words.
    pad: [u32; 4],
}

impl Accumulator {
    /// Splits and clamps a one-time key.
    ///
    /// `key[0..16]` becomes `r` with bits 4, 5, 6, 7 of bytes 3, 7, 11, 15
    /// and bits 0, 1 of bytes 4, 8, 12 cleared. The clamp is folded into the
    /// limb masks below. `key[16..32]` becomes `s`.
    pub(crate) fn new(key: &[u8; 32]) -> Self {
        let r = [
            load32_le(key, 0) & 0x03ff_ffff,
            (load32_le(key, 3) >> 2) & 0x03ff_ff03,
            (load32_le(key, 6) >> 4) & 0x03ff_c0ff,
            (load32_le(key, 9) >> 6) & 0x03f0_3fff,
            (load32_le(key, 12) >> 8) & 0x000f_ffff,
        ];

        let pad = [
            load32_le(key, 16),
            load32_le(key, 20),
            load32_le(key, 24),
            load32_le(key, 28),
        ];

        Self { r, h: [0; 5], pad }
    }

    /// Computes `h = (h + m) * r mod p` for one 16-byte block.
    ///
    /// `hibit` is [`HIBIT_FULL`] for message blocks and [`HIBIT_NONE`] for
    /// a final block that has already been padded with `0x01` at its end.
    pub(crate) fn absorb(&mut self, block: &[u8], hibit: u32) {
        debug_assert_eq!(block.len(), BLOCK_LEN);

        let h0 = self.h[0] + (load32_le(block, 0) & MASK26);
        let h1 = self.h[1] + ((load32_le(block, 3) >> 2) & MASK26);
        let h2 = self.h[2] + ((load32_le(block, 6) >> 4) & MASK26);
        let h3 = self.h[3] + ((load32_le(block, 9) >> 6) & MASK26);
        let h4 = self.h[4] + ((load32_le(block, 12) >> 8) | hibit);

        let [r0, r1, r2, r3, r4] = self.r.map(u64::from);
        let (s1, s2, s3, s4) = (r1 * 5, r2 * 5, r3 * 5, r4 * 5);
        let (h0, h1, h2, h3, h4) = (h0 as u64, h1 as u64, h2 as u64, h3 as u64, h4 as u64);

        let d0 = h0 * r0 + h1 * s4 + h2 * s3 + h3 * s2 + h4 * s1;
        let mut d1 = h0 * r1 + h1 * r0 + h2 * s4 + h3 * s3 + h4 * s2;
        let mut d2 = h0 * r2 + h1 * r1 + h2 * r0 + h3 * s4 + h4 * s3;
        let mut d3 = h0 * r3 + h1 * r2 + h2 * r1 + h3 * r0 + h4 * s4;
        let mut d4 = h0 * r4 + h1 * r3 + h2 * r2 + h3 * r1 + h4 * r0;

        d1 += d0 >> 26;
        self.h[0] = d0 as u32 & MASK26;
        d2 += d1 >> 26;
        self.h[1] = d1 as u32 & MASK26;
        d3 += d2 >> 26;
        self.h[2] = d2 as u32 & MASK26;
        d4 += d3 >> 26;
        self.h[3] = d3 as u32 & MASK26;
        let carry = d4 >> 26;
        self.h[4] = d4 as u32 & MASK26;

        let t = self.h[0] as u64 + carry * 5;
        self.h[0] = t as u32 & MASK26;
        self.h[1] += (t >> 26) as u32;
    }

    /// Fully reduces `h`, adds `s` modulo 2^128 and returns the tag.
    ///
    /// The accumulator is wiped afterwards.
    pub(crate) fn finalize(&mut self) -> [u8; 16] {
        let mut h = self.h;

        // Carry h1 -> h4 -> h0 -> h1 so every limb fits in 26 bits.
        let mut c = h[1] >> 26;
        h[1] &= MASK26;
        for i in 2..5 {
            h[i] += c;
            c = h[i] >> 26;
            h[i] &= MASK26;
        }
        h[0] += c * 5;
        c = h[0] >> 26;
        h[0] &= MASK26;
        h[1] += c;

        // g = h + 5 - 2^130; keep it iff it did not go negative (h >= p).
        let mut g = [0u32; 5];
        g[0] = h[0] + 5;
        c = g[0] >> 26;
        g[0] &= MASK26;
        for i in 1..4 {
            g[i] = h[i] + c;
            c = g[i] >> 26;
            g[i] &= MASK26;
        }
        g[4] = (h[4] + c).wrapping_sub(1 << 26);

        let keep_g = 1 ^ (g[4] >> 31);
        for i in 0..5 {
            h[i] = select_u32(keep_g, g[i], h[i]);
        }

        // Repack into four 32-bit words (mod 2^128).
        let words = [
            h[0] | (h[1] << 26),
            (h[1] >> 6) | (h[2] << 20),
            (h[2] >> 12) | (h[3] << 14),
            (h[3] >> 18) | (h[4] << 8),
        ];

        let mut tag = [0u8; 16];
        let mut f = 0u64;
        for (i, (w, s)) in words.iter().zip(&self.pad).enumerate() {
            f = (*w as u64) + (*s as u64) + (f >> 32);
            tag[i * 4..i * 4 + 4].copy_from_slice(&(f as u32).to_le_bytes());
        }

        h.zeroize();
        g.zeroize();
        self.zeroize();

        tag
    }
}
