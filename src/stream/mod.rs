//! ChaCha20 stream cipher family
//!
//! This module provides the ChaCha20 block function and keystream
//! generation for the three supported nonce sizes:
//!
//! | Nonce | Variant | Counter |
//! |-------|---------|---------|
//! | 8 bytes | [`Variant::ChaCha20`] | 64-bit |
//! | 12 bytes | [`Variant::ChaCha20Ietf`] | 32-bit |
//! | 24 bytes | [`Variant::XChaCha20`] | 64-bit, after an HChaCha20 subkey |
//!
//! The variant is fixed by the [`Nonce`] value the caller builds. Requests
//! that would run the counter past its domain fail with
//! [`crate::Error::CounterOverflow`] instead of reusing keystream.
//!
//! The output of this module is **unauthenticated**. Use
//! [`crate::encryption`] unless the surrounding protocol authenticates
//! the ciphertext by other means.

pub mod chacha20;
pub mod cipher;
pub mod variant;

pub use chacha20::{BLOCK_LEN, block, hchacha20};
pub use cipher::{
    ChaCha20, KEY_LENGTH, StreamPosition, key_from_slice, stream, stream_xor, stream_xor_in_place,
};
pub use variant::{Nonce, Variant};
