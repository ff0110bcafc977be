//! Symmetric authenticated encryption primitives
//!
//! This crate provides the ChaCha20 stream cipher family, the Poly1305
//! one-time authenticator, and their RFC 8439 composition into an AEAD.
//!
//! The focus is on **clarity, predictability, and auditability**: every
//! primitive is implemented in plain Rust with explicit word arithmetic,
//! constant-time comparisons, and deterministic wiping of secret state.
//!
//! # Module overview
//!
//! - `primitives`
//!   32-bit word arithmetic, constant-time equality and selection,
//!   zeroization helpers, and the opt-in [`primitives::SavedState`]
//!   snapshot capability.
//!
//! - `stream`
//!   The ChaCha20 block function, HChaCha20, and keystream generation for
//!   8-, 12- and 24-byte nonces. The variant is selected once through the
//!   [`stream::Nonce`] type and never re-inspected per block.
//!
//! - `mac`
//!   Poly1305 over 2^130 - 5, as a streaming object and as one-shot
//!   functions. A Poly1305 key authenticates exactly one message.
//!
//! - `encryption`
//!   The [`encryption::Aead`] interface and the ChaCha20-Poly1305 /
//!   XChaCha20-Poly1305 constructions built on the two modules above.
//!
//! # Errors
//!
//! Usage errors (wrong key, nonce or buffer length; counter overflow) are
//! reported as [`Error`]. A forged message is **not** an error: `open`
//! returns `Ok(None)`.
//!
//! # Example
//!
//! ```
//! use chachapoly::encryption::{Aead, XChaCha20Poly1305};
//!
//! let aead = XChaCha20Poly1305::new(&[0x42; 32]);
//! let nonce = [0x24; 24];
//!
//! let sealed = aead.seal(&nonce, b"attack at dawn", Some(b"header"))?;
//! assert_eq!(sealed.len(), 14 + 16);
//!
//! let opened = aead.open(&nonce, &sealed, Some(b"header"))?;
//! assert_eq!(opened.as_deref(), Some(&b"attack at dawn"[..]));
//!
//! let forged = aead.open(&nonce, &sealed, Some(b"other"))?;
//! assert!(forged.is_none());
//! # Ok::<(), chachapoly::Error>(())
//! ```
//!
//! # Design goals
//!
//! - No heap allocations in core primitives
//! - No data-dependent branches on secret values
//! - Every secret intermediate wiped on every exit path
//! - Minimal and explicit APIs
//!
//! Callers remain responsible for key management and for never reusing a
//! nonce under the same key.

mod error;

pub mod encryption;
pub mod mac;
pub mod primitives;
pub mod stream;

pub use error::{Error, Result};
