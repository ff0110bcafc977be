//! One-time message authentication.
//!
//! Currently provides Poly1305. Higher-level constructions that need a MAC
//! with a reusable key derive a fresh Poly1305 key per message, as the
//! AEAD composition in [`crate::encryption`] does.

pub mod poly1305;

pub use poly1305::{Poly1305, Tag, one_time_auth, verify};
