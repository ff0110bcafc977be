//! Poly1305 one-time authenticator (RFC 8439 §2.5).
//!
//! The implementation is split into two layers:
//!
//! - `core`: clamping, limb arithmetic modulo 2^130 - 5 and finalization
//! - `mac`: buffering, the streaming [`Poly1305`] object and the one-shot
//!   [`one_time_auth`] / [`verify`] functions
//!
//! A Poly1305 key authenticates exactly one message. This type does not
//! offer state snapshots: resuming a finished computation would let one
//! key authenticate two messages.

pub(crate) mod core;
pub mod mac;

pub use mac::{KEY_LENGTH, Poly1305, TAG_LENGTH, Tag, one_time_auth, verify};
