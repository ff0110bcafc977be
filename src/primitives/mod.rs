//! Shared low-level primitives
//!
//! This module holds the small, dependency-light building blocks that the
//! cipher, the authenticator and the AEAD composition all rest on.
//!
//! - `word`: 32-bit wrapping arithmetic and little-endian word conversion
//! - `ct`: constant-time equality and selection
//! - `wipe`: zeroization of secret buffers
//! - `state`: the opt-in state snapshot capability
//!
//! None of these functions branch on their inputs.

pub mod ct;
pub mod state;
pub mod wipe;
pub mod word;

pub use ct::{ConstantTimeEq, equal};
pub use state::SavedState;
pub use wipe::wipe;
