//! ChaCha20-Poly1305 composition (RFC 8439 §2.8).
//!
//! Shared by the 12-byte and 24-byte nonce constructions; the variant is
//! carried by the [`Nonce`] passed in.
//!
//! ## Algorithm
//!
//! 1. Keystream block 0 yields the Poly1305 one-time key (first 32 bytes,
//!    the rest is discarded)
//! 2. The message is encrypted from block 1 onwards
//! 3. The MAC input is:
//!    - AAD || pad16
//!    - ciphertext || pad16
//!    - len(AAD) as u64 LE || len(ciphertext) as u64 LE
//!
//! Decryption verifies the tag first and only then produces plaintext.

use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::mac::poly1305::{Poly1305, Tag};
use crate::stream::{BLOCK_LEN, ChaCha20, Nonce};

/// First keystream block used for message data.
const FIRST_DATA_BLOCK: u64 = 1;

/// Rejects messages the counter domain of `nonce` cannot cover from
/// block 1.
pub(super) fn check_message_length(nonce: &Nonce, len: usize) -> Result<()> {
    let blocks = len.div_ceil(BLOCK_LEN) as u128;
    if blocks > nonce.variant().max_counter() as u128 {
        debug!(
            variant = nonce.variant().name(),
            len,
            "message too long for counter domain"
        );
        return Err(Error::CounterOverflow);
    }
    Ok(())
}

/// Encrypts `buffer` in place and returns its tag.
pub(super) fn seal_in_place(
    key: &[u8; 32],
    nonce: &Nonce,
    associated_data: &[u8],
    buffer: &mut [u8],
) -> Result<Tag> {
    check_message_length(nonce, buffer.len())?;

    let mut cipher = ChaCha20::new(key, nonce);
    let mac_key = one_time_key(&mut cipher)?;

    cipher.seek(FIRST_DATA_BLOCK)?;
    cipher.apply_keystream(buffer)?;

    Ok(authenticator(&mac_key, associated_data, buffer).finalize())
}

/// Verifies `tag` over `ciphertext` and returns a cipher positioned at the
/// first data block, or `None` if the tag does not match.
pub(super) fn verify(
    key: &[u8; 32],
    nonce: &Nonce,
    associated_data: &[u8],
    ciphertext: &[u8],
    tag: &Tag,
) -> Result<Option<ChaCha20>> {
    check_message_length(nonce, ciphertext.len())?;

    let mut cipher = ChaCha20::new(key, nonce);
    let mac_key = one_time_key(&mut cipher)?;

    if !authenticator(&mac_key, associated_data, ciphertext).verify(tag) {
        trace!(variant = nonce.variant().name(), "authentication failed");
        return Ok(None);
    }

    cipher.seek(FIRST_DATA_BLOCK)?;
    Ok(Some(cipher))
}

/// Derives the Poly1305 key from keystream block 0.
fn one_time_key(cipher: &mut ChaCha20) -> Result<Zeroizing<[u8; 32]>> {
    let mut key = Zeroizing::new([0u8; 32]);
    cipher.fill_keystream(&mut key[..])?;
    Ok(key)
}

/// Feeds the padded MAC input for `(associated_data, ciphertext)`.
fn authenticator(mac_key: &[u8; 32], associated_data: &[u8], ciphertext: &[u8]) -> Poly1305 {
    let mut mac = Poly1305::new(mac_key);

    mac.update(associated_data)
        .pad16()
        .update(ciphertext)
        .pad16()
        .update(&(associated_data.len() as u64).to_le_bytes())
        .update(&(ciphertext.len() as u64).to_le_bytes());

    mac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn ietf_length_limit_is_enforced_before_work() {
        let nonce = Nonce::Ietf([0u8; 12]);
        let max = (u32::MAX as usize) * BLOCK_LEN;

        assert!(check_message_length(&nonce, max).is_ok());
        assert_eq!(
            check_message_length(&nonce, max + 1),
            Err(Error::CounterOverflow)
        );
    }

    #[test]
    fn block_zero_is_not_used_for_data() {
        let key = [1u8; 32];
        let nonce = Nonce::Ietf([2u8; 12]);

        let mut buffer = [0u8; 64];
        seal_in_place(&key, &nonce, &[], &mut buffer).unwrap();

        assert_eq!(buffer, crate::stream::block(&key, 1, &[2u8; 12]));
    }

    #[test]
    fn verify_rejects_wrong_tag() {
        let key = [3u8; 32];
        let nonce = Nonce::Extended([4u8; 24]);

        let mut buffer = *b"attack at dawn";
        let mut tag = seal_in_place(&key, &nonce, b"hdr", &mut buffer).unwrap();
        assert!(verify(&key, &nonce, b"hdr", &buffer, &tag).unwrap().is_some());

        tag[0] ^= 1;
        assert!(verify(&key, &nonce, b"hdr", &buffer, &tag).unwrap().is_none());
    }
}
