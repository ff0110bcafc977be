use chachapoly::Error;
use chachapoly::stream::{
    ChaCha20, Nonce, Variant, block, hchacha20, stream, stream_xor, stream_xor_in_place,
};

const SUNSCREEN: &[u8] = b"Ladies and Gentlemen of the class of '99: If I could offer you only one tip for the future, sunscreen would be it.";

fn unhex<const N: usize>(s: &str) -> [u8; N] {
    hex::decode(s).unwrap().try_into().unwrap()
}

fn sequential_key() -> [u8; 32] {
    core::array::from_fn(|i| i as u8)
}

#[test]
fn test_zero_key_zero_nonce_keystream() {
    let mut out = [0u8; 71];
    stream(&[0u8; 32], &Nonce::Short([0u8; 8]), 0, &mut out).unwrap();

    assert_eq!(&out[..5], &[0x76, 0xb8, 0xe0, 0xad, 0xa0]);
    assert_eq!(
        hex::encode(&out[..64]),
        "76b8e0ada0f13d90405d6ae55386bd28bdd219b8a08ded1aa836efcc8b770dc7\
         da41597c5157488d7724e03fb8d84a376a43b8f41518a11cc387b669b2ee6586"
    );

    // The tail comes from block 1.
    let second = block(&[0u8; 32], 1, &[0u8; 12]);
    assert_eq!(&out[64..], &second[..7]);
}

#[test]
fn test_rfc8439_block_function() {
    let nonce: [u8; 12] = unhex("000000090000004a00000000");
    let out = block(&sequential_key(), 1, &nonce);

    assert_eq!(
        hex::encode(out),
        "10f1e7e4d13b5915500fdd1fa32071c4c7d1f4c733c068030422aa9ac3d46c4e\
         d2826446079faa0914c2d705d98b02a2b5129cd1de164eb9cbd083e8a2503c4e"
    );
}

#[test]
fn test_rfc8439_encryption() {
    let nonce = Nonce::Ietf(unhex("000000000000004a00000000"));
    let mut ciphertext = vec![0u8; SUNSCREEN.len()];
    stream_xor(&sequential_key(), &nonce, 1, SUNSCREEN, &mut ciphertext).unwrap();

    assert_eq!(
        hex::encode(&ciphertext),
        "6e2e359a2568f98041ba0728dd0d6981e97e7aec1d4360c20a27afccfd9fae0b\
         f91b65c5524733ab8f593dabcd62b3571639d624e65152ab8f530c359f0861d8\
         07ca0dbf500d6a6156a38e088a22b65e52bc514d16ccf806818ce91ab7793736\
         5af90bbf74a35be6b40b8eedf2785e42874d"
    );

    let mut decrypted = vec![0u8; ciphertext.len()];
    stream_xor(&sequential_key(), &nonce, 1, &ciphertext, &mut decrypted).unwrap();
    assert_eq!(decrypted, SUNSCREEN);
}

#[test]
fn test_rfc8439_poly1305_key_generation() {
    let key: [u8; 32] = core::array::from_fn(|i| 0x80 + i as u8);
    let nonce: [u8; 12] = unhex("000000000001020304050607");

    let out = block(&key, 0, &nonce);
    assert_eq!(
        hex::encode(&out[..32]),
        "8ad5a08b905f81cc815040274ab29471a833b637e3fd0da508dbb8e2fdd1a646"
    );
}

#[test]
fn test_hchacha20_subkey() {
    let nonce: [u8; 16] = unhex("000000090000004a0000000031415927");
    let subkey = hchacha20(&sequential_key(), &nonce);

    assert_eq!(
        hex::encode(subkey),
        "82413b4227b27bfed30e42508a877d73a0f9e4d58a74a853c12ec41326d3ecdc"
    );
}

#[test]
fn test_xchacha20_is_hchacha20_then_short_nonce() {
    let key = sequential_key();
    let nonce: [u8; 24] = core::array::from_fn(|i| 0x40 + i as u8);

    let mut extended = [0u8; 300];
    stream(&key, &Nonce::Extended(nonce), 0, &mut extended).unwrap();

    let mut prefix = [0u8; 16];
    prefix.copy_from_slice(&nonce[..16]);
    let mut inner = [0u8; 8];
    inner.copy_from_slice(&nonce[16..]);
    let subkey = hchacha20(&key, &prefix);

    let mut manual = [0u8; 300];
    stream(&subkey, &Nonce::Short(inner), 0, &mut manual).unwrap();

    assert_eq!(extended, manual);
}

#[test]
fn test_short_and_ietf_agree_for_zero_nonce() {
    let key = [0x11u8; 32];
    let mut short = [0u8; 256];
    let mut ietf = [0u8; 256];

    stream(&key, &Nonce::Short([0u8; 8]), 3, &mut short).unwrap();
    stream(&key, &Nonce::Ietf([0u8; 12]), 3, &mut ietf).unwrap();

    assert_eq!(short, ietf);
}

#[test]
fn test_in_place_matches_separate_destination() {
    let key = [0x5au8; 32];
    let nonce = Nonce::Extended([0xa5u8; 24]);
    let data: Vec<u8> = (0..500u32).map(|i| i as u8).collect();

    let mut out = vec![0u8; data.len()];
    stream_xor(&key, &nonce, 7, &data, &mut out).unwrap();

    let mut buf = data.clone();
    stream_xor_in_place(&key, &nonce, 7, &mut buf).unwrap();

    assert_eq!(out, buf);
    assert_ne!(out, data);
}

#[test]
fn test_stream_xor_is_deterministic_and_invertible() {
    let key = [0x01u8; 32];
    let nonce = Nonce::Ietf([0x02u8; 12]);
    let data = b"determinism matters for stream ciphers";

    let mut a = vec![0u8; data.len()];
    let mut b = vec![0u8; data.len()];
    stream_xor(&key, &nonce, 0, data, &mut a).unwrap();
    stream_xor(&key, &nonce, 0, data, &mut b).unwrap();
    assert_eq!(a, b);

    stream_xor_in_place(&key, &nonce, 0, &mut a).unwrap();
    assert_eq!(&a[..], &data[..]);
}

#[test]
fn test_ietf_counter_overflow_is_detected() {
    let key = [0u8; 32];
    let nonce = Nonce::Ietf([0u8; 12]);

    let mut one_block = [0u8; 64];
    assert!(stream(&key, &nonce, u32::MAX as u64, &mut one_block).is_ok());

    let mut two_blocks = [0u8; 65];
    assert_eq!(
        stream(&key, &nonce, u32::MAX as u64, &mut two_blocks),
        Err(Error::CounterOverflow)
    );
    assert_eq!(two_blocks, [0u8; 65]);

    assert_eq!(
        stream(&key, &nonce, u32::MAX as u64 + 1, &mut [0u8; 1]),
        Err(Error::CounterOverflow)
    );
}

#[test]
fn test_short_nonce_counter_overflow_is_detected() {
    let key = [0u8; 32];
    let nonce = Nonce::Short([0u8; 8]);

    let mut cipher = ChaCha20::with_counter(&key, &nonce, u64::MAX).unwrap();
    let mut buf = [0u8; 64];
    cipher.apply_keystream(&mut buf).unwrap();
    assert_eq!(cipher.apply_keystream(&mut [0u8; 1]), Err(Error::CounterOverflow));
}

#[test]
fn test_failed_xor_leaves_destination_untouched() {
    let key = [0u8; 32];
    let nonce = Nonce::Ietf([0u8; 12]);
    let src = [0x77u8; 128];
    let mut dst = [0xeeu8; 128];

    assert_eq!(
        stream_xor(&key, &nonce, u32::MAX as u64, &src, &mut dst),
        Err(Error::CounterOverflow)
    );
    assert_eq!(dst, [0xeeu8; 128]);
}

#[test]
fn test_nonce_slices_select_variant_once() {
    let cipher = ChaCha20::new_from_slices(&[0u8; 32], &[0u8; 24]).unwrap();
    assert_eq!(cipher.variant(), Variant::XChaCha20);

    assert!(matches!(
        ChaCha20::new_from_slices(&[0u8; 32], &[0u8; 16]),
        Err(Error::InvalidNonceLength { actual: 16, .. })
    ));
}

#[test]
fn test_seek_rewinds_stream() {
    let key = [0x33u8; 32];
    let nonce = Nonce::Ietf([0x44u8; 12]);
    let mut cipher = ChaCha20::new(&key, &nonce);

    let mut first = [0u8; 100];
    cipher.fill_keystream(&mut first).unwrap();

    cipher.seek(0).unwrap();
    let mut again = [0u8; 100];
    cipher.fill_keystream(&mut again).unwrap();

    assert_eq!(first, again);
}
