//! AES-256-CBC encryption/decryption of the packed container
//!
//! Encrypted blob format (binary):
//! ```text
//! [16 bytes: random IV][N bytes: ciphertext, PKCS#7 padded to a multiple of 16]
//! ```
//!
//! No MAC is computed. Padding validation is the only check on decrypt.

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use tracing::debug;

use sealbox_core::{SealError, SealResult};

use crate::kdf::BundleKey;
use crate::{BLOCK_SIZE, IV_SIZE};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Encrypt `plaintext` under `key` with a fresh random IV.
///
/// Returns: `[16-byte IV][ciphertext]`
pub fn encrypt(plaintext: &[u8], key: &BundleKey) -> Vec<u8> {
    let mut iv = [0u8; IV_SIZE];
    rand::thread_rng().fill_bytes(&mut iv);

    let ciphertext = Aes256CbcEnc::new(key.as_bytes().into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    debug!(
        plaintext = plaintext.len(),
        ciphertext = ciphertext.len(),
        "encrypted payload"
    );

    let mut blob = Vec::with_capacity(IV_SIZE + ciphertext.len());
    blob.extend_from_slice(&iv);
    blob.extend_from_slice(&ciphertext);
    blob
}

/// Decrypt an `IV‖ciphertext` blob produced by [`encrypt`].
///
/// Fails with `MalformedBlob` when the blob cannot hold an IV plus at least
/// one byte, and with `DecryptionFailed` when padding does not validate.
pub fn decrypt(blob: &[u8], key: &BundleKey) -> SealResult<Vec<u8>> {
    if blob.len() <= IV_SIZE {
        return Err(SealError::MalformedBlob { len: blob.len() });
    }

    let (iv, ciphertext) = blob.split_at(IV_SIZE);
    if ciphertext.len() % BLOCK_SIZE != 0 {
        debug!(len = ciphertext.len(), "ciphertext is not block aligned");
        return Err(SealError::DecryptionFailed);
    }

    let mut iv_bytes = [0u8; IV_SIZE];
    iv_bytes.copy_from_slice(iv);

    Aes256CbcDec::new(key.as_bytes().into(), &iv_bytes.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| SealError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KEY_SIZE;
    use proptest::prelude::*;

    fn key(byte: u8) -> BundleKey {
        BundleKey::from_bytes([byte; KEY_SIZE])
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let k = key(0x42);
        let plaintext = b"hello, sealed world!";

        let blob = encrypt(plaintext, &k);
        let decrypted = decrypt(&blob, &k).unwrap();

        assert_eq!(&decrypted, plaintext);
    }

    #[test]
    fn test_encrypt_decrypt_empty() {
        let k = key(1);
        let blob = encrypt(b"", &k);

        // IV + one full padding block
        assert_eq!(blob.len(), IV_SIZE + BLOCK_SIZE);
        assert_eq!(decrypt(&blob, &k).unwrap(), b"");
    }

    #[test]
    fn test_encrypted_size() {
        let k = key(2);
        for (len, expected_ct) in [(1usize, 16usize), (15, 16), (16, 32), (17, 32), (1000, 1008)] {
            let blob = encrypt(&vec![0u8; len], &k);
            assert_eq!(blob.len(), IV_SIZE + expected_ct, "plaintext length {len}");
        }
    }

    #[test]
    fn test_iv_is_fresh_per_encryption() {
        let k = key(3);
        let a = encrypt(b"same plaintext", &k);
        let b = encrypt(b"same plaintext", &k);

        assert_ne!(a[..IV_SIZE], b[..IV_SIZE], "IVs must differ");
        assert_ne!(a, b, "blobs must differ");
    }

    #[test]
    fn test_short_blob_is_malformed() {
        let k = key(4);
        for len in [0usize, 1, 15, 16] {
            let err = decrypt(&vec![0u8; len], &k).unwrap_err();
            assert!(
                matches!(err, SealError::MalformedBlob { len: l } if l == len),
                "length {len} must be malformed"
            );
        }
    }

    #[test]
    fn test_unaligned_ciphertext_fails() {
        let k = key(5);
        let err = decrypt(&[0u8; IV_SIZE + 5], &k).unwrap_err();
        assert!(matches!(err, SealError::DecryptionFailed));
    }

    #[test]
    fn test_decrypt_wrong_key() {
        let plaintext = b"secret data that should stay secret";
        let blob = encrypt(plaintext, &key(6));

        // Without a MAC a wrong key occasionally yields valid padding; it can
        // never yield the original plaintext.
        match decrypt(&blob, &key(7)) {
            Err(SealError::DecryptionFailed) => {}
            Ok(garbage) => assert_ne!(garbage, plaintext),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tampered_iv_changes_first_block() {
        let k = key(8);
        let plaintext = b"0123456789abcdef-second-block";
        let mut blob = encrypt(plaintext, &k);
        blob[0] ^= 0xFF;

        // CBC: flipping IV bits flips the same bits of the first plaintext block
        let decrypted = decrypt(&blob, &k).unwrap();
        assert_eq!(decrypted[0], plaintext[0] ^ 0xFF);
        assert_eq!(&decrypted[1..], &plaintext[1..]);
    }

    proptest! {
        #[test]
        fn encrypt_decrypt_roundtrip(
            data in proptest::collection::vec(any::<u8>(), 0..=4096),
            key_bytes in any::<[u8; 32]>(),
        ) {
            let k = BundleKey::from_bytes(key_bytes);
            let blob = encrypt(&data, &k);
            prop_assert_eq!((blob.len() - IV_SIZE) % BLOCK_SIZE, 0);
            prop_assert!(blob.len() - IV_SIZE > data.len());
            let out = decrypt(&blob, &k).unwrap();
            prop_assert_eq!(out, data, "round-trip must be identical");
        }
    }
}
