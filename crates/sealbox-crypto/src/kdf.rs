//! Key derivation: bundle metadata + passphrase → 256-bit key
//!
//! A single SHA-256 over a delimited string. There is no salt, no iteration
//! count and no memory-hard step, so this is far weaker than Argon2id; the
//! format depends on it staying exactly as is.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use sealbox_core::{BundleMetadata, Timestamp};

use crate::KEY_SIZE;

/// Field separator in the hashed string. Changing it breaks every artifact.
pub const KDF_DELIMITER: &str = "|";

/// Constant appended to the hashed string. Changing it breaks every artifact.
pub const KDF_SUFFIX: &str = "sealbox-kdf-v1";

/// A 256-bit bundle key. Zeroized on drop.
#[derive(Clone)]
pub struct BundleKey {
    bytes: [u8; KEY_SIZE],
}

impl BundleKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for BundleKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for BundleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Inputs to the key derivation, borrowed from wherever they live.
#[derive(Debug, Clone, Copy)]
pub struct KeyMaterial<'a> {
    pub secret: &'a SecretString,
    pub artifact_name: &'a str,
    pub payload_size: u64,
    pub timestamp: Timestamp,
}

impl<'a> KeyMaterial<'a> {
    /// Pair a passphrase with the non-secret fields of the bundle metadata.
    pub fn from_metadata(secret: &'a SecretString, metadata: &'a BundleMetadata) -> Self {
        Self {
            secret,
            artifact_name: &metadata.artifact_name,
            payload_size: metadata.payload_size,
            timestamp: metadata.timestamp,
        }
    }

    pub fn derive(&self) -> BundleKey {
        derive_key(
            self.secret,
            self.artifact_name,
            self.payload_size,
            self.timestamp,
        )
    }
}

/// Derive the bundle key. Deterministic: identical inputs yield identical keys.
///
/// An empty `secret` is valid and means "no passphrase"; it still produces a
/// regular key, not a plaintext mode.
pub fn derive_key(
    secret: &SecretString,
    artifact_name: &str,
    payload_size: u64,
    timestamp: Timestamp,
) -> BundleKey {
    let mut input = format!(
        "{secret}{d}{artifact_name}{d}{payload_size}{d}{ticks}{d}{KDF_SUFFIX}",
        secret = secret.expose_secret(),
        d = KDF_DELIMITER,
        ticks = timestamp.ticks(),
    );

    let digest = Sha256::digest(input.as_bytes());
    input.zeroize();

    let mut bytes = [0u8; KEY_SIZE];
    bytes.copy_from_slice(&digest);
    BundleKey::from_bytes(bytes)
}
