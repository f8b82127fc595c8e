//! sealbox-crypto: key derivation and symmetric encryption for sealed bundles
//!
//! Pipeline: container bytes → AES-256-CBC (random IV, PKCS#7) → `IV‖ciphertext`
//!
//! Key material:
//! ```text
//! SHA-256( secret | artifact_name | payload_size | timestamp | KDF_SUFFIX )
//! ```
//!
//! The key is never stored. Both generator and extractor recompute it from the
//! bundle metadata plus the passphrase (empty when none was set).
//!
//! There is no authentication tag: a wrong passphrase and a corrupted payload
//! surface as the same `DecryptionFailed` error.

pub mod challenge;
pub mod cipher;
pub mod kdf;

pub use challenge::{decode_challenge, encode_challenge, verify_challenge};
pub use cipher::{decrypt, encrypt};
pub use kdf::{derive_key, BundleKey, KeyMaterial};

/// Size of a derived key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of the CBC initialization vector (one AES block)
pub const IV_SIZE: usize = 16;

/// AES block size; ciphertext lengths are always a multiple of this
pub const BLOCK_SIZE: usize = 16;
