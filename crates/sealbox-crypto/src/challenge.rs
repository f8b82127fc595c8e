//! Passphrase challenge stored in bundle metadata
//!
//! The passphrase is kept as plain base64 so the extractor can compare the
//! user's input before attempting decryption. Anyone holding the artifact can
//! decode it; it is a convenience check, not a secret.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};

use sealbox_core::{SealError, SealResult};

/// Encode a passphrase for embedding. An empty passphrase encodes to "".
pub fn encode_challenge(secret: &SecretString) -> String {
    STANDARD.encode(secret.expose_secret().as_bytes())
}

/// Recover the passphrase from its embedded form.
pub fn decode_challenge(challenge: &str) -> SealResult<SecretString> {
    let bytes = STANDARD
        .decode(challenge)
        .map_err(|e| SealError::Bundle(format!("challenge is not valid base64: {e}")))?;
    let text = String::from_utf8(bytes)
        .map_err(|_| SealError::Bundle("challenge is not valid UTF-8".into()))?;
    Ok(SecretString::from(text))
}

/// Compare user input against the embedded challenge.
///
/// Returns `InvalidKey` on mismatch. An empty challenge accepts anything.
pub fn verify_challenge(challenge: &str, supplied: &SecretString) -> SealResult<()> {
    if challenge.is_empty() {
        return Ok(());
    }
    let expected = decode_challenge(challenge)?;
    if expected.expose_secret() == supplied.expose_secret() {
        Ok(())
    } else {
        Err(SealError::InvalidKey)
    }
}
