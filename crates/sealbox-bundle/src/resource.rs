//! Embeddable resource: unencrypted metadata followed by the encrypted blob
//!
//! Resource format (binary, little-endian):
//! ```text
//! [8 bytes: magic "SBXBNDL1"][4 bytes: metadata length M]
//! [M bytes: metadata JSON][rest: IV‖ciphertext]
//! ```

use sealbox_core::{BundleMetadata, SealError, SealResult};

/// Leading magic of an embedded resource
pub const RESOURCE_MAGIC: &[u8; 8] = b"SBXBNDL1";

const HEADER_LEN: usize = RESOURCE_MAGIC.len() + 4;

/// A parsed resource borrowing its blob from the embedded bytes.
#[derive(Debug, Clone)]
pub struct ParsedBundle<'r> {
    pub metadata: BundleMetadata,
    pub blob: &'r [u8],
}

/// Serialize metadata and blob into one resource.
pub fn assemble(blob: &[u8], metadata: &BundleMetadata) -> SealResult<Vec<u8>> {
    let meta = serde_json::to_vec(metadata)
        .map_err(|e| SealError::Bundle(format!("metadata serialization: {e}")))?;
    let meta_len = u32::try_from(meta.len())
        .map_err(|_| SealError::Bundle("metadata too large".into()))?;

    let mut resource = Vec::with_capacity(HEADER_LEN + meta.len() + blob.len());
    resource.extend_from_slice(RESOURCE_MAGIC);
    resource.extend_from_slice(&meta_len.to_le_bytes());
    resource.extend_from_slice(&meta);
    resource.extend_from_slice(blob);
    Ok(resource)
}

/// Split a resource back into metadata and blob.
///
/// The blob is not validated here; a truncated blob is reported by the
/// cipher as `MalformedBlob`.
pub fn parse(resource: &[u8]) -> SealResult<ParsedBundle<'_>> {
    if resource.len() < HEADER_LEN || &resource[..RESOURCE_MAGIC.len()] != RESOURCE_MAGIC {
        return Err(SealError::Bundle("missing bundle header".into()));
    }

    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&resource[RESOURCE_MAGIC.len()..HEADER_LEN]);
    let meta_len = u32::from_le_bytes(len_bytes) as usize;

    let meta_end = HEADER_LEN
        .checked_add(meta_len)
        .filter(|end| *end <= resource.len())
        .ok_or_else(|| SealError::Bundle("metadata length exceeds resource".into()))?;

    let metadata: BundleMetadata = serde_json::from_slice(&resource[HEADER_LEN..meta_end])
        .map_err(|e| SealError::Bundle(format!("metadata deserialization: {e}")))?;
    if metadata.version != BundleMetadata::VERSION {
        return Err(SealError::Bundle(format!(
            "unsupported bundle version {}",
            metadata.version
        )));
    }

    Ok(ParsedBundle {
        metadata,
        blob: &resource[meta_end..],
    })
}
