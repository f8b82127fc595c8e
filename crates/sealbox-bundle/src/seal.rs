//! Generation pipeline: selections → sealed bundle
//!
//! Every check runs before any output exists, so a failure never leaves a
//! half-built artifact behind.

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use sealbox_archive::{measure, pack, CapacityGate, PackOptions};
use sealbox_core::{BundleMetadata, SealError, SealResult, Selection, Timestamp};
use sealbox_crypto::{derive_key, encode_challenge, encrypt};

use crate::resource::assemble;

/// Everything needed to seal one artifact
#[derive(Debug)]
pub struct SealRequest {
    pub selections: Vec<Selection>,
    /// Empty means "no passphrase"
    pub passphrase: SecretString,
    pub artifact_name: String,
    pub timestamp: Timestamp,
    pub gate: CapacityGate,
    pub pack: PackOptions,
}

/// Encrypted container plus the metadata needed to re-derive its key
#[derive(Debug, Clone)]
pub struct SealedBundle {
    pub metadata: BundleMetadata,
    pub blob: Vec<u8>,
}

impl SealedBundle {
    /// Serialize into the resource embedded in an artifact.
    pub fn to_resource(&self) -> SealResult<Vec<u8>> {
        assemble(&self.blob, &self.metadata)
    }
}

/// Artifact name derived from the first selection.
pub fn default_artifact_name(selections: &[Selection]) -> SealResult<String> {
    selections
        .first()
        .map(Selection::base_name)
        .ok_or(SealError::SelectionEmpty)
}

/// Gate, pack, and encrypt the selections.
pub fn seal(request: &SealRequest) -> SealResult<SealedBundle> {
    if request.selections.is_empty() {
        return Err(SealError::SelectionEmpty);
    }

    let total = measure(&request.selections)?;
    request.gate.check_fits(total)?;

    let container = pack(&request.selections, &request.pack)?;
    // Files may grow between measuring and packing
    request.gate.check_fits(container.payload_size)?;

    let key = derive_key(
        &request.passphrase,
        &request.artifact_name,
        container.payload_size,
        request.timestamp,
    );
    let blob = encrypt(&container.bytes, &key);

    let metadata = BundleMetadata {
        version: BundleMetadata::VERSION,
        artifact_name: request.artifact_name.clone(),
        payload_size: container.payload_size,
        timestamp: request.timestamp,
        challenge: encode_challenge(&request.passphrase),
    };

    info!(
        artifact = %metadata.artifact_name,
        entries = container.entries,
        payload_size = metadata.payload_size,
        blob = blob.len(),
        passphrase = !request.passphrase.expose_secret().is_empty(),
        "sealed bundle"
    );

    Ok(SealedBundle { metadata, blob })
}
