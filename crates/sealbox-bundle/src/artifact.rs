//! Artifact building: prebuilt extractor executable + embedded resource
//!
//! Artifact layout:
//! ```text
//! [extractor executable bytes][resource][8 bytes: resource length, LE u64][8 bytes: "SBXTRAIL"]
//! ```
//!
//! The extractor reads its own executable, finds the trailer at the end and
//! slices the resource out. Nothing is compiled at generation time.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use sealbox_core::{SealError, SealResult};

/// Final 8 bytes of every artifact
pub const TRAILER_MAGIC: &[u8; 8] = b"SBXTRAIL";

const TRAILER_LEN: usize = 8 + TRAILER_MAGIC.len();

/// Turns an embeddable resource into a standalone runnable artifact.
pub trait ArtifactBuilder {
    /// Write the artifact to `output`. Nothing is left at `output` on failure.
    fn build(&self, resource: &[u8], output: &Path) -> SealResult<()>;
}

/// Appends the resource to a copy of a prebuilt extractor executable.
#[derive(Debug, Clone)]
pub struct StubArtifactBuilder {
    stub: PathBuf,
}

impl StubArtifactBuilder {
    pub fn new(stub: impl Into<PathBuf>) -> Self {
        Self { stub: stub.into() }
    }

    pub fn stub(&self) -> &Path {
        &self.stub
    }
}

impl ArtifactBuilder for StubArtifactBuilder {
    fn build(&self, resource: &[u8], output: &Path) -> SealResult<()> {
        let stub = fs::read(&self.stub)?;
        let artifact = append_resource(&stub, resource);

        // Write beside the target and rename so a failed write never leaves a
        // truncated artifact under the final name
        let partial = output.with_extension("partial");
        let written = fs::write(&partial, &artifact)
            .and_then(|_| mark_executable(&partial))
            .and_then(|_| fs::rename(&partial, output));
        if let Err(e) = written {
            let _ = fs::remove_file(&partial);
            return Err(e.into());
        }

        info!(
            stub = %self.stub.display(),
            output = %output.display(),
            bytes = artifact.len(),
            "built artifact"
        );
        Ok(())
    }
}

/// `stub ‖ resource ‖ len ‖ magic`
pub fn append_resource(stub: &[u8], resource: &[u8]) -> Vec<u8> {
    let mut artifact = Vec::with_capacity(stub.len() + resource.len() + TRAILER_LEN);
    artifact.extend_from_slice(stub);
    artifact.extend_from_slice(resource);
    artifact.extend_from_slice(&(resource.len() as u64).to_le_bytes());
    artifact.extend_from_slice(TRAILER_MAGIC);
    artifact
}

/// Find the embedded resource at the end of an artifact.
pub fn locate_resource(artifact: &[u8]) -> SealResult<&[u8]> {
    if artifact.len() < TRAILER_LEN || !artifact.ends_with(TRAILER_MAGIC) {
        return Err(SealError::Bundle("no embedded payload found".into()));
    }

    let len_start = artifact.len() - TRAILER_LEN;
    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&artifact[len_start..len_start + 8]);
    let resource_len = usize::try_from(u64::from_le_bytes(len_bytes))
        .map_err(|_| SealError::Bundle("embedded payload length overflows".into()))?;

    let start = len_start
        .checked_sub(resource_len)
        .ok_or_else(|| SealError::Bundle("embedded payload length exceeds artifact".into()))?;

    debug!(offset = start, len = resource_len, "located embedded payload");
    Ok(&artifact[start..len_start])
}

/// `SelfExtractor_` + `notes.txt` → `SelfExtractor_notes` plus the platform
/// executable suffix.
pub fn artifact_file_name(prefix: &str, artifact_name: &str) -> String {
    let stem = Path::new(artifact_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| artifact_name.to_string());
    format!("{prefix}{stem}{}", std::env::consts::EXE_SUFFIX)
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
