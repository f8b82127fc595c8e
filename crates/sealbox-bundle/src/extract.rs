//! Extractor runtime: embedded resource → files under a chosen directory
//!
//! State machine:
//! ```text
//! Init → ChallengeIfNeeded → DestinationSelected → Decrypting → Unpacking → Done
//! ```
//! Any step may fail; the error is terminal. The passphrase the user typed is
//! carried forward inside the state and is the secret used for the key; the
//! embedded challenge is only ever compared against it.

use std::path::PathBuf;

use secrecy::SecretString;
use tracing::{debug, info, warn};

use sealbox_archive::{unpack, UnpackReport};
use sealbox_core::{SealError, SealResult};
use sealbox_crypto::{decrypt, verify_challenge, KeyMaterial};

use crate::resource::{parse, ParsedBundle};

/// User interaction needed during extraction.
pub trait ExtractPrompt {
    /// Ask for the passphrase. `None` when the user gave no input.
    fn passphrase(&mut self, artifact_name: &str) -> SealResult<Option<SecretString>>;

    /// Ask where to extract. `None` when the user chose nothing.
    fn destination(&mut self, artifact_name: &str) -> SealResult<Option<PathBuf>>;
}

/// Outcome of a successful extraction
#[derive(Debug, Clone)]
pub struct ExtractReport {
    pub artifact_name: String,
    pub destination: PathBuf,
    pub unpacked: UnpackReport,
}

/// One extractor state, holding exactly what the next step needs.
#[derive(Debug)]
pub enum ExtractState<'r> {
    Init {
        resource: &'r [u8],
    },
    ChallengeIfNeeded {
        bundle: ParsedBundle<'r>,
    },
    DestinationSelected {
        bundle: ParsedBundle<'r>,
        secret: SecretString,
    },
    Decrypting {
        bundle: ParsedBundle<'r>,
        secret: SecretString,
        destination: PathBuf,
    },
    Unpacking {
        artifact_name: String,
        container: Vec<u8>,
        destination: PathBuf,
    },
    Done(ExtractReport),
}

impl<'r> ExtractState<'r> {
    pub fn new(resource: &'r [u8]) -> Self {
        ExtractState::Init { resource }
    }

    pub fn phase(&self) -> &'static str {
        match self {
            ExtractState::Init { .. } => "init",
            ExtractState::ChallengeIfNeeded { .. } => "challenge",
            ExtractState::DestinationSelected { .. } => "destination",
            ExtractState::Decrypting { .. } => "decrypting",
            ExtractState::Unpacking { .. } => "unpacking",
            ExtractState::Done(_) => "done",
        }
    }

    /// Advance by one transition. `Done` stays `Done`.
    pub fn step(self, prompt: &mut dyn ExtractPrompt) -> SealResult<ExtractState<'r>> {
        match self {
            ExtractState::Init { resource } => {
                let bundle = parse(resource)?;
                debug!(
                    artifact = %bundle.metadata.artifact_name,
                    payload_size = bundle.metadata.payload_size,
                    challenge = bundle.metadata.has_challenge(),
                    "read bundle metadata"
                );
                Ok(ExtractState::ChallengeIfNeeded { bundle })
            }

            ExtractState::ChallengeIfNeeded { bundle } => {
                if !bundle.metadata.has_challenge() {
                    return Ok(ExtractState::DestinationSelected {
                        bundle,
                        secret: SecretString::from(""),
                    });
                }
                let supplied = prompt
                    .passphrase(&bundle.metadata.artifact_name)?
                    .ok_or(SealError::InvalidKey)?;
                verify_challenge(&bundle.metadata.challenge, &supplied)?;
                Ok(ExtractState::DestinationSelected {
                    bundle,
                    secret: supplied,
                })
            }

            ExtractState::DestinationSelected { bundle, secret } => {
                let destination = prompt
                    .destination(&bundle.metadata.artifact_name)?
                    .ok_or(SealError::NoDestination)?;
                if !destination.exists() {
                    std::fs::create_dir_all(&destination)?;
                    info!(path = %destination.display(), "created destination");
                }
                Ok(ExtractState::Decrypting {
                    bundle,
                    secret,
                    destination,
                })
            }

            ExtractState::Decrypting {
                bundle,
                secret,
                destination,
            } => {
                let key = KeyMaterial::from_metadata(&secret, &bundle.metadata).derive();
                let container = decrypt(bundle.blob, &key)?;
                Ok(ExtractState::Unpacking {
                    artifact_name: bundle.metadata.artifact_name,
                    container,
                    destination,
                })
            }

            ExtractState::Unpacking {
                artifact_name,
                container,
                destination,
            } => {
                let unpacked = unpack(&container, &destination)?;
                Ok(ExtractState::Done(ExtractReport {
                    artifact_name,
                    destination,
                    unpacked,
                }))
            }

            done @ ExtractState::Done(_) => Ok(done),
        }
    }
}

/// Run the state machine to completion.
pub fn extract(resource: &[u8], prompt: &mut dyn ExtractPrompt) -> SealResult<ExtractReport> {
    let mut state = ExtractState::new(resource);
    loop {
        if let ExtractState::Done(report) = state {
            info!(
                artifact = %report.artifact_name,
                dest = %report.destination.display(),
                files = report.unpacked.files,
                "extraction complete"
            );
            return Ok(report);
        }
        let phase = state.phase();
        state = state.step(prompt).map_err(|e| {
            warn!(phase, kind = e.kind(), error = %e, "extraction failed");
            e
        })?;
    }
}
