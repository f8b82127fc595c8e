//! sealbox-bundle: sealing selections into artifacts and extracting them again
//!
//! Generation: selections → capacity gate → pack → derive key → encrypt →
//! resource (metadata + blob) → artifact (extractor stub + resource + trailer)
//!
//! Extraction is the state machine in [`extract`].

pub mod artifact;
pub mod extract;
pub mod resource;
pub mod seal;

pub use artifact::{artifact_file_name, locate_resource, ArtifactBuilder, StubArtifactBuilder};
pub use extract::{extract, ExtractPrompt, ExtractReport, ExtractState};
pub use resource::{assemble, parse, ParsedBundle};
pub use seal::{default_artifact_name, seal, SealRequest, SealedBundle};
