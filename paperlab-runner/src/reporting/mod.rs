//! Persistence of run outputs to canonical artifacts.

mod artifacts;

pub use artifacts::{ArtifactPaths, ArtifactWriter, RunManifest};
