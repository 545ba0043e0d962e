//! Regression backend on aprender: feature encoding, candidate models,
//! selection by holdout R² and the persisted artifact.

pub mod artifact;
pub mod encoding;
pub mod regressor;
pub mod selection;

pub use artifact::{ArtifactPaths, ModelArtifact, ModelMetadata};
pub use regressor::FittedModel;
pub use selection::{compare_models, CandidateScore, SetupOptions};
