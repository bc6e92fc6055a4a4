use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// A profile could not be read or standardised.
///
/// Carries enough context to name the offending input in user-facing
/// output; recoverable when the caller runs with an ignore-errors policy.
#[derive(Debug, Error)]
#[error("sample '{sample}' ({path}): {message}", path = .profile.display())]
pub struct StandardisationError {
    pub sample: String,
    pub profile: PathBuf,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("at least one sample is required for merging")]
    NoSamples,
    #[error("sample '{sample}' repeats taxonomy identifier {id}")]
    DuplicateTaxonomyId { sample: String, id: i64 },
    #[error(transparent)]
    Polars(#[from] PolarsError),
}
