//! Orchestration over the model, ingest, and taxonomy crates: per-sample
//! ETL and the merge engine that combines standardised samples.

pub mod error;
pub mod etl;
pub mod merge;

pub use error::{MergeError, StandardisationError};
pub use etl::{RankSummary, SampleEtl, etl_samples};
pub use merge::{merge_long, merge_wide};
