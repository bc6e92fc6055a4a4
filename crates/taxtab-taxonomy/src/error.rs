use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("missing taxonomy file: {0}")]
    MissingFile(PathBuf),
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line}: {reason}")]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("no taxon of rank '{rank}' in the lineage of {id}")]
    UnmappedRank { id: i64, rank: String },
    #[error(transparent)]
    Schema(#[from] taxtab_model::SchemaError),
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, TaxonomyError>;
