//! DIAMOND taxonomic classification output (`diamond blastx --outfmt 102`).
//!
//! One row per query with its voted taxon; the standard profile counts
//! queries per taxon.

use std::path::Path;

use anyhow::Result;
use polars::prelude::DataFrame;
use taxtab_model::{SchemaError, standard_profile};

use crate::profilers::fold_counts;
use crate::table::{self, ColumnKind, ColumnSpec, ReadOptions};

pub const QUERY_ID: &str = "query_id";
pub const TAXONOMY_ID: &str = "taxonomy_id";
pub const E_VALUE: &str = "e_value";

const COLUMNS: [ColumnSpec; 3] = [
    ColumnSpec::new(QUERY_ID, ColumnKind::Str),
    ColumnSpec::new(TAXONOMY_ID, ColumnKind::Int),
    ColumnSpec::new(E_VALUE, ColumnKind::Float),
];

pub fn read(path: &Path) -> Result<DataFrame> {
    let rows = table::read_rows(path, ReadOptions::default())?;
    Ok(frame_from_rows(&rows)?)
}

pub(crate) fn frame_from_rows(rows: &[Vec<String>]) -> Result<DataFrame, SchemaError> {
    table::typed_frame(rows, &COLUMNS)
}

pub fn transform(raw: &DataFrame) -> Result<DataFrame, SchemaError> {
    let ids = raw.column(TAXONOMY_ID)?.i64()?;
    let pairs = ids.into_no_null_iter().map(|id| (Some(id), 1));
    let (ids, counts) = fold_counts(pairs, false);
    let profile = standard_profile::build(ids, counts)?;
    standard_profile::validate(&profile)?;
    Ok(profile)
}
