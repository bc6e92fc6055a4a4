//! MEGAN6 taxonomic class export handling (`rma2info -c2c Taxonomy` output).
//!
//! Same two-column shape as MALT exports. Summarised counts are fractional
//! whenever MEGAN projects reads onto the taxonomy, so they are rounded to
//! whole reads.

use std::path::Path;

use anyhow::Result;
use polars::prelude::DataFrame;
use taxtab_model::{SchemaError, standard_profile};

use crate::profilers::fold_counts;
use crate::table::{self, ColumnKind, ColumnSpec, ReadOptions};

pub const TAXONOMY_ID: &str = "taxonomy_id";
pub const COUNT: &str = "count";

const COLUMNS: [ColumnSpec; 2] = [
    ColumnSpec::new(TAXONOMY_ID, ColumnKind::Int),
    ColumnSpec::new(COUNT, ColumnKind::Float),
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
    let counts = raw.column(COUNT)?.f64()?;
    let pairs = ids
        .into_no_null_iter()
        .zip(counts.into_no_null_iter())
        .map(|(id, count)| (Some(id), count.round() as i64));
    let (ids, counts) = fold_counts(pairs, false);
    let profile = standard_profile::build(ids, counts)?;
    standard_profile::validate(&profile)?;
    Ok(profile)
}
