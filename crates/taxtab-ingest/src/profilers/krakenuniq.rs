//! KrakenUniq report handling.
//!
//! Reports open with `#`-prefixed provenance lines, then a header row. The
//! `cov` column prints `NA` for taxa without genome coverage estimates.
//! Counts come from `taxReads`, the reads assigned directly to each taxon.

use std::path::Path;

use anyhow::Result;
use polars::prelude::DataFrame;
use taxtab_model::{SchemaError, standard_profile};

use crate::profilers::fold_counts;
use crate::table::{self, ColumnKind, ColumnSpec, ReadOptions};

pub const PERCENT: &str = "%";
pub const READS: &str = "reads";
pub const TAX_READS: &str = "taxReads";
pub const KMERS: &str = "kmers";
pub const DUP: &str = "dup";
pub const COV: &str = "cov";
pub const TAX_ID: &str = "taxID";
pub const RANK: &str = "rank";
pub const TAX_NAME: &str = "taxName";

const HEADER: [&str; 9] = [
    PERCENT, READS, TAX_READS, KMERS, DUP, COV, TAX_ID, RANK, TAX_NAME,
];

const COLUMNS: [ColumnSpec; 9] = [
    ColumnSpec::new(PERCENT, ColumnKind::Float),
    ColumnSpec::new(READS, ColumnKind::Int),
    ColumnSpec::new(TAX_READS, ColumnKind::Int),
    ColumnSpec::new(KMERS, ColumnKind::Int),
    ColumnSpec::new(DUP, ColumnKind::Float),
    ColumnSpec::new(COV, ColumnKind::NullableFloat),
    ColumnSpec::new(TAX_ID, ColumnKind::Int),
    ColumnSpec::new(RANK, ColumnKind::Str),
    ColumnSpec::new(TAX_NAME, ColumnKind::Str),
];

pub fn read(path: &Path) -> Result<DataFrame> {
    let rows = table::read_rows(path, ReadOptions::default().comment(b'#'))?;
    Ok(frame_from_rows(&rows)?)
}

pub(crate) fn frame_from_rows(rows: &[Vec<String>]) -> Result<DataFrame, SchemaError> {
    let Some((header, data)) = rows.split_first() else {
        return Err(SchemaError::Empty);
    };
    table::verify_header(header, &HEADER)?;
    table::typed_frame(data, &COLUMNS)
}

pub fn transform(raw: &DataFrame) -> Result<DataFrame, SchemaError> {
    let ids = raw.column(TAX_ID)?.i64()?;
    let reads = raw.column(TAX_READS)?.i64()?;
    let pairs = ids
        .into_no_null_iter()
        .zip(reads.into_no_null_iter())
        .map(|(id, count)| (Some(id), count));
    let (ids, counts) = fold_counts(pairs, false);
    let profile = standard_profile::build(ids, counts)?;
    standard_profile::validate(&profile)?;
    Ok(profile)
}
