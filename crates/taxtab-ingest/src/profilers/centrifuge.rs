//! Centrifuge report handling (`centrifuge-kreport`).
//!
//! Same headerless six-column layout as a Kraken report; the unclassified
//! and root rows always lead the file, so compositionality is checked on
//! the first two rows.

use std::path::Path;

use anyhow::Result;
use polars::prelude::DataFrame;
use taxtab_model::{SchemaError, standard_profile};

use crate::profilers::{check_total, fold_counts};
use crate::table::{self, ColumnKind, ColumnSpec, ReadOptions};

pub const PERCENT: &str = "percent";
pub const CLADE_ASSIGNED_READS: &str = "clade_assigned_reads";
pub const DIRECT_ASSIGNED_READS: &str = "direct_assigned_reads";
pub const TAXONOMY_LEVEL: &str = "taxonomy_lvl";
pub const TAXONOMY_ID: &str = "taxonomy_id";
pub const NAME: &str = "name";

const COLUMNS: [ColumnSpec; 6] = [
    ColumnSpec::new(PERCENT, ColumnKind::Float),
    ColumnSpec::new(CLADE_ASSIGNED_READS, ColumnKind::Int),
    ColumnSpec::new(DIRECT_ASSIGNED_READS, ColumnKind::Int),
    ColumnSpec::new(TAXONOMY_LEVEL, ColumnKind::Str),
    ColumnSpec::new(TAXONOMY_ID, ColumnKind::Int),
    ColumnSpec::new(NAME, ColumnKind::Str),
];

const PERCENT_TOLERANCE: f64 = 1.0;

pub fn read(path: &Path) -> Result<DataFrame> {
    let rows = table::read_rows(path, ReadOptions::default())?;
    Ok(frame_from_rows(&rows)?)
}

pub(crate) fn frame_from_rows(rows: &[Vec<String>]) -> Result<DataFrame, SchemaError> {
    table::typed_frame(rows, &COLUMNS)
}

fn check_composition(raw: &DataFrame) -> Result<(), SchemaError> {
    let percents = raw.column(PERCENT)?.f64()?;
    let total: f64 = percents.into_iter().take(2).flatten().sum();
    check_total(
        "unclassified and root percentages",
        total,
        100.0,
        PERCENT_TOLERANCE,
    )
}

pub fn transform(raw: &DataFrame) -> Result<DataFrame, SchemaError> {
    check_composition(raw)?;
    let ids = raw.column(TAXONOMY_ID)?.i64()?;
    let counts = raw.column(DIRECT_ASSIGNED_READS)?.i64()?;
    let pairs = ids
        .into_no_null_iter()
        .map(Some)
        .zip(counts.into_no_null_iter());
    let (ids, counts) = fold_counts(pairs, false);
    let profile = standard_profile::build(ids, counts)?;
    standard_profile::validate(&profile)?;
    Ok(profile)
}
