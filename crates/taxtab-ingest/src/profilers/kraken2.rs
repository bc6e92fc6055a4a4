//! Kraken2 report handling (`kraken2 --report`).
//!
//! Reports are headerless tab-separated tables with six columns, or eight
//! when produced with `--report-minimizer-data`. Counts are taken from the
//! reads assigned directly to each taxon.

use std::path::Path;

use anyhow::Result;
use polars::prelude::DataFrame;
use taxtab_model::{SchemaError, standard_profile};

use crate::profilers::{check_total, fold_counts};
use crate::table::{self, ColumnKind, ColumnSpec, ReadOptions};

pub const PERCENT: &str = "percent";
pub const CLADE_ASSIGNED_READS: &str = "clade_assigned_reads";
pub const DIRECT_ASSIGNED_READS: &str = "direct_assigned_reads";
pub const NUM_MINIMIZERS: &str = "num_minimizers";
pub const NUM_DISTINCT_MINIMIZERS: &str = "num_distinct_minimizers";
pub const TAXONOMY_LEVEL: &str = "taxonomy_lvl";
pub const TAXONOMY_ID: &str = "taxonomy_id";
pub const NAME: &str = "name";

const BASE_COLUMNS: [ColumnSpec; 6] = [
    ColumnSpec::new(PERCENT, ColumnKind::Float),
    ColumnSpec::new(CLADE_ASSIGNED_READS, ColumnKind::Int),
    ColumnSpec::new(DIRECT_ASSIGNED_READS, ColumnKind::Int),
    ColumnSpec::new(TAXONOMY_LEVEL, ColumnKind::Str),
    ColumnSpec::new(TAXONOMY_ID, ColumnKind::Int),
    ColumnSpec::new(NAME, ColumnKind::Str),
];

const MINIMIZER_COLUMNS: [ColumnSpec; 8] = [
    ColumnSpec::new(PERCENT, ColumnKind::Float),
    ColumnSpec::new(CLADE_ASSIGNED_READS, ColumnKind::Int),
    ColumnSpec::new(DIRECT_ASSIGNED_READS, ColumnKind::Int),
    ColumnSpec::new(NUM_MINIMIZERS, ColumnKind::Int),
    ColumnSpec::new(NUM_DISTINCT_MINIMIZERS, ColumnKind::Int),
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
    let specs: &[ColumnSpec] = match rows.first().map_or(0, Vec::len) {
        0 => return Err(SchemaError::Empty),
        6 => &BASE_COLUMNS,
        8 => &MINIMIZER_COLUMNS,
        found => {
            return Err(SchemaError::Invalid(format!(
                "expected 6 or 8 columns, found {found}"
            )));
        }
    };
    table::typed_frame(rows, specs)
}

/// The unclassified (`U`) and root (`R`) rows between them account for
/// every read in the run.
fn check_composition(raw: &DataFrame) -> Result<(), SchemaError> {
    let percents = raw.column(PERCENT)?.f64()?;
    let levels = raw.column(TAXONOMY_LEVEL)?.str()?;
    let mut total = 0.0;
    for (level, percent) in levels.into_iter().zip(percents.into_iter()) {
        if let (Some(level), Some(percent)) = (level, percent)
            && matches!(level, "U" | "R")
        {
            total += percent;
        }
    }
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
