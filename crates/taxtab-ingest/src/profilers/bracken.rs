//! Bracken abundance estimates (`bracken -o`).
//!
//! Reports carry a header row; fractions must be compositional and the
//! re-estimated read numbers must be consistent per row.

use std::path::Path;

use anyhow::Result;
use polars::prelude::{ChunkAgg, DataFrame};
use taxtab_model::{SchemaError, standard_profile};

use crate::profilers::{check_total, fold_counts};
use crate::table::{self, ColumnKind, ColumnSpec, ReadOptions};

pub const NAME: &str = "name";
pub const TAXONOMY_ID: &str = "taxonomy_id";
pub const TAXONOMY_LEVEL: &str = "taxonomy_lvl";
pub const KRAKEN_ASSIGNED_READS: &str = "kraken_assigned_reads";
pub const ADDED_READS: &str = "added_reads";
pub const NEW_EST_READS: &str = "new_est_reads";
pub const FRACTION_TOTAL_READS: &str = "fraction_total_reads";

const HEADER: [&str; 7] = [
    NAME,
    TAXONOMY_ID,
    TAXONOMY_LEVEL,
    KRAKEN_ASSIGNED_READS,
    ADDED_READS,
    NEW_EST_READS,
    FRACTION_TOTAL_READS,
];

const COLUMNS: [ColumnSpec; 7] = [
    ColumnSpec::new(NAME, ColumnKind::Str),
    ColumnSpec::new(TAXONOMY_ID, ColumnKind::Int),
    ColumnSpec::new(TAXONOMY_LEVEL, ColumnKind::Str),
    ColumnSpec::new(KRAKEN_ASSIGNED_READS, ColumnKind::Int),
    ColumnSpec::new(ADDED_READS, ColumnKind::Int),
    ColumnSpec::new(NEW_EST_READS, ColumnKind::Int),
    ColumnSpec::new(FRACTION_TOTAL_READS, ColumnKind::Float),
];

/// Bracken rounds per-taxon fractions to five digits, so whole profiles
/// can drift a couple percent from 1.0.
const FRACTION_TOLERANCE: f64 = 0.02;

pub fn read(path: &Path) -> Result<DataFrame> {
    let rows = table::read_rows(path, ReadOptions::default())?;
    Ok(frame_from_rows(&rows)?)
}

pub(crate) fn frame_from_rows(rows: &[Vec<String>]) -> Result<DataFrame, SchemaError> {
    let Some((header, data)) = rows.split_first() else {
        return Err(SchemaError::Empty);
    };
    table::verify_header(header, &HEADER)?;
    table::typed_frame(data, &COLUMNS)
}

fn check_composition(raw: &DataFrame) -> Result<(), SchemaError> {
    let fractions = raw.column(FRACTION_TOTAL_READS)?.f64()?;
    check_total(
        "read fractions",
        fractions.sum().unwrap_or(0.0),
        1.0,
        FRACTION_TOLERANCE,
    )?;
    let kraken = raw.column(KRAKEN_ASSIGNED_READS)?.i64()?;
    let added = raw.column(ADDED_READS)?.i64()?;
    let estimated = raw.column(NEW_EST_READS)?.i64()?;
    for (index, ((kraken, added), estimated)) in kraken
        .into_no_null_iter()
        .zip(added.into_no_null_iter())
        .zip(estimated.into_no_null_iter())
        .enumerate()
    {
        if kraken + added != estimated {
            return Err(SchemaError::Invalid(format!(
                "row {}: kraken_assigned_reads + added_reads != new_est_reads",
                index + 1
            )));
        }
    }
    Ok(())
}

pub fn transform(raw: &DataFrame) -> Result<DataFrame, SchemaError> {
    check_composition(raw)?;
    let ids = raw.column(TAXONOMY_ID)?.i64()?;
    let counts = raw.column(NEW_EST_READS)?.i64()?;
    let pairs = ids
        .into_no_null_iter()
        .map(Some)
        .zip(counts.into_no_null_iter());
    let (ids, counts) = fold_counts(pairs, false);
    let profile = standard_profile::build(ids, counts)?;
    standard_profile::validate(&profile)?;
    Ok(profile)
}
