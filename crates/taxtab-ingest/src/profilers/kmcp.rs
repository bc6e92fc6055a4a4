//! KMCP profile handling (`kmcp profile` default output).
//!
//! Seventeen columns behind a header row. `taxid` can be empty for
//! unresolved references, and a couple of the depth statistics print as
//! empty strings when KMCP cannot compute them.

use std::path::Path;

use anyhow::Result;
use polars::prelude::DataFrame;
use taxtab_model::{SchemaError, standard_profile};

use crate::profilers::{check_total, fold_counts};
use crate::table::{self, ColumnKind, ColumnSpec, ReadOptions};

pub const REF: &str = "ref";
pub const PERCENTAGE: &str = "percentage";
pub const COVERAGE: &str = "coverage";
pub const SCORE: &str = "score";
pub const CHUNKS_FRAC: &str = "chunksFrac";
pub const CHUNKS_REL_DEPTH: &str = "chunksRelDepth";
pub const CHUNKS_REL_DEPTH_STD: &str = "chunksRelDepthStd";
pub const READS: &str = "reads";
pub const UREADS: &str = "ureads";
pub const HICUREADS: &str = "hicureads";
pub const REF_SIZE: &str = "refsize";
pub const REF_NAME: &str = "refname";
pub const TAXID: &str = "taxid";
pub const RANK: &str = "rank";
pub const TAXNAME: &str = "taxname";
pub const TAXPATH: &str = "taxpath";
pub const TAXPATHSN: &str = "taxpathsn";

const HEADER: [&str; 17] = [
    REF,
    PERCENTAGE,
    COVERAGE,
    SCORE,
    CHUNKS_FRAC,
    CHUNKS_REL_DEPTH,
    CHUNKS_REL_DEPTH_STD,
    READS,
    UREADS,
    HICUREADS,
    REF_SIZE,
    REF_NAME,
    TAXID,
    RANK,
    TAXNAME,
    TAXPATH,
    TAXPATHSN,
];

const COLUMNS: [ColumnSpec; 17] = [
    ColumnSpec::new(REF, ColumnKind::Str),
    ColumnSpec::new(PERCENTAGE, ColumnKind::Float),
    ColumnSpec::new(COVERAGE, ColumnKind::NullableFloat),
    ColumnSpec::new(SCORE, ColumnKind::Float),
    ColumnSpec::new(CHUNKS_FRAC, ColumnKind::Float),
    ColumnSpec::new(CHUNKS_REL_DEPTH, ColumnKind::Float),
    ColumnSpec::new(CHUNKS_REL_DEPTH_STD, ColumnKind::NullableFloat),
    ColumnSpec::new(READS, ColumnKind::Int),
    ColumnSpec::new(UREADS, ColumnKind::Int),
    ColumnSpec::new(HICUREADS, ColumnKind::Int),
    ColumnSpec::new(REF_SIZE, ColumnKind::Int),
    ColumnSpec::new(REF_NAME, ColumnKind::Str),
    ColumnSpec::new(TAXID, ColumnKind::NullableInt),
    ColumnSpec::new(RANK, ColumnKind::Str),
    ColumnSpec::new(TAXNAME, ColumnKind::Str),
    ColumnSpec::new(TAXPATH, ColumnKind::Str),
    ColumnSpec::new(TAXPATHSN, ColumnKind::Str),
];

const PERCENT_TOLERANCE: f64 = 1.0;

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
    let total: f64 = raw.column(PERCENTAGE)?.f64()?.into_no_null_iter().sum();
    check_total("percentages", total, 100.0, PERCENT_TOLERANCE)
}

pub fn transform(raw: &DataFrame) -> Result<DataFrame, SchemaError> {
    check_composition(raw)?;
    let ids = raw.column(TAXID)?.i64()?;
    let reads = raw.column(READS)?.i64()?;
    let (ids, counts) = fold_counts(ids.into_iter().zip(reads.into_no_null_iter()), true);
    let profile = standard_profile::build(ids, counts)?;
    standard_profile::validate(&profile)?;
    Ok(profile)
}
