//! mOTUs profile handling (`motus profile -c` read count output).
//!
//! Three `#` comment lines carry the tool versions, the call, and the
//! column names, so data rows arrive bare. The full mOTU catalogue is
//! listed even when absent from the sample, hence the zero count filter.
//! Meta-mOTUs without an NCBI identifier print `NA` and the trailing
//! `unassigned` row prints `-1`; both pool into the unclassified bucket.

use std::path::Path;

use anyhow::Result;
use polars::prelude::DataFrame;
use taxtab_model::{SchemaError, standard_profile};

use crate::profilers::fold_counts;
use crate::table::{self, ColumnKind, ColumnSpec, ReadOptions};

pub const CONSENSUS_TAXONOMY: &str = "consensus_taxonomy";
pub const NCBI_TAX_ID: &str = "ncbi_tax_id";
pub const READ_COUNT: &str = "read_count";

const COLUMNS: [ColumnSpec; 3] = [
    ColumnSpec::new(CONSENSUS_TAXONOMY, ColumnKind::Str),
    ColumnSpec::new(NCBI_TAX_ID, ColumnKind::NullableInt),
    ColumnSpec::new(READ_COUNT, ColumnKind::Int),
];

pub fn read(path: &Path) -> Result<DataFrame> {
    let rows = table::read_rows(path, ReadOptions::default().comment(b'#'))?;
    Ok(frame_from_rows(&rows)?)
}

pub(crate) fn frame_from_rows(rows: &[Vec<String>]) -> Result<DataFrame, SchemaError> {
    table::typed_frame(rows, &COLUMNS)
}

pub fn transform(raw: &DataFrame) -> Result<DataFrame, SchemaError> {
    let ids = raw.column(NCBI_TAX_ID)?.i64()?;
    let counts = raw.column(READ_COUNT)?.i64()?;
    let pairs = ids
        .into_iter()
        .zip(counts.into_no_null_iter())
        .filter(|&(_, count)| count > 0)
        .map(|(id, count)| (id.filter(|&id| id >= 0), count));
    let (ids, counts) = fold_counts(pairs, true);
    let profile = standard_profile::build(ids, counts)?;
    standard_profile::validate(&profile)?;
    Ok(profile)
}
