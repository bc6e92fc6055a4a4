//! MALT report handling (`rma2info -r2c Taxonomy` output).
//!
//! Bare two-column tables without a header. MALT distributes reads over
//! matches, so counts can be fractional; they are rounded to the nearest
//! whole read.

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

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
562\t120.6
1280\t35.2
1773\t1.0
";

    fn raw(report: &str) -> DataFrame {
        let rows = table::read_rows_from(report.as_bytes(), ReadOptions::default()).unwrap();
        frame_from_rows(&rows).unwrap()
    }

    #[test]
    fn rounds_fractional_read_counts() {
        let profile = transform(&raw(REPORT)).unwrap();
        let ids: Vec<i64> = profile
            .column("taxonomy_id")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        let counts: Vec<i64> = profile
            .column("count")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(ids, vec![562, 1280, 1773]);
        assert_eq!(counts, vec![121, 35, 1]);
    }

    #[test]
    fn rejects_extra_columns() {
        let report = "562\t120.6\textra\n";
        let rows = table::read_rows_from(report.as_bytes(), ReadOptions::default()).unwrap();
        assert!(matches!(
            frame_from_rows(&rows),
            Err(SchemaError::FieldCount { line: 1, .. })
        ));
    }
}
