//! Kaiju summary report handling (`kaiju2table` output).
//!
//! Tab-separated with a header row. The unclassified and cannot-be-assigned
//! rows leave `taxon_id` empty, so the column is nullable and those reads
//! fold into the unclassified bucket.

use std::path::Path;

use anyhow::Result;
use polars::prelude::{ChunkUnique, DataFrame};
use taxtab_model::{SchemaError, standard_profile};

use crate::profilers::{check_total, fold_counts};
use crate::table::{self, ColumnKind, ColumnSpec, ReadOptions};

pub const FILE: &str = "file";
pub const PERCENT: &str = "percent";
pub const READS: &str = "reads";
pub const TAXON_ID: &str = "taxon_id";
pub const TAXON_NAME: &str = "taxon_name";

const HEADER: [&str; 5] = [FILE, PERCENT, READS, TAXON_ID, TAXON_NAME];

const COLUMNS: [ColumnSpec; 5] = [
    ColumnSpec::new(FILE, ColumnKind::Str),
    ColumnSpec::new(PERCENT, ColumnKind::Float),
    ColumnSpec::new(READS, ColumnKind::Int),
    ColumnSpec::new(TAXON_ID, ColumnKind::NullableInt),
    ColumnSpec::new(TAXON_NAME, ColumnKind::Str),
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
    let files = raw.column(FILE)?.str()?;
    if files.n_unique()? > 1 {
        return Err(SchemaError::Invalid(
            "report covers more than one input file; summarise one sample per report".to_string(),
        ));
    }
    let total: f64 = raw.column(PERCENT)?.f64()?.into_no_null_iter().sum();
    check_total("percentages", total, 100.0, PERCENT_TOLERANCE)
}

pub fn transform(raw: &DataFrame) -> Result<DataFrame, SchemaError> {
    check_composition(raw)?;
    let ids = raw.column(TAXON_ID)?.i64()?;
    let reads = raw.column(READS)?.i64()?;
    let (ids, counts) = fold_counts(ids.into_iter().zip(reads.into_no_null_iter()), true);
    let profile = standard_profile::build(ids, counts)?;
    standard_profile::validate(&profile)?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
file\tpercent\treads\ttaxon_id\ttaxon_name
sample.out\t72.000000\t720\t562\tEscherichia coli
sample.out\t18.000000\t180\t1280\tStaphylococcus aureus
sample.out\t6.000000\t60\t\tcannot be assigned to a (non-viral) species
sample.out\t4.000000\t40\t\tunclassified
";

    fn raw(report: &str) -> DataFrame {
        let rows = table::read_rows_from(report.as_bytes(), ReadOptions::default()).unwrap();
        frame_from_rows(&rows).unwrap()
    }

    #[test]
    fn folds_unassigned_rows_into_bucket() {
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
        assert_eq!(ids, vec![562, 1280, 0]);
        assert_eq!(counts, vec![720, 180, 100]);
    }

    #[test]
    fn always_reports_the_bucket() {
        let report = "\
file\tpercent\treads\ttaxon_id\ttaxon_name
sample.out\t100.000000\t50\t562\tEscherichia coli
";
        let profile = transform(&raw(report)).unwrap();
        let ids: Vec<i64> = profile
            .column("taxonomy_id")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(ids, vec![562, 0]);
    }

    #[test]
    fn rejects_multi_file_reports() {
        let report = "\
file\tpercent\treads\ttaxon_id\ttaxon_name
a.out\t60.000000\t60\t562\tEscherichia coli
b.out\t40.000000\t40\t1280\tStaphylococcus aureus
";
        assert!(matches!(
            transform(&raw(report)),
            Err(SchemaError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_incomplete_percentages() {
        let report = "\
file\tpercent\treads\ttaxon_id\ttaxon_name
sample.out\t60.000000\t600\t562\tEscherichia coli
";
        assert!(matches!(
            transform(&raw(report)),
            Err(SchemaError::Composition { .. })
        ));
    }
}
