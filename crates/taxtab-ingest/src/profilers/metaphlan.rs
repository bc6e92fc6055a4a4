//! MetaPhlAn profile handling (versions 3 and 4).
//!
//! The header travels in `#` comment lines, so data rows arrive bare. The
//! `NCBI_tax_id` column holds a `|`-separated identifier lineage whose last
//! element is the clade's own identifier; `UNCLASSIFIED` rows carry `-1`.
//! Relative abundances are scaled to pseudo counts per million.

use std::path::Path;

use anyhow::Result;
use polars::prelude::DataFrame;
use taxtab_model::{SchemaError, standard_profile};

use crate::profilers::{check_total, fold_counts};
use crate::table::{self, ColumnKind, ColumnSpec, ReadOptions};

pub const CLADE_NAME: &str = "clade_name";
pub const NCBI_TAX_ID: &str = "ncbi_tax_id";
pub const RELATIVE_ABUNDANCE: &str = "relative_abundance";
pub const ADDITIONAL_SPECIES: &str = "additional_species";

const BASE_COLUMNS: [ColumnSpec; 3] = [
    ColumnSpec::new(CLADE_NAME, ColumnKind::Str),
    ColumnSpec::new(NCBI_TAX_ID, ColumnKind::Str),
    ColumnSpec::new(RELATIVE_ABUNDANCE, ColumnKind::Float),
];

const SPECIES_COLUMNS: [ColumnSpec; 4] = [
    ColumnSpec::new(CLADE_NAME, ColumnKind::Str),
    ColumnSpec::new(NCBI_TAX_ID, ColumnKind::Str),
    ColumnSpec::new(RELATIVE_ABUNDANCE, ColumnKind::Float),
    ColumnSpec::new(ADDITIONAL_SPECIES, ColumnKind::Str),
];

const PERCENT_TOLERANCE: f64 = 1.0;

/// Relative abundances become whole counts on a parts-per-million scale.
const PSEUDO_COUNT_SCALE: f64 = 1e6;

pub fn read(path: &Path) -> Result<DataFrame> {
    let rows = table::read_rows(path, ReadOptions::default().comment(b'#'))?;
    Ok(frame_from_rows(&rows)?)
}

pub(crate) fn frame_from_rows(rows: &[Vec<String>]) -> Result<DataFrame, SchemaError> {
    let specs: &[ColumnSpec] = match rows.first().map_or(0, Vec::len) {
        0 => return Err(SchemaError::Empty),
        3 => &BASE_COLUMNS,
        4 => &SPECIES_COLUMNS,
        found => {
            return Err(SchemaError::Invalid(format!(
                "expected 3 or 4 columns, found {found}"
            )));
        }
    };
    table::typed_frame(rows, specs)
}

/// Top level clades, the ones without `|` in their name, partition the
/// whole sample between them.
fn check_composition(raw: &DataFrame) -> Result<(), SchemaError> {
    let clades = raw.column(CLADE_NAME)?.str()?;
    let abundances = raw.column(RELATIVE_ABUNDANCE)?.f64()?;
    let mut total = 0.0;
    for (clade, abundance) in clades.into_iter().zip(abundances.into_no_null_iter()) {
        if let Some(clade) = clade
            && !clade.contains('|')
        {
            total += abundance;
        }
    }
    check_total("top level clade abundances", total, 100.0, PERCENT_TOLERANCE)
}

pub fn transform(raw: &DataFrame) -> Result<DataFrame, SchemaError> {
    check_composition(raw)?;
    let lineages = raw.column(NCBI_TAX_ID)?.str()?;
    let abundances = raw.column(RELATIVE_ABUNDANCE)?.f64()?;
    let mut pairs = Vec::with_capacity(raw.height());
    for (index, (lineage, abundance)) in lineages
        .into_iter()
        .zip(abundances.into_no_null_iter())
        .enumerate()
    {
        let leaf = lineage
            .and_then(|value| value.rsplit('|').next())
            .unwrap_or("");
        let id = if leaf.is_empty() {
            None
        } else {
            let id: i64 = leaf.parse().map_err(|_| SchemaError::Parse {
                line: index + 1,
                column: NCBI_TAX_ID.to_string(),
                value: leaf.to_string(),
                target: "integer",
            })?;
            (id >= 0).then_some(id)
        };
        let count = (abundance * PSEUDO_COUNT_SCALE).round() as i64;
        pairs.push((id, count));
    }
    let (ids, counts) = fold_counts(pairs, false);
    let profile = standard_profile::build(ids, counts)?;
    standard_profile::validate(&profile)?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
#mpa_vJan21_CHOCOPhlAnSGB_202103
#/usr/local/bin/metaphlan sample.fastq --input_type fastq
#SampleID\tMetaphlan_Analysis
#clade_name\tNCBI_tax_id\trelative_abundance\tadditional_species
UNCLASSIFIED\t-1\t12.5\t
k__Bacteria\t2\t87.5\t
k__Bacteria|p__Proteobacteria\t2|1224\t60.0\t
k__Bacteria|p__Proteobacteria|c__Gammaproteobacteria\t2|1224|1236\t60.0\t
k__Bacteria|p__Firmicutes\t2|1239\t27.5\t
";

    fn raw(report: &str) -> DataFrame {
        let rows =
            table::read_rows_from(report.as_bytes(), ReadOptions::default().comment(b'#')).unwrap();
        frame_from_rows(&rows).unwrap()
    }

    #[test]
    fn extracts_leaf_identifiers_and_scales_abundances() {
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
        assert_eq!(ids, vec![2, 1224, 1236, 1239, 0]);
        assert_eq!(counts, vec![87_500_000, 60_000_000, 60_000_000, 27_500_000, 12_500_000]);
    }

    #[test]
    fn accepts_reports_without_additional_species() {
        let report = "\
#clade_name\tNCBI_tax_id\trelative_abundance
UNCLASSIFIED\t-1\t40.0
k__Bacteria\t2\t60.0
";
        let frame = raw(report);
        assert_eq!(frame.width(), 3);
        assert!(transform(&frame).is_ok());
    }

    #[test]
    fn folds_empty_identifiers_into_bucket() {
        let report = "\
#clade_name\tNCBI_tax_id\trelative_abundance
k__Bacteria\t2\t70.0
k__Bacteria|s__novel_SGB\t\t30.0
UNCLASSIFIED\t-1\t30.0
";
        let profile = transform(&raw(report)).unwrap();
        let counts: Vec<i64> = profile
            .column("count")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(counts, vec![70_000_000, 60_000_000]);
    }

    #[test]
    fn checks_top_level_clades_only() {
        let report = "\
#clade_name\tNCBI_tax_id\trelative_abundance
k__Bacteria\t2\t45.0
k__Bacteria|p__Firmicutes\t2|1239\t45.0
";
        assert!(matches!(
            transform(&raw(report)),
            Err(SchemaError::Composition { .. })
        ));
    }
}
