//! ganon report handling (`ganon report` `.tre` output).
//!
//! Headerless nine-column tables; the unclassified row uses `-` as its
//! target. Counts are the reads uniquely assigned to each target.

use std::path::Path;

use anyhow::Result;
use polars::prelude::DataFrame;
use taxtab_model::{SchemaError, standard_profile};

use crate::profilers::{check_total, fold_counts};
use crate::table::{self, ColumnKind, ColumnSpec, ReadOptions};

pub const RANK: &str = "rank";
pub const TARGET: &str = "target";
pub const LINEAGE: &str = "lineage";
pub const NAME: &str = "name";
pub const UNIQUE_ASSIGNMENTS: &str = "unique_assignments";
pub const SHARED_ASSIGNMENTS: &str = "shared_assignments";
pub const CHILDREN_ASSIGNMENTS: &str = "children_assignments";
pub const CUMULATIVE_ASSIGNMENTS: &str = "cumulative_assignments";
pub const CUMULATIVE_PERCENT: &str = "cumulative_percent";

/// Marker ganon uses for the unclassified target.
const UNCLASSIFIED_TARGET: &str = "-";

const COLUMNS: [ColumnSpec; 9] = [
    ColumnSpec::new(RANK, ColumnKind::Str),
    ColumnSpec::new(TARGET, ColumnKind::Str),
    ColumnSpec::new(LINEAGE, ColumnKind::Str),
    ColumnSpec::new(NAME, ColumnKind::Str),
    ColumnSpec::new(UNIQUE_ASSIGNMENTS, ColumnKind::Int),
    ColumnSpec::new(SHARED_ASSIGNMENTS, ColumnKind::Int),
    ColumnSpec::new(CHILDREN_ASSIGNMENTS, ColumnKind::Int),
    ColumnSpec::new(CUMULATIVE_ASSIGNMENTS, ColumnKind::Int),
    ColumnSpec::new(CUMULATIVE_PERCENT, ColumnKind::Float),
];

/// ganon prints cumulative percentages with five decimals.
const PERCENT_TOLERANCE: f64 = 0.01;

pub fn read(path: &Path) -> Result<DataFrame> {
    let rows = table::read_rows(path, ReadOptions::default())?;
    Ok(frame_from_rows(&rows)?)
}

pub(crate) fn frame_from_rows(rows: &[Vec<String>]) -> Result<DataFrame, SchemaError> {
    table::typed_frame(rows, &COLUMNS)
}

/// The unclassified and root rows carry the whole run between them.
fn check_composition(raw: &DataFrame) -> Result<(), SchemaError> {
    let ranks = raw.column(RANK)?.str()?;
    let percents = raw.column(CUMULATIVE_PERCENT)?.f64()?;
    let mut total = 0.0;
    for (rank, percent) in ranks.into_iter().zip(percents.into_iter()) {
        if let (Some(rank), Some(percent)) = (rank, percent)
            && matches!(rank, "unclassified" | "root")
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
    let targets = raw.column(TARGET)?.str()?;
    let counts = raw.column(UNIQUE_ASSIGNMENTS)?.i64()?;
    let mut pairs = Vec::with_capacity(raw.height());
    for (index, (target, count)) in targets
        .into_iter()
        .zip(counts.into_no_null_iter())
        .enumerate()
    {
        let target = target.unwrap_or("");
        if target == UNCLASSIFIED_TARGET {
            pairs.push((None, count));
        } else {
            let id = target.parse().map_err(|_| SchemaError::Parse {
                line: index + 1,
                column: TARGET.to_string(),
                value: target.to_string(),
                target: "integer",
            })?;
            pairs.push((Some(id), count));
        }
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
unclassified\t-\t-\tunclassified\t5\t0\t0\t5\t5.00000
root\t1\t1\troot\t0\t0\t95\t95\t95.00000
species\t562\t1|1224|562\tEscherichia coli\t80\t5\t0\t85\t85.00000
";

    fn raw(report: &str) -> DataFrame {
        let rows = table::read_rows_from(report.as_bytes(), ReadOptions::default()).unwrap();
        frame_from_rows(&rows).unwrap()
    }

    #[test]
    fn standardises_unique_assignments() {
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
        assert_eq!(ids, vec![1, 562, 0]);
        assert_eq!(counts, vec![0, 80, 5]);
    }

    #[test]
    fn applies_tight_percent_tolerance() {
        let report = "\
unclassified\t-\t-\tunclassified\t5\t0\t0\t5\t5.00000
root\t1\t1\troot\t0\t0\t94\t94\t94.90000
";
        assert!(matches!(
            transform(&raw(report)),
            Err(SchemaError::Composition { .. })
        ));
    }

    #[test]
    fn rejects_unparseable_targets() {
        let report = "\
unclassified\t-\t-\tunclassified\t0\t0\t0\t0\t0.00000
root\t1\t1\troot\t0\t0\t100\t100\t100.00000
genus\tabc\t1|abc\tBroken\t3\t0\t0\t3\t3.00000
";
        assert!(matches!(
            transform(&raw(report)),
            Err(SchemaError::Parse { line: 3, .. })
        ));
    }
}
