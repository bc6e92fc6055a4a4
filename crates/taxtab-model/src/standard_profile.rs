//! The canonical two-column profile every classifier report is reduced to.

use std::collections::HashSet;

use polars::prelude::{ChunkAgg, Column, DataFrame, DataType, NamedFrom, PlSmallStr, Series};

use crate::error::{Result, SchemaError};

/// Name of the taxonomy identifier column.
pub const TAXONOMY_ID: &str = "taxonomy_id";
/// Name of the count column.
pub const COUNT: &str = "count";

/// Reserved identifier for reads that could not be classified.
pub const UNCLASSIFIED_ID: i64 = 0;

/// Build a standard profile from parallel identifier and count vectors.
pub fn build(ids: Vec<i64>, counts: Vec<i64>) -> Result<DataFrame> {
    let columns: Vec<Column> = vec![
        Series::new(TAXONOMY_ID.into(), ids).into(),
        Series::new(COUNT.into(), counts).into(),
    ];
    Ok(DataFrame::new(columns)?)
}

/// Check a table against the standard profile schema: exactly the columns
/// `taxonomy_id` and `count` in that order, both Int64, no nulls,
/// non-negative counts, and at most one row per identifier.
pub fn validate(profile: &DataFrame) -> Result<()> {
    let names: Vec<&str> = profile
        .get_column_names()
        .into_iter()
        .map(PlSmallStr::as_str)
        .collect();
    if names.len() != 2 {
        return Err(SchemaError::ColumnCount {
            expected: 2,
            found: names.len(),
        });
    }
    for (position, expected) in [TAXONOMY_ID, COUNT].into_iter().enumerate() {
        if names[position] != expected {
            return Err(SchemaError::ColumnName {
                position,
                expected: expected.to_string(),
                found: names[position].to_string(),
            });
        }
    }
    if profile.height() == 0 {
        return Err(SchemaError::Empty);
    }
    for column in profile.get_columns() {
        if column.dtype() != &DataType::Int64 {
            return Err(SchemaError::ColumnType {
                column: column.name().to_string(),
                expected: DataType::Int64.to_string(),
                found: column.dtype().to_string(),
            });
        }
        if column.null_count() > 0 {
            return Err(SchemaError::NullValues {
                column: column.name().to_string(),
                nulls: column.null_count(),
            });
        }
    }
    let counts = profile.column(COUNT)?.i64()?;
    if let Some(minimum) = counts.min()
        && minimum < 0
    {
        return Err(SchemaError::NegativeValues {
            column: COUNT.to_string(),
        });
    }
    let ids = profile.column(TAXONOMY_ID)?.i64()?;
    let mut seen = HashSet::with_capacity(profile.height());
    for id in ids.into_no_null_iter() {
        if !seen.insert(id) {
            return Err(SchemaError::DuplicateTaxonomyId(id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_profile() {
        let profile = build(vec![0, 561, 562], vec![5, 100, 38]).unwrap();
        assert!(validate(&profile).is_ok());
    }

    #[test]
    fn rejects_empty_profile() {
        let profile = build(vec![], vec![]).unwrap();
        assert!(matches!(validate(&profile), Err(SchemaError::Empty)));
    }

    #[test]
    fn rejects_swapped_columns() {
        let columns: Vec<Column> = vec![
            Series::new(COUNT.into(), vec![1i64]).into(),
            Series::new(TAXONOMY_ID.into(), vec![2i64]).into(),
        ];
        let profile = DataFrame::new(columns).unwrap();
        assert!(matches!(
            validate(&profile),
            Err(SchemaError::ColumnName { position: 0, .. })
        ));
    }

    #[test]
    fn rejects_negative_counts() {
        let profile = build(vec![562], vec![-1]).unwrap();
        assert!(matches!(
            validate(&profile),
            Err(SchemaError::NegativeValues { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_identifiers() {
        let profile = build(vec![562, 562], vec![1, 2]).unwrap();
        assert!(matches!(
            validate(&profile),
            Err(SchemaError::DuplicateTaxonomyId(562))
        ));
    }

    #[test]
    fn rejects_float_counts() {
        let columns: Vec<Column> = vec![
            Series::new(TAXONOMY_ID.into(), vec![562i64]).into(),
            Series::new(COUNT.into(), vec![1.5f64]).into(),
        ];
        let profile = DataFrame::new(columns).unwrap();
        assert!(matches!(
            validate(&profile),
            Err(SchemaError::ColumnType { .. })
        ));
    }
}
