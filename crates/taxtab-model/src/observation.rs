//! Merged observation tables: wide (one count column per sample) and tidy
//! (one row per sample and taxon).

use polars::prelude::{ChunkAgg, DataFrame, DataType, PlSmallStr};

use crate::error::{Result, SchemaError};
use crate::standard_profile::{COUNT, TAXONOMY_ID};

/// Name of the sample column in tidy tables.
pub const SAMPLE: &str = "sample";

/// Taxonomy annotation column names, in the relative order they may appear
/// after `taxonomy_id` in a wide table.
pub const NAME: &str = "name";
pub const RANK: &str = "rank";
pub const LINEAGE: &str = "lineage";
pub const ID_LINEAGE: &str = "id_lineage";
pub const RANK_LINEAGE: &str = "rank_lineage";

pub const ANNOTATION_COLUMNS: [&str; 5] = [NAME, RANK, LINEAGE, ID_LINEAGE, RANK_LINEAGE];

fn check_identifier_column(table: &DataFrame, names: &[&str]) -> Result<()> {
    match names.first() {
        Some(&name) if name == TAXONOMY_ID => {}
        Some(&name) => {
            return Err(SchemaError::ColumnName {
                position: 0,
                expected: TAXONOMY_ID.to_string(),
                found: name.to_string(),
            });
        }
        None => {
            return Err(SchemaError::ColumnCount {
                expected: 2,
                found: 0,
            });
        }
    }
    let ids = &table.get_columns()[0];
    if ids.dtype() != &DataType::Int64 {
        return Err(SchemaError::ColumnType {
            column: TAXONOMY_ID.to_string(),
            expected: DataType::Int64.to_string(),
            found: ids.dtype().to_string(),
        });
    }
    if ids.null_count() > 0 {
        return Err(SchemaError::NullValues {
            column: TAXONOMY_ID.to_string(),
            nulls: ids.null_count(),
        });
    }
    Ok(())
}

/// Check a wide observation table: `taxonomy_id` first, then any prefix of
/// the annotation columns in their declared relative order (String,
/// nullable), then at least one Int64 sample column with no nulls and no
/// negative counts.
pub fn validate_wide(table: &DataFrame) -> Result<()> {
    let names: Vec<&str> = table
        .get_column_names()
        .into_iter()
        .map(PlSmallStr::as_str)
        .collect();
    check_identifier_column(table, &names)?;
    let columns = table.get_columns();
    let mut annotation_rank = 0;
    let mut sample_columns = 0;
    for (position, &name) in names.iter().enumerate().skip(1) {
        let column = &columns[position];
        if let Some(offset) = ANNOTATION_COLUMNS.iter().position(|&a| a == name) {
            if sample_columns > 0 || offset < annotation_rank {
                return Err(SchemaError::Invalid(format!(
                    "annotation column '{name}' out of order at position {position}"
                )));
            }
            annotation_rank = offset + 1;
            if column.dtype() != &DataType::String {
                return Err(SchemaError::ColumnType {
                    column: name.to_string(),
                    expected: DataType::String.to_string(),
                    found: column.dtype().to_string(),
                });
            }
        } else {
            sample_columns += 1;
            if column.dtype() != &DataType::Int64 {
                return Err(SchemaError::ColumnType {
                    column: name.to_string(),
                    expected: DataType::Int64.to_string(),
                    found: column.dtype().to_string(),
                });
            }
            if column.null_count() > 0 {
                return Err(SchemaError::NullValues {
                    column: name.to_string(),
                    nulls: column.null_count(),
                });
            }
            let counts = column.i64()?;
            if let Some(minimum) = counts.min()
                && minimum < 0
            {
                return Err(SchemaError::NegativeValues {
                    column: name.to_string(),
                });
            }
        }
    }
    if sample_columns == 0 {
        return Err(SchemaError::Invalid(
            "wide table has no sample columns".to_string(),
        ));
    }
    Ok(())
}

/// Check a tidy observation table: exactly `taxonomy_id`, `count`, and
/// `sample`, in that order, fully populated.
pub fn validate_tidy(table: &DataFrame) -> Result<()> {
    let names: Vec<&str> = table
        .get_column_names()
        .into_iter()
        .map(PlSmallStr::as_str)
        .collect();
    if names.len() != 3 {
        return Err(SchemaError::ColumnCount {
            expected: 3,
            found: names.len(),
        });
    }
    for (position, expected) in [TAXONOMY_ID, COUNT, SAMPLE].into_iter().enumerate() {
        if names[position] != expected {
            return Err(SchemaError::ColumnName {
                position,
                expected: expected.to_string(),
                found: names[position].to_string(),
            });
        }
    }
    check_identifier_column(table, &names)?;
    let counts = table.column(COUNT)?;
    if counts.dtype() != &DataType::Int64 {
        return Err(SchemaError::ColumnType {
            column: COUNT.to_string(),
            expected: DataType::Int64.to_string(),
            found: counts.dtype().to_string(),
        });
    }
    let samples = table.column(SAMPLE)?;
    if samples.dtype() != &DataType::String {
        return Err(SchemaError::ColumnType {
            column: SAMPLE.to_string(),
            expected: DataType::String.to_string(),
            found: samples.dtype().to_string(),
        });
    }
    for column in table.get_columns() {
        if column.null_count() > 0 {
            return Err(SchemaError::NullValues {
                column: column.name().to_string(),
                nulls: column.null_count(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, NamedFrom, Series};

    use super::*;

    fn wide_fixture() -> DataFrame {
        let columns: Vec<Column> = vec![
            Series::new(TAXONOMY_ID.into(), vec![1i64, 2, 3]).into(),
            Series::new("s1".into(), vec![23i64, 42, 0]).into(),
            Series::new("s2".into(), vec![0i64, 33, 55]).into(),
        ];
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn accepts_plain_wide_table() {
        assert!(validate_wide(&wide_fixture()).is_ok());
    }

    #[test]
    fn accepts_annotated_wide_table() {
        let mut table = wide_fixture();
        let names = Series::new(
            NAME.into(),
            vec![Some("root"), None, Some("Escherichia coli")],
        );
        table.insert_column(1, names).unwrap();
        assert!(validate_wide(&table).is_ok());
    }

    #[test]
    fn rejects_annotation_after_samples() {
        let mut table = wide_fixture();
        let ranks = Series::new(RANK.into(), vec![Some("species"), None, None]);
        table.with_column(ranks).unwrap();
        assert!(matches!(
            validate_wide(&table),
            Err(SchemaError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_null_counts() {
        let columns: Vec<Column> = vec![
            Series::new(TAXONOMY_ID.into(), vec![1i64, 2]).into(),
            Series::new("s1".into(), vec![Some(23i64), None]).into(),
        ];
        let table = DataFrame::new(columns).unwrap();
        assert!(matches!(
            validate_wide(&table),
            Err(SchemaError::NullValues { .. })
        ));
    }

    #[test]
    fn validates_tidy_layout() {
        let columns: Vec<Column> = vec![
            Series::new(TAXONOMY_ID.into(), vec![1i64, 2]).into(),
            Series::new(COUNT.into(), vec![23i64, 42]).into(),
            Series::new(SAMPLE.into(), vec!["s1", "s1"]).into(),
        ];
        let table = DataFrame::new(columns).unwrap();
        assert!(validate_tidy(&table).is_ok());

        let reordered = table.select([SAMPLE, COUNT, TAXONOMY_ID]).unwrap();
        assert!(matches!(
            validate_tidy(&reordered),
            Err(SchemaError::ColumnName { .. })
        ));
    }
}
