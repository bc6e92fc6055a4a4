//! One module per supported classifier. Each exposes `read` (file to raw
//! typed table) and `transform` (raw table to standard profile); the
//! shared helpers here implement the parts of the standardisation
//! contract every tool needs.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use taxtab_model::SchemaError;
use taxtab_model::standard_profile::UNCLASSIFIED_ID;

pub mod bracken;
pub mod centrifuge;
pub mod diamond;
pub mod ganon;
pub mod kaiju;
pub mod kmcp;
pub mod kraken2;
pub mod krakenuniq;
pub mod malt;
pub mod megan6;
pub mod metaphlan;
pub mod motus;

/// Fold raw (identifier, count) pairs into the standard layout: duplicate
/// identifiers are summed in first-seen order, and missing identifiers are
/// pooled into the unclassified bucket, which comes last when present.
/// `always_bucket` forces the bucket row even when nothing was pooled,
/// for formats whose identifier column is nullable.
pub(crate) fn fold_counts<I>(pairs: I, always_bucket: bool) -> (Vec<i64>, Vec<i64>)
where
    I: IntoIterator<Item = (Option<i64>, i64)>,
{
    let mut order: Vec<i64> = Vec::new();
    let mut totals: HashMap<i64, i64> = HashMap::new();
    let mut bucket: i64 = 0;
    let mut saw_bucket = always_bucket;
    for (id, count) in pairs {
        let id = id.unwrap_or(UNCLASSIFIED_ID);
        if id == UNCLASSIFIED_ID {
            bucket += count;
            saw_bucket = true;
            continue;
        }
        match totals.entry(id) {
            Entry::Occupied(mut entry) => *entry.get_mut() += count,
            Entry::Vacant(entry) => {
                entry.insert(count);
                order.push(id);
            }
        }
    }
    let mut counts: Vec<i64> = order
        .iter()
        .map(|id| totals.get(id).copied().unwrap_or(0))
        .collect();
    let mut ids = order;
    if saw_bucket {
        ids.push(UNCLASSIFIED_ID);
        counts.push(bucket);
    }
    (ids, counts)
}

/// Compositionality check: `total` must lie within `tolerance` of
/// `expected`.
pub(crate) fn check_total(
    quantity: &str,
    total: f64,
    expected: f64,
    tolerance: f64,
) -> Result<(), SchemaError> {
    if (total - expected).abs() > tolerance {
        return Err(SchemaError::Composition {
            quantity: quantity.to_string(),
            total,
            expected,
            tolerance,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_duplicates_in_first_seen_order() {
        let (ids, counts) = fold_counts(
            [
                (Some(9), 1),
                (Some(5), 2),
                (Some(9), 3),
                (None, 4),
                (Some(0), 6),
            ],
            false,
        );
        assert_eq!(ids, vec![9, 5, 0]);
        assert_eq!(counts, vec![4, 2, 10]);
    }

    #[test]
    fn forced_bucket_appears_even_without_missing_ids() {
        let (ids, counts) = fold_counts([(Some(5), 2)], true);
        assert_eq!(ids, vec![5, 0]);
        assert_eq!(counts, vec![2, 0]);
    }

    #[test]
    fn totals_outside_tolerance_fail() {
        assert!(check_total("percentages", 100.4, 100.0, 1.0).is_ok());
        assert!(check_total("percentages", 97.2, 100.0, 1.0).is_err());
    }
}
