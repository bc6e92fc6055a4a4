//! Merge standardised samples into wide or long observation tables.

use std::collections::{HashMap, HashSet};

use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use taxtab_model::Sample;
use taxtab_model::observation::SAMPLE;
use taxtab_model::standard_profile::{COUNT, TAXONOMY_ID};

use crate::error::MergeError;

/// Combine samples into a matrix: one row per taxon in first-seen order,
/// one count column per sample in input order. Taxa absent from a sample
/// are filled with zero, never null. Duplicate identifiers within one
/// sample are a hard error; standard profiles rule them out, so hitting
/// one means the input skipped validation.
pub fn merge_wide(samples: &[Sample]) -> Result<DataFrame, MergeError> {
    if samples.is_empty() {
        return Err(MergeError::NoSamples);
    }
    let mut union: Vec<i64> = Vec::new();
    let mut seen: HashSet<i64> = HashSet::new();
    let mut per_sample: Vec<HashMap<i64, i64>> = Vec::with_capacity(samples.len());
    for sample in samples {
        let ids = sample.profile.column(TAXONOMY_ID)?.i64()?;
        let counts = sample.profile.column(COUNT)?.i64()?;
        let mut table = HashMap::with_capacity(ids.len());
        for (id, count) in ids.into_no_null_iter().zip(counts.into_no_null_iter()) {
            if table.insert(id, count).is_some() {
                return Err(MergeError::DuplicateTaxonomyId {
                    sample: sample.name.clone(),
                    id,
                });
            }
            if seen.insert(id) {
                union.push(id);
            }
        }
        per_sample.push(table);
    }
    let mut columns: Vec<Column> = Vec::with_capacity(samples.len() + 1);
    columns.push(Series::new(TAXONOMY_ID.into(), union.clone()).into());
    let mut introduced_zeroes = false;
    for (sample, table) in samples.iter().zip(&per_sample) {
        if table.len() != union.len() {
            introduced_zeroes = true;
        }
        let counts: Vec<i64> = union
            .iter()
            .map(|id| table.get(id).copied().unwrap_or(0))
            .collect();
        columns.push(Series::new(sample.name.as_str().into(), counts).into());
    }
    if introduced_zeroes {
        tracing::warn!(
            "The merged profiles contained different taxa. Additional zeroes were introduced \
             for missing taxa."
        );
    }
    Ok(DataFrame::new(columns)?)
}

/// Stack samples row-wise into a tidy table with a trailing `sample`
/// column. Per-sample row order is preserved and nothing is deduplicated.
pub fn merge_long(samples: &[Sample]) -> Result<DataFrame, MergeError> {
    if samples.is_empty() {
        return Err(MergeError::NoSamples);
    }
    let mut ids: Vec<i64> = Vec::new();
    let mut counts: Vec<i64> = Vec::new();
    let mut names: Vec<String> = Vec::new();
    for sample in samples {
        let profile_ids = sample.profile.column(TAXONOMY_ID)?.i64()?;
        let profile_counts = sample.profile.column(COUNT)?.i64()?;
        for (id, count) in profile_ids
            .into_no_null_iter()
            .zip(profile_counts.into_no_null_iter())
        {
            ids.push(id);
            counts.push(count);
            names.push(sample.name.clone());
        }
    }
    let columns: Vec<Column> = vec![
        Series::new(TAXONOMY_ID.into(), ids).into(),
        Series::new(COUNT.into(), counts).into(),
        Series::new(SAMPLE.into(), names).into(),
    ];
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use taxtab_model::standard_profile;

    use super::*;

    fn sample(name: &str, ids: Vec<i64>, counts: Vec<i64>) -> Sample {
        Sample::new(name, standard_profile::build(ids, counts).unwrap())
    }

    #[test]
    fn no_samples_is_an_error() {
        assert!(matches!(merge_wide(&[]), Err(MergeError::NoSamples)));
        assert!(matches!(merge_long(&[]), Err(MergeError::NoSamples)));
    }

    #[test]
    fn duplicate_identifiers_within_a_sample_fail() {
        let columns: Vec<Column> = vec![
            Series::new(TAXONOMY_ID.into(), vec![1i64, 1]).into(),
            Series::new(COUNT.into(), vec![5i64, 7]).into(),
        ];
        let broken = Sample::new("s1", DataFrame::new(columns).unwrap());
        assert!(matches!(
            merge_wide(&[broken]),
            Err(MergeError::DuplicateTaxonomyId { id: 1, .. })
        ));
    }

    #[test]
    fn single_sample_round_trips() {
        let merged = merge_wide(&[sample("s1", vec![1, 2], vec![23, 42])]).unwrap();
        assert_eq!(merged.width(), 2);
        let counts: Vec<i64> = merged
            .column("s1")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(counts, vec![23, 42]);
    }
}
