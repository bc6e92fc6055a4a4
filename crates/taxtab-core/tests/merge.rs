use polars::prelude::{Column, DataFrame, NamedFrom, PlSmallStr, Series};
use taxtab_core::{merge_long, merge_wide};
use taxtab_model::observation::{validate_tidy, validate_wide};
use taxtab_model::{Sample, standard_profile};

fn sample(name: &str, ids: Vec<i64>, counts: Vec<i64>) -> Sample {
    Sample::new(name, standard_profile::build(ids, counts).unwrap())
}

fn overlapping_samples() -> [Sample; 2] {
    [
        sample("s1", vec![1, 2], vec![23, 42]),
        sample("s2", vec![2, 3], vec![33, 55]),
    ]
}

#[test]
fn wide_merge_unions_taxa_with_zero_fill() {
    let merged = merge_wide(&overlapping_samples()).unwrap();
    let columns: Vec<Column> = vec![
        Series::new("taxonomy_id".into(), vec![1i64, 2, 3]).into(),
        Series::new("s1".into(), vec![23i64, 42, 0]).into(),
        Series::new("s2".into(), vec![0i64, 33, 55]).into(),
    ];
    let expected = DataFrame::new(columns).unwrap();
    assert!(merged.equals(&expected));
    assert!(validate_wide(&merged).is_ok());
}

#[test]
fn long_merge_stacks_samples_in_order() {
    let merged = merge_long(&overlapping_samples()).unwrap();
    let columns: Vec<Column> = vec![
        Series::new("taxonomy_id".into(), vec![1i64, 2, 2, 3]).into(),
        Series::new("count".into(), vec![23i64, 42, 33, 55]).into(),
        Series::new("sample".into(), vec!["s1", "s1", "s2", "s2"]).into(),
    ];
    let expected = DataFrame::new(columns).unwrap();
    assert!(merged.equals(&expected));
    assert!(validate_tidy(&merged).is_ok());
}

#[test]
fn wide_merge_keeps_sample_column_order() {
    let samples = [
        sample("beta", vec![5], vec![1]),
        sample("alpha", vec![5], vec![2]),
        sample("gamma", vec![5], vec![3]),
    ];
    let merged = merge_wide(&samples).unwrap();
    let names: Vec<&str> = merged
        .get_column_names()
        .into_iter()
        .map(PlSmallStr::as_str)
        .collect();
    assert_eq!(names, vec!["taxonomy_id", "beta", "alpha", "gamma"]);
}

#[test]
fn long_merge_row_count_is_the_sum_of_profile_lengths() {
    let samples = overlapping_samples();
    let merged = merge_long(&samples).unwrap();
    let expected: usize = samples.iter().map(|s| s.profile.height()).sum();
    assert_eq!(merged.height(), expected);
}
