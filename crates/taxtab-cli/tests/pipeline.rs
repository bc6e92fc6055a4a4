//! Integration tests for output and sample resolution.

use std::fs;
use std::path::{Path, PathBuf};

use taxtab_cli::cli::{MergeFormatArg, ProfileFormatArg};
use taxtab_cli::pipeline::{
    MergeOutput, entries_from_paths, resolve_merge_output, resolve_profile_format,
    resolve_sheet_format,
};
use taxtab_ingest::SampleSheetFormat;
use taxtab_output::{
    StandardProfileFormat, TidyObservationTableFormat, WideObservationTableFormat,
};
use tempfile::TempDir;

#[test]
fn wide_output_format_follows_the_file_extension() {
    let resolved = resolve_merge_output(Path::new("out/merged.tsv"), None, false).unwrap();
    assert_eq!(resolved, MergeOutput::Wide(WideObservationTableFormat::Tsv));
}

#[test]
fn long_output_keeps_the_requested_shape() {
    let resolved = resolve_merge_output(Path::new("merged.parquet"), None, true).unwrap();
    assert_eq!(
        resolved,
        MergeOutput::Tidy(TidyObservationTableFormat::Parquet)
    );
}

#[test]
fn biom_output_is_forced_wide() {
    let resolved = resolve_merge_output(Path::new("merged.biom"), None, true).unwrap();
    assert_eq!(resolved, MergeOutput::Wide(WideObservationTableFormat::Biom));

    let explicit =
        resolve_merge_output(Path::new("merged.table"), Some(MergeFormatArg::Biom), true).unwrap();
    assert_eq!(explicit, MergeOutput::Wide(WideObservationTableFormat::Biom));
}

#[test]
fn explicit_format_overrides_a_conflicting_extension() {
    let resolved =
        resolve_merge_output(Path::new("merged.csv"), Some(MergeFormatArg::Tsv), false).unwrap();
    assert_eq!(resolved, MergeOutput::Wide(WideObservationTableFormat::Tsv));
}

#[test]
fn unrecognised_output_extensions_point_at_the_format_flag() {
    let error = resolve_merge_output(Path::new("merged.txt"), None, false).unwrap_err();
    assert!(error.to_string().contains("--output-format"));
}

#[test]
fn standard_profile_formats_resolve_from_extension_or_flag() {
    let guessed = resolve_profile_format(Path::new("profile.csv"), None).unwrap();
    assert_eq!(guessed, StandardProfileFormat::Csv);

    let explicit =
        resolve_profile_format(Path::new("profile"), Some(ProfileFormatArg::Parquet)).unwrap();
    assert_eq!(explicit, StandardProfileFormat::Parquet);

    assert!(resolve_profile_format(Path::new("profile"), None).is_err());
}

#[test]
fn sample_names_come_from_file_stems() {
    let entries = entries_from_paths(&[
        PathBuf::from("data/first.tsv"),
        PathBuf::from("data/second.tsv"),
    ])
    .unwrap();
    assert_eq!(entries[0].sample, "first");
    assert_eq!(entries[1].sample, "second");
    assert_eq!(entries[1].profile, PathBuf::from("data/second.tsv"));
}

#[test]
fn duplicate_sample_names_are_rejected() {
    let error = entries_from_paths(&[
        PathBuf::from("a/profile.tsv"),
        PathBuf::from("b/profile.tsv"),
    ])
    .unwrap_err();
    assert!(error.to_string().contains("more than once"));
}

#[test]
fn missing_sample_sheets_are_reported() {
    let error = resolve_sheet_format(Path::new("no/such/sheet.tsv"), None).unwrap_err();
    assert!(error.to_string().contains("does not exist"));
}

#[test]
fn sheet_formats_guess_from_the_last_extension() {
    let dir = TempDir::new().unwrap();
    let sheet = dir.path().join("samples.tsv");
    fs::write(&sheet, "sample\tprofile\n").unwrap();
    assert_eq!(
        resolve_sheet_format(&sheet, None).unwrap(),
        SampleSheetFormat::Tsv
    );

    let odd = dir.path().join("samples.table");
    fs::write(&odd, "").unwrap();
    let error = resolve_sheet_format(&odd, None).unwrap_err();
    assert!(error.to_string().contains("--samplesheet-format"));
}
