//! Input and output resolution ahead of a merge or standardise run.
//!
//! Everything here inspects the invocation, not the profile data: which
//! table shape and file format to produce, where the samples come from,
//! and what they are called. Failures are [`UsageError`]s and exit with
//! code 2, while failures during the run itself exit with code 1.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use taxtab_ingest::sample_sheet::{SampleSheetEntry, SampleSheetFormat};
use taxtab_output::{
    FormatError, StandardProfileFormat, TidyObservationTableFormat, WideObservationTableFormat,
};
use thiserror::Error;

use crate::cli::{MergeFormatArg, ProfileFormatArg, SheetFormatArg};

/// A configuration problem the caller must fix before rerunning.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct UsageError(pub String);

/// Shape and file format of the merged table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutput {
    Wide(WideObservationTableFormat),
    Tidy(TidyObservationTableFormat),
}

/// Decide the merged table's shape and format.
///
/// An explicit `--output-format` wins over the output file extension.
/// BIOM documents are always wide, so a BIOM output overrides `--long`.
pub fn resolve_merge_output(
    output: &Path,
    format: Option<MergeFormatArg>,
    long: bool,
) -> Result<MergeOutput, UsageError> {
    let wide = match format {
        Some(arg) => arg.to_wide_format(),
        None => WideObservationTableFormat::guess_format(output).map_err(format_usage)?,
    };
    let resolved = match (wide, long) {
        (WideObservationTableFormat::Biom, _) => {
            if long {
                tracing::warn!("BIOM output is always a wide table; ignoring '--long'");
            }
            MergeOutput::Wide(WideObservationTableFormat::Biom)
        }
        (other, false) => MergeOutput::Wide(other),
        (WideObservationTableFormat::Tsv, true) => {
            MergeOutput::Tidy(TidyObservationTableFormat::Tsv)
        }
        (WideObservationTableFormat::Csv, true) => {
            MergeOutput::Tidy(TidyObservationTableFormat::Csv)
        }
        (WideObservationTableFormat::Xlsx, true) => {
            MergeOutput::Tidy(TidyObservationTableFormat::Xlsx)
        }
        (WideObservationTableFormat::Arrow, true) => {
            MergeOutput::Tidy(TidyObservationTableFormat::Arrow)
        }
        (WideObservationTableFormat::Parquet, true) => {
            MergeOutput::Tidy(TidyObservationTableFormat::Parquet)
        }
    };
    Ok(resolved)
}

/// Decide the standardised profile's file format.
pub fn resolve_profile_format(
    output: &Path,
    format: Option<ProfileFormatArg>,
) -> Result<StandardProfileFormat, UsageError> {
    match format {
        Some(arg) => Ok(arg.to_format()),
        None => StandardProfileFormat::guess_format(output).map_err(format_usage),
    }
}

/// Decide the sample sheet's format before reading it.
pub fn resolve_sheet_format(
    sheet: &Path,
    format: Option<SheetFormatArg>,
) -> Result<SampleSheetFormat, UsageError> {
    if !sheet.is_file() {
        return Err(UsageError(format!(
            "sample sheet {} does not exist",
            sheet.display()
        )));
    }
    match format {
        Some(arg) => Ok(arg.to_format()),
        None => SampleSheetFormat::guess(sheet).ok_or_else(|| {
            UsageError(format!(
                "cannot guess the sample sheet format of {}; set '--samplesheet-format' explicitly",
                sheet.display()
            ))
        }),
    }
}

/// Pair each positional profile with a sample name taken from its file
/// stem, rejecting duplicates.
pub fn entries_from_paths(paths: &[PathBuf]) -> Result<Vec<SampleSheetEntry>, UsageError> {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(paths.len());
    for path in paths {
        let sample = sample_name(path)?;
        if !seen.insert(sample.clone()) {
            return Err(UsageError(format!(
                "sample name '{sample}' appears more than once; rename the file or use a sample sheet"
            )));
        }
        entries.push(SampleSheetEntry {
            sample,
            profile: path.clone(),
        });
    }
    Ok(entries)
}

/// Sample name for a profile path, taken from the file stem.
pub fn sample_name(path: &Path) -> Result<String, UsageError> {
    match path.file_stem() {
        Some(stem) => Ok(stem.to_string_lossy().into_owned()),
        None => Err(UsageError(format!(
            "cannot derive a sample name from {}",
            path.display()
        ))),
    }
}

fn format_usage(error: FormatError) -> UsageError {
    UsageError(format!(
        "{error}; rename the output or set '--output-format' explicitly"
    ))
}
