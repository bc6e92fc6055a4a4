//! Sample sheet reading: a two column table naming each sample and the
//! report file behind it. Delimited sheets go through `csv`, Excel
//! workbooks through `calamine`, and Arrow or Parquet sheets through
//! polars. The format is guessed from the file extension.

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calamine::{Data, Reader, open_workbook_auto};
use polars::prelude::{DataFrame, IpcReader, ParquetReader, SerReader};
use serde::Deserialize;

pub const SAMPLE: &str = "sample";
pub const PROFILE: &str = "profile";

/// One row of a sample sheet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SampleSheetEntry {
    pub sample: String,
    pub profile: PathBuf,
}

/// Tabular formats a sample sheet can arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSheetFormat {
    Tsv,
    Csv,
    Xlsx,
    Arrow,
    Parquet,
}

impl SampleSheetFormat {
    /// Guess the format from the file extension.
    #[must_use]
    pub fn guess(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "tsv" => Some(Self::Tsv),
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "arrow" | "feather" | "ipc" => Some(Self::Arrow),
            "parquet" | "pqt" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// Read and validate a sample sheet, guessing the format from the path.
///
/// The sheet must carry `sample` and `profile` columns, list at least two
/// samples with unique names, and point at report files that exist.
///
/// # Errors
///
/// Returns an error if the format cannot be guessed, the sheet cannot be
/// read, or validation fails.
pub fn read_sample_sheet(path: &Path) -> Result<Vec<SampleSheetEntry>> {
    let Some(format) = SampleSheetFormat::guess(path) else {
        anyhow::bail!(
            "cannot guess the sample sheet format of {}; use .tsv, .csv, .xlsx, .arrow, or .parquet",
            path.display()
        );
    };
    read_sample_sheet_as(path, format)
}

/// Read and validate a sample sheet in an explicitly chosen format.
pub fn read_sample_sheet_as(
    path: &Path,
    format: SampleSheetFormat,
) -> Result<Vec<SampleSheetEntry>> {
    let entries = match format {
        SampleSheetFormat::Tsv => read_delimited(path, b'\t')?,
        SampleSheetFormat::Csv => read_delimited(path, b',')?,
        SampleSheetFormat::Xlsx => read_excel(path)?,
        SampleSheetFormat::Arrow => {
            let file =
                File::open(path).with_context(|| format!("open sample sheet: {}", path.display()))?;
            let frame = IpcReader::new(file)
                .finish()
                .with_context(|| format!("read sample sheet: {}", path.display()))?;
            entries_from_frame(&frame)?
        }
        SampleSheetFormat::Parquet => {
            let file =
                File::open(path).with_context(|| format!("open sample sheet: {}", path.display()))?;
            let frame = ParquetReader::new(file)
                .finish()
                .with_context(|| format!("read sample sheet: {}", path.display()))?;
            entries_from_frame(&frame)?
        }
    };
    validate(&entries, path)?;
    tracing::debug!(
        path = %path.display(),
        samples = entries.len(),
        "Read sample sheet"
    );
    Ok(entries)
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<Vec<SampleSheetEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("open sample sheet: {}", path.display()))?;
    let mut entries = Vec::new();
    for record in reader.deserialize() {
        let entry: SampleSheetEntry =
            record.with_context(|| format!("read sample sheet: {}", path.display()))?;
        entries.push(entry);
    }
    Ok(entries)
}

fn read_excel(path: &Path) -> Result<Vec<SampleSheetEntry>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("open sample sheet: {}", path.display()))?;
    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        anyhow::bail!("sample sheet {} has no worksheets", path.display());
    };
    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("read worksheet {sheet:?} of {}", path.display()))?;
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        anyhow::bail!("sample sheet {} is empty", path.display());
    };
    let labels: Vec<String> = header.iter().map(cell_text).collect();
    let sample_index = column_index(&labels, SAMPLE, path)?;
    let profile_index = column_index(&labels, PROFILE, path)?;
    let mut entries = Vec::new();
    for row in rows {
        let sample = row.get(sample_index).map(cell_text).unwrap_or_default();
        let profile = row.get(profile_index).map(cell_text).unwrap_or_default();
        if sample.is_empty() && profile.is_empty() {
            continue;
        }
        entries.push(SampleSheetEntry {
            sample,
            profile: PathBuf::from(profile),
        });
    }
    Ok(entries)
}

fn column_index(labels: &[String], name: &str, path: &Path) -> Result<usize> {
    labels.iter().position(|label| label == name).ok_or_else(|| {
        anyhow::anyhow!("sample sheet {} misses a {name:?} column", path.display())
    })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.trim().to_string(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => {
            if value.fract() == 0.0 {
                format!("{}", *value as i64)
            } else {
                value.to_string()
            }
        }
        Data::Bool(value) => value.to_string(),
        other => other.to_string(),
    }
}

fn entries_from_frame(frame: &DataFrame) -> Result<Vec<SampleSheetEntry>> {
    let samples = frame.column(SAMPLE)?.str()?;
    let profiles = frame.column(PROFILE)?.str()?;
    let mut entries = Vec::with_capacity(frame.height());
    for (sample, profile) in samples.into_iter().zip(profiles.into_iter()) {
        entries.push(SampleSheetEntry {
            sample: sample.unwrap_or_default().to_string(),
            profile: PathBuf::from(profile.unwrap_or_default()),
        });
    }
    Ok(entries)
}

fn validate(entries: &[SampleSheetEntry], path: &Path) -> Result<()> {
    if entries.len() < 2 {
        anyhow::bail!(
            "sample sheet {} lists {} sample(s); merging needs at least two",
            path.display(),
            entries.len()
        );
    }
    let mut seen = HashSet::new();
    for (index, entry) in entries.iter().enumerate() {
        // Data rows sit behind the header row.
        let row = index + 2;
        if entry.sample.is_empty() {
            anyhow::bail!("sample sheet {}: row {row} has an empty sample name", path.display());
        }
        if entry.profile.as_os_str().is_empty() {
            anyhow::bail!("sample sheet {}: row {row} has an empty profile path", path.display());
        }
        if !seen.insert(entry.sample.as_str()) {
            anyhow::bail!(
                "sample sheet {}: sample name {:?} appears more than once",
                path.display(),
                entry.sample
            );
        }
        if !entry.profile.is_file() {
            anyhow::bail!(
                "profile {} named by sample sheet {} does not exist",
                entry.profile.display(),
                path.display()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_formats_from_extensions() {
        assert_eq!(
            SampleSheetFormat::guess(Path::new("sheet.tsv")),
            Some(SampleSheetFormat::Tsv)
        );
        assert_eq!(
            SampleSheetFormat::guess(Path::new("sheet.XLSX")),
            Some(SampleSheetFormat::Xlsx)
        );
        assert_eq!(
            SampleSheetFormat::guess(Path::new("sheet.feather")),
            Some(SampleSheetFormat::Arrow)
        );
        assert_eq!(SampleSheetFormat::guess(Path::new("sheet.txt")), None);
        assert_eq!(SampleSheetFormat::guess(Path::new("sheet")), None);
    }

    #[test]
    fn excel_cells_render_as_text() {
        assert_eq!(cell_text(&Data::String(" s1 ".to_string())), "s1");
        assert_eq!(cell_text(&Data::Float(7.0)), "7");
        assert_eq!(cell_text(&Data::Float(7.5)), "7.5");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn single_sample_sheets_are_rejected() {
        let entries = vec![SampleSheetEntry {
            sample: "s1".to_string(),
            profile: PathBuf::from("a.tsv"),
        }];
        let error = validate(&entries, Path::new("sheet.tsv")).unwrap_err();
        assert!(error.to_string().contains("at least two"));
    }

    #[test]
    fn duplicate_sample_names_are_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let entries = vec![
            SampleSheetEntry {
                sample: "s1".to_string(),
                profile: file.path().to_path_buf(),
            },
            SampleSheetEntry {
                sample: "s1".to_string(),
                profile: file.path().to_path_buf(),
            },
        ];
        let error = validate(&entries, Path::new("sheet.tsv")).unwrap_err();
        assert!(error.to_string().contains("more than once"));
    }
}
