//! Output format enums, guessed from file extensions.
//!
//! Guessing looks at every dot-separated suffix of the file name, so
//! `result.tsv` and `result.tsv.gz` both resolve to TSV while
//! `result.tsv.csv` is rejected as ambiguous.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unrecognised output file extension: {path}", path = .path.display())]
    Unrecognised { path: PathBuf },
    #[error("ambiguous output file extensions: {path}", path = .path.display())]
    Ambiguous { path: PathBuf },
}

/// Formats a single standardised profile can be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardProfileFormat {
    Tsv,
    Csv,
    Xlsx,
    Arrow,
    Parquet,
}

impl StandardProfileFormat {
    /// Guess the format from the file extension.
    pub fn guess_format(path: &Path) -> Result<Self, FormatError> {
        guess(path, Self::from_suffix)
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "tsv" => Some(Self::Tsv),
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "arrow" | "feather" | "ipc" => Some(Self::Arrow),
            "parquet" | "pqt" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// Formats a merged long (tidy) observation table can be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TidyObservationTableFormat {
    Tsv,
    Csv,
    Xlsx,
    Arrow,
    Parquet,
}

impl TidyObservationTableFormat {
    /// Guess the format from the file extension.
    pub fn guess_format(path: &Path) -> Result<Self, FormatError> {
        guess(path, Self::from_suffix)
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "tsv" => Some(Self::Tsv),
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "arrow" | "feather" | "ipc" => Some(Self::Arrow),
            "parquet" | "pqt" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// Formats a merged wide observation table can be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WideObservationTableFormat {
    Tsv,
    Csv,
    Xlsx,
    Arrow,
    Parquet,
    Biom,
}

impl WideObservationTableFormat {
    /// Guess the format from the file extension.
    pub fn guess_format(path: &Path) -> Result<Self, FormatError> {
        guess(path, Self::from_suffix)
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "tsv" => Some(Self::Tsv),
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "arrow" | "feather" | "ipc" => Some(Self::Arrow),
            "parquet" | "pqt" => Some(Self::Parquet),
            "biom" => Some(Self::Biom),
            _ => None,
        }
    }
}

/// Every dot-separated suffix of the file name, lower-cased, without the
/// leading dot. A leading dot on the name itself (hidden files) does not
/// count as a suffix boundary.
fn suffixes(path: &Path) -> Vec<String> {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return Vec::new();
    };
    name.trim_start_matches('.')
        .split('.')
        .skip(1)
        .map(str::to_ascii_lowercase)
        .collect()
}

fn guess<F>(path: &Path, from_suffix: impl Fn(&str) -> Option<F>) -> Result<F, FormatError>
where
    F: Copy + PartialEq,
{
    let mut matches: Vec<F> = Vec::new();
    for suffix in suffixes(path) {
        if let Some(format) = from_suffix(&suffix)
            && !matches.contains(&format)
        {
            matches.push(format);
        }
    }
    match matches.as_slice() {
        [format] => Ok(*format),
        [] => Err(FormatError::Unrecognised {
            path: path.to_path_buf(),
        }),
        _ => Err(FormatError::Ambiguous {
            path: path.to_path_buf(),
        }),
    }
}
