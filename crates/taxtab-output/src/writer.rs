//! Table writers shared by all output surfaces. Delimited text, Arrow,
//! and Parquet go through polars; XLSX through `rust_xlsxwriter`; BIOM
//! through the dedicated document builder.

use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{AnyValue, CsvWriter, DataFrame, IpcWriter, ParquetWriter, SerWriter};
use rust_xlsxwriter::Workbook;
use taxtab_taxonomy::Taxonomy;

use crate::biom;
use crate::format::{
    StandardProfileFormat, TidyObservationTableFormat, WideObservationTableFormat,
};

/// Write a single standardised profile.
pub fn write_standard_profile(
    profile: &DataFrame,
    path: &Path,
    format: StandardProfileFormat,
) -> Result<()> {
    create_parent(path)?;
    let mut frame = profile.clone();
    match format {
        StandardProfileFormat::Tsv => write_delimited(&mut frame, path, b'\t'),
        StandardProfileFormat::Csv => write_delimited(&mut frame, path, b','),
        StandardProfileFormat::Xlsx => write_workbook(&frame, path),
        StandardProfileFormat::Arrow => write_arrow(&mut frame, path),
        StandardProfileFormat::Parquet => write_parquet(&mut frame, path),
    }
}

/// Write a merged long (tidy) observation table.
pub fn write_tidy_table(
    table: &DataFrame,
    path: &Path,
    format: TidyObservationTableFormat,
) -> Result<()> {
    create_parent(path)?;
    let mut frame = table.clone();
    match format {
        TidyObservationTableFormat::Tsv => write_delimited(&mut frame, path, b'\t'),
        TidyObservationTableFormat::Csv => write_delimited(&mut frame, path, b','),
        TidyObservationTableFormat::Xlsx => write_workbook(&frame, path),
        TidyObservationTableFormat::Arrow => write_arrow(&mut frame, path),
        TidyObservationTableFormat::Parquet => write_parquet(&mut frame, path),
    }
}

/// Write a merged wide observation table. The taxonomy, when given, only
/// affects BIOM output, where it supplies per-observation metadata.
pub fn write_wide_table(
    table: &DataFrame,
    path: &Path,
    format: WideObservationTableFormat,
    taxonomy: Option<&Taxonomy>,
) -> Result<()> {
    create_parent(path)?;
    let mut frame = table.clone();
    match format {
        WideObservationTableFormat::Tsv => write_delimited(&mut frame, path, b'\t'),
        WideObservationTableFormat::Csv => write_delimited(&mut frame, path, b','),
        WideObservationTableFormat::Xlsx => write_workbook(&frame, path),
        WideObservationTableFormat::Arrow => write_arrow(&mut frame, path),
        WideObservationTableFormat::Parquet => write_parquet(&mut frame, path),
        WideObservationTableFormat::Biom => biom::write_biom(table, path, taxonomy),
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    Ok(())
}

fn write_delimited(frame: &mut DataFrame, path: &Path, separator: u8) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(file)
        .include_header(true)
        .with_separator(separator)
        .finish(frame)
        .with_context(|| format!("write table: {}", path.display()))
}

fn write_arrow(frame: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    IpcWriter::new(file)
        .finish(frame)
        .with_context(|| format!("write table: {}", path.display()))
}

fn write_parquet(frame: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    ParquetWriter::new(file)
        .finish(frame)
        .with_context(|| format!("write table: {}", path.display()))?;
    Ok(())
}

fn write_workbook(frame: &DataFrame, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let height = u32::try_from(frame.height()).context("too many rows for a worksheet")?;
    for (index, column) in frame.get_columns().iter().enumerate() {
        let col = u16::try_from(index).context("too many columns for a worksheet")?;
        worksheet.write_string(0, col, column.name().as_str())?;
        for row in 0..height {
            match column.get(row as usize)? {
                AnyValue::Null => {}
                AnyValue::Int64(value) => {
                    worksheet.write_number(row + 1, col, value as f64)?;
                }
                AnyValue::String(value) => {
                    worksheet.write_string(row + 1, col, value)?;
                }
                AnyValue::StringOwned(value) => {
                    worksheet.write_string(row + 1, col, value.as_str())?;
                }
                other => {
                    worksheet.write_string(row + 1, col, other.to_string())?;
                }
            }
        }
    }
    workbook
        .save(path)
        .with_context(|| format!("write workbook: {}", path.display()))?;
    Ok(())
}
