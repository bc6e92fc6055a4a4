//! Output writing for standardised profiles and merged observation tables.
//!
//! Supported formats:
//!
//! - **TSV/CSV**: delimited text via polars' CSV writer
//! - **XLSX**: Excel workbooks via `rust_xlsxwriter`
//! - **Arrow/Parquet**: columnar files via polars
//! - **BIOM**: Biological Observation Matrix 1.0.0 JSON, wide tables only

mod biom;
mod format;
mod writer;

pub use format::{
    FormatError, StandardProfileFormat, TidyObservationTableFormat, WideObservationTableFormat,
};
pub use writer::{write_standard_profile, write_tidy_table, write_wide_table};
