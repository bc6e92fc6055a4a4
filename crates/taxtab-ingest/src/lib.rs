pub mod profilers;
pub mod registry;
pub mod sample_sheet;
pub mod table;

pub use registry::{ProfileAdapter, SupportedProfiler, adapter_for, standardise_profile};
pub use sample_sheet::{
    SampleSheetEntry, SampleSheetFormat, read_sample_sheet, read_sample_sheet_as,
};
pub use table::{ColumnKind, ColumnSpec, ReadOptions, read_rows, read_rows_from, typed_frame};
