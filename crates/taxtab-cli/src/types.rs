use std::path::PathBuf;

/// What a merge run produced.
#[derive(Debug)]
pub struct MergeReport {
    pub samples: usize,
    pub taxa: usize,
    pub output: PathBuf,
}

/// What a standardise run produced.
#[derive(Debug)]
pub struct StandardiseReport {
    pub sample: String,
    pub taxa: usize,
    pub output: PathBuf,
}
