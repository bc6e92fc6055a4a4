//! Per-sample extract, transform, load: read a classifier report,
//! standardise it, and optionally summarise it at a taxonomic rank.

use std::path::Path;

use anyhow::Result;
use taxtab_ingest::sample_sheet::SampleSheetEntry;
use taxtab_ingest::{SupportedProfiler, adapter_for};
use taxtab_model::Sample;
use taxtab_taxonomy::{Taxonomy, UnmappedRank};

use crate::error::StandardisationError;

/// Optional rank summarisation applied to every profile after
/// standardisation.
pub struct RankSummary<'a> {
    pub taxonomy: &'a Taxonomy,
    pub rank: String,
    pub unmapped: UnmappedRank,
}

/// Drives read, standardise, and optional summarise for single samples.
///
/// The taxonomy behind a [`RankSummary`] is borrowed: it is loaded once
/// by the caller and shared read-only across all samples.
pub struct SampleEtl<'a> {
    profiler: SupportedProfiler,
    summary: Option<RankSummary<'a>>,
}

impl<'a> SampleEtl<'a> {
    pub fn new(profiler: SupportedProfiler) -> Self {
        Self {
            profiler,
            summary: None,
        }
    }

    /// Summarise each standardised profile at a rank before returning it.
    #[must_use]
    pub fn with_summary(mut self, summary: RankSummary<'a>) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn profiler(&self) -> SupportedProfiler {
        self.profiler
    }

    /// Standardise one sample.
    ///
    /// # Errors
    ///
    /// Returns a [`StandardisationError`] naming the sample and report
    /// path if reading, standardisation, or summarisation fails.
    pub fn etl_sample(&self, name: &str, path: &Path) -> Result<Sample, StandardisationError> {
        let adapter = adapter_for(self.profiler);
        let raw = adapter
            .read(path)
            .map_err(|error| self.failure(name, path, format!("{error:#}")))?;
        let mut profile = adapter
            .transform(&raw)
            .map_err(|error| self.failure(name, path, error.to_string()))?;
        if let Some(summary) = &self.summary {
            profile = summary
                .taxonomy
                .summarise_at_with(&profile, &summary.rank, summary.unmapped)
                .map_err(|error| self.failure(name, path, error.to_string()))?;
        }
        tracing::debug!(
            sample = name,
            rows = profile.height(),
            "Standardised sample"
        );
        Ok(Sample::new(name, profile))
    }

    fn failure(&self, sample: &str, profile: &Path, message: String) -> StandardisationError {
        StandardisationError {
            sample: sample.to_string(),
            profile: profile.to_path_buf(),
            message,
        }
    }
}

/// Standardise every listed sample ahead of merging.
///
/// With `ignore_errors`, failed samples are logged and skipped instead of
/// aborting the run. Either way at least two samples must survive, since
/// the result feeds the merge engine.
///
/// # Errors
///
/// Returns the first [`StandardisationError`] unless `ignore_errors` is
/// set, and an error when fewer than two samples survive.
pub fn etl_samples(
    etl: &SampleEtl<'_>,
    entries: &[SampleSheetEntry],
    ignore_errors: bool,
) -> Result<Vec<Sample>> {
    let mut samples = Vec::with_capacity(entries.len());
    for entry in entries {
        match etl.etl_sample(&entry.sample, &entry.profile) {
            Ok(sample) => samples.push(sample),
            Err(error) if ignore_errors => {
                tracing::warn!(error = %error, "Skipping sample");
            }
            Err(error) => return Err(error.into()),
        }
    }
    if samples.len() < 2 {
        anyhow::bail!(
            "{} of {} samples standardised; merging needs at least two",
            samples.len(),
            entries.len()
        );
    }
    Ok(samples)
}
