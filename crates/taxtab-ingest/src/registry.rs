//! Profiler registry: one adapter per supported classifier.
//!
//! The [`ProfileAdapter`] trait gives callers a uniform face over a
//! classifier's reader and transform, so the ETL layer can standardise a
//! report without knowing which tool produced it. Adapters are looked up
//! with [`adapter_for`].
//!
//! # Example
//!
//! ```ignore
//! use taxtab_ingest::{SupportedProfiler, adapter_for};
//!
//! let adapter = adapter_for(SupportedProfiler::Kraken2);
//! let raw = adapter.read(&path)?;
//! let profile = adapter.transform(&raw)?;
//! ```

use std::fmt;
use std::path::Path;

use anyhow::Result;
use polars::prelude::DataFrame;
use taxtab_model::SchemaError;

use crate::profilers::{
    bracken, centrifuge, diamond, ganon, kaiju, kmcp, kraken2, krakenuniq, malt, megan6,
    metaphlan, motus,
};

/// Classifiers whose reports can be standardised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedProfiler {
    Bracken,
    Centrifuge,
    Diamond,
    Ganon,
    Kaiju,
    Kmcp,
    Kraken2,
    KrakenUniq,
    Malt,
    Megan6,
    Metaphlan,
    Motus,
}

impl SupportedProfiler {
    /// Every supported profiler, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Bracken,
        Self::Centrifuge,
        Self::Diamond,
        Self::Ganon,
        Self::Kaiju,
        Self::Kmcp,
        Self::Kraken2,
        Self::KrakenUniq,
        Self::Malt,
        Self::Megan6,
        Self::Metaphlan,
        Self::Motus,
    ];

    /// Lowercase tool name as used on the command line and in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bracken => "bracken",
            Self::Centrifuge => "centrifuge",
            Self::Diamond => "diamond",
            Self::Ganon => "ganon",
            Self::Kaiju => "kaiju",
            Self::Kmcp => "kmcp",
            Self::Kraken2 => "kraken2",
            Self::KrakenUniq => "krakenuniq",
            Self::Malt => "malt",
            Self::Megan6 => "megan6",
            Self::Metaphlan => "metaphlan",
            Self::Motus => "motus",
        }
    }

    /// One-line description of the tool, for the profiler roster.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Bracken => "Bayesian re-estimation of Kraken abundances",
            Self::Centrifuge => "FM-index based read classifier",
            Self::Diamond => "Protein aligner with taxonomic classification",
            Self::Ganon => "Interleaved bloom filter read classifier",
            Self::Kaiju => "Protein-level read classifier",
            Self::Kmcp => "K-mer containment profiler",
            Self::Kraken2 => "Exact k-mer read classifier",
            Self::KrakenUniq => "Kraken with unique k-mer counting",
            Self::Malt => "MEGAN alignment tool",
            Self::Megan6 => "MEGAN6 rma2info taxonomic exports",
            Self::Metaphlan => "Marker gene relative abundance profiler",
            Self::Motus => "Universal marker gene profiler",
        }
    }
}

impl fmt::Display for SupportedProfiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Uniform interface over one classifier's report handling.
///
/// `read` parses a report file into the classifier's raw typed table and
/// surfaces IO problems; `transform` shapes a raw table into a standard
/// profile and surfaces contract violations. Keeping the two steps
/// separate lets callers validate reports without standardising them.
pub trait ProfileAdapter: Send + Sync {
    /// The classifier this adapter handles.
    fn profiler(&self) -> SupportedProfiler;

    /// Read a report file into the raw typed table.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not match the
    /// classifier's layout.
    fn read(&self, path: &Path) -> Result<DataFrame>;

    /// Shape a raw table into a standard profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the table violates the classifier's contract,
    /// for example a failed compositionality check.
    fn transform(&self, raw: &DataFrame) -> Result<DataFrame, SchemaError>;
}

/// Adapter backed by a profiler module's free functions.
struct FunctionAdapter {
    profiler: SupportedProfiler,
    read_fn: fn(&Path) -> Result<DataFrame>,
    transform_fn: fn(&DataFrame) -> Result<DataFrame, SchemaError>,
}

impl ProfileAdapter for FunctionAdapter {
    fn profiler(&self) -> SupportedProfiler {
        self.profiler
    }

    fn read(&self, path: &Path) -> Result<DataFrame> {
        (self.read_fn)(path)
    }

    fn transform(&self, raw: &DataFrame) -> Result<DataFrame, SchemaError> {
        (self.transform_fn)(raw)
    }
}

/// Indexed by the enum discriminant; keep in declaration order.
static ADAPTERS: [FunctionAdapter; 12] = [
    FunctionAdapter {
        profiler: SupportedProfiler::Bracken,
        read_fn: bracken::read,
        transform_fn: bracken::transform,
    },
    FunctionAdapter {
        profiler: SupportedProfiler::Centrifuge,
        read_fn: centrifuge::read,
        transform_fn: centrifuge::transform,
    },
    FunctionAdapter {
        profiler: SupportedProfiler::Diamond,
        read_fn: diamond::read,
        transform_fn: diamond::transform,
    },
    FunctionAdapter {
        profiler: SupportedProfiler::Ganon,
        read_fn: ganon::read,
        transform_fn: ganon::transform,
    },
    FunctionAdapter {
        profiler: SupportedProfiler::Kaiju,
        read_fn: kaiju::read,
        transform_fn: kaiju::transform,
    },
    FunctionAdapter {
        profiler: SupportedProfiler::Kmcp,
        read_fn: kmcp::read,
        transform_fn: kmcp::transform,
    },
    FunctionAdapter {
        profiler: SupportedProfiler::Kraken2,
        read_fn: kraken2::read,
        transform_fn: kraken2::transform,
    },
    FunctionAdapter {
        profiler: SupportedProfiler::KrakenUniq,
        read_fn: krakenuniq::read,
        transform_fn: krakenuniq::transform,
    },
    FunctionAdapter {
        profiler: SupportedProfiler::Malt,
        read_fn: malt::read,
        transform_fn: malt::transform,
    },
    FunctionAdapter {
        profiler: SupportedProfiler::Megan6,
        read_fn: megan6::read,
        transform_fn: megan6::transform,
    },
    FunctionAdapter {
        profiler: SupportedProfiler::Metaphlan,
        read_fn: metaphlan::read,
        transform_fn: metaphlan::transform,
    },
    FunctionAdapter {
        profiler: SupportedProfiler::Motus,
        read_fn: motus::read,
        transform_fn: motus::transform,
    },
];

/// Look up the adapter for a profiler.
#[must_use]
pub fn adapter_for(profiler: SupportedProfiler) -> &'static dyn ProfileAdapter {
    &ADAPTERS[profiler as usize]
}

/// Read and standardise one report in a single step.
///
/// # Errors
///
/// Returns an error if reading or standardisation fails.
pub fn standardise_profile(profiler: SupportedProfiler, path: &Path) -> Result<DataFrame> {
    let adapter = adapter_for(profiler);
    let raw = adapter.read(path)?;
    tracing::debug!(
        profiler = profiler.name(),
        path = %path.display(),
        rows = raw.height(),
        "Read classifier report"
    );
    Ok(adapter.transform(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapters_align_with_declaration_order() {
        for profiler in SupportedProfiler::ALL {
            assert_eq!(adapter_for(profiler).profiler(), profiler);
        }
    }

    #[test]
    fn names_are_lowercase_and_unique() {
        let names: Vec<&str> = SupportedProfiler::ALL.iter().map(|p| p.name()).collect();
        for name in &names {
            assert_eq!(*name, name.to_lowercase());
        }
        let mut deduplicated = names.clone();
        deduplicated.sort_unstable();
        deduplicated.dedup();
        assert_eq!(deduplicated.len(), names.len());
    }
}
