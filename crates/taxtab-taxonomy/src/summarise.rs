//! Rank summarisation: fold every count in a profile onto its nearest
//! ancestor at a target rank.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use taxtab_model::standard_profile::{self, COUNT, TAXONOMY_ID, UNCLASSIFIED_ID};
use tracing::debug;

use crate::error::{Result, TaxonomyError};
use crate::taxonomy::Taxonomy;

/// What to do with a taxon that has no ancestor at the requested rank
/// (unknown identifiers included).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnmappedRank {
    /// Drop the taxon's counts, logging each at debug level.
    #[default]
    Drop,
    /// Fail the operation naming the first offending taxon.
    Error,
    /// Keep the taxon under its own identifier, at its own rank.
    Keep,
}

impl Taxonomy {
    /// Summarise a standard profile at `rank` with the default
    /// [`UnmappedRank::Drop`] policy.
    pub fn summarise_at(&self, profile: &DataFrame, rank: &str) -> Result<DataFrame> {
        self.summarise_at_with(profile, rank, UnmappedRank::default())
    }

    /// Summarise a standard profile at `rank`: each row's count accumulates
    /// onto the nearest taxon at that rank walking rootward (a taxon
    /// already at the rank accumulates onto itself). Unclassified rows
    /// (identifier 0) are skipped. The result keeps the standard profile
    /// schema and is sorted by identifier ascending; summarising an
    /// already-summarised profile at the same rank leaves values unchanged.
    pub fn summarise_at_with(
        &self,
        profile: &DataFrame,
        rank: &str,
        unmapped: UnmappedRank,
    ) -> Result<DataFrame> {
        let ids = profile.column(TAXONOMY_ID)?.i64()?;
        let counts = profile.column(COUNT)?.i64()?;
        let mut totals: BTreeMap<i64, i64> = BTreeMap::new();
        for (id, count) in ids.into_no_null_iter().zip(counts.into_no_null_iter()) {
            if id == UNCLASSIFIED_ID {
                continue;
            }
            match self.ancestor_at_rank(id, rank) {
                Some(ancestor) => *totals.entry(ancestor).or_insert(0) += count,
                None => match unmapped {
                    UnmappedRank::Drop => {
                        debug!(
                            taxonomy_id = id,
                            rank, "No ancestor at requested rank, dropping taxon"
                        );
                    }
                    UnmappedRank::Error => {
                        return Err(TaxonomyError::UnmappedRank {
                            id,
                            rank: rank.to_string(),
                        });
                    }
                    UnmappedRank::Keep => *totals.entry(id).or_insert(0) += count,
                },
            }
        }
        let (ids, counts): (Vec<i64>, Vec<i64>) = totals.into_iter().unzip();
        Ok(standard_profile::build(ids, counts)?)
    }
}
