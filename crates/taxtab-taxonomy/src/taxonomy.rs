//! Flat-map taxonomy with iterative, depth-bounded lineage walks.

use std::path::Path;

use ahash::AHashMap;
use tracing::{debug, info};

use crate::error::{Result, TaxonomyError};
use crate::taxdump;

/// Upper bound on parent-chain walks. The deepest NCBI lineages are around
/// forty levels; anything beyond this indicates a corrupt dump.
pub(crate) const MAX_LINEAGE_DEPTH: usize = 100;

/// In-memory taxonomy built from an NCBI-style dump directory. All lookups
/// are O(1) reads against flat identifier maps; the service is passed by
/// reference to whatever needs it.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    parents: AHashMap<i64, i64>,
    ranks: AHashMap<i64, String>,
    names: AHashMap<i64, String>,
    merged: AHashMap<i64, i64>,
}

impl Taxonomy {
    /// Load a taxonomy from a directory containing `nodes.dmp` and
    /// `names.dmp`, plus `merged.dmp` if identifier remapping is wanted.
    pub fn from_taxdump(directory: &Path) -> Result<Self> {
        let nodes_path = directory.join(taxdump::NODES_FILE);
        if !nodes_path.is_file() {
            return Err(TaxonomyError::MissingFile(nodes_path));
        }
        let names_path = directory.join(taxdump::NAMES_FILE);
        if !names_path.is_file() {
            return Err(TaxonomyError::MissingFile(names_path));
        }
        let (parents, ranks) = taxdump::read_nodes(&nodes_path)?;
        let names = taxdump::read_names(&names_path)?;
        let merged_path = directory.join(taxdump::MERGED_FILE);
        let merged = if merged_path.is_file() {
            taxdump::read_merged(&merged_path)?
        } else {
            AHashMap::new()
        };
        info!(
            taxa = parents.len(),
            merged = merged.len(),
            directory = %directory.display(),
            "Loaded taxonomy"
        );
        Ok(Self {
            parents,
            ranks,
            names,
            merged,
        })
    }

    /// Remap an identifier through `merged.dmp`, if it was merged away.
    pub(crate) fn resolve(&self, id: i64) -> i64 {
        self.merged.get(&id).copied().unwrap_or(id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.parents.contains_key(&self.resolve(id))
    }

    pub fn name(&self, id: i64) -> Option<&str> {
        self.names.get(&self.resolve(id)).map(String::as_str)
    }

    pub fn rank(&self, id: i64) -> Option<&str> {
        self.ranks.get(&self.resolve(id)).map(String::as_str)
    }

    /// Ancestor chain of a taxon in root-to-leaf order, the root itself
    /// excluded. `None` for identifiers absent from the taxonomy.
    pub fn identifier_lineage(&self, id: i64) -> Option<Vec<i64>> {
        let mut current = self.resolve(id);
        self.parents.get(&current)?;
        let mut chain = Vec::new();
        for _ in 0..MAX_LINEAGE_DEPTH {
            let Some(parent) = self.parents.get(&current).copied() else {
                // Dangling parent pointer: treat the last known node as the top.
                break;
            };
            if parent == current {
                // Reached the self-parented root, which lineages exclude.
                break;
            }
            chain.push(current);
            current = parent;
        }
        if chain.len() == MAX_LINEAGE_DEPTH {
            debug!(taxonomy_id = id, "Lineage walk hit the depth bound");
        }
        chain.reverse();
        Some(chain)
    }

    /// Scientific-name rendering of [`Taxonomy::identifier_lineage`].
    /// Nodes without a scientific name appear as empty strings.
    pub fn name_lineage(&self, id: i64) -> Option<Vec<String>> {
        let chain = self.identifier_lineage(id)?;
        Some(
            chain
                .into_iter()
                .map(|node| self.name(node).unwrap_or_default().to_string())
                .collect(),
        )
    }

    /// Rank rendering of [`Taxonomy::identifier_lineage`].
    pub fn rank_lineage(&self, id: i64) -> Option<Vec<String>> {
        let chain = self.identifier_lineage(id)?;
        Some(
            chain
                .into_iter()
                .map(|node| self.rank(node).unwrap_or_default().to_string())
                .collect(),
        )
    }

    /// Nearest taxon at `rank` walking rootward from `id`, the taxon itself
    /// included. `None` when neither the taxon nor any ancestor has that
    /// rank, and for identifiers absent from the taxonomy.
    pub(crate) fn ancestor_at_rank(&self, id: i64, rank: &str) -> Option<i64> {
        let mut current = self.resolve(id);
        self.parents.get(&current)?;
        for _ in 0..MAX_LINEAGE_DEPTH {
            if self.ranks.get(&current).is_some_and(|r| r == rank) {
                return Some(current);
            }
            let parent = self.parents.get(&current).copied()?;
            if parent == current {
                return None;
            }
            current = parent;
        }
        None
    }
}
