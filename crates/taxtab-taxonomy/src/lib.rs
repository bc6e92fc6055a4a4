//! Taxonomy service over NCBI-style dump files.
//!
//! - **taxdump**: line-level parsing of `nodes.dmp`, `names.dmp`, `merged.dmp`
//! - **taxonomy**: the [`Taxonomy`] maps and lineage walks
//! - **annotate**: observation-table annotation columns and BIOM metadata
//! - **summarise**: rank summarisation with the [`UnmappedRank`] policy
//!
//! # Usage
//!
//! ```ignore
//! let taxonomy = Taxonomy::from_taxdump(Path::new("taxdump/"))?;
//! let at_genus = taxonomy.summarise_at(&sample.profile, "genus")?;
//! let annotated = taxonomy.add_name(&merged)?;
//! ```

pub mod annotate;
pub mod error;
pub mod summarise;
pub mod taxdump;
pub mod taxonomy;

pub use annotate::LINEAGE_SEPARATOR;
pub use error::{Result, TaxonomyError};
pub use summarise::UnmappedRank;
pub use taxonomy::Taxonomy;
