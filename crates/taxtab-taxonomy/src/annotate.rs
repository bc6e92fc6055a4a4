//! Observation-table annotation: each operation returns a copy of the
//! input with one String column inserted directly after `taxonomy_id`.
//! Unknown identifiers (the unclassified bucket included) yield nulls.

use polars::prelude::{DataFrame, NamedFrom, Series};
use taxtab_model::observation;
use taxtab_model::standard_profile::TAXONOMY_ID;

use crate::error::Result;
use crate::taxonomy::Taxonomy;

/// Separator between lineage elements in annotation columns.
pub const LINEAGE_SEPARATOR: &str = ";";

impl Taxonomy {
    fn insert_annotation(
        &self,
        table: &DataFrame,
        column: &str,
        value: impl Fn(i64) -> Option<String>,
    ) -> Result<DataFrame> {
        let ids = table.column(TAXONOMY_ID)?.i64()?;
        let values: Vec<Option<String>> = ids.into_iter().map(|id| id.and_then(&value)).collect();
        let mut annotated = table.clone();
        annotated.insert_column(1, Series::new(column.into(), values))?;
        Ok(annotated)
    }

    pub fn add_name(&self, table: &DataFrame) -> Result<DataFrame> {
        self.insert_annotation(table, observation::NAME, |id| {
            self.name(id).map(str::to_string)
        })
    }

    pub fn add_rank(&self, table: &DataFrame) -> Result<DataFrame> {
        self.insert_annotation(table, observation::RANK, |id| {
            self.rank(id).map(str::to_string)
        })
    }

    pub fn add_name_lineage(&self, table: &DataFrame) -> Result<DataFrame> {
        self.insert_annotation(table, observation::LINEAGE, |id| {
            self.name_lineage(id)
                .map(|chain| chain.join(LINEAGE_SEPARATOR))
        })
    }

    pub fn add_identifier_lineage(&self, table: &DataFrame) -> Result<DataFrame> {
        self.insert_annotation(table, observation::ID_LINEAGE, |id| {
            self.identifier_lineage(id).map(|chain| {
                chain
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(LINEAGE_SEPARATOR)
            })
        })
    }

    pub fn add_rank_lineage(&self, table: &DataFrame) -> Result<DataFrame> {
        self.insert_annotation(table, observation::RANK_LINEAGE, |id| {
            self.rank_lineage(id)
                .map(|chain| chain.join(LINEAGE_SEPARATOR))
        })
    }

    /// Per-row name lineages aligned to a canonical rank axis, for BIOM
    /// observation metadata. The longest lineage among the table's
    /// identifiers defines the axis; every other row's (rank, name) chain
    /// is matched against that axis in lock-step. Rows with unknown
    /// identifiers come out all-empty.
    pub fn format_biom_taxonomy(
        &self,
        table: &DataFrame,
    ) -> Result<(Vec<Vec<String>>, Vec<String>)> {
        let ids = table.column(TAXONOMY_ID)?.i64()?;
        let mut lineages: Vec<Vec<(String, String)>> = Vec::with_capacity(ids.len());
        let mut axis: Vec<String> = Vec::new();
        for id in ids {
            let chain: Vec<(String, String)> = id
                .and_then(|id| {
                    let ranks = self.rank_lineage(id)?;
                    let names = self.name_lineage(id)?;
                    Some(ranks.into_iter().zip(names).collect())
                })
                .unwrap_or_default();
            if chain.len() > axis.len() {
                axis = chain.iter().map(|(rank, _)| rank.clone()).collect();
            }
            lineages.push(chain);
        }
        let rows = lineages
            .iter()
            .map(|lineage| align_to_axis(lineage, &axis))
            .collect();
        Ok((rows, axis))
    }
}

/// Walk the axis and the chain together: a name is emitted at an axis
/// position only when the chain's next pending rank matches the axis rank
/// there; on a mismatch the position stays empty and only the axis moves.
fn align_to_axis(lineage: &[(String, String)], axis: &[String]) -> Vec<String> {
    let mut cursor = 0;
    axis.iter()
        .map(|rank| match lineage.get(cursor) {
            Some((pending, name)) if pending == rank => {
                cursor += 1;
                name.clone()
            }
            _ => String::new(),
        })
        .collect()
}
