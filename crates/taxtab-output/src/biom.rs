//! Biological Observation Matrix (BIOM) 1.0.0 JSON output.
//!
//! The document is a dense matrix: observation ids are the taxonomy
//! identifiers rendered as strings, column ids the sample names. The
//! unclassified bucket (identifier 0) is dropped before writing. When a
//! taxonomy is supplied, every observation carries a `taxonomy` metadata
//! array of lineage names aligned to a shared rank axis.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use polars::prelude::DataFrame;
use serde::Serialize;
use taxtab_model::standard_profile::{TAXONOMY_ID, UNCLASSIFIED_ID};
use taxtab_taxonomy::Taxonomy;

const FORMAT: &str = "Biological Observation Matrix 1.0.0";
const FORMAT_URL: &str = "http://biom-format.org";
const TABLE_TYPE: &str = "OTU table";
const GENERATED_BY: &str = concat!("taxtab ", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct Document {
    id: Option<String>,
    format: &'static str,
    format_url: &'static str,
    #[serde(rename = "type")]
    table_type: &'static str,
    generated_by: &'static str,
    date: String,
    rows: Vec<Observation>,
    columns: Vec<SampleColumn>,
    matrix_type: &'static str,
    matrix_element_type: &'static str,
    shape: [usize; 2],
    data: Vec<Vec<i64>>,
}

#[derive(Serialize)]
struct Observation {
    id: String,
    metadata: Option<ObservationMetadata>,
}

#[derive(Serialize)]
struct ObservationMetadata {
    taxonomy: Vec<String>,
}

#[derive(Serialize)]
struct SampleColumn {
    id: String,
    metadata: (),
}

pub(crate) fn write_biom(
    table: &DataFrame,
    path: &Path,
    taxonomy: Option<&Taxonomy>,
) -> Result<()> {
    let ids = table.column(TAXONOMY_ID)?.i64()?;
    let sample_names: Vec<String> = table
        .get_column_names()
        .into_iter()
        .skip(1)
        .map(|name| name.as_str().to_string())
        .collect();
    let counts: Vec<Vec<i64>> = sample_names
        .iter()
        .map(|name| Ok(table.column(name)?.i64()?.into_no_null_iter().collect()))
        .collect::<Result<_>>()?;
    let lineages = match taxonomy {
        Some(service) => Some(service.format_biom_taxonomy(table)?.0),
        None => None,
    };

    let mut observations = Vec::new();
    let mut data = Vec::new();
    for (row, id) in ids.into_no_null_iter().enumerate() {
        if id == UNCLASSIFIED_ID {
            continue;
        }
        let metadata = lineages.as_ref().map(|rows| ObservationMetadata {
            taxonomy: rows[row].clone(),
        });
        observations.push(Observation {
            id: id.to_string(),
            metadata,
        });
        data.push(counts.iter().map(|column| column[row]).collect());
    }

    let shape = [observations.len(), sample_names.len()];
    let document = Document {
        id: None,
        format: FORMAT,
        format_url: FORMAT_URL,
        table_type: TABLE_TYPE,
        generated_by: GENERATED_BY,
        date: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        rows: observations,
        columns: sample_names
            .into_iter()
            .map(|id| SampleColumn { id, metadata: () })
            .collect(),
        matrix_type: "dense",
        matrix_element_type: "int",
        shape,
        data,
    };

    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer(writer, &document)
        .with_context(|| format!("write biom table: {}", path.display()))
}
