use std::fs;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use polars::prelude::{Column, DataFrame, IpcReader, NamedFrom, ParquetReader, SerReader, Series};
use taxtab_output::{
    StandardProfileFormat, TidyObservationTableFormat, WideObservationTableFormat,
    write_standard_profile, write_tidy_table, write_wide_table,
};
use taxtab_taxonomy::Taxonomy;
use tempfile::TempDir;

fn wide_table() -> DataFrame {
    let columns: Vec<Column> = vec![
        Series::new("taxonomy_id".into(), vec![1i64, 2, 3]).into(),
        Series::new("s1".into(), vec![23i64, 42, 0]).into(),
        Series::new("s2".into(), vec![0i64, 33, 55]).into(),
    ];
    DataFrame::new(columns).unwrap()
}

fn profile() -> DataFrame {
    let columns: Vec<Column> = vec![
        Series::new("taxonomy_id".into(), vec![562i64, 0]).into(),
        Series::new("count".into(), vec![100i64, 12]).into(),
    ];
    DataFrame::new(columns).unwrap()
}

/// Pruned Escherichia coli lineage for the BIOM metadata test.
fn taxonomy_fixture(directory: &Path) -> Taxonomy {
    let nodes: &[(i64, i64, &str)] = &[
        (1, 1, "no rank"),
        (2, 1, "superkingdom"),
        (1224, 2, "phylum"),
        (1236, 1224, "class"),
        (91347, 1236, "order"),
        (543, 91347, "family"),
        (561, 543, "genus"),
        (562, 561, "species"),
    ];
    let lines: String = nodes
        .iter()
        .map(|(id, parent, rank)| format!("{id}\t|\t{parent}\t|\t{rank}\t|\tXX\t|\n"))
        .collect();
    fs::write(directory.join("nodes.dmp"), lines).unwrap();
    let names: &[(i64, &str)] = &[
        (1, "root"),
        (2, "Bacteria"),
        (1224, "Proteobacteria"),
        (1236, "Gammaproteobacteria"),
        (91347, "Enterobacterales"),
        (543, "Enterobacteriaceae"),
        (561, "Escherichia"),
        (562, "Escherichia coli"),
    ];
    let lines: String = names
        .iter()
        .map(|(id, name)| format!("{id}\t|\t{name}\t|\t\t|\tscientific name\t|\n"))
        .collect();
    fs::write(directory.join("names.dmp"), lines).unwrap();
    Taxonomy::from_taxdump(directory).unwrap()
}

#[test]
fn tsv_output_renders_tab_separated_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("table.tsv");
    write_wide_table(&wide_table(), &path, WideObservationTableFormat::Tsv, None).unwrap();
    let rendered = fs::read_to_string(&path).unwrap();
    insta::assert_snapshot!(rendered, @r"
    taxonomy_id	s1	s2
    1	23	0
    2	42	33
    3	0	55
    ");
}

#[test]
fn csv_output_uses_commas() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("profile.csv");
    write_standard_profile(&profile(), &path, StandardProfileFormat::Csv).unwrap();
    let rendered = fs::read_to_string(&path).unwrap();
    insta::assert_snapshot!(rendered, @r"
    taxonomy_id,count
    562,100
    0,12
    ");
}

#[test]
fn workbook_output_round_trips_through_calamine() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("table.xlsx");
    write_wide_table(&wide_table(), &path, WideObservationTableFormat::Xlsx, None).unwrap();

    let mut workbook = open_workbook_auto(&path).unwrap();
    let sheet = workbook.sheet_names()[0].clone();
    let range = workbook.worksheet_range(&sheet).unwrap();
    let rows: Vec<Vec<Data>> = range.rows().map(<[Data]>::to_vec).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0][0], Data::String("taxonomy_id".to_string()));
    assert_eq!(rows[0][2], Data::String("s2".to_string()));
    assert_eq!(rows[1][1], Data::Float(23.0));
    assert_eq!(rows[3][2], Data::Float(55.0));
}

#[test]
fn arrow_and_parquet_round_trip() {
    let dir = TempDir::new().unwrap();
    let table = wide_table();

    let arrow = dir.path().join("table.arrow");
    write_wide_table(&table, &arrow, WideObservationTableFormat::Arrow, None).unwrap();
    let read = IpcReader::new(fs::File::open(&arrow).unwrap()).finish().unwrap();
    assert!(read.equals(&table));

    let parquet = dir.path().join("table.parquet");
    write_wide_table(&table, &parquet, WideObservationTableFormat::Parquet, None).unwrap();
    let read = ParquetReader::new(fs::File::open(&parquet).unwrap()).finish().unwrap();
    assert!(read.equals(&table));
}

#[test]
fn tidy_tables_write_their_sample_column() {
    let dir = TempDir::new().unwrap();
    let columns: Vec<Column> = vec![
        Series::new("taxonomy_id".into(), vec![1i64, 1]).into(),
        Series::new("count".into(), vec![23i64, 19]).into(),
        Series::new("sample".into(), vec!["s1", "s2"]).into(),
    ];
    let table = DataFrame::new(columns).unwrap();
    let path = dir.path().join("tidy.tsv");
    write_tidy_table(&table, &path, TidyObservationTableFormat::Tsv).unwrap();
    let rendered = fs::read_to_string(&path).unwrap();
    insta::assert_snapshot!(rendered, @r"
    taxonomy_id	count	sample
    1	23	s1
    1	19	s2
    ");
}

#[test]
fn biom_documents_drop_the_unclassified_bucket() {
    let dir = TempDir::new().unwrap();
    let columns: Vec<Column> = vec![
        Series::new("taxonomy_id".into(), vec![0i64, 562, 2]).into(),
        Series::new("s1".into(), vec![5i64, 100, 10]).into(),
        Series::new("s2".into(), vec![7i64, 80, 0]).into(),
    ];
    let table = DataFrame::new(columns).unwrap();
    let path = dir.path().join("table.biom");
    write_wide_table(&table, &path, WideObservationTableFormat::Biom, None).unwrap();

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(document["format"], "Biological Observation Matrix 1.0.0");
    assert_eq!(document["type"], "OTU table");
    assert_eq!(document["matrix_type"], "dense");
    assert_eq!(document["matrix_element_type"], "int");
    assert_eq!(document["shape"], serde_json::json!([2, 2]));
    assert_eq!(document["rows"][0]["id"], "562");
    assert_eq!(document["rows"][1]["id"], "2");
    assert!(document["rows"][0]["metadata"].is_null());
    assert_eq!(document["columns"][0]["id"], "s1");
    assert_eq!(document["columns"][1]["id"], "s2");
    assert_eq!(document["data"], serde_json::json!([[100, 80], [10, 0]]));
    assert!(document["date"].is_string());
}

#[test]
fn biom_documents_attach_taxonomy_metadata() {
    let dir = TempDir::new().unwrap();
    let taxonomy = taxonomy_fixture(dir.path());
    let columns: Vec<Column> = vec![
        Series::new("taxonomy_id".into(), vec![562i64, 2, 42]).into(),
        Series::new("s1".into(), vec![100i64, 10, 1]).into(),
    ];
    let table = DataFrame::new(columns).unwrap();
    let path = dir.path().join("table.biom");
    write_wide_table(&table, &path, WideObservationTableFormat::Biom, Some(&taxonomy)).unwrap();

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let lineage = document["rows"][0]["metadata"]["taxonomy"].as_array().unwrap();
    assert_eq!(lineage.len(), 7);
    assert_eq!(lineage[0], "Bacteria");
    assert_eq!(lineage[6], "Escherichia coli");
    // Shorter and unknown lineages are padded to the same axis.
    let lineage = document["rows"][1]["metadata"]["taxonomy"].as_array().unwrap();
    assert_eq!(lineage.len(), 7);
    assert_eq!(lineage[1], "");
    let lineage = document["rows"][2]["metadata"]["taxonomy"].as_array().unwrap();
    assert!(lineage.iter().all(|name| name == ""));
}

#[test]
fn outputs_create_missing_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deep").join("profile.tsv");
    write_standard_profile(&profile(), &path, StandardProfileFormat::Tsv).unwrap();
    assert!(path.is_file());
}
