//! Line-level parsing of NCBI taxonomy dump files. Records are fields
//! separated by `\t|\t` with a trailing `\t|`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;

use crate::error::{Result, TaxonomyError};

pub const NODES_FILE: &str = "nodes.dmp";
pub const NAMES_FILE: &str = "names.dmp";
pub const MERGED_FILE: &str = "merged.dmp";

/// Name class selecting the canonical name among the entries of `names.dmp`.
const SCIENTIFIC_NAME: &str = "scientific name";

fn split_record(line: &str) -> Vec<&str> {
    line.trim_end()
        .trim_end_matches('|')
        .split("\t|\t")
        .map(str::trim)
        .collect()
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|source| TaxonomyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

fn parse_id(field: &str, path: &Path, line: usize) -> Result<i64> {
    field.parse().map_err(|_| TaxonomyError::Malformed {
        path: path.to_path_buf(),
        line,
        reason: format!("cannot parse taxonomy identifier '{field}'"),
    })
}

/// Read `nodes.dmp` into parent and rank maps keyed by taxon identifier.
pub fn read_nodes(path: &Path) -> Result<(AHashMap<i64, i64>, AHashMap<i64, String>)> {
    let mut parents = AHashMap::new();
    let mut ranks = AHashMap::new();
    for (index, line) in open(path)?.lines().enumerate() {
        let line = line.map_err(|source| TaxonomyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_record(&line);
        if fields.len() < 3 {
            return Err(TaxonomyError::Malformed {
                path: path.to_path_buf(),
                line: index + 1,
                reason: format!("expected at least 3 fields, found {}", fields.len()),
            });
        }
        let id = parse_id(fields[0], path, index + 1)?;
        let parent = parse_id(fields[1], path, index + 1)?;
        parents.insert(id, parent);
        ranks.insert(id, fields[2].to_string());
    }
    Ok((parents, ranks))
}

/// Read `names.dmp`, keeping only scientific names.
pub fn read_names(path: &Path) -> Result<AHashMap<i64, String>> {
    let mut names = AHashMap::new();
    for (index, line) in open(path)?.lines().enumerate() {
        let line = line.map_err(|source| TaxonomyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_record(&line);
        if fields.len() < 4 {
            return Err(TaxonomyError::Malformed {
                path: path.to_path_buf(),
                line: index + 1,
                reason: format!("expected at least 4 fields, found {}", fields.len()),
            });
        }
        if fields[3] != SCIENTIFIC_NAME {
            continue;
        }
        let id = parse_id(fields[0], path, index + 1)?;
        names.insert(id, fields[1].to_string());
    }
    Ok(names)
}

/// Read `merged.dmp` into an old-to-new identifier map.
pub fn read_merged(path: &Path) -> Result<AHashMap<i64, i64>> {
    let mut merged = AHashMap::new();
    for (index, line) in open(path)?.lines().enumerate() {
        let line = line.map_err(|source| TaxonomyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_record(&line);
        if fields.len() < 2 {
            return Err(TaxonomyError::Malformed {
                path: path.to_path_buf(),
                line: index + 1,
                reason: format!("expected at least 2 fields, found {}", fields.len()),
            });
        }
        let old = parse_id(fields[0], path, index + 1)?;
        let new = parse_id(fields[1], path, index + 1)?;
        merged.insert(old, new);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_trailing_delimiter() {
        let fields = split_record("562\t|\tEscherichia coli\t|\t\t|\tscientific name\t|");
        assert_eq!(fields, ["562", "Escherichia coli", "", "scientific name"]);
    }

    #[test]
    fn splits_node_record() {
        let fields = split_record(
            "562\t|\t561\t|\tspecies\t|\tEC\t|\t0\t|\t1\t|\t11\t|\t1\t|\t0\t|\t1\t|\t1\t|\t0\t|\t\t|",
        );
        assert_eq!(fields[0], "562");
        assert_eq!(fields[1], "561");
        assert_eq!(fields[2], "species");
    }
}
