//! Merging of several interaction tables into a single edge list.
//!
//! Source tables are whitespace-delimited with a header row and may carry
//! any number of columns; only the two interactor columns are kept. Rows
//! are deduplicated as ordered pairs, keeping the first occurrence.

use crate::{Error, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Names of the two interactor columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineColumns {
    pub first: String,
    pub second: String,
}

impl Default for CombineColumns {
    fn default() -> Self {
        Self {
            first: "UniProtName_A".to_string(),
            second: "UniProtName_B".to_string(),
        }
    }
}

/// Read the interactor pairs of one headered table.
pub fn read_interactions<R: BufRead>(
    reader: R,
    columns: &CombineColumns,
    source: &Path,
) -> Result<Vec<(String, String)>> {
    let mut lines = reader.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => return Ok(Vec::new()),
        }
    };

    let names: Vec<&str> = header.split_whitespace().collect();
    let position = |column: &str| {
        names
            .iter()
            .position(|&n| n == column)
            .ok_or_else(|| Error::MissingColumn {
                path: source.to_path_buf(),
                column: column.to_string(),
            })
    };
    let a_col = position(&columns.first)?;
    let b_col = position(&columns.second)?;
    let needed = a_col.max(b_col) + 1;

    let mut pairs = Vec::new();
    for (lineno, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < needed {
            return Err(Error::Format {
                line: lineno + 1,
                message: format!(
                    "{}: expected at least {needed} columns, got {}",
                    source.display(),
                    fields.len()
                ),
            });
        }
        pairs.push((fields[a_col].to_string(), fields[b_col].to_string()));
    }

    Ok(pairs)
}

/// Concatenate the interactor pairs of every table, dropping repeated rows.
pub fn combine_networks(
    paths: &[PathBuf],
    columns: &CombineColumns,
) -> Result<Vec<(String, String)>> {
    let mut seen = HashSet::new();
    let mut combined = Vec::new();

    for path in paths {
        let file = File::open(path)?;
        let pairs = read_interactions(BufReader::new(file), columns, path)?;
        let before = combined.len();
        for pair in pairs {
            if seen.insert(pair.clone()) {
                combined.push(pair);
            }
        }
        info!(
            source = %path.display(),
            added = combined.len() - before,
            "merged interaction table"
        );
    }

    Ok(combined)
}

/// Write pairs as tab-separated rows, optionally preceded by a header.
pub fn write_pairs<W: Write>(
    pairs: &[(String, String)],
    mut writer: W,
    header: Option<&CombineColumns>,
) -> Result<()> {
    if let Some(columns) = header {
        writeln!(writer, "{}\t{}", columns.first, columns.second)?;
    }
    for (a, b) in pairs {
        writeln!(writer, "{a}\t{b}")?;
    }
    writer.flush()?;
    Ok(())
}
