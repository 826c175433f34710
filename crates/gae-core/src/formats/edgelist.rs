//! Plain edge-list format.
//!
//! ```text
//! # comment lines and blank lines are skipped
//! P04637  Q00987
//! P04637  P38398
//! ```
//!
//! Node identifiers are opaque labels; indices follow first appearance.

use crate::{Error, Graph, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Edge-list format handler.
pub struct EdgeList;

impl EdgeList {
    /// Read an undirected graph from an edge list.
    ///
    /// Every non-blank, non-comment line must hold exactly two labels.
    /// Self-loop lines are dropped; repeated edges in either orientation
    /// collapse to one.
    pub fn read<R: BufRead>(reader: R) -> Result<Graph> {
        let mut graph = Graph::new();
        let mut self_loops = 0usize;
        let mut duplicates = 0usize;

        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let (a, b) = match (fields.next(), fields.next(), fields.next()) {
                (Some(a), Some(b), None) => (a, b),
                _ => {
                    return Err(Error::Format {
                        line: lineno + 1,
                        message: format!("expected two node identifiers, got {line:?}"),
                    })
                }
            };

            if a == b {
                self_loops += 1;
                continue;
            }
            if !graph.add_edge(a, b) {
                duplicates += 1;
            }
        }

        if self_loops > 0 {
            warn!(self_loops, "dropped self-loop lines from edge list");
        }
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            duplicates,
            "parsed edge list"
        );

        Ok(graph)
    }

    /// Read an edge list from a file.
    pub fn read_file(path: impl AsRef<Path>) -> Result<Graph> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Write every edge as a tab-separated pair of labels.
    pub fn write<W: Write>(graph: &Graph, mut writer: W) -> Result<()> {
        for (i, j) in graph.edges() {
            let a = graph.label(i).unwrap_or_default();
            let b = graph.label(j).unwrap_or_default();
            writeln!(writer, "{a}\t{b}")?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Load an interaction graph from an edge-list file.
pub fn load(path: impl AsRef<Path>) -> Result<Graph> {
    EdgeList::read_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct FullDisk;

    impl io::Write for FullDisk {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn test_read_basic() {
        let input = "A B\nB C\n\n# comment\nC\tA\n";
        let g = EdgeList::read(input.as_bytes()).unwrap();

        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.index_of("A"), Some(0));
        assert_eq!(g.index_of("C"), Some(2));
    }

    #[test]
    fn test_read_dedup_and_self_loops() {
        let input = "A B\nB A\nA A\nA B\n";
        let g = EdgeList::read(input.as_bytes()).unwrap();

        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(!g.has_edge(0, 0));
    }

    #[test]
    fn test_read_rejects_single_token() {
        let err = EdgeList::read("A B\nlonely\n".as_bytes()).unwrap_err();
        match err {
            Error::Format { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_rejects_three_tokens() {
        let err = EdgeList::read("A B C\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Format { line: 1, .. }));
    }

    #[test]
    fn test_empty_input() {
        let g = EdgeList::read("".as_bytes()).unwrap();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_write_then_read_preserves_edges() {
        let g = EdgeList::read("x y\ny z\n".as_bytes()).unwrap();
        let mut buf = Vec::new();
        EdgeList::write(&g, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "x\ty\ny\tz\n");
    }

    #[test]
    fn test_write_reports_flush_failure() {
        let g = EdgeList::read("x y\n".as_bytes()).unwrap();
        let err = EdgeList::write(&g, io::BufWriter::new(FullDisk)).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
