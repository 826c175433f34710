//! Graphviz DOT export of an interaction network, for visual inspection.

use crate::{Graph, Result};
use petgraph::dot::{Config, Dot};
use std::io::Write;

/// Write `graph` as an undirected DOT graph labelled with the node names.
///
/// Node ids in the output are the graph's node indices, so they line up
/// with the `i`/`j` columns of the test-edge artifact.
pub fn write_dot<W: Write>(graph: &Graph, mut writer: W) -> Result<()> {
    let labelled = graph.as_petgraph().map(|_, name| name.as_str(), |_, _| "");
    let dot = Dot::with_config(&labelled, &[Config::EdgeNoLabel]);
    write!(writer, "{dot}")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::EdgeList;

    #[test]
    fn test_dot_lists_labels_and_edges() {
        let g = EdgeList::read("P1 P2\nP2 P3\n".as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_dot(&g, &mut buf).unwrap();
        let dot = String::from_utf8(buf).unwrap();

        assert!(dot.starts_with("graph {"));
        assert!(dot.contains("label = \"P1\""));
        assert!(dot.contains("label = \"P3\""));
        assert_eq!(dot.lines().filter(|l| l.contains(" -- ")).count(), 2);
    }

    #[test]
    fn test_dot_empty_graph() {
        let mut buf = Vec::new();
        write_dot(&Graph::new(), &mut buf).unwrap();
        let dot = String::from_utf8(buf).unwrap();

        assert!(dot.starts_with("graph {"));
        assert!(!dot.contains(" -- "));
    }
}
