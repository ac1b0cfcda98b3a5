//! A weighted directed multigraph over string vertex labels.
//!
//! Vertices keep their insertion order, and so do the edges leaving each vertex. Parallel edges
//! between the same pair of vertices are allowed, which is how several symbols, or the same symbol
//! under non-determinism, label transitions between two states.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An outgoing edge: its destination vertex and the symbol it is labelled with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub destination: String,
    pub weight: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    adjacency: IndexMap<String, Vec<Edge>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `label` with no outgoing edges.
    ///
    /// Re-adding an existing vertex clears its edge list, so all vertices should be added before
    /// any edge that leaves them.
    pub fn add_vertex(&mut self, label: &str) {
        self.adjacency.insert(label.to_string(), Vec::new());
    }

    /// Appends an edge to `source`'s edge list, creating `source` if needed.
    ///
    /// `destination` is not checked against the registered vertices. A dangling edge only shows
    /// up later, when a traversal tries to look it up.
    pub fn add_edge(&mut self, source: &str, destination: &str, weight: &str) {
        self.adjacency
            .entry(source.to_string())
            .or_default()
            .push(Edge {
                destination: destination.to_string(),
                weight: weight.to_string(),
            });
    }

    /// Drops every edge from `source` to `destination`, whatever its weight.
    pub fn remove_edge(&mut self, source: &str, destination: &str) {
        if let Some(edges) = self.adjacency.get_mut(source) {
            edges.retain(|edge| edge.destination != destination);
        }
    }

    /// Removes `vertex` and its outgoing edges.
    ///
    /// Edges from other vertices into `vertex` are left in place.
    pub fn remove_vertex(&mut self, vertex: &str) {
        let destinations: Vec<String> = match self.adjacency.get(vertex) {
            Some(edges) => edges.iter().map(|e| e.destination.clone()).collect(),
            None => return,
        };

        for destination in destinations {
            self.remove_edge(vertex, &destination);
        }

        self.adjacency.shift_remove(vertex);
    }

    /// Returns the outgoing edges of `vertex` in insertion order, or `None` for an unknown vertex.
    pub fn edges(&self, vertex: &str) -> Option<&[Edge]> {
        self.adjacency.get(vertex).map(Vec::as_slice)
    }

    pub fn contains(&self, vertex: &str) -> bool {
        self.adjacency.contains_key(vertex)
    }

    /// Iterates over the vertex labels in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &str> + '_ {
        self.adjacency.keys().map(String::as_str)
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }
}

impl fmt::Display for Graph {
    /// One line per vertex: `s0 -> (a, s1) (b, s0) `.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (vertex, edges) in &self.adjacency {
            write!(f, "{vertex} -> ")?;
            for edge in edges {
                write!(f, "({}, {}) ", edge.weight, edge.destination)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn destinations(graph: &Graph, vertex: &str) -> Vec<String> {
        graph
            .edges(vertex)
            .unwrap()
            .iter()
            .map(|e| format!("{}:{}", e.weight, e.destination))
            .collect()
    }

    #[test]
    fn test_add_edge_keeps_insertion_order() {
        let mut graph = Graph::new();
        graph.add_vertex("s0");
        graph.add_vertex("s1");
        graph.add_edge("s0", "s1", "b");
        graph.add_edge("s0", "s1", "a");
        graph.add_edge("s0", "s0", "a");

        assert_eq!(destinations(&graph, "s0"), vec!["b:s1", "a:s1", "a:s0"]);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_add_edge_creates_missing_source() {
        let mut graph = Graph::new();
        graph.add_edge("s0", "s1", "a");

        assert!(graph.contains("s0"));
        // The destination is not registered implicitly
        assert!(!graph.contains("s1"));
        assert_eq!(graph.edges("s1"), None);
    }

    #[test]
    fn test_add_vertex_resets_edges() {
        let mut graph = Graph::new();
        graph.add_edge("s0", "s1", "a");
        graph.add_vertex("s0");

        assert_eq!(graph.edges("s0"), Some(&[][..]));
    }

    #[test]
    fn test_remove_edge_ignores_weight() {
        let mut graph = Graph::new();
        graph.add_edge("s0", "s1", "a");
        graph.add_edge("s0", "s2", "a");
        graph.add_edge("s0", "s1", "b");

        graph.remove_edge("s0", "s1");
        assert_eq!(destinations(&graph, "s0"), vec!["a:s2"]);

        // Unknown source is a no-op
        graph.remove_edge("s9", "s1");
        assert_eq!(graph.vertex_count(), 1);
    }

    #[test]
    fn test_first_match_after_edge_is_re_added() {
        let mut graph = Graph::new();
        graph.add_edge("s0", "s1", "a");
        graph.add_edge("s0", "s2", "a");
        graph.add_edge("s0", "s1", "b");

        graph.remove_edge("s0", "s1");
        graph.add_edge("s0", "s1", "a");

        // The re-added edge goes to the back, behind the surviving s2 edge
        assert_eq!(destinations(&graph, "s0"), vec!["a:s2", "a:s1"]);

        let first = graph
            .edges("s0")
            .unwrap()
            .iter()
            .find(|e| e.weight == "a")
            .map(|e| e.destination.as_str());
        assert_eq!(first, Some("s2"));
    }

    #[test]
    fn test_remove_vertex_leaves_incoming_edges() {
        let mut graph = Graph::new();
        for v in ["s0", "s1"] {
            graph.add_vertex(v);
        }
        graph.add_edge("s0", "s1", "a");
        graph.add_edge("s1", "s0", "b");

        graph.remove_vertex("s1");

        assert!(!graph.contains("s1"));
        assert_eq!(destinations(&graph, "s0"), vec!["a:s1"]);
    }

    #[test]
    fn test_remove_then_add_vertex_has_no_edges() {
        let mut graph = Graph::new();
        graph.add_edge("s0", "s0", "a");
        graph.add_edge("s0", "s1", "b");

        graph.remove_vertex("s0");
        graph.add_vertex("s0");

        assert_eq!(graph.edges("s0"), Some(&[][..]));
    }

    #[test]
    fn test_display() {
        let mut graph = Graph::new();
        graph.add_vertex("s0");
        graph.add_vertex("s1");
        graph.add_edge("s0", "s1", "a");

        assert_eq!(graph.to_string(), "s0 -> (a, s1) \ns1 -> \n");
    }
}
