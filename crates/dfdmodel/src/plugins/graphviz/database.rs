//! Graph database implementation
//!
//! Stores the nodes and edges read from a Graphviz description.
//! Maintains insertion order for deterministic downstream output.

use anyhow::Result;
use std::collections::HashMap;
use tracing::trace;

use crate::core::{Database, EdgeData, NodeData};

/// Graph database implementation
///
/// Nodes are keyed by identifier and iterate in first-declaration order.
/// Edges are kept exactly as declared, duplicates and dangling references
/// included.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GraphDatabase {
    /// Nodes indexed by ID
    nodes: HashMap<String, NodeData>,
    /// Node IDs in insertion order (for deterministic iteration)
    node_order: Vec<String>,
    /// Edges in insertion order
    edges: Vec<EdgeData>,
}

impl GraphDatabase {
    /// Create a new empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a node exists
    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Display label for a declared node
    pub fn label_of(&self, id: &str) -> Option<&str> {
        self.nodes.get(id).map(NodeData::display_label)
    }

    /// Node IDs in declaration order
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.node_order.iter().map(String::as_str)
    }

    /// Edges whose endpoints are not both declared nodes
    pub fn dangling_edges(&self) -> impl Iterator<Item = &EdgeData> {
        self.edges
            .iter()
            .filter(|edge| !self.has_node(&edge.from) || !self.has_node(&edge.to))
    }
}

impl Database for GraphDatabase {
    type Node = NodeData;
    type Edge = EdgeData;

    /// Redeclaring a node keeps its position; a new label replaces the old
    /// one, and an unlabeled redeclaration leaves the label alone.
    fn add_node(&mut self, node: NodeData) -> Result<()> {
        match self.nodes.get_mut(&node.id) {
            Some(existing) => {
                trace!(id = %node.id, "Merging redeclared node");
                if node.label.is_some() {
                    existing.label = node.label;
                }
                if !node.attributes.is_empty() {
                    existing.attributes = node.attributes;
                }
            }
            None => {
                trace!(id = %node.id, label = ?node.label, "Adding node");
                self.node_order.push(node.id.clone());
                self.nodes.insert(node.id.clone(), node);
            }
        }
        Ok(())
    }

    fn add_edge(&mut self, edge: EdgeData) -> Result<()> {
        trace!(from = %edge.from, to = %edge.to, "Adding edge");
        self.edges.push(edge);
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    fn nodes(&self) -> impl Iterator<Item = &NodeData> {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    fn edges(&self) -> impl Iterator<Item = &EdgeData> {
        self.edges.iter()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.node_order.clear();
        self.edges.clear();
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Attribute;

    #[test]
    fn test_nodes_iterate_in_declaration_order() {
        let mut db = GraphDatabase::new();
        db.add_node(NodeData::new("c", "C")).unwrap();
        db.add_node(NodeData::new("a", "A")).unwrap();
        db.add_node(NodeData::new("b", "B")).unwrap();

        let ids: Vec<_> = db.node_ids().collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        let labels: Vec<_> = db.nodes().map(NodeData::display_label).collect();
        assert_eq!(labels, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_redeclaration_last_label_wins() {
        let mut db = GraphDatabase::new();
        db.add_node(NodeData::new("a", "First")).unwrap();
        db.add_node(NodeData::new("b", "Other")).unwrap();
        db.add_node(NodeData::new("a", "Second")).unwrap();

        assert_eq!(db.node_count(), 2);
        assert_eq!(db.label_of("a"), Some("Second"));
        assert_eq!(db.node_ids().next(), Some("a"));
    }

    #[test]
    fn test_unlabeled_redeclaration_keeps_label() {
        let mut db = GraphDatabase::new();
        db.add_node(NodeData::new("a", "Kept")).unwrap();
        db.add_node(
            NodeData::unlabeled("a").with_attributes(vec![Attribute::new("shape", "box", false)]),
        )
        .unwrap();

        let node = db.get_node("a").unwrap();
        assert_eq!(node.label.as_deref(), Some("Kept"));
        assert_eq!(node.attribute("shape"), Some("box"));
    }

    #[test]
    fn test_edges_keep_duplicates_and_dangling() {
        let mut db = GraphDatabase::new();
        db.add_node(NodeData::new("a", "A")).unwrap();
        db.add_edge(EdgeData::new("a", "b")).unwrap();
        db.add_edge(EdgeData::new("a", "b")).unwrap();

        assert_eq!(db.edge_count(), 2);
        assert_eq!(db.dangling_edges().count(), 2);
    }

    #[test]
    fn test_clear() {
        let mut db = GraphDatabase::new();
        db.add_node(NodeData::new("a", "A")).unwrap();
        db.add_edge(EdgeData::new("a", "a")).unwrap();
        db.clear();

        assert_eq!(db.node_count(), 0);
        assert_eq!(db.edge_count(), 0);
        assert_eq!(db.nodes().count(), 0);
    }
}
