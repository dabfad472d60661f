//! Core database trait for parsed graph storage
//!
//! The parser writes into a database; the classifier and model builder read
//! from it. Implementations decide how nodes are keyed and merged.

use anyhow::Result;

/// Core trait for graph databases
///
/// Nodes are unique by identifier. Edges are kept as an ordered sequence and
/// may repeat or reference identifiers that were never declared.
pub trait Database: Send + Sync {
    /// The node data type for this database
    type Node: Clone + Send + Sync;

    /// The edge data type for this database
    type Edge: Clone + Send + Sync;

    /// Add a node, merging with an existing node of the same identifier
    fn add_node(&mut self, node: Self::Node) -> Result<()>;

    /// Append an edge
    fn add_edge(&mut self, edge: Self::Edge) -> Result<()>;

    /// Get a node by ID
    fn get_node(&self, id: &str) -> Option<&Self::Node>;

    /// Iterate over all nodes in declaration order
    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;

    /// Iterate over all edges in declaration order
    fn edges(&self) -> impl Iterator<Item = &Self::Edge>;

    /// Clear all data from the database
    fn clear(&mut self);

    /// Get the number of nodes
    fn node_count(&self) -> usize;

    /// Get the number of edges
    fn edge_count(&self) -> usize;
}
