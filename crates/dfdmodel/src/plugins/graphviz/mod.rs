//! Graphviz diagram plugin
//!
//! Parses the line-oriented subset of DOT used for data-flow diagrams:
//! `id [label="..."];` declarations and `a -> b;` edges.

mod attributes;
mod database;
mod parser;

pub use attributes::{label_from_attributes, scan_label, AttributeListParser};
pub use database::*;
pub use parser::*;
