//! Core parser trait for diagram text
//!
//! A parser reads diagram text into a database. Reading from disk is a
//! provided method so every parser surfaces filesystem failures the same way.

use anyhow::Result;
use std::path::Path;
use tracing::debug;

use super::{Database, ModelError};

/// Core trait for diagram parsers
///
/// # Example
/// ```
/// use dfdmodel::core::{Database, Parser};
/// use dfdmodel::plugins::graphviz::{GraphDatabase, GraphvizParser};
///
/// let parser = GraphvizParser::new();
/// let mut db = GraphDatabase::new();
/// parser.parse("A [label=\"User\"];\nA -> B;", &mut db).unwrap();
/// assert_eq!(db.node_count(), 1);
/// assert_eq!(db.edge_count(), 1);
/// ```
pub trait Parser<D: Database>: Send + Sync {
    /// Parse diagram text into the provided database
    fn parse(&self, input: &str, database: &mut D) -> Result<()>;

    /// Read a file and parse its whole content
    ///
    /// An unreadable file fails with [`ModelError::IoError`] and leaves the
    /// database untouched.
    fn parse_file(&self, path: &Path, database: &mut D) -> Result<()> {
        let input = std::fs::read_to_string(path).map_err(ModelError::from)?;
        debug!(path = %path.display(), bytes = input.len(), "Read diagram file");
        self.parse(&input, database)
    }

    /// Get the name of this parser
    fn name(&self) -> &'static str;

    /// Get the version of this parser
    fn version(&self) -> &'static str;

    /// Check if the input looks like something this parser understands
    fn can_parse(&self, input: &str) -> bool;
}
