//! Core type definitions for threat-model generation
//!
//! Node and edge records produced by the parser, the duplicate-dataflow
//! strategy and the findings reported by a report collaborator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single `key=value` entry from a node's attribute list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
    /// Whether the value was written as a quoted string
    pub quoted: bool,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>, quoted: bool) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            quoted,
        }
    }

    /// An attribute written without a value, e.g. `[bold]`
    pub fn flag(key: impl Into<String>) -> Self {
        Self::new(key, "", false)
    }
}

/// A declared graph node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: String,
    pub label: Option<String>,
    pub attributes: Vec<Attribute>,
}

impl NodeData {
    /// Create a node with a display label
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
            attributes: Vec::new(),
        }
    }

    /// Create a node without a display label
    pub fn unlabeled(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.attributes = attributes;
        self
    }

    /// The label shown for this node, falling back to the identifier
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// Look up an attribute value by key
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }
}

/// A directed edge between two node identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeData {
    pub from: String,
    pub to: String,
}

impl EdgeData {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// What to do when a dataflow repeats an existing source/target pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateStrategy {
    /// Skip the duplicate check and keep every dataflow
    #[default]
    Ignore,
    /// Replace the earlier dataflow in place
    Overwrite,
    /// Fail the model build
    Error,
}

impl DuplicateStrategy {
    /// Get all valid strategy names
    pub fn variants() -> &'static [&'static str] {
        &["ignore", "overwrite", "error"]
    }
}

impl FromStr for DuplicateStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(DuplicateStrategy::Ignore),
            "overwrite" => Ok(DuplicateStrategy::Overwrite),
            "error" => Ok(DuplicateStrategy::Error),
            _ => Err(format!("Unknown duplicate strategy: {}", s)),
        }
    }
}

impl fmt::Display for DuplicateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateStrategy::Ignore => write!(f, "ignore"),
            DuplicateStrategy::Overwrite => write!(f, "overwrite"),
            DuplicateStrategy::Error => write!(f, "error"),
        }
    }
}

/// A finding reported by a report collaborator
///
/// Ordered so findings can be held in a `BTreeSet` and exported
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub target: String,
    pub description: String,
    pub severity: String,
}

impl Finding {
    pub fn new(
        id: impl Into<String>,
        target: impl Into<String>,
        description: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            target: target.into(),
            description: description.into(),
            severity: severity.into(),
        }
    }
}
