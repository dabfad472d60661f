//! JSON export of a threat model
//!
//! The exported document is list-based throughout: findings, held as an
//! ordered set in memory, are written as a sequence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::ThreatModel;
use crate::core::{Finding, ModelError};

/// A record carrying only a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRecord {
    pub name: String,
}

/// Exported form of a dataflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataflowRecord {
    pub name: String,
    pub source: String,
    pub target: String,
}

/// The JSON document written for a threat model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDocument {
    pub name: String,
    pub description: String,
    pub assumptions: String,
    pub actors: Vec<NamedRecord>,
    pub processes: Vec<NamedRecord>,
    pub dataflows: Vec<DataflowRecord>,
    pub boundaries: Vec<NamedRecord>,
    pub findings: Vec<Finding>,
}

impl ModelDocument {
    /// Build the document for a model and the findings reported for it
    pub fn from_model(model: &ThreatModel, findings: &BTreeSet<Finding>) -> Self {
        let named = |name: &str| NamedRecord {
            name: name.to_string(),
        };

        Self {
            name: model.name().to_string(),
            description: model.description().to_string(),
            assumptions: model.assumptions().to_string(),
            actors: model.actors().iter().map(|e| named(&e.name)).collect(),
            processes: model.processes().iter().map(|e| named(&e.name)).collect(),
            dataflows: model
                .dataflows()
                .iter()
                .map(|flow| DataflowRecord {
                    name: flow.name.clone(),
                    source: flow.source.name.clone(),
                    target: flow.target.name.clone(),
                })
                .collect(),
            boundaries: model.boundaries().iter().map(|b| named(&b.name)).collect(),
            findings: findings.iter().cloned().collect(),
        }
    }

    /// Serialize with a four-space indent
    pub fn to_json(&self) -> Result<String, ModelError> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;

        String::from_utf8(buffer)
            .map_err(|e| ModelError::export_error(format!("Serialized JSON is not UTF-8: {}", e)))
    }

    pub fn from_json(input: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Write the document, replacing any existing file
    pub fn write_to(&self, path: &Path) -> Result<(), ModelError> {
        let json = self.to_json()?;
        debug!(path = %path.display(), bytes = json.len(), "Writing model document");

        fs::write(path, format!("{}\n", json)).map_err(|e| {
            ModelError::export_error(format!(
                "Failed to write output file '{}': {}",
                path.display(),
                e
            ))
        })?;

        info!(
            path = %path.display(),
            actors = self.actors.len(),
            processes = self.processes.len(),
            dataflows = self.dataflows.len(),
            "Model exported"
        );
        Ok(())
    }
}
