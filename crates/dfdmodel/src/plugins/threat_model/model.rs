//! Threat model assembled from a classified graph
//!
//! Holds the model metadata, the actor and process elements, the dataflows
//! between them and the trust boundaries supplied by configuration.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{Classification, Dataflow, Entity};
use crate::core::{DuplicateStrategy, ModelConfig, ModelError, Role};

/// A named trust-domain marker, passed through untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    pub name: String,
}

impl Boundary {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A threat model ready for reporting and export
#[derive(Debug, Clone, PartialEq)]
pub struct ThreatModel {
    name: String,
    description: String,
    assumptions: String,
    on_duplicates: DuplicateStrategy,
    actors: Vec<Entity>,
    processes: Vec<Entity>,
    dataflows: Vec<Dataflow>,
    boundaries: Vec<Boundary>,
}

impl ThreatModel {
    /// Create an empty model with default metadata
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: ModelConfig::DEFAULT_DESCRIPTION.to_string(),
            assumptions: ModelConfig::DEFAULT_ASSUMPTIONS.to_string(),
            on_duplicates: DuplicateStrategy::default(),
            actors: Vec::new(),
            processes: Vec::new(),
            dataflows: Vec::new(),
            boundaries: Vec::new(),
        }
    }

    /// Create an empty model carrying the metadata and boundaries of a config
    pub fn from_config(config: &ModelConfig) -> Self {
        let mut model = Self::new(&config.name)
            .with_description(&config.description)
            .with_assumptions(&config.assumptions)
            .with_duplicate_strategy(config.on_duplicates);
        for boundary in &config.boundaries {
            model.add_boundary(Boundary::new(boundary));
        }
        model
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_assumptions(mut self, assumptions: impl Into<String>) -> Self {
        self.assumptions = assumptions.into();
        self
    }

    pub fn with_duplicate_strategy(mut self, strategy: DuplicateStrategy) -> Self {
        self.on_duplicates = strategy;
        self
    }

    /// Add every classified entity and every derived dataflow
    pub fn populate(
        &mut self,
        classification: &Classification,
        dataflows: Vec<Dataflow>,
    ) -> Result<(), ModelError> {
        for entity in classification.entities() {
            self.add_element(entity.clone());
        }
        for flow in dataflows {
            self.add_dataflow(flow)?;
        }

        info!(
            actors = self.actors.len(),
            processes = self.processes.len(),
            dataflows = self.dataflows.len(),
            "Threat model populated"
        );
        Ok(())
    }

    /// Add an entity to the actor or process list according to its role
    pub fn add_element(&mut self, entity: Entity) {
        match entity.role {
            Role::Actor => self.actors.push(entity),
            Role::Process => self.processes.push(entity),
        }
    }

    /// Add a dataflow, applying the duplicate strategy
    ///
    /// A duplicate is a flow with the same source and target identifiers as
    /// one already in the model. Under [`DuplicateStrategy::Ignore`] no check
    /// is made and every flow is kept.
    pub fn add_dataflow(&mut self, flow: Dataflow) -> Result<(), ModelError> {
        if self.on_duplicates == DuplicateStrategy::Ignore {
            self.dataflows.push(flow);
            return Ok(());
        }

        let existing = self
            .dataflows
            .iter()
            .position(|known| known.endpoints() == flow.endpoints());

        match (existing, self.on_duplicates) {
            (None, _) | (Some(_), DuplicateStrategy::Ignore) => self.dataflows.push(flow),
            (Some(pos), DuplicateStrategy::Overwrite) => {
                debug!(name = %flow.name, "Overwriting duplicate dataflow");
                self.dataflows[pos] = flow;
            }
            (Some(_), DuplicateStrategy::Error) => {
                warn!(name = %flow.name, "Duplicate dataflow rejected");
                return Err(ModelError::duplicate_dataflow(
                    &flow.source.id,
                    &flow.target.id,
                ));
            }
        }
        Ok(())
    }

    pub fn add_boundary(&mut self, boundary: Boundary) {
        self.boundaries.push(boundary);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn assumptions(&self) -> &str {
        &self.assumptions
    }

    pub fn duplicate_strategy(&self) -> DuplicateStrategy {
        self.on_duplicates
    }

    pub fn actors(&self) -> &[Entity] {
        &self.actors
    }

    pub fn processes(&self) -> &[Entity] {
        &self.processes
    }

    pub fn dataflows(&self) -> &[Dataflow] {
        &self.dataflows
    }

    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }
}
