//! Node classification and dataflow derivation
//!
//! Turns a parsed [`GraphDatabase`] into role-tagged entities and the
//! dataflows between them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, span, Level};

use crate::core::{Database, Role, RolePredicate};
use crate::plugins::graphviz::GraphDatabase;

/// A classified node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }
}

/// A named, directed flow between two classified entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataflow {
    pub name: String,
    pub source: Entity,
    pub target: Entity,
}

impl Dataflow {
    /// Create a dataflow named `"<source> to <target>"`
    pub fn between(source: Entity, target: Entity) -> Self {
        let name = format!("{} to {}", source.name, target.name);
        Self {
            name,
            source,
            target,
        }
    }

    /// The (source id, target id) pair used for duplicate detection
    pub fn endpoints(&self) -> (&str, &str) {
        (&self.source.id, &self.target.id)
    }
}

/// Role assignment for every node of a graph
///
/// Entities are held in node declaration order; each node appears exactly
/// once, as either an actor or a process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    entities: Vec<Entity>,
    index: HashMap<String, usize>,
}

impl Classification {
    /// Classify every node of the database by its display label
    pub fn classify(database: &GraphDatabase, predicate: &dyn RolePredicate) -> Self {
        let classify_span = span!(
            Level::DEBUG,
            "classify_nodes",
            node_count = database.node_count()
        );
        let _enter = classify_span.enter();

        let mut classification = Self::default();
        for node in database.nodes() {
            let label = node.display_label();
            let role = predicate.classify(label);
            classification
                .index
                .insert(node.id.clone(), classification.entities.len());
            classification
                .entities
                .push(Entity::new(&node.id, label, role));
        }

        debug!(
            actors = classification.actors().count(),
            processes = classification.processes().count(),
            "Classification completed"
        );
        classification
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&pos| &self.entities[pos])
    }

    pub fn role_of(&self, id: &str) -> Option<Role> {
        self.get(id).map(|entity| entity.role)
    }

    /// All entities in declaration order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn actors(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(|entity| entity.role == Role::Actor)
    }

    pub fn processes(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(|entity| entity.role == Role::Process)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Orient every edge into a dataflow
    ///
    /// Edges referencing an identifier missing from the classification are
    /// dropped without error. Any role pairing is allowed.
    pub fn dataflows(&self, database: &GraphDatabase) -> Vec<Dataflow> {
        let mut flows = Vec::new();
        let mut dropped = 0usize;

        for edge in database.edges() {
            match (self.get(&edge.from), self.get(&edge.to)) {
                (Some(source), Some(target)) => {
                    flows.push(Dataflow::between(source.clone(), target.clone()));
                }
                _ => {
                    debug!(from = %edge.from, to = %edge.to, "Dropping edge with undeclared endpoint");
                    dropped += 1;
                }
            }
        }

        debug!(dataflows = flows.len(), dropped, "Dataflows derived");
        flows
    }
}
