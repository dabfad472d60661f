//! dfdmodel - Turn Graphviz data-flow diagrams into threat models
//!
//! Parses a simplified DOT description, classifies each node as an external
//! actor or an internal process, orients edges into named dataflows and
//! exports the result as a JSON document and an HTML report.
//!
//! # Quick Start
//!
//! ```rust
//! use dfdmodel::build_model;
//!
//! let input = "A [label=\"User\"];\nB [label=\"Web Application\"];\nA -> B;";
//! let model = build_model(input).unwrap();
//! assert_eq!(model.dataflows()[0].name, "User to Web Application");
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use dfdmodel::prelude::*;
//!
//! let input = "A [label=\"Admin\"];\nB [label=\"Billing\"];\nA -> B;";
//!
//! // Parse into a database
//! let parser = GraphvizParser::new();
//! let mut database = GraphDatabase::new();
//! parser.parse(input, &mut database).unwrap();
//! assert_eq!(database.node_count(), 2);
//!
//! // Classify with a custom keyword list
//! let classifier = KeywordClassifier::with_keywords(["admin"]);
//! let classification = Classification::classify(&database, &classifier);
//! assert_eq!(classification.role_of("A"), Some(Role::Actor));
//!
//! // Orient edges into dataflows
//! let flows = classification.dataflows(&database);
//! assert_eq!(flows[0].name, "Admin to Billing");
//! ```

pub mod core;
pub mod plugins;

pub use crate::core::*;

use crate::plugins::graphviz::{GraphDatabase, GraphvizParser, ParseOptions};
use crate::plugins::threat_model::{Classification, ThreatModel};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Database, DuplicateStrategy, KeywordClassifier, ModelConfig, ModelError, Parser, Role,
        RolePredicate,
    };
    pub use crate::plugins::graphviz::{GraphDatabase, GraphvizParser, ParseOptions};
    pub use crate::plugins::pipeline::{Pipeline, RunSummary, StepOutcome};
    pub use crate::plugins::threat_model::{
        Classification, Dataflow, Entity, ModelDocument, ReportGenerator, TemplateReport,
        ThreatModel,
    };
}

/// Parse Graphviz text into a database with default options
///
/// # Example
/// ```rust
/// use dfdmodel::parse;
/// use dfdmodel::prelude::Database;
///
/// let db = parse("A [label=\"User\"];\nA -> B;").unwrap();
/// assert_eq!(db.node_count(), 1);
/// assert_eq!(db.edge_count(), 1);
/// ```
pub fn parse(input: &str) -> anyhow::Result<GraphDatabase> {
    parse_with_options(input, ParseOptions::default())
}

/// Parse Graphviz text into a database with explicit options
pub fn parse_with_options(input: &str, options: ParseOptions) -> anyhow::Result<GraphDatabase> {
    let parser = GraphvizParser::with_options(options);
    let mut database = GraphDatabase::new();
    parser.parse(input, &mut database)?;
    Ok(database)
}

/// Classify a parsed graph with the default keyword classifier
pub fn classify(database: &GraphDatabase) -> Classification {
    Classification::classify(database, &KeywordClassifier::new())
}

/// Parse, classify and assemble a threat model with default settings
///
/// Every dataflow is kept, repeats included, and the model carries default
/// metadata.
pub fn build_model(input: &str) -> anyhow::Result<ThreatModel> {
    let database = parse(input)?;
    let classification = classify(&database);

    let mut model = ThreatModel::new(ModelConfig::DEFAULT_NAME);
    model.populate(&classification, classification.dataflows(&database))?;
    Ok(model)
}
