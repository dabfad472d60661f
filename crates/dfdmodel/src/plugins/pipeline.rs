//! Pipeline for coordinating a full conversion run
//!
//! The pipeline manages the flow of data through all plugins:
//! Config → Parser → Database → Classifier → ThreatModel → Report / Export
//!
//! Report generation and JSON export are independent: a failure in one is
//! logged and the other still runs.

use anyhow::Result;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, span, Level};

use crate::core::{Database, KeywordClassifier, ModelConfig, ModelError, Parser, RolePredicate};
use crate::plugins::graphviz::{GraphDatabase, GraphvizParser, ParseOptions};
use crate::plugins::threat_model::{
    Classification, ModelDocument, ReportGenerator, TemplateReport, ThreatModel,
};

/// Result of one independent output step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step wrote this file
    Written(PathBuf),
    /// The step failed with this message
    Failed(String),
}

impl StepOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, StepOutcome::Written(_))
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Written(path) => write!(f, "written to {}", path.display()),
            StepOutcome::Failed(message) => write!(f, "failed: {}", message),
        }
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub actors: usize,
    pub processes: usize,
    pub dataflows: usize,
    pub findings: usize,
    pub report: StepOutcome,
    pub export: StepOutcome,
}

/// Pipeline that runs a whole conversion for one configuration
pub struct Pipeline {
    config: ModelConfig,
    parser: GraphvizParser,
    classifier: Box<dyn RolePredicate>,
    reporter: Box<dyn ReportGenerator>,
}

impl Pipeline {
    /// Create a pipeline with the keyword classifier and template report
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            parser: GraphvizParser::new(),
            classifier: Box::new(KeywordClassifier::new()),
            reporter: Box::new(TemplateReport::new()),
        }
    }

    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parser = GraphvizParser::with_options(options);
        self
    }

    pub fn with_classifier(mut self, classifier: impl RolePredicate + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn with_reporter(mut self, reporter: impl ReportGenerator + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Parse, classify and assemble a model from graph text
    pub fn build_model(&self, input: &str) -> Result<ThreatModel> {
        let mut database = GraphDatabase::new();
        self.parser.parse(input, &mut database)?;
        self.model_from_database(&database)
    }

    fn model_from_database(&self, database: &GraphDatabase) -> Result<ThreatModel> {
        let classification = Classification::classify(database, self.classifier.as_ref());
        let dataflows = classification.dataflows(database);

        let mut model = ThreatModel::from_config(&self.config);
        model.populate(&classification, dataflows)?;
        Ok(model)
    }

    /// Run the complete pipeline
    ///
    /// Configuration errors, an unreadable input and model build errors are
    /// returned. Report and export failures are logged and recorded in the
    /// summary instead.
    pub fn run(&self) -> Result<RunSummary> {
        let run_span = span!(Level::INFO, "run_pipeline", input = %self.config.input.display());
        let _enter = run_span.enter();

        info!("Starting conversion pipeline");

        // Step 1: Validate configuration before any work
        self.config.validate()?;

        // Step 2: Parse the input file
        let parse_span = span!(Level::DEBUG, "pipeline_parse");
        let parse_enter = parse_span.enter();
        let mut database = GraphDatabase::new();
        self.parser.parse_file(&self.config.input, &mut database)?;
        debug!(
            node_count = database.node_count(),
            edge_count = database.edge_count(),
            "Parsing completed"
        );
        drop(parse_enter);

        // Step 3: Classify and build the model
        let model = self.model_from_database(&database)?;

        // Step 4: Report, isolated from export
        let report = self.write_report(&model);

        // Step 5: Findings and export, isolated from report
        let findings = self.reporter.findings(&model);
        let export = self.write_export(&model, &ModelDocument::from_model(&model, &findings));

        info!(report = %report, export = %export, "Conversion pipeline finished");

        Ok(RunSummary {
            actors: model.actors().len(),
            processes: model.processes().len(),
            dataflows: model.dataflows().len(),
            findings: findings.len(),
            report,
            export,
        })
    }

    fn write_report(&self, model: &ThreatModel) -> StepOutcome {
        let path = self.config.report_path();
        info!(generator = self.reporter.name(), "Generating report");

        let result = self
            .reporter
            .render(model, &self.config.template)
            .and_then(|html| write_file(&path, &html));

        match result {
            Ok(()) => {
                info!(path = %path.display(), "Report generated");
                StepOutcome::Written(path)
            }
            Err(e) => {
                error!(error = %e, "Report generation failed");
                StepOutcome::Failed(e.to_string())
            }
        }
    }

    fn write_export(&self, model: &ThreatModel, document: &ModelDocument) -> StepOutcome {
        let path = &self.config.output;
        info!(path = %path.display(), model = model.name(), "Exporting model");

        match document.write_to(path) {
            Ok(()) => StepOutcome::Written(path.clone()),
            Err(e) => {
                error!(error = %e, "Model export failed");
                StepOutcome::Failed(e.to_string())
            }
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| {
        ModelError::report_error(format!(
            "Failed to write report '{}': {}",
            path.display(),
            e
        ))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DuplicateStrategy, Role};

    fn config() -> ModelConfig {
        ModelConfig::new("in.gv", "out.json", "dfd.html")
    }

    #[test]
    fn test_build_model_example() {
        let pipeline = Pipeline::new(config());
        let model = pipeline
            .build_model("A [label=\"User\"];\nB [label=\"Web Application\"];\nA -> B;")
            .unwrap();

        assert_eq!(model.actors().len(), 1);
        assert_eq!(model.processes().len(), 1);
        assert_eq!(model.dataflows()[0].name, "User to Web Application");
    }

    #[test]
    fn test_build_model_only_edges() {
        let model = Pipeline::new(config()).build_model("X -> Y;").unwrap();
        assert!(model.actors().is_empty());
        assert!(model.processes().is_empty());
        assert!(model.dataflows().is_empty());
    }

    #[test]
    fn test_build_model_duplicate_error() {
        let pipeline =
            Pipeline::new(config().with_duplicate_strategy(DuplicateStrategy::Error));
        let err = pipeline
            .build_model("A [label=\"a\"];\nB [label=\"b\"];\nA -> B;\nA -> B;")
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModelError>(),
            Some(ModelError::DuplicateDataflow { .. })
        ));
    }

    #[test]
    fn test_custom_classifier_and_options() {
        let pipeline = Pipeline::new(config())
            .with_parse_options(ParseOptions::default().keep_unlabeled(true))
            .with_classifier(|label: &str| {
                if label == "ext" {
                    Role::Actor
                } else {
                    Role::Process
                }
            });
        let model = pipeline.build_model("ext [shape=box];\nsvc [shape=box];\next -> svc;").unwrap();

        assert_eq!(model.actors()[0].name, "ext");
        assert_eq!(model.processes()[0].name, "svc");
        assert_eq!(model.dataflows()[0].name, "ext to svc");
    }

    #[test]
    fn test_step_outcome_display() {
        let written = StepOutcome::Written(PathBuf::from("out.json"));
        assert!(written.is_written());
        assert_eq!(written.to_string(), "written to out.json");
        assert_eq!(
            StepOutcome::Failed("boom".into()).to_string(),
            "failed: boom"
        );
    }
}
