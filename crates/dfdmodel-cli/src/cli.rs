//! Command-line interface for the dfdmodel utility
//!
//! Provides a CLI to turn Graphviz data-flow diagrams into threat-model
//! reports and to inspect how a diagram is parsed and classified.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{debug, info};

use dfdmodel::core::logging::init_logging;
use dfdmodel::plugins::graphviz::{GraphDatabase, ParseOptions};
use dfdmodel::plugins::pipeline::{Pipeline, RunSummary, StepOutcome};
use dfdmodel::plugins::threat_model::Classification;
use dfdmodel::{parse_with_options, Database, DuplicateStrategy, KeywordClassifier, ModelConfig};

/// dfdmodel - Turn Graphviz data-flow diagrams into threat models
#[derive(Parser)]
#[command(name = "dfdmodel")]
#[command(about = "Turn Graphviz data-flow diagrams into threat-model reports")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error) [default: info]
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json) [default: compact]
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// Log level and format given on the command line, if any
    pub fn logging_args(&self) -> (Option<&'static str>, Option<&'static str>) {
        (
            self.log_level.map(|level| level.as_str()),
            self.log_format.map(|format| format.as_str()),
        )
    }
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a diagram into an HTML report and a JSON model
    Convert {
        /// Graphviz file describing the data flow
        #[arg(short, long)]
        input: PathBuf,

        /// JSON file to write the model to
        #[arg(short, long)]
        output: PathBuf,

        /// HTML template for the report
        #[arg(short, long)]
        template: PathBuf,

        /// HTML report file (defaults to the output path with .html)
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// What to do with repeated dataflows between the same nodes
        #[arg(long, value_enum, default_value_t = DuplicateChoice::Ignore)]
        on_duplicates: DuplicateChoice,

        /// Label keyword marking a node as an actor (repeatable)
        #[arg(long = "keyword", value_name = "KEYWORD")]
        keywords: Vec<String>,

        /// Trust boundary to include in the model (repeatable)
        #[arg(long = "boundary", value_name = "NAME")]
        boundaries: Vec<String>,

        /// Model name
        #[arg(long)]
        name: Option<String>,

        /// Model description
        #[arg(long)]
        description: Option<String>,

        /// Model assumptions
        #[arg(long)]
        assumptions: Option<String>,

        /// Keep node declarations that have no label
        #[arg(long)]
        keep_unlabeled: bool,
    },

    /// Show how a diagram is parsed and classified
    Inspect {
        /// Graphviz file to inspect (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,

        /// Label keyword marking a node as an actor (repeatable)
        #[arg(long = "keyword", value_name = "KEYWORD")]
        keywords: Vec<String>,

        /// Keep node declarations that have no label
        #[arg(long)]
        keep_unlabeled: bool,
    },
}

/// Duplicate dataflow handling
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum DuplicateChoice {
    /// Keep every dataflow, repeats included
    #[default]
    Ignore,
    /// Replace the earlier dataflow with the later one
    Overwrite,
    /// Fail the conversion
    Error,
}

impl From<DuplicateChoice> for DuplicateStrategy {
    fn from(value: DuplicateChoice) -> Self {
        match value {
            DuplicateChoice::Ignore => DuplicateStrategy::Ignore,
            DuplicateChoice::Overwrite => DuplicateStrategy::Overwrite,
            DuplicateChoice::Error => DuplicateStrategy::Error,
        }
    }
}

/// Main CLI application
#[derive(Debug, Default)]
pub struct DfdmodelApp;

impl DfdmodelApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Flags win; init_logging falls back to the environment, then defaults
        let (log_level, log_format) = cli.logging_args();
        if let Err(e) = init_logging(log_level, log_format) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("dfdmodel v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Convert {
                input,
                output,
                template,
                report,
                on_duplicates,
                keywords,
                boundaries,
                name,
                description,
                assumptions,
                keep_unlabeled,
            } => {
                let mut config = ModelConfig::new(input, output, template)
                    .with_duplicate_strategy(on_duplicates.into())
                    .with_boundaries(boundaries);
                if let Some(report) = report {
                    config = config.with_report(report);
                }
                if let Some(name) = name {
                    config = config.with_name(name);
                }
                if let Some(description) = description {
                    config = config.with_description(description);
                }
                if let Some(assumptions) = assumptions {
                    config = config.with_assumptions(assumptions);
                }
                let options = ParseOptions::default().keep_unlabeled(keep_unlabeled);
                self.convert_command(config, options, &keywords, cli.verbose)
            }
            Commands::Inspect {
                input,
                json,
                keywords,
                keep_unlabeled,
            } => {
                let options = ParseOptions::default().keep_unlabeled(keep_unlabeled);
                self.inspect_command(input, json, options, &keywords, cli.verbose)
            }
        }
    }

    /// Handle the convert command
    fn convert_command(
        &self,
        config: ModelConfig,
        options: ParseOptions,
        keywords: &[String],
        verbose: bool,
    ) -> Result<()> {
        if verbose {
            eprintln!("Converting {}", config.input.display());
        }

        debug!(keywords = ?keywords, "Actor keywords");

        let summary = Pipeline::new(config)
            .with_parse_options(options)
            .with_classifier(classifier_from(keywords))
            .run()?;

        print!("{}", format_summary(&summary));

        if !summary.report.is_written() || !summary.export.is_written() {
            return Err(anyhow!("Conversion finished with errors"));
        }
        Ok(())
    }

    /// Handle the inspect command
    fn inspect_command(
        &self,
        input: Option<PathBuf>,
        json: bool,
        options: ParseOptions,
        keywords: &[String],
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let database = parse_with_options(&content, options)?;
        let classification = Classification::classify(&database, &classifier_from(keywords));
        info!(
            nodes = classification.len(),
            dropped_edges = database.dangling_edges().count(),
            "Inspected diagram"
        );

        if json {
            let value = inspection_json(&database, &classification);
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            print!("{}", format_inspection(&database, &classification));
        }
        Ok(())
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }
}

fn classifier_from(keywords: &[String]) -> KeywordClassifier {
    if keywords.is_empty() {
        KeywordClassifier::new()
    } else {
        KeywordClassifier::with_keywords(keywords)
    }
}

fn format_summary(summary: &RunSummary) -> String {
    let outcome = |label: &str, step: &StepOutcome| format!("{}: {}\n", label, step);

    format!(
        "Actors: {}, processes: {}, dataflows: {}, findings: {}\n{}{}",
        summary.actors,
        summary.processes,
        summary.dataflows,
        summary.findings,
        outcome("Report", &summary.report),
        outcome("JSON export", &summary.export),
    )
}

fn format_inspection(database: &GraphDatabase, classification: &Classification) -> String {
    let mut out = format!("Nodes ({}):\n", classification.len());
    for entity in classification.entities() {
        out.push_str(&format!(
            "  {:<8} {:<16} {}\n",
            entity.role.to_string(),
            entity.id,
            entity.name
        ));
    }

    let flows = classification.dataflows(database);
    out.push_str(&format!("Dataflows ({}):\n", flows.len()));
    for flow in &flows {
        out.push_str(&format!("  {}\n", flow.name));
    }

    let dropped: Vec<_> = database.dangling_edges().collect();
    if !dropped.is_empty() {
        out.push_str(&format!("Dropped edges ({}):\n", dropped.len()));
        for edge in dropped {
            out.push_str(&format!("  {} -> {}\n", edge.from, edge.to));
        }
    }
    out
}

fn inspection_json(database: &GraphDatabase, classification: &Classification) -> serde_json::Value {
    let nodes: Vec<_> = database
        .nodes()
        .map(|node| {
            json!({
                "id": node.id,
                "label": node.display_label(),
                "role": classification.role_of(&node.id),
                "attributes": node.attributes,
            })
        })
        .collect();

    let edges: Vec<_> = database
        .edges()
        .map(|edge| json!({ "from": edge.from, "to": edge.to }))
        .collect();

    let dataflows: Vec<_> = classification
        .dataflows(database)
        .into_iter()
        .map(|flow| {
            json!({
                "name": flow.name,
                "source": flow.source.id,
                "target": flow.target.id,
            })
        })
        .collect();

    json!({
        "nodes": nodes,
        "edges": edges,
        "dataflows": dataflows,
        "dropped_edges": database.dangling_edges().count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    const DIAGRAM: &str = "A [label=\"User\"];\nB [label=\"Web Application\"];\nA -> B;\nB -> C;";

    #[test]
    fn test_cli_parsing_convert_command() {
        let args = vec![
            "dfdmodel",
            "convert",
            "--input",
            "flow.gv",
            "--output",
            "model.json",
            "--template",
            "dfd.html",
            "--on-duplicates",
            "error",
            "--keyword",
            "admin",
            "--keyword",
            "user",
            "--boundary",
            "Internet",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Convert {
                input,
                output,
                template,
                report,
                on_duplicates,
                keywords,
                boundaries,
                keep_unlabeled,
                ..
            } => {
                assert_eq!(input.to_string_lossy(), "flow.gv");
                assert_eq!(output.to_string_lossy(), "model.json");
                assert_eq!(template.to_string_lossy(), "dfd.html");
                assert!(report.is_none());
                assert_eq!(on_duplicates, DuplicateChoice::Error);
                assert_eq!(keywords, vec!["admin", "user"]);
                assert_eq!(boundaries, vec!["Internet"]);
                assert!(!keep_unlabeled);
            }
            _ => panic!("Expected Convert command"),
        }
    }

    #[test]
    fn test_cli_convert_requires_paths() {
        let args = vec!["dfdmodel", "convert", "--input", "flow.gv"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_parsing_inspect_command() {
        let args = vec!["dfdmodel", "inspect", "-i", "flow.gv", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Inspect { input, json, .. } => {
                assert_eq!(input.unwrap().to_string_lossy(), "flow.gv");
                assert!(json);
            }
            _ => panic!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = vec![
            "dfdmodel",
            "--verbose",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "inspect",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        assert_eq!(cli.logging_args(), (Some("debug"), Some("json")));
    }

    #[test]
    fn test_logging_args_defer_to_environment_when_unset() {
        let cli = Cli::try_parse_from(["dfdmodel", "inspect"]).unwrap();
        assert_eq!(cli.logging_args(), (None, None));

        let cli = Cli::try_parse_from(["dfdmodel", "--log-level", "warn", "inspect"]).unwrap();
        assert_eq!(cli.logging_args(), (Some("warn"), None));
    }

    #[test]
    fn test_duplicate_choice_conversion() {
        assert_eq!(
            DuplicateStrategy::from(DuplicateChoice::default()),
            DuplicateStrategy::Ignore
        );
        assert_eq!(
            DuplicateStrategy::from(DuplicateChoice::Overwrite),
            DuplicateStrategy::Overwrite
        );
    }

    #[test]
    fn test_classifier_from_keywords() {
        assert_eq!(classifier_from(&[]), KeywordClassifier::new());
        let custom = classifier_from(&["Admin".to_string()]);
        assert_eq!(custom.keywords(), &["admin"]);
    }

    #[test]
    fn test_read_input_from_file() {
        let app = DfdmodelApp::new();
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("flow.gv");
        fs::write(&file_path, DIAGRAM).unwrap();

        let content = app.read_input(Some(file_path)).unwrap();
        assert_eq!(content, DIAGRAM);
    }

    #[test]
    fn test_read_input_missing_file() {
        let app = DfdmodelApp::new();
        let err = app
            .read_input(Some(PathBuf::from("/nonexistent/flow.gv")))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read input file"));
    }

    #[test]
    fn test_format_inspection() {
        let database = parse_with_options(DIAGRAM, ParseOptions::default()).unwrap();
        let classification = Classification::classify(&database, &KeywordClassifier::new());
        let text = format_inspection(&database, &classification);

        assert!(text.contains("Nodes (2):"));
        assert!(text.contains("actor"));
        assert!(text.contains("Web Application"));
        assert!(text.contains("Dataflows (1):"));
        assert!(text.contains("User to Web Application"));
        assert!(text.contains("Dropped edges (1):"));
        assert!(text.contains("B -> C"));
    }

    #[test]
    fn test_inspection_json() {
        let database = parse_with_options(DIAGRAM, ParseOptions::default()).unwrap();
        let classification = Classification::classify(&database, &KeywordClassifier::new());
        let value = inspection_json(&database, &classification);

        assert_eq!(value["nodes"][0]["role"], "actor");
        assert_eq!(value["nodes"][1]["role"], "process");
        assert_eq!(value["edges"].as_array().unwrap().len(), 2);
        assert_eq!(value["dataflows"][0]["name"], "User to Web Application");
        assert_eq!(value["dropped_edges"], 1);
    }

    #[test]
    fn test_convert_command_writes_outputs() {
        let app = DfdmodelApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("flow.gv");
        let output = dir.path().join("model.json");
        let template = dir.path().join("dfd.html");
        fs::write(&input, DIAGRAM).unwrap();
        fs::write(&template, "<h1>{{name}}</h1>{{dataflows}}").unwrap();

        let config = ModelConfig::new(&input, &output, &template).with_name("Shop");
        app.convert_command(config, ParseOptions::default(), &[], false)
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["name"], "Shop");
        assert_eq!(json["dataflows"][0]["name"], "User to Web Application");

        let html = fs::read_to_string(dir.path().join("model.html")).unwrap();
        assert!(html.contains("<h1>Shop</h1>"));
    }

    #[test]
    fn test_convert_keeps_repeated_dataflows() {
        let app = DfdmodelApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("flow.gv");
        let output = dir.path().join("model.json");
        let template = dir.path().join("dfd.html");
        let diagram = "A [label=\"User\"];\nB [label=\"Web Application\"];\nA -> B;\nA -> B;";
        fs::write(&input, diagram).unwrap();
        fs::write(&template, "{{dataflows}}").unwrap();

        let database = parse_with_options(diagram, ParseOptions::default()).unwrap();
        let classification = Classification::classify(&database, &KeywordClassifier::new());
        let inspected = inspection_json(&database, &classification);
        assert_eq!(inspected["dataflows"].as_array().unwrap().len(), 2);

        let config = ModelConfig::new(&input, &output, &template);
        app.convert_command(config, ParseOptions::default(), &[], false)
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["dataflows"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_convert_command_missing_template() {
        let app = DfdmodelApp::new();
        let dir = tempdir().unwrap();
        let config = ModelConfig::new(
            dir.path().join("flow.gv"),
            dir.path().join("model.json"),
            dir.path().join("missing.html"),
        );

        let err = app
            .convert_command(config, ParseOptions::default(), &[], false)
            .unwrap_err();
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_format_summary() {
        let summary = RunSummary {
            actors: 1,
            processes: 2,
            dataflows: 3,
            findings: 0,
            report: StepOutcome::Written(PathBuf::from("model.html")),
            export: StepOutcome::Failed("disk full".to_string()),
        };
        let text = format_summary(&summary);
        assert!(text.starts_with("Actors: 1, processes: 2, dataflows: 3, findings: 0\n"));
        assert!(text.contains("Report: written to model.html"));
        assert!(text.contains("JSON export: failed: disk full"));
    }
}
