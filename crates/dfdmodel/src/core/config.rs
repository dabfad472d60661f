//! Run configuration
//!
//! All paths and model metadata for one run are collected in a
//! [`ModelConfig`] and validated once before any processing starts.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::{DuplicateStrategy, ModelError};

/// Configuration for one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Graph description to read
    pub input: PathBuf,
    /// JSON document to write
    pub output: PathBuf,
    /// HTML template handed to the report generator
    pub template: PathBuf,
    /// HTML report to write; defaults to `output` with an `.html` extension
    pub report: Option<PathBuf>,
    pub on_duplicates: DuplicateStrategy,
    pub name: String,
    pub description: String,
    pub assumptions: String,
    /// Trust boundaries passed through to the report and the JSON document
    pub boundaries: Vec<String>,
}

impl ModelConfig {
    pub const DEFAULT_NAME: &'static str = "Threat Model from GV";
    pub const DEFAULT_DESCRIPTION: &'static str =
        "Threat model generated from a Graphviz data-flow diagram";
    pub const DEFAULT_ASSUMPTIONS: &'static str =
        "This model assumes the data lives in a secure environment.";

    /// Create a configuration with default model metadata
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        template: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            template: template.into(),
            report: None,
            on_duplicates: DuplicateStrategy::default(),
            name: Self::DEFAULT_NAME.to_string(),
            description: Self::DEFAULT_DESCRIPTION.to_string(),
            assumptions: Self::DEFAULT_ASSUMPTIONS.to_string(),
            boundaries: Vec::new(),
        }
    }

    pub fn with_report(mut self, report: impl Into<PathBuf>) -> Self {
        self.report = Some(report.into());
        self
    }

    pub fn with_duplicate_strategy(mut self, strategy: DuplicateStrategy) -> Self {
        self.on_duplicates = strategy;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_assumptions(mut self, assumptions: impl Into<String>) -> Self {
        self.assumptions = assumptions.into();
        self
    }

    pub fn with_boundaries<I, S>(mut self, boundaries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.boundaries = boundaries.into_iter().map(Into::into).collect();
        self
    }

    /// Where the HTML report is written
    pub fn report_path(&self) -> PathBuf {
        self.report
            .clone()
            .unwrap_or_else(|| self.output.with_extension("html"))
    }

    /// Check the configuration before any work is done
    ///
    /// The template must exist as a file. Input readability is not checked
    /// here; an unreadable input surfaces as an IO error when it is read.
    pub fn validate(&self) -> Result<(), ModelError> {
        require_path("input", &self.input)?;
        require_path("output", &self.output)?;
        require_path("template", &self.template)?;

        if !self.template.is_file() {
            return Err(ModelError::config_error(format!(
                "Template not found at '{}'",
                self.template.display()
            )));
        }

        if self.output.is_dir() {
            return Err(ModelError::config_error(format!(
                "Output path '{}' is a directory",
                self.output.display()
            )));
        }

        if self.report_path() == self.output {
            return Err(ModelError::config_error(format!(
                "Report and output paths are both '{}'",
                self.output.display()
            )));
        }

        debug!(
            input = %self.input.display(),
            output = %self.output.display(),
            template = %self.template.display(),
            on_duplicates = %self.on_duplicates,
            "Configuration validated"
        );
        Ok(())
    }
}

fn require_path(name: &str, path: &Path) -> Result<(), ModelError> {
    if path.as_os_str().is_empty() {
        return Err(ModelError::config_error(format!("No {} path given", name)));
    }
    Ok(())
}
