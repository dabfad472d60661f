//! Report generation for threat models
//!
//! A [`ReportGenerator`] turns a model and an HTML template into a report
//! and answers the findings query. Threat enumeration itself is left to the
//! generator; [`TemplateReport`] only fills in the template and reports no
//! findings.

use anyhow::Result;
use htmlize::escape_text;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, span, Level};

use super::ThreatModel;
use crate::core::{Finding, ModelError};

/// Collaborator that renders reports and produces findings
pub trait ReportGenerator: Send + Sync {
    /// Render the HTML report for a model
    fn render(&self, model: &ThreatModel, template: &Path) -> Result<String>;

    /// The findings for a model
    fn findings(&self, model: &ThreatModel) -> BTreeSet<Finding>;

    /// Get the name of this generator
    fn name(&self) -> &'static str;
}

/// Placeholder substitution over an HTML template
///
/// Recognized placeholders: `{{name}}`, `{{description}}`,
/// `{{assumptions}}`, `{{actors}}`, `{{processes}}`, `{{dataflows}}`,
/// `{{boundaries}}` and `{{findings}}`. Unknown placeholders are left as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateReport;

impl TemplateReport {
    pub fn new() -> Self {
        Self
    }

    /// Fill a template string for a model
    pub fn fill(&self, template: &str, model: &ThreatModel) -> String {
        let findings = self.findings(model);

        let replacements = [
            ("{{name}}", escape_text(model.name()).into_owned()),
            ("{{description}}", escape_text(model.description()).into_owned()),
            ("{{assumptions}}", escape_text(model.assumptions()).into_owned()),
            (
                "{{actors}}",
                html_list(model.actors().iter().map(|e| e.name.as_str())),
            ),
            (
                "{{processes}}",
                html_list(model.processes().iter().map(|e| e.name.as_str())),
            ),
            (
                "{{dataflows}}",
                html_list(model.dataflows().iter().map(|f| f.name.as_str())),
            ),
            (
                "{{boundaries}}",
                html_list(model.boundaries().iter().map(|b| b.name.as_str())),
            ),
            (
                "{{findings}}",
                html_list(findings.iter().map(|f| f.description.as_str())),
            ),
        ];

        replacements
            .iter()
            .fold(template.to_string(), |html, (placeholder, value)| {
                html.replace(placeholder, value)
            })
    }
}

impl ReportGenerator for TemplateReport {
    fn render(&self, model: &ThreatModel, template: &Path) -> Result<String> {
        let render_span = span!(Level::DEBUG, "render_report", template = %template.display());
        let _enter = render_span.enter();

        let source = fs::read_to_string(template).map_err(|e| {
            ModelError::report_error(format!(
                "Failed to read template '{}': {}",
                template.display(),
                e
            ))
        })?;

        let html = self.fill(&source, model);
        debug!(bytes = html.len(), "Report rendered");
        Ok(html)
    }

    fn findings(&self, _model: &ThreatModel) -> BTreeSet<Finding> {
        BTreeSet::new()
    }

    fn name(&self) -> &'static str {
        "template"
    }
}

/// Render items as escaped `<li>` elements inside a `<ul>`
fn html_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let items: String = items
        .map(|item| format!("<li>{}</li>", escape_text(item)))
        .collect();
    format!("<ul>{}</ul>", items)
}
