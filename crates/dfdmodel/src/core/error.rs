//! Core error types for threat-model generation
//!
//! This module defines the error types shared by the parser, the model
//! builder, the report step and the JSON export.

use thiserror::Error;

/// Core error types for threat-model generation
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Duplicate dataflow: {from} -> {to}")]
    DuplicateDataflow { from: String, to: String },

    #[error("Report error: {message}")]
    ReportError { message: String },

    #[error("Export error: {message}")]
    ExportError { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
}

impl ModelError {
    /// Create a new configuration error
    pub fn config_error(message: String) -> Self {
        Self::ConfigError { message }
    }

    /// Create a new duplicate dataflow error
    pub fn duplicate_dataflow(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::DuplicateDataflow {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a new report error
    pub fn report_error(message: String) -> Self {
        Self::ReportError { message }
    }

    /// Create a new export error
    pub fn export_error(message: String) -> Self {
        Self::ExportError { message }
    }
}
