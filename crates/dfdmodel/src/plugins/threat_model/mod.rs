//! Threat model plugin
//!
//! Classifies parsed graph nodes into actors and processes, derives
//! dataflows, and hands the resulting model to a report generator and the
//! JSON exporter.

mod classify;
mod export;
mod model;
mod report;

pub use classify::*;
pub use export::*;
pub use model::*;
pub use report::*;
