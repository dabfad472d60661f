//! Plugin implementations
//!
//! `graphviz` reads diagram text, `threat_model` turns the parsed graph into
//! a threat model, and `pipeline` runs both for one configuration.

pub mod graphviz;
pub mod pipeline;
pub mod threat_model;

pub use graphviz::*;
pub use pipeline::*;
pub use threat_model::*;
