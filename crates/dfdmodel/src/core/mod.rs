//! Core abstractions for threat-model generation
//!
//! Traits shared by every diagram plugin (database, parser, role predicate)
//! together with the configuration, error and record types they exchange.

mod classifier;
mod config;
mod database;
mod error;
pub mod logging;
mod parser;
mod types;

pub use classifier::*;
pub use config::*;
pub use database::*;
pub use error::*;
pub use logging::*;
pub use parser::*;
pub use types::*;
