//! Role classification for graph nodes
//!
//! Every node is either an external [`Role::Actor`] or an internal
//! [`Role::Process`]. The rule mapping a label to a role is the
//! [`RolePredicate`] trait, so callers can swap in their own heuristics
//! without touching the parser.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Keywords that mark a node as an external actor by default
pub const DEFAULT_ACTOR_KEYWORDS: [&str; 2] = ["user", "client"];

/// The role a node plays in the data-flow diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// External, human-driven participant
    Actor,
    /// Internal system component
    Process,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Actor => write!(f, "actor"),
            Role::Process => write!(f, "process"),
        }
    }
}

/// Maps a node's display label to a role
///
/// Must be a pure function of the label. Any `Fn(&str) -> Role` closure
/// implements this trait.
pub trait RolePredicate: Send + Sync {
    fn classify(&self, label: &str) -> Role;
}

impl<F> RolePredicate for F
where
    F: Fn(&str) -> Role + Send + Sync,
{
    fn classify(&self, label: &str) -> Role {
        self(label)
    }
}

/// Case-insensitive keyword match on the label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordClassifier {
    keywords: Vec<String>,
}

impl KeywordClassifier {
    /// Classifier using [`DEFAULT_ACTOR_KEYWORDS`]
    pub fn new() -> Self {
        Self::with_keywords(DEFAULT_ACTOR_KEYWORDS)
    }

    /// Classifier using a custom keyword list
    ///
    /// Empty keywords are discarded since they would match every label.
    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|kw| kw.as_ref().trim().to_lowercase())
            .filter(|kw| !kw.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RolePredicate for KeywordClassifier {
    fn classify(&self, label: &str) -> Role {
        let label = label.to_lowercase();
        if self.keywords.iter().any(|kw| label.contains(kw.as_str())) {
            Role::Actor
        } else {
            Role::Process
        }
    }
}
