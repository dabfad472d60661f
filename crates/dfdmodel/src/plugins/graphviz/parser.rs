//! Graphviz parser implementation
//!
//! Reads a simplified subset of the DOT language one line at a time.
//! A line containing `->` is an edge; otherwise a line containing both
//! `[` and `]` is a node declaration; anything else is skipped. There is no
//! bracket-aware tokenizer, so the edge check always takes precedence.
//!
//! Edge lines accept more than the bare `a -> b;` form: a trailing attribute
//! list such as `a -> b [color=red];` is cut from the target, so the edge
//! still names node `b` instead of the literal `b [color=red]`.

use anyhow::Result;
use tracing::{debug, span, trace, Level};

use super::attributes::{label_from_attributes, scan_label, AttributeListParser};
use super::GraphDatabase;
use crate::core::{Database, EdgeData, NodeData, Parser};

const EDGE_OPERATOR: &str = "->";

/// DOT statements that set default attributes rather than declare a node
const DEFAULT_ATTRIBUTE_STATEMENTS: [&str; 3] = ["graph", "node", "edge"];

/// Options controlling how declarations are recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Record declarations without a `label="..."` attribute.
    ///
    /// Off by default: such nodes are left out of the node table and any
    /// edge touching them produces no dataflow.
    pub keep_unlabeled: bool,
}

impl ParseOptions {
    pub fn keep_unlabeled(mut self, keep: bool) -> Self {
        self.keep_unlabeled = keep;
        self
    }
}

/// What a single trimmed line declares
#[derive(Debug, Clone, PartialEq, Eq)]
enum Statement<'a> {
    Edge { from: &'a str, to: &'a str },
    Node { id: &'a str, attributes: &'a str },
    Ignored,
}

/// Graphviz parser implementation
#[derive(Debug, Clone, Default)]
pub struct GraphvizParser {
    options: ParseOptions,
    attributes: AttributeListParser,
}

impl GraphvizParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            options,
            attributes: AttributeListParser::new(),
        }
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    fn apply_declaration(
        &self,
        line: &str,
        id: &str,
        attributes: &str,
        database: &mut GraphDatabase,
    ) -> Result<()> {
        if id.is_empty() {
            trace!(line, "Skipping declaration without identifier");
            return Ok(());
        }
        if DEFAULT_ATTRIBUTE_STATEMENTS
            .iter()
            .any(|keyword| id.eq_ignore_ascii_case(keyword))
        {
            trace!(id, "Skipping default attribute statement");
            return Ok(());
        }

        let (label, attributes) = match self.attributes.parse_list(attributes) {
            Ok(attributes) => (label_from_attributes(&attributes), attributes),
            Err(err) => {
                debug!(id, error = %err, "Malformed attribute list, scanning for label");
                (scan_label(line), Vec::new())
            }
        };

        let node = match label {
            Some(label) => NodeData::new(id, label),
            None if self.options.keep_unlabeled => NodeData::unlabeled(id),
            None => {
                debug!(id, "Skipping declaration without label");
                return Ok(());
            }
        };
        database.add_node(node.with_attributes(attributes))
    }
}

impl Parser<GraphDatabase> for GraphvizParser {
    fn parse(&self, input: &str, database: &mut GraphDatabase) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_graphviz", input_len = input.len());
        let _enter = parse_span.enter();

        let mut ignored = 0usize;

        for (index, raw) in input.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            match classify_line(line) {
                Statement::Edge { from, to } => {
                    trace!(line = index + 1, from, to, "Edge statement");
                    database.add_edge(EdgeData::new(from, to))?;
                }
                Statement::Node { id, attributes } => {
                    trace!(line = index + 1, id, "Node statement");
                    self.apply_declaration(line, id, attributes, database)?;
                }
                Statement::Ignored => {
                    trace!(line = index + 1, text = line, "Ignoring line");
                    ignored += 1;
                }
            }
        }

        debug!(
            node_count = database.node_count(),
            edge_count = database.edge_count(),
            ignored,
            "Parsing completed"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "graphviz"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        input.contains(EDGE_OPERATOR)
            || input.contains("digraph")
            || (input.contains('[') && input.contains(']'))
    }
}

fn classify_line(line: &str) -> Statement<'_> {
    if let Some((from, to)) = line.split_once(EDGE_OPERATOR) {
        return Statement::Edge {
            from: clean_endpoint(from),
            to: clean_endpoint(strip_edge_attributes(to)),
        };
    }

    if let (Some(open), Some(close)) = (line.find('['), line.rfind(']')) {
        let attributes = if open < close {
            &line[open..=close]
        } else {
            ""
        };
        return Statement::Node {
            id: line[..open].trim(),
            attributes,
        };
    }

    Statement::Ignored
}

/// Drop a trailing `[...]` attribute list from an edge target
fn strip_edge_attributes(target: &str) -> &str {
    match target.find('[') {
        Some(pos) => &target[..pos],
        None => target,
    }
}

/// Trim whitespace and statement terminators from an edge endpoint
fn clean_endpoint(endpoint: &str) -> &str {
    endpoint.trim().trim_matches(';').trim()
}
