//! Attribute list parser using chumsky
//!
//! Parses the bracketed attribute list of a node declaration,
//! e.g. `[label="Web App", shape=box; style=filled]`, into [`Attribute`]s.
//! Quoted values end at the first closing quote; escapes are not supported.

use anyhow::Result;
use chumsky::prelude::*;

use crate::core::Attribute;

/// Chumsky-based attribute list parser
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeListParser;

impl AttributeListParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a complete `[...]` attribute list
    pub fn parse_list(&self, input: &str) -> Result<Vec<Attribute>> {
        let parser = Self::list_parser().then_ignore(end());

        parser
            .parse(input.trim())
            .into_result()
            .map_err(|errors| anyhow::anyhow!("Parse errors: {:?}", errors))
    }

    fn list_parser<'src>() -> impl Parser<'src, &'src str, Vec<Attribute>> + Clone {
        Self::attribute_parser()
            .then_ignore(Self::separator())
            .repeated()
            .collect::<Vec<_>>()
            .delimited_by(just('[').then(Self::separator()), just(']'))
    }

    /// Attributes may be separated by commas, semicolons or plain whitespace
    fn separator<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
        one_of(" \t,;").repeated().ignored()
    }

    fn inline_whitespace<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
        one_of(" \t").repeated().ignored()
    }

    fn attribute_parser<'src>() -> impl Parser<'src, &'src str, Attribute> + Clone {
        let value = just('=')
            .padded_by(Self::inline_whitespace())
            .ignore_then(
                Self::quoted_parser()
                    .map(|value| (value, true))
                    .or(Self::bare_parser().map(|value| (value, false))),
            );

        Self::key_parser()
            .then(value.or_not())
            .map(|(key, value)| match value {
                Some((value, quoted)) => Attribute::new(key, value, quoted),
                None => Attribute::flag(key),
            })
    }

    fn key_parser<'src>() -> impl Parser<'src, &'src str, String> + Clone {
        none_of("=,;[]\" \t")
            .repeated()
            .at_least(1)
            .collect::<String>()
    }

    fn quoted_parser<'src>() -> impl Parser<'src, &'src str, String> + Clone {
        none_of('"')
            .repeated()
            .collect::<String>()
            .delimited_by(just('"'), just('"'))
    }

    fn bare_parser<'src>() -> impl Parser<'src, &'src str, String> + Clone {
        none_of(",;[]\" \t").repeated().at_least(1).collect::<String>()
    }
}

/// The trimmed text of the first non-empty quoted `label` attribute
pub fn label_from_attributes(attributes: &[Attribute]) -> Option<String> {
    attributes
        .iter()
        .find(|attr| attr.key == "label" && attr.quoted && !attr.value.is_empty())
        .map(|attr| attr.value.trim().to_string())
}

/// Plain text search for `label="..."` anywhere in a line
///
/// Used when the attribute list cannot be parsed. An empty `label=""` is
/// skipped and the search continues after it.
pub fn scan_label(line: &str) -> Option<String> {
    const NEEDLE: &str = "label=\"";

    let mut rest = line;
    while let Some(start) = rest.find(NEEDLE) {
        let after = &rest[start + NEEDLE.len()..];
        let end = after.find('"')?;
        if end > 0 {
            return Some(after[..end].trim().to_string());
        }
        rest = &after[end + 1..];
    }
    None
}
