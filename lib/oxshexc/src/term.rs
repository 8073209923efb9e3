//! Lexical encoding of identifiers and literals.
//!
//! IRIs are compacted against the registered prefixes, blank nodes are written as-is
//! and literal lexical forms are escaped.

use crate::model::{ObjectValue, ShapeLabel};
use oxrdf::vocab::{rdf, xsd};
use oxrdf::{BlankNode, Literal, NamedNode};
use rustc_hash::FxHashMap;
use std::cmp::Reverse;

/// Prefix declarations in effect, with a lookup structure for IRI compaction.
#[derive(Debug, Clone, Default)]
pub(crate) struct PrefixTable {
    /// Prefix name to namespace IRI.
    by_name: FxHashMap<String, String>,
    /// Namespace IRI to prefix name.
    by_iri: FxHashMap<String, String>,
    /// Namespace IRIs, longest first.
    namespaces: Vec<String>,
}

impl PrefixTable {
    /// Registers a prefix.
    ///
    /// Returns false if the exact same mapping is already in effect, in which case
    /// there is nothing to declare.
    pub fn register(&mut self, name: &str, iri: &str) -> bool {
        if self.by_iri.get(iri).is_some_and(|n| n == name)
            && self.by_name.get(name).is_some_and(|i| i == iri)
        {
            return false;
        }
        if let Some(old_iri) = self.by_name.insert(name.to_owned(), iri.to_owned()) {
            // The name is rebound: its old namespace must not be compacted with it anymore
            if self.by_iri.get(&old_iri).is_some_and(|n| n == name) {
                self.by_iri.remove(&old_iri);
                self.namespaces.retain(|ns| *ns != old_iri);
            }
        }
        if self.by_iri.insert(iri.to_owned(), name.to_owned()).is_none() {
            let position = self
                .namespaces
                .binary_search_by(|ns| {
                    (Reverse(ns.len()), ns.as_str()).cmp(&(Reverse(iri.len()), iri))
                })
                .unwrap_or_else(|p| p);
            self.namespaces.insert(position, iri.to_owned());
        }
        true
    }

    /// Returns the prefixed name for an already escaped IRI if there is one.
    fn compact(&self, iri: &str) -> Option<String> {
        if let Some((name, local)) = iri.split_once(':') {
            if self.by_name.contains_key(name) && !local.contains('/') {
                // Already a prefixed name
                return Some(iri.to_owned());
            }
        }
        self.namespaces.iter().find_map(|namespace| {
            let local = iri.strip_prefix(namespace.as_str())?;
            if !is_local_name(local) {
                return None;
            }
            let name = self.by_iri.get(namespace)?;
            Some(format!("{name}:{local}"))
        })
    }

    /// Writes an IRI, as a prefixed name if possible.
    pub fn write_iri(&self, iri: &str, out: &mut String) {
        let escaped = escape(iri);
        if let Some(prefixed) = self.compact(&escaped) {
            out.push_str(&prefixed);
        } else {
            out.push('<');
            out.push_str(&escaped);
            out.push('>');
        }
    }

    pub fn write_named_node(&self, node: &NamedNode, out: &mut String) {
        self.write_iri(node.as_str(), out);
    }

    /// Writes a predicate, `rdf:type` being abbreviated to `a`.
    pub fn write_predicate(&self, predicate: &NamedNode, out: &mut String) {
        if predicate.as_ref() == rdf::TYPE {
            out.push('a');
        } else {
            self.write_named_node(predicate, out);
        }
    }

    pub fn write_label(&self, label: &ShapeLabel, out: &mut String) {
        match label {
            ShapeLabel::Iri(iri) => self.write_named_node(iri, out),
            ShapeLabel::BNode(bnode) => write_blank_node(bnode, out),
        }
    }

    /// Writes a literal, with its datatype compacted against the prefixes.
    pub fn write_literal(&self, literal: &Literal, out: &mut String) {
        out.push('"');
        escape_into(literal.value(), out);
        out.push('"');
        if let Some(language) = literal.language() {
            out.push('@');
            out.push_str(language);
        } else if literal.datatype() != xsd::STRING {
            out.push_str("^^");
            self.write_iri(literal.datatype().as_str(), out);
        }
    }

    pub fn write_object_value(&self, value: &ObjectValue, out: &mut String) {
        match value {
            ObjectValue::Iri(iri) => self.write_named_node(iri, out),
            ObjectValue::BlankNode(bnode) => write_blank_node(bnode, out),
            ObjectValue::Literal(literal) => self.write_literal(literal, out),
        }
    }
}

pub(crate) fn write_blank_node(bnode: &BlankNode, out: &mut String) {
    out.push_str("_:");
    out.push_str(bnode.as_str());
}

/// Writes an IRI between angle brackets, without compaction.
pub(crate) fn write_full_iri(iri: &str, out: &mut String) {
    out.push('<');
    escape_into(iri, out);
    out.push('>');
}

/// Writes semantic action code, escaping `\` and `%`.
pub(crate) fn write_code(code: &str, out: &mut String) {
    for c in code.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '%' => out.push_str("\\%"),
            c => out.push(c),
        }
    }
}

fn is_local_name(local: &str) -> bool {
    // [a-zA-Z][\-_a-zA-Z0-9]*
    let mut chars = local.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn needs_escape(c: char) -> bool {
    matches!(c, '"' | '\\' | '\0'..='\u{1f}') || c > '\u{ffff}'
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    escape_into(value, &mut out);
    out
}

/// Escapes control characters, quotes, backslashes and characters outside of the BMP.
pub(crate) fn escape_into(value: &str, out: &mut String) {
    if !value.chars().any(needs_escape) {
        out.push_str(value);
        return;
    }
    for c in value.chars() {
        match c {
            '\u{08}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{0c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\0'..='\u{1f}' => {
                out.push_str("\\u");
                push_hex(u32::from(c), 4, out);
            }
            c if c > '\u{ffff}' => {
                out.push_str("\\U");
                push_hex(u32::from(c), 8, out);
            }
            c => out.push(c),
        }
    }
}

fn push_hex(value: u32, digits: u32, out: &mut String) {
    for i in (0..digits).rev() {
        let digit = (value >> (i * 4)) & 0xF;
        out.push(char::from_digit(digit, 16).map_or('0', |c| c.to_ascii_uppercase()));
    }
}
