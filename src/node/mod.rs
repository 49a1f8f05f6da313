//! # Document Node Module
//!
//! A read-only, typed view of one parsed schema document: a tree of maps,
//! sequences and scalars, with an `Undefined` kind standing in for absent
//! lookups. Every node carries a source location for diagnostics.
//!
//! ## Overview
//!
//! The resolution engine never touches `serde_yaml`/`serde_json` values
//! directly; it walks [`Node`]s and converts them through the typed accessors
//! (`as_map`, `as_seq`, `as_str`, ...). A shape mismatch is a structural
//! error carrying the node's file and line, so every "expected a map here"
//! failure points at the offending document position.
//!
//! Map entries preserve document order; property iteration order and
//! `allOf` parent order are contractual for the resolution engine.

mod loader;

pub use loader::load_document;

use crate::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Source location of a node: file name and 1-based line.
///
/// Line `0` means "line unknown" (flow-style YAML, JSON input) and is
/// omitted from display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loc {
    file: Arc<str>,
    line: u32,
}

impl Loc {
    pub fn new(file: impl AsRef<str>, line: u32) -> Self {
        Loc {
            file: Arc::from(file.as_ref()),
            line,
        }
    }

    pub(crate) fn with_line(&self, line: u32) -> Self {
        Loc {
            file: Arc::clone(&self.file),
            line,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.file)
        } else {
            write!(f, "{}:{}", self.file, self.line)
        }
    }
}

/// Scalar leaf value of a document node.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

/// The shape of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Mapping in document order
    Map(Vec<(String, Node)>),
    Seq(Vec<Node>),
    Scalar(Scalar),
    /// Absent lookup result; all accessors treat it as "nothing here"
    Undefined,
}

/// One node of a parsed schema document.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) loc: Loc,
}

fn undefined_node() -> &'static Node {
    static UNDEFINED: OnceLock<Node> = OnceLock::new();
    UNDEFINED.get_or_init(|| Node {
        kind: NodeKind::Undefined,
        loc: Loc::new("", 0),
    })
}

impl Node {
    pub fn new(kind: NodeKind, loc: Loc) -> Self {
        Node { kind, loc }
    }

    pub fn loc(&self) -> &Loc {
        &self.loc
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self.kind, NodeKind::Undefined)
    }

    pub fn is_map(&self) -> bool {
        matches!(self.kind, NodeKind::Map(_))
    }

    pub fn is_seq(&self) -> bool {
        matches!(self.kind, NodeKind::Seq(_))
    }

    /// Look up a key in a map node.
    ///
    /// Returns the shared `Undefined` node when the key is absent or when
    /// `self` is not a map, so chained lookups never panic.
    pub fn get(&self, key: &str) -> &Node {
        if let NodeKind::Map(entries) = &self.kind {
            entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v)
                .unwrap_or_else(|| undefined_node())
        } else {
            undefined_node()
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_defined()
    }

    /// Look up a key that must be present, failing with a structural error
    /// located at this node.
    pub fn require(&self, key: &str) -> Result<&Node, Error> {
        let v = self.get(key);
        if v.is_defined() {
            Ok(v)
        } else {
            Err(Error::structural(&self.loc, format!("missing '{key}'")))
        }
    }

    /// View this node as a mapping, in document order.
    pub fn as_map(&self) -> Result<&[(String, Node)], Error> {
        match &self.kind {
            NodeKind::Map(entries) => Ok(entries),
            _ => Err(Error::structural(
                &self.loc,
                format!("expected a map, found {}", self.kind_name()),
            )),
        }
    }

    pub fn as_seq(&self) -> Result<&[Node], Error> {
        match &self.kind {
            NodeKind::Seq(items) => Ok(items),
            _ => Err(Error::structural(
                &self.loc,
                format!("expected a sequence, found {}", self.kind_name()),
            )),
        }
    }

    pub fn as_str(&self) -> Result<&str, Error> {
        match &self.kind {
            NodeKind::Scalar(Scalar::Str(s)) => Ok(s),
            _ => Err(Error::structural(
                &self.loc,
                format!("expected a string, found {}", self.kind_name()),
            )),
        }
    }

    /// String value of a string scalar, or `None` for anything else
    /// (including undefined). Non-string scalars do not coerce; use
    /// [`scalar_string`](Self::scalar_string) for a literal rendition.
    pub fn str_value(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Scalar(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn bool_value(&self) -> Option<bool> {
        match &self.kind {
            NodeKind::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Numeric value of an integer or float scalar.
    pub fn number_value(&self) -> Option<f64> {
        match &self.kind {
            NodeKind::Scalar(Scalar::Int(n)) => Some(*n as f64),
            NodeKind::Scalar(Scalar::Float(x)) => Some(*x),
            _ => None,
        }
    }

    /// Raw literal rendition of a scalar, passed through verbatim as a
    /// default value. `None` for maps, sequences and undefined.
    pub fn scalar_string(&self) -> Option<String> {
        match &self.kind {
            NodeKind::Scalar(Scalar::Str(s)) => Some(s.clone()),
            NodeKind::Scalar(Scalar::Int(n)) => Some(n.to_string()),
            NodeKind::Scalar(Scalar::Float(x)) => Some(x.to_string()),
            NodeKind::Scalar(Scalar::Bool(b)) => Some(b.to_string()),
            NodeKind::Scalar(Scalar::Null) => None,
            _ => None,
        }
    }

    /// True for a map node with at least one entry.
    pub fn is_nonempty_map(&self) -> bool {
        matches!(&self.kind, NodeKind::Map(entries) if !entries.is_empty())
    }

    fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Map(_) => "a map",
            NodeKind::Seq(_) => "a sequence",
            NodeKind::Scalar(Scalar::Str(_)) => "a string",
            NodeKind::Scalar(Scalar::Int(_)) => "an integer",
            NodeKind::Scalar(Scalar::Float(_)) => "a number",
            NodeKind::Scalar(Scalar::Bool(_)) => "a boolean",
            NodeKind::Scalar(Scalar::Null) => "null",
            NodeKind::Undefined => "nothing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(s: &str) -> Node {
        Node::new(
            NodeKind::Scalar(Scalar::Str(s.to_string())),
            Loc::new("t.yaml", 3),
        )
    }

    #[test]
    fn test_get_on_non_map_is_undefined() {
        let n = scalar("hello");
        assert!(!n.get("anything").is_defined());
        assert!(!n.get("a").get("b").get("c").is_defined());
    }

    #[test]
    fn test_require_reports_map_location() {
        let map = Node::new(NodeKind::Map(vec![]), Loc::new("t.yaml", 7));
        let err = map.require("schema").unwrap_err();
        assert_eq!(err.to_string(), "t.yaml:7: missing 'schema'");
    }

    #[test]
    fn test_shape_mismatch_names_actual_kind() {
        let n = scalar("oops");
        let err = n.as_map().unwrap_err();
        assert!(err.to_string().contains("expected a map, found a string"));
    }

    #[test]
    fn test_scalar_string_renders_raw_literals() {
        let n = Node::new(NodeKind::Scalar(Scalar::Int(50)), Loc::new("t.yaml", 1));
        assert_eq!(n.scalar_string().as_deref(), Some("50"));
        let b = Node::new(NodeKind::Scalar(Scalar::Bool(true)), Loc::new("t.yaml", 1));
        assert_eq!(b.scalar_string().as_deref(), Some("true"));
    }
}
