//! Document loading: YAML or JSON text into a located [`Node`] tree.
//!
//! `serde_yaml` does not expose source spans, so line numbers come from a
//! block-mapping line index: a single pass over the raw text records every
//! `key:` line in document order, and the value conversion consumes that
//! index while walking the parsed mapping in the same order. A value node
//! reports the line of the key that introduces it. Flow-style
//! mappings and JSON input cannot be indexed; their nodes inherit the
//! nearest indexed ancestor's line (line 0 at worst).

use super::{Loc, Node, NodeKind, Scalar};
use anyhow::Context;
use regex::Regex;
use std::path::Path;
use std::sync::Arc;

/// Load one schema document from disk.
///
/// `.yaml`/`.yml` files are parsed as YAML, everything else as JSON,
/// matching how input documents are conventionally named.
pub fn load_document(path: &Path) -> anyhow::Result<Node> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file: Arc<str> = Arc::from(path.display().to_string().as_str());

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        let value: serde_yaml::Value = serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse YAML in {}", path.display()))?;
        let mut index = LineIndex::scan(&text);
        Ok(from_yaml_value(&value, &file, &mut index, 0))
    } else {
        let value: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse JSON in {}", path.display()))?;
        Ok(from_json_value(&value, &file, 0))
    }
}

/// Ordered `(key, line)` pairs for every block-mapping key in the text.
///
/// Consumed front-to-back during conversion; a DFS over the parsed mapping
/// visits keys in exactly the order they appear in block-style YAML.
struct LineIndex {
    keys: Vec<(String, u32)>,
    cursor: usize,
}

impl LineIndex {
    fn scan(text: &str) -> Self {
        // A block mapping key: optional indentation and `- ` markers, then a
        // bare or quoted key followed by `:` at end of line or before a space.
        let key_re = Regex::new(
            r#"^[ \t]*(?:-[ \t]+)*(?:"([^"]*)"|'([^']*)'|([^\s:#][^:#]*?))[ \t]*:(?:[ \t]|$)"#,
        )
        .expect("key regex is valid");

        let mut keys = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if let Some(caps) = key_re.captures(line) {
                let key = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .or_else(|| caps.get(3))
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();
                keys.push((key, (i + 1) as u32));
            }
        }
        LineIndex { keys, cursor: 0 }
    }

    /// Line of the next occurrence of `key`, advancing the cursor past it.
    /// Returns `None` when the key was not indexed (flow style).
    fn line_for(&mut self, key: &str) -> Option<u32> {
        let found = self.keys[self.cursor..]
            .iter()
            .position(|(k, _)| k == key)?;
        let pos = self.cursor + found;
        let line = self.keys[pos].1;
        self.cursor = pos + 1;
        Some(line)
    }
}

fn yaml_key_string(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn from_yaml_value(
    value: &serde_yaml::Value,
    file: &Arc<str>,
    index: &mut LineIndex,
    parent_line: u32,
) -> Node {
    let loc = |line| Loc {
        file: Arc::clone(file),
        line,
    };
    match value {
        serde_yaml::Value::Mapping(map) => {
            let mut entries = Vec::with_capacity(map.len());
            // A nested map reports the line of the key it hangs off; only the
            // root document, which has no key, borrows its first entry's line.
            let mut map_line = parent_line;
            for (k, v) in map {
                let Some(key) = yaml_key_string(k) else {
                    continue;
                };
                let line = index.line_for(&key).unwrap_or(parent_line);
                if map_line == 0 && entries.is_empty() {
                    map_line = line;
                }
                entries.push((key, from_yaml_value(v, file, index, line)));
            }
            Node::new(NodeKind::Map(entries), loc(map_line))
        }
        serde_yaml::Value::Sequence(items) => Node::new(
            NodeKind::Seq(
                items
                    .iter()
                    .map(|v| {
                        let mut item = from_yaml_value(v, file, index, parent_line);
                        // a sequence item map has no key of its own; point it
                        // at its first entry rather than the sequence key
                        if let NodeKind::Map(entries) = &item.kind {
                            if let Some((_, first)) = entries.first() {
                                item.loc = item.loc.with_line(first.loc.line);
                            }
                        }
                        item
                    })
                    .collect(),
            ),
            loc(parent_line),
        ),
        serde_yaml::Value::String(s) => {
            Node::new(NodeKind::Scalar(Scalar::Str(s.clone())), loc(parent_line))
        }
        serde_yaml::Value::Number(n) => {
            let scalar = if let Some(i) = n.as_i64() {
                Scalar::Int(i)
            } else {
                Scalar::Float(n.as_f64().unwrap_or(0.0))
            };
            Node::new(NodeKind::Scalar(scalar), loc(parent_line))
        }
        serde_yaml::Value::Bool(b) => {
            Node::new(NodeKind::Scalar(Scalar::Bool(*b)), loc(parent_line))
        }
        serde_yaml::Value::Null => Node::new(NodeKind::Scalar(Scalar::Null), loc(parent_line)),
        serde_yaml::Value::Tagged(tagged) => from_yaml_value(&tagged.value, file, index, parent_line),
    }
}

fn from_json_value(value: &serde_json::Value, file: &Arc<str>, line: u32) -> Node {
    let loc = Loc {
        file: Arc::clone(file),
        line,
    };
    let kind = match value {
        serde_json::Value::Object(map) => NodeKind::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), from_json_value(v, file, line)))
                .collect(),
        ),
        serde_json::Value::Array(items) => NodeKind::Seq(
            items
                .iter()
                .map(|v| from_json_value(v, file, line))
                .collect(),
        ),
        serde_json::Value::String(s) => NodeKind::Scalar(Scalar::Str(s.clone())),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                NodeKind::Scalar(Scalar::Int(i))
            } else {
                NodeKind::Scalar(Scalar::Float(n.as_f64().unwrap_or(0.0)))
            }
        }
        serde_json::Value::Bool(b) => NodeKind::Scalar(Scalar::Bool(*b)),
        serde_json::Value::Null => NodeKind::Scalar(Scalar::Null),
    };
    Node::new(kind, loc)
}
