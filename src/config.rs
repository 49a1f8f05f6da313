//! Generator configuration: the declarative type/identifier translation
//! rules plus template outputs, loaded once from a YAML file before any
//! document processing.
//!
//! The two rule lists are ordered (first match wins) and become the
//! Translator's immutable tables for the remainder of the run. A pattern
//! wrapped in `/` on both ends is a regex; anything else matches exactly.
//!
//! ```yaml
//! types:
//!   - type: string
//!     formats:
//!       - format: ""                # exact match on an empty format
//!         attributes: { type: "String" }
//!       - format: "/^int/"          # regex match
//!         attributes: { type: "i64" }
//!   - type: array
//!     formats: [ { attributes: { type: "Vec" } } ]
//! identifiers:
//!   - pattern: default              # literal, bare or scoped
//!     rename: is_default
//!   - pattern: "/^.*\\/user_id$/"   # regex against scope/name
//!     rename: userId
//! refs:
//!   - ref: "definitions/event.yaml"
//!     name: Event
//! templates:
//!   dir: templates
//!   outputs:
//!     - template: model.rs.j2
//!       dst: "{stem}.rs"
//! output_dir: generated
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Root configuration for one generator run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenConfig {
    /// Ordered type rules: schema type name to format-pattern entries
    #[serde(default)]
    pub types: Vec<TypeRuleConfig>,
    /// Ordered identifier rules, scanned first-match-wins
    #[serde(default)]
    pub identifiers: Vec<IdentRuleConfig>,
    /// Pre-declared `$ref` path mappings that short-circuit cross-file
    /// resolution for well-known external refs
    #[serde(default)]
    pub refs: Vec<RefRuleConfig>,
    #[serde(default)]
    pub templates: TemplatesConfig,
    /// Directory rendered output files are written under
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("generated")
}

/// One entry of the type-rule table: all format patterns for one schema
/// type name, in declaration order.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeRuleConfig {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(default)]
    pub formats: Vec<FormatRuleConfig>,
}

/// Target type data attached when a format pattern matches.
///
/// `attributes`/`list_attributes` are free-form strings handed to the
/// templates verbatim; `imports` become import requirements on every
/// type usage this entry produces.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormatRuleConfig {
    /// Exact format string, or `/re/` for a regex; empty matches an
    /// absent/empty format
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub list_attributes: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub imports: Vec<String>,
}

/// One identifier rule: literal or `/re/` pattern and its replacement.
/// An empty `rename` drops the identifier.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentRuleConfig {
    pub pattern: String,
    #[serde(default)]
    pub rename: String,
}

/// Pre-declared mapping for a literal `$ref` path.
#[derive(Debug, Clone, Deserialize)]
pub struct RefRuleConfig {
    #[serde(rename = "ref")]
    pub ref_path: String,
    pub name: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub imports: Vec<String>,
}

/// Template set configuration for the rendering stage.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
    #[serde(default = "default_template_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub outputs: Vec<OutputConfig>,
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("templates")
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        TemplatesConfig {
            dir: default_template_dir(),
            outputs: Vec::new(),
        }
    }
}

/// One rendered output per processed document. `{stem}` in `dst` is
/// replaced with the source file stem.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub template: String,
    pub dst: String,
}

impl GenConfig {
    /// Load and parse the configuration file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}
