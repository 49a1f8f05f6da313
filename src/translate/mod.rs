//! # Translator Module
//!
//! The declarative translation layer between schema space and target space,
//! loaded once from the rule configuration and immutable for the rest of
//! the run. It answers two pure lookups ("map a schema `type`/`format`
//! pair to a [`TypeUsage`]" and "map a schema identifier to a target
//! identifier") and owns the cross-file processing cache.
//!
//! ## Rule semantics
//!
//! Both tables are ordered and first-match-wins:
//!
//! - **Type rules**: the table is scanned for an entry whose key equals the
//!   schema type; within it, format patterns are tried in declaration
//!   order (exact string, or regex when `/`-delimited). The resulting
//!   descriptor's base name is filled by a fallback chain:
//!   explicit hint → schema format → schema type.
//! - **Identifier rules**: the scoped string `scope + "/" + name` is built;
//!   regex rules test the scoped string, literal rules the bare or scoped
//!   name. An empty replacement drops the identifier, which is fatal for a
//!   required field. No hit passes the name through unchanged.
//!
//! ## Cross-file cache
//!
//! [`Translator::process_file`] memoizes by canonical absolute path so a
//! document referenced from several places is parsed and resolved exactly
//! once. A "currently resolving" marker per path turns reference cycles
//! into a configuration error instead of unbounded recursion. The cache is
//! owned state, not a global, so tests run with isolated caches.

mod rules;

pub use rules::{IdentRule, Pattern, TypeRule};

use crate::config::GenConfig;
use crate::error::Error;
use crate::model::{Model, TypeUsage};
use crate::node::load_document;
use anyhow::Context;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

enum FileState {
    /// Marker for a document currently on the resolution stack
    InProgress,
    Done(Rc<Model>),
}

/// The rule engine plus per-run file cache.
pub struct Translator {
    type_rules: Vec<TypeRule>,
    ident_rules: Vec<IdentRule>,
    /// Literal `$ref` path → pre-declared type, checked before any file IO
    ref_rules: Vec<(String, TypeUsage)>,
    config: GenConfig,
    cache: RefCell<HashMap<PathBuf, FileState>>,
    files_processed: Cell<usize>,
}

impl Translator {
    /// Compile the rule tables from a loaded configuration.
    pub fn new(config: GenConfig) -> anyhow::Result<Self> {
        let type_rules = config
            .types
            .iter()
            .map(TypeRule::compile)
            .collect::<anyhow::Result<Vec<_>>>()?;
        let ident_rules = config
            .identifiers
            .iter()
            .map(IdentRule::compile)
            .collect::<anyhow::Result<Vec<_>>>()?;
        let ref_rules = config
            .refs
            .iter()
            .map(|r| {
                let mut usage = TypeUsage::reference(r.scope.clone(), r.name.clone());
                for import in &r.imports {
                    usage.add_import(import.clone());
                }
                (r.ref_path.clone(), usage)
            })
            .collect();
        Ok(Translator {
            type_rules,
            ident_rules,
            ref_rules,
            config,
            cache: RefCell::new(HashMap::new()),
            files_processed: Cell::new(0),
        })
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    /// Map a schema `type`/`format` pair to a type descriptor.
    ///
    /// Scans the type-rule table in declaration order; the first entry
    /// whose key equals `schema_type` is searched for the first matching
    /// format pattern. `None` when nothing matches; the caller decides
    /// whether that is fatal.
    pub fn map_type(
        &self,
        schema_type: &str,
        schema_format: &str,
        hint: Option<&str>,
    ) -> Option<TypeUsage> {
        let rule = self
            .type_rules
            .iter()
            .find(|r| r.schema_type == schema_type)?;
        let entry = rule
            .formats
            .iter()
            .find(|f| f.pattern.matches(schema_format))?;
        let base_name = hint
            .filter(|h| !h.is_empty())
            .unwrap_or(if schema_format.is_empty() {
                schema_type
            } else {
                schema_format
            });
        Some(entry.usage.instantiate(base_name))
    }

    /// Map a schema identifier to a target identifier.
    ///
    /// Returns an empty string when a matching rule drops the identifier;
    /// that is a configuration error when the field is required.
    pub fn map_identifier(
        &self,
        name: &str,
        scope: &str,
        required: bool,
    ) -> Result<String, Error> {
        let scoped = format!("{scope}/{name}");
        let mapped = self
            .ident_rules
            .iter()
            .find_map(|rule| rule.apply(name, &scoped))
            .unwrap_or_else(|| name.to_string());
        if mapped.is_empty() && required {
            return Err(Error::config(format!(
                "required identifier '{scoped}' maps to an empty name"
            )));
        }
        Ok(mapped)
    }

    /// Pre-declared mapping for a literal `$ref` path, if configured.
    pub fn ref_mapping(&self, ref_path: &str) -> Option<TypeUsage> {
        self.ref_rules
            .iter()
            .find(|(path, _)| path == ref_path)
            .map(|(_, usage)| usage.clone())
    }

    /// Process one schema document, memoized by canonical path.
    ///
    /// A repeat request for an already resolved document returns the cached
    /// model; a request for a document still on the resolution stack is a
    /// reference cycle and fails.
    pub fn process_file(&self, path: &Path, base_dir: &Path) -> anyhow::Result<Rc<Model>> {
        let full = if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        };
        let canonical = full
            .canonicalize()
            .with_context(|| format!("cannot resolve referenced document {}", full.display()))?;

        match self.cache.borrow().get(&canonical) {
            Some(FileState::Done(model)) => {
                debug!(file = %canonical.display(), "document already resolved, using cache");
                return Ok(Rc::clone(model));
            }
            Some(FileState::InProgress) => {
                return Err(Error::config(format!(
                    "reference cycle: {} transitively $refs itself",
                    canonical.display()
                ))
                .into());
            }
            None => {}
        }

        self.cache
            .borrow_mut()
            .insert(canonical.clone(), FileState::InProgress);

        let result = self.resolve_file(&full, &canonical);
        match result {
            Ok(model) => {
                let model = Rc::new(model);
                self.cache
                    .borrow_mut()
                    .insert(canonical, FileState::Done(Rc::clone(&model)));
                self.files_processed.set(self.files_processed.get() + 1);
                Ok(model)
            }
            Err(e) => {
                // Leave no stale marker behind; the run is aborting anyway
                // but tests drive several documents through one translator.
                self.cache.borrow_mut().remove(&canonical);
                Err(e)
            }
        }
    }

    fn resolve_file(&self, full: &Path, canonical: &Path) -> anyhow::Result<Model> {
        debug!(file = %full.display(), "processing document");
        let node = load_document(full)?;

        let file_dir = canonical
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let src_filename = full
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = full
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut model = Model::new(file_dir, src_filename);
        model.dst_files = self
            .config
            .templates
            .outputs
            .iter()
            .map(|o| PathBuf::from(o.dst.replace("{stem}", &stem)))
            .collect();

        crate::resolve::resolve_document(self, &node, &mut model)
            .with_context(|| format!("while processing {}", full.display()))?;
        Ok(model)
    }

    /// Number of documents actually resolved (cache misses) in this run.
    pub fn files_processed(&self) -> usize {
        self.files_processed.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator(yaml: &str) -> Translator {
        let config: GenConfig = serde_yaml::from_str(yaml).unwrap();
        Translator::new(config).unwrap()
    }

    #[test]
    fn test_map_type_first_match_wins() {
        let tr = translator(
            r#"
types:
  - type: integer
    formats:
      - format: int64
        attributes: { type: "i64" }
      - format: "/int.*/"
        attributes: { type: "i32" }
"#,
        );
        // exact entry declared first shadows the regex that also matches
        let usage = tr.map_type("integer", "int64", None).unwrap();
        assert_eq!(usage.attributes["type"], "i64");
        let usage = tr.map_type("integer", "int32", None).unwrap();
        assert_eq!(usage.attributes["type"], "i32");
    }

    #[test]
    fn test_map_type_base_name_fallback_chain() {
        let tr = translator(
            r#"
types:
  - type: string
    formats:
      - format: ""
        attributes: { type: "String" }
      - format: "/.*/"
        attributes: { type: "String" }
"#,
        );
        assert_eq!(tr.map_type("string", "", None).unwrap().name, "string");
        assert_eq!(tr.map_type("string", "uri", None).unwrap().name, "uri");
        assert_eq!(
            tr.map_type("string", "uri", Some("MxcUri")).unwrap().name,
            "MxcUri"
        );
    }

    #[test]
    fn test_map_type_unknown_returns_none() {
        let tr = translator("types: []");
        assert!(tr.map_type("string", "", None).is_none());
    }

    #[test]
    fn test_map_type_is_pure() {
        let tr = translator(
            r#"
types:
  - type: boolean
    formats:
      - attributes: { type: "bool" }
        imports: ["prelude"]
"#,
        );
        let a = tr.map_type("boolean", "", None).unwrap();
        let b = tr.map_type("boolean", "", None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_map_identifier_first_match_wins() {
        let tr = translator(
            r#"
identifiers:
  - pattern: user_id
    rename: userId
  - pattern: "/^.*\\/user_id$/"
    rename: neverUsed
"#,
        );
        assert_eq!(
            tr.map_identifier("user_id", "InviteUser", true).unwrap(),
            "userId"
        );
    }

    #[test]
    fn test_map_identifier_passthrough_when_no_rule_hits() {
        let tr = translator("identifiers: []");
        assert_eq!(
            tr.map_identifier("room_id", "JoinRoom", true).unwrap(),
            "room_id"
        );
    }

    #[test]
    fn test_required_identifier_dropped_is_fatal() {
        let tr = translator(
            r#"
identifiers:
  - pattern: internal_flag
    rename: ""
"#,
        );
        assert!(tr.map_identifier("internal_flag", "S", false).unwrap().is_empty());
        let err = tr.map_identifier("internal_flag", "S", true).unwrap_err();
        assert!(err.to_string().contains("S/internal_flag"));
    }

    #[test]
    fn test_ref_mapping_short_circuits() {
        let tr = translator(
            r#"
refs:
  - ref: definitions/event.yaml
    name: Event
    imports: ["events.rs"]
"#,
        );
        let usage = tr.ref_mapping("definitions/event.yaml").unwrap();
        assert_eq!(usage.name, "Event");
        assert!(usage.imports.contains("events.rs"));
        assert!(tr.ref_mapping("definitions/other.yaml").is_none());
    }
}
