//! Compiled rule tables: tagged match patterns evaluated by a single
//! dispatch, no trait objects. A config pattern wrapped in `/` on both
//! ends compiles to a regex; anything else matches exactly.

use crate::config::{FormatRuleConfig, IdentRuleConfig, TypeRuleConfig};
use crate::model::TypeUsage;
use anyhow::Context;
use regex::Regex;
use std::collections::BTreeSet;

/// An exact string or a compiled regex.
#[derive(Debug, Clone)]
pub enum Pattern {
    Exact(String),
    Regex(Regex),
}

impl Pattern {
    /// Parse a config pattern. `/.../` (the same delimiter on both ends)
    /// flags a regex; everything else is taken literally.
    pub fn parse(raw: &str) -> anyhow::Result<Pattern> {
        if raw.len() >= 2 && raw.starts_with('/') && raw.ends_with('/') {
            let inner = &raw[1..raw.len() - 1];
            let re = Regex::new(inner)
                .with_context(|| format!("invalid rule pattern regex '{raw}'"))?;
            Ok(Pattern::Regex(re))
        } else {
            Ok(Pattern::Exact(raw.to_string()))
        }
    }

    /// Exact patterns compare for equality; regex patterns search.
    pub fn matches(&self, input: &str) -> bool {
        match self {
            Pattern::Exact(lit) => lit == input,
            Pattern::Regex(re) => re.is_match(input),
        }
    }
}

/// One format entry of a type rule: pattern plus the type data it yields.
#[derive(Debug, Clone)]
pub struct FormatEntry {
    pub pattern: Pattern,
    pub usage: UsageTemplate,
}

/// The configured part of a [`TypeUsage`]: scope, attributes and imports.
/// The base name is filled at lookup time from the hint/format/type chain.
#[derive(Debug, Clone, Default)]
pub struct UsageTemplate {
    pub scope: String,
    pub attributes: std::collections::BTreeMap<String, String>,
    pub list_attributes: std::collections::BTreeMap<String, Vec<String>>,
    pub imports: BTreeSet<String>,
}

impl UsageTemplate {
    fn from_config(cfg: &FormatRuleConfig) -> Self {
        UsageTemplate {
            scope: cfg.scope.clone(),
            attributes: cfg.attributes.clone(),
            list_attributes: cfg.list_attributes.clone(),
            imports: cfg.imports.iter().cloned().collect(),
        }
    }

    /// Instantiate with a base name resolved by the caller's fallback chain.
    pub fn instantiate(&self, base_name: &str) -> TypeUsage {
        TypeUsage {
            name: base_name.to_string(),
            scope: self.scope.clone(),
            inner_types: Vec::new(),
            attributes: self.attributes.clone(),
            list_attributes: self.list_attributes.clone(),
            imports: self.imports.clone(),
        }
    }
}

/// All format entries for one schema type name, in declaration order.
#[derive(Debug, Clone)]
pub struct TypeRule {
    pub schema_type: String,
    pub formats: Vec<FormatEntry>,
}

impl TypeRule {
    pub fn compile(cfg: &TypeRuleConfig) -> anyhow::Result<TypeRule> {
        let formats = cfg
            .formats
            .iter()
            .map(|f| {
                Ok(FormatEntry {
                    pattern: Pattern::parse(&f.format)?,
                    usage: UsageTemplate::from_config(f),
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .with_context(|| format!("in type rule '{}'", cfg.schema_type))?;
        Ok(TypeRule {
            schema_type: cfg.schema_type.clone(),
            formats,
        })
    }
}

/// One identifier rule. Regex patterns test the scoped `scope/name`
/// string; literal patterns test the bare or the scoped name.
#[derive(Debug, Clone)]
pub struct IdentRule {
    pub pattern: Pattern,
    pub rename: String,
}

impl IdentRule {
    pub fn compile(cfg: &IdentRuleConfig) -> anyhow::Result<IdentRule> {
        Ok(IdentRule {
            pattern: Pattern::parse(&cfg.pattern)
                .with_context(|| format!("in identifier rule '{}'", cfg.pattern))?,
            rename: cfg.rename.clone(),
        })
    }

    /// Apply this rule, returning the replacement on a hit.
    ///
    /// Regex replacements may use capture groups (`$1`); literal hits
    /// return the replacement verbatim.
    pub fn apply(&self, bare: &str, scoped: &str) -> Option<String> {
        match &self.pattern {
            Pattern::Regex(re) => {
                if re.is_match(scoped) {
                    Some(re.replace(scoped, self.rename.as_str()).into_owned())
                } else {
                    None
                }
            }
            Pattern::Exact(lit) => {
                if lit == bare || lit == scoped {
                    Some(self.rename.clone())
                } else {
                    None
                }
            }
        }
    }
}
