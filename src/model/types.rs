use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A target-language type reference produced by resolution.
///
/// Identity is `(scope, name)`. An all-empty `TypeUsage` is the "no type"
/// sentinel used for void responses. `inner_types` is ordered, since for
/// containers the element order matters (map key/value). `attributes` and
/// `list_attributes` are free-form metadata from the rule configuration,
/// passed through to rendering verbatim and never interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeUsage {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub scope: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inner_types: Vec<TypeUsage>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub list_attributes: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub imports: BTreeSet<String>,
}

impl TypeUsage {
    pub fn named(name: impl Into<String>) -> Self {
        TypeUsage {
            name: name.into(),
            ..TypeUsage::default()
        }
    }

    /// Reference to a schema registered in a model.
    pub fn reference(scope: impl Into<String>, name: impl Into<String>) -> Self {
        TypeUsage {
            name: name.into(),
            scope: scope.into(),
            ..TypeUsage::default()
        }
    }

    /// The "no type" sentinel.
    pub fn none() -> Self {
        TypeUsage::default()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.scope.is_empty() && self.inner_types.is_empty()
    }

    pub fn with_inner(mut self, inner: TypeUsage) -> Self {
        self.inner_types.push(inner);
        self
    }

    pub fn add_import(&mut self, import: impl Into<String>) {
        self.imports.insert(import.into());
    }
}

/// Direction a type or schema is used in: request input, response output,
/// or both (shared definitions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
    InOut,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
            Direction::InOut => write!(f, "inout"),
        }
    }
}

/// A field declaration: schema-space name paired with a target-space name.
///
/// `target_name` is computed once through the identifier rules when the
/// declaration is created and never changes afterwards. `default_value` is
/// a raw literal string from the document, passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarDecl {
    pub name: String,
    pub target_name: String,
    #[serde(rename = "type")]
    pub ty: TypeUsage,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl VarDecl {
    pub fn new(
        name: impl Into<String>,
        target_name: impl Into<String>,
        ty: TypeUsage,
        required: bool,
    ) -> Self {
        VarDecl {
            name: name.into(),
            target_name: target_name.into(),
            ty,
            required,
            default_value: None,
        }
    }
}

/// A named or anonymous aggregate type from one schema node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjectSchema {
    /// Persistent name; empty for anonymous/trivial schemas
    pub name: String,
    /// Dotted scope path for namespacing and identifier-rule context
    #[serde(skip_serializing_if = "String::is_empty")]
    pub scope: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Parent type references from `$ref`/`allOf`, in document order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<TypeUsage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<VarDecl>,
}

impl ObjectSchema {
    /// A trivial schema is a pure alias: exactly one parent, no own fields.
    pub fn trivial(&self) -> bool {
        self.parents.len() == 1 && self.fields.is_empty()
    }

    /// No parents and no fields: "no schema here", a valid outcome
    /// (e.g. a freeform body).
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty() && self.fields.is_empty()
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_usage_sentinel() {
        assert!(TypeUsage::none().is_empty());
        assert!(!TypeUsage::named("String").is_empty());
    }

    #[test]
    fn test_inner_types_keep_order() {
        let map_type = TypeUsage::named("HashMap")
            .with_inner(TypeUsage::named("String"))
            .with_inner(TypeUsage::named("Event"));
        let names: Vec<&str> = map_type.inner_types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["String", "Event"]);
    }

    #[test]
    fn test_trivial_requires_single_parent_no_fields() {
        let mut schema = ObjectSchema {
            parents: vec![TypeUsage::named("Event")],
            ..ObjectSchema::default()
        };
        assert!(schema.trivial());
        schema.fields.push(VarDecl::new(
            "extra",
            "extra",
            TypeUsage::named("String"),
            false,
        ));
        assert!(!schema.trivial());
        assert!(!schema.is_empty());
    }
}
