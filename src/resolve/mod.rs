//! # Type Resolution Engine
//!
//! Walks a document's type/schema nodes and produces [`TypeUsage`] and
//! [`ObjectSchema`] values, populating a [`Model`]. Leaf type mapping and
//! cross-file `$ref` processing are delegated back to the [`Translator`].
//!
//! ## Resolution rules
//!
//! - `type: array` resolves the element type recursively and wraps it in
//!   the configured array container; the display name defaults to
//!   `"[elem]"` unless the node carries a `title`.
//! - `type: object` resolves to a schema. A schema with an assigned name
//!   is registered in the model and referenced; a *trivial* schema (one
//!   parent, no own fields, no name) collapses into its parent, so a pure
//!   alias never materializes as a new type. An empty object falls
//!   through the `additionalProperties` ladder (map container, generic
//!   map, plain object) and, in top-level output position, becomes the
//!   "no type" sentinel for void responses.
//! - Scalar types go straight to the translator's type-rule table;
//!   an unmapped `type`/`format` pair is fatal, with file:line.
//! - Multi-type nodes (`type` is a sequence) fall back to a generic
//!   object; union support is an explicit non-goal.
//!
//! Property iteration and `allOf` parent order follow document order.
//! Multiple parents are a plain list; no linearization is computed.

mod calls;

pub use calls::class_name_for;
pub(crate) use calls::resolve_operations;

use crate::error::Error;
use crate::model::{Direction, Model, ObjectSchema, TypeUsage, VarDecl};
use crate::node::Node;
use crate::translate::Translator;
use std::path::Path;
use tracing::debug;

/// Camel-case a schema title or path segment: split on anything that is
/// not alphanumeric and capitalize each word's first letter.
pub fn camel_case(s: &str) -> String {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Entry point for one loaded document: operations documents (a `paths`
/// key) become calls, anything else is resolved as one standalone data
/// schema named after the file when untitled.
pub(crate) fn resolve_document(
    translator: &Translator,
    node: &Node,
    model: &mut Model,
) -> anyhow::Result<()> {
    if node.has("paths") {
        resolve_operations(translator, node, model)
    } else {
        resolve_data_document(translator, node, model)
    }
}

fn resolve_data_document(
    translator: &Translator,
    node: &Node,
    model: &mut Model,
) -> anyhow::Result<()> {
    let fallback = Path::new(&model.src_filename)
        .file_stem()
        .map(|s| camel_case(&s.to_string_lossy()))
        .unwrap_or_default();
    let mut resolver = Resolver::new(translator, model);
    let schema = resolver.resolve_schema(node, Direction::InOut, "", Some(&fallback))?;
    if schema.has_name() {
        model.add_schema(schema);
    }
    Ok(())
}

/// Resolves type and schema nodes against one model under construction.
pub struct Resolver<'a> {
    translator: &'a Translator,
    model: &'a mut Model,
}

impl<'a> Resolver<'a> {
    pub fn new(translator: &'a Translator, model: &'a mut Model) -> Self {
        Resolver { translator, model }
    }

    /// Resolve a type node in a nested position.
    pub fn resolve_type(
        &mut self,
        node: &Node,
        direction: Direction,
        scope: &str,
    ) -> anyhow::Result<TypeUsage> {
        self.resolve_type_impl(node, direction, scope, false)
    }

    /// Resolve a type node in top-level response position, where an empty
    /// output object legitimately means "no response body".
    pub fn resolve_top_type(
        &mut self,
        node: &Node,
        direction: Direction,
        scope: &str,
    ) -> anyhow::Result<TypeUsage> {
        self.resolve_type_impl(node, direction, scope, true)
    }

    fn resolve_type_impl(
        &mut self,
        node: &Node,
        direction: Direction,
        scope: &str,
        top_level: bool,
    ) -> anyhow::Result<TypeUsage> {
        let type_node = node.get("type");
        if type_node.is_seq() {
            // multi-type: union support is a non-goal
            return self.generic_object(node);
        }
        let schema_type = type_node.str_value().unwrap_or("object");

        match schema_type {
            "array" => {
                let items = node.get("items");
                if items.is_nonempty_map() {
                    let element = self.resolve_type(items, direction, scope)?;
                    let display = match node.get("title").str_value() {
                        Some(title) => camel_case(title),
                        None => format!("[{}]", element.name),
                    };
                    let container = self
                        .translator
                        .map_type("array", "", Some(&display))
                        .ok_or_else(|| Error::mapping(node.loc(), "Unknown type 'array'"))?;
                    Ok(container.with_inner(element))
                } else {
                    self.translator
                        .map_type("array", "", None)
                        .ok_or_else(|| Error::mapping(node.loc(), "Unknown type 'array'").into())
                }
            }
            "object" => {
                let schema = self.resolve_schema(node, direction, scope, None)?;
                if schema.is_empty() {
                    let ap = node.get("additionalProperties");
                    if ap.is_map() {
                        let value = self.resolve_type(ap, direction, scope)?;
                        let display = match node.get("title").str_value() {
                            Some(title) => camel_case(title),
                            None => format!("{{string:{}}}", value.name),
                        };
                        let container = self
                            .translator
                            .map_type("map", "", Some(&display))
                            .ok_or_else(|| Error::mapping(node.loc(), "Unknown type 'map'"))?;
                        return Ok(container.with_inner(value));
                    }
                    match ap.bool_value() {
                        Some(true) => {
                            return self
                                .translator
                                .map_type("map", "", None)
                                .ok_or_else(|| {
                                    Error::mapping(node.loc(), "Unknown type 'map'").into()
                                });
                        }
                        Some(false) => {} // explicit "no extra keys": a plain object
                        None => {
                            if ap.is_defined() {
                                return Err(Error::config(format!(
                                    "{}: malformed additionalProperties (neither boolean nor map)",
                                    ap.loc()
                                ))
                                .into());
                            }
                        }
                    }
                    if top_level && direction == Direction::Out {
                        // void response body
                        return Ok(TypeUsage::none());
                    }
                    return self.generic_object(node);
                }

                if schema.has_name() {
                    let usage = TypeUsage::reference(schema.scope.clone(), schema.name.clone());
                    self.model.add_schema(schema);
                    return Ok(usage);
                }
                if schema.trivial() {
                    // alias collapsing: "just another name for an existing
                    // type" returns the parent itself
                    if let Some(parent) = schema.parents.into_iter().next() {
                        return Ok(parent);
                    }
                    return self.generic_object(node);
                }
                // fields but no name: nothing to reference, fall back
                debug!(loc = %node.loc(), "anonymous non-trivial schema used as a type");
                self.generic_object(node)
            }
            _ => {
                let format = node.get("format").str_value().unwrap_or("");
                self.translator
                    .map_type(schema_type, format, None)
                    .ok_or_else(|| {
                        Error::mapping(
                            node.loc(),
                            format!("Unknown type '{schema_type}'/'{format}'"),
                        )
                        .into()
                    })
            }
        }
    }

    /// Resolve a schema node into an object schema.
    ///
    /// `locus` is a fallback title used for top-level data documents
    /// (named after the file when untitled). The schema is returned by
    /// value; registration into the model is the caller's decision.
    pub fn resolve_schema(
        &mut self,
        node: &Node,
        direction: Direction,
        scope: &str,
        locus: Option<&str>,
    ) -> anyhow::Result<ObjectSchema> {
        let mut schema = ObjectSchema {
            direction: Some(direction),
            ..ObjectSchema::default()
        };

        if let Some(ref_path) = node.get("$ref").str_value() {
            let parent = self.resolve_ref(ref_path, node.get("$ref"))?;
            schema.parents.push(parent);
        } else if node.has("allOf") {
            for member in node.get("allOf").as_seq()? {
                let ref_node = member.get("$ref");
                let Some(ref_path) = ref_node.str_value() else {
                    return Err(Error::structural(
                        member.loc(),
                        "allOf members must carry a $ref (inline composition is not supported)",
                    )
                    .into());
                };
                let parent = self.resolve_ref(ref_path, ref_node)?;
                schema.parents.push(parent);
            }
        }

        // an "object" that is secretly a renamed scalar or array
        let own_type = node.get("type").str_value();
        if schema.parents.is_empty() && own_type.is_some() && own_type != Some("object") {
            let ty = self.resolve_type(node, direction, scope)?;
            if !ty.is_empty() {
                schema.parents.push(ty);
            }
        }

        let required: Vec<String> = if node.has("required") {
            node.get("required")
                .as_seq()?
                .iter()
                .filter_map(|n| n.str_value().map(String::from))
                .collect()
        } else {
            Vec::new()
        };

        if node.has("properties") {
            for (prop_name, prop_node) in node.get("properties").as_map()? {
                let ty = self.resolve_type(prop_node, direction, scope)?;
                let is_required = required.iter().any(|r| r == prop_name);
                let target = self
                    .translator
                    .map_identifier(prop_name, scope, is_required)?;
                if target.is_empty() {
                    debug!(name = %prop_name, scope, "identifier dropped by rule");
                    continue;
                }
                let mut decl = VarDecl::new(prop_name.clone(), target, ty, is_required);
                decl.default_value = prop_node.get("default").scalar_string();
                schema.fields.push(decl);
            }
        }

        if !schema.is_empty() {
            let name = node
                .get("title")
                .str_value()
                .map(camel_case)
                .filter(|n| !n.is_empty())
                .or_else(|| locus.map(camel_case).filter(|n| !n.is_empty()))
                .unwrap_or_default();
            // a trivial schema with no computed name stays nameless and
            // collapses into its parent at the type level
            if !name.is_empty() {
                schema.name = name;
                schema.scope = scope.to_string();
            }
        }
        Ok(schema)
    }

    fn resolve_ref(&mut self, ref_path: &str, ref_node: &Node) -> anyhow::Result<TypeUsage> {
        if let Some(usage) = self.translator.ref_mapping(ref_path) {
            return Ok(usage);
        }
        let referenced = self
            .translator
            .process_file(Path::new(ref_path), &self.model.file_dir)?;
        let Some(name) = referenced.last_schema_name() else {
            return Err(Error::structural(
                ref_node.loc(),
                format!("$ref target '{ref_path}' defines no schemas"),
            )
            .into());
        };
        let mut usage = TypeUsage::reference("", name);
        if let Some(primary) = referenced.primary_dst_file() {
            usage.add_import(primary.display().to_string());
        }
        Ok(usage)
    }

    pub(crate) fn generic_object(&self, node: &Node) -> anyhow::Result<TypeUsage> {
        self.translator
            .map_type("object", "", None)
            .ok_or_else(|| Error::mapping(node.loc(), "Unknown type 'object'").into())
    }

    pub(crate) fn model_mut(&mut self) -> &mut Model {
        self.model
    }
}
