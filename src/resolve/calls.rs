//! Operations-document walking: one [`Call`] per `(path, verb)` row,
//! grouped into call classes by the resolved class name.

use super::{camel_case, Resolver};
use crate::error::Error;
use crate::model::{Direction, Model, TypeUsage, VarDecl};
use crate::node::Node;
use crate::translate::Translator;
use anyhow::Context;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// HTTP verbs recognized in an operations document. Anything else under a
/// path item (`parameters`, `x-` extensions, ...) is skipped.
const VERBS: [&str; 7] = ["get", "post", "put", "delete", "patch", "head", "options"];

/// Literal paths whose class names are fixed up front, before any pattern
/// rule is consulted.
const SPECIAL_PATHS: [(&str, &str); 3] =
    [("/sync", "Sync"), ("/login", "Login"), ("/logout", "Logout")];

struct NameRule {
    path: Regex,
    verb: Regex,
    /// `$1` is replaced with the camel-cased path capture
    template: &'static str,
}

fn name_rules() -> &'static [NameRule] {
    static RULES: OnceLock<Vec<NameRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        let trailing_param = r"^.*/([A-Za-z0-9_.-]+)/\{[^}]+\}/?$";
        let rule = |path: &str, verb: &str, template: &'static str| NameRule {
            path: Regex::new(path).expect("naming rule path regex is valid"),
            verb: Regex::new(verb).expect("naming rule verb regex is valid"),
            template,
        };
        vec![
            rule(trailing_param, "^get$", "Get$1"),
            rule(trailing_param, "^delete$", "Delete$1"),
            rule(trailing_param, "^put$", "Set$1"),
        ]
    })
}

/// Resolve the generated class name for one `(path, verb)` row.
///
/// Special-cased literal paths first, then the ordered pattern rules,
/// then a fallback of camel-cased verb plus the last literal path
/// segment. This function is the collision point: distinct paths mapping
/// to the same name become overloads of one call class.
pub fn class_name_for(path: &str, verb: &str) -> String {
    for (literal, name) in SPECIAL_PATHS {
        if path == literal {
            return name.to_string();
        }
    }
    for rule in name_rules() {
        if rule.verb.is_match(verb) {
            if let Some(caps) = rule.path.captures(path) {
                let segment = camel_case(caps.get(1).map(|m| m.as_str()).unwrap_or_default());
                return rule.template.replace("$1", &segment);
            }
        }
    }
    let last_literal = path
        .split('/')
        .rev()
        .find(|s| !s.is_empty() && !s.starts_with('{'))
        .unwrap_or("root");
    format!("{}{}", camel_case(verb), camel_case(last_literal))
}

fn string_list(node: &Node) -> anyhow::Result<Vec<String>> {
    if !node.is_defined() {
        return Ok(Vec::new());
    }
    Ok(node
        .as_seq()?
        .iter()
        .filter_map(|n| n.str_value().map(String::from))
        .collect())
}

/// Walk an operations document (a map with `paths`) into the model.
pub(crate) fn resolve_operations(
    translator: &Translator,
    doc: &Node,
    model: &mut Model,
) -> anyhow::Result<()> {
    let version_node = doc.require("swagger")?;
    let version = version_node.scalar_string().unwrap_or_default();
    // an unquoted `swagger: 2.0` parses as a number, not the string "2.0"
    if version != "2.0" && version_node.number_value() != Some(2.0) {
        return Err(Error::config(format!(
            "unsupported swagger version '{}' in {}",
            version, model.src_filename
        ))
        .into());
    }

    model.host = doc.get("host").str_value().unwrap_or("").to_string();
    model.base_path = doc.get("basePath").str_value().unwrap_or("").to_string();
    let doc_consumes = string_list(doc.get("consumes"))?;
    let doc_produces = string_list(doc.get("produces"))?;
    let doc_security = doc.get("security").is_defined();

    for (path, path_node) in doc.require("paths")?.as_map()? {
        for (verb, operation) in path_node.as_map()? {
            if !VERBS.contains(&verb.as_str()) {
                continue;
            }
            resolve_operation(
                translator,
                model,
                path,
                verb,
                operation,
                &doc_consumes,
                &doc_produces,
                doc_security,
            )
            .with_context(|| format!("in operation {} {}", verb, path))?;
        }
    }
    Ok(())
}

/// Resolved parameter blocks for one operation, built before the call is
/// appended so schema registration does not fight the call borrow.
#[derive(Default)]
struct ParamBlocks {
    path: Vec<VarDecl>,
    query: Vec<VarDecl>,
    header: Vec<VarDecl>,
    body: Vec<VarDecl>,
    inline_body: bool,
}

/// The sole parent of a trivial (pure-alias) schema, `None` otherwise.
fn trivial_parent(schema: crate::model::ObjectSchema) -> Option<TypeUsage> {
    if schema.trivial() {
        schema.parents.into_iter().next()
    } else {
        None
    }
}

#[allow(clippy::too_many_arguments)]
fn resolve_operation(
    translator: &Translator,
    model: &mut Model,
    path: &str,
    verb: &str,
    operation: &Node,
    doc_consumes: &[String],
    doc_produces: &[String],
    doc_security: bool,
) -> anyhow::Result<()> {
    let class_name = class_name_for(path, verb);
    let scope = class_name.clone();
    let needs_auth = operation.get("security").is_defined() || doc_security;

    let mut blocks = ParamBlocks::default();
    let mut responses: Vec<TypeUsage> = Vec::new();
    {
        let mut resolver = Resolver::new(translator, model);

        if operation.has("parameters") {
            for param in operation.get("parameters").as_seq()? {
                resolve_parameter(translator, &mut resolver, param, &scope, &mut blocks)?;
            }
        }

        if operation.has("responses") {
            for (status, response) in operation.get("responses").as_map()? {
                // only success responses contribute a body type
                if !status.starts_with('2') {
                    continue;
                }
                let schema_node = response.get("schema");
                if schema_node.is_defined() {
                    let ty = resolver.resolve_top_type(schema_node, Direction::Out, &scope)?;
                    if !ty.is_empty() {
                        responses.push(ty);
                    }
                }
            }
        }
    }

    let mut consumes = string_list(operation.get("consumes"))?;
    if consumes.is_empty() {
        consumes = doc_consumes.to_vec();
    }
    let mut produces = string_list(operation.get("produces"))?;
    if produces.is_empty() {
        produces = doc_produces.to_vec();
    }

    let call = model.add_call(path, verb, &class_name, needs_auth);
    if let Some(operation_id) = operation.get("operationId").str_value() {
        call.name = operation_id.to_string();
    }
    call.path_params = blocks.path;
    call.query_params = blocks.query;
    call.header_params = blocks.header;
    call.body_params = blocks.body;
    call.inline_body = blocks.inline_body;
    call.responses = responses;
    call.consumes = consumes;
    call.produces = produces;
    Ok(())
}

fn resolve_parameter(
    translator: &Translator,
    resolver: &mut Resolver<'_>,
    param: &Node,
    scope: &str,
    blocks: &mut ParamBlocks,
) -> anyhow::Result<()> {
    let name = param.require("name")?.as_str()?.to_string();
    let location = param.require("in")?.as_str()?.to_string();

    match location.as_str() {
        "path" | "query" | "header" => {
            let mut required = param.get("required").bool_value().unwrap_or(false);
            if location == "path" && !required {
                warn!(
                    param = %name,
                    loc = %param.loc(),
                    "path parameter is not marked required; forcing required"
                );
                required = true;
            }

            let ty = if param.has("schema") {
                // a schema where only a single-type parameter is supported
                let schema =
                    resolver.resolve_schema(param.get("schema"), Direction::In, scope, None)?;
                match trivial_parent(schema) {
                    Some(parent) => parent,
                    None => {
                        warn!(
                            param = %name,
                            loc = %param.loc(),
                            "non-trivial parameter schema; falling back to a generic object"
                        );
                        resolver.generic_object(param)?
                    }
                }
            } else {
                resolver.resolve_type(param, Direction::In, scope)?
            };

            let target = translator.map_identifier(&name, scope, required)?;
            if target.is_empty() {
                debug!(param = %name, scope, "parameter dropped by identifier rule");
                return Ok(());
            }
            let mut decl = VarDecl::new(name, target, ty, required);
            decl.default_value = param.get("default").scalar_string();
            match location.as_str() {
                "path" => blocks.path.push(decl),
                "query" => blocks.query.push(decl),
                _ => blocks.header.push(decl),
            }
            Ok(())
        }
        "body" => {
            let required = param.get("required").bool_value().unwrap_or(false);
            let schema_node = param.require("schema")?;
            let schema = resolver.resolve_schema(schema_node, Direction::In, scope, None)?;

            if !schema.fields.is_empty() {
                if schema.has_name() {
                    resolver.model_mut().add_schema(schema.clone());
                }
                blocks.body = schema.fields;
                blocks.inline_body = false;
            } else if let Some(ty) = trivial_parent(schema) {
                let target = translator.map_identifier(&name, scope, required)?;
                if !target.is_empty() {
                    blocks.body.push(VarDecl::new(name, target, ty, required));
                }
                blocks.inline_body = true;
            } else {
                // empty schema: freeform body, nothing to declare
                debug!(loc = %schema_node.loc(), "freeform request body");
            }
            Ok(())
        }
        other => Err(Error::structural(
            param.loc(),
            format!("unsupported parameter location '{other}'"),
        )
        .into()),
    }
}
