//! # Model Module
//!
//! The resolved output of processing one schema document: the document's
//! object schemas in registration order, its API calls grouped into call
//! classes, and file bookkeeping used for relative `$ref` resolution and
//! import statements.
//!
//! A [`Model`] is created per processed document, filled by the resolution
//! engine, and handed to the rendering stage. Everything in it derives
//! `Serialize` so rendering is a plain serde dump into a template context.

mod types;

pub use types::{Direction, ObjectSchema, TypeUsage, VarDecl};

use serde::Serialize;
use std::path::{Path, PathBuf};

/// One API operation: a `(path, verb)` row with its parameter blocks,
/// response types and content-type lists.
#[derive(Debug, Clone, Serialize)]
pub struct Call {
    pub name: String,
    pub verb: String,
    pub path: String,
    pub path_params: Vec<VarDecl>,
    pub query_params: Vec<VarDecl>,
    pub header_params: Vec<VarDecl>,
    pub body_params: Vec<VarDecl>,
    /// True when the body is a bare scalar/array rather than an object
    /// with a field list
    pub inline_body: bool,
    pub responses: Vec<TypeUsage>,
    pub produces: Vec<String>,
    pub consumes: Vec<String>,
    pub needs_auth: bool,
}

impl Call {
    fn new(name: &str, verb: &str, path: &str, needs_auth: bool) -> Self {
        Call {
            name: name.to_string(),
            verb: verb.to_string(),
            path: path.to_string(),
            path_params: Vec::new(),
            query_params: Vec::new(),
            header_params: Vec::new(),
            body_params: Vec::new(),
            inline_body: false,
            responses: Vec::new(),
            produces: Vec::new(),
            consumes: Vec::new(),
            needs_auth,
        }
    }

}

/// Consecutive calls sharing one resolved class name. Several calls in one
/// class are overloads of the same generated unit (e.g. the same logical
/// operation with and without a request body).
#[derive(Debug, Clone, Serialize)]
pub struct CallClass {
    pub class_name: String,
    pub calls: Vec<Call>,
}

/// The resolved model of one schema document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Model {
    /// Directory of the source document, base for relative `$ref`s
    pub file_dir: PathBuf,
    pub src_filename: String,
    /// Output files this model renders to; the first is the primary file
    /// other documents import
    pub dst_files: Vec<PathBuf>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub base_path: String,
    /// Registered schemas in the order encountered during resolution
    pub types: Vec<ObjectSchema>,
    pub call_classes: Vec<CallClass>,
}

impl Model {
    pub fn new(file_dir: PathBuf, src_filename: String) -> Self {
        Model {
            file_dir,
            src_filename,
            ..Model::default()
        }
    }

    /// Register a named schema. Insertion order is preserved; later stages
    /// may filter by scope.
    pub fn add_schema(&mut self, schema: ObjectSchema) {
        self.types.push(schema);
    }

    /// Name of the most recently registered schema. Cross-file `$ref`
    /// resolution imports the referenced document's last schema.
    pub fn last_schema_name(&self) -> Option<&str> {
        self.types.last().map(|s| s.name.as_str())
    }

    /// Append a call, merging it into the last call class when the class
    /// name matches. Grouping is adjacent-only: a same-named class appearing
    /// later in the document starts a fresh group.
    pub fn add_call(
        &mut self,
        path: &str,
        verb: &str,
        class_name: &str,
        needs_auth: bool,
    ) -> &mut Call {
        let start_new = self
            .call_classes
            .last()
            .map(|c| c.class_name != class_name)
            .unwrap_or(true);
        if start_new {
            self.call_classes.push(CallClass {
                class_name: class_name.to_string(),
                calls: Vec::new(),
            });
        }
        let class = self
            .call_classes
            .last_mut()
            .expect("a call class was just ensured");
        class.calls.push(Call::new(class_name, verb, path, needs_auth));
        class.calls.last_mut().expect("a call was just pushed")
    }

    pub fn primary_dst_file(&self) -> Option<&Path> {
        self.dst_files.first().map(PathBuf::as_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> Model {
        Model::new(PathBuf::from("api"), "rooms.yaml".to_string())
    }

    #[test]
    fn test_adjacent_same_class_calls_become_overloads() {
        let mut m = model();
        m.add_call("/rooms/{roomId}/join", "post", "JoinRoom", true);
        m.add_call("/join/{roomIdOrAlias}", "post", "JoinRoom", true);
        assert_eq!(m.call_classes.len(), 1);
        assert_eq!(m.call_classes[0].calls.len(), 2);
    }

    #[test]
    fn test_non_adjacent_same_class_starts_new_group() {
        let mut m = model();
        m.add_call("/rooms/{roomId}/join", "post", "JoinRoom", true);
        m.add_call("/rooms/{roomId}/leave", "post", "LeaveRoom", true);
        m.add_call("/join/{roomIdOrAlias}", "post", "JoinRoom", true);
        let names: Vec<&str> = m
            .call_classes
            .iter()
            .map(|c| c.class_name.as_str())
            .collect();
        assert_eq!(names, vec!["JoinRoom", "LeaveRoom", "JoinRoom"]);
    }

    #[test]
    fn test_last_schema_name_tracks_registration_order() {
        let mut m = model();
        assert!(m.last_schema_name().is_none());
        m.add_schema(ObjectSchema {
            name: "Event".to_string(),
            ..ObjectSchema::default()
        });
        m.add_schema(ObjectSchema {
            name: "RoomEvent".to_string(),
            ..ObjectSchema::default()
        });
        assert_eq!(m.last_schema_name(), Some("RoomEvent"));
    }
}
