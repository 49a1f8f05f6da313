#![allow(clippy::unwrap_used, clippy::expect_used)]

use schemabind::node::load_document;
use std::fs;
use tempfile::tempdir;

const YAML_DOC: &str = r#"swagger: "2.0"
host: example.org
paths:
  /rooms/{roomId}:
    get:
      responses:
        200:
          description: OK
"#;

#[test]
fn test_yaml_document_carries_line_numbers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("api.yaml");
    fs::write(&path, YAML_DOC).unwrap();

    let doc = load_document(&path).unwrap();
    assert_eq!(doc.get("swagger").str_value(), Some("2.0"));
    assert_eq!(doc.get("host").loc().line(), 2);
    // map values report the line of the key they hang off, not their first entry
    assert_eq!(doc.get("paths").loc().line(), 3);
    assert_eq!(doc.get("paths").get("/rooms/{roomId}").loc().line(), 4);
    let op = doc.get("paths").get("/rooms/{roomId}").get("get");
    assert_eq!(op.loc().line(), 5);
    // numeric response codes become string keys
    let ok = op.get("responses").get("200");
    assert!(ok.is_defined());
    assert_eq!(ok.get("description").loc().line(), 8);
}

#[test]
fn test_map_entries_preserve_document_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ordered.yaml");
    fs::write(&path, "zeta: 1\nalpha: 2\nmiddle: 3\n").unwrap();

    let doc = load_document(&path).unwrap();
    let keys: Vec<&str> = doc
        .as_map()
        .unwrap()
        .iter()
        .map(|(k, _)| k.as_str())
        .collect();
    assert_eq!(keys, vec!["zeta", "alpha", "middle"]);
}

#[test]
fn test_json_extension_parses_as_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("defs.json");
    fs::write(
        &path,
        r#"{"title": "Event", "type": "object", "properties": {"event_id": {"type": "string"}}}"#,
    )
    .unwrap();

    let doc = load_document(&path).unwrap();
    assert_eq!(doc.get("title").str_value(), Some("Event"));
    // JSON has no line index; locations still name the file
    assert_eq!(doc.get("title").loc().line(), 0);
    assert!(doc.get("title").loc().to_string().ends_with("defs.json"));
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.yaml");
    let err = load_document(&path).unwrap_err();
    assert!(format!("{err:#}").contains("nope.yaml"));
}

#[test]
fn test_shape_errors_point_at_the_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("odd.yaml");
    fs::write(&path, "paths: just-a-string\n").unwrap();

    let doc = load_document(&path).unwrap();
    let err = doc.get("paths").as_map().unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("expected a map, found a string"), "{msg}");
    assert!(msg.contains("odd.yaml:1"), "{msg}");
}
