#![allow(clippy::unwrap_used, clippy::expect_used)]

use schemabind::config::GenConfig;
use schemabind::translate::Translator;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const RULES: &str = r#"
types:
  - type: string
    formats:
      - format: ""
        attributes: { type: "String" }
  - type: integer
    formats:
      - format: "/.*/"
        attributes: { type: "i64" }
  - type: boolean
    formats:
      - format: ""
        attributes: { type: "bool" }
  - type: array
    formats:
      - format: ""
        attributes: { type: "Vec" }
  - type: map
    formats:
      - format: ""
        attributes: { type: "HashMap" }
        imports: ["std::collections::HashMap"]
  - type: object
    formats:
      - format: ""
        attributes: { type: "Value" }
identifiers:
  - pattern: "Event/event_id"
    rename: eventId
templates:
  outputs:
    - template: model.j2
      dst: "{stem}.rs"
"#;

fn translator() -> Translator {
    let config: GenConfig = serde_yaml::from_str(RULES).unwrap();
    Translator::new(config).unwrap()
}

fn write(dir: &TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).unwrap();
}

#[test]
fn test_titled_data_document_registers_a_schema() {
    let dir = tempdir().unwrap();
    write(
        &dir,
        "event.yaml",
        r#"title: Event
type: object
required: [event_id]
properties:
  event_id:
    type: string
  depth:
    type: integer
    default: 0
"#,
    );

    let t = translator();
    let model = t
        .process_file(Path::new("event.yaml"), dir.path())
        .unwrap();

    assert_eq!(model.types.len(), 1);
    let schema = &model.types[0];
    assert_eq!(schema.name, "Event");
    assert_eq!(schema.fields.len(), 2);
    assert_eq!(schema.fields[0].name, "event_id");
    assert!(schema.fields[0].required);
    assert_eq!(schema.fields[1].name, "depth");
    assert!(!schema.fields[1].required);
    assert_eq!(schema.fields[1].default_value.as_deref(), Some("0"));
    assert_eq!(model.last_schema_name(), Some("Event"));
    assert_eq!(
        model.primary_dst_file(),
        Some(Path::new("event.rs"))
    );
}

#[test]
fn test_untitled_document_is_named_after_the_file() {
    let dir = tempdir().unwrap();
    write(
        &dir,
        "room_event.yaml",
        "type: object\nproperties:\n  sender:\n    type: string\n",
    );

    let t = translator();
    let model = t
        .process_file(Path::new("room_event.yaml"), dir.path())
        .unwrap();
    assert_eq!(model.last_schema_name(), Some("RoomEvent"));
}

#[test]
fn test_identifier_rules_rename_fields_in_scope() {
    let dir = tempdir().unwrap();
    // scope for a data document schema is empty, so the scoped rule
    // "Event/event_id" does not fire; the name passes through
    write(
        &dir,
        "event.yaml",
        "title: Event\ntype: object\nproperties:\n  event_id:\n    type: string\n",
    );

    let t = translator();
    let model = t.process_file(Path::new("event.yaml"), dir.path()).unwrap();
    assert_eq!(model.types[0].fields[0].target_name, "event_id");
}

#[test]
fn test_nested_ref_collapses_to_the_referenced_type() {
    let dir = tempdir().unwrap();
    write(
        &dir,
        "event.yaml",
        "title: Event\ntype: object\nproperties:\n  event_id:\n    type: string\n",
    );
    write(
        &dir,
        "timeline.yaml",
        r#"title: Timeline
type: object
properties:
  event:
    $ref: "event.yaml"
"#,
    );

    let t = translator();
    let model = t
        .process_file(Path::new("timeline.yaml"), dir.path())
        .unwrap();

    let schema = &model.types[0];
    assert_eq!(schema.name, "Timeline");
    let field = &schema.fields[0];
    assert_eq!(field.ty.name, "Event");
    // the referenced document's primary output becomes an import
    assert!(field.ty.imports.contains("event.rs"));
    assert_eq!(t.files_processed(), 2);
}

#[test]
fn test_all_of_parents_keep_document_order() {
    let dir = tempdir().unwrap();
    write(
        &dir,
        "event.yaml",
        "title: Event\ntype: object\nproperties:\n  event_id:\n    type: string\n",
    );
    write(
        &dir,
        "state.yaml",
        "title: StateBase\ntype: object\nproperties:\n  state_key:\n    type: string\n",
    );
    write(
        &dir,
        "state_event.yaml",
        r#"title: StateEvent
type: object
allOf:
  - $ref: "event.yaml"
  - $ref: "state.yaml"
properties:
  prev_content:
    type: object
    additionalProperties: true
"#,
    );

    let t = translator();
    let model = t
        .process_file(Path::new("state_event.yaml"), dir.path())
        .unwrap();

    let schema = &model.types[0];
    assert_eq!(schema.name, "StateEvent");
    let parents: Vec<&str> = schema.parents.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(parents, vec!["Event", "StateBase"]);
}

#[test]
fn test_array_properties_wrap_the_element_type() {
    let dir = tempdir().unwrap();
    write(
        &dir,
        "room.yaml",
        r#"title: Room
type: object
properties:
  aliases:
    type: array
    items:
      type: string
  members:
    type: array
    title: member list
    items:
      type: string
"#,
    );

    let t = translator();
    let model = t.process_file(Path::new("room.yaml"), dir.path()).unwrap();
    let field = &model.types[0].fields[0];
    assert_eq!(field.ty.name, "[string]");
    assert_eq!(field.ty.attributes.get("type").unwrap(), "Vec");
    assert_eq!(field.ty.inner_types.len(), 1);
    assert_eq!(field.ty.inner_types[0].name, "string");
    // a title overrides the bracket naming
    assert_eq!(model.types[0].fields[1].ty.name, "MemberList");
}

#[test]
fn test_additional_properties_map_naming() {
    let dir = tempdir().unwrap();
    write(
        &dir,
        "content.yaml",
        r#"title: Content
type: object
properties:
  tags:
    type: object
    additionalProperties:
      type: string
  extra:
    type: object
    additionalProperties: true
"#,
    );

    let t = translator();
    let model = t
        .process_file(Path::new("content.yaml"), dir.path())
        .unwrap();
    let fields = &model.types[0].fields;

    let tags = &fields[0].ty;
    assert_eq!(tags.name, "{string:string}");
    assert_eq!(tags.attributes.get("type").unwrap(), "HashMap");
    assert!(tags.imports.contains("std::collections::HashMap"));
    assert_eq!(tags.inner_types[0].name, "string");

    // bare `additionalProperties: true` is a generic map
    let extra = &fields[1].ty;
    assert_eq!(extra.attributes.get("type").unwrap(), "HashMap");
    assert!(extra.inner_types.is_empty());
}

#[test]
fn test_malformed_additional_properties_is_rejected() {
    let dir = tempdir().unwrap();
    write(
        &dir,
        "bad.yaml",
        "title: Bad\ntype: object\nproperties:\n  x:\n    type: object\n    additionalProperties: 42\n",
    );

    let t = translator();
    let err = t.process_file(Path::new("bad.yaml"), dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("malformed additionalProperties"));
}

#[test]
fn test_unknown_type_reports_file_and_line() {
    let dir = tempdir().unwrap();
    write(
        &dir,
        "weird.yaml",
        "title: Weird\ntype: object\nproperties:\n  blob:\n    type: file\n",
    );

    let t = translator();
    let err = t
        .process_file(Path::new("weird.yaml"), dir.path())
        .unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("Unknown type 'file'"), "{msg}");
    // the location points at the `blob:` key that introduces the property
    assert!(msg.contains("weird.yaml:4"), "{msg}");
}
