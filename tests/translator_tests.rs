#![allow(clippy::unwrap_used, clippy::expect_used)]

use schemabind::config::GenConfig;
use schemabind::translate::Translator;

fn translator(yaml: &str) -> Translator {
    let config: GenConfig = serde_yaml::from_str(yaml).unwrap();
    Translator::new(config).unwrap()
}

const RULES: &str = r#"
types:
  - type: string
    formats:
      - format: ""
        attributes: { type: "String" }
      - format: binary
        attributes: { type: "Vec<u8>" }
      - format: "/^date/"
        attributes: { type: "SystemTime" }
        imports: ["std::time::SystemTime"]
  - type: integer
    formats:
      - format: "/.*/"
        attributes: { type: "i64" }
  - type: array
    formats:
      - format: ""
        attributes: { type: "Vec" }
identifiers:
  - pattern: type
    rename: kind
  - pattern: "Event/event_id"
    rename: eventId
  - pattern: "/^.*/_[a-z_]+$/"
    rename: ""
  - pattern: "/^.*/(raw)_(data)$/"
    rename: "$1$2"
refs:
  - ref: "definitions/error.yaml"
    name: ApiError
    scope: errors
    imports: ["errors.rs"]
"#;

#[test]
fn test_map_type_first_matching_format_wins() {
    let t = translator(RULES);
    let plain = t.map_type("string", "", None).unwrap();
    assert_eq!(plain.attributes.get("type").unwrap(), "String");
    let binary = t.map_type("string", "binary", None).unwrap();
    assert_eq!(binary.attributes.get("type").unwrap(), "Vec<u8>");
    // regex entries match later in declaration order
    let date = t.map_type("string", "date-time", None).unwrap();
    assert_eq!(date.attributes.get("type").unwrap(), "SystemTime");
    assert!(date.imports.contains("std::time::SystemTime"));
}

#[test]
fn test_map_type_unknown_pair_is_none() {
    let t = translator(RULES);
    assert!(t.map_type("file", "", None).is_none());
    // known type, unmatched format
    assert!(t.map_type("array", "tuple", None).is_none());
}

#[test]
fn test_identifier_literal_rules() {
    let t = translator(RULES);
    // bare literal matches in any scope
    assert_eq!(t.map_identifier("type", "Event", false).unwrap(), "kind");
    assert_eq!(t.map_identifier("type", "Room", false).unwrap(), "kind");
    // scoped literal matches only its scope
    assert_eq!(t.map_identifier("event_id", "Event", false).unwrap(), "eventId");
    assert_eq!(t.map_identifier("event_id", "Room", false).unwrap(), "event_id");
}

#[test]
fn test_identifier_regex_capture_groups() {
    let t = translator(RULES);
    assert_eq!(t.map_identifier("raw_data", "Event", false).unwrap(), "rawdata");
}

#[test]
fn test_identifier_no_rule_passes_through() {
    let t = translator(RULES);
    assert_eq!(t.map_identifier("sender", "Event", false).unwrap(), "sender");
}

#[test]
fn test_identifier_drop_rule() {
    let t = translator(RULES);
    // underscore-prefixed names are dropped
    assert_eq!(t.map_identifier("_internal", "Event", false).unwrap(), "");
    // dropping a required identifier is a configuration error
    let err = t.map_identifier("_internal", "Event", true).unwrap_err();
    assert!(err.to_string().contains("Event/_internal"));
}

#[test]
fn test_configured_ref_scope_and_imports_survive() {
    let t = translator(RULES);
    let usage = t.ref_mapping("definitions/error.yaml").unwrap();
    assert_eq!(usage.name, "ApiError");
    assert_eq!(usage.scope, "errors");
    assert!(usage.imports.contains("errors.rs"));
}

#[test]
fn test_invalid_rule_regex_fails_at_construction() {
    let config: GenConfig = serde_yaml::from_str(
        "identifiers:\n  - pattern: \"/([unclosed/\"\n    rename: x\n",
    )
    .unwrap();
    assert!(Translator::new(config).is_err());
}
