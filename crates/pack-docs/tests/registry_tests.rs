//! Integration tests for profile registry section surgery.

use chrono::{TimeZone, Utc};
use pack_docs::registry::{ProfileEntry, insert_section, remove_section, replace_section};
use pretty_assertions::assert_eq;

const LAUNCHER_PROFILES: &str = r#"{
  "profiles" : {
    "X" : {},
    "X": {
      "created" : "2024-01-01T00:00:00.000Z",
      "lastVersionId" : "1.21.6",
      "name" : "Old",
      "resolution" : { "width" : 854, "height" : 480 }
    },
    "Y": {
      "icon" : "Furnace",
      "name" : "Vanilla",
      "type" : "latest-release"
    }
  },
  "settings" : {
    "enableSnapshots" : false
  },
  "version" : 3
}"#;

fn y_section(doc: &str) -> &str {
    let start = doc.find("\"Y\":").unwrap();
    let end = start + doc[start..].find('}').unwrap();
    &doc[start..=end]
}

fn entry(key: &str) -> ProfileEntry {
    ProfileEntry {
        key: key.to_string(),
        name: "Pack 1.21.6".to_string(),
        game_dir: r"C:\Users\me\AppData\Roaming\.minecraft_pack".to_string(),
        icon: "Furnace".to_string(),
        java_args: "-Xmx4G".to_string(),
        last_version_id: "fabric-loader-0.16.14-1.21.6".to_string(),
        created: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
    }
}

#[test]
fn test_remove_then_insert_keeps_sibling_bytes() {
    let before_y = y_section(LAUNCHER_PROFILES).to_string();

    let removed = remove_section(LAUNCHER_PROFILES, "X").unwrap().unwrap();
    assert!(!removed.contains("\"Old\""));

    let block = entry("X").render();
    let inserted = insert_section(&removed, "profiles", &block).unwrap();

    assert!(inserted.contains("\"lastVersionId\": \"fabric-loader-0.16.14-1.21.6\""));
    assert_eq!(y_section(&inserted), before_y);
    assert!(inserted.contains("\"enableSnapshots\" : false"));
}

#[test]
fn test_remove_spans_nested_objects() {
    let removed = remove_section(LAUNCHER_PROFILES, "X").unwrap().unwrap();
    assert!(!removed.contains("resolution"));
    assert!(removed.contains("\"settings\""));
}

#[test]
fn test_key_with_space_before_colon_is_not_matched() {
    // `"X" :` is not the `"X":` anchor, so only the second section goes.
    let removed = remove_section(LAUNCHER_PROFILES, "X").unwrap().unwrap();
    assert!(removed.contains("\"X\" : {}"));
}

#[test]
fn test_replace_section_is_idempotent() {
    let block = entry("Pack").render();
    let stale = ["fabric-loader-1.21.6"];

    let once = replace_section(LAUNCHER_PROFILES, "Pack", &stale, "profiles", &block).unwrap();
    let twice = replace_section(&once, "Pack", &stale, "profiles", &block).unwrap();

    assert_eq!(once, twice);
    assert_eq!(once.matches("\"Pack\":").count(), 1);
}

#[test]
fn test_replace_section_removes_stale_keys() {
    let doc = r#"{"profiles": {
    "fabric-loader-1.21.6": {"lastVersionId": "fabric-loader-0.15.0-1.21.6"},
    "Y": {}
}}"#;
    let stale = ["fabric-loader-1.21.6"];
    let block = entry("Pack").render();

    let result = replace_section(doc, "Pack", &stale, "profiles", &block).unwrap();

    assert!(!result.contains("fabric-loader-0.15.0"));
    assert!(result.contains("\"Y\": {}"));
    assert!(result.contains("\"Pack\": {"));
}

#[test]
fn test_render_escapes_windows_paths() {
    let rendered = entry("Pack").render();

    assert!(rendered.starts_with("    \"Pack\": {\n"));
    assert!(rendered.contains(r#""gameDir": "C:\\Users\\me\\AppData\\Roaming\\.minecraft_pack""#));
    assert!(rendered.contains("\"created\": \"2025-06-01T12:00:00.000Z\""));
    assert!(rendered.contains("\"lastUsed\": \"2025-06-01T12:00:00.000Z\""));
    assert!(rendered.ends_with("\"type\": \"custom\"\n    }"));
}

#[test]
fn test_rendered_document_is_valid_json() {
    let block = entry("Pack").render();
    let result = replace_section(LAUNCHER_PROFILES, "Pack", &["X"], "profiles", &block).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
    assert_eq!(parsed["profiles"]["Pack"]["type"], "custom");
    assert_eq!(parsed["profiles"]["Y"]["name"], "Vanilla");
}
