//! Integration tests for manifest parsing.

use pack_core::manifest::{Manifest, ManifestOperation, SkipReason};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_blank_and_comment_lines_are_ignored() {
    let manifest = Manifest::parse("\n# comment\n+a/b.txt\n-a/*.old");

    assert_eq!(
        manifest.operations,
        vec![
            ManifestOperation::Add {
                relative_path: "a/b.txt".to_string()
            },
            ManifestOperation::Remove {
                pattern: "a/*.old".to_string()
            },
        ]
    );
    assert!(manifest.skipped.is_empty());
}

#[test]
fn test_order_is_preserved() {
    let text = "-mods/sodium-*.jar\n+mods/sodium-0.6.jar\n-mods/iris-*.jar\n+mods/iris-1.8.jar\n";
    let rendered: Vec<String> = Manifest::parse(text)
        .operations
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_eq!(
        rendered,
        vec![
            "-mods/sodium-*.jar",
            "+mods/sodium-0.6.jar",
            "-mods/iris-*.jar",
            "+mods/iris-1.8.jar",
        ]
    );
}

#[rstest]
#[case("+", SkipReason::MissingOperand)]
#[case("-", SkipReason::MissingOperand)]
#[case(" ", SkipReason::MissingOperand)]
#[case("!mods/a.jar", SkipReason::UnknownOperator('!'))]
#[case(" +mods/a.jar", SkipReason::UnknownOperator(' '))]
fn test_malformed_line_is_skipped(#[case] line: &str, #[case] reason: SkipReason) {
    let manifest = Manifest::parse(&format!("+first.jar\n{}\n+last.jar\n", line));

    assert_eq!(manifest.len(), 2);
    assert_eq!(manifest.skipped.len(), 1);
    assert_eq!(manifest.skipped[0].line, 2);
    assert_eq!(manifest.skipped[0].reason, reason);
}

#[test]
fn test_empty_manifest() {
    let manifest = Manifest::parse("");
    assert!(manifest.is_empty());
    assert!(manifest.skipped.is_empty());
}
