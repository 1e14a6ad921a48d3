use pack_fs::{Error, NormalizedPath};
use rstest::rstest;

#[test]
fn test_join_resolves_dots() {
    let base = NormalizedPath::new("/a/b");

    assert_eq!(base.join("c").as_str(), "/a/b/c");
    assert_eq!(base.join("./c").as_str(), "/a/b/c");
    assert_eq!(base.join("../c").as_str(), "/a/c");
    assert_eq!(base.join("../../c").as_str(), "/c");
}

#[test]
fn test_backslashes_are_normalized() {
    let path = NormalizedPath::new(r"C:\Users\me\AppData\.minecraft");
    assert_eq!(path.as_str(), "C:/Users/me/AppData/.minecraft");
}

#[test]
fn test_resolve_under_nested_segments() {
    let root = NormalizedPath::new("/games/pack");
    let resolved = root.resolve_under("config/sub/file.txt").unwrap();

    assert_eq!(resolved.as_str(), "/games/pack/config/sub/file.txt");
    assert!(resolved.is_within(&root));
}

#[rstest]
#[case("../evil.txt")]
#[case("mods/../../evil.txt")]
#[case(r"..\..\evil.txt")]
#[case("/etc/passwd")]
#[case("C:/Windows/evil.dll")]
fn test_resolve_under_rejects_escapes(#[case] relative: &str) {
    let root = NormalizedPath::new("/games/pack");
    let result = root.resolve_under(relative);

    assert!(
        matches!(result, Err(Error::PathEscapesRoot { .. })),
        "expected {relative} to be rejected, got {result:?}"
    );
}

#[test]
fn test_resolve_under_allows_inner_parent_segments() {
    let root = NormalizedPath::new("/games/pack");
    let resolved = root.resolve_under("mods/old/../new.jar").unwrap();
    assert_eq!(resolved.as_str(), "/games/pack/mods/new.jar");
}

#[test]
fn test_is_within_requires_segment_boundary() {
    let root = NormalizedPath::new("/games/pack");
    let sibling = NormalizedPath::new("/games/pack-evil/file");

    assert!(!sibling.is_within(&root));
    assert!(root.is_within(&root));
}

#[test]
fn test_parent_and_file_name() {
    let path = NormalizedPath::new("/games/pack/mods/a.jar");

    assert_eq!(path.file_name(), Some("a.jar"));
    assert_eq!(path.parent().unwrap().as_str(), "/games/pack/mods");
    assert_eq!(NormalizedPath::new("/a").parent().unwrap().as_str(), "/");
    assert_eq!(NormalizedPath::new("/").parent(), None);
}

#[test]
fn test_canonical_of_missing_directory_fails() {
    let result = NormalizedPath::canonical("/definitely/not/here/packsync");
    assert!(matches!(result, Err(Error::Io { .. })));
}
