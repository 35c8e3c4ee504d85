//! Integration tests for settings files and their effect on built trees.

use std::fs;
use tempfile::TempDir;
use tree_interval::config::{load_from_path, ConfigError};
use tree_interval::{SyntaxTreeBuilder, TreeIndex};

#[test]
fn settings_file_drives_builder() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tree-interval.toml");
    fs::write(
        &path,
        r#"
[tree]
indent_size = 2
start_lineno = 5

[builder]
include_comments = false
"#,
    )
    .unwrap();

    let settings = load_from_path(&path).unwrap();
    let tree = SyntaxTreeBuilder::new("snippet.py", "# header\nx = 1\n")
        .with_settings(&settings)
        .build()
        .unwrap();

    assert!(tree.iter().all(|node| node.info().kind != "comment"));
    let x = tree.find_best_match(9, 10).unwrap();
    assert_eq!(tree[x].position().lineno(), 6);

    let pretty = tree.to_json_pretty().unwrap();
    assert!(pretty.contains("\n  \"source\""));
    let back: TreeIndex<tree_interval::SyntaxInfo> = TreeIndex::from_json(&pretty).unwrap();
    assert_eq!(back.config().start_lineno, Some(5));
}

#[test]
fn errors_name_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[tree]\nindent_size = \"wide\"\n").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Toml { path: Some(_), .. }));
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn unknown_sections_are_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("extra.toml");
    fs::write(&path, "[renderer]\ncolor = true\n").unwrap();
    assert!(load_from_path(&path).is_ok());
}
