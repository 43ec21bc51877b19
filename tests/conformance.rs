//! Golden-file conformance: every fixture under `tests/fixtures` must dump
//! to exactly its stored AST.

use std::path::PathBuf;

use dump_ast::config::Config;
use dump_ast::fixture::{self, Fixture};
use pretty_assertions::assert_eq;
use serde_json::Value;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

#[test]
fn test_all_fixtures_match() {
    let fixtures = fixture::load_dir(&fixture_dir()).expect("load fixtures");
    assert!(!fixtures.is_empty(), "no fixtures found");

    let config = Config::default();
    for (name, stored) in &fixtures {
        let actual = Fixture::generate(&stored.sql, &config)
            .unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_eq!(actual.ast, stored.ast, "fixture {name}");
    }
}

#[test]
fn test_fixtures_verify() {
    let config = Config::default();
    for (name, stored) in fixture::load_dir(&fixture_dir()).expect("load fixtures") {
        stored
            .verify(&name, &config)
            .unwrap_or_else(|e| panic!("{name}: {e}"));
    }
}

#[test]
fn test_output_is_deterministic() {
    for (_, stored) in fixture::load_dir(&fixture_dir()).expect("load fixtures") {
        let first = dump_ast::dump(&stored.sql).expect("dump");
        let second = dump_ast::dump(&stored.sql).expect("dump");
        assert_eq!(first, second);
    }
}

#[test]
fn test_indent_does_not_change_structure() {
    let mut wide = Config::default();
    wide.output.indent = 8;
    for (name, stored) in fixture::load_dir(&fixture_dir()).expect("load fixtures") {
        let text = dump_ast::dump_with(&stored.sql, &wide).expect("dump");
        let ast: Value = serde_json::from_str(&text).expect("valid JSON");
        assert_eq!(ast, stored.ast, "fixture {name}");
    }
}
