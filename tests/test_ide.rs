//! Tests for the IDE layer: goto-definition, completion, find-references,
//! and loading a workspace from disk.

mod helpers;

use std::fs;
use std::path::{Path, PathBuf};

use goscope::TextSize;
use goscope::hir::{LookupKind, ResolverConfig};
use goscope::ide::AnalysisHost;
use goscope::project::{WorkspaceLoader, sdk_loader};
use helpers::Fixture;
use rstest::rstest;
use tempfile::TempDir;

// =============================================================================
// GOTO DEFINITION
// =============================================================================

#[test]
fn test_goto_definition_on_type_reference() {
    let fixture = Fixture::single("package p\n\ntype Vehicle struct{}\n\nvar car $0Vehicle\n");
    let (file, offset) = fixture.cursor();

    let target = fixture
        .host
        .analysis()
        .goto_definition(file, offset)
        .expect("Vehicle should resolve");

    assert_eq!(target.name, "Vehicle");
    assert_eq!(target.kind, LookupKind::Type);
    assert_eq!(target.file, Some(file));
    assert_eq!(target.path.as_deref(), Some(Path::new("/p/a.go")));

    let text = fixture.host.workspace().file(file).unwrap().text().clone();
    let focus = target.focus_range.unwrap();
    assert_eq!(&text[focus], "Vehicle");
    assert!(target.full_range.unwrap().contains_range(focus));
}

#[test]
fn test_goto_definition_on_import_string_targets_directory() {
    let fixture = Fixture::new(
        ResolverConfig::new().with_sdk_src("/sdk/src"),
        &[
            ("/sdk/src/fmt/print.go", "package fmt\n"),
            ("/app/main.go", "package main\n\nimport $0\"fmt\"\n"),
        ],
    );
    let (file, offset) = fixture.cursor();

    let target = fixture.host.analysis().goto_definition(file, offset).unwrap();
    assert_eq!(target.file, None);
    assert_eq!(target.kind, LookupKind::Package);
    assert_eq!(target.path, Some(PathBuf::from("/sdk/src/fmt")));
}

#[test]
fn test_goto_definition_off_reference_is_none() {
    let fixture = Fixture::single("package p\n\nfunc $0f() {}\n");
    let (file, offset) = fixture.cursor();

    assert!(fixture.host.analysis().goto_definition(file, offset).is_none());
}

// =============================================================================
// COMPLETION
// =============================================================================

const STRUCT_SOURCE: &str = "package p\n\ntype S struct {\n\tName string\n\tNage int\n\tAge int\n}\n\nfunc f(s S) {\n\ts.CURSOR\n}\n";

#[rstest]
#[case("$0", &["Name", "Nage", "Age"])]
#[case("Na$0", &["Name", "Nage"])]
#[case("Ag$0", &["Age"])]
#[case("Zz$0", &[])]
fn test_member_completion_filters_by_prefix(#[case] typed: &str, #[case] expected: &[&str]) {
    let fixture = Fixture::single(&STRUCT_SOURCE.replace("CURSOR", typed));
    let (file, offset) = fixture.cursor();

    let labels: Vec<_> = fixture
        .host
        .analysis()
        .completions(file, offset)
        .into_iter()
        .map(|item| item.label.to_string())
        .collect();
    assert_eq!(labels, expected);
}

#[test]
fn test_completion_detail_is_declared_type() {
    let fixture = Fixture::single(&STRUCT_SOURCE.replace("CURSOR", "Nam$0"));
    let (file, offset) = fixture.cursor();

    let items = fixture.host.analysis().completions(file, offset);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind, LookupKind::Field);
    assert_eq!(items[0].detail.as_deref(), Some("string"));
}

#[test]
fn test_unqualified_completion_offers_shadowing_declaration_once() {
    let fixture = Fixture::single("package p\n\nvar x = 1\n\nfunc f() {\n\tx := 2\n\t_ = x\n\t$0\n}\n");
    let (file, offset) = fixture.cursor();

    let items = fixture.host.analysis().completions(file, offset);
    let labels: Vec<_> = items.iter().map(|item| item.label.as_str()).collect();
    assert_eq!(labels, vec!["x", "f"]);
    assert_eq!(items[0].kind, LookupKind::Variable);
    assert!(items[0].sort_priority < items[1].sort_priority);
}

// =============================================================================
// FIND REFERENCES
// =============================================================================

#[rstest]
#[case::from_declaration("func $0Helper() int { return 1 }", "func g() int { return Helper() }")]
#[case::from_usage("func Helper() int { return 1 }", "func g() int { return $0Helper() }")]
fn test_find_references_across_package_files(#[case] declaration: &str, #[case] usage: &str) {
    let a = format!("package p\n\n{}\n\nfunc f() int {{ return Helper() + Helper() }}\n", declaration);
    let b = format!("package p\n\n{}\n", usage);
    let fixture = Fixture::new(
        ResolverConfig::new(),
        &[("/p/a.go", a.as_str()), ("/p/b.go", b.as_str())],
    );
    let (file, offset) = fixture.cursor();

    let result = fixture.host.analysis().find_references(file, offset);
    assert_eq!(result.len(), 3);
    assert_eq!(
        result.declaration.as_ref().and_then(|d| d.name()).as_deref(),
        Some("Helper")
    );

    let a_file = fixture.file("/p/a.go");
    let b_file = fixture.file("/p/b.go");
    assert_eq!(result.references.iter().filter(|r| r.file == a_file).count(), 2);
    assert_eq!(result.references.iter().filter(|r| r.file == b_file).count(), 1);
}

#[test]
fn test_find_references_respects_shadowing() {
    let fixture = Fixture::single(
        "package p\n\nvar $0n = 1\n\nfunc f() int {\n\tn := 2\n\treturn n\n}\n\nfunc g() int { return n }\n",
    );
    let (file, offset) = fixture.cursor();

    let result = fixture.host.analysis().find_references(file, offset);
    assert_eq!(result.len(), 1);
}

// =============================================================================
// HOST AND LOADING
// =============================================================================

#[test]
fn test_removed_file_no_longer_resolves() {
    let mut fixture = Fixture::new(
        ResolverConfig::new(),
        &[
            ("/p/a.go", "package p\n\nvar v = $0helper\n"),
            ("/p/b.go", "package p\n\nvar helper = 1\n"),
        ],
    );
    assert!(fixture.resolve().is_some());

    assert!(fixture.host.remove_file("/p/b.go").is_some());
    assert!(fixture.resolve().is_none());
}

fn write(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

#[test]
fn test_loaded_workspace_resolves_across_packages() {
    let gopath = TempDir::new().unwrap();
    write(gopath.path(), "src/lib/lib.go", "package lib\n\nfunc Do() {}\n");
    let main_text = "package main\n\nimport \"lib\"\n\nfunc main() {\n\tlib.Do()\n}\n";
    write(gopath.path(), "src/app/main.go", main_text);

    let mut host = AnalysisHost::new(ResolverConfig::new().with_gopath(gopath.path()));
    let loaded = WorkspaceLoader::new().load_directory(gopath.path(), &mut host).unwrap();
    assert_eq!(loaded, 2);

    let main = host.file_id(gopath.path().join("src/app/main.go")).unwrap();
    let offset = TextSize::new(main_text.find("Do()").unwrap() as u32);
    let target = host.analysis().goto_definition(main, offset).unwrap();

    assert_eq!(target.name, "Do");
    assert_eq!(target.path, Some(gopath.path().join("src/lib/lib.go")));
}

#[test]
fn test_sdk_builtin_is_the_last_fallback() {
    let sdk = TempDir::new().unwrap();
    write(sdk.path(), "builtin/builtin.go", "package builtin\n\ntype error interface {\n\tError() string\n}\n");

    let mut host = AnalysisHost::default();
    assert_eq!(sdk_loader::load_into_host(sdk.path(), &mut host).unwrap(), 1);

    let text = "package p\n\nfunc f() error { return nil }\n";
    let file = host.set_file_text("/p/a.go", text);
    let offset = TextSize::new(text.find("error").unwrap() as u32);
    let target = host.analysis().goto_definition(file, offset).unwrap();

    assert_eq!(target.kind, LookupKind::Type);
    assert_eq!(target.path, Some(sdk.path().join("builtin/builtin.go")));
}
