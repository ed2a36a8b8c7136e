//! Reference resolution across scopes, embedded fields and packages.

mod helpers;

use std::path::Path;

use goscope::hir::{Declaration, ResolverConfig};
use helpers::{Fixture, owner_type};
use rstest::rstest;

// =============================================================================
// MEMBERS
// =============================================================================

#[test]
fn test_direct_field_shadows_embedded_field() {
    let fixture = Fixture::single(
        r#"package p

type Inner struct {
	Name string
}

type Outer struct {
	Inner
	Name int
}

func f(o Outer) {
	_ = o.$0Name
}
"#,
    );

    let found = fixture.resolve().expect("Name resolves");
    assert!(matches!(found, Declaration::Field(_)));
    assert_eq!(owner_type(&found).as_deref(), Some("Outer"));
}

#[rstest]
#[case("ID", Some("Inner"))]
#[case("Name", Some("Outer"))]
#[case("Inner", Some("Outer"))]
#[case("Missing", None)]
fn test_outer_inner_members(#[case] member: &str, #[case] owner: Option<&str>) {
    let source = r#"package p

type Outer struct {
	Inner
	Name string
}

type Inner struct {
	ID int
}

func f() {
	outerVal := Outer{}
	_ = outerVal.$0MEMBER
}
"#
    .replace("MEMBER", member);
    let fixture = Fixture::single(&source);

    let found = fixture.resolve();
    assert_eq!(found.as_ref().and_then(owner_type).as_deref(), owner);
    if let Some(found) = found {
        assert_eq!(found.name().as_deref(), Some(member));
    }
}

#[rstest]
#[case("*Base", "(b *Base)")]
#[case("Base", "(b Base)")]
#[case("*Base", "(Base)")]
fn test_method_promoted_through_embedding(#[case] embedded: &str, #[case] receiver: &str) {
    let source = r#"package p

type Base struct{}

func RECEIVER Close() error { return nil }

type Conn struct {
	EMBEDDED
	addr string
}

func use(c *Conn) {
	c.$0Close()
}
"#
    .replace("RECEIVER", receiver)
    .replace("EMBEDDED", embedded);
    let fixture = Fixture::single(&source);

    let Some(Declaration::Method(method)) = fixture.resolve() else {
        panic!("Close should resolve to the promoted method");
    };
    assert_eq!(method.value.receiver_type_name().as_deref(), Some("Base"));
}

#[test]
fn test_field_promoted_through_two_levels() {
    let fixture = Fixture::single(
        r#"package p

type A struct {
	B
}

type B struct {
	*C
}

type C struct {
	Deep bool
}

func f(a A) bool {
	return a.$0Deep
}
"#,
    );

    let found = fixture.resolve().expect("Deep resolves");
    assert_eq!(owner_type(&found).as_deref(), Some("C"));
}

#[test]
fn test_self_embedding_terminates() {
    let source = r#"package p

type T struct {
	T
}

func f(t T) {
	_ = t.$0MEMBER
}
"#;
    let missing = Fixture::single(&source.replace("MEMBER", "Missing"));
    assert_eq!(missing.resolve(), None);

    let embedded = Fixture::single(&source.replace("MEMBER", "T"));
    assert!(matches!(embedded.resolve(), Some(Declaration::AnonymousField(_))));
    assert_eq!(embedded.candidate_names(), vec!["T"]);
}

// The cycle check compares type text, so an embedded type whose body is
// spelled exactly like the outer one is not searched, even when it is a
// different type. There is no depth counter either: mutual embedding with
// differing bodies (`A { B }`, `B { A; X int }`) recurses until the stack
// overflows.
#[test]
fn test_identical_embedded_body_is_not_searched() {
    let fixture = Fixture::single(
        r#"package p

type A struct {
	B
}

type B struct {
	B
}

func (b B) M() {}

func f(a A) {
	_ = a.$0M
}
"#,
    );

    assert_eq!(fixture.resolve(), None);
}

#[test]
fn test_block_comments_do_not_hide_declarations() {
    let fixture = Fixture::single(
        "/* Copyright 2014 */\npackage p\n\n/* S is a thing. */\ntype S struct {\n\tName string /* the name */\n}\n\nfunc f(s S) {\n\t_ = s.$0Name\n}\n",
    );

    let (file, _) = fixture.cursor();
    let data = fixture.host.workspace().file(file).expect("file is loaded");
    assert!(data.parse().errors.is_empty());

    let found = fixture.resolve().expect("Name resolves");
    assert!(matches!(found, Declaration::Field(_)));
    assert_eq!(owner_type(&found).as_deref(), Some("S"));
}

#[test]
fn test_candidates_enumerate_embedding_depth_first() {
    let fixture = Fixture::single(
        r#"package p

type A struct {
	B
	C
	Own int
}

type B struct {
	B1 int
	B2 int
}

type C struct {
	C1, C2 int
}

func (a *A) Method() {}

func f(a A) {
	_ = a.$0Own
}
"#,
    );

    let names = fixture.candidate_names();
    assert_eq!(names, vec!["B", "C", "Own", "B1", "B2", "C1", "C2", "Method"]);
    // Two embedded structs with two fields each, plus three own fields.
    assert!(names.len() >= 2 * 2 + 3);
}

#[test]
fn test_interface_method_resolves_on_variable() {
    let fixture = Fixture::single(
        r#"package p

type Reader interface {
	Read(p []byte) (int, error)
}

func f(r Reader) {
	r.$0Read(nil)
}
"#,
    );

    assert!(matches!(fixture.resolve(), Some(Declaration::MethodSpec(_))));
}

#[test]
fn test_pointer_composite_literal_gives_variable_its_type() {
    let fixture = Fixture::single(
        r#"package p

type Server struct {
	Addr string
}

func f() {
	s := &Server{Addr: ":80"}
	_ = s.$0Addr
}
"#,
    );

    let found = fixture.resolve().expect("Addr resolves");
    assert_eq!(owner_type(&found).as_deref(), Some("Server"));
}

// =============================================================================
// UNQUALIFIED SCOPES
// =============================================================================

#[rstest]
#[case::local_wins(true, true, "/p/a.go")]
#[case::local_without_sibling(true, false, "/p/a.go")]
#[case::package_beats_builtin(false, true, "/p/b.go")]
#[case::builtin_fallback(false, false, "/sdk/src/builtin/builtin.go")]
fn test_local_shadows_package_shadows_builtin(
    #[case] local: bool,
    #[case] sibling: bool,
    #[case] expected: &str,
) {
    let main = "package p\n\nfunc f() {\n\tLOCAL\n\t_ = $0value\n}\n"
        .replace("LOCAL", if local { "value := 1" } else { "" });
    let mut files = vec![
        ("/sdk/src/builtin/builtin.go", "package builtin\n\nvar value int\n"),
        ("/p/c_test.go", "package p_test\n\nvar value = 3\n"),
        ("/p/a.go", main.as_str()),
    ];
    if sibling {
        files.push(("/p/b.go", "package p\n\nvar value = 2\n"));
    }
    let fixture = Fixture::new(ResolverConfig::new().with_sdk_src("/sdk/src"), &files);

    let found = fixture.resolve().expect("value resolves");
    assert!(matches!(found, Declaration::Var(_)));
    assert_eq!(fixture.path_of(&found), Some(Path::new(expected)));
}

#[test]
fn test_builtin_file_does_not_fall_back_to_itself() {
    let fixture = Fixture::new(
        ResolverConfig::new().with_sdk_src("/sdk/src"),
        &[(
            "/sdk/src/builtin/builtin.go",
            "package builtin\n\ntype int int\n\nfunc len(v Type) int\n\nvar x = $0missing\n",
        )],
    );

    assert_eq!(fixture.resolve(), None);
}

#[test]
fn test_candidates_follow_scope_order_without_dedup() {
    let fixture = Fixture::new(
        ResolverConfig::new().with_sdk_src("/sdk/src"),
        &[
            ("/sdk/src/builtin/builtin.go", "package builtin\n\ntype error interface {\n\tError() string\n}\n"),
            ("/p/b.go", "package p\n\nvar shared = 2\n"),
            ("/p/a.go", "package p\n\nvar shared = 1\n\nfunc f(arg int) {\n\t_ = $0arg\n}\n"),
        ],
    );

    assert_eq!(
        fixture.candidate_names(),
        vec!["arg", "shared", "f", "shared", "error"]
    );
}

// =============================================================================
// PACKAGES AND IMPORTS
// =============================================================================

const AREA: &str = "package shapes\n\nfunc Area() float64 { return 0 }\n\nfunc Perimeter() float64 { return 0 }\n";
const AREA_TEST: &str = "package shapes_test\n\nfunc Area() {}\n\nfunc Volume() {}\n";

fn shapes_fixture(main: &str) -> Fixture {
    Fixture::new(
        ResolverConfig::new().with_gopath("/gopath"),
        &[
            ("/gopath/src/shapes/area.go", AREA),
            ("/gopath/src/shapes/area_test.go", AREA_TEST),
            ("/app/main.go", main),
        ],
    )
}

#[rstest]
#[case("Area", Some("/gopath/src/shapes/area.go"))]
#[case("Perimeter", Some("/gopath/src/shapes/area.go"))]
#[case("Volume", None)]
fn test_qualified_lookup_filters_by_package(#[case] member: &str, #[case] expected: Option<&str>) {
    let main = "package main\n\nimport \"shapes\"\n\nfunc main() {\n\tshapes.$0MEMBER()\n}\n"
        .replace("MEMBER", member);
    let fixture = shapes_fixture(&main);

    let found = fixture.resolve();
    assert_eq!(found.as_ref().and_then(|d| fixture.path_of(d)), expected.map(Path::new));
}

#[test]
fn test_qualified_candidates_come_from_one_package() {
    let fixture = shapes_fixture("package main\n\nimport \"shapes\"\n\nfunc main() {\n\tshapes.$0Area()\n}\n");

    assert_eq!(fixture.candidate_names(), vec!["Area", "Perimeter"]);
}

#[test]
fn test_import_alias_resolves_to_spec_and_path_to_directory() {
    let aliased = shapes_fixture("package main\n\nimport geo \"shapes\"\n\nfunc main() {\n\t$0geo.Area()\n}\n");
    assert!(matches!(aliased.resolve(), Some(Declaration::ImportSpec(_))));

    let through_alias = shapes_fixture("package main\n\nimport geo \"shapes\"\n\nfunc main() {\n\tgeo.$0Area()\n}\n");
    assert!(matches!(through_alias.resolve(), Some(Declaration::Function(_))));

    let plain = shapes_fixture("package main\n\nimport \"shapes\"\n\nfunc main() {\n\t$0shapes.Area()\n}\n");
    let Some(Declaration::Directory(dir)) = plain.resolve() else {
        panic!("unaliased import should resolve to its directory");
    };
    assert_eq!(dir.path(), Path::new("/gopath/src/shapes"));
}

#[test]
fn test_dot_import_names_are_unqualified() {
    let fixture = shapes_fixture("package main\n\nimport . \"shapes\"\n\nfunc main() {\n\t$0Perimeter()\n}\n");

    let found = fixture.resolve().expect("dot-imported name resolves");
    assert_eq!(
        fixture.path_of(&found),
        Some(Path::new("/gopath/src/shapes/area.go"))
    );
}

#[test]
fn test_unresolvable_import_is_absent() {
    let fixture = shapes_fixture("package main\n\nimport \"missing/pkg\"\n\nfunc main() {\n\tpkg.$0Thing()\n}\n");

    assert_eq!(fixture.resolve(), None);
}

#[test]
fn test_qualified_type_reference() {
    let fixture = Fixture::new(
        ResolverConfig::new().with_sdk_src("/sdk/src"),
        &[
            ("/sdk/src/net/http/server.go", "package http\n\ntype Server struct {\n\tAddr string\n}\n"),
            ("/app/main.go", "package main\n\nimport \"net/http\"\n\nvar srv http.$0Server\n"),
        ],
    );

    assert!(matches!(fixture.resolve(), Some(Declaration::TypeSpec(_))));
}
