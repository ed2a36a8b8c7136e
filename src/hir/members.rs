//! Member lookup on types: fields, embedded fields and methods.
//!
//! Resolution searches a struct's own fields first, then the types of its
//! embedded fields (recursively), then the methods declared on the type.
//! Recursion into an embedded type is cut when the resolved type's text is
//! identical to the type being searched. That check catches `type T struct
//! { T }` but not longer embedding cycles with differing text.

use std::ops::ControlFlow;

use crate::base::InFile;
use crate::parser::SyntaxKind;
use crate::parser::ast::{self, AstNode, HasName};

use super::declaration::Declaration;
use super::input::Workspace;
use super::lookup::ScopeProcessor;
use super::reference::{GoReference, TypeNameReference};
use super::scope::{ScopeFilter, offer};

/// Resolve a type reference to the `TypeSpec` it names.
pub fn resolve_type_spec(
    ws: &Workspace,
    reference: InFile<ast::TypeReference>,
) -> Option<InFile<ast::TypeSpec>> {
    match TypeNameReference::new(ws, reference.file, reference.value).resolve()? {
        Declaration::TypeSpec(spec) => Some(spec),
        _ => None,
    }
}

/// Methods declared on `spec` anywhere in its package.
pub fn methods_of(ws: &Workspace, spec: &InFile<ast::TypeSpec>) -> Vec<InFile<ast::MethodDecl>> {
    let is_top_level = spec
        .value
        .syntax()
        .parent()
        .and_then(|decl| decl.parent())
        .is_some_and(|root| root.kind() == SyntaxKind::SOURCE_FILE);
    let (Some(name), Some(dir), true) = (spec.value.name_text(), ws.directory_of(spec.file), is_top_level)
    else {
        return Vec::new();
    };
    let package = ws.package_name(spec.file);

    let mut methods = Vec::new();
    for file in ws.files_in(dir) {
        if ws.package_name(file) != package {
            continue;
        }
        let Some(source) = ws.source_file(file) else {
            continue;
        };
        methods.extend(
            source
                .methods()
                .filter(|method| method.receiver_type_name().as_deref() == Some(name.as_str()))
                .map(|method| InFile::new(file, method)),
        );
    }
    methods
}

fn owning_spec(ty: &InFile<ast::Type>) -> Option<InFile<ast::TypeSpec>> {
    let spec = ast::TypeSpec::cast(ty.value.syntax().parent()?)?;
    Some(ty.with_value(spec))
}

fn deref_once(ty: InFile<ast::Type>) -> Option<InFile<ast::Type>> {
    if ty.value.kind() == SyntaxKind::POINTER_TYPE {
        let inner = ty.value.inner()?;
        Some(ty.with_value(inner))
    } else {
        Some(ty)
    }
}

// ============================================================================
// SINGLE-NAME RESOLUTION
// ============================================================================

/// Find the member `name` of a declared type.
pub fn resolve_member(ws: &Workspace, ty: InFile<ast::Type>, name: &str) -> Option<Declaration> {
    tracing::trace!("member lookup: {} on `{}`", name, ty.value.syntax().text());
    if let Some(found) = process_existing_type(ws, &ty, name) {
        return Some(found);
    }

    let pointee = deref_once(ty)?;
    let reference = pointee.value.as_type_name()?.reference()?;
    process_in_type_ref(ws, pointee.with_value(reference), Some(&pointee.value), name)
}

fn process_in_type_ref(
    ws: &Workspace,
    reference: InFile<ast::TypeReference>,
    stopper: Option<&ast::Type>,
    name: &str,
) -> Option<Declaration> {
    let spec = resolve_type_spec(ws, reference)?;
    let resolved = spec.value.ty()?;
    if let Some(stopper) = stopper {
        if stopper.syntax().text().to_string() == resolved.syntax().text().to_string() {
            tracing::debug!(
                "embedding cycle through `{}`, not descending",
                resolved.syntax().text()
            );
            return None;
        }
    }
    process_existing_type(ws, &spec.with_value(resolved), name)
}

fn process_existing_type(ws: &Workspace, ty: &InFile<ast::Type>, name: &str) -> Option<Declaration> {
    if let Some(st) = ty.value.as_struct() {
        if let Some(found) = direct_field(ty, &st, name) {
            return Some(found);
        }
        for anon in st.fields().filter_map(|field| field.anonymous()) {
            let Some(reference) = anon.type_reference() else {
                continue;
            };
            if let Some(found) = process_in_type_ref(ws, ty.with_value(reference), Some(&ty.value), name) {
                return Some(found);
            }
        }
    }

    if let Some(interface) = ty.value.as_interface() {
        if let Some(spec) = interface
            .method_specs()
            .find(|spec| spec.name_text().as_deref() == Some(name))
        {
            return Some(Declaration::MethodSpec(ty.with_value(spec)));
        }
    }

    let spec = owning_spec(ty)?;
    methods_of(ws, &spec)
        .into_iter()
        .find(|method| method.value.name_text().as_deref() == Some(name))
        .map(Declaration::Method)
}

fn direct_field(ty: &InFile<ast::Type>, st: &ast::StructType, name: &str) -> Option<Declaration> {
    for field in st.fields() {
        if let Some(def) = field
            .definitions()
            .find(|def| def.name_text().as_deref() == Some(name))
        {
            return Some(Declaration::Field(ty.with_value(def)));
        }
        if let Some(anon) = field.anonymous() {
            if anon.name_text().as_deref() == Some(name) {
                return Some(Declaration::AnonymousField(ty.with_value(anon)));
            }
        }
    }
    None
}

// ============================================================================
// CANDIDATES
// ============================================================================

/// Every member reachable from a declared type: own fields, then the
/// members of each embedded type depth-first, then own methods.
pub fn collect_members(
    ws: &Workspace,
    ty: InFile<ast::Type>,
    acc: &mut dyn ScopeProcessor,
) -> ControlFlow<()> {
    let Some(ty) = deref_once(ty) else {
        return ControlFlow::Continue(());
    };

    let owner = owning_spec(&ty);
    let mut path: Vec<InFile<ast::TypeSpec>> = owner.iter().cloned().collect();
    collect_in_type(ws, owner.as_ref(), &ty, &mut path, acc)?;

    let reference = ty.value.as_type_name().and_then(|name| name.reference());
    if let Some(spec) = reference.and_then(|r| resolve_type_spec(ws, ty.with_value(r))) {
        if let Some(inner) = spec.value.ty() {
            let mut path = vec![spec.clone()];
            collect_in_type(ws, Some(&spec), &spec.with_value(inner), &mut path, acc)?;
        }
    }
    ControlFlow::Continue(())
}

fn collect_in_type(
    ws: &Workspace,
    owner: Option<&InFile<ast::TypeSpec>>,
    ty: &InFile<ast::Type>,
    path: &mut Vec<InFile<ast::TypeSpec>>,
    acc: &mut dyn ScopeProcessor,
) -> ControlFlow<()> {
    if let Some(st) = ty.value.as_struct() {
        for field in st.fields() {
            for def in field.definitions() {
                offer(acc, ScopeFilter::All, Declaration::Field(ty.with_value(def)))?;
            }
            if let Some(anon) = field.anonymous() {
                offer(acc, ScopeFilter::All, Declaration::AnonymousField(ty.with_value(anon)))?;
            }
        }

        for anon in st.fields().filter_map(|field| field.anonymous()) {
            let Some(reference) = anon.type_reference() else {
                continue;
            };
            let Some(spec) = resolve_type_spec(ws, ty.with_value(reference)) else {
                continue;
            };
            if path.contains(&spec) {
                tracing::debug!("skipping `{:?}`, already on the embedding path", spec.value.name_text());
                continue;
            }
            let Some(inner) = spec.value.ty() else {
                continue;
            };
            path.push(spec.clone());
            let flow = collect_in_type(ws, Some(&spec), &spec.with_value(inner), path, acc);
            path.pop();
            flow?;
        }
    }

    if let Some(interface) = ty.value.as_interface() {
        for spec in interface.method_specs() {
            offer(acc, ScopeFilter::All, Declaration::MethodSpec(ty.with_value(spec)))?;
        }
    }

    if let Some(owner) = owner {
        for method in methods_of(ws, owner) {
            offer(acc, ScopeFilter::All, Declaration::Method(method))?;
        }
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::ResolverConfig;
    use crate::hir::lookup::CollectProcessor;

    fn type_of(ws: &Workspace, file: crate::base::FileId, name: &str) -> InFile<ast::Type> {
        let spec = ws
            .source_file(file)
            .unwrap()
            .type_specs()
            .find(|spec| spec.name_text().as_deref() == Some(name))
            .unwrap();
        InFile::new(file, spec.ty().unwrap())
    }

    #[test]
    fn test_methods_span_package_files() {
        let mut ws = Workspace::new(ResolverConfig::new());
        let a = ws.set_file_text("/p/a.go", "package p\ntype T struct{}\nfunc (t T) A() {}\n");
        ws.set_file_text("/p/b.go", "package p\nfunc (t *T) B() {}\nfunc (u U) C() {}\n");
        ws.set_file_text("/p/c_test.go", "package p_test\nfunc (t T) D() {}\n");

        let spec = ws.source_file(a).unwrap().type_specs().next().unwrap();
        let names: Vec<_> = methods_of(&ws, &InFile::new(a, spec))
            .into_iter()
            .filter_map(|m| m.value.name_text())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_resolve_member_through_embedding() {
        let mut ws = Workspace::new(ResolverConfig::new());
        let file = ws.set_file_text(
            "/p/a.go",
            "package p\ntype Outer struct {\n\tInner\n\tName string\n}\ntype Inner struct {\n\tID int\n}\n",
        );
        let outer = type_of(&ws, file, "Outer");

        let id = resolve_member(&ws, outer.clone(), "ID").unwrap();
        assert!(matches!(id, Declaration::Field(_)));
        assert_eq!(id.name().as_deref(), Some("ID"));

        let inner = resolve_member(&ws, outer.clone(), "Inner").unwrap();
        assert!(matches!(inner, Declaration::AnonymousField(_)));

        assert!(resolve_member(&ws, outer, "Missing").is_none());
    }

    #[test]
    fn test_interface_method_spec() {
        let mut ws = Workspace::new(ResolverConfig::new());
        let file = ws.set_file_text(
            "/p/a.go",
            "package p\ntype Reader interface {\n\tRead(p []byte) (int, error)\n}\n",
        );
        let reader = type_of(&ws, file, "Reader");

        assert!(matches!(
            resolve_member(&ws, reader, "Read"),
            Some(Declaration::MethodSpec(_))
        ));
    }

    #[test]
    fn test_collect_members_depth_first() {
        let mut ws = Workspace::new(ResolverConfig::new());
        let file = ws.set_file_text(
            "/p/a.go",
            "package p\ntype A struct {\n\tB\n\tC\n\tOwn int\n}\ntype B struct {\n\tB1, B2 int\n}\ntype C struct {\n\tC1 int\n}\nfunc (a A) M() {}\nfunc (b B) BM() {}\n",
        );
        let a = type_of(&ws, file, "A");

        let mut acc = CollectProcessor::new();
        let _ = collect_members(&ws, a, &mut acc);
        let names: Vec<_> = acc.into_items().into_iter().map(|i| i.name.to_string()).collect();

        assert_eq!(names, vec!["B", "C", "Own", "B1", "B2", "BM", "C1", "M"]);
    }
}
