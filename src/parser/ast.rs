//! Typed AST wrappers over the untyped rowan CST.
//!
//! Each struct wraps a SyntaxNode of one kind (or, for `Expr`, one of a set
//! of kinds) and provides accessors for the children the resolver reads.

use super::syntax_kind::{SyntaxKind, SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        ast_node!($name, [$kind]);
    };
    ($name:ident, [$($kind:ident),+ $(,)?]) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$kind)|+)
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

fn child<N: AstNode>(parent: &SyntaxNode) -> Option<N> {
    parent.children().find_map(N::cast)
}

fn children<N: AstNode>(parent: &SyntaxNode) -> impl Iterator<Item = N> + use<N> {
    parent.children().filter_map(N::cast)
}

fn token(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| token.kind() == kind)
}

/// Nodes that introduce a name with a direct `IDENT` token.
pub trait HasName: AstNode {
    fn name(&self) -> Option<SyntaxToken> {
        token(self.syntax(), SyntaxKind::IDENT)
    }

    fn name_text(&self) -> Option<String> {
        self.name().map(|t| t.text().to_string())
    }
}

// ============================================================================
// Root
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn package_clause(&self) -> Option<PackageClause> {
        child(&self.0)
    }

    pub fn package_name(&self) -> Option<String> {
        self.package_clause()?.name_text()
    }

    pub fn import_decls(&self) -> impl Iterator<Item = ImportDecl> + use<> {
        children(&self.0)
    }

    pub fn imports(&self) -> impl Iterator<Item = ImportSpec> + use<> {
        self.import_decls().flat_map(|decl| decl.specs())
    }

    pub fn type_specs(&self) -> impl Iterator<Item = TypeSpec> + use<> {
        children::<TypeDecl>(&self.0).flat_map(|decl| decl.specs())
    }

    pub fn var_specs(&self) -> impl Iterator<Item = VarSpec> + use<> {
        children::<VarDecl>(&self.0).flat_map(|decl| decl.specs())
    }

    pub fn const_specs(&self) -> impl Iterator<Item = ConstSpec> + use<> {
        children::<ConstDecl>(&self.0).flat_map(|decl| decl.specs())
    }

    pub fn functions(&self) -> impl Iterator<Item = FunctionDecl> + use<> {
        children(&self.0)
    }

    pub fn methods(&self) -> impl Iterator<Item = MethodDecl> + use<> {
        children(&self.0)
    }
}

ast_node!(PackageClause, PACKAGE_CLAUSE);
impl HasName for PackageClause {}

// ============================================================================
// Imports
// ============================================================================

ast_node!(ImportDecl, IMPORT_DECL);

impl ImportDecl {
    pub fn specs(&self) -> impl Iterator<Item = ImportSpec> + use<> {
        children(&self.0)
    }
}

ast_node!(ImportSpec, IMPORT_SPEC);

impl ImportSpec {
    /// The explicit alias: an identifier, `_`, or `.`.
    pub fn alias(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::IDENT).or_else(|| token(&self.0, SyntaxKind::DOT))
    }

    pub fn import_string(&self) -> Option<ImportString> {
        child(&self.0)
    }

    pub fn path(&self) -> Option<String> {
        self.import_string().map(|s| s.path())
    }

    /// The alias if present, else the last segment of the import path.
    pub fn local_name(&self) -> Option<String> {
        if let Some(alias) = self.alias() {
            return Some(alias.text().to_string());
        }
        let path = self.path()?;
        let last = path.rsplit('/').next().unwrap_or(&path);
        (!last.is_empty()).then(|| last.to_string())
    }

    pub fn is_dot(&self) -> bool {
        self.alias().is_some_and(|a| a.kind() == SyntaxKind::DOT)
    }
}

ast_node!(ImportString, IMPORT_STRING);

impl ImportString {
    /// The import path without quotes.
    pub fn path(&self) -> String {
        let text = self.0.text().to_string();
        text.trim_matches(|c| c == '"' || c == '`').to_string()
    }
}

// ============================================================================
// Declarations
// ============================================================================

ast_node!(TypeDecl, TYPE_DECL);

impl TypeDecl {
    pub fn specs(&self) -> impl Iterator<Item = TypeSpec> + use<> {
        children(&self.0)
    }
}

ast_node!(TypeSpec, TYPE_SPEC);
impl HasName for TypeSpec {}

impl TypeSpec {
    pub fn ty(&self) -> Option<Type> {
        child(&self.0)
    }

    pub fn is_alias(&self) -> bool {
        token(&self.0, SyntaxKind::EQ).is_some()
    }
}

ast_node!(VarDecl, VAR_DECL);

impl VarDecl {
    pub fn specs(&self) -> impl Iterator<Item = VarSpec> + use<> {
        children(&self.0)
    }
}

ast_node!(VarSpec, VAR_SPEC);

impl VarSpec {
    pub fn definitions(&self) -> impl Iterator<Item = VarDefinition> + use<> {
        children(&self.0)
    }

    pub fn ty(&self) -> Option<Type> {
        child(&self.0)
    }

    pub fn values(&self) -> impl Iterator<Item = Expr> + use<> {
        children(&self.0)
    }
}

ast_node!(VarDefinition, VAR_DEF);
impl HasName for VarDefinition {}

impl VarDefinition {
    /// Position among the definitions of the enclosing spec.
    pub fn index(&self) -> usize {
        self.0
            .parent()
            .map(|parent| {
                parent
                    .children()
                    .filter(|n| n.kind() == SyntaxKind::VAR_DEF)
                    .take_while(|n| n != &self.0)
                    .count()
            })
            .unwrap_or(0)
    }

    /// The explicit type of a `var` spec; short declarations have none.
    pub fn declared_type(&self) -> Option<Type> {
        VarSpec::cast(self.0.parent()?)?.ty()
    }

    /// The expression assigned to this definition, if any.
    pub fn value(&self) -> Option<Expr> {
        let parent = self.0.parent()?;
        if parent.kind() == SyntaxKind::RANGE_CLAUSE {
            return None;
        }
        parent.children().filter_map(Expr::cast).nth(self.index())
    }
}

ast_node!(ConstDecl, CONST_DECL);

impl ConstDecl {
    pub fn specs(&self) -> impl Iterator<Item = ConstSpec> + use<> {
        children(&self.0)
    }
}

ast_node!(ConstSpec, CONST_SPEC);

impl ConstSpec {
    pub fn definitions(&self) -> impl Iterator<Item = ConstDefinition> + use<> {
        children(&self.0)
    }

    pub fn ty(&self) -> Option<Type> {
        child(&self.0)
    }
}

ast_node!(ConstDefinition, CONST_DEF);
impl HasName for ConstDefinition {}

impl ConstDefinition {
    pub fn declared_type(&self) -> Option<Type> {
        ConstSpec::cast(self.0.parent()?)?.ty()
    }
}

ast_node!(FunctionDecl, FUNCTION_DECL);
impl HasName for FunctionDecl {}

impl FunctionDecl {
    pub fn signature(&self) -> Option<Signature> {
        child(&self.0)
    }

    pub fn body(&self) -> Option<Block> {
        child(&self.0)
    }
}

ast_node!(MethodDecl, METHOD_DECL);
impl HasName for MethodDecl {}

impl MethodDecl {
    pub fn receiver(&self) -> Option<Receiver> {
        child(&self.0)
    }

    pub fn signature(&self) -> Option<Signature> {
        child(&self.0)
    }

    pub fn body(&self) -> Option<Block> {
        child(&self.0)
    }

    /// Name of the receiver's base type, with any pointer stripped.
    pub fn receiver_type_name(&self) -> Option<String> {
        self.receiver()?.ty()?.base_name()
    }
}

ast_node!(Receiver, RECEIVER);
impl HasName for Receiver {}

impl Receiver {
    pub fn ty(&self) -> Option<Type> {
        child(&self.0)
    }
}

ast_node!(Signature, SIGNATURE);

impl Signature {
    pub fn parameters(&self) -> Option<Parameters> {
        child(&self.0)
    }

    pub fn result(&self) -> Option<ResultClause> {
        child(&self.0)
    }
}

ast_node!(ResultClause, RESULT);

impl ResultClause {
    pub fn parameters(&self) -> Option<Parameters> {
        child(&self.0)
    }

    pub fn ty(&self) -> Option<Type> {
        child(&self.0)
    }
}

ast_node!(Parameters, PARAMETERS);

impl Parameters {
    pub fn declarations(&self) -> impl Iterator<Item = ParamDecl> + use<> {
        children(&self.0)
    }

    pub fn definitions(&self) -> impl Iterator<Item = ParamDefinition> + use<> {
        self.declarations().flat_map(|decl| decl.definitions())
    }
}

ast_node!(ParamDecl, PARAM_DECL);

impl ParamDecl {
    pub fn definitions(&self) -> impl Iterator<Item = ParamDefinition> + use<> {
        children(&self.0)
    }

    pub fn ty(&self) -> Option<Type> {
        child(&self.0)
    }

    pub fn is_variadic(&self) -> bool {
        token(&self.0, SyntaxKind::ELLIPSIS).is_some()
    }
}

ast_node!(ParamDefinition, PARAM_DEF);
impl HasName for ParamDefinition {}

impl ParamDefinition {
    pub fn declaration(&self) -> Option<ParamDecl> {
        ParamDecl::cast(self.0.parent()?)
    }
}

// ============================================================================
// Types
// ============================================================================

ast_node!(
    Type,
    [
        TYPE_NAME,
        POINTER_TYPE,
        ARRAY_TYPE,
        MAP_TYPE,
        CHAN_TYPE,
        FUNCTION_TYPE,
        STRUCT_TYPE,
        INTERFACE_TYPE,
        PAREN_TYPE,
    ]
);

impl Type {
    pub fn kind(&self) -> SyntaxKind {
        self.0.kind()
    }

    pub fn as_type_name(&self) -> Option<TypeName> {
        TypeName::cast(self.0.clone())
    }

    pub fn as_struct(&self) -> Option<StructType> {
        StructType::cast(self.0.clone())
    }

    pub fn as_interface(&self) -> Option<InterfaceType> {
        InterfaceType::cast(self.0.clone())
    }

    /// The element type of pointer and parenthesized types.
    pub fn inner(&self) -> Option<Type> {
        match self.kind() {
            SyntaxKind::POINTER_TYPE | SyntaxKind::PAREN_TYPE => child(&self.0),
            _ => None,
        }
    }

    /// Strip pointers and parentheses.
    pub fn strip_pointers(&self) -> Type {
        let mut current = self.clone();
        while let Some(inner) = current.inner() {
            current = inner;
        }
        current
    }

    /// The referenced identifier of a (possibly pointer) named type.
    pub fn base_name(&self) -> Option<String> {
        let reference = self.strip_pointers().as_type_name()?.reference()?;
        Some(reference.identifier()?.text().to_string())
    }
}

ast_node!(TypeName, TYPE_NAME);

impl TypeName {
    pub fn reference(&self) -> Option<TypeReference> {
        child(&self.0)
    }
}

ast_node!(TypeReference, TYPE_REFERENCE);

impl TypeReference {
    pub fn identifier(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::IDENT)
    }

    pub fn qualifier(&self) -> Option<TypeReference> {
        child(&self.0)
    }
}

ast_node!(StructType, STRUCT_TYPE);

impl StructType {
    pub fn fields(&self) -> impl Iterator<Item = FieldDecl> + use<> {
        children(&self.0)
    }
}

ast_node!(FieldDecl, FIELD_DECL);

impl FieldDecl {
    pub fn definitions(&self) -> impl Iterator<Item = FieldDefinition> + use<> {
        children(&self.0)
    }

    pub fn anonymous(&self) -> Option<AnonymousFieldDefinition> {
        child(&self.0)
    }

    pub fn ty(&self) -> Option<Type> {
        child(&self.0)
    }
}

ast_node!(FieldDefinition, FIELD_DEF);
impl HasName for FieldDefinition {}

impl FieldDefinition {
    pub fn declared_type(&self) -> Option<Type> {
        FieldDecl::cast(self.0.parent()?)?.ty()
    }
}

ast_node!(AnonymousFieldDefinition, ANON_FIELD_DEF);

impl AnonymousFieldDefinition {
    pub fn ty(&self) -> Option<Type> {
        child(&self.0)
    }

    /// The embedded type's reference, pointer stripped.
    pub fn type_reference(&self) -> Option<TypeReference> {
        self.ty()?.strip_pointers().as_type_name()?.reference()
    }

    /// An embedded field is named after its type.
    pub fn name(&self) -> Option<SyntaxToken> {
        self.type_reference()?.identifier()
    }

    pub fn name_text(&self) -> Option<String> {
        self.name().map(|t| t.text().to_string())
    }
}

ast_node!(InterfaceType, INTERFACE_TYPE);

impl InterfaceType {
    pub fn method_specs(&self) -> impl Iterator<Item = MethodSpec> + use<> {
        children(&self.0)
    }

    pub fn embedded(&self) -> impl Iterator<Item = EmbeddedInterface> + use<> {
        children(&self.0)
    }
}

ast_node!(MethodSpec, METHOD_SPEC);
impl HasName for MethodSpec {}

impl MethodSpec {
    pub fn signature(&self) -> Option<Signature> {
        child(&self.0)
    }
}

ast_node!(EmbeddedInterface, EMBEDDED_INTERFACE);

impl EmbeddedInterface {
    pub fn types(&self) -> impl Iterator<Item = Type> + use<> {
        children(&self.0)
    }
}

// ============================================================================
// Statements
// ============================================================================

ast_node!(Block, BLOCK);

ast_node!(ShortVarDecl, SHORT_VAR_DECL);

impl ShortVarDecl {
    pub fn definitions(&self) -> impl Iterator<Item = VarDefinition> + use<> {
        children(&self.0)
    }
}

ast_node!(RangeClause, RANGE_CLAUSE);

impl RangeClause {
    pub fn definitions(&self) -> impl Iterator<Item = VarDefinition> + use<> {
        children(&self.0)
    }
}

// ============================================================================
// Expressions
// ============================================================================

ast_node!(
    Expr,
    [
        REFERENCE_EXPR,
        LITERAL,
        PAREN_EXPR,
        FUNCTION_LIT,
        COMPOSITE_LIT,
        CALL_EXPR,
        INDEX_EXPR,
        SLICE_EXPR,
        TYPE_ASSERTION_EXPR,
        CONVERSION_EXPR,
        UNARY_EXPR,
        OR_EXPR,
        AND_EXPR,
        CONDITIONAL_EXPR,
        ADD_EXPR,
        MUL_EXPR,
    ]
);

impl Expr {
    pub fn kind(&self) -> SyntaxKind {
        self.0.kind()
    }

    /// The literal type of `T{...}` or `&T{...}`.
    pub fn composite_type(&self) -> Option<Type> {
        match self.kind() {
            SyntaxKind::COMPOSITE_LIT => CompositeLit::cast(self.0.clone())?.ty(),
            SyntaxKind::UNARY_EXPR => {
                let unary = UnaryExpr::cast(self.0.clone())?;
                if unary.op()?.kind() != SyntaxKind::AMP {
                    return None;
                }
                unary.operand()?.composite_type()
            }
            SyntaxKind::PAREN_EXPR => child::<Expr>(&self.0)?.composite_type(),
            _ => None,
        }
    }
}

ast_node!(ReferenceExpr, REFERENCE_EXPR);

impl ReferenceExpr {
    pub fn identifier(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::IDENT)
    }

    pub fn qualifier(&self) -> Option<Expr> {
        child(&self.0)
    }
}

ast_node!(CompositeLit, COMPOSITE_LIT);

impl CompositeLit {
    pub fn ty(&self) -> Option<Type> {
        child(&self.0)
    }
}

ast_node!(UnaryExpr, UNARY_EXPR);

impl UnaryExpr {
    pub fn op(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| !token.kind().is_trivia())
    }

    pub fn operand(&self) -> Option<Expr> {
        child(&self.0)
    }
}

ast_node!(FieldName, FIELD_NAME);
impl HasName for FieldName {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_source_file_members() {
        let parse = parse(
            "package shapes\n\nimport (\n\tm \"math\"\n\t\"image/color\"\n)\n\ntype Circle struct {\n\tR float64\n}\n\nfunc (c *Circle) Area() float64 { return m.Pi * c.R * c.R }\n\nfunc New() *Circle { return &Circle{} }\n",
        );
        assert!(parse.ok(), "{:?}", parse.errors);
        let file = parse.tree();

        assert_eq!(file.package_name().as_deref(), Some("shapes"));
        let imports: Vec<_> = file.imports().filter_map(|i| i.local_name()).collect();
        assert_eq!(imports, vec!["m", "color"]);
        assert_eq!(file.type_specs().count(), 1);
        assert_eq!(file.functions().count(), 1);

        let method = file.methods().next().unwrap();
        assert_eq!(method.name_text().as_deref(), Some("Area"));
        assert_eq!(method.receiver_type_name().as_deref(), Some("Circle"));
    }

    #[test]
    fn test_import_path_unquotes() {
        let parse = parse("package p\nimport . `net/http`\n");
        let spec = parse.tree().imports().next().unwrap();

        assert!(spec.is_dot());
        assert_eq!(spec.path().as_deref(), Some("net/http"));
        assert_eq!(spec.local_name().as_deref(), Some("."));
    }

    #[test]
    fn test_var_definition_value_and_composite_type() {
        let parse = parse("package p\nvar a, b = 1, &pkg.T{}\n");
        let spec = parse.tree().var_specs().next().unwrap();
        let defs: Vec<_> = spec.definitions().collect();

        assert_eq!(defs[1].index(), 1);
        let value = defs[1].value().unwrap();
        let ty = value.composite_type().unwrap();
        let reference = ty.as_type_name().unwrap().reference().unwrap();
        assert_eq!(reference.identifier().unwrap().text(), "T");
        assert_eq!(reference.qualifier().unwrap().syntax().text(), "pkg");
        assert!(defs[0].value().unwrap().composite_type().is_none());
    }

    #[test]
    fn test_nested_accessors_outlive_their_parents() {
        let parse = parse("package p\nvar (\n\ta, b int\n\tc = 1\n)\nfunc f(x, y int, z string) {}\n");
        let file = parse.tree();

        let vars: Vec<_> = file
            .var_specs()
            .flat_map(|spec| spec.definitions())
            .filter_map(|def| def.name_text())
            .collect();
        assert_eq!(vars, vec!["a", "b", "c"]);

        let params = file
            .functions()
            .filter_map(|function| function.signature())
            .filter_map(|signature| signature.parameters())
            .flat_map(|parameters| parameters.definitions())
            .count();
        assert_eq!(params, 3);
    }

    #[test]
    fn test_anonymous_field_name_strips_pointer() {
        let parse = parse("package p\ntype S struct {\n\t*Base\n}\n");
        let spec = parse.tree().type_specs().next().unwrap();
        let st = spec.ty().unwrap().as_struct().unwrap();
        let anon = st.fields().next().unwrap().anonymous().unwrap();

        assert_eq!(anon.name_text().as_deref(), Some("Base"));
        assert_eq!(anon.ty().unwrap().kind(), SyntaxKind::POINTER_TYPE);
    }
}
