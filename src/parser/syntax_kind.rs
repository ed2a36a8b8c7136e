//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree.
//! Node kinds follow the Go grammar productions the resolver cares about;
//! everything else still gets a node so that the tree stays lossless.

/// All syntax kinds (tokens and nodes) of the Go grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,
    INT,
    FLOAT,
    IMAGINARY,
    CHAR,
    STRING,
    RAW_STRING,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_PAREN,      // (
    R_PAREN,      // )
    L_BRACE,      // {
    R_BRACE,      // }
    L_BRACKET,    // [
    R_BRACKET,    // ]
    SEMICOLON,    // ;
    COLON,        // :
    COMMA,        // ,
    DOT,          // .
    ELLIPSIS,     // ...
    PLUS,         // +
    MINUS,        // -
    STAR,         // *
    SLASH,        // /
    PERCENT,      // %
    AMP,          // &
    PIPE,         // |
    CARET,        // ^
    SHL,          // <<
    SHR,          // >>
    AMP_CARET,    // &^
    PLUS_EQ,      // +=
    MINUS_EQ,     // -=
    STAR_EQ,      // *=
    SLASH_EQ,     // /=
    PERCENT_EQ,   // %=
    AMP_EQ,       // &=
    PIPE_EQ,      // |=
    CARET_EQ,     // ^=
    SHL_EQ,       // <<=
    SHR_EQ,       // >>=
    AMP_CARET_EQ, // &^=
    AMP_AMP,      // &&
    PIPE_PIPE,    // ||
    ARROW,        // <-
    PLUS_PLUS,    // ++
    MINUS_MINUS,  // --
    EQ_EQ,        // ==
    NOT_EQ,       // !=
    LT,           // <
    GT,           // >
    LT_EQ,        // <=
    GT_EQ,        // >=
    EQ,           // =
    COLON_EQ,     // :=
    BANG,         // !
    TILDE,        // ~

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    BREAK_KW,
    CASE_KW,
    CHAN_KW,
    CONST_KW,
    CONTINUE_KW,
    DEFAULT_KW,
    DEFER_KW,
    ELSE_KW,
    FALLTHROUGH_KW,
    FOR_KW,
    FUNC_KW,
    GO_KW,
    GOTO_KW,
    IF_KW,
    IMPORT_KW,
    INTERFACE_KW,
    MAP_KW,
    PACKAGE_KW,
    RANGE_KW,
    RETURN_KW,
    SELECT_KW,
    STRUCT_KW,
    SWITCH_KW,
    TYPE_KW,
    VAR_KW,

    // =========================================================================
    // NODES - FILE AND DECLARATIONS
    // =========================================================================
    SOURCE_FILE,
    PACKAGE_CLAUSE,
    IMPORT_DECL,
    IMPORT_SPEC,
    IMPORT_STRING,
    TYPE_DECL,
    TYPE_SPEC,
    VAR_DECL,
    VAR_SPEC,
    VAR_DEF,
    CONST_DECL,
    CONST_SPEC,
    CONST_DEF,
    FUNCTION_DECL,
    METHOD_DECL,
    RECEIVER,
    SIGNATURE,
    PARAMETERS,
    PARAM_DECL,
    PARAM_DEF,
    RESULT,
    TYPE_PARAMETERS,

    // =========================================================================
    // NODES - TYPES
    // =========================================================================
    TYPE_NAME,
    TYPE_REFERENCE,
    POINTER_TYPE,
    ARRAY_TYPE,
    MAP_TYPE,
    CHAN_TYPE,
    FUNCTION_TYPE,
    STRUCT_TYPE,
    FIELD_DECL,
    FIELD_DEF,
    ANON_FIELD_DEF,
    TAG,
    INTERFACE_TYPE,
    METHOD_SPEC,
    EMBEDDED_INTERFACE,
    PAREN_TYPE,

    // =========================================================================
    // NODES - STATEMENTS
    // =========================================================================
    BLOCK,
    DECLARATION_STATEMENT,
    EXPR_STATEMENT,
    SHORT_VAR_DECL,
    ASSIGNMENT_STATEMENT,
    INC_DEC_STATEMENT,
    SEND_STATEMENT,
    RETURN_STATEMENT,
    IF_STATEMENT,
    FOR_STATEMENT,
    FOR_CLAUSE,
    RANGE_CLAUSE,
    SWITCH_STATEMENT,
    CASE_CLAUSE,
    SELECT_STATEMENT,
    COMM_CLAUSE,
    GO_STATEMENT,
    DEFER_STATEMENT,
    BREAK_STATEMENT,
    CONTINUE_STATEMENT,
    GOTO_STATEMENT,
    FALLTHROUGH_STATEMENT,
    LABELED_STATEMENT,
    LABEL_REF,

    // =========================================================================
    // NODES - EXPRESSIONS
    // =========================================================================
    REFERENCE_EXPR,
    LITERAL,
    PAREN_EXPR,
    FUNCTION_LIT,
    COMPOSITE_LIT,
    LITERAL_VALUE,
    ELEMENT,
    KEY,
    FIELD_NAME,
    CALL_EXPR,
    ARGUMENT_LIST,
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

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::BREAK_KW as u16) && (self as u16) <= (Self::VAR_KW as u16)
    }

    /// Check if this is a punctuation or operator token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_PAREN as u16) && (self as u16) <= (Self::TILDE as u16)
    }

    /// Check if this is a literal token
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::INT | Self::FLOAT | Self::IMAGINARY | Self::CHAR | Self::STRING | Self::RAW_STRING
        )
    }

    /// Check if this is a leaf (token) kind rather than a node kind.
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::VAR_KW as u16)
    }

    /// Assignment operators (`=`, `+=`, ...), excluding `:=`.
    pub fn is_assign_op(self) -> bool {
        matches!(
            self,
            Self::EQ
                | Self::PLUS_EQ
                | Self::MINUS_EQ
                | Self::STAR_EQ
                | Self::SLASH_EQ
                | Self::PERCENT_EQ
                | Self::AMP_EQ
                | Self::PIPE_EQ
                | Self::CARET_EQ
                | Self::SHL_EQ
                | Self::SHR_EQ
                | Self::AMP_CARET_EQ
        )
    }

    /// Tokens after which a newline terminates the statement.
    pub fn ends_statement(self) -> bool {
        matches!(
            self,
            Self::IDENT
                | Self::INT
                | Self::FLOAT
                | Self::IMAGINARY
                | Self::CHAR
                | Self::STRING
                | Self::RAW_STRING
                | Self::BREAK_KW
                | Self::CONTINUE_KW
                | Self::FALLTHROUGH_KW
                | Self::RETURN_KW
                | Self::PLUS_PLUS
                | Self::MINUS_MINUS
                | Self::R_PAREN
                | Self::R_BRACKET
                | Self::R_BRACE
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: `SyntaxKind` is `repr(u16)` with contiguous discriminants
        // and the bound is checked above.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GoLanguage {}

impl rowan::Language for GoLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<GoLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<GoLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<GoLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<GoLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_rowan() {
        for kind in [SyntaxKind::WHITESPACE, SyntaxKind::TYPE_SPEC, SyntaxKind::ERROR] {
            let raw: rowan::SyntaxKind = kind.into();
            assert_eq!(SyntaxKind::from(raw), kind);
        }
    }

    #[test]
    fn test_kind_classification() {
        assert!(SyntaxKind::LINE_COMMENT.is_trivia());
        assert!(SyntaxKind::STRUCT_KW.is_keyword());
        assert!(!SyntaxKind::IDENT.is_keyword());
        assert!(SyntaxKind::AMP_CARET_EQ.is_punct());
        assert!(SyntaxKind::AMP_CARET_EQ.is_assign_op());
        assert!(!SyntaxKind::COLON_EQ.is_assign_op());
        assert!(SyntaxKind::VAR_KW.is_token());
        assert!(!SyntaxKind::SOURCE_FILE.is_token());
    }
}
