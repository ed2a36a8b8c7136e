//! Logos-based lexer for Go
//!
//! Produces every token including trivia; the parser decides where Go's
//! automatic semicolons go by looking at newlines inside trivia.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    /// Whether this trivia token spans a line break.
    pub fn has_newline(&self) -> bool {
        self.kind.is_trivia() && self.text.contains('\n')
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*")]
    Ident,

    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[oO][0-7_]+")]
    #[regex(r"0[bB][01_]+")]
    Int,

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9_]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9_]+")]
    Float,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?i")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?i")]
    Imaginary,

    #[regex(r"'([^'\\\n]|\\[^\n][^'\n]*)'")]
    Char,

    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    String,

    #[regex(r"`[^`]*`")]
    RawString,

    // =========================================================================
    // PUNCTUATION (longest match wins, so order does not matter)
    // =========================================================================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&^")]
    AmpCaret,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,
    #[token("&^=")]
    AmpCaretEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("<-")]
    Arrow,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("=")]
    Eq,
    #[token(":=")]
    ColonEq,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("break")]
    BreakKw,
    #[token("case")]
    CaseKw,
    #[token("chan")]
    ChanKw,
    #[token("const")]
    ConstKw,
    #[token("continue")]
    ContinueKw,
    #[token("default")]
    DefaultKw,
    #[token("defer")]
    DeferKw,
    #[token("else")]
    ElseKw,
    #[token("fallthrough")]
    FallthroughKw,
    #[token("for")]
    ForKw,
    #[token("func")]
    FuncKw,
    #[token("go")]
    GoKw,
    #[token("goto")]
    GotoKw,
    #[token("if")]
    IfKw,
    #[token("import")]
    ImportKw,
    #[token("interface")]
    InterfaceKw,
    #[token("map")]
    MapKw,
    #[token("package")]
    PackageKw,
    #[token("range")]
    RangeKw,
    #[token("return")]
    ReturnKw,
    #[token("select")]
    SelectKw,
    #[token("struct")]
    StructKw,
    #[token("switch")]
    SwitchKw,
    #[token("type")]
    TypeKw,
    #[token("var")]
    VarKw,
}

/// Consume a block comment body through its closing `*/`.
fn block_comment(lex: &mut logos::Lexer<LogosToken>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken as T;
        match token {
            T::Whitespace => SyntaxKind::WHITESPACE,
            T::LineComment => SyntaxKind::LINE_COMMENT,
            T::BlockComment => SyntaxKind::BLOCK_COMMENT,
            T::Ident => SyntaxKind::IDENT,
            T::Int => SyntaxKind::INT,
            T::Float => SyntaxKind::FLOAT,
            T::Imaginary => SyntaxKind::IMAGINARY,
            T::Char => SyntaxKind::CHAR,
            T::String => SyntaxKind::STRING,
            T::RawString => SyntaxKind::RAW_STRING,
            T::LParen => SyntaxKind::L_PAREN,
            T::RParen => SyntaxKind::R_PAREN,
            T::LBrace => SyntaxKind::L_BRACE,
            T::RBrace => SyntaxKind::R_BRACE,
            T::LBracket => SyntaxKind::L_BRACKET,
            T::RBracket => SyntaxKind::R_BRACKET,
            T::Semicolon => SyntaxKind::SEMICOLON,
            T::Colon => SyntaxKind::COLON,
            T::Comma => SyntaxKind::COMMA,
            T::Dot => SyntaxKind::DOT,
            T::Ellipsis => SyntaxKind::ELLIPSIS,
            T::Plus => SyntaxKind::PLUS,
            T::Minus => SyntaxKind::MINUS,
            T::Star => SyntaxKind::STAR,
            T::Slash => SyntaxKind::SLASH,
            T::Percent => SyntaxKind::PERCENT,
            T::Amp => SyntaxKind::AMP,
            T::Pipe => SyntaxKind::PIPE,
            T::Caret => SyntaxKind::CARET,
            T::Shl => SyntaxKind::SHL,
            T::Shr => SyntaxKind::SHR,
            T::AmpCaret => SyntaxKind::AMP_CARET,
            T::PlusEq => SyntaxKind::PLUS_EQ,
            T::MinusEq => SyntaxKind::MINUS_EQ,
            T::StarEq => SyntaxKind::STAR_EQ,
            T::SlashEq => SyntaxKind::SLASH_EQ,
            T::PercentEq => SyntaxKind::PERCENT_EQ,
            T::AmpEq => SyntaxKind::AMP_EQ,
            T::PipeEq => SyntaxKind::PIPE_EQ,
            T::CaretEq => SyntaxKind::CARET_EQ,
            T::ShlEq => SyntaxKind::SHL_EQ,
            T::ShrEq => SyntaxKind::SHR_EQ,
            T::AmpCaretEq => SyntaxKind::AMP_CARET_EQ,
            T::AmpAmp => SyntaxKind::AMP_AMP,
            T::PipePipe => SyntaxKind::PIPE_PIPE,
            T::Arrow => SyntaxKind::ARROW,
            T::PlusPlus => SyntaxKind::PLUS_PLUS,
            T::MinusMinus => SyntaxKind::MINUS_MINUS,
            T::EqEq => SyntaxKind::EQ_EQ,
            T::NotEq => SyntaxKind::NOT_EQ,
            T::Lt => SyntaxKind::LT,
            T::Gt => SyntaxKind::GT,
            T::LtEq => SyntaxKind::LT_EQ,
            T::GtEq => SyntaxKind::GT_EQ,
            T::Eq => SyntaxKind::EQ,
            T::ColonEq => SyntaxKind::COLON_EQ,
            T::Bang => SyntaxKind::BANG,
            T::Tilde => SyntaxKind::TILDE,
            T::BreakKw => SyntaxKind::BREAK_KW,
            T::CaseKw => SyntaxKind::CASE_KW,
            T::ChanKw => SyntaxKind::CHAN_KW,
            T::ConstKw => SyntaxKind::CONST_KW,
            T::ContinueKw => SyntaxKind::CONTINUE_KW,
            T::DefaultKw => SyntaxKind::DEFAULT_KW,
            T::DeferKw => SyntaxKind::DEFER_KW,
            T::ElseKw => SyntaxKind::ELSE_KW,
            T::FallthroughKw => SyntaxKind::FALLTHROUGH_KW,
            T::ForKw => SyntaxKind::FOR_KW,
            T::FuncKw => SyntaxKind::FUNC_KW,
            T::GoKw => SyntaxKind::GO_KW,
            T::GotoKw => SyntaxKind::GOTO_KW,
            T::IfKw => SyntaxKind::IF_KW,
            T::ImportKw => SyntaxKind::IMPORT_KW,
            T::InterfaceKw => SyntaxKind::INTERFACE_KW,
            T::MapKw => SyntaxKind::MAP_KW,
            T::PackageKw => SyntaxKind::PACKAGE_KW,
            T::RangeKw => SyntaxKind::RANGE_KW,
            T::ReturnKw => SyntaxKind::RETURN_KW,
            T::SelectKw => SyntaxKind::SELECT_KW,
            T::StructKw => SyntaxKind::STRUCT_KW,
            T::SwitchKw => SyntaxKind::SWITCH_KW,
            T::TypeKw => SyntaxKind::TYPE_KW,
            T::VarKw => SyntaxKind::VAR_KW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        tokenize(input)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_keywords_and_idents() {
        assert_eq!(
            kinds("package main; func funcs()"),
            vec![
                SyntaxKind::PACKAGE_KW,
                SyntaxKind::IDENT,
                SyntaxKind::SEMICOLON,
                SyntaxKind::FUNC_KW,
                SyntaxKind::IDENT,
                SyntaxKind::L_PAREN,
                SyntaxKind::R_PAREN,
            ]
        );
    }

    #[test]
    fn test_operators_longest_match() {
        assert_eq!(
            kinds("a &^= b <- c ... :="),
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::AMP_CARET_EQ,
                SyntaxKind::IDENT,
                SyntaxKind::ARROW,
                SyntaxKind::IDENT,
                SyntaxKind::ELLIPSIS,
                SyntaxKind::COLON_EQ,
            ]
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds(r#"42 0x1F 3.14 .5 1e9 2i 'a' '\n' "s\"q" `raw`"#),
            vec![
                SyntaxKind::INT,
                SyntaxKind::INT,
                SyntaxKind::FLOAT,
                SyntaxKind::FLOAT,
                SyntaxKind::FLOAT,
                SyntaxKind::IMAGINARY,
                SyntaxKind::CHAR,
                SyntaxKind::CHAR,
                SyntaxKind::STRING,
                SyntaxKind::RAW_STRING,
            ]
        );
    }

    #[test]
    fn test_unicode_identifier() {
        assert_eq!(kinds("größe"), vec![SyntaxKind::IDENT]);
    }

    #[test]
    fn test_comments_are_trivia_and_keep_offsets() {
        let tokens = tokenize("a /* x\ny */ // tail\nb");
        let b = tokens.iter().find(|t| t.text == "b").unwrap();

        assert_eq!(b.offset, TextSize::from(20));
        assert!(tokens.iter().any(|t| t.kind == SyntaxKind::BLOCK_COMMENT && t.has_newline()));
        assert!(tokens.iter().any(|t| t.kind == SyntaxKind::LINE_COMMENT));
    }

    #[test]
    fn test_block_comment_with_stars() {
        let tokens = tokenize("/** doc **/x");
        assert_eq!(tokens[0].kind, SyntaxKind::BLOCK_COMMENT);
        assert_eq!(tokens[0].text, "/** doc **/");
    }

    #[test]
    fn test_block_comment_ends_at_first_close() {
        let tokens = tokenize("/* a */ x /* b */");
        assert_eq!(kinds("/* a */ x /* b */"), vec![SyntaxKind::IDENT]);
        assert_eq!(tokens[0].text, "/* a */");
    }

    #[test]
    fn test_unterminated_block_comment_is_error() {
        let tokens = tokenize("x /* open");
        assert_eq!(tokens[0].kind, SyntaxKind::IDENT);
        assert!(tokens.iter().any(|t| t.kind == SyntaxKind::ERROR));
    }
}
