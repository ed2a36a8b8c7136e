//! Recursive descent parser for Go
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST: every token,
//! including whitespace and comments, ends up in the tree.

use super::ast::SourceFile;
use super::lexer::{Lexer, Token};
use super::syntax_kind::{SyntaxKind, SyntaxNode};
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// Get the typed root; the parser always produces a `SOURCE_FILE`.
    pub fn tree(&self) -> SourceFile {
        SourceFile(self.syntax())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse Go source code into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    parser.finish()
}

/// Whether a header part parsed as a full statement or a bare expression.
#[derive(Debug, Clone, Copy)]
enum Header {
    Statement,
    /// The expression list starts at the checkpoint, so a caller may still
    /// wrap it.
    Expression(Checkpoint),
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
    /// Negative inside `if`/`for`/`switch` headers, where `T {` opens the
    /// body rather than a composite literal.
    expr_level: i32,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
            expr_level: 0,
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    /// Index of the n-th significant token at or after `pos`.
    fn nth_index(&self, n: usize) -> usize {
        let mut idx = self.pos;
        let mut count = 0;
        while idx < self.tokens.len() {
            if !self.tokens[idx].kind.is_trivia() {
                if count == n {
                    return idx;
                }
                count += 1;
            }
            idx += 1;
        }
        self.tokens.len()
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.nth_index(n))
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::ERROR)
    }

    fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        !self.at_eof() && self.current() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        !self.at_eof() && kinds.contains(&self.current())
    }

    fn at_eof(&self) -> bool {
        self.nth_index(0) >= self.tokens.len()
    }

    /// Whether a line break separates the n-th significant token from the
    /// significant token before it.
    fn newline_before_nth(&self, n: usize) -> bool {
        let idx = self.nth_index(n);
        let mut back = idx;
        while back > 0 {
            back -= 1;
            let token = &self.tokens[back];
            if !token.kind.is_trivia() {
                return false;
            }
            if token.has_newline() {
                return true;
            }
        }
        false
    }

    fn prev_significant(&self) -> Option<SyntaxKind> {
        let idx = self.nth_index(0);
        self.tokens[..idx]
            .iter()
            .rev()
            .find(|t| !t.kind.is_trivia())
            .map(|t| t.kind)
    }

    /// Go's semicolon insertion: a newline after an operand-ending token
    /// terminates the statement.
    fn at_implicit_semi(&self) -> bool {
        if self.at_eof() {
            return true;
        }
        self.newline_before_nth(0)
            && self.prev_significant().is_some_and(SyntaxKind::ends_statement)
    }

    fn at_terminator(&self) -> bool {
        self.at_any(&[SyntaxKind::SEMICOLON, SyntaxKind::R_PAREN, SyntaxKind::R_BRACE])
            || self.at_implicit_semi()
    }

    fn at_type_start(&self) -> bool {
        self.at_any(&[
            SyntaxKind::IDENT,
            SyntaxKind::STAR,
            SyntaxKind::L_BRACKET,
            SyntaxKind::MAP_KW,
            SyntaxKind::CHAN_KW,
            SyntaxKind::FUNC_KW,
            SyntaxKind::STRUCT_KW,
            SyntaxKind::INTERFACE_KW,
            SyntaxKind::L_PAREN,
            SyntaxKind::ARROW,
        ])
    }

    fn current_range(&self) -> TextRange {
        match self.tokens.get(self.nth_index(0)) {
            Some(token) => TextRange::at(token.offset, TextSize::of(token.text)),
            None => {
                let end = self
                    .tokens
                    .last()
                    .map(|t| t.offset + TextSize::of(t.text))
                    .unwrap_or_default();
                TextRange::empty(end)
            }
        }
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn skip_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn bump(&mut self) {
        self.skip_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error(format!("expected {:?}", kind));
        false
    }

    fn error(&mut self, message: impl Into<String>) {
        let range = self.current_range();
        self.errors.push(SyntaxError::new(message, range));
    }

    fn err_and_bump(&mut self, message: &str) {
        self.error(message);
        self.start_node(SyntaxKind::ERROR);
        self.bump();
        self.finish_node();
    }

    /// Consume a statement terminator, recovering to the next one on junk.
    fn eat_semi(&mut self) {
        if self.eat(SyntaxKind::SEMICOLON) || self.at_terminator() {
            return;
        }
        self.error("expected ';' or newline");
        self.start_node(SyntaxKind::ERROR);
        while !self.at_eof() && !self.at_terminator() {
            self.bump();
        }
        self.finish_node();
        self.eat(SyntaxKind::SEMICOLON);
    }

    /// Bump one token as an error if the last rule made no progress. A bare
    /// `;` is left for `eat_semi`.
    fn progress(&mut self, before: usize, message: &str) {
        if self.nth_index(0) == before && !self.at_eof() && !self.at(SyntaxKind::SEMICOLON) {
            self.err_and_bump(message);
        }
    }

    fn start_node(&mut self, kind: SyntaxKind) {
        self.skip_trivia();
        self.builder.start_node(kind.into());
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.skip_trivia();
        self.builder.checkpoint()
    }

    fn with_expr_level<T>(&mut self, level: i32, f: impl FnOnce(&mut Self) -> T) -> T {
        let old = std::mem::replace(&mut self.expr_level, level);
        let result = f(self);
        self.expr_level = old;
        result
    }

    // =========================================================================
    // File and declarations
    // =========================================================================

    fn parse_source_file(&mut self) {
        self.builder.start_node(SyntaxKind::SOURCE_FILE.into());

        if self.at(SyntaxKind::PACKAGE_KW) {
            self.package_clause();
            self.eat_semi();
        } else {
            self.error("expected package clause");
        }

        while self.at(SyntaxKind::IMPORT_KW) {
            self.import_decl();
            self.eat_semi();
        }

        while !self.at_eof() {
            let before = self.nth_index(0);
            self.top_level_decl();
            self.progress(before, "expected declaration");
            self.eat_semi();
        }

        self.skip_trivia();
        self.finish_node();
    }

    fn package_clause(&mut self) {
        self.start_node(SyntaxKind::PACKAGE_CLAUSE);
        self.bump();
        self.expect(SyntaxKind::IDENT);
        self.finish_node();
    }

    fn import_decl(&mut self) {
        self.start_node(SyntaxKind::IMPORT_DECL);
        self.bump();
        self.group(Self::import_spec);
        self.finish_node();
    }

    fn import_spec(&mut self) {
        self.start_node(SyntaxKind::IMPORT_SPEC);
        if self.at_any(&[SyntaxKind::IDENT, SyntaxKind::DOT]) {
            self.bump();
        }
        if self.at_any(&[SyntaxKind::STRING, SyntaxKind::RAW_STRING]) {
            self.start_node(SyntaxKind::IMPORT_STRING);
            self.bump();
            self.finish_node();
        } else {
            self.error("expected import path");
        }
        self.finish_node();
    }

    /// `spec` or `( spec; spec; ... )`
    fn group(&mut self, spec: fn(&mut Self)) {
        if self.eat(SyntaxKind::L_PAREN) {
            while !self.at(SyntaxKind::R_PAREN) && !self.at_eof() {
                let before = self.nth_index(0);
                spec(self);
                self.progress(before, "expected specification");
                self.eat_semi();
            }
            self.expect(SyntaxKind::R_PAREN);
        } else {
            spec(self);
        }
    }

    fn top_level_decl(&mut self) {
        match self.current() {
            SyntaxKind::TYPE_KW => self.type_decl(),
            SyntaxKind::VAR_KW => self.var_decl(),
            SyntaxKind::CONST_KW => self.const_decl(),
            SyntaxKind::FUNC_KW => self.function_or_method_decl(),
            SyntaxKind::IMPORT_KW => {
                self.error("imports must appear before other declarations");
                self.import_decl();
            }
            SyntaxKind::SEMICOLON => {}
            _ => self.err_and_bump("expected declaration"),
        }
    }

    fn type_decl(&mut self) {
        self.start_node(SyntaxKind::TYPE_DECL);
        self.bump();
        self.group(Self::type_spec);
        self.finish_node();
    }

    fn type_spec(&mut self) {
        self.start_node(SyntaxKind::TYPE_SPEC);
        self.expect(SyntaxKind::IDENT);
        if self.at(SyntaxKind::L_BRACKET) && self.nth(1) == SyntaxKind::IDENT && self.nth(2) != SyntaxKind::R_BRACKET {
            self.type_parameters();
        }
        self.eat(SyntaxKind::EQ);
        self.type_();
        self.finish_node();
    }

    fn var_decl(&mut self) {
        self.start_node(SyntaxKind::VAR_DECL);
        self.bump();
        self.group(Self::var_spec);
        self.finish_node();
    }

    fn var_spec(&mut self) {
        self.start_node(SyntaxKind::VAR_SPEC);
        self.definition_list(SyntaxKind::VAR_DEF);
        if !self.at(SyntaxKind::EQ) && !self.at_terminator() {
            self.type_();
        }
        if self.eat(SyntaxKind::EQ) {
            self.expression_list();
        }
        self.finish_node();
    }

    fn const_decl(&mut self) {
        self.start_node(SyntaxKind::CONST_DECL);
        self.bump();
        self.group(Self::const_spec);
        self.finish_node();
    }

    fn const_spec(&mut self) {
        self.start_node(SyntaxKind::CONST_SPEC);
        self.definition_list(SyntaxKind::CONST_DEF);
        if !self.at(SyntaxKind::EQ) && !self.at_terminator() && self.at_type_start() {
            self.type_();
        }
        if self.eat(SyntaxKind::EQ) {
            self.expression_list();
        }
        self.finish_node();
    }

    /// `ident {, ident}`, each wrapped in a `kind` node.
    fn definition_list(&mut self, kind: SyntaxKind) {
        loop {
            self.start_node(kind);
            self.expect(SyntaxKind::IDENT);
            self.finish_node();
            if !(self.at(SyntaxKind::COMMA) && self.nth(1) == SyntaxKind::IDENT) {
                break;
            }
            self.bump();
        }
    }

    fn function_or_method_decl(&mut self) {
        let is_method = self.nth(1) == SyntaxKind::L_PAREN;
        self.start_node(if is_method {
            SyntaxKind::METHOD_DECL
        } else {
            SyntaxKind::FUNCTION_DECL
        });
        self.bump();
        if is_method {
            self.receiver();
        }
        self.expect(SyntaxKind::IDENT);
        if self.at(SyntaxKind::L_BRACKET) {
            self.type_parameters();
        }
        self.signature();
        if self.at(SyntaxKind::L_BRACE) {
            self.block();
        }
        self.finish_node();
    }

    fn receiver(&mut self) {
        self.start_node(SyntaxKind::RECEIVER);
        self.bump();
        if self.at(SyntaxKind::IDENT)
            && matches!(self.nth(1), SyntaxKind::IDENT | SyntaxKind::STAR)
        {
            self.bump();
        }
        self.type_();
        self.eat(SyntaxKind::COMMA);
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    /// Generic parameter lists are kept verbatim; nothing resolves into them.
    fn type_parameters(&mut self) {
        self.start_node(SyntaxKind::TYPE_PARAMETERS);
        self.bump();
        let mut depth = 1;
        while depth > 0 && !self.at_eof() {
            match self.current() {
                SyntaxKind::L_BRACKET => depth += 1,
                SyntaxKind::R_BRACKET => depth -= 1,
                _ => {}
            }
            self.bump();
        }
        self.finish_node();
    }

    fn signature(&mut self) {
        self.start_node(SyntaxKind::SIGNATURE);
        self.parameters();
        if !self.at_implicit_semi() && self.at_type_start() {
            self.start_node(SyntaxKind::RESULT);
            if self.at(SyntaxKind::L_PAREN) {
                self.parameters();
            } else {
                self.type_();
            }
            self.finish_node();
        }
        self.finish_node();
    }

    fn parameters(&mut self) {
        self.start_node(SyntaxKind::PARAMETERS);
        if !self.expect(SyntaxKind::L_PAREN) {
            self.finish_node();
            return;
        }
        let named = self.parameters_are_named();
        self.with_expr_level(0, |p| {
            while !p.at(SyntaxKind::R_PAREN) && !p.at_eof() {
                let before = p.nth_index(0);
                p.start_node(SyntaxKind::PARAM_DECL);
                if named {
                    loop {
                        p.start_node(SyntaxKind::PARAM_DEF);
                        p.expect(SyntaxKind::IDENT);
                        p.finish_node();
                        if !p.eat(SyntaxKind::COMMA) {
                            break;
                        }
                    }
                }
                p.eat(SyntaxKind::ELLIPSIS);
                p.type_();
                p.finish_node();
                p.progress(before, "expected parameter");
                if !p.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
        });
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    /// Scans a parenthesized parameter list (current token is just after
    /// `(`): it is named when some comma-separated group starts with an
    /// identifier followed by something other than `.`.
    fn parameters_are_named(&self) -> bool {
        let mut depth = 0usize;
        let mut group: Vec<SyntaxKind> = Vec::new();
        let mut n = 0;
        loop {
            let idx = self.nth_index(n);
            if idx >= self.tokens.len() {
                return false;
            }
            let kind = self.tokens[idx].kind;
            n += 1;
            match kind {
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                    if depth == 0 {
                        return Self::group_is_named(&group);
                    }
                    depth -= 1;
                }
                SyntaxKind::COMMA if depth == 0 => {
                    if Self::group_is_named(&group) {
                        return true;
                    }
                    group.clear();
                    continue;
                }
                _ => {}
            }
            if group.len() < 2 {
                group.push(kind);
            }
        }
    }

    fn group_is_named(group: &[SyntaxKind]) -> bool {
        matches!(group, [SyntaxKind::IDENT, second, ..] if *second != SyntaxKind::DOT)
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn type_(&mut self) {
        match self.current() {
            _ if self.at_eof() => self.error("expected type"),
            SyntaxKind::IDENT => self.type_name(),
            SyntaxKind::STAR => {
                self.start_node(SyntaxKind::POINTER_TYPE);
                self.bump();
                self.type_();
                self.finish_node();
            }
            SyntaxKind::L_BRACKET => {
                self.start_node(SyntaxKind::ARRAY_TYPE);
                self.bump();
                if !self.at(SyntaxKind::R_BRACKET) && !self.eat(SyntaxKind::ELLIPSIS) {
                    self.with_expr_level(0, Self::expression);
                }
                self.expect(SyntaxKind::R_BRACKET);
                self.type_();
                self.finish_node();
            }
            SyntaxKind::MAP_KW => {
                self.start_node(SyntaxKind::MAP_TYPE);
                self.bump();
                self.expect(SyntaxKind::L_BRACKET);
                self.type_();
                self.expect(SyntaxKind::R_BRACKET);
                self.type_();
                self.finish_node();
            }
            SyntaxKind::CHAN_KW => {
                self.start_node(SyntaxKind::CHAN_TYPE);
                self.bump();
                self.eat(SyntaxKind::ARROW);
                self.type_();
                self.finish_node();
            }
            SyntaxKind::ARROW => {
                self.start_node(SyntaxKind::CHAN_TYPE);
                self.bump();
                self.expect(SyntaxKind::CHAN_KW);
                self.type_();
                self.finish_node();
            }
            SyntaxKind::FUNC_KW => {
                self.start_node(SyntaxKind::FUNCTION_TYPE);
                self.bump();
                self.signature();
                self.finish_node();
            }
            SyntaxKind::STRUCT_KW => self.struct_type(),
            SyntaxKind::INTERFACE_KW => self.interface_type(),
            SyntaxKind::L_PAREN => {
                self.start_node(SyntaxKind::PAREN_TYPE);
                self.bump();
                self.type_();
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
            }
            _ => self.error("expected type"),
        }
    }

    fn type_name(&mut self) {
        self.start_node(SyntaxKind::TYPE_NAME);
        self.type_reference();
        if self.at(SyntaxKind::L_BRACKET) && !self.at_implicit_semi() && self.nth(1) != SyntaxKind::R_BRACKET {
            self.type_parameters();
        }
        self.finish_node();
    }

    /// `ident` or `pkg.ident`; the qualifier is itself a `TYPE_REFERENCE`.
    fn type_reference(&mut self) {
        let checkpoint = self.checkpoint();
        self.start_node(SyntaxKind::TYPE_REFERENCE);
        self.expect(SyntaxKind::IDENT);
        self.finish_node();
        if self.at(SyntaxKind::DOT) && self.nth(1) == SyntaxKind::IDENT {
            self.start_node_at(checkpoint, SyntaxKind::TYPE_REFERENCE);
            self.bump();
            self.bump();
            self.finish_node();
        }
    }

    fn struct_type(&mut self) {
        self.start_node(SyntaxKind::STRUCT_TYPE);
        self.bump();
        self.expect(SyntaxKind::L_BRACE);
        while !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
            let before = self.nth_index(0);
            self.field_decl();
            self.progress(before, "expected field declaration");
            self.eat_semi();
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    fn field_decl(&mut self) {
        if self.at(SyntaxKind::SEMICOLON) {
            return;
        }
        self.start_node(SyntaxKind::FIELD_DECL);
        let anonymous = self.at(SyntaxKind::STAR)
            || (self.at(SyntaxKind::IDENT)
                && (self.newline_before_nth(1)
                    || matches!(
                        self.nth(1),
                        SyntaxKind::SEMICOLON
                            | SyntaxKind::R_BRACE
                            | SyntaxKind::STRING
                            | SyntaxKind::RAW_STRING
                            | SyntaxKind::DOT
                    )));
        if anonymous {
            self.start_node(SyntaxKind::ANON_FIELD_DEF);
            if self.at(SyntaxKind::STAR) {
                self.start_node(SyntaxKind::POINTER_TYPE);
                self.bump();
                self.type_name();
                self.finish_node();
            } else {
                self.type_name();
            }
            self.finish_node();
        } else {
            self.definition_list(SyntaxKind::FIELD_DEF);
            self.type_();
        }
        if self.at_any(&[SyntaxKind::STRING, SyntaxKind::RAW_STRING]) {
            self.start_node(SyntaxKind::TAG);
            self.bump();
            self.finish_node();
        }
        self.finish_node();
    }

    fn interface_type(&mut self) {
        self.start_node(SyntaxKind::INTERFACE_TYPE);
        self.bump();
        self.expect(SyntaxKind::L_BRACE);
        while !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
            let before = self.nth_index(0);
            if self.at(SyntaxKind::IDENT) && self.nth(1) == SyntaxKind::L_PAREN {
                self.start_node(SyntaxKind::METHOD_SPEC);
                self.bump();
                self.signature();
                self.finish_node();
            } else if !self.at(SyntaxKind::SEMICOLON) {
                self.start_node(SyntaxKind::EMBEDDED_INTERFACE);
                loop {
                    self.eat(SyntaxKind::TILDE);
                    self.type_();
                    if !self.eat(SyntaxKind::PIPE) {
                        break;
                    }
                }
                self.finish_node();
            }
            self.progress(before, "expected method or embedded interface");
            self.eat_semi();
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn block(&mut self) {
        self.start_node(SyntaxKind::BLOCK);
        self.expect(SyntaxKind::L_BRACE);
        self.with_expr_level(0, Self::statement_list);
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    fn statement_list(&mut self) {
        while !self.at_any(&[SyntaxKind::R_BRACE, SyntaxKind::CASE_KW, SyntaxKind::DEFAULT_KW])
            && !self.at_eof()
        {
            let before = self.nth_index(0);
            self.statement();
            self.progress(before, "expected statement");
            self.eat_semi();
        }
    }

    fn statement(&mut self) {
        match self.current() {
            SyntaxKind::VAR_KW | SyntaxKind::CONST_KW | SyntaxKind::TYPE_KW => {
                self.start_node(SyntaxKind::DECLARATION_STATEMENT);
                match self.current() {
                    SyntaxKind::VAR_KW => self.var_decl(),
                    SyntaxKind::CONST_KW => self.const_decl(),
                    _ => self.type_decl(),
                }
                self.finish_node();
            }
            SyntaxKind::RETURN_KW => {
                self.start_node(SyntaxKind::RETURN_STATEMENT);
                self.bump();
                if !self.at_terminator() {
                    self.expression_list();
                }
                self.finish_node();
            }
            SyntaxKind::IF_KW => self.if_statement(),
            SyntaxKind::FOR_KW => self.for_statement(),
            SyntaxKind::SWITCH_KW => self.switch_statement(),
            SyntaxKind::SELECT_KW => self.select_statement(),
            SyntaxKind::GO_KW => self.keyword_expression(SyntaxKind::GO_STATEMENT),
            SyntaxKind::DEFER_KW => self.keyword_expression(SyntaxKind::DEFER_STATEMENT),
            SyntaxKind::BREAK_KW => self.jump(SyntaxKind::BREAK_STATEMENT),
            SyntaxKind::CONTINUE_KW => self.jump(SyntaxKind::CONTINUE_STATEMENT),
            SyntaxKind::GOTO_KW => self.jump(SyntaxKind::GOTO_STATEMENT),
            SyntaxKind::FALLTHROUGH_KW => {
                self.start_node(SyntaxKind::FALLTHROUGH_STATEMENT);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::L_BRACE => self.block(),
            SyntaxKind::SEMICOLON => {}
            SyntaxKind::IDENT if self.nth(1) == SyntaxKind::COLON => {
                self.start_node(SyntaxKind::LABELED_STATEMENT);
                self.bump();
                self.bump();
                if !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
                    self.statement();
                }
                self.finish_node();
            }
            _ => {
                self.simple_statement();
            }
        }
    }

    fn keyword_expression(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.expression();
        self.finish_node();
    }

    fn jump(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        if self.at(SyntaxKind::IDENT) && !self.at_implicit_semi() {
            self.start_node(SyntaxKind::LABEL_REF);
            self.bump();
            self.finish_node();
        }
        self.finish_node();
    }

    fn simple_statement(&mut self) {
        if let Header::Expression(checkpoint) = self.header_part() {
            self.start_node_at(checkpoint, SyntaxKind::EXPR_STATEMENT);
            self.finish_node();
        }
    }

    /// Parse a simple statement, leaving a bare expression unwrapped when
    /// nothing statement-like follows it (e.g. an `if` condition).
    fn header_part(&mut self) -> Header {
        if self.at_short_var_decl() {
            self.short_var_decl();
            return Header::Statement;
        }
        let checkpoint = self.checkpoint();
        self.expression_list();
        let kind = match self.current() {
            _ if self.at_implicit_semi() => None,
            k if k.is_assign_op() => Some(SyntaxKind::ASSIGNMENT_STATEMENT),
            SyntaxKind::PLUS_PLUS | SyntaxKind::MINUS_MINUS => Some(SyntaxKind::INC_DEC_STATEMENT),
            SyntaxKind::ARROW => Some(SyntaxKind::SEND_STATEMENT),
            SyntaxKind::SEMICOLON => Some(SyntaxKind::EXPR_STATEMENT),
            _ => None,
        };
        let Some(kind) = kind else {
            return Header::Expression(checkpoint);
        };
        self.start_node_at(checkpoint, kind);
        match kind {
            SyntaxKind::ASSIGNMENT_STATEMENT => {
                self.bump();
                self.expression_list();
            }
            SyntaxKind::INC_DEC_STATEMENT => self.bump(),
            SyntaxKind::SEND_STATEMENT => {
                self.bump();
                self.expression();
            }
            _ => {}
        }
        self.finish_node();
        Header::Statement
    }

    /// `ident {, ident} :=`
    fn at_short_var_decl(&self) -> bool {
        let mut n = 0;
        loop {
            if self.nth(n) != SyntaxKind::IDENT {
                return false;
            }
            match self.nth(n + 1) {
                SyntaxKind::COMMA => n += 2,
                SyntaxKind::COLON_EQ => return true,
                _ => return false,
            }
        }
    }

    fn short_var_decl(&mut self) {
        self.start_node(SyntaxKind::SHORT_VAR_DECL);
        self.definition_list(SyntaxKind::VAR_DEF);
        self.expect(SyntaxKind::COLON_EQ);
        self.expression_list();
        self.finish_node();
    }

    fn if_statement(&mut self) {
        self.start_node(SyntaxKind::IF_STATEMENT);
        self.bump();
        self.with_expr_level(-1, |p| {
            if matches!(p.header_part(), Header::Statement) && p.expect(SyntaxKind::SEMICOLON) {
                p.expression();
            }
        });
        self.block();
        if self.eat(SyntaxKind::ELSE_KW) {
            if self.at(SyntaxKind::IF_KW) {
                self.if_statement();
            } else {
                self.block();
            }
        }
        self.finish_node();
    }

    fn for_statement(&mut self) {
        self.start_node(SyntaxKind::FOR_STATEMENT);
        self.bump();
        self.with_expr_level(-1, Self::for_header);
        self.block();
        self.finish_node();
    }

    fn for_header(&mut self) {
        if self.at(SyntaxKind::L_BRACE) {
            return;
        }
        if self.at(SyntaxKind::RANGE_KW) {
            self.start_node(SyntaxKind::RANGE_CLAUSE);
            self.bump();
            self.expression();
            self.finish_node();
            return;
        }
        let checkpoint = self.checkpoint();
        if self.at_short_var_decl() && self.range_follows_short_var_decl() {
            self.start_node(SyntaxKind::RANGE_CLAUSE);
            self.definition_list(SyntaxKind::VAR_DEF);
            self.bump();
            self.bump();
            self.expression();
            self.finish_node();
            return;
        }
        if !self.at(SyntaxKind::SEMICOLON) {
            if self.at_short_var_decl() {
                self.short_var_decl();
            } else {
                let assignment = self.checkpoint();
                self.expression_list();
                if self.at(SyntaxKind::EQ) && self.nth(1) == SyntaxKind::RANGE_KW {
                    self.start_node_at(assignment, SyntaxKind::RANGE_CLAUSE);
                    self.bump();
                    self.bump();
                    self.expression();
                    self.finish_node();
                    return;
                }
                if self.current().is_assign_op()
                    || self.at_any(&[SyntaxKind::PLUS_PLUS, SyntaxKind::MINUS_MINUS])
                {
                    self.start_node_at(assignment, SyntaxKind::ASSIGNMENT_STATEMENT);
                    self.bump();
                    if !self.at(SyntaxKind::SEMICOLON) {
                        self.expression_list();
                    }
                    self.finish_node();
                } else if !self.at(SyntaxKind::SEMICOLON) {
                    // `for cond {`
                    return;
                } else {
                    self.start_node_at(assignment, SyntaxKind::EXPR_STATEMENT);
                    self.finish_node();
                }
            }
        }
        if !self.at(SyntaxKind::SEMICOLON) {
            return;
        }
        self.start_node_at(checkpoint, SyntaxKind::FOR_CLAUSE);
        self.bump();
        if !self.at(SyntaxKind::SEMICOLON) {
            self.expression();
        }
        self.expect(SyntaxKind::SEMICOLON);
        if !self.at(SyntaxKind::L_BRACE) {
            self.simple_statement();
        }
        self.finish_node();
    }

    fn range_follows_short_var_decl(&self) -> bool {
        let mut n = 0;
        while self.nth(n) != SyntaxKind::COLON_EQ {
            n += 1;
        }
        self.nth(n + 1) == SyntaxKind::RANGE_KW
    }

    fn switch_statement(&mut self) {
        self.start_node(SyntaxKind::SWITCH_STATEMENT);
        self.bump();
        self.with_expr_level(-1, |p| {
            if p.at(SyntaxKind::L_BRACE) {
                return;
            }
            let header = p.header_part();
            if matches!(header, Header::Statement)
                && p.eat(SyntaxKind::SEMICOLON)
                && !p.at(SyntaxKind::L_BRACE)
            {
                p.header_part();
            }
        });
        self.expect(SyntaxKind::L_BRACE);
        while !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
            if self.at_any(&[SyntaxKind::CASE_KW, SyntaxKind::DEFAULT_KW]) {
                self.case_clause(SyntaxKind::CASE_CLAUSE);
            } else {
                self.err_and_bump("expected case or default");
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    fn select_statement(&mut self) {
        self.start_node(SyntaxKind::SELECT_STATEMENT);
        self.bump();
        self.expect(SyntaxKind::L_BRACE);
        while !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
            if self.at_any(&[SyntaxKind::CASE_KW, SyntaxKind::DEFAULT_KW]) {
                self.case_clause(SyntaxKind::COMM_CLAUSE);
            } else {
                self.err_and_bump("expected case or default");
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    fn case_clause(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        if self.eat(SyntaxKind::CASE_KW) {
            if kind == SyntaxKind::COMM_CLAUSE {
                self.simple_statement();
            } else {
                self.expression_list();
            }
        } else {
            self.bump();
        }
        self.expect(SyntaxKind::COLON);
        self.statement_list();
        self.finish_node();
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expression_list(&mut self) {
        loop {
            self.expression();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
    }

    fn expression(&mut self) {
        self.binary_expression(1);
    }

    fn binary_kind(kind: SyntaxKind) -> Option<(u8, SyntaxKind)> {
        let entry = match kind {
            SyntaxKind::PIPE_PIPE => (1, SyntaxKind::OR_EXPR),
            SyntaxKind::AMP_AMP => (2, SyntaxKind::AND_EXPR),
            SyntaxKind::EQ_EQ
            | SyntaxKind::NOT_EQ
            | SyntaxKind::LT
            | SyntaxKind::LT_EQ
            | SyntaxKind::GT
            | SyntaxKind::GT_EQ => (3, SyntaxKind::CONDITIONAL_EXPR),
            SyntaxKind::PLUS | SyntaxKind::MINUS | SyntaxKind::PIPE | SyntaxKind::CARET => {
                (4, SyntaxKind::ADD_EXPR)
            }
            SyntaxKind::STAR
            | SyntaxKind::SLASH
            | SyntaxKind::PERCENT
            | SyntaxKind::SHL
            | SyntaxKind::SHR
            | SyntaxKind::AMP
            | SyntaxKind::AMP_CARET => (5, SyntaxKind::MUL_EXPR),
            _ => return None,
        };
        Some(entry)
    }

    fn binary_expression(&mut self, min_precedence: u8) {
        let checkpoint = self.checkpoint();
        self.unary_expression();
        loop {
            if self.at_implicit_semi() {
                break;
            }
            let Some((precedence, kind)) = Self::binary_kind(self.current()) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            self.start_node_at(checkpoint, kind);
            self.bump();
            self.binary_expression(precedence + 1);
            self.finish_node();
        }
    }

    fn unary_expression(&mut self) {
        if self.at_any(&[
            SyntaxKind::PLUS,
            SyntaxKind::MINUS,
            SyntaxKind::BANG,
            SyntaxKind::CARET,
            SyntaxKind::STAR,
            SyntaxKind::AMP,
            SyntaxKind::ARROW,
            SyntaxKind::TILDE,
        ]) && !(self.at(SyntaxKind::ARROW) && self.nth(1) == SyntaxKind::CHAN_KW)
        {
            self.start_node(SyntaxKind::UNARY_EXPR);
            self.bump();
            self.unary_expression();
            self.finish_node();
        } else {
            self.primary_expression();
        }
    }

    fn at_composite_type_name(&self) -> bool {
        if self.expr_level < 0 || !self.at(SyntaxKind::IDENT) {
            return false;
        }
        match self.nth(1) {
            SyntaxKind::L_BRACE => true,
            SyntaxKind::DOT => {
                self.nth(2) == SyntaxKind::IDENT && self.nth(3) == SyntaxKind::L_BRACE
            }
            _ => false,
        }
    }

    fn primary_expression(&mut self) {
        let checkpoint = self.checkpoint();
        self.operand();
        loop {
            if self.at_eof() || self.at_implicit_semi() {
                break;
            }
            match self.current() {
                SyntaxKind::DOT if self.nth(1) == SyntaxKind::L_PAREN => {
                    self.start_node_at(checkpoint, SyntaxKind::TYPE_ASSERTION_EXPR);
                    self.bump();
                    self.bump();
                    if !self.eat(SyntaxKind::TYPE_KW) {
                        self.type_();
                    }
                    self.expect(SyntaxKind::R_PAREN);
                    self.finish_node();
                }
                SyntaxKind::DOT => {
                    self.start_node_at(checkpoint, SyntaxKind::REFERENCE_EXPR);
                    self.bump();
                    if self.at(SyntaxKind::IDENT) && !self.newline_before_nth(0) {
                        self.bump();
                    } else {
                        self.error("expected selector");
                    }
                    self.finish_node();
                }
                SyntaxKind::L_PAREN => {
                    self.start_node_at(checkpoint, SyntaxKind::CALL_EXPR);
                    self.argument_list();
                    self.finish_node();
                }
                SyntaxKind::L_BRACKET => {
                    let kind = if self.bracket_has_colon() {
                        SyntaxKind::SLICE_EXPR
                    } else {
                        SyntaxKind::INDEX_EXPR
                    };
                    self.start_node_at(checkpoint, kind);
                    self.bump();
                    self.with_expr_level(0, |p| {
                        while !p.at(SyntaxKind::R_BRACKET) && !p.at_eof() {
                            if !p.eat(SyntaxKind::COLON) {
                                let before = p.nth_index(0);
                                p.expression();
                                if p.nth_index(0) == before {
                                    break;
                                }
                                p.eat(SyntaxKind::COMMA);
                            }
                        }
                    });
                    self.expect(SyntaxKind::R_BRACKET);
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    fn bracket_has_colon(&self) -> bool {
        let mut depth = 0usize;
        let mut n = 1;
        loop {
            let idx = self.nth_index(n);
            if idx >= self.tokens.len() {
                return false;
            }
            match self.tokens[idx].kind {
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACE => depth = depth.saturating_sub(1),
                SyntaxKind::R_BRACKET => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                }
                SyntaxKind::COLON if depth == 0 => return true,
                _ => {}
            }
            n += 1;
        }
    }

    fn operand(&mut self) {
        match self.current() {
            _ if self.at_eof() => self.error("expected expression"),
            SyntaxKind::IDENT if self.at_composite_type_name() => {
                self.start_node(SyntaxKind::COMPOSITE_LIT);
                self.type_name();
                self.literal_value();
                self.finish_node();
            }
            SyntaxKind::IDENT => {
                self.start_node(SyntaxKind::REFERENCE_EXPR);
                self.bump();
                self.finish_node();
            }
            k if k.is_literal() => {
                self.start_node(SyntaxKind::LITERAL);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::L_PAREN => {
                self.start_node(SyntaxKind::PAREN_EXPR);
                self.bump();
                self.with_expr_level(0, Self::expression);
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
            }
            SyntaxKind::FUNC_KW => {
                let checkpoint = self.checkpoint();
                self.bump();
                self.signature();
                if self.at(SyntaxKind::L_BRACE) {
                    self.start_node_at(checkpoint, SyntaxKind::FUNCTION_LIT);
                    self.block();
                } else {
                    self.start_node_at(checkpoint, SyntaxKind::FUNCTION_TYPE);
                }
                self.finish_node();
            }
            SyntaxKind::L_BRACKET
            | SyntaxKind::MAP_KW
            | SyntaxKind::STRUCT_KW
            | SyntaxKind::CHAN_KW
            | SyntaxKind::INTERFACE_KW
            | SyntaxKind::ARROW => {
                let checkpoint = self.checkpoint();
                self.type_();
                if self.at(SyntaxKind::L_BRACE) {
                    self.start_node_at(checkpoint, SyntaxKind::COMPOSITE_LIT);
                    self.literal_value();
                    self.finish_node();
                } else if self.at(SyntaxKind::L_PAREN) {
                    self.start_node_at(checkpoint, SyntaxKind::CONVERSION_EXPR);
                    self.bump();
                    self.with_expr_level(0, Self::expression);
                    self.eat(SyntaxKind::COMMA);
                    self.expect(SyntaxKind::R_PAREN);
                    self.finish_node();
                }
            }
            _ => self.error("expected expression"),
        }
    }

    fn argument_list(&mut self) {
        self.start_node(SyntaxKind::ARGUMENT_LIST);
        self.bump();
        self.with_expr_level(0, |p| {
            while !p.at(SyntaxKind::R_PAREN) && !p.at_eof() {
                let before = p.nth_index(0);
                p.expression();
                p.eat(SyntaxKind::ELLIPSIS);
                if p.nth_index(0) == before || !p.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
        });
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    fn literal_value(&mut self) {
        self.start_node(SyntaxKind::LITERAL_VALUE);
        self.expect(SyntaxKind::L_BRACE);
        self.with_expr_level(0, |p| {
            while !p.at(SyntaxKind::R_BRACE) && !p.at_eof() {
                let before = p.nth_index(0);
                p.element();
                if p.nth_index(0) == before || !p.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
        });
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    fn element(&mut self) {
        self.start_node(SyntaxKind::ELEMENT);
        if self.at(SyntaxKind::IDENT) && self.nth(1) == SyntaxKind::COLON {
            self.start_node(SyntaxKind::KEY);
            self.start_node(SyntaxKind::FIELD_NAME);
            self.bump();
            self.finish_node();
            self.finish_node();
            self.bump();
            self.element_value();
        } else {
            let checkpoint = self.checkpoint();
            self.element_value();
            if self.at(SyntaxKind::COLON) {
                self.start_node_at(checkpoint, SyntaxKind::KEY);
                self.finish_node();
                self.bump();
                self.element_value();
            }
        }
        self.finish_node();
    }

    fn element_value(&mut self) {
        if self.at(SyntaxKind::L_BRACE) {
            self.literal_value();
        } else {
            self.expression();
        }
    }
}
