//! Recursive descent parser for the script language
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST.
//!
//! Trivia is always attached to the innermost node that is open when the
//! next significant token is consumed, and nodes are started only after
//! pending trivia was flushed. A node's range therefore starts at its first
//! significant token and ends at its last one.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize, Checkpoint};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
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

/// Parse script source code into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens, TextSize::of(input));
    parser.parse_source_file();
    parser.finish()
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    end: TextSize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>], end: TextSize) -> Self {
        Self {
            tokens,
            pos: 0,
            end,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection (all lookahead skips trivia)
    // =========================================================================

    fn nth_token(&self, n: usize) -> Option<&Token<'a>> {
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_token(n).map(|t| t.kind).unwrap_or(SyntaxKind::EOF)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.nth(0) == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.nth(0))
    }

    fn at_eof(&self) -> bool {
        self.at(SyntaxKind::EOF)
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
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .nth_token(0)
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .unwrap_or_else(|| TextRange::empty(self.end));
        self.errors.push(SyntaxError::new(message, range));
    }

    /// Report an error and wrap the offending token in an ERROR node so the
    /// parser always makes progress
    fn error_recover(&mut self, message: impl Into<String>) {
        self.error(message);
        if self.at_eof() {
            return;
        }
        self.start_node(SyntaxKind::ERROR);
        self.bump();
        self.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.skip_trivia();
        self.builder.start_node(kind.into());
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.skip_trivia();
        self.builder.checkpoint()
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// `SYNTAX_LIST` of comma separated items; separators stay in the list
    fn parse_comma_list(&mut self, close: SyntaxKind, item: fn(&mut Self), what: &str) {
        self.start_node(SyntaxKind::SYNTAX_LIST);
        while !self.at(close) && !self.at_eof() {
            let pos_before = self.pos;
            item(self);
            if self.pos == pos_before {
                self.error(format!("expected {what}"));
                break;
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.finish_node();
    }

    // =========================================================================
    // Grammar rules: statements
    // =========================================================================

    /// SourceFile = StatementList
    fn parse_source_file(&mut self) {
        self.builder.start_node(SyntaxKind::SOURCE_FILE.into());
        self.parse_statement_list(SyntaxKind::EOF);
        while !self.at_eof() {
            self.error_recover(format!("unexpected token: {:?}", self.nth(0)));
        }
        self.skip_trivia();
        self.finish_node();
    }

    fn parse_statement_list(&mut self, close: SyntaxKind) {
        self.start_node(SyntaxKind::SYNTAX_LIST);
        while !self.at_eof() && !self.at(close) {
            let pos_before = self.pos;
            self.parse_statement();
            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.error_recover(format!("stuck on token: {:?}", self.nth(0)));
            }
        }
        self.finish_node();
    }

    fn parse_statement(&mut self) {
        match self.nth(0) {
            SyntaxKind::L_BRACE => self.parse_block(),
            SyntaxKind::IF_KW => self.parse_if(),
            SyntaxKind::WHILE_KW => self.parse_while(),
            SyntaxKind::RETURN_KW => self.parse_return(),
            SyntaxKind::IMPORT_KW => self.parse_import(),
            SyntaxKind::SEMICOLON => {
                self.start_node(SyntaxKind::EMPTY_STATEMENT);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::EXPORT_KW if self.nth(1) == SyntaxKind::L_BRACE => self.parse_export(),
            SyntaxKind::EXPORT_KW
            | SyntaxKind::FUNCTION_KW
            | SyntaxKind::NAMESPACE_KW
            | SyntaxKind::CONST_KW
            | SyntaxKind::LET_KW
            | SyntaxKind::VAR_KW => self.parse_declaration(),
            kind if can_start_expression(kind) => {
                self.start_node(SyntaxKind::EXPRESSION_STATEMENT);
                self.parse_expression();
                self.eat(SyntaxKind::SEMICOLON);
                self.finish_node();
            }
            kind => self.error_recover(format!("unexpected token: {:?}", kind)),
        }
    }

    /// Block = '{' StatementList '}'
    fn parse_block(&mut self) {
        self.start_node(SyntaxKind::BLOCK);
        self.expect(SyntaxKind::L_BRACE);
        self.parse_statement_list(SyntaxKind::R_BRACE);
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// IfStatement = 'if' '(' Expression ')' Statement ('else' Statement)?
    fn parse_if(&mut self) {
        self.start_node(SyntaxKind::IF_STATEMENT);
        self.bump();
        self.parse_condition();
        self.parse_embedded_statement();
        if self.eat(SyntaxKind::ELSE_KW) {
            self.parse_embedded_statement();
        }
        self.finish_node();
    }

    /// WhileStatement = 'while' '(' Expression ')' Statement
    fn parse_while(&mut self) {
        self.start_node(SyntaxKind::WHILE_STATEMENT);
        self.bump();
        self.parse_condition();
        self.parse_embedded_statement();
        self.finish_node();
    }

    fn parse_condition(&mut self) {
        self.expect(SyntaxKind::L_PAREN);
        self.parse_expression();
        self.expect(SyntaxKind::R_PAREN);
    }

    fn parse_embedded_statement(&mut self) {
        if self.at_eof() || self.at(SyntaxKind::R_BRACE) {
            self.error("expected statement");
        } else {
            self.parse_statement();
        }
    }

    /// ReturnStatement = 'return' Expression? ';'?
    fn parse_return(&mut self) {
        self.start_node(SyntaxKind::RETURN_STATEMENT);
        self.bump();
        if can_start_expression(self.nth(0)) {
            self.parse_expression();
        }
        self.eat(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// Declaration = 'export'? (Function | Namespace | VariableStatement)
    fn parse_declaration(&mut self) {
        let checkpoint = self.checkpoint();
        self.eat(SyntaxKind::EXPORT_KW);
        match self.nth(0) {
            SyntaxKind::FUNCTION_KW => self.parse_function(checkpoint),
            SyntaxKind::NAMESPACE_KW => self.parse_namespace(checkpoint),
            SyntaxKind::CONST_KW | SyntaxKind::LET_KW | SyntaxKind::VAR_KW => {
                self.parse_variable_statement(checkpoint)
            }
            kind => {
                self.error(format!("expected declaration after export, found {:?}", kind));
                self.start_node_at(checkpoint, SyntaxKind::ERROR);
                self.finish_node();
            }
        }
    }

    /// Function = 'function' IDENT '(' ParameterList ')' Block
    fn parse_function(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::FUNCTION_DECLARATION);
        self.expect(SyntaxKind::FUNCTION_KW);
        self.expect(SyntaxKind::IDENT);
        self.expect(SyntaxKind::L_PAREN);
        self.parse_comma_list(SyntaxKind::R_PAREN, Self::parse_parameter, "parameter");
        self.expect(SyntaxKind::R_PAREN);
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_block();
        } else {
            self.error("expected function body");
        }
        self.finish_node();
    }

    /// Parameter = IDENT ('=' Expression)?
    fn parse_parameter(&mut self) {
        if !self.at(SyntaxKind::IDENT) {
            return;
        }
        self.start_node(SyntaxKind::PARAMETER);
        self.bump();
        if self.eat(SyntaxKind::EQ) {
            self.parse_assignment();
        }
        self.finish_node();
    }

    /// Namespace = 'namespace' IDENT Block
    fn parse_namespace(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::NAMESPACE_DECLARATION);
        self.expect(SyntaxKind::NAMESPACE_KW);
        self.expect(SyntaxKind::IDENT);
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_block();
        } else {
            self.error("expected namespace body");
        }
        self.finish_node();
    }

    /// VariableStatement = ('const' | 'let' | 'var') VariableDeclaration (',' VariableDeclaration)* ';'?
    fn parse_variable_statement(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::VARIABLE_STATEMENT);
        self.bump();
        self.parse_comma_list(
            SyntaxKind::SEMICOLON,
            Self::parse_variable_declaration,
            "variable declaration",
        );
        self.eat(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// VariableDeclaration = IDENT ('=' Expression)?
    fn parse_variable_declaration(&mut self) {
        if !self.at(SyntaxKind::IDENT) {
            return;
        }
        self.start_node(SyntaxKind::VARIABLE_DECLARATION);
        self.bump();
        if self.eat(SyntaxKind::EQ) {
            self.parse_assignment();
        }
        self.finish_node();
    }

    /// Import = 'import' (NamedImports 'from')? STRING ';'?
    fn parse_import(&mut self) {
        self.start_node(SyntaxKind::IMPORT_DECLARATION);
        self.bump();
        if self.at(SyntaxKind::L_BRACE) {
            self.start_node(SyntaxKind::NAMED_IMPORTS);
            self.bump();
            self.parse_comma_list(
                SyntaxKind::R_BRACE,
                Self::parse_import_specifier,
                "import specifier",
            );
            self.expect(SyntaxKind::R_BRACE);
            self.finish_node();
            self.expect(SyntaxKind::FROM_KW);
        }
        self.expect(SyntaxKind::STRING);
        self.eat(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    fn parse_import_specifier(&mut self) {
        self.parse_specifier(SyntaxKind::IMPORT_SPECIFIER);
    }

    /// Export = 'export' NamedExports ('from' STRING)? ';'?
    fn parse_export(&mut self) {
        self.start_node(SyntaxKind::EXPORT_DECLARATION);
        self.bump();
        self.start_node(SyntaxKind::NAMED_EXPORTS);
        self.expect(SyntaxKind::L_BRACE);
        self.parse_comma_list(
            SyntaxKind::R_BRACE,
            Self::parse_export_specifier,
            "export specifier",
        );
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
        if self.eat(SyntaxKind::FROM_KW) {
            self.expect(SyntaxKind::STRING);
        }
        self.eat(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    fn parse_export_specifier(&mut self) {
        self.parse_specifier(SyntaxKind::EXPORT_SPECIFIER);
    }

    /// Specifier = IDENT ('as' IDENT)?
    fn parse_specifier(&mut self, kind: SyntaxKind) {
        if !self.at(SyntaxKind::IDENT) {
            return;
        }
        self.start_node(kind);
        self.bump();
        if self.eat(SyntaxKind::AS_KW) {
            self.expect(SyntaxKind::IDENT);
        }
        self.finish_node();
    }

    // =========================================================================
    // Grammar rules: expressions
    // =========================================================================

    fn parse_expression(&mut self) {
        self.parse_assignment();
    }

    /// Assignment = Binary ('=' Assignment)?
    fn parse_assignment(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_binary(0);
        if self.at(SyntaxKind::EQ) {
            self.start_node_at(checkpoint, SyntaxKind::BINARY_EXPRESSION);
            self.bump();
            self.parse_assignment();
            self.finish_node();
        }
    }

    /// Left-associative precedence climbing
    fn parse_binary(&mut self, min_precedence: u8) {
        let checkpoint = self.checkpoint();
        self.parse_unary();
        while let Some(precedence) = binary_precedence(self.nth(0)) {
            if precedence <= min_precedence {
                break;
            }
            self.start_node_at(checkpoint, SyntaxKind::BINARY_EXPRESSION);
            self.bump();
            self.parse_binary(precedence);
            self.finish_node();
        }
    }

    fn parse_unary(&mut self) {
        if self.at_any(&[SyntaxKind::BANG, SyntaxKind::MINUS, SyntaxKind::PLUS]) {
            self.start_node(SyntaxKind::PREFIX_UNARY_EXPRESSION);
            self.bump();
            self.parse_unary();
            self.finish_node();
        } else {
            self.parse_postfix();
        }
    }

    /// Postfix = Primary ('(' Arguments ')' | '.' IDENT)*
    fn parse_postfix(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_primary();
        loop {
            match self.nth(0) {
                SyntaxKind::L_PAREN => {
                    self.start_node_at(checkpoint, SyntaxKind::CALL_EXPRESSION);
                    self.bump();
                    self.parse_comma_list(SyntaxKind::R_PAREN, Self::parse_assignment, "argument");
                    self.expect(SyntaxKind::R_PAREN);
                    self.finish_node();
                }
                SyntaxKind::DOT => {
                    self.start_node_at(checkpoint, SyntaxKind::PROPERTY_ACCESS_EXPRESSION);
                    self.bump();
                    self.expect(SyntaxKind::IDENT);
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    fn parse_primary(&mut self) {
        match self.nth(0) {
            SyntaxKind::IDENT
            | SyntaxKind::NUMBER
            | SyntaxKind::STRING
            | SyntaxKind::TEMPLATE
            | SyntaxKind::TRUE_KW
            | SyntaxKind::FALSE_KW
            | SyntaxKind::NULL_KW => self.bump(),
            SyntaxKind::L_PAREN => {
                self.start_node(SyntaxKind::PARENTHESIZED_EXPRESSION);
                self.bump();
                self.parse_expression();
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
            }
            SyntaxKind::L_BRACE => self.parse_object_literal(),
            SyntaxKind::L_BRACKET => {
                self.start_node(SyntaxKind::ARRAY_LITERAL);
                self.bump();
                self.parse_comma_list(SyntaxKind::R_BRACKET, Self::parse_assignment, "element");
                self.expect(SyntaxKind::R_BRACKET);
                self.finish_node();
            }
            kind => self.error(format!("expected expression, found {:?}", kind)),
        }
    }

    /// ObjectLiteral = '{' (Property (',' Property)* ','?)? '}'
    fn parse_object_literal(&mut self) {
        self.start_node(SyntaxKind::OBJECT_LITERAL);
        self.bump();
        self.parse_comma_list(SyntaxKind::R_BRACE, Self::parse_property, "property");
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// Property = (IDENT | STRING) ':' Expression | IDENT
    fn parse_property(&mut self) {
        match (self.nth(0), self.nth(1)) {
            (SyntaxKind::IDENT | SyntaxKind::STRING, SyntaxKind::COLON) => {
                self.start_node(SyntaxKind::PROPERTY_ASSIGNMENT);
                self.bump();
                self.bump();
                self.parse_assignment();
                self.finish_node();
            }
            (SyntaxKind::IDENT, _) => {
                self.start_node(SyntaxKind::SHORTHAND_PROPERTY_ASSIGNMENT);
                self.bump();
                self.finish_node();
            }
            _ => {}
        }
    }
}

fn can_start_expression(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::IDENT
            | SyntaxKind::NUMBER
            | SyntaxKind::STRING
            | SyntaxKind::TEMPLATE
            | SyntaxKind::TRUE_KW
            | SyntaxKind::FALSE_KW
            | SyntaxKind::NULL_KW
            | SyntaxKind::L_PAREN
            | SyntaxKind::L_BRACE
            | SyntaxKind::L_BRACKET
            | SyntaxKind::BANG
            | SyntaxKind::MINUS
            | SyntaxKind::PLUS
    )
}

fn binary_precedence(kind: SyntaxKind) -> Option<u8> {
    let precedence = match kind {
        SyntaxKind::PIPE_PIPE => 1,
        SyntaxKind::AMP_AMP => 2,
        SyntaxKind::EQ_EQ | SyntaxKind::EQ_EQ_EQ | SyntaxKind::BANG_EQ | SyntaxKind::BANG_EQ_EQ => 3,
        SyntaxKind::LT | SyntaxKind::GT | SyntaxKind::LT_EQ | SyntaxKind::GT_EQ => 4,
        SyntaxKind::PLUS | SyntaxKind::MINUS => 5,
        SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::PERCENT => 6,
        _ => return None,
    };
    Some(precedence)
}
