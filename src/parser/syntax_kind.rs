//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all node and token kinds of the script language.
//! Lists of statements, parameters, arguments, properties and specifiers are
//! always wrapped in a `SYNTAX_LIST` node so that list edits have a stable
//! parent to reconcile against.

/// All syntax kinds (tokens and nodes) of the script language
///
/// Tokens are leaf elements (identifiers, keywords, punctuation).
/// Nodes are composite (statements, declarations, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but never a child)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,    // identifier
    NUMBER,   // 42, 3.14
    STRING,   // "hello" or 'hello'
    TEMPLATE, // `hello`

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,     // {
    R_BRACE,     // }
    L_BRACKET,   // [
    R_BRACKET,   // ]
    L_PAREN,     // (
    R_PAREN,     // )
    SEMICOLON,   // ;
    COMMA,       // ,
    COLON,       // :
    DOT,         // .
    QUESTION,    // ?
    EQ,          // =
    EQ_EQ,       // ==
    EQ_EQ_EQ,    // ===
    BANG,        // !
    BANG_EQ,     // !=
    BANG_EQ_EQ,  // !==
    LT,          // <
    GT,          // >
    LT_EQ,       // <=
    GT_EQ,       // >=
    PLUS,        // +
    MINUS,       // -
    STAR,        // *
    SLASH,       // /
    PERCENT,     // %
    AMP_AMP,     // &&
    PIPE_PIPE,   // ||
    FAT_ARROW,   // =>

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    IMPORT_KW,
    EXPORT_KW,
    FROM_KW,
    AS_KW,
    CONST_KW,
    LET_KW,
    VAR_KW,
    FUNCTION_KW,
    RETURN_KW,
    IF_KW,
    ELSE_KW,
    WHILE_KW,
    NAMESPACE_KW,
    TRUE_KW,
    FALSE_KW,
    NULL_KW,

    // =========================================================================
    // NODES
    // =========================================================================
    SOURCE_FILE,
    SYNTAX_LIST,

    // Statements
    BLOCK,
    EXPRESSION_STATEMENT,
    IF_STATEMENT,
    WHILE_STATEMENT,
    RETURN_STATEMENT,
    EMPTY_STATEMENT,
    VARIABLE_STATEMENT,
    VARIABLE_DECLARATION,

    // Declarations
    FUNCTION_DECLARATION,
    PARAMETER,
    NAMESPACE_DECLARATION,
    IMPORT_DECLARATION,
    NAMED_IMPORTS,
    IMPORT_SPECIFIER,
    EXPORT_DECLARATION,
    NAMED_EXPORTS,
    EXPORT_SPECIFIER,

    // Expressions
    OBJECT_LITERAL,
    PROPERTY_ASSIGNMENT,
    SHORTHAND_PROPERTY_ASSIGNMENT,
    ARRAY_LITERAL,
    CALL_EXPRESSION,
    PROPERTY_ACCESS_EXPRESSION,
    PARENTHESIZED_EXPRESSION,
    BINARY_EXPRESSION,
    PREFIX_UNARY_EXPRESSION,

    // Special
    ERROR,
    /// Lookahead sentinel past the last token; never stored in a tree
    EOF,

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
        (self as u16) >= (Self::IMPORT_KW as u16) && (self as u16) <= (Self::NULL_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16) && (self as u16) <= (Self::FAT_ARROW as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(self, Self::IDENT | Self::NUMBER | Self::STRING | Self::TEMPLATE)
    }

    /// String-like tokens whose contents must never be re-indented
    pub fn is_string_like(self) -> bool {
        matches!(self, Self::STRING | Self::TEMPLATE)
    }

    /// Check if this kind is a token (leaf) rather than a node
    pub fn is_token(self) -> bool {
        (self as u16) < (Self::SOURCE_FILE as u16)
    }

    /// Statement-level node kinds
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            Self::BLOCK
                | Self::EXPRESSION_STATEMENT
                | Self::IF_STATEMENT
                | Self::WHILE_STATEMENT
                | Self::RETURN_STATEMENT
                | Self::EMPTY_STATEMENT
                | Self::VARIABLE_STATEMENT
                | Self::FUNCTION_DECLARATION
                | Self::NAMESPACE_DECLARATION
                | Self::IMPORT_DECLARATION
                | Self::EXPORT_DECLARATION
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
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScriptLanguage {}

impl rowan::Language for ScriptLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<ScriptLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<ScriptLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<ScriptLanguage>;
