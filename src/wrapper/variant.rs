//! Wrapper variants and the capabilities each one carries.
//!
//! A wrapper's variant is looked up from its syntax kind when the wrapper is
//! created (and again when its identity moves to an element of another
//! kind). Capabilities are free functions over the underlying element; a
//! capability is either fully present for a syntax kind or fully absent.

use crate::parser::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// The family a wrapped element belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeVariant {
    SourceFile,
    SyntaxList,
    Block,
    Statement,
    Declaration,
    Specifier,
    Clause,
    Property,
    Expression,
    Identifier,
    Literal,
    Keyword,
    Punctuation,
    Error,
}

impl NodeVariant {
    /// Kind to variant dispatch table
    pub fn of(kind: SyntaxKind) -> Self {
        use SyntaxKind::*;
        match kind {
            SOURCE_FILE => Self::SourceFile,
            SYNTAX_LIST => Self::SyntaxList,
            BLOCK => Self::Block,
            EXPRESSION_STATEMENT | IF_STATEMENT | WHILE_STATEMENT | RETURN_STATEMENT
            | EMPTY_STATEMENT | VARIABLE_STATEMENT | IMPORT_DECLARATION | EXPORT_DECLARATION => {
                Self::Statement
            }
            FUNCTION_DECLARATION | NAMESPACE_DECLARATION | VARIABLE_DECLARATION | PARAMETER => {
                Self::Declaration
            }
            IMPORT_SPECIFIER | EXPORT_SPECIFIER => Self::Specifier,
            NAMED_IMPORTS | NAMED_EXPORTS => Self::Clause,
            PROPERTY_ASSIGNMENT | SHORTHAND_PROPERTY_ASSIGNMENT => Self::Property,
            OBJECT_LITERAL
            | ARRAY_LITERAL
            | CALL_EXPRESSION
            | PROPERTY_ACCESS_EXPRESSION
            | PARENTHESIZED_EXPRESSION
            | BINARY_EXPRESSION
            | PREFIX_UNARY_EXPRESSION => Self::Expression,
            IDENT => Self::Identifier,
            NUMBER | STRING | TEMPLATE | TRUE_KW | FALSE_KW | NULL_KW => Self::Literal,
            kind if kind.is_keyword() => Self::Keyword,
            kind if kind.is_punct() => Self::Punctuation,
            _ => Self::Error,
        }
    }
}

fn tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    node.children_with_tokens().filter_map(SyntaxElement::into_token)
}

fn idents(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    tokens(node).filter(|t| t.kind() == SyntaxKind::IDENT)
}

/// The identifier token naming a declaration, property or specifier.
///
/// For an aliased specifier (`a as b`) this is the local name `b`.
pub fn name_node(node: &SyntaxNode) -> Option<SyntaxToken> {
    match node.kind() {
        SyntaxKind::IMPORT_SPECIFIER | SyntaxKind::EXPORT_SPECIFIER => idents(node).last(),
        SyntaxKind::PROPERTY_ASSIGNMENT => tokens(node)
            .find(|t| matches!(t.kind(), SyntaxKind::IDENT | SyntaxKind::STRING)),
        SyntaxKind::FUNCTION_DECLARATION
        | SyntaxKind::NAMESPACE_DECLARATION
        | SyntaxKind::VARIABLE_DECLARATION
        | SyntaxKind::PARAMETER
        | SyntaxKind::SHORTHAND_PROPERTY_ASSIGNMENT => idents(node).next(),
        _ => None,
    }
}

/// The `x` of `x as y` in a specifier; `None` when there is no alias
pub fn property_name_node(node: &SyntaxNode) -> Option<SyntaxToken> {
    match node.kind() {
        SyntaxKind::IMPORT_SPECIFIER | SyntaxKind::EXPORT_SPECIFIER => {
            let has_alias = tokens(node).any(|t| t.kind() == SyntaxKind::AS_KW);
            if has_alias { idents(node).next() } else { None }
        }
        _ => None,
    }
}

/// The value side of a property assignment
pub fn initializer(node: &SyntaxNode) -> Option<SyntaxElement> {
    if node.kind() != SyntaxKind::PROPERTY_ASSIGNMENT {
        return None;
    }
    node.children_with_tokens()
        .filter(|e| !e.kind().is_trivia())
        .skip_while(|e| e.kind() != SyntaxKind::COLON)
        .nth(1)
}

/// Kinds that own a braced body
pub fn is_bodied(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::BLOCK
            | SyntaxKind::FUNCTION_DECLARATION
            | SyntaxKind::NAMESPACE_DECLARATION
            | SyntaxKind::IF_STATEMENT
            | SyntaxKind::WHILE_STATEMENT
    )
}

/// The braced body of a bodied node; for `if` this is the then-branch
pub fn body(node: &SyntaxNode) -> Option<SyntaxNode> {
    match node.kind() {
        SyntaxKind::BLOCK => Some(node.clone()),
        kind if is_bodied(kind) => node.children().find(|n| n.kind() == SyntaxKind::BLOCK),
        _ => None,
    }
}

/// The list holding a node's members: its body's statements for bodied
/// nodes, otherwise its first direct `SYNTAX_LIST`
pub fn child_syntax_list(node: &SyntaxNode) -> Option<SyntaxNode> {
    let holder = if is_bodied(node.kind()) {
        body(node)?
    } else {
        node.clone()
    };
    holder.children().find(|n| n.kind() == SyntaxKind::SYNTAX_LIST)
}
