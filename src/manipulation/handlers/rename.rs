use super::{NodeHandler, ReconcileContext, straight_replace};
use crate::manipulation::error::ReconcileError;
use crate::parser::{SyntaxElement, SyntaxKind, SyntaxNode};
use crate::wrapper::{NodeId, initializer, name_node, property_name_node};

/// Straight replacement that also follows the two rewrites a rename can
/// cause: `{ a }` becoming `{ a: b }` and a bare specifier `a` gaining an
/// alias. The old name's wrapper moves to the token that now plays its
/// role, even though the surrounding node changed kind or shape.
#[derive(Debug, Default, Clone, Copy)]
pub struct RenameNodeHandler;

impl RenameNodeHandler {
    fn shorthand_to_property(
        cx: &mut ReconcileContext<'_>,
        current: NodeId,
        current_node: &SyntaxNode,
        new: &SyntaxElement,
        new_node: &SyntaxNode,
    ) -> Result<(), ReconcileError> {
        let identifier = name_node(current_node).map(SyntaxElement::Token);
        if let Some(identifier_id) = identifier.and_then(|ident| cx.cache.get_existing(&ident)) {
            let value = initializer(new_node).ok_or(ReconcileError::KindMismatch {
                current: SyntaxKind::SHORTHAND_PROPERTY_ASSIGNMENT,
                new: new_node.kind(),
            })?;
            cx.cache.replace_identity(identifier_id, value)?;
        }
        cx.cache.forget_subtree(current)?;
        let property = cx.cache.create_detached(new.clone());
        cx.cache.mark_tokens_inspected(property)?;
        Ok(())
    }

    fn specifier_gains_alias(
        cx: &mut ReconcileContext<'_>,
        current: NodeId,
        current_node: &SyntaxNode,
        new: &SyntaxElement,
        new_node: &SyntaxNode,
    ) -> Result<(), ReconcileError> {
        if let Some(identifier) = name_node(current_node) {
            let identifier_element = SyntaxElement::Token(identifier.clone());
            if let Some(identifier_id) = cx.cache.get_existing(&identifier_element) {
                let property_name = property_name_node(new_node);
                let name = name_node(new_node);
                // `a` -> `a as b` keeps meaning `a` on the left; `a` -> `b as a`
                // means the old token is now the local name on the right
                let target = match (property_name, name) {
                    (Some(property_name), Some(name)) if property_name.text() == identifier.text() => {
                        name
                    }
                    (Some(property_name), _) => property_name,
                    (None, _) => {
                        return Err(ReconcileError::KindMismatch {
                            current: current_node.kind(),
                            new: new_node.kind(),
                        });
                    }
                };
                cx.cache
                    .replace_identity(identifier_id, SyntaxElement::Token(target))?;
            }
        }
        cx.cache.replace_identity(current, new.clone())?;
        Ok(())
    }
}

impl NodeHandler for RenameNodeHandler {
    fn handle_node(
        &mut self,
        cx: &mut ReconcileContext<'_>,
        current: NodeId,
        new: &SyntaxElement,
    ) -> Result<(), ReconcileError> {
        let current_element = cx.cache.element(current)?;
        if let (SyntaxElement::Node(current_node), SyntaxElement::Node(new_node)) =
            (&current_element, new)
        {
            match (current_node.kind(), new_node.kind()) {
                (SyntaxKind::SHORTHAND_PROPERTY_ASSIGNMENT, SyntaxKind::PROPERTY_ASSIGNMENT) => {
                    return Self::shorthand_to_property(cx, current, current_node, new, new_node);
                }
                (SyntaxKind::IMPORT_SPECIFIER, SyntaxKind::IMPORT_SPECIFIER)
                | (SyntaxKind::EXPORT_SPECIFIER, SyntaxKind::EXPORT_SPECIFIER)
                    if property_name_node(current_node).is_none()
                        && property_name_node(new_node).is_some() =>
                {
                    return Self::specifier_gains_alias(cx, current, current_node, new, new_node);
                }
                _ => {}
            }
        }
        straight_replace(self, cx, current, new)
    }
}
