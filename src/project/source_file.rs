//! One source file: its text, current tree, wrapper cache and edits.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rowan::Direction;
use tracing::debug;

use super::error::EditError;
use crate::base::FileId;
use crate::manipulation::iter::{fast_children, precise_children};
use crate::manipulation::{
    DefaultParentHandler, FullReplacementTextManipulator, InsertionTextManipulator,
    ManipulationSettings, ManipulationTarget, NodeHandler, NodeHandlerFactory, Orchestrator,
    RangeParentHandler, RenameLocation, RenameLocationTextManipulator, TextManipulator,
    UnwrapTextManipulator,
};
use crate::parser::{
    OracleError, ParserOracle, ScriptKind, SyntaxElement, SyntaxError, SyntaxKind, SyntaxNode,
    SyntaxToken, TextRange, TextSize,
};
use crate::wrapper::{
    self, NodeCache, NodeError, NodeId, NodeVariant, child_syntax_list, is_bodied,
};

/// Called with the file's path before every manipulation
pub type BeforeModifyHook = Box<dyn FnMut(&Path)>;

pub struct SourceFile {
    id: FileId,
    path: PathBuf,
    script_kind: ScriptKind,
    text: String,
    tree: SyntaxNode,
    cache: NodeCache,
    root: NodeId,
    oracle: Arc<dyn ParserOracle>,
    settings: ManipulationSettings,
    before_modify: Vec<BeforeModifyHook>,
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("script_kind", &self.script_kind)
            .field("wrappers", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl SourceFile {
    pub fn new(
        id: FileId,
        path: impl Into<PathBuf>,
        text: impl Into<String>,
        oracle: Arc<dyn ParserOracle>,
        settings: ManipulationSettings,
    ) -> Result<Self, OracleError> {
        let path = path.into();
        let text = text.into();
        let script_kind = ScriptKind::from_path(&path);
        let tree = oracle.parse(&text, &path, script_kind)?.syntax();
        let mut cache = NodeCache::new(id);
        let root = cache.get_or_create(SyntaxElement::Node(tree.clone()));
        debug!(path = %path.display(), %id, "created source file");
        Ok(Self {
            id,
            path,
            script_kind,
            text,
            tree,
            cache,
            root,
            oracle,
            settings,
            before_modify: Vec::new(),
        })
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn script_kind(&self) -> ScriptKind {
        self.script_kind
    }

    pub fn full_text(&self) -> &str {
        &self.text
    }

    pub fn settings(&self) -> &ManipulationSettings {
        &self.settings
    }

    /// Syntax errors of the current text
    pub fn diagnostics(&self) -> Vec<SyntaxError> {
        self.oracle
            .parse(&self.text, &self.path, self.script_kind)
            .map(|parse| self.oracle.syntactic_diagnostics(&parse))
            .unwrap_or_default()
    }

    pub fn on_before_modify(&mut self, hook: impl FnMut(&Path) + 'static) {
        self.before_modify.push(Box::new(hook));
    }

    /// Number of live wrappers
    pub fn wrapper_count(&self) -> usize {
        self.cache.len()
    }

    /// Invalidate every wrapper of this file
    pub fn forget(&mut self) {
        self.cache.forget_all();
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> Result<SyntaxKind, NodeError> {
        self.cache.kind(id)
    }

    pub fn variant(&self, id: NodeId) -> Result<NodeVariant, NodeError> {
        self.cache.wrapper(id).map(|wrapper| wrapper.variant())
    }

    pub fn text(&self, id: NodeId) -> Result<String, NodeError> {
        Ok(match self.cache.element(id)? {
            SyntaxElement::Node(node) => node.text().to_string(),
            SyntaxElement::Token(token) => token.text().to_string(),
        })
    }

    pub fn range(&self, id: NodeId) -> Result<TextRange, NodeError> {
        self.cache.element(id).map(|element| element.text_range())
    }

    pub fn is_forgotten(&self, id: NodeId) -> bool {
        self.cache.is_forgotten(id)
    }

    pub fn parent(&mut self, id: NodeId) -> Result<Option<NodeId>, NodeError> {
        let parent = self.cache.element(id)?.parent();
        Ok(parent.map(|parent| self.cache.get_or_create(SyntaxElement::Node(parent))))
    }

    /// Every non-trivia child, tokens included
    pub fn children(&mut self, id: NodeId) -> Result<Vec<NodeId>, NodeError> {
        let element = self.cache.element(id)?;
        self.cache.mark_tokens_inspected(id)?;
        Ok(self.wrap_all(precise_children(&element)))
    }

    /// Child nodes only
    pub fn child_nodes(&mut self, id: NodeId) -> Result<Vec<NodeId>, NodeError> {
        let element = self.cache.element(id)?;
        Ok(self.wrap_all(fast_children(&element)))
    }

    /// Position among the parent's non-trivia children; 0 for the root
    pub fn child_index(&self, id: NodeId) -> Result<usize, NodeError> {
        let element = self.cache.element(id)?;
        Ok(sibling_index(&element).unwrap_or(0))
    }

    pub fn child_syntax_list(&mut self, id: NodeId) -> Result<Option<NodeId>, NodeError> {
        let list = self.node(id)?.as_ref().and_then(child_syntax_list);
        Ok(list.map(|list| self.cache.get_or_create(SyntaxElement::Node(list))))
    }

    /// The statements of the root, of a bodied node or of a statement list
    pub fn statements(&mut self, id: NodeId) -> Result<Vec<NodeId>, NodeError> {
        let list = match self.node(id)? {
            Some(node) if node.kind() == SyntaxKind::SYNTAX_LIST => Some(node),
            Some(node) if node.kind() == SyntaxKind::SOURCE_FILE || is_bodied(node.kind()) => {
                child_syntax_list(&node)
            }
            _ => None,
        };
        let statements = list
            .map(|list| fast_children(&SyntaxElement::Node(list)))
            .unwrap_or_default();
        Ok(self.wrap_all(statements))
    }

    /// The identifier naming a declaration, property or specifier
    pub fn name_node(&mut self, id: NodeId) -> Result<Option<NodeId>, NodeError> {
        let name = self.node(id)?.as_ref().and_then(wrapper::name_node);
        Ok(name.map(|token| self.cache.get_or_create(SyntaxElement::Token(token))))
    }

    pub fn descendants_of_kind(
        &mut self,
        id: NodeId,
        kind: SyntaxKind,
    ) -> Result<Vec<NodeId>, NodeError> {
        let descendants: Vec<SyntaxElement> = match self.node(id)? {
            Some(node) => node
                .descendants_with_tokens()
                .skip(1)
                .filter(|element| element.kind() == kind)
                .collect(),
            None => Vec::new(),
        };
        Ok(self.wrap_all(descendants))
    }

    pub fn first_descendant_of_kind(
        &mut self,
        id: NodeId,
        kind: SyntaxKind,
    ) -> Result<Option<NodeId>, NodeError> {
        let found = self.node(id)?.and_then(|node| {
            node.descendants_with_tokens()
                .skip(1)
                .find(|element| element.kind() == kind)
        });
        Ok(found.map(|element| self.cache.get_or_create(element)))
    }

    /// The significant token at `offset`, preferring the one starting there
    pub fn node_at_offset(&mut self, offset: TextSize) -> Option<NodeId> {
        let token = self
            .tree
            .token_at_offset(offset)
            .filter(|token| !token.kind().is_trivia())
            .last()?;
        Some(self.cache.get_or_create(SyntaxElement::Token(token)))
    }

    fn node(&self, id: NodeId) -> Result<Option<SyntaxNode>, NodeError> {
        Ok(self.cache.element(id)?.into_node())
    }

    fn wrap_all(&mut self, elements: Vec<SyntaxElement>) -> Vec<NodeId> {
        elements
            .into_iter()
            .map(|element| self.cache.get_or_create(element))
            .collect()
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Insert `text` at `pos`
    pub fn insert_text(&mut self, pos: TextSize, text: &str) -> Result<(), EditError> {
        self.replace_text(TextRange::empty(pos), text)
    }

    /// Replace the text in `range` with `text`; wrappers inside the range are
    /// forgotten, everything else keeps its identity
    pub fn replace_text(&mut self, range: TextRange, text: &str) -> Result<(), EditError> {
        self.check_range(range)?;
        let manipulator = InsertionTextManipulator::new(usize::from(range.start()), text)
            .replacing(usize::from(range.len()));
        let handler = self.factory().for_range(
            self.root,
            range.start(),
            range.start() + TextSize::of(text),
            range.len(),
        );
        self.perform(&manipulator, handler, None)
    }

    pub fn remove_text(&mut self, range: TextRange) -> Result<(), EditError> {
        self.replace_text(range, "")
    }

    /// Replace the whole text. Wrappers survive when the new text has the
    /// same shape; otherwise all of them except the root are forgotten.
    pub fn replace_all_text(&mut self, text: &str) -> Result<(), EditError> {
        let manipulator = FullReplacementTextManipulator::new(text);
        let factory = self.factory();
        let handler = factory.for_try_or_forget(factory.straight());
        self.perform(&manipulator, handler, None)
    }

    /// Insert statements at `index` of the statement list owned by `parent`
    /// (the root, a bodied node or a statement list); returns their wrappers
    pub fn insert_statements(
        &mut self,
        parent: NodeId,
        index: usize,
        text: &str,
    ) -> Result<Vec<NodeId>, EditError> {
        let list = self.statement_list(parent, "insert statements into")?;
        let statements: Vec<SyntaxNode> = list.children().collect();
        if index > statements.len() {
            return Err(EditError::IndexOutOfRange {
                index,
                len: statements.len(),
            });
        }

        let newline = self.settings.newline.clone();
        let indent = match statements.first() {
            Some(first) => indentation_at(&self.text, first.text_range().start()).to_string(),
            None => self.empty_list_indent(&list),
        };
        let body = indent_lines(text.trim(), &indent, &newline);
        let (insert_pos, new_text, replacing) = if let Some(next) = statements.get(index) {
            let pos = next.text_range().start();
            (pos, format!("{body}{newline}{indent}"), TextSize::new(0))
        } else if let Some(last) = statements.last() {
            let pos = last.text_range().end();
            (pos, format!("{newline}{indent}{body}"), TextSize::new(0))
        } else {
            self.empty_list_insertion(&list, &body, &indent)
        };

        let list_id = self.cache.get_or_create(SyntaxElement::Node(list));
        let end = insert_pos + TextSize::of(new_text.as_str());
        let mut handler = RangeParentHandler::new(insert_pos, end);
        if replacing > TextSize::new(0) {
            handler = handler.replacing_length(replacing);
        }
        let manipulator = InsertionTextManipulator::new(usize::from(insert_pos), new_text)
            .replacing(usize::from(replacing));
        let handler = self.factory().for_parent_range(list_id, handler);
        self.perform(&manipulator, handler, None)?;

        let after = self.statements(list_id)?;
        let inserted = after.len().saturating_sub(statements.len());
        Ok(after[index..index + inserted].to_vec())
    }

    /// Remove a statement or a list element (with its comma)
    pub fn remove(&mut self, id: NodeId) -> Result<(), EditError> {
        let element = self.cache.element(id)?;
        let list = list_parent(&element).ok_or(EditError::unsupported("remove", element.kind()))?;
        let siblings = precise_children(&SyntaxElement::Node(list.clone()));
        let index = sibling_index(&element).unwrap_or(0);
        let range = element.text_range();

        let (removed, first_index, count) = if is_comma_list(&list) {
            let is_comma = |i: usize| siblings.get(i).is_some_and(|s| s.kind() == SyntaxKind::COMMA);
            if is_comma(index + 1) {
                let end = siblings
                    .get(index + 2)
                    .map_or(siblings[index + 1].text_range().end(), |next| next.text_range().start());
                (TextRange::new(range.start(), end), index, 2)
            } else if index > 0 && is_comma(index - 1) {
                let start = index
                    .checked_sub(2)
                    .map_or(siblings[index - 1].text_range().start(), |prev| {
                        siblings[prev].text_range().end()
                    });
                (TextRange::new(start, range.end()), index - 1, 2)
            } else {
                (range, index, 1)
            }
        } else {
            let removed = match (siblings.get(index + 1), index.checked_sub(1)) {
                (Some(next), _) => TextRange::new(range.start(), next.text_range().start()),
                (None, Some(prev)) => TextRange::new(siblings[prev].text_range().end(), range.end()),
                (None, None) => range,
            };
            (removed, index, 1)
        };

        let list_id = self.cache.get_or_create(SyntaxElement::Node(list));
        let manipulator = InsertionTextManipulator::new(usize::from(removed.start()), "")
            .replacing(usize::from(removed.len()));
        let handler = self
            .factory()
            .for_child_index(list_id, DefaultParentHandler::at_index(-count, first_index));
        self.perform(&manipulator, handler, None)
    }

    /// Replace a node's text; the node itself is forgotten and the wrapper at
    /// its position afterwards is returned. A wrapped name token survives
    /// when the replacement declares the same name.
    pub fn replace_with_text(&mut self, id: NodeId, text: &str) -> Result<NodeId, EditError> {
        let element = self.cache.element(id)?;
        let Some(parent) = element.parent() else {
            self.replace_all_text(text)?;
            return Ok(self.root);
        };
        let child_index = self.child_index(id)?;
        let range = element.text_range();
        let parent_id = self.cache.get_or_create(SyntaxElement::Node(parent));
        let kept_name = self.wrapped_name(&element);
        let handler = RangeParentHandler::new(range.start(), range.start() + TextSize::of(text))
            .replacing_length(range.len())
            .replacing_nodes(vec![element])
            .custom_mappings(Box::new(move |new_parent: &SyntaxElement| {
                kept_name
                    .iter()
                    .filter_map(|(name_id, name)| {
                        let replacement = precise_children(new_parent).into_iter().nth(child_index)?;
                        let new_name = wrapper::name_node(replacement.as_node()?)?;
                        (new_name.text() == name.as_str())
                            .then(|| (*name_id, SyntaxElement::Token(new_name)))
                    })
                    .collect()
            }));
        let manipulator = InsertionTextManipulator::new(usize::from(range.start()), text)
            .replacing(usize::from(range.len()));
        let handler = self.factory().for_parent_range(parent_id, handler);
        self.perform(&manipulator, handler, None)?;

        let children = self.children(parent_id)?;
        children
            .get(child_index)
            .copied()
            .ok_or(EditError::IndexOutOfRange {
                index: child_index,
                len: children.len(),
            })
    }

    /// The wrapped name token of a named node, with its text
    fn wrapped_name(&self, element: &SyntaxElement) -> Option<(NodeId, String)> {
        let name = wrapper::name_node(element.as_node()?)?;
        let name_id = self.cache.get_existing(&SyntaxElement::Token(name.clone()))?;
        Some((name_id, name.text().to_string()))
    }

    /// Insert an element into a comma separated list; `id` is the list or a
    /// node owning one
    pub fn insert_list_element(
        &mut self,
        id: NodeId,
        index: usize,
        text: &str,
    ) -> Result<NodeId, EditError> {
        let kind = self.cache.kind(id)?;
        let list = match self.node(id)? {
            Some(node) if kind == SyntaxKind::SYNTAX_LIST => Some(node),
            Some(node) => child_syntax_list(&node),
            None => None,
        }
        .filter(is_comma_list)
        .ok_or(EditError::unsupported("insert a list element into", kind))?;

        let siblings = precise_children(&SyntaxElement::Node(list.clone()));
        let members: Vec<(usize, TextRange)> = siblings
            .iter()
            .enumerate()
            .filter(|(_, sibling)| sibling.kind() != SyntaxKind::COMMA)
            .map(|(i, sibling)| (i, sibling.text_range()))
            .collect();
        if index > members.len() {
            return Err(EditError::IndexOutOfRange {
                index,
                len: members.len(),
            });
        }

        let (insert_pos, new_text, first_index, count) = match index.checked_sub(1) {
            _ if members.is_empty() => (list.text_range().start(), text.to_string(), 0, 1),
            None => (members[0].1.start(), format!("{text}, "), 0, 2),
            Some(prev) => {
                let (prev_index, prev_range) = members[prev];
                (prev_range.end(), format!(", {text}"), prev_index + 1, 2)
            }
        };

        let list_id = self.cache.get_or_create(SyntaxElement::Node(list));
        let manipulator = InsertionTextManipulator::new(usize::from(insert_pos), new_text);
        let handler = self
            .factory()
            .for_child_index(list_id, DefaultParentHandler::at_index(count, first_index));
        self.perform(&manipulator, handler, None)?;

        let members: Vec<SyntaxElement> = precise_children(&self.cache.element(list_id)?)
            .into_iter()
            .filter(|sibling| sibling.kind() != SyntaxKind::COMMA)
            .collect();
        let len = members.len();
        let inserted = members
            .into_iter()
            .nth(index)
            .ok_or(EditError::IndexOutOfRange { index, len })?;
        Ok(self.cache.get_or_create(inserted))
    }

    /// Move a statement or list element to `new_index` among its siblings
    pub fn set_order(&mut self, id: NodeId, new_index: usize) -> Result<(), EditError> {
        let element = self.cache.element(id)?;
        let list =
            list_parent(&element).ok_or(EditError::unsupported("reorder", element.kind()))?;
        let members: Vec<SyntaxElement> = precise_children(&SyntaxElement::Node(list.clone()))
            .into_iter()
            .filter(|sibling| sibling.kind() != SyntaxKind::COMMA)
            .collect();
        let old_index = members
            .iter()
            .position(|member| *member == element)
            .ok_or(EditError::unsupported("reorder", element.kind()))?;
        if new_index >= members.len() {
            return Err(EditError::IndexOutOfRange {
                index: new_index,
                len: members.len(),
            });
        }
        if old_index == new_index {
            return Ok(());
        }

        let mut order: Vec<usize> = (0..members.len()).collect();
        let moving = order.remove(old_index);
        order.insert(new_index, moving);

        let list_range = list.text_range();
        let mut rebuilt = String::with_capacity(usize::from(list_range.len()));
        let mut cursor = list_range.start();
        for (slot, &member) in order.iter().enumerate() {
            let slot_range = members[slot].text_range();
            rebuilt.push_str(&self.text[TextRange::new(cursor, slot_range.start())]);
            rebuilt.push_str(&self.text[members[member].text_range()]);
            cursor = slot_range.end();
        }
        rebuilt.push_str(&self.text[TextRange::new(cursor, list_range.end())]);

        let list_id = self.cache.get_or_create(SyntaxElement::Node(list));
        let manipulator = InsertionTextManipulator::new(usize::from(list_range.start()), rebuilt)
            .replacing(usize::from(list_range.len()));
        let handler = self
            .factory()
            .for_changing_child_order(list_id, old_index, new_index);
        self.perform(&manipulator, handler, None)
    }

    /// Replace a bodied statement with the statements of its body
    pub fn unwrap(&mut self, id: NodeId) -> Result<(), EditError> {
        let element = self.cache.element(id)?;
        let node = match &element {
            SyntaxElement::Node(node) if is_bodied(node.kind()) => node.clone(),
            _ => return Err(EditError::unsupported("unwrap", element.kind())),
        };
        // only the then-branch would survive
        if node.children_with_tokens().any(|child| child.kind() == SyntaxKind::ELSE_KW) {
            return Err(EditError::unsupported("unwrap", node.kind()));
        }
        let list = list_parent(&element)
            .filter(|list| !is_comma_list(list))
            .ok_or(EditError::unsupported("unwrap", element.kind()))?;
        let child_index = sibling_index(&element).unwrap_or(0);
        let manipulator = UnwrapTextManipulator::new(&self.tree, &node, &self.settings)?;
        let list_id = self.cache.get_or_create(SyntaxElement::Node(list));
        let handler = self.factory().for_unwrapping_node(list_id, child_index);
        self.perform(&manipulator, handler, None)
    }

    /// Rename the symbol named by `id` (an identifier or a named node)
    /// everywhere in this file
    pub fn rename(&mut self, id: NodeId, new_name: &str) -> Result<(), EditError> {
        let name = self.name_text(id)?;
        if name == new_name {
            return Ok(());
        }
        let locations = self.rename_locations(&name, true);
        self.apply_rename(locations, new_name)
    }

    /// The name a rename of `id` would replace
    pub fn name_text(&self, id: NodeId) -> Result<String, EditError> {
        match self.cache.element(id)? {
            SyntaxElement::Token(token) if token.kind() == SyntaxKind::IDENT => {
                Ok(token.text().to_string())
            }
            SyntaxElement::Node(node) => wrapper::name_node(&node)
                .map(|token| token.text().to_string())
                .ok_or(EditError::unsupported("rename", node.kind())),
            SyntaxElement::Token(token) => Err(EditError::unsupported("rename", token.kind())),
        }
    }

    /// Identifiers referring to `name`, matched by text.
    ///
    /// Property names, member accesses and the external side of aliased
    /// specifiers are not references and are skipped. Shorthand properties
    /// always get prefix text that keeps the property name. With
    /// `keep_external_names`, bare specifiers get an alias so the name they
    /// import or export stays the same; otherwise they are renamed too.
    pub fn rename_locations(&self, name: &str, keep_external_names: bool) -> Vec<RenameLocation> {
        self.tree
            .descendants_with_tokens()
            .filter_map(SyntaxElement::into_token)
            .filter(|token| token.kind() == SyntaxKind::IDENT && token.text() == name)
            .filter_map(|token| {
                let location = RenameLocation::new(token.text_range());
                let parent = token.parent()?;
                let after_dot = significant_sibling(&token, Direction::Prev)
                    .is_some_and(|prev| prev.kind() == SyntaxKind::DOT);
                let before_colon = significant_sibling(&token, Direction::Next)
                    .is_some_and(|next| next.kind() == SyntaxKind::COLON);
                let is_first = parent
                    .children_with_tokens()
                    .filter_map(SyntaxElement::into_token)
                    .find(|t| t.kind() == SyntaxKind::IDENT)
                    .is_some_and(|first| first == token);
                let aliased = wrapper::property_name_node(&parent).is_some();
                match parent.kind() {
                    SyntaxKind::PROPERTY_ACCESS_EXPRESSION if after_dot => None,
                    SyntaxKind::PROPERTY_ASSIGNMENT if before_colon => None,
                    SyntaxKind::SHORTHAND_PROPERTY_ASSIGNMENT => {
                        Some(location.with_prefix(format!("{name}: ")))
                    }
                    SyntaxKind::IMPORT_SPECIFIER if aliased && is_first => None,
                    SyntaxKind::IMPORT_SPECIFIER if !aliased && keep_external_names => {
                        Some(location.with_prefix(format!("{name} as ")))
                    }
                    SyntaxKind::EXPORT_SPECIFIER if aliased && !is_first => None,
                    SyntaxKind::EXPORT_SPECIFIER if !aliased && keep_external_names => {
                        Some(location.with_suffix(format!(" as {name}")))
                    }
                    _ => Some(location),
                }
            })
            .collect()
    }

    /// Substitute `new_name` at `locations`. Wrappers follow where the shape
    /// allows it; otherwise every wrapper but the root is forgotten.
    pub fn apply_rename(
        &mut self,
        locations: Vec<RenameLocation>,
        new_name: &str,
    ) -> Result<(), EditError> {
        let manipulator = RenameLocationTextManipulator::new(locations, new_name)?;
        let factory = self.factory();
        let handler = factory.for_try_or_forget(factory.for_rename());
        self.perform(&manipulator, handler, None)
    }

    /// Move the file to `new_path`, reparsing under its script kind
    pub fn move_to(&mut self, new_path: impl Into<PathBuf>) -> Result<(), EditError> {
        let manipulator = FullReplacementTextManipulator::new(self.text.clone());
        let handler = self.factory().straight();
        self.perform(&manipulator, handler, Some(new_path.into()))
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn factory(&self) -> NodeHandlerFactory {
        NodeHandlerFactory::new(self.root)
    }

    fn perform(
        &mut self,
        manipulator: &dyn TextManipulator,
        mut handler: Box<dyn NodeHandler>,
        new_path: Option<PathBuf>,
    ) -> Result<(), EditError> {
        let oracle = Arc::clone(&self.oracle);
        Orchestrator::new(oracle.as_ref()).perform(self, manipulator, handler.as_mut(), new_path)?;
        Ok(())
    }

    fn check_range(&self, range: TextRange) -> Result<(), EditError> {
        let (start, end) = (usize::from(range.start()), usize::from(range.end()));
        if end > self.text.len()
            || !self.text.is_char_boundary(start)
            || !self.text.is_char_boundary(end)
        {
            return Err(EditError::RangeOutOfBounds {
                start: u32::from(range.start()),
                end: u32::from(range.end()),
                len: self.text.len(),
            });
        }
        Ok(())
    }

    fn statement_list(
        &self,
        parent: NodeId,
        operation: &'static str,
    ) -> Result<SyntaxNode, EditError> {
        let kind = self.cache.kind(parent)?;
        let list = match self.node(parent)? {
            Some(node) if kind == SyntaxKind::SYNTAX_LIST => Some(node),
            Some(node) if kind == SyntaxKind::SOURCE_FILE || is_bodied(kind) => {
                child_syntax_list(&node)
            }
            _ => None,
        };
        list.filter(|list| !is_comma_list(list))
            .ok_or(EditError::unsupported(operation, kind))
    }

    fn empty_list_indent(&self, list: &SyntaxNode) -> String {
        match list.parent() {
            Some(block) if block.kind() == SyntaxKind::BLOCK => {
                let owner = block.parent().filter(|p| is_bodied(p.kind())).unwrap_or(block);
                let outer = indentation_at(&self.text, owner.text_range().start());
                format!("{outer}{}", self.settings.indent(1))
            }
            _ => String::new(),
        }
    }

    /// Where and what to insert into a statement list with no statements
    fn empty_list_insertion(
        &self,
        list: &SyntaxNode,
        body: &str,
        indent: &str,
    ) -> (TextSize, String, TextSize) {
        let braces = list.parent().filter(|p| p.kind() == SyntaxKind::BLOCK).and_then(|block| {
            let open = block.first_token().filter(|t| t.kind() == SyntaxKind::L_BRACE)?;
            let close = block.last_token().filter(|t| t.kind() == SyntaxKind::R_BRACE)?;
            Some((block, open, close))
        });
        match braces {
            Some((block, open, close)) => {
                let inner = TextRange::new(open.text_range().end(), close.text_range().start());
                if self.text[inner].trim().is_empty() {
                    let owner = block.parent().filter(|p| is_bodied(p.kind())).unwrap_or(block);
                    let outer = indentation_at(&self.text, owner.text_range().start());
                    let newline = &self.settings.newline;
                    let text = format!("{newline}{indent}{body}{newline}{outer}");
                    (inner.start(), text, inner.len())
                } else {
                    (list.text_range().start(), body.to_string(), TextSize::new(0))
                }
            }
            None => (list.text_range().start(), body.to_string(), TextSize::new(0)),
        }
    }
}

impl ManipulationTarget for SourceFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn cache_mut(&mut self) -> &mut NodeCache {
        &mut self.cache
    }

    fn root_id(&self) -> NodeId {
        self.root
    }

    fn before_modify(&mut self) {
        for hook in &mut self.before_modify {
            hook(&self.path);
        }
    }

    fn commit(&mut self, text: String, tree: SyntaxNode, path: PathBuf, script_kind: ScriptKind) {
        self.text = text;
        self.tree = tree;
        self.path = path;
        self.script_kind = script_kind;
    }
}

/// The statement or comma list directly holding `element`
fn list_parent(element: &SyntaxElement) -> Option<SyntaxNode> {
    element
        .parent()
        .filter(|parent| parent.kind() == SyntaxKind::SYNTAX_LIST)
}

/// Statement lists belong to the root or a block; every other list is
/// comma separated
fn is_comma_list(list: &SyntaxNode) -> bool {
    !matches!(
        list.parent().map(|parent| parent.kind()),
        Some(SyntaxKind::SOURCE_FILE | SyntaxKind::BLOCK) | None
    )
}

/// Nearest non-trivia sibling of `token` in `direction`
fn significant_sibling(token: &SyntaxToken, direction: Direction) -> Option<SyntaxElement> {
    let mut sibling = SyntaxElement::Token(token.clone());
    loop {
        sibling = match direction {
            Direction::Prev => sibling.prev_sibling_or_token()?,
            Direction::Next => sibling.next_sibling_or_token()?,
        };
        if !sibling.kind().is_trivia() {
            return Some(sibling);
        }
    }
}

fn sibling_index(element: &SyntaxElement) -> Option<usize> {
    let parent = element.parent()?;
    precise_children(&SyntaxElement::Node(parent))
        .iter()
        .position(|sibling| sibling == element)
}

/// Leading whitespace of the line containing `offset`
fn indentation_at(text: &str, offset: TextSize) -> &str {
    let offset = usize::from(offset);
    let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &text[line_start..];
    &line[..line.len() - line.trim_start_matches([' ', '\t']).len()]
}

/// Put every line after the first on its own line at `indent`
fn indent_lines(text: &str, indent: &str, newline: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push_str(newline);
            if !line.trim().is_empty() {
                out.push_str(indent);
            }
        }
        out.push_str(line.trim_end());
    }
    out
}
