use super::{InsertionTextManipulator, TextManipulator};
use crate::manipulation::error::ReconcileError;
use crate::manipulation::settings::ManipulationSettings;
use crate::parser::{SyntaxKind, SyntaxNode, TextSize};
use crate::wrapper::{body, child_syntax_list};

/// Replace a bodied node with the statements of its body, dedented by the
/// indentation the body added
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnwrapTextManipulator {
    inner: InsertionTextManipulator,
}

impl UnwrapTextManipulator {
    /// `node` must belong to the tree rooted at `root`, whose text is the
    /// file's current text
    pub fn new(
        root: &SyntaxNode,
        node: &SyntaxNode,
        settings: &ManipulationSettings,
    ) -> Result<Self, ReconcileError> {
        let text = root.text().to_string();
        let body = body(node).ok_or_else(|| {
            ReconcileError::NotSupported(format!("{:?} has no body to unwrap", node.kind()))
        })?;
        let (Some(open), Some(close)) = (body.first_token(), body.last_token()) else {
            return Err(ReconcileError::text_edit("empty body"));
        };
        if open.kind() != SyntaxKind::L_BRACE || close.kind() != SyntaxKind::R_BRACE {
            return Err(ReconcileError::text_edit("body is not enclosed in braces"));
        }
        let inner_start = usize::from(open.text_range().end());
        let inner_end = usize::from(close.text_range().start());

        let node_indent = line_indent(&text, usize::from(node.text_range().start()), settings);
        let body_indent = child_syntax_list(&body)
            .and_then(|list| list.first_child_or_token())
            .map(|first| line_indent(&text, usize::from(first.text_range().start()), settings))
            .unwrap_or(node_indent);
        let delta = body_indent.saturating_sub(node_indent);

        let in_string_at = |offset: usize| is_in_string(root, offset);
        let replacement =
            dedent(&text[inner_start..inner_end], inner_start, delta, settings, in_string_at);
        let range = node.text_range();
        Ok(Self {
            inner: InsertionTextManipulator::new(usize::from(range.start()), replacement.trim())
                .replacing(usize::from(range.len())),
        })
    }

    pub fn replacement(&self) -> &str {
        self.inner.inserted_text()
    }
}

impl TextManipulator for UnwrapTextManipulator {
    fn new_text(&self, old_text: &str) -> Result<String, ReconcileError> {
        self.inner.new_text(old_text)
    }

    fn text_for_error(&self, new_text: &str) -> String {
        self.inner.text_for_error(new_text)
    }
}

/// Indentation width of the line containing `offset`
fn line_indent(text: &str, offset: usize, settings: &ManipulationSettings) -> usize {
    let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &text[line_start..];
    let whitespace_len = line.len() - line.trim_start_matches([' ', '\t']).len();
    settings.indent_width(&line[..whitespace_len])
}

fn is_in_string(root: &SyntaxNode, offset: usize) -> bool {
    let offset = TextSize::new(offset as u32);
    root.token_at_offset(offset)
        .any(|token| token.kind().is_string_like() && token.text_range().start() < offset)
}

/// Strip up to `delta` columns of leading whitespace from every line that
/// does not start inside a string or template literal. `base` is the
/// offset of `text` in the file.
fn dedent(
    text: &str,
    base: usize,
    delta: usize,
    settings: &ManipulationSettings,
    in_string_at: impl Fn(usize) -> bool,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut line_start = 0;
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if i == 0 || in_string_at(base + line_start) {
            out.push_str(line);
        } else {
            out.push_str(strip_columns(line, delta, settings));
        }
        line_start += line.len() + 1;
    }
    out
}

fn strip_columns<'a>(line: &'a str, columns: usize, settings: &ManipulationSettings) -> &'a str {
    let mut width = 0;
    for (i, c) in line.char_indices() {
        if width >= columns {
            return &line[i..];
        }
        match c {
            ' ' => width += 1,
            '\t' => width += settings.indent_size,
            _ => return &line[i..],
        }
    }
    ""
}
