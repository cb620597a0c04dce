//! Source ranges of nodes, with attached comments and whole lines
//!
//! A node's own range spans its significant tokens. The *extended* range also
//! covers comments that belong to the node: comments on their own lines
//! directly above it (a blank line detaches them) and a comment following it
//! on the same line. Removing, moving or copying a node uses the extended
//! range so its comments travel with it.

use rowan::{TextRange, TextSize};

use crate::syntax::trivia::{TriviaCollector, TriviaToken, first_significant_token, prev_token};
use crate::syntax::{JavaSyntaxKind, JavaSyntaxNode};

/// Range of a node including its attached comments
pub fn extended_range(node: &JavaSyntaxNode) -> TextRange {
    let range = node.text_range();
    if range.is_empty() {
        return range;
    }
    let trivia = TriviaCollector::new().collect_node_trivia(node);
    let at_file_start = first_significant_token(node)
        .map(|first| {
            std::iter::successors(prev_token(&first), prev_token).all(|t| t.kind().is_trivia())
        })
        .unwrap_or(true);

    let start = leading_comment_start(&trivia.leading, at_file_start).unwrap_or(range.start());
    let text_end = node
        .ancestors()
        .last()
        .map(|root| root.text_range().end())
        .unwrap_or(range.end());
    let end = trailing_comment_end(&trivia.trailing, text_end).unwrap_or(range.end());
    TextRange::new(start.min(range.start()), end.max(range.end()))
}

fn leading_comment_start(leading: &[TriviaToken], at_file_start: bool) -> Option<TextSize> {
    let mut start = None;
    let mut newlines = 0;
    for (index, token) in leading.iter().enumerate().rev() {
        match token.kind {
            JavaSyntaxKind::Whitespace => {}
            JavaSyntaxKind::Newline => {
                newlines += 1;
                if newlines > 1 {
                    break;
                }
            }
            _ => {
                if !starts_line(&leading[..index], at_file_start) {
                    break;
                }
                start = Some(token.range.start());
                newlines = 0;
            }
        }
    }
    start
}

/// Whether only whitespace precedes the trivia token following `before` on its line
fn starts_line(before: &[TriviaToken], at_file_start: bool) -> bool {
    for token in before.iter().rev() {
        match token.kind {
            JavaSyntaxKind::Whitespace => {}
            JavaSyntaxKind::Newline => return true,
            _ => return false,
        }
    }
    at_file_start
}

fn trailing_comment_end(trailing: &[TriviaToken], text_end: TextSize) -> Option<TextSize> {
    let comment = trailing.iter().rev().find(|t| t.is_comment())?;
    let last = trailing.last()?;
    if last.is_newline() || last.range.end() == text_end {
        Some(comment.range.end())
    } else {
        None
    }
}

/// Extended range widened to whole lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub range: TextRange,
    /// Whether the node occupies its lines alone
    pub alone: bool,
}

/// Resolves ranges and indentation against the original text
#[derive(Debug, Clone, Copy)]
pub struct SourceRangeResolver<'a> {
    source: &'a str,
}

impl<'a> SourceRangeResolver<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn node_range(&self, node: &JavaSyntaxNode) -> TextRange {
        node.text_range()
    }

    pub fn extended_range(&self, node: &JavaSyntaxNode) -> TextRange {
        extended_range(node)
    }

    /// Offset of the start of the line containing `offset`
    pub fn line_start(&self, offset: TextSize) -> TextSize {
        let offset = usize::from(offset).min(self.source.len());
        let start = self.source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
        TextSize::from(start as u32)
    }

    /// Offset of the line break ending the line containing `offset`, or the end of text
    pub fn line_end(&self, offset: TextSize) -> TextSize {
        let offset = usize::from(offset).min(self.source.len());
        let end = self.source[offset..]
            .find('\n')
            .map(|i| offset + i)
            .unwrap_or(self.source.len());
        TextSize::from(end as u32)
    }

    pub fn line_range(&self, node: &JavaSyntaxNode) -> LineRange {
        let extended = extended_range(node);
        let line_start = self.line_start(extended.start());
        let line_end = self.line_end(extended.end());
        let before = &self.source[TextRange::new(line_start, extended.start())];
        let after = &self.source[TextRange::new(extended.end(), line_end)];
        let starts_line = before.chars().all(|c| c == ' ' || c == '\t');
        let ends_line = after.trim().is_empty();

        let start = if starts_line { line_start } else { extended.start() };
        let end = if ends_line {
            let with_newline = usize::from(line_end) + 1;
            if with_newline <= self.source.len() {
                TextSize::from(with_newline as u32)
            } else {
                line_end
            }
        } else {
            extended.end()
        };
        LineRange {
            range: TextRange::new(start, end),
            alone: starts_line && ends_line,
        }
    }

    /// Leading whitespace of the line containing `offset`
    pub fn indent_at(&self, offset: TextSize) -> &'a str {
        let start = usize::from(self.line_start(offset));
        let line = &self.source[start..];
        let width = line.len() - line.trim_start_matches([' ', '\t']).len();
        &line[..width]
    }

    /// Whether the range `[start, end)` spans a line break
    pub fn spans_lines(&self, range: TextRange) -> bool {
        self.source[range].contains('\n')
    }

    /// Whether the line preceding the line of `offset` is blank
    pub fn preceded_by_blank_line(&self, offset: TextSize) -> bool {
        let start = self.line_start(offset);
        if start == TextSize::from(0) {
            return false;
        }
        let prev_start = self.line_start(start - TextSize::from(1));
        self.source[TextRange::new(prev_start, start)].trim().is_empty()
    }
}

/// Re-indent every line after the first from indentation `from` to `to`
///
/// Lines indented less than `from` are aligned to `to`; blank lines stay empty.
pub fn reindent(text: &str, from: &str, to: &str) -> String {
    if from == to || !text.contains('\n') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
            if line.trim().is_empty() {
                continue;
            }
            out.push_str(to);
            out.push_str(line.strip_prefix(from).unwrap_or(line.trim_start()));
        } else {
            out.push_str(line);
        }
    }
    out
}

/// Rewrite the leading `from` units of every line after the first as `to` units
///
/// Used when formatter output indented with spaces lands in a tab-indented file.
pub fn convert_indent_unit(text: &str, from: &str, to: &str) -> String {
    if from.is_empty() || from == to || !text.contains('\n') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
            let mut rest = line;
            while let Some(stripped) = rest.strip_prefix(from) {
                out.push_str(to);
                rest = stripped;
            }
            out.push_str(rest);
        } else {
            out.push_str(line);
        }
    }
    out
}

/// Prefix every non-empty line after the first with `indent`
pub fn indent_lines(text: &str, indent: &str) -> String {
    reindent(text, "", indent)
}
