//! Text edits for rewritten lists
//!
//! Inline lists (parameters, arguments, modifiers, ...) keep every original
//! gap that is not next to a removed or inserted element. Line-based lists
//! (statements, body declarations, imports, types) delete and insert whole
//! lines at the indentation of the surrounding elements.

use rowan::{TextRange, TextSize};
use tracing::trace;

use super::analyzer::RewriteAnalyzer;
use super::edit::TextEdit;
use super::event::{ChangeKind, ListEntry};
use super::node::Node;
use super::property::PropertyDescriptor;
use super::slots::{self, EmptyInsert, ListLayout, ListSlot, Removal, Separator};
use crate::syntax::{JavaSyntaxKind, JavaSyntaxNode};
use crate::{Result, RewriteError};

/// Entries between two anchors
#[derive(Default)]
struct Gap<'e> {
    removed: Vec<&'e JavaSyntaxNode>,
    inserted: Vec<&'e Node>,
}

impl Gap<'_> {
    fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.inserted.is_empty()
    }
}

impl RewriteAnalyzer<'_> {
    pub(super) fn list_edits(
        &mut self,
        parent: &JavaSyntaxNode,
        property: PropertyDescriptor,
        entries: &[ListEntry],
        edits: &mut Vec<TextEdit>,
    ) -> Result<()> {
        let slot = slots::list_slot(parent, property);
        trace!(property = %property, entries = entries.len(), "rewriting list");
        match slot.layout {
            ListLayout::Lines { .. } if self.is_single_line_block(parent, &slot) => {
                // Emptying `{ a(); }` leaves `{}` unless the braces hold comments
                let has_comments = parent.children_with_tokens().any(|e| e.kind().is_comment());
                let clear = match &slot.empty_insert {
                    EmptyInsert::Braced { open, close } if !has_comments => Some(Removal {
                        range: TextRange::new(*open, *close),
                        replacement: String::new(),
                    }),
                    _ => None,
                };
                let slot = ListSlot {
                    layout: ListLayout::Inline {
                        separator: Separator::Space,
                        reuse_multiline: false,
                    },
                    clear,
                    ..slot
                };
                self.inline_edits(property, &slot, entries, edits)
            }
            ListLayout::Lines { blank_lines } => {
                self.line_edits(property, &slot, blank_lines, entries, edits)
            }
            ListLayout::Inline { .. } => self.inline_edits(property, &slot, entries, edits),
        }
    }

    fn is_single_line_block(&self, parent: &JavaSyntaxNode, slot: &ListSlot) -> bool {
        parent.kind() == JavaSyntaxKind::Block
            && !slot.elements.is_empty()
            && !self.resolver.spans_lines(parent.text_range())
    }

    /// Kept and replaced entries, with their rendering
    fn anchor_edits(&mut self, entries: &[ListEntry], edits: &mut Vec<TextEdit>) -> Result<()> {
        for entry in entries {
            match (entry.change_kind(), &entry.original, &entry.new) {
                (ChangeKind::Unchanged, Some(original), _) => self.visit(original, edits)?,
                (ChangeKind::Replaced, Some(original), Some(new)) => {
                    let range = original.text_range();
                    let indent = self.resolver.indent_at(range.start());
                    let text = self.render(new, indent)?;
                    edits.push(TextEdit::new(range, text));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn render_all(&mut self, nodes: &[&Node], offset: TextSize) -> Result<Vec<String>> {
        let indent = self.resolver.indent_at(offset);
        nodes.iter().map(|n| self.render(n, indent)).collect()
    }

    // ========================================================================
    // Inline lists
    // ========================================================================

    fn separator(&self, slot: &ListSlot) -> String {
        let ListLayout::Inline {
            separator,
            reuse_multiline,
        } = slot.layout
        else {
            return "\n".to_string();
        };
        if let [first, second, ..] = slot.elements.as_slice() {
            let gap = &self.resolver.source()[TextRange::new(first.text_range().end(), second.text_range().start())];
            let token_ok = match separator {
                Separator::Comma => gap.trim() == ",",
                Separator::Space => gap.trim().is_empty() && !gap.is_empty(),
            };
            if token_ok && (reuse_multiline || !gap.contains('\n')) {
                return gap.to_string();
            }
        }
        match separator {
            Separator::Comma if self.formatter.space_after_comma() => ", ".to_string(),
            Separator::Comma => ",".to_string(),
            Separator::Space => " ".to_string(),
        }
    }

    fn inline_edits(
        &mut self,
        property: PropertyDescriptor,
        slot: &ListSlot,
        entries: &[ListEntry],
        edits: &mut Vec<TextEdit>,
    ) -> Result<()> {
        let sep = self.separator(slot);
        self.anchor_edits(entries, edits)?;

        // Split entries into the run before the first anchor, gaps between
        // anchors and the run after the last one
        let mut anchors: Vec<&JavaSyntaxNode> = Vec::new();
        let mut gaps: Vec<Gap> = vec![Gap::default()];
        for entry in entries {
            let current = gaps.len() - 1;
            match (&entry.original, &entry.new) {
                (Some(original), Some(_)) => {
                    anchors.push(original);
                    gaps.push(Gap::default());
                }
                (Some(original), None) => gaps[current].removed.push(original),
                (None, Some(new)) => gaps[current].inserted.push(new),
                (None, None) => {}
            }
        }

        if anchors.is_empty() {
            return self.inline_without_anchors(property, slot, &gaps[0], &sep, edits);
        }

        for (index, gap) in gaps.iter().enumerate() {
            if gap.is_empty() {
                continue;
            }
            let before = index.checked_sub(1).map(|i| anchors[i]);
            let after = anchors.get(index).copied();
            match (before, after) {
                // Leading run
                (None, Some(next)) => {
                    let start = gap
                        .removed
                        .first()
                        .map(|r| r.text_range().start())
                        .unwrap_or(next.text_range().start());
                    let mut text = String::new();
                    for rendered in self.render_all(&gap.inserted, next.text_range().start())? {
                        text.push_str(&rendered);
                        text.push_str(&sep);
                    }
                    edits.push(TextEdit::new(TextRange::new(start, next.text_range().start()), text));
                }
                // Trailing run
                (Some(prev), None) => {
                    let end = gap
                        .removed
                        .last()
                        .map(|r| r.text_range().end())
                        .unwrap_or(prev.text_range().end());
                    let mut text = String::new();
                    for rendered in self.render_all(&gap.inserted, prev.text_range().end())? {
                        text.push_str(&sep);
                        text.push_str(&rendered);
                    }
                    edits.push(TextEdit::new(TextRange::new(prev.text_range().end(), end), text));
                }
                (Some(prev), Some(next)) => {
                    let rendered = self.render_all(&gap.inserted, next.text_range().start())?;
                    if gap.removed.is_empty() {
                        let mut text = String::new();
                        for r in rendered {
                            text.push_str(&r);
                            text.push_str(&sep);
                        }
                        edits.push(TextEdit::insert(next.text_range().start(), text));
                    } else {
                        let mut text = sep.clone();
                        for r in rendered {
                            text.push_str(&r);
                            text.push_str(&sep);
                        }
                        edits.push(TextEdit::new(
                            TextRange::new(prev.text_range().end(), next.text_range().start()),
                            text,
                        ));
                    }
                }
                (None, None) => {}
            }
        }
        Ok(())
    }

    fn inline_without_anchors(
        &mut self,
        property: PropertyDescriptor,
        slot: &ListSlot,
        gap: &Gap,
        sep: &str,
        edits: &mut Vec<TextEdit>,
    ) -> Result<()> {
        let span = match (gap.removed.first(), gap.removed.last()) {
            (Some(first), Some(last)) => Some(TextRange::new(first.text_range().start(), last.text_range().end())),
            _ => None,
        };

        if gap.inserted.is_empty() {
            if let Some(span) = span {
                match &slot.clear {
                    Some(clear) => edits.push(TextEdit::new(clear.range, clear.replacement.clone())),
                    None => edits.push(TextEdit::delete(span)),
                }
            }
            return Ok(());
        }

        match (span, &slot.empty_insert) {
            (Some(span), _) => {
                let text = self.render_all(&gap.inserted, span.start())?.join(sep);
                edits.push(TextEdit::new(span, text));
            }
            (None, EmptyInsert::Inline(point)) => {
                let text = self.render_all(&gap.inserted, point.range.start())?.join(sep);
                edits.push(TextEdit::new(
                    point.range,
                    format!("{}{}{}", point.prefix, text, point.suffix),
                ));
            }
            (None, _) => {
                return Err(RewriteError::invalid_value(
                    property.to_string(),
                    "",
                    "no insertion point for an empty list in this context",
                ));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Line-based lists
    // ========================================================================

    fn list_indent(&self, slot: &ListSlot) -> String {
        if let Some(first) = slot.elements.first() {
            return self.resolver.indent_at(first.text_range().start()).to_string();
        }
        match &slot.empty_insert {
            EmptyInsert::Braced { open, .. } => {
                let outer = self.resolver.indent_at(*open);
                format!("{outer}{}", self.indent_unit_for(outer))
            }
            _ => String::new(),
        }
    }

    fn line_edits(
        &mut self,
        property: PropertyDescriptor,
        slot: &ListSlot,
        blank_lines: bool,
        entries: &[ListEntry],
        edits: &mut Vec<TextEdit>,
    ) -> Result<()> {
        let indent = self.list_indent(slot);
        let always_blank = property.id() == "TYPES";
        let needs_blank = |a: JavaSyntaxKind, b: JavaSyntaxKind| {
            blank_lines
                && (always_blank
                    || [a, b]
                        .iter()
                        .any(|k| matches!(k, JavaSyntaxKind::MethodDecl | JavaSyntaxKind::TypeDecl)))
        };

        self.anchor_edits(entries, edits)?;
        self.line_removals(entries, edits);

        if entries.iter().all(|e| e.original.is_none()) {
            let inserted: Vec<&Node> = entries.iter().filter_map(|e| e.new.as_ref()).collect();
            return self.lines_into_empty(property, slot, &inserted, &indent, needs_blank, edits);
        }

        let source = self.resolver.source();
        let mut index = 0;
        while index < entries.len() {
            if entries[index].original.is_some() {
                index += 1;
                continue;
            }
            let run_start = index;
            while index < entries.len() && entries[index].original.is_none() {
                index += 1;
            }
            let run: Vec<&Node> = entries[run_start..index].iter().filter_map(|e| e.new.as_ref()).collect();
            let previous = entries[..run_start].iter().rev().find_map(|e| e.original.as_ref());
            let following = entries[index..].iter().find_map(|e| e.original.as_ref());

            let mut text = String::new();
            match (previous, following) {
                (Some(prev), _) => {
                    let line = self.resolver.line_range(prev);
                    let at = line.range.end();
                    let ends_with_newline = at > TextSize::from(0)
                        && source.as_bytes().get(usize::from(at) - 1) == Some(&b'\n');
                    let mut prev_kind = prev.kind();
                    let mut pieces = Vec::new();
                    for node in &run {
                        let blank = if needs_blank(prev_kind, node.kind()) { "\n" } else { "" };
                        let rendered = self.render(node, &indent)?;
                        pieces.push(format!("{blank}{indent}{rendered}"));
                        prev_kind = node.kind();
                    }
                    if ends_with_newline {
                        for piece in pieces {
                            text.push_str(&piece);
                            text.push('\n');
                        }
                    } else {
                        for piece in pieces {
                            text.push('\n');
                            text.push_str(&piece);
                        }
                    }
                    if let Some(next) = following.filter(|n| self.is_kept(entries, n))
                        && needs_blank(prev_kind, next.kind())
                        && !self.resolver.preceded_by_blank_line(self.resolver.line_range(next).range.start())
                    {
                        text.push('\n');
                    }
                    edits.push(TextEdit::insert(at, text));
                }
                (None, Some(next)) => {
                    let at = self.resolver.line_range(next).range.start();
                    for (i, node) in run.iter().enumerate() {
                        let rendered = self.render(node, &indent)?;
                        text.push_str(&indent);
                        text.push_str(&rendered);
                        text.push('\n');
                        let next_kind = run.get(i + 1).map(|n| n.kind()).unwrap_or(next.kind());
                        if needs_blank(node.kind(), next_kind) {
                            text.push('\n');
                        }
                    }
                    edits.push(TextEdit::insert(at, text));
                }
                (None, None) => {}
            }
        }
        Ok(())
    }

    fn is_kept(&self, entries: &[ListEntry], node: &JavaSyntaxNode) -> bool {
        entries
            .iter()
            .any(|e| e.original.as_ref() == Some(node) && e.new.is_some())
    }

    /// Delete the lines of removed elements, taking one adjacent blank line along
    fn line_removals(&self, entries: &[ListEntry], edits: &mut Vec<TextEdit>) {
        let source = self.resolver.source();
        let mut claimed = TextSize::from(0);
        for entry in entries {
            let (Some(original), None) = (&entry.original, &entry.new) else {
                if let Some(original) = &entry.original {
                    claimed = claimed.max(self.resolver.line_range(original).range.end());
                }
                continue;
            };
            let line = self.resolver.line_range(original);
            let mut range = line.range;
            if line.alone {
                let blank_before = self.resolver.preceded_by_blank_line(range.start());
                let prev_line_start = if range.start() > TextSize::from(0) {
                    self.resolver.line_start(range.start() - TextSize::from(1))
                } else {
                    range.start()
                };
                let next_line_end = self.resolver.line_end(range.end());
                let blank_after = range.end() < next_line_end
                    && source[TextRange::new(range.end(), next_line_end)].trim().is_empty()
                    && usize::from(next_line_end) < source.len();
                if blank_before && prev_line_start >= claimed {
                    range = TextRange::new(prev_line_start, range.end());
                } else if blank_after && !blank_before {
                    range = TextRange::new(range.start(), next_line_end + TextSize::from(1));
                }
            } else {
                // Sharing a line: take the horizontal whitespace on one side
                let bytes = source.as_bytes();
                let mut start = usize::from(range.start());
                let mut end = usize::from(range.end());
                while start > 0 && matches!(bytes[start - 1], b' ' | b'\t') {
                    start -= 1;
                }
                if start > 0 && bytes[start - 1] != b'\n' {
                    range = TextRange::new(TextSize::from(start as u32), range.end());
                } else {
                    while end < bytes.len() && matches!(bytes[end], b' ' | b'\t') {
                        end += 1;
                    }
                    range = TextRange::new(range.start(), TextSize::from(end as u32));
                }
            }
            trace!(range = ?range, "removing line element");
            claimed = range.end();
            edits.push(TextEdit::delete(range));
        }
    }

    fn lines_into_empty(
        &mut self,
        property: PropertyDescriptor,
        slot: &ListSlot,
        inserted: &[&Node],
        indent: &str,
        needs_blank: impl Fn(JavaSyntaxKind, JavaSyntaxKind) -> bool,
        edits: &mut Vec<TextEdit>,
    ) -> Result<()> {
        if inserted.is_empty() {
            return Ok(());
        }
        let mut lines = String::new();
        for (i, node) in inserted.iter().enumerate() {
            if i > 0 {
                lines.push('\n');
                if needs_blank(inserted[i - 1].kind(), node.kind()) {
                    lines.push('\n');
                }
            }
            let rendered = self.render(node, indent)?;
            lines.push_str(indent);
            lines.push_str(&rendered);
        }

        match &slot.empty_insert {
            EmptyInsert::Braced { open, close } => {
                let outer = self.resolver.indent_at(*open);
                let inner = &self.resolver.source()[TextRange::new(*open, *close)];
                if inner.trim().is_empty() {
                    edits.push(TextEdit::new(
                        TextRange::new(*open, *close),
                        format!("\n{lines}\n{outer}"),
                    ));
                } else {
                    // Keep comments inside the braces and add the lines after them
                    let close_line = self.resolver.line_start(*close);
                    let close_starts_line = self.resolver.source()[TextRange::new(close_line, *close)]
                        .trim()
                        .is_empty();
                    if close_starts_line {
                        edits.push(TextEdit::insert(close_line, format!("{lines}\n")));
                    } else {
                        edits.push(TextEdit::insert(*close, format!("\n{lines}\n{outer}")));
                    }
                }
            }
            EmptyInsert::Lines { offset, prefix, suffix } => {
                edits.push(TextEdit::insert(*offset, format!("{prefix}{}{suffix}", lines.trim_start())));
            }
            EmptyInsert::Inline(point) => {
                edits.push(TextEdit::new(
                    point.range,
                    format!("{}{}{}", point.prefix, lines.trim_start(), point.suffix),
                ));
            }
            EmptyInsert::Unsupported => {
                return Err(RewriteError::invalid_value(
                    property.to_string(),
                    "",
                    "no insertion point for an empty list in this context",
                ));
            }
        }
        Ok(())
    }
}
