//! Turns recorded events into text edits
//!
//! The analyzer walks the original tree in document order and only descends
//! into nodes with changes below them. Untouched regions produce no edits, so
//! their text, comments and formatting survive byte for byte.

use std::collections::HashSet;

use tracing::{debug, trace};

use super::edit::{EditUtils, TextEdit};
use super::event::{RewriteEvent, RewriteEventStore};
use super::node::{CreatedContent, Node, takes_comments};
use super::property::{PropertyDescriptor, PropertyKind, properties_of};
use super::slots;
use super::source_range::{SourceRangeResolver, convert_indent_unit, extended_range, indent_lines, reindent};
use crate::format::CodeFormatter;
use crate::syntax::{JavaSyntaxKind, JavaSyntaxNode};
use crate::{Result, RewriteError};

pub(crate) struct RewriteAnalyzer<'a> {
    pub(super) resolver: SourceRangeResolver<'a>,
    pub(super) store: &'a RewriteEventStore,
    pub(super) formatter: &'a dyn CodeFormatter,
    dirty: HashSet<JavaSyntaxNode>,
    /// Original nodes currently being rendered, to reject cyclic placements
    rendering: Vec<JavaSyntaxNode>,
}

impl<'a> RewriteAnalyzer<'a> {
    pub(crate) fn new(source: &'a str, store: &'a RewriteEventStore, formatter: &'a dyn CodeFormatter) -> Self {
        Self {
            resolver: SourceRangeResolver::new(source),
            store,
            formatter,
            dirty: store.dirty_nodes(),
            rendering: Vec::new(),
        }
    }

    /// Edits for the whole tree, sorted and checked for overlaps
    pub(crate) fn analyze(&mut self, root: &JavaSyntaxNode) -> Result<Vec<TextEdit>> {
        let mut edits = Vec::new();
        self.visit(root, &mut edits)?;
        EditUtils::sort_and_validate(&mut edits)?;
        debug!(edits = edits.len(), "synthesized text edits");
        Ok(edits)
    }

    pub(super) fn visit(&mut self, node: &JavaSyntaxNode, edits: &mut Vec<TextEdit>) -> Result<()> {
        if !self.dirty.contains(node) {
            return Ok(());
        }
        let properties = properties_of(node.kind());
        if properties.is_empty() || node.kind() == JavaSyntaxKind::ErrorNode {
            for child in node.children() {
                self.visit(&child, edits)?;
            }
            return Ok(());
        }

        for property in properties {
            let event = self.store.get(node, *property).filter(|e| e.is_change());
            match (property.kind(), event) {
                (PropertyKind::Child { .. }, Some(RewriteEvent::Child { original, new })) => {
                    self.child_edits(node, *property, original.as_ref(), new.as_ref(), edits)?;
                }
                (PropertyKind::ChildList { .. }, Some(RewriteEvent::List { entries })) => {
                    self.list_edits(node, *property, entries, edits)?;
                }
                (PropertyKind::Simple, Some(RewriteEvent::Simple { new, .. })) => {
                    if let Some(token) = slots::simple_token(node, *property) {
                        trace!(property = %property, value = %new, "replacing token");
                        edits.push(TextEdit::new(token.text_range(), new.clone()));
                    }
                }
                (PropertyKind::Child { .. }, _) => {
                    if let Some(child) = slots::original_child(node, *property) {
                        self.visit(&child, edits)?;
                    }
                }
                (PropertyKind::ChildList { .. }, _) => {
                    for element in slots::original_list(node, *property) {
                        self.visit(&element, edits)?;
                    }
                }
                (PropertyKind::Simple, _) => {}
            }
        }

        // Unparsed regions can still contain edited nodes
        for child in node.children().filter(|c| c.kind() == JavaSyntaxKind::ErrorNode) {
            self.visit(&child, edits)?;
        }
        Ok(())
    }

    fn child_edits(
        &mut self,
        parent: &JavaSyntaxNode,
        property: PropertyDescriptor,
        original: Option<&JavaSyntaxNode>,
        new: Option<&Node>,
        edits: &mut Vec<TextEdit>,
    ) -> Result<()> {
        let slot = slots::child_slot(parent, property);
        match (original, new) {
            (Some(original), Some(new)) => {
                trace!(property = %property, "replacing child");
                let range = original.text_range();
                let indent = self.resolver.indent_at(range.start());
                let text = self.render(new, indent)?;
                edits.push(TextEdit::new(range, text));
            }
            (Some(_), None) => {
                trace!(property = %property, "removing child");
                let removal = slot
                    .removal
                    .ok_or_else(|| RewriteError::mandatory_removed(property.id(), parent.kind().to_string()))?;
                edits.push(TextEdit::new(removal.range, removal.replacement));
            }
            (None, Some(new)) => {
                trace!(property = %property, "inserting child");
                let insert = slot.insert.ok_or_else(|| {
                    RewriteError::invalid_value(property.to_string(), "", "no insertion point in this context")
                })?;
                let indent = self.resolver.indent_at(insert.range.start());
                let text = self.render(new, indent)?;
                edits.push(TextEdit::new(
                    insert.range,
                    format!("{}{}{}", insert.prefix, text, insert.suffix),
                ));
            }
            (None, None) => {}
        }
        Ok(())
    }

    /// Text of `node` for a position whose line is indented with `indent`
    pub(super) fn render(&mut self, node: &Node, indent: &str) -> Result<String> {
        match node {
            Node::Original(original) => self.rewritten_text(original, indent),
            Node::Created(created) => match created.content() {
                CreatedContent::Placeholder(code) => Ok(indent_lines(code, indent)),
                CreatedContent::CopyOf(original) | CreatedContent::MoveOf(original) => {
                    self.rewritten_text(original, indent)
                }
                CreatedContent::Composite(_) => {
                    let formatter = self.formatter;
                    let text = formatter.format(node, &mut |child| self.render(child, ""))?;
                    let unit = self.indent_unit_for(indent);
                    let text = convert_indent_unit(&text, &formatter.indent_unit(), &unit);
                    Ok(indent_lines(&text, indent))
                }
            },
        }
    }

    /// One indentation level for code placed at `indent`; tab-indented
    /// surroundings keep tabs whatever the formatter is configured with
    pub(super) fn indent_unit_for(&self, indent: &str) -> String {
        if indent.starts_with('\t') {
            "\t".to_string()
        } else {
            self.formatter.indent_unit()
        }
    }

    /// Original text of `node` with the events below it applied
    fn rewritten_text(&mut self, node: &JavaSyntaxNode, indent: &str) -> Result<String> {
        if self.rendering.contains(node) {
            return Err(RewriteError::internal_error(format!(
                "{:?} is placed inside itself",
                node.kind()
            )));
        }
        self.rendering.push(node.clone());

        let range = if takes_comments(node.kind()) {
            extended_range(node)
        } else {
            node.text_range()
        };
        let mut edits = Vec::new();
        let visited = self.visit(node, &mut edits);
        self.rendering.pop();
        visited?;

        let source = self.resolver.source();
        let mut text = String::with_capacity(usize::from(range.len()));
        let mut cursor = range.start();
        EditUtils::sort_and_validate(&mut edits)?;
        for edit in edits.iter().filter(|e| range.contains_range(e.range)) {
            text.push_str(&source[usize::from(cursor)..usize::from(edit.range.start())]);
            text.push_str(&edit.new_text);
            cursor = edit.range.end();
        }
        text.push_str(&source[usize::from(cursor)..usize::from(range.end())]);

        let from = self.resolver.indent_at(node.text_range().start());
        Ok(reindent(&text, from, indent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::DefaultFormatter;
    use crate::rewrite::event::ListEntry;
    use crate::syntax::ast::{self, AstNode};
    use crate::syntax::parse_java;

    fn analyze(source: &str, record: impl FnOnce(&JavaSyntaxNode, &mut RewriteEventStore)) -> String {
        let (cst, _) = parse_java(source);
        let mut store = RewriteEventStore::new();
        record(&cst, &mut store);
        let formatter = DefaultFormatter::default();
        let edits = RewriteAnalyzer::new(source, &store, &formatter).analyze(&cst).unwrap();
        EditUtils::apply_edits(source, &edits).unwrap()
    }

    #[test]
    fn test_no_events_no_edits() {
        let source = "class A {  void f( ) {}  }";
        assert_eq!(analyze(source, |_, _| {}), source);
    }

    #[test]
    fn test_simple_property() {
        let source = "class A { void f() { a = b; } }";
        let result = analyze(source, |cst, store| {
            let assignment = cst
                .descendants()
                .find(|n| n.kind() == JavaSyntaxKind::Assignment)
                .unwrap();
            store.set_simple(&assignment, ast::Assignment::OPERATOR, "+=".into());
        });
        assert_eq!(result, "class A { void f() { a += b; } }");
    }

    #[test]
    fn test_moved_statement_keeps_nested_changes() {
        let source = "class A {\n    void f() {\n        if (x) {\n            a();\n        }\n    }\n}\n";
        let result = analyze(source, |cst, store| {
            let if_stmt = cst.descendants().find(|n| n.kind() == JavaSyntaxKind::IfStmt).unwrap();
            let block = if_stmt.descendants().find(|n| n.kind() == JavaSyntaxKind::Block).unwrap();
            let call = block.descendants().find(|n| n.kind() == JavaSyntaxKind::SimpleName).unwrap();
            store.set_simple(&call, ast::SimpleName::IDENTIFIER, "b".into());

            let body = cst
                .descendants()
                .filter_map(ast::MethodDecl::cast)
                .next()
                .unwrap()
                .body()
                .unwrap();
            let entries = store.list_entries(body.syntax(), ast::Block::STATEMENTS);
            entries[0] = ListEntry {
                original: Some(if_stmt.clone()),
                new: Some(Node::Original(block.clone())),
            };
        });
        assert_eq!(
            result,
            "class A {\n    void f() {\n        {\n            b();\n        }\n    }\n}\n"
        );
    }
}
