//! Recorded modifications of the original tree
//!
//! Events are keyed by the original parent node and the property they modify.
//! The store never touches the tree itself; the analyzer reads the events and
//! turns them into text edits.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};

use super::node::Node;
use super::property::PropertyDescriptor;
use super::slots;
use crate::syntax::JavaSyntaxNode;

/// Classification of an event or list entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Unchanged,
    Inserted,
    Removed,
    Replaced,
}

/// One element of a rewritten list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub original: Option<JavaSyntaxNode>,
    pub new: Option<Node>,
}

impl ListEntry {
    pub fn unchanged(original: JavaSyntaxNode) -> Self {
        Self {
            new: Some(Node::Original(original.clone())),
            original: Some(original),
        }
    }

    pub fn inserted(node: Node) -> Self {
        Self {
            original: None,
            new: Some(node),
        }
    }

    pub fn change_kind(&self) -> ChangeKind {
        match (&self.original, &self.new) {
            (None, None) => ChangeKind::Unchanged,
            (None, Some(_)) => ChangeKind::Inserted,
            (Some(_), None) => ChangeKind::Removed,
            (Some(original), Some(new)) if new.is_original(original) => ChangeKind::Unchanged,
            (Some(_), Some(_)) => ChangeKind::Replaced,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteEvent {
    Child {
        original: Option<JavaSyntaxNode>,
        new: Option<Node>,
    },
    List {
        entries: Vec<ListEntry>,
    },
    Simple {
        original: String,
        new: String,
    },
}

impl RewriteEvent {
    pub fn change_kind(&self) -> ChangeKind {
        match self {
            RewriteEvent::Child { original, new } => match (original, new) {
                (None, None) => ChangeKind::Unchanged,
                (None, Some(_)) => ChangeKind::Inserted,
                (Some(_), None) => ChangeKind::Removed,
                (Some(o), Some(n)) if n.is_original(o) => ChangeKind::Unchanged,
                (Some(_), Some(_)) => ChangeKind::Replaced,
            },
            RewriteEvent::List { entries } => {
                if entries.iter().all(|e| e.change_kind() == ChangeKind::Unchanged) {
                    ChangeKind::Unchanged
                } else {
                    ChangeKind::Replaced
                }
            }
            RewriteEvent::Simple { original, new } => {
                if original == new {
                    ChangeKind::Unchanged
                } else {
                    ChangeKind::Replaced
                }
            }
        }
    }

    pub fn is_change(&self) -> bool {
        self.change_kind() != ChangeKind::Unchanged
    }

    /// New nodes referenced by this event
    pub fn new_nodes(&self) -> Vec<&Node> {
        match self {
            RewriteEvent::Child { new, .. } => new.iter().collect(),
            RewriteEvent::List { entries } => entries.iter().filter_map(|e| e.new.as_ref()).collect(),
            RewriteEvent::Simple { .. } => Vec::new(),
        }
    }
}

/// Events per (original parent, property) plus the set of move sources
#[derive(Debug, Clone, Default)]
pub struct RewriteEventStore {
    events: IndexMap<(JavaSyntaxNode, PropertyDescriptor), RewriteEvent>,
    move_sources: IndexSet<JavaSyntaxNode>,
}

impl RewriteEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, parent: &JavaSyntaxNode, property: PropertyDescriptor) -> Option<&RewriteEvent> {
        self.events.get(&(parent.clone(), property))
    }

    pub fn contains(&self, parent: &JavaSyntaxNode, property: PropertyDescriptor) -> bool {
        self.events.contains_key(&(parent.clone(), property))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&JavaSyntaxNode, PropertyDescriptor, &RewriteEvent)> {
        self.events.iter().map(|((parent, property), event)| (parent, *property, event))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.move_sources.is_empty()
    }

    /// Child event of `parent`, created from the original value on first use
    pub(crate) fn child_event(&mut self, parent: &JavaSyntaxNode, property: PropertyDescriptor) -> &mut RewriteEvent {
        self.events.entry((parent.clone(), property)).or_insert_with(|| {
            let original = slots::original_child(parent, property);
            RewriteEvent::Child {
                new: original.clone().map(Node::Original),
                original,
            }
        })
    }

    /// Entries of a list event of `parent`, created from the original list on first use
    pub(crate) fn list_entries(&mut self, parent: &JavaSyntaxNode, property: PropertyDescriptor) -> &mut Vec<ListEntry> {
        let event = self.events.entry((parent.clone(), property)).or_insert_with(|| RewriteEvent::List {
            entries: slots::original_list(parent, property)
                .into_iter()
                .map(ListEntry::unchanged)
                .collect(),
        });
        match event {
            RewriteEvent::List { entries } => entries,
            // Keys are unique per property and properties have a fixed kind
            _ => unreachable!("list property recorded as non-list event"),
        }
    }

    pub(crate) fn set_simple(&mut self, parent: &JavaSyntaxNode, property: PropertyDescriptor, value: String) {
        let original = slots::original_simple(parent, property).unwrap_or_default();
        self.events.insert(
            (parent.clone(), property),
            RewriteEvent::Simple { original, new: value },
        );
    }

    pub fn mark_move_source(&mut self, node: JavaSyntaxNode) {
        self.move_sources.insert(node);
    }

    pub fn is_move_source(&self, node: &JavaSyntaxNode) -> bool {
        self.move_sources.contains(node)
    }

    pub fn move_sources(&self) -> impl Iterator<Item = &JavaSyntaxNode> {
        self.move_sources.iter()
    }

    /// Nodes at or above an owner of a real change
    pub fn dirty_nodes(&self) -> HashSet<JavaSyntaxNode> {
        let mut dirty = HashSet::new();
        for ((parent, _), event) in &self.events {
            if !event.is_change() {
                continue;
            }
            for ancestor in parent.ancestors() {
                if !dirty.insert(ancestor) {
                    break;
                }
            }
        }
        for source in &self.move_sources {
            for ancestor in source.ancestors().skip(1) {
                if !dirty.insert(ancestor) {
                    break;
                }
            }
        }
        dirty
    }

    /// Whether any recorded change lies at or below `node`
    pub fn has_changes_below(&self, node: &JavaSyntaxNode) -> bool {
        let range = node.text_range();
        self.events.iter().any(|((parent, _), event)| {
            event.is_change() && parent.ancestors().any(|a| &a == node)
        }) || self
            .move_sources
            .iter()
            .any(|s| range.contains_range(s.text_range()) && s.ancestors().skip(1).any(|a| &a == node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::node::NodeFactory;
    use crate::syntax::ast::{self, AstNode};
    use crate::syntax::{JavaSyntaxKind, parse_java};

    #[test]
    fn test_list_entry_kinds() {
        let (cst, _) = parse_java("class A { void f() { a(); } }");
        let stmt = cst.descendants().find(|n| n.kind() == JavaSyntaxKind::ExprStmt).unwrap();
        let created = NodeFactory::new().empty_stmt().unwrap();

        assert_eq!(ListEntry::unchanged(stmt.clone()).change_kind(), ChangeKind::Unchanged);
        assert_eq!(ListEntry::inserted(created.clone()).change_kind(), ChangeKind::Inserted);
        let removed = ListEntry {
            original: Some(stmt.clone()),
            new: None,
        };
        assert_eq!(removed.change_kind(), ChangeKind::Removed);
        let replaced = ListEntry {
            original: Some(stmt),
            new: Some(created),
        };
        assert_eq!(replaced.change_kind(), ChangeKind::Replaced);
    }

    #[test]
    fn test_dirty_nodes_cover_ancestors() {
        let (cst, _) = parse_java("class A { void f() { a(); } void g() {} }");
        let methods: Vec<_> = cst.descendants().filter_map(ast::MethodDecl::cast).collect();
        let body = methods[0].body().unwrap();

        let mut store = RewriteEventStore::new();
        let entries = store.list_entries(body.syntax(), ast::Block::STATEMENTS);
        entries[0].new = None;

        let dirty = store.dirty_nodes();
        assert!(dirty.contains(body.syntax()));
        assert!(dirty.contains(methods[0].syntax()));
        assert!(dirty.contains(&cst));
        assert!(!dirty.contains(methods[1].syntax()));
        assert!(store.has_changes_below(methods[0].syntax()));
        assert!(!store.has_changes_below(methods[1].syntax()));
    }

    #[test]
    fn test_unchanged_events_are_not_changes() {
        let (cst, _) = parse_java("class A { int x = 1; }");
        let declarator = cst
            .descendants()
            .find(|n| n.kind() == JavaSyntaxKind::VarDeclarator)
            .unwrap();
        let mut store = RewriteEventStore::new();
        store.child_event(&declarator, ast::VarDeclarator::INITIALIZER);
        assert!(!store.get(&declarator, ast::VarDeclarator::INITIALIZER).unwrap().is_change());
        assert!(store.dirty_nodes().is_empty());

        store.set_simple(&declarator.first_child().unwrap(), ast::SimpleName::IDENTIFIER, "y".into());
        assert!(store.has_changes_below(&cst));
    }
}
