//! Source-preserving rewriting of the Java CST
//!
//! Modifications are never applied to the tree. [`AstRewrite`] records them as
//! events keyed by the original parent and property; [`AstRewrite::rewrite`]
//! turns the events into a minimal set of non-overlapping text edits. Text
//! outside the changed regions, comments and formatting included, is kept
//! byte for byte.
//!
//! # Example
//!
//! ```rust,ignore
//! use jrewrite_core::rewrite::{AstRewrite, NodeFactory};
//! use jrewrite_core::syntax::{ast::{AstNode, CompilationUnit, MethodDecl}, parse_java};
//!
//! let (cst, _) = parse_java("class A {\n    void f(int a) {}\n}\n");
//! let unit = CompilationUnit::cast(cst.clone()).unwrap();
//! let method = unit.find_type("A").and_then(|t| t.method("f")).unwrap();
//!
//! let factory = NodeFactory::new();
//! let mut rewrite = AstRewrite::new(cst);
//! let param = factory.parameter(factory.primitive_type("int")?, "b")?;
//! rewrite.list(method.syntax(), MethodDecl::PARAMETERS)?.insert_last(param)?;
//!
//! let result = rewrite.rewrite()?;
//! assert_eq!(result.text(), "class A {\n    void f(int a, int b) {}\n}\n");
//! ```

mod analyzer;
mod lcs;
mod list_analyzer;
mod list_rewrite;
pub(crate) mod slots;

pub mod edit;
pub mod event;
pub mod node;
pub mod property;
pub mod source_range;

use std::collections::HashSet;

use rowan::TextRange;
use similar::TextDiff;
use tracing::debug;

pub use edit::{EditUtils, TextEdit};
pub use event::{ChangeKind, ListEntry, RewriteEvent, RewriteEventStore};
pub use lcs::longest_common_subsequence;
pub use list_rewrite::ListRewrite;
pub use node::{CompositeBuilder, CreatedContent, CreatedNode, Node, NodeFactory, SlotValue};
pub use property::{PropertyDescriptor, PropertyKind, properties_of, property_by_id};
pub use source_range::{LineRange, SourceRangeResolver};

use crate::format::{CodeFormatter, DefaultFormatter};
use crate::syntax::{JavaSyntaxKind, JavaSyntaxNode};
use crate::{Result, RewriteError};
use analyzer::RewriteAnalyzer;
use node::placeholder;

/// Value of a property, as returned by [`AstRewrite::get`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Child(Option<Node>),
    List(Vec<Node>),
    Simple(String),
}

impl PropertyValue {
    pub fn as_child(&self) -> Option<&Node> {
        match self {
            PropertyValue::Child(node) => node.as_ref(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> &[Node] {
        match self {
            PropertyValue::List(nodes) => nodes,
            _ => &[],
        }
    }

    pub fn as_simple(&self) -> Option<&str> {
        match self {
            PropertyValue::Simple(value) => Some(value),
            _ => None,
        }
    }
}

/// Handle to an original node whose position in the result is wanted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedNode {
    kind: JavaSyntaxKind,
    range: TextRange,
}

impl TrackedNode {
    pub fn kind(&self) -> JavaSyntaxKind {
        self.kind
    }

    pub fn original_range(&self) -> TextRange {
        self.range
    }
}

/// Text edits synthesized from a rewrite, with the resulting text
#[derive(Debug, Clone)]
pub struct RewriteResult {
    original: String,
    edits: Vec<TextEdit>,
    text: String,
}

impl RewriteResult {
    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn has_changes(&self) -> bool {
        self.text != self.original
    }

    /// Apply the edits to `source`, which must be the rewritten tree's text
    pub fn apply(&self, source: &str) -> Result<String> {
        EditUtils::apply_edits(source, &self.edits)
    }

    /// Range of a tracked node in the new text; `None` if it was replaced,
    /// removed or moved
    pub fn tracked_range(&self, tracked: &TrackedNode) -> Option<TextRange> {
        EditUtils::map_range(tracked.range, &self.edits)
    }

    /// Unified diff between the original and the rewritten text
    pub fn diff(&self, path: &str) -> String {
        TextDiff::from_lines(&self.original, &self.text)
            .unified_diff()
            .context_radius(3)
            .header(&format!("a/{path}"), &format!("b/{path}"))
            .to_string()
    }
}

/// Records modifications of an original tree
pub struct AstRewrite {
    root: JavaSyntaxNode,
    source: String,
    store: RewriteEventStore,
}

impl AstRewrite {
    pub fn new(root: JavaSyntaxNode) -> Self {
        let source = root.text().to_string();
        Self {
            root,
            source,
            store: RewriteEventStore::new(),
        }
    }

    pub fn root(&self) -> &JavaSyntaxNode {
        &self.root
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn events(&self) -> &RewriteEventStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut RewriteEventStore {
        &mut self.store
    }

    // ========================================================================
    // Validation
    // ========================================================================

    fn check_in_tree(&self, node: &JavaSyntaxNode) -> Result<()> {
        if node.ancestors().last().as_ref() == Some(&self.root) {
            Ok(())
        } else {
            Err(RewriteError::NodeNotInTree {
                kind: node.kind().to_string(),
                range: format!("{:?}", node.text_range()),
            })
        }
    }

    fn check_property(&self, parent: &JavaSyntaxNode, property: PropertyDescriptor) -> Result<()> {
        self.check_in_tree(parent)?;
        if property.owner() != parent.kind() {
            return Err(RewriteError::property_mismatch(property.to_string(), parent.kind().to_string()));
        }
        if property == crate::syntax::ast::TypeDecl::SUPERCLASS_TYPE
            && crate::syntax::ast::token_of_kind(parent, JavaSyntaxKind::InterfaceKw).is_some()
        {
            return Err(RewriteError::property_mismatch(property.to_string(), "an interface declaration"));
        }
        Ok(())
    }

    /// Original nodes from this tree placed somewhere new become copies
    pub(crate) fn prepare_new_node(&self, node: Node) -> Result<Node> {
        match &node {
            Node::Original(original) => {
                self.check_in_tree(original)?;
                Ok(placeholder(original.kind(), CreatedContent::CopyOf(original.clone())))
            }
            Node::Created(created) => {
                if let Some(source) = node.placeholder_source() {
                    self.check_in_tree(source)?;
                }
                if let CreatedContent::Composite(slots) = created.content() {
                    for (_, value) in slots {
                        let nested: Vec<&Node> = match value {
                            SlotValue::Child(child) => child.iter().collect(),
                            SlotValue::List(nodes) => nodes.iter().collect(),
                            SlotValue::Simple(_) => Vec::new(),
                        };
                        for child in nested {
                            if let Some(original) = child.as_original().or_else(|| child.placeholder_source()) {
                                self.check_in_tree(original)?;
                            }
                        }
                    }
                }
                Ok(node)
            }
        }
    }

    // ========================================================================
    // Recording
    // ========================================================================

    /// Replace, insert or remove the child of a single-child property
    pub fn set_child(&mut self, parent: &JavaSyntaxNode, property: PropertyDescriptor, node: Option<Node>) -> Result<()> {
        self.check_property(parent, property)?;
        if !property.is_child() {
            return Err(RewriteError::property_mismatch(property.to_string(), "a single-child property"));
        }
        let original = slots::original_child(parent, property);
        let new = match node {
            None if property.is_mandatory() => {
                return Err(RewriteError::mandatory_removed(property.id(), parent.kind().to_string()));
            }
            None => None,
            Some(node) => {
                property.check_node(node.kind())?;
                match &original {
                    Some(o) if node.is_original(o) => Some(node),
                    _ => Some(self.prepare_new_node(node)?),
                }
            }
        };
        debug!(property = %property, removed = new.is_none(), "set child");
        if let RewriteEvent::Child { new: slot, .. } = self.store.child_event(parent, property) {
            *slot = new;
        }
        Ok(())
    }

    /// Change the value of a simple property
    pub fn set_simple(&mut self, parent: &JavaSyntaxNode, property: PropertyDescriptor, value: &str) -> Result<()> {
        self.check_property(parent, property)?;
        property.validate_simple(value)?;
        debug!(property = %property, value, "set simple");
        self.store.set_simple(parent, property, value.to_string());
        Ok(())
    }

    /// Replace an original node in its parent property; `None` removes it
    pub fn replace(&mut self, node: &JavaSyntaxNode, replacement: Option<Node>) -> Result<()> {
        self.check_in_tree(node)?;
        let (parent, property) = slots::locate(node)?;
        if property.is_list() {
            let replacement = match replacement {
                Some(new) => {
                    property.check_node(new.kind())?;
                    Some(if new.is_original(node) { new } else { self.prepare_new_node(new)? })
                }
                None => None,
            };
            let entries = self.store.list_entries(&parent, property);
            let entry = entries
                .iter_mut()
                .find(|e| e.original.as_ref() == Some(node))
                .ok_or_else(|| RewriteError::ElementNotInList {
                    property: property.to_string(),
                })?;
            entry.new = replacement;
            Ok(())
        } else {
            self.set_child(&parent, property, replacement)
        }
    }

    pub fn remove(&mut self, node: &JavaSyntaxNode) -> Result<()> {
        self.replace(node, None)
    }

    /// Current value of a property, with recorded changes applied
    pub fn get(&self, parent: &JavaSyntaxNode, property: PropertyDescriptor) -> Result<PropertyValue> {
        self.check_property(parent, property)?;
        Ok(match (self.store.get(parent, property), property.kind()) {
            (Some(RewriteEvent::Child { new, .. }), _) => PropertyValue::Child(new.clone()),
            (Some(RewriteEvent::Simple { new, .. }), _) => PropertyValue::Simple(new.clone()),
            (Some(event @ RewriteEvent::List { .. }), _) => {
                PropertyValue::List(event.new_nodes().into_iter().cloned().collect())
            }
            (None, _) => self.original_value(parent, property),
        })
    }

    /// Value of a property in the original tree
    pub fn get_original(&self, parent: &JavaSyntaxNode, property: PropertyDescriptor) -> Result<PropertyValue> {
        self.check_property(parent, property)?;
        Ok(self.original_value(parent, property))
    }

    fn original_value(&self, parent: &JavaSyntaxNode, property: PropertyDescriptor) -> PropertyValue {
        match property.kind() {
            PropertyKind::Child { .. } => PropertyValue::Child(slots::original_child(parent, property).map(Node::Original)),
            PropertyKind::ChildList { .. } => PropertyValue::List(
                slots::original_list(parent, property)
                    .into_iter()
                    .map(Node::Original)
                    .collect(),
            ),
            PropertyKind::Simple => PropertyValue::Simple(slots::original_simple(parent, property).unwrap_or_default()),
        }
    }

    /// Recorder for a list property
    pub fn list(&mut self, parent: &JavaSyntaxNode, property: PropertyDescriptor) -> Result<ListRewrite<'_>> {
        self.check_property(parent, property)?;
        if !property.is_list() {
            return Err(RewriteError::property_mismatch(property.to_string(), "a list property"));
        }
        Ok(ListRewrite::new(self, parent.clone(), property))
    }

    /// Placeholder that moves `node`; the node disappears from its original
    /// position unless that position carries its own event
    pub fn create_move_target(&mut self, node: &JavaSyntaxNode) -> Result<Node> {
        self.check_in_tree(node)?;
        slots::locate(node)?;
        self.store.mark_move_source(node.clone());
        Ok(placeholder(node.kind(), CreatedContent::MoveOf(node.clone())))
    }

    /// Placeholder that copies `node` (with the changes recorded below it)
    pub fn create_copy_target(&self, node: &JavaSyntaxNode) -> Result<Node> {
        self.check_in_tree(node)?;
        Ok(placeholder(node.kind(), CreatedContent::CopyOf(node.clone())))
    }

    /// Verbatim code standing for a node of `kind`
    pub fn create_string_placeholder(&self, code: &str, kind: JavaSyntaxKind) -> Node {
        placeholder(kind, CreatedContent::Placeholder(code.to_string()))
    }

    pub fn track(&self, node: &JavaSyntaxNode) -> Result<TrackedNode> {
        self.check_in_tree(node)?;
        Ok(TrackedNode {
            kind: node.kind(),
            range: node.text_range(),
        })
    }

    // ========================================================================
    // Synthesis
    // ========================================================================

    pub fn rewrite(&self) -> Result<RewriteResult> {
        self.rewrite_with(&DefaultFormatter::default())
    }

    pub fn rewrite_with(&self, formatter: &dyn CodeFormatter) -> Result<RewriteResult> {
        let store = self.normalized_store()?;
        let edits = RewriteAnalyzer::new(&self.source, &store, formatter).analyze(&self.root)?;
        let text = EditUtils::apply_edits(&self.source, &edits)?;
        debug!(events = store.len(), edits = edits.len(), "rewrite synthesized");
        Ok(RewriteResult {
            original: self.source.clone(),
            edits,
            text,
        })
    }

    /// Copy of the store where move sources without their own event are removed
    fn normalized_store(&self) -> Result<RewriteEventStore> {
        let mut store = self.store.clone();
        let displaced = self.displaced_originals();

        for source in self.store.move_sources() {
            if source.ancestors().skip(1).any(|a| displaced.contains(&a)) {
                continue;
            }
            let (parent, property) = slots::locate(source)?;
            if property.is_list() {
                let entries = store.list_entries(&parent, property);
                if let Some(entry) = entries
                    .iter_mut()
                    .find(|e| e.original.as_ref() == Some(source) && e.change_kind() == ChangeKind::Unchanged)
                {
                    entry.new = None;
                }
            } else {
                let event = store.child_event(&parent, property);
                if event.is_change() {
                    continue;
                }
                if property.is_mandatory() {
                    return Err(RewriteError::mandatory_removed(property.id(), parent.kind().to_string()));
                }
                if let RewriteEvent::Child { new, .. } = event {
                    *new = None;
                }
            }
        }
        Ok(store)
    }

    /// Original nodes replaced or removed by an explicit event
    fn displaced_originals(&self) -> HashSet<JavaSyntaxNode> {
        let mut displaced = HashSet::new();
        for (_, _, event) in self.store.iter() {
            match event {
                RewriteEvent::Child {
                    original: Some(original),
                    ..
                } if event.is_change() => {
                    displaced.insert(original.clone());
                }
                RewriteEvent::List { entries } => {
                    for entry in entries {
                        if let (Some(original), ChangeKind::Removed | ChangeKind::Replaced) =
                            (&entry.original, entry.change_kind())
                        {
                            displaced.insert(original.clone());
                        }
                    }
                }
                _ => {}
            }
        }
        displaced
    }
}
