//! Recording changes to a list property
//!
//! # Example
//!
//! ```rust,ignore
//! let mut rewrite = AstRewrite::new(cst.clone());
//! let factory = NodeFactory::new();
//! let statement = factory.string_placeholder("log();", JavaSyntaxKind::ExprStmt);
//! rewrite.list(body.syntax(), Block::STATEMENTS)?.insert_first(statement)?;
//! ```

use super::AstRewrite;
use super::event::{ChangeKind, ListEntry};
use super::lcs::longest_common_subsequence;
use super::node::{CreatedContent, Node, placeholder};
use super::property::PropertyDescriptor;
use super::slots;
use crate::syntax::JavaSyntaxNode;
use crate::{Result, RewriteError};

/// Records changes to one list property of one original node
pub struct ListRewrite<'a> {
    rewrite: &'a mut AstRewrite,
    parent: JavaSyntaxNode,
    property: PropertyDescriptor,
}

impl<'a> ListRewrite<'a> {
    pub(super) fn new(rewrite: &'a mut AstRewrite, parent: JavaSyntaxNode, property: PropertyDescriptor) -> Self {
        Self {
            rewrite,
            parent,
            property,
        }
    }

    pub fn parent(&self) -> &JavaSyntaxNode {
        &self.parent
    }

    pub fn property(&self) -> PropertyDescriptor {
        self.property
    }

    /// Elements of the list in the original tree
    pub fn original_list(&self) -> Vec<JavaSyntaxNode> {
        slots::original_list(&self.parent, self.property)
    }

    /// Elements of the list with all recorded changes applied
    pub fn rewritten_list(&self) -> Vec<Node> {
        match self.rewrite.events().get(&self.parent, self.property) {
            Some(event) => event.new_nodes().into_iter().cloned().collect(),
            None => self.original_list().into_iter().map(Node::Original).collect(),
        }
    }

    fn entries(&mut self) -> &mut Vec<ListEntry> {
        self.rewrite.store_mut().list_entries(&self.parent, self.property)
    }

    /// Position in the entry list before the `index`-th present element
    fn entry_position(&mut self, index: usize) -> Result<usize> {
        let property = self.property.to_string();
        let entries = self.entries();
        let present: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.new.is_some())
            .map(|(i, _)| i)
            .collect();
        match index.cmp(&present.len()) {
            std::cmp::Ordering::Less => Ok(present[index]),
            std::cmp::Ordering::Equal => Ok(entries.len()),
            std::cmp::Ordering::Greater => Err(RewriteError::IndexOutOfBounds {
                property,
                index,
                len: present.len(),
            }),
        }
    }

    /// Entry index of a present element
    fn find(&mut self, element: &Node) -> Result<usize> {
        let property = self.property.to_string();
        self.entries()
            .iter()
            .position(|e| e.new.as_ref() == Some(element))
            .ok_or(RewriteError::ElementNotInList { property })
    }

    fn prepare(&self, node: Node) -> Result<Node> {
        self.property.check_node(node.kind())?;
        self.rewrite.prepare_new_node(node)
    }

    pub fn insert_at(&mut self, node: Node, index: usize) -> Result<()> {
        let node = self.prepare(node)?;
        let position = self.entry_position(index)?;
        tracing::trace!(property = %self.property, index, "list insert");
        self.entries().insert(position, ListEntry::inserted(node));
        Ok(())
    }

    pub fn insert_first(&mut self, node: Node) -> Result<()> {
        self.insert_at(node, 0)
    }

    pub fn insert_last(&mut self, node: Node) -> Result<()> {
        let node = self.prepare(node)?;
        self.entries().push(ListEntry::inserted(node));
        Ok(())
    }

    pub fn insert_before(&mut self, node: Node, anchor: &Node) -> Result<()> {
        let node = self.prepare(node)?;
        let position = self.find(anchor)?;
        self.entries().insert(position, ListEntry::inserted(node));
        Ok(())
    }

    pub fn insert_after(&mut self, node: Node, anchor: &Node) -> Result<()> {
        let node = self.prepare(node)?;
        let position = self.find(anchor)?;
        self.entries().insert(position + 1, ListEntry::inserted(node));
        Ok(())
    }

    /// Remove a present element (an original or a previously inserted node)
    pub fn remove(&mut self, element: &Node) -> Result<()> {
        let position = self.find(element)?;
        let entries = self.entries();
        if entries[position].original.is_some() {
            entries[position].new = None;
        } else {
            entries.remove(position);
        }
        Ok(())
    }

    pub fn replace(&mut self, element: &Node, replacement: Node) -> Result<()> {
        let replacement = self.prepare(replacement)?;
        let position = self.find(element)?;
        self.entries()[position].new = Some(replacement);
        Ok(())
    }

    /// Replace the whole list, keeping aligned originals in place
    ///
    /// Originals of this list that keep their relative order stay untouched;
    /// originals appearing out of order are moved, nodes from elsewhere in
    /// the tree are copied.
    pub fn replace_all(&mut self, new_list: Vec<Node>) -> Result<()> {
        let originals = self.original_list();
        for node in &new_list {
            self.property.check_node(node.kind())?;
        }

        let keys: Vec<Option<JavaSyntaxNode>> = new_list
            .iter()
            .map(|n| {
                n.as_original()
                    .or_else(|| n.is_move_placeholder().then(|| n.placeholder_source()).flatten())
                    .filter(|o| originals.contains(o))
                    .cloned()
            })
            .collect();
        let original_keys: Vec<Option<JavaSyntaxNode>> = originals.iter().cloned().map(Some).collect();
        let matched = longest_common_subsequence(&original_keys, &keys);

        let mut entries = Vec::with_capacity(originals.len() + new_list.len());
        let (mut i, mut j) = (0, 0);
        let pairs = matched.iter().copied().chain(std::iter::once((originals.len(), new_list.len())));
        for (oi, tj) in pairs {
            for original in &originals[i..oi] {
                entries.push(ListEntry {
                    original: Some(original.clone()),
                    new: None,
                });
            }
            for (target, key) in new_list[j..tj].iter().zip(&keys[j..tj]) {
                let node = match key {
                    Some(original) => placeholder(original.kind(), CreatedContent::MoveOf(original.clone())),
                    None => self.rewrite.prepare_new_node(target.clone())?,
                };
                entries.push(ListEntry::inserted(node));
            }
            if oi < originals.len() {
                entries.push(ListEntry::unchanged(originals[oi].clone()));
            }
            i = oi + 1;
            j = tj + 1;
        }

        tracing::debug!(
            property = %self.property,
            kept = matched.len(),
            changed = entries.iter().filter(|e| e.change_kind() != ChangeKind::Unchanged).count(),
            "list replaced"
        );
        *self.entries() = entries;
        Ok(())
    }
}
