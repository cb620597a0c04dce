//! Trivia handling for the Java CST
//!
//! Trivia (whitespace, newlines, comments) lives between significant tokens
//! and is never part of a node's own range. This module collects the trivia
//! surrounding a node, which the source-range resolver uses to decide which
//! comments travel with a node when it is moved, copied or removed.
//!
//! # Example
//!
//! ```rust,ignore
//! use jrewrite_core::syntax::{parse_java, trivia::TriviaCollector};
//!
//! let (cst, _) = parse_java("class A {\n  // doc\n  void f() {} // tail\n}");
//! let method = cst.descendants().find(|n| n.kind() == JavaSyntaxKind::MethodDecl).unwrap();
//! let trivia = TriviaCollector::new().collect_node_trivia(&method);
//! assert!(trivia.has_comments());
//! ```

use rowan::TextRange;

use rowan::NodeOrToken;

use super::{JavaSyntaxElement, JavaSyntaxKind, JavaSyntaxNode, JavaSyntaxToken};

/// Trivia around a CST node
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriviaInfo {
    /// Trivia between the previous significant token and the node, in source order
    pub leading: Vec<TriviaToken>,
    /// Trivia after the node up to and including the first newline
    pub trailing: Vec<TriviaToken>,
}

impl TriviaInfo {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }

    pub fn has_comments(&self) -> bool {
        self.comments().next().is_some()
    }

    pub fn comments(&self) -> impl Iterator<Item = &TriviaToken> {
        self.leading
            .iter()
            .chain(self.trailing.iter())
            .filter(|t| t.is_comment())
    }

    /// Number of line breaks in the leading trivia
    pub fn leading_newlines(&self) -> usize {
        self.leading.iter().filter(|t| t.is_newline()).count()
    }
}

/// A single trivia token
#[derive(Debug, Clone, PartialEq)]
pub struct TriviaToken {
    pub kind: JavaSyntaxKind,
    pub text: String,
    pub range: TextRange,
}

impl TriviaToken {
    pub fn new(kind: JavaSyntaxKind, text: String, range: TextRange) -> Self {
        Self { kind, text, range }
    }

    pub fn from_token(token: &JavaSyntaxToken) -> Self {
        Self {
            kind: token.kind(),
            text: token.text().to_string(),
            range: token.text_range(),
        }
    }

    pub fn is_comment(&self) -> bool {
        self.kind.is_comment()
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self.kind, JavaSyntaxKind::Whitespace | JavaSyntaxKind::Newline)
    }

    pub fn is_newline(&self) -> bool {
        self.kind == JavaSyntaxKind::Newline
    }

    /// Comment text without the `//` or `/* */` markers
    pub fn comment_content(&self) -> Option<String> {
        match self.kind {
            JavaSyntaxKind::CommentLine => {
                Some(self.text.trim_start_matches("//").trim().to_string())
            }
            JavaSyntaxKind::CommentBlock => Some(
                self.text
                    .trim_start_matches("/*")
                    .trim_end_matches("*/")
                    .trim()
                    .to_string(),
            ),
            _ => None,
        }
    }
}

/// Collects trivia surrounding CST nodes
pub struct TriviaCollector {
    /// Stop trailing collection at the first newline
    stop_at_newline: bool,
}

impl TriviaCollector {
    pub fn new() -> Self {
        Self {
            stop_at_newline: true,
        }
    }

    /// Collector whose trailing trivia runs up to the next significant token
    pub fn unbounded() -> Self {
        Self {
            stop_at_newline: false,
        }
    }

    pub fn collect_node_trivia(&self, node: &JavaSyntaxNode) -> TriviaInfo {
        let mut info = TriviaInfo::empty();

        if let Some(first) = first_significant_token(node) {
            let mut current = prev_token(&first);
            while let Some(token) = current {
                if !token.kind().is_trivia() {
                    break;
                }
                info.leading.push(TriviaToken::from_token(&token));
                current = prev_token(&token);
            }
            info.leading.reverse();
        }

        if let Some(last) = last_significant_token(node) {
            let mut current = next_token(&last);
            while let Some(token) = current {
                if !token.kind().is_trivia() {
                    break;
                }
                let newline = token.kind() == JavaSyntaxKind::Newline;
                info.trailing.push(TriviaToken::from_token(&token));
                if newline && self.stop_at_newline {
                    break;
                }
                current = next_token(&token);
            }
        }

        info
    }
}

impl Default for TriviaCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// First non-trivia token inside `node`
pub fn first_significant_token(node: &JavaSyntaxNode) -> Option<JavaSyntaxToken> {
    node.descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| !t.kind().is_trivia())
}

/// Last non-trivia token inside `node`
pub fn last_significant_token(node: &JavaSyntaxNode) -> Option<JavaSyntaxToken> {
    node.descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia())
        .last()
}

/// Token preceding `token` in source order
///
/// Unlike `SyntaxToken::prev_token`, zero-length nodes such as an empty
/// `ModifierList` do not end the walk.
pub fn prev_token(token: &JavaSyntaxToken) -> Option<JavaSyntaxToken> {
    let mut current: JavaSyntaxElement = token.clone().into();
    loop {
        let mut sibling = current.prev_sibling_or_token();
        while let Some(element) = sibling {
            if let Some(found) = last_token_in(&element) {
                return Some(found);
            }
            sibling = element.prev_sibling_or_token();
        }
        current = current.parent()?.into();
    }
}

/// Token following `token` in source order, stepping over zero-length nodes
pub fn next_token(token: &JavaSyntaxToken) -> Option<JavaSyntaxToken> {
    let mut current: JavaSyntaxElement = token.clone().into();
    loop {
        let mut sibling = current.next_sibling_or_token();
        while let Some(element) = sibling {
            if let Some(found) = first_token_in(&element) {
                return Some(found);
            }
            sibling = element.next_sibling_or_token();
        }
        current = current.parent()?.into();
    }
}

fn first_token_in(element: &JavaSyntaxElement) -> Option<JavaSyntaxToken> {
    match element {
        NodeOrToken::Token(token) => Some(token.clone()),
        NodeOrToken::Node(node) => node.descendants_with_tokens().find_map(|e| e.into_token()),
    }
}

fn last_token_in(element: &JavaSyntaxElement) -> Option<JavaSyntaxToken> {
    match element {
        NodeOrToken::Token(token) => Some(token.clone()),
        NodeOrToken::Node(node) => node
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .last(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_java;

    fn method(source: &str) -> JavaSyntaxNode {
        let (cst, _) = parse_java(source);
        cst.descendants()
            .find(|n| n.kind() == JavaSyntaxKind::MethodDecl)
            .unwrap()
    }

    #[test]
    fn test_comment_content() {
        let line = TriviaToken::new(
            JavaSyntaxKind::CommentLine,
            "// note".to_string(),
            TextRange::new(0.into(), 7.into()),
        );
        assert_eq!(line.comment_content(), Some("note".to_string()));

        let block = TriviaToken::new(
            JavaSyntaxKind::CommentBlock,
            "/* block */".to_string(),
            TextRange::new(0.into(), 11.into()),
        );
        assert_eq!(block.comment_content(), Some("block".to_string()));
    }

    #[test]
    fn test_collect_leading_and_trailing() {
        let node = method("class A {\n  // doc\n  void f() {} // tail\n  int x;\n}");
        let info = TriviaCollector::new().collect_node_trivia(&node);

        let leading: Vec<_> = info.leading.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(leading, vec!["\n", "  ", "// doc", "\n", "  "]);
        let trailing: Vec<_> = info.trailing.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(trailing, vec![" ", "// tail", "\n"]);
        assert_eq!(info.comments().count(), 2);
        assert_eq!(info.leading_newlines(), 2);
    }

    #[test]
    fn test_collect_across_empty_modifier_list() {
        // `class` follows the type's zero-length modifier list
        let (cst, _) = parse_java("package p;\n\n/** Docs. */\nclass A {}\n");
        let type_decl = cst
            .descendants()
            .find(|n| n.kind() == JavaSyntaxKind::TypeDecl)
            .unwrap();
        let info = TriviaCollector::new().collect_node_trivia(&type_decl);
        assert_eq!(
            info.comments().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            vec!["/** Docs. */"]
        );
        assert_eq!(info.leading_newlines(), 3);
    }

    #[test]
    fn test_token_walk_steps_over_empty_nodes() {
        let node = method("class A {void f() {}void g() {}}");
        let first = first_significant_token(&node).unwrap();
        assert_eq!(prev_token(&first).unwrap().text(), "{");

        let last = last_significant_token(&node).unwrap();
        assert_eq!(last.text(), "}");
        assert_eq!(next_token(&last).unwrap().text(), "void");
    }

    #[test]
    fn test_unbounded_trailing() {
        let node = method("class A {\n  void f() {}\n\n  int x;\n}");
        let info = TriviaCollector::unbounded().collect_node_trivia(&node);
        assert_eq!(info.trailing.iter().filter(|t| t.is_newline()).count(), 2);
        assert!(!info.has_comments());
    }
}
