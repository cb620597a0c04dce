//! Locating property values in the original CST
//!
//! For every property this module answers two questions: which original
//! node(s) or token hold its value, and where text has to go when a value is
//! inserted into an empty optional slot or removed from it (including the
//! keyword or punctuation that only exists while the value does, such as
//! ` else`, ` = ` or ` throws `).

use rowan::{NodeOrToken, TextRange, TextSize};

use super::property::{PropertyDescriptor, PropertyKind, properties_of};
use super::source_range;
use crate::syntax::ast::{self, AstNode, MethodDecl, token_of_kind};
use crate::syntax::trivia::{first_significant_token, last_significant_token, next_token, prev_token};
use crate::syntax::{JavaSyntaxKind as K, JavaSyntaxNode, JavaSyntaxToken, NodeClass};
use crate::{Result, RewriteError};

/// Where an absent optional value is inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InsertPoint {
    /// Usually empty; non-empty when a placeholder token is replaced (`;` of
    /// an abstract method getting a body)
    pub range: TextRange,
    pub prefix: String,
    pub suffix: String,
}

impl InsertPoint {
    fn at(offset: TextSize, prefix: &str, suffix: &str) -> Self {
        Self {
            range: TextRange::empty(offset),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }
}

/// Text removed together with a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Removal {
    pub range: TextRange,
    pub replacement: String,
}

impl Removal {
    fn new(start: TextSize, end: TextSize, replacement: &str) -> Self {
        Self {
            range: TextRange::new(start, end.max(start)),
            replacement: replacement.to_string(),
        }
    }
}

/// A single-child property of an original node
#[derive(Debug, Clone)]
pub(crate) struct ChildSlot {
    pub insert: Option<InsertPoint>,
    pub removal: Option<Removal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Separator {
    Comma,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListLayout {
    /// Elements on one line (possibly wrapped), joined by a separator
    Inline {
        separator: Separator,
        /// Whether an original gap spanning lines may be reused for new gaps
        reuse_multiline: bool,
    },
    /// One element per line
    Lines { blank_lines: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EmptyInsert {
    Inline(InsertPoint),
    /// Between `{` and `}`
    Braced { open: TextSize, close: TextSize },
    Lines {
        offset: TextSize,
        prefix: String,
        suffix: String,
    },
    Unsupported,
}

/// A list property of an original node
#[derive(Debug, Clone)]
pub(crate) struct ListSlot {
    pub elements: Vec<JavaSyntaxNode>,
    pub layout: ListLayout,
    pub empty_insert: EmptyInsert,
    /// Replacement of the whole clause when the list becomes empty
    pub clear: Option<Removal>,
}

// ============================================================================
// Navigation helpers
// ============================================================================

fn child_kind(parent: &JavaSyntaxNode, kind: K) -> Option<JavaSyntaxNode> {
    parent.children().find(|n| n.kind() == kind)
}

fn nth_class(parent: &JavaSyntaxNode, class: NodeClass, n: usize) -> Option<JavaSyntaxNode> {
    parent
        .children()
        .filter(|c| c.kind().conforms_to(class))
        .nth(n)
}

fn children_of_class(parent: &JavaSyntaxNode, class: NodeClass) -> Vec<JavaSyntaxNode> {
    parent
        .children()
        .filter(|c| c.kind().conforms_to(class))
        .collect()
}

/// Node directly following the first `kind` token, if nothing but trivia
/// separates them
fn node_after_token(parent: &JavaSyntaxNode, kind: K) -> Option<JavaSyntaxNode> {
    let token = token_of_kind(parent, kind)?;
    let mut next = token.next_sibling_or_token();
    while let Some(element) = next {
        match element {
            NodeOrToken::Token(t) if t.kind().is_trivia() => next = t.next_sibling_or_token(),
            NodeOrToken::Token(_) => return None,
            NodeOrToken::Node(n) if n.kind() == K::ErrorNode => return None,
            NodeOrToken::Node(n) => return Some(n),
        }
    }
    None
}

fn direct_tokens(parent: &JavaSyntaxNode) -> impl Iterator<Item = JavaSyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia())
}

fn nth_token_of_kind(parent: &JavaSyntaxNode, kind: K, n: usize) -> Option<JavaSyntaxToken> {
    direct_tokens(parent).filter(|t| t.kind() == kind).nth(n)
}

fn significant_before(token: &JavaSyntaxToken) -> Option<JavaSyntaxToken> {
    let mut current = prev_token(token);
    while let Some(t) = current {
        if !t.kind().is_trivia() {
            return Some(t);
        }
        current = prev_token(&t);
    }
    None
}

fn significant_after(token: &JavaSyntaxToken) -> Option<JavaSyntaxToken> {
    let mut current = next_token(token);
    while let Some(t) = current {
        if !t.kind().is_trivia() {
            return Some(t);
        }
        current = next_token(&t);
    }
    None
}

/// End of the significant token preceding `token`
fn end_before_token(token: &JavaSyntaxToken) -> TextSize {
    significant_before(token)
        .map(|t| t.text_range().end())
        .unwrap_or_default()
}

/// End of the significant token preceding `node`
fn end_before(node: &JavaSyntaxNode) -> TextSize {
    first_significant_token(node)
        .map(|t| end_before_token(&t))
        .unwrap_or_else(|| node.text_range().start())
}

/// Start of the significant token following `node`, or the end of the text
fn start_after(node: &JavaSyntaxNode) -> TextSize {
    let root_end = node
        .ancestors()
        .last()
        .map(|r| r.text_range().end())
        .unwrap_or_else(|| node.text_range().end());
    last_significant_token(node)
        .and_then(|t| significant_after(&t))
        .map(|t| t.text_range().start())
        .unwrap_or(root_end)
}

fn is_interface(type_decl: &JavaSyntaxNode) -> bool {
    token_of_kind(type_decl, K::InterfaceKw).is_some()
}

fn has_receiver(parent: &JavaSyntaxNode) -> bool {
    token_of_kind(parent, K::Dot).is_some()
}

// ============================================================================
// Original values
// ============================================================================

/// Original child of a single-child property
pub(crate) fn original_child(parent: &JavaSyntaxNode, property: PropertyDescriptor) -> Option<JavaSyntaxNode> {
    let kind = parent.kind();
    match (kind, property.id()) {
        (K::CompilationUnit, "PACKAGE") => child_kind(parent, K::PackageDecl),
        (K::PackageDecl | K::ImportDecl | K::SimpleType, "NAME") | (K::Annotation, "TYPE_NAME") => {
            nth_class(parent, NodeClass::Name, 0)
        }
        (K::TypeDecl | K::MethodDecl | K::Parameter | K::VarDeclarator, "NAME") => {
            child_kind(parent, K::SimpleName)
        }
        (K::MethodCall | K::FieldAccess, "NAME") => {
            if has_receiver(parent) {
                node_after_token(parent, K::Dot)
            } else {
                child_kind(parent, K::SimpleName)
            }
        }
        (K::QualifiedName, "NAME") => node_after_token(parent, K::Dot),
        (K::QualifiedName, "QUALIFIER") => parent.first_child(),
        (K::TypeDecl, "SUPERCLASS_TYPE") => {
            if is_interface(parent) {
                None
            } else {
                child_kind(parent, K::ExtendsClause).and_then(|c| nth_class(&c, NodeClass::Type, 0))
            }
        }
        (K::MethodDecl, "RETURN_TYPE") => MethodDecl::cast(parent.clone())?.return_type(),
        (K::MethodDecl, "BODY") => child_kind(parent, K::Block),
        (_, "TYPE") | (K::ArrayType, "ELEMENT_TYPE") | (K::InstanceofExpr, "RIGHT_OPERAND") => {
            nth_class(parent, NodeClass::Type, 0)
        }
        (K::VarDeclarator, "INITIALIZER") => node_after_token(parent, K::Eq),
        (K::ForStmt, "EXPRESSION") => node_after_token(parent, K::Semicolon),
        (K::MethodCall, "EXPRESSION") => {
            if has_receiver(parent) {
                parent.first_child()
            } else {
                None
            }
        }
        (
            _,
            "EXPRESSION" | "LEFT_HAND_SIDE" | "LEFT_OPERAND" | "OPERAND" | "ARRAY",
        ) => nth_class(parent, NodeClass::Expression, 0),
        (_, "RIGHT_HAND_SIDE" | "RIGHT_OPERAND" | "THEN_EXPRESSION" | "INDEX") => {
            nth_class(parent, NodeClass::Expression, 1)
        }
        (K::ConditionalExpr, "ELSE_EXPRESSION") => nth_class(parent, NodeClass::Expression, 2),
        (K::IfStmt, "THEN_STATEMENT") => nth_class(parent, NodeClass::Statement, 0),
        (K::IfStmt, "ELSE_STATEMENT") => node_after_token(parent, K::ElseKw),
        (K::TryStmt | K::CatchClause, "BODY") => child_kind(parent, K::Block),
        (_, "BODY") => nth_class(parent, NodeClass::Statement, 0),
        (K::TryStmt, "FINALLY") => node_after_token(parent, K::FinallyKw),
        (K::CatchClause, "EXCEPTION") => child_kind(parent, K::Parameter),
        (_, "LABEL") => child_kind(parent, K::SimpleName),
        _ => None,
    }
}

/// Container node holding the elements of a list property
fn list_container(parent: &JavaSyntaxNode, property: PropertyDescriptor) -> Option<JavaSyntaxNode> {
    match (parent.kind(), property.id()) {
        (_, "MODIFIERS") => child_kind(parent, K::ModifierList),
        (K::TypeDecl, "SUPER_INTERFACE_TYPES") => {
            let clause = if is_interface(parent) {
                K::ExtendsClause
            } else {
                K::ImplementsClause
            };
            child_kind(parent, clause)
        }
        (K::TypeDecl, "BODY_DECLARATIONS") => child_kind(parent, K::ClassBody),
        (K::MethodDecl, "PARAMETERS") => child_kind(parent, K::ParamList),
        (K::MethodDecl, "THROWN_EXCEPTION_TYPES") => child_kind(parent, K::ThrowsClause),
        (_, "ARGUMENTS") => child_kind(parent, K::ArgList),
        (K::ForStmt, "INITIALIZERS") => child_kind(parent, K::ForInit),
        (K::ForStmt, "UPDATERS") => child_kind(parent, K::ForUpdate),
        (K::ParameterizedType, "TYPE_ARGUMENTS") => child_kind(parent, K::TypeArgList),
        _ => Some(parent.clone()),
    }
}

/// Original elements of a list property
pub(crate) fn original_list(parent: &JavaSyntaxNode, property: PropertyDescriptor) -> Vec<JavaSyntaxNode> {
    let Some(class) = property.node_class() else {
        return Vec::new();
    };
    list_container(parent, property)
        .map(|container| children_of_class(&container, class))
        .unwrap_or_default()
}

/// Token holding the value of a simple property
pub(crate) fn simple_token(parent: &JavaSyntaxNode, property: PropertyDescriptor) -> Option<JavaSyntaxToken> {
    let mut tokens = direct_tokens(parent);
    match (parent.kind(), property.id()) {
        (K::TypeDecl, "TYPE_KEYWORD") => {
            tokens.find(|t| matches!(t.kind(), K::ClassKw | K::InterfaceKw))
        }
        (K::SimpleName, _) => tokens.find(|t| t.kind() == K::Ident),
        (K::Assignment, _) => tokens.find(|t| t.kind().is_assignment_operator()),
        (K::InfixExpr, _) => tokens.find(|t| t.kind().infix_precedence().is_some()),
        (K::PrefixExpr, _) => tokens.find(|t| t.kind().is_prefix_operator()),
        (K::PostfixExpr, _) => tokens.find(|t| t.kind().is_postfix_operator()),
        _ => tokens.next(),
    }
}

/// Current text of a simple property in the original tree
pub(crate) fn original_simple(parent: &JavaSyntaxNode, property: PropertyDescriptor) -> Option<String> {
    simple_token(parent, property).map(|t| t.text().to_string())
}

// ============================================================================
// Geometry
// ============================================================================

pub(crate) fn child_slot(parent: &JavaSyntaxNode, property: PropertyDescriptor) -> ChildSlot {
    let original = original_child(parent, property);
    let (insert, removal) = if property.is_mandatory() {
        (None, None)
    } else {
        optional_geometry(parent, property, original.as_ref())
    };
    ChildSlot {
        insert,
        removal,
    }
}

fn optional_geometry(
    parent: &JavaSyntaxNode,
    property: PropertyDescriptor,
    original: Option<&JavaSyntaxNode>,
) -> (Option<InsertPoint>, Option<Removal>) {
    let range = |n: &JavaSyntaxNode| n.text_range();
    match (parent.kind(), property.id()) {
        (K::CompilationUnit, "PACKAGE") => {
            let insert = InsertPoint::at(TextSize::from(0), "", "\n\n");
            let removal = original.map(|p| Removal::new(range(p).start(), start_after(p), ""));
            (Some(insert), removal)
        }
        (K::TypeDecl, "SUPERCLASS_TYPE") => {
            if is_interface(parent) {
                return (None, None);
            }
            let anchor = child_kind(parent, K::ImplementsClause).or_else(|| child_kind(parent, K::ClassBody));
            let insert = anchor.map(|a| InsertPoint::at(end_before(&a), " extends ", ""));
            let removal = child_kind(parent, K::ExtendsClause)
                .map(|clause| Removal::new(end_before(&clause), range(&clause).end(), ""));
            (insert, removal)
        }
        (K::MethodDecl, "RETURN_TYPE") => {
            let Some(name) = child_kind(parent, K::SimpleName) else {
                return (None, None);
            };
            let insert = InsertPoint::at(range(&name).start(), "", " ");
            let removal = original.map(|t| Removal::new(range(t).start(), range(&name).start(), ""));
            (Some(insert), removal)
        }
        (K::MethodDecl, "BODY") => {
            let insert = nth_token_of_kind(parent, K::Semicolon, 0).map(|semi| InsertPoint {
                range: TextRange::new(end_before_token(&semi), semi.text_range().end()),
                prefix: " ".to_string(),
                suffix: String::new(),
            });
            let removal = original.map(|b| Removal::new(end_before(b), range(b).end(), ";"));
            (insert, removal)
        }
        (K::VarDeclarator, "INITIALIZER") => {
            let insert = last_significant_token(parent)
                .map(|t| InsertPoint::at(t.text_range().end(), " = ", ""));
            let removal = match (original, token_of_kind(parent, K::Eq)) {
                (Some(init), Some(eq)) => Some(Removal::new(end_before_token(&eq), range(init).end(), "")),
                _ => None,
            };
            (insert, removal)
        }
        (K::ReturnStmt, "EXPRESSION") | (K::BreakStmt | K::ContinueStmt, "LABEL") => {
            let Some(keyword) = direct_tokens(parent).next() else {
                return (None, None);
            };
            let end = keyword.text_range().end();
            let insert = InsertPoint::at(end, " ", "");
            let removal = original.map(|e| Removal::new(end, range(e).end(), ""));
            (Some(insert), removal)
        }
        (K::IfStmt, "ELSE_STATEMENT") => {
            let Some(then) = nth_class(parent, NodeClass::Statement, 0) else {
                return (None, None);
            };
            let insert = InsertPoint::at(range(&then).end(), " else ", "");
            let removal = original.map(|e| Removal::new(range(&then).end(), range(e).end(), ""));
            (Some(insert), removal)
        }
        (K::ForStmt, "EXPRESSION") => {
            let Some(semi) = nth_token_of_kind(parent, K::Semicolon, 0) else {
                return (None, None);
            };
            let end = semi.text_range().end();
            let insert = InsertPoint::at(end, " ", "");
            let removal = original.map(|e| Removal::new(end, range(e).end(), ""));
            (Some(insert), removal)
        }
        (K::TryStmt, "FINALLY") => {
            let last = parent
                .children()
                .filter(|c| matches!(c.kind(), K::Block | K::CatchClause))
                .take_while(|c| Some(c) != original)
                .last();
            let insert = last.map(|l| InsertPoint::at(range(&l).end(), " finally ", ""));
            let removal = match (original, token_of_kind(parent, K::FinallyKw)) {
                (Some(block), Some(keyword)) => {
                    Some(Removal::new(end_before_token(&keyword), range(block).end(), ""))
                }
                _ => None,
            };
            (insert, removal)
        }
        (K::MethodCall, "EXPRESSION") => {
            let Some(name) = original_child(parent, ast::MethodCall::NAME) else {
                return (None, None);
            };
            let insert = InsertPoint::at(range(&name).start(), "", ".");
            let removal = original.map(|e| Removal::new(range(e).start(), range(&name).start(), ""));
            (Some(insert), removal)
        }
        _ => (None, None),
    }
}

pub(crate) fn list_slot(parent: &JavaSyntaxNode, property: PropertyDescriptor) -> ListSlot {
    let elements = original_list(parent, property);
    let container = list_container(parent, property);
    let span_clear = |elements: &[JavaSyntaxNode]| match (elements.first(), elements.last()) {
        (Some(first), Some(last)) => Some(Removal::new(
            first.text_range().start(),
            last.text_range().end(),
            "",
        )),
        _ => None,
    };
    let inline_comma = ListLayout::Inline {
        separator: Separator::Comma,
        reuse_multiline: true,
    };

    let (layout, empty_insert, clear) = match (parent.kind(), property.id()) {
        (_, "MODIFIERS") => {
            let empty = container
                .as_ref()
                .map(|ml| EmptyInsert::Inline(InsertPoint::at(ml.text_range().start(), "", " ")))
                .unwrap_or(EmptyInsert::Unsupported);
            let clear = match (elements.first(), elements.last()) {
                (Some(first), Some(last)) => Some(Removal::new(first.text_range().start(), start_after(last), "")),
                _ => None,
            };
            (
                ListLayout::Inline {
                    separator: Separator::Space,
                    reuse_multiline: false,
                },
                empty,
                clear,
            )
        }
        (K::CompilationUnit, "IMPORTS") => {
            let empty = match child_kind(parent, K::PackageDecl) {
                Some(package) => EmptyInsert::Lines {
                    offset: package.text_range().end(),
                    prefix: "\n\n".to_string(),
                    suffix: String::new(),
                },
                None => match child_kind(parent, K::TypeDecl) {
                    Some(ty) => EmptyInsert::Lines {
                        offset: source_range::extended_range(&ty).start(),
                        prefix: String::new(),
                        suffix: "\n\n".to_string(),
                    },
                    None => EmptyInsert::Lines {
                        offset: TextSize::from(0),
                        prefix: String::new(),
                        suffix: "\n".to_string(),
                    },
                },
            };
            (ListLayout::Lines { blank_lines: false }, empty, None)
        }
        (K::CompilationUnit, "TYPES") => {
            let end = last_significant_token(parent).map(|t| t.text_range().end());
            let empty = match end {
                Some(offset) => EmptyInsert::Lines {
                    offset,
                    prefix: "\n\n".to_string(),
                    suffix: String::new(),
                },
                None => EmptyInsert::Lines {
                    offset: TextSize::from(0),
                    prefix: String::new(),
                    suffix: "\n".to_string(),
                },
            };
            (ListLayout::Lines { blank_lines: true }, empty, None)
        }
        (K::TypeDecl, "BODY_DECLARATIONS") | (K::Block, "STATEMENTS") => {
            let braces = if parent.kind() == K::Block {
                Some(parent.clone())
            } else {
                container.clone()
            };
            let empty = braces
                .and_then(|b| {
                    let open = token_of_kind(&b, K::LBrace)?;
                    let close = token_of_kind(&b, K::RBrace)?;
                    Some(EmptyInsert::Braced {
                        open: open.text_range().end(),
                        close: close.text_range().start(),
                    })
                })
                .unwrap_or(EmptyInsert::Unsupported);
            let blank_lines = parent.kind() == K::TypeDecl;
            (ListLayout::Lines { blank_lines }, empty, None)
        }
        (K::MethodDecl, "PARAMETERS") | (_, "ARGUMENTS") | (K::ParameterizedType, "TYPE_ARGUMENTS") => {
            let (open_kind, close_kind) = if property.id() == "TYPE_ARGUMENTS" {
                (K::Lt, K::Gt)
            } else {
                (K::LParen, K::RParen)
            };
            let delimited = container.as_ref().and_then(|c| {
                let open = token_of_kind(c, open_kind)?;
                let close = token_of_kind(c, close_kind)?;
                Some((open.text_range().end(), close.text_range().start()))
            });
            match delimited {
                Some((open, close)) => (
                    inline_comma,
                    EmptyInsert::Inline(InsertPoint::at(open, "", "")),
                    Some(Removal::new(open, close, "")),
                ),
                None if parent.kind() == K::Annotation => {
                    let empty = nth_class(parent, NodeClass::Name, 0)
                        .map(|n| EmptyInsert::Inline(InsertPoint::at(n.text_range().end(), "(", ")")))
                        .unwrap_or(EmptyInsert::Unsupported);
                    (inline_comma, empty, None)
                }
                None => (inline_comma, EmptyInsert::Unsupported, None),
            }
        }
        (K::MethodDecl, "THROWN_EXCEPTION_TYPES") | (K::TypeDecl, "SUPER_INTERFACE_TYPES") => {
            let (keyword, anchor) = if parent.kind() == K::MethodDecl {
                let anchor = child_kind(parent, K::Block)
                    .and_then(|b| first_significant_token(&b))
                    .or_else(|| nth_token_of_kind(parent, K::Semicolon, 0));
                (" throws ", anchor)
            } else {
                let keyword = if is_interface(parent) {
                    " extends "
                } else {
                    " implements "
                };
                let anchor = child_kind(parent, K::ClassBody).and_then(|b| first_significant_token(&b));
                (keyword, anchor)
            };
            let empty = anchor
                .map(|a| EmptyInsert::Inline(InsertPoint::at(end_before_token(&a), keyword, "")))
                .unwrap_or(EmptyInsert::Unsupported);
            let clear = container
                .as_ref()
                .filter(|c| c.kind() != parent.kind())
                .map(|c| Removal::new(end_before(c), c.text_range().end(), ""));
            (inline_comma, empty, clear)
        }
        (K::ForStmt, "INITIALIZERS" | "UPDATERS") => {
            let empty = container
                .as_ref()
                .map(|c| {
                    let offset = c.text_range().start();
                    let after_semicolon = property.id() == "UPDATERS"
                        && nth_token_of_kind(parent, K::Semicolon, 1)
                            .is_some_and(|s| s.text_range().end() == offset);
                    let prefix = if after_semicolon { " " } else { "" };
                    EmptyInsert::Inline(InsertPoint::at(offset, prefix, ""))
                })
                .unwrap_or(EmptyInsert::Unsupported);
            // Updaters follow the second `;`, so the gap after it goes too
            let clear = match (property.id(), elements.first(), elements.last()) {
                ("UPDATERS", Some(first), Some(last)) => {
                    Some(Removal::new(end_before(first), last.text_range().end(), ""))
                }
                _ => span_clear(&elements),
            };
            (inline_comma, empty, clear)
        }
        (K::TryStmt, "CATCH_CLAUSES") => {
            let body = child_kind(parent, K::Block);
            let empty = body
                .as_ref()
                .map(|b| EmptyInsert::Inline(InsertPoint::at(b.text_range().end(), " ", "")))
                .unwrap_or(EmptyInsert::Unsupported);
            let clear = match (body, elements.last()) {
                (Some(b), Some(last)) => Some(Removal::new(b.text_range().end(), last.text_range().end(), "")),
                _ => None,
            };
            (
                ListLayout::Inline {
                    separator: Separator::Space,
                    reuse_multiline: false,
                },
                empty,
                clear,
            )
        }
        _ => (inline_comma, EmptyInsert::Unsupported, None),
    };

    ListSlot {
        elements,
        layout,
        empty_insert,
        clear,
    }
}

/// Find the parent node and property holding `node`
pub(crate) fn locate(node: &JavaSyntaxNode) -> Result<(JavaSyntaxNode, PropertyDescriptor)> {
    let no_parent = || RewriteError::NoParentProperty {
        kind: node.kind().to_string(),
    };
    let mut parent = node.parent();
    while let Some(p) = parent.as_ref() {
        if !p.kind().is_container() {
            break;
        }
        parent = p.parent();
    }
    let parent = parent.ok_or_else(no_parent)?;

    for property in properties_of(parent.kind()) {
        let found = match property.kind() {
            PropertyKind::Child { .. } => original_child(&parent, *property).as_ref() == Some(node),
            PropertyKind::ChildList { .. } => original_list(&parent, *property).contains(node),
            PropertyKind::Simple => false,
        };
        if found {
            return Ok((parent, *property));
        }
    }
    Err(no_parent())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_java;

    fn first(root: &JavaSyntaxNode, kind: K) -> JavaSyntaxNode {
        root.descendants().find(|n| n.kind() == kind).unwrap()
    }

    fn text_of(source: &str, range: TextRange) -> &str {
        &source[range]
    }

    #[test]
    fn test_original_children() {
        let (cst, _) = parse_java("class A { int f(int a) { if (x) y(); else z(); return a + 1; } }");
        let method = first(&cst, K::MethodDecl);
        assert_eq!(original_child(&method, ast::MethodDecl::NAME).unwrap().text(), "f");
        assert_eq!(original_child(&method, ast::MethodDecl::RETURN_TYPE).unwrap().text(), "int");

        let if_stmt = first(&cst, K::IfStmt);
        assert_eq!(original_child(&if_stmt, ast::IfStmt::EXPRESSION).unwrap().text(), "x");
        assert_eq!(original_child(&if_stmt, ast::IfStmt::THEN_STATEMENT).unwrap().text(), "y();");
        assert_eq!(original_child(&if_stmt, ast::IfStmt::ELSE_STATEMENT).unwrap().text(), "z();");

        let infix = first(&cst, K::InfixExpr);
        assert_eq!(original_child(&infix, ast::InfixExpr::RIGHT_OPERAND).unwrap().text(), "1");
        assert_eq!(original_simple(&infix, ast::InfixExpr::OPERATOR).unwrap(), "+");
    }

    #[test]
    fn test_method_call_receiver() {
        let (cst, _) = parse_java("class A { void f() { a.b(); c(); } }");
        let calls: Vec<_> = cst.descendants().filter(|n| n.kind() == K::MethodCall).collect();
        assert_eq!(original_child(&calls[0], ast::MethodCall::EXPRESSION).unwrap().text(), "a");
        assert_eq!(original_child(&calls[0], ast::MethodCall::NAME).unwrap().text(), "b");
        assert!(original_child(&calls[1], ast::MethodCall::EXPRESSION).is_none());
        assert_eq!(original_child(&calls[1], ast::MethodCall::NAME).unwrap().text(), "c");
    }

    #[test]
    fn test_lists() {
        let (cst, _) = parse_java("public final class A implements B, C { void f(int a, int b) throws E {} int x; }");
        let ty = first(&cst, K::TypeDecl);
        let modifiers = original_list(&ty, ast::TypeDecl::MODIFIERS);
        assert_eq!(modifiers.len(), 2);
        assert_eq!(original_list(&ty, ast::TypeDecl::SUPER_INTERFACE_TYPES).len(), 2);
        assert_eq!(original_list(&ty, ast::TypeDecl::BODY_DECLARATIONS).len(), 2);
        let method = first(&cst, K::MethodDecl);
        assert_eq!(original_list(&method, ast::MethodDecl::PARAMETERS).len(), 2);
        assert_eq!(original_list(&method, ast::MethodDecl::THROWN_EXCEPTION_TYPES).len(), 1);
    }

    #[test]
    fn test_optional_geometry() {
        let source = "class A { void f() { if (a) b(); else c(); return x; } abstract void g(); int y = 1; }";
        let (cst, _) = parse_java(source);

        let if_stmt = first(&cst, K::IfStmt);
        let slot = child_slot(&if_stmt, ast::IfStmt::ELSE_STATEMENT);
        assert_eq!(text_of(source, slot.removal.unwrap().range), " else c();");

        let ret = first(&cst, K::ReturnStmt);
        let slot = child_slot(&ret, ast::ReturnStmt::EXPRESSION);
        assert_eq!(text_of(source, slot.removal.unwrap().range), " x");

        let g = cst
            .descendants()
            .filter_map(ast::MethodDecl::cast)
            .find(|m| m.name_text().as_deref() == Some("g"))
            .unwrap();
        assert!(original_child(g.syntax(), ast::MethodDecl::BODY).is_none());
        let slot = child_slot(g.syntax(), ast::MethodDecl::BODY);
        let insert = slot.insert.unwrap();
        assert_eq!(text_of(source, insert.range), ";");

        let declarator = first(&cst, K::VarDeclarator);
        let slot = child_slot(&declarator, ast::VarDeclarator::INITIALIZER);
        assert_eq!(text_of(source, slot.removal.unwrap().range), " = 1");
    }

    #[test]
    fn test_list_geometry() {
        let source = "class A { void f(int a) throws E {} }";
        let (cst, _) = parse_java(source);
        let method = first(&cst, K::MethodDecl);

        let params = list_slot(&method, ast::MethodDecl::PARAMETERS);
        assert_eq!(text_of(source, params.clear.unwrap().range), "int a");

        let throws = list_slot(&method, ast::MethodDecl::THROWN_EXCEPTION_TYPES);
        assert_eq!(text_of(source, throws.clear.unwrap().range), " throws E");

        let modifiers = list_slot(&method, ast::MethodDecl::MODIFIERS);
        match modifiers.empty_insert {
            EmptyInsert::Inline(point) => {
                assert_eq!(&source[usize::from(point.range.start())..][..4], "void");
                assert_eq!(point.suffix, " ");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_locate() {
        let (cst, _) = parse_java("class A { void f(int a) { g(); } }");
        let param = first(&cst, K::Parameter);
        let (parent, property) = locate(&param).unwrap();
        assert_eq!(parent.kind(), K::MethodDecl);
        assert_eq!(property, ast::MethodDecl::PARAMETERS);

        let stmt = first(&cst, K::ExprStmt);
        let (parent, property) = locate(&stmt).unwrap();
        assert_eq!(parent.kind(), K::Block);
        assert_eq!(property, ast::Block::STATEMENTS);

        assert!(matches!(locate(&cst), Err(RewriteError::NoParentProperty { .. })));
    }
}
