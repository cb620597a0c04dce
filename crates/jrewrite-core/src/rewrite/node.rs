//! Nodes that can be placed into a rewrite
//!
//! A [`Node`] is either an original CST node or a created node. Created nodes
//! are immutable once built: composites are assembled by [`NodeFactory`] with
//! all of their properties filled, placeholders stand for verbatim code or for
//! a copy/move of an original node.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use super::property::{PropertyDescriptor, PropertyKind, properties_of};
use crate::syntax::{JavaSyntaxKind, JavaSyntaxNode, NodeClass, ast};
use crate::{Result, RewriteError};

/// A node placed into the rewritten tree
#[derive(Clone)]
pub enum Node {
    Original(JavaSyntaxNode),
    Created(Rc<CreatedNode>),
}

impl Node {
    pub fn kind(&self) -> JavaSyntaxKind {
        match self {
            Node::Original(node) => node.kind(),
            Node::Created(created) => created.kind,
        }
    }

    pub fn as_original(&self) -> Option<&JavaSyntaxNode> {
        match self {
            Node::Original(node) => Some(node),
            Node::Created(_) => None,
        }
    }

    pub fn as_created(&self) -> Option<&CreatedNode> {
        match self {
            Node::Original(_) => None,
            Node::Created(created) => Some(created),
        }
    }

    /// Whether this is the original node `node`
    pub fn is_original(&self, node: &JavaSyntaxNode) -> bool {
        self.as_original() == Some(node)
    }

    /// Original node a copy or move placeholder stands for
    pub fn placeholder_source(&self) -> Option<&JavaSyntaxNode> {
        match self.as_created().map(|c| &c.content) {
            Some(CreatedContent::CopyOf(node)) | Some(CreatedContent::MoveOf(node)) => Some(node),
            _ => None,
        }
    }

    pub fn is_move_placeholder(&self) -> bool {
        matches!(
            self.as_created().map(|c| &c.content),
            Some(CreatedContent::MoveOf(_))
        )
    }
}

impl From<JavaSyntaxNode> for Node {
    fn from(node: JavaSyntaxNode) -> Self {
        Node::Original(node)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Original(a), Node::Original(b)) => a == b,
            (Node::Created(a), Node::Created(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Node::Original(node) => node.hash(state),
            Node::Created(created) => std::ptr::hash(Rc::as_ptr(created), state),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Original(node) => write!(f, "Original({:?}@{:?})", node.kind(), node.text_range()),
            Node::Created(created) => write!(f, "Created({:?})", created),
        }
    }
}

/// A node that does not exist in the original source
#[derive(Debug)]
pub struct CreatedNode {
    kind: JavaSyntaxKind,
    content: CreatedContent,
}

#[derive(Debug)]
pub enum CreatedContent {
    /// Property values in source order
    Composite(Vec<(PropertyDescriptor, SlotValue)>),
    /// Verbatim code inserted as-is
    Placeholder(String),
    CopyOf(JavaSyntaxNode),
    MoveOf(JavaSyntaxNode),
}

/// Value of one property of a created composite
#[derive(Debug, Clone)]
pub enum SlotValue {
    Child(Option<Node>),
    List(Vec<Node>),
    Simple(String),
}

impl CreatedNode {
    pub fn kind(&self) -> JavaSyntaxKind {
        self.kind
    }

    pub fn content(&self) -> &CreatedContent {
        &self.content
    }

    fn slot(&self, property: PropertyDescriptor) -> Option<&SlotValue> {
        match &self.content {
            CreatedContent::Composite(slots) => slots
                .iter()
                .find(|(p, _)| *p == property)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn child(&self, property: PropertyDescriptor) -> Option<&Node> {
        match self.slot(property) {
            Some(SlotValue::Child(child)) => child.as_ref(),
            _ => None,
        }
    }

    pub fn list(&self, property: PropertyDescriptor) -> &[Node] {
        match self.slot(property) {
            Some(SlotValue::List(items)) => items,
            _ => &[],
        }
    }

    pub fn simple(&self, property: PropertyDescriptor) -> Option<&str> {
        match self.slot(property) {
            Some(SlotValue::Simple(value)) => Some(value),
            _ => None,
        }
    }
}

pub(crate) fn placeholder(kind: JavaSyntaxKind, content: CreatedContent) -> Node {
    Node::Created(Rc::new(CreatedNode { kind, content }))
}

/// Builder for a created composite node
///
/// Every value is validated against the property it is assigned to, and
/// `build` fails if a mandatory child or a simple value is missing.
pub struct CompositeBuilder {
    kind: JavaSyntaxKind,
    slots: Vec<(PropertyDescriptor, SlotValue)>,
}

impl CompositeBuilder {
    pub fn new(kind: JavaSyntaxKind) -> Self {
        Self {
            kind,
            slots: Vec::new(),
        }
    }

    fn check_owner(&self, property: PropertyDescriptor) -> Result<()> {
        if property.owner() != self.kind {
            return Err(RewriteError::property_mismatch(
                property.to_string(),
                self.kind.to_string(),
            ));
        }
        Ok(())
    }

    fn put(&mut self, property: PropertyDescriptor, value: SlotValue) {
        self.slots.retain(|(p, _)| *p != property);
        self.slots.push((property, value));
    }

    pub fn child(mut self, property: PropertyDescriptor, node: Node) -> Result<Self> {
        self.check_owner(property)?;
        if !property.is_child() {
            return Err(RewriteError::property_mismatch(property.to_string(), "a single child"));
        }
        property.check_node(node.kind())?;
        self.put(property, SlotValue::Child(Some(node)));
        Ok(self)
    }

    pub fn optional_child(self, property: PropertyDescriptor, node: Option<Node>) -> Result<Self> {
        match node {
            Some(node) => self.child(property, node),
            None => {
                self.check_owner(property)?;
                Ok(self)
            }
        }
    }

    pub fn list(mut self, property: PropertyDescriptor, nodes: Vec<Node>) -> Result<Self> {
        self.check_owner(property)?;
        if !property.is_list() {
            return Err(RewriteError::property_mismatch(property.to_string(), "a child list"));
        }
        for node in &nodes {
            property.check_node(node.kind())?;
        }
        self.put(property, SlotValue::List(nodes));
        Ok(self)
    }

    pub fn simple(mut self, property: PropertyDescriptor, value: impl Into<String>) -> Result<Self> {
        self.check_owner(property)?;
        let value = value.into();
        property.validate_simple(&value)?;
        self.put(property, SlotValue::Simple(value));
        Ok(self)
    }

    pub fn build(self) -> Result<Node> {
        let mut ordered = Vec::new();
        for property in properties_of(self.kind) {
            let value = self
                .slots
                .iter()
                .find(|(p, _)| p == property)
                .map(|(_, v)| v.clone());
            let value = match (property.kind(), value) {
                (_, Some(value)) => value,
                (PropertyKind::Child { mandatory: true, .. }, None) => {
                    return Err(RewriteError::mandatory_removed(
                        property.id(),
                        self.kind.to_string(),
                    ));
                }
                (PropertyKind::Child { .. }, None) => SlotValue::Child(None),
                (PropertyKind::ChildList { .. }, None) => SlotValue::List(Vec::new()),
                (PropertyKind::Simple, None) => {
                    return Err(RewriteError::invalid_value(
                        property.to_string(),
                        "",
                        "missing value",
                    ));
                }
            };
            ordered.push((*property, value));
        }
        Ok(Node::Created(Rc::new(CreatedNode {
            kind: self.kind,
            content: CreatedContent::Composite(ordered),
        })))
    }
}

/// Creates new nodes for use in a rewrite
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeFactory;

impl NodeFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn composite(&self, kind: JavaSyntaxKind) -> CompositeBuilder {
        CompositeBuilder::new(kind)
    }

    /// Verbatim code standing for a node of `kind`
    pub fn string_placeholder(&self, code: impl Into<String>, kind: JavaSyntaxKind) -> Node {
        placeholder(kind, CreatedContent::Placeholder(code.into()))
    }

    // Names

    pub fn simple_name(&self, identifier: &str) -> Result<Node> {
        self.composite(JavaSyntaxKind::SimpleName)
            .simple(ast::SimpleName::IDENTIFIER, identifier)?
            .build()
    }

    /// Simple or qualified name from dotted text
    pub fn name(&self, dotted: &str) -> Result<Node> {
        let mut parts = dotted.split('.');
        let first = parts.next().unwrap_or_default();
        let mut name = self.simple_name(first)?;
        for part in parts {
            name = self
                .composite(JavaSyntaxKind::QualifiedName)
                .child(ast::QualifiedName::QUALIFIER, name)?
                .child(ast::QualifiedName::NAME, self.simple_name(part)?)?
                .build()?;
        }
        Ok(name)
    }

    // Types

    pub fn primitive_type(&self, code: &str) -> Result<Node> {
        self.composite(JavaSyntaxKind::PrimitiveType)
            .simple(ast::PrimitiveType::PRIMITIVE_TYPE_CODE, code)?
            .build()
    }

    pub fn simple_type(&self, name: Node) -> Result<Node> {
        self.composite(JavaSyntaxKind::SimpleType)
            .child(ast::SimpleType::NAME, name)?
            .build()
    }

    pub fn array_type(&self, element: Node) -> Result<Node> {
        self.composite(JavaSyntaxKind::ArrayType)
            .child(ast::ArrayType::ELEMENT_TYPE, element)?
            .build()
    }

    pub fn parameterized_type(&self, base: Node, arguments: Vec<Node>) -> Result<Node> {
        self.composite(JavaSyntaxKind::ParameterizedType)
            .child(ast::ParameterizedType::TYPE, base)?
            .list(ast::ParameterizedType::TYPE_ARGUMENTS, arguments)?
            .build()
    }

    /// Type from a name such as `int`, `String`, `java.util.List`
    pub fn type_named(&self, name: &str) -> Result<Node> {
        match JavaSyntaxKind::from_keyword(name) {
            Some(kind) if kind.is_primitive_keyword() => self.primitive_type(name),
            _ => self.simple_type(self.name(name)?),
        }
    }

    // Literals and primaries

    pub fn number_literal(&self, token: &str) -> Result<Node> {
        self.composite(JavaSyntaxKind::NumberLiteral)
            .simple(ast::NumberLiteral::TOKEN, token)?
            .build()
    }

    /// String literal from an unescaped value
    pub fn string_literal(&self, value: &str) -> Result<Node> {
        let mut escaped = String::with_capacity(value.len() + 2);
        escaped.push('"');
        for c in value.chars() {
            match c {
                '"' => escaped.push_str("\\\""),
                '\\' => escaped.push_str("\\\\"),
                '\n' => escaped.push_str("\\n"),
                '\t' => escaped.push_str("\\t"),
                '\r' => escaped.push_str("\\r"),
                c => escaped.push(c),
            }
        }
        escaped.push('"');
        self.composite(JavaSyntaxKind::StringLiteral)
            .simple(ast::StringLiteral::ESCAPED_VALUE, escaped)?
            .build()
    }

    pub fn boolean_literal(&self, value: bool) -> Result<Node> {
        self.composite(JavaSyntaxKind::BooleanLiteral)
            .simple(ast::BooleanLiteral::BOOLEAN_VALUE, value.to_string())?
            .build()
    }

    pub fn null_literal(&self) -> Result<Node> {
        self.composite(JavaSyntaxKind::NullLiteral).build()
    }

    pub fn this_expr(&self) -> Result<Node> {
        self.composite(JavaSyntaxKind::ThisExpr).build()
    }

    // Expressions

    pub fn method_call(&self, receiver: Option<Node>, name: &str, arguments: Vec<Node>) -> Result<Node> {
        self.composite(JavaSyntaxKind::MethodCall)
            .optional_child(ast::MethodCall::EXPRESSION, receiver)?
            .child(ast::MethodCall::NAME, self.simple_name(name)?)?
            .list(ast::MethodCall::ARGUMENTS, arguments)?
            .build()
    }

    pub fn field_access(&self, expression: Node, name: &str) -> Result<Node> {
        self.composite(JavaSyntaxKind::FieldAccess)
            .child(ast::FieldAccess::EXPRESSION, expression)?
            .child(ast::FieldAccess::NAME, self.simple_name(name)?)?
            .build()
    }

    pub fn infix(&self, left: Node, operator: &str, right: Node) -> Result<Node> {
        self.composite(JavaSyntaxKind::InfixExpr)
            .child(ast::InfixExpr::LEFT_OPERAND, left)?
            .simple(ast::InfixExpr::OPERATOR, operator)?
            .child(ast::InfixExpr::RIGHT_OPERAND, right)?
            .build()
    }

    pub fn assignment(&self, left: Node, operator: &str, right: Node) -> Result<Node> {
        self.composite(JavaSyntaxKind::Assignment)
            .child(ast::Assignment::LEFT_HAND_SIDE, left)?
            .simple(ast::Assignment::OPERATOR, operator)?
            .child(ast::Assignment::RIGHT_HAND_SIDE, right)?
            .build()
    }

    pub fn prefix(&self, operator: &str, operand: Node) -> Result<Node> {
        self.composite(JavaSyntaxKind::PrefixExpr)
            .simple(ast::PrefixExpr::OPERATOR, operator)?
            .child(ast::PrefixExpr::OPERAND, operand)?
            .build()
    }

    pub fn postfix(&self, operand: Node, operator: &str) -> Result<Node> {
        self.composite(JavaSyntaxKind::PostfixExpr)
            .child(ast::PostfixExpr::OPERAND, operand)?
            .simple(ast::PostfixExpr::OPERATOR, operator)?
            .build()
    }

    pub fn paren(&self, expression: Node) -> Result<Node> {
        self.composite(JavaSyntaxKind::ParenExpr)
            .child(ast::ParenExpr::EXPRESSION, expression)?
            .build()
    }

    pub fn new_expr(&self, ty: Node, arguments: Vec<Node>) -> Result<Node> {
        self.composite(JavaSyntaxKind::NewExpr)
            .child(ast::NewExpr::TYPE, ty)?
            .list(ast::NewExpr::ARGUMENTS, arguments)?
            .build()
    }

    pub fn cast(&self, ty: Node, expression: Node) -> Result<Node> {
        self.composite(JavaSyntaxKind::CastExpr)
            .child(ast::CastExpr::TYPE, ty)?
            .child(ast::CastExpr::EXPRESSION, expression)?
            .build()
    }

    pub fn conditional(&self, condition: Node, then: Node, otherwise: Node) -> Result<Node> {
        self.composite(JavaSyntaxKind::ConditionalExpr)
            .child(ast::ConditionalExpr::EXPRESSION, condition)?
            .child(ast::ConditionalExpr::THEN_EXPRESSION, then)?
            .child(ast::ConditionalExpr::ELSE_EXPRESSION, otherwise)?
            .build()
    }

    // Statements

    pub fn expr_stmt(&self, expression: Node) -> Result<Node> {
        self.composite(JavaSyntaxKind::ExprStmt)
            .child(ast::ExprStmt::EXPRESSION, expression)?
            .build()
    }

    pub fn return_stmt(&self, expression: Option<Node>) -> Result<Node> {
        self.composite(JavaSyntaxKind::ReturnStmt)
            .optional_child(ast::ReturnStmt::EXPRESSION, expression)?
            .build()
    }

    pub fn throw_stmt(&self, expression: Node) -> Result<Node> {
        self.composite(JavaSyntaxKind::ThrowStmt)
            .child(ast::ThrowStmt::EXPRESSION, expression)?
            .build()
    }

    pub fn if_stmt(&self, condition: Node, then: Node, otherwise: Option<Node>) -> Result<Node> {
        self.composite(JavaSyntaxKind::IfStmt)
            .child(ast::IfStmt::EXPRESSION, condition)?
            .child(ast::IfStmt::THEN_STATEMENT, then)?
            .optional_child(ast::IfStmt::ELSE_STATEMENT, otherwise)?
            .build()
    }

    pub fn while_stmt(&self, condition: Node, body: Node) -> Result<Node> {
        self.composite(JavaSyntaxKind::WhileStmt)
            .child(ast::WhileStmt::EXPRESSION, condition)?
            .child(ast::WhileStmt::BODY, body)?
            .build()
    }

    pub fn block(&self, statements: Vec<Node>) -> Result<Node> {
        self.composite(JavaSyntaxKind::Block)
            .list(ast::Block::STATEMENTS, statements)?
            .build()
    }

    pub fn empty_stmt(&self) -> Result<Node> {
        self.composite(JavaSyntaxKind::EmptyStmt).build()
    }

    pub fn var_declarator(&self, name: &str, initializer: Option<Node>) -> Result<Node> {
        self.composite(JavaSyntaxKind::VarDeclarator)
            .child(ast::VarDeclarator::NAME, self.simple_name(name)?)?
            .optional_child(ast::VarDeclarator::INITIALIZER, initializer)?
            .build()
    }

    pub fn local_var_decl(&self, ty: Node, fragments: Vec<Node>) -> Result<Node> {
        self.composite(JavaSyntaxKind::LocalVarDecl)
            .child(ast::LocalVarDecl::TYPE, ty)?
            .list(ast::LocalVarDecl::FRAGMENTS, fragments)?
            .build()
    }

    // Declarations

    pub fn modifier(&self, keyword: &str) -> Result<Node> {
        self.composite(JavaSyntaxKind::Modifier)
            .simple(ast::Modifier::KEYWORD, keyword)?
            .build()
    }

    pub fn modifiers(&self, keywords: &[&str]) -> Result<Vec<Node>> {
        keywords.iter().map(|k| self.modifier(k)).collect()
    }

    pub fn annotation(&self, name: &str) -> Result<Node> {
        self.composite(JavaSyntaxKind::Annotation)
            .child(ast::Annotation::TYPE_NAME, self.name(name)?)?
            .build()
    }

    pub fn parameter(&self, ty: Node, name: &str) -> Result<Node> {
        self.composite(JavaSyntaxKind::Parameter)
            .child(ast::Parameter::TYPE, ty)?
            .child(ast::Parameter::NAME, self.simple_name(name)?)?
            .build()
    }

    pub fn field_decl(&self, modifiers: Vec<Node>, ty: Node, fragments: Vec<Node>) -> Result<Node> {
        self.composite(JavaSyntaxKind::FieldDecl)
            .list(ast::FieldDecl::MODIFIERS, modifiers)?
            .child(ast::FieldDecl::TYPE, ty)?
            .list(ast::FieldDecl::FRAGMENTS, fragments)?
            .build()
    }

    /// Method declaration; `return_type` is `None` for constructors
    pub fn method_decl(
        &self,
        modifiers: Vec<Node>,
        return_type: Option<Node>,
        name: &str,
        parameters: Vec<Node>,
        body: Option<Node>,
    ) -> Result<Node> {
        self.composite(JavaSyntaxKind::MethodDecl)
            .list(ast::MethodDecl::MODIFIERS, modifiers)?
            .optional_child(ast::MethodDecl::RETURN_TYPE, return_type)?
            .child(ast::MethodDecl::NAME, self.simple_name(name)?)?
            .list(ast::MethodDecl::PARAMETERS, parameters)?
            .optional_child(ast::MethodDecl::BODY, body)?
            .build()
    }

    pub fn import_decl(&self, name: &str) -> Result<Node> {
        self.composite(JavaSyntaxKind::ImportDecl)
            .child(ast::ImportDecl::NAME, self.name(name)?)?
            .build()
    }
}

/// Whether rendered nodes of `kind` carry their leading comments along
pub(crate) fn takes_comments(kind: JavaSyntaxKind) -> bool {
    kind.conforms_to(NodeClass::Statement)
        || kind.conforms_to(NodeClass::BodyDeclaration)
        || kind == JavaSyntaxKind::ImportDecl
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let factory = NodeFactory::new();
        let a = factory.simple_name("a").unwrap();
        let b = factory.simple_name("a").unwrap();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_qualified_name() {
        let factory = NodeFactory::new();
        let name = factory.name("java.util.List").unwrap();
        assert_eq!(name.kind(), JavaSyntaxKind::QualifiedName);
        let created = name.as_created().unwrap();
        let qualifier = created.child(ast::QualifiedName::QUALIFIER).unwrap();
        assert_eq!(qualifier.kind(), JavaSyntaxKind::QualifiedName);
        let last = created.child(ast::QualifiedName::NAME).unwrap();
        assert_eq!(
            last.as_created().unwrap().simple(ast::SimpleName::IDENTIFIER),
            Some("List")
        );
    }

    #[test]
    fn test_builder_validation() {
        let factory = NodeFactory::new();
        assert!(matches!(
            factory.simple_name("int"),
            Err(RewriteError::InvalidValue { .. })
        ));

        let stmt = factory.empty_stmt().unwrap();
        let err = factory
            .composite(JavaSyntaxKind::IfStmt)
            .child(ast::IfStmt::EXPRESSION, stmt)
            .err()
            .unwrap();
        assert!(matches!(err, RewriteError::IncompatibleNode { .. }));

        let err = factory
            .composite(JavaSyntaxKind::ExprStmt)
            .build()
            .unwrap_err();
        assert!(matches!(err, RewriteError::MandatoryPropertyRemoved { .. }));

        let err = factory
            .composite(JavaSyntaxKind::Block)
            .list(ast::MethodDecl::PARAMETERS, Vec::new())
            .err()
            .unwrap();
        assert!(matches!(err, RewriteError::PropertyMismatch { .. }));
    }

    #[test]
    fn test_string_literal_escaping() {
        let factory = NodeFactory::new();
        let literal = factory.string_literal("say \"hi\"\n").unwrap();
        assert_eq!(
            literal
                .as_created()
                .unwrap()
                .simple(ast::StringLiteral::ESCAPED_VALUE),
            Some("\"say \\\"hi\\\"\\n\"")
        );
    }

    #[test]
    fn test_type_named() {
        let factory = NodeFactory::new();
        assert_eq!(factory.type_named("int").unwrap().kind(), JavaSyntaxKind::PrimitiveType);
        assert_eq!(factory.type_named("java.util.Map").unwrap().kind(), JavaSyntaxKind::SimpleType);
    }
}
