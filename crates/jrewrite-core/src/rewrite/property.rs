//! Structural property descriptors
//!
//! A descriptor names one property of one node kind: a single child, an
//! ordered child list, or a simple token value. Descriptors are exposed as
//! associated constants of the typed wrappers in `syntax::ast`, e.g.
//! `MethodDecl::NAME` or `Block::STATEMENTS`.

use std::fmt;

use crate::syntax::{JavaSyntaxKind, NodeClass, ast, is_valid_identifier, lex_with_trivia};
use crate::{Result, RewriteError};

/// What a property holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// A single child node, possibly optional
    Child { mandatory: bool, class: NodeClass },
    /// An ordered list of child nodes
    ChildList { class: NodeClass },
    /// A value carried by a token
    Simple,
}

/// Descriptor of one structural property of a node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyDescriptor {
    id: &'static str,
    owner: JavaSyntaxKind,
    kind: PropertyKind,
}

impl PropertyDescriptor {
    pub const fn new(id: &'static str, owner: JavaSyntaxKind, kind: PropertyKind) -> Self {
        Self { id, owner, kind }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Node kind that declares this property
    pub fn owner(&self) -> JavaSyntaxKind {
        self.owner
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub fn is_child(&self) -> bool {
        matches!(self.kind, PropertyKind::Child { .. })
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, PropertyKind::ChildList { .. })
    }

    pub fn is_simple(&self) -> bool {
        matches!(self.kind, PropertyKind::Simple)
    }

    pub fn is_mandatory(&self) -> bool {
        matches!(self.kind, PropertyKind::Child { mandatory: true, .. })
    }

    /// Class of nodes accepted by a child or list property
    pub fn node_class(&self) -> Option<NodeClass> {
        match self.kind {
            PropertyKind::Child { class, .. } | PropertyKind::ChildList { class } => Some(class),
            PropertyKind::Simple => None,
        }
    }

    /// Check that a node of `kind` may be placed into this property
    pub fn check_node(&self, kind: JavaSyntaxKind) -> Result<()> {
        match self.node_class() {
            Some(class) if kind.conforms_to(class) => Ok(()),
            Some(class) => Err(RewriteError::incompatible_node(
                self.to_string(),
                class.name(),
                kind.to_string(),
            )),
            None => Err(RewriteError::property_mismatch(
                self.to_string(),
                "a node value (property is simple)",
            )),
        }
    }

    /// Validate a new value of a simple property
    pub fn validate_simple(&self, value: &str) -> Result<()> {
        let invalid = |reason: &str| {
            Err(RewriteError::invalid_value(
                self.to_string(),
                value.to_string(),
                reason.to_string(),
            ))
        };
        if !self.is_simple() {
            return Err(RewriteError::property_mismatch(
                self.to_string(),
                "a simple value (property holds nodes)",
            ));
        }

        use JavaSyntaxKind as K;
        match (self.owner, self.id) {
            (K::SimpleName, "IDENTIFIER") => {
                if !is_valid_identifier(value) {
                    return invalid("not a valid Java identifier");
                }
            }
            (K::Modifier, "KEYWORD") => {
                if !K::from_keyword(value).is_some_and(|k| k.is_modifier_keyword()) {
                    return invalid("not a modifier keyword");
                }
            }
            (K::PrimitiveType, _) => {
                if !K::from_keyword(value).is_some_and(|k| k.is_primitive_keyword()) {
                    return invalid("not a primitive type");
                }
            }
            (K::TypeDecl, "TYPE_KEYWORD") => {
                if value != "class" && value != "interface" {
                    return invalid("expected 'class' or 'interface'");
                }
            }
            (K::Assignment, _) => {
                if !K::from_operator(value).is_some_and(|k| k.is_assignment_operator()) {
                    return invalid("not an assignment operator");
                }
            }
            (K::InfixExpr, _) => {
                if !K::from_operator(value).is_some_and(|k| k.infix_precedence().is_some()) {
                    return invalid("not a binary operator");
                }
            }
            (K::PrefixExpr, _) => {
                if !K::from_operator(value).is_some_and(|k| k.is_prefix_operator()) {
                    return invalid("not a prefix operator");
                }
            }
            (K::PostfixExpr, _) => {
                if !K::from_operator(value).is_some_and(|k| k.is_postfix_operator()) {
                    return invalid("not a postfix operator");
                }
            }
            (K::BooleanLiteral, _) => {
                if value != "true" && value != "false" {
                    return invalid("expected 'true' or 'false'");
                }
            }
            (K::NumberLiteral, _) => {
                if !lexes_as(value, K::NumberLit) {
                    return invalid("not a number literal");
                }
            }
            (K::StringLiteral, _) => {
                if !lexes_as(value, K::StringLit) {
                    return invalid("not a quoted string literal");
                }
            }
            (K::CharacterLiteral, _) => {
                if !lexes_as(value, K::CharLit) {
                    return invalid("not a quoted character literal");
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl fmt::Display for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.id)
    }
}

fn lexes_as(value: &str, kind: JavaSyntaxKind) -> bool {
    let (tokens, errors) = lex_with_trivia(value);
    errors.is_empty() && tokens.len() == 1 && tokens[0].kind == kind
}

const fn mandatory(class: NodeClass) -> PropertyKind {
    PropertyKind::Child {
        mandatory: true,
        class,
    }
}

const fn optional(class: NodeClass) -> PropertyKind {
    PropertyKind::Child {
        mandatory: false,
        class,
    }
}

const fn list(class: NodeClass) -> PropertyKind {
    PropertyKind::ChildList { class }
}

const SIMPLE: PropertyKind = PropertyKind::Simple;

macro_rules! properties {
    ($($owner:ident { $($name:ident: $kind:expr),* $(,)? })*) => {
        $(
            impl ast::$owner {
                $(
                    pub const $name: PropertyDescriptor =
                        PropertyDescriptor::new(stringify!($name), JavaSyntaxKind::$owner, $kind);
                )*
            }
        )*

        /// Structural properties of a node kind, in source order
        pub fn properties_of(kind: JavaSyntaxKind) -> &'static [PropertyDescriptor] {
            match kind {
                $(JavaSyntaxKind::$owner => &[$(ast::$owner::$name),*],)*
                _ => &[],
            }
        }
    };
}

use NodeClass::*;

properties! {
    CompilationUnit {
        PACKAGE: optional(PackageDeclaration),
        IMPORTS: list(ImportDeclaration),
        TYPES: list(TypeDeclaration),
    }
    PackageDecl { NAME: mandatory(Name) }
    ImportDecl { NAME: mandatory(Name) }
    TypeDecl {
        MODIFIERS: list(Modifier),
        TYPE_KEYWORD: SIMPLE,
        NAME: mandatory(NodeClass::SimpleName),
        SUPERCLASS_TYPE: optional(Type),
        SUPER_INTERFACE_TYPES: list(Type),
        BODY_DECLARATIONS: list(BodyDeclaration),
    }
    FieldDecl {
        MODIFIERS: list(Modifier),
        TYPE: mandatory(Type),
        FRAGMENTS: list(VariableDeclarator),
    }
    MethodDecl {
        MODIFIERS: list(Modifier),
        RETURN_TYPE: optional(Type),
        NAME: mandatory(NodeClass::SimpleName),
        PARAMETERS: list(Parameter),
        THROWN_EXCEPTION_TYPES: list(Type),
        BODY: optional(Block),
    }
    Parameter {
        MODIFIERS: list(Modifier),
        TYPE: mandatory(Type),
        NAME: mandatory(NodeClass::SimpleName),
    }
    VarDeclarator {
        NAME: mandatory(NodeClass::SimpleName),
        INITIALIZER: optional(Expression),
    }
    Modifier { KEYWORD: SIMPLE }
    Annotation {
        TYPE_NAME: mandatory(Name),
        ARGUMENTS: list(Expression),
    }
    Block { STATEMENTS: list(Statement) }
    LocalVarDecl {
        MODIFIERS: list(Modifier),
        TYPE: mandatory(Type),
        FRAGMENTS: list(VariableDeclarator),
    }
    VarDeclExpr {
        MODIFIERS: list(Modifier),
        TYPE: mandatory(Type),
        FRAGMENTS: list(VariableDeclarator),
    }
    ExprStmt { EXPRESSION: mandatory(Expression) }
    ReturnStmt { EXPRESSION: optional(Expression) }
    ThrowStmt { EXPRESSION: mandatory(Expression) }
    IfStmt {
        EXPRESSION: mandatory(Expression),
        THEN_STATEMENT: mandatory(Statement),
        ELSE_STATEMENT: optional(Statement),
    }
    WhileStmt {
        EXPRESSION: mandatory(Expression),
        BODY: mandatory(Statement),
    }
    DoStmt {
        BODY: mandatory(Statement),
        EXPRESSION: mandatory(Expression),
    }
    ForStmt {
        INITIALIZERS: list(Expression),
        EXPRESSION: optional(Expression),
        UPDATERS: list(Expression),
        BODY: mandatory(Statement),
    }
    BreakStmt { LABEL: optional(NodeClass::SimpleName) }
    ContinueStmt { LABEL: optional(NodeClass::SimpleName) }
    TryStmt {
        BODY: mandatory(NodeClass::Block),
        CATCH_CLAUSES: list(NodeClass::CatchClause),
        FINALLY: optional(NodeClass::Block),
    }
    CatchClause {
        EXCEPTION: mandatory(NodeClass::Parameter),
        BODY: mandatory(NodeClass::Block),
    }
    SimpleName { IDENTIFIER: SIMPLE }
    QualifiedName {
        QUALIFIER: mandatory(Name),
        NAME: mandatory(NodeClass::SimpleName),
    }
    PrimitiveType { PRIMITIVE_TYPE_CODE: SIMPLE }
    SimpleType { NAME: mandatory(Name) }
    ArrayType { ELEMENT_TYPE: mandatory(Type) }
    ParameterizedType {
        TYPE: mandatory(Type),
        TYPE_ARGUMENTS: list(Type),
    }
    Assignment {
        LEFT_HAND_SIDE: mandatory(Expression),
        OPERATOR: SIMPLE,
        RIGHT_HAND_SIDE: mandatory(Expression),
    }
    ConditionalExpr {
        EXPRESSION: mandatory(Expression),
        THEN_EXPRESSION: mandatory(Expression),
        ELSE_EXPRESSION: mandatory(Expression),
    }
    InfixExpr {
        LEFT_OPERAND: mandatory(Expression),
        OPERATOR: SIMPLE,
        RIGHT_OPERAND: mandatory(Expression),
    }
    InstanceofExpr {
        LEFT_OPERAND: mandatory(Expression),
        RIGHT_OPERAND: mandatory(Type),
    }
    PrefixExpr {
        OPERATOR: SIMPLE,
        OPERAND: mandatory(Expression),
    }
    PostfixExpr {
        OPERAND: mandatory(Expression),
        OPERATOR: SIMPLE,
    }
    ParenExpr { EXPRESSION: mandatory(Expression) }
    MethodCall {
        EXPRESSION: optional(Expression),
        NAME: mandatory(NodeClass::SimpleName),
        ARGUMENTS: list(Expression),
    }
    FieldAccess {
        EXPRESSION: mandatory(Expression),
        NAME: mandatory(NodeClass::SimpleName),
    }
    NewExpr {
        TYPE: mandatory(Type),
        ARGUMENTS: list(Expression),
    }
    ArrayAccess {
        ARRAY: mandatory(Expression),
        INDEX: mandatory(Expression),
    }
    CastExpr {
        TYPE: mandatory(Type),
        EXPRESSION: mandatory(Expression),
    }
    NumberLiteral { TOKEN: SIMPLE }
    StringLiteral { ESCAPED_VALUE: SIMPLE }
    CharacterLiteral { ESCAPED_VALUE: SIMPLE }
    BooleanLiteral { BOOLEAN_VALUE: SIMPLE }
}

/// Look up a property of `kind` by its id
pub fn property_by_id(kind: JavaSyntaxKind, id: &str) -> Option<PropertyDescriptor> {
    properties_of(kind).iter().copied().find(|p| p.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::{Block, MethodDecl, SimpleName};

    #[test]
    fn test_descriptor_constants() {
        assert_eq!(MethodDecl::NAME.owner(), JavaSyntaxKind::MethodDecl);
        assert!(MethodDecl::NAME.is_mandatory());
        assert!(!MethodDecl::BODY.is_mandatory());
        assert!(Block::STATEMENTS.is_list());
        assert!(SimpleName::IDENTIFIER.is_simple());
        assert_eq!(MethodDecl::BODY.to_string(), "MethodDecl.BODY");
        assert_ne!(MethodDecl::NAME, crate::syntax::ast::TypeDecl::NAME);
    }

    #[test]
    fn test_properties_in_source_order() {
        let ids: Vec<_> = properties_of(JavaSyntaxKind::MethodDecl)
            .iter()
            .map(|p| p.id())
            .collect();
        assert_eq!(
            ids,
            vec![
                "MODIFIERS",
                "RETURN_TYPE",
                "NAME",
                "PARAMETERS",
                "THROWN_EXCEPTION_TYPES",
                "BODY"
            ]
        );
        assert!(properties_of(JavaSyntaxKind::NullLiteral).is_empty());
        assert_eq!(
            property_by_id(JavaSyntaxKind::IfStmt, "ELSE_STATEMENT"),
            Some(crate::syntax::ast::IfStmt::ELSE_STATEMENT)
        );
    }

    #[test]
    fn test_check_node() {
        assert!(Block::STATEMENTS.check_node(JavaSyntaxKind::ReturnStmt).is_ok());
        let err = Block::STATEMENTS
            .check_node(JavaSyntaxKind::MethodDecl)
            .unwrap_err();
        assert!(matches!(err, RewriteError::IncompatibleNode { .. }));
    }

    #[test]
    fn test_validate_simple_values() {
        assert!(SimpleName::IDENTIFIER.validate_simple("count").is_ok());
        assert!(SimpleName::IDENTIFIER.validate_simple("class").is_err());
        assert!(SimpleName::IDENTIFIER.validate_simple("1abc").is_err());

        use crate::syntax::ast::{InfixExpr, Modifier, NumberLiteral, StringLiteral};
        assert!(InfixExpr::OPERATOR.validate_simple("&&").is_ok());
        assert!(InfixExpr::OPERATOR.validate_simple("=").is_err());
        assert!(Modifier::KEYWORD.validate_simple("static").is_ok());
        assert!(Modifier::KEYWORD.validate_simple("void").is_err());
        assert!(NumberLiteral::TOKEN.validate_simple("0x1F").is_ok());
        assert!(NumberLiteral::TOKEN.validate_simple("12 + 3").is_err());
        assert!(StringLiteral::ESCAPED_VALUE.validate_simple("\"a\\\"b\"").is_ok());
        assert!(StringLiteral::ESCAPED_VALUE.validate_simple("abc").is_err());
    }
}
