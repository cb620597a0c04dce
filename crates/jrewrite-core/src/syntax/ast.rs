//! Typed AST layer over the CST
//!
//! Each wrapper is named after the node kind it wraps and implements
//! [`AstNode`] to cast safely from raw CST nodes. The structural property
//! descriptors of each kind are attached to these wrappers as associated
//! constants (see `rewrite::property`).
//!
//! # Example
//!
//! ```ignore
//! use jrewrite_core::syntax::{parse_java, ast::{AstNode, CompilationUnit}};
//!
//! let (cst, _) = parse_java("class A { void run() {} }");
//! let unit = CompilationUnit::cast(cst).unwrap();
//! let ty = unit.types().next().unwrap();
//! assert_eq!(ty.name_text().unwrap(), "A");
//! assert_eq!(ty.methods().next().unwrap().name_text().unwrap(), "run");
//! ```

use super::{JavaSyntaxKind, JavaSyntaxNode, JavaSyntaxToken, NodeClass};

/// Helper trait for casting CST nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: JavaSyntaxKind) -> bool;
    fn cast(node: JavaSyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &JavaSyntaxNode;
}

/// First child node of a specific kind
pub(crate) fn child_of_kind(parent: &JavaSyntaxNode, kind: JavaSyntaxKind) -> Option<JavaSyntaxNode> {
    parent.children().find(|n| n.kind() == kind)
}

/// First child token of a specific kind
pub(crate) fn token_of_kind(parent: &JavaSyntaxNode, kind: JavaSyntaxKind) -> Option<JavaSyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

/// Identifier text of the `SimpleName` child
fn name_text(node: &JavaSyntaxNode) -> Option<String> {
    child_of_kind(node, JavaSyntaxKind::SimpleName)
        .and_then(|name| token_of_kind(&name, JavaSyntaxKind::Ident))
        .map(|t| t.text().to_string())
}

macro_rules! ast_nodes {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, Hash)]
            pub struct $name {
                syntax: JavaSyntaxNode,
            }

            impl AstNode for $name {
                fn can_cast(kind: JavaSyntaxKind) -> bool {
                    kind == JavaSyntaxKind::$name
                }

                fn cast(node: JavaSyntaxNode) -> Option<Self> {
                    if Self::can_cast(node.kind()) {
                        Some(Self { syntax: node })
                    } else {
                        None
                    }
                }

                fn syntax(&self) -> &JavaSyntaxNode {
                    &self.syntax
                }
            }
        )*
    };
}

ast_nodes! {
    /// Root of a source file
    CompilationUnit,
    PackageDecl,
    ImportDecl,
    /// Class or interface declaration
    TypeDecl,
    ModifierList,
    /// Modifier keyword such as `public` or `static`
    Modifier,
    Annotation,
    ExtendsClause,
    ImplementsClause,
    ClassBody,
    FieldDecl,
    /// Method or constructor declaration
    MethodDecl,
    ParamList,
    Parameter,
    ThrowsClause,
    VarDeclarator,
    Block,
    LocalVarDecl,
    VarDeclExpr,
    ExprStmt,
    ReturnStmt,
    ThrowStmt,
    IfStmt,
    WhileStmt,
    DoStmt,
    ForStmt,
    ForInit,
    ForUpdate,
    BreakStmt,
    ContinueStmt,
    EmptyStmt,
    TryStmt,
    CatchClause,
    SimpleName,
    QualifiedName,
    PrimitiveType,
    SimpleType,
    ArrayType,
    ParameterizedType,
    TypeArgList,
    Assignment,
    ConditionalExpr,
    InfixExpr,
    InstanceofExpr,
    PrefixExpr,
    PostfixExpr,
    ParenExpr,
    MethodCall,
    ArgList,
    FieldAccess,
    NewExpr,
    ArrayAccess,
    CastExpr,
    NumberLiteral,
    StringLiteral,
    CharacterLiteral,
    BooleanLiteral,
    NullLiteral,
    ThisExpr,
    SuperExpr,
}

// ============================================================================
// Compilation unit
// ============================================================================

impl CompilationUnit {
    pub fn package(&self) -> Option<PackageDecl> {
        self.syntax.children().find_map(PackageDecl::cast)
    }

    pub fn imports(&self) -> impl Iterator<Item = ImportDecl> {
        self.syntax.children().filter_map(ImportDecl::cast)
    }

    pub fn types(&self) -> impl Iterator<Item = TypeDecl> {
        self.syntax.children().filter_map(TypeDecl::cast)
    }

    /// Find a top-level or nested type by simple name
    pub fn find_type(&self, name: &str) -> Option<TypeDecl> {
        self.syntax
            .descendants()
            .filter_map(TypeDecl::cast)
            .find(|t| t.name_text().as_deref() == Some(name))
    }
}

impl ImportDecl {
    pub fn is_static(&self) -> bool {
        token_of_kind(&self.syntax, JavaSyntaxKind::StaticKw).is_some()
    }

    pub fn is_on_demand(&self) -> bool {
        token_of_kind(&self.syntax, JavaSyntaxKind::Star).is_some()
    }
}

// ============================================================================
// Type declarations
// ============================================================================

impl TypeDecl {
    pub fn name_text(&self) -> Option<String> {
        name_text(&self.syntax)
    }

    pub fn is_interface(&self) -> bool {
        token_of_kind(&self.syntax, JavaSyntaxKind::InterfaceKw).is_some()
    }

    pub fn modifiers(&self) -> Option<ModifierList> {
        self.syntax.children().find_map(ModifierList::cast)
    }

    pub fn extends_clause(&self) -> Option<ExtendsClause> {
        self.syntax.children().find_map(ExtendsClause::cast)
    }

    pub fn implements_clause(&self) -> Option<ImplementsClause> {
        self.syntax.children().find_map(ImplementsClause::cast)
    }

    pub fn body(&self) -> Option<ClassBody> {
        self.syntax.children().find_map(ClassBody::cast)
    }

    /// Fields, methods and member types in source order
    pub fn body_declarations(&self) -> impl Iterator<Item = JavaSyntaxNode> {
        self.body()
            .into_iter()
            .flat_map(|b| b.syntax.children())
            .filter(|n| n.kind().conforms_to(NodeClass::BodyDeclaration))
    }

    pub fn methods(&self) -> impl Iterator<Item = MethodDecl> {
        self.body_declarations().filter_map(MethodDecl::cast)
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldDecl> {
        self.body_declarations().filter_map(FieldDecl::cast)
    }

    pub fn method(&self, name: &str) -> Option<MethodDecl> {
        self.methods()
            .find(|m| m.name_text().as_deref() == Some(name))
    }
}

impl ModifierList {
    /// Modifier keywords and annotations in source order
    pub fn items(&self) -> impl Iterator<Item = JavaSyntaxNode> {
        self.syntax
            .children()
            .filter(|n| n.kind().conforms_to(NodeClass::Modifier))
    }

    pub fn keywords(&self) -> Vec<String> {
        self.syntax
            .children()
            .filter_map(Modifier::cast)
            .filter_map(|m| m.keyword())
            .collect()
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords().iter().any(|k| k == keyword)
    }
}

impl Modifier {
    pub fn keyword(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_modifier_keyword())
            .map(|t| t.text().to_string())
    }
}

impl Annotation {
    pub fn type_name(&self) -> Option<JavaSyntaxNode> {
        self.syntax
            .children()
            .find(|n| n.kind().conforms_to(NodeClass::Name))
    }
}

// ============================================================================
// Members
// ============================================================================

impl MethodDecl {
    pub fn name_text(&self) -> Option<String> {
        name_text(&self.syntax)
    }

    pub fn name(&self) -> Option<SimpleName> {
        self.syntax.children().find_map(SimpleName::cast)
    }

    pub fn modifiers(&self) -> Option<ModifierList> {
        self.syntax.children().find_map(ModifierList::cast)
    }

    /// Return type; `None` for constructors
    pub fn return_type(&self) -> Option<JavaSyntaxNode> {
        self.syntax
            .children()
            .take_while(|n| n.kind() != JavaSyntaxKind::SimpleName)
            .find(|n| n.kind().conforms_to(NodeClass::Type))
    }

    pub fn is_constructor(&self) -> bool {
        self.return_type().is_none()
    }

    pub fn param_list(&self) -> Option<ParamList> {
        self.syntax.children().find_map(ParamList::cast)
    }

    pub fn parameters(&self) -> impl Iterator<Item = Parameter> {
        self.param_list()
            .into_iter()
            .flat_map(|p| p.syntax.children())
            .filter_map(Parameter::cast)
    }

    pub fn throws_clause(&self) -> Option<ThrowsClause> {
        self.syntax.children().find_map(ThrowsClause::cast)
    }

    pub fn body(&self) -> Option<Block> {
        self.syntax.children().find_map(Block::cast)
    }
}

impl Parameter {
    pub fn name_text(&self) -> Option<String> {
        name_text(&self.syntax)
    }

    pub fn type_node(&self) -> Option<JavaSyntaxNode> {
        self.syntax
            .children()
            .find(|n| n.kind().conforms_to(NodeClass::Type))
    }

    pub fn is_varargs(&self) -> bool {
        token_of_kind(&self.syntax, JavaSyntaxKind::Ellipsis).is_some()
    }
}

impl FieldDecl {
    pub fn fragments(&self) -> impl Iterator<Item = VarDeclarator> {
        self.syntax.children().filter_map(VarDeclarator::cast)
    }
}

impl VarDeclarator {
    pub fn name_text(&self) -> Option<String> {
        name_text(&self.syntax)
    }

    pub fn initializer(&self) -> Option<JavaSyntaxNode> {
        self.syntax
            .children()
            .skip(1)
            .find(|n| n.kind().conforms_to(NodeClass::Expression))
    }
}

// ============================================================================
// Statements
// ============================================================================

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = JavaSyntaxNode> {
        self.syntax
            .children()
            .filter(|n| n.kind().conforms_to(NodeClass::Statement))
    }

    /// Whether the braces are on the same line
    pub fn is_single_line(&self) -> bool {
        !self.syntax.text().contains_char('\n')
    }
}

impl LocalVarDecl {
    pub fn fragments(&self) -> impl Iterator<Item = VarDeclarator> {
        self.syntax.children().filter_map(VarDeclarator::cast)
    }
}

impl IfStmt {
    pub fn condition(&self) -> Option<JavaSyntaxNode> {
        self.syntax
            .children()
            .find(|n| n.kind().conforms_to(NodeClass::Expression))
    }

    pub fn else_statement(&self) -> Option<JavaSyntaxNode> {
        token_of_kind(&self.syntax, JavaSyntaxKind::ElseKw)?;
        self.syntax
            .children()
            .filter(|n| n.kind().conforms_to(NodeClass::Statement))
            .nth(1)
    }
}

// ============================================================================
// Names and expressions
// ============================================================================

impl SimpleName {
    pub fn identifier(&self) -> Option<String> {
        token_of_kind(&self.syntax, JavaSyntaxKind::Ident).map(|t| t.text().to_string())
    }

    pub fn ident_token(&self) -> Option<JavaSyntaxToken> {
        token_of_kind(&self.syntax, JavaSyntaxKind::Ident)
    }
}

impl QualifiedName {
    /// Dotted name text without trivia
    pub fn full_name(&self) -> String {
        self.syntax
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| !t.kind().is_trivia())
            .map(|t| t.text().to_string())
            .collect()
    }
}

impl MethodCall {
    /// Invoked method name; for `x.run()` this is `run`, not the receiver
    pub fn name_text(&self) -> Option<String> {
        crate::rewrite::slots::original_child(&self.syntax, Self::NAME)
            .and_then(SimpleName::cast)
            .and_then(|name| name.identifier())
    }

    /// Receiver expression, if the call is qualified
    pub fn receiver(&self) -> Option<JavaSyntaxNode> {
        token_of_kind(&self.syntax, JavaSyntaxKind::Dot)?;
        self.syntax.first_child()
    }

    pub fn arguments(&self) -> impl Iterator<Item = JavaSyntaxNode> {
        self.syntax
            .children()
            .find(|n| n.kind() == JavaSyntaxKind::ArgList)
            .into_iter()
            .flat_map(|args| args.children())
    }
}

impl InfixExpr {
    pub fn operator(&self) -> Option<JavaSyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().infix_precedence().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_java;

    fn unit(source: &str) -> CompilationUnit {
        let (cst, errors) = parse_java(source);
        assert!(errors.is_empty(), "{errors:?}");
        CompilationUnit::cast(cst).unwrap()
    }

    #[test]
    fn test_type_navigation() {
        let unit = unit(
            "package p;\nimport a.B;\nimport static c.D.*;\npublic class A extends B {\n  int x;\n  public A() {}\n  String name(int a, int... b) { return null; }\n}\ninterface I {}\n",
        );
        assert!(unit.package().is_some());
        let imports: Vec<_> = unit.imports().collect();
        assert_eq!(imports.len(), 2);
        assert!(imports[1].is_static() && imports[1].is_on_demand());

        let types: Vec<_> = unit.types().collect();
        assert_eq!(types.len(), 2);
        assert!(!types[0].is_interface());
        assert!(types[1].is_interface());
        assert!(types[0].modifiers().unwrap().has_keyword("public"));
        assert!(types[0].extends_clause().is_some());

        let a = unit.find_type("A").unwrap();
        assert_eq!(a.fields().count(), 1);
        let methods: Vec<_> = a.methods().collect();
        assert!(methods[0].is_constructor());
        let name = a.method("name").unwrap();
        assert_eq!(name.return_type().unwrap().text(), "String");
        let params: Vec<_> = name.parameters().collect();
        assert_eq!(params[0].name_text().unwrap(), "a");
        assert!(params[1].is_varargs());
        assert_eq!(name.body().unwrap().statements().count(), 1);
    }

    #[test]
    fn test_expression_wrappers() {
        let (cst, _) = parse_java("class A { void f() { if (a) x.run(1, 2); else y = b + c; } }");
        let call = cst.descendants().find_map(MethodCall::cast).unwrap();
        assert_eq!(call.name_text().unwrap(), "run");
        assert_eq!(call.receiver().unwrap().text(), "x");
        assert_eq!(call.arguments().count(), 2);

        let infix = cst.descendants().find_map(InfixExpr::cast).unwrap();
        assert_eq!(infix.operator().unwrap().text(), "+");

        let if_stmt = cst.descendants().find_map(IfStmt::cast).unwrap();
        assert_eq!(if_stmt.condition().unwrap().text(), "a");
        assert_eq!(if_stmt.else_statement().unwrap().text(), "y = b + c;");
    }

    #[test]
    fn test_cast_rejects_other_kinds() {
        let (cst, _) = parse_java("class A {}");
        assert!(MethodDecl::cast(cst.clone()).is_none());
        assert!(CompilationUnit::cast(cst).is_some());
    }
}
