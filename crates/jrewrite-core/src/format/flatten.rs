//! Flattening of created composites into format elements

use super::format_element::{
    FormatElement, dedent, hard_line_break, indent, sequence, soft_line_break, space, text, token,
};
use super::{BraceStyle, FormatOptions};
use crate::rewrite::{CreatedNode, Node, PropertyDescriptor};
use crate::syntax::JavaSyntaxKind as K;
use crate::syntax::ast::*;
use crate::{Result, RewriteError};

pub(super) struct Flattener<'a> {
    options: &'a FormatOptions,
    embed: &'a mut dyn FnMut(&Node) -> Result<String>,
}

impl<'a> Flattener<'a> {
    pub(super) fn new(options: &'a FormatOptions, embed: &'a mut dyn FnMut(&Node) -> Result<String>) -> Self {
        Self { options, embed }
    }

    /// Elements for one composite; its children are embedded as text
    pub(super) fn node(&mut self, node: &CreatedNode) -> Result<Vec<FormatElement>> {
        let mut out = Vec::new();
        match node.kind() {
            // ====================================================================
            // Declarations
            // ====================================================================
            K::CompilationUnit => {
                let mut sections = Vec::new();
                if let Some(package) = node.child(CompilationUnit::PACKAGE) {
                    sections.push(vec![self.embed(package)?]);
                }
                let imports = node.list(CompilationUnit::IMPORTS);
                if !imports.is_empty() {
                    sections.push(self.lines(imports, false)?);
                }
                let types = node.list(CompilationUnit::TYPES);
                if !types.is_empty() {
                    sections.push(self.lines(types, true)?);
                }
                for (index, section) in sections.into_iter().enumerate() {
                    if index > 0 {
                        out.push(hard_line_break());
                        out.push(hard_line_break());
                    }
                    out.extend(section);
                }
                out.push(hard_line_break());
            }
            K::PackageDecl => {
                out.push(token("package"));
                out.push(space());
                out.push(self.child(node, PackageDecl::NAME)?);
                out.push(token(";"));
            }
            K::ImportDecl => {
                out.push(token("import"));
                out.push(space());
                out.push(self.child(node, ImportDecl::NAME)?);
                out.push(token(";"));
            }
            K::TypeDecl => {
                out.extend(self.modifiers(node.list(TypeDecl::MODIFIERS), true)?);
                let keyword = self.simple(node, TypeDecl::TYPE_KEYWORD)?;
                out.push(text(keyword));
                out.push(space());
                out.push(self.child(node, TypeDecl::NAME)?);
                if let Some(superclass) = node.child(TypeDecl::SUPERCLASS_TYPE) {
                    out.push(space());
                    out.push(token("extends"));
                    out.push(space());
                    out.push(self.embed(superclass)?);
                }
                let interfaces = node.list(TypeDecl::SUPER_INTERFACE_TYPES);
                if !interfaces.is_empty() {
                    out.push(space());
                    out.push(token(if keyword == "interface" { "extends" } else { "implements" }));
                    out.push(space());
                    out.extend(self.comma_list(interfaces)?);
                }
                out.extend(self.brace_separator());
                out.extend(self.braced(node.list(TypeDecl::BODY_DECLARATIONS), true)?);
            }
            K::FieldDecl => {
                out.extend(self.modifiers(node.list(FieldDecl::MODIFIERS), true)?);
                out.push(self.child(node, FieldDecl::TYPE)?);
                out.push(space());
                out.extend(self.comma_list(node.list(FieldDecl::FRAGMENTS))?);
                out.push(token(";"));
            }
            K::MethodDecl => {
                out.extend(self.modifiers(node.list(MethodDecl::MODIFIERS), true)?);
                if let Some(return_type) = node.child(MethodDecl::RETURN_TYPE) {
                    out.push(self.embed(return_type)?);
                    out.push(space());
                }
                out.push(self.child(node, MethodDecl::NAME)?);
                out.push(token("("));
                out.extend(self.comma_list(node.list(MethodDecl::PARAMETERS))?);
                out.push(token(")"));
                let thrown = node.list(MethodDecl::THROWN_EXCEPTION_TYPES);
                if !thrown.is_empty() {
                    out.push(space());
                    out.push(token("throws"));
                    out.push(space());
                    out.extend(self.comma_list(thrown)?);
                }
                match node.child(MethodDecl::BODY) {
                    Some(body) => {
                        out.extend(self.brace_separator());
                        out.push(self.embed(body)?);
                    }
                    None => out.push(token(";")),
                }
            }
            K::Parameter => {
                out.extend(self.modifiers(node.list(Parameter::MODIFIERS), false)?);
                out.push(self.child(node, Parameter::TYPE)?);
                out.push(space());
                out.push(self.child(node, Parameter::NAME)?);
            }
            K::VarDeclarator => {
                out.push(self.child(node, VarDeclarator::NAME)?);
                if let Some(initializer) = node.child(VarDeclarator::INITIALIZER) {
                    out.push(space());
                    out.push(token("="));
                    out.push(space());
                    out.push(self.embed(initializer)?);
                }
            }
            K::Modifier => out.push(text(self.simple(node, Modifier::KEYWORD)?)),
            K::Annotation => {
                out.push(token("@"));
                out.push(self.child(node, Annotation::TYPE_NAME)?);
                let arguments = node.list(Annotation::ARGUMENTS);
                if !arguments.is_empty() {
                    out.push(token("("));
                    out.extend(self.comma_list(arguments)?);
                    out.push(token(")"));
                }
            }

            // ====================================================================
            // Statements
            // ====================================================================
            K::Block => out.extend(self.braced(node.list(Block::STATEMENTS), false)?),
            K::LocalVarDecl => {
                out.extend(self.variables(node, LocalVarDecl::MODIFIERS, LocalVarDecl::TYPE, LocalVarDecl::FRAGMENTS)?);
                out.push(token(";"));
            }
            K::VarDeclExpr => {
                out.extend(self.variables(node, VarDeclExpr::MODIFIERS, VarDeclExpr::TYPE, VarDeclExpr::FRAGMENTS)?);
            }
            K::ExprStmt => {
                out.push(self.child(node, ExprStmt::EXPRESSION)?);
                out.push(token(";"));
            }
            K::ReturnStmt => {
                out.push(token("return"));
                if let Some(expression) = node.child(ReturnStmt::EXPRESSION) {
                    out.push(space());
                    out.push(self.embed(expression)?);
                }
                out.push(token(";"));
            }
            K::ThrowStmt => {
                out.push(token("throw"));
                out.push(space());
                out.push(self.child(node, ThrowStmt::EXPRESSION)?);
                out.push(token(";"));
            }
            K::IfStmt => {
                out.push(token("if"));
                out.push(space());
                out.extend(self.condition(node, IfStmt::EXPRESSION)?);
                let then = self.required(node, IfStmt::THEN_STATEMENT)?;
                out.extend(self.body(then)?);
                if let Some(otherwise) = node.child(IfStmt::ELSE_STATEMENT) {
                    out.extend(self.after_body(then));
                    out.push(token("else"));
                    if otherwise.kind() == K::IfStmt {
                        out.push(space());
                        out.push(self.embed(otherwise)?);
                    } else {
                        out.extend(self.body(otherwise)?);
                    }
                }
            }
            K::WhileStmt => {
                out.push(token("while"));
                out.push(space());
                out.extend(self.condition(node, WhileStmt::EXPRESSION)?);
                let body = self.required(node, WhileStmt::BODY)?;
                out.extend(self.body(body)?);
            }
            K::DoStmt => {
                out.push(token("do"));
                let body = self.required(node, DoStmt::BODY)?;
                out.extend(self.body(body)?);
                out.extend(self.after_body(body));
                out.push(token("while"));
                out.push(space());
                out.extend(self.condition(node, DoStmt::EXPRESSION)?);
                out.push(token(";"));
            }
            K::ForStmt => {
                out.push(token("for"));
                out.push(space());
                out.push(token("("));
                out.extend(self.comma_list(node.list(ForStmt::INITIALIZERS))?);
                out.push(token(";"));
                if let Some(condition) = node.child(ForStmt::EXPRESSION) {
                    out.push(space());
                    out.push(self.embed(condition)?);
                }
                out.push(token(";"));
                let updaters = node.list(ForStmt::UPDATERS);
                if !updaters.is_empty() {
                    out.push(space());
                    out.extend(self.comma_list(updaters)?);
                }
                out.push(token(")"));
                let body = self.required(node, ForStmt::BODY)?;
                out.extend(self.body(body)?);
            }
            K::BreakStmt | K::ContinueStmt => {
                let (keyword, label) = if node.kind() == K::BreakStmt {
                    ("break", BreakStmt::LABEL)
                } else {
                    ("continue", ContinueStmt::LABEL)
                };
                out.push(token(keyword));
                if let Some(label) = node.child(label) {
                    out.push(space());
                    out.push(self.embed(label)?);
                }
                out.push(token(";"));
            }
            K::EmptyStmt => out.push(token(";")),
            K::TryStmt => {
                out.push(token("try"));
                let body = self.required(node, TryStmt::BODY)?;
                out.extend(self.body(body)?);
                for clause in node.list(TryStmt::CATCH_CLAUSES) {
                    out.extend(self.after_body(body));
                    out.push(self.embed(clause)?);
                }
                if let Some(finally) = node.child(TryStmt::FINALLY) {
                    out.extend(self.after_body(body));
                    out.push(token("finally"));
                    out.extend(self.body(finally)?);
                }
            }
            K::CatchClause => {
                out.push(token("catch"));
                out.push(space());
                out.push(token("("));
                out.push(self.child(node, CatchClause::EXCEPTION)?);
                out.push(token(")"));
                let body = self.required(node, CatchClause::BODY)?;
                out.extend(self.body(body)?);
            }

            // ====================================================================
            // Names and types
            // ====================================================================
            K::SimpleName => out.push(text(self.simple(node, SimpleName::IDENTIFIER)?)),
            K::QualifiedName => {
                out.push(self.child(node, QualifiedName::QUALIFIER)?);
                out.push(token("."));
                out.push(self.child(node, QualifiedName::NAME)?);
            }
            K::PrimitiveType => out.push(text(self.simple(node, PrimitiveType::PRIMITIVE_TYPE_CODE)?)),
            K::SimpleType => out.push(self.child(node, SimpleType::NAME)?),
            K::ArrayType => {
                out.push(self.child(node, ArrayType::ELEMENT_TYPE)?);
                out.push(token("[]"));
            }
            K::ParameterizedType => {
                out.push(self.child(node, ParameterizedType::TYPE)?);
                out.push(token("<"));
                out.extend(self.comma_list(node.list(ParameterizedType::TYPE_ARGUMENTS))?);
                out.push(token(">"));
            }

            // ====================================================================
            // Expressions
            // ====================================================================
            K::Assignment => {
                out.push(self.child(node, Assignment::LEFT_HAND_SIDE)?);
                out.push(space());
                out.push(text(self.simple(node, Assignment::OPERATOR)?));
                out.push(space());
                out.push(self.child(node, Assignment::RIGHT_HAND_SIDE)?);
            }
            K::ConditionalExpr => {
                out.push(self.child(node, ConditionalExpr::EXPRESSION)?);
                out.extend([space(), token("?"), soft_line_break()]);
                out.push(self.child(node, ConditionalExpr::THEN_EXPRESSION)?);
                out.extend([space(), token(":"), soft_line_break()]);
                out.push(self.child(node, ConditionalExpr::ELSE_EXPRESSION)?);
            }
            K::InfixExpr => {
                out.push(self.child(node, InfixExpr::LEFT_OPERAND)?);
                let operator = text(self.simple(node, InfixExpr::OPERATOR)?);
                if self.options.spaces_around_operators {
                    out.extend([space(), operator, soft_line_break()]);
                } else {
                    out.push(operator);
                }
                out.push(self.child(node, InfixExpr::RIGHT_OPERAND)?);
            }
            K::InstanceofExpr => {
                out.push(self.child(node, InstanceofExpr::LEFT_OPERAND)?);
                out.extend([space(), token("instanceof"), space()]);
                out.push(self.child(node, InstanceofExpr::RIGHT_OPERAND)?);
            }
            K::PrefixExpr => {
                out.push(text(self.simple(node, PrefixExpr::OPERATOR)?));
                out.push(self.child(node, PrefixExpr::OPERAND)?);
            }
            K::PostfixExpr => {
                out.push(self.child(node, PostfixExpr::OPERAND)?);
                out.push(text(self.simple(node, PostfixExpr::OPERATOR)?));
            }
            K::ParenExpr => {
                out.push(token("("));
                out.push(self.child(node, ParenExpr::EXPRESSION)?);
                out.push(token(")"));
            }
            K::MethodCall => {
                if let Some(receiver) = node.child(MethodCall::EXPRESSION) {
                    out.push(self.embed(receiver)?);
                    out.push(token("."));
                }
                out.push(self.child(node, MethodCall::NAME)?);
                out.push(token("("));
                out.extend(self.comma_list(node.list(MethodCall::ARGUMENTS))?);
                out.push(token(")"));
            }
            K::FieldAccess => {
                out.push(self.child(node, FieldAccess::EXPRESSION)?);
                out.push(token("."));
                out.push(self.child(node, FieldAccess::NAME)?);
            }
            K::NewExpr => {
                out.push(token("new"));
                out.push(space());
                out.push(self.child(node, NewExpr::TYPE)?);
                out.push(token("("));
                out.extend(self.comma_list(node.list(NewExpr::ARGUMENTS))?);
                out.push(token(")"));
            }
            K::ArrayAccess => {
                out.push(self.child(node, ArrayAccess::ARRAY)?);
                out.push(token("["));
                out.push(self.child(node, ArrayAccess::INDEX)?);
                out.push(token("]"));
            }
            K::CastExpr => {
                out.push(token("("));
                out.push(self.child(node, CastExpr::TYPE)?);
                out.push(token(")"));
                out.push(space());
                out.push(self.child(node, CastExpr::EXPRESSION)?);
            }
            K::NumberLiteral => out.push(text(self.simple(node, NumberLiteral::TOKEN)?)),
            K::StringLiteral => out.push(text(self.simple(node, StringLiteral::ESCAPED_VALUE)?)),
            K::CharacterLiteral => out.push(text(self.simple(node, CharacterLiteral::ESCAPED_VALUE)?)),
            K::BooleanLiteral => out.push(text(self.simple(node, BooleanLiteral::BOOLEAN_VALUE)?)),
            K::NullLiteral => out.push(token("null")),
            K::ThisExpr => out.push(token("this")),
            K::SuperExpr => out.push(token("super")),

            kind => {
                return Err(RewriteError::formatter_error(format!("no layout for {kind}")));
            }
        }
        Ok(out)
    }

    fn embed(&mut self, node: &Node) -> Result<FormatElement> {
        Ok(text(&(self.embed)(node)?))
    }

    fn required<'n>(&self, node: &'n CreatedNode, property: PropertyDescriptor) -> Result<&'n Node> {
        node.child(property)
            .ok_or_else(|| RewriteError::mandatory_removed(property.id(), node.kind().to_string()))
    }

    fn child(&mut self, node: &CreatedNode, property: PropertyDescriptor) -> Result<FormatElement> {
        let child = self.required(node, property)?;
        self.embed(child)
    }

    fn simple<'n>(&self, node: &'n CreatedNode, property: PropertyDescriptor) -> Result<&'n str> {
        node.simple(property)
            .ok_or_else(|| RewriteError::invalid_value(property.to_string(), "", "missing value"))
    }

    fn comma_list(&mut self, nodes: &[Node]) -> Result<Vec<FormatElement>> {
        let mut out = Vec::with_capacity(nodes.len() * 3);
        for (index, node) in nodes.iter().enumerate() {
            if index > 0 {
                out.push(token(","));
                if self.options.space_after_comma {
                    out.push(soft_line_break());
                }
            }
            out.push(self.embed(node)?);
        }
        Ok(out)
    }

    /// Modifiers followed by a space; annotations of declarations go on their own line
    fn modifiers(&mut self, nodes: &[Node], declaration: bool) -> Result<Vec<FormatElement>> {
        let mut out = Vec::new();
        for node in nodes {
            out.push(self.embed(node)?);
            if declaration && node.kind() == K::Annotation {
                out.push(hard_line_break());
            } else {
                out.push(space());
            }
        }
        Ok(out)
    }

    fn variables(
        &mut self,
        node: &CreatedNode,
        modifiers: PropertyDescriptor,
        ty: PropertyDescriptor,
        fragments: PropertyDescriptor,
    ) -> Result<Vec<FormatElement>> {
        let mut out = self.modifiers(node.list(modifiers), false)?;
        out.push(self.child(node, ty)?);
        out.push(space());
        out.extend(self.comma_list(node.list(fragments))?);
        Ok(out)
    }

    fn condition(&mut self, node: &CreatedNode, property: PropertyDescriptor) -> Result<Vec<FormatElement>> {
        Ok(vec![token("("), self.child(node, property)?, token(")")])
    }

    /// `{`, items on their own lines, `}`
    fn braced(&mut self, items: &[Node], blank_lines: bool) -> Result<Vec<FormatElement>> {
        if items.is_empty() {
            return Ok(vec![token("{}")]);
        }
        let mut out = vec![token("{"), indent()];
        for (index, item) in items.iter().enumerate() {
            out.push(hard_line_break());
            if blank_lines && index > 0 {
                out.push(hard_line_break());
            }
            out.push(self.embed(item)?);
        }
        out.extend([dedent(), hard_line_break(), token("}")]);
        Ok(out)
    }

    /// Items on separate lines, optionally separated by blank lines
    fn lines(&mut self, items: &[Node], blank_lines: bool) -> Result<Vec<FormatElement>> {
        let mut out = Vec::new();
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                out.push(hard_line_break());
                if blank_lines {
                    out.push(hard_line_break());
                }
            }
            out.push(self.embed(item)?);
        }
        Ok(out)
    }

    fn brace_separator(&self) -> Vec<FormatElement> {
        match self.options.brace_style {
            BraceStyle::EndOfLine => vec![space()],
            BraceStyle::NextLine => vec![hard_line_break()],
        }
    }

    /// Nested statement of a control statement
    fn body(&mut self, statement: &Node) -> Result<Vec<FormatElement>> {
        if statement.kind() == K::Block {
            let mut out = self.brace_separator();
            out.push(self.embed(statement)?);
            Ok(out)
        } else {
            Ok(vec![sequence(vec![indent(), hard_line_break(), self.embed(statement)?, dedent()])])
        }
    }

    /// Separator before `else`, `while`, `catch` or `finally` following `body`
    fn after_body(&self, body: &Node) -> Vec<FormatElement> {
        if body.kind() == K::Block && self.options.brace_style == BraceStyle::EndOfLine {
            vec![space()]
        } else {
            vec![hard_line_break()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::printer::Printer;
    use super::*;
    use crate::rewrite::{CreatedContent, NodeFactory};

    fn render(options: &FormatOptions, node: &Node) -> String {
        match node.as_created().map(|c| c.content()) {
            Some(CreatedContent::Composite(_)) => {
                let created = node.as_created().unwrap();
                let mut embed = |child: &Node| -> Result<String> { Ok(render(options, child)) };
                let elements = Flattener::new(options, &mut embed).node(created).unwrap();
                Printer::new(options.printer_options()).print(&elements)
            }
            Some(CreatedContent::Placeholder(code)) => code.clone(),
            _ => panic!("unexpected node"),
        }
    }

    #[test]
    fn test_if_else_chain() {
        let f = NodeFactory::new();
        let options = FormatOptions::default();
        let call = |name: &str| f.expr_stmt(f.method_call(None, name, Vec::new()).unwrap()).unwrap();
        let inner = f
            .if_stmt(f.name("b").unwrap(), f.block(vec![call("two")]).unwrap(), Some(call("three")))
            .unwrap();
        let outer = f
            .if_stmt(f.name("a").unwrap(), f.block(vec![call("one")]).unwrap(), Some(inner))
            .unwrap();
        assert_eq!(
            render(&options, &outer),
            "if (a) {\n    one();\n} else if (b) {\n    two();\n} else\n    three();"
        );
    }

    #[test]
    fn test_class_body_has_blank_lines() {
        let f = NodeFactory::new();
        let options = FormatOptions::default();
        let field = f
            .field_decl(
                f.modifiers(&["private"]).unwrap(),
                f.type_named("int").unwrap(),
                vec![f.var_declarator("count", Some(f.number_literal("0").unwrap())).unwrap()],
            )
            .unwrap();
        let method = f
            .method_decl(Vec::new(), None, "A", Vec::new(), Some(f.block(Vec::new()).unwrap()))
            .unwrap();
        let class = f
            .composite(K::TypeDecl)
            .list(TypeDecl::MODIFIERS, vec![f.annotation("Deprecated").unwrap()])
            .unwrap()
            .simple(TypeDecl::TYPE_KEYWORD, "class")
            .unwrap()
            .child(TypeDecl::NAME, f.simple_name("A").unwrap())
            .unwrap()
            .list(TypeDecl::BODY_DECLARATIONS, vec![field, method])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            render(&options, &class),
            "@Deprecated\nclass A {\n    private int count = 0;\n\n    A() {}\n}"
        );
    }

    #[test]
    fn test_try_catch_finally() {
        let f = NodeFactory::new();
        let options = FormatOptions::default();
        let exception = f.parameter(f.type_named("Exception").unwrap(), "e").unwrap();
        let clause = f
            .composite(K::CatchClause)
            .child(CatchClause::EXCEPTION, exception)
            .unwrap()
            .child(CatchClause::BODY, f.block(Vec::new()).unwrap())
            .unwrap()
            .build()
            .unwrap();
        let try_stmt = f
            .composite(K::TryStmt)
            .child(TryStmt::BODY, f.block(Vec::new()).unwrap())
            .unwrap()
            .list(TryStmt::CATCH_CLAUSES, vec![clause])
            .unwrap()
            .child(TryStmt::FINALLY, f.block(Vec::new()).unwrap())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            render(&options, &try_stmt),
            "try {} catch (Exception e) {} finally {}"
        );
    }

    #[test]
    fn test_multiline_children_are_indented() {
        let f = NodeFactory::new();
        let options = FormatOptions::default();
        let nested = f.string_placeholder("while (x) {\n    x--;\n}", K::WhileStmt);
        let block = f.block(vec![nested]).unwrap();
        assert_eq!(
            render(&options, &block),
            "{\n    while (x) {\n        x--;\n    }\n}"
        );
    }

    #[test]
    fn test_generic_and_array_types() {
        let f = NodeFactory::new();
        let options = FormatOptions::default();
        let list = f
            .parameterized_type(f.type_named("Map").unwrap(), vec![
                f.type_named("String").unwrap(),
                f.array_type(f.type_named("int").unwrap()).unwrap(),
            ])
            .unwrap();
        assert_eq!(render(&options, &list), "Map<String, int[]>");
    }
}
