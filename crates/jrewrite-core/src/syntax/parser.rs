//! Hierarchical parser for the supported Java subset
//!
//! Builds a lossless CST from the trivia-preserving token stream. Trivia is
//! attached lazily: it is flushed into the tree right before the next node or
//! token starts, so every node's range begins and ends at a significant token.
//! Unsupported or malformed input is wrapped in `ErrorNode`s and never dropped.

use rowan::{Checkpoint, TextRange, TextSize};
use std::fmt;

use super::{CstBuilder, CstToken, JavaSyntaxKind, JavaSyntaxNode, lex_with_trivia};

/// Category of a parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Reported by the lexer (unterminated literal, stray character)
    Lexer,
    /// A required token was not found
    MissingToken,
    /// A token could not be parsed in its context
    UnexpectedToken,
}

/// A syntax error with its location in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub range: TextRange,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}..{}",
            self.message,
            u32::from(self.range.start()),
            u32::from(self.range.end())
        )
    }
}

/// Parse Java source into a `CompilationUnit` CST
///
/// # Example
///
/// ```rust,ignore
/// use jrewrite_core::syntax::parse_java;
///
/// let source = "class A { void run() { go(); } }";
/// let (cst, errors) = parse_java(source);
/// assert!(errors.is_empty());
/// assert_eq!(cst.text().to_string(), source);
/// ```
pub fn parse_java(source: &str) -> (JavaSyntaxNode, Vec<ParseError>) {
    let (tokens, lexer_errors) = lex_with_trivia(source);
    let mut parser = Parser::new(&tokens);
    parser.parse_compilation_unit();

    let mut errors: Vec<ParseError> = lexer_errors
        .into_iter()
        .map(|e| ParseError {
            kind: ParseErrorKind::Lexer,
            message: e.message,
            range: TextRange::new(
                TextSize::from(e.span.start as u32),
                TextSize::from(e.span.end as u32),
            ),
        })
        .collect();
    errors.append(&mut parser.errors);
    errors.sort_by_key(|e| e.range.start());

    (parser.builder.finish(), errors)
}

/// Token stream parser
struct Parser<'a> {
    tokens: &'a [CstToken],
    /// Indices of the significant (non-trivia) tokens
    significant: Vec<usize>,
    /// Number of significant tokens consumed
    cursor: usize,
    /// Index of the first token not yet added to the tree
    pos: usize,
    builder: CstBuilder,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [CstToken]) -> Self {
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia())
            .map(|(i, _)| i)
            .collect();
        Self {
            tokens,
            significant,
            cursor: 0,
            pos: 0,
            builder: CstBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn parse_compilation_unit(&mut self) {
        // Opened before any trivia so a leading header lands inside the root
        self.builder.start_node(JavaSyntaxKind::CompilationUnit);

        if self.at(JavaSyntaxKind::PackageKw) {
            self.parse_package();
        }
        while self.at(JavaSyntaxKind::ImportKw) {
            self.parse_import();
        }

        while !self.at_end() {
            let before = self.cursor;
            match self.current_kind() {
                JavaSyntaxKind::Semicolon => self.bump(),
                JavaSyntaxKind::ClassKw | JavaSyntaxKind::InterfaceKw | JavaSyntaxKind::At => {
                    self.parse_type_decl()
                }
                kind if kind.is_modifier_keyword() => self.parse_type_decl(),
                _ => self.error_bump("Expected type declaration"),
            }
            if self.cursor == before {
                self.error_bump("Unexpected token");
            }
        }

        self.flush_trivia();
        self.builder.finish_node(); // COMPILATION_UNIT
    }

    /// Grammar: package <name> ;
    fn parse_package(&mut self) {
        self.start_node(JavaSyntaxKind::PackageDecl);
        self.bump();
        self.parse_name();
        self.expect(JavaSyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    /// Grammar: import [static] <name> [. *] ;
    fn parse_import(&mut self) {
        self.start_node(JavaSyntaxKind::ImportDecl);
        self.bump();
        if self.at(JavaSyntaxKind::StaticKw) {
            self.bump();
        }
        self.parse_name();
        if self.at(JavaSyntaxKind::Dot) && self.nth(1) == JavaSyntaxKind::Star {
            self.bump();
            self.bump();
        }
        self.expect(JavaSyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    fn parse_type_decl(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_modifiers();
        self.builder
            .start_node_at(checkpoint, JavaSyntaxKind::TypeDecl);
        self.parse_type_decl_rest();
        self.builder.finish_node();
    }

    /// Everything after the modifiers of a class or interface declaration
    fn parse_type_decl_rest(&mut self) {
        if self.at(JavaSyntaxKind::ClassKw) || self.at(JavaSyntaxKind::InterfaceKw) {
            self.bump();
        } else {
            self.error_missing("Expected 'class' or 'interface'");
        }
        self.parse_simple_name();

        if self.at(JavaSyntaxKind::Lt) {
            self.error_balanced("Type parameters are not supported");
        }
        if self.at(JavaSyntaxKind::ExtendsKw) {
            self.parse_type_clause(JavaSyntaxKind::ExtendsClause);
        }
        if self.at(JavaSyntaxKind::ImplementsKw) {
            self.parse_type_clause(JavaSyntaxKind::ImplementsClause);
        }
        self.parse_class_body();
    }

    /// Grammar: (extends | implements | throws) <type> (, <type>)*
    fn parse_type_clause(&mut self, kind: JavaSyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.parse_type();
        while self.at(JavaSyntaxKind::Comma) {
            self.bump();
            self.parse_type();
        }
        self.builder.finish_node();
    }

    fn parse_class_body(&mut self) {
        self.start_node(JavaSyntaxKind::ClassBody);
        self.expect(JavaSyntaxKind::LBrace);
        while !self.at(JavaSyntaxKind::RBrace) && !self.at_end() {
            let before = self.cursor;
            if self.at(JavaSyntaxKind::Semicolon) {
                self.bump();
                continue;
            }
            self.parse_member();
            if self.cursor == before {
                self.error_bump("Expected member declaration");
            }
        }
        self.expect(JavaSyntaxKind::RBrace);
        self.builder.finish_node(); // CLASS_BODY
    }

    /// Field, method, constructor or member type
    fn parse_member(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_modifiers();

        match self.current_kind() {
            JavaSyntaxKind::ClassKw | JavaSyntaxKind::InterfaceKw => {
                self.builder
                    .start_node_at(checkpoint, JavaSyntaxKind::TypeDecl);
                self.parse_type_decl_rest();
                self.builder.finish_node();
            }
            JavaSyntaxKind::LBrace => {
                // Initializer blocks are kept verbatim
                self.builder
                    .start_node_at(checkpoint, JavaSyntaxKind::ErrorNode);
                self.parse_block();
                self.builder.finish_node();
            }
            JavaSyntaxKind::Ident if self.nth(1) == JavaSyntaxKind::LParen => {
                self.builder
                    .start_node_at(checkpoint, JavaSyntaxKind::MethodDecl);
                self.parse_method_rest();
                self.builder.finish_node();
            }
            kind if kind.is_primitive_keyword() || kind == JavaSyntaxKind::Ident => {
                self.parse_type();
                if self.at(JavaSyntaxKind::Ident) && self.nth(1) == JavaSyntaxKind::LParen {
                    self.builder
                        .start_node_at(checkpoint, JavaSyntaxKind::MethodDecl);
                    self.parse_method_rest();
                } else {
                    self.builder
                        .start_node_at(checkpoint, JavaSyntaxKind::FieldDecl);
                    self.parse_var_declarators();
                    self.expect(JavaSyntaxKind::Semicolon);
                }
                self.builder.finish_node();
            }
            _ => {
                self.builder
                    .start_node_at(checkpoint, JavaSyntaxKind::ErrorNode);
                self.error_here("Expected member declaration");
                if !self.at_end() && !self.at(JavaSyntaxKind::RBrace) {
                    self.bump();
                }
                self.builder.finish_node();
            }
        }
    }

    /// Name, parameters, throws clause and body of a method or constructor
    fn parse_method_rest(&mut self) {
        self.parse_simple_name();
        self.parse_param_list();
        while self.at(JavaSyntaxKind::LBracket) && self.nth(1) == JavaSyntaxKind::RBracket {
            self.bump();
            self.bump();
        }
        if self.at(JavaSyntaxKind::ThrowsKw) {
            self.parse_type_clause(JavaSyntaxKind::ThrowsClause);
        }
        if self.at(JavaSyntaxKind::LBrace) {
            self.parse_block();
        } else {
            self.expect(JavaSyntaxKind::Semicolon);
        }
    }

    fn parse_modifiers(&mut self) {
        self.start_node(JavaSyntaxKind::ModifierList);
        loop {
            let kind = self.current_kind();
            if kind.is_modifier_keyword() {
                self.start_node(JavaSyntaxKind::Modifier);
                self.bump();
                self.builder.finish_node();
            } else if kind == JavaSyntaxKind::At && self.nth(1) == JavaSyntaxKind::Ident {
                self.parse_annotation();
            } else {
                break;
            }
        }
        self.builder.finish_node(); // MODIFIER_LIST
    }

    /// Grammar: @ <name> [ ( <args> ) ]
    fn parse_annotation(&mut self) {
        self.start_node(JavaSyntaxKind::Annotation);
        self.bump();
        self.parse_name();
        if self.at(JavaSyntaxKind::LParen) {
            self.parse_arg_list();
        }
        self.builder.finish_node();
    }

    fn parse_param_list(&mut self) {
        self.start_node(JavaSyntaxKind::ParamList);
        self.expect(JavaSyntaxKind::LParen);
        if !self.at(JavaSyntaxKind::RParen) && !self.at_end() {
            self.parse_parameter();
            while self.at(JavaSyntaxKind::Comma) {
                self.bump();
                self.parse_parameter();
            }
        }
        self.expect(JavaSyntaxKind::RParen);
        self.builder.finish_node();
    }

    fn parse_parameter(&mut self) {
        self.start_node(JavaSyntaxKind::Parameter);
        self.parse_modifiers();
        self.parse_type();
        if self.at(JavaSyntaxKind::Ellipsis) {
            self.bump();
        }
        self.parse_simple_name();
        self.skip_dimensions();
        self.builder.finish_node();
    }

    fn parse_var_declarators(&mut self) {
        self.parse_var_declarator();
        while self.at(JavaSyntaxKind::Comma) {
            self.bump();
            self.parse_var_declarator();
        }
    }

    /// Grammar: <name> ([])* [= <initializer>]
    fn parse_var_declarator(&mut self) {
        self.start_node(JavaSyntaxKind::VarDeclarator);
        self.parse_simple_name();
        self.skip_dimensions();
        if self.at(JavaSyntaxKind::Eq) {
            self.bump();
            if self.at(JavaSyntaxKind::LBrace) {
                self.error_balanced("Array initializers are not supported");
            } else {
                self.parse_expression();
            }
        }
        self.builder.finish_node();
    }

    fn skip_dimensions(&mut self) {
        while self.at(JavaSyntaxKind::LBracket) && self.nth(1) == JavaSyntaxKind::RBracket {
            self.bump();
            self.bump();
        }
    }

    // Names and types

    fn parse_simple_name(&mut self) {
        if self.at(JavaSyntaxKind::Ident) {
            self.start_node(JavaSyntaxKind::SimpleName);
            self.bump();
            self.builder.finish_node();
        } else {
            self.error_missing("Expected identifier");
        }
    }

    /// Simple or qualified name: a.b.c
    fn parse_name(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_simple_name();
        while self.at(JavaSyntaxKind::Dot) && self.nth(1) == JavaSyntaxKind::Ident {
            self.builder
                .start_node_at(checkpoint, JavaSyntaxKind::QualifiedName);
            self.bump();
            self.parse_simple_name();
            self.builder.finish_node();
        }
    }

    fn parse_type(&mut self) {
        let checkpoint = self.checkpoint();
        let kind = self.current_kind();
        if kind.is_primitive_keyword() {
            self.start_node(JavaSyntaxKind::PrimitiveType);
            self.bump();
            self.builder.finish_node();
        } else if kind == JavaSyntaxKind::Ident {
            self.start_node(JavaSyntaxKind::SimpleType);
            self.parse_name();
            self.builder.finish_node();
            if self.at(JavaSyntaxKind::Lt) {
                self.builder
                    .start_node_at(checkpoint, JavaSyntaxKind::ParameterizedType);
                self.parse_type_args();
                self.builder.finish_node();
            }
        } else {
            self.error_missing("Expected type");
            return;
        }

        while self.at(JavaSyntaxKind::LBracket) && self.nth(1) == JavaSyntaxKind::RBracket {
            self.builder
                .start_node_at(checkpoint, JavaSyntaxKind::ArrayType);
            self.bump();
            self.bump();
            self.builder.finish_node();
        }
    }

    fn parse_type_args(&mut self) {
        self.start_node(JavaSyntaxKind::TypeArgList);
        self.bump();
        if !self.at(JavaSyntaxKind::Gt) {
            self.parse_type_arg();
            while self.at(JavaSyntaxKind::Comma) {
                self.bump();
                self.parse_type_arg();
            }
        }
        self.expect(JavaSyntaxKind::Gt);
        self.builder.finish_node();
    }

    fn parse_type_arg(&mut self) {
        if self.at(JavaSyntaxKind::Question) {
            self.start_node(JavaSyntaxKind::ErrorNode);
            self.error_here("Wildcard type arguments are not supported");
            self.bump();
            if self.at(JavaSyntaxKind::ExtendsKw) || self.at(JavaSyntaxKind::SuperKw) {
                self.bump();
                self.parse_type();
            }
            self.builder.finish_node();
        } else {
            self.parse_type();
        }
    }

    // Statements

    fn parse_block(&mut self) {
        self.start_node(JavaSyntaxKind::Block);
        self.expect(JavaSyntaxKind::LBrace);
        while !self.at(JavaSyntaxKind::RBrace) && !self.at_end() {
            let before = self.cursor;
            self.parse_statement();
            if self.cursor == before {
                self.error_bump("Expected statement");
            }
        }
        self.expect(JavaSyntaxKind::RBrace);
        self.builder.finish_node(); // BLOCK
    }

    fn parse_statement(&mut self) {
        match self.current_kind() {
            JavaSyntaxKind::LBrace => self.parse_block(),
            JavaSyntaxKind::Semicolon => {
                self.start_node(JavaSyntaxKind::EmptyStmt);
                self.bump();
                self.builder.finish_node();
            }
            JavaSyntaxKind::IfKw => self.parse_if(),
            JavaSyntaxKind::WhileKw => self.parse_while(),
            JavaSyntaxKind::DoKw => self.parse_do(),
            JavaSyntaxKind::ForKw => self.parse_for(),
            JavaSyntaxKind::ReturnKw => {
                self.start_node(JavaSyntaxKind::ReturnStmt);
                self.bump();
                if !self.at(JavaSyntaxKind::Semicolon) {
                    self.parse_expression();
                }
                self.expect(JavaSyntaxKind::Semicolon);
                self.builder.finish_node();
            }
            JavaSyntaxKind::ThrowKw => {
                self.start_node(JavaSyntaxKind::ThrowStmt);
                self.bump();
                self.parse_expression();
                self.expect(JavaSyntaxKind::Semicolon);
                self.builder.finish_node();
            }
            JavaSyntaxKind::BreakKw | JavaSyntaxKind::ContinueKw => {
                let kind = if self.at(JavaSyntaxKind::BreakKw) {
                    JavaSyntaxKind::BreakStmt
                } else {
                    JavaSyntaxKind::ContinueStmt
                };
                self.start_node(kind);
                self.bump();
                if self.at(JavaSyntaxKind::Ident) {
                    self.parse_simple_name();
                }
                self.expect(JavaSyntaxKind::Semicolon);
                self.builder.finish_node();
            }
            JavaSyntaxKind::TryKw => self.parse_try(),
            _ if self.at_local_var_decl() => {
                self.start_node(JavaSyntaxKind::LocalVarDecl);
                self.parse_modifiers();
                self.parse_type();
                self.parse_var_declarators();
                self.expect(JavaSyntaxKind::Semicolon);
                self.builder.finish_node();
            }
            kind if starts_expression(kind) => {
                self.start_node(JavaSyntaxKind::ExprStmt);
                self.parse_expression();
                self.expect(JavaSyntaxKind::Semicolon);
                self.builder.finish_node();
            }
            _ => self.error_bump("Expected statement"),
        }
    }

    fn parse_if(&mut self) {
        self.start_node(JavaSyntaxKind::IfStmt);
        self.bump();
        self.parse_parenthesized_condition();
        self.parse_statement();
        if self.at(JavaSyntaxKind::ElseKw) {
            self.bump();
            self.parse_statement();
        }
        self.builder.finish_node();
    }

    fn parse_while(&mut self) {
        self.start_node(JavaSyntaxKind::WhileStmt);
        self.bump();
        self.parse_parenthesized_condition();
        self.parse_statement();
        self.builder.finish_node();
    }

    fn parse_do(&mut self) {
        self.start_node(JavaSyntaxKind::DoStmt);
        self.bump();
        self.parse_statement();
        self.expect(JavaSyntaxKind::WhileKw);
        self.parse_parenthesized_condition();
        self.expect(JavaSyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    fn parse_parenthesized_condition(&mut self) {
        self.expect(JavaSyntaxKind::LParen);
        self.parse_expression();
        self.expect(JavaSyntaxKind::RParen);
    }

    /// Grammar: for ( <init> ; [<expr>] ; <update> ) <stmt>
    fn parse_for(&mut self) {
        self.start_node(JavaSyntaxKind::ForStmt);
        self.bump();
        self.expect(JavaSyntaxKind::LParen);

        self.start_node(JavaSyntaxKind::ForInit);
        if !self.at(JavaSyntaxKind::Semicolon) {
            if self.at_local_var_decl() {
                self.start_node(JavaSyntaxKind::VarDeclExpr);
                self.parse_modifiers();
                self.parse_type();
                self.parse_var_declarators();
                self.builder.finish_node();
            } else {
                self.parse_expression_list();
            }
        }
        self.builder.finish_node(); // FOR_INIT
        self.expect(JavaSyntaxKind::Semicolon);

        if !self.at(JavaSyntaxKind::Semicolon) {
            self.parse_expression();
        }
        self.expect(JavaSyntaxKind::Semicolon);

        self.start_node(JavaSyntaxKind::ForUpdate);
        if !self.at(JavaSyntaxKind::RParen) {
            self.parse_expression_list();
        }
        self.builder.finish_node(); // FOR_UPDATE
        self.expect(JavaSyntaxKind::RParen);

        self.parse_statement();
        self.builder.finish_node();
    }

    fn parse_expression_list(&mut self) {
        self.parse_expression();
        while self.at(JavaSyntaxKind::Comma) {
            self.bump();
            self.parse_expression();
        }
    }

    /// Grammar: try <block> (catch ( <param> ) <block>)* [finally <block>]
    fn parse_try(&mut self) {
        self.start_node(JavaSyntaxKind::TryStmt);
        self.bump();
        self.parse_block();
        while self.at(JavaSyntaxKind::CatchKw) {
            self.start_node(JavaSyntaxKind::CatchClause);
            self.bump();
            self.expect(JavaSyntaxKind::LParen);
            self.parse_parameter();
            self.expect(JavaSyntaxKind::RParen);
            self.parse_block();
            self.builder.finish_node();
        }
        if self.at(JavaSyntaxKind::FinallyKw) {
            self.bump();
            self.parse_block();
        }
        self.builder.finish_node();
    }

    /// Lookahead: does a local variable declaration start here?
    ///
    /// Matches `final ...`, `@A ...`, `int x`, `a.b.C<D>[] x`.
    fn at_local_var_decl(&self) -> bool {
        let first = self.nth(0);
        if first == JavaSyntaxKind::FinalKw || first == JavaSyntaxKind::At {
            return true;
        }
        let mut i = if first.is_primitive_keyword() {
            1
        } else if first == JavaSyntaxKind::Ident {
            let mut i = 1;
            while self.nth(i) == JavaSyntaxKind::Dot && self.nth(i + 1) == JavaSyntaxKind::Ident {
                i += 2;
            }
            if self.nth(i) == JavaSyntaxKind::Lt {
                match self.skip_type_args(i) {
                    Some(next) => i = next,
                    None => return false,
                }
            }
            i
        } else {
            return false;
        };
        while self.nth(i) == JavaSyntaxKind::LBracket && self.nth(i + 1) == JavaSyntaxKind::RBracket
        {
            i += 2;
        }
        self.nth(i) == JavaSyntaxKind::Ident
    }

    /// Skip a balanced `<...>` starting at lookahead `i`, returning the index after it
    fn skip_type_args(&self, mut i: usize) -> Option<usize> {
        let mut depth = 0usize;
        loop {
            match self.nth(i) {
                JavaSyntaxKind::Lt => depth += 1,
                JavaSyntaxKind::Gt => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                JavaSyntaxKind::Ident
                | JavaSyntaxKind::Dot
                | JavaSyntaxKind::Comma
                | JavaSyntaxKind::Question
                | JavaSyntaxKind::ExtendsKw
                | JavaSyntaxKind::SuperKw
                | JavaSyntaxKind::LBracket
                | JavaSyntaxKind::RBracket => {}
                kind if kind.is_primitive_keyword() => {}
                _ => return None,
            }
            i += 1;
        }
    }

    // Expressions

    fn parse_expression(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_conditional();
        if self.current_kind().is_assignment_operator() {
            self.builder
                .start_node_at(checkpoint, JavaSyntaxKind::Assignment);
            self.bump();
            self.parse_expression();
            self.builder.finish_node();
        }
    }

    fn parse_conditional(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_binary(1);
        if self.at(JavaSyntaxKind::Question) {
            self.builder
                .start_node_at(checkpoint, JavaSyntaxKind::ConditionalExpr);
            self.bump();
            self.parse_expression();
            self.expect(JavaSyntaxKind::Colon);
            self.parse_conditional();
            self.builder.finish_node();
        }
    }

    /// Precedence climbing over left-associative binary operators
    fn parse_binary(&mut self, min_precedence: u8) {
        let checkpoint = self.checkpoint();
        self.parse_unary();
        loop {
            let op = self.current_kind();
            let Some(precedence) = op.infix_precedence() else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            if op == JavaSyntaxKind::InstanceofKw {
                self.builder
                    .start_node_at(checkpoint, JavaSyntaxKind::InstanceofExpr);
                self.bump();
                self.parse_type();
                self.builder.finish_node();
                continue;
            }
            self.builder
                .start_node_at(checkpoint, JavaSyntaxKind::InfixExpr);
            self.bump();
            self.parse_binary(precedence + 1);
            self.builder.finish_node();
        }
    }

    fn parse_unary(&mut self) {
        if self.current_kind().is_prefix_operator() {
            self.start_node(JavaSyntaxKind::PrefixExpr);
            self.bump();
            self.parse_unary();
            self.builder.finish_node();
        } else if self.at(JavaSyntaxKind::LParen) && self.at_cast() {
            self.start_node(JavaSyntaxKind::CastExpr);
            self.bump();
            self.parse_type();
            self.expect(JavaSyntaxKind::RParen);
            self.parse_unary();
            self.builder.finish_node();
        } else {
            self.parse_postfix();
        }
    }

    /// Lookahead: `( Type ) operand`
    fn at_cast(&self) -> bool {
        let mut i = 1;
        let first = self.nth(i);
        if first.is_primitive_keyword() {
            i += 1;
        } else if first == JavaSyntaxKind::Ident {
            i += 1;
            while self.nth(i) == JavaSyntaxKind::Dot && self.nth(i + 1) == JavaSyntaxKind::Ident {
                i += 2;
            }
            if self.nth(i) == JavaSyntaxKind::Lt {
                match self.skip_type_args(i) {
                    Some(next) => i = next,
                    None => return false,
                }
            }
        } else {
            return false;
        }
        while self.nth(i) == JavaSyntaxKind::LBracket && self.nth(i + 1) == JavaSyntaxKind::RBracket
        {
            i += 2;
        }
        if self.nth(i) != JavaSyntaxKind::RParen {
            return false;
        }
        if first.is_primitive_keyword() {
            return starts_expression(self.nth(i + 1));
        }
        // `(a) + b` is a parenthesized expression, `(A) b` a cast
        matches!(
            self.nth(i + 1),
            JavaSyntaxKind::Ident
                | JavaSyntaxKind::NumberLit
                | JavaSyntaxKind::StringLit
                | JavaSyntaxKind::CharLit
                | JavaSyntaxKind::TrueKw
                | JavaSyntaxKind::FalseKw
                | JavaSyntaxKind::NullKw
                | JavaSyntaxKind::ThisKw
                | JavaSyntaxKind::SuperKw
                | JavaSyntaxKind::NewKw
                | JavaSyntaxKind::LParen
                | JavaSyntaxKind::Bang
                | JavaSyntaxKind::Tilde
        )
    }

    fn parse_postfix(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_primary();
        loop {
            match self.current_kind() {
                JavaSyntaxKind::Dot if self.nth(1) == JavaSyntaxKind::Ident => {
                    let kind = if self.nth(2) == JavaSyntaxKind::LParen {
                        JavaSyntaxKind::MethodCall
                    } else {
                        JavaSyntaxKind::FieldAccess
                    };
                    self.builder.start_node_at(checkpoint, kind);
                    self.bump();
                    self.parse_simple_name();
                    if kind == JavaSyntaxKind::MethodCall {
                        self.parse_arg_list();
                    }
                    self.builder.finish_node();
                }
                JavaSyntaxKind::LBracket => {
                    self.builder
                        .start_node_at(checkpoint, JavaSyntaxKind::ArrayAccess);
                    self.bump();
                    self.parse_expression();
                    self.expect(JavaSyntaxKind::RBracket);
                    self.builder.finish_node();
                }
                JavaSyntaxKind::PlusPlus | JavaSyntaxKind::MinusMinus => {
                    self.builder
                        .start_node_at(checkpoint, JavaSyntaxKind::PostfixExpr);
                    self.bump();
                    self.builder.finish_node();
                }
                _ => break,
            }
        }
    }

    fn parse_primary(&mut self) {
        let literal = match self.current_kind() {
            JavaSyntaxKind::NumberLit => Some(JavaSyntaxKind::NumberLiteral),
            JavaSyntaxKind::StringLit => Some(JavaSyntaxKind::StringLiteral),
            JavaSyntaxKind::CharLit => Some(JavaSyntaxKind::CharacterLiteral),
            JavaSyntaxKind::TrueKw | JavaSyntaxKind::FalseKw => Some(JavaSyntaxKind::BooleanLiteral),
            JavaSyntaxKind::NullKw => Some(JavaSyntaxKind::NullLiteral),
            JavaSyntaxKind::ThisKw => Some(JavaSyntaxKind::ThisExpr),
            JavaSyntaxKind::SuperKw => Some(JavaSyntaxKind::SuperExpr),
            _ => None,
        };
        if let Some(kind) = literal {
            self.start_node(kind);
            self.bump();
            self.builder.finish_node();
            return;
        }

        match self.current_kind() {
            JavaSyntaxKind::LParen => {
                self.start_node(JavaSyntaxKind::ParenExpr);
                self.bump();
                self.parse_expression();
                self.expect(JavaSyntaxKind::RParen);
                self.builder.finish_node();
            }
            JavaSyntaxKind::NewKw => {
                self.start_node(JavaSyntaxKind::NewExpr);
                self.bump();
                self.parse_type();
                if self.at(JavaSyntaxKind::LParen) {
                    self.parse_arg_list();
                } else {
                    self.error_missing("Expected constructor arguments");
                }
                self.builder.finish_node();
            }
            JavaSyntaxKind::Ident => {
                if self.nth(1) == JavaSyntaxKind::LParen {
                    self.start_node(JavaSyntaxKind::MethodCall);
                    self.parse_simple_name();
                    self.parse_arg_list();
                    self.builder.finish_node();
                } else {
                    self.parse_simple_name();
                }
            }
            _ => self.error_missing("Expected expression"),
        }
    }

    fn parse_arg_list(&mut self) {
        self.start_node(JavaSyntaxKind::ArgList);
        self.expect(JavaSyntaxKind::LParen);
        if !self.at(JavaSyntaxKind::RParen) && !self.at_end() {
            self.parse_expression_list();
        }
        self.expect(JavaSyntaxKind::RParen);
        self.builder.finish_node();
    }

    // Helper methods

    fn at_end(&self) -> bool {
        self.cursor >= self.significant.len()
    }

    fn nth(&self, n: usize) -> JavaSyntaxKind {
        self.significant
            .get(self.cursor + n)
            .map(|&i| self.tokens[i].kind)
            .unwrap_or(JavaSyntaxKind::Eof)
    }

    fn current_kind(&self) -> JavaSyntaxKind {
        self.nth(0)
    }

    fn at(&self, kind: JavaSyntaxKind) -> bool {
        self.current_kind() == kind
    }

    /// Add pending trivia to the currently open node
    fn flush_trivia(&mut self) {
        let target = self
            .significant
            .get(self.cursor)
            .copied()
            .unwrap_or(self.tokens.len());
        while self.pos < target {
            self.builder.add_token(&self.tokens[self.pos]);
            self.pos += 1;
        }
    }

    fn bump(&mut self) {
        self.flush_trivia();
        if let Some(&index) = self.significant.get(self.cursor) {
            self.builder.add_token(&self.tokens[index]);
            self.pos = index + 1;
            self.cursor += 1;
        }
    }

    fn start_node(&mut self, kind: JavaSyntaxKind) {
        self.flush_trivia();
        self.builder.start_node(kind);
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }

    fn expect(&mut self, kind: JavaSyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            let expected = kind.text().map(|t| format!("'{t}'")).unwrap_or_else(|| kind.to_string());
            self.error_missing(&format!("Expected {expected}"));
            false
        }
    }

    fn current_range(&self) -> TextRange {
        match self.significant.get(self.cursor) {
            Some(&i) => span_range(&self.tokens[i]),
            None => {
                let end = self.tokens.last().map(|t| t.span.end).unwrap_or(0) as u32;
                TextRange::empty(TextSize::from(end))
            }
        }
    }

    fn error_here(&mut self, message: &str) {
        self.push_error(ParseErrorKind::UnexpectedToken, message);
    }

    fn error_missing(&mut self, message: &str) {
        self.push_error(ParseErrorKind::MissingToken, message);
    }

    fn push_error(&mut self, kind: ParseErrorKind, message: &str) {
        let range = self.current_range();
        let found = self.current_kind();
        let message = if found == JavaSyntaxKind::Eof {
            format!("{message}, found end of file")
        } else {
            format!("{message}, found {found}")
        };
        self.errors.push(ParseError {
            kind,
            message,
            range,
        });
    }

    /// Wrap the current token into an error node
    fn error_bump(&mut self, message: &str) {
        self.error_here(message);
        self.start_node(JavaSyntaxKind::ErrorNode);
        self.bump();
        self.builder.finish_node();
    }

    /// Wrap a balanced `<...>` or `{...}` group into an error node
    fn error_balanced(&mut self, message: &str) {
        self.error_here(message);
        self.start_node(JavaSyntaxKind::ErrorNode);
        let (open, close) = if self.at(JavaSyntaxKind::Lt) {
            (JavaSyntaxKind::Lt, JavaSyntaxKind::Gt)
        } else {
            (JavaSyntaxKind::LBrace, JavaSyntaxKind::RBrace)
        };
        let mut depth = 0usize;
        while !self.at_end() {
            let kind = self.current_kind();
            self.bump();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
        }
        self.builder.finish_node();
    }
}

fn span_range(token: &CstToken) -> TextRange {
    TextRange::new(
        TextSize::from(token.span.start as u32),
        TextSize::from(token.span.end as u32),
    )
}

fn starts_expression(kind: JavaSyntaxKind) -> bool {
    matches!(
        kind,
        JavaSyntaxKind::Ident
            | JavaSyntaxKind::NumberLit
            | JavaSyntaxKind::StringLit
            | JavaSyntaxKind::CharLit
            | JavaSyntaxKind::TrueKw
            | JavaSyntaxKind::FalseKw
            | JavaSyntaxKind::NullKw
            | JavaSyntaxKind::ThisKw
            | JavaSyntaxKind::SuperKw
            | JavaSyntaxKind::NewKw
            | JavaSyntaxKind::LParen
    ) || kind.is_prefix_operator()
}
