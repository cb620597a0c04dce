//! End-to-end rewrites through the public API

use insta::assert_snapshot;
use jrewrite_core::syntax::ast::{self, AstNode, CompilationUnit};
use jrewrite_core::{AstRewrite, JavaSyntaxKind, JavaSyntaxNode, NodeFactory, RewriteError, parse_java};

const STATEMENTS: &str = "class A {
    void f() {
        a();
        b();
        c();
    }
}
";

fn parse(source: &str) -> (JavaSyntaxNode, CompilationUnit) {
    let (cst, errors) = parse_java(source);
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    (cst.clone(), CompilationUnit::cast(cst).unwrap())
}

fn statement(root: &JavaSyntaxNode, text: &str) -> JavaSyntaxNode {
    root.descendants()
        .find(|n| n.kind() == JavaSyntaxKind::ExprStmt && n.text().to_string().trim() == text)
        .unwrap_or_else(|| panic!("no statement {text}"))
}

fn method_body(unit: &CompilationUnit, type_name: &str, method: &str) -> JavaSyntaxNode {
    unit.find_type(type_name)
        .and_then(|t| t.method(method))
        .and_then(|m| m.body())
        .map(|b| b.syntax().clone())
        .unwrap()
}

fn call_stmt(factory: &NodeFactory, name: &str) -> jrewrite_core::Node {
    factory
        .expr_stmt(factory.method_call(None, name, Vec::new()).unwrap())
        .unwrap()
}

#[test]
fn test_remove_statement_line() {
    let (cst, _) = parse(STATEMENTS);
    let mut rewrite = AstRewrite::new(cst.clone());
    rewrite.remove(&statement(&cst, "b();")).unwrap();

    let result = rewrite.rewrite().unwrap();
    assert_eq!(
        result.text(),
        "class A {\n    void f() {\n        a();\n        c();\n    }\n}\n"
    );
}

#[test]
fn test_removed_statement_takes_its_comments() {
    let source = "class A {
    void f() {
        a();
        // explains b
        b(); // trailing
        c();
    }
}
";
    let (cst, _) = parse(source);
    let mut rewrite = AstRewrite::new(cst.clone());
    rewrite.remove(&statement(&cst, "b();")).unwrap();

    assert_eq!(
        rewrite.rewrite().unwrap().text(),
        "class A {\n    void f() {\n        a();\n        c();\n    }\n}\n"
    );
}

const DOCUMENTED: &str = "class A {
    /** Docs for f. */
    void f() {}

    // about g
    void g() {}
}
";

#[test]
fn test_removed_method_takes_its_doc_comment() {
    let cases = [
        ("f", "class A {\n    // about g\n    void g() {}\n}\n"),
        ("g", "class A {\n    /** Docs for f. */\n    void f() {}\n}\n"),
    ];
    for (removed, expected) in cases {
        let (cst, unit) = parse(DOCUMENTED);
        let method = unit.find_type("A").and_then(|t| t.method(removed)).unwrap();
        let mut rewrite = AstRewrite::new(cst);
        rewrite.remove(method.syntax()).unwrap();
        assert_eq!(rewrite.rewrite().unwrap().text(), expected, "removing {removed}");
    }
}

#[test]
fn test_moved_type_takes_its_doc_comment() {
    let source = "package p;\n\n/** First. */\nclass A {}\n\nclass B {}\n";
    let (cst, unit) = parse(source);
    let first = unit.find_type("A").unwrap();
    let mut rewrite = AstRewrite::new(cst.clone());

    let moved = rewrite.create_move_target(first.syntax()).unwrap();
    rewrite
        .list(&cst, ast::CompilationUnit::TYPES)
        .unwrap()
        .insert_last(moved)
        .unwrap();

    assert_eq!(
        rewrite.rewrite().unwrap().text(),
        "package p;\n\nclass B {}\n\n/** First. */\nclass A {}\n"
    );
}

#[test]
fn test_emptied_single_line_block_collapses() {
    let (cst, _) = parse("class A { void f() { a(); b(); c(); } }");
    let mut rewrite = AstRewrite::new(cst.clone());
    for text in ["a();", "b();", "c();"] {
        rewrite.remove(&statement(&cst, text)).unwrap();
    }
    assert_eq!(rewrite.rewrite().unwrap().text(), "class A { void f() {} }");
}

#[test]
fn test_clear_for_condition_and_updaters() {
    let (cst, _) = parse("class A { void f() { for (int i = 0; i < n; i++) { go(); } } }");
    let for_stmt = cst
        .descendants()
        .find(|n| n.kind() == JavaSyntaxKind::ForStmt)
        .unwrap();
    let mut rewrite = AstRewrite::new(cst.clone());

    rewrite
        .set_child(&for_stmt, ast::ForStmt::EXPRESSION, None)
        .unwrap();
    let mut updaters = rewrite.list(&for_stmt, ast::ForStmt::UPDATERS).unwrap();
    for updater in updaters.original_list() {
        updaters.remove(&jrewrite_core::Node::Original(updater)).unwrap();
    }

    assert_eq!(
        rewrite.rewrite().unwrap().text(),
        "class A { void f() { for (int i = 0;;) { go(); } } }"
    );
}

#[test]
fn test_created_block_follows_tab_indentation() {
    let (cst, unit) = parse("class A {\n\tvoid f() {\n\t\tx();\n\t}\n}\n");
    let body = method_body(&unit, "A", "f");
    let factory = NodeFactory::new();
    let mut rewrite = AstRewrite::new(cst);

    let loop_stmt = factory
        .while_stmt(
            factory.boolean_literal(true).unwrap(),
            factory.block(vec![call_stmt(&factory, "y")]).unwrap(),
        )
        .unwrap();
    rewrite
        .list(&body, ast::Block::STATEMENTS)
        .unwrap()
        .insert_last(loop_stmt)
        .unwrap();

    assert_eq!(
        rewrite.rewrite().unwrap().text(),
        "class A {\n\tvoid f() {\n\t\tx();\n\t\twhile (true) {\n\t\t\ty();\n\t\t}\n\t}\n}\n"
    );
}

#[test]
fn test_insert_statement_after_first() {
    let (cst, unit) = parse(STATEMENTS);
    let body = method_body(&unit, "A", "f");
    let factory = NodeFactory::new();
    let mut rewrite = AstRewrite::new(cst.clone());
    let tracked = rewrite.track(&statement(&cst, "b();")).unwrap();

    rewrite
        .list(&body, ast::Block::STATEMENTS)
        .unwrap()
        .insert_at(call_stmt(&factory, "x"), 1)
        .unwrap();

    let result = rewrite.rewrite().unwrap();
    assert_snapshot!(result.text(), @r"
    class A {
        void f() {
            a();
            x();
            b();
            c();
        }
    }
    ");
    let range = result.tracked_range(&tracked).unwrap();
    assert_eq!(&result.text()[range], "b();");
}

#[test]
fn test_move_statement_to_front() {
    let (cst, unit) = parse(STATEMENTS);
    let body = method_body(&unit, "A", "f");
    let mut rewrite = AstRewrite::new(cst.clone());

    let moved = rewrite.create_move_target(&statement(&cst, "c();")).unwrap();
    rewrite
        .list(&body, ast::Block::STATEMENTS)
        .unwrap()
        .insert_first(moved)
        .unwrap();

    assert_eq!(
        rewrite.rewrite().unwrap().text(),
        "class A {\n    void f() {\n        c();\n        a();\n        b();\n    }\n}\n"
    );
}

#[test]
fn test_copy_statement_keeps_original() {
    let (cst, unit) = parse(STATEMENTS);
    let body = method_body(&unit, "A", "f");
    let mut rewrite = AstRewrite::new(cst.clone());

    let copy = rewrite.create_copy_target(&statement(&cst, "a();")).unwrap();
    rewrite
        .list(&body, ast::Block::STATEMENTS)
        .unwrap()
        .insert_last(copy)
        .unwrap();

    assert_eq!(
        rewrite.rewrite().unwrap().text(),
        "class A {\n    void f() {\n        a();\n        b();\n        c();\n        a();\n    }\n}\n"
    );
}

#[test]
fn test_single_line_block_stays_inline() {
    let (cst, unit) = parse("class A { void f() { a(); } }");
    let body = method_body(&unit, "A", "f");
    let factory = NodeFactory::new();
    let mut rewrite = AstRewrite::new(cst);

    rewrite
        .list(&body, ast::Block::STATEMENTS)
        .unwrap()
        .insert_last(call_stmt(&factory, "x"))
        .unwrap();

    assert_eq!(rewrite.rewrite().unwrap().text(), "class A { void f() { a(); x(); } }");
}

#[test]
fn test_insert_into_empty_braces_opens_block() {
    let (cst, unit) = parse("class A {\n    void f() {}\n}\n");
    let body = method_body(&unit, "A", "f");
    let factory = NodeFactory::new();
    let mut rewrite = AstRewrite::new(cst);

    rewrite
        .list(&body, ast::Block::STATEMENTS)
        .unwrap()
        .insert_last(call_stmt(&factory, "x"))
        .unwrap();

    assert_eq!(
        rewrite.rewrite().unwrap().text(),
        "class A {\n    void f() {\n        x();\n    }\n}\n"
    );
}

#[test]
fn test_insert_method_with_blank_line() {
    let (cst, unit) = parse("class A {\n    void f() {}\n}\n");
    let type_decl = unit.find_type("A").unwrap();
    let factory = NodeFactory::new();
    let method = factory
        .method_decl(
            factory.modifiers(&["public"]).unwrap(),
            Some(factory.type_named("void").unwrap()),
            "g",
            Vec::new(),
            Some(factory.block(Vec::new()).unwrap()),
        )
        .unwrap();

    let mut rewrite = AstRewrite::new(cst);
    rewrite
        .list(type_decl.syntax(), ast::TypeDecl::BODY_DECLARATIONS)
        .unwrap()
        .insert_last(method)
        .unwrap();

    assert_snapshot!(rewrite.rewrite().unwrap().text(), @r"
    class A {
        void f() {}

        public void g() {}
    }
    ");
}

#[test]
fn test_argument_list_edits() {
    let source = "class A { void f() { call(a, b, c); } }";
    let cases: [(&str, &str); 3] = [
        ("a", "class A { void f() { call(b, c); } }"),
        ("b", "class A { void f() { call(a, c); } }"),
        ("c", "class A { void f() { call(a, b); } }"),
    ];

    for (removed, expected) in cases {
        let (cst, _) = parse(source);
        let argument = cst
            .descendants()
            .filter(|n| n.parent().is_some_and(|p| p.kind() == JavaSyntaxKind::ArgList))
            .find(|n| n.text() == removed)
            .unwrap();
        let mut rewrite = AstRewrite::new(cst);
        rewrite.remove(&argument).unwrap();
        assert_eq!(rewrite.rewrite().unwrap().text(), expected, "removing {removed}");
    }
}

#[test]
fn test_reorder_parameters_with_replace_all() {
    let (cst, unit) = parse("class A { void f(int a, /* second */ long b) {} }");
    let method = unit.find_type("A").and_then(|t| t.method("f")).unwrap();
    let mut rewrite = AstRewrite::new(cst);

    let mut list = rewrite.list(method.syntax(), ast::MethodDecl::PARAMETERS).unwrap();
    let mut reordered = list.original_list();
    reordered.reverse();
    list.replace_all(reordered.into_iter().map(jrewrite_core::Node::Original).collect())
        .unwrap();

    let result = rewrite.rewrite().unwrap();
    assert!(result.text().contains("long b"));
    let b = result.text().find("long b").unwrap();
    let a = result.text().find("int a").unwrap();
    assert!(b < a, "parameters not reordered: {}", result.text());
}

#[test]
fn test_combined_rewrite() {
    let source = "class Greeter {
    // Says hello
    String greet(String name) {
        return format(\"Hello\", name);
    }
}
";
    let (cst, unit) = parse(source);
    let method = unit.find_type("Greeter").and_then(|t| t.method("greet")).unwrap();
    let call = cst
        .descendants()
        .find(|n| n.kind() == JavaSyntaxKind::MethodCall)
        .unwrap();
    let factory = NodeFactory::new();
    let mut rewrite = AstRewrite::new(cst);

    rewrite
        .set_simple(method.name().unwrap().syntax(), ast::SimpleName::IDENTIFIER, "welcome")
        .unwrap();
    rewrite
        .list(method.syntax(), ast::MethodDecl::PARAMETERS)
        .unwrap()
        .insert_last(
            factory
                .parameter(factory.type_named("int").unwrap(), "times")
                .unwrap(),
        )
        .unwrap();
    rewrite
        .list(&call, ast::MethodCall::ARGUMENTS)
        .unwrap()
        .insert_last(factory.number_literal("3").unwrap())
        .unwrap();

    let result = rewrite.rewrite().unwrap();
    assert_snapshot!(result.text(), @r#"
    class Greeter {
        // Says hello
        String welcome(String name, int times) {
            return format("Hello", name, 3);
        }
    }
    "#);
    assert_eq!(result.edits().len(), 3);
}

#[test]
fn test_list_index_out_of_bounds() {
    let (cst, unit) = parse(STATEMENTS);
    let body = method_body(&unit, "A", "f");
    let factory = NodeFactory::new();
    let mut rewrite = AstRewrite::new(cst);

    let error = rewrite
        .list(&body, ast::Block::STATEMENTS)
        .unwrap()
        .insert_at(call_stmt(&factory, "x"), 7)
        .unwrap_err();
    assert!(matches!(error, RewriteError::IndexOutOfBounds { index: 7, len: 3, .. }));
}

#[test]
fn test_untouched_source_is_identical() {
    let source = "package p;\n\n/* odd */ class   A{void f( ){a( ) ;}}\n";
    let (cst, _) = parse(source);
    let result = AstRewrite::new(cst).rewrite().unwrap();
    assert!(!result.has_changes());
    assert!(result.edits().is_empty());
    assert_eq!(result.text(), source);
}
