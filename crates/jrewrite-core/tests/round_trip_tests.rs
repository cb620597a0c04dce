//! Lossless parsing and rewrite validation

use jrewrite_core::syntax::DeclarationDifference;
use jrewrite_core::{DefaultFormatter, EditScript, RoundTripValidator, apply_script, parse_java};

const SOURCES: &[&str] = &[
    "",
    "\n",
    "// header\n",
    "// Copyright\npackage p;\nclass A {}\n",
    "/*\n * License\n */\n\nimport a.B;\n\nclass A {}\n",
    "class A {}",
    "package a.b;\n\nimport java.util.*;\nimport static java.lang.Math.max;\n\npublic final class A<T> extends B implements C, D {}\n",
    "interface I extends J {\n    int f(int a) throws E;\n}\n",
    "class A {\r\n\tint x = 1, y;\r\n}\r\n",
    "/** doc */\n@Deprecated\nclass A {\n    // leading\n    void f() { /* inline */ }\n}\n",
    "class A { void f() { for (int i = 0; i < n; i++) { if (a) b(); else { c(); } } } }",
    "class A { void f() { try { a(); } catch (Exception e) { throw e; } finally { b(); } } }",
    "class A { int f() { return x > 0 ? (int) y : -z[1]; } }",
    "class A { void f() { while (true) { break; } String s = \"a\\\"b\"; char c = '\\n'; } }",
    // Unterminated constructs still round-trip
    "class A { void f( }\n",
    "class A { /* never closed",
];

#[test]
fn test_parse_is_lossless() {
    let validator = RoundTripValidator::new();
    for source in SOURCES {
        let (cst, _) = parse_java(source);
        assert_eq!(cst.text().to_string(), *source);
        let result = validator.validate_source(source);
        assert!(result.is_valid(), "not lossless: {source:?}: {:?}", result.issues());
    }
}

#[test]
fn test_syntax_errors_are_reported() {
    let result = RoundTripValidator::new().validate_source("class A { void f( }\n");
    assert!(result.is_valid());
    assert!(!result.original_errors.is_empty());
}

#[test]
fn test_validate_script_rewrite() {
    let source = "class A {\n    void f() {}\n\n    void g() {}\n}\n";
    let script = EditScript::from_json(
        r#"{"operations": [{"op": "removeMethod", "typeName": "A", "method": "g"}]}"#,
    )
    .unwrap();
    let outcome = apply_script(source, &script, &DefaultFormatter::default()).unwrap();
    assert_eq!(outcome.text, "class A {\n    void f() {}\n}\n");

    let relaxed = RoundTripValidator::new().validate_rewrite(source, &outcome.text);
    assert!(relaxed.is_valid());
    assert_eq!(
        relaxed.differences,
        vec![DeclarationDifference::Removed("A.g".to_string())]
    );

    let strict = RoundTripValidator::strict().validate_rewrite(source, &outcome.text);
    assert!(!strict.is_valid());
}

#[test]
fn test_rewrite_introducing_errors_fails_validation() {
    let validator = RoundTripValidator::new();
    let result = validator.validate_rewrite("class A {}", "class A {");
    assert!(!result.is_valid());
    assert!(!result.issues().is_empty());
}
