//! Round-trip validation for Java sources and rewrites
//!
//! Two checks are provided:
//! 1. `parse(source).text() == source` (the CST is lossless)
//! 2. a rewritten source parses with no more errors than the original
//!
//! # Example
//!
//! ```rust,ignore
//! use jrewrite_core::syntax::RoundTripValidator;
//!
//! let validator = RoundTripValidator::new();
//! let result = validator.validate_rewrite("class A {}", "class A { void f() {} }");
//! assert!(result.is_valid());
//! ```

use std::collections::BTreeSet;

use super::{
    ast::{AstNode, CompilationUnit},
    parse_java,
};

/// Outcome of a round-trip validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Whether the parsed text equals the input
    pub lossless: bool,
    pub original_errors: Vec<String>,
    /// Errors of the rewritten source, empty for plain source validation
    pub rewritten_errors: Vec<String>,
    /// Declarations present on one side only
    pub differences: Vec<DeclarationDifference>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Human readable list of problems
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !self.lossless {
            issues.push("Parsed text differs from the source".to_string());
        }
        if self.rewritten_errors.len() > self.original_errors.len() {
            issues.push(format!(
                "Rewritten source has {} syntax errors, original had {}",
                self.rewritten_errors.len(),
                self.original_errors.len()
            ));
        }
        issues
    }
}

/// A type or method declaration that only exists on one side of a rewrite
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeclarationDifference {
    Added(String),
    Removed(String),
}

/// Validator for lossless parsing and rewrite output
#[derive(Debug, Default)]
pub struct RoundTripValidator {
    /// Fail rewrites that add or remove declarations
    strict_declarations: bool,
}

impl RoundTripValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            strict_declarations: true,
        }
    }

    /// Check that parsing `source` is lossless
    pub fn validate_source(&self, source: &str) -> ValidationResult {
        let (cst, errors) = parse_java(source);
        let lossless = cst.text() == source;
        ValidationResult {
            is_valid: lossless,
            lossless,
            original_errors: errors.iter().map(|e| e.to_string()).collect(),
            rewritten_errors: Vec::new(),
            differences: Vec::new(),
        }
    }

    /// Check that `rewritten` is a sound rewrite of `original`
    pub fn validate_rewrite(&self, original: &str, rewritten: &str) -> ValidationResult {
        let (original_cst, original_errors) = parse_java(original);
        let (rewritten_cst, rewritten_errors) = parse_java(rewritten);
        let lossless = rewritten_cst.text() == rewritten;

        let before = declarations(&original_cst);
        let after = declarations(&rewritten_cst);
        let mut differences: Vec<_> = before
            .difference(&after)
            .cloned()
            .map(DeclarationDifference::Removed)
            .chain(after.difference(&before).cloned().map(DeclarationDifference::Added))
            .collect();
        differences.sort();

        let is_valid = lossless
            && rewritten_errors.len() <= original_errors.len()
            && (!self.strict_declarations || differences.is_empty());

        ValidationResult {
            is_valid,
            lossless,
            original_errors: original_errors.iter().map(|e| e.to_string()).collect(),
            rewritten_errors: rewritten_errors.iter().map(|e| e.to_string()).collect(),
            differences,
        }
    }
}

/// `Type` and `Type.method` names declared in a compilation unit
fn declarations(root: &super::JavaSyntaxNode) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let Some(unit) = CompilationUnit::cast(root.clone()) else {
        return names;
    };
    for ty in unit
        .syntax()
        .descendants()
        .filter_map(super::ast::TypeDecl::cast)
    {
        let type_name = ty.name_text().unwrap_or_default();
        for method in ty.methods() {
            names.insert(format!(
                "{}.{}",
                type_name,
                method.name_text().unwrap_or_default()
            ));
        }
        names.insert(type_name);
    }
    names
}
