//! Concrete syntax tree for the supported Java subset
//!
//! The tree is built with rowan and is lossless: every byte of the source,
//! trivia included, is stored in exactly one token, so
//! `parse_java(source).0.text() == source` holds for any input.
//!
//! ## Trivia placement
//!
//! Nodes start at their first significant token and end at their last one.
//! Whitespace and comments belong to the innermost node that is open when the
//! next significant token starts. Empty list containers (an empty
//! `ModifierList`, an empty `ForInit`) are zero-length nodes.
//!
//! ## Example
//!
//! ```rust,ignore
//! use jrewrite_core::syntax::{parse_java, JavaSyntaxKind};
//!
//! let (cst, errors) = parse_java("class A { /* keep */ void f() {} }");
//! assert!(errors.is_empty());
//! for token in cst.descendants_with_tokens().filter_map(|e| e.into_token()) {
//!     if token.kind() == JavaSyntaxKind::CommentBlock {
//!         println!("Found comment: {}", token.text());
//!     }
//! }
//! ```

mod builder;
mod language;
mod lexer;
mod parser;
mod syntax_kind;

pub mod ast;
pub mod round_trip;
pub mod trivia;

pub use builder::CstBuilder;
pub use language::{JavaLanguage, JavaSyntaxElement, JavaSyntaxNode, JavaSyntaxToken};
pub use lexer::{
    CstLexResult, CstSpan, CstToken, LexerError, is_ident_continue, is_ident_start,
    is_valid_identifier, lex_with_trivia,
};
pub use parser::{ParseError, ParseErrorKind, parse_java};
pub use round_trip::{DeclarationDifference, RoundTripValidator, ValidationResult};
pub use syntax_kind::{JavaSyntaxKind, NodeClass};
pub use trivia::{TriviaCollector, TriviaInfo, TriviaToken};
