//! Format elements for laying out created Java fragments
//!
//! The IR distinguishes static ASCII tokens (keywords, operators,
//! punctuation) from dynamic text (identifiers, literals, embedded original
//! code), which may contain Unicode and line breaks.
//!
//! # Example
//!
//! ```rust,ignore
//! use jrewrite_core::format::format_element::{token, text, space, hard_line_break};
//!
//! let elements = vec![
//!     token("return"),
//!     space(),
//!     text("value"),
//!     token(";"),
//!     hard_line_break(),
//! ];
//! ```

use std::fmt;

/// Building block of formatted output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatElement {
    /// Static ASCII text without line breaks or tabs
    Token(&'static str),

    /// Dynamic text; line breaks inside it are re-indented by the printer
    Text(Box<str>),

    /// Always inserts a newline
    HardLineBreak,

    /// Prints as a space, or as a newline plus continuation indent when the
    /// following chunk would not fit into the line width
    SoftLineBreak,

    Space,

    /// Increase indentation level for following lines
    Indent,

    /// Decrease indentation level for following lines
    Dedent,

    /// Elements that should stay together if possible
    Group(Vec<FormatElement>),

    Sequence(Vec<FormatElement>),
}

impl FormatElement {
    /// Check if this element produces no characters
    pub fn is_empty(&self) -> bool {
        match self {
            FormatElement::Token(s) => s.is_empty(),
            FormatElement::Text(text) => text.is_empty(),
            FormatElement::Space | FormatElement::HardLineBreak | FormatElement::SoftLineBreak => {
                false
            }
            FormatElement::Indent | FormatElement::Dedent => true,
            FormatElement::Group(elements) | FormatElement::Sequence(elements) => {
                elements.iter().all(|e| e.is_empty())
            }
        }
    }
}

impl fmt::Display for FormatElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatElement::Token(s) => write!(f, "{}", s),
            FormatElement::Text(text) => write!(f, "{}", text),
            FormatElement::HardLineBreak => writeln!(f),
            FormatElement::SoftLineBreak | FormatElement::Space => write!(f, " "),
            FormatElement::Indent | FormatElement::Dedent => Ok(()),
            FormatElement::Group(elements) | FormatElement::Sequence(elements) => {
                for element in elements {
                    write!(f, "{}", element)?;
                }
                Ok(())
            }
        }
    }
}

/// Static, ASCII-only text: keywords, operators, punctuation
///
/// # Panics
///
/// In debug builds, panics if `text` contains non-ASCII characters or
/// newlines, tabs or carriage returns.
pub fn token(text: &'static str) -> FormatElement {
    debug_assert!(text.is_ascii(), "Token must be ASCII only, got: {:?}", text);
    debug_assert!(
        !text.contains(['\n', '\r', '\t']),
        "Token cannot contain newlines/tabs, use HardLineBreak/Space instead: {:?}",
        text
    );
    FormatElement::Token(text)
}

/// Dynamic text such as identifiers, literals or embedded code
pub fn text(text: &str) -> FormatElement {
    FormatElement::Text(text.into())
}

pub fn hard_line_break() -> FormatElement {
    FormatElement::HardLineBreak
}

pub fn soft_line_break() -> FormatElement {
    FormatElement::SoftLineBreak
}

pub fn space() -> FormatElement {
    FormatElement::Space
}

pub fn indent() -> FormatElement {
    FormatElement::Indent
}

pub fn dedent() -> FormatElement {
    FormatElement::Dedent
}

pub fn group(elements: Vec<FormatElement>) -> FormatElement {
    FormatElement::Group(elements)
}

pub fn sequence(elements: Vec<FormatElement>) -> FormatElement {
    FormatElement::Sequence(elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        assert_eq!(token("return"), FormatElement::Token("return"));
    }

    #[test]
    #[should_panic(expected = "Token must be ASCII")]
    fn test_token_rejects_unicode() {
        token("retürn");
    }

    #[test]
    #[should_panic(expected = "Token cannot contain newlines")]
    fn test_token_rejects_newlines() {
        token("{\n");
    }

    #[test]
    fn test_display_and_empty() {
        let elements = sequence(vec![token("int"), space(), text("x"), token(";")]);
        assert_eq!(elements.to_string(), "int x;");
        assert!(sequence(vec![indent(), token("")]).is_empty());
        assert!(!group(vec![soft_line_break()]).is_empty());
    }
}
