//! Rowan language implementation for Java
//!
//! Connects [`JavaSyntaxKind`] to Rowan's generic CST infrastructure.

use rowan::Language;

use super::JavaSyntaxKind;

/// Zero-sized marker type implementing `rowan::Language` for Java
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JavaLanguage;

impl Language for JavaLanguage {
    type Kind = JavaSyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        JavaSyntaxKind::from_raw(raw.0)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Red tree node
pub type JavaSyntaxNode = rowan::SyntaxNode<JavaLanguage>;
/// Red tree token
pub type JavaSyntaxToken = rowan::SyntaxToken<JavaLanguage>;
/// Node or token
pub type JavaSyntaxElement = rowan::SyntaxElement<JavaLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_conversion() {
        let raw = JavaLanguage::kind_to_raw(JavaSyntaxKind::MethodDecl);
        assert_eq!(JavaLanguage::kind_from_raw(raw), JavaSyntaxKind::MethodDecl);
    }
}
