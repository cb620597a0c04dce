//! Thin wrapper around rowan's `GreenNodeBuilder`

use rowan::{Checkpoint, GreenNodeBuilder};

use super::{CstToken, JavaSyntaxKind, JavaSyntaxNode};

/// Builder used by the parser to assemble the green tree
pub struct CstBuilder {
    inner: GreenNodeBuilder<'static>,
}

impl CstBuilder {
    pub fn new() -> Self {
        Self {
            inner: GreenNodeBuilder::new(),
        }
    }

    pub fn start_node(&mut self, kind: JavaSyntaxKind) {
        self.inner.start_node(kind.into());
    }

    pub fn finish_node(&mut self) {
        self.inner.finish_node();
    }

    pub fn token(&mut self, kind: JavaSyntaxKind, text: &str) {
        self.inner.token(kind.into(), text);
    }

    pub fn add_token(&mut self, token: &CstToken) {
        self.token(token.kind, &token.text);
    }

    pub fn checkpoint(&self) -> Checkpoint {
        self.inner.checkpoint()
    }

    /// Wrap everything added since `checkpoint` into a new node of `kind`
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: JavaSyntaxKind) {
        self.inner.start_node_at(checkpoint, kind.into());
    }

    pub fn finish(self) -> JavaSyntaxNode {
        JavaSyntaxNode::new_root(self.inner.finish())
    }
}

impl Default for CstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_simple_tree() {
        let mut builder = CstBuilder::new();
        builder.start_node(JavaSyntaxKind::CompilationUnit);
        let checkpoint = builder.checkpoint();
        builder.token(JavaSyntaxKind::Ident, "a");
        builder.start_node_at(checkpoint, JavaSyntaxKind::SimpleName);
        builder.finish_node();
        builder.token(JavaSyntaxKind::Semicolon, ";");
        builder.finish_node();

        let root = builder.finish();
        assert_eq!(root.kind(), JavaSyntaxKind::CompilationUnit);
        assert_eq!(root.text().to_string(), "a;");
        let name = root.first_child().unwrap();
        assert_eq!(name.kind(), JavaSyntaxKind::SimpleName);
        assert_eq!(name.text().to_string(), "a");
    }
}
