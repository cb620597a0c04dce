//! Layout of created nodes
//!
//! Created composites have no source text, so the rewrite asks a
//! [`CodeFormatter`] to lay them out. Children are rendered by the caller
//! through the `embed` callback (original nodes keep their text and comments),
//! the formatter only decides the structure around them.
//!
//! [`DefaultFormatter`] flattens a composite into [`FormatElement`]s and
//! prints them with the [`Printer`].
//!
//! [`FormatElement`]: format_element::FormatElement
//! [`Printer`]: printer::Printer

mod flatten;
pub mod format_element;
pub mod printer;

use crate::rewrite::{CreatedContent, Node};
use crate::{Result, RewriteError};
use flatten::Flattener;
use printer::{Printer, PrinterOptions};

/// Lays out created nodes for insertion into source text
pub trait CodeFormatter {
    /// Text of the created composite `node`, starting at column 0
    ///
    /// `embed` returns the final text of a child node. Multi-line results
    /// are relative to column 0 and are re-indented by the caller.
    fn format(&self, node: &Node, embed: &mut dyn FnMut(&Node) -> Result<String>) -> Result<String>;

    /// Text of one indentation level
    fn indent_unit(&self) -> String;

    /// Whether a space follows commas in new list gaps
    fn space_after_comma(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    Spaces,
    Tabs,
}

/// Placement of an opening brace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BraceStyle {
    /// `void f() {`
    EndOfLine,
    /// `{` on the next line
    NextLine,
}

/// Formatting options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Indentation style
    pub indent_style: IndentStyle,

    /// Spaces per indentation level
    pub indent_size: usize,

    /// Tab width for line width calculations
    pub tab_width: u32,

    /// Maximum line width before soft breaks wrap
    pub line_width: usize,

    pub brace_style: BraceStyle,

    /// `f(a, b)` instead of `f(a,b)`
    pub space_after_comma: bool,

    /// `a + b` instead of `a+b`
    pub spaces_around_operators: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_style: IndentStyle::Spaces,
            indent_size: 4,
            tab_width: 4,
            line_width: 100,
            brace_style: BraceStyle::EndOfLine,
            space_after_comma: true,
            spaces_around_operators: true,
        }
    }
}

impl FormatOptions {
    pub fn printer_options(&self) -> PrinterOptions {
        PrinterOptions {
            line_width: self.line_width,
            indent_size: self.indent_size,
            use_tabs: self.indent_style == IndentStyle::Tabs,
            tab_width: self.tab_width,
            ..Default::default()
        }
    }
}

/// Formatter for created nodes driven by [`FormatOptions`]
#[derive(Debug, Clone, Default)]
pub struct DefaultFormatter {
    options: FormatOptions,
}

impl DefaultFormatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }
}

impl CodeFormatter for DefaultFormatter {
    fn format(&self, node: &Node, embed: &mut dyn FnMut(&Node) -> Result<String>) -> Result<String> {
        let created = node
            .as_created()
            .ok_or_else(|| RewriteError::formatter_error(format!("{} is not a created node", node.kind())))?;
        match created.content() {
            CreatedContent::Composite(_) => {
                let elements = Flattener::new(&self.options, embed).node(created)?;
                Ok(Printer::new(self.options.printer_options()).print(&elements))
            }
            CreatedContent::Placeholder(code) => Ok(code.clone()),
            CreatedContent::CopyOf(_) | CreatedContent::MoveOf(_) => Err(RewriteError::formatter_error(
                "copy and move placeholders are rendered from source",
            )),
        }
    }

    fn indent_unit(&self) -> String {
        match self.options.indent_style {
            IndentStyle::Tabs => "\t".to_string(),
            IndentStyle::Spaces => " ".repeat(self.options.indent_size),
        }
    }

    fn space_after_comma(&self) -> bool {
        self.options.space_after_comma
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::NodeFactory;
    use crate::syntax::JavaSyntaxKind;

    fn render(formatter: &DefaultFormatter, node: &Node) -> Result<String> {
        match node.as_created().map(|c| c.content()) {
            Some(CreatedContent::Composite(_)) => formatter.format(node, &mut |child| render(formatter, child)),
            Some(CreatedContent::Placeholder(code)) => Ok(code.clone()),
            _ => Err(RewriteError::internal_error("original node in formatter test")),
        }
    }

    #[test]
    fn test_indent_unit() {
        assert_eq!(DefaultFormatter::default().indent_unit(), "    ");
        let tabs = DefaultFormatter::new(FormatOptions {
            indent_style: IndentStyle::Tabs,
            ..Default::default()
        });
        assert_eq!(tabs.indent_unit(), "\t");
    }

    #[test]
    fn test_placeholder_passes_through() {
        let factory = NodeFactory::new();
        let node = factory.string_placeholder("foo(  1 )", JavaSyntaxKind::MethodCall);
        assert_eq!(render(&DefaultFormatter::default(), &node).unwrap(), "foo(  1 )");
    }

    #[test]
    fn test_method_with_body() {
        let f = NodeFactory::new();
        let call = f.method_call(None, "log", vec![f.string_literal("hi").unwrap()]).unwrap();
        let body = f.block(vec![f.expr_stmt(call).unwrap()]).unwrap();
        let method = f
            .method_decl(
                f.modifiers(&["public", "static"]).unwrap(),
                Some(f.type_named("void").unwrap()),
                "run",
                vec![f.parameter(f.type_named("int").unwrap(), "n").unwrap()],
                Some(body),
            )
            .unwrap();
        let text = render(&DefaultFormatter::default(), &method).unwrap();
        assert_eq!(text, "public static void run(int n) {\n    log(\"hi\");\n}");
    }

    #[test]
    fn test_options_change_layout() {
        let f = NodeFactory::new();
        let sum = f
            .infix(f.name("a").unwrap(), "+", f.name("b").unwrap())
            .unwrap();
        let call = f
            .method_call(None, "max", vec![sum, f.number_literal("1").unwrap()])
            .unwrap();
        let body = f.block(vec![f.return_stmt(Some(call)).unwrap()]).unwrap();
        let method = f
            .method_decl(Vec::new(), Some(f.type_named("int").unwrap()), "g", Vec::new(), Some(body))
            .unwrap();

        let compact = DefaultFormatter::new(FormatOptions {
            brace_style: BraceStyle::NextLine,
            space_after_comma: false,
            spaces_around_operators: false,
            indent_size: 2,
            ..Default::default()
        });
        assert_eq!(
            render(&compact, &method).unwrap(),
            "int g()\n{\n  return max(a+b,1);\n}"
        );
    }
}
