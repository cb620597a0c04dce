//! Printer for converting FormatElement IR to strings
//!
//! Indentation is written lazily: after a line break the printer remembers
//! that the next non-newline character must be preceded by the current
//! indentation, so empty lines never carry trailing whitespace. Line breaks
//! inside `Text` elements are re-indented the same way.

use super::format_element::FormatElement;
use unicode_width::UnicodeWidthChar;

/// Printer configuration
#[derive(Debug, Clone)]
pub struct PrinterOptions {
    /// Maximum line width before soft breaks wrap
    pub line_width: usize,

    /// Number of spaces per indentation level
    pub indent_size: usize,

    pub use_tabs: bool,

    /// Tab width for width calculations
    pub tab_width: u32,

    /// Extra indentation levels for wrapped lines
    pub continuation_indent: usize,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            line_width: 100,
            indent_size: 4,
            use_tabs: false,
            tab_width: 4,
            continuation_indent: 2,
        }
    }
}

pub struct Printer {
    options: PrinterOptions,
    buffer: String,
    current_line_width: u32,
    indent_level: usize,
    /// Continuation levels of the current line, reset by hard breaks
    continuation: usize,
    pending_indent: bool,
    line_number: usize,
}

impl Printer {
    pub fn new(options: PrinterOptions) -> Self {
        Self {
            options,
            buffer: String::with_capacity(256),
            current_line_width: 0,
            indent_level: 0,
            continuation: 0,
            pending_indent: false,
            line_number: 1,
        }
    }

    /// Print a sequence of format elements to a string
    pub fn print(&mut self, elements: &[FormatElement]) -> String {
        let mut flat = Vec::new();
        flatten(elements, &mut flat);
        for (index, element) in flat.iter().enumerate() {
            self.print_element(element, &flat[index + 1..]);
        }
        std::mem::take(&mut self.buffer)
    }

    fn print_element(&mut self, element: &FormatElement, rest: &[&FormatElement]) {
        match element {
            FormatElement::Token(token) => {
                if !token.is_empty() {
                    self.flush_indent();
                    self.buffer.push_str(token);
                    self.current_line_width += token.len() as u32;
                }
            }

            FormatElement::Text(text) => {
                for c in text.chars() {
                    let width = match c {
                        '\n' => {
                            self.newline();
                            continue;
                        }
                        '\r' => continue,
                        '\t' => self.options.tab_width,
                        c => c.width().unwrap_or(0) as u32,
                    };
                    self.flush_indent();
                    self.buffer.push(c);
                    self.current_line_width += width;
                }
            }

            FormatElement::HardLineBreak => {
                self.continuation = 0;
                self.newline();
            }

            FormatElement::SoftLineBreak => {
                let next = chunk_width(rest);
                if self.current_line_width as usize + 1 + next > self.options.line_width {
                    self.continuation = self.options.continuation_indent;
                    self.newline();
                } else {
                    self.flush_indent();
                    self.buffer.push(' ');
                    self.current_line_width += 1;
                }
            }

            FormatElement::Space => {
                self.flush_indent();
                self.buffer.push(' ');
                self.current_line_width += 1;
            }

            FormatElement::Indent => {
                self.indent_level += 1;
            }

            FormatElement::Dedent => {
                self.indent_level = self.indent_level.saturating_sub(1);
            }

            // Flattened before printing
            FormatElement::Group(_) | FormatElement::Sequence(_) => {}
        }
    }

    fn newline(&mut self) {
        self.buffer.push('\n');
        self.current_line_width = 0;
        self.line_number += 1;
        self.pending_indent = true;
    }

    fn flush_indent(&mut self) {
        if !self.pending_indent {
            return;
        }
        self.pending_indent = false;
        let levels = self.indent_level + self.continuation;
        if self.options.use_tabs {
            self.buffer.push_str(&"\t".repeat(levels));
            self.current_line_width += levels as u32 * self.options.tab_width;
        } else {
            let width = levels * self.options.indent_size;
            self.buffer.push_str(&" ".repeat(width));
            self.current_line_width += width as u32;
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn current_line_width(&self) -> u32 {
        self.current_line_width
    }

    /// Reset printer state (keeps options)
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.current_line_width = 0;
        self.indent_level = 0;
        self.continuation = 0;
        self.pending_indent = false;
        self.line_number = 1;
    }
}

fn flatten<'a>(elements: &'a [FormatElement], out: &mut Vec<&'a FormatElement>) {
    for element in elements {
        match element {
            FormatElement::Group(inner) | FormatElement::Sequence(inner) => flatten(inner, out),
            other => out.push(other),
        }
    }
}

/// Width of the text up to the next possible line break
fn chunk_width(rest: &[&FormatElement]) -> usize {
    let mut width = 0;
    for element in rest {
        match element {
            FormatElement::Token(t) => width += t.len(),
            FormatElement::Text(t) => {
                let first_line = t.split('\n').next().unwrap_or_default();
                width += first_line.chars().map(|c| c.width().unwrap_or(0)).sum::<usize>();
                if t.contains('\n') {
                    break;
                }
            }
            FormatElement::Space => width += 1,
            FormatElement::HardLineBreak | FormatElement::SoftLineBreak => break,
            _ => {}
        }
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_element::{
        dedent, group, hard_line_break, indent, soft_line_break, space, text, token,
    };

    #[test]
    fn test_tokens_and_text() {
        let mut printer = Printer::new(PrinterOptions::default());
        let result = printer.print(&[token("return"), space(), text("größe"), token(";")]);
        assert_eq!(result, "return größe;");
    }

    #[test]
    fn test_lazy_indentation() {
        let mut printer = Printer::new(PrinterOptions::default());
        let result = printer.print(&[
            token("{"),
            indent(),
            hard_line_break(),
            token("a();"),
            hard_line_break(),
            hard_line_break(),
            token("b();"),
            dedent(),
            hard_line_break(),
            token("}"),
        ]);
        assert_eq!(result, "{\n    a();\n\n    b();\n}");
    }

    #[test]
    fn test_text_newlines_are_reindented() {
        let mut printer = Printer::new(PrinterOptions {
            indent_size: 2,
            ..Default::default()
        });
        let result = printer.print(&[
            token("{"),
            indent(),
            hard_line_break(),
            text("if (a) {\n  b();\n}"),
            dedent(),
            hard_line_break(),
            token("}"),
        ]);
        assert_eq!(result, "{\n  if (a) {\n    b();\n  }\n}");
    }

    #[test]
    fn test_soft_line_break_wraps() {
        let mut printer = Printer::new(PrinterOptions {
            line_width: 20,
            ..Default::default()
        });
        let result = printer.print(&[group(vec![
            text("callSomething("),
            text("first,"),
            soft_line_break(),
            text("second)"),
        ])]);
        assert_eq!(result, "callSomething(first,\n        second)");

        printer.reset();
        let short = printer.print(&[text("f(a,"), soft_line_break(), text("b)")]);
        assert_eq!(short, "f(a, b)");
    }

    #[test]
    fn test_tab_indentation() {
        let mut printer = Printer::new(PrinterOptions {
            use_tabs: true,
            ..Default::default()
        });
        let result = printer.print(&[token("{"), indent(), hard_line_break(), token("x")]);
        assert_eq!(result, "{\n\tx");
        assert_eq!(printer.line_number(), 2);
    }
}
