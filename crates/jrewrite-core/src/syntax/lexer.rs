//! CST-aware lexer that preserves all trivia (whitespace, comments)
//!
//! Every byte of the input ends up in exactly one token, which is what makes
//! `parse_java(source).text() == source` hold for any input.

use super::JavaSyntaxKind;
use std::ops::Range;

/// Simple span representing a range in the source
pub type CstSpan = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: CstSpan,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstToken {
    pub kind: JavaSyntaxKind,
    pub text: String,
    pub span: CstSpan,
}

impl CstToken {
    pub fn new(kind: JavaSyntaxKind, text: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Result returned by the CST lexer
pub type CstLexResult = (Vec<CstToken>, Vec<LexerError>);

/// Lex input preserving ALL trivia for CST construction
///
/// - Whitespace runs become `Whitespace` tokens
/// - Line breaks (`\n`, `\r\n`, `\r`) become `Newline` tokens
/// - Comments become `CommentLine` / `CommentBlock` tokens
pub fn lex_with_trivia(input: &str) -> CstLexResult {
    let mut lexer = Lexer::new(input);
    lexer.run();
    (lexer.tokens, lexer.errors)
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<CstToken>,
    errors: Vec<LexerError>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn run(&mut self) {
        while let Some(current) = self.peek() {
            let start = self.pos;
            match current {
                '\n' => {
                    self.bump();
                    self.push(JavaSyntaxKind::Newline, start);
                }
                '\r' => {
                    self.bump();
                    if self.peek() == Some('\n') {
                        self.bump();
                    }
                    self.push(JavaSyntaxKind::Newline, start);
                }
                ' ' | '\t' | '\u{000C}' => {
                    self.eat_while(|c| matches!(c, ' ' | '\t' | '\u{000C}'));
                    self.push(JavaSyntaxKind::Whitespace, start);
                }
                '/' if self.peek_nth(1) == Some('/') => {
                    self.eat_while(|c| c != '\n' && c != '\r');
                    self.push(JavaSyntaxKind::CommentLine, start);
                }
                '/' if self.peek_nth(1) == Some('*') => self.lex_block_comment(start),
                '"' => self.lex_quoted('"', JavaSyntaxKind::StringLit, start),
                '\'' => self.lex_quoted('\'', JavaSyntaxKind::CharLit, start),
                c if is_ident_start(c) => {
                    self.eat_while(is_ident_continue);
                    let kind = JavaSyntaxKind::from_keyword(&self.input[start..self.pos])
                        .unwrap_or(JavaSyntaxKind::Ident);
                    self.push(kind, start);
                }
                c if c.is_ascii_digit() => self.lex_number(start),
                '.' if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.lex_number(start)
                }
                _ => self.lex_punctuation(start),
            }
        }
    }

    fn lex_block_comment(&mut self, start: usize) {
        self.bump();
        self.bump();
        let mut terminated = false;
        while let Some(c) = self.peek() {
            if c == '*' && self.peek_nth(1) == Some('/') {
                self.bump();
                self.bump();
                terminated = true;
                break;
            }
            self.bump();
        }
        if !terminated {
            self.errors
                .push(LexerError::new("Unterminated block comment", start..self.pos));
        }
        self.push(JavaSyntaxKind::CommentBlock, start);
    }

    fn lex_quoted(&mut self, quote: char, kind: JavaSyntaxKind, start: usize) {
        self.bump();
        let mut terminated = false;
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.bump();
                    if matches!(self.peek(), Some(c) if c != '\n' && c != '\r') {
                        self.bump();
                    }
                }
                '\n' | '\r' => break,
                c if c == quote => {
                    self.bump();
                    terminated = true;
                    break;
                }
                _ => self.bump(),
            }
        }
        if !terminated {
            let what = if quote == '"' { "string" } else { "character" };
            self.errors.push(LexerError::new(
                format!("Unterminated {what} literal"),
                start..self.pos,
            ));
        }
        self.push(kind, start);
    }

    fn lex_number(&mut self, start: usize) {
        let hex = self.input[start..].starts_with("0x") || self.input[start..].starts_with("0X");
        let mut seen_dot = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.bump();
            } else if c == '.' && !seen_dot && !hex {
                let next = self.peek_nth(1);
                if next == Some('.') || next.is_some_and(is_ident_start) {
                    break;
                }
                seen_dot = true;
                self.bump();
            } else if (c == '+' || c == '-')
                && !hex
                && self.input[..self.pos].ends_with(['e', 'E'])
                && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
            {
                self.bump();
            } else {
                break;
            }
        }
        self.push(JavaSyntaxKind::NumberLit, start);
    }

    fn lex_punctuation(&mut self, start: usize) {
        const PUNCTUATION: &[(&str, JavaSyntaxKind)] = &[
            ("...", JavaSyntaxKind::Ellipsis),
            ("++", JavaSyntaxKind::PlusPlus),
            ("--", JavaSyntaxKind::MinusMinus),
            ("&&", JavaSyntaxKind::AmpAmp),
            ("||", JavaSyntaxKind::PipePipe),
            ("==", JavaSyntaxKind::EqEq),
            ("!=", JavaSyntaxKind::NotEq),
            ("<=", JavaSyntaxKind::LtEq),
            (">=", JavaSyntaxKind::GtEq),
            ("+=", JavaSyntaxKind::PlusEq),
            ("-=", JavaSyntaxKind::MinusEq),
            ("*=", JavaSyntaxKind::StarEq),
            ("/=", JavaSyntaxKind::SlashEq),
            ("%=", JavaSyntaxKind::PercentEq),
            ("&=", JavaSyntaxKind::AmpEq),
            ("|=", JavaSyntaxKind::PipeEq),
            ("^=", JavaSyntaxKind::CaretEq),
            ("(", JavaSyntaxKind::LParen),
            (")", JavaSyntaxKind::RParen),
            ("{", JavaSyntaxKind::LBrace),
            ("}", JavaSyntaxKind::RBrace),
            ("[", JavaSyntaxKind::LBracket),
            ("]", JavaSyntaxKind::RBracket),
            (";", JavaSyntaxKind::Semicolon),
            (",", JavaSyntaxKind::Comma),
            (".", JavaSyntaxKind::Dot),
            ("@", JavaSyntaxKind::At),
            ("?", JavaSyntaxKind::Question),
            (":", JavaSyntaxKind::Colon),
            ("=", JavaSyntaxKind::Eq),
            ("<", JavaSyntaxKind::Lt),
            (">", JavaSyntaxKind::Gt),
            ("+", JavaSyntaxKind::Plus),
            ("-", JavaSyntaxKind::Minus),
            ("*", JavaSyntaxKind::Star),
            ("/", JavaSyntaxKind::Slash),
            ("%", JavaSyntaxKind::Percent),
            ("&", JavaSyntaxKind::Amp),
            ("|", JavaSyntaxKind::Pipe),
            ("^", JavaSyntaxKind::Caret),
            ("!", JavaSyntaxKind::Bang),
            ("~", JavaSyntaxKind::Tilde),
        ];

        let rest = &self.input[start..];
        if let Some((text, kind)) = PUNCTUATION.iter().find(|(text, _)| rest.starts_with(text)) {
            self.pos += text.len();
            self.push(*kind, start);
            return;
        }

        self.bump();
        self.errors.push(LexerError::new(
            format!("Unexpected character '{}'", &self.input[start..self.pos]),
            start..self.pos,
        ));
        self.push(JavaSyntaxKind::Error, start);
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.bump();
        }
    }

    fn push(&mut self, kind: JavaSyntaxKind, start: usize) {
        self.tokens.push(CstToken::new(
            kind,
            &self.input[start..self.pos],
            start..self.pos,
        ));
    }
}

/// Java identifier start character
pub fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Java identifier part character
pub fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Whether `text` is a legal, non-keyword Java identifier
pub fn is_valid_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if is_ident_start(first) => {}
        _ => return false,
    }
    chars.all(is_ident_continue)
        && JavaSyntaxKind::from_keyword(text).is_none()
        && !matches!(text, "goto" | "const")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<JavaSyntaxKind> {
        lex_with_trivia(source).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lossless() {
        let source = "class A {\r\n  // hi\n  int x = 0x1F; /* b */ }\n";
        let (tokens, errors) = lex_with_trivia(source);
        assert!(errors.is_empty());
        let text: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(text, source);
    }

    #[test]
    fn test_keywords_and_idents() {
        use JavaSyntaxKind::*;
        assert_eq!(
            kinds("public void $run_1"),
            vec![PublicKw, Whitespace, VoidKw, Whitespace, Ident]
        );
    }

    #[test]
    fn test_operators_longest_match() {
        use JavaSyntaxKind::*;
        assert_eq!(kinds("a+=b++"), vec![Ident, PlusEq, Ident, PlusPlus]);
        assert_eq!(kinds("x>=y"), vec![Ident, GtEq, Ident]);
        assert_eq!(kinds("String..."), vec![Ident, Ellipsis]);
    }

    #[test]
    fn test_numbers() {
        use JavaSyntaxKind::*;
        assert_eq!(kinds("1.5e-3f"), vec![NumberLit]);
        assert_eq!(kinds("1_000L"), vec![NumberLit]);
        assert_eq!(kinds(".5"), vec![NumberLit]);
        assert_eq!(kinds("a[1]"), vec![Ident, LBracket, NumberLit, RBracket]);
    }

    #[test]
    fn test_strings_with_escapes() {
        let (tokens, errors) = lex_with_trivia(r#""a\"b" 'c'"#);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, JavaSyntaxKind::StringLit);
        assert_eq!(tokens[0].text, r#""a\"b""#);
        assert_eq!(tokens[2].kind, JavaSyntaxKind::CharLit);
    }

    #[test]
    fn test_unterminated_literals() {
        let (tokens, errors) = lex_with_trivia("\"abc\nx");
        assert_eq!(errors.len(), 1);
        assert_eq!(tokens[0].text, "\"abc");
        assert_eq!(tokens[1].kind, JavaSyntaxKind::Newline);

        let (_, errors) = lex_with_trivia("/* never closed");
        assert_eq!(errors[0].message, "Unterminated block comment");
    }

    #[test]
    fn test_unknown_character() {
        let (tokens, errors) = lex_with_trivia("a # b");
        assert_eq!(tokens[2].kind, JavaSyntaxKind::Error);
        assert_eq!(errors[0].span, 2..3);
    }

    #[test]
    fn test_identifier_validation() {
        assert!(is_valid_identifier("foo"));
        assert!(is_valid_identifier("_x$1"));
        assert!(!is_valid_identifier("1x"));
        assert!(!is_valid_identifier("class"));
        assert!(!is_valid_identifier("goto"));
        assert!(!is_valid_identifier(""));
    }
}
