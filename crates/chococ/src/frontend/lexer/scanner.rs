//! Lexer implementation using logos, plus the indentation layout pass

use super::token::{Token, TokenKind};
use crate::common::{CompileError, CompileResult, Span};
use logos::Logos;
use std::collections::VecDeque;

const TAB_WIDTH: usize = 8;

/// Lexer for ChocoPy source code
///
/// Physical lines that hold at least one token end in `Newline`; blank and
/// comment-only lines produce nothing. A change in leading whitespace
/// yields `Indent` or one `Dedent` per closed level. At end of input every
/// open level is closed before `Eof`.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    pending: VecDeque<Token>,
    peeked: Option<Token>,
    indents: Vec<usize>,
    line_has_tokens: bool,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            pending: VecDeque::new(),
            peeked: None,
            indents: vec![0],
            line_has_tokens: false,
            at_eof: false,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> CompileResult<Token> {
        if let Some(token) = self.peeked.take() {
            return Ok(token);
        }

        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }

            if self.at_eof {
                let len = self.source().len();
                return Ok(Token::new(TokenKind::Eof, Span::new(len, len)));
            }

            match self.inner.next() {
                Some(Ok(TokenKind::Newline)) => {
                    if self.line_has_tokens {
                        self.line_has_tokens = false;
                        let span = self.inner.span();
                        return Ok(Token::new(TokenKind::Newline, Span::new(span.start, span.end)));
                    }
                }
                Some(Ok(kind)) => {
                    let span = self.inner.span();
                    let span = Span::new(span.start, span.end);
                    if !self.line_has_tokens {
                        self.line_has_tokens = true;
                        self.layout(span)?;
                    }
                    self.pending.push_back(Token::new(kind, span));
                }
                Some(Err(())) => {
                    let span = self.inner.span();
                    return Err(CompileError::lexer(
                        format!("unexpected character '{}'", self.inner.slice()),
                        Span::new(span.start, span.end),
                    ));
                }
                None => self.finish(),
            }
        }
    }

    /// Queue `Indent`/`Dedent` tokens for the first token of a line
    fn layout(&mut self, first: Span) -> CompileResult<()> {
        let column = self.column_of(first.start);
        let marker = Span::new(first.start, first.start);
        let top = self.indents.last().copied().unwrap_or(0);

        if column > top {
            self.indents.push(column);
            self.pending.push_back(Token::new(TokenKind::Indent, marker));
            return Ok(());
        }

        while column < self.indents.last().copied().unwrap_or(0) {
            self.indents.pop();
            self.pending.push_back(Token::new(TokenKind::Dedent, marker));
        }
        if self.indents.last().copied().unwrap_or(0) != column {
            return Err(CompileError::lexer(
                "unindent does not match any outer indentation level",
                first,
            ));
        }
        Ok(())
    }

    /// Column of `offset`, counting tabs to the next multiple of eight
    fn column_of(&self, offset: usize) -> usize {
        let source = self.source();
        let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
        source[line_start..offset].chars().fold(0, |col, c| match c {
            '\t' => (col / TAB_WIDTH + 1) * TAB_WIDTH,
            ' ' => col + 1,
            _ => col,
        })
    }

    fn finish(&mut self) {
        self.at_eof = true;
        let len = self.source().len();
        let marker = Span::new(len, len);
        if self.line_has_tokens {
            self.line_has_tokens = false;
            self.pending.push_back(Token::new(TokenKind::Newline, marker));
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.pending.push_back(Token::new(TokenKind::Dedent, marker));
        }
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> CompileResult<&Token> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.next_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// Tokenize the entire source and return all tokens
    pub fn tokenize_all(mut self) -> CompileResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    /// Get the source being lexed
    pub fn source(&self) -> &'a str {
        self.inner.source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize_all()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keywords() {
        let source = "class def global nonlocal pass return if elif else while for in None True False and or not is";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Class));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Def));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Global));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Nonlocal));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Pass));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Return));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::If));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Elif));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Else));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::While));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::For));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::In));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::NoneLiteral));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::True));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::False));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::And));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Or));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Not));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Is));
    }

    #[test]
    fn test_identifiers_and_literals() {
        let mut lexer = Lexer::new(r#"classy _x 42 "a\"b\n""#);

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "classy"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "_x"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::IntLiteral(s) if s == "42"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::StringLiteral(s) if s == "a\"b\n"
        ));
    }

    #[test]
    fn test_operators() {
        let source = "+ - * // % < > <= >= == != = -> . , :";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Plus));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Minus));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Star));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::SlashSlash));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Percent));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Lt));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Gt));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::LtEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::GtEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::EqEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::NotEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Assign));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Arrow));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Dot));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Comma));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Colon));
    }

    #[test]
    fn test_indent_and_dedent() {
        let source = "if x:\n    y\n    if z:\n        w\nv\n";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::If,
                TokenKind::Identifier("x".into()),
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Identifier("y".into()),
                TokenKind::Newline,
                TokenKind::If,
                TokenKind::Identifier("z".into()),
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Identifier("w".into()),
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Dedent,
                TokenKind::Identifier("v".into()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        let source = "x\n\n   # comment only\n\ny # trailing";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::Newline,
                TokenKind::Identifier("y".into()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_open_blocks_close_at_eof() {
        let source = "def f():\n\tpass";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Def,
                TokenKind::Identifier("f".into()),
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Pass,
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tab_counts_to_next_multiple_of_eight() {
        // A tab and eight spaces open the same level
        let source = "a:\n\tb\n        c\n";
        let tokens = kinds(source);
        assert_eq!(tokens.iter().filter(|k| **k == TokenKind::Indent).count(), 1);
    }

    #[test]
    fn test_inconsistent_dedent_is_an_error() {
        let source = "a:\n    b\n  c\n";
        let err = Lexer::new(source).tokenize_all().unwrap_err();
        assert!(matches!(err, CompileError::Lexer { .. }));
    }

    #[test]
    fn test_bad_escape_is_an_error() {
        let err = Lexer::new(r#""bad\q""#).tokenize_all().unwrap_err();
        assert!(matches!(err, CompileError::Lexer { .. }));
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("x = $").tokenize_all().unwrap_err();
        assert!(matches!(err, CompileError::Lexer { message, .. } if message.contains('$')));
    }
}
