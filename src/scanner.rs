use std::str::CharIndices;

use itertools::{Itertools, MultiPeek};
use log::{debug, trace};

use crate::error::{ErrorSink, LexError};
use crate::token::{Token, TokenKind};
use crate::value::Value;

type CharIter<'a> = MultiPeek<CharIndices<'a>>;

type ScanResult<'a> = Result<Option<Token<'a>>, LexError>;

pub struct Scanner<'a> {
    source: &'a str,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner { source }
    }

    /// Scans the whole source. Lexical errors go to `sink` and the offending
    /// input is skipped, so this always returns a token list ending in Eof.
    pub fn scan_tokens(&self, sink: &mut dyn ErrorSink) -> Vec<Token<'a>> {
        let mut iter = self.source.char_indices().multipeek();
        let mut tokens: Vec<Token<'a>> = vec![];
        let mut line: u32 = 1;

        loop {
            match self.scan_token(&mut iter, &mut line) {
                Ok(Some(token)) => {
                    trace!("scanned {}", token);
                    tokens.push(token);
                }
                Ok(None) => break,
                Err(err) => sink.report(err.into()),
            }
        }

        tokens.push(Token::eof(line));
        debug!("scanned {} tokens over {} lines", tokens.len(), line);

        tokens
    }

    fn scan_token(&self, iter: &mut CharIter<'a>, line: &mut u32) -> ScanResult<'a> {
        loop {
            iter.reset_peek(); // reset the "peek" cursor

            let (start, char) = match iter.next() {
                Some(pair) => pair,
                // No more tokens left.
                None => return Ok(None),
            };

            // in most cases we return a token, but on whitespace,
            // newlines or comments we continue the loop instead
            let kind = match char {
                '(' => TokenKind::LeftParen,
                ')' => TokenKind::RightParen,
                '{' => TokenKind::LeftBrace,
                '}' => TokenKind::RightBrace,
                ',' => TokenKind::Comma,
                '.' => TokenKind::Dot,
                '-' => TokenKind::Minus,
                '+' => TokenKind::Plus,
                ';' => TokenKind::Semicolon,
                '*' => TokenKind::Star,
                '!' => self.either(iter, '=', TokenKind::BangEqual, TokenKind::Bang),
                '=' => self.either(iter, '=', TokenKind::EqualEqual, TokenKind::Equal),
                '<' => self.either(iter, '=', TokenKind::LessEqual, TokenKind::Less),
                '>' => self.either(iter, '=', TokenKind::GreaterEqual, TokenKind::Greater),
                '/' => {
                    if self.peek_match(iter, |ch| ch == '/') {
                        iter.next();
                        // A comment goes until the end of the line
                        self.read_to_end_of_line(iter);
                        continue;
                    }
                    TokenKind::Slash
                }
                '"' => return self.scan_string(iter, start, line),
                ' ' | '\r' | '\t' => continue,
                '\n' => {
                    *line += 1;
                    continue;
                }
                ch if ch.is_ascii_digit() => return self.scan_number(iter, start, line),
                ch if ch.is_alphabetic() => return self.scan_identifier(iter, start, line),
                ch => {
                    return Err(LexError {
                        line: *line,
                        message: format!("Unexpected character '{}'.", ch),
                    })
                }
            };

            return Ok(Some(Token::new(
                kind,
                self.lexeme(iter, start),
                *line,
            )));
        }
    }

    /// Picks `matched` and consumes the lookahead if the next character is
    /// `next`, otherwise picks `single`.
    fn either(
        &self,
        iter: &mut CharIter,
        next: char,
        matched: TokenKind,
        single: TokenKind,
    ) -> TokenKind {
        if self.peek_match(iter, |ch| ch == next) {
            iter.next();
            matched
        } else {
            single
        }
    }

    /// Returns true if there is another character to peek which matches the
    /// predicate, otherwise it returns false.
    fn peek_match<F>(&self, iter: &mut CharIter, pred: F) -> bool
    where
        F: FnOnce(char) -> bool,
    {
        iter.reset_peek();
        let matched = iter.peek().map_or(false, |pair| pred(pair.1));
        iter.reset_peek();
        matched
    }

    /// Byte offset of the next unconsumed character.
    fn offset(&self, iter: &mut CharIter) -> usize {
        iter.reset_peek();
        let offset = iter.peek().map_or(self.source.len(), |pair| pair.0);
        iter.reset_peek();
        offset
    }

    fn lexeme(&self, iter: &mut CharIter, start: usize) -> &'a str {
        let end = self.offset(iter);
        &self.source[start..end]
    }

    fn read_to_end_of_line(&self, iter: &mut CharIter) {
        while self.peek_match(iter, |ch| ch != '\n') {
            iter.next();
        }
    }

    fn scan_string(&self, iter: &mut CharIter<'a>, start: usize, line: &mut u32) -> ScanResult<'a> {
        while let Some((_, char)) = iter.next() {
            match char {
                '"' => {
                    let lexeme = self.lexeme(iter, start);
                    // the literal excludes both quotes
                    let literal = Value::String(lexeme[1..lexeme.len() - 1].to_owned());
                    return Ok(Some(Token::with_literal(
                        TokenKind::String,
                        lexeme,
                        literal,
                        *line,
                    )));
                }
                '\n' => *line += 1,
                _ => {}
            }
        }

        Err(LexError {
            line: *line,
            message: "Unterminated string.".into(),
        })
    }

    fn scan_number(&self, iter: &mut CharIter<'a>, start: usize, line: &mut u32) -> ScanResult<'a> {
        while self.peek_match(iter, |ch| ch.is_ascii_digit()) {
            iter.next();
        }

        // Look for a fractional part. A dot without a digit after it is left
        // alone so `12.` scans as a number followed by a dot.
        iter.reset_peek();
        if matches!(iter.peek(), Some((_, '.'))) && matches!(iter.peek(), Some((_, '0'..='9'))) {
            // consume the ".", reset peek lookahead
            iter.next();

            while self.peek_match(iter, |ch| ch.is_ascii_digit()) {
                iter.next();
            }
        }

        let lexeme = self.lexeme(iter, start);
        let value: f64 = lexeme.parse().map_err(|_| LexError {
            line: *line,
            message: format!("Invalid number literal '{}'.", lexeme),
        })?;

        Ok(Some(Token::with_literal(
            TokenKind::Number,
            lexeme,
            Value::Number(value),
            *line,
        )))
    }

    fn scan_identifier(&self, iter: &mut CharIter<'a>, start: usize, line: &mut u32) -> ScanResult<'a> {
        while self.peek_match(iter, |ch| ch.is_alphanumeric() || ch == '_') {
            iter.next();
        }

        let lexeme = self.lexeme(iter, start);
        let kind = TokenKind::keyword(lexeme).unwrap_or(TokenKind::Identifier);

        Ok(Some(Token::new(kind, lexeme, *line)))
    }
}
