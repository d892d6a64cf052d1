use crate::token::{Token, TokenKind};

/// Forward-only cursor over a scanned token stream. The stream always ends
/// in an Eof token and the cursor never moves past it.
#[derive(Debug)]
pub struct Cursor<'a> {
    stream: Vec<Token<'a>>,
    index: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(mut stream: Vec<Token<'a>>) -> Self {
        if stream.last().map(|token| token.kind) != Some(TokenKind::Eof) {
            let line = stream.last().map_or(1, |token| token.line);
            stream.push(Token::eof(line));
        }
        Cursor { stream, index: 0 }
    }

    /// The token that will be consumed next.
    pub fn peek(&self) -> &Token<'a> {
        &self.stream[self.index]
    }

    /// The most recently consumed token, or the first one if nothing was
    /// consumed yet.
    pub fn previous(&self) -> &Token<'a> {
        &self.stream[self.index.saturating_sub(1)]
    }

    pub fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Consumes one token and returns it. Stays on Eof.
    pub fn advance(&mut self) -> &Token<'a> {
        if !self.is_at_end() {
            self.index += 1;
        }
        self.previous()
    }

    pub fn index(&self) -> usize {
        self.index
    }
}
