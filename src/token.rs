use std::fmt::{Display, Formatter, Result};

use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    /// Only set for String and Number tokens.
    pub literal: Option<Value>,
    pub line: u32,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, lexeme: &'a str, line: u32) -> Self {
        Token {
            kind,
            lexeme,
            literal: None,
            line,
        }
    }

    pub fn with_literal(kind: TokenKind, lexeme: &'a str, literal: Value, line: u32) -> Self {
        Token {
            kind,
            lexeme,
            literal: Some(literal),
            line,
        }
    }

    pub fn eof(line: u32) -> Self {
        Token::new(TokenKind::Eof, "", line)
    }

    pub fn is_equality(&self) -> bool {
        matches!(self.kind, TokenKind::BangEqual | TokenKind::EqualEqual)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Greater | TokenKind::GreaterEqual | TokenKind::Less | TokenKind::LessEqual
        )
    }

    pub fn is_term(&self) -> bool {
        matches!(self.kind, TokenKind::Minus | TokenKind::Plus)
    }

    pub fn is_factor(&self) -> bool {
        matches!(self.kind, TokenKind::Slash | TokenKind::Star)
    }

    pub fn is_unary(&self) -> bool {
        matches!(self.kind, TokenKind::Bang | TokenKind::Minus)
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[line {}] {:?} ({})", self.line, self.lexeme, self.kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Single-character tokens
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals
    Identifier,
    String,
    Number,

    // Keywords
    And,
    Else,
    False,
    For,
    Fun,
    If,
    Nil,
    Or,
    Print,
    Return,
    This,
    True,
    Var,
    While,

    Eof,
}

impl TokenKind {
    /// Looks up a reserved word.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        let kind = match text {
            "and" => TokenKind::And,
            "else" => TokenKind::Else,
            "false" => TokenKind::False,
            "for" => TokenKind::For,
            "fun" => TokenKind::Fun,
            "if" => TokenKind::If,
            "nil" => TokenKind::Nil,
            "or" => TokenKind::Or,
            "print" => TokenKind::Print,
            "return" => TokenKind::Return,
            "this" => TokenKind::This,
            "true" => TokenKind::True,
            "var" => TokenKind::Var,
            "while" => TokenKind::While,
            _ => return None,
        };
        Some(kind)
    }

    /// The fixed source text of this kind of token, if it has one.
    pub fn canonical(&self) -> Option<&'static str> {
        let text = match self {
            // Single-character tokens
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Minus => "-",
            TokenKind::Plus => "+",
            TokenKind::Semicolon => ";",
            TokenKind::Slash => "/",
            TokenKind::Star => "*",

            // One or two character tokens
            TokenKind::Bang => "!",
            TokenKind::BangEqual => "!=",
            TokenKind::Equal => "=",
            TokenKind::EqualEqual => "==",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",

            // Keywords
            TokenKind::And => "and",
            TokenKind::Else => "else",
            TokenKind::False => "false",
            TokenKind::For => "for",
            TokenKind::Fun => "fun",
            TokenKind::If => "if",
            TokenKind::Nil => "nil",
            TokenKind::Or => "or",
            TokenKind::Print => "print",
            TokenKind::Return => "return",
            TokenKind::This => "this",
            TokenKind::True => "true",
            TokenKind::Var => "var",
            TokenKind::While => "while",

            TokenKind::Identifier | TokenKind::String | TokenKind::Number | TokenKind::Eof => {
                return None
            }
        };
        Some(text)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.canonical() {
            Some(text) => write!(f, "{}", text),
            None => match self {
                TokenKind::Identifier => write!(f, "<IDENTIFIER>"),
                TokenKind::String => write!(f, "<STRING>"),
                TokenKind::Number => write!(f, "<NUMBER>"),
                _ => write!(f, "<EOF>"),
            },
        }
    }
}
