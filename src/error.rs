use std::fmt;

use thiserror::Error;

use crate::token::Token;

/// A character sequence the scanner could not turn into a token.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("[line {line}] {message}")]
pub struct LexError {
    pub line: u32,
    pub message: String,
}

/// A structural parse failure, carried up to the statement loop which
/// reports it and synchronizes.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("[line {line}] at '{lexeme}': {message}")]
pub struct ParseError {
    pub line: u32,
    pub lexeme: String,
    pub message: String,
}

impl ParseError {
    pub fn new(token: &Token, message: impl Into<String>) -> Self {
        ParseError {
            line: token.line,
            lexeme: token.lexeme.to_owned(),
            message: message.into(),
        }
    }
}

/// An error raised while evaluating. Aborts the current batch of statements.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("[line {line}] at '{lexeme}': {message}")]
pub struct RuntimeError {
    pub line: u32,
    pub lexeme: String,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: &Token, message: impl Into<String>) -> Self {
        RuntimeError {
            line: token.line,
            lexeme: token.lexeme.to_owned(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexical,
    Parse,
    Runtime,
}

/// What an error sink receives: where the problem is and what it is.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub line: u32,
    /// Empty for lexical errors and for errors at end of input.
    pub lexeme: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lexeme.is_empty() {
            write!(f, "[line {}] Error: {}", self.line, self.message)
        } else {
            write!(
                f,
                "[line {}] Error at '{}': {}",
                self.line, self.lexeme, self.message
            )
        }
    }
}

impl From<LexError> for Diagnostic {
    fn from(err: LexError) -> Self {
        Diagnostic {
            kind: DiagnosticKind::Lexical,
            line: err.line,
            lexeme: String::new(),
            message: err.message,
        }
    }
}

impl From<ParseError> for Diagnostic {
    fn from(err: ParseError) -> Self {
        Diagnostic {
            kind: DiagnosticKind::Parse,
            line: err.line,
            lexeme: err.lexeme,
            message: err.message,
        }
    }
}

impl From<RuntimeError> for Diagnostic {
    fn from(err: RuntimeError) -> Self {
        Diagnostic {
            kind: DiagnosticKind::Runtime,
            line: err.line,
            lexeme: err.lexeme,
            message: err.message,
        }
    }
}

/// Receives every error the scanner, parser and interpreter produce.
pub trait ErrorSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects diagnostics in order; handy for tests and for callers that want
/// to format errors themselves.
impl ErrorSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Prints diagnostics to stderr and remembers whether any were seen.
#[derive(Debug, Default)]
pub struct Reporter {
    had_error: bool,
    had_runtime_error: bool,
}

impl Reporter {
    pub fn new() -> Self {
        Reporter::default()
    }

    /// True once a lexical or parse error was reported.
    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Forgets lexical and parse errors. Runtime errors stay recorded.
    pub fn reset(&mut self) {
        self.had_error = false;
    }
}

impl ErrorSink for Reporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        eprintln!("{}", diagnostic);
        match diagnostic.kind {
            DiagnosticKind::Lexical | DiagnosticKind::Parse => self.had_error = true,
            DiagnosticKind::Runtime => self.had_runtime_error = true,
        }
    }
}
