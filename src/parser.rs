use log::debug;

use crate::{
    cursor::Cursor,
    error::{ErrorSink, ParseError},
    expr::Expr,
    stmt::Stmt,
    token::{Token, TokenKind},
    value::Value,
};

type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
        }
    }

    /// Parses a whole program. A malformed declaration is reported to `sink`
    /// and skipped; everything else that parses is returned.
    pub fn parse(&mut self, sink: &mut dyn ErrorSink) -> Vec<Stmt<'a>> {
        let mut statements = vec![];
        while !self.cursor.is_at_end() {
            let start = self.cursor.index();
            match self.parse_declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    debug!("parse error, synchronizing: {}", err);
                    sink.report(err.into());
                    self.synchronize(start);
                }
            }
        }
        debug!("parsed {} statements", statements.len());
        statements
    }

    /// Parses exactly one bare expression, e.g. a line typed at the prompt.
    pub fn parse_single_expression(&mut self) -> ParseResult<Expr<'a>> {
        let expr = self.parse_expression()?;
        if !self.cursor.is_at_end() {
            return Err(ParseError::new(
                self.cursor.peek(),
                "Expected end of expression.",
            ));
        }
        Ok(expr)
    }

    fn parse_declaration(&mut self) -> ParseResult<Stmt<'a>> {
        if self.eat(TokenKind::Var) {
            self.parse_var_declaration()
        } else {
            self.parse_statement()
        }
    }

    fn parse_statement(&mut self) -> ParseResult<Stmt<'a>> {
        if self.eat(TokenKind::Print) {
            self.parse_print_statement()
        } else if self.eat(TokenKind::LeftBrace) {
            Ok(Stmt::Block(self.parse_block()?))
        } else {
            self.parse_expression_statement()
        }
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Stmt<'a>> {
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "Expected ';' after expression.")?;
        Ok(Stmt::Expression(expr))
    }

    fn parse_print_statement(&mut self) -> ParseResult<Stmt<'a>> {
        let value = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "Expected ';' after value.")?;
        Ok(Stmt::Print(value))
    }

    fn parse_block(&mut self) -> ParseResult<Vec<Stmt<'a>>> {
        let mut statements = vec![];
        while !self.check(TokenKind::RightBrace) && !self.cursor.is_at_end() {
            statements.push(self.parse_declaration()?);
        }
        self.expect(TokenKind::RightBrace, "Expected '}' after block.")?;
        Ok(statements)
    }

    fn parse_var_declaration(&mut self) -> ParseResult<Stmt<'a>> {
        let name = self.expect(TokenKind::Identifier, "Expected variable name.")?;
        let initializer = if self.eat(TokenKind::Equal) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(
            TokenKind::Semicolon,
            "Expected ';' after variable declaration.",
        )?;
        Ok(Stmt::Var(name, initializer))
    }

    fn parse_expression(&mut self) -> ParseResult<Expr<'a>> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> ParseResult<Expr<'a>> {
        let expr = self.parse_equality()?;
        if self.eat(TokenKind::Equal) {
            let equals = self.cursor.previous().clone();
            let value = self.parse_assignment()?;
            match expr {
                Expr::Variable(name) => Ok(Expr::Assign(name, Box::new(value))),
                _ => Err(ParseError::new(&equals, "Invalid assignment target.")),
            }
        } else {
            Ok(expr)
        }
    }

    fn parse_equality(&mut self) -> ParseResult<Expr<'a>> {
        let mut expr = self.parse_comparison()?;
        while self.cursor.peek().is_equality() {
            let operator = self.cursor.advance().clone();
            let right = self.parse_comparison()?;
            expr = Expr::Binary(Box::new(expr), operator, Box::new(right))
        }
        Ok(expr)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr<'a>> {
        let mut expr = self.parse_term()?;
        while self.cursor.peek().is_comparison() {
            let operator = self.cursor.advance().clone();
            let right = self.parse_term()?;
            expr = Expr::Binary(Box::new(expr), operator, Box::new(right))
        }
        Ok(expr)
    }

    fn parse_term(&mut self) -> ParseResult<Expr<'a>> {
        let mut expr = self.parse_factor()?;
        while self.cursor.peek().is_term() {
            let operator = self.cursor.advance().clone();
            let right = self.parse_factor()?;
            expr = Expr::Binary(Box::new(expr), operator, Box::new(right))
        }
        Ok(expr)
    }

    fn parse_factor(&mut self) -> ParseResult<Expr<'a>> {
        let mut expr = self.parse_unary()?;
        while self.cursor.peek().is_factor() {
            let operator = self.cursor.advance().clone();
            let right = self.parse_unary()?;
            expr = Expr::Binary(Box::new(expr), operator, Box::new(right))
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr<'a>> {
        if self.cursor.peek().is_unary() {
            let operator = self.cursor.advance().clone();
            let right = self.parse_unary()?;
            Ok(Expr::Unary(operator, Box::new(right)))
        } else {
            self.parse_primary()
        }
    }

    fn parse_primary(&mut self) -> ParseResult<Expr<'a>> {
        let token = self.cursor.peek().clone();
        let expr = match token.kind {
            TokenKind::False => Expr::Literal(Value::Bool(false)),
            TokenKind::True => Expr::Literal(Value::Bool(true)),
            TokenKind::Nil => Expr::Literal(Value::Nil),
            TokenKind::Number | TokenKind::String => match &token.literal {
                Some(value) => Expr::Literal(value.clone()),
                None => return Err(ParseError::new(&token, "Expected a literal value.")),
            },
            TokenKind::Identifier => Expr::Variable(token),
            TokenKind::LeftParen => {
                self.bump();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RightParen, "Expected ')' after expression.")?;
                return Ok(Expr::Grouping(Box::new(expr)));
            }
            _ => return Err(ParseError::new(&token, "Expected expression.")),
        };
        self.bump();
        Ok(expr)
    }

    /// Discards tokens until a statement boundary: just past a ';', right
    /// before a 'var' or 'print', or at the end of input. `start` is where
    /// the failed declaration began; at least one token is always skipped
    /// past it so the statement loop cannot spin.
    fn synchronize(&mut self, start: usize) {
        if self.cursor.index() == start && self.cursor.advance().kind == TokenKind::Semicolon {
            return;
        }
        while !self.cursor.is_at_end() {
            match self.cursor.peek().kind {
                TokenKind::Semicolon => {
                    self.bump();
                    return;
                }
                TokenKind::Var | TokenKind::Print => return,
                _ => self.bump(),
            }
        }
    }

    /// Expects and consumes a token of kind `kind`. Signals an error if the
    /// next token is anything else.
    fn expect(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token<'a>> {
        if self.check(kind) {
            Ok(self.cursor.advance().clone())
        } else {
            Err(ParseError::new(self.cursor.peek(), message))
        }
    }

    /// Consumes one token (moves the cursor forward by one).
    fn bump(&mut self) {
        self.cursor.advance();
    }

    /// Checks if the next token is of kind `kind`.
    fn check(&self, kind: TokenKind) -> bool {
        self.cursor.peek().kind == kind
    }

    /// Consumes the next token if it is of kind `kind`. Returns whether it
    /// was present.
    fn eat(&mut self, kind: TokenKind) -> bool {
        let is_present = self.check(kind);
        if is_present {
            self.bump()
        }
        is_present
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Diagnostic;
    use crate::scanner::Scanner;

    fn parse_source(source: &str) -> (Vec<Stmt>, Vec<Diagnostic>) {
        let mut errors = vec![];
        let tokens = Scanner::new(source).scan_tokens(&mut errors);
        let stmts = Parser::new(tokens).parse(&mut errors);
        (stmts, errors)
    }

    fn number(value: f64) -> Box<Expr<'static>> {
        Box::new(Expr::Literal(Value::Number(value)))
    }

    #[test]
    fn parse_print_stmt() {
        let tokens = vec![
            Token::new(TokenKind::Print, "print", 1),
            Token::with_literal(TokenKind::String, "\"one\"", Value::String("one".into()), 1),
            Token::new(TokenKind::Semicolon, ";", 1),
            Token::eof(2),
        ];
        let mut errors: Vec<Diagnostic> = vec![];
        let result = Parser::new(tokens).parse(&mut errors);
        let expected = vec![Stmt::Print(Expr::Literal(Value::String("one".into())))];
        assert_eq!(result, expected);
        assert!(errors.is_empty());
    }

    #[test]
    fn parse_simple_sum_from_manual_tokens() {
        let tokens = vec![
            Token::with_literal(TokenKind::Number, "1", Value::Number(1.0), 1),
            Token::new(TokenKind::Plus, "+", 1),
            Token::with_literal(TokenKind::Number, "2", Value::Number(2.0), 1),
            Token::eof(1),
        ];
        let expr = Parser::new(tokens).parse_single_expression().unwrap();
        assert_eq!(
            expr,
            Expr::Binary(number(1.0), Token::new(TokenKind::Plus, "+", 1), number(2.0))
        );
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let mut errors: Vec<Diagnostic> = vec![];
        let tokens = Scanner::new("1+2*3").scan_tokens(&mut errors);
        let expr = Parser::new(tokens).parse_single_expression().unwrap();
        let product = Expr::Binary(number(2.0), Token::new(TokenKind::Star, "*", 1), number(3.0));
        assert_eq!(
            expr,
            Expr::Binary(
                number(1.0),
                Token::new(TokenKind::Plus, "+", 1),
                Box::new(product)
            )
        );
    }

    #[test]
    fn parentheses_group_first() {
        let mut errors: Vec<Diagnostic> = vec![];
        let tokens = Scanner::new("(1+2)*3").scan_tokens(&mut errors);
        let expr = Parser::new(tokens).parse_single_expression().unwrap();
        let sum = Expr::Binary(number(1.0), Token::new(TokenKind::Plus, "+", 1), number(2.0));
        assert_eq!(
            expr,
            Expr::Binary(
                Box::new(Expr::Grouping(Box::new(sum))),
                Token::new(TokenKind::Star, "*", 1),
                number(3.0)
            )
        );
    }

    #[test]
    fn binary_operators_are_left_associative() {
        let mut errors: Vec<Diagnostic> = vec![];
        let tokens = Scanner::new("1-2-3").scan_tokens(&mut errors);
        let expr = Parser::new(tokens).parse_single_expression().unwrap();
        let minus = || Token::new(TokenKind::Minus, "-", 1);
        let inner = Expr::Binary(number(1.0), minus(), number(2.0));
        assert_eq!(expr, Expr::Binary(Box::new(inner), minus(), number(3.0)));
    }

    #[test]
    fn assignment_is_right_associative() {
        let mut errors: Vec<Diagnostic> = vec![];
        let tokens = Scanner::new("a = b = 1").scan_tokens(&mut errors);
        let expr = Parser::new(tokens).parse_single_expression().unwrap();
        let a = Token::new(TokenKind::Identifier, "a", 1);
        let b = Token::new(TokenKind::Identifier, "b", 1);
        assert_eq!(
            expr,
            Expr::Assign(a, Box::new(Expr::Assign(b, number(1.0))))
        );
    }

    #[test]
    fn single_expression_rejects_trailing_tokens() {
        let mut errors: Vec<Diagnostic> = vec![];
        let tokens = Scanner::new("1 2").scan_tokens(&mut errors);
        let err = Parser::new(tokens).parse_single_expression().unwrap_err();
        assert_eq!(err.lexeme, "2");
        assert_eq!(err.message, "Expected end of expression.");
    }

    #[test]
    fn single_expression_reports_missing_operand() {
        let mut errors: Vec<Diagnostic> = vec![];
        let tokens = Scanner::new("1 +").scan_tokens(&mut errors);
        let err = Parser::new(tokens).parse_single_expression().unwrap_err();
        assert_eq!(err.message, "Expected expression.");
        assert_eq!(err.lexeme, "");
    }

    #[test]
    fn parse_declarations_and_blocks() {
        let (stmts, errors) = parse_source("var a; { var b = a; print b; }");
        assert!(errors.is_empty());
        let a = Token::new(TokenKind::Identifier, "a", 1);
        let b = Token::new(TokenKind::Identifier, "b", 1);
        assert_eq!(
            stmts,
            vec![
                Stmt::Var(a.clone(), None),
                Stmt::Block(vec![
                    Stmt::Var(b.clone(), Some(Expr::Variable(a))),
                    Stmt::Print(Expr::Variable(b)),
                ]),
            ]
        );
    }

    #[test]
    fn recovers_from_missing_semicolon() {
        let (stmts, errors) = parse_source("var a = 3\nvar b = 4;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 2);
        assert_eq!(errors[0].lexeme, "var");
        assert_eq!(
            errors[0].message,
            "Expected ';' after variable declaration."
        );
        assert_eq!(
            stmts,
            vec![Stmt::Var(
                Token::new(TokenKind::Identifier, "b", 2),
                Some(Expr::Literal(Value::Number(4.0)))
            )]
        );
    }

    #[test]
    fn recovery_skips_to_next_semicolon() {
        let (stmts, errors) = parse_source("print 1 + ; 1 ) 2; print 3;");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].lexeme, ";");
        assert_eq!(errors[1].lexeme, ")");
        assert_eq!(
            stmts,
            vec![Stmt::Print(Expr::Literal(Value::Number(3.0)))]
        );
    }

    #[test]
    fn stray_semicolon_does_not_swallow_next_statement() {
        let (stmts, errors) = parse_source("; x;");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            stmts,
            vec![Stmt::Expression(Expr::Variable(Token::new(
                TokenKind::Identifier,
                "x",
                1
            )))]
        );
    }

    #[test]
    fn invalid_assignment_target_is_an_error() {
        let (stmts, errors) = parse_source("(a) = 3; 1 + 2 = 3; a = 1;");
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|err| err.message == "Invalid assignment target." && err.lexeme == "="));
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn unclosed_block_is_an_error() {
        let (stmts, errors) = parse_source("{ print 1;");
        assert!(stmts.is_empty());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Expected '}' after block.");
    }

    #[test]
    fn reserved_keywords_are_not_statements() {
        let (stmts, errors) = parse_source("while; print 1;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].lexeme, "while");
        assert_eq!(stmts.len(), 1);
    }
}
