use crate::expr::Expr;
use crate::token::Token;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt<'a> {
    Block(Vec<Stmt<'a>>),
    Expression(Expr<'a>),
    Print(Expr<'a>),
    Var(Token<'a>, Option<Expr<'a>>),
}
