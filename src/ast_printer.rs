use crate::{
    expr::Expr,
    stmt::Stmt,
    visitor::{ExprVisitor, StmtVisitor},
};

/// Renders syntax trees as parenthesized prefix notation, e.g.
/// `(+ 1.0 (* 2.0 3.0))`.
pub struct AstPrinter;

impl AstPrinter {
    fn parenthesize(&mut self, name: &str, exprs: &[&Expr]) -> String {
        let mut out = format!("({}", name);
        for expr in exprs {
            out.push(' ');
            out.push_str(&self.visit_expr(expr));
        }
        out.push(')');
        out
    }
}

impl ExprVisitor<String> for AstPrinter {
    fn visit_expr(&mut self, e: &Expr) -> String {
        match e {
            Expr::Literal(value) => value.to_string(),
            Expr::Unary(operator, right) => self.parenthesize(operator.lexeme, &[&**right]),
            Expr::Binary(left, operator, right) => {
                self.parenthesize(operator.lexeme, &[&**left, &**right])
            }
            Expr::Grouping(expr) => self.parenthesize("group", &[&**expr]),
            Expr::Variable(name) => format!("(variable access '{}')", name.lexeme),
            Expr::Assign(name, value) => format!(
                "(variable assign '{}' {})",
                name.lexeme,
                self.visit_expr(value)
            ),
        }
    }
}

impl StmtVisitor<String> for AstPrinter {
    fn visit_stmt(&mut self, s: &Stmt) -> String {
        match s {
            Stmt::Expression(expr) => self.parenthesize("expr", &[expr]),
            Stmt::Print(expr) => self.parenthesize("print", &[expr]),
            Stmt::Var(name, None) => format!("(var '{}')", name.lexeme),
            Stmt::Var(name, Some(initializer)) => format!(
                "(var '{}' {})",
                name.lexeme,
                self.visit_expr(initializer)
            ),
            Stmt::Block(stmts) => {
                let mut out = String::from("(block");
                for stmt in stmts {
                    out.push(' ');
                    out.push_str(&self.visit_stmt(stmt));
                }
                out.push(')');
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Diagnostic;
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn print_expr(source: &str) -> String {
        let mut errors: Vec<Diagnostic> = vec![];
        let tokens = Scanner::new(source).scan_tokens(&mut errors);
        let expr = Parser::new(tokens).parse_single_expression().unwrap();
        AstPrinter.visit_expr(&expr)
    }

    #[test]
    fn prints_expressions() {
        assert_eq!(print_expr("a = 3"), "(variable assign 'a' 3.0)");
        assert_eq!(print_expr("1+3"), "(+ 1.0 3.0)");
        assert_eq!(print_expr("1+2*3"), "(+ 1.0 (* 2.0 3.0))");
        assert_eq!(print_expr("(1+2)*3"), "(* (group (+ 1.0 2.0)) 3.0)");
        assert_eq!(print_expr("1337"), "1337.0");
        assert_eq!(print_expr("-1"), "(- 1.0)");
        assert_eq!(print_expr("a"), "(variable access 'a')");
        assert_eq!(print_expr("!nil == \"x\""), "(== (! nil) x)");
    }

    #[test]
    fn prints_statements() {
        let mut errors: Vec<Diagnostic> = vec![];
        let tokens = Scanner::new("var a; { var b = 1; print b; a; }").scan_tokens(&mut errors);
        let stmts = Parser::new(tokens).parse(&mut errors);
        let printed: Vec<String> = stmts.iter().map(|s| AstPrinter.visit_stmt(s)).collect();
        assert_eq!(
            printed,
            [
                "(var 'a')",
                "(block (var 'b' 1.0) (print (variable access 'b')) (expr (variable access 'a')))",
            ]
        );
    }
}
