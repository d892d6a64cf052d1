use generational_arena::Index;
use log::{debug, trace};

use crate::env::Scopes;
use crate::error::RuntimeError;
use crate::{
    expr::Expr,
    stmt::Stmt,
    token::{Token, TokenKind},
    value::Value,
    visitor::ExprVisitor,
    visitor::StmtVisitor,
};

type RuntimeResult<T> = Result<T, RuntimeError>;

/// Where printed values go.
pub trait Output {
    fn emit(&mut self, value: &Value);
}

/// Writes each value to stdout on its own line.
#[derive(Debug, Default)]
pub struct Console;

impl Output for Console {
    fn emit(&mut self, value: &Value) {
        println!("{}", value);
    }
}

/// Captures each value as a line of text.
impl Output for String {
    fn emit(&mut self, value: &Value) {
        self.push_str(&value.to_string());
        self.push('\n');
    }
}

pub struct Interpreter<O: Output = Console> {
    scopes: Scopes,
    active: Index,
    output: O,
    echo_expressions: bool,
}

impl Default for Interpreter<Console> {
    fn default() -> Self {
        Interpreter::new(Console)
    }
}

impl<O: Output> Interpreter<O> {
    pub fn new(output: O) -> Self {
        let scopes = Scopes::default();
        let active = scopes.global();
        Interpreter {
            scopes,
            active,
            output,
            echo_expressions: false,
        }
    }

    /// When set, expression statements send their value to the output too,
    /// which is what the prompt wants.
    pub fn set_echo_expressions(&mut self, echo: bool) {
        self.echo_expressions = echo;
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }

    /// Executes `statements` in order, stopping at the first runtime error.
    /// Global variables survive between calls, errors included.
    pub fn interpret(&mut self, statements: &[Stmt]) -> RuntimeResult<()> {
        debug!("interpreting {} statements", statements.len());
        for stmt in statements {
            self.visit_stmt(stmt)?;
        }
        Ok(())
    }

    /// Evaluates one expression against the active scope.
    pub fn evaluate(&mut self, expr: &Expr) -> RuntimeResult<Value> {
        self.visit_expr(expr)
    }

    fn execute_block(&mut self, statements: &[Stmt]) -> RuntimeResult<()> {
        // create a scope that encloses the current one and make it active
        let parent = self.active;
        let child = self.scopes.enclose(parent);
        self.active = child;
        trace!("entered scope {:?}", child);

        let result = statements.iter().try_for_each(|stmt| self.visit_stmt(stmt));

        // restore the previous scope, discarding all of the variables that
        // were defined within the block, whether or not it failed
        self.active = parent;
        self.scopes.discard(child);
        trace!("left scope {:?}", child);

        result
    }
}

impl<O: Output> StmtVisitor<RuntimeResult<()>> for Interpreter<O> {
    fn visit_stmt(&mut self, stmt: &Stmt) -> RuntimeResult<()> {
        match stmt {
            Stmt::Block(stmts) => self.execute_block(stmts),
            Stmt::Expression(expr) => {
                let value = self.visit_expr(expr)?;
                if self.echo_expressions {
                    self.output.emit(&value);
                }
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.visit_expr(expr)?;
                self.output.emit(&value);
                Ok(())
            }
            Stmt::Var(name, initializer) => {
                let value = match initializer {
                    Some(expr) => self.visit_expr(expr)?,
                    None => Value::Nil,
                };
                self.scopes.declare(self.active, name, value)
            }
        }
    }
}

impl<O: Output> ExprVisitor<RuntimeResult<Value>> for Interpreter<O> {
    fn visit_expr(&mut self, expr: &Expr) -> RuntimeResult<Value> {
        match expr {
            Expr::Assign(name, value) => {
                let evaluated = self.visit_expr(value)?;
                self.scopes.assign(self.active, name, evaluated.clone())?;
                Ok(evaluated)
            }
            Expr::Binary(left, operator, right) => {
                // both sides are evaluated, left first, before the operator
                // is looked at
                let left_val = self.visit_expr(left)?;
                let right_val = self.visit_expr(right)?;
                binary(operator, left_val, right_val)
            }
            Expr::Grouping(expr) => self.visit_expr(expr),
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Variable(name) => self.scopes.get(self.active, name),
            Expr::Unary(operator, right) => {
                let evaluated = self.visit_expr(right)?;
                match operator.kind {
                    TokenKind::Bang => Ok(Value::Bool(!evaluated.is_truthy())),
                    TokenKind::Minus => match evaluated {
                        Value::Number(x) => Ok(Value::Number(-x)),
                        _ => Err(RuntimeError::new(operator, "Operand must be a number.")),
                    },
                    _ => Err(RuntimeError::new(
                        operator,
                        format!("Unexpected unary operator: {}.", operator.kind),
                    )),
                }
            }
        }
    }
}

fn binary(operator: &Token, left: Value, right: Value) -> RuntimeResult<Value> {
    match operator.kind {
        TokenKind::Plus => match (&left, &right) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
            (Value::String(l), Value::String(r)) => Ok(Value::String(format!("{}{}", l, r))),
            _ => Err(RuntimeError::new(
                operator,
                format!("Can't sum '{}' with '{}'", left, right),
            )),
        },
        TokenKind::Minus => match (&left, &right) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l - r)),
            // removes the first occurrence of the right string
            (Value::String(l), Value::String(r)) => Ok(Value::String(l.replacen(r.as_str(), "", 1))),
            _ => Err(RuntimeError::new(
                operator,
                format!("Can't subtract '{}' from '{}'", right, left),
            )),
        },
        TokenKind::Star => match (left.as_number(), right.as_number()) {
            (Some(l), Some(r)) => Ok(Value::Number(l * r)),
            _ => Err(RuntimeError::new(
                operator,
                format!("Can't multiply '{}' with '{}'", left, right),
            )),
        },
        TokenKind::Slash => match (left.as_number(), right.as_number()) {
            (Some(_), Some(r)) if r == 0.0 => {
                Err(RuntimeError::new(operator, "Can't divide by 0"))
            }
            (Some(l), Some(r)) => Ok(Value::Number(l / r)),
            _ => Err(RuntimeError::new(
                operator,
                format!("Can't divide '{}' with '{}'", left, right),
            )),
        },
        TokenKind::Greater => compare(operator, &left, &right, |l, r| l > r),
        TokenKind::GreaterEqual => compare(operator, &left, &right, |l, r| l >= r),
        TokenKind::Less => compare(operator, &left, &right, |l, r| l < r),
        TokenKind::LessEqual => compare(operator, &left, &right, |l, r| l <= r),
        TokenKind::BangEqual => Ok(Value::Bool(left != right)),
        TokenKind::EqualEqual => Ok(Value::Bool(left == right)),
        _ => Err(RuntimeError::new(
            operator,
            format!("Unexpected binary operator: {}", operator.kind),
        )),
    }
}

fn compare<F>(operator: &Token, left: &Value, right: &Value, op: F) -> RuntimeResult<Value>
where
    F: FnOnce(f64, f64) -> bool,
{
    match (left.as_number(), right.as_number()) {
        (Some(l), Some(r)) => Ok(Value::Bool(op(l, r))),
        _ => Err(RuntimeError::new(
            operator,
            format!("Can't compare '{}' with '{}'", left, right),
        )),
    }
}
