use std::{
    fs::read_to_string,
    io::{stdin, stdout, BufRead, BufReader, Write},
    path::PathBuf,
};

mod ast_printer;
mod config;
mod cursor;
mod env;
mod error;
mod expr;
mod interpreter;
mod parser;
mod scanner;
mod stmt;
mod token;
mod value;
mod visitor;

use anyhow::{Context, Result};
use log::debug;

pub use ast_printer::AstPrinter;
pub use config::Config;
pub use error::{Diagnostic, DiagnosticKind, ErrorSink, LexError, ParseError, Reporter, RuntimeError};
pub use expr::Expr;
pub use interpreter::{Console, Interpreter, Output};
pub use parser::Parser;
pub use scanner::Scanner;
pub use stmt::Stmt;
pub use token::{Token, TokenKind};
pub use value::Value;
pub use visitor::{ExprVisitor, StmtVisitor};

pub fn run_file(path: PathBuf, config: &Config) -> Result<Reporter> {
    let contents =
        read_to_string(&path).with_context(|| format!("could not read file {:?}", &path))?;
    let mut reporter = Reporter::new();
    let mut interpreter = Interpreter::default();
    run(&contents, &mut interpreter, &mut reporter, config);
    Ok(reporter)
}

/// Reads and runs one line at a time until an empty line, `exit` or end of
/// input. Variables persist from one line to the next.
pub fn run_prompt(config: &Config) -> Result<()> {
    let config = config.prompt();
    let mut reader = BufReader::new(stdin());
    let mut reporter = Reporter::new();
    let mut interpreter = Interpreter::default();
    loop {
        let mut buffer = String::new();
        print!("> ");
        stdout().flush().with_context(|| "could not flush stdout")?;
        if reader.read_line(&mut buffer)? == 0 {
            return Ok(());
        };
        let line = buffer.trim_end();
        if line.is_empty() || line == "exit" {
            return Ok(());
        }
        run(line, &mut interpreter, &mut reporter, &config);
        // a bad line should not poison the next one; runtime errors are
        // still remembered
        reporter.reset();
    }
}

/// Scans, parses and executes `source`. Every error goes to `sink`. Nothing
/// is executed when scanning or parsing reported an error.
pub fn run<O: Output>(
    source: &str,
    interpreter: &mut Interpreter<O>,
    sink: &mut dyn ErrorSink,
    config: &Config,
) {
    interpreter.set_echo_expressions(config.echo_expressions);

    let mut static_errors: Vec<Diagnostic> = vec![];
    let tokens = Scanner::new(source).scan_tokens(&mut static_errors);

    if config.print_tokens {
        for token in &tokens {
            println!("{}", token);
        }
    }

    if config.echo_expressions && is_bare_expression(&tokens) {
        debug!("running input as a single expression");
        let expr = match Parser::new(tokens).parse_single_expression() {
            Ok(expr) => expr,
            Err(err) => {
                static_errors.push(err.into());
                static_errors.into_iter().for_each(|err| sink.report(err));
                return;
            }
        };
        if config.print_ast {
            println!("{}", AstPrinter.visit_expr(&expr));
        }
        if !static_errors.is_empty() {
            static_errors.into_iter().for_each(|err| sink.report(err));
            return;
        }
        match interpreter.evaluate(&expr) {
            Ok(value) => interpreter.output_mut().emit(&value),
            Err(err) => sink.report(err.into()),
        }
        return;
    }

    let stmts = Parser::new(tokens).parse(&mut static_errors);

    if config.print_ast {
        for stmt in &stmts {
            println!("{}", AstPrinter.visit_stmt(stmt));
        }
    }

    if !static_errors.is_empty() {
        debug!(
            "not executing: {} lexical or parse errors",
            static_errors.len()
        );
        static_errors.into_iter().for_each(|err| sink.report(err));
        return;
    }

    if let Err(err) = interpreter.interpret(&stmts) {
        sink.report(err.into());
    }
}

/// Runs `source` in a fresh interpreter and returns what it printed along
/// with every diagnostic, in the order they were reported.
pub fn run_to_string(source: &str) -> (String, Vec<Diagnostic>) {
    let mut interpreter = Interpreter::new(String::new());
    let mut diagnostics = vec![];
    run(source, &mut interpreter, &mut diagnostics, &Config::default());
    (interpreter.into_output(), diagnostics)
}

/// Input that is neither a declaration nor a statement: no `;`, no braces
/// and not starting with `var` or `print`.
fn is_bare_expression(tokens: &[Token]) -> bool {
    let starts_statement = matches!(
        tokens.first().map(|token| token.kind),
        Some(TokenKind::Var | TokenKind::Print | TokenKind::Eof) | None
    );
    !starts_statement
        && !tokens.iter().any(|token| {
            matches!(
                token.kind,
                TokenKind::Semicolon | TokenKind::LeftBrace | TokenKind::RightBrace
            )
        })
}
