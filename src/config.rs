/// Switches the host passes down to a run. Everything is off by default,
/// which is how files are executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Print every scanned token before parsing.
    pub print_tokens: bool,
    /// Print the AST of every parsed statement before executing.
    pub print_ast: bool,
    /// Echo the value of expression statements, and accept a bare
    /// expression without a trailing ';'. Set for the prompt.
    pub echo_expressions: bool,
}

impl Config {
    pub fn prompt(self) -> Self {
        Config {
            echo_expressions: true,
            ..self
        }
    }
}
