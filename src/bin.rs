use std::process;

use anyhow::Result;
use structopt::StructOpt;
use ybor_lib::{run_file, run_prompt, Config};

/// Run a ybor script, or start a prompt when no script is given.
#[derive(StructOpt)]
struct Cli {
    /// Print every token before parsing.
    #[structopt(long)]
    print_tokens: bool,

    /// Print the syntax tree of every statement before running it.
    #[structopt(long)]
    print_ast: bool,

    /// Path to a ybor file.
    #[structopt(parse(from_os_str))]
    script: Option<std::path::PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Cli::from_args();
    let config = Config {
        print_tokens: args.print_tokens,
        print_ast: args.print_ast,
        ..Config::default()
    };

    match args.script {
        Some(path) => {
            let reporter = run_file(path, &config)?;
            if reporter.had_error() {
                process::exit(65);
            }
            if reporter.had_runtime_error() {
                process::exit(70);
            }
            Ok(())
        }
        None => run_prompt(&config),
    }
}
