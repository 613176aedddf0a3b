mod ast;
mod bigdecimal;
mod builtins;
mod config;
mod diagnostics;
mod env;
mod error;
mod eval;
mod handles;
mod json;
mod lexer;
mod module_loader;
mod parser;
mod test_runner;
mod value;
mod websocket;

use clap::Parser as ClapParser;
use env::Environment;
use value::Value;
use std::path::PathBuf;
use std::process::ExitCode;

/// Run an AISL source file.
#[derive(ClapParser, Debug)]
#[command(name = "aisl")]
#[command(version = config::VERSION)]
#[command(about = "A tree-walking interpreter for AISL")]
struct CliArgs {
    /// Source file to execute
    #[arg(value_name = "FILE")]
    script: PathBuf,

    /// Arguments passed through to the script as `argv`
    #[arg(trailing_var_arg = true)]
    args: Vec<String>,
}

fn main() -> ExitCode {
    let cli = CliArgs::parse();
    builtins::process_env::set_argv(cli.args);

    let source = match std::fs::read_to_string(&cli.script) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Cannot read script file {}: {e}", cli.script.display());
            return ExitCode::FAILURE;
        }
    };

    let module = match parser::parse(&source) {
        Ok(m) => m,
        Err(e) => {
            diagnostics::report_fatal(&e);
            return ExitCode::FAILURE;
        }
    };

    let env = Environment::new();
    if let Err(e) = module_loader::load_module(&module, &env, Some(cli.script.as_path())) {
        diagnostics::report_fatal(&e);
        return ExitCode::FAILURE;
    }

    if !module.test_specs.is_empty() {
        return if test_runner::run(&module, &env) {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        };
    }

    match env.get("main") {
        Some(Value::Function(f)) => match eval::call_function(&f, vec![], &env) {
            Ok(Value::Int(code)) => ExitCode::from((code & 0xff) as u8),
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                diagnostics::report_fatal(&e);
                ExitCode::FAILURE
            }
        },
        _ => {
            eprintln!("Runtime error: no 'main' function defined in {}", cli.script.display());
            ExitCode::FAILURE
        }
    }
}
