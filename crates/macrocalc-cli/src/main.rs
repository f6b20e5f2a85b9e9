mod diagnostics;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use owo_colors::OwoColorize;
use tracing::{debug, Level};

use diagnostics::{render_error, Stage};
use macrocalc_interpreter::Interpreter;
use macrocalc_lexer::Lexer;
use macrocalc_parser::Parser as MacroParser;
use macrocalc_syntax::symbols::SymbolTable;

#[derive(Parser, Debug)]
#[command(name = "macrocalc", version, about = "Run a MacroCalc script")]
struct Cli {
    /// Script to run
    path: PathBuf,

    /// Print the parsed syntax tree instead of running the script
    #[arg(long = "dump-ast", default_value_t = false)]
    dump_ast: bool,

    /// Only parse the script and report errors
    #[arg(long = "check", default_value_t = false)]
    check: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let src = match fs::read_to_string(&cli.path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "{}: {}",
                "error".red().bold(),
                format!("Failed to read {}: {}", cli.path.display(), e).red()
            );
            return ExitCode::FAILURE;
        }
    };
    debug!(path = %cli.path.display(), bytes = src.len(), "loaded script");

    let tokens = match Lexer::new(&src).tokenize() {
        Ok(t) => t,
        Err(e) => {
            render_error(Stage::Lex, &src, &e);
            return ExitCode::FAILURE;
        }
    };

    let mut symbols = SymbolTable::new();
    let program = match MacroParser::new(tokens, &mut symbols).parse_program() {
        Ok(p) => p,
        Err(e) => {
            render_error(Stage::Parse, &src, &e);
            return ExitCode::FAILURE;
        }
    };

    if cli.dump_ast {
        println!("{}", program);
        return ExitCode::SUCCESS;
    }
    if cli.check {
        return ExitCode::SUCCESS;
    }

    let mut interp = Interpreter::new(io::stdout().lock());
    if let Err(e) = interp.run(&program, &mut symbols) {
        render_error(Stage::Run, &src, &e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
