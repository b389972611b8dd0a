use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use arith_eval::tree::DisplayTree;
use arith_eval::{Compilation, Diagnostic, EvalError, Evaluation, Lexer, SyntaxNode, SyntaxTree};
use clap::{ArgAction, Parser, Subcommand};
use miette::{IntoDiagnostic, Report, WrapErr};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const EXIT_DIAGNOSTICS: u8 = 65;
const EXIT_RUNTIME: u8 = 70;

#[derive(Parser, Debug)]
#[command(about = "Evaluate arithmetic and boolean expressions")]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print every token of an expression
    Tokenize { expression: String },
    /// Print the syntax tree of an expression
    Parse { expression: String },
    /// Print the value of an expression
    Evaluate { expression: String },
    /// Read expressions from standard input, one per line
    Repl {
        /// Print the syntax tree before each result
        #[arg(long)]
        show_tree: bool,
    },
}

fn main() -> miette::Result<ExitCode> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(args.verbose))),
        )
        .with_ansi(false)
        .with_writer(io::stderr)
        .init();

    match args.command.unwrap_or(Commands::Repl { show_tree: false }) {
        Commands::Tokenize { expression } => {
            let mut lexer = Lexer::new(&expression);
            for token in lexer.by_ref() {
                println!("{token}");
            }
            let diagnostics = lexer.into_diagnostics();
            report_diagnostics(&expression, &diagnostics);
            Ok(exit_code(diagnostics.is_empty()))
        }
        Commands::Parse { expression } => {
            let tree = SyntaxTree::parse(&expression);
            print!("{}", DisplayTree(SyntaxNode::Expression(&tree.root)));
            report_diagnostics(&expression, &tree.diagnostics);
            Ok(exit_code(tree.diagnostics.is_empty()))
        }
        Commands::Evaluate { expression } => Ok(run_line(&expression, false)),
        Commands::Repl { show_tree } => repl(show_tree),
    }
}

fn repl(mut show_tree: bool) -> miette::Result<ExitCode> {
    info!(show_tree, "starting repl");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout()
            .flush()
            .into_diagnostic()
            .wrap_err("flushing the prompt failed")?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line
            .into_diagnostic()
            .wrap_err("reading standard input failed")?;

        if line.trim().is_empty() {
            break;
        }
        if line.trim() == "#tree" {
            show_tree = !show_tree;
            println!(
                "{}",
                if show_tree {
                    "showing syntax trees"
                } else {
                    "not showing syntax trees"
                }
            );
            continue;
        }

        run_line(&line, show_tree);
    }
    Ok(ExitCode::SUCCESS)
}

/// Evaluates one line, printing the value or the reasons it has none.
fn run_line(line: &str, show_tree: bool) -> ExitCode {
    let compilation = Compilation::new(line);
    if show_tree {
        print!(
            "{}",
            DisplayTree(SyntaxNode::Expression(&compilation.syntax().root))
        );
    }

    match compilation.evaluate() {
        Ok(Evaluation::Value(value)) => {
            debug!(%value, "evaluated");
            println!("{value}");
            ExitCode::SUCCESS
        }
        Ok(Evaluation::Diagnostics(diagnostics)) => {
            report_diagnostics(line, &diagnostics);
            ExitCode::from(EXIT_DIAGNOSTICS)
        }
        Err(error) => {
            report_runtime_error(line, error);
            ExitCode::from(EXIT_RUNTIME)
        }
    }
}

fn report_diagnostics(line: &str, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        let report = Report::new(diagnostic.clone()).with_source_code(line.to_string());
        eprintln!("{report:?}");
    }
}

fn report_runtime_error(line: &str, error: EvalError) {
    let report = Report::new(error).with_source_code(line.to_string());
    eprintln!("{report:?}");
}

fn exit_code(clean: bool) -> ExitCode {
    if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_DIAGNOSTICS)
    }
}

fn directive_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
