use std::{
    fs,
    io::{self, BufRead},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use stackgolf::{Interpreter, Repl, StackGolfError};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "STACKGOLF_LOG";

#[derive(Parser)]
#[command(author, version, about = "Stack-based golfing language interpreter")]
struct Args {
    /// Log every executed word to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a program given on the command line
    Eval { source: String },
    /// Run the first line of a script file
    Run { script: PathBuf },
    /// Start an interactive REPL session
    Repl,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        None => read_program().and_then(|source| run_program(&source)),
        Some(Command::Eval { source }) => run_program(&source),
        Some(Command::Run { script }) => {
            first_line(script).and_then(|source| run_program(&source))
        }
        Some(Command::Repl) => Repl::new().run(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new("debug"),
        Err(_) => return,
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

/// The program is the first line of standard input. The rest of the stream
/// stays available to `l` and `t`.
fn read_program() -> Result<String, StackGolfError> {
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        let missing = io::Error::new(io::ErrorKind::UnexpectedEof, "no program on standard input");
        return Err(missing.into());
    }
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

fn first_line(path: PathBuf) -> Result<String, StackGolfError> {
    let contents = fs::read_to_string(&path)?;
    Ok(contents.lines().next().unwrap_or_default().to_string())
}

fn run_program(source: &str) -> Result<(), StackGolfError> {
    let mut interpreter = Interpreter::new();
    interpreter.eval_source(source)?;
    println!("{}", interpreter.render());
    Ok(())
}
