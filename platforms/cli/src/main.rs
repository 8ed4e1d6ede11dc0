use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tur::{halted, step, Machine, Program, ProgramLoader, Symbol};

/// A command-line front end for running `.tur` programs to completion.
#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Path to a Turing machine program file (.tur)
    program: String,

    /// Numeric bootstrap inputs, one per the program's declared `inputs` count
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    inputs: Vec<String>,

    /// Print every step (state, head offset, symbol under head) before it runs
    #[clap(short = 'd', long)]
    debug: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let program = match ProgramLoader::load_program(Path::new(&cli.program)) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("error loading program: {e}");
            return ExitCode::from(1);
        }
    };

    let inputs = match resolve_inputs(&program, &cli.inputs) {
        Ok(inputs) => inputs,
        Err(code) => return code,
    };

    let mut machine = Machine::new(&program, &inputs).expect("arity already checked by resolve_inputs");

    if cli.debug {
        run_with_debug(&mut machine, &program);
    } else {
        while !halted(&machine) {
            step(&mut machine, &program);
        }
    }

    print_tape(&machine);
    println!("state: {}", state_label(&machine));

    ExitCode::SUCCESS
}

/// Validates argument count (exit 2 on mismatch) then parses every argument
/// as a non-negative decimal integer (exit 3 on the first failure).
fn resolve_inputs(program: &Program, raw: &[String]) -> Result<Vec<u64>, ExitCode> {
    if raw.len() as u64 != program.num_inputs() {
        eprintln!(
            "error: expected {} input value(s), got {}",
            program.num_inputs(),
            raw.len()
        );
        return Err(ExitCode::from(2));
    }

    let mut inputs = Vec::with_capacity(raw.len());
    for arg in raw {
        match Symbol::from(arg.as_str()).parse_i64() {
            Ok(n) if n >= 0 => inputs.push(n as u64),
            Ok(n) => {
                eprintln!("error: input '{n}' must be non-negative");
                return Err(ExitCode::from(3));
            }
            Err(_) => {
                eprintln!("error: '{arg}' is not a valid number");
                return Err(ExitCode::from(3));
            }
        }
    }

    Ok(inputs)
}

fn run_with_debug(machine: &mut Machine, program: &Program) {
    let mut step_count = 0usize;
    while !halted(machine) {
        tracing::debug!(
            step = step_count,
            state = %state_label(machine),
            head = machine.head_position(),
            symbol = %(machine.read() as char),
            "step"
        );
        step(machine, program);
        step_count += 1;
    }
    tracing::debug!(steps = step_count, state = %state_label(machine), "halted");
}

fn state_label(machine: &Machine) -> String {
    machine
        .current_state()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "<error>".to_string())
}

/// Prints a fixed window of tape cells around the head, with the head's
/// cell bracketed.
fn print_tape(machine: &Machine) {
    const WINDOW: i64 = 20;
    let mut line = String::new();
    for offset in -WINDOW..=WINDOW {
        let b = machine.peek(offset) as char;
        if offset == 0 {
            line.push('[');
            line.push(b);
            line.push(']');
        } else {
            line.push(' ');
            line.push(b);
        }
    }
    println!("{line}");
}
