use std::io::{self, Write};
use std::process;

use virtual_machine::{interpret, InterpretResult};

fn main() {
  let args: Vec<String> = std::env::args().collect();

  match args.len() {
    1 => repl(),
    2 => run_file(&args[1]),
    _ => {
      eprintln!("Usage: lox [path]");
      process::exit(64);
    }
  }
}

/// Reads one line at a time from stdin and interprets it immediately,
/// printing a `>` prompt before each. Exits on EOF (e.g. Ctrl-D).
fn repl() {
  let stdin = io::stdin();
  let mut line = String::new();

  loop {
    print!("> ");
    io::stdout().flush().expect("stdout flush should not fail");

    line.clear();
    let bytes_read = stdin.read_line(&mut line).expect("stdin read should not fail");
    if bytes_read == 0 {
      println!();
      break;
    }

    interpret(&line);
  }
}

fn run_file(path: &str) {
  let source = std::fs::read_to_string(path).unwrap_or_else(|err| {
    eprintln!("Could not read file \"{path}\": {err}");
    process::exit(74);
  });

  match interpret(&source) {
    InterpretResult::Ok => process::exit(0),
    InterpretResult::CompileError => process::exit(65),
    InterpretResult::RuntimeError => process::exit(70),
  }
}
