use crate::tokens::{Token, TokenKind};

/// Marker returned by `Compiler::compile` on failure. The diagnostics
/// themselves are already on `stderr` by the time this value exists —
/// errors are reported as a side effect rather than carried as data.
#[derive(Debug)]
pub struct CompileError;

/// Writes a single diagnostic to `stderr` in the format
/// `[line N] Error <loc>: <msg>`, where `<loc>` is `" at end"` for `EOF`,
/// empty for scanner `ERROR` tokens, or `" at '<lexeme>'"` otherwise.
pub fn report_at(token: &Token, source: &[char], message: &str) {
  eprint!("[line {}] Error", token.line);

  match token.kind {
    TokenKind::EOF => eprint!(" at end"),
    TokenKind::ERROR(_) => {}
    _ => eprint!(" at '{}'", token.lexeme(source)),
  }

  eprintln!(": {message}");
}

/// Writes a single runtime diagnostic to `stderr`, matching the reference
/// VM's unadorned `fprintf(stderr, ...)` runtime error format.
pub fn report_runtime_error(line: usize, message: &str) {
  eprintln!("{message}");
  eprintln!("[line {line}] in script");
}
