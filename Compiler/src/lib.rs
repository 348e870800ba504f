use core::chunk::{Chunk, OpCode};
use core::errors::{report_at, CompileError};
use core::tokens::{Token, TokenKind};
use core::value::Value;
use core::MAX_CONSTANTS;
use lexer::Lexer;

/// Compiles source text directly into a [`Chunk`] in a single pass: there is
/// no intermediate syntax tree. Parsing and code generation interleave,
/// driven by [`parse_precedence`](Compiler::parse_precedence)'s
/// operator-precedence climb.
pub struct Compiler {
  lexer: Lexer,
  current: Token,
  previous: Token,
  had_error: bool,
  panic_mode: bool,
  chunk: Chunk,
}

/// Compiles `source` into a finished chunk, or returns [`CompileError`] after
/// reporting every diagnostic to `stderr`.
pub fn compile(source: &str) -> Result<Chunk, CompileError> {
  let lexer = Lexer::new(source);
  let placeholder = Token { kind: TokenKind::EOF, lexeme_start: 0, lexeme_length: 0, line: 1 };

  let mut compiler = Compiler {
    lexer,
    current: placeholder,
    previous: placeholder,
    had_error: false,
    panic_mode: false,
    chunk: Chunk::new(),
  };

  compiler.advance();
  compiler.expression();
  compiler.consume(TokenKind::EOF, "Expect end of expression.");
  compiler.emit_op(OpCode::Return);

  if compiler.had_error {
    Err(CompileError)
  } else {
    Ok(compiler.chunk)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[repr(u8)]
enum Precedence {
  None,
  Assignment,
  Or,
  And,
  Equality,
  Comparison,
  Term,
  Factor,
  Unary,
  Call,
  Primary,
}

impl Precedence {
  fn next_higher(self) -> Precedence {
    match self {
      Precedence::None => Precedence::Assignment,
      Precedence::Assignment => Precedence::Or,
      Precedence::Or => Precedence::And,
      Precedence::And => Precedence::Equality,
      Precedence::Equality => Precedence::Comparison,
      Precedence::Comparison => Precedence::Term,
      Precedence::Term => Precedence::Factor,
      Precedence::Factor => Precedence::Unary,
      Precedence::Unary => Precedence::Call,
      Precedence::Call => Precedence::Primary,
      Precedence::Primary => Precedence::Primary,
    }
  }
}

type ParseFn = fn(&mut Compiler);

struct ParseRule {
  prefix: Option<ParseFn>,
  infix: Option<ParseFn>,
  precedence: Precedence,
}

fn get_rule(kind: TokenKind) -> ParseRule {
  match kind {
    TokenKind::LEFT_PAREN => {
      ParseRule { prefix: Some(Compiler::grouping), infix: None, precedence: Precedence::None }
    }
    TokenKind::MINUS => ParseRule {
      prefix: Some(Compiler::unary),
      infix: Some(Compiler::binary),
      precedence: Precedence::Term,
    },
    TokenKind::PLUS => {
      ParseRule { prefix: None, infix: Some(Compiler::binary), precedence: Precedence::Term }
    }
    TokenKind::SLASH => {
      ParseRule { prefix: None, infix: Some(Compiler::binary), precedence: Precedence::Factor }
    }
    TokenKind::STAR => {
      ParseRule { prefix: None, infix: Some(Compiler::binary), precedence: Precedence::Factor }
    }
    TokenKind::BANG => {
      ParseRule { prefix: Some(Compiler::unary), infix: None, precedence: Precedence::None }
    }
    TokenKind::BANG_EQUAL => {
      ParseRule { prefix: None, infix: Some(Compiler::binary), precedence: Precedence::Equality }
    }
    TokenKind::EQUAL_EQUAL => {
      ParseRule { prefix: None, infix: Some(Compiler::binary), precedence: Precedence::Equality }
    }
    TokenKind::GREATER => ParseRule {
      prefix: None,
      infix: Some(Compiler::binary),
      precedence: Precedence::Comparison,
    },
    TokenKind::GREATER_EQUAL => ParseRule {
      prefix: None,
      infix: Some(Compiler::binary),
      precedence: Precedence::Comparison,
    },
    TokenKind::LESS => ParseRule {
      prefix: None,
      infix: Some(Compiler::binary),
      precedence: Precedence::Comparison,
    },
    TokenKind::LESS_EQUAL => ParseRule {
      prefix: None,
      infix: Some(Compiler::binary),
      precedence: Precedence::Comparison,
    },
    TokenKind::NUMBER => {
      ParseRule { prefix: Some(Compiler::number), infix: None, precedence: Precedence::None }
    }
    TokenKind::FALSE | TokenKind::TRUE | TokenKind::NIL => {
      ParseRule { prefix: Some(Compiler::literal), infix: None, precedence: Precedence::None }
    }
    _ => ParseRule { prefix: None, infix: None, precedence: Precedence::None },
  }
}

impl Compiler {
  fn advance(&mut self) {
    self.previous = self.current;

    loop {
      self.current = self.lexer.scan_token();
      if let TokenKind::ERROR(kind) = self.current.kind {
        self.error_at_current(kind.message());
        continue;
      }
      break;
    }
  }

  fn consume(&mut self, kind: TokenKind, message: &str) {
    if self.current.kind == kind {
      self.advance();
      return;
    }
    self.error_at_current(message);
  }

  fn expression(&mut self) {
    self.parse_precedence(Precedence::Assignment);
  }

  /// Parses and emits code for any expression whose precedence is at least
  /// `precedence`. This is the core of the Pratt algorithm: consume a
  /// prefix expression, then keep folding in infix operators for as long as
  /// the next operator binds at least as tightly as `precedence`.
  fn parse_precedence(&mut self, precedence: Precedence) {
    self.advance();
    let prefix_rule = get_rule(self.previous.kind).prefix;

    let prefix_rule = match prefix_rule {
      Some(rule) => rule,
      None => {
        self.error("Expect expression.");
        return;
      }
    };

    prefix_rule(self);

    while precedence <= get_rule(self.current.kind).precedence {
      self.advance();
      let infix_rule = get_rule(self.previous.kind).infix.expect("infix rule must exist here");
      infix_rule(self);
    }
  }

  fn grouping(&mut self) {
    self.expression();
    self.consume(TokenKind::RIGHT_PAREN, "Expect ')' after expression.");
  }

  fn unary(&mut self) {
    let operator_kind = self.previous.kind;
    let line = self.previous.line;

    self.parse_precedence(Precedence::Unary);

    match operator_kind {
      TokenKind::MINUS => self.emit_op_at(OpCode::Negate, line),
      TokenKind::BANG => self.emit_op_at(OpCode::Not, line),
      _ => unreachable!("unary only dispatches for '-' and '!'"),
    }
  }

  fn binary(&mut self) {
    let operator_kind = self.previous.kind;
    let line = self.previous.line;
    let rule = get_rule(operator_kind);
    self.parse_precedence(rule.precedence.next_higher());

    match operator_kind {
      TokenKind::PLUS => self.emit_op_at(OpCode::Add, line),
      TokenKind::MINUS => self.emit_op_at(OpCode::Subtract, line),
      TokenKind::STAR => self.emit_op_at(OpCode::Multiply, line),
      TokenKind::SLASH => self.emit_op_at(OpCode::Divide, line),
      TokenKind::EQUAL_EQUAL => self.emit_op_at(OpCode::Equal, line),
      TokenKind::BANG_EQUAL => {
        self.emit_op_at(OpCode::Equal, line);
        self.emit_op_at(OpCode::Not, line);
      }
      TokenKind::GREATER => self.emit_op_at(OpCode::Greater, line),
      TokenKind::GREATER_EQUAL => {
        self.emit_op_at(OpCode::Less, line);
        self.emit_op_at(OpCode::Not, line);
      }
      TokenKind::LESS => self.emit_op_at(OpCode::Less, line),
      TokenKind::LESS_EQUAL => {
        self.emit_op_at(OpCode::Greater, line);
        self.emit_op_at(OpCode::Not, line);
      }
      _ => unreachable!("binary only dispatches for the operators listed in get_rule"),
    }
  }

  fn number(&mut self) {
    let lexeme = self.previous.lexeme(self.lexer.source_chars());
    let value: f64 = lexeme.parse().expect("scanner guarantees a well-formed number lexeme");
    self.emit_constant(Value::Number(value));
  }

  fn literal(&mut self) {
    match self.previous.kind {
      TokenKind::FALSE => self.emit_op(OpCode::False),
      TokenKind::TRUE => self.emit_op(OpCode::True),
      TokenKind::NIL => self.emit_op(OpCode::Nil),
      _ => unreachable!("literal only dispatches for false/true/nil"),
    }
  }

  fn emit_op(&mut self, op: OpCode) {
    let line = self.previous.line;
    self.emit_op_at(op, line);
  }

  fn emit_op_at(&mut self, op: OpCode, line: usize) {
    self.chunk.append_op(op, line);
  }

  /// Appends `OP_CONSTANT` plus its one-byte pool index. Reports "Too many
  /// constants in one chunk." and falls back to index 0 when the pool has
  /// already reached [`MAX_CONSTANTS`], since the operand can't address
  /// anything past that.
  fn emit_constant(&mut self, value: Value) {
    if self.chunk.constants.len() >= MAX_CONSTANTS {
      self.error("Too many constants in one chunk.");
      self.emit_op(OpCode::Constant);
      self.chunk.append_byte(0, self.previous.line);
      return;
    }

    let index = self.chunk.add_constant(value);
    self.emit_op(OpCode::Constant);
    self.chunk.append_byte(index as u8, self.previous.line);
  }

  fn error_at_current(&mut self, message: &str) {
    let current = self.current;
    self.error_at(current, message);
  }

  fn error(&mut self, message: &str) {
    let previous = self.previous;
    self.error_at(previous, message);
  }

  fn error_at(&mut self, token: Token, message: &str) {
    if self.panic_mode {
      return;
    }
    self.panic_mode = true;
    report_at(&token, self.lexer.source_chars(), message);
    self.had_error = true;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn disassemble_ops(chunk: &Chunk) -> Vec<OpCode> {
    let mut ops = Vec::new();
    let mut i = 0;
    while i < chunk.code.len() {
      let op = OpCode::from_byte(chunk.code[i]).unwrap();
      i += 1;
      if op == OpCode::Constant {
        i += 1;
      }
      ops.push(op);
    }
    ops
  }

  #[test]
  fn arithmetic_respects_precedence() {
    let chunk = compile("1 + 2 * 3").unwrap();
    assert_eq!(
      disassemble_ops(&chunk),
      vec![OpCode::Constant, OpCode::Constant, OpCode::Constant, OpCode::Multiply, OpCode::Add, OpCode::Return]
    );
  }

  #[test]
  fn one_plus_two_matches_the_golden_byte_sequence() {
    let chunk = compile("1 + 2").unwrap();
    assert_eq!(chunk.code, vec![OpCode::Constant as u8, 0, OpCode::Constant as u8, 1, OpCode::Add as u8, OpCode::Return as u8]);
    assert_eq!(chunk.constants, vec![Value::Number(1.0), Value::Number(2.0)]);
  }

  #[test]
  fn not_equal_desugars_to_equal_then_not() {
    let chunk = compile("1 != 2").unwrap();
    assert_eq!(
      disassemble_ops(&chunk),
      vec![OpCode::Constant, OpCode::Constant, OpCode::Equal, OpCode::Not, OpCode::Return]
    );
  }

  #[test]
  fn greater_equal_desugars_to_less_then_not() {
    let chunk = compile("1 >= 2").unwrap();
    assert_eq!(
      disassemble_ops(&chunk),
      vec![OpCode::Constant, OpCode::Constant, OpCode::Less, OpCode::Not, OpCode::Return]
    );
  }

  #[test]
  fn grouping_overrides_precedence() {
    let chunk = compile("(1 + 2) * 3").unwrap();
    assert_eq!(
      disassemble_ops(&chunk),
      vec![OpCode::Constant, OpCode::Constant, OpCode::Add, OpCode::Constant, OpCode::Multiply, OpCode::Return]
    );
  }

  #[test]
  fn missing_closing_paren_is_a_compile_error() {
    assert!(compile("(1 + 2").is_err());
  }

  #[test]
  fn dangling_operator_is_a_compile_error() {
    assert!(compile("1 +").is_err());
  }

  #[test]
  fn string_literal_has_no_prefix_rule_and_is_a_compile_error() {
    assert!(compile("\"hi\"").is_err());
  }
}
