use std::ops::ControlFlow;

use core::chunk::{Chunk, OpCode};
use core::errors::report_runtime_error;
use core::value::Value;
use compiler::compile;

#[cfg(feature = "trace")]
use disassembler::disassemble_instruction;

const STACK_MAX: usize = 256;

/// The outcome of running a program, mirroring the exit-code tiers the
/// driver maps to `0`/`65`/`70`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpretResult {
  Ok,
  CompileError,
  RuntimeError,
}

/// Compiles `source` and, if that succeeds, runs it to completion on a
/// fresh [`VirtualMachine`].
pub fn interpret(source: &str) -> InterpretResult {
  let chunk = match compile(source) {
    Ok(chunk) => chunk,
    Err(_) => return InterpretResult::CompileError,
  };

  let mut vm = VirtualMachine::new(&chunk);
  vm.run()
}

/// A stack-based bytecode interpreter: an instruction pointer into a
/// [`Chunk`] and a fixed-capacity value stack, nothing else persists
/// between instructions.
pub struct VirtualMachine<'a> {
  chunk: &'a Chunk,
  ip: usize,
  stack: Vec<Value>,
}

impl<'a> VirtualMachine<'a> {
  pub fn new(chunk: &'a Chunk) -> Self {
    VirtualMachine { chunk, ip: 0, stack: Vec::with_capacity(STACK_MAX) }
  }

  /// Runs until the chunk's `OP_RETURN` or a runtime error ends execution.
  pub fn run(&mut self) -> InterpretResult {
    loop {
      #[cfg(feature = "trace")]
      {
        print!("          ");
        for value in &self.stack {
          print!("[ {value} ]");
        }
        println!();
        disassemble_instruction(self.chunk, self.ip);
      }

      match self.step() {
        ControlFlow::Continue(()) => continue,
        ControlFlow::Break(result) => return result,
      }
    }
  }

  fn step(&mut self) -> ControlFlow<InterpretResult> {
    let byte = self.read_byte();
    let op = match OpCode::from_byte(byte) {
      Some(op) => op,
      None => return self.runtime_error(&format!("Unknown opcode {byte}.")),
    };

    match op {
      OpCode::Constant => {
        let value = self.read_constant();
        self.push(value);
      }
      OpCode::Nil => self.push(Value::Nil),
      OpCode::True => self.push(Value::Bool(true)),
      OpCode::False => self.push(Value::Bool(false)),
      OpCode::Equal => {
        let b = self.pop();
        let a = self.pop();
        self.push(Value::Bool(a.values_equal(&b)));
      }
      OpCode::Greater => return self.binary_comparison(|a, b| a > b),
      OpCode::Less => return self.binary_comparison(|a, b| a < b),
      OpCode::Add => return self.binary_numeric(|a, b| a + b),
      OpCode::Subtract => return self.binary_numeric(|a, b| a - b),
      OpCode::Multiply => return self.binary_numeric(|a, b| a * b),
      OpCode::Divide => return self.binary_numeric(|a, b| a / b),
      OpCode::Not => {
        let value = self.pop();
        self.push(Value::Bool(value.is_falsey()));
      }
      OpCode::Negate => {
        let value = self.peek(0);
        match value.as_number() {
          Some(n) => {
            self.pop();
            self.push(Value::Number(-n));
          }
          None => return self.runtime_error("Operand must be a number."),
        }
      }
      OpCode::Return => {
        let value = self.pop();
        println!("{value}");
        return ControlFlow::Break(InterpretResult::Ok);
      }
    }

    ControlFlow::Continue(())
  }

  fn binary_numeric(&mut self, op: impl Fn(f64, f64) -> f64) -> ControlFlow<InterpretResult> {
    let (a, b) = match (self.peek(1).as_number(), self.peek(0).as_number()) {
      (Some(a), Some(b)) => (a, b),
      _ => return self.runtime_error("Operands must be numbers."),
    };
    self.pop();
    self.pop();
    self.push(Value::Number(op(a, b)));
    ControlFlow::Continue(())
  }

  fn binary_comparison(&mut self, op: impl Fn(f64, f64) -> bool) -> ControlFlow<InterpretResult> {
    let (a, b) = match (self.peek(1).as_number(), self.peek(0).as_number()) {
      (Some(a), Some(b)) => (a, b),
      _ => return self.runtime_error("Operands must be numbers."),
    };
    self.pop();
    self.pop();
    self.push(Value::Bool(op(a, b)));
    ControlFlow::Continue(())
  }

  fn runtime_error(&mut self, message: &str) -> ControlFlow<InterpretResult> {
    let line = self.chunk.lines[self.ip - 1];
    report_runtime_error(line, message);
    self.stack.clear();
    ControlFlow::Break(InterpretResult::RuntimeError)
  }

  fn read_byte(&mut self) -> u8 {
    let byte = self.chunk.code[self.ip];
    self.ip += 1;
    byte
  }

  fn read_constant(&mut self) -> Value {
    let index = self.read_byte() as usize;
    self.chunk.constants[index]
  }

  fn push(&mut self, value: Value) {
    self.stack.push(value);
  }

  fn pop(&mut self) -> Value {
    self.stack.pop().expect("compiler never emits an instruction that underflows the stack")
  }

  fn peek(&self, distance_from_top: usize) -> Value {
    self.stack[self.stack.len() - 1 - distance_from_top]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn arithmetic_expression_runs_to_completion() {
    assert_eq!(interpret("1 + 2 * 3"), InterpretResult::Ok);
  }

  #[test]
  fn comparison_chain_runs_to_completion() {
    assert_eq!(interpret("1 < 2 == !(3 > 4)"), InterpretResult::Ok);
  }

  #[test]
  fn string_literal_has_no_surface_syntax_and_is_a_compile_error() {
    assert_eq!(interpret("\"foo\" + \"bar\""), InterpretResult::CompileError);
  }

  #[test]
  fn negating_a_bool_is_a_runtime_error() {
    assert_eq!(interpret("-true"), InterpretResult::RuntimeError);
  }

  #[test]
  fn syntax_error_is_reported_as_compile_error() {
    assert_eq!(interpret("1 +"), InterpretResult::CompileError);
  }

  #[test]
  fn division_by_zero_is_not_a_runtime_error_it_produces_infinity() {
    assert_eq!(interpret("1 / 0"), InterpretResult::Ok);
  }

  #[test]
  fn adding_a_non_number_is_a_runtime_error() {
    assert_eq!(interpret("1 + true"), InterpretResult::RuntimeError);
  }
}
