use core::chunk::{Chunk, OpCode};

/// Prints every instruction in `chunk` to stdout, prefixed with `name` as a
/// header. Intended for `--trace`-style debugging, not machine consumption.
pub fn disassemble_chunk(chunk: &Chunk, name: &str) {
  println!("== {name} ==");

  let mut offset = 0;
  while offset < chunk.len() {
    offset = disassemble_instruction(chunk, offset);
  }
}

/// Prints the single instruction at `offset` and returns the offset of the
/// next one.
///
/// Format: a 4-digit zero-padded byte offset, a 4-digit right-aligned source
/// line (or `   | ` if it repeats the previous instruction's line), the
/// opcode's name, and — for instructions that carry a constant-pool operand
/// — the operand index followed by the constant's printed value.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize) -> usize {
  print!("{offset:04} ");

  if offset > 0 && chunk.lines[offset] == chunk.lines[offset - 1] {
    print!("   | ");
  } else {
    print!("{:4} ", chunk.lines[offset]);
  }

  let byte = chunk.code[offset];
  match OpCode::from_byte(byte) {
    Some(OpCode::Constant) => constant_instruction("OP_CONSTANT", chunk, offset),
    Some(OpCode::Nil) => simple_instruction("OP_NIL", offset),
    Some(OpCode::True) => simple_instruction("OP_TRUE", offset),
    Some(OpCode::False) => simple_instruction("OP_FALSE", offset),
    Some(OpCode::Equal) => simple_instruction("OP_EQUAL", offset),
    Some(OpCode::Greater) => simple_instruction("OP_GREATER", offset),
    Some(OpCode::Less) => simple_instruction("OP_LESS", offset),
    Some(OpCode::Add) => simple_instruction("OP_ADD", offset),
    Some(OpCode::Subtract) => simple_instruction("OP_SUBTRACT", offset),
    Some(OpCode::Multiply) => simple_instruction("OP_MULTIPLY", offset),
    Some(OpCode::Divide) => simple_instruction("OP_DIVIDE", offset),
    Some(OpCode::Not) => simple_instruction("OP_NOT", offset),
    Some(OpCode::Negate) => simple_instruction("OP_NEGATE", offset),
    Some(OpCode::Return) => simple_instruction("OP_RETURN", offset),
    None => {
      println!("Unknown opcode {byte}");
      offset + 1
    }
  }
}

fn simple_instruction(name: &str, offset: usize) -> usize {
  println!("{name}");
  offset + 1
}

fn constant_instruction(name: &str, chunk: &Chunk, offset: usize) -> usize {
  let constant_index = chunk.code[offset + 1] as usize;
  println!("{name:-16} {constant_index:4} '{}'", chunk.constants[constant_index]);
  offset + 2
}

#[cfg(test)]
mod tests {
  use super::*;
  use core::value::Value;

  #[test]
  fn constant_instruction_advances_by_two() {
    let mut chunk = Chunk::new();
    let index = chunk.add_constant(Value::Number(1.0));
    chunk.append_op(OpCode::Constant, 1);
    chunk.append_byte(index as u8, 1);
    chunk.append_op(OpCode::Return, 1);

    let next = disassemble_instruction(&chunk, 0);
    assert_eq!(next, 2);
  }

  #[test]
  fn simple_instruction_advances_by_one() {
    let mut chunk = Chunk::new();
    chunk.append_op(OpCode::Return, 1);
    assert_eq!(disassemble_instruction(&chunk, 0), 1);
  }
}
