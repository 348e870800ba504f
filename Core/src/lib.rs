pub mod chunk;
pub mod errors;
pub mod tokens;
pub mod value;

/// Maximum number of constants a single chunk's constant pool may hold.
/// `OP_CONSTANT`'s operand is a single byte, so indices beyond this are
/// unrepresentable.
pub const MAX_CONSTANTS: usize = u8::MAX as usize + 1;
