//! The three-address instruction set and its textual assembly form.

mod instruction;
mod opcode;
mod reader;

pub use instruction::*;
pub use opcode::*;
pub use reader::*;

/// A raw operand. Depending on the opcode, an operand is a symbol slot, an
/// instruction position or an immediate value.
pub type Word = isize;
