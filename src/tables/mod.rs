//! The tables a compilation unit owns: symbols, instructions and functions.

mod error;
mod function_table;
mod instruction_table;
mod symbol_table;

use std::fmt::{self, Display, Formatter};

pub use error::*;
pub use function_table::*;
pub use instruction_table::*;
pub use symbol_table::*;

use crate::asm::Word;

/// A source line number, as supplied by the parser.
pub type Line = usize;

/// A lexical nesting level. Higher values denote more deeply nested blocks.
pub type Depth = usize;

/// The index of a symbol in the symbol table, which doubles as the symbol's
/// memory address relative to the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(pub usize);

impl Slot {
    /// The slot directly above this one.
    pub fn above(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<Slot> for Word {
    fn from(slot: Slot) -> Self {
        slot.0 as Word
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}
