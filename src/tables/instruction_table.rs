//! The append-only instruction store.
use std::{
    fmt::{self, Display, Formatter},
    io,
};

use crate::{
    asm::{Instruction, Opcode, Word},
    config::Limits,
    listing::{LinesIter, Listing, Position},
    prelude::*,
};

use super::{TableError, TableKind};

pub type InstructionListing = Listing<Instruction>;

/// Emitted instructions, addressed by the position they were inserted at.
/// Only the first two operands of an emitted instruction may be rewritten
/// afterwards, to resolve forward jumps.
#[derive(Debug)]
pub struct InstructionTable {
    listing: InstructionListing,
}

impl InstructionTable {
    pub fn new() -> Self {
        Self::with_limits(&Limits::default())
    }

    pub fn with_limits(limits: &Limits) -> Self {
        Self {
            listing: Listing::with_capacity(limits.instructions),
        }
    }

    /// Append an instruction and return its position.
    pub fn insert(
        &mut self,
        opcode: Opcode,
        op1: Word,
        op2: Word,
        op3: Word,
    ) -> Result<Position, TableError> {
        self.push(Instruction::new(opcode, op1, op2, op3))
    }

    pub fn push(&mut self, instr: Instruction) -> Result<Position, TableError> {
        let position = self
            .listing
            .push(instr)
            .map_err(|_| TableError::Full(TableKind::Instruction))?;
        trace!("instruction {:#04x}: {instr}", position.0);
        Ok(position)
    }

    /// The position of the next instruction to be emitted.
    pub fn get_index(&self) -> Position {
        self.listing.next_position()
    }

    /// Rewrite the first operand of an emitted instruction.
    pub fn patch_op1(&mut self, position: Position, value: Word) -> Result<(), TableError> {
        let instr = self.get_mut(position)?;
        instr.op1 = value;
        trace!("instruction {:#04x} patched: {instr}", position.0);
        Ok(())
    }

    /// Rewrite the second operand of an emitted instruction.
    pub fn patch_op2(&mut self, position: Position, value: Word) -> Result<(), TableError> {
        let instr = self.get_mut(position)?;
        instr.op2 = value;
        trace!("instruction {:#04x} patched: {instr}", position.0);
        Ok(())
    }

    fn get_mut(&mut self, position: Position) -> Result<&mut Instruction, TableError> {
        self.listing
            .get_mut(position)
            .ok_or(TableError::OutOfRange(TableKind::Instruction, position.0))
    }

    pub fn get(&self, position: Position) -> Option<&Instruction> {
        self.listing.get(position)
    }

    pub fn iter_lines(&self) -> LinesIter<Instruction> {
        self.listing.iter_lines()
    }

    pub fn len(&self) -> usize {
        self.listing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listing.is_empty()
    }

    pub fn clear(&mut self) {
        self.listing.clear();
    }

    /// The textual assembly listing: one `MNEMONIC op1 [op2 [op3]]` line per
    /// instruction, in emission order.
    pub fn assembly(&self) -> String {
        self.listing.to_string()
    }

    /// Stream the textual assembly listing into `out`.
    pub fn write_assembly<W: io::Write>(&self, mut out: W) -> Result<()> {
        for instr in self.listing.iter_instructions() {
            writeln!(out, "{instr}").context("Failed to write assembly listing")?;
        }
        out.flush().context("Failed to flush assembly listing")?;
        Ok(())
    }

    /// A human-readable rendering with hexadecimal positions.
    pub fn dump(&self) -> InstructionDump<'_> {
        InstructionDump(self)
    }
}
impl Default for InstructionTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders an [`InstructionTable`] one padded instruction per line.
pub struct InstructionDump<'a>(&'a InstructionTable);

impl Display for InstructionDump<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "Instructions table:")?;
        for (position, instr) in self.0.iter_lines() {
            writeln!(f, "{:#04x}\t {}", position.0, instr.describe())?;
        }
        Ok(())
    }
}
