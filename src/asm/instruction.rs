use std::fmt::{self, Display, Formatter};

use super::{Opcode, Word};

/// A single three-address instruction. Which operands carry meaning, and
/// what they refer to, is determined by the opcode; unused operands are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub op1: Word,
    pub op2: Word,
    pub op3: Word,
}

impl Instruction {
    pub fn new(opcode: Opcode, op1: Word, op2: Word, op3: Word) -> Self {
        Self {
            opcode,
            op1,
            op2,
            op3,
        }
    }

    pub fn nullary(opcode: Opcode) -> Self {
        Self::new(opcode, 0, 0, 0)
    }

    pub fn unary(opcode: Opcode, op1: Word) -> Self {
        Self::new(opcode, op1, 0, 0)
    }

    pub fn binary(opcode: Opcode, op1: Word, op2: Word) -> Self {
        Self::new(opcode, op1, op2, 0)
    }

    /// Build an instruction from the operands of a listing line. Operands
    /// beyond the opcode's arity are ignored, missing ones are zero.
    pub fn from_operands(opcode: Opcode, operands: &[Word]) -> Self {
        let operand = |i: usize| operands.get(i).copied().unwrap_or(0);
        Self::new(opcode, operand(0), operand(1), operand(2))
    }

    /// The operands rendered in the listing, in order.
    pub fn operands(&self) -> impl Iterator<Item = Word> {
        [self.op1, self.op2, self.op3]
            .into_iter()
            .take(self.opcode.arity())
    }

    /// A padded rendering used by the instruction table dump.
    pub fn describe(&self) -> String {
        let mut line = format!("{:<5}", self.opcode.mnemonic());
        for operand in self.operands() {
            line.push_str(&format!(" {operand:<4}"));
        }
        line.trim_end().to_string()
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.opcode.mnemonic())?;
        for operand in self.operands() {
            write!(f, " {operand}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_only_meaningful_operands() {
        assert_eq!("NOP", Instruction::new(Opcode::Nop, 1, 2, 3).to_string());
        assert_eq!("PRI 4", Instruction::new(Opcode::Print, 4, 9, 9).to_string());
        assert_eq!("JMF 3 12", Instruction::new(Opcode::Jmpf, 3, 12, 9).to_string());
        assert_eq!("ADD 5 3 4", Instruction::new(Opcode::Add, 5, 3, 4).to_string());
    }

    #[test]
    fn negative_immediates_are_rendered() {
        assert_eq!("AFC 0 -1", Instruction::binary(Opcode::Afc, 0, -1).to_string());
    }

    #[test]
    fn from_operands_fills_missing_operands_with_zero() {
        assert_eq!(
            Instruction::new(Opcode::Cop, 2, 7, 0),
            Instruction::from_operands(Opcode::Cop, &[2, 7])
        );
    }

    #[test]
    fn describe_pads_mnemonic_and_operands() {
        assert_eq!("AFC   3    10", Instruction::binary(Opcode::Afc, 3, 10).describe());
    }
}
