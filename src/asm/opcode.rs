use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Loads and copies
    Afc,
    Cop,
    // Arithmetic
    Add,
    Sou,
    Mul,
    Div,
    // Comparison
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    // Logic
    And,
    Or,
    Not,
    // Jumps
    Jmp,
    Jmpf,
    // Misc
    Print,
    Nop,
    // Calling convention
    Ret,
    Push,
    Pop,
    Call,
}

impl Opcode {
    pub const ALL: [Opcode; 23] = [
        Opcode::Afc,
        Opcode::Cop,
        Opcode::Add,
        Opcode::Sou,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Eq,
        Opcode::Neq,
        Opcode::Lt,
        Opcode::Le,
        Opcode::Gt,
        Opcode::Ge,
        Opcode::And,
        Opcode::Or,
        Opcode::Not,
        Opcode::Jmp,
        Opcode::Jmpf,
        Opcode::Print,
        Opcode::Nop,
        Opcode::Ret,
        Opcode::Push,
        Opcode::Pop,
        Opcode::Call,
    ];

    /// The number of operands that are meaningful for this opcode, and
    /// therefore rendered in the assembly listing.
    pub fn arity(self) -> usize {
        use Opcode::*;
        match self {
            Nop => 0,
            Not | Jmp | Print | Ret | Push | Pop | Call => 1,
            Afc | Cop | Jmpf => 2,
            Add | Sou | Mul | Div | Eq | Neq | Lt | Le | Gt | Ge | And | Or => 3,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        use Opcode::*;
        match self {
            Afc => "AFC",
            Cop => "COP",
            Add => "ADD",
            Sou => "SOU",
            Mul => "MUL",
            Div => "DIV",
            Eq => "EQU",
            Neq => "NEQ",
            Lt => "LT",
            Le => "LE",
            Gt => "GT",
            Ge => "GE",
            And => "AND",
            Or => "OR",
            Not => "NOT",
            Jmp => "JMP",
            Jmpf => "JMF",
            Print => "PRI",
            Nop => "NOP",
            Ret => "RET",
            Push => "PUSH",
            Pop => "POP",
            Call => "CALL",
        }
    }

    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|opcode| opcode.mnemonic() == mnemonic)
    }
}
impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
