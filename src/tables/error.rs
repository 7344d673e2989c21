use std::fmt::{self, Display, Formatter};

use thiserror::Error;

use super::Slot;

/// Identifies which table an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Symbol,
    Instruction,
    Function,
}
impl Display for TableKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            TableKind::Symbol => "symbol",
            TableKind::Instruction => "instruction",
            TableKind::Function => "function",
        })
    }
}

/// An error as produced by one of the tables. Failed operations never
/// mutate the table they were applied to.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("{0} table is full")]
    Full(TableKind),
    #[error("{0} '{1}' already exists")]
    DuplicateName(TableKind, String),
    #[error("{0} '{1}' not found")]
    NotFound(TableKind, String),
    #[error("{0} index {1} is out of range")]
    OutOfRange(TableKind, usize),
    #[error("symbol {0} is not a temporary")]
    NotTemporary(Slot),
}
