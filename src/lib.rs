//! Intermediate code generation backend for a small imperative language.
//!
//! A parser drives a [`CodeGenerator`] through one entry point per source construct. The
//! generator allocates storage in a [`SymbolTable`], appends three-address instructions to an
//! [`InstructionTable`] (backpatching forward jumps once their targets are known) and records
//! function entry points in a [`FunctionTable`]. The instruction stream renders as a textual
//! assembly listing, one instruction per line.

pub mod asm;
pub mod config;
pub mod error;
pub mod generator;
pub mod listing;
pub mod logging;
pub mod tables;

mod prelude;

pub use asm::{parse_assembly, Instruction, Opcode, Word};
pub use config::Limits;
pub use generator::{BinaryOp, CodeGenerator, GenError};
pub use listing::Position;
pub use logging::init_logging;
pub use tables::{
    Depth, FunctionEntry, FunctionTable, InstructionTable, Line, Slot, Symbol, SymbolKind,
    SymbolTable, TableError, TableKind,
};
