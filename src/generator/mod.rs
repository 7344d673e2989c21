//! Intermediate code generation.
//!
//! The parser calls into [`CodeGenerator`] in grammar-reduction order. Each
//! entry point allocates or frees symbols and appends (or patches)
//! instructions, so the generator never sees a syntax tree.

mod code_generator;
mod error;
mod operator;

pub use code_generator::*;
pub use error::*;
pub use operator::*;
