//! Append-only code listings addressed by instruction position.

mod generic_listing;
mod position;

pub use generic_listing::*;
pub use position::*;
