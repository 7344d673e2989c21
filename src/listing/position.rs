use std::{
    fmt::{Display, Formatter},
    ops::Add,
};

use crate::asm::Word;

/// A position in a listing, indicated by its instruction index. Positions are
/// handed out in insertion order and never move once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(pub usize);

impl Position {
    /// The position before this one, if there is one.
    pub fn previous(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }
}

impl Add<usize> for Position {
    type Output = Self;

    fn add(self, rhs: usize) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl From<Position> for Word {
    fn from(position: Position) -> Self {
        position.0 as Word
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
