use std::{
    fmt::{self, Display, Formatter},
    slice::Iter,
};

use super::position::*;

/// A bounded, append-only sequence of lines. Lines are never removed or
/// reordered; only their contents may be rewritten in place.
#[derive(Debug)]
pub struct Listing<T> {
    lines: Vec<T>,
    capacity: usize,
}

impl<T> Listing<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a line and return its position, or give the line back if the
    /// listing is already full.
    pub fn push(&mut self, line: T) -> Result<Position, T> {
        if self.is_full() {
            return Err(line);
        }
        let position = self.next_position();
        self.lines.push(line);
        Ok(position)
    }

    /// The position the next pushed line will occupy.
    pub fn next_position(&self) -> Position {
        Position(self.lines.len())
    }

    pub fn get(&self, position: Position) -> Option<&T> {
        self.lines.get(position.0)
    }

    pub fn get_mut(&mut self, position: Position) -> Option<&mut T> {
        self.lines.get_mut(position.0)
    }

    pub fn iter_lines(&self) -> LinesIter<T> {
        LinesIter {
            inner: self.lines.iter(),
            position: Position(0),
        }
    }

    pub fn iter_instructions(&self) -> Iter<T> {
        self.lines.iter()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.lines.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
impl<T: Display> Display for Listing<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

pub struct LinesIter<'item, T> {
    inner: Iter<'item, T>,
    position: Position,
}

impl<'item, T> Iterator for LinesIter<'item, T> {
    type Item = (Position, &'item T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|v| {
            let current = self.position;
            self.position = current + 1;
            (current, v)
        })
    }
}
