//! Capacity limits of the generator's tables.

/// Fixed capacities of the three tables, and the maximum length of a stored name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub symbols: usize,
    pub instructions: usize,
    pub functions: usize,
    /// Names are truncated to this many bytes when stored or looked up.
    pub name_length: usize,
}

impl Limits {
    pub const DEFAULT_SYMBOLS: usize = 255;
    pub const DEFAULT_INSTRUCTIONS: usize = 1024;
    pub const DEFAULT_FUNCTIONS: usize = 255;
    pub const DEFAULT_NAME_LENGTH: usize = 32;

    pub fn with_symbols(self, symbols: usize) -> Self {
        Self { symbols, ..self }
    }

    pub fn with_instructions(self, instructions: usize) -> Self {
        Self {
            instructions,
            ..self
        }
    }

    pub fn with_functions(self, functions: usize) -> Self {
        Self { functions, ..self }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            symbols: Self::DEFAULT_SYMBOLS,
            instructions: Self::DEFAULT_INSTRUCTIONS,
            functions: Self::DEFAULT_FUNCTIONS,
            name_length: Self::DEFAULT_NAME_LENGTH,
        }
    }
}

/// Truncate `name` to at most `max` bytes without splitting a character.
pub(crate) fn bounded_name(name: &str, max: usize) -> &str {
    if name.len() <= max {
        return name;
    }
    let mut end = max;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
