use std::fmt::{self, Display, Formatter};

use crate::{
    config::{bounded_name, Limits},
    listing::Position,
    prelude::*,
};

use super::{TableError, TableKind};

/// A declared function and the position of its first instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionEntry {
    pub name: String,
    pub entry: Position,
}

/// Registry of function entry points, unique by name.
#[derive(Debug)]
pub struct FunctionTable {
    functions: Vec<FunctionEntry>,
    capacity: usize,
    name_length: usize,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::with_limits(&Limits::default())
    }

    pub fn with_limits(limits: &Limits) -> Self {
        Self {
            functions: Vec::new(),
            capacity: limits.functions,
            name_length: limits.name_length,
        }
    }

    /// Register a function. Returns the index of the new entry.
    pub fn insert(&mut self, name: &str, entry: Position) -> Result<usize, TableError> {
        if self.functions.len() >= self.capacity {
            return Err(TableError::Full(TableKind::Function));
        }
        let name = bounded_name(name, self.name_length);
        if self.find(name).is_some() {
            return Err(TableError::DuplicateName(
                TableKind::Function,
                name.to_string(),
            ));
        }
        trace!("function '{name}' enters at {entry}");
        self.functions.push(FunctionEntry {
            name: name.to_string(),
            entry,
        });
        Ok(self.functions.len() - 1)
    }

    /// The entry position of the function called `name`.
    pub fn search(&self, name: &str) -> Result<Position, TableError> {
        let name = bounded_name(name, self.name_length);
        self.find(name)
            .map(|f| f.entry)
            .ok_or_else(|| TableError::NotFound(TableKind::Function, name.to_string()))
    }

    /// The function whose first instruction is at `entry`, if any.
    pub fn search_by_address(&self, entry: Position) -> Option<&FunctionEntry> {
        self.functions.iter().find(|f| f.entry == entry)
    }

    fn find(&self, name: &str) -> Option<&FunctionEntry> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionEntry> {
        self.functions.iter()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn clear(&mut self) {
        self.functions.clear();
    }

    pub fn dump(&self) -> FunctionDump<'_> {
        FunctionDump(self)
    }
}
impl Default for FunctionTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a [`FunctionTable`] as tab-separated rows.
pub struct FunctionDump<'a>(&'a FunctionTable);

impl Display for FunctionDump<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "Functions table:")?;
        writeln!(f, "Index\tName\tEntry")?;
        for (idx, FunctionEntry { name, entry }) in self.0.iter().enumerate() {
            writeln!(f, "{idx}\t{name}\t{entry}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_search_finds_entry() {
        let mut ft = FunctionTable::new();

        assert_eq!(Ok(0), ft.insert("f", Position(10)));
        assert_eq!(Ok(Position(10)), ft.search("f"));
    }

    #[test]
    fn duplicate_function_is_rejected() {
        let mut ft = FunctionTable::new();
        ft.insert("f", Position(10)).unwrap();

        assert_eq!(
            Err(TableError::DuplicateName(TableKind::Function, "f".to_string())),
            ft.insert("f", Position(20))
        );
        assert_eq!(1, ft.len());
        assert_eq!(Ok(Position(10)), ft.search("f"));
    }

    #[test]
    fn unknown_function_is_not_found() {
        let ft = FunctionTable::new();

        assert_eq!(
            Err(TableError::NotFound(TableKind::Function, "g".to_string())),
            ft.search("g")
        );
    }

    #[test]
    fn full_table_rejects_inserts() {
        let mut ft = FunctionTable::with_limits(&Limits::default().with_functions(1));
        ft.insert("f", Position(0)).unwrap();

        assert_eq!(
            Err(TableError::Full(TableKind::Function)),
            ft.insert("g", Position(4))
        );
    }

    #[test]
    fn search_by_address_models_a_miss() {
        let mut ft = FunctionTable::new();
        ft.insert("f", Position(10)).unwrap();
        ft.insert("main", Position(14)).unwrap();

        assert_eq!(
            Some("main"),
            ft.search_by_address(Position(14)).map(|f| f.name.as_str())
        );
        assert_eq!(None, ft.search_by_address(Position(11)));
    }

    #[test]
    fn clear_forgets_all_functions() {
        let mut ft = FunctionTable::new();
        ft.insert("f", Position(3)).unwrap();
        ft.clear();

        assert!(ft.is_empty());
        assert_eq!(Ok(0), ft.insert("f", Position(5)));
    }

    #[test]
    fn dump_lists_functions() {
        let mut ft = FunctionTable::new();
        ft.insert("add", Position(2)).unwrap();

        let dump = ft.dump().to_string();
        assert!(dump.starts_with("Functions table:\nIndex\tName\tEntry\n"));
        assert!(dump.contains("0\tadd\t2"));
    }
}
