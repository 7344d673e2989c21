//! A single stack of named variables and anonymous temporaries.
use std::fmt::{self, Display, Formatter};

use crate::{asm::Word, config::bounded_name, config::Limits, prelude::*};

use super::{Depth, Line, Slot, TableError, TableKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// A variable declared by the program.
    Variable,
    /// A named slot owned by the calling convention. Never visible to
    /// variable lookups.
    Reserved,
    /// An anonymous, compiler-generated slot holding an intermediate value.
    Temporary,
}
impl SymbolKind {
    fn abbreviation(self) -> &'static str {
        match self {
            SymbolKind::Variable => "var",
            SymbolKind::Reserved => "rsv",
            SymbolKind::Temporary => "tmp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The identifier of a variable. For a temporary this is the decimal text
    /// of its value, kept for the table dump; temporaries are never looked up
    /// by name.
    pub name: String,
    pub kind: SymbolKind,
    pub line: Line,
    pub depth: Depth,
    /// The literal value a temporary (or a positional argument) carries.
    pub value: Option<Word>,
}
impl Symbol {
    fn variable(name: String, line: Line, depth: Depth) -> Self {
        Self {
            name,
            kind: SymbolKind::Variable,
            line,
            depth,
            value: None,
        }
    }

    fn reserved(name: String, value: Option<Word>, line: Line, depth: Depth) -> Self {
        Self {
            name,
            kind: SymbolKind::Reserved,
            line,
            depth,
            value,
        }
    }

    fn temporary(value: Word, line: Line, depth: Depth) -> Self {
        Self {
            name: value.to_string(),
            kind: SymbolKind::Temporary,
            line,
            depth,
            value: Some(value),
        }
    }

    pub fn is_temporary(&self) -> bool {
        self.kind == SymbolKind::Temporary
    }
}

/// The symbol table. Every live symbol occupies the slot equal to its index,
/// and symbols are only ever removed from the top.
#[derive(Debug)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    capacity: usize,
    name_length: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::with_limits(&Limits::default())
    }

    pub fn with_limits(limits: &Limits) -> Self {
        Self {
            symbols: Vec::with_capacity(limits.symbols),
            capacity: limits.symbols,
            name_length: limits.name_length,
        }
    }

    /// Declare a named variable at the top of the table. Fails if the table
    /// is full, or if a variable with the same name is live at any depth.
    pub fn insert(&mut self, name: &str, line: Line, depth: Depth) -> Result<Slot, TableError> {
        if self.is_full() {
            return Err(TableError::Full(TableKind::Symbol));
        }
        if self.search(name).is_ok() {
            return Err(TableError::DuplicateName(
                TableKind::Symbol,
                self.bounded(name).to_string(),
            ));
        }
        let symbol = Symbol::variable(self.bounded(name).to_string(), line, depth);
        self.push(symbol)
    }

    /// Allocate a temporary carrying `value` at the top of the table.
    pub fn insert_tmp(
        &mut self,
        value: Word,
        line: Line,
        depth: Depth,
    ) -> Result<Slot, TableError> {
        self.push(Symbol::temporary(value, line, depth))
    }

    /// Reserve a named slot for the calling convention. Every frame owns its
    /// reservations anew, so no duplicate check is made; reserved names live
    /// apart from variable names and are found with [`Self::search_reserved`].
    pub fn reserve(
        &mut self,
        name: &str,
        value: Option<Word>,
        line: Line,
        depth: Depth,
    ) -> Result<Slot, TableError> {
        let symbol = Symbol::reserved(self.bounded(name).to_string(), value, line, depth);
        self.push(symbol)
    }

    fn push(&mut self, symbol: Symbol) -> Result<Slot, TableError> {
        if self.is_full() {
            return Err(TableError::Full(TableKind::Symbol));
        }
        let slot = Slot(self.symbols.len());
        let Symbol {
            name, kind, depth, ..
        } = &symbol;
        trace!("symbol {slot} <- '{name}' ({kind:?}, depth {depth})");
        self.symbols.push(symbol);
        Ok(slot)
    }

    /// Remove the top symbol.
    pub fn pop(&mut self) -> Option<Symbol> {
        let symbol = self.symbols.pop();
        if let Some(symbol) = &symbol {
            let (slot, name) = (self.symbols.len(), &symbol.name);
            trace!("symbol @{slot} -> '{name}'");
        }
        symbol
    }

    /// Remove the top symbol at the end of a temporary's lifetime. This is the
    /// same operation as [`Self::pop`].
    pub fn pop_tmp(&mut self) -> Option<Symbol> {
        self.pop()
    }

    /// Remove symbols from the top for as long as they were declared at
    /// `depth` or deeper. Returns the new number of live symbols.
    pub fn pop_depth(&mut self, depth: Depth) -> usize {
        while self.symbols.last().map_or(false, |s| s.depth >= depth) {
            self.pop();
        }
        self.count()
    }

    /// Remove every symbol at or above `base`, restoring the table to the
    /// shape it had when `base` was the top. Returns the removed symbols,
    /// bottom first.
    pub fn restore(&mut self, base: Slot) -> Vec<Symbol> {
        if base.0 >= self.symbols.len() {
            return vec![];
        }
        trace!("symbol table restored to {base}");
        self.symbols.split_off(base.0)
    }

    /// Find the most recently declared live variable called `name`.
    pub fn search(&self, name: &str) -> Result<Slot, TableError> {
        self.search_kind(name, SymbolKind::Variable)
    }

    /// Find the most recent live reservation called `name`.
    pub fn search_reserved(&self, name: &str) -> Result<Slot, TableError> {
        self.search_kind(name, SymbolKind::Reserved)
    }

    fn search_kind(&self, name: &str, kind: SymbolKind) -> Result<Slot, TableError> {
        let name = self.bounded(name);
        self.symbols
            .iter()
            .rposition(|s| s.kind == kind && s.name == name)
            .map(Slot)
            .ok_or_else(|| TableError::NotFound(TableKind::Symbol, name.to_string()))
    }

    /// Whether `slot` holds a live temporary.
    pub fn is_tmp(&self, slot: Slot) -> bool {
        self.get(slot).map_or(false, Symbol::is_temporary)
    }

    /// The number of live symbols, which is also the slot the next symbol
    /// will occupy.
    pub fn count(&self) -> usize {
        self.symbols.len()
    }

    /// The value carried by the temporary in `slot`.
    pub fn get_tmp(&self, slot: Slot) -> Result<Word, TableError> {
        match self.get(slot) {
            Some(symbol) if symbol.is_temporary() => Ok(symbol.value.unwrap_or_default()),
            Some(_) => Err(TableError::NotTemporary(slot)),
            None => Err(TableError::OutOfRange(TableKind::Symbol, slot.0)),
        }
    }

    /// Replace the value carried by the temporary in `slot`.
    pub fn update_tmp(&mut self, slot: Slot, value: Word) -> Result<(), TableError> {
        match self.symbols.get_mut(slot.0) {
            Some(symbol) if symbol.is_temporary() => {
                symbol.value = Some(value);
                symbol.name = value.to_string();
                Ok(())
            }
            Some(_) => Err(TableError::NotTemporary(slot)),
            None => Err(TableError::OutOfRange(TableKind::Symbol, slot.0)),
        }
    }

    pub fn get(&self, slot: Slot) -> Option<&Symbol> {
        self.symbols.get(slot.0)
    }

    /// The live symbols, bottom first.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &Symbol)> {
        self.symbols.iter().enumerate().map(|(i, s)| (Slot(i), s))
    }

    pub fn is_full(&self) -> bool {
        self.symbols.len() >= self.capacity
    }

    pub fn clear(&mut self) {
        self.symbols.clear();
    }

    /// A human-readable rendering of the live symbols.
    pub fn dump(&self) -> SymbolDump<'_> {
        SymbolDump(self)
    }

    fn bounded<'n>(&self, name: &'n str) -> &'n str {
        bounded_name(name, self.name_length)
    }
}
impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a [`SymbolTable`] as a table, one row per live symbol.
pub struct SymbolDump<'a>(&'a SymbolTable);

impl Display for SymbolDump<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "Symbol table:")?;
        writeln!(
            f,
            "| {:<3} | {:<20} | {:<5} | {:<5} | {:<4} |",
            "#", "Name", "Line", "Depth", "Kind"
        )?;
        for (slot, symbol) in self.0.iter() {
            let Symbol {
                name, line, depth, ..
            } = symbol;
            let (index, kind) = (slot.0, symbol.kind.abbreviation());
            writeln!(
                f,
                "| {index:<3} | {name:<20} | {line:<5} | {depth:<5} | {kind:<4} |"
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_returns_count_before_insertion() {
        let mut st = SymbolTable::new();

        assert_eq!(Ok(Slot(0)), st.insert("a", 1, 0));
        assert_eq!(Ok(Slot(1)), st.insert("b", 1, 0));
        assert_eq!(Ok(Slot(2)), st.insert_tmp(7, 1, 0));
        assert_eq!(3, st.count());
    }

    #[test]
    fn duplicate_name_is_rejected_without_mutation() {
        let mut st = SymbolTable::new();

        assert_eq!(Ok(Slot(0)), st.insert("a", 1, 0));
        assert_eq!(
            Err(TableError::DuplicateName(TableKind::Symbol, "a".to_string())),
            st.insert("a", 1, 0)
        );
        assert_eq!(1, st.count());
    }

    #[test]
    fn duplicate_check_ignores_depth() {
        let mut st = SymbolTable::new();

        st.insert("x", 1, 0).unwrap();
        assert!(matches!(
            st.insert("x", 2, 3),
            Err(TableError::DuplicateName(TableKind::Symbol, _))
        ));
    }

    #[test]
    fn full_table_rejects_inserts_without_mutation() {
        let mut st = SymbolTable::with_limits(&Limits::default().with_symbols(2));

        st.insert("a", 1, 0).unwrap();
        st.insert_tmp(1, 1, 0).unwrap();
        assert_eq!(Err(TableError::Full(TableKind::Symbol)), st.insert("b", 1, 0));
        assert_eq!(Err(TableError::Full(TableKind::Symbol)), st.insert_tmp(2, 1, 0));
        assert_eq!(
            Err(TableError::Full(TableKind::Symbol)),
            st.reserve("?ADR", None, 1, 0)
        );
        assert_eq!(2, st.count());
    }

    #[test]
    fn temporaries_carry_their_value() {
        let mut st = SymbolTable::new();
        let var = st.insert("a", 1, 0).unwrap();
        let tmp = st.insert_tmp(5, 1, 0).unwrap();

        assert!(st.is_tmp(tmp));
        assert!(!st.is_tmp(var));
        assert_eq!(Ok(5), st.get_tmp(tmp));
        assert_eq!(Err(TableError::NotTemporary(var)), st.get_tmp(var));
    }

    #[test]
    fn update_tmp_rewrites_value_and_displayed_name() {
        let mut st = SymbolTable::new();
        let tmp = st.insert_tmp(5, 1, 0).unwrap();

        st.update_tmp(tmp, -12).unwrap();
        assert_eq!(Ok(-12), st.get_tmp(tmp));
        assert_eq!("-12", st.get(tmp).unwrap().name);
    }

    #[test]
    fn temporaries_never_match_a_name_lookup() {
        let mut st = SymbolTable::new();
        st.insert_tmp(5, 1, 0).unwrap();

        assert_eq!(
            Err(TableError::NotFound(TableKind::Symbol, "5".to_string())),
            st.search("5")
        );
        assert_eq!(Ok(Slot(1)), st.insert("5", 1, 0));
    }

    #[test]
    fn is_tmp_is_false_past_the_top() {
        let mut st = SymbolTable::new();
        let tmp = st.insert_tmp(1, 1, 0).unwrap();
        st.pop_tmp();

        assert!(!st.is_tmp(tmp));
    }

    #[test]
    fn pop_and_pop_tmp_remove_exactly_one_entry() {
        let mut st = SymbolTable::new();
        st.insert("a", 1, 0).unwrap();
        st.insert_tmp(3, 1, 0).unwrap();

        assert_eq!(Some(3), st.pop_tmp().and_then(|s| s.value));
        assert_eq!(1, st.count());
        assert_eq!("a", st.pop().unwrap().name);
        assert_eq!(0, st.count());
        assert_eq!(None, st.pop());
    }

    #[test]
    fn search_only_sees_live_symbols() {
        let mut st = SymbolTable::new();
        st.insert("a", 1, 0).unwrap();
        st.pop();

        assert!(st.search("a").is_err());
        assert_eq!(Ok(Slot(0)), st.insert("a", 2, 0));
    }

    #[test]
    fn search_prefers_most_recent_reservation() {
        let mut st = SymbolTable::new();
        st.reserve("?VAL", None, 1, 0).unwrap();
        st.insert("x", 1, 1).unwrap();
        st.reserve("?VAL", None, 2, 1).unwrap();

        assert_eq!(Ok(Slot(2)), st.search_reserved("?VAL"));
    }

    #[test]
    fn reservations_and_variables_never_resolve_to_each_other() {
        let mut st = SymbolTable::new();
        let var = st.insert("arg0", 1, 0).unwrap();
        let arg = st.reserve("arg0", Some(3), 2, 1).unwrap();

        assert_eq!(Ok(var), st.search("arg0"));
        assert_eq!(Ok(arg), st.search_reserved("arg0"));
        assert!(st.search_reserved("x").is_err());
        st.insert("x", 2, 1).unwrap();
        assert!(st.search_reserved("x").is_err());
        assert!(!st.is_tmp(arg));
    }

    #[test]
    fn reserving_a_name_does_not_block_its_declaration() {
        let mut st = SymbolTable::new();
        st.reserve("arg0", None, 1, 0).unwrap();

        assert_eq!(Ok(Slot(1)), st.insert("arg0", 1, 0));
    }

    #[test]
    fn pop_depth_removes_top_aligned_run_only() {
        let mut st = SymbolTable::new();
        st.insert("g", 1, 0).unwrap();
        st.insert("a", 2, 2).unwrap();
        st.insert("b", 3, 1).unwrap();
        st.insert("c", 4, 2).unwrap();
        st.insert_tmp(9, 4, 3).unwrap();

        assert_eq!(3, st.pop_depth(2));
        assert_eq!(Ok(Slot(1)), st.search("a"));
        assert_eq!(1, st.pop_depth(1));
        assert_eq!(Ok(Slot(0)), st.search("g"));
    }

    #[test]
    fn restore_drops_everything_above_base() {
        let mut st = SymbolTable::new();
        st.insert("a", 1, 0).unwrap();
        st.reserve("!ADR", None, 1, 1).unwrap();
        st.reserve("!VAL", None, 1, 1).unwrap();

        let removed = st.restore(Slot(1));
        assert_eq!(2, removed.len());
        assert_eq!("!ADR", removed[0].name);
        assert_eq!(1, st.count());
        assert!(st.restore(Slot(4)).is_empty());
    }

    #[test]
    fn long_names_are_stored_truncated() {
        let limits = Limits {
            name_length: 4,
            ..Limits::default()
        };
        let mut st = SymbolTable::with_limits(&limits);

        let slot = st.insert("counter", 1, 0).unwrap();
        assert_eq!("coun", st.get(slot).unwrap().name);
        assert_eq!(Ok(slot), st.search("count"));
    }

    #[test]
    fn clear_empties_the_table() {
        let mut st = SymbolTable::new();
        st.insert("a", 1, 0).unwrap();
        st.clear();

        assert_eq!(0, st.count());
        assert_eq!(Ok(Slot(0)), st.insert("a", 1, 0));
    }

    #[test]
    fn dump_lists_every_live_symbol() {
        let mut st = SymbolTable::new();
        st.insert("alpha", 3, 0).unwrap();
        st.insert_tmp(42, 4, 1).unwrap();

        st.reserve("?ADR", None, 5, 1).unwrap();

        let dump = st.dump().to_string();
        assert!(dump.starts_with("Symbol table:\n"));
        assert!(dump.contains("| 0   | alpha"));
        assert!(dump.contains("| 1   | 42"));
        assert!(dump.contains("tmp"));
        assert!(dump.contains("| 2   | ?ADR                 | 5     | 1     | rsv  |"));
    }
}
