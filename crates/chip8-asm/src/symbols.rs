//! Symbol table and backpatch table.
//!
//! The symbol table maps each defined label to its absolute address. The
//! backpatch table records, per label not yet defined, every ROM index whose
//! address field is still zero. Both are keyed by the lower-cased label name.

use std::collections::HashMap;

use crate::errors::AssembleError;

/// A defined label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    /// Absolute address of the label.
    pub address: u16,
    /// Source line of the definition.
    pub defined_at: usize,
}

/// Mapping from label name to its resolved address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
}

impl SymbolTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a label definition.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateLabel` if `name` is already defined.
    pub fn define(&mut self, name: &str, address: u16, line: usize) -> Result<(), AssembleError> {
        if let Some(existing) = self.symbols.get(name) {
            return Err(AssembleError::DuplicateLabel {
                label: name.to_string(),
                line,
                first_definition: existing.defined_at,
            });
        }
        self.symbols.insert(
            name.to_string(),
            Symbol {
                address,
                defined_at: line,
            },
        );
        Ok(())
    }

    /// Looks up a label.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Resolved address of a label, if defined.
    #[must_use]
    pub fn address_of(&self, name: &str) -> Option<u16> {
        self.get(name).map(|s| s.address)
    }

    /// Number of defined labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if no labels are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Labels sorted by address, then name.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&str, Symbol)> {
        let mut entries: Vec<_> = self
            .symbols
            .iter()
            .map(|(name, symbol)| (name.as_str(), *symbol))
            .collect();
        entries.sort_by(|a, b| a.1.address.cmp(&b.1.address).then(a.0.cmp(b.0)));
        entries
    }
}

/// A ROM word waiting for a label's address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRef {
    /// Index of the word in the ROM.
    pub index: usize,
    /// Source line of the referencing instruction.
    pub line: usize,
}

/// Mapping from undefined label name to the words that reference it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackpatchTable {
    pending: HashMap<String, Vec<PendingRef>>,
}

impl BackpatchTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the word at `index` needs the address of `name`.
    pub fn record(&mut self, name: &str, index: usize, line: usize) {
        self.pending
            .entry(name.to_string())
            .or_default()
            .push(PendingRef { index, line });
    }

    /// Removes and returns every pending reference to `name`, in emission order.
    pub fn take(&mut self, name: &str) -> Vec<PendingRef> {
        self.pending.remove(name).unwrap_or_default()
    }

    /// Returns true if no references are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending labels with their earliest reference, ordered by that reference.
    #[must_use]
    pub fn unresolved(&self) -> Vec<(&str, PendingRef)> {
        let mut entries: Vec<_> = self
            .pending
            .iter()
            .filter_map(|(name, refs)| refs.first().map(|first| (name.as_str(), *first)))
            .collect();
        entries.sort_by_key(|(_, first)| first.index);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_lookup() {
        let mut table = SymbolTable::new();
        assert!(table.is_empty());
        table.define("loop", 0x200, 1).unwrap();
        assert_eq!(table.address_of("loop"), Some(0x200));
        assert_eq!(table.get("loop").unwrap().defined_at, 1);
        assert_eq!(table.address_of("missing"), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn duplicate_definition_is_rejected() {
        let mut table = SymbolTable::new();
        table.define("start", 0x200, 1).unwrap();
        assert_eq!(
            table.define("start", 0x204, 5),
            Err(AssembleError::DuplicateLabel {
                label: "start".into(),
                line: 5,
                first_definition: 1
            })
        );
        assert_eq!(table.address_of("start"), Some(0x200));
    }

    #[test]
    fn sorted_orders_by_address() {
        let mut table = SymbolTable::new();
        table.define("end", 0x206, 4).unwrap();
        table.define("b", 0x200, 2).unwrap();
        table.define("a", 0x200, 1).unwrap();
        let names: Vec<_> = table.sorted().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b", "end"]);
    }

    #[test]
    fn take_returns_references_in_order_and_clears() {
        let mut table = BackpatchTable::new();
        table.record("skip", 0, 1);
        table.record("skip", 3, 4);
        table.record("other", 1, 2);

        let refs = table.take("skip");
        assert_eq!(
            refs,
            vec![
                PendingRef { index: 0, line: 1 },
                PendingRef { index: 3, line: 4 }
            ]
        );
        assert!(table.take("skip").is_empty());
        assert!(!table.is_empty());
        table.take("other");
        assert!(table.is_empty());
    }

    #[test]
    fn unresolved_is_ordered_by_first_reference() {
        let mut table = BackpatchTable::new();
        table.record("late", 5, 9);
        table.record("early", 2, 3);
        table.record("early", 7, 11);
        let unresolved = table.unresolved();
        assert_eq!(
            unresolved,
            vec![
                ("early", PendingRef { index: 2, line: 3 }),
                ("late", PendingRef { index: 5, line: 9 })
            ]
        );
    }
}
