//! Lexical scopes and variable storage.
//!
//! Names are bound to [`Slot`]s while the program is parsed. Each declaration
//! appends one [`VariableRecord`] to a flat table that only ever grows, and
//! the innermost scope frame maps the declared name to the new slot. The
//! evaluator later reads and writes values by slot alone, so it never has to
//! search scopes by name.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::error::{error, ErrorKind, Result};

/// Stable index of a declared variable. Never reused within a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(usize);

impl Slot {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableRecord {
    /// Name as written at the declaration
    pub name: String,
    /// Current value; 0 until the first write
    pub value: f64,
    /// Line of the `var` declaration
    pub declared_at_line: usize,
    /// Whether the variable has ever been written
    pub initialized: bool,
}

type Frame = HashMap<String, Slot>;

/// Scope stack plus the append-only variable table.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Frame>,
    variables: Vec<VariableRecord>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Creates a table holding only the outermost scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Frame::new()],
            variables: Vec::new(),
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Frame::new());
        trace!(depth = self.scopes.len(), "pushed scope");
    }

    /// Removes the innermost frame. The outermost frame can never be popped.
    pub fn pop_scope(&mut self) -> Result<()> {
        match self.scopes.len() {
            0 => error(ErrorKind::PopEmptyScope),
            1 => error(ErrorKind::PopOutermostScope),
            _ => {
                self.scopes.pop();
                trace!(depth = self.scopes.len(), "popped scope");
                Ok(())
            }
        }
    }

    /// Declares `name` in the innermost frame and returns its new slot.
    ///
    /// Shadowing a name from an enclosing frame is allowed; declaring the same
    /// name twice in one frame is not. The outermost frame cannot be popped,
    /// so a frame is always open; a frameless table reports
    /// [`ErrorKind::NoScope`].
    pub fn declare(&mut self, name: &str, line: usize) -> Result<Slot> {
        let frame = match self.scopes.last_mut() {
            Some(frame) => frame,
            None => return error(ErrorKind::NoScope(name.to_string())),
        };
        if frame.contains_key(name) {
            return error(ErrorKind::Redeclaration(name.to_string()));
        }
        let slot = Slot(self.variables.len());
        self.variables.push(VariableRecord {
            name: name.to_string(),
            value: 0.0,
            declared_at_line: line,
            initialized: false,
        });
        frame.insert(name.to_string(), slot);
        debug!(name, slot = slot.0, line, "declared variable");
        Ok(slot)
    }

    /// Finds the slot bound to `name` in the nearest enclosing frame.
    pub fn resolve(&self, name: &str) -> Result<Slot> {
        self.scopes
            .iter()
            .rev()
            .find_map(|frame| frame.get(name).copied())
            .ok_or_else(|| ErrorKind::UndeclaredVariable(name.to_string()).into())
    }

    /// Current value of `slot`.
    ///
    /// # Panics
    ///
    /// If `slot` was not handed out by this table.
    pub fn read(&self, slot: Slot) -> Result<f64> {
        let record = &self.variables[slot.0];
        if !record.initialized {
            return error(ErrorKind::UninitializedVariable(record.name.clone()));
        }
        Ok(record.value)
    }

    /// Stores `value` in `slot` and marks it initialized.
    ///
    /// # Panics
    ///
    /// If `slot` was not handed out by this table.
    pub fn write(&mut self, slot: Slot, value: f64) {
        let record = &mut self.variables[slot.0];
        record.value = value;
        record.initialized = true;
    }

    /// Number of live scope frames, including the outermost one.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Number of variables ever declared.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn variable(&self, slot: Slot) -> Option<&VariableRecord> {
        self.variables.get(slot.0)
    }

    /// All records in slot order.
    pub fn variables(&self) -> impl Iterator<Item = (Slot, &VariableRecord)> {
        self.variables.iter().enumerate().map(|(i, r)| (Slot(i), r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_has_outermost_scope() {
        let table = SymbolTable::new();
        assert_eq!(table.depth(), 1);
        assert!(table.is_empty());
    }

    #[test]
    fn test_popping_outermost_scope_fails() {
        let mut table = SymbolTable::new();
        let err = table.pop_scope().unwrap_err();
        assert_eq!(err.kind, ErrorKind::PopOutermostScope);

        table.push_scope();
        assert!(table.pop_scope().is_ok());
        assert!(table.pop_scope().is_err());
    }

    #[test]
    fn test_declare_after_refused_pop_uses_outermost_frame() {
        let mut table = SymbolTable::new();
        assert!(table.pop_scope().is_err());
        let slot = table.declare("x", 1).unwrap();
        assert_eq!(table.resolve("x").unwrap(), slot);
    }

    #[test]
    fn test_frameless_table_reports_missing_scope() {
        let mut table = SymbolTable {
            scopes: Vec::new(),
            variables: Vec::new(),
        };
        let err = table.declare("x", 3).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoScope("x".into()));
        assert_eq!(err.to_string(), "No open scope to declare 'x' in");
        assert_eq!(table.pop_scope().unwrap_err().kind, ErrorKind::PopEmptyScope);
    }

    #[test]
    fn test_declare_assigns_increasing_slots() {
        let mut table = SymbolTable::new();
        let a = table.declare("a", 1).unwrap();
        let b = table.declare("b", 2).unwrap();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);

        let record = table.variable(b).unwrap();
        assert_eq!(record.name, "b");
        assert_eq!(record.declared_at_line, 2);
        assert!(!record.initialized);
        assert_eq!(record.value, 0.0);
    }

    #[test]
    fn test_redeclaration_in_same_scope_fails() {
        let mut table = SymbolTable::new();
        table.declare("x", 1).unwrap();
        let err = table.declare("x", 2).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Redeclaration("x".into()));
    }

    #[test]
    fn test_shadowing_and_scope_exit() {
        let mut table = SymbolTable::new();
        let outer = table.declare("x", 1).unwrap();

        table.push_scope();
        let inner = table.declare("x", 2).unwrap();
        assert_ne!(outer, inner);
        assert_eq!(table.resolve("x").unwrap(), inner);

        table.declare("y", 3).unwrap();
        table.pop_scope().unwrap();

        assert_eq!(table.resolve("x").unwrap(), outer);
        let err = table.resolve("y").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndeclaredVariable("y".into()));
    }

    #[test]
    fn test_slots_survive_scope_exit() {
        let mut table = SymbolTable::new();
        table.push_scope();
        let slot = table.declare("tmp", 1).unwrap();
        table.pop_scope().unwrap();

        table.write(slot, 4.5);
        assert_eq!(table.read(slot).unwrap(), 4.5);

        let next = table.declare("tmp", 5).unwrap();
        assert_eq!(next.index(), 1);
    }

    #[test]
    fn test_read_uninitialized_fails() {
        let mut table = SymbolTable::new();
        let slot = table.declare("x", 1).unwrap();
        let err = table.read(slot).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UninitializedVariable("x".into()));

        table.write(slot, 0.0);
        assert_eq!(table.read(slot).unwrap(), 0.0);
        assert!(table.variable(slot).unwrap().initialized);
    }

    #[test]
    fn test_variables_in_slot_order() {
        let mut table = SymbolTable::new();
        table.declare("first", 1).unwrap();
        table.push_scope();
        table.declare("second", 2).unwrap();

        let names: Vec<_> = table.variables().map(|(_, r)| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
