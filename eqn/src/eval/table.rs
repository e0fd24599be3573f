//! Named variable slots with stable indices

use super::Cell;
use std::collections::HashMap;

/// Ordered name-to-cell store
///
/// Slots are appended in insertion order and an index, once handed out,
/// stays valid until the table is cleared. Lookups run by name or by
/// that stable index.
#[derive(Debug, Default)]
pub struct VariableTable {
    slots: Vec<Cell>,
    names: HashMap<String, usize>,
}

impl VariableTable {
    pub fn new() -> Self {
        VariableTable::default()
    }

    /// Index of a known variable
    pub fn find(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// Create a slot for a new name and return its index
    ///
    /// Callers check `find` first; inserting a name twice orphans the
    /// earlier slot.
    pub fn insert(&mut self, name: &str, cell: Cell) -> usize {
        let index = self.slots.len();
        self.slots.push(cell);
        self.names.insert(name.to_string(), index);
        index
    }

    /// Cell at an index
    pub fn at(&self, index: usize) -> Option<Cell> {
        self.slots.get(index).copied()
    }

    /// Overwrite an in-range slot; out-of-range writes are dropped
    pub fn put(&mut self, index: usize, cell: Cell) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = cell;
        }
    }

    /// Numeric value of a named variable, or the default when absent
    pub fn get(&self, name: &str, default: f64) -> f64 {
        self.find(name)
            .and_then(|index| self.at(index))
            .map_or(default, |cell| cell.num())
    }

    /// Numeric value at an index, or the default when out of range
    pub fn get_at(&self, index: usize, default: f64) -> f64 {
        self.at(index).map_or(default, |cell| cell.num())
    }

    /// Insert-or-overwrite a plain value under a name
    pub fn set(&mut self, name: &str, value: f64) {
        match self.find(name) {
            Some(index) => self.put(index, Cell::Value(value)),
            None => {
                self.insert(name, Cell::Value(value));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop every slot and name
    pub fn clear(&mut self) {
        self.slots.clear();
        self.names.clear();
    }
}
