//! Session variable dictionary, fed by assignment results.

use crate::protocol::{Dictionary, RecognitionItem};

/// Symbol → last-known value.
///
/// Keys are only ever added or overwritten; [`VariableStore::clear`] (driven
/// by a session reset) is the only way to drop one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStore {
    vars: Dictionary,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge every assignment item in sequence order; later items win.
    /// Returns the number of assignments applied.
    pub fn apply_assignments(&mut self, items: &[RecognitionItem]) -> usize {
        let mut applied = 0;
        for item in items.iter().filter(|i| i.is_assignment) {
            log::debug!("assign {} = {}", item.expr, item.result);
            self.vars.insert(item.expr.clone(), item.result.clone());
            applied += 1;
        }
        applied
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Copy of the current dictionary for an outgoing request.
    pub fn snapshot(&self) -> Dictionary {
        self.vars.clone()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_assignment_wins_within_batch() {
        let mut store = VariableStore::new();
        let items = [
            RecognitionItem::new("x", "5", true),
            RecognitionItem::new("y", "x+1", false),
            RecognitionItem::new("x", "7", true),
        ];
        assert_eq!(store.apply_assignments(&items), 2);
        assert_eq!(store.get("x"), Some("7"));
        assert_eq!(store.get("y"), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn keys_survive_later_batches() {
        let mut store = VariableStore::new();
        store.apply_assignments(&[RecognitionItem::new("a", "1", true)]);
        store.apply_assignments(&[RecognitionItem::new("b", "2", true)]);
        store.apply_assignments(&[RecognitionItem::new("c", "a+b", false)]);
        let snap = store.snapshot();
        assert_eq!(snap.get("a").map(String::as_str), Some("1"));
        assert_eq!(snap.get("b").map(String::as_str), Some("2"));
        assert_eq!(snap.len(), 2);
    }

    #[test]
    fn clear_empties_store() {
        let mut store = VariableStore::new();
        store.apply_assignments(&[RecognitionItem::new("a", "1", true)]);
        store.clear();
        assert!(store.is_empty());
    }
}
