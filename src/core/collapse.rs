use std::collections::HashMap;

use crate::core::value::Value;
use crate::core::value_path::ValuePath;

/// Sparse collapse map. Paths absent from the map count as expanded, so a
/// freshly parsed document carries no entries at all; only nodes the user
/// toggled or a bulk collapse touched ever appear.
#[derive(Debug, Clone, Default)]
pub struct CollapseState {
    entries: HashMap<ValuePath, bool>,
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collapsed(&self, path: &ValuePath) -> bool {
        self.entries.get(path).copied().unwrap_or(false)
    }

    /// Flips the flag for `path`; an absent entry flips from expanded, so
    /// the first toggle on any node collapses it.
    pub fn toggle(&mut self, path: ValuePath) {
        let entry = self.entries.entry(path).or_insert(false);
        *entry = !*entry;
    }

    /// Replaces the store with a collapsed entry for every non-empty object
    /// or list in `root`. Leaves and empty containers have nothing to hide
    /// and never get an entry.
    pub fn collapse_all(&mut self, root: &Value) {
        self.entries.clear();
        collect_containers(root, ValuePath::root(), &mut self.entries);
    }

    pub fn expand_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn collect_containers(value: &Value, path: ValuePath, out: &mut HashMap<ValuePath, bool>) {
    match value {
        Value::List(items) if !items.is_empty() => {
            for (index, item) in items.iter().enumerate() {
                collect_containers(item, path.child_index(index), out);
            }
            out.insert(path, true);
        }
        Value::Object(entries) if !entries.is_empty() => {
            for (key, child) in entries {
                collect_containers(child, path.child_key(key.as_str()), out);
            }
            out.insert(path, true);
        }
        _ => {}
    }
}
