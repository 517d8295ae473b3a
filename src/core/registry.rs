//! The subproject registry.
//!
//! Maps subproject names to their entries. Iteration is ordered by name so
//! everything derived from a registry (generated files, listings, missing
//! dependency reports) comes out in a stable order.

use std::collections::btree_map::{self, BTreeMap};

use crate::core::subproject::Subproject;

/// Result of inserting an entry under the duplicate policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// The name was not registered yet.
    Added,
    /// The new entry had a strictly shorter path and replaced `previous`.
    Replaced { previous: Subproject },
    /// An entry with an equal or shorter path was already registered; the
    /// challenger was discarded.
    Kept { discarded: Subproject },
}

/// A dependency declared by `dependent` that no registry entry provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDependency {
    pub dependent: String,
    pub dependency: String,
}

/// Registry of subprojects keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<String, Subproject>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Insert an entry, resolving name clashes by path length.
    ///
    /// The entry whose path string is shorter wins. On a tie the existing
    /// entry stays. The rule is arbitrary but must not change: existing
    /// trees rely on which copy of a duplicated subproject is picked.
    pub fn insert(&mut self, subproject: Subproject) -> Insertion {
        match self.entries.entry(subproject.name().to_string()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(subproject);
                Insertion::Added
            }
            btree_map::Entry::Occupied(mut slot) => {
                if subproject.path_len() < slot.get().path_len() {
                    let previous = slot.insert(subproject);
                    Insertion::Replaced { previous }
                } else {
                    Insertion::Kept {
                        discarded: subproject,
                    }
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Subproject> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Subproject> {
        self.entries.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Every declared dependency without a registry entry, ordered by
    /// dependent name and then declaration order.
    pub fn missing_dependencies(&self) -> Vec<MissingDependency> {
        self.iter()
            .flat_map(|sp| {
                sp.dependencies()
                    .iter()
                    .filter(|dep| !self.contains(dep))
                    .map(|dep| MissingDependency {
                        dependent: sp.name().to_string(),
                        dependency: dep.clone(),
                    })
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Subproject;
    type IntoIter = btree_map::Values<'a, String, Subproject>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

impl FromIterator<Subproject> for Registry {
    fn from_iter<I: IntoIterator<Item = Subproject>>(iter: I) -> Self {
        let mut registry = Registry::new();
        for sp in iter {
            registry.insert(sp);
        }
        registry
    }
}
