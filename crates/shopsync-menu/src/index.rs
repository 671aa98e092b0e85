//! Name lookup over storefront collections.

use std::collections::HashMap;

use shopsync_core::title_key;
use shopsync_shopify::Collection;

/// Collections keyed by lowercase title and by lowercase handle.
///
/// Keys keep the order in which they were first seen; a later collection
/// with the same key replaces the earlier one in place. The substring pass
/// of [`CollectionIndex::find_match`] walks keys in that order.
#[derive(Debug, Clone, Default)]
pub struct CollectionIndex {
    collections: Vec<Collection>,
    keys: Vec<(String, usize)>,
    positions: HashMap<String, usize>,
}

impl CollectionIndex {
    #[must_use]
    pub fn new(collections: Vec<Collection>) -> Self {
        let mut index = Self::default();
        for collection in collections {
            index.insert(collection);
        }
        index
    }

    fn insert(&mut self, collection: Collection) {
        let slot = self.collections.len();
        let title = title_key(&collection.title);
        let handle = title_key(&collection.handle);
        self.collections.push(collection);

        for key in [title, handle] {
            if key.is_empty() {
                continue;
            }
            match self.positions.get(&key) {
                Some(&pos) => self.keys[pos].1 = slot,
                None => {
                    self.positions.insert(key.clone(), self.keys.len());
                    self.keys.push((key, slot));
                }
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Resolves a department or sub-department name to a collection.
    ///
    /// Tried in order: exact key, the name as a handle (spaces to dashes),
    /// then the first key that contains the name or is contained in it.
    /// The last step is deliberately loose and can pick a wrong collection
    /// when names overlap.
    #[must_use]
    pub fn find_match(&self, name: &str) -> Option<&Collection> {
        let search = title_key(name);
        if search.is_empty() {
            return None;
        }
        if let Some(found) = self.lookup(&search) {
            return Some(found);
        }
        if let Some(found) = self.lookup(&search.replace(' ', "-")) {
            return Some(found);
        }
        self.keys
            .iter()
            .find(|(key, _)| key.contains(&search) || search.contains(key.as_str()))
            .map(|&(_, slot)| &self.collections[slot])
    }

    fn lookup(&self, key: &str) -> Option<&Collection> {
        self.positions
            .get(key)
            .map(|&pos| &self.collections[self.keys[pos].1])
    }
}
