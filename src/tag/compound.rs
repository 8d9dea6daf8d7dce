use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use serde::{ser::SerializeMap, Serialize};

use crate::{
    error::{Error, Result},
    Tag,
};

/// An NBT compound: string keys mapped to tags, in insertion order.
///
/// Order is part of the value. Two compounds holding the same entries in a
/// different order are not equal, and every codec writes entries in the order
/// they were inserted.
#[derive(Debug, Clone, Default)]
pub struct Compound {
    entries: IndexMap<String, Tag>,
}

impl Compound {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert a value. A new key goes at the end; an existing key keeps its
    /// position and the old value is returned.
    ///
    /// `Tag::End` is not a value and is rejected, leaving the compound
    /// unchanged.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Tag>,
    ) -> Result<Option<Tag>> {
        let key = key.into();
        let value = value.into();
        if value.is_end() {
            return Err(Error::end_value(&key));
        }
        Ok(self.entries.insert(key, value))
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Tag> {
        self.entries.get_mut(key)
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.entries.shift_remove(key)
    }

    /// Change the key of an entry without moving it. Fails if `from` is
    /// missing. If `to` already exists elsewhere, that entry is dropped.
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> Result<()> {
        let to = to.into();
        let index = self
            .entries
            .get_index_of(from)
            .ok_or_else(|| Error::key_not_found(from))?;
        if from == to {
            return Ok(());
        }

        let entries = std::mem::take(&mut self.entries);
        self.entries = entries
            .into_iter()
            .enumerate()
            .filter(|(i, (k, _))| *i == index || *k != to)
            .map(|(i, (k, v))| if i == index { (to.clone(), v) } else { (k, v) })
            .collect();
        Ok(())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Tag> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, Tag> {
        self.entries.iter_mut()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Tag> {
        self.entries.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Tag> {
        self.entries.values()
    }

    pub fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, String, Tag> {
        self.entries.values_mut()
    }

    /// Merge `other` into this compound. Nested compounds present on both
    /// sides are merged recursively. When `merge_lists` is set, lists present
    /// on both sides with compatible element types are appended; otherwise
    /// the value from `other` replaces ours. New keys go at the end.
    pub fn merge(&mut self, other: Compound, merge_lists: bool) {
        for (key, theirs) in other.entries {
            let mine = match self.entries.get_mut(&key) {
                Some(mine) => mine,
                None => {
                    self.entries.insert(key, theirs);
                    continue;
                }
            };
            match (mine, theirs) {
                (Tag::Compound(mine), Tag::Compound(theirs)) => mine.merge(theirs, merge_lists),
                (Tag::List(mine), Tag::List(theirs)) if merge_lists && mine.accepts(&theirs) => {
                    mine.append(theirs)
                }
                (slot, theirs) => *slot = theirs,
            }
        }
    }
}

impl PartialEq for Compound {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().zip(other.entries.iter()).all(|(a, b)| a == b)
    }
}

impl Hash for Compound {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.len().hash(state);
        for (k, v) in &self.entries {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: Into<String>, V: Into<Tag>> TryFrom<Vec<(K, V)>> for Compound {
    type Error = Error;

    /// Build a compound from entries in order. Fails on the first `End`
    /// value.
    fn try_from(entries: Vec<(K, V)>) -> Result<Self> {
        let mut compound = Compound::with_capacity(entries.len());
        for (k, v) in entries {
            compound.insert(k, v)?;
        }
        Ok(compound)
    }
}

impl IntoIterator for Compound {
    type Item = (String, Tag);
    type IntoIter = indexmap::map::IntoIter<String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a String, &'a Tag);
    type IntoIter = indexmap::map::Iter<'a, String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for Compound {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
