use std::hash::{Hash, Hasher};
use std::ops::Range;

use serde::Serialize;

use crate::{
    error::{Error, Result},
    Tag, TagType, LIST_TOKEN,
};

/// An NBT list. Every element has the same tag type, which is fixed by the
/// first element inserted. Inserting an element of any other type fails with
/// [`ListHeterogeneity`][crate::error::ErrorKind::ListHeterogeneity]:
///
/// ```
/// # use quicknbt::{List, Tag};
/// let mut list = List::new();
/// list.push(Tag::Int(1)).unwrap();
/// assert!(list.push(Tag::Short(2)).is_err());
/// ```
///
/// An empty list forgets its element type, so once emptied it will take
/// elements of any type again.
#[derive(Debug, Clone)]
pub struct List {
    // Only meaningful while the list is empty, where it records the element
    // type declared in binary input so that re-encoding is byte-identical.
    element: TagType,
    items: Vec<Tag>,
}

impl Default for List {
    fn default() -> Self {
        Self::new()
    }
}

impl List {
    pub fn new() -> Self {
        Self {
            element: TagType::End,
            items: Vec::new(),
        }
    }

    /// Empty list that remembers an element type. Only the binary encoding
    /// can observe the difference from [`List::new`].
    pub fn with_element_type(element: TagType) -> Self {
        Self {
            element,
            items: Vec::new(),
        }
    }

    /// Build a list from already type-checked items. The decoders use this
    /// after reading every element with the same declared tag.
    pub(crate) fn from_raw(element: TagType, items: Vec<Tag>) -> Self {
        Self { element, items }
    }

    /// The type of every element. `End` for an empty list unless it was
    /// decoded with a declared type.
    pub fn element_type(&self) -> TagType {
        match self.items.first() {
            Some(first) => first.tag_type(),
            None => self.element,
        }
    }

    fn check(&self, tag: &Tag) -> Result<()> {
        let found = tag.tag_type();
        if found == TagType::End {
            return Err(Error::heterogeneous(self.element_type(), found));
        }
        match self.items.first() {
            Some(first) if first.tag_type() != found => {
                Err(Error::heterogeneous(first.tag_type(), found))
            }
            _ => Ok(()),
        }
    }

    /// Append an element.
    pub fn push(&mut self, tag: impl Into<Tag>) -> Result<()> {
        let tag = tag.into();
        self.check(&tag)?;
        self.element = tag.tag_type();
        self.items.push(tag);
        Ok(())
    }

    /// Insert an element at `index`, shifting later elements along.
    pub fn insert(&mut self, index: usize, tag: impl Into<Tag>) -> Result<()> {
        if index > self.items.len() {
            return Err(Error::index_out_of_range(index, self.items.len()));
        }
        let tag = tag.into();
        self.check(&tag)?;
        self.element = tag.tag_type();
        self.items.insert(index, tag);
        Ok(())
    }

    /// Replace the element at `index`, returning the old one. The replacement
    /// must have the list's element type, even when it is the only element;
    /// `clear` the list first to change type.
    pub fn set(&mut self, index: usize, tag: impl Into<Tag>) -> Result<Tag> {
        let len = self.items.len();
        if index >= len {
            return Err(Error::index_out_of_range(index, len));
        }
        let tag = tag.into();
        self.check(&tag)?;
        Ok(std::mem::replace(&mut self.items[index], tag))
    }

    /// Remove and return the element at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Tag> {
        if index >= self.items.len() {
            return Err(Error::index_out_of_range(index, self.items.len()));
        }
        let tag = self.items.remove(index);
        self.forget_type_if_empty();
        Ok(tag)
    }

    /// Remove the elements in `range`, returning them in order.
    pub fn remove_range(&mut self, range: Range<usize>) -> Result<Vec<Tag>> {
        let len = self.items.len();
        if range.start > range.end {
            return Err(Error::index_out_of_range(range.start, range.end));
        }
        if range.end > len {
            return Err(Error::index_out_of_range(range.end, len));
        }
        let removed = self.items.drain(range).collect();
        self.forget_type_if_empty();
        Ok(removed)
    }

    /// Append every element of `other`, which must hold the same element
    /// type unless either list is empty. Nothing is appended on failure.
    pub fn merge(&mut self, other: List) -> Result<()> {
        if !self.accepts(&other) {
            return Err(Error::heterogeneous(
                self.element_type(),
                other.element_type(),
            ));
        }
        self.append(other);
        Ok(())
    }

    /// Whether every element of `other` could be pushed onto this list.
    pub fn accepts(&self, other: &List) -> bool {
        self.items.is_empty()
            || other.items.is_empty()
            || self.element_type() == other.element_type()
    }

    pub(crate) fn append(&mut self, other: List) {
        if self.items.is_empty() {
            self.element = other.element_type();
        }
        self.items.extend(other.items);
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.element = TagType::End;
    }

    fn forget_type_if_empty(&mut self) {
        if self.items.is_empty() {
            self.element = TagType::End;
        }
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.items.get(index)
    }

    /// Mutable access to an element. Replacing the element with a tag of a
    /// different type breaks the list; the encoders reject such lists.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tag> {
        self.items.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Tag] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Tag> {
        self.items
    }

    /// Check that every element still has the list's element type. Lists can
    /// only drift through [`List::get_mut`].
    pub(crate) fn verify(&self) -> Result<()> {
        let element = self.element_type();
        match self.items.iter().find(|t| t.tag_type() != element) {
            Some(bad) => Err(Error::heterogeneous(element, bad.tag_type())),
            None => Ok(()),
        }
    }
}

impl PartialEq for List {
    // The element type of an empty list is only an encoding detail.
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Hash for List {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.hash(state);
    }
}

impl TryFrom<Vec<Tag>> for List {
    type Error = Error;

    fn try_from(items: Vec<Tag>) -> Result<Self> {
        let mut list = List::new();
        for item in items {
            list.push(item)?;
        }
        Ok(list)
    }
}

impl IntoIterator for List {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Serialize for List {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_newtype_struct(LIST_TOKEN, &self.items)
    }
}
