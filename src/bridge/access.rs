use crate::error::{Error, Result};
use crate::{Tag, TagType};

/// Iterator over the children of a compound or list, from [`Tag::values`].
/// A clone continues independently from the same position.
#[derive(Debug, Clone)]
pub struct Values<'a> {
    inner: ValuesInner<'a>,
}

#[derive(Debug, Clone)]
enum ValuesInner<'a> {
    Compound(indexmap::map::Values<'a, String, Tag>),
    List(std::slice::Iter<'a, Tag>),
}

impl<'a> Iterator for Values<'a> {
    type Item = &'a Tag;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            ValuesInner::Compound(it) => it.next(),
            ValuesInner::List(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            ValuesInner::Compound(it) => it.size_hint(),
            ValuesInner::List(it) => it.size_hint(),
        }
    }
}

impl ExactSizeIterator for Values<'_> {}

impl Tag {
    /// Look up a key in a compound.
    ///
    /// ```
    /// # use quicknbt::{nbt, error::ErrorKind};
    /// let tag = nbt!({ "a": 1 }).unwrap();
    /// assert_eq!(tag.get("a").unwrap(), &1);
    /// assert!(matches!(tag.get("b").unwrap_err().kind(), ErrorKind::KeyNotFound(_)));
    /// ```
    pub fn get(&self, key: &str) -> Result<&Tag> {
        self.as_compound()?
            .get(key)
            .ok_or_else(|| Error::key_not_found(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Result<&mut Tag> {
        self.as_compound_mut()?
            .get_mut(key)
            .ok_or_else(|| Error::key_not_found(key))
    }

    /// Index into a list.
    pub fn at(&self, index: usize) -> Result<&Tag> {
        let list = self.as_list()?;
        list.get(index)
            .ok_or_else(|| Error::index_out_of_range(index, list.len()))
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut Tag> {
        let list = self.as_list_mut()?;
        let len = list.len();
        list.get_mut(index)
            .ok_or_else(|| Error::index_out_of_range(index, len))
    }

    /// Iterate over the values of a compound or the elements of a list, in
    /// stored order. Nothing is copied; each call starts a new pass.
    pub fn values(&self) -> Result<Values<'_>> {
        let inner = match self {
            Tag::Compound(c) => ValuesInner::Compound(c.values()),
            Tag::List(l) => ValuesInner::List(l.iter()),
            other => return Err(Error::type_mismatch(TagType::Compound, other.tag_type())),
        };
        Ok(Values { inner })
    }

    /// Number of entries in a compound, elements in a list or array, or
    /// bytes in a string.
    pub fn len(&self) -> Result<usize> {
        Ok(match self {
            Tag::Compound(c) => c.len(),
            Tag::List(l) => l.len(),
            Tag::ByteArray(a) => a.len(),
            Tag::IntArray(a) => a.len(),
            Tag::LongArray(a) => a.len(),
            Tag::String(s) => s.len(),
            other => return Err(Error::type_mismatch(TagType::List, other.tag_type())),
        })
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|len| len == 0)
    }
}
