use std::ops::{Deref, DerefMut};

use serde::Serialize;

// Newtype struct names that mark NBT arrays and lists while passing through
// serde. Formats like JSON ignore newtype names so these stay invisible there,
// but our own serializer in `bridge::ser` uses them to keep the exact tag type.
pub(crate) const BYTE_ARRAY_TOKEN: &str = "__quicknbt_byte_array";
pub(crate) const INT_ARRAY_TOKEN: &str = "__quicknbt_int_array";
pub(crate) const LONG_ARRAY_TOKEN: &str = "__quicknbt_long_array";
pub(crate) const LIST_TOKEN: &str = "__quicknbt_list";

macro_rules! nbt_array {
    ($(#[$meta:meta])* $name:ident, $elem:ty, $token:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "arbitrary1", derive(arbitrary::Arbitrary))]
        pub struct $name {
            data: Vec<$elem>,
        }

        impl $name {
            pub fn new(data: Vec<$elem>) -> Self {
                Self { data }
            }

            /// Take the elements out of the array.
            pub fn into_inner(self) -> Vec<$elem> {
                self.data
            }
        }

        impl Deref for $name {
            type Target = Vec<$elem>;

            fn deref(&self) -> &Self::Target {
                &self.data
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.data
            }
        }

        impl From<Vec<$elem>> for $name {
            fn from(data: Vec<$elem>) -> Self {
                Self::new(data)
            }
        }

        impl FromIterator<$elem> for $name {
            fn from_iter<I: IntoIterator<Item = $elem>>(iter: I) -> Self {
                Self::new(iter.into_iter().collect())
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $elem;
            type IntoIter = std::slice::Iter<'a, $elem>;

            fn into_iter(self) -> Self::IntoIter {
                self.data.iter()
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                // We can't know anything about NBT here, since we might be
                // serializing to a different format. The newtype name signals
                // our own serializer.
                serializer.serialize_newtype_struct($token, &self.data)
            }
        }
    };
}

nbt_array!(
    /// NBT Byte Array, a contiguous run of `i8`.
    ByteArray,
    i8,
    BYTE_ARRAY_TOKEN
);

nbt_array!(
    /// NBT Int Array, a contiguous run of `i32`.
    IntArray,
    i32,
    INT_ARRAY_TOKEN
);

nbt_array!(
    /// NBT Long Array, a contiguous run of `i64`.
    LongArray,
    i64,
    LONG_ARRAY_TOKEN
);

impl ByteArray {
    /// Create a byte array from unsigned bytes, reinterpreting each as `i8`.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::new(data.iter().map(|b| *b as i8).collect())
    }
}
