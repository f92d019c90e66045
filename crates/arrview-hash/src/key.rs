//! Arrays as content-compared map keys.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use arrview_core::Array;
use indexmap::IndexMap;

use crate::content::{content_eq, content_hash};
use crate::fnv::BuildFnv;

/// Hash and equality over array contents, for use as key operations.
///
/// - `hash` is 0 for the null array and [`content_hash`] otherwise.
/// - `equal` holds when the arrays are shallow-equal or both are non-null
///   with equal contents. Null equals only null.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyOps;

impl KeyOps {
    /// Content hash of `key`, 0 when null.
    pub fn hash<T: Hash>(key: Array<'_, T>) -> u64 {
        match key.as_slice() {
            Some(elems) => content_hash(elems),
            None => 0,
        }
    }

    /// Shallow or content equality of two keys.
    pub fn equal<T: PartialEq>(a: Array<'_, T>, b: Array<'_, T>) -> bool {
        if a == b {
            return true;
        }
        match (a.as_slice(), b.as_slice()) {
            (Some(a), Some(b)) => content_eq(a, b),
            _ => false,
        }
    }
}

/// An [`Array`] that hashes and compares by contents through [`KeyOps`].
///
/// ```
/// use arrview_core::Array;
/// use arrview_hash::{ContentKey, ContentMap};
///
/// let stored = vec![1, 2, 3];
/// let lookup = [1, 2, 3];
///
/// let mut map = ContentMap::default();
/// map.insert(ContentKey::from(&stored), "found");
/// assert_eq!(map.get(&ContentKey(Array::from_array(&lookup))), Some(&"found"));
/// ```
pub struct ContentKey<'a, T>(pub Array<'a, T>);

impl<'a, T> ContentKey<'a, T> {
    /// The wrapped view.
    pub fn array(&self) -> Array<'a, T> {
        self.0
    }
}

impl<T> Clone for ContentKey<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ContentKey<'_, T> {}

impl<T: Hash> Hash for ContentKey<'_, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(KeyOps::hash(self.0));
    }
}

impl<T: PartialEq> PartialEq for ContentKey<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        KeyOps::equal(self.0, other.0)
    }
}

impl<T: Eq> Eq for ContentKey<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for ContentKey<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContentKey").field(&self.0).finish()
    }
}

impl<'a, T> From<Array<'a, T>> for ContentKey<'a, T> {
    fn from(a: Array<'a, T>) -> Self {
        Self(a)
    }
}

impl<'a, T> From<&'a [T]> for ContentKey<'a, T> {
    fn from(s: &'a [T]) -> Self {
        Self(Array::from_slice(s))
    }
}

impl<'a, T> From<&'a Vec<T>> for ContentKey<'a, T> {
    fn from(v: &'a Vec<T>) -> Self {
        Self(Array::from_slice(v))
    }
}

/// Hash map keyed by array contents.
pub type ContentMap<'a, T, V> = HashMap<ContentKey<'a, T>, V, BuildFnv>;

/// Insertion-ordered map keyed by array contents.
pub type ContentIndexMap<'a, T, V> = IndexMap<ContentKey<'a, T>, V, BuildFnv>;
