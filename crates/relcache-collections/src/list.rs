//! Append-friendly sequences of raw 64-bit identifiers.
//!
//! An [`OidList`] can hold tens of millions of elements, so per-element
//! footprint dominates: the packed backing stores exactly 8 bytes per
//! element in one contiguous allocation, which also makes slicing a
//! memcpy. The segmented fallback trades contiguity for growth without
//! large reallocation spikes, and is selected where packed iteration is
//! known to be slow for the execution environment (see
//! [`Capabilities`](crate::Capabilities)).
//!
//! Lists are single-owner: mutation goes through `&mut self`, and the
//! point-operation atomicity contract of the map/set family does not
//! apply here. Consumers fill a list, then read it sequentially or by
//! slice.

use std::collections::VecDeque;
use std::ops::Range;

use crate::capability::{Capabilities, ListBacking};

#[derive(Debug, Clone)]
enum ListRepr {
    Packed(Vec<u64>),
    Segmented(VecDeque<u64>),
}

/// An ordered sequence of raw 64-bit identifiers (OIDs or TIDs).
#[derive(Debug, Clone)]
pub struct OidList {
    repr: ListRepr,
}

/// TID sequences use the same representation as OID sequences.
pub type TidList = OidList;

impl OidList {
    /// Create an empty list with the process-wide probed backing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_backing(Capabilities::get().list_backing())
    }

    /// Create an empty list with an explicit backing.
    #[must_use]
    pub fn with_backing(backing: ListBacking) -> Self {
        let repr = match backing {
            ListBacking::Packed => ListRepr::Packed(Vec::new()),
            ListBacking::Segmented => ListRepr::Segmented(VecDeque::new()),
        };
        Self { repr }
    }

    /// Create an empty list with room for `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let repr = match Capabilities::get().list_backing() {
            ListBacking::Packed => ListRepr::Packed(Vec::with_capacity(capacity)),
            ListBacking::Segmented => ListRepr::Segmented(VecDeque::with_capacity(capacity)),
        };
        Self { repr }
    }

    /// Which backing this instance uses.
    #[must_use]
    pub fn backing(&self) -> ListBacking {
        match &self.repr {
            ListRepr::Packed(_) => ListBacking::Packed,
            ListRepr::Segmented(_) => ListBacking::Segmented,
        }
    }

    /// Append a value.
    pub fn push(&mut self, value: u64) {
        match &mut self.repr {
            ListRepr::Packed(v) => v.push(value),
            ListRepr::Segmented(v) => v.push_back(value),
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.repr {
            ListRepr::Packed(v) => v.len(),
            ListRepr::Segmented(v) => v.len(),
        }
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u64> {
        match &self.repr {
            ListRepr::Packed(v) => v.get(index).copied(),
            ListRepr::Segmented(v) => v.get(index).copied(),
        }
    }

    /// Iterate the elements in order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        match &self.repr {
            ListRepr::Packed(v) => Iter(IterRepr::Packed(v.iter())),
            ListRepr::Segmented(v) => Iter(IterRepr::Segmented(v.iter())),
        }
    }

    /// Copy out the elements in `range`, clamped to the list bounds
    /// (sequence-slicing semantics: an out-of-bounds or inverted range
    /// yields an empty vector, never a panic).
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Vec<u64> {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        match &self.repr {
            ListRepr::Packed(v) => v[start..end].to_vec(),
            ListRepr::Segmented(v) => v.iter().skip(start).take(end - start).copied().collect(),
        }
    }
}

impl Default for OidList {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<u64> for OidList {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl Extend<u64> for OidList {
    fn extend<I: IntoIterator<Item = u64>>(&mut self, iter: I) {
        match &mut self.repr {
            ListRepr::Packed(v) => v.extend(iter),
            ListRepr::Segmented(v) => v.extend(iter),
        }
    }
}

impl<'a> IntoIterator for &'a OidList {
    type Item = u64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
enum IterRepr<'a> {
    Packed(std::slice::Iter<'a, u64>),
    Segmented(std::collections::vec_deque::Iter<'a, u64>),
}

/// Iterator over an [`OidList`], yielding elements by value.
#[derive(Debug, Clone)]
pub struct Iter<'a>(IterRepr<'a>);

impl Iterator for Iter<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        match &mut self.0 {
            IterRepr::Packed(it) => it.next().copied(),
            IterRepr::Segmented(it) => it.next().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.0 {
            IterRepr::Packed(it) => it.size_hint(),
            IterRepr::Segmented(it) => it.size_hint(),
        }
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<u64> {
        match &mut self.0 {
            IterRepr::Packed(it) => it.next_back().copied(),
            IterRepr::Segmented(it) => it.next_back().copied(),
        }
    }
}
