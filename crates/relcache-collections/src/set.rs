//! OID sets with backing chosen by the capability probe.
//!
//! Same locking discipline as [`OidMap`](crate::OidMap): each point
//! operation holds the internal lock for exactly that operation.

use std::collections::{BTreeSet, HashSet};

use parking_lot::RwLock;
use relcache_types::Oid;

use crate::capability::{Capabilities, MapBacking};

#[derive(Debug, Clone)]
enum SetRepr {
    Ordered(BTreeSet<Oid>),
    Hashed(HashSet<Oid>),
}

impl SetRepr {
    fn empty(backing: MapBacking) -> Self {
        match backing {
            MapBacking::Ordered => Self::Ordered(BTreeSet::new()),
            MapBacking::Hashed => Self::Hashed(HashSet::new()),
        }
    }

    fn backing(&self) -> MapBacking {
        match self {
            Self::Ordered(_) => MapBacking::Ordered,
            Self::Hashed(_) => MapBacking::Hashed,
        }
    }
}

/// A set of OIDs. Shares the map family's backing selection: ordered
/// tree set when available, hash set fallback otherwise.
#[derive(Debug)]
pub struct OidSet {
    repr: RwLock<SetRepr>,
}

impl OidSet {
    /// Create an empty set with the process-wide probed backing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_backing(Capabilities::get().map_backing())
    }

    /// Create an empty set with an explicit backing.
    #[must_use]
    pub fn with_backing(backing: MapBacking) -> Self {
        Self {
            repr: RwLock::new(SetRepr::empty(backing)),
        }
    }

    /// Which backing this instance uses.
    #[must_use]
    pub fn backing(&self) -> MapBacking {
        self.repr.read().backing()
    }

    /// Insert `oid`. Returns `true` if it was not already present.
    pub fn insert(&self, oid: Oid) -> bool {
        match &mut *self.repr.write() {
            SetRepr::Ordered(s) => s.insert(oid),
            SetRepr::Hashed(s) => s.insert(oid),
        }
    }

    /// Membership test.
    #[must_use]
    pub fn contains(&self, oid: Oid) -> bool {
        match &*self.repr.read() {
            SetRepr::Ordered(s) => s.contains(&oid),
            SetRepr::Hashed(s) => s.contains(&oid),
        }
    }

    /// Remove `oid`. Returns `true` if it was present.
    pub fn remove(&self, oid: Oid) -> bool {
        match &mut *self.repr.write() {
            SetRepr::Ordered(s) => s.remove(&oid),
            SetRepr::Hashed(s) => s.remove(&oid),
        }
    }

    /// Remove `oid` if present; absence is a no-op, never an error.
    pub fn discard(&self, oid: Oid) {
        self.remove(oid);
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        match &*self.repr.read() {
            SetRepr::Ordered(s) => s.len(),
            SetRepr::Hashed(s) => s.len(),
        }
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All members in ascending order. The hashed backing sorts a
    /// snapshot.
    #[must_use]
    pub fn sorted_members(&self) -> Vec<Oid> {
        match &*self.repr.read() {
            SetRepr::Ordered(s) => s.iter().copied().collect(),
            SetRepr::Hashed(s) => {
                let mut members: Vec<Oid> = s.iter().copied().collect();
                members.sort_unstable();
                members
            }
        }
    }
}

impl Default for OidSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for OidSet {
    fn clone(&self) -> Self {
        Self {
            repr: RwLock::new(self.repr.read().clone()),
        }
    }
}

/// Membership equality: two sets are equal when they hold the same OIDs,
/// regardless of which backing each one uses.
impl PartialEq for OidSet {
    fn eq(&self, other: &Self) -> bool {
        self.sorted_members() == other.sorted_members()
    }
}

impl Eq for OidSet {}

impl FromIterator<Oid> for OidSet {
    fn from_iter<I: IntoIterator<Item = Oid>>(iter: I) -> Self {
        let set = Self::new();
        {
            let mut repr = set.repr.write();
            for oid in iter {
                match &mut *repr {
                    SetRepr::Ordered(s) => {
                        s.insert(oid);
                    }
                    SetRepr::Hashed(s) => {
                        s.insert(oid);
                    }
                }
            }
        }
        set
    }
}

impl Extend<Oid> for OidSet {
    fn extend<I: IntoIterator<Item = Oid>>(&mut self, iter: I) {
        let mut repr = self.repr.write();
        for oid in iter {
            match &mut *repr {
                SetRepr::Ordered(s) => {
                    s.insert(oid);
                }
                SetRepr::Hashed(s) => {
                    s.insert(oid);
                }
            }
        }
    }
}
