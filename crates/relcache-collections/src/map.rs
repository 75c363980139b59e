//! OID-keyed maps with backing chosen by the capability probe.
//!
//! [`OidMap`] wraps either a sorted tree map or a hash map behind one
//! API. Point operations each take the internal lock for exactly the
//! duration of that operation, which is the atomicity contract the MVCC
//! cache relies on: a reader racing a single point write observes the
//! pre- or post-state, never a torn intermediate.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use relcache_types::{Oid, Tid};

use crate::capability::{Capabilities, MapBacking};

#[derive(Debug, Clone)]
enum MapRepr<V> {
    Ordered(BTreeMap<Oid, V>),
    Hashed(HashMap<Oid, V>),
}

impl<V> MapRepr<V> {
    fn empty(backing: MapBacking) -> Self {
        match backing {
            MapBacking::Ordered => Self::Ordered(BTreeMap::new()),
            MapBacking::Hashed => Self::Hashed(HashMap::new()),
        }
    }

    fn backing(&self) -> MapBacking {
        match self {
            Self::Ordered(_) => MapBacking::Ordered,
            Self::Hashed(_) => MapBacking::Hashed,
        }
    }
}

/// A mapping from OID to `V`, keys unique, ordered iteration available
/// regardless of backing.
///
/// Instances are cheap to create and owned by the consumer; only the
/// *choice* of backing is process-wide (see
/// [`Capabilities`](crate::Capabilities)).
#[derive(Debug)]
pub struct OidMap<V> {
    repr: RwLock<MapRepr<V>>,
}

/// OID→TID map used for MVCC visibility bookkeeping.
pub type OidTidMap = OidMap<Tid>;

/// OID→object map; `V` is an opaque handle to a cached value.
pub type OidObjectMap<V> = OidMap<V>;

impl<V> OidMap<V> {
    /// Create an empty map with the process-wide probed backing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_backing(Capabilities::get().map_backing())
    }

    /// Create an empty map with an explicit backing. Exists so both
    /// arms stay testable and measurable on any platform.
    #[must_use]
    pub fn with_backing(backing: MapBacking) -> Self {
        Self {
            repr: RwLock::new(MapRepr::empty(backing)),
        }
    }

    /// Which backing this instance uses.
    #[must_use]
    pub fn backing(&self) -> MapBacking {
        self.repr.read().backing()
    }

    /// Insert or update `key`, returning the previous value if any.
    pub fn insert(&self, key: Oid, value: V) -> Option<V> {
        match &mut *self.repr.write() {
            MapRepr::Ordered(m) => m.insert(key, value),
            MapRepr::Hashed(m) => m.insert(key, value),
        }
    }

    /// Remove `key`, returning its value if it was present.
    pub fn remove(&self, key: Oid) -> Option<V> {
        match &mut *self.repr.write() {
            MapRepr::Ordered(m) => m.remove(&key),
            MapRepr::Hashed(m) => m.remove(&key),
        }
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: Oid) -> bool {
        match &*self.repr.read() {
            MapRepr::Ordered(m) => m.contains_key(&key),
            MapRepr::Hashed(m) => m.contains_key(&key),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        match &*self.repr.read() {
            MapRepr::Ordered(m) => m.len(),
            MapRepr::Hashed(m) => m.len(),
        }
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All keys in ascending order. The hashed backing sorts a snapshot;
    /// the ordered backing reads its keys in place.
    #[must_use]
    pub fn sorted_keys(&self) -> Vec<Oid> {
        match &*self.repr.read() {
            MapRepr::Ordered(m) => m.keys().copied().collect(),
            MapRepr::Hashed(m) => {
                let mut keys: Vec<Oid> = m.keys().copied().collect();
                keys.sort_unstable();
                keys
            }
        }
    }

    /// The greatest key, or [`Oid::ZERO`] for an empty map.
    ///
    /// `O(log n)` on the ordered backing; linear scan on the hashed
    /// fallback.
    #[must_use]
    pub fn max_key_or_zero(&self) -> Oid {
        match &*self.repr.read() {
            MapRepr::Ordered(m) => m.last_key_value().map_or(Oid::ZERO, |(k, _)| *k),
            MapRepr::Hashed(m) => m.keys().copied().max().unwrap_or(Oid::ZERO),
        }
    }
}

impl<V: Clone> OidMap<V> {
    /// Point lookup. Returns a clone of the stored value.
    #[must_use]
    pub fn get(&self, key: Oid) -> Option<V> {
        match &*self.repr.read() {
            MapRepr::Ordered(m) => m.get(&key).cloned(),
            MapRepr::Hashed(m) => m.get(&key).cloned(),
        }
    }

    /// All entries in ascending key order.
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<(Oid, V)> {
        match &*self.repr.read() {
            MapRepr::Ordered(m) => m.iter().map(|(k, v)| (*k, v.clone())).collect(),
            MapRepr::Hashed(m) => {
                let mut entries: Vec<(Oid, V)> =
                    m.iter().map(|(k, v)| (*k, v.clone())).collect();
                entries.sort_unstable_by_key(|(k, _)| *k);
                entries
            }
        }
    }
}

impl<V> Default for OidMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Clone for OidMap<V> {
    fn clone(&self) -> Self {
        Self {
            repr: RwLock::new(self.repr.read().clone()),
        }
    }
}

impl<V> FromIterator<(Oid, V)> for OidMap<V> {
    fn from_iter<I: IntoIterator<Item = (Oid, V)>>(iter: I) -> Self {
        let map = Self::new();
        {
            let mut repr = map.repr.write();
            for (k, v) in iter {
                match &mut *repr {
                    MapRepr::Ordered(m) => {
                        m.insert(k, v);
                    }
                    MapRepr::Hashed(m) => {
                        m.insert(k, v);
                    }
                }
            }
        }
        map
    }
}

impl<V> Extend<(Oid, V)> for OidMap<V> {
    fn extend<I: IntoIterator<Item = (Oid, V)>>(&mut self, iter: I) {
        let mut repr = self.repr.write();
        for (k, v) in iter {
            match &mut *repr {
                MapRepr::Ordered(m) => {
                    m.insert(k, v);
                }
                MapRepr::Hashed(m) => {
                    m.insert(k, v);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relcache_types::MAX_TID;

    fn oid(n: u64) -> Oid {
        Oid::new(n)
    }

    fn tid(n: u64) -> Tid {
        Tid::new_unchecked(n)
    }

    /// Run `check` against a fresh map of each backing.
    fn for_each_backing(check: impl Fn(OidTidMap)) {
        check(OidTidMap::with_backing(MapBacking::Ordered));
        check(OidTidMap::with_backing(MapBacking::Hashed));
    }

    #[test]
    fn point_operations_round_trip() {
        for_each_backing(|m| {
            assert_eq!(m.insert(oid(7), tid(70)), None);
            assert_eq!(m.get(oid(7)), Some(tid(70)));
            assert_eq!(m.insert(oid(7), tid(71)), Some(tid(70)));
            assert_eq!(m.remove(oid(7)), Some(tid(71)));
            assert_eq!(m.get(oid(7)), None);
            assert_eq!(m.remove(oid(7)), None);
        });
    }

    #[test]
    fn iteration_is_ascending_regardless_of_insertion_order() {
        for_each_backing(|m| {
            m.insert(oid(5), tid(100));
            m.insert(oid(1), tid(50));
            m.insert(oid(9), tid(200));
            assert_eq!(m.sorted_keys(), vec![oid(1), oid(5), oid(9)]);
            assert_eq!(
                m.sorted_entries(),
                vec![(oid(1), tid(50)), (oid(5), tid(100)), (oid(9), tid(200))]
            );
        });
    }

    #[test]
    fn max_key_or_zero_matches_contents() {
        for_each_backing(|m| {
            assert_eq!(m.max_key_or_zero(), Oid::ZERO);
            m.insert(oid(5), tid(100));
            m.insert(oid(1), tid(50));
            m.insert(oid(9), tid(200));
            assert_eq!(m.max_key_or_zero(), oid(9));
            m.remove(oid(9));
            assert_eq!(m.max_key_or_zero(), oid(5));
        });
    }

    #[test]
    fn sentinel_tid_is_storable() {
        for_each_backing(|m| {
            m.insert(oid(1), MAX_TID);
            assert_eq!(m.get(oid(1)), Some(MAX_TID));
        });
    }

    #[test]
    fn object_map_holds_opaque_values() {
        let m: OidObjectMap<String> = OidObjectMap::new();
        m.insert(oid(3), "cached".to_owned());
        assert_eq!(m.get(oid(3)).as_deref(), Some("cached"));
        assert_eq!(m.max_key_or_zero(), oid(3));
    }

    #[test]
    fn clone_is_a_snapshot() {
        let m = OidTidMap::new();
        m.insert(oid(1), tid(10));
        let snap = m.clone();
        m.insert(oid(2), tid(20));
        assert_eq!(snap.len(), 1);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn from_iterator_builds_with_probed_backing() {
        let m: OidTidMap = [(oid(2), tid(20)), (oid(1), tid(10))].into_iter().collect();
        assert_eq!(m.backing(), Capabilities::get().map_backing());
        assert_eq!(m.sorted_keys(), vec![oid(1), oid(2)]);
    }
}
