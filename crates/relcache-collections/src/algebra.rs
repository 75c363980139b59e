//! Set algebra over OID collections, uniform across backings.
//!
//! One generic implementation expressed in terms of the snapshot and
//! membership contract — the concrete backing (tree vs hash) is an
//! implementation detail, not a second code path.
//!
//! Every input is snapshotted under its own read lock, one lock at a
//! time, and the result is computed lock-free from the snapshots. That
//! makes these functions safe to call while another thread mutates an
//! input: the result reflects some point-in-time state of each input,
//! and the inputs are never mutated (except [`discard`], which mutates
//! its set argument by design).

use std::collections::HashSet;

use relcache_types::Oid;

use crate::map::OidMap;
use crate::set::OidSet;

/// Snapshot and membership contract shared by OID-keyed collections.
///
/// For a map, the OIDs are its keys.
pub trait OidMembership {
    /// Whether `oid` is a member (or key).
    fn contains_oid(&self, oid: Oid) -> bool;

    /// Copy out all members (or keys) under a single read-lock
    /// acquisition, in ascending order.
    fn snapshot_oids(&self) -> Vec<Oid>;
}

impl OidMembership for OidSet {
    fn contains_oid(&self, oid: Oid) -> bool {
        self.contains(oid)
    }

    fn snapshot_oids(&self) -> Vec<Oid> {
        self.sorted_members()
    }
}

impl<V> OidMembership for OidMap<V> {
    fn contains_oid(&self, oid: Oid) -> bool {
        self.contains_key(oid)
    }

    fn snapshot_oids(&self) -> Vec<Oid> {
        self.sorted_keys()
    }
}

/// Collections that can rebuild a filtered copy of themselves,
/// preserving their backing (and, for maps, their values).
pub trait OidAlgebra: OidMembership + Sized {
    /// New collection of the same backing holding the entries whose OID
    /// satisfies `keep`. Works from a snapshot; `self` is not mutated.
    fn filtered<F: Fn(Oid) -> bool>(&self, keep: F) -> Self;
}

impl OidAlgebra for OidSet {
    fn filtered<F: Fn(Oid) -> bool>(&self, keep: F) -> Self {
        let out = Self::with_backing(self.backing());
        for oid in self.sorted_members() {
            if keep(oid) {
                out.insert(oid);
            }
        }
        out
    }
}

impl<V: Clone> OidAlgebra for OidMap<V> {
    fn filtered<F: Fn(Oid) -> bool>(&self, keep: F) -> Self {
        let out = Self::with_backing(self.backing());
        for (oid, value) in self.sorted_entries() {
            if keep(oid) {
                out.insert(oid, value);
            }
        }
        out
    }
}

/// New collection of the entries of `a` whose OID is not in `b`.
///
/// The map form preserves values. Neither input is mutated.
pub fn difference<C: OidAlgebra>(a: &C, b: &impl OidMembership) -> C {
    let excluded: HashSet<Oid> = b.snapshot_oids().into_iter().collect();
    a.filtered(|oid| !excluded.contains(&oid))
}

/// Union of zero or more sets. Zero inputs yield an empty set. The
/// result uses the process-wide probed backing.
pub fn multiunion<'a, I>(sets: I) -> OidSet
where
    I: IntoIterator<Item = &'a OidSet>,
{
    let out = OidSet::new();
    for set in sets {
        for oid in set.snapshot_oids() {
            out.insert(oid);
        }
    }
    out
}

/// The OIDs present in both `a` and `b`, as a set.
///
/// Maps participate by key: intersecting two maps yields the set of
/// common keys, not a map.
pub fn intersection(a: &impl OidMembership, b: &impl OidMembership) -> OidSet {
    let right: HashSet<Oid> = b.snapshot_oids().into_iter().collect();
    a.snapshot_oids()
        .into_iter()
        .filter(|oid| right.contains(oid))
        .collect()
}

/// Remove `oid` from `set` if present; absence is a no-op, never an
/// error. The only mutating operation in this module.
pub fn discard(set: &OidSet, oid: Oid) {
    set.discard(oid);
}

/// The greatest key in `map`, or [`Oid::ZERO`] for an empty map.
#[must_use]
pub fn max_key_or_zero<V>(map: &OidMap<V>) -> Oid {
    map.max_key_or_zero()
}
