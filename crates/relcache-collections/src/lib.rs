//! Adaptive OID/TID collections for the relcache MVCC cache.
//!
//! Large collections of 64-bit object and transaction identifiers, backed
//! by whichever concrete structure the capability probe selects for the
//! current platform: sorted tree maps/sets or hash fallbacks for keyed
//! lookups, packed or segmented sequences for bulk lists. Consumers depend
//! only on this surface, never on which backing was chosen.
//!
//! Point operations on maps and sets are indivisible with respect to other
//! threads of the process; that guarantee is what lets the MVCC cache
//! share these instances between one writer and many readers without its
//! own locking. See [`capability`] for how the backings are chosen and
//! [`algebra`] for the bulk operations.

pub mod algebra;
pub mod capability;
pub mod list;
pub mod map;
pub mod set;

pub use algebra::{
    OidAlgebra, OidMembership, difference, discard, intersection, max_key_or_zero, multiunion,
};
pub use capability::{Capabilities, ListBacking, MapBacking};
pub use list::{Iter as OidListIter, OidList, TidList};
pub use map::{OidMap, OidObjectMap, OidTidMap};
pub use set::OidSet;

pub use relcache_types::{MAX_TID, Oid, Tid, TidOutOfRange};
