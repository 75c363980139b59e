//! Capability probe: binds collection backings once per process.
//!
//! The probe runs at most once (first use) and its result is immutable for
//! the process lifetime. Consumers never branch on these flags directly;
//! they construct [`OidMap`](crate::OidMap) / [`OidSet`](crate::OidSet) /
//! [`OidList`](crate::OidList) instances and get whichever backing the
//! probe selected.

use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Backing selectors
// ---------------------------------------------------------------------------

/// Which concrete representation backs OID maps and sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapBacking {
    /// Sorted tree map/set. Ordered iteration and max-key are native.
    Ordered,
    /// Hash map/set fallback. Ordered iteration sorts a snapshot;
    /// max-key is a linear scan.
    Hashed,
}

impl MapBacking {
    /// Whether ordered iteration and max-key come straight from the
    /// structure rather than from sorting a snapshot.
    #[must_use]
    pub const fn is_ordered(self) -> bool {
        matches!(self, Self::Ordered)
    }
}

/// Which concrete representation backs OID/TID lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListBacking {
    /// Contiguous 8-bytes-per-element storage. Cheapest memory footprint,
    /// fastest slicing.
    Packed,
    /// Segmented growable storage. Chosen where packed iteration is known
    /// to be slow for the execution environment.
    Segmented,
}

impl ListBacking {
    /// Whether elements live in one contiguous allocation.
    #[must_use]
    pub const fn is_packed(self) -> bool {
        matches!(self, Self::Packed)
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Platform facts probed once at first use, driving backing selection.
///
/// The MVCC cache depends on point operations (get/insert/remove on a map,
/// insert/discard on a set) being indivisible with respect to other
/// threads. Every backing this probe can select satisfies that contract:
/// the map and set types serialize point operations behind an internal
/// lock, so a concurrent reader observes either the pre- or post-state of
/// a single point write, never a torn intermediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// An ordered (sorted-by-key) container satisfying the atomicity
    /// contract is available. False only when the
    /// `RELCACHE_FORCE_HASH_MAPS` override requests the hash fallback,
    /// which keeps the fallback path exercisable and re-measurable.
    pub atomic_ordered_container: bool,
    /// The platform's native word is at least 8 bytes, so packed u64
    /// element operations do not go through software carry chains.
    pub native_u64_array: bool,
    /// Running under an interpreted/instrumented execution environment
    /// where packed-array iteration is pathologically slow relative to
    /// the segmented fallback. Suppresses packed selection even when
    /// `native_u64_array` is true.
    pub alternate_runtime: bool,
}

static PROBED: OnceLock<Capabilities> = OnceLock::new();

impl Capabilities {
    /// The process-wide probed capabilities. First call performs the
    /// probe; later calls return the same value.
    pub fn get() -> &'static Self {
        PROBED.get_or_init(Self::probe)
    }

    fn probe() -> Self {
        let caps = Self {
            atomic_ordered_container: !env_flag("RELCACHE_FORCE_HASH_MAPS"),
            native_u64_array: std::mem::size_of::<usize>() >= 8,
            alternate_runtime: cfg!(miri) || env_flag("RELCACHE_FORCE_DYNAMIC_LISTS"),
        };
        tracing::debug!(
            atomic_ordered_container = caps.atomic_ordered_container,
            native_u64_array = caps.native_u64_array,
            alternate_runtime = caps.alternate_runtime,
            map_backing = ?caps.map_backing(),
            list_backing = ?caps.list_backing(),
            "collection backings selected"
        );
        caps
    }

    /// Backing for OID maps and sets.
    #[must_use]
    pub const fn map_backing(&self) -> MapBacking {
        if self.atomic_ordered_container {
            MapBacking::Ordered
        } else {
            MapBacking::Hashed
        }
    }

    /// Backing for OID/TID lists.
    #[must_use]
    pub const fn list_backing(&self) -> ListBacking {
        if self.native_u64_array && !self.alternate_runtime {
            ListBacking::Packed
        } else {
            ListBacking::Segmented
        }
    }
}

/// Read a boolean environment override. Absent means false; a value that
/// parses as neither truthy (`1`, `true`, `yes`) nor falsy (`0`, `false`,
/// `no`, empty) is ignored with a warning rather than surfaced as an
/// error — a missing capability is a normal outcome, never a failure.
fn env_flag(name: &str) -> bool {
    let Ok(raw) = std::env::var(name) else {
        return false;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => true,
        "" | "0" | "false" | "no" => false,
        other => {
            tracing::warn!(var = name, value = other, "unrecognized override value, ignoring");
            false
        }
    }
}
