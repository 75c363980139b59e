//! Identifier newtypes shared across the relcache storage layers.
//!
//! Object identifiers ([`Oid`]) and transaction identifiers ([`Tid`]) are
//! 64-bit unsigned integers. TIDs carry an extra restriction: the maximum
//! representable value is [`MAX_TID`] (`2^63 - 1`), which the MVCC cache
//! uses as the "no transaction yet" sentinel, so a valid TID always fits
//! in 63 bits.

use std::fmt;

use thiserror::Error;

/// An object identifier: names a stored object.
///
/// The full unsigned 64-bit range is valid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct Oid(u64);

impl Oid {
    /// OID zero, the root object in the originating object database.
    pub const ZERO: Self = Self(0);

    /// Create an OID from a raw u64. Every value is valid.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw u64 value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Oid {
    #[inline]
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<Oid> for u64 {
    #[inline]
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

/// A transaction identifier: names a commit/version.
///
/// Valid TIDs lie in `0 ..= MAX_TID`. [`MAX_TID`] itself is reserved as
/// the "no transaction yet" sentinel; checked construction accepts it so
/// the sentinel can be stored, but nothing above it. Deserialization goes
/// through the same range check, so persisted or untrusted data cannot
/// materialize a TID above the sentinel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u64")]
#[repr(transparent)]
pub struct Tid(u64);

/// The greatest representable transaction identifier, `2^63 - 1`.
///
/// Matches the 64-bit-family tree maximum of the originating object
/// database, where it stands for "no transaction has committed yet".
pub const MAX_TID: Tid = Tid(i64::MAX as u64);

impl Tid {
    /// TID zero, ordered before every committed transaction.
    pub const ZERO: Self = Self(0);

    /// Create a TID from a raw u64.
    ///
    /// # Errors
    ///
    /// Returns [`TidOutOfRange`] if `raw` exceeds [`MAX_TID`].
    #[inline]
    pub const fn new(raw: u64) -> Result<Self, TidOutOfRange> {
        if raw > MAX_TID.0 {
            return Err(TidOutOfRange { raw });
        }
        Ok(Self(raw))
    }

    /// Create a TID without the range check.
    ///
    /// The caller asserts `raw <= MAX_TID`; debug builds verify it.
    #[inline]
    #[must_use]
    pub const fn new_unchecked(raw: u64) -> Self {
        debug_assert!(raw <= MAX_TID.0);
        Self(raw)
    }

    /// Get the raw u64 value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Whether this TID is the "no transaction yet" sentinel.
    #[inline]
    #[must_use]
    pub const fn is_sentinel(self) -> bool {
        self.0 == MAX_TID.0
    }
}

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for Tid {
    type Error = TidOutOfRange;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<Tid> for u64 {
    #[inline]
    fn from(tid: Tid) -> Self {
        tid.0
    }
}

/// Error returned when constructing a [`Tid`] above [`MAX_TID`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("transaction id {raw:#x} exceeds MAX_TID (2^63 - 1)")]
pub struct TidOutOfRange {
    /// The rejected raw value.
    pub raw: u64,
}
