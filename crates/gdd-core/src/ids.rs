//! Strongly typed, zero-cost identifier wrappers.
//!
//! Input data names hubs and locations with strings; the graph store interns
//! those keys into dense integer ids at load time so that hot paths (A*,
//! adjacency scans) index plain `Vec`s.  The inner integer is `pub`, but
//! callers should prefer `.index()`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a routing hub, assigned in load order.
    ///
    /// A* breaks `f`-cost ties on the lowest `HubId`, so load order decides
    /// which of several equal-cost paths is returned.
    pub struct HubId(u32);
}

typed_id! {
    /// Index of a directed hub-to-hub edge in CSR order.
    pub struct EdgeId(u32);
}

typed_id! {
    /// Index of a player-facing location, assigned in load order.
    pub struct LocationId(u32);
}

typed_id! {
    /// Identifier of a delivery job.
    pub struct JobId(u32);
}
