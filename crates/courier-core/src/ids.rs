//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into the graph's CSR arrays via `id.0 as usize`, but
//! callers should prefer the `.index()` helper for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a `u32`.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u32);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to `u32::MAX`.
            pub const INVALID: $name = $name(u32::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Index of a road-network intersection.
    ///
    /// Dense (assigned sequentially at graph build time); the map loader
    /// keeps the mapping from external intersection IDs to these indices.
    pub struct NodeId;
}

typed_id! {
    /// Index of a directed road segment in CSR edge order.
    pub struct EdgeId;
}

typed_id! {
    /// Index of a courier.  One tour request — and one tour outcome — per
    /// courier per planning batch.
    pub struct CourierId;
}
