//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` so that
//! ids emitted by caller-supplied classifiers can be built directly.  With the
//! `serde` feature, ids serialize as their bare integer.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
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

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> $name {
                $name(raw)
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
    /// Partition id emitted by a zone classifier for one grid cell.
    ///
    /// Zone ids key the per-zone parameter maps (fences, hunting, carcass
    /// removal).  Ids are only meaningful relative to the classifier that
    /// emitted them.
    pub struct ZoneId(u32);
}

typed_id! {
    /// Categorical id of a pathogen variant.  `0` means "no variant".
    pub struct VariantId(u32);
}

impl VariantId {
    /// Sentinel for cells without any infection.
    pub const NONE: VariantId = VariantId(0);

    /// The variant carried by released (index) infections.
    pub const FIRST: VariantId = VariantId(1);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}
