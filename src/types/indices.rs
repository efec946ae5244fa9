//! Strongly-typed index newtypes.
//!
//! Mesh-level indices are wrapped so a point index cannot be passed where
//! an equation or dimension index is expected.

use std::fmt;

use crate::error::{Result, check_index};

/// Macro to generate index newtypes with common functionality.
macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident, $display_prefix:literal, $what:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Create a new index.
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Get the raw index value.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// First index (0).
            pub const ZERO: Self = Self(0);

            /// Create an iterator over [0, n) indices.
            pub fn iter(n: usize) -> impl Iterator<Item = $name> + ExactSizeIterator {
                (0..n).map($name)
            }

            /// Return the raw index if it lies in `[0, len)`.
            #[inline]
            pub fn checked(self, len: usize) -> Result<usize> {
                check_index($what, self.0, len)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(idx: $name) -> usize {
                idx.0
            }
        }
    };
}

define_index!(
    /// Index of a mesh point owning a per-point state.
    ///
    /// # Example
    ///
    /// ```
    /// use fv_state::types::PointIndex;
    ///
    /// let p = PointIndex::new(1);
    /// assert_eq!(p.get(), 1);
    /// assert!(p.checked(2).is_ok());
    /// assert!(p.checked(1).is_err());
    /// ```
    PointIndex,
    "P",
    "point"
);
