//! Strongly-typed domain types for safer APIs.
//!
//! Per-point accessors take plain `usize` equation and dimension indices;
//! mesh-level collections are addressed by [`PointIndex`].
//!
//! # Example
//!
//! ```
//! use fv_state::types::PointIndex;
//!
//! let indices: Vec<_> = PointIndex::iter(4).collect();
//! assert_eq!(indices[3].get(), 3);
//! ```

mod indices;

pub use indices::PointIndex;
