//! Per-point numerical state.
//!
//! - [`PointState`]: generic solution, history, gradient, limiter and residual storage
//! - [`PointVariable`]: trait implemented by every container built around a `PointState`
//! - [`ScalarPointState`]: scalar-transport state with per-equation mass diffusivity
//! - [`PointSlot`]: explicit not-yet-initialized placeholder
//! - [`ScalarField`]: one `ScalarPointState` per mesh point

mod field;
mod point;
mod scalar;
mod slot;

pub use field::ScalarField;
pub use point::{MAX_DIM, PointState, PointVariable};
pub use scalar::ScalarPointState;
pub use slot::PointSlot;
