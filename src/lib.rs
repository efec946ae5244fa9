//! # fv-state
//!
//! Per-mesh-point numerical state for finite-volume solvers of
//! scalar-transport equations.
//!
//! This crate provides:
//! - Generic per-point storage (solution, time history, gradients, limiters,
//!   residuals, under-relaxation)
//! - A scalar-transport specialization carrying one mass diffusivity per equation
//! - A per-mesh field with sequential and parallel whole-field passes
//!
//! All indexed accessors are bounds checked and report [`StateError`]
//! instead of reading or writing out of range.
//!
//! # Example
//!
//! ```
//! use fv_state::{ScalarField, SolverConfig, types::PointIndex};
//!
//! let config = SolverConfig::default();
//! let mut field = ScalarField::new(100, &[0.0], 3, 2, &config)?;
//!
//! // Physics code publishes diffusivities
//! field.update_diffusivity(|_, point| point.set_diffusivities(&[1.0e-5, 2.0e-5]))?;
//!
//! // Assembly code reads them back
//! let point = field.point(PointIndex::new(42))?;
//! assert_eq!(point.get_diffusivity(1)?, 2.0e-5);
//! # Ok::<(), fv_state::StateError>(())
//! ```

pub mod config;
pub mod error;
pub mod state;
pub mod types;

pub use config::SolverConfig;
pub use error::{Result, StateError};
pub use state::{
    MAX_DIM, PointSlot, PointState, PointVariable, ScalarField, ScalarPointState,
};
