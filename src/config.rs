//! Solver configuration passed through to per-point state.
//!
//! The scalar-transport extension never reads the configuration itself;
//! only [`PointState`](crate::state::PointState) consumes it to decide which
//! time-history arrays to allocate and how to seed relaxation and CFL.

use crate::error::{Result, StateError};

/// Configuration handle consumed by generic point-state construction.
///
/// # Example
///
/// ```
/// use fv_state::SolverConfig;
///
/// let config = SolverConfig::new()
///     .with_dual_time(true)
///     .with_cfl(5.0)
///     .with_under_relaxation(0.8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig {
    /// Allocate the `time_n` / `time_n1` solution history for dual time stepping
    pub dual_time: bool,
    /// Initial local CFL number for every point
    pub cfl: f64,
    /// Initial under-relaxation factor, in `(0, 1]`
    pub under_relaxation: f64,
}

impl SolverConfig {
    /// Create a configuration for steady problems without dual time stepping.
    pub fn new() -> Self {
        Self {
            dual_time: false,
            cfl: 1.0,
            under_relaxation: 1.0,
        }
    }

    /// Enable or disable dual time stepping storage.
    pub fn with_dual_time(mut self, enabled: bool) -> Self {
        self.dual_time = enabled;
        self
    }

    /// Set the initial local CFL number.
    pub fn with_cfl(mut self, cfl: f64) -> Self {
        self.cfl = cfl;
        self
    }

    /// Set the initial under-relaxation factor.
    pub fn with_under_relaxation(mut self, factor: f64) -> Self {
        self.under_relaxation = factor;
        self
    }

    /// Check that numerical parameters are admissible.
    pub fn validate(&self) -> Result<()> {
        if !self.cfl.is_finite() || self.cfl <= 0.0 {
            return Err(StateError::InvalidValue {
                what: "CFL number",
                value: self.cfl,
            });
        }
        validate_relaxation(self.under_relaxation)?;
        log::debug!(
            "solver config: dual_time={}, cfl={}, under_relaxation={}",
            self.dual_time,
            self.cfl,
            self.under_relaxation
        );
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Relaxation factors must lie in `(0, 1]`.
pub(crate) fn validate_relaxation(factor: f64) -> Result<()> {
    if factor > 0.0 && factor <= 1.0 {
        Ok(())
    } else {
        Err(StateError::InvalidValue {
            what: "under-relaxation factor",
            value: factor,
        })
    }
}
