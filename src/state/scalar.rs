//! Point state for scalar-transport equations.
//!
//! Scalar-transport systems (species mass fractions, progress variables,
//! turbulence scalars) need one mass diffusivity per equation at every
//! point. Physics code publishes the diffusivities each iteration; the
//! flux assembly reads them back when building diffusive fluxes.
//!
//! # Example
//!
//! ```
//! use fv_state::{ScalarPointState, SolverConfig};
//!
//! let config = SolverConfig::default();
//! let mut point = ScalarPointState::uniform(0.0, 3, 2, &config)?;
//! assert_eq!(point.diffusivity(), &[0.0, 0.0]);
//!
//! point.set_diffusivity(1.5e-5, 1)?;
//! assert_eq!(point.get_diffusivity(1)?, 1.5e-5);
//! assert_eq!(point.get_diffusivity(0)?, 0.0);
//! assert!(point.get_diffusivity(2).is_err());
//! # Ok::<(), fv_state::StateError>(())
//! ```

use crate::config::SolverConfig;
use crate::error::{Result, StateError, check_index};

use super::point::{PointState, PointVariable};

/// Scalar-transport state of one mesh point.
///
/// Wraps a [`PointState`] and adds `n_var` mass diffusivities, all zero
/// after construction. The diffusivity storage is sized once and never
/// resized; building a state for a different number of equations means
/// building a new one.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarPointState {
    base: PointState,
    diffusivity: Box<[f64]>,
}

impl ScalarPointState {
    /// Create the state of one point.
    ///
    /// # Arguments
    /// * `initial` - One value (applied to every equation) or exactly `n_var` values
    /// * `n_dim` - Number of spatial dimensions
    /// * `n_var` - Number of scalar-transport equations
    /// * `config` - Solver configuration, forwarded to [`PointState::new`]
    pub fn new(initial: &[f64], n_dim: usize, n_var: usize, config: &SolverConfig) -> Result<Self> {
        let base = PointState::new(initial, n_dim, n_var, config)?;
        Ok(Self {
            diffusivity: vec![0.0; base.n_var()].into_boxed_slice(),
            base,
        })
    }

    /// Create a state with the same initial value for every equation.
    pub fn uniform(value: f64, n_dim: usize, n_var: usize, config: &SolverConfig) -> Result<Self> {
        Self::new(&[value], n_dim, n_var, config)
    }

    /// The generic point state.
    #[inline]
    pub fn base(&self) -> &PointState {
        &self.base
    }

    /// Mutable access to the generic point state.
    #[inline]
    pub fn base_mut(&mut self) -> &mut PointState {
        &mut self.base
    }

    /// Set the mass diffusivity of equation `eq`.
    #[inline]
    pub fn set_diffusivity(&mut self, value: f64, eq: usize) -> Result<()> {
        let i = check_index("equation", eq, self.diffusivity.len())?;
        self.diffusivity[i] = value;
        Ok(())
    }

    /// Mass diffusivity of equation `eq`.
    #[inline]
    pub fn get_diffusivity(&self, eq: usize) -> Result<f64> {
        let i = check_index("equation", eq, self.diffusivity.len())?;
        Ok(self.diffusivity[i])
    }

    /// All mass diffusivities, length `n_var`.
    ///
    /// This is a view of the stored values, not a copy.
    #[inline]
    pub fn diffusivity(&self) -> &[f64] {
        &self.diffusivity
    }

    /// Mutable view of all mass diffusivities.
    ///
    /// Writing element `i` is equivalent to `set_diffusivity(value, i)`.
    #[inline]
    pub fn diffusivity_mut(&mut self) -> &mut [f64] {
        &mut self.diffusivity
    }

    /// Overwrite every diffusivity at once.
    pub fn set_diffusivities(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.diffusivity.len() {
            return Err(StateError::dimension_mismatch(
                "diffusivity",
                self.diffusivity.len(),
                values.len(),
            ));
        }
        self.diffusivity.copy_from_slice(values);
        Ok(())
    }

    /// Set every diffusivity back to zero.
    pub fn reset_diffusivity(&mut self) {
        self.diffusivity.fill(0.0);
    }
}

impl PointVariable for ScalarPointState {
    fn state(&self) -> &PointState {
        &self.base
    }

    fn state_mut(&mut self) -> &mut PointState {
        &mut self.base
    }
}
