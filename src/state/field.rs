//! Per-mesh storage of scalar-transport point states.
//!
//! The solver allocates one [`ScalarPointState`] per mesh point at setup
//! time. Points share no mutable state, so whole-field passes can run over
//! points in parallel (`parallel` feature).

use crate::config::SolverConfig;
use crate::error::{Result, StateError};
use crate::types::PointIndex;

use super::point::PointVariable;
use super::scalar::ScalarPointState;

/// Scalar-transport states for every point of a mesh.
#[derive(Clone, Debug)]
pub struct ScalarField {
    points: Vec<ScalarPointState>,
    n_dim: usize,
    n_var: usize,
}

impl ScalarField {
    /// Allocate `n_points` identical point states.
    ///
    /// # Arguments
    /// * `n_points` - Number of mesh points
    /// * `initial` - One value or `n_var` values seeding every point's solution
    /// * `n_dim` - Number of spatial dimensions
    /// * `n_var` - Number of scalar-transport equations
    /// * `config` - Solver configuration
    pub fn new(
        n_points: usize,
        initial: &[f64],
        n_dim: usize,
        n_var: usize,
        config: &SolverConfig,
    ) -> Result<Self> {
        let template = ScalarPointState::new(initial, n_dim, n_var, config)?;
        let points = vec![template; n_points];
        log::debug!("allocated {n_points} scalar point states (n_dim={n_dim}, n_var={n_var})");
        Ok(Self {
            points,
            n_dim,
            n_var,
        })
    }

    /// Number of mesh points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the field holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of spatial dimensions the field was allocated with.
    pub fn n_dim(&self) -> usize {
        self.n_dim
    }

    /// Number of equations per point the field was allocated with.
    ///
    /// Points replaced through [`Self::point_mut`] may differ; per-point
    /// accessors check against each point's own size.
    pub fn n_var(&self) -> usize {
        self.n_var
    }

    /// State of point `p`.
    pub fn point(&self, p: PointIndex) -> Result<&ScalarPointState> {
        let i = p.checked(self.points.len())?;
        Ok(&self.points[i])
    }

    /// Mutable state of point `p`.
    pub fn point_mut(&mut self, p: PointIndex) -> Result<&mut ScalarPointState> {
        let i = p.checked(self.points.len())?;
        Ok(&mut self.points[i])
    }

    /// Iterate over point states in mesh order.
    pub fn iter(&self) -> impl Iterator<Item = &ScalarPointState> {
        self.points.iter()
    }

    /// Iterate mutably over point states in mesh order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ScalarPointState> {
        self.points.iter_mut()
    }

    /// Store the current solution as the old solution at every point.
    pub fn set_old_solution_all(&mut self) {
        for point in &mut self.points {
            point.state_mut().set_old_solution();
        }
    }

    /// Zero the residual accumulator at every point.
    pub fn set_residual_zero_all(&mut self) {
        for point in &mut self.points {
            point.state_mut().set_residual_zero();
        }
    }

    /// Publish one diffusivity value for equation `eq` at every point.
    ///
    /// Every point is checked before any is written, so a failure leaves
    /// the field unchanged.
    pub fn set_diffusivity_all(&mut self, value: f64, eq: usize) -> Result<()> {
        if let Some(point) = self.points.iter().find(|p| eq >= p.n_var()) {
            return Err(StateError::out_of_range("equation", eq, point.n_var()));
        }
        for point in &mut self.points {
            point.set_diffusivity(value, eq)?;
        }
        Ok(())
    }

    /// Run a physics update at every point, in mesh order.
    ///
    /// Stops at the first point whose update fails and returns that error.
    pub fn update_diffusivity<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(PointIndex, &mut ScalarPointState) -> Result<()>,
    {
        log::trace!("diffusivity update over {} points", self.points.len());
        for (i, point) in self.points.iter_mut().enumerate() {
            f(PointIndex::new(i), point)?;
        }
        Ok(())
    }

    /// Largest per-point residual L2 norm, zero for an empty field.
    pub fn max_residual_norm(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.state().residual_norm())
            .fold(0.0, f64::max)
    }
}

/// Parallel whole-field passes using Rayon.
#[cfg(feature = "parallel")]
impl ScalarField {
    /// Run a physics update at every point in parallel.
    ///
    /// Points are independent, so `f` only sees one point at a time. If
    /// several points fail, which error is returned is unspecified.
    pub fn update_diffusivity_parallel<F>(&mut self, f: F) -> Result<()>
    where
        F: Fn(PointIndex, &mut ScalarPointState) -> Result<()> + Sync + Send,
    {
        use rayon::prelude::*;

        log::trace!(
            "parallel diffusivity update over {} points on {} threads",
            self.points.len(),
            rayon::current_num_threads()
        );
        self.points
            .par_iter_mut()
            .enumerate()
            .try_for_each(|(i, point)| f(PointIndex::new(i), point))
    }

    /// Largest per-point residual L2 norm, computed in parallel.
    pub fn max_residual_norm_parallel(&self) -> f64 {
        use rayon::prelude::*;

        self.points
            .par_iter()
            .map(|p| p.state().residual_norm())
            .reduce(|| 0.0, f64::max)
    }
}
