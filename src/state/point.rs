//! Generic per-point numerical state.
//!
//! Every mesh point of a finite-volume solver carries the same bookkeeping
//! regardless of the equations being solved: solution and its history,
//! gradients, limiter coefficients, residual contributions and relaxation.
//! [`PointState`] owns that storage for an arbitrary number of equations;
//! specialized containers compose it and implement [`PointVariable`].

use crate::config::{SolverConfig, validate_relaxation};
use crate::error::{Result, StateError, check_index};

/// Largest supported number of spatial dimensions.
pub const MAX_DIM: usize = 3;

/// Solution history kept for dual time stepping.
#[derive(Clone, Debug, PartialEq)]
struct TimeHistory {
    /// Solution at physical time level n
    time_n: Box<[f64]>,
    /// Solution at physical time level n-1
    time_n1: Box<[f64]>,
}

/// Numerical state of one mesh point for `n_var` equations in `n_dim` dimensions.
///
/// All per-equation arrays are allocated once at construction and never
/// resized. Gradients are stored row-major by equation:
/// `gradient[eq * n_dim + dim]`.
///
/// Every indexed accessor is bounds checked and returns
/// [`StateError::IndexOutOfRange`] instead of touching memory it does not own.
#[derive(Clone, Debug, PartialEq)]
pub struct PointState {
    n_dim: usize,
    n_var: usize,
    solution: Box<[f64]>,
    solution_old: Box<[f64]>,
    history: Option<TimeHistory>,
    gradient: Box<[f64]>,
    limiter: Box<[f64]>,
    solution_max: Box<[f64]>,
    solution_min: Box<[f64]>,
    residual: Box<[f64]>,
    under_relaxation: f64,
    local_cfl: f64,
    delta_time: f64,
}

impl PointState {
    /// Allocate and seed the state of one point.
    ///
    /// # Arguments
    /// * `initial` - One value (applied to every equation) or exactly `n_var` values
    /// * `n_dim` - Number of spatial dimensions, in `1..=3`
    /// * `n_var` - Number of equations, at least one
    /// * `config` - Solver configuration (time history, CFL, relaxation)
    pub fn new(initial: &[f64], n_dim: usize, n_var: usize, config: &SolverConfig) -> Result<Self> {
        config.validate()?;
        if n_var == 0 {
            return Err(StateError::InvalidSize {
                what: "number of equations",
                value: n_var,
            });
        }
        if n_dim == 0 || n_dim > MAX_DIM {
            return Err(StateError::InvalidSize {
                what: "number of dimensions",
                value: n_dim,
            });
        }

        let solution: Box<[f64]> = match initial.len() {
            1 => vec![initial[0]; n_var].into_boxed_slice(),
            len if len == n_var => initial.into(),
            len => {
                return Err(StateError::dimension_mismatch("initial solution", n_var, len));
            }
        };

        let history = config.dual_time.then(|| TimeHistory {
            time_n: solution.clone(),
            time_n1: solution.clone(),
        });

        Ok(Self {
            n_dim,
            n_var,
            solution_old: solution.clone(),
            solution,
            history,
            gradient: vec![0.0; n_var * n_dim].into_boxed_slice(),
            limiter: vec![1.0; n_var].into_boxed_slice(),
            solution_max: vec![f64::MIN; n_var].into_boxed_slice(),
            solution_min: vec![f64::MAX; n_var].into_boxed_slice(),
            residual: vec![0.0; n_var].into_boxed_slice(),
            under_relaxation: config.under_relaxation,
            local_cfl: config.cfl,
            delta_time: 0.0,
        })
    }

    /// Number of spatial dimensions.
    #[inline]
    pub fn n_dim(&self) -> usize {
        self.n_dim
    }

    /// Number of equations.
    #[inline]
    pub fn n_var(&self) -> usize {
        self.n_var
    }

    #[inline]
    fn eq_index(&self, eq: usize) -> Result<usize> {
        check_index("equation", eq, self.n_var)
    }

    #[inline]
    fn grad_offset(&self, eq: usize, dim: usize) -> Result<usize> {
        let eq = self.eq_index(eq)?;
        let dim = check_index("dimension", dim, self.n_dim)?;
        Ok(eq * self.n_dim + dim)
    }

    fn check_len(&self, what: &'static str, actual: usize) -> Result<()> {
        if actual == self.n_var {
            Ok(())
        } else {
            Err(StateError::dimension_mismatch(what, self.n_var, actual))
        }
    }

    // ------------------------------------------------------------------
    // Solution
    // ------------------------------------------------------------------

    /// Current solution, length `n_var`.
    #[inline]
    pub fn solution(&self) -> &[f64] {
        &self.solution
    }

    /// Mutable view of the current solution.
    #[inline]
    pub fn solution_mut(&mut self) -> &mut [f64] {
        &mut self.solution
    }

    /// Get one solution component.
    #[inline]
    pub fn get_solution(&self, eq: usize) -> Result<f64> {
        Ok(self.solution[self.eq_index(eq)?])
    }

    /// Set one solution component.
    #[inline]
    pub fn set_solution(&mut self, eq: usize, value: f64) -> Result<()> {
        let i = self.eq_index(eq)?;
        self.solution[i] = value;
        Ok(())
    }

    /// Overwrite the whole solution.
    pub fn set_solution_all(&mut self, values: &[f64]) -> Result<()> {
        self.check_len("solution", values.len())?;
        self.solution.copy_from_slice(values);
        Ok(())
    }

    /// Add `value` to one solution component.
    #[inline]
    pub fn add_solution(&mut self, eq: usize, value: f64) -> Result<()> {
        let i = self.eq_index(eq)?;
        self.solution[i] += value;
        Ok(())
    }

    /// Add an update scaled by the point's under-relaxation factor.
    #[inline]
    pub fn add_relaxed_solution(&mut self, eq: usize, delta: f64) -> Result<()> {
        let i = self.eq_index(eq)?;
        self.solution[i] += self.under_relaxation * delta;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Time history
    // ------------------------------------------------------------------

    /// Solution at the previous iteration.
    #[inline]
    pub fn solution_old(&self) -> &[f64] {
        &self.solution_old
    }

    /// Get one component of the previous-iteration solution.
    #[inline]
    pub fn get_solution_old(&self, eq: usize) -> Result<f64> {
        Ok(self.solution_old[self.eq_index(eq)?])
    }

    /// Store the current solution as the previous-iteration solution.
    pub fn set_old_solution(&mut self) {
        self.solution_old.copy_from_slice(&self.solution);
    }

    /// Restore the current solution from the previous iteration.
    pub fn set_solution_to_old(&mut self) {
        self.solution.copy_from_slice(&self.solution_old);
    }

    /// Advance the physical time history: `n -> n-1`, current -> `n`.
    ///
    /// Fails with [`StateError::TimeHistoryDisabled`] unless the state was
    /// built with dual time stepping enabled.
    pub fn set_solution_time_n(&mut self) -> Result<()> {
        let history = self
            .history
            .as_mut()
            .ok_or(StateError::TimeHistoryDisabled)?;
        history.time_n1.copy_from_slice(&history.time_n);
        history.time_n.copy_from_slice(&self.solution);
        Ok(())
    }

    /// Solution at time level n, if dual time stepping is enabled.
    pub fn solution_time_n(&self) -> Option<&[f64]> {
        self.history.as_ref().map(|h| &*h.time_n)
    }

    /// Solution at time level n-1, if dual time stepping is enabled.
    pub fn solution_time_n1(&self) -> Option<&[f64]> {
        self.history.as_ref().map(|h| &*h.time_n1)
    }

    // ------------------------------------------------------------------
    // Gradients
    // ------------------------------------------------------------------

    /// Get `d(solution[eq]) / dx[dim]`.
    #[inline]
    pub fn get_gradient(&self, eq: usize, dim: usize) -> Result<f64> {
        Ok(self.gradient[self.grad_offset(eq, dim)?])
    }

    /// Set one gradient component.
    #[inline]
    pub fn set_gradient(&mut self, eq: usize, dim: usize, value: f64) -> Result<()> {
        let i = self.grad_offset(eq, dim)?;
        self.gradient[i] = value;
        Ok(())
    }

    /// Accumulate into one gradient component (Green-Gauss face loops).
    #[inline]
    pub fn add_gradient(&mut self, eq: usize, dim: usize, value: f64) -> Result<()> {
        let i = self.grad_offset(eq, dim)?;
        self.gradient[i] += value;
        Ok(())
    }

    /// Zero every gradient component.
    pub fn set_gradient_zero(&mut self) {
        self.gradient.fill(0.0);
    }

    /// Gradient of one equation, length `n_dim`.
    pub fn gradient_row(&self, eq: usize) -> Result<&[f64]> {
        let start = self.eq_index(eq)? * self.n_dim;
        Ok(&self.gradient[start..start + self.n_dim])
    }

    /// All gradient components, row-major by equation.
    #[inline]
    pub fn gradient(&self) -> &[f64] {
        &self.gradient
    }

    // ------------------------------------------------------------------
    // Limiter and solution bounds
    // ------------------------------------------------------------------

    /// Limiter coefficients, one per equation.
    #[inline]
    pub fn limiter(&self) -> &[f64] {
        &self.limiter
    }

    /// Get one limiter coefficient.
    #[inline]
    pub fn get_limiter(&self, eq: usize) -> Result<f64> {
        Ok(self.limiter[self.eq_index(eq)?])
    }

    /// Set one limiter coefficient, clamped to `[0, 1]`.
    ///
    /// NaN is stored as `0.0` (fully limited).
    pub fn set_limiter(&mut self, eq: usize, value: f64) -> Result<()> {
        let i = self.eq_index(eq)?;
        let clamped = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0)
        };
        if clamped != value {
            log::warn!("limiter value {value} for equation {i} clamped to {clamped}");
        }
        self.limiter[i] = clamped;
        Ok(())
    }

    /// Widen the local solution bounds with a neighbor's solution.
    pub fn set_solution_bounds_from(&mut self, neighbor: &[f64]) -> Result<()> {
        self.check_len("neighbor solution", neighbor.len())?;
        for ((max, min), &v) in self
            .solution_max
            .iter_mut()
            .zip(self.solution_min.iter_mut())
            .zip(neighbor)
        {
            *max = max.max(v);
            *min = min.min(v);
        }
        Ok(())
    }

    /// Reset bounds to empty sentinels before a new limiter pass.
    pub fn reset_solution_bounds(&mut self) {
        self.solution_max.fill(f64::MIN);
        self.solution_min.fill(f64::MAX);
    }

    /// Largest neighbor value seen for one equation.
    #[inline]
    pub fn get_solution_max(&self, eq: usize) -> Result<f64> {
        Ok(self.solution_max[self.eq_index(eq)?])
    }

    /// Smallest neighbor value seen for one equation.
    #[inline]
    pub fn get_solution_min(&self, eq: usize) -> Result<f64> {
        Ok(self.solution_min[self.eq_index(eq)?])
    }

    // ------------------------------------------------------------------
    // Residual
    // ------------------------------------------------------------------

    /// Residual accumulator, one entry per equation.
    #[inline]
    pub fn residual(&self) -> &[f64] {
        &self.residual
    }

    /// Get one residual component.
    #[inline]
    pub fn get_residual(&self, eq: usize) -> Result<f64> {
        Ok(self.residual[self.eq_index(eq)?])
    }

    /// Set one residual component.
    #[inline]
    pub fn set_residual(&mut self, eq: usize, value: f64) -> Result<()> {
        let i = self.eq_index(eq)?;
        self.residual[i] = value;
        Ok(())
    }

    /// Accumulate into one residual component.
    #[inline]
    pub fn add_residual(&mut self, eq: usize, value: f64) -> Result<()> {
        let i = self.eq_index(eq)?;
        self.residual[i] += value;
        Ok(())
    }

    /// Zero the residual accumulator.
    pub fn set_residual_zero(&mut self) {
        self.residual.fill(0.0);
    }

    /// L2 norm of the residual accumulator.
    pub fn residual_norm(&self) -> f64 {
        self.residual.iter().map(|r| r * r).sum::<f64>().sqrt()
    }

    // ------------------------------------------------------------------
    // Relaxation and local time step
    // ------------------------------------------------------------------

    /// Under-relaxation factor applied by [`add_relaxed_solution`](Self::add_relaxed_solution).
    #[inline]
    pub fn under_relaxation(&self) -> f64 {
        self.under_relaxation
    }

    /// Set the under-relaxation factor; must lie in `(0, 1]`.
    pub fn set_under_relaxation(&mut self, factor: f64) -> Result<()> {
        validate_relaxation(factor)?;
        self.under_relaxation = factor;
        Ok(())
    }

    /// Local CFL number.
    #[inline]
    pub fn local_cfl(&self) -> f64 {
        self.local_cfl
    }

    /// Set the local CFL number, which must be finite and positive.
    pub fn set_local_cfl(&mut self, cfl: f64) -> Result<()> {
        if !cfl.is_finite() || cfl <= 0.0 {
            return Err(StateError::InvalidValue {
                what: "CFL number",
                value: cfl,
            });
        }
        self.local_cfl = cfl;
        Ok(())
    }

    /// Local (pseudo) time step.
    #[inline]
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Set the local (pseudo) time step, which must be finite and non-negative.
    pub fn set_delta_time(&mut self, dt: f64) -> Result<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(StateError::InvalidValue {
                what: "time step",
                value: dt,
            });
        }
        self.delta_time = dt;
        Ok(())
    }
}

/// Common interface of per-point containers built around a [`PointState`].
///
/// Specialized containers add equation-specific data and forward the
/// generic bookkeeping to the composed base state through this trait.
pub trait PointVariable: Send + Sync {
    /// The generic state.
    fn state(&self) -> &PointState;

    /// Mutable access to the generic state.
    fn state_mut(&mut self) -> &mut PointState;

    /// Number of equations.
    fn n_var(&self) -> usize {
        self.state().n_var()
    }

    /// Number of spatial dimensions.
    fn n_dim(&self) -> usize {
        self.state().n_dim()
    }

    /// Current solution.
    fn solution(&self) -> &[f64] {
        self.state().solution()
    }
}

impl PointVariable for PointState {
    fn state(&self) -> &PointState {
        self
    }

    fn state_mut(&mut self) -> &mut PointState {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-14;

    fn point(n_dim: usize, n_var: usize) -> PointState {
        PointState::new(&[0.0], n_dim, n_var, &SolverConfig::default()).unwrap()
    }

    #[test]
    fn test_new_sizes() {
        let p = point(3, 2);
        assert_eq!(p.n_dim(), 3);
        assert_eq!(p.n_var(), 2);
        assert_eq!(p.solution().len(), 2);
        assert_eq!(p.gradient().len(), 6);
        assert_eq!(p.limiter(), &[1.0, 1.0]);
        assert_eq!(p.residual(), &[0.0, 0.0]);
        assert!(p.solution_time_n().is_none());
    }

    #[test]
    fn test_initial_broadcast_and_vector() {
        let config = SolverConfig::default();
        let p = PointState::new(&[0.25], 2, 3, &config).unwrap();
        assert_eq!(p.solution(), &[0.25, 0.25, 0.25]);
        assert_eq!(p.solution_old(), &[0.25, 0.25, 0.25]);

        let p = PointState::new(&[1.0, 2.0, 3.0], 2, 3, &config).unwrap();
        assert_eq!(p.solution(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_new_rejects_bad_sizes() {
        let config = SolverConfig::default();
        assert!(matches!(
            PointState::new(&[0.0], 2, 0, &config),
            Err(StateError::InvalidSize { what: "number of equations", value: 0 })
        ));
        assert!(matches!(
            PointState::new(&[0.0], 4, 1, &config),
            Err(StateError::InvalidSize { what: "number of dimensions", value: 4 })
        ));
        assert!(matches!(
            PointState::new(&[0.0], 0, 1, &config),
            Err(StateError::InvalidSize { .. })
        ));
        assert_eq!(
            PointState::new(&[1.0, 2.0], 2, 3, &config),
            Err(StateError::dimension_mismatch("initial solution", 3, 2))
        );
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = SolverConfig::new().with_cfl(-1.0);
        assert!(PointState::new(&[0.0], 2, 1, &config).is_err());
    }

    #[test]
    fn test_solution_accessors() {
        let mut p = point(2, 2);
        p.set_solution(1, 4.0).unwrap();
        p.add_solution(1, 0.5).unwrap();
        assert!((p.get_solution(1).unwrap() - 4.5).abs() < TOL);
        assert_eq!(p.get_solution(0).unwrap(), 0.0);
        assert_eq!(
            p.get_solution(2),
            Err(StateError::out_of_range("equation", 2, 2))
        );

        p.set_solution_all(&[7.0, 8.0]).unwrap();
        assert_eq!(p.solution(), &[7.0, 8.0]);
        assert!(p.set_solution_all(&[1.0]).is_err());
    }

    #[test]
    fn test_old_solution_round_trip() {
        let mut p = point(2, 2);
        p.set_solution_all(&[1.0, 2.0]).unwrap();
        p.set_old_solution();
        p.set_solution_all(&[5.0, 6.0]).unwrap();
        assert_eq!(p.solution_old(), &[1.0, 2.0]);
        assert_eq!(p.get_solution_old(1).unwrap(), 2.0);

        p.set_solution_to_old();
        assert_eq!(p.solution(), &[1.0, 2.0]);
    }

    #[test]
    fn test_dual_time_shift() {
        let config = SolverConfig::new().with_dual_time(true);
        let mut p = PointState::new(&[1.0], 2, 1, &config).unwrap();
        assert_eq!(p.solution_time_n(), Some(&[1.0][..]));

        p.set_solution(0, 2.0).unwrap();
        p.set_solution_time_n().unwrap();
        p.set_solution(0, 3.0).unwrap();
        p.set_solution_time_n().unwrap();

        assert_eq!(p.solution_time_n(), Some(&[3.0][..]));
        assert_eq!(p.solution_time_n1(), Some(&[2.0][..]));
    }

    #[test]
    fn test_time_shift_without_dual_time() {
        let mut p = point(2, 1);
        assert_eq!(p.set_solution_time_n(), Err(StateError::TimeHistoryDisabled));
    }

    #[test]
    fn test_relaxed_update() {
        let config = SolverConfig::new().with_under_relaxation(0.5);
        let mut p = PointState::new(&[1.0], 2, 1, &config).unwrap();
        p.add_relaxed_solution(0, 2.0).unwrap();
        assert!((p.get_solution(0).unwrap() - 2.0).abs() < TOL);

        p.set_under_relaxation(1.0).unwrap();
        p.add_relaxed_solution(0, 2.0).unwrap();
        assert!((p.get_solution(0).unwrap() - 4.0).abs() < TOL);

        assert!(p.set_under_relaxation(0.0).is_err());
        assert_eq!(p.under_relaxation(), 1.0);
    }

    #[test]
    fn test_gradient_layout() {
        let mut p = point(3, 2);
        p.set_gradient(1, 2, 5.0).unwrap();
        p.add_gradient(1, 2, 1.0).unwrap();
        p.set_gradient(0, 0, -1.0).unwrap();

        assert_eq!(p.get_gradient(1, 2).unwrap(), 6.0);
        assert_eq!(p.gradient()[5], 6.0);
        assert_eq!(p.gradient_row(1).unwrap(), &[0.0, 0.0, 6.0]);
        assert_eq!(p.gradient_row(0).unwrap(), &[-1.0, 0.0, 0.0]);

        assert_eq!(
            p.get_gradient(0, 3),
            Err(StateError::out_of_range("dimension", 3, 3))
        );
        assert!(p.gradient_row(2).is_err());

        p.set_gradient_zero();
        assert!(p.gradient().iter().all(|&g| g == 0.0));
    }

    #[test]
    fn test_limiter_clamped() {
        let mut p = point(2, 2);
        p.set_limiter(0, 0.3).unwrap();
        p.set_limiter(1, 1.7).unwrap();
        assert_eq!(p.get_limiter(0).unwrap(), 0.3);
        assert_eq!(p.get_limiter(1).unwrap(), 1.0);
        p.set_limiter(1, -2.0).unwrap();
        assert_eq!(p.get_limiter(1).unwrap(), 0.0);

        p.set_limiter(0, f64::NAN).unwrap();
        assert_eq!(p.get_limiter(0).unwrap(), 0.0);
        p.set_limiter(1, f64::INFINITY).unwrap();
        assert_eq!(p.get_limiter(1).unwrap(), 1.0);
        assert!(p.limiter().iter().all(|l| (0.0..=1.0).contains(l)));
    }

    #[test]
    fn test_solution_bounds() {
        let mut p = point(2, 2);
        p.set_solution_bounds_from(&[1.0, -1.0]).unwrap();
        p.set_solution_bounds_from(&[3.0, -4.0]).unwrap();
        assert_eq!(p.get_solution_max(0).unwrap(), 3.0);
        assert_eq!(p.get_solution_min(0).unwrap(), 1.0);
        assert_eq!(p.get_solution_max(1).unwrap(), -1.0);
        assert_eq!(p.get_solution_min(1).unwrap(), -4.0);
        assert!(p.set_solution_bounds_from(&[0.0]).is_err());

        p.reset_solution_bounds();
        assert_eq!(p.get_solution_max(0).unwrap(), f64::MIN);
        assert_eq!(p.get_solution_min(0).unwrap(), f64::MAX);
    }

    #[test]
    fn test_residual() {
        let mut p = point(2, 2);
        p.set_residual(0, 3.0).unwrap();
        p.add_residual(1, 4.0).unwrap();
        assert!((p.residual_norm() - 5.0).abs() < TOL);
        assert_eq!(p.get_residual(1).unwrap(), 4.0);
        assert!(p.add_residual(5, 1.0).is_err());

        p.set_residual_zero();
        assert_eq!(p.residual_norm(), 0.0);
    }

    #[test]
    fn test_cfl_and_time_step() {
        let config = SolverConfig::new().with_cfl(2.5);
        let mut p = PointState::new(&[0.0], 2, 1, &config).unwrap();
        assert_eq!(p.local_cfl(), 2.5);
        p.set_local_cfl(4.0).unwrap();
        p.set_delta_time(1e-3).unwrap();
        assert_eq!(p.local_cfl(), 4.0);
        assert_eq!(p.delta_time(), 1e-3);

        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                p.set_local_cfl(bad),
                Err(StateError::InvalidValue { what: "CFL number", .. })
            ));
        }
        for bad in [-1e-3, f64::NAN, f64::NEG_INFINITY] {
            assert!(matches!(
                p.set_delta_time(bad),
                Err(StateError::InvalidValue { what: "time step", .. })
            ));
        }
        assert_eq!(p.local_cfl(), 4.0);
        assert_eq!(p.delta_time(), 1e-3);

        p.set_delta_time(0.0).unwrap();
        assert_eq!(p.delta_time(), 0.0);
    }

    #[test]
    fn test_point_variable_forwarding() {
        let mut p = point(3, 2);
        p.state_mut().set_solution(0, 1.0).unwrap();
        assert_eq!(PointVariable::n_var(&p), 2);
        assert_eq!(PointVariable::n_dim(&p), 3);
        assert_eq!(PointVariable::solution(&p), &[1.0, 0.0]);
    }
}
