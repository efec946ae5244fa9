//! Placeholder for point states that are not built yet.

use crate::error::{Result, StateError};

/// A per-point state that may not have been sized yet.
///
/// Storage that is reserved before the solver knows its sizing holds
/// `Vacant` slots. A vacant slot cannot be read as a state: accessors
/// return [`StateError::Uninitialized`] until the slot is filled.
///
/// # Example
///
/// ```
/// use fv_state::{PointSlot, ScalarPointState, SolverConfig, StateError};
///
/// let mut slot: PointSlot<ScalarPointState> = PointSlot::default();
/// assert_eq!(slot.get().err(), Some(StateError::Uninitialized));
///
/// slot.fill(ScalarPointState::uniform(0.0, 2, 1, &SolverConfig::default())?);
/// assert_eq!(slot.get()?.diffusivity(), &[0.0]);
/// # Ok::<(), StateError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PointSlot<T> {
    /// Not initialized, holds no storage
    #[default]
    Vacant,
    /// Sized and initialized state
    Ready(T),
}

impl<T> PointSlot<T> {
    /// Whether the slot holds a state.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The held state.
    pub fn get(&self) -> Result<&T> {
        match self {
            Self::Ready(state) => Ok(state),
            Self::Vacant => Err(StateError::Uninitialized),
        }
    }

    /// Mutable access to the held state.
    pub fn get_mut(&mut self) -> Result<&mut T> {
        match self {
            Self::Ready(state) => Ok(state),
            Self::Vacant => Err(StateError::Uninitialized),
        }
    }

    /// Store a state, dropping any previous one.
    pub fn fill(&mut self, state: T) {
        *self = Self::Ready(state);
    }

    /// Take the state out, leaving the slot vacant.
    pub fn take(&mut self) -> Result<T> {
        match std::mem::take(self) {
            Self::Ready(state) => Ok(state),
            Self::Vacant => Err(StateError::Uninitialized),
        }
    }
}

impl<T> From<T> for PointSlot<T> {
    fn from(state: T) -> Self {
        Self::Ready(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::state::ScalarPointState;

    #[test]
    fn test_vacant_slot_rejects_access() {
        let mut slot: PointSlot<ScalarPointState> = PointSlot::default();
        assert!(!slot.is_ready());
        assert_eq!(slot.get().err(), Some(StateError::Uninitialized));
        assert_eq!(slot.get_mut().err(), Some(StateError::Uninitialized));
        assert_eq!(slot.take().err(), Some(StateError::Uninitialized));
    }

    #[test]
    fn test_fill_and_take() {
        let config = SolverConfig::default();
        let mut slot = PointSlot::Vacant;
        slot.fill(ScalarPointState::uniform(1.0, 3, 2, &config).unwrap());
        assert!(slot.is_ready());

        slot.get_mut().unwrap().set_diffusivity(0.5, 0).unwrap();
        assert_eq!(slot.get().unwrap().get_diffusivity(0).unwrap(), 0.5);

        let state = slot.take().unwrap();
        assert_eq!(state.diffusivity(), &[0.5, 0.0]);
        assert!(!slot.is_ready());
    }

    #[test]
    fn test_drop_vacant_is_safe() {
        let slot: PointSlot<ScalarPointState> = PointSlot::Vacant;
        drop(slot);
    }

    #[test]
    fn test_from_state() {
        let config = SolverConfig::default();
        let slot: PointSlot<_> = ScalarPointState::uniform(0.0, 2, 1, &config).unwrap().into();
        assert!(slot.is_ready());
    }
}
