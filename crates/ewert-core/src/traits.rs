/// Core trait for fixed-point leaf models.
///
/// Defines the interface an iterated single-timestep model implements:
/// validate inputs, take one step, report the residual, and drive the
/// loop to convergence.
use smallvec::SmallVec;

use crate::error::{EwertError, EwertResult};

/// Snapshots produced by one convergence loop, in iteration order.
pub type History<S> = SmallVec<[S; 8]>;

pub trait IterativeModel {
    const NAME: &'static str;
    type Constants;
    type State: Clone;
    type Options: Copy;

    /// Reject constants or a seed state outside their physical bounds.
    fn validate(
        constants: &Self::Constants,
        state: &Self::State,
        options: &Self::Options,
    ) -> EwertResult<()>;

    /// Execute one iteration: given the previous state, return the next one.
    fn step(
        constants: &Self::Constants,
        state: &Self::State,
        options: &Self::Options,
    ) -> EwertResult<Self::State>;

    /// Change produced by the iteration that created `state`.
    fn residual(state: &Self::State) -> f64;

    /// Number of iterations that produced `state`.
    fn iterations(state: &Self::State) -> u32;

    /// Iterate until the residual is within `tolerance` or the counter
    /// reaches `max_iterations`.
    ///
    /// The first step always runs, whatever residual the seed carries.
    /// Hitting the cap is a normal outcome, not an error.
    fn run(
        constants: &Self::Constants,
        initial_state: &Self::State,
        options: &Self::Options,
        tolerance: f64,
        max_iterations: u32,
    ) -> EwertResult<Self::State> {
        validate_loop_settings(tolerance, max_iterations)?;
        Self::validate(constants, initial_state, options)?;

        let mut state = Self::step(constants, initial_state, options)?;
        while !Self::is_done(&state, tolerance, max_iterations) {
            tracing::trace!(
                model = Self::NAME,
                iteration = Self::iterations(&state),
                residual = Self::residual(&state),
                "iteration"
            );
            state = Self::step(constants, &state, options)?;
        }

        Self::log_outcome(&state, tolerance);
        Ok(state)
    }

    /// Same loop as [`IterativeModel::run`], keeping every intermediate state.
    fn run_with_history(
        constants: &Self::Constants,
        initial_state: &Self::State,
        options: &Self::Options,
        tolerance: f64,
        max_iterations: u32,
    ) -> EwertResult<History<Self::State>> {
        validate_loop_settings(tolerance, max_iterations)?;
        Self::validate(constants, initial_state, options)?;

        let mut history = History::new();
        let mut state = Self::step(constants, initial_state, options)?;
        while !Self::is_done(&state, tolerance, max_iterations) {
            let next = Self::step(constants, &state, options)?;
            history.push(state);
            state = next;
        }

        Self::log_outcome(&state, tolerance);
        history.push(state);
        Ok(history)
    }

    #[doc(hidden)]
    fn is_done(state: &Self::State, tolerance: f64, max_iterations: u32) -> bool {
        Self::residual(state) <= tolerance || Self::iterations(state) >= max_iterations
    }

    #[doc(hidden)]
    fn log_outcome(state: &Self::State, tolerance: f64) {
        let residual = Self::residual(state);
        tracing::debug!(
            model = Self::NAME,
            iterations = Self::iterations(state),
            residual,
            converged = residual <= tolerance,
            "convergence loop finished"
        );
    }
}

/// Loop settings shared by every model: a positive, finite tolerance and
/// at least one iteration.
pub fn validate_loop_settings(tolerance: f64, max_iterations: u32) -> EwertResult<()> {
    if !(tolerance > 0.0 && tolerance.is_finite()) {
        return Err(EwertError::invalid("tolerance", tolerance, "must be > 0"));
    }
    if max_iterations == 0 {
        return Err(EwertError::invalid("max_iterations", 0.0, "must be > 0"));
    }
    Ok(())
}
