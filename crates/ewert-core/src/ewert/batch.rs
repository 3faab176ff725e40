/// Fan-out over independent convergence loops.
///
/// Each invocation carries its own constants, seed and options, so loops
/// share nothing. With the `parallel` Cargo feature the loops run on
/// Rayon's thread pool; results keep the input order either way.
use super::inputs::ConstantInputs;
use super::options::ModelOptions;
use super::run::run_to_convergence;
use super::state::LoopState;
use crate::config::SolverConfig;
use crate::error::EwertResult;

/// One leaf/timestep to solve, e.g. a canopy layer in a given hour.
#[derive(Debug, Clone, Copy)]
pub struct Invocation {
    pub constants: ConstantInputs,
    pub initial_state: LoopState,
    pub options: ModelOptions,
    pub solver: SolverConfig,
}

impl Invocation {
    pub fn run(&self) -> EwertResult<LoopState> {
        run_to_convergence(
            &self.constants,
            &self.initial_state,
            &self.options,
            self.solver.tolerance,
            self.solver.max_iterations,
        )
    }
}

/// Solve every invocation. A failure in one does not affect the others.
pub fn run_batch(invocations: &[Invocation]) -> Vec<EwertResult<LoopState>> {
    #[cfg(not(feature = "parallel"))]
    {
        invocations.iter().map(Invocation::run).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        invocations.par_iter().map(Invocation::run).collect()
    }
}
