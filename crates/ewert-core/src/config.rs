/// JSON configuration for a single Ewert solve.
///
/// A scenario bundles the constants of one leaf/timestep, the model
/// options, the loop seed and the convergence settings.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EwertResult;
use crate::ewert::batch::Invocation;
use crate::ewert::constants::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::ewert::inputs::ConstantInputs;
use crate::ewert::options::ModelOptions;
use crate::ewert::run::Ewert;
use crate::ewert::state::LoopState;
use crate::traits::{validate_loop_settings, IterativeModel};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Stop once |Δc_i| is at or below this [ppm].
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}
fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

/// Starting values for the loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeedConfig {
    pub c_i: f64,
    pub g_sto: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub constants: ConstantInputs,
    #[serde(default)]
    pub options: ModelOptions,
    pub seed: SeedConfig,
    #[serde(default)]
    pub solver: SolverConfig,
}

impl Scenario {
    /// Load from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> EwertResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse and validate a JSON scenario.
    pub fn from_json_str(json: &str) -> EwertResult<Self> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> EwertResult<()> {
        validate_loop_settings(self.solver.tolerance, self.solver.max_iterations)?;
        Ewert::validate(&self.constants, &self.initial_state(), &self.options)
    }

    pub fn initial_state(&self) -> LoopState {
        LoopState::seed(self.seed.c_i, self.seed.g_sto)
    }

    pub fn invocation(&self) -> Invocation {
        Invocation {
            constants: self.constants,
            initial_state: self.initial_state(),
            options: self.options,
            solver: self.solver,
        }
    }

    /// Run the convergence loop for this scenario.
    pub fn run(&self) -> EwertResult<LoopState> {
        self.invocation().run()
    }
}
