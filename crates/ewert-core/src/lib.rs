//! ewert-core: the Ewert photosynthesis/stomatal conductance solver.
//!
//! A single-timestep leaf model: `solve_iteration` computes one update of
//! internal CO2, conductance and assimilation; `run_to_convergence` repeats
//! it until internal CO2 settles or the iteration cap is hit.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | `ewert::batch::run_batch` uses Rayon's thread pool.      |
//! | `bench`    | Builds the `bench` binary and its `tracing` subscriber.  |
pub mod config;
pub mod error;
pub mod ewert;
pub mod traits;

pub use error::{EwertError, EwertResult};
pub use ewert::inputs::ConstantInputs;
pub use ewert::options::{HumidityMode, ModelOptions};
pub use ewert::phenology::LeafPhenology;
pub use ewert::run::{run_to_convergence, run_with_history, solve_iteration};
pub use ewert::state::{ConvergenceStatus, LimitingRate, LoopState};
