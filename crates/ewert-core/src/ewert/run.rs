/// Ewert model orchestration functions.
///
/// - `solve_iteration()`: one pass of the CO2 convergence loop → LoopState
/// - `run_to_convergence()`: iterate until c_i settles → LoopState
/// - `run_with_history()`: same loop, keeping every intermediate state
use super::inputs::ConstantInputs;
use super::options::{HumidityMode, ModelOptions};
use super::ozone;
use super::phenology;
use super::processes;
use super::state::LoopState;
use crate::error::{EwertError, EwertResult};
use crate::traits::{History, IterativeModel};

/// Marker type for the trait implementation.
pub struct Ewert;

impl IterativeModel for Ewert {
    const NAME: &'static str = "Ewert";
    type Constants = ConstantInputs;
    type State = LoopState;
    type Options = ModelOptions;

    fn validate(
        constants: &Self::Constants,
        state: &Self::State,
        options: &Self::Options,
    ) -> EwertResult<()> {
        constants.validate(options)?;
        for (field, value) in [("c_i", state.c_i), ("g_sto", state.g_sto)] {
            if !value.is_finite() {
                return Err(EwertError::invalid(field, value, "seed must be finite"));
            }
            if value < 0.0 {
                return Err(EwertError::invalid(field, value, "seed must be non-negative"));
            }
        }
        Ok(())
    }

    fn step(
        constants: &Self::Constants,
        state: &Self::State,
        options: &Self::Options,
    ) -> EwertResult<Self::State> {
        iterate(constants, state, options)
    }

    fn residual(state: &Self::State) -> f64 {
        state.c_i_diff
    }

    fn iterations(state: &Self::State) -> u32 {
        state.iterations
    }
}

/// Fail with `NumericDegeneracy` if `value` is NaN or infinite.
fn finite(iteration: u32, quantity: &'static str, value: f64) -> EwertResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        tracing::warn!(iteration, quantity, value, "non-finite intermediate");
        Err(EwertError::NumericDegeneracy {
            iteration,
            quantity,
            value,
        })
    }
}

/// One iteration on already-validated inputs.
fn iterate(c: &ConstantInputs, previous: &LoopState, options: &ModelOptions) -> EwertResult<LoopState> {
    let iteration = previous.iterations.saturating_add(1);

    // Step 1: Ozone damage
    let ozone = ozone::ozone_effects(c, options);

    // Step 2: Leaf age on the ozone-adjusted phenology
    let f_la = phenology::age_factor(c.td_dd, &ozone.phenology);

    // Step 3: Humidity
    let f_vpd = match options.humidity_mode {
        HumidityMode::Computed => finite(
            iteration,
            "f_VPD",
            processes::humidity_factor(c.d_0, c.e_a, c.e_sat_i),
        )?,
        HumidityMode::ExternallySupplied => c.f_vpd.ok_or_else(|| {
            EwertError::invalid("f_VPD", f64::NAN, "required when humidity is externally supplied")
        })?,
    };

    // Step 4: Candidate assimilation rates from the previous c_i
    let a_c = finite(
        iteration,
        "A_c",
        processes::rubisco_limited_rate(
            previous.c_i,
            c.v_cmax,
            c.k_c,
            c.k_o,
            c.gamma,
            ozone.fo3_d * ozone.f_ls,
        ),
    )?;
    let a_j = finite(
        iteration,
        "A_j",
        processes::electron_transport_limited_rate(previous.c_i, c.j, c.gamma, c.gamma_star),
    )?;
    let a_p = finite(
        iteration,
        "A_p",
        processes::triose_phosphate_limited_rate(c.v_cmax, f_la, ozone.f_ls),
    )?;
    let (a_n, limit) = processes::net_assimilation(a_c, a_j, a_p, c.r_d);

    // Step 5: Conductance
    let c_s = finite(iteration, "c_s", processes::surface_co2(c.c_a, a_n, c.g_bl))?;
    let g_sto = finite(
        iteration,
        "g_sto",
        processes::stomatal_conductance(c.g_sto_0, c.m, a_n, c.f_sw, f_vpd, c_s, c.gamma),
    )?;
    let g_sto = processes::bounded_conductance(g_sto, c.g_sto_0);

    // Step 6: Internal CO2
    let c_i = finite(iteration, "c_i", processes::internal_co2(c_s, a_n, g_sto))?;
    let c_i = processes::bounded_internal_co2(c_i);

    Ok(LoopState {
        c_i,
        c_i_diff: (c_i - previous.c_i).abs(),
        g_sto,
        f_ls: ozone.f_ls,
        f_la,
        a_c,
        a_j,
        a_p,
        a_n,
        a_n_limit_factor: Some(limit),
        fo3_d: ozone.fo3_d,
        fo3_h: ozone.fo3_h,
        fo3_l: ozone.fo3_l,
        t_lep_ozone: Some(ozone.phenology.t_lep),
        t_lma_ozone: Some(ozone.phenology.t_lma),
        t_lse_ozone: Some(ozone.phenology.t_lse),
        t_l_ozone: Some(ozone.phenology.t_l),
        f_vpd,
        iterations: iteration,
    })
}

/// Execute one iteration of the CO2 convergence loop.
///
/// Pure: the result depends only on the arguments. Inputs are validated first.
pub fn solve_iteration(
    constants: &ConstantInputs,
    previous: &LoopState,
    options: &ModelOptions,
) -> EwertResult<LoopState> {
    Ewert::validate(constants, previous, options)?;
    iterate(constants, previous, options)
}

/// Iterate `solve_iteration` until `c_i_diff <= tolerance` or
/// `iterations >= max_iterations`.
///
/// Reaching the cap is not an error; inspect `iterations` and `c_i_diff`
/// on the returned state.
pub fn run_to_convergence(
    constants: &ConstantInputs,
    initial_state: &LoopState,
    options: &ModelOptions,
    tolerance: f64,
    max_iterations: u32,
) -> EwertResult<LoopState> {
    Ewert::run(constants, initial_state, options, tolerance, max_iterations)
}

/// Run the convergence loop, returning every state it produced.
///
/// The last element equals the result of `run_to_convergence`.
pub fn run_with_history(
    constants: &ConstantInputs,
    initial_state: &LoopState,
    options: &ModelOptions,
    tolerance: f64,
    max_iterations: u32,
) -> EwertResult<History<LoopState>> {
    Ewert::run_with_history(constants, initial_state, options, tolerance, max_iterations)
}
