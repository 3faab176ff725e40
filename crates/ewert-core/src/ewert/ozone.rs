/// Ozone damage on photosynthesis.
///
/// Short-term damage (hourly and cumulative factors with night recovery)
/// scales Rubisco activity. Long-term exposure shortens the mature leaf
/// life and brings senescence forward.
use super::constants::NMOL_TO_UMOL;
use super::inputs::ConstantInputs;
use super::options::ModelOptions;
use super::phenology::{age_factor, senescence_progress, LeafPhenology};

/// Ozone factors for one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OzoneEffects {
    pub fo3_h: f64,
    pub fo3_d: f64,
    pub fo3_l: f64,
    pub f_ls: f64,
    pub phenology: LeafPhenology,
}

impl OzoneEffects {
    /// No damage: multiplicative factors at 1, exposure at 0, phenology untouched.
    pub fn neutral(phenology: LeafPhenology) -> Self {
        Self {
            fo3_h: 1.0,
            fo3_d: 1.0,
            fo3_l: 0.0,
            f_ls: 1.0,
            phenology,
        }
    }
}

/// Hourly ozone impact factor fO3_h [0-1].
///
/// Uptake up to gamma_1/gamma_2 is detoxified; above it the factor falls
/// linearly with slope gamma_2 and reaches 0 at (1 + gamma_1)/gamma_2.
pub fn hourly_factor(o3up: f64, gamma_1: f64, gamma_2: f64) -> f64 {
    if gamma_2 <= 0.0 {
        return 1.0;
    }
    let o3up_min = gamma_1 / gamma_2;
    let o3up_max = (1.0 + gamma_1) / gamma_2;
    if o3up <= o3up_min {
        1.0
    } else if o3up < o3up_max {
        1.0 + gamma_1 - gamma_2 * o3up
    } else {
        0.0
    }
}

/// Overnight recovery rate rO3. Younger leaves recover more.
pub fn recovery_rate(fo3_d_prev: f64, f_la: f64) -> f64 {
    fo3_d_prev + (1.0 - fo3_d_prev) * f_la
}

/// Lowest cumulative factor the accumulated uptake allows.
pub fn damage_floor(gamma_2: f64, o3up_acc: f64) -> f64 {
    1.0 - gamma_2 * o3up_acc
}

/// Cumulative ozone impact factor fO3_d [0-1].
///
/// Damage compounds during daylight. Recovery applies every night hour
/// with full night recovery, otherwise only at midnight; any other night
/// hour carries the previous factor over unchanged.
#[allow(clippy::too_many_arguments)]
pub fn cumulative_factor(
    fo3_h: f64,
    fo3_d_prev: f64,
    r_o3: f64,
    floor: f64,
    is_daylight: bool,
    hr: u32,
    full_night_recovery: bool,
) -> f64 {
    let damaged = if is_daylight {
        fo3_d_prev * fo3_h
    } else if full_night_recovery || hr == 0 {
        r_o3 * fo3_h
    } else {
        return fo3_d_prev;
    };
    damaged.max(floor).clamp(0.0, 1.0)
}

/// Long-term ozone exposure effect fO3_l.
pub fn exposure(gamma_3: f64, o3up_acc: f64) -> f64 {
    gamma_3 * o3up_acc * NMOL_TO_UMOL
}

/// Leaf phenology shortened by long-term exposure.
///
/// The expanded period shrinks by `fO3_l`, senescence by
/// `fO3_l * t_lse_constant`; mature and total life shrink by the sum.
pub fn adjusted_phenology(p: &LeafPhenology, fo3_l: f64, t_lse_constant: f64) -> LeafPhenology {
    let t_lep = p.t_lep * (1.0 - fo3_l).max(0.0);
    let t_lse = p.t_lse * (1.0 - fo3_l * t_lse_constant).max(0.0);
    let t_lma = p.t_lma - (p.t_lep - t_lep) - (p.t_lse - t_lse);
    let t_l = p.t_l - (p.t_lma - t_lma);
    LeafPhenology {
        t_l,
        t_lem: p.t_lem,
        t_lep,
        t_lse,
        t_lma,
    }
}

/// Senescence effect f_LS [0-1]: one minus the share of senescence that
/// ozone has brought forward.
pub fn senescence_effect(td_dd: f64, base: &LeafPhenology, ozone: &LeafPhenology) -> f64 {
    let advance = senescence_progress(td_dd, ozone) - senescence_progress(td_dd, base);
    1.0 - advance.max(0.0)
}

/// All ozone factors for one iteration.
///
/// Depends only on the constants, so it is identical across iterations of
/// one loop.
pub fn ozone_effects(constants: &ConstantInputs, options: &ModelOptions) -> OzoneEffects {
    let base = constants.phenology;
    if !options.ozone_damage {
        return OzoneEffects::neutral(base);
    }

    let fo3_h = hourly_factor(constants.o3up, constants.gamma_1, constants.gamma_2);
    let r_o3 = recovery_rate(constants.fo3_d_prev, age_factor(constants.td_dd, &base));
    let floor = damage_floor(constants.gamma_2, constants.o3up_acc);
    let fo3_d = cumulative_factor(
        fo3_h,
        constants.fo3_d_prev,
        r_o3,
        floor,
        constants.is_daylight,
        constants.hr,
        options.full_night_recovery,
    );

    let fo3_l = exposure(constants.gamma_3, constants.o3up_acc);
    let phenology = adjusted_phenology(&base, fo3_l, constants.t_lse_constant);
    let f_ls = senescence_effect(constants.td_dd, &base, &phenology);

    OzoneEffects {
        fo3_h,
        fo3_d,
        fo3_l,
        f_ls,
        phenology,
    }
}
