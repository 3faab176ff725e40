/// Ewert convergence loop state.
///
/// Each call to the single-iteration solver returns a fresh snapshot; the
/// previous one is never modified.
use serde::{Deserialize, Serialize};

use super::phenology::LeafPhenology;

/// Which candidate rate limited net assimilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitingRate {
    /// Rubisco activity
    #[serde(rename = "A_c")]
    Rubisco,
    /// RuBP regeneration (electron transport)
    #[serde(rename = "A_j")]
    ElectronTransport,
    /// Triose phosphate utilisation
    #[serde(rename = "A_p")]
    TriosePhosphate,
}

impl LimitingRate {
    pub fn label(self) -> &'static str {
        match self {
            LimitingRate::Rubisco => "A_c",
            LimitingRate::ElectronTransport => "A_j",
            LimitingRate::TriosePhosphate => "A_p",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopState {
    /// Internal CO2 concentration [ppm]
    pub c_i: f64,
    /// |c_i - previous c_i| [ppm]
    pub c_i_diff: f64,
    /// Stomatal conductance [umol m-2 s-1]
    pub g_sto: f64,
    /// Ozone-induced senescence effect on A_c [0-1]
    #[serde(rename = "f_LS")]
    pub f_ls: f64,
    /// Leaf age factor [0-1]
    #[serde(rename = "f_LA")]
    pub f_la: f64,
    #[serde(rename = "A_c")]
    pub a_c: f64,
    #[serde(rename = "A_j")]
    pub a_j: f64,
    #[serde(rename = "A_p")]
    pub a_p: f64,
    /// Net CO2 assimilation [umol m-2 s-1]
    #[serde(rename = "A_n")]
    pub a_n: f64,
    #[serde(rename = "A_n_limit_factor")]
    pub a_n_limit_factor: Option<LimitingRate>,
    /// Cumulative ozone factor [0-1]
    #[serde(rename = "fO3_d")]
    pub fo3_d: f64,
    /// Hourly ozone factor [0-1]
    #[serde(rename = "fO3_h")]
    pub fo3_h: f64,
    /// Long-term ozone exposure effect [-]
    #[serde(rename = "fO3_l")]
    pub fo3_l: f64,
    /// Ozone-adjusted expanded period [thermal time], `None` until the first iteration.
    pub t_lep_ozone: Option<f64>,
    /// Ozone-adjusted mature leaf life [thermal time]
    pub t_lma_ozone: Option<f64>,
    /// Ozone-adjusted senescence period [thermal time]
    pub t_lse_ozone: Option<f64>,
    /// Ozone-adjusted leaf life span [thermal time]
    pub t_l_ozone: Option<f64>,
    /// Humidity factor on conductance [0-1]
    #[serde(rename = "f_VPD")]
    pub f_vpd: f64,
    pub iterations: u32,
}

impl LoopState {
    /// Ozone-adjusted phenology once an iteration has run. Emergence is
    /// never shortened, so `t_lem` comes from `base`.
    pub fn ozone_phenology(&self, base: &LeafPhenology) -> Option<LeafPhenology> {
        Some(LeafPhenology {
            t_l: self.t_l_ozone?,
            t_lem: base.t_lem,
            t_lep: self.t_lep_ozone?,
            t_lse: self.t_lse_ozone?,
            t_lma: self.t_lma_ozone?,
        })
    }

    /// Seed state for a new loop. Ozone factors start neutral.
    pub fn seed(c_i: f64, g_sto: f64) -> Self {
        Self {
            c_i,
            c_i_diff: 0.0,
            g_sto,
            f_ls: 0.0,
            f_la: 0.0,
            a_c: 0.0,
            a_j: 0.0,
            a_p: 0.0,
            a_n: 0.0,
            a_n_limit_factor: None,
            fo3_d: 1.0,
            fo3_h: 1.0,
            fo3_l: 0.0,
            t_lep_ozone: None,
            t_lma_ozone: None,
            t_lse_ozone: None,
            t_l_ozone: None,
            f_vpd: 1.0,
            iterations: 0,
        }
    }
}

/// Position of a state in the convergence loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceStatus {
    NotStarted,
    Iterating,
    Converged,
    MaxIterationsReached,
}

impl ConvergenceStatus {
    /// Classify a state. A state that meets the tolerance on the capped
    /// iteration counts as converged.
    pub fn of(state: &LoopState, tolerance: f64, max_iterations: u32) -> Self {
        if state.iterations == 0 {
            ConvergenceStatus::NotStarted
        } else if state.c_i_diff <= tolerance {
            ConvergenceStatus::Converged
        } else if state.iterations >= max_iterations {
            ConvergenceStatus::MaxIterationsReached
        } else {
            ConvergenceStatus::Iterating
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ConvergenceStatus::Converged | ConvergenceStatus::MaxIterationsReached
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_neutral() {
        let s = LoopState::seed(0.0, 20000.0);
        assert_eq!(s.g_sto, 20000.0);
        assert_eq!(s.fo3_d, 1.0);
        assert_eq!(s.fo3_h, 1.0);
        assert_eq!(s.fo3_l, 0.0);
        assert_eq!(s.iterations, 0);
        assert!(s.a_n_limit_factor.is_none());
    }

    #[test]
    fn status_transitions() {
        let seed = LoopState::seed(0.0, 20000.0);
        assert_eq!(ConvergenceStatus::of(&seed, 0.001, 10), ConvergenceStatus::NotStarted);

        let moving = LoopState {
            iterations: 3,
            c_i_diff: 5.0,
            ..seed
        };
        assert_eq!(ConvergenceStatus::of(&moving, 0.001, 10), ConvergenceStatus::Iterating);
        assert!(!ConvergenceStatus::of(&moving, 0.001, 10).is_terminal());

        let capped = LoopState {
            iterations: 10,
            ..moving
        };
        assert_eq!(
            ConvergenceStatus::of(&capped, 0.001, 10),
            ConvergenceStatus::MaxIterationsReached
        );

        let settled = LoopState {
            c_i_diff: 0.0005,
            ..capped
        };
        assert_eq!(ConvergenceStatus::of(&settled, 0.001, 10), ConvergenceStatus::Converged);
        assert!(ConvergenceStatus::of(&settled, 0.001, 10).is_terminal());
    }

    #[test]
    fn limit_factor_serializes_as_rate_label() {
        let json = serde_json::to_string(&LimitingRate::ElectronTransport).unwrap();
        assert_eq!(json, "\"A_j\"");
        assert_eq!(LimitingRate::TriosePhosphate.label(), "A_p");
    }
}
