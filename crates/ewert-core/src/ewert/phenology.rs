/// Leaf phenology: durations of each life stage in thermal time and the
/// age factor derived from them.
use serde::{Deserialize, Serialize};

use super::constants::{T_LEM_CONSTANT, T_LSE_CONSTANT, T_L_DEFAULT};

/// Leaf life-stage durations [thermal time].
///
/// - `t_l`: full leaf life span
/// - `t_lem`: emergence, from sowing until the leaf is fully out
/// - `t_lep`: expanded, fully photosynthetic period
/// - `t_lse`: senescence
/// - `t_lma`: mature leaf life (`t_lep + t_lse`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeafPhenology {
    pub t_l: f64,
    pub t_lem: f64,
    pub t_lep: f64,
    pub t_lse: f64,
    pub t_lma: f64,
}

impl LeafPhenology {
    /// Split a leaf life span into stages using the emergence and
    /// senescence fractions.
    pub fn from_life_span(t_l: f64, t_lem_constant: f64, t_lse_constant: f64) -> Self {
        let t_lem = t_l * t_lem_constant;
        let t_lma = t_l - t_lem;
        let t_lse = t_lma * t_lse_constant;
        let t_lep = t_l - (t_lem + t_lse);
        Self {
            t_l,
            t_lem,
            t_lep,
            t_lse,
            t_lma,
        }
    }

    /// Durations as `(name, value)` pairs, for validation.
    pub(crate) fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("t_l", self.t_l),
            ("t_lem", self.t_lem),
            ("t_lep", self.t_lep),
            ("t_lse", self.t_lse),
            ("t_lma", self.t_lma),
        ]
    }
}

impl Default for LeafPhenology {
    fn default() -> Self {
        Self::from_life_span(T_L_DEFAULT, T_LEM_CONSTANT, T_LSE_CONSTANT)
    }
}

/// Leaf age factor f_LA [0-1].
///
/// Zero before the season starts, rises linearly while the leaf emerges,
/// holds at 1 through the expanded period, falls linearly through
/// senescence and is zero once the leaf is dead.
pub fn age_factor(td_dd: f64, p: &LeafPhenology) -> f64 {
    let senescence_start = p.t_lem + p.t_lep;
    if td_dd < 0.0 {
        0.0
    } else if td_dd < p.t_lem {
        td_dd / p.t_lem
    } else if td_dd < senescence_start {
        1.0
    } else if td_dd < senescence_start + p.t_lse {
        1.0 - (td_dd - senescence_start) / p.t_lse
    } else {
        0.0
    }
}

/// Fraction of the senescence period elapsed [0-1].
pub fn senescence_progress(td_dd: f64, p: &LeafPhenology) -> f64 {
    let elapsed = td_dd - (p.t_lem + p.t_lep);
    if elapsed <= 0.0 {
        0.0
    } else if p.t_lse <= 0.0 || elapsed >= p.t_lse {
        1.0
    } else {
        elapsed / p.t_lse
    }
}
