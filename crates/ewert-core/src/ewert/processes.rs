/// Ewert photosynthesis and conductance process functions.
///
/// Pure functions for each step of one iteration. All inputs and outputs
/// are f64; the solver checks results for NaN/Inf.
use super::constants::{A_P_VCMAX_FRACTION, MICRO, O_I, RATIO_BL_H2O_CO2, RATIO_STO_H2O_CO2};
use super::state::LimitingRate;

/// Leuning humidity response f_VPD [0-1].
///
/// A saturated leaf-to-air gradient (e_a >= e_sat_i) gives 1.
pub fn humidity_factor(d_0: f64, e_a: f64, e_sat_i: f64) -> f64 {
    let vpd = (e_sat_i - e_a).max(0.0);
    (1.0 / (1.0 + vpd / d_0)).clamp(0.0, 1.0)
}

/// Rubisco-activity limited rate A_c [umol m-2 s-1].
///
/// `damage` scales V_cmax (fO3_d * f_LS).
pub fn rubisco_limited_rate(
    c_i: f64,
    v_cmax: f64,
    k_c: f64,
    k_o: f64,
    gamma: f64,
    damage: f64,
) -> f64 {
    damage * v_cmax * (c_i - gamma) / (c_i + k_c * (1.0 + O_I / k_o))
}

/// RuBP-regeneration (electron transport) limited rate A_j [umol m-2 s-1].
pub fn electron_transport_limited_rate(c_i: f64, j: f64, gamma: f64, gamma_star: f64) -> f64 {
    j * (c_i - gamma) / (4.0 * (c_i + 2.0 * gamma_star))
}

/// Triose-phosphate-utilisation limited rate A_p [umol m-2 s-1].
pub fn triose_phosphate_limited_rate(v_cmax: f64, f_la: f64, f_ls: f64) -> f64 {
    A_P_VCMAX_FRACTION * v_cmax * f_la * f_ls
}

/// Net assimilation from the three candidate rates.
///
/// The smallest rate limits; ties go to A_c, then A_j. The result is never
/// below -R_d. Returns (A_n, limiting rate).
pub fn net_assimilation(a_c: f64, a_j: f64, a_p: f64, r_d: f64) -> (f64, LimitingRate) {
    let (gross, limit) = if a_c <= a_j && a_c <= a_p {
        (a_c, LimitingRate::Rubisco)
    } else if a_j <= a_p {
        (a_j, LimitingRate::ElectronTransport)
    } else {
        (a_p, LimitingRate::TriosePhosphate)
    };
    ((gross - r_d).max(-r_d), limit)
}

/// CO2 concentration at the leaf surface [ppm], after the boundary layer.
pub fn surface_co2(c_a: f64, a_n: f64, g_bl: f64) -> f64 {
    c_a - a_n * RATIO_BL_H2O_CO2 * MICRO / g_bl
}

/// Stomatal conductance [umol m-2 s-1] from the Ball-Berry/Leuning relation.
///
/// Unbounded: may fall below g_sto_0 or be NaN when c_s equals Gamma.
/// Check it, then apply [`bounded_conductance`].
pub fn stomatal_conductance(
    g_sto_0: f64,
    m: f64,
    a_n: f64,
    f_sw: f64,
    f_vpd: f64,
    c_s: f64,
    gamma: f64,
) -> f64 {
    g_sto_0 + MICRO * m * a_n * f_sw * f_vpd / (c_s - gamma)
}

/// Conductance never drops below the closed-stomata value.
pub fn bounded_conductance(g_sto: f64, g_sto_0: f64) -> f64 {
    g_sto.max(g_sto_0)
}

/// Internal CO2 concentration [ppm] from diffusion through the stomata.
///
/// Unbounded: NaN or infinite with zero conductance. Check it, then apply
/// [`bounded_internal_co2`].
pub fn internal_co2(c_s: f64, a_n: f64, g_sto: f64) -> f64 {
    c_s - a_n * RATIO_STO_H2O_CO2 * MICRO / g_sto
}

/// Demand beyond what the stomata can supply empties the intercellular
/// space; c_i never goes negative.
pub fn bounded_internal_co2(c_i: f64) -> f64 {
    c_i.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() < tol,
            "expected {expected} ± {tol}, got {actual}"
        );
    }

    // -- humidity --

    #[test]
    fn humidity_halves_at_d0() {
        assert_approx(humidity_factor(2270.0, 0.0, 2270.0), 0.5, 1e-12);
    }

    #[test]
    fn humidity_full_when_saturated() {
        assert_eq!(humidity_factor(2270.0, 2500.0, 2339.05), 1.0);
    }

    #[test]
    fn humidity_decreases_with_vpd() {
        let dry = humidity_factor(2270.0, 500.0, 2339.05);
        let humid = humidity_factor(2270.0, 2000.0, 2339.05);
        assert!(dry < humid);
        assert!((0.0..=1.0).contains(&dry));
    }

    // -- assimilation rates --

    #[test]
    fn rubisco_rate_zero_at_compensation_point() {
        assert_approx(rubisco_limited_rate(34.277, 119.0, 234.42, 216.75, 34.277, 1.0), 0.0, 1e-12);
    }

    #[test]
    fn rubisco_rate_scales_with_damage() {
        let full = rubisco_limited_rate(300.0, 119.0, 234.42, 216.75, 34.277, 1.0);
        let damaged = rubisco_limited_rate(300.0, 119.0, 234.42, 216.75, 34.277, 0.5);
        assert!(full > 0.0);
        assert_approx(damaged, full * 0.5, 1e-12);
    }

    #[test]
    fn electron_transport_rate_increases_with_c_i() {
        let low = electron_transport_limited_rate(100.0, 300.36, 34.277, 32.95);
        let high = electron_transport_limited_rate(300.0, 300.36, 34.277, 32.95);
        assert!(high > low);
        assert!(high < 300.36 / 4.0);
    }

    #[test]
    fn triose_phosphate_rate_is_half_vcmax() {
        assert_approx(triose_phosphate_limited_rate(119.0, 1.0, 1.0), 59.5, 1e-12);
        assert_approx(triose_phosphate_limited_rate(119.0, 0.5, 1.0), 29.75, 1e-12);
    }

    // -- net assimilation --

    #[test]
    fn net_assimilation_takes_minimum() {
        let (a_n, limit) = net_assimilation(30.0, 20.0, 40.0, 0.32);
        assert_approx(a_n, 19.68, 1e-12);
        assert_eq!(limit, LimitingRate::ElectronTransport);

        let (_, limit) = net_assimilation(30.0, 50.0, 10.0, 0.32);
        assert_eq!(limit, LimitingRate::TriosePhosphate);
    }

    #[test]
    fn net_assimilation_respiration_floor() {
        let (a_n, limit) = net_assimilation(-7.6, -2.0, 11.9, 0.32);
        assert_eq!(a_n, -0.32);
        assert_eq!(limit, LimitingRate::Rubisco);
    }

    #[test]
    fn net_assimilation_ties_prefer_rubisco() {
        let (_, limit) = net_assimilation(10.0, 10.0, 10.0, 0.0);
        assert_eq!(limit, LimitingRate::Rubisco);
    }

    // -- diffusion --

    #[test]
    fn surface_co2_drawn_down_by_assimilation() {
        assert!(surface_co2(391.0, 10.0, 1469999.0) < 391.0);
        assert_eq!(surface_co2(391.0, 0.0, 1469999.0), 391.0);
    }

    #[test]
    fn conductance_never_below_minimum() {
        let respiring = stomatal_conductance(20000.0, 8.12, -0.32, 1.0, 1.0, 391.0, 34.277);
        assert!(respiring < 20000.0);
        assert_eq!(bounded_conductance(respiring, 20000.0), 20000.0);
        assert!(stomatal_conductance(20000.0, 8.12, 20.0, 1.0, 1.0, 380.0, 34.277) > 20000.0);
    }

    #[test]
    fn conductance_closes_with_dry_soil() {
        let wet = stomatal_conductance(20000.0, 8.12, 20.0, 1.0, 1.0, 380.0, 34.277);
        let dry = stomatal_conductance(20000.0, 8.12, 20.0, 0.0, 1.0, 380.0, 34.277);
        assert!(dry < wet);
        assert_eq!(dry, 20000.0);
    }

    #[test]
    fn conductance_at_compensation_point_is_nan() {
        let g_sto = stomatal_conductance(20000.0, 8.12, 0.0, 1.0, 1.0, 34.277, 34.277);
        assert!(g_sto.is_nan());
    }

    #[test]
    fn internal_co2_below_surface_when_assimilating() {
        let c_i = internal_co2(380.0, 20.0, 200000.0);
        assert_approx(c_i, 380.0 - 20.0 * 1.6 * 1e6 / 200000.0, 1e-9);
        assert!(internal_co2(391.0, -0.32, 20000.0) > 391.0);
    }

    #[test]
    fn internal_co2_never_negative() {
        let c_i = internal_co2(380.0, 50.0, 20000.0);
        assert!(c_i < 0.0);
        assert_eq!(bounded_internal_co2(c_i), 0.0);
    }

    #[test]
    fn internal_co2_with_closed_stomata_is_not_finite() {
        assert!(internal_co2(391.0, 0.0, 0.0).is_nan());
        assert_eq!(internal_co2(391.0, -0.32, 0.0), f64::INFINITY);
    }
}
