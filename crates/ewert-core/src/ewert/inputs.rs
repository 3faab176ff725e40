/// Inputs that stay constant through one convergence loop.
///
/// Environmental and physiological values for a single leaf and timestep.
/// Serialized names follow the usual symbols of the model (`D_0`, `V_cmax`,
/// `fO3_d_prev`, ...).
use serde::{Deserialize, Serialize};

use super::constants::MAX_HOUR;
use super::options::{HumidityMode, ModelOptions};
use super::phenology::LeafPhenology;
use crate::error::{EwertError, EwertResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantInputs {
    /// Ambient CO2 concentration [ppm]
    pub c_a: f64,
    /// Ambient vapour pressure [Pa]
    pub e_a: f64,
    /// Boundary layer conductance to H2O [umol m-2 s-1]
    pub g_bl: f64,
    /// Conductance with closed stomata [umol m-2 s-1]
    pub g_sto_0: f64,
    /// Species-specific sensitivity to A_n [-]
    pub m: f64,
    /// VPD at which g_sto is halved [Pa]
    #[serde(rename = "D_0")]
    pub d_0: f64,

    /// Ozone uptake this hour [nmol m-2 s-1]
    #[serde(rename = "O3up")]
    pub o3up: f64,
    /// Accumulated ozone uptake [nmol m-2]
    #[serde(rename = "O3up_acc")]
    pub o3up_acc: f64,
    /// Cumulative ozone factor from the previous hour [0-1]
    #[serde(rename = "fO3_d_prev")]
    pub fo3_d_prev: f64,
    /// Thermal time since season start [thermal time]
    pub td_dd: f64,
    /// Short-term damage threshold coefficient [-]
    pub gamma_1: f64,
    /// Short-term damage slope coefficient [per nmol]
    pub gamma_2: f64,
    /// Long-term damage coefficient [per umol]
    pub gamma_3: f64,
    pub is_daylight: bool,

    /// Senescence period as a fraction of mature life [0-1]
    pub t_lse_constant: f64,
    #[serde(flatten)]
    pub phenology: LeafPhenology,

    /// CO2 compensation point [umol/mol]
    #[serde(rename = "Gamma")]
    pub gamma: f64,
    /// CO2 compensation point without day respiration [umol/mol]
    #[serde(rename = "Gamma_star")]
    pub gamma_star: f64,
    /// Maximum Rubisco carboxylation rate [umol m-2 s-1]
    #[serde(rename = "V_cmax")]
    pub v_cmax: f64,
    /// Michaelis constant for CO2 [umol/mol]
    #[serde(rename = "K_C")]
    pub k_c: f64,
    /// Michaelis constant for O2 [mmol/mol]
    #[serde(rename = "K_O")]
    pub k_o: f64,
    /// Electron transport rate [umol m-2 s-1]
    #[serde(rename = "J")]
    pub j: f64,
    /// Day respiration [umol m-2 s-1]
    #[serde(rename = "R_d")]
    pub r_d: f64,
    /// Internal saturation vapour pressure [Pa]
    pub e_sat_i: f64,
    /// Hour of day [0-23]
    pub hr: u32,
    /// Soil water factor [0-1]
    #[serde(rename = "f_SW")]
    pub f_sw: f64,
    /// Pre-computed humidity factor, required with `HumidityMode::ExternallySupplied`.
    #[serde(rename = "f_VPD", default, skip_serializing_if = "Option::is_none")]
    pub f_vpd: Option<f64>,
}

impl ConstantInputs {
    /// Check every value against its physical bounds.
    ///
    /// Validates:
    /// - concentrations, rates and durations are finite and non-negative
    /// - `g_bl` and `K_O` are strictly positive, as is `D_0` when humidity is computed
    /// - fractions lie in [0, 1]
    /// - `hr` is in [0, 23]
    /// - `f_VPD` is present when supplied externally
    pub fn validate(&self, options: &ModelOptions) -> EwertResult<()> {
        let non_negative = [
            ("c_a", self.c_a),
            ("e_a", self.e_a),
            ("g_sto_0", self.g_sto_0),
            ("m", self.m),
            ("D_0", self.d_0),
            ("O3up", self.o3up),
            ("O3up_acc", self.o3up_acc),
            ("gamma_1", self.gamma_1),
            ("gamma_2", self.gamma_2),
            ("gamma_3", self.gamma_3),
            ("Gamma", self.gamma),
            ("Gamma_star", self.gamma_star),
            ("V_cmax", self.v_cmax),
            ("K_C", self.k_c),
            ("J", self.j),
            ("R_d", self.r_d),
            ("e_sat_i", self.e_sat_i),
        ];
        for (field, value) in non_negative.into_iter().chain(self.phenology.named()) {
            if !value.is_finite() {
                return Err(EwertError::invalid(field, value, "must be finite"));
            }
            if value < 0.0 {
                return Err(EwertError::invalid(field, value, "must be non-negative"));
            }
        }

        if !(self.g_bl > 0.0 && self.g_bl.is_finite()) {
            return Err(EwertError::invalid("g_bl", self.g_bl, "must be > 0"));
        }
        if !(self.k_o > 0.0 && self.k_o.is_finite()) {
            return Err(EwertError::invalid("K_O", self.k_o, "must be > 0"));
        }

        let fractions = [
            ("fO3_d_prev", self.fo3_d_prev),
            ("f_SW", self.f_sw),
            ("t_lse_constant", self.t_lse_constant),
        ];
        for (field, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(EwertError::invalid(field, value, "must be in [0, 1]"));
            }
        }

        if !self.td_dd.is_finite() {
            return Err(EwertError::invalid("td_dd", self.td_dd, "must be finite"));
        }
        if self.hr > MAX_HOUR {
            return Err(EwertError::invalid("hr", self.hr as f64, "must be in [0, 23]"));
        }

        match options.humidity_mode {
            HumidityMode::Computed => {
                if self.d_0 <= 0.0 {
                    return Err(EwertError::invalid("D_0", self.d_0, "must be > 0"));
                }
            }
            HumidityMode::ExternallySupplied => match self.f_vpd {
                Some(f) if (0.0..=1.0).contains(&f) => {}
                Some(f) => return Err(EwertError::invalid("f_VPD", f, "must be in [0, 1]")),
                None => {
                    return Err(EwertError::invalid(
                        "f_VPD",
                        f64::NAN,
                        "required when humidity is externally supplied",
                    ))
                }
            },
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constants() -> ConstantInputs {
        ConstantInputs {
            c_a: 391.0,
            e_a: 1000.0,
            g_bl: 1469999.0,
            g_sto_0: 20000.0,
            m: 8.12,
            d_0: 2270.0,
            o3up: 21.0,
            o3up_acc: 300.0,
            fo3_d_prev: 0.89,
            td_dd: 24.1,
            gamma_1: 0.06,
            gamma_2: 0.0045,
            gamma_3: 0.5,
            is_daylight: true,
            t_lse_constant: 0.33,
            phenology: LeafPhenology::default(),
            gamma: 34.277,
            gamma_star: 32.95,
            v_cmax: 119.0,
            k_c: 234.42,
            k_o: 216.75,
            j: 300.36,
            r_d: 0.32,
            e_sat_i: 2339.05,
            hr: 12,
            f_sw: 1.0,
            f_vpd: Some(1.0),
        }
    }

    fn field_of(result: EwertResult<()>) -> &'static str {
        match result {
            Err(EwertError::InvalidInput { field, .. }) => field,
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn valid_constants() {
        assert!(constants().validate(&ModelOptions::default()).is_ok());
    }

    #[test]
    fn rejects_negative_concentration() {
        let c = ConstantInputs {
            c_a: -1.0,
            ..constants()
        };
        assert_eq!(field_of(c.validate(&ModelOptions::default())), "c_a");
    }

    #[test]
    fn rejects_nan_rate() {
        let c = ConstantInputs {
            v_cmax: f64::NAN,
            ..constants()
        };
        assert_eq!(field_of(c.validate(&ModelOptions::default())), "V_cmax");
    }

    #[test]
    fn rejects_zero_boundary_layer_conductance() {
        let c = ConstantInputs {
            g_bl: 0.0,
            ..constants()
        };
        assert_eq!(field_of(c.validate(&ModelOptions::default())), "g_bl");
    }

    #[test]
    fn rejects_hour_out_of_range() {
        let c = ConstantInputs {
            hr: 24,
            ..constants()
        };
        assert_eq!(field_of(c.validate(&ModelOptions::default())), "hr");
    }

    #[test]
    fn rejects_negative_duration() {
        let mut c = constants();
        c.phenology.t_lse = -5.0;
        assert_eq!(field_of(c.validate(&ModelOptions::default())), "t_lse");
    }

    #[test]
    fn rejects_fraction_above_one() {
        let c = ConstantInputs {
            fo3_d_prev: 1.2,
            ..constants()
        };
        assert_eq!(field_of(c.validate(&ModelOptions::default())), "fO3_d_prev");
    }

    #[test]
    fn computed_humidity_needs_positive_d0() {
        let c = ConstantInputs {
            d_0: 0.0,
            ..constants()
        };
        assert_eq!(field_of(c.validate(&ModelOptions::default())), "D_0");

        let external = ModelOptions {
            humidity_mode: HumidityMode::ExternallySupplied,
            ..ModelOptions::default()
        };
        assert!(c.validate(&external).is_ok());
    }

    #[test]
    fn external_humidity_requires_value() {
        let external = ModelOptions {
            humidity_mode: HumidityMode::ExternallySupplied,
            ..ModelOptions::default()
        };
        let c = ConstantInputs {
            f_vpd: None,
            ..constants()
        };
        assert_eq!(field_of(c.validate(&external)), "f_VPD");

        let c = ConstantInputs {
            f_vpd: Some(1.5),
            ..constants()
        };
        assert_eq!(field_of(c.validate(&external)), "f_VPD");
    }

    #[test]
    fn deserializes_model_symbols() {
        let json = serde_json::to_string(&constants()).unwrap();
        assert!(json.contains("\"V_cmax\""));
        assert!(json.contains("\"fO3_d_prev\""));
        assert!(json.contains("\"t_lem\""));
        let back: ConstantInputs = serde_json::from_str(&json).unwrap();
        assert_eq!(back, constants());
    }
}
