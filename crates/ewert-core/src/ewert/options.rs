/// Ewert model options.
///
/// Set once per simulation run and never changed inside the convergence loop.
use serde::{Deserialize, Serialize};

/// Source of the humidity (VPD) factor on conductance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HumidityMode {
    /// Leuning humidity response from D_0 and the leaf-to-air VPD.
    #[default]
    Computed,
    /// Use `ConstantInputs::f_vpd` unchanged.
    ExternallySupplied,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    /// Recover from ozone damage every non-daylight hour, not only at midnight.
    pub full_night_recovery: bool,
    /// Apply hourly, cumulative and long-term ozone damage.
    pub ozone_damage: bool,
    pub humidity_mode: HumidityMode,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            full_night_recovery: false,
            ozone_damage: true,
            humidity_mode: HumidityMode::Computed,
        }
    }
}

impl ModelOptions {
    pub fn new(full_night_recovery: bool, ozone_damage: bool, humidity_mode: HumidityMode) -> Self {
        Self {
            full_night_recovery,
            ozone_damage,
            humidity_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_ozone_and_compute_humidity() {
        let o = ModelOptions::default();
        assert!(!o.full_night_recovery);
        assert!(o.ozone_damage);
        assert_eq!(o.humidity_mode, HumidityMode::Computed);
    }

    #[test]
    fn deserializes_partial_json_with_defaults() {
        let o: ModelOptions =
            serde_json::from_str(r#"{"humidity_mode": "externally_supplied"}"#).unwrap();
        assert_eq!(o.humidity_mode, HumidityMode::ExternallySupplied);
        assert!(o.ozone_damage);
    }
}
