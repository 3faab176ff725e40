//! Ewert model numerical constants.
//!
//! Fixed values used by the photosynthesis, conductance and ozone routines.

// -- Gas exchange --

/// Intercellular O2 concentration [mmol/mol].
pub const O_I: f64 = 210.0;

/// Ratio of boundary-layer conductance for H2O to that for CO2 [-].
pub const RATIO_BL_H2O_CO2: f64 = 1.37;

/// Ratio of stomatal conductance for H2O to that for CO2 [-].
pub const RATIO_STO_H2O_CO2: f64 = 1.6;

/// Conductances are carried in umol m-2 s-1; the diffusion equations use mol.
pub const MICRO: f64 = 1e6;

/// Triose-phosphate limited rate as a fraction of V_cmax [-].
pub const A_P_VCMAX_FRACTION: f64 = 0.5;

// -- Ozone --

/// Accumulated uptake is supplied in nmol; gamma_3 is per umol.
pub const NMOL_TO_UMOL: f64 = 1e-3;

// -- Leaf phenology --

/// Emergence period as a fraction of leaf life span [-].
pub const T_LEM_CONSTANT: f64 = 0.15;

/// Senescence period as a fraction of mature leaf life [-].
pub const T_LSE_CONSTANT: f64 = 0.33;

/// Default leaf life span [thermal time].
pub const T_L_DEFAULT: f64 = 800.0;

// -- Convergence loop --

/// Default tolerance on the change in c_i between iterations [ppm].
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// Default iteration cap for the convergence loop.
pub const DEFAULT_MAX_ITERATIONS: u32 = 50;

/// Latest valid hour of day.
pub const MAX_HOUR: u32 = 23;
