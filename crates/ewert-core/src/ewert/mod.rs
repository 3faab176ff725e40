/// Ewert: leaf CO2 assimilation and stomatal conductance.
///
/// Iterates internal CO2, conductance and the Rubisco / electron transport /
/// triose phosphate limited rates to a fixed point, with optional ozone
/// damage (Ewert & Porter 2000).
pub mod batch;
pub mod constants;
pub mod inputs;
pub mod options;
pub mod ozone;
pub mod phenology;
pub mod processes;
pub mod run;
pub mod state;
