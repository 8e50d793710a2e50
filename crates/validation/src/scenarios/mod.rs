//! Registered scenarios. Each module registers itself into
//! [`SCENARIOS`](crate::registry::SCENARIOS).

pub mod thermal_heavy;

pub use thermal_heavy::ThermalHeavy;
