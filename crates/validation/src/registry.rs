//! Scenario registry.
//!
//! Scenarios register at link time into [`SCENARIOS`] through
//! [`linkme::distributed_slice`]; lookup is by exact name. Nothing is
//! loaded dynamically, so every scenario that can be dispatched is known
//! when the binary is built.
//!
//! # Example Registration
//!
//! ```ignore
//! use minipic_validation::registry::{SCENARIOS, ScenarioDescriptor};
//! use minipic_validation::linkme::distributed_slice;
//!
//! #[distributed_slice(SCENARIOS)]
//! static LASER: ScenarioDescriptor = ScenarioDescriptor {
//!     name: "laser",
//!     summary: "Antenna-driven laser in vacuum",
//!     build: build_laser,
//! };
//! ```

use linkme::distributed_slice;

use crate::scenario::ValidationScenario;

/// Constructor for a scenario, bound to its golden data.
pub type BuildFn = fn() -> Box<dyn ValidationScenario>;

/// Descriptor for a registered scenario
pub struct ScenarioDescriptor {
    /// Name used on the command line (e.g., "thermal_heavy")
    pub name: &'static str,
    /// One-line description
    pub summary: &'static str,
    pub build: BuildFn,
}

/// Distributed slice collecting all scenario registrations.
#[distributed_slice]
pub static SCENARIOS: [ScenarioDescriptor];

/// All registered scenarios, sorted by name.
pub fn all() -> Vec<&'static ScenarioDescriptor> {
    let mut all: Vec<_> = SCENARIOS.iter().collect();
    all.sort_by_key(|d| d.name);
    all
}

/// All registered scenario names, sorted.
pub fn all_names() -> Vec<&'static str> {
    all().into_iter().map(|d| d.name).collect()
}

/// Look up a scenario by name
pub fn get(name: &str) -> Option<&'static ScenarioDescriptor> {
    SCENARIOS.iter().find(|d| d.name == name)
}

/// Check if a scenario name is registered
pub fn is_known(name: &str) -> bool {
    get(name).is_some()
}
