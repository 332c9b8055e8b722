//! High-level runtime engine settings
//!
//! Selects which of the experimental force models are active when building
//! and running a `Scenario`. Both ship disabled; a scenario script can switch
//! them on independently.

#[derive(Debug, Clone)]
pub struct Engine {
    pub charge_force: bool, // information-charge (Coulomb-style) pair force
    pub coherence: bool,    // Josephson phase coupling between layers 0 and 1
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            charge_force: false,
            coherence: false,
        }
    }
}
