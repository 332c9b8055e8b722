//! Numerical parameters for the simulation.
//!
//! `Parameters` gathers every force coefficient, threshold, floor, and decay
//! rate as a named field so nothing hides as an inline literal in the update
//! path. Defaults carry the shipped tuning.

use crate::simulation::states::SymbolicType;

#[derive(Debug, Clone)]
pub struct Parameters {
    // --- stress dynamics ---
    pub stress_boundary_rate: f64,     // stress gained per unit of shell deviation
    pub stress_dead_zone: f64,         // deviation tolerated before stress builds
    pub stress_conduction: f64,        // inter-layer stress exchange coefficient
    pub stress_env_conduction: f64,    // layer 5 <-> ambient stress exchange
    pub stress_release_base: f64,      // baseline exponential stress release rate
    pub stress_release_heat_gain: f64, // release amplification per heating rate
    pub phase_stress_gain: f64,        // layer-1 phase-mismatch stress (coherence model)

    // --- thermal dynamics ---
    pub heat_conduction: f64,          // inter-layer heat exchange coefficient
    pub speed_heat_rate: f64,          // heating per unit of excess speed
    pub eq_speed_drive: f64,           // equilibrium speed, drive particles
    pub eq_speed_flow: f64,            // equilibrium speed, flow particles
    pub eq_speed_freeze: f64,          // equilibrium speed, freeze particles
    pub stress_heat_conversion: f64,   // stress-to-heat coefficient
    pub radiative_cooling: f64,        // cooling proportional to T^2
    pub temperature_floor: f64,        // hard lower bound on particle temperature

    // --- effective mass ---
    pub mass_stress_gain: f64,         // massEff gain per unit of stress
    pub mass_cooling_gain: f64,        // inertia gain while the system cools

    // --- forces ---
    pub central_gravity: f64,          // emergent gravity base coefficient
    pub core_mass_boost: f64,          // core mass multiplier in the central pull
    pub min_pair_distance: f64,        // below this, pairwise terms are skipped
    pub em_coupling_scale: f64,        // K_EM = scale * max influence index
    pub em_stress_mod: f64,            // stress modulation factor k_s
    pub em_temp_empathy: f64,          // temperature-similarity decay beta
    pub em_range_min_sq: f64,          // charge force active range (squared), low
    pub em_range_max_sq: f64,          // charge force active range (squared), high
    pub repulsion_strength: f64,       // same-layer 1/d^3 repulsion
    pub repulsion_range: f64,          // same-layer repulsion cutoff
    pub attraction_strength: f64,      // adjacent-layer 1/d^2 attraction
    pub attraction_range: f64,         // adjacent-layer attraction cutoff
    pub boundary_spring: f64,          // spring constant, divided by layer dimension
    pub curvature_omega: f64,          // ideal angular speed at layer 0
    pub curvature_decay: f64,          // per-layer exponential decay of omega
    pub curvature_alpha: f64,          // curvature coupling base strength
    pub curvature_layer_damp: f64,     // per-layer coupling falloff
    pub potential_ref: f64,            // reference potential for the curvature modulator
    pub potential_response: f64,       // modulator gain below the reference
    pub shear_strength: f64,           // layer 2/4 velocity drag toward the outer shell
    pub josephson_energy: f64,         // E_J coupling energy
    pub josephson_range_sq: f64,       // coherence force active range (squared)
    pub jitter_scale: f64,             // stochastic jitter numerator
    pub gamma_floor: f64,              // lower clamp on Gamma_n in the jitter divisor
    pub damping: f64,                  // kinematic damping coefficient

    // --- integration ---
    pub velocity_clamp_scale: f64,     // |v| <= scale * sqrt(T + offset)
    pub velocity_clamp_offset: f64,
    pub max_dt: f64,                   // wall-clock dt clamp per tick

    // --- aggregates and the core ---
    pub ambient_stress_decay: f64,     // external stress decay rate per second
    pub source_response: f64,          // source temperature response to potential
    pub source_potential_ref: f64,     // potential at which the source sits at 1.0
    pub source_temp_min: f64,
    pub source_temp_max: f64,
    pub core_base_stress: f64,         // constant source stress
    pub core_mass_floor: f64,          // lower bound on the emergent core mass
    pub empty_layer_temp: f64,         // per-layer average defaults when empty
    pub empty_layer_stress: f64,

    /// Seed for particle placement and the stochastic jitter stream.
    pub seed: u64,
}

impl Parameters {
    /// Per-type equilibrium speed for the motion-heating term.
    pub fn equilibrium_speed(&self, symbol: SymbolicType) -> f64 {
        match symbol {
            SymbolicType::Drive => self.eq_speed_drive,
            SymbolicType::Flow => self.eq_speed_flow,
            SymbolicType::Freeze => self.eq_speed_freeze,
        }
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            stress_boundary_rate: 0.008,
            stress_dead_zone: 2.0,
            stress_conduction: 0.008,
            stress_env_conduction: 0.005,
            stress_release_base: 0.05,
            stress_release_heat_gain: 5.0,
            phase_stress_gain: 0.1,

            heat_conduction: 0.08,
            speed_heat_rate: 0.01,
            eq_speed_drive: 0.8,
            eq_speed_flow: 0.9,
            eq_speed_freeze: 1.05,
            stress_heat_conversion: 0.08,
            radiative_cooling: 0.06,
            temperature_floor: 0.1,

            mass_stress_gain: 0.1,
            mass_cooling_gain: 10.0,

            central_gravity: 0.20,
            core_mass_boost: 1.2,
            min_pair_distance: 0.1,
            em_coupling_scale: 0.5,
            em_stress_mod: 0.5,
            em_temp_empathy: 1.5,
            em_range_min_sq: 0.01,
            em_range_max_sq: 100.0,
            repulsion_strength: 20.0,
            repulsion_range: 4.0,
            attraction_strength: 0.3,
            attraction_range: 8.0,
            boundary_spring: 5.0,
            curvature_omega: 2.8,
            curvature_decay: 0.65,
            curvature_alpha: 1.3,
            curvature_layer_damp: 0.7,
            potential_ref: 0.5,
            potential_response: 3.0,
            shear_strength: 0.1,
            josephson_energy: 1.0,
            josephson_range_sq: 225.0,
            jitter_scale: 0.055,
            gamma_floor: 0.001,
            damping: 0.2,

            velocity_clamp_scale: 1.35,
            velocity_clamp_offset: 0.05,
            max_dt: 0.1,

            ambient_stress_decay: 2.5,
            source_response: 0.05,
            source_potential_ref: 18.0,
            source_temp_min: 0.1,
            source_temp_max: 1.5,
            core_base_stress: 0.1,
            core_mass_floor: 0.1,
            empty_layer_temp: 0.5,
            empty_layer_stress: 0.1,

            seed: 42,
        }
    }
}
