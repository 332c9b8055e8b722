//! Cross-layer aggregate statistics, recomputed once per tick.
//!
//! `GlobalAggregator` consumes the current particle population and produces
//! the `GlobalAggregates` snapshot that every particle update reads:
//! per-layer averages, the cumulative system potential, the dimensional
//! constants pi_n / rho_n / Gamma_n, the emergent core mass and source
//! temperature, the internal season/brainwave/weather state, and the
//! dominant emotion. The only state that survives between ticks is the
//! previous outermost-layer average pair, kept for the one-step trend.

use log::debug;

use crate::simulation::layers::{LAYER_COUNT, LAYERS};
use crate::simulation::params::Parameters;
use crate::simulation::scalar_field::{
    classify_external_weather, classify_system_state, n_sphere_volume, Brainwave, Season, Weather,
};
use crate::simulation::states::System;

/// Fixed ambient presets selectable from the UI, each a literal
/// (temperature, stress) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientPreset {
    Joy,
    Anger,
    Sadness,
    Calm,
    None,
}

impl AmbientPreset {
    pub fn field_values(self) -> (f64, f64) {
        match self {
            AmbientPreset::Joy => (0.7, 0.5),
            AmbientPreset::Anger => (0.5, 2.0),
            AmbientPreset::Sadness => (0.4, 0.2),
            AmbientPreset::Calm => (0.6, 0.0),
            AmbientPreset::None => (0.6, 0.0),
        }
    }
}

/// Externally-set ambient field. The physics pair decays; the display pair
/// keeps whatever was last applied so the UI classification stays stable.
#[derive(Debug, Clone)]
pub struct AmbientField {
    pub t_env: f64,
    pub stress: f64,
    pub display_t_env: f64,
    pub display_stress: f64,
}

impl Default for AmbientField {
    fn default() -> Self {
        Self {
            t_env: 0.6,
            stress: 0.0,
            display_t_env: 0.6,
            display_stress: 0.0,
        }
    }
}

impl AmbientField {
    /// Set physics- and display-facing values atomically.
    pub fn set(&mut self, temperature: f64, stress: f64) {
        self.t_env = temperature;
        self.stress = stress;
        self.display_t_env = temperature;
        self.display_stress = stress;
    }

    pub fn apply_preset(&mut self, preset: AmbientPreset) {
        let (t, s) = preset.field_values();
        self.set(t, s);
    }

    /// Decay the physics stress toward zero; the display copy is untouched.
    pub fn decay(&mut self, rate: f64, dt: f64) {
        self.stress = (self.stress * (1.0 - rate * dt)).max(0.0);
    }
}

/// Per-tick aggregate snapshot. Particle updates read this frozen; nothing
/// here outlives the tick.
#[derive(Debug, Clone)]
pub struct GlobalAggregates {
    pub ambient_temperature: f64,
    /// Physics-facing ambient stress after this tick's decay.
    pub ambient_stress: f64,
    /// Weather classified from the decaying physics pair.
    pub external_weather: Weather,
    /// Weather classified from the persistent display pair.
    pub display_weather: Weather,

    pub avg_temp: [f64; LAYER_COUNT],
    pub avg_stress: [f64; LAYER_COUNT],
    /// Per-layer energy: average temperature + average stress.
    pub layer_energy: [f64; LAYER_COUNT],
    /// Cumulative potential B_n: running sums of layer energies.
    pub potential: [f64; LAYER_COUNT],
    /// S_total = core energy + 3 * B_5.
    pub system_potential: f64,

    pub pi_n: [f64; LAYER_COUNT],
    pub rho_n: [f64; LAYER_COUNT],
    pub gamma_n: [f64; LAYER_COUNT],
    pub pi_average: f64,

    /// Emergent core mass from the layer-0 population.
    pub core_mass: f64,
    /// Dynamic source temperature assigned to the core this tick.
    pub source_temperature: f64,

    /// One-step rates of change of the outermost layer's averages.
    pub temp_change_rate: f64,
    pub stress_change_rate: f64,

    pub brainwave: Brainwave,
    pub season: Season,
    pub internal_weather: Weather,

    pub dominant_emotion: Option<&'static str>,
    /// Winning influence index, fed back as the charge-force coupling scale.
    pub max_influence_index: f64,
}

/// Dimensional stability constant for one layer:
/// `(22 E_core + 69 B_n) / (7 E_core + 22 B_n)`, with the bounded fallback
/// when the denominator is exactly zero. (The B_n = 0 case with a live core
/// degenerates to 22/7 by plain arithmetic.)
pub fn dimensional_constant(core_energy: f64, b_n: f64) -> f64 {
    let denominator = 7.0 * core_energy + 22.0 * b_n;
    if denominator == 0.0 {
        69.0 / 22.0
    } else {
        (22.0 * core_energy + 69.0 * b_n) / denominator
    }
}

/// Influence index of one particle against the population mean temperature:
/// relative heat, discounted by stress, weighted by effective mass.
pub fn influence_index(temperature: f64, stress: f64, mass_eff: f64, mean_temp: f64) -> f64 {
    if mean_temp == 0.0 {
        return 0.0;
    }
    (temperature / mean_temp) * (1.0 - stress) * mass_eff
}

/// The regular particle with the highest influence index, with that index.
pub fn dominant_emotion(system: &System) -> (Option<&'static str>, f64) {
    let count = system.regulars().count();
    if count == 0 {
        return (None, 0.0);
    }
    let mean_temp = system.regulars().map(|p| p.temperature).sum::<f64>() / count as f64;

    let mut best: Option<&'static str> = None;
    let mut best_index = f64::NEG_INFINITY;
    for p in system.regulars() {
        let index = influence_index(p.temperature, p.stress, p.mass_eff, mean_temp);
        if index > best_index {
            best_index = index;
            best = Some(p.name);
        }
    }
    (best, best_index)
}

/// Aggregator component. Owns the two trend scalars that persist across
/// ticks; everything else is recomputed from scratch each call.
#[derive(Debug, Clone, Default)]
pub struct GlobalAggregator {
    prev_outer_temp: Option<f64>,
    prev_outer_stress: Option<f64>,
}

impl GlobalAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the per-tick aggregation. Decays the ambient physics stress as a
    /// side effect; must be called exactly once per tick, before any
    /// particle update.
    pub fn update(
        &mut self,
        system: &System,
        ambient: &mut AmbientField,
        params: &Parameters,
        dt: f64,
    ) -> GlobalAggregates {
        // 1. Ambient decay and external weather.
        ambient.decay(params.ambient_stress_decay, dt);
        let external_weather = classify_external_weather(ambient.t_env, ambient.stress);
        let display_weather =
            classify_external_weather(ambient.display_t_env, ambient.display_stress);

        // 2. Per-layer averages over the regular population.
        let mut avg_temp = [params.empty_layer_temp; LAYER_COUNT];
        let mut avg_stress = [params.empty_layer_stress; LAYER_COUNT];
        for i in 0..LAYER_COUNT {
            let mut t_sum = 0.0;
            let mut s_sum = 0.0;
            let mut n = 0usize;
            for p in system.layer_regulars(i) {
                t_sum += p.temperature;
                s_sum += p.stress;
                n += 1;
            }
            if n > 0 {
                avg_temp[i] = t_sum / n as f64;
                avg_stress[i] = s_sum / n as f64;
            }
        }

        // 3. Layer energies, cumulative potential, total system potential.
        let core = system.core();
        let core_energy = core.temperature + core.stress;
        let mut layer_energy = [0.0; LAYER_COUNT];
        let mut potential = [0.0; LAYER_COUNT];
        let mut running = 0.0;
        for i in 0..LAYER_COUNT {
            layer_energy[i] = avg_temp[i] + avg_stress[i];
            running += layer_energy[i];
            potential[i] = running;
        }
        let system_potential = core_energy + 3.0 * potential[LAYER_COUNT - 1];

        // 4. Dimensional constants per layer.
        let mut pi_n = [0.0; LAYER_COUNT];
        let mut rho_n = [0.0; LAYER_COUNT];
        let mut gamma_n = [0.0; LAYER_COUNT];
        for i in 0..LAYER_COUNT {
            pi_n[i] = dimensional_constant(core_energy, potential[i]);
            let n = LAYERS[i].dimension as f64;
            let volume = n_sphere_volume(n, pi_n[i]);
            rho_n[i] = volume / (n * n);
            gamma_n[i] = (1.0 + rho_n[i]).ln();
        }
        let pi_average = pi_n.iter().sum::<f64>() / LAYER_COUNT as f64;

        // 5. Emergent core mass and the dynamic source temperature.
        let mut l0_mass = 0.0;
        let mut l0_stress = 0.0;
        let mut l0_temp = 0.0;
        for p in system.layer_regulars(0) {
            l0_mass += p.mass_eff;
            l0_stress += p.stress;
            l0_temp += p.temperature;
        }
        let core_mass =
            (l0_mass * (1.0 + l0_stress) / (1.0 + l0_temp)).max(params.core_mass_floor);
        let source_temperature = (1.0
            - params.source_response * (system_potential - params.source_potential_ref))
            .clamp(params.source_temp_min, params.source_temp_max);

        // 6. Internal state from the outermost layer plus its trend.
        let outer_temp = avg_temp[LAYER_COUNT - 1];
        let outer_stress = avg_stress[LAYER_COUNT - 1];
        let temp_change_rate = match self.prev_outer_temp {
            Some(prev) if dt > 0.0 => (outer_temp - prev) / dt,
            _ => 0.0,
        };
        let stress_change_rate = match self.prev_outer_stress {
            Some(prev) if dt > 0.0 => (outer_stress - prev) / dt,
            _ => 0.0,
        };
        let (brainwave, season, internal_weather) = classify_system_state(
            outer_temp,
            outer_stress,
            self.prev_outer_temp.unwrap_or(outer_temp),
        );
        self.prev_outer_temp = Some(outer_temp);
        self.prev_outer_stress = Some(outer_stress);

        // 7. Dominant emotion and the influence-index coupling scale.
        let (dominant, max_influence_index) = dominant_emotion(system);

        debug!(
            "aggregates: S={:.3} core_mass={:.3} source_T={:.3} state={}/{}/{}",
            system_potential, core_mass, source_temperature, brainwave, season, internal_weather
        );

        GlobalAggregates {
            ambient_temperature: ambient.t_env,
            ambient_stress: ambient.stress,
            external_weather,
            display_weather,
            avg_temp,
            avg_stress,
            layer_energy,
            potential,
            system_potential,
            pi_n,
            rho_n,
            gamma_n,
            pi_average,
            core_mass,
            source_temperature,
            temp_change_rate,
            stress_change_rate,
            brainwave,
            season,
            internal_weather,
            dominant_emotion: dominant,
            max_influence_index,
        }
    }
}
