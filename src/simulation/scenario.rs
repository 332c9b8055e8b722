//! Build fully-initialized simulation scenarios.
//!
//! `Scenario` is the runtime bundle: engine toggles, numerical parameters,
//! the particle system, the active force set, the aggregator with its trend
//! state, the ambient field, and the script timeline. It is inserted into
//! Bevy as a `Resource` and driven by `integrator::advance` from the render
//! loop (or directly from tests).

use bevy::prelude::Resource;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::configuration::script::{ScenarioScript, SystemOverrides, Timeline, TimelineFiring};
use crate::configuration::toon::ParseError;
use crate::simulation::aggregator::{
    AmbientField, AmbientPreset, GlobalAggregates, GlobalAggregator,
};
use crate::simulation::engine::Engine;
use crate::simulation::forces::{
    BoundarySpring, CentralAttraction, ChargeInteraction, DimensionalCurvature, ForceSet,
    JosephsonCoupling, KinematicDamping, QuantumJitter, ShearCoupling, ShellInteraction,
};
use crate::simulation::params::Parameters;
use crate::simulation::states::System;

/// Bevy resource holding one fully-initialized simulation.
#[derive(Resource)]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: System,
    pub forces: ForceSet,
    pub aggregator: GlobalAggregator,
    pub ambient: AmbientField,
    pub timeline: Timeline,
    /// Last tick's aggregate snapshot; `None` until the first tick ran.
    pub aggregates: Option<GlobalAggregates>,
    pub rng: StdRng,
    /// Narrative text of the most recent segment firing.
    pub narrative: Option<String>,
    /// Active narrative highlight range, if a keyframe marked one.
    pub highlight: Option<(usize, usize)>,
}

impl Scenario {
    /// Build a scenario from an optional script plus engine/parameter
    /// defaults. Script engine toggles override the passed-in engine.
    pub fn build_scenario(
        script: Option<&ScenarioScript>,
        engine: Engine,
        parameters: Parameters,
    ) -> Self {
        let mut engine = engine;
        if let Some(settings) = script.and_then(|s| s.engine.as_ref()) {
            if let Some(v) = settings.charge_force {
                engine.charge_force = v;
            }
            if let Some(v) = settings.coherence {
                engine.coherence = v;
            }
        }

        let mut rng = StdRng::seed_from_u64(parameters.seed);
        let mut system = System::build(&mut rng);
        init_phases(&mut system, &parameters, &mut rng);
        if let Some(overrides) = script.and_then(|s| s.system.as_ref()) {
            apply_system_overrides(&mut system, overrides);
        }

        let forces = build_forces(&engine);
        let timeline = script.map(Timeline::from_script).unwrap_or_default();

        info!(
            "scenario: {} particles, charge_force={}, coherence={}",
            system.particles.len(),
            engine.charge_force,
            engine.coherence
        );

        Self {
            engine,
            parameters,
            system,
            forces,
            aggregator: GlobalAggregator::new(),
            ambient: AmbientField::default(),
            timeline,
            aggregates: None,
            rng,
            narrative: None,
            highlight: None,
        }
    }

    pub fn from_script(script: &ScenarioScript) -> Self {
        Self::build_scenario(Some(script), Engine::default(), Parameters::default())
    }

    pub fn with_defaults() -> Self {
        Self::build_scenario(None, Engine::default(), Parameters::default())
    }

    /// Rebuild the particle population wholesale. Aggregator trend state and
    /// the timeline cursor restart; only the RNG stream carries on.
    pub fn reset(&mut self, overrides: Option<&SystemOverrides>) {
        self.system = System::build(&mut self.rng);
        init_phases(&mut self.system, &self.parameters, &mut self.rng);
        if let Some(o) = overrides {
            apply_system_overrides(&mut self.system, o);
        }
        self.aggregator = GlobalAggregator::new();
        self.aggregates = None;
        self.timeline.rewind();
        self.narrative = None;
        self.highlight = None;
    }

    /// Apply an ambient preset atomically to the physics and display fields.
    pub fn apply_preset(&mut self, preset: AmbientPreset) {
        self.ambient.apply_preset(preset);
    }

    /// Parse a script text in full, then swap it in and reset. A parse
    /// failure returns the error and leaves the running simulation untouched.
    pub fn apply_script(&mut self, text: &str) -> Result<(), ParseError> {
        let script = ScenarioScript::parse(text)?;
        if let Some(settings) = script.engine.as_ref() {
            if let Some(v) = settings.charge_force {
                self.engine.charge_force = v;
            }
            if let Some(v) = settings.coherence {
                self.engine.coherence = v;
            }
        }
        self.forces = build_forces(&self.engine);
        self.timeline = Timeline::from_script(&script);
        self.reset(script.system.as_ref());
        Ok(())
    }

    /// Fire every timeline event due at the current simulation time.
    pub fn fire_due_keyframes(&mut self) {
        if self.timeline.is_empty() {
            return;
        }
        for firing in self.timeline.take_due(self.system.t) {
            self.apply_firing(firing);
        }
    }

    fn apply_firing(&mut self, firing: TimelineFiring) {
        if firing.narrative.is_some() || firing.title.is_some() {
            self.narrative = firing.narrative.or(firing.title);
        }
        if let Some(ambient) = firing.ambient {
            // Halves left unset keep their last displayed value.
            let t = ambient.temperature.unwrap_or(self.ambient.display_t_env);
            let s = ambient.stress.unwrap_or(self.ambient.display_stress);
            self.ambient.set(t, s);
        }
        for o in &firing.overrides {
            match self
                .system
                .particles
                .iter_mut()
                .find(|p| !p.is_core() && p.name == o.name)
            {
                Some(p) => {
                    p.temperature = o.temperature;
                    p.stress = o.stress;
                    p.m_base = o.mass;
                }
                None => warn!("timeline override for unknown particle `{}`", o.name),
            }
        }
        if let Some(h) = firing.highlight {
            self.highlight = Some(h);
        }
    }
}

/// Register the force terms selected by the engine toggles. Registration
/// order is fixed so the jitter RNG stream stays reproducible per engine
/// configuration.
fn build_forces(engine: &Engine) -> ForceSet {
    let mut forces = ForceSet::new()
        .with(CentralAttraction)
        .with(ShellInteraction)
        .with(BoundarySpring)
        .with(DimensionalCurvature)
        .with(ShearCoupling);
    if engine.charge_force {
        forces = forces.with(ChargeInteraction);
    }
    if engine.coherence {
        forces = forces.with(JosephsonCoupling);
    }
    forces.with(QuantumJitter).with(KinematicDamping)
}

/// Seed the coherence phases off a bootstrap aggregation: the freshly-built
/// system's layer-0 stability constant anchors the phase space.
fn init_phases(system: &mut System, parameters: &Parameters, rng: &mut StdRng) {
    let mut boot = GlobalAggregator::new();
    let mut ambient = AmbientField::default();
    let aggs = boot.update(system, &mut ambient, parameters, 0.0);
    let pi0 = aggs.pi_n[0];
    for p in &mut system.particles {
        p.init_coherence_phase(pi0, rng);
    }
}

/// Whole-population reset overrides: the mass override is an inertia offset
/// over the unit base.
fn apply_system_overrides(system: &mut System, o: &SystemOverrides) {
    for p in system.particles.iter_mut().filter(|p| !p.is_core()) {
        if let Some(t) = o.temperature {
            p.temperature = t;
        }
        if let Some(s) = o.stress {
            p.stress = s;
        }
        if let Some(m) = o.mass {
            p.m_base = 1.0 + m;
            p.mass_eff = p.m_base;
        }
    }
}
