//! Core state types for the emotion-particle simulation.
//!
//! Defines the particle entity and the system container:
//! - `Particle` holds thermal/stress/mass state plus motion, tagged
//!   `Regular` or `Core`
//! - `System` holds the full population (core at index 0) and the current
//!   simulation time `t`
//!
//! Construction seeds positions uniformly by angle inside the layer shell and
//! gives each particle a tangential starting velocity with small thermal
//! jitter, reproducibly from the scenario RNG.

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::Rng;

use crate::simulation::layers::{
    Layer, ParticleSeed, DEFAULT_SEED_MASS, DEFAULT_SEED_STRESS, DEFAULT_SEED_TEMPERATURE, LAYERS,
    PARTICLE_SEEDS,
};

pub type NVec3 = Vector3<f64>;

/// Symbolic particle type. Governs attraction bias, equilibrium speed, and
/// information charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolicType {
    Drive,
    Freeze,
    Flow,
}

impl SymbolicType {
    /// Bias multiplier on the adjacent-layer attraction.
    pub fn attraction_bias(self) -> f64 {
        match self {
            SymbolicType::Drive => 1.2,
            SymbolicType::Freeze => 0.8,
            SymbolicType::Flow => 1.0,
        }
    }

    /// Information charge: up-quark-like for drive, down-quark-like for
    /// freeze, neutral for flow.
    pub fn charge(self) -> f64 {
        match self {
            SymbolicType::Drive => 2.0 / 3.0,
            SymbolicType::Freeze => -1.0 / 3.0,
            SymbolicType::Flow => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SymbolicType::Drive => "drive",
            SymbolicType::Freeze => "freeze",
            SymbolicType::Flow => "flow",
        }
    }
}

/// Tagged particle kind. The core shares the particle struct but none of its
/// update logic: its position/velocity stay pinned and its temperature and
/// effective mass are assigned from aggregates each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Core,
    Regular(SymbolicType),
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub name: &'static str,
    pub kind: Kind,
    pub layer: usize,
    pub position: NVec3,
    pub velocity: NVec3,
    pub temperature: f64,
    pub stress: f64,
    /// Constant base mass from the seed table (or a reset override).
    pub m_base: f64,
    /// Effective mass, rederived every tick from stress and the cooling rate.
    pub mass_eff: f64,
    /// Mid-shell anchor radius for the boundary spring.
    pub base_radius: f64,
    pub attraction_bias: f64,
    /// Information charge; only the charge-force model reads it.
    pub charge: f64,
    /// Coherence phase; only the Josephson model reads it.
    pub coherence_phase: f64,
    /// Base mesh color (0xRRGGBB).
    pub color: u32,
}

impl Particle {
    /// Build one regular particle from its seed row.
    pub fn from_seed(seed: &ParticleSeed, rng: &mut StdRng) -> Self {
        let layer: &Layer = &LAYERS[seed.layer];
        let inner = layer.inner_radius();

        // Uniform radius within the shell, angles uniform (not area-uniform,
        // as designed).
        let initial_radius = inner + rng.gen::<f64>() * (layer.radius - inner);
        let theta = rng.gen::<f64>() * std::f64::consts::TAU;
        let phi = rng.gen::<f64>() * std::f64::consts::PI;
        let position = NVec3::new(
            initial_radius * phi.sin() * theta.cos(),
            initial_radius * phi.sin() * theta.sin(),
            initial_radius * phi.cos(),
        );

        // Tangential starting velocity, perpendicular to the radius vector.
        let radial = position.try_normalize(1e-12).unwrap_or_else(NVec3::zeros);
        let tangent = NVec3::new(-radial.y, radial.x, 0.0)
            .try_normalize(1e-12)
            .unwrap_or_else(NVec3::zeros);
        let base_speed = 0.5 + rng.gen::<f64>() * 0.5;

        // Birth jitter keeps the initial thermal field from being perfectly
        // symmetric across resets.
        let temperature = seed.temperature + (rng.gen::<f64>() * 0.1 - 0.05);
        let stress = seed.stress + (rng.gen::<f64>() * 0.05 - 0.025);

        Self {
            name: seed.name,
            kind: Kind::Regular(seed.symbol),
            layer: seed.layer,
            position,
            velocity: tangent * base_speed,
            temperature,
            stress,
            m_base: seed.mass,
            mass_eff: seed.mass,
            base_radius: layer.base_radius(),
            attraction_bias: seed.symbol.attraction_bias(),
            charge: seed.symbol.charge(),
            coherence_phase: 0.0,
            color: seed.color,
        }
    }

    /// Build the core light source: pinned at the origin, zero velocity,
    /// treated as layer 0 for adjacency purposes.
    pub fn new_core() -> Self {
        Self {
            name: "lumen",
            kind: Kind::Core,
            layer: 0,
            position: NVec3::zeros(),
            velocity: NVec3::zeros(),
            temperature: 1.2,
            stress: 0.1,
            m_base: 2.0,
            mass_eff: 2.0,
            base_radius: 0.0,
            attraction_bias: 0.0,
            charge: 0.0,
            coherence_phase: 0.0,
            color: 0xFFFFAA,
        }
    }

    pub fn is_core(&self) -> bool {
        matches!(self.kind, Kind::Core)
    }

    pub fn symbol(&self) -> Option<SymbolicType> {
        match self.kind {
            Kind::Core => None,
            Kind::Regular(s) => Some(s),
        }
    }

    pub fn distance_to_center(&self) -> f64 {
        self.position.norm()
    }

    /// Seed the coherence phase: layer 0 starts almost aligned, outer layers
    /// spread across a phase space defined by the layer-0 stability constant.
    pub fn init_coherence_phase(&mut self, pi_n: f64, rng: &mut StdRng) {
        self.coherence_phase = if self.is_core() {
            0.0
        } else if self.layer == 0 {
            rng.gen::<f64>() * 0.1
        } else {
            rng.gen::<f64>() * 2.0 * pi_n
        };
    }

    /// Emissive brightness derived from the thermal state.
    pub fn emissive_intensity(&self) -> f32 {
        if self.is_core() {
            self.temperature as f32
        } else {
            (0.2 + 0.8 * self.temperature) as f32
        }
    }

    /// Render scale from effective mass and the layer's size factor.
    pub fn render_scale(&self) -> f32 {
        if self.is_core() {
            (1.5 + 0.5 * self.temperature) as f32
        } else {
            let base = 0.4 + 0.2 * self.mass_eff;
            (base * LAYERS[self.layer].scale_factor) as f32
        }
    }
}

/// The full particle population plus simulation time. The core sits at index
/// 0; regular particles follow in roster order, which is also the per-tick
/// update order.
#[derive(Debug, Clone)]
pub struct System {
    pub particles: Vec<Particle>,
    pub t: f64,
}

impl System {
    /// Build the 19-particle population (core first) from the seed roster.
    pub fn build(rng: &mut StdRng) -> Self {
        let mut particles = Vec::with_capacity(PARTICLE_SEEDS.len() + 1);
        particles.push(Particle::new_core());
        for seed in &PARTICLE_SEEDS {
            particles.push(Particle::from_seed(seed, rng));
        }
        Self { particles, t: 0.0 }
    }

    pub fn core(&self) -> &Particle {
        &self.particles[0]
    }

    pub fn core_mut(&mut self) -> &mut Particle {
        &mut self.particles[0]
    }

    /// All non-core particles.
    pub fn regulars(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| !p.is_core())
    }

    /// Non-core particles of one layer.
    pub fn layer_regulars(&self, layer: usize) -> impl Iterator<Item = &Particle> {
        self.particles
            .iter()
            .filter(move |p| !p.is_core() && p.layer == layer)
    }

    /// Seed values (temperature, stress, mass) for a roster name, with the
    /// per-type defaults as fallback for unknown names.
    pub fn seed_for(name: &str) -> (f64, f64, f64) {
        PARTICLE_SEEDS
            .iter()
            .find(|s| s.name == name)
            .map(|s| (s.temperature, s.stress, s.mass))
            .unwrap_or((
                DEFAULT_SEED_TEMPERATURE,
                DEFAULT_SEED_STRESS,
                DEFAULT_SEED_MASS,
            ))
    }
}
