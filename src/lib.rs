pub mod benchmark;
pub mod configuration;
pub mod simulation;
pub mod visualization;

pub use simulation::aggregator::{
    dimensional_constant, dominant_emotion, influence_index, AmbientField, AmbientPreset,
    GlobalAggregates, GlobalAggregator,
};
pub use simulation::engine::Engine;
pub use simulation::forces::{ForceSet, ForceTerm};
pub use simulation::integrator::{advance, step_system};
pub use simulation::layers::{Layer, ParticleSeed, LAYERS, LAYER_COUNT, PARTICLE_SEEDS};
pub use simulation::params::Parameters;
pub use simulation::scalar_field::{
    classify_external_weather, classify_system_state, gamma, n_sphere_volume, Brainwave, Season,
    Weather,
};
pub use simulation::scenario::Scenario;
pub use simulation::states::{Kind, NVec3, Particle, SymbolicType, System};

pub use configuration::script::{
    Keyframe, ParticleOverride, ScenarioScript, Segment, SystemOverrides, Timeline,
};
pub use configuration::toon::{ParseError, Table, Value};

pub use visualization::eddsim_vis3d::run_3d;

pub use benchmark::benchmark::{bench_aggregator, bench_tick};
