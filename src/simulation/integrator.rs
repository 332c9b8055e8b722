//! Per-tick stepping for the emotion-particle system.
//!
//! One tick is: clamp dt -> fire due timeline keyframes -> aggregate ->
//! assign core state -> step every regular particle in array order ->
//! advance time -> refresh the display dominant. Particles are stepped
//! sequentially and each reads already-updated neighbors (explicit
//! Gauss-Seidel order); this ordering is part of the behavioral contract.

use rand::rngs::StdRng;

use crate::simulation::aggregator::{dominant_emotion, GlobalAggregates};
use crate::simulation::engine::Engine;
use crate::simulation::forces::{ForceCtx, ForceSet};
use crate::simulation::params::Parameters;
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{Kind, NVec3, Particle, System};

/// Update one particle's stress, temperature, and effective mass in place.
/// `all` is the live population (earlier indices already stepped this tick);
/// `core` is the frozen core snapshot.
fn update_internal_state(
    p: &mut Particle,
    all: &[Particle],
    core: &Particle,
    engine: &Engine,
    params: &Parameters,
    aggs: &GlobalAggregates,
    dt: f64,
) {
    // Core thermal state is assigned by the driver, never stepped here.
    let Kind::Regular(symbol) = p.kind else {
        return;
    };

    // --- stress ---
    let dist_to_center = p.distance_to_center();
    let boundary_diff = (dist_to_center - p.base_radius).abs();
    let mut stress_increase = 0.0;
    if boundary_diff > params.stress_dead_zone {
        stress_increase += params.stress_boundary_rate * boundary_diff;
    }

    // Release accelerates while the system heats up.
    let release_rate = params.stress_release_base
        * (1.0 + (aggs.temp_change_rate * params.stress_release_heat_gain).max(0.0));
    let stress_released = p.stress * release_rate;

    // Conduction against the core (layer 0) or the next-inner layer's mean.
    let mut stress_transfer = if p.layer == 0 {
        params.stress_conduction * (core.stress - p.stress)
    } else {
        params.stress_conduction * (aggs.avg_stress[p.layer - 1] - p.stress)
    };
    if p.layer == 5 {
        // Outermost layer also exchanges with the ambient field.
        stress_transfer += params.stress_env_conduction * (aggs.ambient_stress - p.stress);
    }

    // No floor here: release can push stress negative by design.
    p.stress += (stress_increase + stress_transfer - stress_released) * dt;

    // Phase mismatch against layer 0 loads layer 1 with extra stress when
    // the coherence model is active.
    if engine.coherence && p.layer == 1 {
        let mut phase_diff = 0.0;
        let mut n = 0usize;
        for other in all {
            if !other.is_core() && other.layer == 0 {
                phase_diff += (p.coherence_phase - other.coherence_phase).abs();
                n += 1;
            }
        }
        if n > 0 {
            phase_diff /= n as f64;
            // sin^2(dphi/2): zero when aligned, maximal at pi.
            let phase_stress = params.phase_stress_gain * (phase_diff / 2.0).sin().powi(2);
            p.stress += phase_stress * dt;
        }
    }

    // --- temperature ---
    let t_ref = if p.layer == 0 {
        aggs.source_temperature
    } else {
        aggs.avg_temp[p.layer - 1]
    };
    let heat_transfer = params.heat_conduction * (t_ref - p.temperature);

    let speed_factor = (params.speed_heat_rate
        * (p.velocity.norm() - params.equilibrium_speed(symbol)))
    .max(0.0);
    let stress_heating = p.stress * params.stress_heat_conversion;
    let radiative_cooling = -params.radiative_cooling * p.temperature.powi(2);

    p.temperature += (speed_factor + stress_heating + radiative_cooling + heat_transfer) * dt;
    p.temperature = p.temperature.max(params.temperature_floor);

    // --- effective mass: heavier while the system is net cooling ---
    let mass_modulator = 1.0 + (-aggs.temp_change_rate * params.mass_cooling_gain).max(0.0);
    p.mass_eff = p.m_base * (1.0 + params.mass_stress_gain * p.stress) * mass_modulator;
}

/// Integrate the accumulated force: semi-implicit Euler with the
/// temperature-bound velocity clamp.
fn integrate_motion(p: &mut Particle, force: NVec3, params: &Parameters, dt: f64) {
    let accel = force / p.mass_eff;
    p.velocity += accel * dt;

    let v_max = params.velocity_clamp_scale * (p.temperature + params.velocity_clamp_offset).sqrt();
    let speed = p.velocity.norm();
    if speed > v_max {
        p.velocity *= v_max / speed;
    }

    p.position += p.velocity * dt;
}

/// Step every regular particle once, in array order. Each particle is copied
/// out, updated against the live slice (already-updated neighbors included),
/// and written back before the next one runs.
pub fn step_system(
    system: &mut System,
    forces: &ForceSet,
    engine: &Engine,
    params: &Parameters,
    aggs: &GlobalAggregates,
    rng: &mut StdRng,
    dt: f64,
) {
    // Core state was assigned by the caller; freeze it for this tick.
    let core_snapshot = system.particles[0].clone();
    let ctx = ForceCtx {
        aggregates: aggs,
        core: &core_snapshot,
        params,
    };

    for i in 0..system.particles.len() {
        if system.particles[i].is_core() {
            continue;
        }
        let mut p = system.particles[i].clone();
        update_internal_state(&mut p, &system.particles, &core_snapshot, engine, params, aggs, dt);
        let force = forces.accumulate(i, &p, &system.particles, &ctx, rng);
        integrate_motion(&mut p, force, params, dt);
        system.particles[i] = p;
    }
}

/// Advance the scenario by one tick of wall-clock time `dt_raw` (clamped to
/// the configured maximum to bound integration error on frame hitches).
///
/// Particle updates always run against the aggregate snapshot produced
/// earlier in the same tick, so the population never steps on stale or
/// missing per-layer arrays.
pub fn advance(scenario: &mut Scenario, dt_raw: f64) {
    let dt = dt_raw.min(scenario.parameters.max_dt);

    // Timeline keyframes fire against the time at tick start.
    scenario.fire_due_keyframes();

    let aggs = scenario.aggregator.update(
        &scenario.system,
        &mut scenario.ambient,
        &scenario.parameters,
        dt,
    );

    // The core never integrates forces: its thermal state and effective mass
    // come straight from the aggregates.
    {
        let params = &scenario.parameters;
        let core = scenario.system.core_mut();
        core.temperature = aggs.source_temperature;
        core.mass_eff = aggs.core_mass;
        core.stress = params.core_base_stress;
        core.coherence_phase = 0.0;
    }

    step_system(
        &mut scenario.system,
        &scenario.forces,
        &scenario.engine,
        &scenario.parameters,
        &aggs,
        &mut scenario.rng,
        dt,
    );
    scenario.system.t += dt;

    // Display values reflect the post-update population.
    let (dominant, _) = dominant_emotion(&scenario.system);
    let mut aggs = aggs;
    aggs.dominant_emotion = dominant;
    scenario.aggregates = Some(aggs);
}
