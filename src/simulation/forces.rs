//! Force contributors for the emotion-particle dynamics.
//!
//! Each term implements [`ForceTerm`] and their contributions are summed by
//! [`ForceSet`] into a single force vector per particle. The scenario builder
//! registers terms conditionally, so the experimental models (information
//! charge, Josephson coherence) only cost anything when enabled.
//!
//! Pairwise terms read the live particle slice: earlier particles in the
//! update order have already moved this tick. That sequential coupling is
//! part of the behavioral contract, not an accident.

use rand::rngs::StdRng;
use rand::Rng;

use crate::simulation::aggregator::GlobalAggregates;
use crate::simulation::layers::LAYERS;
use crate::simulation::params::Parameters;
use crate::simulation::states::{NVec3, Particle};

/// Shared read-only context for one particle step: the tick's frozen
/// aggregates, the core snapshot taken after its assignment, and the
/// parameter set.
pub struct ForceCtx<'a> {
    pub aggregates: &'a GlobalAggregates,
    pub core: &'a Particle,
    pub params: &'a Parameters,
}

/// Trait for force sources acting on a single particle.
/// Implementations return their contribution for particle `index`.
pub trait ForceTerm {
    fn force(
        &self,
        index: usize,
        p: &Particle,
        all: &[Particle],
        ctx: &ForceCtx<'_>,
        rng: &mut StdRng,
    ) -> NVec3;
}

/// Collection of force terms whose contributions are summed per particle.
pub struct ForceSet {
    terms: Vec<Box<dyn ForceTerm + Send + Sync>>,
}

impl ForceSet {
    /// Create an empty force set.
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add a force term.
    pub fn with(mut self, term: impl ForceTerm + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    /// Total force on particle `index` from all registered terms.
    pub fn accumulate(
        &self,
        index: usize,
        p: &Particle,
        all: &[Particle],
        ctx: &ForceCtx<'_>,
        rng: &mut StdRng,
    ) -> NVec3 {
        let mut total = NVec3::zeros();
        for term in &self.terms {
            total += term.force(index, p, all, ctx, rng);
        }
        total
    }
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Magnitude of the central pull on `p`: inverse-distance (not
/// inverse-square) emergent gravity scaled by the layer coupling Gamma_n and
/// the core's effective mass. Zero inside the degenerate radius.
///
/// Shared between [`CentralAttraction`] and [`BoundarySpring`], which
/// subtracts half of it to avoid double-counting the outward pull.
pub fn central_force_magnitude(p: &Particle, ctx: &ForceCtx<'_>) -> f64 {
    let g_eff = ctx.params.central_gravity * ctx.aggregates.gamma_n[p.layer];
    let dist = (ctx.core.position - p.position).norm();
    if dist > ctx.params.min_pair_distance {
        g_eff * ctx.core.mass_eff * ctx.params.core_mass_boost / dist
    } else {
        0.0
    }
}

/// Central attraction toward the core (emergent gravity, 1/r law).
pub struct CentralAttraction;

impl ForceTerm for CentralAttraction {
    fn force(
        &self,
        _index: usize,
        p: &Particle,
        _all: &[Particle],
        ctx: &ForceCtx<'_>,
        _rng: &mut StdRng,
    ) -> NVec3 {
        let to_core = ctx.core.position - p.position;
        let dist = to_core.norm();
        if dist <= ctx.params.min_pair_distance {
            return NVec3::zeros();
        }
        (to_core / dist) * central_force_magnitude(p, ctx)
    }
}

/// Coulomb-style pair force between charged (drive/freeze) particles,
/// modulated by mutual stress and temperature similarity. The coupling
/// constant tracks the dominant particle's influence index.
pub struct ChargeInteraction;

impl ForceTerm for ChargeInteraction {
    fn force(
        &self,
        index: usize,
        p: &Particle,
        all: &[Particle],
        ctx: &ForceCtx<'_>,
        _rng: &mut StdRng,
    ) -> NVec3 {
        if p.charge == 0.0 {
            return NVec3::zeros();
        }
        let params = ctx.params;
        let k_em = params.em_coupling_scale * ctx.aggregates.max_influence_index;
        let mut total = NVec3::zeros();
        for (j, other) in all.iter().enumerate() {
            if j == index || other.is_core() || other.charge == 0.0 {
                continue;
            }
            let diff = other.position - p.position;
            let dist_sq = diff.norm_squared();
            if dist_sq < params.em_range_min_sq || dist_sq > params.em_range_max_sq {
                continue;
            }
            let base = k_em * (p.charge * other.charge) / dist_sq;
            let phi_stress =
                (1.0 + params.em_stress_mod * p.stress) * (1.0 + params.em_stress_mod * other.stress);
            let phi_temp =
                (-params.em_temp_empathy * (p.temperature - other.temperature).abs()).exp();
            total += (diff / dist_sq.sqrt()) * (base * phi_stress * phi_temp);
        }
        total
    }
}

/// Short-range repulsion among same-layer neighbors plus medium-range
/// attraction toward adjacent-layer neighbors (bias-weighted). Pairs closer
/// than the minimum distance are skipped entirely.
pub struct ShellInteraction;

impl ForceTerm for ShellInteraction {
    fn force(
        &self,
        index: usize,
        p: &Particle,
        all: &[Particle],
        ctx: &ForceCtx<'_>,
        _rng: &mut StdRng,
    ) -> NVec3 {
        let params = ctx.params;
        let mut total = NVec3::zeros();
        for (j, other) in all.iter().enumerate() {
            if j == index {
                continue;
            }
            let diff = other.position - p.position;
            let dist = diff.norm();
            if dist < params.min_pair_distance {
                continue;
            }
            let dir = diff / dist;
            if other.layer == p.layer && dist < params.repulsion_range {
                total += dir * (-params.repulsion_strength / dist.powi(3));
            }
            if other.layer.abs_diff(p.layer) == 1 && dist < params.attraction_range {
                total += dir * (params.attraction_strength * p.attraction_bias / (dist * dist));
            }
        }
        total
    }
}

/// Linear spring toward the mid-shell anchor radius, weakened in
/// higher-dimensional layers. Outside the anchor, half the central pull is
/// subtracted so the inward forces are not double-counted.
pub struct BoundarySpring;

impl ForceTerm for BoundarySpring {
    fn force(
        &self,
        _index: usize,
        p: &Particle,
        _all: &[Particle],
        ctx: &ForceCtx<'_>,
        _rng: &mut StdRng,
    ) -> NVec3 {
        let radial = p.position.try_normalize(1e-12).unwrap_or_else(NVec3::zeros);
        let n = LAYERS[p.layer].dimension as f64;
        let displacement = p.base_radius - p.distance_to_center();
        let mut scalar = (ctx.params.boundary_spring / n) * displacement;
        if displacement < 0.0 {
            scalar -= 0.5 * central_force_magnitude(p, ctx);
        }
        radial * scalar
    }
}

/// Dimensional curvature: drives the velocity toward an ideal tangential
/// orbit about the z-axis whose angular speed decays with layer index. The
/// coupling stiffens when the system potential drops below its reference.
pub struct DimensionalCurvature;

impl ForceTerm for DimensionalCurvature {
    fn force(
        &self,
        _index: usize,
        p: &Particle,
        _all: &[Particle],
        ctx: &ForceCtx<'_>,
        _rng: &mut StdRng,
    ) -> NVec3 {
        let params = ctx.params;
        let s_total = ctx.aggregates.system_potential;
        let s_modulator = 1.0
            + (params.potential_response * (params.potential_ref - s_total)).max(0.0);

        let layer = p.layer as f64;
        let omega = params.curvature_omega * (-params.curvature_decay * layer).exp();
        let axis = NVec3::new(0.0, 0.0, 1.0);
        let v_ideal = axis
            .cross(&p.position)
            .try_normalize(1e-12)
            .unwrap_or_else(NVec3::zeros)
            * (omega * p.distance_to_center());

        let alpha =
            (params.curvature_alpha / (1.0 + params.curvature_layer_damp * layer)) * s_modulator;
        (v_ideal - p.velocity) * (alpha * ctx.aggregates.pi_n[p.layer])
    }
}

/// Shear drag between shells: layers 2 and 4 are pulled toward the mean
/// velocity of the next-outer layer.
pub struct ShearCoupling;

impl ForceTerm for ShearCoupling {
    fn force(
        &self,
        _index: usize,
        p: &Particle,
        all: &[Particle],
        ctx: &ForceCtx<'_>,
        _rng: &mut StdRng,
    ) -> NVec3 {
        if p.layer != 2 && p.layer != 4 {
            return NVec3::zeros();
        }
        let outer = p.layer + 1;
        let mut mean = NVec3::zeros();
        let mut n = 0usize;
        for other in all {
            if other.layer == outer && !other.is_core() {
                mean += other.velocity;
                n += 1;
            }
        }
        if n == 0 {
            return NVec3::zeros();
        }
        mean /= n as f64;
        (mean - p.velocity) * ctx.params.shear_strength
    }
}

/// Josephson coupling between layers 0 and 1: phase-aligned pairs attract,
/// anti-phase pairs repel, with a 1/d^2 falloff inside the coherence range.
pub struct JosephsonCoupling;

impl ForceTerm for JosephsonCoupling {
    fn force(
        &self,
        _index: usize,
        p: &Particle,
        all: &[Particle],
        ctx: &ForceCtx<'_>,
        _rng: &mut StdRng,
    ) -> NVec3 {
        if p.layer > 1 {
            return NVec3::zeros();
        }
        let params = ctx.params;
        let partner_layer = 1 - p.layer;
        let mut total = NVec3::zeros();
        for other in all {
            if other.is_core() || other.layer != partner_layer {
                continue;
            }
            let diff = other.position - p.position;
            let dist_sq = diff.norm_squared();
            if dist_sq < params.em_range_min_sq || dist_sq > params.josephson_range_sq {
                continue;
            }
            let delta_phi = p.coherence_phase - other.coherence_phase;
            let magnitude = (params.josephson_energy * delta_phi.cos()) / dist_sq;
            total += (diff / dist_sq.sqrt()) * magnitude;
        }
        total
    }
}

/// Stochastic jitter, inversely scaled by the layer coupling Gamma_n so
/// tightly-coupled layers fluctuate less.
pub struct QuantumJitter;

impl ForceTerm for QuantumJitter {
    fn force(
        &self,
        _index: usize,
        p: &Particle,
        _all: &[Particle],
        ctx: &ForceCtx<'_>,
        rng: &mut StdRng,
    ) -> NVec3 {
        let gamma = ctx.aggregates.gamma_n[p.layer].max(ctx.params.gamma_floor);
        let strength = ctx.params.jitter_scale / gamma;
        NVec3::new(
            (rng.gen::<f64>() - 0.5) * strength,
            (rng.gen::<f64>() - 0.5) * strength,
            (rng.gen::<f64>() - 0.5) * strength,
        )
    }
}

/// Plain kinematic damping.
pub struct KinematicDamping;

impl ForceTerm for KinematicDamping {
    fn force(
        &self,
        _index: usize,
        p: &Particle,
        _all: &[Particle],
        ctx: &ForceCtx<'_>,
        _rng: &mut StdRng,
    ) -> NVec3 {
        -p.velocity * ctx.params.damping
    }
}
