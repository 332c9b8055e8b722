//! Static layer structure and the particle seed table.
//!
//! The simulation space is partitioned into six concentric spherical shells.
//! Each layer carries an integer dimension n (3..8) that feeds the n-sphere
//! volume / density formulas, an outer radius, and display metadata.
//! Both tables are fixed at startup and never mutated.

use crate::simulation::states::SymbolicType;

/// Number of concentric layers.
pub const LAYER_COUNT: usize = 6;

/// Inner bound of layer 0. Keeps newly-placed particles off the center,
/// where the radial force terms degenerate.
pub const INNERMOST_RADIUS: f64 = 2.0;

/// Static descriptor for one spherical shell.
#[derive(Debug, Clone, Copy)]
pub struct Layer {
    pub index: usize,
    pub name: &'static str,
    /// Integer dimension n used by the n-sphere volume and the boundary
    /// spring divisor.
    pub dimension: u32,
    /// Outer radius of the shell.
    pub radius: f64,
    /// Shell tint for the viewer (0xRRGGBB).
    pub color: u32,
    pub opacity: f32,
    /// Render-scale multiplier applied to particles of this layer.
    pub scale_factor: f64,
}

/// The six shells, innermost to outermost.
pub const LAYERS: [Layer; LAYER_COUNT] = [
    Layer { index: 0, name: "core",     dimension: 3, radius: 8.0,  color: 0xFFFFAA, opacity: 0.25, scale_factor: 0.3 },
    Layer { index: 1, name: "body",     dimension: 4, radius: 16.0, color: 0xFF8844, opacity: 0.22, scale_factor: 0.5 },
    Layer { index: 2, name: "thought",  dimension: 5, radius: 24.0, color: 0x44DDFF, opacity: 0.20, scale_factor: 0.7 },
    Layer { index: 3, name: "civic",    dimension: 6, radius: 32.0, color: 0x888888, opacity: 0.18, scale_factor: 0.8 },
    Layer { index: 4, name: "junction", dimension: 7, radius: 40.0, color: 0x88DDAA, opacity: 0.15, scale_factor: 0.9 },
    Layer { index: 5, name: "aura",     dimension: 8, radius: 50.0, color: 0xCCCCFF, opacity: 0.12, scale_factor: 1.0 },
];

impl Layer {
    /// Inner radius of this shell: the previous layer's outer radius, or the
    /// fixed floor for layer 0.
    pub fn inner_radius(&self) -> f64 {
        if self.index == 0 {
            INNERMOST_RADIUS
        } else {
            LAYERS[self.index - 1].radius
        }
    }

    /// Mid-shell radius, the rest anchor for the boundary spring.
    pub fn base_radius(&self) -> f64 {
        let inner = self.inner_radius();
        inner + (self.radius - inner) / 2.0
    }
}

/// Initial state for one named emotion particle.
#[derive(Debug, Clone, Copy)]
pub struct ParticleSeed {
    pub name: &'static str,
    pub symbol: SymbolicType,
    pub layer: usize,
    pub temperature: f64,
    pub stress: f64,
    pub mass: f64,
    /// Base mesh color (0xRRGGBB).
    pub color: u32,
}

/// Global warm-up applied to every seed temperature so the system starts in
/// the calm/autumn band (the flow particle of layer 1 is the reference point
/// at an average of ~0.79).
pub const SEED_TEMP_OFFSET: f64 = 0.27;

/// The 18-particle roster, one freeze/drive/flow triple per layer, listed in
/// creation order.
pub const PARTICLE_SEEDS: [ParticleSeed; 18] = [
    // layer 0 (core): root-level will
    ParticleSeed { name: "brood",   symbol: SymbolicType::Freeze, layer: 0, temperature: 0.48 + SEED_TEMP_OFFSET, stress: 0.28, mass: 1.10, color: 0x4444AA },
    ParticleSeed { name: "rage",    symbol: SymbolicType::Drive,  layer: 0, temperature: 0.60 + SEED_TEMP_OFFSET, stress: 0.25, mass: 0.90, color: 0xFF4444 },
    ParticleSeed { name: "fond",    symbol: SymbolicType::Flow,   layer: 0, temperature: 0.55 + SEED_TEMP_OFFSET, stress: 0.15, mass: 1.00, color: 0xFF88FF },
    // layer 1 (body): instinct and physiology
    ParticleSeed { name: "sorrow",  symbol: SymbolicType::Freeze, layer: 1, temperature: 0.45 + SEED_TEMP_OFFSET, stress: 0.26, mass: 1.15, color: 0x6688DD },
    ParticleSeed { name: "surge",   symbol: SymbolicType::Drive,  layer: 1, temperature: 0.58 + SEED_TEMP_OFFSET, stress: 0.22, mass: 0.95, color: 0xFF6644 },
    ParticleSeed { name: "ease",    symbol: SymbolicType::Flow,   layer: 1, temperature: 0.52 + SEED_TEMP_OFFSET, stress: 0.10, mass: 1.00, color: 0xFFDD66 },
    // layer 2 (thought): cognition
    ParticleSeed { name: "spite",   symbol: SymbolicType::Freeze, layer: 2, temperature: 0.47 + SEED_TEMP_OFFSET, stress: 0.27, mass: 1.10, color: 0x8844AA },
    ParticleSeed { name: "vigor",   symbol: SymbolicType::Drive,  layer: 2, temperature: 0.56 + SEED_TEMP_OFFSET, stress: 0.18, mass: 0.95, color: 0x44FF44 },
    ParticleSeed { name: "meld",    symbol: SymbolicType::Flow,   layer: 2, temperature: 0.53 + SEED_TEMP_OFFSET, stress: 0.12, mass: 1.00, color: 0x44DDDD },
    // layer 3 (civic): norms and responsibility
    ParticleSeed { name: "press",   symbol: SymbolicType::Freeze, layer: 3, temperature: 0.46 + SEED_TEMP_OFFSET, stress: 0.30, mass: 1.20, color: 0x666666 },
    ParticleSeed { name: "delight", symbol: SymbolicType::Drive,  layer: 3, temperature: 0.57 + SEED_TEMP_OFFSET, stress: 0.16, mass: 0.90, color: 0xFFDD44 },
    ParticleSeed { name: "mirth",   symbol: SymbolicType::Flow,   layer: 3, temperature: 0.54 + SEED_TEMP_OFFSET, stress: 0.14, mass: 1.00, color: 0xFFAA88 },
    // layer 4 (junction): boundary negotiation with the outside
    ParticleSeed { name: "attune",  symbol: SymbolicType::Flow,   layer: 4, temperature: 0.51 + SEED_TEMP_OFFSET, stress: 0.11, mass: 1.00, color: 0x88DDAA },
    ParticleSeed { name: "flux",    symbol: SymbolicType::Drive,  layer: 4, temperature: 0.55 + SEED_TEMP_OFFSET, stress: 0.17, mass: 0.95, color: 0xAAFF88 },
    ParticleSeed { name: "still",   symbol: SymbolicType::Freeze, layer: 4, temperature: 0.49 + SEED_TEMP_OFFSET, stress: 0.20, mass: 1.05, color: 0x88AADD },
    // layer 5 (aura): field diffusion
    ParticleSeed { name: "gaze",    symbol: SymbolicType::Flow,   layer: 5, temperature: 0.52 + SEED_TEMP_OFFSET, stress: 0.13, mass: 1.00, color: 0xCCCCFF },
    ParticleSeed { name: "echo",    symbol: SymbolicType::Drive,  layer: 5, temperature: 0.54 + SEED_TEMP_OFFSET, stress: 0.19, mass: 0.90, color: 0xFFCCCC },
    ParticleSeed { name: "veil",    symbol: SymbolicType::Freeze, layer: 5, temperature: 0.50 + SEED_TEMP_OFFSET, stress: 0.24, mass: 1.00, color: 0xCCFFCC },
];

/// Fallback seed values for a name missing from the roster.
pub const DEFAULT_SEED_TEMPERATURE: f64 = 0.77;
pub const DEFAULT_SEED_STRESS: f64 = 0.15;
pub const DEFAULT_SEED_MASS: f64 = 1.0;
