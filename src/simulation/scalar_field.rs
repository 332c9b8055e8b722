//! Scalar field math: gamma approximation, n-sphere volume, and the
//! weather / season / brainwave classifiers.
//!
//! Everything here is a pure function over plain scalars. The volume formula
//! is the only consumer of `gamma`; both guard their degenerate inputs with
//! silent zero returns rather than errors.

use std::f64::consts::PI;
use std::fmt;

/// Lanczos coefficients for g = 7, n = 9 (the standard published table).
/// Regression tests pin `gamma` against known values; do not retune these.
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.99999999999980993,
    676.5203681218851,
    -1259.1392167224028,
    771.32342877765313,
    -176.61502916214059,
    12.507343278686905,
    -0.13857109526572012,
    9.9843695780195716e-6,
    1.5056327351493116e-7,
];

/// Gamma function via the Lanczos approximation, with the reflection formula
/// for arguments below 0.5.
pub fn gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Γ(x) Γ(1-x) = π / sin(πx)
        PI / ((PI * x).sin() * gamma(1.0 - x))
    } else {
        let x = x - 1.0;
        let mut acc = LANCZOS_COEFFICIENTS[0];
        let t = x + 7.5;
        for (i, c) in LANCZOS_COEFFICIENTS.iter().enumerate().skip(1) {
            acc += c / (x + i as f64);
        }
        (2.0 * PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * acc
    }
}

/// Volume of the unit n-sphere computed with an arbitrary "pi" constant:
/// `pi_const^(n/2) / Γ(n/2 + 1)`.
///
/// Returns 0.0 for non-positive n, for a zero or non-finite gamma, or for a
/// non-finite result. Never panics.
pub fn n_sphere_volume(n: f64, pi_const: f64) -> f64 {
    if n <= 0.0 {
        return 0.0;
    }
    let g = gamma(n / 2.0 + 1.0);
    if g == 0.0 || !g.is_finite() {
        return 0.0;
    }
    let volume = pi_const.powf(n / 2.0) / g;
    if volume.is_finite() {
        volume
    } else {
        0.0
    }
}

/// Weather label shared by the external field and the internal classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weather {
    Anger,
    Joy,
    Sadness,
    Calm,
}

impl Weather {
    pub fn label(&self) -> &'static str {
        match self {
            Weather::Anger => "anger",
            Weather::Joy => "joy",
            Weather::Sadness => "sadness",
            Weather::Calm => "calm",
        }
    }

    /// Emissive tint used by the viewer for this weather.
    pub fn tint(&self) -> (f32, f32, f32) {
        match self {
            Weather::Joy => (1.0, 0.9, 0.5),
            Weather::Calm => (0.7, 0.9, 1.0),
            Weather::Sadness => (0.5, 0.6, 0.9),
            Weather::Anger => (0.9, 0.3, 0.3),
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn label(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// EEG-style band label attached to the internal system state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brainwave {
    Alpha,
    Beta,
    Theta,
    Delta,
}

impl Brainwave {
    pub fn label(&self) -> &'static str {
        match self {
            Brainwave::Alpha => "alpha",
            Brainwave::Beta => "beta",
            Brainwave::Theta => "theta",
            Brainwave::Delta => "delta",
        }
    }
}

impl fmt::Display for Brainwave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// External-weather thresholds.
const EXT_ANGER_STRESS: f64 = 1.0;
const EXT_JOY_TEMP: f64 = 0.7;
const EXT_JOY_STRESS: f64 = 0.6;
const EXT_SADNESS_TEMP: f64 = 0.45;
const EXT_SADNESS_STRESS: f64 = 0.3;

/// Classify the externally-set ambient field into a weather label.
pub fn classify_external_weather(t_env: f64, stress: f64) -> Weather {
    if stress > EXT_ANGER_STRESS {
        Weather::Anger
    } else if t_env >= EXT_JOY_TEMP && stress <= EXT_JOY_STRESS {
        Weather::Joy
    } else if t_env <= EXT_SADNESS_TEMP && stress <= EXT_SADNESS_STRESS {
        Weather::Sadness
    } else {
        Weather::Calm
    }
}

// Internal-state bands, evaluated in declaration order; first match wins.
const BAND_ANGER_TEMP: f64 = 0.85;
const BAND_ANGER_STRESS: f64 = 0.4;
const BAND_CALM_TEMP: f64 = 0.5;
const BAND_CALM_STRESS: f64 = 0.3;
const BAND_JOY_TEMP: f64 = 0.75;

/// Map the outermost layer's aggregate temperature/stress plus its trend to
/// a joint (brainwave, season, weather) state.
///
/// Note the ordering quirk: the calm band sits ahead of the joy band, so a
/// hot-but-relaxed system reads as calm/autumn and the joy band only fires
/// for moderately-stressed heat. This ordering is part of the contract.
pub fn classify_system_state(
    avg_temp: f64,
    avg_stress: f64,
    prev_avg_temp: f64,
) -> (Brainwave, Season, Weather) {
    if avg_temp >= BAND_ANGER_TEMP && avg_stress > BAND_ANGER_STRESS {
        (Brainwave::Beta, Season::Summer, Weather::Anger)
    } else if avg_temp >= BAND_CALM_TEMP && avg_stress <= BAND_CALM_STRESS {
        (Brainwave::Theta, Season::Autumn, Weather::Calm)
    } else if avg_temp >= BAND_JOY_TEMP {
        // Warming trend reads as spring, cooling as late summer.
        let season = if avg_temp >= prev_avg_temp {
            Season::Spring
        } else {
            Season::Summer
        };
        (Brainwave::Alpha, season, Weather::Joy)
    } else {
        (Brainwave::Delta, Season::Winter, Weather::Sadness)
    }
}
