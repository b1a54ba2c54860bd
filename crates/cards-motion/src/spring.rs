#![forbid(unsafe_code)]

//! Duration-bound damped spring curve.
//!
//! A spring here is a timing curve, not a free-running simulation: it maps
//! normalized time in [0.0, 1.0] to progress using the closed-form solution
//! of a unit-mass damped harmonic oscillator released from rest at 0 and
//! pulled toward 1.
//!
//! The natural frequency is derived from the damping ratio so that the
//! envelope has decayed to [`REST_ENVELOPE`] at `t = 1`. This lets callers
//! say "spring back over 0.4s with damping 0.8" and get a curve that actually
//! finishes at 0.4s.
//!
//! # Parameters
//!
//! - **damping ratio** (ζ):
//!   - ζ < 1: underdamped, overshoots 1.0 and oscillates while settling
//!   - ζ = 1: critically damped, fastest approach without overshoot
//!   - ζ > 1: overdamped, slow approach without overshoot
//!
//! # Invariants
//!
//! 1. `sample(0.0) == 0.0` and `sample(t) == 1.0` for every `t >= 1.0`.
//! 2. The damping ratio is clamped to [`MIN_DAMPING_RATIO`, `MAX_DAMPING_RATIO`].
//!
//! # Failure Modes
//!
//! - Very small damping ratios need a high natural frequency to settle in
//!   time; the clamp keeps the curve from degenerating into noise.
//! - The residual envelope at `t = 1` is snapped away, which can produce a
//!   sub-pixel jump on very light springs.

/// Envelope magnitude at which the spring is considered settled.
pub const REST_ENVELOPE: f64 = 0.001;

/// Lowest accepted damping ratio.
pub const MIN_DAMPING_RATIO: f64 = 0.05;

/// Highest accepted damping ratio.
pub const MAX_DAMPING_RATIO: f64 = 10.0;

/// Natural frequency for which `(1 + ω)·e^(-ω) == REST_ENVELOPE`.
const CRITICAL_OMEGA: f64 = 9.233;

/// A damped spring timing curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringCurve {
    damping_ratio: f64,
    omega: f64,
}

impl SpringCurve {
    /// Create a spring curve with the given damping ratio.
    #[must_use]
    pub fn new(damping_ratio: f64) -> Self {
        let zeta = if damping_ratio.is_finite() {
            damping_ratio.clamp(MIN_DAMPING_RATIO, MAX_DAMPING_RATIO)
        } else {
            1.0
        };
        let decay = -REST_ENVELOPE.ln();
        let omega = if (zeta - 1.0).abs() < 1e-6 {
            CRITICAL_OMEGA
        } else if zeta < 1.0 {
            decay / zeta
        } else {
            // Slowest mode of the overdamped pair decays at ω(ζ - √(ζ²-1)).
            decay / (zeta - (zeta * zeta - 1.0).sqrt())
        };
        Self {
            damping_ratio: zeta,
            omega,
        }
    }

    /// Critically damped spring.
    #[must_use]
    pub fn critical() -> Self {
        Self::new(1.0)
    }

    /// Effective damping ratio (after clamping).
    #[inline]
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping_ratio
    }

    /// Progress at normalized time `t`.
    #[must_use]
    pub fn sample(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        let zeta = self.damping_ratio;
        let w = self.omega;
        if (zeta - 1.0).abs() < 1e-6 {
            return 1.0 - (1.0 + w * t) * (-w * t).exp();
        }
        let envelope = (-zeta * w * t).exp();
        if zeta < 1.0 {
            let wd = w * (1.0 - zeta * zeta).sqrt();
            1.0 - envelope * ((wd * t).cos() + zeta * w / wd * (wd * t).sin())
        } else {
            let wd = w * (zeta * zeta - 1.0).sqrt();
            1.0 - envelope * ((wd * t).cosh() + zeta * w / wd * (wd * t).sinh())
        }
    }
}

impl Default for SpringCurve {
    fn default() -> Self {
        Self::critical()
    }
}
