//! Stable encodings of a second-order section.
//!
//! Coefficients are interpolated every block, and interpolating direct-form coefficients
//! can pass through unstable sections even when both ends are stable. The normalized
//! lattice stays stable for any interpolation between `|k| < 1` pairs. The coupled form is
//! cheaper but needs the caller to have kept the poles complex.

use crate::coeffs::{CoeffLayout, CoefficientSet, N_COEFFS};
use crate::filters::Quality;

use super::BiquadDescriptor;

/// Smallest imaginary pole part handed to the coupled-form rotation.
const MIN_IMAG_POLE: f64 = 8.0 * f32::EPSILON as f64;

/// Which encoding a cookbook builder hands its descriptor to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Realization {
    Lattice,
    Coupled,
}

impl Realization {
    /// Smooth skips the alpha clamp, so only the lattice is safe for it.
    pub fn for_quality(quality: Quality) -> Self {
        if quality == Quality::Smooth {
            Realization::Lattice
        } else {
            Realization::Coupled
        }
    }

    pub fn apply(self, descriptor: &BiquadDescriptor) -> CoefficientSet {
        match self {
            Realization::Lattice => to_normalized_lattice(descriptor),
            Realization::Coupled => to_coupled_form(descriptor),
        }
    }
}

pub fn to_normalized_lattice(descriptor: &BiquadDescriptor) -> CoefficientSet {
    let (a1, a2, b0, b1, b2) = descriptor.normalized();

    let k1 = a1 / (1.0 + a2);
    let k2 = a2;

    let q1 = (1.0 - k1 * k1).abs().sqrt();
    let q2 = (1.0 - k2 * k2).abs().sqrt();

    let v3 = b2;
    let v2 = (b1 - a1 * v3) / q2;
    let v1 = (b0 - k1 * v2 * q2 - k2 * v3) / (q1 * q2);

    let mut values = [0.0; N_COEFFS];
    values[0] = k1 as f32;
    values[1] = k2 as f32;
    values[2] = q1 as f32;
    values[3] = q2 as f32;
    values[4] = v1 as f32;
    values[5] = v2 as f32;
    values[6] = v3 as f32;
    values[7] = descriptor.gain as f32;
    CoefficientSet::new(CoeffLayout::NormalizedLattice, values)
}

pub fn to_coupled_form(descriptor: &BiquadDescriptor) -> CoefficientSet {
    let (a1, a2, b0, b1, b2) = descriptor.normalized();

    // Discriminant clamped so the pair is always treated as complex
    let sq = (a1 * a1 - 4.0 * a2).min(0.0);
    let ar = 0.5 * -a1;
    let ai = (0.5 * (-sq).sqrt()).max(MIN_IMAG_POLE);

    // Deflate: H(z) = d + (bb1 z^-1 + bb2 z^-2) / A(z)
    let bb1 = b1 - a1 * b0;
    let bb2 = b2 - a2 * b0;

    let d = b0;
    let c1 = bb1;
    let c2 = (bb1 * ar + bb2) / ai;

    let mut values = [0.0; N_COEFFS];
    values[0] = ar as f32;
    values[1] = ai as f32;
    values[2] = 1.0;
    values[4] = c1 as f32;
    values[5] = c2 as f32;
    values[6] = d as f32;
    values[7] = descriptor.gain as f32;
    CoefficientSet::new(CoeffLayout::CoupledForm, values)
}
