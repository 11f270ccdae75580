use std::f64::consts::PI;

use crate::coeffs::{CoeffLayout, CoefficientSet};

use super::{CoefficientDesigner, FilterContext};

/// Cutoff ceiling as a fraction of the oversampled rate; the one-pole mapping stops
/// tracking above this.
const MAX_NORMALIZED_CUTOFF: f64 = 0.187;

/// Four cascaded one-poles with global feedback (Moog ladder, 24 dB lowpass).
///
/// Slots are `[feedback gain compensation, one-pole coefficient, feedback]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct MoogLadder;

impl CoefficientDesigner for MoogLadder {
    fn design(&self, frequency: f32, resonance: f32, ctx: &FilterContext) -> CoefficientSet {
        let cutoff = 440.0
            * ctx.pitch.note_to_pitch_ignoring_tuning(frequency as f64)
            * ctx.config.sample_rate_os_inv();
        let gg = cutoff.clamp(0.0, MAX_NORMALIZED_CUTOFF);

        let t_b1 = 1.0 - (-2.0 * PI * gg).exp();
        // Keep the loop gain of four one-poles below self-oscillation blowup
        let q = (2.15 * (resonance as f64).clamp(0.0, 1.0)).min(0.5 / t_b1.powi(4));

        CoefficientSet::from_leading(
            CoeffLayout::MoogLadder,
            &[(3.0 / (3.0 - q)) as f32, t_b1 as f32, q as f32],
        )
    }
}
