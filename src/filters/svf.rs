use std::f64::consts::PI;

use crate::coeffs::{CoeffLayout, CoefficientSet};

use super::{CoefficientDesigner, FilterContext};

/// Highest F1 argument, as a fraction of the oversampled rate times four.
const MAX_NORMALIZED_F: f64 = 0.11;

/// Chamberlin state-variable filter with resonance overshoot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateVariable {
    four_pole: bool,
}

impl StateVariable {
    pub fn new(four_pole: bool) -> Self {
        Self { four_pole }
    }

    fn overshoot(&self) -> f64 {
        if self.four_pole {
            0.1
        } else {
            0.15
        }
    }
}

impl CoefficientDesigner for StateVariable {
    fn design(&self, frequency: f32, resonance: f32, ctx: &FilterContext) -> CoefficientSet {
        let f = 440.0 * ctx.pitch.note_to_pitch_ignoring_tuning(frequency as f64);
        let f1 = 2.0 * (PI * MAX_NORMALIZED_F.min(f * 0.25 * ctx.config.sample_rate_inv())).sin();

        let reso = (resonance as f64).clamp(0.0, 1.0).sqrt();
        let overshoot = self.overshoot();

        let q1 = 2.0 - reso * (2.0 + overshoot) + f1 * f1 * overshoot * 0.9;
        // Upper bound keeps the integrators stable at high F1; full resonance would
        // otherwise go slightly negative
        let q1 = q1.min(2.0f64.min(2.0 - 1.52 * f1)).max(0.0);

        let clip_damp = 0.1 * reso * f1;
        let gain = 1.0 - 0.65 * reso;

        CoefficientSet::from_leading(
            CoeffLayout::StateVariable,
            &[f1 as f32, q1 as f32, clip_damp as f32, gain as f32],
        )
    }
}
