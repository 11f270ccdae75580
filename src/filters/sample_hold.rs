use crate::coeffs::{CoeffLayout, CoefficientSet};

use super::{CoefficientDesigner, FilterContext};

/// Sample and hold clocked at the cutoff frequency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SampleHold;

impl CoefficientDesigner for SampleHold {
    fn design(&self, frequency: f32, resonance: f32, ctx: &FilterContext) -> CoefficientSet {
        let period = (1.0 / 440.0)
            * ctx.pitch.note_to_pitch_ignoring_tuning(-frequency as f64)
            * ctx.config.sample_rate_os();
        CoefficientSet::from_leading(
            CoeffLayout::SampleHold,
            &[(1.0 / period) as f32, resonance],
        )
    }
}
