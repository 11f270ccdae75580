use crate::coeffs::{CoeffLayout, CoefficientSet};

use super::{CombMode, CoefficientDesigner, FilterContext};

/// Feedback comb filter whose delay is one period of the cutoff note.
///
/// Slots are `[delay in oversampled samples, feedback, dry mix, wet mix]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Comb {
    mode: CombMode,
}

impl Comb {
    pub fn new(subtype: i32) -> Self {
        Self {
            mode: CombMode::from_subtype(subtype),
        }
    }

    pub fn mode(&self) -> CombMode {
        self.mode
    }

    /// Delay bounds that keep the interpolation kernel inside the line.
    pub fn delay_range(&self, ctx: &FilterContext) -> (f32, f32) {
        let comb = &ctx.config.comb;
        let length = if self.mode.extended {
            comb.max_length_extended
        } else {
            comb.max_length
        };
        let taps = comb.interpolation_taps as f32;
        (taps, length as f32 - taps)
    }
}

impl CoefficientDesigner for Comb {
    fn design(&self, frequency: f32, resonance: f32, ctx: &FilterContext) -> CoefficientSet {
        let mut delay = ((1.0 / 440.0)
            * ctx.pitch.note_to_pitch_inv_ignoring_tuning(frequency as f64)
            * ctx.config.sample_rate_os()) as f32;
        if !ctx.config.correctly_tune_comb_filter {
            delay -= ctx.config.comb.calibration_offset();
        }
        let (min_delay, max_delay) = self.delay_range(ctx);
        // max/min rather than clamp: an unvalidated comb config may invert the range
        let delay = delay.max(min_delay).min(max_delay);

        let feedback = if self.mode.extended {
            resonance.clamp(-2.0, 2.0)
        } else {
            let sign = if self.mode.negative { -1.0 } else { 1.0 };
            sign * resonance.clamp(0.0, 1.0)
        };

        let dry = if self.mode.wet_only { 0.0 } else { 0.5 };

        CoefficientSet::from_leading(CoeffLayout::Comb, &[delay, feedback, dry, 1.0 - dry])
    }
}
