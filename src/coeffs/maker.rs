use crate::config::EngineConfig;
use crate::error::CoeffResult;
use crate::filters::{CoefficientDesigner, FilterContext, FilterRequest, Topology};
use crate::traits::{CoefficientSink, TuningTable};
use crate::tuning::A4_MIDI_NOTE;

use super::{CoefficientSet, N_COEFFS};

/// Fraction of each new coefficient set blended into the target.
pub const SMOOTHING: f32 = 0.2;

/// Control-rate coefficient computation and smoothing for one filter slot.
///
/// `current` is what the per-sample stage is using, `target` the smoothed goal and
/// `delta` the per-sample step between them. The per-sample stage owns advancing
/// `current`; this type only ever rewrites `target` and `delta`, except on the first set
/// after a reset.
#[derive(Clone, Debug)]
pub struct CoefficientMaker {
    current: CoefficientSet,
    target: CoefficientSet,
    delta: [f32; N_COEFFS],
    first_run: bool,
    block_size_os_inv: f32,
}

impl CoefficientMaker {
    /// Fails if `config` does not pass [`EngineConfig::validate`].
    pub fn new(config: &EngineConfig) -> CoeffResult<Self> {
        config.validate()?;
        Ok(Self {
            current: CoefficientSet::default(),
            target: CoefficientSet::default(),
            delta: [0.0; N_COEFFS],
            first_run: true,
            block_size_os_inv: config.block_size_os_inv(),
        })
    }

    /// Clear all slots; the next coefficient set is taken without a ramp.
    pub fn reset(&mut self) {
        log::debug!("Resetting coefficient maker");
        self.current = CoefficientSet::default();
        self.target = CoefficientSet::default();
        self.delta = [0.0; N_COEFFS];
        self.first_run = true;
    }

    /// Compute coefficients for `request` and smooth them into the target.
    ///
    /// With `tuning_adjusted` set and a retuning table in `ctx`, the cutoff follows the
    /// table continuously between MIDI notes. Inactive topologies leave everything as is.
    pub fn make_coeffs(
        &mut self,
        request: &FilterRequest,
        ctx: &FilterContext,
        tuning_adjusted: bool,
    ) {
        let mut frequency = request.frequency;
        if tuning_adjusted {
            if let Some(tuning) = ctx.filter_tuning() {
                frequency = retune_frequency(frequency, tuning);
            }
        }
        let resonance = request.resonance;

        match request
            .filter_type
            .topology(request.subtype, ctx.config.legacy_bandpass_fallthrough)
        {
            Topology::Inactive => {}
            Topology::Native(design) => {
                self.from_direct(design.design(frequency, resonance, ctx));
            }
            Topology::Sequence(first, second) => {
                self.from_direct(first.design(frequency, resonance, ctx));
                self.from_direct(second.design(frequency, resonance, ctx));
            }
            Topology::Delegated(sibling) => match ctx.siblings {
                Some(designer) => {
                    designer.make_coefficients(self, &sibling, frequency, resonance, ctx)
                }
                None => log::trace!(
                    "No sibling designer for {:?}, coefficients unchanged",
                    sibling
                ),
            },
        }
    }

    #[inline]
    pub fn current(&self) -> &CoefficientSet {
        &self.current
    }

    #[inline]
    pub fn target(&self) -> &CoefficientSet {
        &self.target
    }

    #[inline]
    pub fn delta(&self) -> &[f32; N_COEFFS] {
        &self.delta
    }

    #[inline]
    pub fn is_first_run(&self) -> bool {
        self.first_run
    }

    /// Step `current` by `samples` deltas, as the per-sample stage does over a block.
    pub fn advance(&mut self, samples: usize) {
        let n = samples as f32;
        for (c, d) in self.current.values_mut().iter_mut().zip(self.delta.iter()) {
            *c += d * n;
        }
    }
}

impl CoefficientSink for CoefficientMaker {
    fn from_direct(&mut self, coeffs: CoefficientSet) {
        if self.first_run {
            self.current = coeffs;
            self.target = coeffs;
            self.delta = [0.0; N_COEFFS];
            self.first_run = false;
            return;
        }

        if coeffs.layout() != self.target.layout() {
            log::debug!(
                "Smoothing {:?} coefficients into {:?} without a reset",
                coeffs.layout(),
                self.target.layout()
            );
            self.target.set_layout(coeffs.layout());
            self.current.set_layout(coeffs.layout());
        }

        let target = self.target.values_mut();
        for (t, &new) in target.iter_mut().zip(coeffs.values().iter()) {
            *t = (1.0 - SMOOTHING) * *t + SMOOTHING * new;
        }
        for ((d, &t), &c) in self
            .delta
            .iter_mut()
            .zip(self.target.values().iter())
            .zip(self.current.values().iter())
        {
            *d = (t - c) * self.block_size_os_inv;
        }
    }
}

/// Map a note-relative cutoff through `tuning`, interpolating the log frequency between
/// the two bracketing MIDI notes.
pub fn retune_frequency(frequency: f32, tuning: &dyn TuningTable) -> f32 {
    let note = frequency as f64 + A4_MIDI_NOTE as f64;
    let index = note.floor();
    let frac = note - index;
    let index = index as i32;

    let below = tuning.log_scaled_frequency_for_midi_note(index) * 12.0;
    let above = tuning.log_scaled_frequency_for_midi_note(index + 1) * 12.0;

    ((1.0 - frac) * below + frac * above - A4_MIDI_NOTE as f64) as f32
}
