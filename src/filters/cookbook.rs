// src/filters/cookbook.rs
//
// RBJ cookbook sections for the 12/24 dB lowpass, highpass and bandpass slots plus the
// notch and allpass. The 24 dB slots run the same section twice per sample, so only the
// resonance curve differs here.

use crate::biquad::{BiquadDescriptor, Omega, Realization};
use crate::coeffs::CoefficientSet;
use crate::utils::{
    bound_frequency, clip_scale, map_2pole_resonance, map_4pole_resonance, reso_scale,
};

use super::{CoefficientDesigner, FilterContext, NotchDepth, Quality};

/// Fixed gain slot for the notch and allpass.
const NOTCH_GAIN: f64 = 0.005;

/// Below this the resonance map is treated as zero and Q is not formed.
const MIN_Q2INV: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Lowpass,
    Highpass,
    Bandpass,
}

/// Which resonance curve a section uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Poles {
    Two,
    Four,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cookbook {
    shape: Shape,
    poles: Poles,
    quality: Quality,
}

impl Cookbook {
    pub fn new(shape: Shape, poles: Poles, quality: Quality) -> Self {
        Self {
            shape,
            poles,
            quality,
        }
    }

    pub fn descriptor(
        &self,
        frequency: f32,
        resonance: f32,
        ctx: &FilterContext,
    ) -> BiquadDescriptor {
        let freq = bound_frequency(frequency);
        let reso = resonance as f64;
        let (sin, cos) = ctx.pitch.note_to_omega_ignoring_tuning(freq as f64);
        let omega = Omega::new(sin, cos);

        let q2inv = match self.poles {
            Poles::Two => map_2pole_resonance(reso, freq as f64, self.quality),
            Poles::Four => map_4pole_resonance(reso, freq as f64, self.quality),
        };

        let mut alpha = sin * q2inv;
        if self.quality.clamps_poles() {
            alpha = alpha.min(omega.max_complex_alpha());
        }

        let mut gain = reso_scale(reso, self.quality);
        let section = match self.shape {
            Shape::Lowpass => BiquadDescriptor::lowpass(omega, alpha),
            Shape::Highpass => BiquadDescriptor::highpass(omega, alpha),
            Shape::Bandpass => {
                if self.quality == Quality::Rough {
                    gain *= 2.0;
                }
                // Q * alpha; an unclamped alpha cancels Q down to sin / 2, which stays
                // finite when the map reaches zero
                let numerator = if q2inv.abs() > MIN_Q2INV {
                    0.5 * alpha / q2inv
                } else {
                    0.5 * sin
                };
                BiquadDescriptor::bandpass_with_numerator(omega, alpha, numerator)
            }
        };

        section
            .with_passband_gain(gain)
            .with_gain(clip_scale(freq, self.quality) as f64)
    }
}

impl CoefficientDesigner for Cookbook {
    fn design(&self, frequency: f32, resonance: f32, ctx: &FilterContext) -> CoefficientSet {
        let descriptor = self.descriptor(frequency, resonance, ctx);
        Realization::for_quality(self.quality).apply(&descriptor)
    }
}

/// 1 - (1 - r)^2 with r clamped to 0..1.
#[inline]
fn boosted_resonance(reso: f64) -> f64 {
    let r = reso.clamp(0.0, 1.0);
    1.0 - (1.0 - r) * (1.0 - r)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Notch {
    depth: NotchDepth,
}

impl Notch {
    pub fn new(depth: NotchDepth) -> Self {
        Self { depth }
    }

    pub fn descriptor(
        &self,
        frequency: f32,
        resonance: f32,
        ctx: &FilterContext,
    ) -> BiquadDescriptor {
        let freq = bound_frequency(frequency);
        let (sin, cos) = ctx.pitch.note_to_omega_ignoring_tuning(freq as f64);
        let boosted = boosted_resonance(resonance as f64);
        let q2inv = match self.depth {
            NotchDepth::Mild => 1.0 - 0.99 * boosted,
            NotchDepth::Regular => 2.5 - 2.49 * boosted,
        };
        BiquadDescriptor::notch(Omega::new(sin, cos), sin * q2inv).with_gain(NOTCH_GAIN)
    }
}

impl CoefficientDesigner for Notch {
    fn design(&self, frequency: f32, resonance: f32, ctx: &FilterContext) -> CoefficientSet {
        Realization::Lattice.apply(&self.descriptor(frequency, resonance, ctx))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Allpass;

impl Allpass {
    pub fn descriptor(
        &self,
        frequency: f32,
        resonance: f32,
        ctx: &FilterContext,
    ) -> BiquadDescriptor {
        let freq = bound_frequency(frequency);
        let (sin, cos) = ctx.pitch.note_to_omega_ignoring_tuning(freq as f64);
        let q2inv = 2.5 - 2.49 * boosted_resonance(resonance as f64);
        BiquadDescriptor::allpass(Omega::new(sin, cos), sin * q2inv).with_gain(NOTCH_GAIN)
    }
}

impl CoefficientDesigner for Allpass {
    fn design(&self, frequency: f32, resonance: f32, ctx: &FilterContext) -> CoefficientSet {
        Realization::Lattice.apply(&self.descriptor(frequency, resonance, ctx))
    }
}
