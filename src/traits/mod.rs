// src/traits/mod.rs
use crate::biquad::{to_coupled_form, to_normalized_lattice, BiquadDescriptor};
use crate::coeffs::CoefficientSet;

/// Note-to-frequency conversion that ignores any active microtonal tuning.
///
/// Notes are relative to A4: note `0.0` is 440 Hz, `12.0` is 880 Hz.
pub trait PitchConverter {
    /// Frequency ratio relative to 440 Hz.
    fn note_to_pitch_ignoring_tuning(&self, note: f64) -> f64;

    fn note_to_pitch_inv_ignoring_tuning(&self, note: f64) -> f64 {
        1.0 / self.note_to_pitch_ignoring_tuning(note)
    }

    /// `(sin, cos)` of the angular frequency at the oversampled rate, capped at Nyquist.
    fn note_to_omega_ignoring_tuning(&self, note: f64) -> (f64, f64);
}

/// A microtonal tuning table indexed by MIDI note.
pub trait TuningTable {
    /// Log2 frequency of `midi_note` relative to MIDI note 0 in 12-TET; equal temperament
    /// returns `midi_note / 12`.
    fn log_scaled_frequency_for_midi_note(&self, midi_note: i32) -> f64;
}

/// Receiver of freshly computed coefficients.
///
/// Delegated filter algorithms get the maker as a `&mut dyn CoefficientSink` and write
/// through the same transforms and smoothing as the built-in topologies.
pub trait CoefficientSink {
    fn from_direct(&mut self, coeffs: CoefficientSet);

    fn to_normalized_lattice(&mut self, descriptor: &BiquadDescriptor) {
        self.from_direct(to_normalized_lattice(descriptor));
    }

    fn to_coupled_form(&mut self, descriptor: &BiquadDescriptor) {
        self.from_direct(to_coupled_form(descriptor));
    }
}
