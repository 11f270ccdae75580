use crate::error::{CoeffError, CoeffResult};
use crate::traits::TuningTable;

use super::A4_MIDI_NOTE;

const LOWEST_NOTE: i32 = -256;
const TABLE_SIZE: usize = 640;

/// A repeating scale mapped linearly onto the keyboard.
///
/// `cents` lists each scale degree above the tonic; the last entry is the period
/// (1200.0 for octave-repeating scales). The tonic MIDI note sounds at `tonic_frequency`.
#[derive(Clone, Debug)]
pub struct ScaleTuning {
    log_scaled: Vec<f64>,
}

impl ScaleTuning {
    pub fn new(cents: &[f64], tonic_note: i32, tonic_frequency: f64) -> CoeffResult<Self> {
        if cents.is_empty() {
            return Err(CoeffError::InvalidTuning("scale has no degrees".into()));
        }
        if !(tonic_frequency.is_finite() && tonic_frequency > 0.0) {
            return Err(CoeffError::InvalidTuning(format!(
                "tonic frequency must be positive, got {}",
                tonic_frequency
            )));
        }
        let mut previous = 0.0;
        for &step in cents {
            if !step.is_finite() || step <= previous {
                return Err(CoeffError::InvalidTuning(format!(
                    "scale degrees must be strictly increasing and positive, got {:?}",
                    cents
                )));
            }
            previous = step;
        }
        Ok(Self::build(cents, tonic_note, tonic_frequency))
    }

    fn build(cents: &[f64], tonic_note: i32, tonic_frequency: f64) -> Self {
        let degrees = cents.len() as i32;
        let period = cents[cents.len() - 1];
        let midi_zero_hz = 440.0 * 2f64.powf(-(A4_MIDI_NOTE as f64) / 12.0);

        let log_scaled = (0..TABLE_SIZE as i32)
            .map(|i| {
                let offset = LOWEST_NOTE + i - tonic_note;
                let periods = offset.div_euclid(degrees);
                let degree = offset.rem_euclid(degrees);
                let within = if degree == 0 {
                    0.0
                } else {
                    cents[degree as usize - 1]
                };
                let total_cents = periods as f64 * period + within;
                let frequency = tonic_frequency * 2f64.powf(total_cents / 1200.0);
                (frequency / midi_zero_hz).log2()
            })
            .collect();

        Self { log_scaled }
    }

    /// Twelve-tone equal temperament with A4 at 440 Hz.
    pub fn equal_temperament() -> Self {
        let cents: Vec<f64> = (1..=12).map(|i| i as f64 * 100.0).collect();
        Self::build(&cents, A4_MIDI_NOTE, 440.0)
    }

    pub fn note_range() -> (i32, i32) {
        (LOWEST_NOTE, LOWEST_NOTE + TABLE_SIZE as i32 - 1)
    }
}

impl TuningTable for ScaleTuning {
    fn log_scaled_frequency_for_midi_note(&self, midi_note: i32) -> f64 {
        let (lowest, highest) = Self::note_range();
        if midi_note < lowest || midi_note > highest {
            log::debug!(
                "Tuning lookup for note {} outside {}..={}, clamping",
                midi_note,
                lowest,
                highest
            );
        }
        let index = (midi_note.clamp(lowest, highest) - lowest) as usize;
        self.log_scaled[index]
    }
}
