use once_cell::sync::Lazy;
use std::f64::consts::PI;

use crate::config::EngineConfig;
use crate::traits::PitchConverter;

const PITCH_TABLE_SIZE: usize = 512;
const PITCH_TABLE_OFFSET: f64 = 256.0;

/// 2^(note/12) for notes -256..256, shared by every converter.
static PITCH_TABLE: Lazy<[f64; PITCH_TABLE_SIZE]> = Lazy::new(|| {
    let mut table = [0.0; PITCH_TABLE_SIZE];
    for (i, entry) in table.iter_mut().enumerate() {
        *entry = 2f64.powf((i as f64 - PITCH_TABLE_OFFSET) / 12.0);
    }
    table
});

#[inline(always)]
fn table_pitch(note: f64) -> f64 {
    let top = (PITCH_TABLE_SIZE - 2) as f64 + 0.999_999;
    let position = (note + PITCH_TABLE_OFFSET).clamp(0.0, top);
    let index_f = position.floor();
    let index = index_f as usize;
    let frac = position - index_f;
    let y0 = PITCH_TABLE[index];
    let y1 = PITCH_TABLE[index + 1];
    y0 + (y1 - y0) * frac
}

/// Twelve-tone equal temperament around A440, evaluated at a fixed oversampled rate.
#[derive(Clone, Copy, Debug)]
pub struct EqualTemperament {
    sample_rate_os_inv: f64,
}

impl EqualTemperament {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            sample_rate_os_inv: config.sample_rate_os_inv(),
        }
    }
}

impl PitchConverter for EqualTemperament {
    #[inline]
    fn note_to_pitch_ignoring_tuning(&self, note: f64) -> f64 {
        table_pitch(note)
    }

    #[inline]
    fn note_to_omega_ignoring_tuning(&self, note: f64) -> (f64, f64) {
        let normalized = (440.0 * table_pitch(note) * self.sample_rate_os_inv).min(0.5);
        let omega = 2.0 * PI * normalized;
        (omega.sin(), omega.cos())
    }
}
