// src/utils/resonance.rs
//
// Resonance curves and gain compensation for the cookbook filters. Frequencies are notes
// relative to A440.

use crate::filters::Quality;

/// Lowest and highest note the cookbook builders accept.
pub const FREQ_MIN_NOTE: f32 = -55.0;
pub const FREQ_MAX_NOTE: f32 = 75.0;

/// Note above which Medium and Rough resonance is derated.
const DERATE_KNEE_NOTE: f64 = 58.0;

#[inline]
pub fn bound_frequency(freq: f32) -> f32 {
    freq.clamp(FREQ_MIN_NOTE, FREQ_MAX_NOTE)
}

#[inline]
fn derate_above_knee(reso: f64, freq: f64) -> f64 {
    reso * (1.0 - ((freq - DERATE_KNEE_NOTE) * 0.05).max(0.0)).max(0.0)
}

/// 1 - (1 - r)^2, the boosted resonance shape shared by the 2-pole curves.
#[inline]
fn boosted(reso: f64) -> f64 {
    1.0 - (1.0 - reso) * (1.0 - reso)
}

/// Inverse Q (times two) for a 2-pole section.
pub fn map_2pole_resonance(reso: f64, freq: f64, quality: Quality) -> f64 {
    match quality {
        Quality::Medium => {
            let reso = derate_above_knee(reso, freq);
            0.99 - 1.0 * boosted(reso).clamp(0.0, 1.0)
        }
        Quality::Rough => {
            let reso = derate_above_knee(reso, freq);
            1.0 - 1.05 * boosted(reso).clamp(0.001, 1.0)
        }
        Quality::Smooth | Quality::Svf => 2.5 - 2.45 * boosted(reso).clamp(0.0, 1.0),
    }
}

/// 2-pole curve without the Smooth boost and without derating.
pub fn map_2pole_resonance_noboost(reso: f64, _freq: f64, quality: Quality) -> f64 {
    if quality == Quality::Rough {
        1.0 - 0.99 * boosted(reso).clamp(0.001, 1.0)
    } else {
        0.99 - 0.98 * boosted(reso).clamp(0.0, 1.0)
    }
}

/// Inverse Q for each section of a 4-pole cascade; linear in resonance so the combined
/// peak stays bounded.
pub fn map_4pole_resonance(reso: f64, freq: f64, quality: Quality) -> f64 {
    match quality {
        Quality::Medium => {
            let reso = derate_above_knee(reso, freq);
            0.99 - 0.9949 * reso.clamp(0.0, 1.0)
        }
        Quality::Rough => {
            let reso = derate_above_knee(reso, freq);
            1.0 - 1.05 * reso.clamp(0.001, 1.0)
        }
        Quality::Smooth | Quality::Svf => 2.5 - 2.3 * reso.clamp(0.0, 1.0),
    }
}

/// Passband gain compensation for rising resonance.
pub fn reso_scale(reso: f64, quality: Quality) -> f64 {
    match quality {
        Quality::Medium => 1.0 - 0.75 * reso * reso,
        Quality::Rough => 1.0 - 0.5 * reso * reso,
        Quality::Smooth => 1.0 - 0.25 * reso * reso,
        Quality::Svf => 1.0,
    }
}

pub fn reso_scale_4pole(reso: f64, quality: Quality) -> f64 {
    match quality {
        Quality::Medium => 1.0 - 0.75 * reso,
        Quality::Rough => 1.0 - 0.5 * reso * reso,
        Quality::Smooth => 1.0 - 0.5 * reso,
        Quality::Svf => 1.0,
    }
}

#[inline]
fn db_to_linear(db: f32) -> f32 {
    10f32.powf(0.05 * db)
}

/// Drive for the nonlinear stage of the per-sample filter.
pub fn clip_scale(freq: f32, quality: Quality) -> f32 {
    match quality {
        Quality::Rough => (1.0 / 64.0) * db_to_linear(freq * 0.55),
        Quality::Smooth => 1.0 / 1024.0,
        Quality::Svf | Quality::Medium => 0.0,
    }
}
