use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoeffError, CoeffResult};

/// How a loaded tuning table is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TuningMode {
    /// Tuning tables are never consulted.
    Ignore,
    /// Notes and modulated filter cutoffs both follow the table.
    #[default]
    RetuneAll,
    /// Only incoming MIDI notes are retuned; filter cutoffs stay 12-TET.
    RetuneMidiOnly,
}

/// Comb filter delay line limits, in oversampled samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombConfig {
    #[serde(default = "default_comb_length")]
    pub max_length: usize,
    #[serde(default = "default_comb_length_extended")]
    pub max_length_extended: usize,
    /// Width of the windowed-sinc interpolation kernel used to read the delay line.
    #[serde(default = "default_interpolation_taps")]
    pub interpolation_taps: usize,
}

impl CombConfig {
    /// Historical calibration offset subtracted from the delay when the session does not
    /// request correctly tuned combs.
    pub fn calibration_offset(&self) -> f32 {
        (self.interpolation_taps >> 1) as f32
    }
}

impl Default for CombConfig {
    fn default() -> Self {
        Self {
            max_length: default_comb_length(),
            max_length_extended: default_comb_length_extended(),
            interpolation_taps: default_interpolation_taps(),
        }
    }
}

fn default_comb_length() -> usize {
    2048
}

fn default_comb_length_extended() -> usize {
    2048 * 64
}

fn default_interpolation_taps() -> usize {
    12
}

fn default_sample_rate() -> f32 {
    48000.0
}

fn default_block_size() -> usize {
    32
}

fn default_oversampling() -> usize {
    2
}

fn default_true() -> bool {
    true
}

/// Engine and session settings consumed by the coefficient makers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f32,
    /// Control-rate block length at the base sample rate.
    #[serde(default = "default_block_size")]
    pub block_size: usize,
    /// Oversampling factor of the per-sample filter stage.
    #[serde(default = "default_oversampling")]
    pub oversampling: usize,
    #[serde(default)]
    pub comb: CombConfig,
    #[serde(default = "default_true")]
    pub correctly_tune_comb_filter: bool,
    #[serde(default)]
    pub tuning_mode: TuningMode,
    /// Bandpass 12 dB also runs the bandpass 24 dB builder after its own, as older
    /// sessions did. Both results pass through smoothing.
    #[serde(default = "default_true")]
    pub legacy_bandpass_fallthrough: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            block_size: default_block_size(),
            oversampling: default_oversampling(),
            comb: CombConfig::default(),
            correctly_tune_comb_filter: true,
            tuning_mode: TuningMode::default(),
            legacy_bandpass_fallthrough: true,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> CoeffResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> CoeffResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded engine config from {} ({} Hz, block {}, {}x oversampling)",
            path.display(),
            config.sample_rate,
            config.block_size,
            config.oversampling
        );
        Ok(config)
    }

    pub fn validate(&self) -> CoeffResult<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(CoeffError::InvalidConfig(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.block_size == 0 {
            return Err(CoeffError::InvalidConfig("block size must be non-zero".into()));
        }
        if self.oversampling == 0 {
            return Err(CoeffError::InvalidConfig(
                "oversampling factor must be non-zero".into(),
            ));
        }
        let taps = self.comb.interpolation_taps;
        for (name, length) in [
            ("max_length", self.comb.max_length),
            ("max_length_extended", self.comb.max_length_extended),
        ] {
            if length <= 2 * taps {
                return Err(CoeffError::InvalidConfig(format!(
                    "comb {} ({}) must exceed twice the interpolation width ({})",
                    name, length, taps
                )));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn sample_rate_inv(&self) -> f64 {
        1.0 / self.sample_rate as f64
    }

    #[inline]
    pub fn sample_rate_os(&self) -> f64 {
        self.sample_rate as f64 * self.oversampling as f64
    }

    #[inline]
    pub fn sample_rate_os_inv(&self) -> f64 {
        1.0 / self.sample_rate_os()
    }

    #[inline]
    pub fn block_size_os(&self) -> usize {
        self.block_size * self.oversampling
    }

    #[inline]
    pub fn block_size_os_inv(&self) -> f32 {
        1.0 / self.block_size_os() as f32
    }
}
