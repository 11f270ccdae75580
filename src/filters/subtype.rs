//! Subtype integers are local to each filter type. These views decode the raw value for
//! the families that share a meaning.

/// Character variant of the 12/24 dB cookbook filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quality {
    /// Realize the slot with the state-variable filter instead.
    Svf,
    /// Clamped poles, frequency-dependent drive.
    Rough,
    /// Self-limiting resonance curve, lattice realization.
    Smooth,
    /// Clamped poles, stronger gain compensation.
    Medium,
}

impl Quality {
    /// Unknown values fall back to `Smooth`, the default resonance curve.
    pub fn from_subtype(subtype: i32) -> Self {
        match subtype {
            0 => Quality::Svf,
            1 => Quality::Rough,
            3 => Quality::Medium,
            _ => Quality::Smooth,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            Quality::Svf => 0,
            Quality::Rough => 1,
            Quality::Smooth => 2,
            Quality::Medium => 3,
        }
    }

    /// Whether the builder must clamp alpha to keep the poles complex.
    #[inline]
    pub fn clamps_poles(self) -> bool {
        self != Quality::Smooth
    }
}

/// Notch depth variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotchDepth {
    Regular,
    Mild,
}

impl NotchDepth {
    pub fn from_subtype(subtype: i32) -> Self {
        if subtype == 1 {
            NotchDepth::Mild
        } else {
            NotchDepth::Regular
        }
    }
}

/// Flag bit marking a comb used outside the filter bank, with a longer line and a wider
/// feedback range.
pub const EXTENDED_COMB: i32 = 1 << 9;
/// Mask recovering the comb subtype from a flagged value.
pub const UNMASK_SUBTYPE: i32 = 0xFF;

/// Decoded comb subtype bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombMode {
    /// bit0: only the wet path is heard
    pub wet_only: bool,
    /// bit1: feedback polarity is inverted
    pub negative: bool,
    pub extended: bool,
}

impl CombMode {
    pub fn from_subtype(subtype: i32) -> Self {
        let bits = subtype & UNMASK_SUBTYPE;
        Self {
            wet_only: bits & 1 != 0,
            negative: bits & 2 != 0,
            extended: subtype & EXTENDED_COMB != 0,
        }
    }
}
