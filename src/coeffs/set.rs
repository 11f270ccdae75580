use std::ops::Index;

/// Number of coefficient slots shared by every topology.
pub const N_COEFFS: usize = 8;

/// Which builder or transform produced a [`CoefficientSet`], and therefore how its slots
/// are to be read by the per-sample stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoeffLayout {
    /// Nothing has been computed since the last reset.
    Empty,
    /// `k1, k2, q1, q2, v1, v2, v3, gain`
    NormalizedLattice,
    /// `ar, ai, scale, -, c1, c2, d, gain`
    CoupledForm,
    /// `F1, Q1, clip_damp, gain`
    StateVariable,
    /// `feedback_gain_comp, one_pole_coeff, feedback`
    MoogLadder,
    /// `delay_samples, feedback, dry_mix, wet_mix`
    Comb,
    /// `hold_rate, shape`
    SampleHold,
    /// Raw slots written by a delegated algorithm; layout private to that algorithm.
    Direct,
}

/// Slot indices for [`CoeffLayout::NormalizedLattice`].
pub mod lattice {
    pub const K1: usize = 0;
    pub const K2: usize = 1;
    pub const Q1: usize = 2;
    pub const Q2: usize = 3;
    pub const V1: usize = 4;
    pub const V2: usize = 5;
    pub const V3: usize = 6;
    pub const GAIN: usize = 7;
}

/// Slot indices for [`CoeffLayout::CoupledForm`].
pub mod coupled {
    pub const AR: usize = 0;
    pub const AI: usize = 1;
    pub const SCALE: usize = 2;
    pub const C1: usize = 4;
    pub const C2: usize = 5;
    pub const D: usize = 6;
    pub const GAIN: usize = 7;
}

/// A fixed array of coefficient slots tagged with the layout that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoefficientSet {
    layout: CoeffLayout,
    values: [f32; N_COEFFS],
}

impl CoefficientSet {
    pub const fn new(layout: CoeffLayout, values: [f32; N_COEFFS]) -> Self {
        Self { layout, values }
    }

    pub const fn zeroed(layout: CoeffLayout) -> Self {
        Self {
            layout,
            values: [0.0; N_COEFFS],
        }
    }

    /// Builds a set from the leading slots; the remainder is zero-filled.
    pub fn from_leading(layout: CoeffLayout, leading: &[f32]) -> Self {
        debug_assert!(leading.len() <= N_COEFFS);
        let mut values = [0.0; N_COEFFS];
        let n = leading.len().min(N_COEFFS);
        values[..n].copy_from_slice(&leading[..n]);
        Self { layout, values }
    }

    #[inline]
    pub fn layout(&self) -> CoeffLayout {
        self.layout
    }

    #[inline]
    pub fn values(&self) -> &[f32; N_COEFFS] {
        &self.values
    }

    #[inline]
    pub(crate) fn values_mut(&mut self) -> &mut [f32; N_COEFFS] {
        &mut self.values
    }

    #[inline]
    pub(crate) fn set_layout(&mut self, layout: CoeffLayout) {
        self.layout = layout;
    }

    /// Slots, but only if they were produced for `layout`.
    pub fn as_layout(&self, layout: CoeffLayout) -> Option<&[f32; N_COEFFS]> {
        (self.layout == layout).then_some(&self.values)
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

impl Default for CoefficientSet {
    fn default() -> Self {
        Self::zeroed(CoeffLayout::Empty)
    }
}

impl Index<usize> for CoefficientSet {
    type Output = f32;

    #[inline]
    fn index(&self, index: usize) -> &f32 {
        &self.values[index]
    }
}
