//! Filter families whose coefficients are computed outside this crate.
//!
//! The dispatcher only translates the subtype into each family's own arguments; the
//! family then writes through the [`CoefficientSink`] it is handed, so its results get
//! the same smoothing as the built-in designs.

use serde::{Deserialize, Serialize};

use crate::traits::CoefficientSink;

use super::{FilterContext, FilterType};

/// Saturation amount for each K35 subtype.
pub const K35_SATURATIONS: [f32; 5] = [0.0, 1.0, 2.0, 3.0, 4.0];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VintageLadderModel {
    RungeKutta,
    Huovilainen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObxdPoles {
    Two,
    Four,
}

/// Arguments for a delegated family, already translated from the raw subtype.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SiblingRequest {
    VintageLadder {
        model: VintageLadderModel,
        gain_compensation: bool,
    },
    /// `mode` is the family's own index: for two poles `subtype * 4 + {lp, bp, hp, notch}`,
    /// for four poles the subtype itself.
    Obxd { poles: ObxdPoles, mode: i32 },
    K35 { lowpass: bool, saturation: f32 },
    DiodeLadder,
    CutoffWarp { filter_type: FilterType, subtype: i32 },
    ResonanceWarp { filter_type: FilterType },
}

/// Implemented by whatever hosts the delegated families.
pub trait SiblingDesigner {
    /// Compute coefficients for `request` and hand them to `sink`. Implementations that
    /// do not know the family leave the sink untouched.
    fn make_coefficients(
        &self,
        sink: &mut dyn CoefficientSink,
        request: &SiblingRequest,
        frequency: f32,
        resonance: f32,
        ctx: &FilterContext,
    );
}
