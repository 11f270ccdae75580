mod comb;
mod context;
mod cookbook;
mod delegate;
mod ladder;
mod sample_hold;
mod subtype;
mod svf;

use serde::{Deserialize, Serialize};

use crate::coeffs::CoefficientSet;
use crate::error::CoeffError;

pub use comb::Comb;
pub use context::FilterContext;
pub use cookbook::{Allpass, Cookbook, Notch, Poles, Shape};
pub use delegate::{ObxdPoles, SiblingDesigner, SiblingRequest, VintageLadderModel, K35_SATURATIONS};
pub use ladder::MoogLadder;
pub use sample_hold::SampleHold;
pub use subtype::{CombMode, NotchDepth, Quality, EXTENDED_COMB, UNMASK_SUBTYPE};
pub use svf::StateVariable;

/// Filter families. The integer numbering (see [`FilterType::index`]) is stable and is
/// what patches store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterType {
    None,
    Lp12,
    Lp24,
    Hp12,
    Hp24,
    Bp12,
    Bp24,
    Notch12,
    Notch24,
    Allpass,
    LpMoog,
    CombPositive,
    CombNegative,
    SampleHold,
    VintageLadder,
    ObxdTwoPoleLp,
    ObxdTwoPoleBp,
    ObxdTwoPoleHp,
    ObxdTwoPoleNotch,
    ObxdFourPole,
    K35Lp,
    K35Hp,
    DiodeLadder,
    CutoffWarpLp,
    CutoffWarpHp,
    CutoffWarpNotch,
    CutoffWarpBp,
    CutoffWarpAllpass,
    ResonanceWarpLp,
    ResonanceWarpHp,
    ResonanceWarpNotch,
    ResonanceWarpBp,
    ResonanceWarpAllpass,
}

impl FilterType {
    pub const ALL: [FilterType; 33] = [
        FilterType::None,
        FilterType::Lp12,
        FilterType::Lp24,
        FilterType::Hp12,
        FilterType::Hp24,
        FilterType::Bp12,
        FilterType::Bp24,
        FilterType::Notch12,
        FilterType::Notch24,
        FilterType::Allpass,
        FilterType::LpMoog,
        FilterType::CombPositive,
        FilterType::CombNegative,
        FilterType::SampleHold,
        FilterType::VintageLadder,
        FilterType::ObxdTwoPoleLp,
        FilterType::ObxdTwoPoleBp,
        FilterType::ObxdTwoPoleHp,
        FilterType::ObxdTwoPoleNotch,
        FilterType::ObxdFourPole,
        FilterType::K35Lp,
        FilterType::K35Hp,
        FilterType::DiodeLadder,
        FilterType::CutoffWarpLp,
        FilterType::CutoffWarpHp,
        FilterType::CutoffWarpNotch,
        FilterType::CutoffWarpBp,
        FilterType::CutoffWarpAllpass,
        FilterType::ResonanceWarpLp,
        FilterType::ResonanceWarpHp,
        FilterType::ResonanceWarpNotch,
        FilterType::ResonanceWarpBp,
        FilterType::ResonanceWarpAllpass,
    ];

    pub fn index(self) -> i32 {
        self as i32
    }

    /// Resolve this type and a raw subtype into the design that computes its coefficients.
    ///
    /// The SVF subtype borrows most 12/24 dB slots, so it is decided here rather than by a
    /// separate type. `bandpass_fallthrough` makes Bp12 run the Bp24 design after its own.
    pub fn topology(self, subtype: i32, bandpass_fallthrough: bool) -> Topology {
        use FilterType::*;

        let quality = Quality::from_subtype(subtype);
        let cookbook = |shape: Shape, poles: Poles, svf_four_pole: bool| {
            if quality == Quality::Svf {
                NativeDesign::StateVariable(StateVariable::new(svf_four_pole))
            } else {
                NativeDesign::Cookbook(Cookbook::new(shape, poles, quality))
            }
        };

        match self {
            None => Topology::Inactive,
            Lp12 => Topology::Native(cookbook(Shape::Lowpass, Poles::Two, false)),
            Lp24 => Topology::Native(cookbook(Shape::Lowpass, Poles::Four, true)),
            Hp12 => Topology::Native(cookbook(Shape::Highpass, Poles::Two, false)),
            Hp24 => Topology::Native(cookbook(Shape::Highpass, Poles::Four, true)),
            Bp12 => {
                let own = cookbook(Shape::Bandpass, Poles::Two, false);
                if bandpass_fallthrough {
                    Topology::Sequence(own, cookbook(Shape::Bandpass, Poles::Four, false))
                } else {
                    Topology::Native(own)
                }
            }
            // Bp24 has always used the 2-pole SVF overshoot
            Bp24 => Topology::Native(cookbook(Shape::Bandpass, Poles::Four, false)),
            Notch12 | Notch24 => Topology::Native(NativeDesign::Notch(Notch::new(
                NotchDepth::from_subtype(subtype),
            ))),
            Allpass => Topology::Native(NativeDesign::Allpass(self::Allpass)),
            LpMoog => Topology::Native(NativeDesign::MoogLadder(MoogLadder)),
            CombPositive => Topology::Native(NativeDesign::Comb(Comb::new(subtype))),
            CombNegative => Topology::Native(NativeDesign::Comb(Comb::new(subtype + 2))),
            SampleHold => Topology::Native(NativeDesign::SampleHold(self::SampleHold)),
            VintageLadder => match subtype {
                0 | 1 => Topology::Delegated(SiblingRequest::VintageLadder {
                    model: VintageLadderModel::RungeKutta,
                    gain_compensation: subtype == 1,
                }),
                2 | 3 => Topology::Delegated(SiblingRequest::VintageLadder {
                    model: VintageLadderModel::Huovilainen,
                    gain_compensation: subtype == 3,
                }),
                _ => Topology::Inactive,
            },
            // The 2-pole OBXD modes are interleaved with the "+" variant in the subtype
            ObxdTwoPoleLp => obxd(ObxdPoles::Two, subtype * 4),
            ObxdTwoPoleBp => obxd(ObxdPoles::Two, subtype * 4 + 1),
            ObxdTwoPoleHp => obxd(ObxdPoles::Two, subtype * 4 + 2),
            ObxdTwoPoleNotch => obxd(ObxdPoles::Two, subtype * 4 + 3),
            ObxdFourPole => obxd(ObxdPoles::Four, subtype),
            K35Lp | K35Hp => match usize::try_from(subtype)
                .ok()
                .and_then(|i| K35_SATURATIONS.get(i))
            {
                Some(&saturation) => Topology::Delegated(SiblingRequest::K35 {
                    lowpass: self == K35Lp,
                    saturation,
                }),
                Option::None => Topology::Inactive,
            },
            DiodeLadder => Topology::Delegated(SiblingRequest::DiodeLadder),
            CutoffWarpLp | CutoffWarpHp | CutoffWarpNotch | CutoffWarpBp | CutoffWarpAllpass => {
                Topology::Delegated(SiblingRequest::CutoffWarp {
                    filter_type: self,
                    subtype,
                })
            }
            ResonanceWarpLp
            | ResonanceWarpHp
            | ResonanceWarpNotch
            | ResonanceWarpBp
            | ResonanceWarpAllpass => {
                Topology::Delegated(SiblingRequest::ResonanceWarp { filter_type: self })
            }
        }
    }
}

fn obxd(poles: ObxdPoles, mode: i32) -> Topology {
    Topology::Delegated(SiblingRequest::Obxd { poles, mode })
}

impl TryFrom<i32> for FilterType {
    type Error = CoeffError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|i| FilterType::ALL.get(i).copied())
            .ok_or(CoeffError::UnknownFilterType(value))
    }
}

/// One control-rate request for new coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterRequest {
    /// Cutoff as a note relative to A440.
    pub frequency: f32,
    /// Normally 0..1; extended combs accept -2..2.
    pub resonance: f32,
    pub filter_type: FilterType,
    /// Variant whose meaning is local to `filter_type`.
    pub subtype: i32,
}

impl FilterRequest {
    pub fn new(frequency: f32, resonance: f32, filter_type: FilterType, subtype: i32) -> Self {
        Self {
            frequency,
            resonance,
            filter_type,
            subtype,
        }
    }
}

/// A family that computes a full coefficient set from cutoff and resonance.
pub trait CoefficientDesigner {
    fn design(&self, frequency: f32, resonance: f32, ctx: &FilterContext) -> CoefficientSet;
}

/// Built-in designs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NativeDesign {
    StateVariable(StateVariable),
    Cookbook(Cookbook),
    Notch(Notch),
    Allpass(Allpass),
    MoogLadder(MoogLadder),
    Comb(Comb),
    SampleHold(SampleHold),
}

impl CoefficientDesigner for NativeDesign {
    fn design(&self, frequency: f32, resonance: f32, ctx: &FilterContext) -> CoefficientSet {
        match self {
            NativeDesign::StateVariable(d) => d.design(frequency, resonance, ctx),
            NativeDesign::Cookbook(d) => d.design(frequency, resonance, ctx),
            NativeDesign::Notch(d) => d.design(frequency, resonance, ctx),
            NativeDesign::Allpass(d) => d.design(frequency, resonance, ctx),
            NativeDesign::MoogLadder(d) => d.design(frequency, resonance, ctx),
            NativeDesign::Comb(d) => d.design(frequency, resonance, ctx),
            NativeDesign::SampleHold(d) => d.design(frequency, resonance, ctx),
        }
    }
}

/// How a (type, subtype) pair gets its coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Topology {
    /// Nothing is computed; the previous coefficients stay in place.
    Inactive,
    Native(NativeDesign),
    /// Both designs run in order, each passing through smoothing.
    Sequence(NativeDesign, NativeDesign),
    /// Computed by a sibling algorithm writing into the maker.
    Delegated(SiblingRequest),
}
