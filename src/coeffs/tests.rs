use std::cell::RefCell;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::biquad::BiquadDescriptor;
use crate::config::{EngineConfig, TuningMode};
use crate::filters::{
    CoefficientDesigner, Comb, Cookbook, FilterContext, FilterRequest, FilterType, Poles, Quality,
    Shape, SiblingDesigner, SiblingRequest, StateVariable, VintageLadderModel, EXTENDED_COMB,
};
use crate::traits::CoefficientSink;
use crate::tuning::{EqualTemperament, ScaleTuning};

const EPSILON: f32 = 1e-5;

/// Every built-in type that goes through the biquad transforms.
const BIQUAD_TYPES: [FilterType; 9] = [
    FilterType::Lp12,
    FilterType::Lp24,
    FilterType::Hp12,
    FilterType::Hp24,
    FilterType::Bp12,
    FilterType::Bp24,
    FilterType::Notch12,
    FilterType::Notch24,
    FilterType::Allpass,
];

const QUALITIES: [Quality; 3] = [Quality::Rough, Quality::Smooth, Quality::Medium];

fn first_coeffs(
    config: &EngineConfig,
    ctx: &FilterContext,
    request: FilterRequest,
) -> CoefficientSet {
    let mut maker = CoefficientMaker::new(config).unwrap();
    maker.make_coeffs(&request, ctx, false);
    *maker.current()
}

fn assert_stable(set: &CoefficientSet, what: &str) {
    assert!(set.is_finite(), "{}: non-finite {:?}", what, set);
    match set.layout() {
        CoeffLayout::NormalizedLattice => {
            assert!(set[lattice::K1].abs() < 1.0, "{}: k1 {}", what, set[lattice::K1]);
            assert!(set[lattice::K2].abs() < 1.0, "{}: k2 {}", what, set[lattice::K2]);
        }
        CoeffLayout::CoupledForm => {
            assert!(set[coupled::AI] > 0.0, "{}: ai {}", what, set[coupled::AI]);
        }
        other => panic!("{}: unexpected layout {:?}", what, other),
    }
}

/// DC gain of a lattice set, rebuilt into direct form.
fn lattice_dc_gain(set: &CoefficientSet) -> f64 {
    let v = |i: usize| set[i] as f64;
    let (k1, k2, q1, q2) = (v(lattice::K1), v(lattice::K2), v(lattice::Q1), v(lattice::Q2));
    let (v1, v2, v3) = (v(lattice::V1), v(lattice::V2), v(lattice::V3));
    let a1 = k1 * (1.0 + k2);
    let a2 = k2;
    let b2 = v3;
    let b1 = v2 * q2 + a1 * v3;
    let b0 = v1 * q1 * q2 + k1 * v2 * q2 + k2 * v3;
    (b0 + b1 + b2) / (1.0 + a1 + a2)
}

#[test]
fn test_random_sweep_is_stable() {
    let config = EngineConfig::default();
    let pitch = EqualTemperament::new(&config);
    let ctx = FilterContext::new(&config, &pitch);
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..2000 {
        let filter_type = BIQUAD_TYPES[rng.random_range(0..BIQUAD_TYPES.len())];
        let subtype = QUALITIES[rng.random_range(0..QUALITIES.len())].index();
        let freq = rng.random_range(-80.0f32..100.0);
        let reso = rng.random_range(0.0f32..=1.0);
        let request = FilterRequest::new(freq, reso, filter_type, subtype);
        let set = first_coeffs(&config, &ctx, request);
        assert_stable(&set, &format!("{:?}", request));
    }
}

#[test]
fn test_stable_at_range_edges() {
    let config = EngineConfig::with_sample_rate(44100.0);
    let pitch = EqualTemperament::new(&config);
    let ctx = FilterContext::new(&config, &pitch);

    for filter_type in BIQUAD_TYPES {
        for quality in QUALITIES {
            for freq in [-55.0, 75.0] {
                for reso in [0.0, 1.0] {
                    let request = FilterRequest::new(freq, reso, filter_type, quality.index());
                    assert_stable(&first_coeffs(&config, &ctx, request), &format!("{:?}", request));
                }
            }
        }
    }
}

#[test]
fn test_frequency_bounding_is_exact() {
    let config = EngineConfig::default();
    let pitch = EqualTemperament::new(&config);
    let ctx = FilterContext::new(&config, &pitch);

    for filter_type in BIQUAD_TYPES {
        for quality in QUALITIES {
            let at = |freq: f32| {
                let request = FilterRequest::new(freq, 0.6, filter_type, quality.index());
                first_coeffs(&config, &ctx, request)
            };
            assert_eq!(at(90.0), at(75.0), "{:?} {:?}", filter_type, quality);
            assert_eq!(at(-90.0), at(-55.0), "{:?} {:?}", filter_type, quality);
        }
    }
}

#[test]
fn test_smoothing_converges_geometrically() {
    let config = EngineConfig::default();
    let pitch = EqualTemperament::new(&config);
    let ctx = FilterContext::new(&config, &pitch);
    let smooth = Quality::Smooth.index();

    let mut maker = CoefficientMaker::new(&config).unwrap();
    maker.make_coeffs(&FilterRequest::new(-10.0, 0.2, FilterType::Lp12, smooth), &ctx, false);
    let start = *maker.target();

    let request = FilterRequest::new(20.0, 0.7, FilterType::Lp12, smooth);
    let goal = Cookbook::new(Shape::Lowpass, Poles::Two, Quality::Smooth).design(20.0, 0.7, &ctx);

    let mut remaining = 1.0f32;
    for n in 1..=40 {
        maker.make_coeffs(&request, &ctx, false);
        remaining *= 1.0 - SMOOTHING;
        for i in 0..N_COEFFS {
            let span = start[i] - goal[i];
            let expected = goal[i] + remaining * span;
            let t = maker.target()[i];
            assert!((t - expected).abs() <= EPSILON * (1.0 + span.abs()), "slot {} after {}", i, n);
            // Never past the goal
            assert!((t - goal[i]) * span >= -EPSILON, "slot {} overshoots after {}", i, n);
        }
    }
}

#[test]
fn test_repeated_request_settles() {
    let config = EngineConfig::default();
    let pitch = EqualTemperament::new(&config);
    let ctx = FilterContext::new(&config, &pitch);
    let request = FilterRequest::new(0.0, 0.5, FilterType::Lp12, Quality::Smooth.index());

    let mut maker = CoefficientMaker::new(&config).unwrap();
    maker.make_coeffs(&FilterRequest::new(30.0, 0.0, FilterType::Lp12, 2), &ctx, false);
    for _ in 0..200 {
        maker.make_coeffs(&request, &ctx, false);
        maker.advance(config.block_size_os());
    }

    let goal = Cookbook::new(Shape::Lowpass, Poles::Two, Quality::Smooth).design(0.0, 0.5, &ctx);
    for i in 0..N_COEFFS {
        assert_relative_eq!(maker.target()[i], goal[i], epsilon = EPSILON);
        assert_relative_eq!(maker.current()[i], goal[i], epsilon = EPSILON);
        assert!(maker.delta()[i].abs() < 1e-7);
    }
    // Passband gain compensation survives the lattice encoding
    assert_relative_eq!(lattice_dc_gain(maker.current()), 0.9375, epsilon = 5e-3);
}

#[test]
fn test_zero_resonance_map_keeps_smoother_finite() {
    let config = EngineConfig::default();
    let pitch = EqualTemperament::new(&config);
    let ctx = FilterContext::new(&config, &pitch);
    let medium = Quality::Medium.index();

    let mut maker = CoefficientMaker::new(&config).unwrap();
    maker.make_coeffs(&FilterRequest::new(0.0, 0.5, FilterType::Bp12, medium), &ctx, false);
    // Medium derating at note 60 drives the 2-pole map to zero at full resonance
    maker.make_coeffs(&FilterRequest::new(60.0, 1.0, FilterType::Bp12, medium), &ctx, false);
    assert!(maker.target().is_finite(), "{:?}", maker.target());
    assert!(maker.delta().iter().all(|d| d.is_finite()));

    for _ in 0..100 {
        maker.make_coeffs(&FilterRequest::new(0.0, 0.5, FilterType::Bp12, medium), &ctx, false);
        maker.advance(config.block_size_os());
    }
    assert!(maker.target().is_finite());
    assert!(maker.current().is_finite());
    assert_stable(maker.current(), "Bp12 Medium after note 60");
}

#[test]
fn test_svf_q1_at_high_note() {
    let config = EngineConfig::default();
    let pitch = EqualTemperament::new(&config);
    let ctx = FilterContext::new(&config, &pitch);

    for filter_type in [FilterType::Lp12, FilterType::Lp24, FilterType::Hp24, FilterType::Bp24] {
        let set = first_coeffs(&config, &ctx, FilterRequest::new(80.0, 1.0, filter_type, 0));
        assert_eq!(set.layout(), CoeffLayout::StateVariable);
        let f1 = set[0];
        assert!(set[1] >= 0.0);
        assert!(set[1] <= 2.0 - 1.52 * f1 + EPSILON);
    }
}

#[test]
fn test_comb_delay_bounds() {
    let config = EngineConfig::default();
    let pitch = EqualTemperament::new(&config);
    let ctx = FilterContext::new(&config, &pitch);
    let mut rng = StdRng::seed_from_u64(7);
    let taps = config.comb.interpolation_taps as f32;

    for _ in 0..1000 {
        let extended = rng.random_bool(0.5);
        let subtype = rng.random_range(0..4) | if extended { EXTENDED_COMB } else { 0 };
        let filter_type = if rng.random_bool(0.5) {
            FilterType::CombPositive
        } else {
            FilterType::CombNegative
        };
        let freq = rng.random_range(-150.0f32..150.0);
        let reso = rng.random_range(-3.0f32..3.0);
        let set = first_coeffs(&config, &ctx, FilterRequest::new(freq, reso, filter_type, subtype));

        let length = if extended {
            config.comb.max_length_extended
        } else {
            config.comb.max_length
        } as f32;
        assert_eq!(set.layout(), CoeffLayout::Comb);
        assert!(set[0] >= taps && set[0] <= length - taps, "delay {}", set[0]);
        let limit = if extended { 2.0 } else { 1.0 };
        assert!(set[1].abs() <= limit);
        assert_eq!(Comb::new(subtype).delay_range(&ctx), (taps, length - taps));
    }
}

#[test]
fn test_bandpass_fallthrough_smooths_both_sets() {
    let config = EngineConfig::default();
    let pitch = EqualTemperament::new(&config);
    let ctx = FilterContext::new(&config, &pitch);
    let request = FilterRequest::new(5.0, 0.4, FilterType::Bp12, Quality::Medium.index());

    let own = Cookbook::new(Shape::Bandpass, Poles::Two, Quality::Medium).design(5.0, 0.4, &ctx);
    let wide = Cookbook::new(Shape::Bandpass, Poles::Four, Quality::Medium).design(5.0, 0.4, &ctx);

    let mut maker = CoefficientMaker::new(&config).unwrap();
    maker.make_coeffs(&request, &ctx, false);
    assert_eq!(maker.current(), &own);
    for i in 0..N_COEFFS {
        let blended = (1.0 - SMOOTHING) * own[i] + SMOOTHING * wide[i];
        assert_relative_eq!(maker.target()[i], blended, epsilon = EPSILON);
    }

    let config = EngineConfig {
        legacy_bandpass_fallthrough: false,
        ..EngineConfig::default()
    };
    let ctx = FilterContext::new(&config, &pitch);
    let mut maker = CoefficientMaker::new(&config).unwrap();
    maker.make_coeffs(&request, &ctx, false);
    assert_eq!(maker.target(), &own);
}

#[test]
fn test_svf_subtype_matches_direct_design() {
    let config = EngineConfig::default();
    let pitch = EqualTemperament::new(&config);
    let ctx = FilterContext::new(&config, &pitch);

    let lp24 = first_coeffs(&config, &ctx, FilterRequest::new(12.0, 0.5, FilterType::Lp24, 0));
    assert_eq!(lp24, StateVariable::new(true).design(12.0, 0.5, &ctx));
    let hp12 = first_coeffs(&config, &ctx, FilterRequest::new(12.0, 0.5, FilterType::Hp12, 0));
    assert_eq!(hp12, StateVariable::new(false).design(12.0, 0.5, &ctx));
}

#[test]
fn test_inactive_type_leaves_coefficients() {
    let config = EngineConfig::default();
    let pitch = EqualTemperament::new(&config);
    let ctx = FilterContext::new(&config, &pitch);

    let mut maker = CoefficientMaker::new(&config).unwrap();
    maker.make_coeffs(&FilterRequest::new(0.0, 0.5, FilterType::None, 0), &ctx, false);
    assert!(maker.is_first_run());

    maker.make_coeffs(&FilterRequest::new(0.0, 0.5, FilterType::LpMoog, 0), &ctx, false);
    let before = (*maker.current(), *maker.target(), *maker.delta());
    maker.make_coeffs(&FilterRequest::new(40.0, 0.9, FilterType::None, 0), &ctx, false);
    // Delegated families without a designer behave the same way
    maker.make_coeffs(&FilterRequest::new(40.0, 0.9, FilterType::DiodeLadder, 0), &ctx, false);
    assert_eq!((*maker.current(), *maker.target(), *maker.delta()), before);
}

#[test]
fn test_tuning_remap_follows_table() {
    let config = EngineConfig::default();
    let pitch = EqualTemperament::new(&config);
    // Quarter tones around A4
    let cents: Vec<f64> = (1..=24).map(|i| i as f64 * 50.0).collect();
    let quarter = ScaleTuning::new(&cents, 69, 440.0).unwrap();
    let ctx = FilterContext::new(&config, &pitch).with_tuning(&quarter);
    let plain = FilterContext::new(&config, &pitch);
    let request = FilterRequest::new(3.0, 0.3, FilterType::Lp12, Quality::Smooth.index());

    let untuned = first_coeffs(&config, &plain, request);
    // tuning_adjusted = false bypasses the table
    let mut maker = CoefficientMaker::new(&config).unwrap();
    maker.make_coeffs(&request, &ctx, false);
    assert_eq!(maker.current(), &untuned);

    // 150 cents above A4 is 1.5 semitones
    let mut maker = CoefficientMaker::new(&config).unwrap();
    maker.make_coeffs(&request, &ctx, true);
    assert_ne!(maker.current(), &untuned);
    let expected = first_coeffs(&config, &plain, FilterRequest { frequency: 1.5, ..request });
    for i in 0..N_COEFFS {
        assert_relative_eq!(maker.current()[i], expected[i], epsilon = EPSILON);
    }

    // Only retune_all touches filter cutoffs
    let midi_only = EngineConfig {
        tuning_mode: TuningMode::RetuneMidiOnly,
        ..EngineConfig::default()
    };
    let ctx = FilterContext::new(&midi_only, &pitch).with_tuning(&quarter);
    let mut maker = CoefficientMaker::new(&midi_only).unwrap();
    maker.make_coeffs(&request, &ctx, true);
    assert_eq!(maker.current(), &untuned);
}

#[test]
fn test_equal_temperament_table_is_identity() {
    let config = EngineConfig::default();
    let pitch = EqualTemperament::new(&config);
    let tet = ScaleTuning::equal_temperament();
    let tuned = FilterContext::new(&config, &pitch).with_tuning(&tet);
    let plain = FilterContext::new(&config, &pitch);

    for freq in [-30.25, 0.0, 7.5, 41.9] {
        let request = FilterRequest::new(freq, 0.5, FilterType::Hp24, Quality::Rough.index());
        let mut maker = CoefficientMaker::new(&config).unwrap();
        maker.make_coeffs(&request, &tuned, true);
        let expected = first_coeffs(&config, &plain, request);
        for i in 0..N_COEFFS {
            assert_relative_eq!(maker.current()[i], expected[i], epsilon = EPSILON);
        }
    }
}

/// Records what the dispatcher hands over and answers with a fixed section.
#[derive(Default)]
struct RecordingSiblings {
    calls: RefCell<Vec<(SiblingRequest, f32, f32)>>,
}

impl SiblingDesigner for RecordingSiblings {
    fn make_coefficients(
        &self,
        sink: &mut dyn CoefficientSink,
        request: &SiblingRequest,
        frequency: f32,
        resonance: f32,
        ctx: &FilterContext,
    ) {
        self.calls.borrow_mut().push((*request, frequency, resonance));
        let (sin, cos) = ctx.pitch.note_to_omega_ignoring_tuning(frequency as f64);
        let omega = crate::biquad::Omega::new(sin, cos);
        sink.to_coupled_form(&BiquadDescriptor::lowpass(omega, sin * 0.5));
    }
}

#[test]
fn test_sibling_delegation() {
    let config = EngineConfig::default();
    let pitch = EqualTemperament::new(&config);
    let siblings = RecordingSiblings::default();
    let ctx = FilterContext::new(&config, &pitch).with_siblings(&siblings);

    let mut maker = CoefficientMaker::new(&config).unwrap();
    maker.make_coeffs(&FilterRequest::new(-3.0, 0.25, FilterType::VintageLadder, 1), &ctx, false);
    assert_eq!(maker.current().layout(), CoeffLayout::CoupledForm);
    assert!(!maker.is_first_run());

    maker.make_coeffs(&FilterRequest::new(2.0, 0.5, FilterType::ObxdTwoPoleBp, 2), &ctx, false);
    maker.make_coeffs(&FilterRequest::new(2.0, 0.5, FilterType::K35Lp, 4), &ctx, false);
    // Out-of-range subtypes never reach the sibling
    maker.make_coeffs(&FilterRequest::new(2.0, 0.5, FilterType::K35Lp, 5), &ctx, false);
    maker.make_coeffs(&FilterRequest::new(2.0, 0.5, FilterType::CutoffWarpBp, 3), &ctx, false);

    let calls = siblings.calls.borrow();
    assert_eq!(calls.len(), 4);
    assert_eq!(
        calls[0],
        (
            SiblingRequest::VintageLadder {
                model: VintageLadderModel::RungeKutta,
                gain_compensation: true
            },
            -3.0,
            0.25
        )
    );
    assert!(matches!(calls[1].0, SiblingRequest::Obxd { mode: 9, .. }));
    assert_eq!(
        calls[2].0,
        SiblingRequest::K35 {
            lowpass: true,
            saturation: 4.0
        }
    );
    assert_eq!(
        calls[3].0,
        SiblingRequest::CutoffWarp {
            filter_type: FilterType::CutoffWarpBp,
            subtype: 3
        }
    );
}
