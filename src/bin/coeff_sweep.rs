//! Sweeps every built-in filter type over cutoff and resonance and reports any
//! coefficient set that is non-finite or outside its stability bounds.
//!
//! Usage: `coeff_sweep [config.json]`

use anyhow::{bail, Context};
use filter_coeffs::coeffs::{coupled, lattice};
use filter_coeffs::filters::EXTENDED_COMB;
use filter_coeffs::{
    CoeffLayout, CoefficientMaker, CoefficientSet, EngineConfig, EqualTemperament,
    FilterContext, FilterRequest, FilterType,
};

const FREQ_STEPS: usize = 131;
const RESO_STEPS: usize = 21;

fn stability_problem(set: &CoefficientSet) -> Option<String> {
    if !set.is_finite() {
        return Some("non-finite coefficient".to_string());
    }
    match set.layout() {
        CoeffLayout::NormalizedLattice => {
            let (k1, k2) = (set[lattice::K1], set[lattice::K2]);
            (k1.abs() >= 1.0 || k2.abs() >= 1.0).then(|| format!("k1 {} k2 {}", k1, k2))
        }
        CoeffLayout::CoupledForm => {
            let ai = set[coupled::AI];
            (ai <= 0.0).then(|| format!("ai {}", ai))
        }
        CoeffLayout::StateVariable => (set[1] < 0.0).then(|| format!("Q1 {}", set[1])),
        _ => None,
    }
}

fn subtypes(filter_type: FilterType) -> &'static [i32] {
    match filter_type {
        FilterType::Lp12
        | FilterType::Lp24
        | FilterType::Hp12
        | FilterType::Hp24
        | FilterType::Bp12
        | FilterType::Bp24 => &[0, 1, 2, 3],
        FilterType::Notch12 | FilterType::Notch24 => &[0, 1],
        FilterType::CombPositive | FilterType::CombNegative => {
            &[0, 1, EXTENDED_COMB, EXTENDED_COMB | 1]
        }
        _ => &[0],
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(&path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => EngineConfig::default(),
    };
    let pitch = EqualTemperament::new(&config);
    let ctx = FilterContext::new(&config, &pitch);

    let mut checked = 0usize;
    let mut failures = 0usize;

    for filter_type in FilterType::ALL {
        for &subtype in subtypes(filter_type) {
            for fi in 0..FREQ_STEPS {
                let frequency = -60.0 + fi as f32;
                for ri in 0..RESO_STEPS {
                    let resonance = ri as f32 / (RESO_STEPS - 1) as f32;
                    let mut maker = CoefficientMaker::new(&config)?;
                    maker.make_coeffs(
                        &FilterRequest::new(frequency, resonance, filter_type, subtype),
                        &ctx,
                        false,
                    );
                    if maker.is_first_run() {
                        // Inactive or delegated without a designer
                        continue;
                    }
                    checked += 1;
                    if let Some(problem) = stability_problem(maker.current()) {
                        failures += 1;
                        log::error!(
                            "{:?}/{} at note {} reso {}: {}",
                            filter_type,
                            subtype,
                            frequency,
                            resonance,
                            problem
                        );
                    }
                }
            }
        }
    }

    println!("Checked {} coefficient sets, {} unstable", checked, failures);
    if failures > 0 {
        bail!("{} unstable coefficient sets", failures);
    }
    Ok(())
}
