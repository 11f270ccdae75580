mod maker;
mod set;

#[cfg(test)]
mod tests;

pub use maker::{retune_frequency, CoefficientMaker, SMOOTHING};
pub use set::{coupled, lattice, CoeffLayout, CoefficientSet, N_COEFFS};
