pub mod resonance;

pub use resonance::*;
