mod biquad;
mod transform;

pub use biquad::{BiquadDescriptor, Omega};
pub use transform::{to_coupled_form, to_normalized_lattice, Realization};
