pub mod biquad;
pub mod coeffs;
pub mod config;
pub mod error;
pub mod filters;
pub mod traits;
pub mod tuning;
pub mod utils;

pub use coeffs::{CoeffLayout, CoefficientMaker, CoefficientSet, N_COEFFS};
pub use config::{CombConfig, EngineConfig, TuningMode};
pub use error::{CoeffError, CoeffResult};
pub use filters::{FilterContext, FilterRequest, FilterType, SiblingDesigner, SiblingRequest};
pub use traits::{CoefficientSink, PitchConverter, TuningTable};
pub use tuning::{EqualTemperament, ScaleTuning};
pub use utils::*;
