use crate::config::{EngineConfig, TuningMode};
use crate::traits::{PitchConverter, TuningTable};

use super::SiblingDesigner;

/// Everything a builder may read besides the request itself.
///
/// The maker holds no references between calls; the context is assembled per call by the
/// voice that owns the filter.
#[derive(Clone, Copy)]
pub struct FilterContext<'a> {
    pub config: &'a EngineConfig,
    pub pitch: &'a dyn PitchConverter,
    pub tuning: Option<&'a dyn TuningTable>,
    pub siblings: Option<&'a dyn SiblingDesigner>,
}

impl<'a> FilterContext<'a> {
    pub fn new(config: &'a EngineConfig, pitch: &'a dyn PitchConverter) -> Self {
        Self {
            config,
            pitch,
            tuning: None,
            siblings: None,
        }
    }

    pub fn with_tuning(mut self, tuning: &'a dyn TuningTable) -> Self {
        self.tuning = Some(tuning);
        self
    }

    pub fn with_siblings(mut self, siblings: &'a dyn SiblingDesigner) -> Self {
        self.siblings = Some(siblings);
        self
    }

    /// The table to remap cutoffs through, if the session retunes filters at all.
    pub fn filter_tuning(&self) -> Option<&'a dyn TuningTable> {
        match self.config.tuning_mode {
            TuningMode::RetuneAll => self.tuning,
            TuningMode::Ignore | TuningMode::RetuneMidiOnly => None,
        }
    }
}

impl std::fmt::Debug for FilterContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterContext")
            .field("config", self.config)
            .field("tuning", &self.tuning.is_some())
            .field("siblings", &self.siblings.is_some())
            .finish()
    }
}
