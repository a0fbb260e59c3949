use crate::config::AlignConfig;
use crate::error::AlignError;
use crate::pipeline::defaults::{GreedyWalker, RobustOffsetEstimator, WindowedAnchorFinder};
use crate::pipeline::runtime::{PhoneticAligner, PhoneticAlignerParts};
use crate::pipeline::traits::{AnchorFinder, OffsetEstimator, PathWalker};

pub struct PhoneticAlignerBuilder {
    config: AlignConfig,
    anchor_finder: Option<Box<dyn AnchorFinder>>,
    path_walker: Option<Box<dyn PathWalker>>,
    offset_estimator: Option<Box<dyn OffsetEstimator>>,
}

impl PhoneticAlignerBuilder {
    pub fn new(config: AlignConfig) -> Self {
        Self {
            config,
            anchor_finder: None,
            path_walker: None,
            offset_estimator: None,
        }
    }

    pub fn with_anchor_finder(mut self, anchor_finder: Box<dyn AnchorFinder>) -> Self {
        self.anchor_finder = Some(anchor_finder);
        self
    }

    pub fn with_path_walker(mut self, path_walker: Box<dyn PathWalker>) -> Self {
        self.path_walker = Some(path_walker);
        self
    }

    pub fn with_offset_estimator(mut self, offset_estimator: Box<dyn OffsetEstimator>) -> Self {
        self.offset_estimator = Some(offset_estimator);
        self
    }

    pub fn build(self) -> Result<PhoneticAligner, AlignError> {
        self.config.validate()?;
        Ok(PhoneticAligner::from_parts(PhoneticAlignerParts {
            config: self.config,
            anchor_finder: self
                .anchor_finder
                .unwrap_or_else(|| Box::new(WindowedAnchorFinder)),
            path_walker: self.path_walker.unwrap_or_else(|| Box::new(GreedyWalker)),
            offset_estimator: self
                .offset_estimator
                .unwrap_or_else(|| Box::new(RobustOffsetEstimator)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_build() {
        let aligner = PhoneticAlignerBuilder::new(AlignConfig::default()).build();
        assert!(aligner.is_ok());
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let config = AlignConfig {
            min_path_length: 0,
            ..AlignConfig::default()
        };
        let err = PhoneticAlignerBuilder::new(config)
            .build()
            .expect_err("invalid config");
        assert_eq!(err.reason(), "invalid_input");
    }
}
