use crate::alignment::anchor::Anchor;
use crate::alignment::similarity::SimilarityScorer;
use crate::config::AlignConfig;
use crate::error::AlignError;
use crate::types::{Alignment, Chunk, MatchPoint};

pub trait AnchorFinder: Send + Sync {
    fn find_anchor(
        &self,
        track1: &[Chunk],
        track2: &[Chunk],
        scorer: &mut SimilarityScorer<'_>,
        config: &AlignConfig,
    ) -> Result<Anchor, AlignError>;
}

pub trait PathWalker: Send + Sync {
    fn walk(
        &self,
        track1: &[Chunk],
        track2: &[Chunk],
        anchor: Anchor,
        scorer: &mut SimilarityScorer<'_>,
        config: &AlignConfig,
    ) -> Vec<MatchPoint>;
}

pub trait OffsetEstimator: Send + Sync {
    fn estimate(
        &self,
        path: Vec<MatchPoint>,
        track1: &[Chunk],
        track2: &[Chunk],
        config: &AlignConfig,
    ) -> Result<Alignment, AlignError>;
}
