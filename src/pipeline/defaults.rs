use crate::alignment::anchor::{find_anchor, Anchor};
use crate::alignment::estimator::estimate_offset;
use crate::alignment::similarity::SimilarityScorer;
use crate::alignment::walker::walk_path;
use crate::config::AlignConfig;
use crate::error::AlignError;
use crate::pipeline::traits::{AnchorFinder, OffsetEstimator, PathWalker};
use crate::types::{Alignment, Chunk, MatchPoint};

pub struct WindowedAnchorFinder;

impl AnchorFinder for WindowedAnchorFinder {
    fn find_anchor(
        &self,
        track1: &[Chunk],
        track2: &[Chunk],
        scorer: &mut SimilarityScorer<'_>,
        config: &AlignConfig,
    ) -> Result<Anchor, AlignError> {
        find_anchor(track1, track2, scorer, config)
    }
}

pub struct GreedyWalker;

impl PathWalker for GreedyWalker {
    fn walk(
        &self,
        track1: &[Chunk],
        track2: &[Chunk],
        anchor: Anchor,
        scorer: &mut SimilarityScorer<'_>,
        config: &AlignConfig,
    ) -> Vec<MatchPoint> {
        walk_path(track1, track2, anchor, scorer, config)
    }
}

pub struct RobustOffsetEstimator;

impl OffsetEstimator for RobustOffsetEstimator {
    fn estimate(
        &self,
        path: Vec<MatchPoint>,
        track1: &[Chunk],
        track2: &[Chunk],
        config: &AlignConfig,
    ) -> Result<Alignment, AlignError> {
        estimate_offset(path, track1, track2, config)
    }
}
