use crate::alignment::similarity::SimilarityScorer;
use crate::config::AlignConfig;
use crate::error::AlignError;
use crate::pipeline::builder::PhoneticAlignerBuilder;
use crate::pipeline::traits::{AnchorFinder, OffsetEstimator, PathWalker};
use crate::types::{Alignment, Chunk};

/// Facade composing anchor search, the greedy walk, and the offset
/// estimate. One `align` call is a synchronous, CPU-bound function with no
/// shared mutable state, so a single aligner can serve many threads.
pub struct PhoneticAligner {
    config: AlignConfig,
    anchor_finder: Box<dyn AnchorFinder>,
    path_walker: Box<dyn PathWalker>,
    offset_estimator: Box<dyn OffsetEstimator>,
}

impl std::fmt::Debug for PhoneticAligner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhoneticAligner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

pub(crate) struct PhoneticAlignerParts {
    pub config: AlignConfig,
    pub anchor_finder: Box<dyn AnchorFinder>,
    pub path_walker: Box<dyn PathWalker>,
    pub offset_estimator: Box<dyn OffsetEstimator>,
}

impl PhoneticAligner {
    pub(crate) fn from_parts(parts: PhoneticAlignerParts) -> Self {
        Self {
            config: parts.config,
            anchor_finder: parts.anchor_finder,
            path_walker: parts.path_walker,
            offset_estimator: parts.offset_estimator,
        }
    }

    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    /// Estimates the offset that aligns `track2` with `track1`.
    pub fn align(&self, track1: &[Chunk], track2: &[Chunk]) -> Result<Alignment, AlignError> {
        validate_track("track1", track1)?;
        validate_track("track2", track2)?;

        // The similarity memo lives exactly as long as this call.
        let mut scorer =
            SimilarityScorer::new(track1, track2, self.config.speaker_mismatch_penalty);
        let anchor = self
            .anchor_finder
            .find_anchor(track1, track2, &mut scorer, &self.config)?;
        let path = self
            .path_walker
            .walk(track1, track2, anchor, &mut scorer, &self.config);
        let alignment = self
            .offset_estimator
            .estimate(path, track1, track2, &self.config)?;
        tracing::debug!(
            offset_seconds = format!("{:.3}", alignment.offset_seconds),
            confidence = format!("{:.3}", alignment.confidence),
            path_len = alignment.path.len(),
            "aligner: success"
        );
        Ok(alignment)
    }
}

/// Aligns two tracks with the default pipeline. Convenience wrapper over
/// [`PhoneticAlignerBuilder`].
pub fn align(
    track1: &[Chunk],
    track2: &[Chunk],
    config: &AlignConfig,
) -> Result<Alignment, AlignError> {
    PhoneticAlignerBuilder::new(config.clone())
        .build()?
        .align(track1, track2)
}

fn validate_track(label: &'static str, chunks: &[Chunk]) -> Result<(), AlignError> {
    if chunks.is_empty() {
        return Err(AlignError::invalid_input(format!("{label} is empty")));
    }
    let mut prev_start = 0.0f64;
    for (idx, chunk) in chunks.iter().enumerate() {
        if !chunk.start.is_finite() || !chunk.end.is_finite() {
            return Err(AlignError::invalid_input(format!(
                "{label}[{idx}] has a non-finite timestamp"
            )));
        }
        if chunk.start < 0.0 {
            return Err(AlignError::invalid_input(format!(
                "{label}[{idx}] starts at {} (negative)",
                chunk.start
            )));
        }
        if chunk.end < chunk.start {
            return Err(AlignError::invalid_input(format!(
                "{label}[{idx}] ends at {} before its start {}",
                chunk.end, chunk.start
            )));
        }
        if chunk.start < prev_start {
            return Err(AlignError::invalid_input(format!(
                "{label}[{idx}] starts at {} before the previous chunk at {}",
                chunk.start, prev_start
            )));
        }
        prev_start = chunk.start;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(start: f64, end: f64, phonemes: &str) -> Chunk {
        Chunk {
            start,
            end,
            text: String::new(),
            phonemes: phonemes.split_whitespace().map(str::to_string).collect(),
            speaker: None,
        }
    }

    fn track() -> Vec<Chunk> {
        vec![
            chunk(0.0, 1.0, "HH AH L OW"),
            chunk(2.0, 3.0, "W ER L D"),
            chunk(4.0, 5.0, "HH AW AA R Y UW"),
            chunk(6.0, 7.0, "F AY N"),
            chunk(8.0, 9.0, "G UH D B AY"),
        ]
    }

    #[test]
    fn empty_track_is_invalid() {
        let err = align(&[], &track(), &AlignConfig::default()).expect_err("empty track");
        assert_eq!(err.reason(), "invalid_input");
    }

    #[test]
    fn negative_start_is_invalid() {
        let mut bad = track();
        bad[0].start = -1.0;
        let err = align(&bad, &track(), &AlignConfig::default()).expect_err("negative time");
        assert_eq!(err.reason(), "invalid_input");
    }

    #[test]
    fn end_before_start_is_invalid() {
        let mut bad = track();
        bad[1].end = 1.5;
        assert!(align(&track(), &bad, &AlignConfig::default()).is_err());
    }

    #[test]
    fn non_monotonic_starts_are_invalid() {
        let mut bad = track();
        bad[2].start = 1.0;
        let err = align(&track(), &bad, &AlignConfig::default()).expect_err("non-monotonic");
        assert_eq!(err.reason(), "invalid_input");
    }

    #[test]
    fn non_finite_timestamp_is_invalid() {
        let mut bad = track();
        bad[3].end = f64::INFINITY;
        assert!(align(&track(), &bad, &AlignConfig::default()).is_err());
    }

    #[test]
    fn identity_alignment_succeeds_through_facade() {
        let track = track();
        let alignment = align(&track, &track, &AlignConfig::default()).expect("aligned");
        assert!(alignment.offset_seconds.abs() < 1e-9);
        assert_eq!(alignment.path.len(), 5);
    }
}
