//! Anchor search: the highest-confidence first match pair seeding the walk.

use crate::alignment::similarity::SimilarityScorer;
use crate::config::AlignConfig;
use crate::error::AlignError;
use crate::types::Chunk;

/// How many leading track1 chunks are considered for anchoring.
const ANCHOR_SCAN_LIMIT: usize = 10;

const SCORE_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub i: usize,
    pub j: usize,
    pub score: f64,
}

/// Scans the first `min(N1, 10)` track1 chunks against a time window on
/// track2 and returns the best pair at or above the direct threshold. The
/// window is widened once (x2) before giving up.
pub fn find_anchor(
    track1: &[Chunk],
    track2: &[Chunk],
    scorer: &mut SimilarityScorer<'_>,
    config: &AlignConfig,
) -> Result<Anchor, AlignError> {
    let window = config.initial_search_window_seconds;
    if let Some(anchor) = best_in_window(track1, track2, scorer, config, window) {
        return Ok(anchor);
    }
    let widened = window * 2.0;
    tracing::debug!(
        window_seconds = widened,
        "anchor: nothing in the initial window, widening once"
    );
    best_in_window(track1, track2, scorer, config, widened).ok_or(AlignError::NoAnchorFound)
}

fn best_in_window(
    track1: &[Chunk],
    track2: &[Chunk],
    scorer: &mut SimilarityScorer<'_>,
    config: &AlignConfig,
    window: f64,
) -> Option<Anchor> {
    let scan = track1.len().min(ANCHOR_SCAN_LIMIT);
    // Candidate + |offset| of the current winner; |offset| is the first
    // tie-break so it rides along.
    let mut best: Option<(Anchor, f64)> = None;

    for i in 0..scan {
        if track1[i].phonemes.is_empty() {
            continue;
        }
        let start1 = track1[i].start;
        // Track starts are non-decreasing (validated upstream), so the
        // window bounds come from binary search.
        let lo = track2.partition_point(|c| c.start < start1 - window);
        for (j, chunk2) in track2.iter().enumerate().skip(lo) {
            if chunk2.start > start1 + window {
                break;
            }
            if chunk2.phonemes.is_empty() {
                continue;
            }
            let score = scorer.sim(i, j);
            if score < config.phonetic_similarity_threshold {
                continue;
            }
            let abs_offset = (chunk2.start - start1).abs();
            let replace = match &best {
                None => true,
                Some((current, current_abs_offset)) => {
                    if score > current.score + SCORE_EPS {
                        true
                    } else if (score - current.score).abs() <= SCORE_EPS {
                        if abs_offset + SCORE_EPS < *current_abs_offset {
                            true
                        } else if (abs_offset - current_abs_offset).abs() <= SCORE_EPS {
                            // Full tie: the earliest (i, j) pair wins.
                            (i, j) < (current.i, current.j)
                        } else {
                            false
                        }
                    } else {
                        false
                    }
                }
            };
            if replace {
                best = Some((Anchor { i, j, score }, abs_offset));
            }
        }
    }

    if let Some((anchor, _)) = &best {
        tracing::debug!(
            i = anchor.i,
            j = anchor.j,
            score = format!("{:.3}", anchor.score),
            "anchor: selected"
        );
    }
    best.map(|(anchor, _)| anchor)
}
