//! Greedy path construction from the anchor.
//!
//! The walker extends the path through a 2x2 local neighborhood of the
//! similarity matrix. Each step is classified as a direct match, a smear
//! merge (differing segmentation on one side), a tolerated gap advance, or
//! termination once the gap budget runs out.

use crate::alignment::anchor::Anchor;
use crate::alignment::estimator::median;
use crate::alignment::similarity::SimilarityScorer;
use crate::config::AlignConfig;
use crate::types::{Chunk, MatchPoint};


const SCORE_EPS: f64 = 1e-9;

/// Neighborhood steps in evaluation order. The diagonal comes first so a
/// full tie settles on it without extra work.
const NEIGHBORHOOD: [(usize, usize); 4] = [(1, 1), (1, 2), (2, 1), (2, 2)];

#[derive(Debug, Clone, Copy)]
struct Candidate {
    di: usize,
    dj: usize,
    i: usize,
    j: usize,
    score: f64,
}

pub fn walk_path(
    track1: &[Chunk],
    track2: &[Chunk],
    anchor: Anchor,
    scorer: &mut SimilarityScorer<'_>,
    config: &AlignConfig,
) -> Vec<MatchPoint> {
    let n1 = track1.len();
    let n2 = track2.len();
    let anchor_offset = track2[anchor.j].start - track1[anchor.i].start;

    let mut path = vec![MatchPoint::direct(anchor.i, anchor.j, anchor.score)];
    let mut offsets = vec![anchor_offset];
    let mut cur_i = anchor.i;
    let mut cur_j = anchor.j;
    let mut consecutive_gaps = 0usize;
    let mut path_score = anchor.score;

    while cur_i + 1 < n1 && cur_j + 1 < n2 {
        let candidates = enumerate_candidates(cur_i, cur_j, n1, n2, scorer);
        // The offset tie-break tracks the running median once the path has
        // settled; before that the anchor offset is the best estimate.
        let reference_offset = if path.len() < 3 {
            anchor_offset
        } else {
            median(&offsets)
        };
        let best = select_best(&candidates, reference_offset, track1, track2);

        if best.score >= config.phonetic_similarity_threshold {
            tracing::debug!(
                i = best.i,
                j = best.j,
                score = format!("{:.3}", best.score),
                "walker: direct match"
            );
            offsets.push(track2[best.j].start - track1[best.i].start);
            path.push(MatchPoint::direct(best.i, best.j, best.score));
            path_score += best.score;
            consecutive_gaps = 0;
            cur_i = best.i;
            cur_j = best.j;
            continue;
        }

        if let Some((point, next_i, next_j)) =
            probe_smears(track1, track2, cur_i, cur_j, scorer, config, &candidates)
        {
            offsets.push(point.offset(track1, track2));
            path_score += point.score;
            path.push(point);
            consecutive_gaps = 0;
            cur_i = next_i;
            cur_j = next_j;
            continue;
        }

        if consecutive_gaps < config.max_consecutive_gaps {
            consecutive_gaps += 1;
            path_score -= config.gap_penalty;
            tracing::debug!(
                i = best.i,
                j = best.j,
                consecutive_gaps,
                best_score = format!("{:.3}", best.score),
                "walker: gap advance"
            );
            cur_i = best.i;
            cur_j = best.j;
            continue;
        }

        tracing::debug!(
            i = cur_i,
            j = cur_j,
            path_len = path.len(),
            "walker: gap budget exhausted, terminating"
        );
        break;
    }

    tracing::debug!(
        path_len = path.len(),
        path_score = format!("{:.3}", path_score),
        "walker: finished"
    );
    path
}

fn enumerate_candidates(
    cur_i: usize,
    cur_j: usize,
    n1: usize,
    n2: usize,
    scorer: &mut SimilarityScorer<'_>,
) -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(NEIGHBORHOOD.len());
    for (di, dj) in NEIGHBORHOOD {
        let i = cur_i + di;
        let j = cur_j + dj;
        if i >= n1 || j >= n2 {
            continue;
        }
        candidates.push(Candidate {
            di,
            dj,
            i,
            j,
            score: scorer.sim(i, j),
        });
    }
    candidates
}

/// Highest score wins; near-ties prefer the diagonal step, then the
/// shorter step, then the offset closest to the reference.
fn select_best(
    candidates: &[Candidate],
    reference_offset: f64,
    track1: &[Chunk],
    track2: &[Chunk],
) -> Candidate {
    debug_assert!(!candidates.is_empty());
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if beats(candidate, &best, reference_offset, track1, track2) {
            best = *candidate;
        }
    }
    best
}

fn beats(
    candidate: &Candidate,
    best: &Candidate,
    reference_offset: f64,
    track1: &[Chunk],
    track2: &[Chunk],
) -> bool {
    if candidate.score > best.score + SCORE_EPS {
        return true;
    }
    if (candidate.score - best.score).abs() > SCORE_EPS {
        return false;
    }
    let candidate_diagonal = candidate.di == 1 && candidate.dj == 1;
    let best_diagonal = best.di == 1 && best.dj == 1;
    if candidate_diagonal != best_diagonal {
        return candidate_diagonal;
    }
    let candidate_span = candidate.di + candidate.dj;
    let best_span = best.di + best.dj;
    if candidate_span != best_span {
        return candidate_span < best_span;
    }
    let candidate_drift =
        (track2[candidate.j].start - track1[candidate.i].start - reference_offset).abs();
    let best_drift = (track2[best.j].start - track1[best.i].start - reference_offset).abs();
    candidate_drift + SCORE_EPS < best_drift
}

/// Probes both smear directions when the direct neighborhood falls short.
///
/// A merge is worth probing when the best candidate in the adjacent row
/// (for 1toN) or column (for Nto1) reaches the smear threshold; the merged
/// similarity must then clear the full direct threshold. Merges cover two
/// chunks, widened to three only when the wider merge scores strictly
/// better. Returns the accepted point and the cursor position after it.
fn probe_smears(
    track1: &[Chunk],
    track2: &[Chunk],
    cur_i: usize,
    cur_j: usize,
    scorer: &mut SimilarityScorer<'_>,
    config: &AlignConfig,
    candidates: &[Candidate],
) -> Option<(MatchPoint, usize, usize)> {
    let row_best = best_score_where(candidates, |c| c.di == 1);
    if row_best >= config.smear_similarity_threshold && cur_j + 2 < track2.len() {
        let i = cur_i + 1;
        let j_start = cur_j + 1;
        let mut j_end = cur_j + 2;
        let mut score = scorer.sim_merged_track2(i, j_start, j_end);
        if cur_j + 3 < track2.len() {
            let wider = scorer.sim_merged_track2(i, j_start, cur_j + 3);
            if wider > score + SCORE_EPS {
                score = wider;
                j_end = cur_j + 3;
            }
        }
        if score >= config.phonetic_similarity_threshold {
            tracing::debug!(
                i,
                j_start,
                j_end,
                score = format!("{:.3}", score),
                "walker: smear 1toN"
            );
            return Some((MatchPoint::smear_1_to_n(i, j_start, j_end, score), i, j_end));
        }
    }

    let column_best = best_score_where(candidates, |c| c.dj == 1);
    if column_best >= config.smear_similarity_threshold && cur_i + 2 < track1.len() {
        let j = cur_j + 1;
        let i_start = cur_i + 1;
        let mut i_end = cur_i + 2;
        let mut score = scorer.sim_merged_track1(i_start, i_end, j);
        if cur_i + 3 < track1.len() {
            let wider = scorer.sim_merged_track1(i_start, cur_i + 3, j);
            if wider > score + SCORE_EPS {
                score = wider;
                i_end = cur_i + 3;
            }
        }
        if score >= config.phonetic_similarity_threshold {
            tracing::debug!(
                i_start,
                i_end,
                j,
                score = format!("{:.3}", score),
                "walker: smear Nto1"
            );
            return Some((MatchPoint::smear_n_to_1(i_start, j, score), i_end, j));
        }
    }

    None
}

fn best_score_where(candidates: &[Candidate], predicate: impl Fn(&Candidate) -> bool) -> f64 {
    candidates
        .iter()
        .filter(|c| predicate(c))
        .map(|c| c.score)
        .fold(f64::NEG_INFINITY, f64::max)
}
