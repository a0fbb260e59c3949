//! Normalized phoneme similarity with a per-call memo cache.

use std::collections::HashMap;

use crate::alignment::distance::phoneme_edit_distance;
use crate::types::Chunk;

/// Widest chunk run a smear merge may cover on the merged side.
pub const MAX_SMEAR_SPAN: usize = 3;

/// Cache key. Merged variants carry the full range and the merged side so
/// they never collide with direct pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SimKey {
    Direct { i: usize, j: usize },
    MergedTrack1 { i_start: usize, i_end: usize, j: usize },
    MergedTrack2 { i: usize, j_start: usize, j_end: usize },
}

/// Scores chunk pairs between the two tracks of one alignment call.
///
/// The memo cache lives as long as the scorer; the facade rebuilds a
/// scorer per call, so no state leaks across alignments.
pub struct SimilarityScorer<'a> {
    track1: &'a [Chunk],
    track2: &'a [Chunk],
    speaker_mismatch_penalty: f64,
    cache: HashMap<SimKey, f64>,
}

impl<'a> SimilarityScorer<'a> {
    pub fn new(track1: &'a [Chunk], track2: &'a [Chunk], speaker_mismatch_penalty: f64) -> Self {
        Self {
            track1,
            track2,
            speaker_mismatch_penalty,
            cache: HashMap::new(),
        }
    }

    /// Similarity of `track1[i]` vs `track2[j]` in [0, 1]. Zero when either
    /// chunk has no phonemes.
    pub fn sim(&mut self, i: usize, j: usize) -> f64 {
        let key = SimKey::Direct { i, j };
        if let Some(&cached) = self.cache.get(&key) {
            return cached;
        }
        let c1 = &self.track1[i];
        let c2 = &self.track2[j];
        let score = score_pair(
            &c1.phonemes,
            c1.speaker.as_deref(),
            &c2.phonemes,
            c2.speaker.as_deref(),
            self.speaker_mismatch_penalty,
        );
        self.cache.insert(key, score);
        score
    }

    /// Similarity of `track1[i]` against the concatenated phonemes of
    /// `track2[j_start..=j_end]`. The range is capped at [`MAX_SMEAR_SPAN`]
    /// chunks.
    pub fn sim_merged_track2(&mut self, i: usize, j_start: usize, j_end: usize) -> f64 {
        debug_assert!(j_start <= j_end && j_end < self.track2.len());
        let j_end = j_end.min(j_start + MAX_SMEAR_SPAN - 1);
        let key = SimKey::MergedTrack2 { i, j_start, j_end };
        if let Some(&cached) = self.cache.get(&key) {
            return cached;
        }
        let c1 = &self.track1[i];
        let merged = concat_phonemes(&self.track2[j_start..=j_end]);
        let mut score = score_pair(&c1.phonemes, None, &merged, None, 0.0);
        if let Some(s1) = c1.speaker.as_deref() {
            if speaker_disagrees(&self.track2[j_start..=j_end], s1) {
                score = (score - self.speaker_mismatch_penalty).max(0.0);
            }
        }
        self.cache.insert(key, score);
        score
    }

    /// Symmetric merge: concatenated `track1[i_start..=i_end]` against
    /// `track2[j]`.
    pub fn sim_merged_track1(&mut self, i_start: usize, i_end: usize, j: usize) -> f64 {
        debug_assert!(i_start <= i_end && i_end < self.track1.len());
        let i_end = i_end.min(i_start + MAX_SMEAR_SPAN - 1);
        let key = SimKey::MergedTrack1 { i_start, i_end, j };
        if let Some(&cached) = self.cache.get(&key) {
            return cached;
        }
        let c2 = &self.track2[j];
        let merged = concat_phonemes(&self.track1[i_start..=i_end]);
        let mut score = score_pair(&merged, None, &c2.phonemes, None, 0.0);
        if let Some(s2) = c2.speaker.as_deref() {
            if speaker_disagrees(&self.track1[i_start..=i_end], s2) {
                score = (score - self.speaker_mismatch_penalty).max(0.0);
            }
        }
        self.cache.insert(key, score);
        score
    }
}

fn concat_phonemes(chunks: &[Chunk]) -> Vec<String> {
    chunks
        .iter()
        .flat_map(|chunk| chunk.phonemes.iter().cloned())
        .collect()
}

fn speaker_disagrees(chunks: &[Chunk], other: &str) -> bool {
    chunks
        .iter()
        .any(|chunk| matches!(chunk.speaker.as_deref(), Some(s) if s != other))
}

/// Core scoring rule: edit distance normalized by the longer length, damped
/// by the length ratio so short-vs-long pairs cannot score high on a lucky
/// prefix, then the speaker penalty, clamped to [0, 1].
fn score_pair(
    p1: &[String],
    speaker1: Option<&str>,
    p2: &[String],
    speaker2: Option<&str>,
    speaker_mismatch_penalty: f64,
) -> f64 {
    if p1.is_empty() || p2.is_empty() {
        return 0.0;
    }
    let dist = phoneme_edit_distance(p1, p2);
    let max_len = p1.len().max(p2.len()) as f64;
    let min_len = p1.len().min(p2.len()) as f64;
    let base = 1.0 - dist / max_len;
    let mut score = base * (0.5 + 0.5 * min_len / max_len);
    if let (Some(s1), Some(s2)) = (speaker1, speaker2) {
        if s1 != s2 {
            score -= speaker_mismatch_penalty;
        }
    }
    score.clamp(0.0, 1.0)
}
