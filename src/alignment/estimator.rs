//! Robust offset estimation over a finished path.
//!
//! Median/MAD outlier rejection absorbs a handful of mis-aligned points
//! before the final standard-deviation gate.

use crate::config::AlignConfig;
use crate::error::AlignError;
use crate::types::{Alignment, Chunk, MatchPoint};

const MAD_CUTOFF_FACTOR: f64 = 3.0;

pub fn estimate_offset(
    path: Vec<MatchPoint>,
    track1: &[Chunk],
    track2: &[Chunk],
    config: &AlignConfig,
) -> Result<Alignment, AlignError> {
    if path.len() < config.min_path_length {
        return Err(AlignError::PathTooShort {
            found: path.len(),
            required: config.min_path_length,
            path,
        });
    }

    let samples: Vec<f64> = path.iter().map(|p| p.offset(track1, track2)).collect();
    let raw_median = median(&samples);
    let deviations: Vec<f64> = samples.iter().map(|s| (s - raw_median).abs()).collect();
    let mad = median(&deviations);

    let retained = retain_inliers(&samples, &deviations, mad);
    let offset = median(&retained);
    let sd = sample_std_dev(&retained);
    tracing::debug!(
        raw_median = format!("{:.3}", raw_median),
        mad = format!("{:.3}", mad),
        retained = retained.len(),
        dropped = samples.len() - retained.len(),
        sd = format!("{:.3}", sd),
        "estimator: robust offset"
    );

    if sd > config.offset_consistency_threshold_sd {
        return Err(AlignError::OffsetInconsistent {
            median: offset,
            sd,
            threshold: config.offset_consistency_threshold_sd,
        });
    }

    let length_factor = (path.len() as f64 / (2.0 * config.min_path_length as f64)).min(1.0);
    let mean_score = path.iter().map(|p| p.score).sum::<f64>() / path.len() as f64;
    let consistency_factor = 1.0 - (sd / config.offset_consistency_threshold_sd).min(1.0);
    let confidence = (length_factor * mean_score * consistency_factor).clamp(0.0, 1.0);

    Ok(Alignment {
        offset_seconds: offset,
        confidence,
        path,
    })
}

/// Keeps everything within 3·MAD of the median, but never fewer than half
/// the samples: when the cutoff would drop more, the smallest deviations
/// are kept instead (ties broken by sample order, so the result is
/// deterministic).
fn retain_inliers(samples: &[f64], deviations: &[f64], mad: f64) -> Vec<f64> {
    let cutoff = MAD_CUTOFF_FACTOR * mad;
    let within: Vec<f64> = samples
        .iter()
        .zip(deviations)
        .filter(|(_, dev)| **dev <= cutoff)
        .map(|(s, _)| *s)
        .collect();
    let floor = samples.len().div_ceil(2);
    if within.len() >= floor {
        return within;
    }

    let mut order: Vec<usize> = (0..samples.len()).collect();
    order.sort_by(|&a, &b| deviations[a].total_cmp(&deviations[b]).then(a.cmp(&b)));
    let mut keep: Vec<usize> = order.into_iter().take(floor).collect();
    keep.sort_unstable();
    keep.into_iter().map(|idx| samples[idx]).collect()
}

pub(crate) fn median(samples: &[f64]) -> f64 {
    debug_assert!(!samples.is_empty());
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn sample_std_dev(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let var = samples
        .iter()
        .map(|&s| {
            let d = s - mean;
            d * d
        })
        .sum::<f64>()
        / (n - 1.0);
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchKind;

    fn chunk(start: f64) -> Chunk {
        Chunk {
            start,
            end: start + 1.0,
            text: String::new(),
            phonemes: vec!["AA".to_string()],
            speaker: None,
        }
    }

    /// Tracks whose point-n offset is `offsets[n]`, plus a unit-score
    /// direct path over them.
    fn fixture(offsets: &[f64]) -> (Vec<Chunk>, Vec<Chunk>, Vec<MatchPoint>) {
        let track1: Vec<Chunk> = (0..offsets.len()).map(|n| chunk(n as f64 * 50.0)).collect();
        let track2: Vec<Chunk> = offsets
            .iter()
            .enumerate()
            .map(|(n, off)| chunk(n as f64 * 50.0 + off))
            .collect();
        let path = (0..offsets.len())
            .map(|n| MatchPoint::direct(n, n, 1.0))
            .collect();
        (track1, track2, path)
    }

    #[test]
    fn short_path_fails_with_partial_path() {
        let (t1, t2, path) = fixture(&[0.0, 0.0, 0.0]);
        let err = estimate_offset(path, &t1, &t2, &AlignConfig::default()).expect_err("too short");
        match err {
            AlignError::PathTooShort { found, required, path } => {
                assert_eq!(found, 3);
                assert_eq!(required, 5);
                assert_eq!(path.len(), 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn constant_offset_is_recovered_exactly() {
        let (t1, t2, path) = fixture(&[12.5; 6]);
        let alignment = estimate_offset(path, &t1, &t2, &AlignConfig::default()).expect("aligned");
        assert!((alignment.offset_seconds - 12.5).abs() < 1e-9);
        // 6 points, min 5: length factor 0.6, scores 1.0, sd 0.
        assert!((alignment.confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn mad_filter_drops_outlier() {
        let (t1, t2, path) = fixture(&[10.0, 10.05, 9.95, 10.02, 9.98, 10.01, 30.0]);
        let alignment = estimate_offset(path, &t1, &t2, &AlignConfig::default()).expect("aligned");
        assert!((alignment.offset_seconds - 10.0).abs() < 0.1);
    }

    #[test]
    fn drifting_offsets_fail_consistency() {
        let offsets: Vec<f64> = (1..=20).map(|n| n as f64).collect();
        let (t1, t2, path) = fixture(&offsets);
        let err = estimate_offset(path, &t1, &t2, &AlignConfig::default()).expect_err("drift");
        match err {
            AlignError::OffsetInconsistent { sd, threshold, .. } => {
                assert!(sd > threshold);
                assert!(sd > 5.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn confidence_multiplies_three_factors() {
        let (t1, t2, mut path) = fixture(&[2.0; 5]);
        for point in &mut path {
            point.score = 0.8;
        }
        let alignment = estimate_offset(path, &t1, &t2, &AlignConfig::default()).expect("aligned");
        // length 5/(2*5) = 0.5, mean score 0.8, sd 0 -> 0.4
        assert!((alignment.confidence - 0.4).abs() < 1e-9);
        assert_eq!(alignment.path[0].kind, MatchKind::Direct);
    }

    #[test]
    fn zero_mad_keeps_all_identical_samples() {
        let (t1, t2, path) = fixture(&[3.0; 8]);
        let alignment = estimate_offset(path, &t1, &t2, &AlignConfig::default()).expect("aligned");
        assert!((alignment.offset_seconds - 3.0).abs() < 1e-9);
        assert!((alignment.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn median_of_even_count_averages_middle_pair() {
        assert!((median(&[1.0, 2.0, 3.0, 4.0]) - 2.5).abs() < 1e-9);
        assert!((median(&[5.0]) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn retain_floor_keeps_half_when_cutoff_too_tight() {
        // Median 0, MAD 0: only exact-median samples fit the cutoff, so
        // the floor must keep ceil(6/2) = 3.
        let samples: [f64; 6] = [0.0, 0.0, 1.0, 2.0, 3.0, 4.0];
        let deviations: Vec<f64> = samples.iter().map(|s| s.abs()).collect();
        let kept = retain_inliers(&samples, &deviations, 0.0);
        assert_eq!(kept.len(), 3);
        assert_eq!(kept, vec![0.0, 0.0, 1.0]);
    }
}
