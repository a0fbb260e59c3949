use serde::Deserialize;

use crate::error::AlignError;

/// Knobs for the Phonetic Walk. All options are scalars; unknown keys are
/// rejected when deserializing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlignConfig {
    /// Minimum similarity for a direct match (and for accepting a merged
    /// smear candidate).
    pub phonetic_similarity_threshold: f64,
    /// Minimum neighborhood similarity that makes a smear merge worth
    /// probing.
    pub smear_similarity_threshold: f64,
    /// Half-width of the anchor search window around each track1 start.
    pub initial_search_window_seconds: f64,
    pub min_path_length: usize,
    pub max_consecutive_gaps: usize,
    /// Subtracted from the running path score for each non-matching
    /// advance.
    pub gap_penalty: f64,
    /// Subtracted from a pair's similarity when both chunks carry a
    /// speaker and the speakers differ. Pairs missing a speaker on either
    /// side are never penalized.
    pub speaker_mismatch_penalty: f64,
    /// Maximum standard deviation of the retained offset samples.
    pub offset_consistency_threshold_sd: f64,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            phonetic_similarity_threshold: 0.7,
            smear_similarity_threshold: 0.5,
            initial_search_window_seconds: 120.0,
            min_path_length: 5,
            max_consecutive_gaps: 2,
            gap_penalty: 0.1,
            speaker_mismatch_penalty: 0.5,
            offset_consistency_threshold_sd: 0.5,
        }
    }
}

impl AlignConfig {
    /// Parses a JSON object of options. Missing keys fall back to the
    /// defaults; unknown keys fail with `invalid_input`.
    pub fn from_json(data: &str) -> Result<Self, AlignError> {
        serde_json::from_str(data)
            .map_err(|e| AlignError::invalid_input(format!("parse align config: {e}")))
    }

    pub fn validate(&self) -> Result<(), AlignError> {
        check_unit_interval(
            "phonetic_similarity_threshold",
            self.phonetic_similarity_threshold,
        )?;
        check_unit_interval("smear_similarity_threshold", self.smear_similarity_threshold)?;
        check_unit_interval("speaker_mismatch_penalty", self.speaker_mismatch_penalty)?;
        check_positive(
            "initial_search_window_seconds",
            self.initial_search_window_seconds,
        )?;
        check_positive(
            "offset_consistency_threshold_sd",
            self.offset_consistency_threshold_sd,
        )?;
        if !self.gap_penalty.is_finite() || self.gap_penalty < 0.0 {
            return Err(AlignError::invalid_input(format!(
                "gap_penalty must be finite and non-negative, got {}",
                self.gap_penalty
            )));
        }
        if self.min_path_length == 0 {
            return Err(AlignError::invalid_input(
                "min_path_length must be at least 1",
            ));
        }
        Ok(())
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<(), AlignError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(AlignError::invalid_input(format!(
            "{name} must be within [0, 1], got {value}"
        )));
    }
    Ok(())
}

fn check_positive(name: &str, value: f64) -> Result<(), AlignError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AlignError::invalid_input(format!(
            "{name} must be finite and positive, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_config_defaults() {
        let config = AlignConfig::default();
        assert!((config.phonetic_similarity_threshold - 0.7).abs() < 1e-9);
        assert!((config.smear_similarity_threshold - 0.5).abs() < 1e-9);
        assert!((config.initial_search_window_seconds - 120.0).abs() < 1e-9);
        assert_eq!(config.min_path_length, 5);
        assert_eq!(config.max_consecutive_gaps, 2);
        assert!((config.gap_penalty - 0.1).abs() < 1e-9);
        assert!((config.speaker_mismatch_penalty - 0.5).abs() < 1e-9);
        assert!((config.offset_consistency_threshold_sd - 0.5).abs() < 1e-9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_json_fills_missing_keys_with_defaults() {
        let config = AlignConfig::from_json(r#"{"min_path_length": 3}"#).expect("valid config");
        assert_eq!(config.min_path_length, 3);
        assert!((config.phonetic_similarity_threshold - 0.7).abs() < 1e-9);
    }

    #[test]
    fn from_json_rejects_unknown_keys() {
        let err = AlignConfig::from_json(r#"{"beam_width": 3}"#).expect_err("unknown key");
        assert_eq!(err.reason(), "invalid_input");
    }

    #[test]
    fn validate_rejects_out_of_range_threshold() {
        let config = AlignConfig {
            phonetic_similarity_threshold: 1.5,
            ..AlignConfig::default()
        };
        assert_eq!(config.validate().expect_err("bad threshold").reason(), "invalid_input");
    }

    #[test]
    fn validate_rejects_zero_min_path_length() {
        let config = AlignConfig {
            min_path_length: 0,
            ..AlignConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_finite_window() {
        let config = AlignConfig {
            initial_search_window_seconds: f64::NAN,
            ..AlignConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
