use serde::{Deserialize, Serialize};

/// One subtitle utterance as produced by the upstream wrangler.
///
/// Times are in seconds. `phonemes` holds uppercase tokens (e.g. ARPABET
/// without stress digits) that the aligner treats as opaque symbols; an
/// empty list marks the chunk as non-matchable, so it can only be crossed
/// as a gap. `text` is carried for diagnostics and never inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub phonemes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchKind {
    #[serde(rename = "direct")]
    Direct,
    #[serde(rename = "smear-1toN")]
    Smear1ToN,
    #[serde(rename = "smear-Nto1")]
    SmearNTo1,
}

impl MatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Smear1ToN => "smear-1toN",
            Self::SmearNTo1 => "smear-Nto1",
        }
    }
}

/// One accepted match on the alignment path.
///
/// `j_start..=j_end` is the merged track2 range for `Smear1ToN`; for the
/// other kinds the two are equal. For `SmearNTo1`, `i` is the first of the
/// merged track1 indices. Offset math always uses the first index of a
/// smeared range on either side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPoint {
    pub i: usize,
    pub j_start: usize,
    pub j_end: usize,
    pub score: f64,
    pub kind: MatchKind,
}

impl MatchPoint {
    pub(crate) fn direct(i: usize, j: usize, score: f64) -> Self {
        Self {
            i,
            j_start: j,
            j_end: j,
            score,
            kind: MatchKind::Direct,
        }
    }

    pub(crate) fn smear_1_to_n(i: usize, j_start: usize, j_end: usize, score: f64) -> Self {
        Self {
            i,
            j_start,
            j_end,
            score,
            kind: MatchKind::Smear1ToN,
        }
    }

    pub(crate) fn smear_n_to_1(i: usize, j: usize, score: f64) -> Self {
        Self {
            i,
            j_start: j,
            j_end: j,
            score,
            kind: MatchKind::SmearNTo1,
        }
    }

    /// Offset sample for this point: `start2[j_start] - start1[i]`.
    pub fn offset(&self, track1: &[Chunk], track2: &[Chunk]) -> f64 {
        track2[self.j_start].start - track1[self.i].start
    }
}

/// Successful alignment: shifting track2 by `-offset_seconds` (or track1 by
/// `+offset_seconds`) brings the two tracks into agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    pub offset_seconds: f64,
    pub confidence: f64,
    pub path: Vec<MatchPoint>,
}

/// Returns a copy of `chunks` with every `start`/`end` moved by
/// `offset_seconds`.
pub fn shift_chunks(chunks: &[Chunk], offset_seconds: f64) -> Vec<Chunk> {
    chunks
        .iter()
        .map(|chunk| Chunk {
            start: chunk.start + offset_seconds,
            end: chunk.end + offset_seconds,
            ..chunk.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_chunks_moves_both_endpoints() {
        let chunks = vec![Chunk {
            start: 1.0,
            end: 2.5,
            text: "hello".to_string(),
            phonemes: vec!["HH".to_string(), "AH".to_string()],
            speaker: None,
        }];
        let shifted = shift_chunks(&chunks, -0.5);
        assert!((shifted[0].start - 0.5).abs() < 1e-9);
        assert!((shifted[0].end - 2.0).abs() < 1e-9);
        assert_eq!(shifted[0].phonemes, chunks[0].phonemes);
    }

    #[test]
    fn match_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&MatchKind::Smear1ToN).expect("serialize kind"),
            "\"smear-1toN\""
        );
        assert_eq!(MatchKind::SmearNTo1.as_str(), "smear-Nto1");
        assert_eq!(MatchKind::Direct.as_str(), "direct");
    }

    #[test]
    fn match_point_offset_uses_range_start() {
        let track1 = vec![chunk_at(4.0)];
        let track2 = vec![chunk_at(6.0), chunk_at(7.0)];
        let point = MatchPoint::smear_1_to_n(0, 0, 1, 0.9);
        assert!((point.offset(&track1, &track2) - 2.0).abs() < 1e-9);
    }

    fn chunk_at(start: f64) -> Chunk {
        Chunk {
            start,
            end: start + 1.0,
            text: String::new(),
            phonemes: vec!["AA".to_string()],
            speaker: None,
        }
    }
}
