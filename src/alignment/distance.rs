//! Token-level weighted edit distance between phoneme sequences.

/// Unordered phoneme pairs that transcribers commonly confuse; substituting
/// within a pair costs less than a full substitution.
const CONFUSION_PAIRS: [(&str, &str); 8] = [
    ("P", "B"),
    ("T", "D"),
    ("K", "G"),
    ("S", "Z"),
    ("F", "V"),
    ("M", "N"),
    ("IH", "IY"),
    ("AE", "EH"),
];

const CONFUSED_SUB_COST: f64 = 0.3;

fn substitution_cost(a: &str, b: &str) -> f64 {
    if a == b {
        return 0.0;
    }
    for (x, y) in CONFUSION_PAIRS {
        if (a == x && b == y) || (a == y && b == x) {
            return CONFUSED_SUB_COST;
        }
    }
    1.0
}

/// Weighted edit distance over phoneme tokens.
///
/// Unit insertion/deletion cost; substitution costs 0 for equal tokens, a
/// reduced cost for confusable pairs, 1 otherwise. O(|a|·|b|) time and
/// O(min(|a|,|b|)) space: two rolling rows sized by the shorter sequence.
pub fn phoneme_edit_distance(a: &[String], b: &[String]) -> f64 {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return long.len() as f64;
    }

    let mut prev: Vec<f64> = (0..=short.len()).map(|c| c as f64).collect();
    let mut curr = vec![0.0f64; short.len() + 1];

    for (row, long_token) in long.iter().enumerate() {
        curr[0] = (row + 1) as f64;
        for (col, short_token) in short.iter().enumerate() {
            let substitute = prev[col] + substitution_cost(long_token, short_token);
            let delete = prev[col + 1] + 1.0;
            let insert = curr[col] + 1.0;
            curr[col + 1] = substitute.min(delete).min(insert);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ph(tokens: &str) -> Vec<String> {
        tokens.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn identical_sequences_have_zero_distance() {
        let p = ph("HH AH L OW");
        assert!((phoneme_edit_distance(&p, &p)).abs() < 1e-9);
    }

    #[test]
    fn empty_vs_empty_is_zero() {
        assert!((phoneme_edit_distance(&[], &[])).abs() < 1e-9);
    }

    #[test]
    fn empty_vs_nonempty_is_other_length() {
        let p = ph("W ER L D");
        assert!((phoneme_edit_distance(&[], &p) - 4.0).abs() < 1e-9);
        assert!((phoneme_edit_distance(&p, &[]) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn confusable_substitution_is_cheap() {
        assert!((phoneme_edit_distance(&ph("P"), &ph("B")) - 0.3).abs() < 1e-9);
        assert!((phoneme_edit_distance(&ph("IY"), &ph("IH")) - 0.3).abs() < 1e-9);
        assert!((phoneme_edit_distance(&ph("K AE T"), &ph("K EH T")) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn unrelated_substitution_costs_one() {
        assert!((phoneme_edit_distance(&ph("AA"), &ph("IY")) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn suffix_deletion_counts_per_token() {
        let full = ph("HH AH L OW");
        let cut = ph("HH AH L");
        assert!((phoneme_edit_distance(&full, &cut) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = ph("W AH T D UW Y UW");
        let b = ph("TH IH NG K");
        let forward = phoneme_edit_distance(&a, &b);
        let backward = phoneme_edit_distance(&b, &a);
        assert!((forward - backward).abs() < 1e-9);
    }
}
