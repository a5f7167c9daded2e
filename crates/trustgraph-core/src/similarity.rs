// ─────────────────────────────────────────────────────────────────────
// TrustGraph Kernel — Ratcliff/Obershelp Similarity
// ─────────────────────────────────────────────────────────────────────
//! Gestalt pattern matching: `2·M / (|a| + |b|)` where `M` is the number
//! of characters in the recursively found longest matching blocks.
//!
//! Ties between equally long blocks go to the earliest start in `a`, then
//! in `b`. Comparison is case-insensitive and the pair is put in a
//! canonical order first, so `similarity(a, b) == similarity(b, a)`.

/// Normalized similarity of two texts in [0, 1]. Two empty texts are 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let (a, b) = if a <= b { (a, b) } else { (b, a) };

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Sum of the lengths of all matching blocks.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo;
    let mut prev = vec![0usize; width + 1];
    let mut cur = vec![0usize; width + 1];
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);

    for i in alo..ahi {
        for j in blo..bhi {
            let col = j - blo + 1;
            if a[i] == b[j] {
                let k = prev[col - 1] + 1;
                cur[col] = k;
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            } else {
                cur[col] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    (best_i, best_j, best_k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        assert_eq!(similarity("same text", "same text"), 1.0);
    }

    #[test]
    fn test_both_empty() {
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn test_one_empty() {
        assert_eq!(similarity("abc", ""), 0.0);
    }

    #[test]
    fn test_disjoint() {
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_known_ratio() {
        // Blocks "ab" and "d": M = 3, ratio = 6 / 8.
        assert!((similarity("abcd", "abxd") - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(similarity("The Sky", "the sky"), 1.0);
    }

    #[test]
    fn test_symmetric() {
        let a = "The committee approved the budget on Monday";
        let b = "On Monday the budget was rejected by a committee";
        assert_eq!(similarity(a, b), similarity(b, a));
    }

    #[test]
    fn test_near_identical_sentences_exceed_redundancy_threshold() {
        let s = similarity(
            "The committee approved the new budget proposal on Monday",
            "The committee approved the new budget proposal on Tuesday",
        );
        assert!(s > 0.85, "similarity was {s}");
    }
}
