/// Strip everything that is not an ASCII letter or digit and lowercase the
/// rest, so punctuation, whitespace, and case never affect similarity.
/// Idempotent.
pub(crate) fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Longest-matching-blocks similarity in [0.0, 1.0]: twice the total length
/// of the matching blocks over the combined length of both strings (the
/// Ratcliff/Obershelp formulation).
pub(crate) fn sequence_ratio(a: &str, b: &str) -> f64 {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_len(a, b) as f64 / total as f64
}

/// Round a ratio to two decimals for reporting.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Total length of the matching blocks: the longest common substring, then
/// recursively the pieces to its left and right.
fn matching_len(a: &[u8], b: &[u8]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // Longest common substring via the two-row O(min) space DP.
    let (mut best_a, mut best_b, mut best_len) = (0usize, 0usize, 0usize);
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for i in 0..a.len() {
        for j in 0..b.len() {
            curr[j + 1] = if a[i] == b[j] { prev[j] + 1 } else { 0 };
            if curr[j + 1] > best_len {
                best_len = curr[j + 1];
                best_a = i + 1 - best_len;
                best_b = j + 1 - best_len;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    if best_len == 0 {
        return 0;
    }

    best_len
        + matching_len(&a[..best_a], &b[..best_b])
        + matching_len(&a[best_a + best_len..], &b[best_b + best_len..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_lowercases() {
        assert_eq!(normalize("John  Smith"), "johnsmith");
        assert_eq!(normalize("AC-1234/56"), "ac123456");
        assert_eq!(normalize("₹ 1,200.00"), "120000");
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in ["John Smith", "a.b-c", "!!!", "", "MiXeD 42"] {
            assert_eq!(normalize(&normalize(s)), normalize(s));
        }
    }

    #[test]
    fn normalize_punctuation_only_is_empty() {
        assert_eq!(normalize("--- ..."), "");
    }

    #[test]
    fn ratio_identical_is_one() {
        assert_eq!(sequence_ratio("johnsmith", "johnsmith"), 1.0);
        assert_eq!(sequence_ratio("", ""), 1.0);
    }

    #[test]
    fn ratio_disjoint_is_zero() {
        assert_eq!(sequence_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn ratio_against_empty_is_zero() {
        assert_eq!(sequence_ratio("", "abc"), 0.0);
        assert_eq!(sequence_ratio("abc", ""), 0.0);
    }

    #[test]
    fn ratio_counts_blocks_around_the_longest_match() {
        // Longest block "bcd" (3 chars), nothing either side: 2*3 / 8.
        assert_eq!(sequence_ratio("abcd", "bcde"), 0.75);
        // "ab" + "ef" match around the differing middle: 2*4 / 10.
        assert_eq!(sequence_ratio("abxef", "abyef"), 0.8);
    }

    #[test]
    fn round2_rounds_half_away() {
        assert_eq!(round2(0.666), 0.67);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(1.0), 1.0);
        assert_eq!(round2(0.0), 0.0);
    }
}
