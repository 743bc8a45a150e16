//! Token-stream similarity ratio, the Ratcliff/Obershelp-style measure the
//! rest of the pipeline thresholds against.

use crate::types::TokenStream;

/// `2 * longest-common-subsequence-length / (len(a) + len(b)) * 100`.
///
/// Symmetric, deterministic, and `ratio(x, x) == 100.0` for any non-empty
/// `x`. Two empty streams are defined as 100% similar (nothing to disagree
/// on) rather than dividing by zero.
pub fn ratio(a: &TokenStream, b: &TokenStream) -> f64 {
    let a = a.as_slice();
    let b = b.as_slice();

    if a.is_empty() && b.is_empty() {
        return 100.0;
    }

    let lcs = lcs_length(a, b);
    200.0 * lcs as f64 / (a.len() + b.len()) as f64
}

fn lcs_length(a: &[String], b: &[String]) -> usize {
    let (n, m) = (a.len(), b.len());
    let mut prev = vec![0usize; m + 1];
    let mut curr = vec![0usize; m + 1];

    for i in 1..=n {
        for j in 1..=m {
            curr[j] = if a[i - 1] == b[j - 1] {
                prev[j - 1] + 1
            } else {
                prev[j].max(curr[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(tokens: &[&str]) -> TokenStream {
        TokenStream::new(tokens.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_identical_streams_are_100() {
        let a = stream(&["INT", "ID", ";"]);
        assert_eq!(ratio(&a, &a), 100.0);
    }

    #[test]
    fn test_both_empty_is_100() {
        let a = stream(&[]);
        assert_eq!(ratio(&a, &a), 100.0);
    }

    #[test]
    fn test_disjoint_streams_are_0() {
        let a = stream(&["A", "B", "C"]);
        let b = stream(&["X", "Y", "Z"]);
        assert_eq!(ratio(&a, &b), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = stream(&["A", "B", "C", "D"]);
        let b = stream(&["A", "C", "D", "E"]);
        assert_eq!(ratio(&a, &b), ratio(&b, &a));
    }

    #[test]
    fn test_partial_overlap() {
        let a = stream(&["A", "B", "C", "D"]);
        let b = stream(&["A", "B"]);
        // lcs = 2, 2*2/(4+2)*100 = 66.67
        assert!((ratio(&a, &b) - 66.666_666_666_666_66).abs() < 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let a = stream(&["A", "B", "C"]);
        let b = stream(&["B", "C", "D"]);
        assert_eq!(ratio(&a, &b), ratio(&a, &b));
    }
}
