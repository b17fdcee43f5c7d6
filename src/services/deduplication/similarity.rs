//! Fuzzy duplicate detection via normalized edit distance.
//!
//! The similarity ratio between two texts is
//!
//! ```text
//! 1 - levenshtein(norm(a), norm(b)) / max(len(norm(a)), len(norm(b)))
//! ```
//!
//! where `norm` is the same trim + lowercase transform used for
//! fingerprints and lengths are counted in Unicode scalar values.
//!
//! # Scaling
//!
//! The edit distance uses a full `(m + 1) x (n + 1)` matrix, so time and
//! memory are both `O(m * n)`. Scratchpad entries are a few hundred
//! characters; documents of unbounded size would need a banded algorithm.

use super::hasher::ContentHasher;
use tracing::instrument;

/// Similarity ratio at or above which two entries count as near-duplicates.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.80;

/// Outcome of [`is_similar`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarMatch {
    /// Whether any existing text met the threshold.
    pub found: bool,
    /// The first existing text that met the threshold.
    pub matched: Option<String>,
    /// Ratio of the matched text, `0.0` when nothing matched.
    pub ratio: f64,
}

impl SimilarMatch {
    /// A result for "nothing met the threshold".
    #[must_use]
    pub const fn none() -> Self {
        Self {
            found: false,
            matched: None,
            ratio: 0.0,
        }
    }
}

/// Classic Levenshtein distance (insert, delete, substitute; unit costs).
///
/// Operates on the `char` sequences of the inputs without normalizing them.
///
/// ```rust
/// use aipad::services::deduplication::levenshtein;
///
/// assert_eq!(levenshtein("kitten", "sitting"), 3);
/// assert_eq!(levenshtein("", "abc"), 3);
/// ```
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    distance_matrix(&a, &b)
}

fn distance_matrix(a: &[char], b: &[char]) -> usize {
    let (m, n) = (a.len(), b.len());
    let mut dp = vec![vec![0usize; n + 1]; m + 1];

    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in dp[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
        }
    }

    dp[m][n]
}

/// Similarity ratio in `[0.0, 1.0]` between two texts.
///
/// Both texts are normalized first, so case and surrounding whitespace
/// never lower the score. Two empty texts are identical (`1.0`); an empty
/// text against a non-empty one scores `0.0`.
///
/// ```rust
/// use aipad::services::deduplication::similarity;
///
/// assert_eq!(similarity("hello", "HELLO"), 1.0);
/// assert_eq!(similarity("", "abc"), 0.0);
/// assert!((similarity("kitten", "sitting") - 4.0 / 7.0).abs() < 1e-9);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)] // lengths of scratchpad entries fit in f64 exactly
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = ContentHasher::normalize(a);
    let b = ContentHasher::normalize(b);

    if a == b {
        return 1.0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let max_len = a.len().max(b.len());
    // a != b, so max_len > 0
    let distance = distance_matrix(&a, &b);

    1.0 - distance as f64 / max_len as f64
}

/// Scans `existing` in order and returns the first text whose similarity to
/// `new_text` is at least `threshold`.
///
/// First match wins: a later, closer text is never preferred over an
/// earlier one that already meets the threshold.
#[instrument(
    skip(new_text, existing),
    fields(operation = "similarity_scan", candidates = existing.len())
)]
pub fn is_similar<S: AsRef<str>>(new_text: &str, existing: &[S], threshold: f64) -> SimilarMatch {
    for candidate in existing {
        let candidate = candidate.as_ref();
        let ratio = similarity(new_text, candidate);
        if ratio >= threshold {
            tracing::debug!(ratio, threshold, "Similar entry found");
            return SimilarMatch {
                found: true,
                matched: Some(candidate.to_string()),
                ratio,
            };
        }
    }

    SimilarMatch::none()
}
