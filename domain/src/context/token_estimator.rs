//! Heuristic token estimation.
//!
//! Counts characters and divides by a fixed ratio. The result is an
//! approximation of a real tokenizer; the budget absorbs the error through
//! the model's reserved output tokens rather than by being exact.

/// Characters per token. Most tokenizers average 3-4 characters per token
/// for English and code; rounding up with 4 keeps the estimate cheap.
pub const CHARS_PER_TOKEN: usize = 4;

/// Character-ratio token estimator.
///
/// Counting Unicode scalar values (not bytes) makes the estimate weakly
/// monotonic under concatenation: `estimate(a + b) >= estimate(a)`.
pub struct TokenEstimator;

impl TokenEstimator {
    /// Estimate the token cost of `text`. Empty text costs nothing.
    pub fn estimate(text: &str) -> usize {
        text.chars().count().div_ceil(CHARS_PER_TOKEN)
    }

    /// Estimate the combined cost of several texts, each rounded up separately.
    pub fn estimate_all<'a>(texts: impl IntoIterator<Item = &'a str>) -> usize {
        texts.into_iter().map(Self::estimate).sum()
    }
}
