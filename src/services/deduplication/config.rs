//! Deduplication configuration.

use super::similarity::DEFAULT_SIMILARITY_THRESHOLD;

/// Configuration for the deduplication service.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `AIPAD_DEDUP_THRESHOLD` | f64 | `0.80` | Similarity ratio for near-duplicates |
/// | `AIPAD_DEDUP_FUZZY` | bool | `true` | Enable the similarity tier |
///
/// # Example
///
/// ```rust
/// use aipad::services::deduplication::DeduplicationConfig;
///
/// let config = DeduplicationConfig::default();
/// assert!(config.fuzzy_enabled);
/// assert_eq!(config.similarity_threshold, 0.80);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DeduplicationConfig {
    /// Whether near-duplicate (similarity) checking runs after the exact check.
    pub fuzzy_enabled: bool,

    /// Ratio in `[0.0, 1.0]` at or above which content counts as similar.
    pub similarity_threshold: f64,
}

impl DeduplicationConfig {
    /// Applies `AIPAD_DEDUP_*` overrides read through `lookup`.
    ///
    /// Unparseable values are ignored. Thresholds outside `[0.0, 1.0]` are
    /// clamped.
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("AIPAD_DEDUP_FUZZY") {
            self.fuzzy_enabled = parse_bool(&v).unwrap_or(self.fuzzy_enabled);
        }

        if let Some(threshold) =
            lookup("AIPAD_DEDUP_THRESHOLD").and_then(|v| v.trim().parse::<f64>().ok())
        {
            self = self.with_threshold(threshold);
        }

        self
    }

    /// Builder method to set the similarity threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        if threshold.is_nan() {
            return self;
        }
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Builder method to toggle the similarity tier.
    #[must_use]
    pub const fn with_fuzzy(mut self, enabled: bool) -> Self {
        self.fuzzy_enabled = enabled;
        self
    }
}

impl Default for DeduplicationConfig {
    fn default() -> Self {
        Self {
            fuzzy_enabled: true,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

/// Parses common boolean spellings used in environment variables.
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
