//! Fuzzy comparison between a search query and a product label.

/// Edit-distance ratio at or below which two labels are considered equal.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.20;

/// Case-insensitive similarity check.
///
/// Two strings match when either contains the other, or when their
/// Levenshtein distance divided by the length of the shorter one is at most
/// `threshold`. Lengths are counted in characters.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn matches(a: &str, b: &str, threshold: f64) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    // Also covers either side being empty.
    if a.contains(&b) || b.contains(&a) {
        return true;
    }

    let shortest = a.chars().count().min(b.chars().count());
    let distance = strsim::levenshtein(&a, &b);
    distance as f64 / shortest as f64 <= threshold
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl FuzzyMatcher {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn matches(&self, label: &str, query: &str) -> bool {
        matches(label, query, self.threshold)
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_THRESHOLD)
    }
}
