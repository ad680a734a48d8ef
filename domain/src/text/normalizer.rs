//! Text canonicalization for answer comparison

/// Canonicalizes raw text before any token comparison.
///
/// Lower-cases, removes every ASCII punctuation character (including
/// punctuation fused to a word, so `"Paris."` and `"paris"` compare equal),
/// and collapses whitespace runs to single spaces with no leading or
/// trailing whitespace. Normalizing twice yields the same string.
///
/// # Example
///
/// ```
/// use veracity_domain::text::Normalizer;
///
/// assert_eq!(Normalizer::normalize("  The capital is  PARIS. "), "the capital is paris");
/// assert_eq!(Normalizer::normalize("Paris."), Normalizer::normalize("paris"));
/// ```
pub struct Normalizer;

impl Normalizer {
    pub fn normalize(text: &str) -> String {
        let stripped: String = text
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .flat_map(char::to_lowercase)
            .collect();
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Normalize and split into whitespace-delimited tokens
    pub fn tokens(text: &str) -> Vec<String> {
        Self::normalize(text)
            .split(' ')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}
