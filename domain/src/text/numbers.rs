//! Numeric token recognition over normalized text

const NUMBER_WORDS: [&str; 21] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty",
];

/// Value of a normalized token if it denotes a number.
///
/// Digit strings and the number words zero through twenty are recognized.
/// Normalization has already removed separators, so `"1,000"` arrives as
/// `"1000"`.
pub fn numeric_value(token: &str) -> Option<u64> {
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        return token.parse().ok();
    }
    NUMBER_WORDS
        .iter()
        .position(|w| *w == token)
        .map(|i| i as u64)
}

/// Digit-only tokens, in order of appearance
pub fn digit_tokens<'a>(tokens: &'a [String]) -> Vec<&'a str> {
    tokens
        .iter()
        .map(String::as_str)
        .filter(|t| !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()))
        .collect()
}

/// Distinct numeric values (digits or number words), in order of first appearance
pub fn distinct_values(tokens: &[String]) -> Vec<u64> {
    let mut values = Vec::new();
    for value in tokens.iter().filter_map(|t| numeric_value(t)) {
        if !values.contains(&value) {
            values.push(value);
        }
    }
    values
}
