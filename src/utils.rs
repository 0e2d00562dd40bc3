//! Common utility functions shared across the codebase.

/// Checks if the text contains at least one Unicode alphabetic character.
///
/// This is the test for whether a trimmed text run is worth reporting:
/// runs made up entirely of digits, punctuation, or symbols are not
/// translatable copy.
///
/// # Examples
///
/// ```
/// use translint::utils::contains_alphabetic;
///
/// assert!(contains_alphabetic("Submit"));
/// assert!(contains_alphabetic("días"));
/// assert!(contains_alphabetic("Page 2"));
/// assert!(!contains_alphabetic("123.456,789"));
/// assert!(!contains_alphabetic("&#8212;"));
/// assert!(!contains_alphabetic(""));
/// ```
pub fn contains_alphabetic(text: &str) -> bool {
    text.chars().any(|c| c.is_alphabetic())
}
