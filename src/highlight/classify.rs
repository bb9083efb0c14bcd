//! Word classification against the keyword catalog.

use super::Category;
use super::catalog::Catalog;

/// Classify a word range produced by the scanner.
///
/// Numbers (`^\d+(\.\d+)?$`) come first, then catalog keywords in priority
/// order. Anything else is [`Category::Plain`].
pub fn classify_word(word: &str, catalog: &Catalog) -> Category {
    if is_number(word) {
        return Category::Number;
    }
    let found = if word.contains(char::is_whitespace) {
        let words: Vec<&str> = word.split_whitespace().collect();
        catalog.lookup_words(&words)
    } else {
        catalog.lookup(word)
    };
    found.unwrap_or(Category::Plain)
}

/// Whether `word` is an unsigned integer or decimal literal.
pub fn is_number(word: &str) -> bool {
    let (whole, fraction) = match word.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (word, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    digits(whole) && fraction.is_none_or(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_number() {
        assert!(is_number("10"));
        assert!(is_number("3.14"));
        assert!(is_number("007"));
        assert!(!is_number("3."));
        assert!(!is_number(".5"));
        assert!(!is_number("1.2.3"));
        assert!(!is_number("12abc"));
        assert!(!is_number(""));
        assert!(!is_number("١٢"));
    }

    #[test]
    fn test_classify_case_insensitive() {
        let catalog = Catalog::standard();
        for word in ["select", "SELECT", "SeLeCt"] {
            assert_eq!(classify_word(word, catalog), Category::QueryKeyword);
        }
    }

    #[test]
    fn test_classify_number_before_keyword() {
        assert_eq!(classify_word("42", Catalog::standard()), Category::Number);
    }

    #[test]
    fn test_classify_compound_with_inner_whitespace() {
        let catalog = Catalog::standard();
        assert_eq!(classify_word("Primary  Key", catalog), Category::DefinitionKeyword);
        assert_eq!(classify_word("similar\tto", catalog), Category::OperatorKeyword);
    }

    #[test]
    fn test_classify_unknown_is_plain() {
        let catalog = Catalog::standard();
        assert_eq!(classify_word("users", catalog), Category::Plain);
        assert_eq!(classify_word("user_id", catalog), Category::Plain);
        assert_eq!(classify_word("GROUP", catalog), Category::Plain);
    }
}
