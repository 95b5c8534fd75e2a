//! Locale-aware string ordering for product names
//!
//! Approximates the root-locale collation a browser applies to `localeCompare`:
//! base letters first (case- and accent-blind), then accents, then case with
//! lowercase sorting before uppercase.

use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase)
}

fn accented_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

/// 0 for lowercase (and caseless) characters, 1 for uppercase.
fn case_weights(s: &str) -> impl Iterator<Item = u8> + '_ {
    s.nfd().filter(|c| !is_combining_mark(*c)).map(|c| u8::from(c.is_uppercase()))
}

pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a).cmp(base_letters(b))
        .then_with(|| accented_letters(a).cmp(accented_letters(b)))
        .then_with(|| case_weights(a).cmp(case_weights(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_is_a_late_tiebreak() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("Zinc", "argan"), Ordering::Greater);
        assert_eq!(locale_cmp("argan", "Argan"), Ordering::Less);
    }

    #[test]
    fn test_accents_sort_with_their_base_letter() {
        assert_eq!(locale_cmp("Éclat", "Face"), Ordering::Less);
        assert_eq!(locale_cmp("eclat", "éclat"), Ordering::Less);
        assert_eq!(locale_cmp("Élan", "Eclat"), Ordering::Greater);
    }

    #[test]
    fn test_identical() {
        assert_eq!(locale_cmp("Gluta Glow", "Gluta Glow"), Ordering::Equal);
    }
}
