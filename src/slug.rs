//! Slug rules shared by categories and blog posts.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref NON_WORD_RE: Regex = Regex::new(r"[^A-Za-z0-9_-]+").unwrap();
    static ref HYPHEN_RUN_RE: Regex = Regex::new(r"--+").unwrap();
    static ref SLUG_RE: Regex = Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap();
}

/// Derives a URL-safe slug from a title or name.
///
/// Lowercase, trim, whitespace runs to `-`, drop anything outside
/// `[A-Za-z0-9_-]`, then collapse repeated hyphens. Applying it twice gives
/// the same result as applying it once.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let hyphenated = WHITESPACE_RE.replace_all(lowered.trim(), "-");
    let stripped = NON_WORD_RE.replace_all(&hyphenated, "");
    HYPHEN_RUN_RE.replace_all(&stripped, "-").into_owned()
}

/// Whether `slug` is acceptable as a blog slug: lowercase alphanumeric words
/// joined by single hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_is_dropped() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
    }

    #[test]
    fn whitespace_and_hyphen_runs_collapse() {
        assert_eq!(slugify("  The   Future of  Web  "), "the-future-of-web");
        assert_eq!(slugify("a - b"), "a-b");
        assert_eq!(slugify("UI/UX -- Design"), "uiux-design");
    }

    #[test]
    fn underscores_and_digits_survive() {
        assert_eq!(slugify("snake_case 2024"), "snake_case-2024");
    }

    #[test]
    fn non_ascii_letters_are_stripped() {
        assert_eq!(slugify("Café Déjà vu"), "caf-dj-vu");
    }

    #[test]
    fn slugify_is_idempotent() {
        let samples = [
            "Hello, World!",
            "  Leading and trailing  ",
            "a !",
            "--already-sluggy--",
            "Mixed\tTabs\nand newlines",
            "10 Productivity Hacks for Busy Professionals",
            "Ünïcödé ✓ text",
            "",
        ];
        for s in samples {
            let once = slugify(s);
            assert_eq!(slugify(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn slug_pattern() {
        assert!(is_valid_slug("future-of-web-development-2024"));
        assert!(is_valid_slug("a"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("trailing-"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug("Upper-Case"));
        assert!(!is_valid_slug("under_score"));
    }
}
