//! Keyword extraction for matching free-text remarks to equipment names.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s,]+").unwrap());

/// Category marker that must never identify a single item.
pub const XC_TOKEN: &str = "xc";

/// Lowercase `text`, split on runs of whitespace or commas, and drop empty
/// tokens and the `xc` marker.
pub fn findwords(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    SPLIT_RE
        .split(&lowered)
        .filter(|word| !word.is_empty() && *word != XC_TOKEN)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_lowercases_and_splits() {
        assert_eq!(findwords("Koa  Trail,Mud"), set(&["koa", "trail", "mud"]));
    }

    #[test]
    fn test_comma_and_whitespace_runs() {
        assert_eq!(findwords(" ,, a ,\tb\n"), set(&["a", "b"]));
    }

    #[test]
    fn test_drops_xc_in_any_case() {
        assert_eq!(findwords("Merrell XC"), set(&["merrell"]));
        assert_eq!(findwords("xc, Xc ,xC"), BTreeSet::new());
    }

    #[test]
    fn test_keeps_words_containing_xc() {
        assert_eq!(findwords("xcountry"), set(&["xcountry"]));
    }

    #[test]
    fn test_hyphenated_names_stay_whole() {
        assert_eq!(findwords("ASICS-GT1000-8"), set(&["asics-gt1000-8"]));
    }

    #[test]
    fn test_empty_text() {
        assert!(findwords("").is_empty());
        assert!(findwords("   ").is_empty());
    }
}
