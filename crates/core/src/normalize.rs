//! Text normalization for slide content.
//!
//! Strips inline markup decoration (code spans, emphasis, links, images,
//! heading markers) and collapses whitespace so that every fragment reaches
//! the consolidator as clean single-line text.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse whitespace runs, newlines included.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Inline code span; the content is kept.
static INLINE_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]*)`").unwrap());

/// Image or embed construct; removed entirely.
static IMAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());

/// Link construct; replaced with its label.
static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap());

/// Leading heading marker run.
static HEADING_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#+\s*").unwrap());

/// Emphasis and code decoration that is dropped wherever it appears.
const DECORATION_MARKERS: &[&str] = &["\\*", "**", "__", "*", "`"];

/// Collapse whitespace runs to a single space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_COLLAPSE_REGEX
        .replace_all(text, " ")
        .trim()
        .to_string()
}

/// Text normalizer for markup-decorated source text.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    /// Create a new text normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Normalize a piece of text to plain single-line text.
    ///
    /// - Applies Unicode NFC
    /// - Keeps the content of inline code spans
    /// - Drops images entirely and replaces links with their label
    /// - Removes emphasis markers and a leading heading marker
    /// - Collapses whitespace and trims
    ///
    /// Passes repeat until the text stops changing, so the result is always
    /// a fixed point: normalizing it again returns it unchanged.
    pub fn normalize(&self, text: &str) -> String {
        let mut current = self.normalize_pass(text);
        loop {
            let next = self.normalize_pass(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    /// Normalize each line and keep the non-empty results.
    pub fn normalize_lines<'a, I>(&self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines
            .into_iter()
            .map(|line| self.normalize(line))
            .filter(|line| !line.is_empty())
            .collect()
    }

    fn normalize_pass(&self, text: &str) -> String {
        let composed: String = text.nfc().collect();

        let result = INLINE_CODE_REGEX.replace_all(&composed, "$1");
        // Images first, otherwise the link rule would leave a stray `!label`.
        let result = IMAGE_REGEX.replace_all(&result, "");
        let mut result = LINK_REGEX.replace_all(&result, "$1").into_owned();

        for marker in DECORATION_MARKERS {
            if result.contains(marker) {
                result = result.replace(marker, "");
            }
        }

        let collapsed = collapse_whitespace(&result);
        HEADING_PREFIX_REGEX
            .replace(&collapsed, "")
            .trim()
            .to_string()
    }
}
