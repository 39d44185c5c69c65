//! Bullet consolidation.
//!
//! Turns the ordered fragments of one section or subsection into a short list
//! of clean, unique, length-bounded bullet strings:
//!
//! 1. buffer raw lines as paragraphs or list runs ([`FragmentAccumulator`])
//! 2. merge short labels into the sentence that follows them
//! 3. merge colon-terminated lead-ins with their continuation
//! 4. trim terminators and drop duplicates
//! 5. re-split overlong bullets on secondary delimiters

use crate::normalize::TextNormalizer;
use crate::segment::split_sentences;
use crate::types::FragmentLayout;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Bullet glyph list marker. ASCII glyphs need a following space.
static BULLET_GLYPH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*+]\s+|[•·●○▪◦]\s*)").unwrap());

/// Numbered list marker such as `1.`, `2)` or `3、`.
static NUMBERED_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)．、]").unwrap());

/// Parenthesized ordinal such as `(1)` or `（三）`.
static PAREN_ORDINAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[（(][\d一二三四五六七八九十]+[)）]\s*").unwrap());

/// Horizontal rule line (`---`, `***`, `___`).
static THEMATIC_BREAK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*_]\s*){3,}$").unwrap());

/// Separator used when a run of list items becomes one bullet.
const LIST_JOINER: &str = "；";

/// Separator used when label and continuation are merged.
const LABEL_JOINER: char = '：';

/// Separator used when repacking the pieces of an overlong bullet.
const REPACK_JOINER: &str = "、";

/// Marks that show a candidate is already a full sentence or clause.
const SENTENCE_ENDINGS: &[char] = &['。', '！', '？', '；', '!', '?', '.'];

/// Characters stripped from both ends of every bullet.
const EDGE_TRIM: &[char] = &['。', '；', ';'];

/// Characters stripped from the end only, so `.NET` keeps its dot.
const TRAILING_TRIM: &[char] = &['.'];

/// Secondary delimiters an overlong bullet may be split on.
const SECONDARY_DELIMITERS: &[char] = &['，', '、', '；', ',', ';'];

const COLON_ENDINGS: &[char] = &['：', ':'];

/// Limits applied during consolidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsolidatorOptions {
    /// Maximum number of bullets produced per call.
    pub max_bullets: usize,
    /// Soft cap on bullet length, in characters.
    pub max_chars: usize,
    /// A candidate this short (or shorter) may act as a label.
    pub label_max_chars: usize,
    /// The candidate after a label must be longer than this to absorb it.
    pub continuation_min_chars: usize,
}

impl Default for ConsolidatorOptions {
    fn default() -> Self {
        Self {
            max_bullets: 5,
            max_chars: 90,
            label_max_chars: 12,
            continuation_min_chars: 15,
        }
    }
}

/// Buffers raw lines into candidate bullets.
///
/// Paragraph lines are joined and sentence-split on flush; list items are
/// joined into a single candidate. Once `max_candidates` candidates exist
/// further flushes are discarded.
#[derive(Debug)]
pub struct FragmentAccumulator {
    normalizer: TextNormalizer,
    max_candidates: usize,
    candidates: Vec<String>,
    paragraph: Vec<String>,
    list: Vec<String>,
}

impl FragmentAccumulator {
    pub fn new(max_candidates: usize) -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            max_candidates,
            candidates: Vec::new(),
            paragraph: Vec::new(),
            list: Vec::new(),
        }
    }

    /// Whether the candidate limit has been reached.
    pub fn is_full(&self) -> bool {
        self.candidates.len() >= self.max_candidates
    }

    /// Add a non-list line to the paragraph buffer, closing any open list.
    pub fn append_paragraph_line(&mut self, line: &str) {
        self.flush_list();
        self.paragraph.push(line.to_string());
    }

    /// Add a list item (marker already stripped), closing any open paragraph.
    pub fn append_list_item(&mut self, item: &str) {
        self.flush_paragraph();
        if !item.trim().is_empty() {
            self.list.push(item.to_string());
        }
    }

    /// Turn the paragraph buffer into sentence candidates.
    pub fn flush_paragraph(&mut self) {
        let buffered = std::mem::take(&mut self.paragraph);
        if buffered.is_empty() || self.is_full() {
            return;
        }

        let joined = self.normalizer.normalize(&buffered.join(" "));
        for sentence in split_sentences(&joined) {
            if self.is_full() {
                break;
            }
            self.candidates.push(sentence);
        }
    }

    /// Turn the list buffer into a single joined candidate.
    pub fn flush_list(&mut self) {
        let buffered = std::mem::take(&mut self.list);
        if buffered.is_empty() || self.is_full() {
            return;
        }

        let items = self.normalizer.normalize_lines(buffered.iter().map(String::as_str));
        let combined = self.normalizer.normalize(&items.join(LIST_JOINER));
        if !combined.is_empty() {
            self.candidates.push(combined);
        }
    }

    /// Flush both buffers, paragraph first.
    pub fn flush_all(&mut self) {
        self.flush_paragraph();
        self.flush_list();
    }

    /// Flush and return the candidates collected so far.
    pub fn into_candidates(mut self) -> Vec<String> {
        self.flush_all();
        self.candidates
    }
}

/// Consolidates fragments into bullets.
#[derive(Debug, Clone, Default)]
pub struct BulletConsolidator {
    options: ConsolidatorOptions,
    normalizer: TextNormalizer,
}

impl BulletConsolidator {
    /// Create a consolidator with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a consolidator with custom limits.
    pub fn with_options(options: ConsolidatorOptions) -> Self {
        Self {
            options,
            normalizer: TextNormalizer::new(),
        }
    }

    /// Set the maximum number of bullets.
    pub fn with_max_bullets(mut self, max_bullets: usize) -> Self {
        self.options.max_bullets = max_bullets;
        self
    }

    pub fn options(&self) -> &ConsolidatorOptions {
        &self.options
    }

    /// Consolidate fragments according to the layout they were produced in.
    pub fn consolidate_layout<S: AsRef<str>>(
        &self,
        layout: FragmentLayout,
        fragments: &[S],
    ) -> Vec<String> {
        match layout {
            FragmentLayout::Lines => self.consolidate(fragments),
            FragmentLayout::Blocks => self.consolidate_blocks(fragments),
        }
    }

    /// Consolidate raw source lines. Blank lines separate paragraphs.
    pub fn consolidate<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        let candidates = self.buffer_lines(lines.iter().map(|line| line.as_ref()));
        self.finish(candidates)
    }

    /// Consolidate self-contained blocks; each block is its own paragraph.
    pub fn consolidate_blocks<S: AsRef<str>>(&self, blocks: &[S]) -> Vec<String> {
        let lines = blocks.iter().flat_map(|block| [block.as_ref(), ""]);
        let candidates = self.buffer_lines(lines);
        self.finish(candidates)
    }

    fn buffer_lines<'a, I>(&self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut acc = FragmentAccumulator::new(self.options.max_bullets);

        for raw in lines {
            if acc.is_full() {
                break;
            }

            let line = strip_quote_prefix(raw.trim());
            if self.normalizer.normalize(line).is_empty() || THEMATIC_BREAK_REGEX.is_match(line) {
                acc.flush_paragraph();
                continue;
            }

            match strip_list_marker(line) {
                Some(item) => acc.append_list_item(item),
                None => acc.append_paragraph_line(line),
            }
        }

        acc.into_candidates()
    }

    fn finish(&self, candidates: Vec<String>) -> Vec<String> {
        let merged = merge_labels(
            candidates,
            self.options.label_max_chars,
            self.options.continuation_min_chars,
        );
        let merged = merge_colon_continuations(merged);
        let unique = trim_and_dedup(merged);
        let mut bullets = bound_length(unique, self.options.max_chars);
        bullets.truncate(self.options.max_bullets);
        bullets
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn strip_quote_prefix(line: &str) -> &str {
    line.trim_start_matches(|c: char| c == '>' || c.is_whitespace())
}

/// Strip a list marker, returning the item text if `line` is a list item.
fn strip_list_marker(line: &str) -> Option<&str> {
    if let Some(m) = BULLET_GLYPH_REGEX.find(line) {
        return Some(line[m.end()..].trim_start());
    }

    if let Some(m) = PAREN_ORDINAL_REGEX.find(line) {
        return Some(line[m.end()..].trim_start());
    }

    if let Some(m) = NUMBERED_MARKER_REGEX.find(line) {
        let rest = &line[m.end()..];
        // `3.5 GHz` is a number, not a list item.
        if rest.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        return Some(rest.trim_start());
    }

    None
}

/// Merge a short label with a longer candidate that follows it.
fn merge_labels(
    candidates: Vec<String>,
    label_max_chars: usize,
    continuation_min_chars: usize,
) -> Vec<String> {
    let mut merged = Vec::with_capacity(candidates.len());
    let mut iter = candidates.into_iter().peekable();

    while let Some(current) = iter.next() {
        let is_label = char_len(&current) <= label_max_chars
            && !current.ends_with(SENTENCE_ENDINGS)
            && !current.ends_with(COLON_ENDINGS);

        if is_label {
            if let Some(next) = iter.next_if(|next| char_len(next) > continuation_min_chars) {
                merged.push(format!("{current}{LABEL_JOINER}{next}"));
                continue;
            }
        }
        merged.push(current);
    }
    merged
}

/// Join candidates ending in a colon with the candidate after them, until no
/// such pair remains.
fn merge_colon_continuations(mut candidates: Vec<String>) -> Vec<String> {
    loop {
        let mut changed = false;
        let mut merged = Vec::with_capacity(candidates.len());
        let mut iter = candidates.into_iter().peekable();

        while let Some(current) = iter.next() {
            if current.ends_with(COLON_ENDINGS) {
                if let Some(next) = iter.next() {
                    merged.push(current + &next);
                    changed = true;
                    continue;
                }
            }
            merged.push(current);
        }

        candidates = merged;
        if !changed {
            return candidates;
        }
    }
}

/// Trim trailing terminators and drop empty and repeated candidates.
fn trim_and_dedup(candidates: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let trimmed = candidate
            .trim_matches(|c: char| EDGE_TRIM.contains(&c) || c.is_whitespace())
            .trim_end_matches(|c: char| {
                TRAILING_TRIM.contains(&c) || EDGE_TRIM.contains(&c) || c.is_whitespace()
            });
        if trimmed.is_empty() || !seen.insert(trimmed.to_string()) {
            continue;
        }
        unique.push(trimmed.to_string());
    }
    unique
}

/// Re-split bullets longer than `max_chars` on secondary delimiters.
///
/// Pieces are greedily repacked while they fit. A bullet with no delimiter
/// is kept whole rather than cut mid-word.
fn bound_length(bullets: Vec<String>, max_chars: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut bounded = Vec::with_capacity(bullets.len());

    let mut emit = |bullet: String, bounded: &mut Vec<String>| {
        if seen.insert(bullet.clone()) {
            bounded.push(bullet);
        }
    };

    for bullet in bullets {
        if char_len(&bullet) <= max_chars || !bullet.contains(SECONDARY_DELIMITERS) {
            emit(bullet, &mut bounded);
            continue;
        }

        let mut current = String::new();
        for piece in bullet
            .split(SECONDARY_DELIMITERS)
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            if current.is_empty() {
                current.push_str(piece);
            } else if char_len(&current) + char_len(REPACK_JOINER) + char_len(piece) <= max_chars {
                current.push_str(REPACK_JOINER);
                current.push_str(piece);
            } else {
                emit(std::mem::take(&mut current), &mut bounded);
                current.push_str(piece);
            }
        }
        if !current.is_empty() {
            emit(current, &mut bounded);
        }
    }
    bounded
}
