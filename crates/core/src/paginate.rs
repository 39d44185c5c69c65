//! Pagination of bullet lists into slides.
//!
//! Chunks an ordered bullet list into slides of at most `chunk_size` bullets.
//! When a list spans several slides, titles carry a continuation marker.

use crate::types::{Slide, SlideKind};

/// How continuation slides are titled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContinuationStyle {
    /// Every page gets `（index/total）`: `标题（1/2）`, `标题（2/2）`.
    #[default]
    Fraction,
    /// The first page keeps the base title, then `（续）`, `（续2）`, ...
    Continued,
}

impl ContinuationStyle {
    /// Title for the 1-based `index`-th page out of `total`.
    fn title(&self, base: &str, index: usize, total: usize) -> String {
        if total <= 1 {
            return base.to_string();
        }

        match self {
            Self::Fraction => format!("{base}（{index}/{total}）"),
            Self::Continued => match index {
                1 => base.to_string(),
                2 => format!("{base}（续）"),
                n => format!("{base}（续{}）", n - 1),
            },
        }
    }
}

/// Splits bullet lists into slides.
#[derive(Debug, Clone)]
pub struct Paginator {
    /// Number of bullets per slide.
    chunk_size: usize,
    style: ContinuationStyle,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            chunk_size: 5,
            style: ContinuationStyle::Fraction,
        }
    }
}

impl Paginator {
    /// Create a paginator with the default 5 bullets per slide.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of bullets per slide.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1); // At least 1 bullet per slide
        self
    }

    /// Set how continuation slides are titled.
    pub fn with_style(mut self, style: ContinuationStyle) -> Self {
        self.style = style;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of slides `count` bullets paginate into.
    pub fn page_count(&self, count: usize) -> usize {
        count.div_ceil(self.chunk_size)
    }

    /// Split `bullets` into slides of the given kind.
    ///
    /// An empty list produces no slides. A list that fits on one slide keeps
    /// `title` unchanged; longer lists get continuation-marked titles.
    pub fn paginate(
        &self,
        kind: SlideKind,
        title: &str,
        subtitle: Option<&str>,
        bullets: &[String],
    ) -> Vec<Slide> {
        let total = self.page_count(bullets.len());

        bullets
            .chunks(self.chunk_size)
            .enumerate()
            .map(|(idx, chunk)| Slide {
                kind,
                title: self.style.title(title, idx + 1, total),
                subtitle: subtitle.map(str::to_string),
                bullets: chunk.to_vec(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullets(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_paginate_empty() {
        let paginator = Paginator::new();
        assert!(paginator.paginate(SlideKind::Standard, "Title", None, &[]).is_empty());
    }

    #[test]
    fn test_paginate_single_page_keeps_title() {
        let paginator = Paginator::new();
        let slides = paginator.paginate(
            SlideKind::Standard,
            "Title",
            Some("Section"),
            &bullets(&["A", "B", "C", "D", "E"]),
        );

        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "Title");
        assert_eq!(slides[0].subtitle.as_deref(), Some("Section"));
        assert_eq!(slides[0].bullets.len(), 5);
    }

    #[test]
    fn test_paginate_fraction_titles() {
        let paginator = Paginator::new().with_chunk_size(5);
        let slides = paginator.paginate(
            SlideKind::Standard,
            "Title",
            None,
            &bullets(&["A", "B", "C", "D", "E", "F", "G"]),
        );

        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].title, "Title（1/2）");
        assert_eq!(slides[0].bullets, vec!["A", "B", "C", "D", "E"]);
        assert_eq!(slides[1].title, "Title（2/2）");
        assert_eq!(slides[1].bullets, vec!["F", "G"]);
    }

    #[test]
    fn test_paginate_continued_titles() {
        let paginator = Paginator::new()
            .with_chunk_size(2)
            .with_style(ContinuationStyle::Continued);
        let slides = paginator.paginate(
            SlideKind::Standard,
            "部署",
            None,
            &bullets(&["1", "2", "3", "4", "5", "6", "7"]),
        );

        let titles: Vec<&str> = slides.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["部署", "部署（续）", "部署（续2）", "部署（续3）"]);
    }

    #[test]
    fn test_pagination_preserves_order_and_bounds() {
        let items: Vec<String> = (0..23).map(|i| i.to_string()).collect();

        for k in 1..=9 {
            let paginator = Paginator::new().with_chunk_size(k);
            let slides = paginator.paginate(SlideKind::Standard, "T", None, &items);

            assert_eq!(slides.len(), items.len().div_ceil(k));
            assert!(slides.iter().all(|s| s.bullets.len() <= k));

            let flattened: Vec<String> = slides.into_iter().flat_map(|s| s.bullets).collect();
            assert_eq!(flattened, items);
        }
    }

    #[test]
    fn test_chunk_size_at_least_one() {
        let paginator = Paginator::new().with_chunk_size(0);
        assert_eq!(paginator.chunk_size(), 1);
        assert_eq!(paginator.page_count(3), 3);
    }
}
