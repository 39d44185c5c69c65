//! Plain-text outline output.
//!
//! Writes each slide as a numbered heading, an optional indented subtitle
//! and one `- ` line per bullet, with slides separated by a blank line.

use crate::types::Slide;

/// Formatter for a plain-text outline of a deck.
#[derive(Debug, Clone)]
pub struct OutlineFormatter {
    /// Whether to show the slide kind next to the number.
    show_kind: bool,
}

impl Default for OutlineFormatter {
    fn default() -> Self {
        Self { show_kind: true }
    }
}

impl OutlineFormatter {
    /// Create a new formatter that labels each slide with its kind.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the slide kind is printed.
    pub fn with_show_kind(mut self, show_kind: bool) -> Self {
        self.show_kind = show_kind;
        self
    }

    /// Format slides into outline text.
    ///
    /// # Example output
    /// ```text
    /// [01] (cover) AI技术核心解析报告
    ///     AI 深度研究报告
    ///
    /// [02] (agenda) 目录
    ///   - 算力基础
    ///   - 模型演进
    /// ```
    pub fn format(&self, slides: &[Slide]) -> String {
        slides
            .iter()
            .enumerate()
            .map(|(idx, slide)| self.format_slide(idx + 1, slide))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Format and add a trailing newline.
    pub fn format_with_newline(&self, slides: &[Slide]) -> String {
        let formatted = self.format(slides);
        if formatted.is_empty() {
            formatted
        } else {
            format!("{}\n", formatted)
        }
    }

    fn format_slide(&self, number: usize, slide: &Slide) -> String {
        let mut lines = Vec::with_capacity(slide.bullets.len() + 2);

        if self.show_kind {
            lines.push(format!("[{:02}] ({}) {}", number, slide.kind.as_str(), slide.title));
        } else {
            lines.push(format!("[{:02}] {}", number, slide.title));
        }

        if let Some(subtitle) = slide.subtitle.as_deref().filter(|s| !s.is_empty()) {
            lines.push(format!("    {}", subtitle));
        }

        lines.extend(slide.bullets.iter().map(|b| format!("  - {}", b)));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SlideKind;

    #[test]
    fn test_format_empty() {
        let formatter = OutlineFormatter::new();
        assert_eq!(formatter.format(&[]), "");
        assert_eq!(formatter.format_with_newline(&[]), "");
    }

    #[test]
    fn test_format_slides() {
        let slides = vec![
            Slide::new(SlideKind::Cover, "Report").with_subtitle("Overview"),
            Slide::new(SlideKind::Standard, "Topic")
                .with_bullets(vec!["First".to_string(), "Second".to_string()]),
        ];

        let formatter = OutlineFormatter::new();
        let expected = "[01] (cover) Report\n    Overview\n\n[02] (standard) Topic\n  - First\n  - Second";
        assert_eq!(formatter.format(&slides), expected);
    }

    #[test]
    fn test_format_without_kind() {
        let slides = vec![Slide::new(SlideKind::Conclusion, "End")];
        let formatter = OutlineFormatter::new().with_show_kind(false);
        assert_eq!(formatter.format_with_newline(&slides), "[01] End\n");
    }
}
