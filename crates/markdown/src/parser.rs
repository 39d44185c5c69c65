//! Markdown document parser implementation.

use deck_core::{Document, DocumentBuilder, FragmentLayout, Result, TextNormalizer};
use std::io::Read;

/// Line prefix of the document title.
const TITLE_PREFIX: &str = "# ";

/// Line prefix of a section heading.
const SECTION_PREFIX: &str = "## ";

/// Line prefix of a subsection heading.
const SUBSECTION_PREFIX: &str = "### ";

/// Code fence openers; fenced blocks never contribute content.
const FENCE_MARKERS: &[&str] = &["```", "~~~"];

/// Parser for line-oriented Markdown documents.
pub struct MarkdownParser {
    normalizer: TextNormalizer,
}

impl MarkdownParser {
    /// Create a new Markdown parser.
    pub fn new() -> Self {
        Self {
            normalizer: TextNormalizer::new(),
        }
    }

    /// Parse a Markdown document from a reader.
    pub fn parse<R: Read>(&self, mut reader: R) -> Result<Document> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        Ok(self.parse_str(&source))
    }

    /// Parse a Markdown document from a string.
    pub fn parse_str(&self, source: &str) -> Document {
        let mut builder = DocumentBuilder::new(FragmentLayout::Lines);
        let mut fence: Option<&str> = None;
        let mut seen_title = false;

        for raw_line in source.trim_start_matches('\u{feff}').lines() {
            let line = raw_line.trim_end();

            if let Some(marker) = fence {
                if line.trim_start().starts_with(marker) {
                    fence = None;
                }
                continue;
            }
            if let Some(marker) = fence_marker(line) {
                log::trace!("Skipping fenced block opened by {}", marker);
                fence = Some(marker);
                continue;
            }

            if let Some(title) = line.strip_prefix(SECTION_PREFIX) {
                builder.start_section(self.normalizer.normalize(title));
                continue;
            }

            if let Some(title) = line.strip_prefix(SUBSECTION_PREFIX) {
                builder.start_subsection(self.normalizer.normalize(title));
                continue;
            }

            if !builder.has_section() {
                // Front matter: the first `# ` heading and the line after it
                // describe the document; anything else here is discarded.
                if let Some(title) = line.strip_prefix(TITLE_PREFIX) {
                    if !seen_title {
                        builder.set_title(self.normalizer.normalize(title));
                        seen_title = true;
                    }
                } else if seen_title {
                    let text = self.normalizer.normalize(strip_quote(line));
                    if !text.is_empty() {
                        builder.set_subtitle(text);
                    }
                }
                continue;
            }

            builder.push_fragment(line);
        }

        if fence.is_some() {
            log::debug!("Unterminated code fence; rest of document skipped");
        }

        let document = builder.finish();
        log::debug!(
            "Parsed {} sections, {} subsections",
            document.sections.len(),
            document.subsection_count()
        );
        document
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_quote(line: &str) -> &str {
    line.trim_start_matches(|c: char| c == '>' || c.is_whitespace())
}

/// Return the fence marker if `line` opens a fenced code block.
fn fence_marker(line: &str) -> Option<&'static str> {
    let trimmed = line.trim_start();
    FENCE_MARKERS
        .iter()
        .copied()
        .find(|marker| trimmed.starts_with(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const REPORT: &str = "\
# AI 深度研究报告
> 面向决策层的技术洞察

开头的说明文字会被丢弃

## 一、算力基础
GPU 是核心。
### 1.1 芯片
- 训练卡
- 推理卡
### 1.2 网络
高速互联很关键。

## 二、**模型**演进
模型规模持续增长。
";

    #[test]
    fn test_parse_structure() {
        let doc = MarkdownParser::new().parse_str(REPORT);

        assert_eq!(doc.layout, FragmentLayout::Lines);
        assert_eq!(doc.title.as_deref(), Some("AI 深度研究报告"));
        assert_eq!(doc.subtitle.as_deref(), Some("面向决策层的技术洞察"));
        assert_eq!(doc.section_titles(), vec!["一、算力基础", "二、模型演进"]);

        let first = &doc.sections[0];
        assert_eq!(first.intro_fragments, vec!["GPU 是核心。"]);
        assert_eq!(first.subsections.len(), 2);
        assert_eq!(first.subsections[0].title, "1.1 芯片");
        assert_eq!(first.subsections[0].fragments, vec!["- 训练卡", "- 推理卡"]);
        assert_eq!(first.subsections[1].fragments, vec!["高速互联很关键。", ""]);

        assert_eq!(doc.sections[1].intro_fragments, vec!["模型规模持续增长。"]);
    }

    #[test]
    fn test_subsection_before_section_dropped() {
        let source = "### 孤立小节\n孤立内容\n## 正式章节\n正文\n";
        let doc = MarkdownParser::new().parse_str(source);

        assert_eq!(doc.sections.len(), 1);
        assert!(doc.sections[0].subsections.is_empty());
        assert_eq!(doc.sections[0].intro_fragments, vec!["正文"]);
    }

    #[test]
    fn test_fenced_code_skipped() {
        let source = "## Setup\nInstall it.\n```bash\n## not a section\n### nor this\n```\nDone.\n";
        let doc = MarkdownParser::new().parse_str(source);

        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].intro_fragments, vec!["Install it.", "Done."]);
    }

    #[test]
    fn test_deeper_headings_are_content() {
        let source = "## A\n#### detail\ntext\n";
        let doc = MarkdownParser::new().parse_str(source);
        assert_eq!(doc.sections[0].intro_fragments, vec!["#### detail", "text"]);
    }

    #[test]
    fn test_parse_from_reader_with_crlf() {
        let source = "## One\r\nline\r\n### Sub\r\nbody\r\n";
        let doc = MarkdownParser::new().parse(Cursor::new(source)).unwrap();

        assert_eq!(doc.sections[0].title, "One");
        assert_eq!(doc.sections[0].intro_fragments, vec!["line"]);
        assert_eq!(doc.sections[0].subsections[0].fragments, vec!["body"]);
    }

    #[test]
    fn test_empty_source() {
        let doc = MarkdownParser::new().parse_str("");
        assert!(doc.sections.is_empty());
        assert!(doc.title.is_none());
    }
}
