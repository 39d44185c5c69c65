//! HTML document parser implementation.

use crate::traverse::{BoundaryWalker, HtmlConventions};
use deck_core::{Document, DocumentBuilder, FragmentLayout, Result};
use scraper::{ElementRef, Html};
use std::io::Read;

/// Parser for HTML report pages.
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    conventions: HtmlConventions,
}

impl HtmlParser {
    /// Create a parser with the default conventions (`h2` sections, every
    /// `h3` a subsection).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conventions(mut self, conventions: HtmlConventions) -> Self {
        self.conventions = conventions;
        self
    }

    /// Only treat subsection headings carrying `class` as boundaries.
    pub fn with_major_class(mut self, class: impl Into<String>) -> Self {
        self.conventions.major_class = Some(class.into());
        self
    }

    pub fn conventions(&self) -> &HtmlConventions {
        &self.conventions
    }

    /// Parse an HTML document from a reader.
    pub fn parse<R: Read>(&self, mut reader: R) -> Result<Document> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        Ok(self.parse_str(&source))
    }

    /// Parse an HTML document from a string.
    pub fn parse_str(&self, source: &str) -> Document {
        let html = Html::parse_document(source);
        let root = html.root_element();
        let walker = BoundaryWalker::new(&self.conventions);
        let mut builder = DocumentBuilder::new(FragmentLayout::Blocks);

        let (title, subtitle) = front_matter(&walker, root);
        if let Some(title) = title {
            builder.set_title(title);
        }
        if let Some(subtitle) = subtitle {
            builder.set_subtitle(subtitle);
        }

        let markers = walker.markers(root);
        log::trace!("Found {} boundary headings", markers.len());

        for marker in markers {
            let title = walker.flatten_text(marker);
            if walker.is_section_heading(marker) {
                builder.start_section(title);
            } else if !builder.start_subsection(title) {
                continue;
            }
            builder.extend_fragments(walker.collect_following(marker));
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

/// The first visible `h1` and the first `p` after it in document order.
fn front_matter(walker: &BoundaryWalker, root: ElementRef) -> (Option<String>, Option<String>) {
    let mut title = None;

    for element in root.descendants().filter_map(ElementRef::wrap) {
        if is_hidden(walker, element) {
            continue;
        }
        let name = element.value().name();
        if name == "h1" && title.is_none() {
            let text = walker.flatten_text(element);
            if !text.is_empty() {
                title = Some(text);
            }
        } else if name == "p" && title.is_some() {
            let text = walker.flatten_text(element);
            if !text.is_empty() {
                return (title, Some(text));
            }
        }
    }

    (title, None)
}

fn is_hidden(walker: &BoundaryWalker, element: ElementRef) -> bool {
    walker.is_skipped(element)
        || element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| walker.is_skipped(ancestor))
}
