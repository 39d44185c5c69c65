//! Boundary-aware text extraction over a parsed HTML tree.
//!
//! A *boundary* is a section heading or a major subsection heading. Content
//! for a marker is everything after it in document order up to the next
//! boundary, collected by walking following siblings and climbing out of
//! wrapper containers until a scoping element is reached.

use deck_core::normalize::collapse_whitespace;
use scraper::{ElementRef, Node};

/// Tags whose subtrees never contribute text or boundaries.
pub const SKIP_TAGS: &[&str] = &[
    "script", "style", "canvas", "svg", "button", "noscript", "template", "iframe", "select",
    "input", "textarea",
];

/// Containers that scope a section; collection never climbs out of them.
const SCOPE_TAGS: &[&str] = &["section", "article", "main", "body", "html"];

/// Tags flattened into a single fragment.
const BLOCK_TAGS: &[&str] = &[
    "p", "blockquote", "li", "h1", "h2", "h3", "h4", "h5", "h6", "dt", "dd", "pre", "figcaption",
];

/// Which elements delimit sections and subsections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlConventions {
    /// Tag of section headings.
    pub section_tag: String,
    /// Tag of subsection headings.
    pub subsection_tag: String,
    /// When set, only subsection headings carrying this class are
    /// boundaries; others are ordinary content.
    pub major_class: Option<String>,
    pub skip_tags: Vec<String>,
}

impl Default for HtmlConventions {
    fn default() -> Self {
        Self {
            section_tag: "h2".to_string(),
            subsection_tag: "h3".to_string(),
            major_class: None,
            skip_tags: SKIP_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Result of extracting text from a subtree that may hold a boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Fragments found before the boundary (or in the whole subtree).
    pub fragments: Vec<String>,
    /// Whether extraction stopped because it reached a boundary.
    pub stopped_at_boundary: bool,
}

/// Walks an HTML tree according to a set of conventions.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryWalker<'c> {
    conventions: &'c HtmlConventions,
}

impl<'c> BoundaryWalker<'c> {
    pub fn new(conventions: &'c HtmlConventions) -> Self {
        Self { conventions }
    }

    pub fn is_skipped(&self, element: ElementRef) -> bool {
        let name = element.value().name();
        self.conventions.skip_tags.iter().any(|tag| tag == name)
    }

    pub fn is_section_heading(&self, element: ElementRef) -> bool {
        element.value().name() == self.conventions.section_tag
    }

    pub fn is_major_subsection(&self, element: ElementRef) -> bool {
        if element.value().name() != self.conventions.subsection_tag {
            return false;
        }
        match &self.conventions.major_class {
            Some(class) => element.value().classes().any(|c| c == class.as_str()),
            None => true,
        }
    }

    pub fn is_boundary(&self, element: ElementRef) -> bool {
        self.is_section_heading(element) || self.is_major_subsection(element)
    }

    /// Whether any element below `element` (outside skipped subtrees) is a
    /// boundary.
    pub fn contains_boundary(&self, element: ElementRef) -> bool {
        element
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| !self.is_skipped(*child))
            .any(|child| self.is_boundary(child) || self.contains_boundary(child))
    }

    /// All boundaries under `root`, in document order.
    pub fn markers<'a>(&self, root: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        let mut markers = Vec::new();
        self.collect_markers(root, &mut markers);
        markers
    }

    fn collect_markers<'a>(&self, element: ElementRef<'a>, markers: &mut Vec<ElementRef<'a>>) {
        for child in element.children().filter_map(ElementRef::wrap) {
            if self.is_skipped(child) {
                continue;
            }
            if self.is_boundary(child) {
                markers.push(child);
            } else {
                self.collect_markers(child, markers);
            }
        }
    }

    /// Visible text of `element` as one whitespace-collapsed string.
    pub fn flatten_text(&self, element: ElementRef) -> String {
        let mut parts = Vec::new();
        self.collect_text(element, &mut parts);
        collapse_whitespace(&parts.join(" "))
    }

    fn collect_text<'a>(&self, element: ElementRef<'a>, parts: &mut Vec<&'a str>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        parts.push(trimmed);
                    }
                }
                Node::Element(_) => {
                    if let Some(child_element) = ElementRef::wrap(child) {
                        if !self.is_skipped(child_element) {
                            self.collect_text(child_element, parts);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Extract every fragment in a subtree known to hold no boundary.
    pub fn extract_all(&self, element: ElementRef) -> Vec<String> {
        if self.is_skipped(element) || self.is_boundary(element) {
            return Vec::new();
        }

        let name = element.value().name();
        match name {
            "ul" | "ol" => self.flatten_children(element, &["li"]),
            "dl" => self.flatten_children(element, &["dt", "dd"]),
            "table" => self.table_rows(element),
            _ if BLOCK_TAGS.contains(&name) => non_empty(self.flatten_text(element)).into_iter().collect(),
            _ => {
                let mut fragments = Vec::new();
                for child in element.children() {
                    if let Some(text) = child.value().as_text() {
                        fragments.extend(non_empty(collapse_whitespace(text)));
                    } else if let Some(child_element) = ElementRef::wrap(child) {
                        fragments.extend(self.extract_all(child_element));
                    }
                }
                fragments
            }
        }
    }

    /// Extract fragments from `element` up to the first boundary inside it.
    pub fn extract_before_boundary(&self, element: ElementRef) -> Extraction {
        let mut fragments = Vec::new();

        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                fragments.extend(non_empty(collapse_whitespace(text)));
                continue;
            }
            let Some(child_element) = ElementRef::wrap(child) else {
                continue;
            };
            if self.is_skipped(child_element) {
                continue;
            }
            if self.is_boundary(child_element) {
                return Extraction {
                    fragments,
                    stopped_at_boundary: true,
                };
            }
            if self.contains_boundary(child_element) {
                let inner = self.extract_before_boundary(child_element);
                fragments.extend(inner.fragments);
                if inner.stopped_at_boundary {
                    return Extraction {
                        fragments,
                        stopped_at_boundary: true,
                    };
                }
                continue;
            }
            fragments.extend(self.extract_all(child_element));
        }

        Extraction {
            fragments,
            stopped_at_boundary: false,
        }
    }

    /// Collect the content that follows `marker` up to the next boundary.
    ///
    /// Walks the marker's following siblings; when they run out, continues
    /// after the enclosing container unless that container scopes the section.
    pub fn collect_following(&self, marker: ElementRef) -> Vec<String> {
        let mut fragments = Vec::new();
        let mut current = *marker;

        loop {
            for sibling in current.next_siblings() {
                if let Some(text) = sibling.value().as_text() {
                    fragments.extend(non_empty(collapse_whitespace(text)));
                    continue;
                }
                let Some(element) = ElementRef::wrap(sibling) else {
                    continue;
                };
                if self.is_skipped(element) {
                    continue;
                }
                if self.is_boundary(element) {
                    return fragments;
                }
                if self.contains_boundary(element) {
                    let extraction = self.extract_before_boundary(element);
                    fragments.extend(extraction.fragments);
                    if extraction.stopped_at_boundary {
                        return fragments;
                    }
                    continue;
                }
                fragments.extend(self.extract_all(element));
            }

            let Some(parent) = current.parent().and_then(ElementRef::wrap) else {
                return fragments;
            };
            if SCOPE_TAGS.contains(&parent.value().name()) {
                return fragments;
            }
            current = *parent;
        }
    }

    /// One fragment per direct child whose tag is in `tags`.
    fn flatten_children(&self, element: ElementRef, tags: &[&str]) -> Vec<String> {
        element
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| tags.contains(&child.value().name()))
            .flat_map(|child| non_empty(self.flatten_text(child)))
            .collect()
    }

    /// One fragment per table row: non-empty cells joined by ` | `.
    fn table_rows(&self, table: ElementRef) -> Vec<String> {
        let mut rows = Vec::new();
        for child in table.children().filter_map(ElementRef::wrap) {
            match child.value().name() {
                "tr" => rows.push(child),
                "thead" | "tbody" | "tfoot" => rows.extend(
                    child
                        .children()
                        .filter_map(ElementRef::wrap)
                        .filter(|row| row.value().name() == "tr"),
                ),
                _ => {}
            }
        }

        rows.into_iter()
            .flat_map(|row| {
                let cells: Vec<String> = row
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|cell| matches!(cell.value().name(), "td" | "th"))
                    .map(|cell| self.flatten_text(cell))
                    .filter(|text| !text.is_empty())
                    .collect();
                non_empty(cells.join(" | "))
            })
            .collect()
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(html: &'a Html, selector: &str) -> ElementRef<'a> {
        let selector = Selector::parse(selector).unwrap();
        html.select(&selector).next().unwrap()
    }

    #[test]
    fn test_major_class_required() {
        let conventions = HtmlConventions {
            major_class: Some("text-xl".to_string()),
            ..HtmlConventions::default()
        };
        let walker = BoundaryWalker::new(&conventions);
        let html = Html::parse_document(r#"<h3 class="text-xl font-bold">Major</h3><h3>Minor</h3>"#);

        let headings: Vec<ElementRef> = html.select(&Selector::parse("h3").unwrap()).collect();
        assert!(walker.is_boundary(headings[0]));
        assert!(!walker.is_boundary(headings[1]));
    }

    #[test]
    fn test_extract_all_lists_and_tables() {
        let conventions = HtmlConventions::default();
        let walker = BoundaryWalker::new(&conventions);
        let html = Html::parse_document(
            "<div id=\"c\">\
               <ul><li>训练卡</li><li> 推理  卡 </li><li></li></ul>\
               <table><tr><th>指标</th><th></th><th>值</th></tr><tr><td>带宽</td><td>400G</td></tr></table>\
               <dl><dt>术语</dt><dd>定义</dd></dl>\
               <p>Mixed <strong>inline</strong> text</p>\
             </div>",
        );

        let fragments = walker.extract_all(first(&html, "#c"));
        assert_eq!(
            fragments,
            vec![
                "训练卡",
                "推理 卡",
                "指标 | 值",
                "带宽 | 400G",
                "术语",
                "定义",
                "Mixed inline text",
            ]
        );
    }

    #[test]
    fn test_skipped_subtrees_ignored() {
        let conventions = HtmlConventions::default();
        let walker = BoundaryWalker::new(&conventions);
        let html = Html::parse_document(
            "<div id=\"c\"><p>keep</p><script>var x = 1;</script><button>Click</button>\
             <svg><text>chart</text></svg><template><h2>hidden</h2></template><p>also</p></div>",
        );

        let container = first(&html, "#c");
        assert_eq!(walker.extract_all(container), vec!["keep", "also"]);
        assert!(!walker.contains_boundary(container));
        assert!(walker.markers(container).is_empty());
    }

    #[test]
    fn test_extract_before_boundary_stops() {
        let conventions = HtmlConventions::default();
        let walker = BoundaryWalker::new(&conventions);
        let html = Html::parse_document(
            "<div id=\"c\"><p>before</p><div><p>deep</p><h3>Sub</h3><p>after</p></div><p>tail</p></div>",
        );

        let extraction = walker.extract_before_boundary(first(&html, "#c"));
        assert!(extraction.stopped_at_boundary);
        assert_eq!(extraction.fragments, vec!["before", "deep"]);
    }

    #[test]
    fn test_extract_before_boundary_without_boundary() {
        let conventions = HtmlConventions::default();
        let walker = BoundaryWalker::new(&conventions);
        let html = Html::parse_document("<div id=\"c\"><p>only</p></div>");

        let extraction = walker.extract_before_boundary(first(&html, "#c"));
        assert!(!extraction.stopped_at_boundary);
        assert_eq!(extraction.fragments, vec!["only"]);
    }

    #[test]
    fn test_collect_following_climbs_out_of_wrappers() {
        let conventions = HtmlConventions::default();
        let walker = BoundaryWalker::new(&conventions);
        let html = Html::parse_document(
            "<section>\
               <div class=\"header\"><h2 id=\"s\">Section</h2></div>\
               <p>intro</p>\
               <div class=\"grid\">\
                 <div class=\"card\"><h3 id=\"a\">A</h3><p>a body</p></div>\
                 <div class=\"card\"><h3 id=\"b\">B</h3><p>b body</p></div>\
               </div>\
             </section>\
             <p>outside</p>",
        );

        assert_eq!(walker.collect_following(first(&html, "#s")), vec!["intro"]);
        assert_eq!(walker.collect_following(first(&html, "#a")), vec!["a body"]);
        assert_eq!(walker.collect_following(first(&html, "#b")), vec!["b body"]);
    }

    #[test]
    fn test_markers_in_document_order() {
        let conventions = HtmlConventions::default();
        let walker = BoundaryWalker::new(&conventions);
        let html = Html::parse_document(
            "<h2>One</h2><div><h3>One.A</h3></div><h4>minor</h4><h2>Two</h2>",
        );

        let titles: Vec<String> = walker
            .markers(html.root_element())
            .into_iter()
            .map(|m| walker.flatten_text(m))
            .collect();
        assert_eq!(titles, vec!["One", "One.A", "Two"]);
    }
}
