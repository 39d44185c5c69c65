//! Domain types for parsed documents and the slide records built from them.

use serde::{Deserialize, Serialize};

/// A parsed source document: an ordered list of sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document-level heading, if the source has one.
    pub title: Option<String>,

    /// Short line following the document heading.
    pub subtitle: Option<String>,

    /// How the fragments of this document should be consolidated.
    pub layout: FragmentLayout,

    /// Sections in document order.
    pub sections: Vec<Section>,
}

impl Document {
    /// Create an empty document with the given fragment layout.
    pub fn new(layout: FragmentLayout) -> Self {
        Self {
            title: None,
            subtitle: None,
            layout,
            sections: Vec::new(),
        }
    }

    /// Titles of all sections, in order.
    pub fn section_titles(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.title.as_str()).collect()
    }

    /// Total number of subsections across all sections.
    pub fn subsection_count(&self) -> usize {
        self.sections.iter().map(|s| s.subsections.len()).sum()
    }
}

/// Shape of the fragments an input adapter produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FragmentLayout {
    /// Raw source lines; blank lines separate paragraphs.
    #[default]
    Lines,
    /// Self-contained text blocks, one paragraph each.
    Blocks,
}

/// A top-level section with its intro text and subsections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,

    /// Fragments between the section heading and the first subsection.
    pub intro_fragments: Vec<String>,

    pub subsections: Vec<Subsection>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            intro_fragments: Vec::new(),
            subsections: Vec::new(),
        }
    }
}

/// A subsection and the fragments collected under it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsection {
    pub title: String,
    pub fragments: Vec<String>,
}

impl Subsection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fragments: Vec::new(),
        }
    }
}

/// The role a slide plays in the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideKind {
    Cover,
    Overview,
    Agenda,
    SectionIntro,
    Standard,
    Summary,
    Conclusion,
}

impl SlideKind {
    /// Stable lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Overview => "overview",
            Self::Agenda => "agenda",
            Self::SectionIntro => "section-intro",
            Self::Standard => "standard",
            Self::Summary => "summary",
            Self::Conclusion => "conclusion",
        }
    }
}

/// A single slide record handed to a rendering backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub kind: SlideKind,

    /// Slide heading. Never empty.
    pub title: String,

    /// Badge or subtitle line shown with the heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Bullet points in display order.
    #[serde(default)]
    pub bullets: Vec<String>,
}

impl Slide {
    /// Create a slide with no subtitle and no bullets.
    pub fn new(kind: SlideKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            subtitle: None,
            bullets: Vec::new(),
        }
    }

    /// Set the subtitle.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Set the bullets.
    pub fn with_bullets(mut self, bullets: Vec<String>) -> Self {
        self.bullets = bullets;
        self
    }
}

/// The markup flavour of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Line-oriented Markdown text.
    Markdown,
    /// HTML tag tree.
    Html,
}

impl SourceFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" | "txt" => Some(Self::Markdown),
            "html" | "htm" | "xhtml" => Some(Self::Html),
            _ => None,
        }
    }

    /// Detect format by sniffing the start of the document.
    ///
    /// Anything starting with a tag is treated as HTML; other non-empty text
    /// is Markdown.
    pub fn from_content(source: &str) -> Option<Self> {
        let head = source.trim_start_matches('\u{feff}').trim_start();
        if head.is_empty() {
            return None;
        }

        let lowered: String = head.chars().take(16).collect::<String>().to_lowercase();
        if lowered.starts_with("<!doctype")
            || lowered.starts_with("<html")
            || lowered.starts_with("<?xml")
        {
            return Some(Self::Html);
        }

        // A leading tag such as `<main>` or `<div class=...>`.
        let mut chars = head.chars();
        if chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return Some(Self::Html);
        }

        Some(Self::Markdown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Html => "html",
        }
    }
}
