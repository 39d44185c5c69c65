//! Incremental construction of a [`Document`] from heading and content events.
//!
//! Both input adapters drive the same builder, so the rules for where a
//! fragment lands live in one place:
//!
//! - a section heading opens a new section and closes any open subsection
//! - a subsection heading opens a subsection in the current section, or is
//!   dropped when no section is open yet
//! - content goes to the open subsection, else to the section intro, else
//!   it is discarded

use crate::types::{Document, FragmentLayout, Section, Subsection};

/// Builds a [`Document`] one event at a time.
#[derive(Debug)]
pub struct DocumentBuilder {
    document: Document,
    in_subsection: bool,
    dropped_subsections: usize,
    dropped_fragments: usize,
}

impl DocumentBuilder {
    pub fn new(layout: FragmentLayout) -> Self {
        Self {
            document: Document::new(layout),
            in_subsection: false,
            dropped_subsections: 0,
            dropped_fragments: 0,
        }
    }

    /// Set the document title. The first title wins.
    pub fn set_title(&mut self, title: impl Into<String>) {
        if self.document.title.is_none() {
            self.document.title = Some(title.into());
        }
    }

    /// Set the document subtitle. The first subtitle wins.
    pub fn set_subtitle(&mut self, subtitle: impl Into<String>) {
        if self.document.subtitle.is_none() {
            self.document.subtitle = Some(subtitle.into());
        }
    }

    /// Whether a section is currently open.
    pub fn has_section(&self) -> bool {
        !self.document.sections.is_empty()
    }

    pub fn start_section(&mut self, title: impl Into<String>) {
        let title = title.into();
        log::trace!("section: {}", title);
        self.document.sections.push(Section::new(title));
        self.in_subsection = false;
    }

    /// Open a subsection. Returns `false` if it was dropped because no
    /// section is open.
    pub fn start_subsection(&mut self, title: impl Into<String>) -> bool {
        let title = title.into();
        match self.document.sections.last_mut() {
            Some(section) => {
                log::trace!("subsection: {}", title);
                section.subsections.push(Subsection::new(title));
                self.in_subsection = true;
                true
            }
            None => {
                log::debug!("Dropping subsection '{}' before any section", title);
                self.dropped_subsections += 1;
                false
            }
        }
    }

    /// Append a content fragment to whatever block is open.
    pub fn push_fragment(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        let Some(section) = self.document.sections.last_mut() else {
            self.dropped_fragments += 1;
            return;
        };

        if self.in_subsection {
            if let Some(subsection) = section.subsections.last_mut() {
                subsection.fragments.push(fragment);
                return;
            }
        }
        section.intro_fragments.push(fragment);
    }

    /// Append several fragments in order.
    pub fn extend_fragments<I, S>(&mut self, fragments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for fragment in fragments {
            self.push_fragment(fragment);
        }
    }

    /// Finish building and return the document.
    pub fn finish(self) -> Document {
        if self.dropped_subsections > 0 || self.dropped_fragments > 0 {
            log::debug!(
                "Dropped {} subsection(s) and {} fragment(s) outside any section",
                self.dropped_subsections,
                self.dropped_fragments
            );
        }
        self.document
    }
}
