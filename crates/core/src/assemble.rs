//! Deck assembly.
//!
//! Drives consolidation and pagination over a whole [`Document`] and adds
//! the slides that do not come from section content: cover, overview,
//! agenda, synthesis and conclusion.

use crate::config::DeckConfig;
use crate::consolidate::BulletConsolidator;
use crate::error::{Error, Result};
use crate::paginate::Paginator;
use crate::types::{Document, Section, Slide, SlideKind};

/// How the deck length is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// One slide group per section and subsection; length follows content.
    Unbounded,
    /// Exactly `target` slides, filled by priority.
    Bounded { target: usize },
}

/// Builds slide decks from parsed documents.
#[derive(Debug, Clone, Default)]
pub struct DeckAssembler {
    config: DeckConfig,
}

impl DeckAssembler {
    pub fn new(config: DeckConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    /// Assemble the deck for `document` under `policy`.
    pub fn assemble(&self, document: &Document, policy: Policy) -> Result<Vec<Slide>> {
        self.config.validate()?;

        match policy {
            Policy::Unbounded => Ok(self.assemble_unbounded(document)),
            Policy::Bounded { target } => self.assemble_bounded(document, target),
        }
    }

    /// Assemble under the bounded policy with the configured target length.
    pub fn assemble_with_target(&self, document: &Document) -> Result<Vec<Slide>> {
        let target = self.config.bounded.target_slides;
        self.assemble(document, Policy::Bounded { target })
    }

    fn assemble_unbounded(&self, document: &Document) -> Vec<Slide> {
        let options = &self.config.unbounded;
        let consolidator = BulletConsolidator::new().with_max_bullets(options.max_bullets_per_group);
        let paginator = Paginator::new()
            .with_chunk_size(options.chunk_size)
            .with_style(options.continuation);
        let agenda_paginator = Paginator::new()
            .with_chunk_size(options.agenda_chunk_size)
            .with_style(options.continuation);

        let mut slides = vec![self.cover_slide(document, false)];

        let titles: Vec<String> = document
            .sections
            .iter()
            .enumerate()
            .map(|(idx, section)| display_title(section, idx + 1))
            .collect();
        slides.extend(agenda_paginator.paginate(
            SlideKind::Agenda,
            &self.config.agenda_title,
            None,
            &titles,
        ));

        for (idx, (section, title)) in document.sections.iter().zip(&titles).enumerate() {
            let label = section_label(idx + 1);
            let intro = consolidator.consolidate_layout(document.layout, &section.intro_fragments);
            slides.extend(paginator.paginate(SlideKind::SectionIntro, title, Some(label.as_str()), &intro));

            for subsection in &section.subsections {
                let bullets = consolidator.consolidate_layout(document.layout, &subsection.fragments);
                if bullets.is_empty() {
                    log::debug!("Skipping empty subsection '{}' in '{}'", subsection.title, title);
                    continue;
                }

                let sub_title = non_empty_or(&subsection.title, title);
                slides.extend(paginator.paginate(SlideKind::Standard, &sub_title, Some(title.as_str()), &bullets));
            }
        }

        log::debug!(
            "Assembled {} slides from {} sections",
            slides.len(),
            document.sections.len()
        );
        slides
    }

    fn assemble_bounded(&self, document: &Document, target: usize) -> Result<Vec<Slide>> {
        if target == 0 {
            return Err(Error::InvalidConfig(
                "bounded deck needs at least 1 slide".to_string(),
            ));
        }

        let options = &self.config.bounded;
        let intro_consolidator = BulletConsolidator::new().with_max_bullets(options.intro_bullets);
        let sub_consolidator = BulletConsolidator::new().with_max_bullets(options.bullets_per_slide);

        // One slot stays reserved for the conclusion.
        let mut deck = SlotBudget::new(target - 1);

        deck.try_push(self.cover_slide(document, true));
        deck.try_push(self.overview_slide(document, &intro_consolidator));
        deck.try_push(self.agenda_slide(document));

        'sections: for (idx, section) in document.sections.iter().enumerate() {
            if deck.is_full() {
                break;
            }

            let title = display_title(section, idx + 1);
            let intro = intro_consolidator.consolidate_layout(document.layout, &section.intro_fragments);
            if !intro.is_empty() {
                let slide = Slide::new(SlideKind::SectionIntro, title.as_str())
                    .with_subtitle(section_label(idx + 1))
                    .with_bullets(intro);
                if !deck.try_push(slide) {
                    break;
                }
            }

            let mut added = 0;
            for subsection in &section.subsections {
                if added >= options.max_subsection_slides {
                    break;
                }

                let mut bullets = sub_consolidator.consolidate_layout(document.layout, &subsection.fragments);
                if bullets.is_empty() {
                    continue;
                }
                bullets.truncate(options.bullets_per_slide);

                let slide = Slide::new(SlideKind::Standard, non_empty_or(&subsection.title, &title))
                    .with_subtitle(title.as_str())
                    .with_bullets(bullets);
                if !deck.try_push(slide) {
                    break 'sections;
                }
                added += 1;
            }
        }

        if deck.is_full() {
            log::debug!("Slot budget exhausted by document content");
        }

        for synthesis in &self.config.synthesis {
            if !deck.try_push(synthesis.to_slide(SlideKind::Summary)) {
                break;
            }
        }

        let padding = deck.pad_with_last();
        if padding > 0 {
            log::warn!("Padded deck with {} duplicate(s) of the last slide", padding);
        }

        let mut slides = deck.into_slides();
        slides.push(self.config.conclusion.to_slide(SlideKind::Conclusion));

        if slides.len() != target {
            return Err(Error::DeckLengthMismatch {
                expected: target,
                actual: slides.len(),
            });
        }
        Ok(slides)
    }

    fn cover_slide(&self, document: &Document, with_bullets: bool) -> Slide {
        let cover = &self.config.cover;
        let title = document
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&cover.title);

        let mut slide = Slide::new(SlideKind::Cover, title);
        slide.subtitle = document
            .subtitle
            .clone()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| cover.subtitle.clone());
        if with_bullets {
            slide.bullets = cover.bullets.clone();
        }
        slide
    }

    fn overview_slide(&self, document: &Document, consolidator: &BulletConsolidator) -> Slide {
        let overview = &self.config.overview;
        let mut bullets = document
            .sections
            .first()
            .map(|section| consolidator.consolidate_layout(document.layout, &section.intro_fragments))
            .unwrap_or_default();
        bullets.truncate(overview.max_bullets);
        if bullets.is_empty() {
            bullets = overview.fallback_bullets.clone();
        }

        Slide {
            kind: SlideKind::Overview,
            title: overview.title.clone(),
            subtitle: overview.subtitle.clone(),
            bullets,
        }
    }

    fn agenda_slide(&self, document: &Document) -> Slide {
        let bullets = document
            .sections
            .iter()
            .enumerate()
            .map(|(idx, section)| format!("{:02}. {}", idx + 1, display_title(section, idx + 1)))
            .collect();

        Slide::new(SlideKind::Agenda, self.config.bounded_agenda_title.as_str())
            .with_subtitle(format!("共 {} 个板块", document.sections.len()))
            .with_bullets(bullets)
    }
}

/// Slide list with a fixed number of slots.
struct SlotBudget {
    slides: Vec<Slide>,
    capacity: usize,
}

impl SlotBudget {
    fn new(capacity: usize) -> Self {
        Self {
            slides: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    fn is_full(&self) -> bool {
        self.slides.len() >= self.capacity
    }

    /// Add a slide if a slot is free. Returns `false` when full.
    fn try_push(&mut self, slide: Slide) -> bool {
        if self.is_full() {
            return false;
        }
        self.slides.push(slide);
        true
    }

    /// Fill the remaining slots with copies of the last slide.
    fn pad_with_last(&mut self) -> usize {
        let Some(last) = self.slides.last().cloned() else {
            return 0;
        };

        let mut added = 0;
        while self.try_push(last.clone()) {
            added += 1;
        }
        added
    }

    fn into_slides(self) -> Vec<Slide> {
        self.slides
    }
}

/// `板块 01`, `板块 02`, ...
fn section_label(index: usize) -> String {
    format!("板块 {index:02}")
}

fn display_title(section: &Section, index: usize) -> String {
    non_empty_or(&section.title, &section_label(index))
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
