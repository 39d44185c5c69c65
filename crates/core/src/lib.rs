//! Core domain types, text normalization, bullet consolidation, pagination
//! and deck assembly for turning structured documents into slide decks.

pub mod assemble;
pub mod builder;
pub mod config;
pub mod consolidate;
pub mod error;
pub mod normalize;
pub mod outline;
pub mod paginate;
pub mod segment;
pub mod types;

pub use assemble::{DeckAssembler, Policy};
pub use builder::DocumentBuilder;
pub use config::{BoundedOptions, DeckConfig, OverviewConfig, StaticSlide, UnboundedOptions};
pub use consolidate::{BulletConsolidator, ConsolidatorOptions, FragmentAccumulator};
pub use error::{Error, Result};
pub use normalize::TextNormalizer;
pub use outline::OutlineFormatter;
pub use paginate::{ContinuationStyle, Paginator};
pub use segment::split_sentences;
pub use types::{Document, FragmentLayout, Section, Slide, SlideKind, SourceFormat, Subsection};
