//! HTML input adapter for slide deck building.
//!
//! Treats `h2` headings as sections and (optionally class-flagged) `h3`
//! headings as subsection boundaries. Text is extracted block by block, and
//! extraction never crosses into the content of the next boundary.

pub mod parser;
pub mod traverse;

pub use parser::HtmlParser;
pub use traverse::{BoundaryWalker, Extraction, HtmlConventions};
