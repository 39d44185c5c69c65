//! Markdown input adapter for slide deck building.
//!
//! Reads `## ` lines as sections and `### ` lines as subsections; every other
//! line becomes a raw fragment for the consolidator.

pub mod parser;

pub use parser::MarkdownParser;
