//! WASM-compatible wrapper for slide deck building.
//!
//! This crate exposes deck building to JavaScript for use in Cloudflare
//! Workers.

use deck_core::{DeckAssembler, OutlineFormatter, Policy, Slide, SourceFormat};
use deck_html::HtmlParser;
use deck_markdown::MarkdownParser;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of building a deck.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeckResult {
    /// Detected format of the source document.
    pub format: String,
    /// Number of sections found in the source.
    pub section_count: usize,
    /// The assembled slides.
    pub slides: Vec<Slide>,
}

/// Build a slide deck from a Markdown or HTML report.
///
/// # Arguments
/// * `source` - The report text
/// * `filename` - The original filename (used for format detection)
/// * `target` - Exact deck length; omit for one slide group per section
///
/// # Returns
/// A JavaScript object with the deck, or throws on error.
#[wasm_bindgen]
pub fn build_deck(source: &str, filename: &str, target: Option<usize>) -> Result<JsValue, JsValue> {
    let result = build_deck_impl(source, filename, target).map_err(|e| JsValue::from_str(&e))?;

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn build_deck_impl(source: &str, filename: &str, target: Option<usize>) -> Result<DeckResult, String> {
    let format = filename
        .rsplit_once('.')
        .and_then(|(_, ext)| SourceFormat::from_extension(ext))
        .or_else(|| SourceFormat::from_content(source))
        .ok_or_else(|| "Could not detect source format".to_string())?;

    let document = match format {
        SourceFormat::Markdown => MarkdownParser::new().parse_str(source),
        SourceFormat::Html => HtmlParser::new().parse_str(source),
    };

    let policy = match target {
        Some(target) => Policy::Bounded { target },
        None => Policy::Unbounded,
    };
    let slides = DeckAssembler::default()
        .assemble(&document, policy)
        .map_err(|e| format!("Deck assembly error: {}", e))?;

    Ok(DeckResult {
        format: format.as_str().to_string(),
        section_count: document.sections.len(),
        slides,
    })
}

/// Render slides as a plain-text outline.
///
/// # Arguments
/// * `slides` - Array of slide objects as returned by `build_deck`
#[wasm_bindgen]
pub fn format_outline(slides: JsValue) -> Result<String, JsValue> {
    let slides: Vec<Slide> = serde_wasm_bindgen::from_value(slides)
        .map_err(|e| JsValue::from_str(&format!("Invalid slides array: {}", e)))?;

    Ok(OutlineFormatter::new().format_with_newline(&slides))
}
