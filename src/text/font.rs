//! Font metrics capability and the registry widgets resolve fonts through
//!
//! The rendering core never rasterizes glyphs. It only needs per-character
//! advances and line metrics, which every concrete font (bitmap font, platform
//! font, test font) can provide.

use crate::error::RenderError;
use crate::geometry::Size;
use slotmap::{new_key_type, SlotMap};
use std::collections::HashMap;

new_key_type! {
    /// Handle of a font registered with a [`FontRegistry`]
    pub struct FontId;
}

/// Font metrics - everything the layout code needs to know about a font
pub trait FontMetrics: Send + Sync {
    /// Horizontal advance of a single character
    fn advance(&self, character: char) -> f32;

    /// Recommended distance between baselines
    fn line_height(&self) -> f32;

    /// Glyph cell size (the caret is as tall as a glyph cell)
    fn glyph_size(&self) -> Size;

    /// Size of a string; lines are separated by `'\n'`, `'\r'` has no advance
    fn measure_string(&self, text: &str) -> Size {
        let mut lines = 0;
        let mut widest: f32 = 0.0;
        for line in text.split('\n') {
            lines += 1;
            let width: f32 = line
                .chars()
                .filter(|&c| c != '\r')
                .map(|c| self.advance(c))
                .sum();
            widest = widest.max(width);
        }
        Size::new(widest, lines as f32 * self.line_height())
    }

    /// Size of `length` chars starting at char index `start`
    fn measure_substring(&self, text: &str, start: usize, length: usize) -> Size {
        self.measure_string(super::char_slice(text, start..start.saturating_add(length)))
    }

    /// Longest prefix of `text` that fits `budget` pixels
    fn best_fit<'a>(&self, text: &'a str, budget: f32) -> &'a str {
        let len = super::best_fit_len(self, text, budget);
        super::char_slice(text, 0..len)
    }

    /// Visible window of `text` that keeps the char index `marker` inside it
    fn best_fit_backwards<'a>(&self, text: &'a str, marker: usize, budget: f32) -> &'a str {
        let range = super::best_fit_backwards_range(self, text, marker, budget);
        super::char_slice(text, range)
    }
}

/// Fixed-advance font, typical for debug overlays and console text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceFont {
    advance: f32,
    line_height: f32,
}

impl MonospaceFont {
    pub fn new(advance: f32, line_height: f32) -> Self {
        Self {
            advance,
            line_height,
        }
    }
}

impl FontMetrics for MonospaceFont {
    fn advance(&self, _character: char) -> f32 {
        self.advance
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn glyph_size(&self) -> Size {
        Size::new(self.advance, self.line_height)
    }
}

/// Proportional font backed by a per-character advance table
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphTableFont {
    advances: HashMap<char, f32>,
    /// Advance of characters missing from the table
    fallback_advance: f32,
    line_height: f32,
}

impl GlyphTableFont {
    pub fn new(fallback_advance: f32, line_height: f32) -> Self {
        Self {
            advances: HashMap::new(),
            fallback_advance,
            line_height,
        }
    }

    pub fn with_advance(mut self, character: char, advance: f32) -> Self {
        self.advances.insert(character, advance);
        self
    }

    pub fn glyph_count(&self) -> usize {
        self.advances.len()
    }
}

impl FontMetrics for GlyphTableFont {
    fn advance(&self, character: char) -> f32 {
        self.advances
            .get(&character)
            .copied()
            .unwrap_or(self.fallback_advance)
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn glyph_size(&self) -> Size {
        let widest = self
            .advances
            .values()
            .copied()
            .fold(self.fallback_advance, f32::max);
        Size::new(widest, self.line_height)
    }
}

/// Font registry - owns the fonts widgets refer to by [`FontId`]
#[derive(Default)]
pub struct FontRegistry {
    fonts: SlotMap<FontId, Box<dyn FontMetrics>>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self {
            fonts: SlotMap::with_key(),
        }
    }

    /// Register a font and get its handle
    pub fn register(&mut self, font: impl FontMetrics + 'static) -> FontId {
        self.fonts.insert(Box::new(font))
    }

    /// Look up a font, failing when the handle is stale or foreign
    pub fn get(&self, id: FontId) -> Result<&dyn FontMetrics, RenderError> {
        self.fonts
            .get(id)
            .map(|font| font.as_ref())
            .ok_or(RenderError::FontNotFound(id))
    }

    pub fn remove(&mut self, id: FontId) -> bool {
        self.fonts.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}
