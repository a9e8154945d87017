//! Text layout decisions for the draw primitives
//!
//! This module decides how much of a string is visible inside a pixel budget
//! (best fit, forwards or anchored on the caret) and which offset realizes a
//! horizontal alignment. Glyph rasterization is not done here: fonts are
//! consumed through the [`FontMetrics`] capability.
//!
//! All indices are char indices (Unicode scalar values), never byte offsets.

pub mod font;

use crate::geometry::{Rect, Size, Vector};
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub use font::{FontId, FontMetrics, FontRegistry, GlyphTableFont, MonospaceFont};

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum TextAlignment {
    #[default]
    Left = 0,
    Right = 1,
    Center = 2,
}

impl From<u8> for TextAlignment {
    fn from(value: u8) -> Self {
        match value {
            1 => TextAlignment::Right,
            2 => TextAlignment::Center,
            _ => TextAlignment::Left,
        }
    }
}

/// Offset that realizes `alignment` for text of `measured` size inside `bounds`.
///
/// The batching surface subtracts this from the draw origin, so right and
/// centered text get a negative X when the text is narrower than the bounds.
pub fn alignment_offset(measured: Size, bounds: &Rect, alignment: TextAlignment) -> Vector {
    match alignment {
        TextAlignment::Left => Vector::zero(),
        TextAlignment::Right => Vector::new(measured.width - bounds.width, 0.0),
        TextAlignment::Center => Vector::new(measured.width / 2.0 - bounds.width / 2.0, 0.0),
    }
}

/// Number of chars in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Slice `text` by a char range. Out-of-range bounds are clamped to the text.
pub fn char_slice(text: &str, range: Range<usize>) -> &str {
    let start = byte_offset(text, range.start);
    let end = byte_offset(text, range.end.max(range.start));
    &text[start..end]
}

/// Byte offset of the char at `char_index`, or `text.len()` past the end
pub(crate) fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

/// Number of leading chars of `text` whose summed advance fits `budget`
pub fn best_fit_len<F: FontMetrics + ?Sized>(font: &F, text: &str, budget: f32) -> usize {
    let mut width = 0.0;
    let mut count = 0;
    for c in text.chars() {
        let advance = font.advance(c);
        if width + advance > budget {
            break;
        }
        width += advance;
        count += 1;
    }
    count
}

/// Char range of the visible window that keeps `marker` inside it.
///
/// When the marker lies within the forward best fit (always the case when
/// the whole text fits or the marker is at the start), the window is that
/// prefix. Otherwise the window ends at the marker and extends backwards as
/// far as the budget allows, so with the marker at the end of the text the
/// window is a suffix.
pub fn best_fit_backwards_range<F: FontMetrics + ?Sized>(
    font: &F,
    text: &str,
    marker: usize,
    budget: f32,
) -> Range<usize> {
    let prefix = best_fit_len(font, text, budget);
    let chars: Vec<char> = text.chars().collect();
    let marker = marker.min(chars.len());
    if marker <= prefix {
        return 0..prefix;
    }

    let mut width = 0.0;
    let mut start = marker;
    while start > 0 {
        let advance = font.advance(chars[start - 1]);
        if width + advance > budget {
            break;
        }
        width += advance;
        start -= 1;
    }
    start..marker
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font() -> MonospaceFont {
        MonospaceFont::new(10.0, 16.0)
    }

    #[test]
    fn test_left_alignment_is_zero() {
        let bounds = Rect::new(5.0, 5.0, 100.0, 20.0);
        for width in [0.0, 40.0, 250.0] {
            let offset = alignment_offset(Size::new(width, 16.0), &bounds, TextAlignment::Left);
            assert_eq!(offset, Vector::zero());
        }
    }

    #[test]
    fn test_center_alignment() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 20.0);
        let offset = alignment_offset(Size::new(40.0, 16.0), &bounds, TextAlignment::Center);
        assert_eq!(offset, Vector::new(-30.0, 0.0));
    }

    #[test]
    fn test_right_alignment() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 20.0);
        let offset = alignment_offset(Size::new(40.0, 16.0), &bounds, TextAlignment::Right);
        assert_eq!(offset, Vector::new(-60.0, 0.0));
    }

    #[test]
    fn test_alignment_from_u8() {
        assert_eq!(TextAlignment::from(0), TextAlignment::Left);
        assert_eq!(TextAlignment::from(1), TextAlignment::Right);
        assert_eq!(TextAlignment::from(2), TextAlignment::Center);
        assert_eq!(TextAlignment::from(9), TextAlignment::Left);
    }

    #[test]
    fn test_char_slice_multibyte() {
        let text = "héllo wörld";
        assert_eq!(char_slice(text, 1..5), "éllo");
        assert_eq!(char_slice(text, 7..100), "örld");
        assert_eq!(char_slice(text, 4..2), "");
    }

    #[test]
    fn test_best_fit_never_exceeds_budget() {
        let font = GlyphTableFont::new(8.0, 16.0)
            .with_advance('W', 14.0)
            .with_advance('i', 3.0);
        let texts = ["", "WiWiWiWiWi", "Hello World", "iiiiiiiiiiiiiiiiiii", "W"];
        for text in texts {
            for budget in [0.5, 3.0, 13.9, 14.0, 40.0, 77.7, 1000.0] {
                let fit = font.best_fit(text, budget);
                assert!(font.measure_string(fit).width <= budget, "{text:?} @ {budget}");
                assert!(text.starts_with(fit));
            }
        }
    }

    #[test]
    fn test_best_fit_is_longest_prefix() {
        assert_eq!(font().best_fit("HelloWorld", 45.0), "Hell");
        assert_eq!(font().best_fit("HelloWorld", 100.0), "HelloWorld");
        assert_eq!(font().best_fit("HelloWorld", 0.0), "");
    }

    #[test]
    fn test_backwards_fit_keeps_marker_visible() {
        let text = "HelloWorld";
        let range = best_fit_backwards_range(&font(), text, 8, 40.0);
        assert_eq!(range, 4..8);
        let visible = font().best_fit_backwards(text, 8, 40.0);
        assert_eq!(visible, "oWor");
        let rebased = 8 - range.start;
        assert!(rebased <= char_len(visible));
    }

    #[test]
    fn test_backwards_fit_at_start_behaves_like_forward() {
        let text = "HelloWorld";
        assert_eq!(font().best_fit_backwards(text, 0, 40.0), font().best_fit(text, 40.0));
    }

    #[test]
    fn test_backwards_fit_with_marker_at_end_is_suffix() {
        let text = "HelloWorld";
        let len = char_len(text);
        let range = best_fit_backwards_range(&font(), text, len, 40.0);
        let visible = font().best_fit_backwards(text, len, 40.0);
        assert!(text.ends_with(visible));
        // Suffix windows rebase by the length difference
        assert_eq!(range.start, len - char_len(visible));
    }

    #[test]
    fn test_backwards_fit_when_everything_fits() {
        assert_eq!(font().best_fit_backwards("Hi", 2, 100.0), "Hi");
    }

    #[test]
    fn test_backwards_fit_clamps_marker() {
        assert_eq!(best_fit_backwards_range(&font(), "HelloWorld", 50, 40.0), 6..10);
    }
}
