//! Caret and selection geometry for editable text
//!
//! Everything here is a pure function of the font metrics, the text, the caret
//! and selection indices, and the bounds of the field. Nothing is cached
//! between frames.
//!
//! Single-line fields scroll horizontally: the visible window comes from
//! [`best_fit_backwards_range`] and the caret is pinned to the right edge as
//! soon as the window no longer covers the whole text. Multi-line fields never
//! truncate; the whole text is submitted and clipping hides the overflow.

use crate::config::LineBreaks;
use crate::geometry::{Rect, Vector};
use crate::text::{best_fit_backwards_range, char_len, char_slice, FontMetrics};
use std::ops::Range;

/// Line a char index falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineIndex {
    /// Zero-based line number
    pub line: usize,
    /// Char index of the first char of that line
    pub line_start: usize,
}

/// Resolve the line containing the char index `index`.
///
/// Every line break in `[0, index)` bumps the line and moves the line start to
/// just after the break. Under [`LineBreaks::Independent`] both `'\n'` and
/// `'\r'` break, so `"\r\n"` counts twice.
pub fn find_line_index(text: &str, index: usize, breaks: LineBreaks) -> LineIndex {
    let mut result = LineIndex::default();
    let mut chars = text.chars().peekable();
    let mut position = 0;

    while position < index {
        let Some(c) = chars.next() else {
            break;
        };
        position += 1;
        if is_break(c, chars.peek().copied(), breaks) {
            result.line += 1;
            result.line_start = position;
        }
    }

    result
}

/// Char ranges of every line's content, line breaks excluded
pub fn line_ranges(text: &str, breaks: LineBreaks) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut chars = text.chars().peekable();
    let mut start = 0;
    let mut position = 0;

    while let Some(c) = chars.next() {
        let next = chars.peek().copied();
        if is_break(c, next, breaks) {
            lines.push(start..position);
            start = position + 1;
        } else if c == '\r' {
            // First half of a collapsed "\r\n"; the '\n' closes the line.
            lines.push(start..position);
            chars.next();
            position += 1;
            start = position + 1;
        }
        position += 1;
    }

    lines.push(start..position);
    lines
}

fn is_break(c: char, next: Option<char>, breaks: LineBreaks) -> bool {
    match c {
        '\n' => true,
        '\r' => !(breaks == LineBreaks::CollapseCrLf && next == Some('\n')),
        _ => false,
    }
}

/// Resolved geometry of a single-line field with a caret
#[derive(Debug, Clone, PartialEq)]
pub struct MarkedLine<'a> {
    /// Text actually submitted to the batching surface
    pub visible: &'a str,
    /// Char range of `visible` within the full text
    pub window: Range<usize>,
    /// Whether `visible` is shorter than the full text
    pub truncated: bool,
    /// Caret X relative to the field's left edge
    pub marker_x: f32,
    /// Selection anchor X relative to the field's left edge, when selecting
    pub selection_x: Option<f32>,
}

impl MarkedLine<'_> {
    /// Caret bar in screen space
    pub fn caret_rect(&self, bounds: &Rect, caret_width: f32) -> Rect {
        Rect::new(bounds.x + self.marker_x, bounds.y, caret_width, bounds.height)
    }

    /// Selection fill in screen space, spanning anchor to caret.
    ///
    /// `None` only without an active selection; a collapsed selection yields
    /// a zero-width fill.
    pub fn selection_rect(&self, bounds: &Rect) -> Option<Rect> {
        let selection_x = self.selection_x?;
        let left = selection_x.min(self.marker_x);
        let width = (self.marker_x - selection_x).abs();
        Some(Rect::new(bounds.x + left, bounds.y, width, bounds.height))
    }
}

/// Lay out a single-line field of `width` pixels with the caret at `marker`
/// and, when `selection` is set, the selection anchor at that index.
///
/// Indices are clamped to the text length.
pub fn resolve_marked_line<'a, F: FontMetrics + ?Sized>(
    font: &F,
    text: &'a str,
    marker: usize,
    selection: Option<usize>,
    width: f32,
) -> MarkedLine<'a> {
    let len = char_len(text);
    let marker = clamp_index(marker, len);
    let window = best_fit_backwards_range(font, text, marker, width);
    let visible = char_slice(text, window.clone());
    let truncated = window.len() < len;

    // Indices are rebased by the window start. For a suffix window this equals
    // `index - (len - visible_len)`.
    let rebase = |index: usize| index.saturating_sub(window.start).min(window.len());
    let x_at = |index: usize| font.measure_substring(visible, 0, rebase(index)).width;

    let marker_x = if truncated {
        width - 1.0
    } else {
        x_at(marker).min(width - 1.0).max(0.0)
    };
    let selection_x = selection.map(|anchor| x_at(clamp_index(anchor, len)));

    MarkedLine {
        visible,
        window,
        truncated,
        marker_x,
        selection_x,
    }
}

/// Caret bar of a multi-line field, in screen space.
///
/// The caret is as tall as a glyph cell and sits on the line resolved by
/// [`find_line_index`], shifted by the scroll offset.
pub fn multi_line_caret_rect<F: FontMetrics + ?Sized>(
    font: &F,
    text: &str,
    marker: usize,
    bounds: &Rect,
    scroll: Vector,
    breaks: LineBreaks,
    caret_width: f32,
) -> Rect {
    let marker = clamp_index(marker, char_len(text));
    let line = find_line_index(text, marker, breaks);
    let x = font
        .measure_substring(text, line.line_start, marker - line.line_start)
        .width;

    Rect::new(
        bounds.x + x - scroll.x,
        bounds.y - scroll.y + line.line as f32 * font.line_height(),
        caret_width,
        font.glyph_size().height,
    )
}

/// Selection fills of a multi-line field, one per touched line, in screen space
pub fn multi_line_selection_rects<F: FontMetrics + ?Sized>(
    font: &F,
    text: &str,
    anchor: usize,
    marker: usize,
    bounds: &Rect,
    scroll: Vector,
    breaks: LineBreaks,
) -> Vec<Rect> {
    let len = char_len(text);
    let anchor = clamp_index(anchor, len);
    let marker = clamp_index(marker, len);
    let (start, end) = (anchor.min(marker), anchor.max(marker));
    if start == end {
        return Vec::new();
    }

    let first = find_line_index(text, start, breaks).line;
    let last = find_line_index(text, end, breaks).line;
    let line_height = font.line_height();
    let glyph_height = font.glyph_size().height;

    line_ranges(text, breaks)
        .into_iter()
        .enumerate()
        .skip(first)
        .take(last + 1 - first)
        .filter_map(|(line, range)| {
            let from = start.clamp(range.start, range.end);
            let to = end.clamp(range.start, range.end);
            let x0 = font.measure_substring(text, range.start, from - range.start).width;
            let x1 = font.measure_substring(text, range.start, to - range.start).width;
            if x1 <= x0 {
                return None;
            }
            Some(Rect::new(
                bounds.x + x0 - scroll.x,
                bounds.y - scroll.y + line as f32 * line_height,
                x1 - x0,
                glyph_height,
            ))
        })
        .collect()
}

fn clamp_index(index: usize, len: usize) -> usize {
    if index > len {
        log::warn!("text index {} is past the end ({} chars), clamping", index, len);
        return len;
    }
    index
}
