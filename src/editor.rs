//! Editable text state read by the caret and selection primitives
//!
//! The renderer only reads editor state through [`TextEditor`]. Widgets own a
//! [`TextEditorState`] and mutate it from their input handling between frames.

use crate::text::{byte_offset, char_len};
use std::ops::Range;

/// Backspace as delivered by character input events
pub const BACKSPACE: char = '\u{8}';
/// Forward delete as delivered by character input events
pub const DELETE: char = '\u{7f}';

/// Read-only view of an editable text.
///
/// Implementors keep `marker_index` and `selection_index` within
/// `0..=len()`, measured in chars.
pub trait TextEditor {
    /// Current content
    fn text(&self) -> &str;

    /// Caret position
    fn marker_index(&self) -> usize;

    /// Selection anchor; the selection spans anchor to caret
    fn selection_index(&self) -> usize;

    /// Whether the selection is active
    fn selected(&self) -> bool;

    /// Length in chars
    fn len(&self) -> usize {
        char_len(self.text())
    }

    fn is_empty(&self) -> bool {
        self.text().is_empty()
    }
}

/// Text content plus caret and selection anchor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEditorState {
    text: String,
    marker: usize,
    anchor: usize,
    selected: bool,
}

impl TextEditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor holding `text` with the caret at the end
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let marker = char_len(&text);
        Self {
            text,
            marker,
            anchor: marker,
            selected: false,
        }
    }

    /// Replace the content, keeping the caret in range and dropping the selection
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.marker = self.marker.min(char_len(&self.text));
        self.clear_selection();
    }

    /// Move the caret, collapsing the selection
    pub fn set_marker(&mut self, index: usize) {
        self.marker = index.min(self.len());
        self.clear_selection();
    }

    /// Select from `anchor` to `marker` (caret ends at `marker`)
    pub fn select(&mut self, anchor: usize, marker: usize) {
        let len = self.len();
        self.anchor = anchor.min(len);
        self.marker = marker.min(len);
        self.selected = self.anchor != self.marker;
    }

    pub fn select_all(&mut self) {
        self.select(0, self.len());
    }

    pub fn clear_selection(&mut self) {
        self.anchor = self.marker;
        self.selected = false;
    }

    /// Ordered char range of the active selection
    pub fn selection_range(&self) -> Option<Range<usize>> {
        if !self.selected || self.anchor == self.marker {
            return None;
        }
        Some(self.anchor.min(self.marker)..self.anchor.max(self.marker))
    }

    /// Selected text, if any
    pub fn selected_text(&self) -> Option<&str> {
        self.selection_range()
            .map(|range| crate::text::char_slice(&self.text, range))
    }

    /// Insert at the caret, replacing the selection
    pub fn insert_str(&mut self, input: &str) {
        self.delete_selection();
        let at = byte_offset(&self.text, self.marker);
        self.text.insert_str(at, input);
        self.marker += char_len(input);
        self.anchor = self.marker;
    }

    pub fn insert_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf));
    }

    /// Remove the selection, or the char before the caret. Returns whether
    /// anything was removed.
    pub fn delete_backward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.marker == 0 {
            return false;
        }
        self.remove_chars(self.marker - 1..self.marker);
        self.marker -= 1;
        self.anchor = self.marker;
        true
    }

    /// Remove the selection, or the char after the caret
    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.marker >= self.len() {
            return false;
        }
        self.remove_chars(self.marker..self.marker + 1);
        true
    }

    /// Move the caret one char left; `extend` grows the selection instead of
    /// collapsing it
    pub fn move_left(&mut self, extend: bool) {
        let target = self.marker.saturating_sub(1);
        self.move_to(target, extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        let target = (self.marker + 1).min(self.len());
        self.move_to(target, extend);
    }

    pub fn move_home(&mut self, extend: bool) {
        self.move_to(0, extend);
    }

    pub fn move_end(&mut self, extend: bool) {
        let len = self.len();
        self.move_to(len, extend);
    }

    /// Apply a typed character: backspace, forward delete or insertion
    pub fn handle_char(&mut self, c: char) {
        match c {
            BACKSPACE => {
                self.delete_backward();
            }
            DELETE => {
                self.delete_forward();
            }
            c if c.is_control() && c != '\n' && c != '\t' => {
                log::trace!("ignoring control character {:?}", c);
            }
            c => self.insert_char(c),
        }
    }

    fn move_to(&mut self, target: usize, extend: bool) {
        if extend {
            if !self.selected {
                self.anchor = self.marker;
            }
            self.marker = target;
            self.selected = self.anchor != self.marker;
        } else {
            self.marker = target;
            self.clear_selection();
        }
    }

    fn delete_selection(&mut self) -> bool {
        let Some(range) = self.selection_range() else {
            return false;
        };
        self.remove_chars(range.clone());
        self.marker = range.start;
        self.clear_selection();
        true
    }

    fn remove_chars(&mut self, range: Range<usize>) {
        let start = byte_offset(&self.text, range.start);
        let end = byte_offset(&self.text, range.end);
        self.text.replace_range(start..end, "");
    }
}

impl TextEditor for TextEditorState {
    fn text(&self) -> &str {
        &self.text
    }

    fn marker_index(&self) -> usize {
        self.marker
    }

    fn selection_index(&self) -> usize {
        self.anchor
    }

    fn selected(&self) -> bool {
        self.selected
    }
}

impl std::fmt::Display for TextEditorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
