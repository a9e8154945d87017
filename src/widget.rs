//! Widget tree - the built-in widget kinds and their draw dispatch
//!
//! Performance considerations:
//! - SlotMap for O(1) lookups and cache-friendly iteration
//! - Drawing borrows the tree immutably, so no update pass can mutate bounds
//!   or editor state while a frame is being recorded
//!
//! Bounds are screen-space and computed by the caller; the tree does no layout.

use crate::editor::TextEditorState;
use crate::error::RenderError;
use crate::geometry::{Projection, Rect, Vector};
use crate::render::{Container, DrawBatch, DrawContext, GuiRenderer};
use crate::style::{Color, Frame};
use crate::text::{FontId, TextAlignment};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Unique identifier for widgets
    pub struct WidgetId;
}

/// Editable text widget data
#[derive(Debug, Clone)]
pub struct TextFieldData {
    pub editor: TextEditorState,
    pub font: FontId,
    pub color: Color,
    pub selection_color: Color,
    pub alignment: TextAlignment,
    pub background: Option<Color>,
    /// Multi-line fields never truncate and scroll by `scroll`
    pub multi_line: bool,
    pub scroll: Vector,
    /// The caret and selection are only drawn while focused
    pub focused: bool,
}

impl TextFieldData {
    pub fn new(font: FontId, text: impl Into<String>) -> Self {
        Self {
            editor: TextEditorState::with_text(text),
            font,
            color: Color::black(),
            selection_color: Color::new(51, 153, 255, 255),
            alignment: TextAlignment::Left,
            background: None,
            multi_line: false,
            scroll: Vector::zero(),
            focused: false,
        }
    }
}

/// Widget type enumeration
#[derive(Debug, Clone)]
pub enum WidgetKind {
    /// Plain container, optionally filled
    Panel { background: Option<Color> },

    /// Read-only single line of text
    Label {
        text: String,
        font: FontId,
        color: Color,
        alignment: TextAlignment,
    },

    /// Single- or multi-line editable text
    TextField(TextFieldData),

    /// Texture region stretched over the widget bounds
    ImageBox { frame: Frame, tint: Color },
}

/// Widget node in the tree
#[derive(Debug, Clone)]
pub struct Widget {
    pub kind: WidgetKind,
    /// Screen-space bounds
    pub bounds: Rect,
    /// Parent widget
    pub parent: Option<WidgetId>,
    /// Child widgets, drawn in order
    pub children: Vec<WidgetId>,
    /// Hidden widgets and their subtrees are not drawn
    pub visible: bool,
}

impl Widget {
    pub fn new(kind: WidgetKind, bounds: Rect) -> Self {
        Self {
            kind,
            bounds,
            parent: None,
            children: Vec::new(),
            visible: true,
        }
    }
}

/// Widget tree - central data structure for the widget system
pub struct WidgetTree {
    /// Widget storage
    widgets: SlotMap<WidgetId, Widget>,
    /// Root widget
    root: Option<WidgetId>,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self {
            widgets: SlotMap::with_key(),
            root: None,
        }
    }

    /// Create a new widget
    pub fn create_widget(&mut self, kind: WidgetKind, bounds: Rect) -> WidgetId {
        self.widgets.insert(Widget::new(kind, bounds))
    }

    /// Get a widget by ID
    pub fn get_widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(id)
    }

    /// Get a mutable widget by ID
    pub fn get_widget_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.get_mut(id)
    }

    /// Editor of a text field, for feeding input between frames
    pub fn editor_mut(&mut self, id: WidgetId) -> Option<&mut TextEditorState> {
        match &mut self.widgets.get_mut(id)?.kind {
            WidgetKind::TextField(field) => Some(&mut field.editor),
            _ => None,
        }
    }

    /// Remove a widget and all its children
    pub fn remove_widget(&mut self, id: WidgetId) {
        let Some(widget) = self.widgets.remove(id) else {
            return;
        };

        if let Some(parent) = widget.parent.and_then(|parent| self.widgets.get_mut(parent)) {
            parent.children.retain(|&child| child != id);
        }
        if self.root == Some(id) {
            self.root = None;
        }

        for child_id in widget.children {
            // Children no longer have a parent to detach from
            if let Some(child) = self.widgets.get_mut(child_id) {
                child.parent = None;
            }
            self.remove_widget(child_id);
        }
    }

    /// Add a child widget to a parent
    pub fn add_child(&mut self, parent_id: WidgetId, child_id: WidgetId) {
        if !self.widgets.contains_key(parent_id) {
            return;
        }

        if let Some(child) = self.widgets.get_mut(child_id) {
            child.parent = Some(parent_id);
        } else {
            return;
        }

        if let Some(parent) = self.widgets.get_mut(parent_id) {
            parent.children.push(child_id);
        }
    }

    /// Remove a child from its parent
    pub fn remove_child(&mut self, parent_id: WidgetId, child_id: WidgetId) {
        if let Some(parent) = self.widgets.get_mut(parent_id) {
            parent.children.retain(|&id| id != child_id);
        }

        if let Some(child) = self.widgets.get_mut(child_id) {
            child.parent = None;
        }
    }

    /// Set the root widget
    pub fn set_root(&mut self, id: WidgetId) {
        self.root = Some(id);
    }

    /// Get the root widget ID
    pub fn root(&self) -> Option<WidgetId> {
        self.root
    }

    /// Borrow a widget as a drawable container
    pub fn node(&self, id: WidgetId) -> Result<WidgetNode<'_>, RenderError> {
        let widget = self.widgets.get(id).ok_or(RenderError::WidgetNotFound(id))?;
        Ok(WidgetNode { tree: self, widget })
    }

    /// Draw the tree from its root. A tree without a root draws nothing.
    pub fn draw<B: DrawBatch>(
        &self,
        renderer: &mut GuiRenderer<B>,
        projection: &Projection,
    ) -> Result<(), RenderError> {
        match self.root {
            Some(root) => renderer.draw_tree(&self.node(root)?, projection),
            None => Ok(()),
        }
    }

    /// Iterate over all widgets (depth-first)
    pub fn iter_depth_first(&self) -> DepthFirstIterator<'_> {
        DepthFirstIterator::new(self)
    }

    /// Count total widgets in tree
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

/// A widget together with the tree its children live in
pub struct WidgetNode<'a> {
    tree: &'a WidgetTree,
    widget: &'a Widget,
}

impl Container for WidgetNode<'_> {
    fn bounds(&self) -> Rect {
        self.widget.bounds
    }

    fn draw(&self, area: &Rect, ctx: &mut DrawContext<'_>) -> Result<(), RenderError> {
        if !self.widget.visible {
            return Ok(());
        }

        match &self.widget.kind {
            WidgetKind::Panel { background } => {
                if let Some(color) = background {
                    ctx.draw_rect(area, *color);
                }
            }
            WidgetKind::Label {
                text,
                font,
                color,
                alignment,
            } => {
                ctx.draw_string(*font, text, area, *color, *alignment)?;
            }
            WidgetKind::TextField(field) => draw_text_field(field, area, ctx)?,
            WidgetKind::ImageBox { frame, tint } => {
                ctx.draw_frame(frame, area, *tint);
            }
        }

        for &child_id in &self.widget.children {
            let child = self.tree.node(child_id)?;
            ctx.draw_child(&child, area)?;
        }
        Ok(())
    }
}

fn draw_text_field(field: &TextFieldData, area: &Rect, ctx: &mut DrawContext<'_>) -> Result<(), RenderError> {
    if let Some(color) = field.background {
        ctx.draw_rect(area, color);
    }

    let editor = &field.editor;
    match (field.multi_line, field.focused) {
        (true, true) => ctx.draw_marked_multi_line_string(
            field.font,
            editor,
            area,
            field.scroll,
            field.color,
            field.selection_color,
        ),
        (true, false) => {
            ctx.draw_multi_line_string(field.font, &editor.to_string(), area, field.color, field.scroll)
        }
        (false, true) => ctx.draw_marked_string(
            field.font,
            editor,
            area,
            field.color,
            field.selection_color,
            field.alignment,
        ),
        (false, false) => {
            ctx.draw_string(field.font, &editor.to_string(), area, field.color, field.alignment)
        }
    }
}

/// Depth-first iterator for widget tree
pub struct DepthFirstIterator<'a> {
    tree: &'a WidgetTree,
    stack: Vec<WidgetId>,
}

impl<'a> DepthFirstIterator<'a> {
    fn new(tree: &'a WidgetTree) -> Self {
        let stack = tree.root.into_iter().collect();
        Self { tree, stack }
    }
}

impl<'a> Iterator for DepthFirstIterator<'a> {
    type Item = (WidgetId, &'a Widget);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let widget = self.tree.widgets.get(id)?;

        // Push children onto stack (in reverse order for left-to-right traversal)
        for &child_id in widget.children.iter().rev() {
            self.stack.push(child_id);
        }

        Some((id, widget))
    }
}
