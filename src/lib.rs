//! Entity GUI - rendering and text-composition core
//!
//! This library turns widget geometry and text content into batched draw
//! calls against a clipped viewport, and computes caret and selection
//! geometry for editable text. Draw submission and font rasterization are
//! consumed as capabilities ([`render::DrawBatch`], [`text::FontMetrics`]).

// Core modules
pub mod clip;
pub mod config;
pub mod cursor;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod render;
pub mod style;
pub mod text;
pub mod widget;

// Re-exports for convenience
pub use config::{LineBreaks, RenderConfig};
pub use error::{ConfigError, RenderError};
pub use geometry::{Projection, Rect};
pub use render::{CommandBuffer, Container, DrawBatch, DrawContext, GuiRenderer};
pub use text::{FontId, FontMetrics, FontRegistry, TextAlignment};
pub use widget::{WidgetId, WidgetKind, WidgetTree};

/// Renderer plus the widget tree it draws, sized to a viewport
pub struct Gui<B: DrawBatch> {
    width: u32,
    height: u32,
    pub renderer: GuiRenderer<B>,
    pub widget_tree: WidgetTree,
}

impl<B: DrawBatch> Gui<B> {
    /// Create a GUI for a `width` x `height` viewport
    pub fn new(renderer: GuiRenderer<B>, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            renderer,
            widget_tree: WidgetTree::new(),
        }
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Orthographic projection for the current viewport
    pub fn projection(&self) -> Projection {
        geometry::orthographic(self.width as f32, self.height as f32)
    }

    /// Draw the widget tree for one frame
    pub fn draw(&mut self) -> Result<(), RenderError> {
        let projection = self.projection();
        self.widget_tree.draw(&mut self.renderer, &projection)
    }
}
