//! Draw orchestrator - walks a container tree into a batching surface
//!
//! The orchestrator owns the batching surface, the font registry and the
//! pixel frame used for solid fills. Each [`GuiRenderer::draw_tree`] call
//! builds a [`DrawContext`] that carries the frame's projection and the active
//! clip rectangle through the recursive walk; nothing about the walk is kept
//! on the renderer between frames.
//!
//! Flush discipline: the batch is flushed before every scissor change (clip
//! changes are not retroactive to buffered primitives) and once after the walk.
//! Primitives only append.

use crate::clip::{intersect, ClipStack};
use crate::config::RenderConfig;
use crate::cursor::{multi_line_caret_rect, multi_line_selection_rects, resolve_marked_line};
use crate::editor::TextEditor;
use crate::error::RenderError;
use crate::geometry::{Point, Projection, Rect, Vector};
use crate::style::{Color, Frame};
use crate::text::{alignment_offset, FontId, FontRegistry, TextAlignment};
use serde::{Deserialize, Serialize};

/// Accumulate-then-submit drawing surface the orchestrator targets
pub trait DrawBatch {
    /// Buffer a textured quad stretching `frame` over `dest`
    fn buffer_frame(&mut self, frame: &Frame, dest: Rect, color: Color);

    /// Buffer a glyph run drawn at `origin - offset`
    fn buffer_string(&mut self, font: FontId, text: &str, origin: Point, color: Color, offset: Vector);

    /// Submit everything buffered so far with `projection`
    fn flush(&mut self, projection: &Projection);

    /// Program the scissor used by subsequently flushed primitives
    fn set_scissor(&mut self, rect: Rect);

    /// Scissor currently programmed, if any
    fn scissor(&self) -> Option<Rect>;
}

/// A node of the widget tree as seen by the orchestrator
pub trait Container {
    /// Top-left corner in screen space
    fn position(&self) -> Point {
        self.bounds().origin()
    }

    /// Screen-space bounds, already laid out by the caller
    fn bounds(&self) -> Rect;

    /// Draw into `area`, the part of the bounds that survived clipping.
    ///
    /// Children are drawn through [`DrawContext::draw_child`].
    fn draw(&self, area: &Rect, ctx: &mut DrawContext<'_>) -> Result<(), RenderError>;
}

// ===== Command recording =====

/// Individual command recorded by a [`CommandBuffer`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Stretch a texture region over a destination rectangle
    DrawFrame {
        texture_id: u32,
        source: Rect,
        dest: Rect,
        color: Color,
    },

    /// Draw a glyph run at `(x, y) - (offset_x, offset_y)`
    DrawString {
        font: FontId,
        text: String,
        x: f32,
        y: f32,
        color: Color,
        offset_x: f32,
        offset_y: f32,
    },

    /// Change the scissor rectangle
    SetScissor { rect: Rect },

    /// Submit buffered commands (projection terms in euclid's row-major order)
    Flush { projection: [f32; 16] },
}

/// Batching surface that records commands instead of talking to a GPU.
///
/// Backends replay the recorded list; tests use it as a call-order log.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<RenderCommand>,
    scissor: Option<Rect>,
    flushes: usize,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.scissor = None;
        self.flushes = 0;
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Draw commands only, without scissor and flush bookkeeping
    pub fn draws(&self) -> impl Iterator<Item = &RenderCommand> {
        self.commands.iter().filter(|command| {
            matches!(
                command,
                RenderCommand::DrawFrame { .. } | RenderCommand::DrawString { .. }
            )
        })
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Serialize the recorded frame for an out-of-process backend
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.commands)
    }
}

impl DrawBatch for CommandBuffer {
    fn buffer_frame(&mut self, frame: &Frame, dest: Rect, color: Color) {
        self.commands.push(RenderCommand::DrawFrame {
            texture_id: frame.texture_id,
            source: frame.source,
            dest,
            color,
        });
    }

    fn buffer_string(&mut self, font: FontId, text: &str, origin: Point, color: Color, offset: Vector) {
        self.commands.push(RenderCommand::DrawString {
            font,
            text: text.to_string(),
            x: origin.x,
            y: origin.y,
            color,
            offset_x: offset.x,
            offset_y: offset.y,
        });
    }

    fn flush(&mut self, projection: &Projection) {
        self.flushes += 1;
        self.commands.push(RenderCommand::Flush {
            projection: projection.to_array(),
        });
    }

    fn set_scissor(&mut self, rect: Rect) {
        self.scissor = Some(rect);
        self.commands.push(RenderCommand::SetScissor { rect });
    }

    fn scissor(&self) -> Option<Rect> {
        self.scissor
    }
}

// ===== Orchestrator =====

/// Main renderer structure
pub struct GuiRenderer<B: DrawBatch> {
    batch: B,
    pixel: Frame,
    fonts: FontRegistry,
    config: RenderConfig,
}

impl<B: DrawBatch> GuiRenderer<B> {
    pub fn builder() -> GuiRendererBuilder<B> {
        GuiRendererBuilder::default()
    }

    /// Draw a whole container tree with `projection`.
    ///
    /// A root whose bounds are empty draws nothing and does not flush.
    pub fn draw_tree(&mut self, root: &dyn Container, projection: &Projection) -> Result<(), RenderError> {
        let bounds = root.bounds();
        let Some(area) = intersect(&bounds, &bounds) else {
            log::debug!("root bounds {:?} are empty, nothing to draw", bounds);
            return Ok(());
        };

        let mut ctx = DrawContext {
            batch: &mut self.batch,
            fonts: &self.fonts,
            pixel: self.pixel,
            config: &self.config,
            projection: *projection,
            clips: ClipStack::new(area),
        };
        ctx.apply_clip(area);
        root.draw(&area, &mut ctx)?;
        ctx.batch.flush(projection);
        Ok(())
    }

    pub fn batch(&self) -> &B {
        &self.batch
    }

    pub fn batch_mut(&mut self) -> &mut B {
        &mut self.batch
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontRegistry {
        &mut self.fonts
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn into_batch(self) -> B {
        self.batch
    }
}

/// Builder for [`GuiRenderer`]; every collaborator is supplied explicitly
pub struct GuiRendererBuilder<B> {
    batch: Option<B>,
    pixel: Option<Frame>,
    fonts: Option<FontRegistry>,
    config: RenderConfig,
}

impl<B> Default for GuiRendererBuilder<B> {
    fn default() -> Self {
        Self {
            batch: None,
            pixel: None,
            fonts: None,
            config: RenderConfig::default(),
        }
    }
}

impl<B: DrawBatch> GuiRendererBuilder<B> {
    pub fn batch(mut self, batch: B) -> Self {
        self.batch = Some(batch);
        self
    }

    /// Frame used for solid fills (carets, selections, rectangles)
    pub fn pixel(mut self, pixel: Frame) -> Self {
        self.pixel = Some(pixel);
        self
    }

    pub fn fonts(mut self, fonts: FontRegistry) -> Self {
        self.fonts = Some(fonts);
        self
    }

    pub fn config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<GuiRenderer<B>, RenderError> {
        self.config.validate()?;
        Ok(GuiRenderer {
            batch: self.batch.ok_or(RenderError::MissingCapability("draw batch"))?,
            pixel: self.pixel.ok_or(RenderError::MissingCapability("pixel frame"))?,
            fonts: self.fonts.ok_or(RenderError::MissingCapability("font registry"))?,
            config: self.config,
        })
    }
}

/// Drawing surface handed to containers for the duration of one tree walk
pub struct DrawContext<'a> {
    batch: &'a mut dyn DrawBatch,
    fonts: &'a FontRegistry,
    pixel: Frame,
    config: &'a RenderConfig,
    projection: Projection,
    clips: ClipStack,
}

impl<'a> DrawContext<'a> {
    /// Active clip rectangle
    pub fn clip(&self) -> Rect {
        self.clips.current()
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Nesting depth of the container currently drawing (root is 0)
    pub fn depth(&self) -> usize {
        self.clips.depth()
    }

    pub fn fonts(&self) -> &FontRegistry {
        self.fonts
    }

    pub fn config(&self) -> &RenderConfig {
        self.config
    }

    /// Draw `child` clipped to `parent_area`.
    ///
    /// Returns `Ok(false)` when the child is fully occluded; nothing is drawn
    /// or flushed in that case.
    pub fn draw_child(&mut self, child: &dyn Container, parent_area: &Rect) -> Result<bool, RenderError> {
        let bounds = child.bounds();
        let visible = intersect(parent_area, &bounds).and_then(|area| self.clips.push(&area));
        let Some(area) = visible else {
            log::debug!("child {:?} is occluded by {:?}, skipping", bounds, parent_area);
            return Ok(false);
        };

        self.apply_clip(area);
        let result = child.draw(&area, self);
        let parent = self.clips.pop();
        if self.config.restore_clip_after_child {
            if let Some(parent) = parent {
                self.apply_clip(parent);
            }
        }
        result.map(|_| true)
    }

    fn apply_clip(&mut self, rect: Rect) {
        log::debug!("clip -> {:?} (depth {})", rect, self.clips.depth());
        self.batch.flush(&self.projection);
        self.batch.set_scissor(rect);
    }

    // ===== Primitives =====

    /// Solid rectangle
    pub fn draw_rect(&mut self, rect: &Rect, color: Color) {
        log::trace!("rect {:?}", rect);
        self.batch.buffer_frame(&self.pixel, *rect, color);
    }

    /// Texture region stretched over `rect`
    pub fn draw_frame(&mut self, frame: &Frame, rect: &Rect, color: Color) {
        log::trace!("frame {} -> {:?}", frame.texture_id, rect);
        self.batch.buffer_frame(frame, *rect, color);
    }

    /// Single line of text, truncated to the longest prefix that fits
    pub fn draw_string(
        &mut self,
        font_id: FontId,
        text: &str,
        rect: &Rect,
        color: Color,
        alignment: TextAlignment,
    ) -> Result<(), RenderError> {
        let fonts = self.fonts;
        let font = fonts.get(font_id)?;
        let can_draw = font.best_fit(text, rect.width);
        let align = alignment_offset(font.measure_string(can_draw), rect, alignment);
        log::trace!("string {:?} at {:?}", can_draw, rect);
        self.batch.buffer_string(font_id, can_draw, rect.origin(), color, align);
        Ok(())
    }

    /// Single-line editable text with caret and optional selection.
    ///
    /// The selection fill goes first, then the caret, then the glyph run, so
    /// neither the caret nor the glyphs are covered by the fill.
    pub fn draw_marked_string(
        &mut self,
        font_id: FontId,
        editor: &dyn TextEditor,
        rect: &Rect,
        color: Color,
        selection_color: Color,
        alignment: TextAlignment,
    ) -> Result<(), RenderError> {
        let fonts = self.fonts;
        let font = fonts.get(font_id)?;
        let selection = editor.selected().then(|| editor.selection_index());
        let line = resolve_marked_line(font, editor.text(), editor.marker_index(), selection, rect.width);
        let align = alignment_offset(font.measure_string(line.visible), rect, alignment);

        // Only the glyph run is aligned; caret and selection stay relative to
        // the left edge of the field.
        if let Some(fill) = line.selection_rect(rect) {
            let fill_color = selection_color.with_opacity(self.config.selection_opacity);
            self.batch.buffer_frame(&self.pixel, fill, fill_color);
        }

        let caret_width = self.config.caret_width;
        let mut caret = line.caret_rect(rect, caret_width);
        caret.x = caret.x.min(rect.right() - caret_width).max(rect.x);
        self.batch.buffer_frame(&self.pixel, caret, color);

        log::trace!("marked string {:?} caret at {}", line.visible, caret.x);
        self.batch.buffer_string(font_id, line.visible, rect.origin(), color, align);
        Ok(())
    }

    /// Multi-line text scrolled by `offset`; overflow is left to clipping
    pub fn draw_multi_line_string(
        &mut self,
        font_id: FontId,
        text: &str,
        rect: &Rect,
        color: Color,
        offset: Vector,
    ) -> Result<(), RenderError> {
        self.fonts.get(font_id)?;
        self.batch.buffer_string(font_id, text, rect.origin(), color, offset);
        Ok(())
    }

    /// Multi-line editable text: selection fills, glyph run, then the caret
    pub fn draw_marked_multi_line_string(
        &mut self,
        font_id: FontId,
        editor: &dyn TextEditor,
        rect: &Rect,
        offset: Vector,
        color: Color,
        selection_color: Color,
    ) -> Result<(), RenderError> {
        let fonts = self.fonts;
        let font = fonts.get(font_id)?;
        let text = editor.text();
        let breaks = self.config.line_breaks;

        if editor.selected() {
            let fill_color = selection_color.with_opacity(self.config.selection_opacity);
            let fills = multi_line_selection_rects(
                font,
                text,
                editor.selection_index(),
                editor.marker_index(),
                rect,
                offset,
                breaks,
            );
            for fill in fills {
                self.batch.buffer_frame(&self.pixel, fill, fill_color);
            }
        }

        self.batch.buffer_string(font_id, text, rect.origin(), color, offset);

        let caret = multi_line_caret_rect(
            font,
            text,
            editor.marker_index(),
            rect,
            offset,
            breaks,
            self.config.caret_width,
        );
        self.batch.buffer_frame(&self.pixel, caret, color);
        Ok(())
    }
}
