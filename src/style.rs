//! Colors and texture frames consumed by the draw primitives

use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Color representation (RGBA, premultiplied alpha)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 24) & 0xFF) as u8,
            g: ((hex >> 16) & 0xFF) as u8,
            b: ((hex >> 8) & 0xFF) as u8,
            a: (hex & 0xFF) as u8,
        }
    }

    pub fn to_u32(&self) -> u32 {
        ((self.r as u32) << 24)
            | ((self.g as u32) << 16)
            | ((self.b as u32) << 8)
            | (self.a as u32)
    }

    /// Scale every channel by `factor` (clamped to 0..=1).
    ///
    /// Colors are premultiplied, so fading a color means scaling RGB along
    /// with alpha.
    pub fn with_opacity(&self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f32 * factor).round() as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: scale(self.a),
        }
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

/// A region of a texture that the batching surface can stretch over a
/// destination rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Texture asset ID
    pub texture_id: u32,
    /// Source rect in texture pixels
    pub source: Rect,
}

impl Frame {
    pub fn new(texture_id: u32, source: Rect) -> Self {
        Self { texture_id, source }
    }

    /// A single white texel, used for solid fills
    pub fn pixel(texture_id: u32) -> Self {
        Self::new(texture_id, Rect::new(0.0, 0.0, 1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let color = Color::from_hex(0xFF8040C0);
        assert_eq!(color, Color::new(255, 128, 64, 192));
        assert_eq!(color.to_u32(), 0xFF8040C0);
    }

    #[test]
    fn test_selection_opacity() {
        let faded = Color::new(0, 120, 255, 255).with_opacity(0.6);
        assert_eq!(faded, Color::new(0, 72, 153, 153));
    }

    #[test]
    fn test_opacity_is_clamped() {
        let color = Color::white();
        assert_eq!(color.with_opacity(2.0), color);
        assert_eq!(color.with_opacity(-1.0), Color::transparent());
    }
}
