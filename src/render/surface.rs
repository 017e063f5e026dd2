//! Boundary traits for the host's drawing, text measurement and frame
//! decoding. The scene never rasterizes anything itself; it issues commands
//! through these traits.

use std::fmt;

use crate::geometry::{Color, Rect, Vec2};

// ---------------------------------------------------------------------------
// Font
// ---------------------------------------------------------------------------

/// Font selection passed through to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: u32,
    pub italic: bool,
    pub bold: bool,
}

impl Font {
    /// A regular-weight, upright font.
    pub fn new(family: impl Into<String>, size: u32) -> Self {
        Self { family: family.into(), size, italic: false, bold: false }
    }

    /// Same font in italics.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Same font in bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Same font at another size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Font::new("Arial", 16)
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}px", self.family, self.size)?;
        if self.bold {
            write!(f, " bold")?;
        }
        if self.italic {
            write!(f, " italic")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ImageHandle / TextAlign
// ---------------------------------------------------------------------------

/// Opaque reference to a host-owned image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u64);

/// Alignment of content along one axis of its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    End,
}

impl TextAlign {
    /// Fraction of the free space placed before the content.
    #[inline]
    pub const fn factor(self) -> f32 {
        match self {
            TextAlign::Start => 0.0,
            TextAlign::Center => 0.5,
            TextAlign::End => 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// The destination every widget draws onto. Coordinates are absolute pixels.
pub trait DrawSurface {
    /// Fill `rect` with `color`, alpha-blended.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Outline `rect` with a border `width` pixels thick.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);

    /// Draw one line of text with its top-left corner at `position`.
    fn draw_text(&mut self, text: &str, position: Vec2, font: &Font, color: Color);

    /// Blit `image` scaled into `rect`, modulated by `tint`.
    fn draw_image(&mut self, image: ImageHandle, rect: Rect, tint: Color);

    /// Erase `rect` before a redraw. Hosts that repaint every frame can
    /// leave this as a no-op.
    fn clear(&mut self, _rect: Rect) {}
}

/// Measures single lines of text.
pub trait TextMeasurer {
    /// Pixel width and height of `line` rendered in `font`.
    fn measure(&self, line: &str, font: &Font) -> Vec2;
}

/// A decoded animation (GIF or video) exposed frame by frame.
pub trait FrameSource {
    /// Number of frames. Zero is rejected by the video label.
    fn frame_count(&self) -> usize;

    /// Seconds each frame is shown at playback speed 1.
    fn frame_duration(&self) -> f64;

    /// Handle of frame `index` (`index < frame_count()`).
    fn frame(&self, index: usize) -> ImageHandle;
}

/// A surface that discards every command.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl DrawSurface for NullSurface {
    fn fill_rect(&mut self, _rect: Rect, _color: Color) {}
    fn stroke_rect(&mut self, _rect: Rect, _color: Color, _width: f32) {}
    fn draw_text(&mut self, _text: &str, _position: Vec2, _font: &Font, _color: Color) {}
    fn draw_image(&mut self, _image: ImageHandle, _rect: Rect, _tint: Color) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_builders() {
        let font = Font::new("Mono", 12).italic().with_size(14);
        assert_eq!(font.size, 14);
        assert!(font.italic);
        assert!(!font.bold);
        assert_eq!(font.to_string(), "Mono 14px italic");
    }

    #[test]
    fn default_font_is_arial_16() {
        assert_eq!(Font::default(), Font::new("Arial", 16));
    }

    #[test]
    fn align_factors() {
        assert_eq!(TextAlign::Start.factor(), 0.0);
        assert_eq!(TextAlign::Center.factor(), 0.5);
        assert_eq!(TextAlign::End.factor(), 1.0);
    }
}
