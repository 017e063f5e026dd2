//! Rendering boundary: the traits the scene draws, measures and decodes through.

pub mod surface;

pub use surface::{DrawSurface, Font, FrameSource, ImageHandle, NullSurface, TextAlign, TextMeasurer};
