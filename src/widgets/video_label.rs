//! Video label: plays a [`FrameSource`] inside the widget rect.
//!
//! Playback starts at the first update. The shown frame is derived from
//! elapsed time on every update, so a slow frame loop skips frames instead
//! of falling behind.

use std::any::Any;
use std::fmt;

use crate::error::{GuiError, Result};
use crate::geometry::Color;
use crate::render::FrameSource;
use crate::scene::PropertyValue;
use crate::widget::{DrawContext, UpdateContext, Widget};

pub const VIDEO_PROPERTIES: &[&str] = &["gif_playback_speed", "gif_color", "gif_transparency", "gif_frame"];

pub struct VideoLabel {
    source: Box<dyn FrameSource>,
    playback_speed: f64,
    color: Color,
    /// Frame alpha, `0..=255`.
    transparency: f64,
    started_at: Option<f64>,
    frame: usize,
}

impl VideoLabel {
    /// Wrap `source`. Fails when the source has no frames or a
    /// non-positive frame duration.
    pub fn new(source: impl FrameSource + 'static) -> Result<Self> {
        if source.frame_count() == 0 {
            return Err(GuiError::InvalidWidget("video source has no frames".into()));
        }
        let duration = source.frame_duration();
        if duration.is_nan() || duration <= 0.0 {
            return Err(GuiError::InvalidWidget("video frame duration must be positive".into()));
        }
        Ok(Self {
            source: Box::new(source),
            playback_speed: 1.0,
            color: Color::WHITE,
            transparency: 255.0,
            started_at: None,
            frame: 0,
        })
    }

    pub fn with_playback_speed(mut self, speed: f64) -> Self {
        self.playback_speed = speed;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Index of the frame currently shown.
    pub fn current_frame(&self) -> usize {
        self.frame
    }

    /// Frame index `elapsed` seconds into playback.
    pub fn frame_at(&self, elapsed: f64) -> usize {
        let count = self.source.frame_count();
        let step = (elapsed.max(0.0) / self.source.frame_duration() * self.playback_speed).floor();
        if !step.is_finite() || step < 0.0 {
            return 0;
        }
        (step as u64 % count as u64) as usize
    }

    /// Restart playback at the next update.
    pub fn restart(&mut self) {
        self.started_at = None;
        self.frame = 0;
    }
}

impl fmt::Debug for VideoLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoLabel")
            .field("frames", &self.source.frame_count())
            .field("frame", &self.frame)
            .field("playback_speed", &self.playback_speed)
            .finish_non_exhaustive()
    }
}

impl Widget for VideoLabel {
    fn widget_type(&self) -> &str {
        "VideoLabel"
    }

    fn property_names(&self) -> &'static [&'static str] {
        VIDEO_PROPERTIES
    }

    fn property(&self, name: &str) -> Option<PropertyValue> {
        let value = match name {
            "gif_playback_speed" => PropertyValue::Float(self.playback_speed),
            "gif_color" => PropertyValue::Color(self.color),
            "gif_transparency" => PropertyValue::Float(self.transparency),
            "gif_frame" => PropertyValue::Int(self.frame as i64),
            _ => return None,
        };
        Some(value)
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<()> {
        match name {
            "gif_playback_speed" => self.playback_speed = value.into_number(name)?,
            "gif_color" => self.color = value.into_color(name)?,
            "gif_transparency" => self.transparency = value.into_number(name)?.clamp(0.0, 255.0),
            "gif_frame" => return Err(GuiError::ReadOnlyProperty(name.to_owned())),
            _ => return Err(GuiError::UnknownProperty(name.to_owned())),
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) -> Result<()> {
        let started_at = *self.started_at.get_or_insert(ctx.now);
        let frame = self.frame_at(ctx.now - started_at);
        if frame != self.frame {
            tracing::trace!(id = ?ctx.id, frame, "video frame advanced");
            self.frame = frame;
            ctx.request_redraw();
        }
        Ok(())
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) {
        let tint = self.color.with_alpha(self.transparency as u8);
        ctx.surface.draw_image(self.source.frame(self.frame), ctx.rect, tint);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
