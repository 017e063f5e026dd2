//! Image label: a host image scaled into the widget rect.

use std::any::Any;

use crate::error::{GuiError, Result};
use crate::geometry::Color;
use crate::render::ImageHandle;
use crate::scene::PropertyValue;
use crate::widget::{DrawContext, Widget};

pub const IMAGE_PROPERTIES: &[&str] = &["image", "image_color", "image_transparency"];

#[derive(Debug, Clone, PartialEq)]
pub struct ImageLabel {
    image: Option<ImageHandle>,
    image_color: Color,
    /// Image alpha, `0..=255`.
    image_transparency: f64,
}

impl ImageLabel {
    pub fn new(image: Option<ImageHandle>) -> Self {
        Self { image, image_color: Color::WHITE, image_transparency: 255.0 }
    }

    pub fn with_image_color(mut self, color: Color) -> Self {
        self.image_color = color;
        self
    }

    pub fn with_image_transparency(mut self, alpha: f64) -> Self {
        self.image_transparency = alpha.clamp(0.0, 255.0);
        self
    }

    pub fn image(&self) -> Option<ImageHandle> {
        self.image
    }

    pub fn set_image(&mut self, image: Option<ImageHandle>) {
        self.image = image;
    }

    /// Tint with the transparency folded into its alpha.
    pub fn tint(&self) -> Color {
        self.image_color.with_alpha(self.image_transparency as u8)
    }
}

impl Default for ImageLabel {
    fn default() -> Self {
        ImageLabel::new(None)
    }
}

impl Widget for ImageLabel {
    fn widget_type(&self) -> &str {
        "ImageLabel"
    }

    fn property_names(&self) -> &'static [&'static str] {
        IMAGE_PROPERTIES
    }

    fn property(&self, name: &str) -> Option<PropertyValue> {
        let value = match name {
            "image" => PropertyValue::Image(self.image),
            "image_color" => PropertyValue::Color(self.image_color),
            "image_transparency" => PropertyValue::Float(self.image_transparency),
            _ => return None,
        };
        Some(value)
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<()> {
        match name {
            "image" => self.image = value.into_image(name)?,
            "image_color" => self.image_color = value.into_color(name)?,
            "image_transparency" => self.image_transparency = value.into_number(name)?.clamp(0.0, 255.0),
            _ => return Err(GuiError::UnknownProperty(name.to_owned())),
        }
        Ok(())
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) {
        if let Some(image) = self.image {
            ctx.surface.draw_image(image, ctx.rect, self.tint());
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
