//! Text label: a block of multi-line text aligned inside the widget rect.

use std::any::Any;

use crate::error::{GuiError, Result};
use crate::geometry::{Color, Rect, Vec2};
use crate::render::{Font, TextAlign, TextMeasurer};
use crate::scene::PropertyValue;
use crate::widget::{DrawContext, TextRenderable, Widget};

/// Content properties shared by every text-rendering widget.
pub const TEXT_PROPERTIES: &[&str] = &[
    "text",
    "text_color",
    "text_transparency",
    "text_size",
    "font",
    "text_x_alignment",
    "text_y_alignment",
    "text_border_color",
    "text_border_size",
];

// ---------------------------------------------------------------------------
// TextContent
// ---------------------------------------------------------------------------

/// Text state and cached metrics, embedded by [`TextLabel`] and the text box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextContent {
    pub text: String,
    pub text_color: Color,
    /// Text alpha, `0..=255`.
    pub text_transparency: f64,
    pub font: Font,
    pub text_x_alignment: TextAlign,
    pub text_y_alignment: TextAlign,
    pub text_border_color: Color,
    pub text_border_size: i64,
    font_set: bool,
    size_set: bool,
    line_widths: Vec<f32>,
    line_height: f32,
    bounds: Vec2,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            text_color: Color::WHITE,
            text_transparency: 255.0,
            font: Font::default(),
            text_x_alignment: TextAlign::Center,
            text_y_alignment: TextAlign::Center,
            text_border_color: Color::BLACK,
            text_border_size: 0,
            font_set: false,
            size_set: false,
            line_widths: Vec::new(),
            line_height: 0.0,
            bounds: Vec2::ZERO,
        }
    }

    /// Adopt the scene's default font unless one was chosen explicitly. An
    /// explicit text size survives the swap.
    pub fn apply_default_font(&mut self, font: &Font) {
        if self.font_set {
            return;
        }
        let size = self.font.size;
        self.font = font.clone();
        if self.size_set {
            self.font.size = size;
        }
    }

    pub fn text_size(&self) -> u32 {
        self.font.size
    }

    pub fn set_text_size(&mut self, size: u32) {
        self.font.size = size;
        self.size_set = true;
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = font;
        self.font_set = true;
    }

    /// Width of the widest line and the summed line heights.
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Height of one line in the current font.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Recompute line metrics and bounds.
    pub fn measure(&mut self, measurer: &dyn TextMeasurer) {
        self.line_widths.clear();
        self.line_height = measurer.measure("", &self.font).y;
        let mut height = 0.0;
        for line in self.text.split('\n') {
            let size = measurer.measure(line, &self.font);
            self.line_widths.push(size.x);
            self.line_height = self.line_height.max(size.y);
            height += size.y;
        }
        let width = self.line_widths.iter().copied().fold(0.0, f32::max);
        self.bounds = Vec2::new(width, height);
    }

    /// Top-left corner of the text block inside `rect`.
    pub fn text_position(&self, rect: Rect) -> Vec2 {
        Vec2::new(
            rect.x + (rect.width - self.bounds.x) * self.text_x_alignment.factor(),
            rect.y + (rect.height - self.bounds.y) * self.text_y_alignment.factor(),
        )
    }

    /// Top-left corner of each line, top to bottom.
    pub fn line_positions(&self, rect: Rect) -> Vec<Vec2> {
        let origin = self.text_position(rect);
        let mut y = origin.y;
        self.line_widths
            .iter()
            .map(|&width| {
                let position = Vec2::new(
                    origin.x + (self.bounds.x - width) * self.text_x_alignment.factor(),
                    y,
                );
                y += self.line_height;
                position
            })
            .collect()
    }

    /// Draw every line, outline first, inside `ctx.rect`. Uses the metrics
    /// from the last [`measure`](Self::measure).
    pub fn draw(&self, ctx: &mut DrawContext<'_>) {
        let color = self.text_color.with_alpha(self.text_transparency.clamp(0.0, 255.0) as u8);
        let border = self.text_border_color.with_alpha(color.a);
        let outline = outline_offsets(self.text_border_size);
        for (line, position) in self.text.split('\n').zip(self.line_positions(ctx.rect)) {
            for &(dx, dy) in &outline {
                let shifted = position + Vec2::new(dx as f32, dy as f32);
                ctx.surface.draw_text(line, shifted, &self.font, border);
            }
            ctx.surface.draw_text(line, position, &self.font, color);
        }
    }

    pub fn property(&self, name: &str) -> Option<PropertyValue> {
        let value = match name {
            "text" => PropertyValue::Text(self.text.clone()),
            "text_color" => PropertyValue::Color(self.text_color),
            "text_transparency" => PropertyValue::Float(self.text_transparency),
            "text_size" => PropertyValue::Int(i64::from(self.font.size)),
            "font" => PropertyValue::Font(self.font.clone()),
            "text_x_alignment" => PropertyValue::Align(self.text_x_alignment),
            "text_y_alignment" => PropertyValue::Align(self.text_y_alignment),
            "text_border_color" => PropertyValue::Color(self.text_border_color),
            "text_border_size" => PropertyValue::Int(self.text_border_size),
            _ => return None,
        };
        Some(value)
    }

    pub fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<()> {
        match name {
            "text" => self.text = value.into_text(name)?,
            "text_color" => self.text_color = value.into_color(name)?,
            "text_transparency" => self.text_transparency = value.into_number(name)?.clamp(0.0, 255.0),
            "text_size" => {
                let size = value.into_int(name)?;
                self.set_text_size(u32::try_from(size.max(1)).unwrap_or(u32::MAX));
            }
            "font" => self.set_font(value.into_font(name)?),
            "text_x_alignment" => self.text_x_alignment = value.into_align(name)?,
            "text_y_alignment" => self.text_y_alignment = value.into_align(name)?,
            "text_border_color" => self.text_border_color = value.into_color(name)?,
            "text_border_size" => self.text_border_size = value.into_int(name)?.max(0),
            _ => return Err(GuiError::UnknownProperty(name.to_owned())),
        }
        Ok(())
    }
}

/// Integer offsets tracing a circle of `radius` pixels (midpoint circle),
/// used to stamp a text outline. Empty for a radius of zero.
pub fn outline_offsets(radius: i64) -> Vec<(i64, i64)> {
    if radius <= 0 {
        return Vec::new();
    }
    let mut octant = Vec::new();
    let (mut x, mut y) = (radius, 0_i64);
    let mut error = 1 - radius;
    while x >= y {
        octant.push((x, y));
        y += 1;
        if error < 0 {
            error += 2 * y - 1;
        } else {
            x -= 1;
            error += 2 * (y - x) - 1;
        }
    }
    let mut points = octant.clone();
    points.extend(octant.iter().filter(|(x, y)| x > y).map(|&(x, y)| (y, x)));
    let mirrored: Vec<_> = points.iter().filter(|(x, _)| *x != 0).map(|&(x, y)| (-x, y)).collect();
    points.extend(mirrored);
    let mirrored: Vec<_> = points.iter().filter(|(_, y)| *y != 0).map(|&(x, y)| (x, -y)).collect();
    points.extend(mirrored);
    points.sort_unstable();
    points.dedup();
    points
}

// ---------------------------------------------------------------------------
// TextLabel
// ---------------------------------------------------------------------------

/// Static text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    content: TextContent,
}

impl TextLabel {
    pub fn new(text: impl Into<String>) -> Self {
        Self { content: TextContent::new(text) }
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.content.text_color = color;
        self
    }

    pub fn with_text_transparency(mut self, alpha: f64) -> Self {
        self.content.text_transparency = alpha.clamp(0.0, 255.0);
        self
    }

    pub fn with_text_size(mut self, size: u32) -> Self {
        self.content.set_text_size(size);
        self
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.content.set_font(font);
        self
    }

    pub fn with_alignment(mut self, x: TextAlign, y: TextAlign) -> Self {
        self.content.text_x_alignment = x;
        self.content.text_y_alignment = y;
        self
    }

    pub fn with_text_border(mut self, color: Color, size: i64) -> Self {
        self.content.text_border_color = color;
        self.content.text_border_size = size.max(0);
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content.text = text.into();
    }
}

impl Default for TextLabel {
    fn default() -> Self {
        TextLabel::new("TextLabel")
    }
}

impl Widget for TextLabel {
    fn widget_type(&self) -> &str {
        "TextLabel"
    }

    fn property_names(&self) -> &'static [&'static str] {
        TEXT_PROPERTIES
    }

    fn property(&self, name: &str) -> Option<PropertyValue> {
        self.content.property(name)
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<()> {
        self.content.set_property(name, value)
    }

    fn refresh(&mut self, measurer: &dyn TextMeasurer) {
        self.content.measure(measurer);
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) {
        self.content.draw(ctx);
    }

    fn as_text(&self) -> Option<&dyn TextRenderable> {
        Some(self)
    }

    fn as_text_mut(&mut self) -> Option<&mut dyn TextRenderable> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl TextRenderable for TextLabel {
    fn text_content(&self) -> &TextContent {
        &self.content
    }

    fn text_content_mut(&mut self) -> &mut TextContent {
        &mut self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedMeasurer;

    fn measured(text: &str) -> TextContent {
        let mut content = TextContent::new(text);
        content.measure(&FixedMeasurer::new(10.0, 20.0));
        content
    }

    // ── Metrics ──

    #[test]
    fn bounds_are_widest_line_by_total_height() {
        let content = measured("abc\nabcdef\na");
        assert_eq!(content.bounds(), Vec2::new(60.0, 60.0));
        assert_eq!(content.line_height(), 20.0);
    }

    #[test]
    fn empty_text_still_has_a_line() {
        let content = measured("");
        assert_eq!(content.bounds(), Vec2::new(0.0, 20.0));
    }

    #[test]
    fn text_position_centers_by_default() {
        let content = measured("abcd");
        let rect = Rect::new(100.0, 100.0, 200.0, 100.0);
        assert_eq!(content.text_position(rect), Vec2::new(180.0, 140.0));
    }

    #[test]
    fn text_position_end_alignment() {
        let mut content = measured("abcd");
        content.text_x_alignment = TextAlign::End;
        content.text_y_alignment = TextAlign::Start;
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(content.text_position(rect), Vec2::new(60.0, 0.0));
    }

    #[test]
    fn lines_align_inside_the_block() {
        let content = measured("ab\nabcd");
        let rect = Rect::new(0.0, 0.0, 40.0, 40.0);
        assert_eq!(
            content.line_positions(rect),
            vec![Vec2::new(10.0, 0.0), Vec2::new(0.0, 20.0)]
        );
    }

    // ── Properties ──

    #[test]
    fn property_round_trip_and_type_errors() {
        let mut label = TextLabel::new("x");
        label.set_property("text", "hello".into()).unwrap();
        assert_eq!(label.property("text"), Some(PropertyValue::Text("hello".into())));

        let err = label.set_property("text_color", PropertyValue::Int(3)).unwrap_err();
        assert!(matches!(err, GuiError::PropertyType { .. }));
        assert_eq!(label.property("text_color"), Some(PropertyValue::Color(Color::WHITE)));
        assert!(label.property("nope").is_none());
    }

    #[test]
    fn default_font_respects_explicit_choices() {
        let mut plain = TextContent::new("a");
        plain.apply_default_font(&Font::new("Mono", 12));
        assert_eq!(plain.font, Font::new("Mono", 12));

        let mut sized = TextContent::new("a");
        sized.set_text_size(30);
        sized.apply_default_font(&Font::new("Mono", 12));
        assert_eq!(sized.font, Font::new("Mono", 30));

        let mut chosen = TextContent::new("a");
        chosen.set_font(Font::new("Serif", 9));
        chosen.apply_default_font(&Font::new("Mono", 12));
        assert_eq!(chosen.font, Font::new("Serif", 9));
    }

    // ── Outline ──

    #[test]
    fn outline_radius_one_is_a_plus() {
        assert_eq!(outline_offsets(1), vec![(-1, 0), (0, -1), (0, 1), (1, 0)]);
        assert!(outline_offsets(0).is_empty());
    }

    #[test]
    fn outline_is_symmetric() {
        let points = outline_offsets(3);
        for &(x, y) in &points {
            assert!(points.contains(&(-x, y)));
            assert!(points.contains(&(x, -y)));
            assert!(points.contains(&(y, x)));
        }
    }
}
