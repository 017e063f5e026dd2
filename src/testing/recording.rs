//! Recording doubles for the host boundary: a draw surface that logs every
//! command, a fixed-width text measurer and a manually advanced clock.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::app::Clock;
use crate::geometry::{Color, Rect, Vec2};
use crate::render::{DrawSurface, Font, ImageHandle, TextMeasurer};

// ---------------------------------------------------------------------------
// DrawCommand
// ---------------------------------------------------------------------------

/// One call made on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { rect: Rect },
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color, width: f32 },
    Text { text: String, position: Vec2, font: Font, color: Color },
    Image { image: ImageHandle, rect: Rect, tint: Color },
}

struct RectDisplay(Rect);

impl fmt::Display for RectDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        write!(f, "{},{} {}x{}", r.x, r.y, r.width, r.height)
    }
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCommand::Clear { rect } => write!(f, "clear {}", RectDisplay(*rect)),
            DrawCommand::FillRect { rect, color } => write!(f, "fill {} {color}", RectDisplay(*rect)),
            DrawCommand::StrokeRect { rect, color, width } => {
                write!(f, "stroke {} {color} {width}", RectDisplay(*rect))
            }
            DrawCommand::Text { text, position, color, .. } => {
                write!(f, "text {:?} at {},{} {color}", text, position.x, position.y)
            }
            DrawCommand::Image { image, rect, tint } => {
                write!(f, "image #{} {} {tint}", image.0, RectDisplay(*rect))
            }
        }
    }
}

/// One command per line, for snapshots.
pub fn render_log(commands: &[DrawCommand]) -> String {
    commands.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
}

// ---------------------------------------------------------------------------
// RecordingSurface
// ---------------------------------------------------------------------------

/// A draw surface that records commands instead of drawing.
///
/// Clones share one log, so a test can keep a handle after boxing the
/// surface into a scene.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    log: Rc<RefCell<Vec<DrawCommand>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<DrawCommand> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    /// Copy of the log.
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.log.borrow().clone()
    }

    /// Text of every recorded text command, in order.
    pub fn texts(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, command: DrawCommand) {
        self.log.borrow_mut().push(command);
    }
}

impl DrawSurface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.push(DrawCommand::StrokeRect { rect, color, width });
    }

    fn draw_text(&mut self, text: &str, position: Vec2, font: &Font, color: Color) {
        self.push(DrawCommand::Text { text: text.to_owned(), position, font: font.clone(), color });
    }

    fn draw_image(&mut self, image: ImageHandle, rect: Rect, tint: Color) {
        self.push(DrawCommand::Image { image, rect, tint });
    }

    fn clear(&mut self, rect: Rect) {
        self.push(DrawCommand::Clear { rect });
    }
}

// ---------------------------------------------------------------------------
// FixedMeasurer
// ---------------------------------------------------------------------------

/// Measures every character as `glyph_width` wide and every line as
/// `line_height` tall, regardless of font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMeasurer {
    pub glyph_width: f32,
    pub line_height: f32,
}

impl FixedMeasurer {
    pub fn new(glyph_width: f32, line_height: f32) -> Self {
        Self { glyph_width, line_height }
    }
}

impl Default for FixedMeasurer {
    fn default() -> Self {
        Self::new(8.0, 16.0)
    }
}

impl TextMeasurer for FixedMeasurer {
    fn measure(&self, line: &str, _font: &Font) -> Vec2 {
        Vec2::new(line.chars().count() as f32 * self.glyph_width, self.line_height)
    }
}

// ---------------------------------------------------------------------------
// ManualClock
// ---------------------------------------------------------------------------

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    /// A clock reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now: f64) {
        self.now.set(now);
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_log() {
        let surface = RecordingSurface::new();
        let mut boxed: Box<dyn DrawSurface> = Box::new(surface.clone());
        boxed.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color::BLACK);
        boxed.clear(Rect::EMPTY);
        assert_eq!(surface.commands().len(), 2);
        assert_eq!(surface.take().len(), 2);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn command_display() {
        let commands = [
            DrawCommand::FillRect { rect: Rect::new(0.0, 0.0, 10.0, 5.0), color: Color::WHITE },
            DrawCommand::Text {
                text: "hi".into(),
                position: Vec2::new(1.5, 2.0),
                font: Font::default(),
                color: Color::BLACK,
            },
        ];
        assert_eq!(render_log(&commands), "fill 0,0 10x5 #ffffffff\ntext \"hi\" at 1.5,2 #000000ff");
    }

    #[test]
    fn fixed_measurer_counts_chars() {
        let m = FixedMeasurer::new(10.0, 20.0);
        assert_eq!(m.measure("héllo", &Font::default()), Vec2::new(50.0, 20.0));
    }

    #[test]
    fn manual_clock_is_shared() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance(1.5);
        other.advance(0.5);
        assert_eq!(clock.now(), 2.0);
        clock.set(0.25);
        assert_eq!(other.now(), 0.25);
    }
}
