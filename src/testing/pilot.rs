//! Pilot: programmatic interaction with a headless Gui.
//!
//! The `Pilot` wraps a [`Gui`] that draws onto a [`RecordingSurface`] and
//! reads a [`ManualClock`]. The input helpers run one frame per simulated
//! event, so a sunk event never swallows the ones typed after it. Use
//! [`send`](Pilot::send) and [`tick`](Pilot::tick) to deliver a whole batch in
//! one frame instead.

use super::recording::{DrawCommand, FixedMeasurer, ManualClock, RecordingSurface};
use crate::app::{Gui, GuiConfig};
use crate::event::{InputEvent, Key, KeyEvent, Modifiers, MouseButton};
use crate::geometry::Vec2;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless gui driver for testing.
///
/// # Examples
///
/// ```ignore
/// use scenegraph_ui::testing::Pilot;
/// use scenegraph_ui::event::Key;
///
/// let mut pilot = Pilot::new(320, 240);
/// pilot.press_key(Key::Char('a'));
/// pilot.tick();
/// assert!(pilot.is_running());
/// ```
pub struct Pilot {
    gui: Gui,
    surface: RecordingSurface,
    clock: ManualClock,
    pending: Vec<InputEvent>,
}

impl Pilot {
    /// Create a headless gui with the given viewport size.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(GuiConfig::default().with_viewport(Vec2::new(width as f32, height as f32)))
    }

    /// Create a pilot from a [`GuiConfig`].
    pub fn with_config(config: GuiConfig) -> Self {
        let surface = RecordingSurface::new();
        let clock = ManualClock::new();
        let gui = Gui::new(config, surface.clone(), FixedMeasurer::default()).with_clock(clock.clone());
        Self { gui, surface, clock, pending: Vec::new() }
    }

    // ── Input simulation ──

    /// Queue a raw event for the next [`tick`](Self::tick).
    pub fn send(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    /// Run a frame for anything queued, then one for `event`.
    fn deliver(&mut self, event: InputEvent) {
        if !self.pending.is_empty() {
            self.tick();
        }
        self.gui.update(std::slice::from_ref(&event));
    }

    /// Simulate a key press and release with no modifiers.
    pub fn press_key(&mut self, key: Key) {
        self.press_key_with(key, Modifiers::NONE);
    }

    /// Simulate a key press and release with the given modifiers.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) {
        let event = KeyEvent::new(key, modifiers);
        self.deliver(InputEvent::KeyDown(event));
        self.deliver(InputEvent::KeyUp(event));
    }

    /// Simulate typing each character of `text` as a key press.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press_key(Key::Char(ch));
        }
    }

    /// Simulate pointer motion to (x, y).
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.deliver(InputEvent::mouse_move(x, y));
    }

    /// Simulate a left-button click at (x, y): motion, press and release.
    pub fn click(&mut self, x: f32, y: f32) {
        self.deliver(InputEvent::mouse_move(x, y));
        self.deliver(InputEvent::mouse_down(MouseButton::Left, x, y));
        self.deliver(InputEvent::mouse_up(MouseButton::Left, x, y));
    }

    /// Simulate a viewport resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.deliver(InputEvent::Resize { width, height });
    }

    // ── Processing ──

    /// Run one frame over every queued event (possibly none).
    pub fn tick(&mut self) {
        let events = std::mem::take(&mut self.pending);
        self.gui.update(&events);
    }

    /// Move the clock forward, then run one frame.
    pub fn advance(&mut self, seconds: f64) {
        self.clock.advance(seconds);
        self.tick();
    }

    // ── Query ──

    pub fn gui(&self) -> &Gui {
        &self.gui
    }

    pub fn gui_mut(&mut self) -> &mut Gui {
        &mut self.gui
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Whether the gui is still running (has not quit).
    pub fn is_running(&self) -> bool {
        !self.gui.should_quit()
    }

    /// Drain the draw commands recorded so far.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        self.surface.take()
    }

    /// Handle to the recording surface.
    pub fn surface(&self) -> &RecordingSurface {
        &self.surface
    }
}

// ===========================================================================
// Tests
// ===========================================================================
