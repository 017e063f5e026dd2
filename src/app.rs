//! Gui: configuration, clock and the per-frame loop.
//!
//! [`Gui`] ties together the scene, the action service and the tween
//! service. The host calls [`Gui::update`] once per frame with that frame's
//! input batch; everything else happens synchronously inside that call.

use std::time::Instant;

use crate::error::Result;
use crate::event::{ActionResult, ActionService, InputEvent, MouseAction, PointerEvent};
use crate::geometry::{Color, Vec2};
use crate::render::{DrawSurface, Font, TextMeasurer};
use crate::reactive::Signal;
use crate::scene::{PropertyValue, Scene, WidgetId, WidgetSignals};
use crate::tween::{TweenId, TweenInfo, TweenService};
use crate::widgets::text_box::{install_editing_actions, remove_editing_actions};

// ---------------------------------------------------------------------------
// GuiConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`Gui`] and its scene.
#[derive(Debug, Clone)]
pub struct GuiConfig {
    /// Size every root resolves against.
    pub viewport: Vec2,
    /// Items a quadtree node holds before it subdivides.
    pub quadtree_capacity: usize,
    /// Nodes at this depth never subdivide.
    pub quadtree_max_depth: usize,
    /// Background color given to new widgets.
    pub background_color: Color,
    /// Font given to text widgets that do not set their own.
    pub default_font: Font,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(800.0, 600.0),
            quadtree_capacity: 6,
            quadtree_max_depth: 10,
            background_color: Color::rgb(140, 140, 140),
            default_font: Font::new("Arial", 16),
        }
    }
}

impl GuiConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewport size (builder).
    pub fn with_viewport(mut self, viewport: Vec2) -> Self {
        self.viewport = viewport;
        self
    }

    /// Set the quadtree node capacity and maximum depth (builder).
    pub fn with_quadtree_limits(mut self, capacity: usize, max_depth: usize) -> Self {
        self.quadtree_capacity = capacity.max(1);
        self.quadtree_max_depth = max_depth;
        self
    }

    /// Set the default widget background (builder).
    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the default font (builder).
    pub fn with_default_font(mut self, font: Font) -> Self {
        self.default_font = font;
        self
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of frame timestamps, in seconds.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall-clock seconds since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

// ---------------------------------------------------------------------------
// Gui
// ---------------------------------------------------------------------------

/// Picks one of a widget's pointer signals.
type SignalSelector = fn(&WidgetSignals) -> &Signal<PointerEvent>;

/// The frame loop.
///
/// Each [`update`](Gui::update) runs, in order: resize events, action
/// dispatch, focus releases requested by actions, tweens, pointer signals
/// and focus changes, then every widget's update hooks.
pub struct Gui {
    scene: Scene,
    actions: ActionService,
    tweens: TweenService,
    clock: Box<dyn Clock>,
    pointer: Option<Vec2>,
    hovered: Option<WidgetId>,
    focused: Option<WidgetId>,
    running: bool,
}

impl Gui {
    /// Create a gui drawing onto `surface`, timed by the system clock.
    pub fn new(
        config: GuiConfig,
        surface: impl DrawSurface + 'static,
        measurer: impl TextMeasurer + 'static,
    ) -> Self {
        Self {
            scene: Scene::new(&config, Box::new(surface), Box::new(measurer)),
            actions: ActionService::new(),
            tweens: TweenService::new(),
            clock: Box::new(SystemClock::new()),
            pointer: None,
            hovered: None,
            focused: None,
            running: true,
        }
    }

    /// Replace the clock (builder).
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn actions(&self) -> &ActionService {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut ActionService {
        &mut self.actions
    }

    pub fn tweens(&self) -> &TweenService {
        &self.tweens
    }

    pub fn tweens_mut(&mut self) -> &mut TweenService {
        &mut self.tweens
    }

    /// The clock's current time.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// The widget under the pointer as of the last frame.
    pub fn hovered(&self) -> Option<WidgetId> {
        self.hovered
    }

    /// The widget holding keyboard focus.
    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    /// Whether a quit event has been seen.
    pub fn should_quit(&self) -> bool {
        !self.running
    }

    /// Request the frame loop to stop.
    pub fn request_quit(&mut self) {
        self.running = false;
    }

    // -----------------------------------------------------------------------
    // Tweens
    // -----------------------------------------------------------------------

    /// Create a paused tween of `widget`'s properties.
    pub fn create_tween<S: Into<String>>(
        &mut self,
        widget: WidgetId,
        targets: impl IntoIterator<Item = (S, PropertyValue)>,
        info: TweenInfo,
    ) -> Result<TweenId> {
        self.tweens.create(&self.scene, widget, targets, info)
    }

    /// Play or resume a tween now.
    pub fn play_tween(&mut self, id: TweenId) -> Result<()> {
        self.tweens.play(id, self.clock.now())
    }

    pub fn pause_tween(&mut self, id: TweenId) -> Result<()> {
        self.tweens.pause(id, self.clock.now())
    }

    /// Cancel a tween, restoring the values it started from.
    pub fn cancel_tween(&mut self, id: TweenId) -> Result<()> {
        self.tweens.cancel(id, &mut self.scene)
    }

    // -----------------------------------------------------------------------
    // Frame
    // -----------------------------------------------------------------------

    /// Change the viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene.set_viewport(Vec2::new(width as f32, height as f32));
    }

    /// Run one frame over `events`. Returns what action dispatch did with
    /// the batch.
    pub fn update(&mut self, events: &[InputEvent]) -> ActionResult {
        let now = self.clock.now();
        self.forget_destroyed();

        for event in events {
            match event {
                InputEvent::Resize { width, height } => self.resize(*width, *height),
                InputEvent::Quit => self.running = false,
                _ => {}
            }
        }

        let result = self.actions.dispatch(events, &mut self.scene);
        if let Some((id, enter_pressed)) = self.scene.take_blur_request() {
            if self.focused == Some(id) {
                self.release_focus(enter_pressed);
            }
        }

        self.tweens.update(now, &mut self.scene);
        self.dispatch_pointer(events);

        self.scene.update(now, events);
        result
    }

    /// Give `id` keyboard focus, releasing any current holder. Returns
    /// whether `id` took it.
    pub fn focus(&mut self, id: WidgetId) -> bool {
        if self.focused == Some(id) {
            return true;
        }
        if !self.accepts_focus(id) {
            return false;
        }
        self.release_focus(false);
        match self.scene.edit_focusable(id, |f| f.focus_gained()) {
            Ok(Some(())) => {}
            Ok(None) => return false,
            Err(err) => {
                tracing::error!(?id, error = %err, "focus capture failed");
                return false;
            }
        }
        if let Err(err) = install_editing_actions(&mut self.actions, id) {
            tracing::error!(?id, error = %err, "editing actions not installed");
        }
        self.focused = Some(id);
        tracing::debug!(?id, "focus captured");
        true
    }

    /// Release keyboard focus. `enter_pressed` is passed to the widget's
    /// focus-lost handling.
    pub fn release_focus(&mut self, enter_pressed: bool) {
        let Some(id) = self.focused.take() else { return };
        remove_editing_actions(&mut self.actions);
        match self.scene.edit_focusable(id, |f| f.focus_lost(enter_pressed)) {
            Ok(_) => {
                if let Ok(text) = self.scene.property(id, "text") {
                    self.scene.fire_property_changed(id, "text", text);
                }
            }
            Err(err) => tracing::debug!(?id, error = %err, "focus holder already gone"),
        }
        tracing::debug!(?id, enter_pressed, "focus released");
    }

    fn accepts_focus(&self, id: WidgetId) -> bool {
        self.scene
            .content_dyn(id)
            .and_then(|w| w.as_focusable())
            .is_some_and(|f| f.accepts_focus())
    }

    fn forget_destroyed(&mut self) {
        if self.focused.is_some_and(|id| !self.scene.contains(id)) {
            self.focused = None;
            remove_editing_actions(&mut self.actions);
        }
        if self.hovered.is_some_and(|id| !self.scene.contains(id)) {
            self.hovered = None;
        }
    }

    /// Fire pointer signals on the deepest hit widget and move focus on
    /// presses. Hover is re-checked at the last known pointer position even
    /// without motion, since widgets may have moved underneath it.
    fn dispatch_pointer(&mut self, events: &[InputEvent]) {
        for event in events {
            let InputEvent::Mouse(me) = event else { continue };
            let position = me.position();
            self.pointer = Some(position);
            let hit = self.update_hover(position);

            let (signal, button): (SignalSelector, _) = match me.kind {
                MouseAction::Moved | MouseAction::Drag(_) => (|s| &s.mouse_moved, None),
                MouseAction::Down(button) => (|s| &s.mouse_button_down, Some(button)),
                MouseAction::Up(button) => (|s| &s.mouse_button_up, Some(button)),
                MouseAction::ScrollUp | MouseAction::ScrollDown => continue,
            };
            if let Some(id) = hit {
                self.fire_pointer(id, signal, PointerEvent { position, button });
            }
            if matches!(me.kind, MouseAction::Down(_)) {
                self.press_focus(hit);
            }
        }
        if let Some(position) = self.pointer {
            self.update_hover(position);
        }
    }

    fn update_hover(&mut self, position: Vec2) -> Option<WidgetId> {
        let hit = self.scene.hit_test(position);
        if hit != self.hovered {
            let event = PointerEvent { position, button: None };
            if let Some(old) = self.hovered {
                self.fire_pointer(old, |s| &s.mouse_leaving, event);
            }
            if let Some(new) = hit {
                self.fire_pointer(new, |s| &s.mouse_entered, event);
            }
            self.hovered = hit;
        }
        hit
    }

    fn fire_pointer(&self, id: WidgetId, signal: SignalSelector, event: PointerEvent) {
        let Ok(signals) = self.scene.signals(id) else { return };
        tracing::trace!(?id, ?event, "pointer signal");
        signal(signals).fire(&event);
    }

    fn press_focus(&mut self, hit: Option<WidgetId>) {
        match hit {
            Some(id) if self.focused == Some(id) => {}
            Some(id) if self.accepts_focus(id) => {
                self.focus(id);
            }
            _ => self.release_focus(false),
        }
    }
}

impl std::fmt::Debug for Gui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gui")
            .field("widgets", &self.scene.len())
            .field("actions", &self.actions)
            .field("tweens", &self.tweens)
            .field("hovered", &self.hovered)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
