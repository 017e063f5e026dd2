//! Widget content trait and capability interfaces.
//!
//! Every node in the scene owns the same core (geometry, tree membership,
//! signals) plus one boxed [`Widget`] holding its content. Content types opt
//! into capabilities by returning `Some` from the `as_*` accessors instead of
//! inheriting from a base class.

use std::any::Any;

use crate::error::{GuiError, Result};
use crate::event::InputEvent;
use crate::geometry::Rect;
use crate::render::{DrawSurface, TextMeasurer};
use crate::scene::{PropertyValue, WidgetId};
use crate::widgets::text_label::TextContent;

// ---------------------------------------------------------------------------
// Hook contexts
// ---------------------------------------------------------------------------

/// Passed to [`Widget::draw`] and to user drawer hooks.
pub struct DrawContext<'a> {
    /// The widget being drawn.
    pub id: WidgetId,
    /// The widget's absolute rect.
    pub rect: Rect,
    pub surface: &'a mut dyn DrawSurface,
    pub measurer: &'a dyn TextMeasurer,
}

/// Passed to [`Widget::update`] and to user updater hooks.
pub struct UpdateContext<'a> {
    /// The widget being updated.
    pub id: WidgetId,
    /// The widget's absolute rect.
    pub rect: Rect,
    /// Seconds since the clock's epoch.
    pub now: f64,
    /// This frame's input batch.
    pub events: &'a [InputEvent],
    redraw: bool,
}

impl<'a> UpdateContext<'a> {
    pub(crate) fn new(id: WidgetId, rect: Rect, now: f64, events: &'a [InputEvent]) -> Self {
        Self { id, rect, now, events, redraw: false }
    }

    /// Ask the scene to redraw this widget after the update pass.
    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// Whether [`request_redraw`](Self::request_redraw) was called.
    pub fn redraw_requested(&self) -> bool {
        self.redraw
    }
}

/// A user-registered draw hook, run after the widget's own content.
pub type DrawerHook = Box<dyn FnMut(&mut DrawContext<'_>) -> Result<()>>;

/// A user-registered update hook, run after the widget's own update.
pub type UpdaterHook = Box<dyn FnMut(&mut UpdateContext<'_>) -> Result<()>>;

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// Content of a scene node.
///
/// Object-safe: the scene stores `Box<dyn Widget>` and reaches concrete
/// types through [`as_any`](Widget::as_any).
pub trait Widget {
    /// Type name used for generated widget names (e.g. "Frame", "TextLabel").
    fn widget_type(&self) -> &str;

    /// Names of the content properties this widget exposes.
    fn property_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// Read a content property.
    fn property(&self, _name: &str) -> Option<PropertyValue> {
        None
    }

    /// Write a content property. Must leave the widget untouched on error.
    fn set_property(&mut self, name: &str, _value: PropertyValue) -> Result<()> {
        Err(GuiError::UnknownProperty(name.to_owned()))
    }

    /// Recompute cached metrics (text bounds and the like). Called when the
    /// widget is created and after every content change.
    fn refresh(&mut self, _measurer: &dyn TextMeasurer) {}

    /// Paint the content inside `ctx.rect`, on top of background and border.
    fn draw(&self, _ctx: &mut DrawContext<'_>) {}

    /// Per-frame update.
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Layouts can only be applied to containers.
    fn as_container(&self) -> Option<&dyn Container> {
        None
    }

    fn as_text(&self) -> Option<&dyn TextRenderable> {
        None
    }

    fn as_text_mut(&mut self) -> Option<&mut dyn TextRenderable> {
        None
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        None
    }

    fn as_focusable_mut(&mut self) -> Option<&mut dyn Focusable> {
        None
    }

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// A widget that hosts children arranged by a layout style.
pub trait Container {
    /// Whether a layout style may be applied.
    fn accepts_layout(&self) -> bool {
        true
    }
}

/// A widget that renders a block of text.
pub trait TextRenderable {
    fn text_content(&self) -> &TextContent;

    fn text_content_mut(&mut self) -> &mut TextContent;

    /// The current text.
    fn text(&self) -> &str {
        &self.text_content().text
    }
}

/// A widget that can hold keyboard focus.
pub trait Focusable {
    /// Whether the widget currently holds focus.
    fn is_focused(&self) -> bool;

    /// Whether a pointer press may give this widget focus right now.
    fn accepts_focus(&self) -> bool {
        true
    }

    /// Focus was captured by this widget.
    fn focus_gained(&mut self);

    /// Focus was released. `enter_pressed` is true when Enter caused it.
    fn focus_lost(&mut self, enter_pressed: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl Widget for Plain {
        fn widget_type(&self) -> &str {
            "Plain"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn defaults_expose_no_capabilities() {
        let mut w = Plain;
        assert!(w.as_container().is_none());
        assert!(w.as_text().is_none());
        assert!(w.as_focusable().is_none());
        assert!(w.as_focusable_mut().is_none());
        assert!(w.property("anything").is_none());
        assert!(w.property_names().is_empty());
    }

    #[test]
    fn default_set_property_is_unknown() {
        let mut w = Plain;
        let err = w.set_property("text", PropertyValue::Bool(true)).unwrap_err();
        assert!(matches!(err, GuiError::UnknownProperty(name) if name == "text"));
    }

    #[test]
    fn downcast_through_any() {
        let boxed: Box<dyn Widget> = Box::new(Plain);
        assert!(boxed.as_any().downcast_ref::<Plain>().is_some());
        assert_eq!(boxed.widget_type(), "Plain");
    }

    #[test]
    fn update_context_redraw_flag() {
        let id = WidgetId::default();
        let mut ctx = UpdateContext::new(id, Rect::EMPTY, 0.0, &[]);
        assert!(!ctx.redraw_requested());
        ctx.request_redraw();
        assert!(ctx.redraw_requested());
    }
}
