//! The redraw protocol and the draw/update traversals.
//!
//! A property write on a built widget redraws its *parent* (a root redraws
//! itself), because siblings drawn later may overlap the changed widget. Each
//! widget carries a block counter; while the redraw target or any of its
//! ancestors holds a nonzero counter, requests are dropped. Batched writers
//! (layout passes, tween ticks) hold the counter for the duration of their
//! writes and then issue exactly one clear+draw.

use super::{Scene, WidgetId};
use crate::event::InputEvent;
use crate::widget::{DrawContext, UpdateContext};

impl Scene {
    // -----------------------------------------------------------------------
    // Protocol
    // -----------------------------------------------------------------------

    /// The widget a property write on `id` redraws: its parent, or itself
    /// for roots and parentless widgets.
    pub fn redraw_target(&self, id: WidgetId) -> Option<WidgetId> {
        let node = self.nodes.get(id)?;
        match node.parent {
            Some(parent) if !node.is_root => Some(parent),
            _ => Some(id),
        }
    }

    /// Whether `id` or any ancestor holds a redraw block.
    pub fn is_redraw_blocked(&self, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            let Some(node) = self.nodes.get(cur) else { return false };
            if node.redraw_block > 0 {
                return true;
            }
            current = node.parent.filter(|_| !node.is_root);
        }
        false
    }

    /// Redraw whatever a change to `id` affects, unless blocked or unbuilt.
    pub fn request_redraw(&mut self, id: WidgetId) {
        if !self.is_built(id) {
            return;
        }
        if let Some(target) = self.redraw_target(id) {
            self.redraw(target);
        }
    }

    /// Clear and draw `id`'s subtree, unless blocked or unbuilt.
    pub(crate) fn redraw(&mut self, id: WidgetId) {
        if !self.is_built(id) || self.is_redraw_blocked(id) {
            return;
        }
        tracing::trace!(?id, "redraw");
        self.clear(id);
        self.draw(id);
    }

    /// Run `f` with redraws of `id`'s subtree suppressed, then redraw `id`
    /// once.
    pub fn batch_redraw<R>(&mut self, id: WidgetId, f: impl FnOnce(&mut Scene) -> R) -> R {
        if let Some(node) = self.nodes.get_mut(id) {
            node.redraw_block += 1;
        }
        let result = f(self);
        if let Some(node) = self.nodes.get_mut(id) {
            node.redraw_block = node.redraw_block.saturating_sub(1);
        }
        self.redraw(id);
        result
    }

    /// Batch writes to `id`'s own properties: blocks and then redraws the
    /// widget those writes would redraw.
    pub fn with_redraw_blocked<R>(&mut self, id: WidgetId, f: impl FnOnce(&mut Scene) -> R) -> R {
        match self.redraw_target(id) {
            Some(target) => self.batch_redraw(target, f),
            None => f(self),
        }
    }

    // -----------------------------------------------------------------------
    // Draw
    // -----------------------------------------------------------------------

    /// Erase the widget's rect on the surface.
    pub fn clear(&mut self, id: WidgetId) {
        if let Some(rect) = self.geometry().rect(id) {
            self.surface.clear(rect);
        }
    }

    /// Paint the widget and its children: background, border, content,
    /// drawer hooks, then children in ascending draw order. Hidden widgets
    /// paint nothing, including their children.
    pub fn draw(&mut self, id: WidgetId) {
        let Some(rect) = self.geometry().rect(id) else { return };
        let Some(node) = self.nodes.get(id) else { return };
        if !node.visible {
            return;
        }

        let background = node.background();
        if background.a > 0 {
            self.surface.fill_rect(rect, background);
        }
        if node.border_size > 0 {
            self.surface.stroke_rect(rect, node.border_color, node.border_size as f32);
        }
        {
            let mut ctx = DrawContext {
                id,
                rect,
                surface: self.surface.as_mut(),
                measurer: self.measurer.as_ref(),
            };
            node.content.draw(&mut ctx);
        }

        let mut drawers = match self.nodes.get_mut(id) {
            Some(node) => std::mem::take(&mut node.drawers),
            None => return,
        };
        for drawer in drawers.iter_mut() {
            let mut ctx = DrawContext {
                id,
                rect,
                surface: self.surface.as_mut(),
                measurer: self.measurer.as_ref(),
            };
            if let Err(err) = drawer(&mut ctx) {
                tracing::error!(?id, error = %err, "drawer hook failed");
            }
        }
        let children = match self.nodes.get_mut(id) {
            Some(node) => {
                drawers.append(&mut node.drawers);
                node.drawers = drawers;
                node.children.clone()
            }
            None => return,
        };

        for child in children {
            self.draw(child);
        }
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    /// Run every root's update traversal.
    pub fn update(&mut self, now: f64, events: &[InputEvent]) {
        for root in self.roots() {
            self.update_widget(root, now, events);
        }
    }

    /// Content update, then updater hooks, then every child regardless of
    /// visibility. Hook failures are logged and the traversal continues.
    pub fn update_widget(&mut self, id: WidgetId, now: f64, events: &[InputEvent]) {
        let Some(rect) = self.geometry().rect(id) else { return };
        let mut ctx = UpdateContext::new(id, rect, now, events);
        let Some(node) = self.nodes.get_mut(id) else { return };

        if let Err(err) = node.content.update(&mut ctx) {
            tracing::error!(?id, error = %err, "widget update failed");
        }
        let mut updaters = std::mem::take(&mut node.updaters);
        for updater in updaters.iter_mut() {
            if let Err(err) = updater(&mut ctx) {
                tracing::error!(?id, error = %err, "updater hook failed");
            }
        }
        let children = match self.nodes.get_mut(id) {
            Some(node) => {
                updaters.append(&mut node.updaters);
                node.updaters = updaters;
                node.children.clone()
            }
            None => return,
        };
        if ctx.redraw_requested() {
            self.request_redraw(id);
        }

        for child in children {
            self.update_widget(child, now, events);
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
